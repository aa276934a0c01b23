use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::GeoPoint;

/// A service-offering actor. Providers start unverified and only become
/// searchable once the verification flag is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub id: Uuid,
    pub name: String,
    pub service_type: String,
    pub bio: Option<String>,
    pub hourly_rate: i64,
    pub is_verified: bool,
    pub location: GeoPoint,
    pub created_at: DateTime<Utc>,
}
