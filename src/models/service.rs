use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Catalog entry describing a bookable kind of work. `base_rate` is in
/// minor currency units, like every monetary field in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceOffering {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub base_rate: i64,
}
