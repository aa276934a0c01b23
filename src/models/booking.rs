use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BookingStatus {
    Pending,
    Accepted,
    Rejected,
    Completed,
}

impl BookingStatus {
    /// Every state other than Pending is terminal; no transition leaves it.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BookingStatus::Pending)
    }
}

/// A scheduled engagement between a customer and a provider. The commission
/// split is computed once at creation and never recomputed; bookings are
/// never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub provider_id: Uuid,
    pub service_id: Uuid,
    pub scheduled_for: DateTime<Utc>,
    pub total_amount: i64,
    pub platform_commission: i64,
    pub provider_payout: i64,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub enum BookingEvent {
    Created(Booking),
    StatusChanged(Booking),
}
