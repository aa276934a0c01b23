use dashmap::DashMap;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::auth::AuthKeys;
use crate::geo::index::GeoIndex;
use crate::models::booking::{Booking, BookingEvent};
use crate::models::customer::Customer;
use crate::models::provider::Provider;
use crate::models::service::ServiceOffering;
use crate::observability::metrics::Metrics;

/// The storage handle: constructed once at startup, shared behind an Arc,
/// dropped at shutdown. DashMap gives per-entry atomicity, which is all the
/// single-record write model needs.
pub struct AppState {
    pub providers: DashMap<Uuid, Provider>,
    pub customers: DashMap<Uuid, Customer>,
    pub services: DashMap<Uuid, ServiceOffering>,
    pub bookings: DashMap<Uuid, Booking>,
    pub geo_index: GeoIndex,
    pub booking_events_tx: broadcast::Sender<BookingEvent>,
    pub auth: AuthKeys,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(event_buffer_size: usize, jwt_secret: &str) -> Self {
        let (booking_events_tx, _unused_rx) = broadcast::channel(event_buffer_size);

        Self {
            providers: DashMap::new(),
            customers: DashMap::new(),
            services: DashMap::new(),
            bookings: DashMap::new(),
            geo_index: GeoIndex::new(),
            booking_events_tx,
            auth: AuthKeys::new(jwt_secret),
            metrics: Metrics::new(),
        }
    }
}
