use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::Json;
use axum::Router;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{self, Role};
use crate::error::AppError;
use crate::ledger::{lifecycle, split};
use crate::models::booking::{Booking, BookingEvent, BookingStatus};
use crate::models::customer::Customer;
use crate::models::provider::Provider;
use crate::models::service::ServiceOffering;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/bookings",
            get(list_bookings)
                .post(create_booking)
                .patch(update_booking_status),
        )
        .route("/bookings/:id", get(get_booking))
}

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub customer_id: Uuid,
    pub provider_id: Uuid,
    pub service_id: Uuid,
    pub scheduled_for: DateTime<Utc>,
    pub total_amount: i64,
}

#[derive(Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub booking_id: Uuid,
    pub status: String,
}

#[derive(Deserialize)]
pub struct ListBookingsQuery {
    pub customer_id: Option<Uuid>,
    pub provider_id: Option<Uuid>,
}

/// A booking joined with the records it references. Listings populate the
/// counterparty and the service, never a copy of the caller's own record.
#[derive(Debug, Clone, Serialize)]
pub struct BookingDetails {
    pub booking: Booking,
    pub customer: Option<Customer>,
    pub provider: Option<Provider>,
    pub service: Option<ServiceOffering>,
}

async fn create_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let claims = state.auth.claims_from_headers(&headers)?;
    auth::authorize(&claims, &[Role::Customer])?;

    // All validation happens before the write; a failed request leaves no
    // partial record behind.
    let split = split::compute_split(payload.total_amount)?;

    if !state.customers.contains_key(&payload.customer_id) {
        return Err(AppError::NotFound(format!(
            "customer {} not found",
            payload.customer_id
        )));
    }

    if !state.providers.contains_key(&payload.provider_id) {
        return Err(AppError::NotFound(format!(
            "provider {} not found",
            payload.provider_id
        )));
    }

    if !state.services.contains_key(&payload.service_id) {
        return Err(AppError::NotFound(format!(
            "service {} not found",
            payload.service_id
        )));
    }

    let booking = Booking {
        id: Uuid::new_v4(),
        customer_id: payload.customer_id,
        provider_id: payload.provider_id,
        service_id: payload.service_id,
        scheduled_for: payload.scheduled_for,
        total_amount: payload.total_amount,
        platform_commission: split.platform_commission,
        provider_payout: split.provider_payout,
        status: BookingStatus::Pending,
        created_at: Utc::now(),
    };

    state.bookings.insert(booking.id, booking.clone());
    state.metrics.bookings_created_total.inc();
    let _ = state
        .booking_events_tx
        .send(BookingEvent::Created(booking.clone()));

    tracing::info!(
        booking_id = %booking.id,
        provider_id = %booking.provider_id,
        total_amount = booking.total_amount,
        "booking created"
    );

    Ok((StatusCode::CREATED, Json(booking)))
}

async fn get_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    let claims = state.auth.claims_from_headers(&headers)?;
    auth::authorize(&claims, &[Role::Customer, Role::Provider, Role::Admin])?;

    let booking = state
        .bookings
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("booking {} not found", id)))?;

    Ok(Json(booking.value().clone()))
}

async fn list_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<Vec<BookingDetails>>, AppError> {
    let claims = state.auth.claims_from_headers(&headers)?;

    let mut entries: Vec<BookingDetails> = match (query.customer_id, query.provider_id) {
        (Some(customer_id), None) => {
            auth::authorize(&claims, &[Role::Customer, Role::Admin])?;
            state
                .bookings
                .iter()
                .filter(|entry| entry.customer_id == customer_id)
                .map(|entry| enrich(&state, entry.value().clone(), Party::Provider))
                .collect()
        }
        (None, Some(provider_id)) => {
            auth::authorize(&claims, &[Role::Provider, Role::Admin])?;
            state
                .bookings
                .iter()
                .filter(|entry| entry.provider_id == provider_id)
                .map(|entry| enrich(&state, entry.value().clone(), Party::Customer))
                .collect()
        }
        _ => {
            return Err(AppError::BadRequest(
                "exactly one of customer_id or provider_id is required".to_string(),
            ));
        }
    };

    entries.sort_by(|a, b| b.booking.created_at.cmp(&a.booking.created_at));
    Ok(Json(entries))
}

enum Party {
    Customer,
    Provider,
}

fn enrich(state: &AppState, booking: Booking, counterparty: Party) -> BookingDetails {
    let service = state
        .services
        .get(&booking.service_id)
        .map(|entry| entry.value().clone());

    let (customer, provider) = match counterparty {
        Party::Customer => (
            state
                .customers
                .get(&booking.customer_id)
                .map(|entry| entry.value().clone()),
            None,
        ),
        Party::Provider => (
            None,
            state
                .providers
                .get(&booking.provider_id)
                .map(|entry| entry.value().clone()),
        ),
    };

    BookingDetails {
        booking,
        customer,
        provider,
        service,
    }
}

async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<UpdateBookingStatusRequest>,
) -> Result<Json<Booking>, AppError> {
    let claims = state.auth.claims_from_headers(&headers)?;
    auth::authorize(&claims, &[Role::Provider, Role::Admin])?;

    // Status validation precedes the lookup: a bad value never touches the
    // store, and an unknown id never creates a record.
    let requested = lifecycle::parse_requested_status(&payload.status)?;

    let updated = {
        let mut booking = state
            .bookings
            .get_mut(&payload.booking_id)
            .ok_or_else(|| {
                AppError::NotFound(format!("booking {} not found", payload.booking_id))
            })?;

        booking.status = lifecycle::apply_transition(booking.status, requested)?;
        booking.clone()
    };

    state
        .metrics
        .booking_transitions_total
        .with_label_values(&[&payload.status])
        .inc();
    let _ = state
        .booking_events_tx
        .send(BookingEvent::StatusChanged(updated.clone()));

    tracing::info!(
        booking_id = %updated.id,
        status = ?updated.status,
        "booking status updated"
    );

    Ok(Json(updated))
}
