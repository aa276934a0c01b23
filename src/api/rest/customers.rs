use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::geo::{validate_point, GeoPoint};
use crate::models::customer::Customer;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/customers", post(register_customer))
        .route("/customers/:id", get(get_customer))
}

#[derive(Deserialize)]
pub struct RegisterCustomerRequest {
    pub name: String,
    pub address: Option<String>,
    pub location: GeoPoint,
}

async fn register_customer(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterCustomerRequest>,
) -> Result<Json<Customer>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }

    validate_point(&payload.location)?;

    let customer = Customer {
        id: Uuid::new_v4(),
        name: payload.name,
        address: payload.address,
        location: payload.location,
        created_at: Utc::now(),
    };

    state.customers.insert(customer.id, customer.clone());

    tracing::info!(customer_id = %customer.id, "customer registered");
    Ok(Json(customer))
}

async fn get_customer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Customer>, AppError> {
    let customer = state
        .customers
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("customer {} not found", id)))?;

    Ok(Json(customer.value().clone()))
}
