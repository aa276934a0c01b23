use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::Json;
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::service::ServiceOffering;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/services", post(create_service).get(list_services))
}

#[derive(Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    pub description: Option<String>,
    pub base_rate: i64,
}

async fn create_service(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateServiceRequest>,
) -> Result<Json<ServiceOffering>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }

    if payload.base_rate < 0 {
        return Err(AppError::BadRequest("base_rate must be >= 0".to_string()));
    }

    let service = ServiceOffering {
        id: Uuid::new_v4(),
        name: payload.name,
        description: payload.description,
        base_rate: payload.base_rate,
    };

    state.services.insert(service.id, service.clone());

    tracing::info!(service_id = %service.id, "service created");
    Ok(Json(service))
}

async fn list_services(State(state): State<Arc<AppState>>) -> Json<Vec<ServiceOffering>> {
    let services = state
        .services
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    Json(services)
}
