use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::routing::{get, patch, post};
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{self, Role};
use crate::error::AppError;
use crate::geo::search::{find_nearby_providers, ProviderHit};
use crate::geo::{validate_point, GeoPoint};
use crate::models::provider::Provider;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/providers", post(register_provider).get(list_providers))
        .route("/providers/search", get(search_providers))
        .route("/providers/:id/location", patch(update_provider_location))
        .route("/providers/:id/verify", patch(verify_provider))
}

#[derive(Deserialize)]
pub struct RegisterProviderRequest {
    pub name: String,
    pub service_type: String,
    pub bio: Option<String>,
    pub hourly_rate: i64,
    pub location: GeoPoint,
}

#[derive(Deserialize)]
pub struct UpdateLocationRequest {
    pub location: GeoPoint,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

async fn register_provider(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterProviderRequest>,
) -> Result<Json<Provider>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }

    if payload.service_type.trim().is_empty() {
        return Err(AppError::BadRequest(
            "service_type cannot be empty".to_string(),
        ));
    }

    if payload.hourly_rate < 0 {
        return Err(AppError::BadRequest(
            "hourly_rate must be >= 0".to_string(),
        ));
    }

    validate_point(&payload.location)?;

    let provider = Provider {
        id: Uuid::new_v4(),
        name: payload.name,
        service_type: payload.service_type,
        bio: payload.bio,
        hourly_rate: payload.hourly_rate,
        is_verified: false,
        location: payload.location,
        created_at: Utc::now(),
    };

    state.geo_index.upsert(provider.id, provider.location);
    state.providers.insert(provider.id, provider.clone());

    tracing::info!(provider_id = %provider.id, service_type = %provider.service_type, "provider registered");
    Ok(Json(provider))
}

async fn list_providers(State(state): State<Arc<AppState>>) -> Json<Vec<Provider>> {
    let providers = state
        .providers
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    Json(providers)
}

async fn search_providers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<ProviderHit>>, AppError> {
    let start = Instant::now();
    let result = find_nearby_providers(&state, query.lng, query.lat);

    let outcome = if result.is_ok() { "success" } else { "error" };
    state
        .metrics
        .search_latency_seconds
        .with_label_values(&[outcome])
        .observe(start.elapsed().as_secs_f64());
    state
        .metrics
        .provider_searches_total
        .with_label_values(&[outcome])
        .inc();

    result.map(Json)
}

async fn update_provider_location(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLocationRequest>,
) -> Result<Json<Provider>, AppError> {
    let claims = state.auth.claims_from_headers(&headers)?;
    auth::authorize(&claims, &[Role::Provider, Role::Admin])?;

    validate_point(&payload.location)?;

    let updated = {
        let mut provider = state
            .providers
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("provider {} not found", id)))?;

        provider.location = payload.location;
        provider.clone()
    };

    state.geo_index.upsert(updated.id, updated.location);

    tracing::info!(provider_id = %updated.id, "provider relocated");
    Ok(Json(updated))
}

/// Stand-in for the external verification process; only admins may flip
/// the flag.
async fn verify_provider(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Provider>, AppError> {
    let claims = state.auth.claims_from_headers(&headers)?;
    auth::authorize(&claims, &[Role::Admin])?;

    let updated = {
        let mut provider = state
            .providers
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("provider {} not found", id)))?;

        if !provider.is_verified {
            provider.is_verified = true;
            state.metrics.verified_providers.inc();
        }
        provider.clone()
    };

    tracing::info!(provider_id = %updated.id, "provider verified");
    Ok(Json(updated))
}
