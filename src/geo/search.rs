use serde::Serialize;

use crate::error::AppError;
use crate::geo::{validate_point, GeoPoint, SEARCH_RADIUS_M};
use crate::models::provider::Provider;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct ProviderHit {
    pub provider: Provider,
    pub distance_m: f64,
}

/// Verified providers within [`SEARCH_RADIUS_M`] of the query point,
/// nearest first. Absent coordinates arrive as zeros and are rejected
/// before the index is touched. An empty result is not an error.
pub fn find_nearby_providers(
    state: &AppState,
    lng: Option<f64>,
    lat: Option<f64>,
) -> Result<Vec<ProviderHit>, AppError> {
    let center = GeoPoint {
        lng: lng.unwrap_or(0.0),
        lat: lat.unwrap_or(0.0),
    };
    validate_point(&center)?;

    let mut hits: Vec<ProviderHit> = state
        .geo_index
        .within_radius(&center, SEARCH_RADIUS_M)
        .into_iter()
        .filter_map(|(id, distance_m)| {
            let provider = state.providers.get(&id)?;
            if !provider.is_verified {
                return None;
            }
            Some(ProviderHit {
                provider: provider.clone(),
                distance_m,
            })
        })
        .collect();

    hits.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
    Ok(hits)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::find_nearby_providers;
    use crate::geo::GeoPoint;
    use crate::models::provider::Provider;
    use crate::state::AppState;

    fn state_with(providers: Vec<Provider>) -> AppState {
        let state = AppState::new(16, "test-secret");
        for provider in providers {
            state.geo_index.upsert(provider.id, provider.location);
            state.providers.insert(provider.id, provider);
        }
        state
    }

    fn provider(id_seed: u128, lng: f64, lat: f64, verified: bool) -> Provider {
        Provider {
            id: Uuid::from_u128(id_seed),
            name: format!("provider-{id_seed}"),
            service_type: "plumbing".to_string(),
            bio: None,
            hourly_rate: 2_500,
            is_verified: verified,
            location: GeoPoint { lng, lat },
            created_at: Utc::now(),
        }
    }

    #[test]
    fn missing_or_zero_coordinates_are_rejected() {
        let state = state_with(vec![]);

        assert!(find_nearby_providers(&state, None, Some(24.8)).is_err());
        assert!(find_nearby_providers(&state, Some(67.0), None).is_err());
        assert!(find_nearby_providers(&state, Some(0.0), Some(24.8)).is_err());
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let state = state_with(vec![]);
        let hits = find_nearby_providers(&state, Some(67.0), Some(24.8)).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn unverified_providers_are_never_returned() {
        // ~100 m away but unverified.
        let state = state_with(vec![provider(1, 67.0, 24.8009, false)]);
        let hits = find_nearby_providers(&state, Some(67.0), Some(24.8)).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn results_are_sorted_nearest_first_with_radius_cutoff() {
        let state = state_with(vec![
            // ~4000 m, ~100 m, ~6000 m north of the query point.
            provider(1, 67.0, 24.836, true),
            provider(2, 67.0, 24.8009, true),
            provider(3, 67.0, 24.854, true),
        ]);

        let hits = find_nearby_providers(&state, Some(67.0), Some(24.8)).unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].provider.id, Uuid::from_u128(2));
        assert_eq!(hits[1].provider.id, Uuid::from_u128(1));
        assert!(hits[0].distance_m <= hits[1].distance_m);
        assert!(hits.iter().all(|hit| hit.distance_m <= 5_000.0));
    }
}
