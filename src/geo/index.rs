use dashmap::DashMap;
use uuid::Uuid;

use crate::geo::{haversine_m, GeoPoint};

/// Cell edge in degrees of latitude (~5.5 km); one radius rarely spans more
/// than a 3x3 neighborhood.
const CELL_DEG: f64 = 0.05;

const METERS_PER_DEG_LAT: f64 = 111_320.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CellKey {
    lat: i32,
    lng: i32,
}

fn cell_of(point: &GeoPoint) -> CellKey {
    CellKey {
        lat: (point.lat / CELL_DEG).floor() as i32,
        lng: (point.lng / CELL_DEG).floor() as i32,
    }
}

/// Grid-bucketed spatial index over provider positions. A radius query scans
/// only the cell ranges covering the radius at the query latitude, then
/// exact-filters by great-circle distance, so lookups stay proportional to
/// the local provider density rather than the total population.
pub struct GeoIndex {
    cells: DashMap<CellKey, Vec<Uuid>>,
    positions: DashMap<Uuid, GeoPoint>,
}

impl GeoIndex {
    pub fn new() -> Self {
        Self {
            cells: DashMap::new(),
            positions: DashMap::new(),
        }
    }

    /// Insert or relocate an entry. Relocation within the same cell leaves
    /// the bucket membership untouched.
    pub fn upsert(&self, id: Uuid, point: GeoPoint) {
        let new_cell = cell_of(&point);

        if let Some(previous) = self.positions.insert(id, point) {
            let old_cell = cell_of(&previous);
            if old_cell == new_cell {
                return;
            }
            if let Some(mut bucket) = self.cells.get_mut(&old_cell) {
                bucket.retain(|existing| *existing != id);
            }
        }

        self.cells.entry(new_cell).or_default().push(id);
    }

    /// All entries within `radius_m` of `center`, with their exact distance
    /// in meters. Unordered; callers sort as needed.
    pub fn within_radius(&self, center: &GeoPoint, radius_m: f64) -> Vec<(Uuid, f64)> {
        let lat_span_deg = radius_m / METERS_PER_DEG_LAT;
        // Longitude degrees shrink toward the poles; widen the scan window
        // accordingly. The cos floor keeps the window finite at the poles.
        let meters_per_deg_lng = METERS_PER_DEG_LAT * center.lat.to_radians().cos().max(0.01);
        let lng_span_deg = radius_m / meters_per_deg_lng;

        let lat_cells = (lat_span_deg / CELL_DEG).ceil() as i32;
        let lng_cells = (lng_span_deg / CELL_DEG).ceil() as i32;
        let origin = cell_of(center);

        let mut hits = Vec::new();
        for lat_cell in (origin.lat - lat_cells)..=(origin.lat + lat_cells) {
            for lng_cell in (origin.lng - lng_cells)..=(origin.lng + lng_cells) {
                let key = CellKey {
                    lat: lat_cell,
                    lng: lng_cell,
                };
                let Some(bucket) = self.cells.get(&key) else {
                    continue;
                };

                for id in bucket.iter() {
                    if let Some(position) = self.positions.get(id) {
                        let distance_m = haversine_m(center, position.value());
                        if distance_m <= radius_m {
                            hits.push((*id, distance_m));
                        }
                    }
                }
            }
        }

        hits
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::GeoIndex;
    use crate::geo::GeoPoint;

    fn point(lng: f64, lat: f64) -> GeoPoint {
        GeoPoint { lng, lat }
    }

    #[test]
    fn finds_entries_within_radius_and_excludes_beyond() {
        let index = GeoIndex::new();
        let near = Uuid::from_u128(1);
        let far = Uuid::from_u128(2);

        // ~1 km and ~9 km north of the query point.
        index.upsert(near, point(67.0, 24.809));
        index.upsert(far, point(67.0, 24.881));

        let hits = index.within_radius(&point(67.0, 24.8), 5_000.0);
        let ids: Vec<Uuid> = hits.iter().map(|(id, _)| *id).collect();

        assert!(ids.contains(&near));
        assert!(!ids.contains(&far));
    }

    #[test]
    fn finds_entries_across_cell_boundaries() {
        let index = GeoIndex::new();
        let neighbor = Uuid::from_u128(3);

        // 24.7999 and 24.8001 land in different 0.05-degree cells but are
        // only ~22 m apart.
        index.upsert(neighbor, point(67.0, 24.8001));

        let hits = index.within_radius(&point(67.0, 24.7999), 5_000.0);
        assert_eq!(hits.len(), 1);
        assert!(hits[0].1 < 100.0);
    }

    #[test]
    fn upsert_relocates_an_entry() {
        let index = GeoIndex::new();
        let id = Uuid::from_u128(4);

        index.upsert(id, point(67.0, 24.8));
        index.upsert(id, point(67.0, 25.8));

        let near_old = index.within_radius(&point(67.0, 24.8), 5_000.0);
        assert!(near_old.is_empty());

        let near_new = index.within_radius(&point(67.0, 25.8), 5_000.0);
        assert_eq!(near_new.len(), 1);
        assert_eq!(near_new[0].0, id);
    }

    #[test]
    fn reports_exact_distance() {
        let index = GeoIndex::new();
        let id = Uuid::from_u128(5);

        // ~100 m north of the query point.
        index.upsert(id, point(67.0, 24.8009));

        let hits = index.within_radius(&point(67.0, 24.8), 5_000.0);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].1 - 100.0).abs() < 5.0);
    }
}
