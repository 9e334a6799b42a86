//! Haversine directions provider (fallback when no mapping API is available).
//!
//! Uses great-circle distance to estimate driving legs.
//! Less accurate than a real router (ignores roads) but always available.

use crate::error::ProviderError;
use crate::format::{format_distance, format_duration};
use crate::model::Point;
use crate::traits::{DirectionsProvider, DirectionsRequest, DirectionsRoute, ProviderLeg};

/// Average driving speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Straight-line directions.
///
/// Optimization orders the waypoints greedily, always visiting the nearest
/// unvisited waypoint next.
#[derive(Debug, Clone)]
pub struct HaversineDirections {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for HaversineDirections {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl HaversineDirections {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    /// Calculate haversine distance between two points in kilometers.
    fn haversine_km(from: Point, to: Point) -> f64 {
        let lat1_rad = from.latitude.to_radians();
        let lat2_rad = to.latitude.to_radians();
        let delta_lat = (to.latitude - from.latitude).to_radians();
        let delta_lng = (to.longitude - from.longitude).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }

    /// Convert distance in km to travel time in seconds.
    fn km_to_seconds(&self, km: f64) -> u64 {
        let hours = km / self.speed_kmh;
        (hours * 3600.0).round() as u64
    }

    fn leg(&self, from: Point, to: Point) -> ProviderLeg {
        let km = Self::haversine_km(from, to);
        let distance_meters = (km * 1000.0).round() as u64;
        let duration_seconds = self.km_to_seconds(km);
        ProviderLeg {
            distance_meters,
            distance_text: format_distance(distance_meters),
            duration_seconds,
            duration_text: format_duration(duration_seconds),
        }
    }

    fn nearest_neighbour_order(origin: Point, waypoints: &[Point]) -> Vec<usize> {
        let mut remaining: Vec<usize> = (0..waypoints.len()).collect();
        let mut order = Vec::with_capacity(waypoints.len());
        let mut current = origin;

        while !remaining.is_empty() {
            let mut best = 0;
            let mut best_km = f64::INFINITY;
            for (slot, &index) in remaining.iter().enumerate() {
                let km = Self::haversine_km(current, waypoints[index]);
                if km < best_km {
                    best = slot;
                    best_km = km;
                }
            }
            let next = remaining.remove(best);
            current = waypoints[next];
            order.push(next);
        }

        order
    }
}

impl DirectionsProvider for HaversineDirections {
    fn directions(&self, request: &DirectionsRequest) -> Result<DirectionsRoute, ProviderError> {
        let waypoint_order = if request.optimize {
            Self::nearest_neighbour_order(request.origin, &request.waypoints)
        } else {
            Vec::new()
        };

        let visiting: Vec<Point> = if request.optimize {
            waypoint_order.iter().map(|&index| request.waypoints[index]).collect()
        } else {
            request.waypoints.clone()
        };

        let path: Vec<Point> = std::iter::once(request.origin)
            .chain(visiting)
            .chain(std::iter::once(request.destination))
            .collect();

        let legs = path.windows(2).map(|pair| self.leg(pair[0], pair[1])).collect();

        Ok(DirectionsRoute {
            legs,
            waypoint_order,
        })
    }
}
