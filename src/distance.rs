//! Route distance calculator.

use tracing::{debug, warn};

use crate::error::RoutingError;
use crate::format::{format_distance, format_duration};
use crate::model::{DistanceResult, LegSummary, Point, Stop};
use crate::traits::{DirectionsProvider, DirectionsRequest};

/// Aggregates a provider route into totals.
pub struct DistanceCalculator<D> {
    directions: D,
}

impl<D: DirectionsProvider> DistanceCalculator<D> {
    pub fn new(directions: D) -> Self {
        Self { directions }
    }

    pub fn directions(&self) -> &D {
        &self.directions
    }

    /// Distance from `origin` to `destination` through `waypoints`.
    ///
    /// Waypoints are sent with the optimize hint; the provider's order comes
    /// back in [`DistanceResult::optimized_waypoint_order`].
    pub fn calculate_distance(
        &self,
        origin: &Stop,
        destination: &Stop,
        waypoints: &[Stop],
    ) -> Result<DistanceResult, RoutingError> {
        let request = DirectionsRequest {
            origin: coordinates(origin)?,
            destination: coordinates(destination)?,
            waypoints: waypoints
                .iter()
                .map(coordinates)
                .collect::<Result<Vec<_>, _>>()?,
            optimize: !waypoints.is_empty(),
        };

        debug!(
            origin = %origin.name,
            destination = %destination.name,
            waypoints = waypoints.len(),
            "requesting directions"
        );
        let route = self.directions.directions(&request).map_err(|err| {
            warn!(error = %err, "directions request failed");
            RoutingError::from(err)
        })?;

        if route.legs.is_empty() {
            return Err(RoutingError::EmptyRoute);
        }

        let distance: u64 = route.legs.iter().map(|leg| leg.distance_meters).sum();
        let duration: u64 = route.legs.iter().map(|leg| leg.duration_seconds).sum();
        let legs = route
            .legs
            .into_iter()
            .map(|leg| LegSummary {
                distance_meters: leg.distance_meters,
                duration_seconds: leg.duration_seconds,
                distance_text: leg.distance_text,
                duration_text: leg.duration_text,
            })
            .collect();

        Ok(DistanceResult {
            distance,
            duration,
            distance_text: format_distance(distance),
            duration_text: format_duration(duration),
            optimized_waypoint_order: request.optimize.then_some(route.waypoint_order),
            legs,
        })
    }
}

fn coordinates(stop: &Stop) -> Result<Point, RoutingError> {
    stop.point().ok_or_else(|| RoutingError::MissingCoordinates {
        stop: stop.name.clone(),
    })
}
