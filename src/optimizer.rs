//! Waypoint optimizer.
//!
//! Orders a trip's stops through the provider. The first usable stop is the
//! origin, the last is the destination, and everything between is handed to
//! the provider as reorderable waypoints. The provider's order is taken as-is.

use tracing::{debug, warn};

use crate::distance::DistanceCalculator;
use crate::error::RoutingError;
use crate::format::{format_distance, format_duration};
use crate::geocode::GeocodingService;
use crate::model::{DistanceResult, OptimizedRoute, RouteLeg, Stop};
use crate::traits::{DirectionsProvider, Geocoder};

pub struct WaypointOptimizer<G, D> {
    geocoding: GeocodingService<G>,
    calculator: DistanceCalculator<D>,
}

impl<G: Geocoder, D: DirectionsProvider> WaypointOptimizer<G, D> {
    pub fn new(geocoding: GeocodingService<G>, calculator: DistanceCalculator<D>) -> Self {
        Self {
            geocoding,
            calculator,
        }
    }

    pub fn geocoding(&self) -> &GeocodingService<G> {
        &self.geocoding
    }

    pub fn calculator(&self) -> &DistanceCalculator<D> {
        &self.calculator
    }

    /// Fill in coordinates for stops that lack them.
    ///
    /// Stops that fail to geocode keep empty coordinates. Returns how many
    /// stops have coordinates afterwards.
    pub fn geocode_stops(&self, stops: &mut [Stop]) -> usize {
        for stop in stops.iter_mut().filter(|stop| stop.point().is_none()) {
            match self.geocoding.geocode(&stop.address) {
                Ok(found) => stop.set_point(found.point()),
                Err(err) => warn!(stop = %stop.name, address = %stop.address, error = %err, "stop left without coordinates"),
            }
        }
        stops.iter().filter(|stop| stop.point().is_some()).count()
    }

    /// Geocode what is missing, then order the stops.
    pub fn optimize_waypoints(&self, mut stops: Vec<Stop>) -> Result<OptimizedRoute, RoutingError> {
        self.geocode_stops(&mut stops);
        self.optimize_resolved(stops)
    }

    /// Order stops without geocoding; stops lacking coordinates are dropped.
    pub fn optimize_resolved(&self, stops: Vec<Stop>) -> Result<OptimizedRoute, RoutingError> {
        let (mut valid, excluded): (Vec<Stop>, Vec<Stop>) =
            stops.into_iter().partition(|stop| stop.point().is_some());

        for stop in &excluded {
            warn!(stop = %stop.name, address = %stop.address, "excluding stop without coordinates from route");
        }

        if valid.len() < 2 {
            debug!(stops = valid.len(), "nothing to route");
            return Ok(OptimizedRoute {
                optimized_stops: valid,
                excluded_stops: excluded,
                total_distance: 0,
                total_duration: 0,
                distance_text: format_distance(0),
                duration_text: format_duration(0),
                legs: Vec::new(),
            });
        }

        let (optimized_stops, result) = if valid.len() == 2 {
            let result = self.calculator.calculate_distance(&valid[0], &valid[1], &[])?;
            (valid, result)
        } else {
            let destination = valid.pop().ok_or(RoutingError::EmptyRoute)?;
            let origin = valid.remove(0);
            let waypoints = valid;

            let result = self
                .calculator
                .calculate_distance(&origin, &destination, &waypoints)?;
            let order = waypoint_order(&result, waypoints.len())?;

            let mut slots: Vec<Option<Stop>> = waypoints.into_iter().map(Some).collect();
            let mut ordered = Vec::with_capacity(slots.len() + 2);
            ordered.push(origin);
            ordered.extend(order.iter().filter_map(|&index| slots[index].take()));
            ordered.push(destination);
            (ordered, result)
        };

        let hops = optimized_stops.len() - 1;
        if result.legs.len() != hops {
            return Err(RoutingError::LegCountMismatch {
                expected: hops,
                actual: result.legs.len(),
            });
        }

        let legs = optimized_stops
            .windows(2)
            .zip(&result.legs)
            .map(|(pair, leg)| RouteLeg {
                from: pair[0].name.clone(),
                to: pair[1].name.clone(),
                distance_meters: leg.distance_meters,
                duration_seconds: leg.duration_seconds,
                distance_text: leg.distance_text.clone(),
                duration_text: leg.duration_text.clone(),
            })
            .collect();

        Ok(OptimizedRoute {
            optimized_stops,
            excluded_stops: excluded,
            total_distance: result.distance,
            total_duration: result.duration,
            distance_text: result.distance_text,
            duration_text: result.duration_text,
            legs,
        })
    }
}

/// The provider's waypoint permutation, checked against the waypoint count.
///
/// An absent order means the provider kept the input order.
fn waypoint_order(result: &DistanceResult, expected: usize) -> Result<Vec<usize>, RoutingError> {
    let order = match result.optimized_waypoint_order.as_deref() {
        None | Some([]) => return Ok((0..expected).collect()),
        Some(order) => order,
    };

    let mut seen = vec![false; expected];
    let is_permutation = order.len() == expected
        && order.iter().all(|&index| {
            index < expected && !std::mem::replace(&mut seen[index], true)
        });

    if is_permutation {
        Ok(order.to_vec())
    } else {
        Err(RoutingError::InvalidWaypointOrder {
            expected,
            order: order.to_vec(),
        })
    }
}
