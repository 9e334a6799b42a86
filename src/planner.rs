//! Trip generation.
//!
//! A run fetches the route profile and the school's roster, partitions the
//! eligible students into vehicle-sized groups and routes each group:
//!
//! ```text
//! FETCH_PROFILE -> FETCH_ROSTER -> FILTER_ELIGIBLE -> PARTITION
//!   -> per group: BUILD_STOPS -> GEOCODE_EACH -> ROUTE_OR_OPTIMIZE -> EMIT_SUGGESTION
//!   -> AGGREGATE_RESULT
//! ```
//!
//! Profile and roster failures abort the run. Geocoding and routing failures
//! only degrade the affected suggestion to `"N/A"`.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::PlannerOptions;
use crate::distance::DistanceCalculator;
use crate::error::PlanError;
use crate::geocode::GeocodingService;
use crate::model::{trip_name, RoutingStatus, Stop, StudentGroup, TripSuggestion, NOT_AVAILABLE};
use crate::optimizer::WaypointOptimizer;
use crate::partition::partition;
use crate::traits::{DirectionsProvider, Geocoder, RosterProvider, RouteProfileStore, VehicleInventory};

/// The school data the planner reads from.
pub struct DataSources {
    pub profiles: Box<dyn RouteProfileStore>,
    pub roster: Box<dyn RosterProvider>,
    pub vehicles: Box<dyn VehicleInventory>,
}

impl DataSources {
    pub fn new(
        profiles: impl RouteProfileStore + 'static,
        roster: impl RosterProvider + 'static,
        vehicles: impl VehicleInventory + 'static,
    ) -> Self {
        Self {
            profiles: Box::new(profiles),
            roster: Box::new(roster),
            vehicles: Box::new(vehicles),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    pub profile_id: String,
    pub school_id: String,
    #[serde(default)]
    pub vehicle_capacity: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripResponse {
    pub profile_id: String,
    pub profile_name: String,
    pub total_students: usize,
    pub available_vehicles: usize,
    pub vehicle_capacity: u32,
    pub trip_suggestions: Vec<TripSuggestion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip)]
    pub status: u16,
}

impl From<PlanError> for ErrorResponse {
    fn from(err: PlanError) -> Self {
        Self {
            error: err.to_string(),
            status: err.status_code(),
        }
    }
}

pub struct TripPlanner<G, D> {
    optimizer: WaypointOptimizer<G, D>,
    sources: DataSources,
    options: PlannerOptions,
}

impl<G: Geocoder, D: DirectionsProvider> TripPlanner<G, D> {
    pub fn new(geocoder: G, directions: D, sources: DataSources, options: PlannerOptions) -> Self {
        let geocoding = if options.cache_geocodes {
            GeocodingService::new(geocoder)
        } else {
            GeocodingService::without_cache(geocoder)
        };

        Self {
            optimizer: WaypointOptimizer::new(geocoding, DistanceCalculator::new(directions)),
            sources,
            options,
        }
    }

    pub fn optimizer(&self) -> &WaypointOptimizer<G, D> {
        &self.optimizer
    }

    pub fn options(&self) -> &PlannerOptions {
        &self.options
    }

    /// Request/response entry point; errors come back as an error payload.
    pub fn handle(&self, request: &TripRequest) -> Result<TripResponse, ErrorResponse> {
        let capacity = request
            .vehicle_capacity
            .unwrap_or(self.options.default_vehicle_capacity);
        self.generate_trips(&request.profile_id, &request.school_id, capacity)
            .map_err(ErrorResponse::from)
    }

    pub fn generate_trips(
        &self,
        profile_id: &str,
        school_id: &str,
        vehicle_capacity: u32,
    ) -> Result<TripResponse, PlanError> {
        if vehicle_capacity == 0 {
            return Err(PlanError::InvalidCapacity(vehicle_capacity));
        }

        info!(profile_id, school_id, vehicle_capacity, "generating trips");

        let profile = self
            .sources
            .profiles
            .route_profile(profile_id)
            .map_err(PlanError::ProfileLookup)?
            .ok_or_else(|| PlanError::ProfileNotFound(profile_id.to_string()))?;

        let students = self
            .sources
            .roster
            .enrolled_students(school_id)
            .map_err(PlanError::RosterUnavailable)?;

        let available_vehicles = match self.sources.vehicles.active_vehicles(school_id) {
            Ok(vehicles) => vehicles.iter().filter(|vehicle| vehicle.active).count(),
            Err(err) => {
                warn!(school_id, error = %err, "vehicle inventory unavailable");
                0
            }
        };

        let groups = partition(&students, &profile, vehicle_capacity as usize);
        let total_students = groups.iter().map(|group| group.members.len()).sum();
        debug!(
            roster = students.len(),
            eligible = total_students,
            groups = groups.len(),
            "partitioned roster"
        );

        let trip_suggestions = self.suggest_all(&profile.profile_name, &groups);

        if trip_suggestions.len() > available_vehicles {
            warn!(
                trips = trip_suggestions.len(),
                available_vehicles, "more trips than active vehicles"
            );
        }
        info!(
            profile_id,
            total_students,
            trips = trip_suggestions.len(),
            "trip generation finished"
        );

        Ok(TripResponse {
            profile_id: profile.id,
            profile_name: profile.profile_name,
            total_students,
            available_vehicles,
            vehicle_capacity,
            trip_suggestions,
        })
    }

    /// Suggestions in partition order, routed on up to `workers` threads.
    fn suggest_all(&self, profile_name: &str, groups: &[StudentGroup]) -> Vec<TripSuggestion> {
        if self.options.workers > 1 && groups.len() > 1 {
            match rayon::ThreadPoolBuilder::new()
                .num_threads(self.options.workers)
                .build()
            {
                Ok(pool) => {
                    return pool.install(|| {
                        groups
                            .par_iter()
                            .enumerate()
                            .map(|(index, group)| self.suggest(profile_name, index + 1, group))
                            .collect()
                    });
                }
                Err(err) => warn!(error = %err, "worker pool unavailable, routing sequentially"),
            }
        }

        groups
            .iter()
            .enumerate()
            .map(|(index, group)| self.suggest(profile_name, index + 1, group))
            .collect()
    }

    fn suggest(&self, profile_name: &str, trip_number: usize, group: &StudentGroup) -> TripSuggestion {
        let pickup_addresses: Vec<String> = group
            .routable_addresses()
            .map(|(address, _)| address.to_string())
            .collect();
        let mut stops: Vec<Stop> = group
            .routable_addresses()
            .enumerate()
            .map(|(index, (address, count))| {
                Stop::new(format!("Stop {}", index + 1), address).with_students(count)
            })
            .collect();

        let mut suggestion = TripSuggestion {
            trip_number,
            trip_name: trip_name(profile_name, trip_number),
            student_count: group.members.len(),
            stops: stops.len(),
            students: group.members.iter().map(|student| student.id.clone()).collect(),
            estimated_distance: NOT_AVAILABLE.to_string(),
            estimated_duration: NOT_AVAILABLE.to_string(),
            pickup_addresses,
            routing_status: RoutingStatus::Skipped,
            stop_order: Vec::new(),
        };

        if stops.len() < 2 {
            debug!(trip_number, stops = stops.len(), "single-stop trip, not routed");
            return suggestion;
        }

        let resolved = self.optimizer.geocode_stops(&mut stops);
        if resolved < 2 {
            warn!(trip_number, resolved, "too few geocoded stops to route trip");
            suggestion.routing_status = RoutingStatus::Failed;
            return suggestion;
        }

        match self.optimizer.optimize_resolved(stops) {
            Ok(route) => {
                suggestion.estimated_distance = route.distance_text;
                suggestion.estimated_duration = route.duration_text;
                suggestion.stop_order = route
                    .optimized_stops
                    .into_iter()
                    .map(|stop| stop.address)
                    .collect();
                suggestion.routing_status = RoutingStatus::Ok;
            }
            Err(err) => {
                warn!(trip_number, error = %err, "routing failed for trip");
                suggestion.routing_status = RoutingStatus::Failed;
            }
        }

        suggestion
    }
}
