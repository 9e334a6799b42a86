//! Test fixtures for trip-planner.
//!
//! Provides:
//! - Real Henderson pickup addresses with coordinates
//! - Scripted geocoder and recording directions providers
//! - In-memory roster, profile and vehicle sources

#![allow(dead_code)]

pub mod pickup_addresses;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use trip_planner::config::PlannerOptions;
use trip_planner::error::{ProviderError, SourceError};
use trip_planner::haversine::HaversineDirections;
use trip_planner::model::{GeocodeResult, RouteProfile, Student, Vehicle};
use trip_planner::planner::{DataSources, TripPlanner};
use trip_planner::traits::{
    DirectionsProvider, DirectionsRequest, DirectionsRoute, Geocoder, RosterProvider,
    RouteProfileStore, VehicleInventory,
};

pub use pickup_addresses::*;

// ============================================================================
// Mapping providers
// ============================================================================

/// Geocoder backed by a fixed address table. Unknown addresses get `ZERO_RESULTS`.
#[derive(Default)]
pub struct ScriptedGeocoder {
    known: HashMap<String, GeocodeResult>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedGeocoder {
    pub fn with_addresses(addresses: &[PickupAddress]) -> Self {
        let known = addresses
            .iter()
            .map(|pickup| {
                (
                    pickup.address.to_string(),
                    GeocodeResult {
                        lat: pickup.lat,
                        lng: pickup.lng,
                        formatted_address: format!("{}, USA", pickup.address),
                    },
                )
            })
            .collect();

        Self {
            known,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Geocoder for ScriptedGeocoder {
    fn geocode(&self, address: &str) -> Result<Vec<GeocodeResult>, ProviderError> {
        self.calls.lock().unwrap().push(address.to_string());
        self.known
            .get(address)
            .cloned()
            .map(|found| vec![found])
            .ok_or_else(|| ProviderError::status("ZERO_RESULTS"))
    }
}

/// Haversine directions that record every request and can be told to fail.
#[derive(Default)]
pub struct RecordingDirections {
    inner: HaversineDirections,
    failing_status: Option<String>,
    requests: Mutex<Vec<DirectionsRequest>>,
}

impl RecordingDirections {
    pub fn failing(status: &str) -> Self {
        Self {
            failing_status: Some(status.to_string()),
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<DirectionsRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn optimize_requests(&self) -> usize {
        self.requests().iter().filter(|request| request.optimize).count()
    }
}

impl DirectionsProvider for RecordingDirections {
    fn directions(&self, request: &DirectionsRequest) -> Result<DirectionsRoute, ProviderError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.failing_status {
            Some(status) => Err(ProviderError::status(status.clone())),
            None => self.inner.directions(request),
        }
    }
}

// ============================================================================
// School data sources
// ============================================================================

pub struct InMemoryProfiles(pub Vec<RouteProfile>);

impl RouteProfileStore for InMemoryProfiles {
    fn route_profile(&self, profile_id: &str) -> Result<Option<RouteProfile>, SourceError> {
        Ok(self.0.iter().find(|profile| profile.id == profile_id).cloned())
    }
}

pub struct InMemoryRoster(pub Vec<Student>);

impl RosterProvider for InMemoryRoster {
    fn enrolled_students(&self, _school_id: &str) -> Result<Vec<Student>, SourceError> {
        Ok(self.0.clone())
    }
}

pub struct InMemoryVehicles(pub Vec<Vehicle>);

impl VehicleInventory for InMemoryVehicles {
    fn active_vehicles(&self, _school_id: &str) -> Result<Vec<Vehicle>, SourceError> {
        Ok(self.0.clone())
    }
}

/// A source that always fails with the given message.
pub struct Unavailable(pub &'static str);

impl RosterProvider for Unavailable {
    fn enrolled_students(&self, _school_id: &str) -> Result<Vec<Student>, SourceError> {
        Err(self.0.into())
    }
}

impl VehicleInventory for Unavailable {
    fn active_vehicles(&self, _school_id: &str) -> Result<Vec<Vehicle>, SourceError> {
        Err(self.0.into())
    }
}

impl RouteProfileStore for Unavailable {
    fn route_profile(&self, _profile_id: &str) -> Result<Option<RouteProfile>, SourceError> {
        Err(self.0.into())
    }
}

// ============================================================================
// Builders
// ============================================================================

pub fn student(id: &str, year_group: &str, address: Option<&str>) -> Student {
    let student = Student::new(id).with_year_group(year_group);
    match address {
        Some(address) => student.with_address(address),
        None => student,
    }
}

pub fn vehicle(id: &str, capacity: u32, active: bool) -> Vehicle {
    Vehicle {
        id: id.to_string(),
        registration: format!("NV-{id}"),
        capacity,
        active,
    }
}

pub fn fleet() -> Vec<Vehicle> {
    vec![
        vehicle("bus-1", 40, true),
        vehicle("bus-2", 40, true),
        vehicle("van-1", 12, false),
    ]
}

/// Shared handles so a test can inspect provider calls after the planner owns them.
pub type SharedGeocoder = Arc<ScriptedGeocoder>;
pub type SharedDirections = Arc<RecordingDirections>;

pub struct Harness {
    pub geocoder: SharedGeocoder,
    pub directions: SharedDirections,
    pub planner: TripPlanner<SharedGeocoder, SharedDirections>,
}

impl Harness {
    pub fn new(
        profiles: Vec<RouteProfile>,
        roster: Vec<Student>,
        directions: RecordingDirections,
        options: PlannerOptions,
    ) -> Self {
        Self::with_sources(
            DataSources::new(
                InMemoryProfiles(profiles),
                InMemoryRoster(roster),
                InMemoryVehicles(fleet()),
            ),
            directions,
            options,
        )
    }

    pub fn with_sources(
        sources: DataSources,
        directions: RecordingDirections,
        options: PlannerOptions,
    ) -> Self {
        let geocoder = Arc::new(ScriptedGeocoder::with_addresses(&all_addresses()));
        let directions = Arc::new(directions);
        let planner = TripPlanner::new(
            Arc::clone(&geocoder),
            Arc::clone(&directions),
            sources,
            options,
        );

        Self {
            geocoder,
            directions,
            planner,
        }
    }
}
