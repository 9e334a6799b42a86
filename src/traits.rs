//! Seams between the planner and the outside world.
//!
//! The mapping provider and the school's data sources are external. Concrete
//! apps implement these traits for their own backends; the planner only needs
//! the narrow contract described here.

use std::sync::Arc;

use crate::error::{ProviderError, SourceError};
use crate::model::{GeocodeResult, Point, RouteProfile, Student, Vehicle};

/// Resolves free-text addresses to coordinates.
pub trait Geocoder: Send + Sync {
    /// Candidates in provider order. A non-success provider status is
    /// reported as [`ProviderError::Status`].
    fn geocode(&self, address: &str) -> Result<Vec<GeocodeResult>, ProviderError>;
}

/// Computes driving directions through an ordered list of points.
pub trait DirectionsProvider: Send + Sync {
    fn directions(&self, request: &DirectionsRequest) -> Result<DirectionsRoute, ProviderError>;
}

/// Input to a directions call.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsRequest {
    pub origin: Point,
    pub destination: Point,
    pub waypoints: Vec<Point>,
    /// Ask the provider to reorder `waypoints`.
    pub optimize: bool,
}

/// A single route returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DirectionsRoute {
    /// One leg per consecutive pair of points, in travel order.
    pub legs: Vec<ProviderLeg>,
    /// Permutation of waypoint indices; empty unless optimization was requested.
    pub waypoint_order: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderLeg {
    pub distance_meters: u64,
    pub distance_text: String,
    pub duration_seconds: u64,
    pub duration_text: String,
}

/// Looks up route profiles by id.
pub trait RouteProfileStore: Send + Sync {
    fn route_profile(&self, profile_id: &str) -> Result<Option<RouteProfile>, SourceError>;
}

/// Supplies a school's enrolled students.
pub trait RosterProvider: Send + Sync {
    fn enrolled_students(&self, school_id: &str) -> Result<Vec<Student>, SourceError>;
}

/// Supplies a school's vehicles.
pub trait VehicleInventory: Send + Sync {
    fn active_vehicles(&self, school_id: &str) -> Result<Vec<Vehicle>, SourceError>;
}

impl<T: Geocoder + ?Sized> Geocoder for &T {
    fn geocode(&self, address: &str) -> Result<Vec<GeocodeResult>, ProviderError> {
        (**self).geocode(address)
    }
}

impl<T: DirectionsProvider + ?Sized> DirectionsProvider for &T {
    fn directions(&self, request: &DirectionsRequest) -> Result<DirectionsRoute, ProviderError> {
        (**self).directions(request)
    }
}

impl<T: Geocoder + ?Sized> Geocoder for Arc<T> {
    fn geocode(&self, address: &str) -> Result<Vec<GeocodeResult>, ProviderError> {
        (**self).geocode(address)
    }
}

impl<T: DirectionsProvider + ?Sized> DirectionsProvider for Arc<T> {
    fn directions(&self, request: &DirectionsRequest) -> Result<DirectionsRoute, ProviderError> {
        (**self).directions(request)
    }
}
