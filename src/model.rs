//! Data model shared by the planner components.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Label used for students whose pickup address cannot be resolved.
pub const UNKNOWN_ADDRESS: &str = "Unknown Address";

/// Placeholder rendered when a trip could not be routed.
pub const NOT_AVAILABLE: &str = "N/A";

/// A WGS84 coordinate pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// `lat,lng` with six decimals, the form mapping APIs accept.
    pub fn to_query(&self) -> String {
        format!("{:.6},{:.6}", self.latitude, self.longitude)
    }
}

/// A physical pickup/drop-off point within a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub name: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub estimated_students: usize,
}

impl Stop {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            latitude: None,
            longitude: None,
            estimated_students: 0,
        }
    }

    pub fn with_students(mut self, count: usize) -> Self {
        self.estimated_students = count;
        self
    }

    pub fn with_point(mut self, point: Point) -> Self {
        self.set_point(point);
        self
    }

    pub fn set_point(&mut self, point: Point) {
        self.latitude = Some(point.latitude);
        self.longitude = Some(point.longitude);
    }

    /// Coordinates, only when both are populated.
    pub fn point(&self) -> Option<Point> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Point::new(latitude, longitude)),
            _ => None,
        }
    }
}

/// Outcome of a successful geocode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodeResult {
    pub lat: f64,
    pub lng: f64,
    pub formatted_address: String,
}

impl GeocodeResult {
    pub fn point(&self) -> Point {
        Point::new(self.lat, self.lng)
    }
}

/// Aggregated distance/duration over every leg of a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceResult {
    /// Meters.
    pub distance: u64,
    /// Seconds.
    pub duration: u64,
    pub distance_text: String,
    pub duration_text: String,
    /// Permutation of the intermediate waypoint indices, when optimization was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimized_waypoint_order: Option<Vec<usize>>,
    pub legs: Vec<LegSummary>,
}

/// Distance and duration of a single provider leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegSummary {
    pub distance_meters: u64,
    pub duration_seconds: u64,
    pub distance_text: String,
    pub duration_text: String,
}

/// One consecutive pair of stops in an optimized route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteLeg {
    pub from: String,
    pub to: String,
    pub distance_meters: u64,
    pub duration_seconds: u64,
    pub distance_text: String,
    pub duration_text: String,
}

/// Result of ordering a trip's stops.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizedRoute {
    pub optimized_stops: Vec<Stop>,
    /// Stops dropped because they have no coordinates.
    pub excluded_stops: Vec<Stop>,
    pub total_distance: u64,
    pub total_duration: u64,
    pub distance_text: String,
    pub duration_text: String,
    pub legs: Vec<RouteLeg>,
}

/// An enrolled student as supplied by the roster provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub year_group: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl Student {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            year_group: None,
            address: None,
        }
    }

    pub fn with_year_group(mut self, year_group: impl Into<String>) -> Self {
        self.year_group = Some(year_group.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Where this student is picked up; blank addresses fall into the unknown bucket.
    pub fn pickup_point(&self) -> PickupPoint {
        match self.address.as_deref().map(str::trim) {
            Some(address) if !address.is_empty() => PickupPoint::Address(address.to_string()),
            _ => PickupPoint::Unknown,
        }
    }
}

/// Pickup grouping key for a student.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PickupPoint {
    Address(String),
    Unknown,
}

impl PickupPoint {
    pub fn address(&self) -> Option<&str> {
        match self {
            Self::Address(address) => Some(address),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for PickupPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(address) => f.write_str(address),
            Self::Unknown => f.write_str(UNKNOWN_ADDRESS),
        }
    }
}

/// A vehicle from the school's inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: String,
    #[serde(default)]
    pub registration: String,
    pub capacity: u32,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Eligibility rule of a route profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolCriteria {
    /// Every enrolled student is eligible.
    All,
    /// Only students whose year group is in the set.
    YearGroups(BTreeSet<String>),
}

impl PoolCriteria {
    pub fn year_groups<I, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::YearGroups(groups.into_iter().map(Into::into).collect())
    }

    pub fn admits(&self, student: &Student) -> bool {
        match self {
            Self::All => true,
            Self::YearGroups(groups) => student
                .year_group
                .as_deref()
                .is_some_and(|group| groups.contains(group.trim())),
        }
    }
}

/// A recurring route's eligibility template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteProfile {
    pub id: String,
    pub profile_name: String,
    pub pool: PoolCriteria,
}

impl RouteProfile {
    pub fn new(id: impl Into<String>, profile_name: impl Into<String>, pool: PoolCriteria) -> Self {
        Self {
            id: id.into(),
            profile_name: profile_name.into(),
            pool,
        }
    }
}

/// Route profile as stored by the backend, with an untyped criteria blob.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RouteProfileRecord {
    pub id: String,
    pub profile_name: String,
    #[serde(default)]
    pub student_pool_type: Option<String>,
    #[serde(default)]
    pub student_pool_criteria: Value,
}

impl From<RouteProfileRecord> for RouteProfile {
    fn from(record: RouteProfileRecord) -> Self {
        let pool = match record.student_pool_type.as_deref() {
            Some("year_group") => PoolCriteria::YearGroups(
                record
                    .student_pool_criteria
                    .get("year_groups")
                    .and_then(Value::as_array)
                    .map(|groups| groups.iter().filter_map(year_group_key).collect())
                    .unwrap_or_default(),
            ),
            _ => PoolCriteria::All,
        };

        Self {
            id: record.id,
            profile_name: record.profile_name,
            pool,
        }
    }
}

fn year_group_key(value: &Value) -> Option<String> {
    match value {
        Value::String(group) => Some(group.trim().to_string()),
        Value::Number(group) => Some(number_key(group)),
        _ => None,
    }
}

/// Whole numbers render without a fraction, so `7.0` matches a roster's `"7"`.
fn number_key(number: &serde_json::Number) -> String {
    if let Some(whole) = number.as_i64() {
        return whole.to_string();
    }
    if let Some(whole) = number.as_u64() {
        return whole.to_string();
    }
    match number.as_f64() {
        Some(float) if float.fract() == 0.0 && float.abs() < i64::MAX as f64 => {
            (float as i64).to_string()
        }
        _ => number.to_string(),
    }
}

/// Students sharing one vehicle run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentGroup {
    pub members: Vec<Student>,
    /// Member count per pickup point, in first-seen order.
    pub pickups: Vec<(PickupPoint, usize)>,
}

impl StudentGroup {
    /// Resolvable addresses with their student counts.
    pub fn routable_addresses(&self) -> impl Iterator<Item = (&str, usize)> {
        self.pickups
            .iter()
            .filter_map(|(pickup, count)| pickup.address().map(|address| (address, *count)))
    }
}

/// Whether routing ran for a suggestion and how it ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingStatus {
    Ok,
    Failed,
    /// Fewer than two addresses; nothing to route.
    Skipped,
}

/// The planner's output unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSuggestion {
    pub trip_number: usize,
    pub trip_name: String,
    pub student_count: usize,
    pub stops: usize,
    pub students: Vec<String>,
    pub estimated_distance: String,
    pub estimated_duration: String,
    pub pickup_addresses: Vec<String>,
    pub routing_status: RoutingStatus,
    /// Addresses in visiting order once routed.
    pub stop_order: Vec<String>,
}

pub fn trip_name(profile_name: &str, trip_number: usize) -> String {
    format!("{profile_name} - Trip {trip_number}")
}
