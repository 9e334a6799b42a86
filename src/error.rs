//! Error types for provider calls and planning runs.

use thiserror::Error;

/// Boxed error returned by external collaborators (roster, profiles, vehicles).
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// Failure talking to the mapping provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The provider answered with a non-success status string.
    #[error("provider returned status {status}: {message}")]
    Status { status: String, message: String },

    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("failed to parse provider response: {message}")]
    Parse { message: String },
}

impl ProviderError {
    pub fn status(status: impl Into<String>) -> Self {
        Self::Status {
            status: status.into(),
            message: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    /// Rejected before any provider call.
    #[error("address is empty")]
    BlankAddress,

    #[error("geocoding failed with status {0}")]
    GeocodingFailed(String),

    #[error("geocoder returned no candidates")]
    NoCandidates,

    #[error(transparent)]
    Provider(ProviderError),
}

impl From<ProviderError> for GeocodeError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Status { status, .. } => Self::GeocodingFailed(status),
            other => Self::Provider(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    #[error("stop {stop} has no coordinates")]
    MissingCoordinates { stop: String },

    #[error("routing failed with status {0}")]
    RoutingFailed(String),

    #[error("provider returned a route without legs")]
    EmptyRoute,

    #[error("waypoint order {order:?} is not a permutation of {expected} waypoints")]
    InvalidWaypointOrder { expected: usize, order: Vec<usize> },

    #[error("provider returned {actual} legs for a route with {expected} hops")]
    LegCountMismatch { expected: usize, actual: usize },

    #[error(transparent)]
    Provider(ProviderError),
}

impl From<ProviderError> for RoutingError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Status { status, .. } => Self::RoutingFailed(status),
            other => Self::Provider(other),
        }
    }
}

/// Fatal errors; the run produces no partial result.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("route profile {0} not found")]
    ProfileNotFound(String),

    #[error("failed to load route profile: {0}")]
    ProfileLookup(#[source] SourceError),

    #[error("failed to fetch student roster: {0}")]
    RosterUnavailable(#[source] SourceError),

    #[error("vehicle capacity must be at least 1, got {0}")]
    InvalidCapacity(u32),
}

impl PlanError {
    /// HTTP-style status for the error response.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ProfileNotFound(_) => 404,
            Self::ProfileLookup(_) | Self::RosterUnavailable(_) => 502,
            Self::InvalidCapacity(_) => 400,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing provider credentials: {0} is not set")]
    MissingCredentials(&'static str),

    #[error("invalid value {value:?} for {var}")]
    InvalidValue { var: &'static str, value: String },
}
