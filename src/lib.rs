//! trip-planner
//!
//! Groups a school's students into vehicle-capacity trips and routes each
//! trip's pickup stops through an external mapping provider.

pub mod config;
pub mod distance;
pub mod error;
pub mod format;
pub mod geocode;
pub mod google;
pub mod haversine;
pub mod model;
pub mod optimizer;
pub mod partition;
pub mod planner;
pub mod traits;
