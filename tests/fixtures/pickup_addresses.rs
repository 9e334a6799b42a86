//! Pickup addresses around a Henderson, NV school catchment.
//!
//! Coordinates sourced from OpenStreetMap. Street addresses are the nearest
//! residential frontage to each point.

/// A pickup address with its geocoded coordinates.
#[derive(Debug, Clone)]
pub struct PickupAddress {
    pub address: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl PickupAddress {
    pub const fn new(address: &'static str, lat: f64, lng: f64) -> Self {
        Self { address, lat, lng }
    }
}

// ============================================================================
// Green Valley
// ============================================================================

pub const GREEN_VALLEY: &[PickupAddress] = &[
    PickupAddress::new("2300 Paseo Verde Pkwy, Henderson, NV 89052", 36.0159, -115.0846),
    PickupAddress::new("1905 Wigwam Pkwy, Henderson, NV 89074", 36.0307, -115.0847),
    PickupAddress::new("2555 Green Valley Pkwy, Henderson, NV 89014", 36.0308, -115.0825),
    PickupAddress::new("2841 Windmill Pkwy, Henderson, NV 89074", 36.0380, -115.0730),
];

// ============================================================================
// East Henderson
// ============================================================================

pub const EAST_HENDERSON: &[PickupAddress] = &[
    PickupAddress::new("200 S Water St, Henderson, NV 89015", 36.0335, -114.9856),
    PickupAddress::new("1500 W Sunset Rd, Henderson, NV 89014", 36.0614, -115.0631),
    PickupAddress::new("777 W Lake Mead Pkwy, Henderson, NV 89015", 36.0137, -114.9928),
    PickupAddress::new("1020 Olympic Ave, Henderson, NV 89002", 36.0090, -114.9917),
];

// ============================================================================
// Anthem / South
// ============================================================================

pub const ANTHEM: &[PickupAddress] = &[
    PickupAddress::new("2535 Anthem Village Dr, Henderson, NV 89052", 35.9916, -115.1028),
    PickupAddress::new("10 Sunridge Heights Pkwy, Henderson, NV 89052", 35.9949, -115.0999),
    PickupAddress::new("2900 Horizon Ridge Pkwy, Henderson, NV 89052", 36.0010, -115.0680),
];

/// Every fixture address.
pub fn all_addresses() -> Vec<PickupAddress> {
    let mut all = Vec::new();
    all.extend_from_slice(GREEN_VALLEY);
    all.extend_from_slice(EAST_HENDERSON);
    all.extend_from_slice(ANTHEM);
    all
}
