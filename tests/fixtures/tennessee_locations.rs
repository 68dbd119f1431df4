//! Real Tennessee city coordinates for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap city nodes. Great-circle legs:
//! Knoxville-Nashville ~258 km, Nashville-Memphis ~315 km,
//! Knoxville-Memphis ~560 km.

/// A named location with coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

pub const KNOXVILLE: Location = Location::new("Knoxville", 35.9606, -83.9207);
pub const NASHVILLE: Location = Location::new("Nashville", 36.1627, -86.7816);
pub const MEMPHIS: Location = Location::new("Memphis", 35.1495, -90.0490);
pub const CHATTANOOGA: Location = Location::new("Chattanooga", 35.0456, -85.3097);

pub const CITIES: &[Location] = &[KNOXVILLE, NASHVILLE, MEMPHIS, CHATTANOOGA];
