//! trip-mapper core
//!
//! Plans a closed multi-stop trip: place names are resolved to coordinates
//! through a geocoding provider, a pairwise haversine distance matrix is
//! built, and the stops are ordered into a short loop that starts and ends
//! at home (nearest-neighbor construction refined by 2-opt local search).

pub mod error;
pub mod geocode;
pub mod matrix;
pub mod normalize;
pub mod route;
pub mod tour;
