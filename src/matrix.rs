//! Great-circle distances and the dense pairwise distance table.
//!
//! Uses the haversine formula on a spherical earth. Less accurate than an
//! ellipsoidal model, but the tour optimizer only needs the relative
//! ordering of distances.

use std::collections::HashMap;

/// Mean earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters between two (lat, lng) points.
pub fn haversine_m(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lng1) = from;
    let (lat2, lng2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push `a` marginally outside [0, 1] for identical or
    // antipodal points; clamp before asin to stay inside its domain.
    let c = 2.0 * a.sqrt().clamp(0.0, 1.0).asin();

    EARTH_RADIUS_M * c
}

/// Dense pairwise distance table over a node set, indexed by name.
///
/// Node counts in this domain are small (a handful to a few dozen stops), so
/// the full table is computed up front. Symmetric by construction; the
/// diagonal is never queried.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    index: HashMap<String, usize>,
    values: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    /// Computes every pairwise distance for the given nodes.
    ///
    /// Panics if a node is missing from `coords`; the resolver guarantees a
    /// coordinate for every node it returns.
    pub fn build(nodes: &[String], coords: &HashMap<String, (f64, f64)>) -> Self {
        let n = nodes.len();
        let mut values = vec![vec![0.0; n]; n];

        for (i, a) in nodes.iter().enumerate() {
            for (j, b) in nodes.iter().enumerate() {
                if i != j {
                    values[i][j] = haversine_m(coords[a], coords[b]);
                }
            }
        }

        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();

        Self { index, values }
    }

    /// Distance in meters between two named nodes.
    ///
    /// Panics if either name was not part of the node set the matrix was
    /// built from.
    pub fn between(&self, a: &str, b: &str) -> f64 {
        self.values[self.index[a]][self.index[b]]
    }
}
