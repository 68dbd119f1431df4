//! Route assembly and the end-to-end solve pipeline.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::Result;
use crate::geocode::{GeocodeCache, Geocoder, RetryPolicy, resolve_names};
use crate::matrix::DistanceMatrix;
use crate::normalize::normalize_input;
use crate::tour;

/// A closed trip: every name in `order` has an entry in `coordinates`, and
/// `order` starts and ends at home.
///
/// Serializes to the wire shape consumed by the HTTP layer:
/// `{"coordinates": {name: [lat, lng]}, "order": [name, ...]}`.
#[derive(Debug, Clone, Serialize)]
pub struct RouteResult {
    pub coordinates: HashMap<String, (f64, f64)>,
    pub order: Vec<String>,
}

/// Plans the closed trip: normalize, geocode, build the distance matrix,
/// construct a nearest-neighbor path, refine it with 2-opt, close the loop.
///
/// Fails without any partial result if the input is invalid or any name
/// cannot be resolved.
pub fn solve_route<G: Geocoder + Sync>(
    home: &str,
    stops: &[String],
    geocoder: &G,
    cache: &GeocodeCache,
    retry: &RetryPolicy,
) -> Result<RouteResult> {
    let nodes = normalize_input(home, stops)?;
    let coords = resolve_names(geocoder, cache, retry, &nodes)?;

    let matrix = DistanceMatrix::build(&nodes, &coords);
    let mut path = tour::nearest_neighbor(&nodes, &matrix);

    let initial_m = tour::total_length(&path, &matrix);
    tour::two_opt(&mut path, &matrix);
    tracing::debug!(
        nodes = nodes.len(),
        initial_m,
        improved_m = tour::total_length(&path, &matrix),
        "tour optimized"
    );

    Ok(assemble(&nodes[0], path, &coords))
}

/// Closes the loop and packages coordinates for the nodes on the path.
///
/// A path with fewer than two nodes degenerates to `[home, home]` with only
/// home's coordinate; otherwise home is appended unless already last.
pub fn assemble(
    home: &str,
    mut path: Vec<String>,
    coords: &HashMap<String, (f64, f64)>,
) -> RouteResult {
    if path.len() < 2 {
        let coordinates = coords
            .get_key_value(home)
            .map(|(name, coord)| (name.clone(), *coord))
            .into_iter()
            .collect();
        return RouteResult {
            coordinates,
            order: vec![home.to_string(), home.to_string()],
        };
    }

    if path.last().map(String::as_str) != Some(home) {
        path.push(home.to_string());
    }

    let coordinates = path
        .iter()
        .filter_map(|name| coords.get(name).map(|coord| (name.clone(), *coord)))
        .collect();

    RouteResult {
        coordinates,
        order: path,
    }
}
