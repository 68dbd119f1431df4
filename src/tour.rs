//! Tour construction and improvement over the distance matrix.
//!
//! Both stages operate on the open path; the return-to-home edge is only
//! added at assembly time.

use crate::matrix::DistanceMatrix;

/// Builds an open path with the greedy nearest-unvisited-next heuristic.
///
/// Starts from `nodes[0]` (home) and repeatedly appends the closest
/// unvisited node. Ties keep input order because only a strictly shorter
/// distance displaces the current candidate. Deterministic for identical
/// inputs; a lone home node is returned unchanged.
pub fn nearest_neighbor(nodes: &[String], matrix: &DistanceMatrix) -> Vec<String> {
    let Some(home) = nodes.first() else {
        return Vec::new();
    };

    let mut path = Vec::with_capacity(nodes.len());
    path.push(home.clone());

    let mut current = home.clone();
    let mut unvisited: Vec<&String> = nodes[1..].iter().collect();
    while !unvisited.is_empty() {
        let mut best = 0;
        let mut best_dist = matrix.between(&current, unvisited[0]);
        for (idx, candidate) in unvisited.iter().enumerate().skip(1) {
            let dist = matrix.between(&current, candidate);
            if dist < best_dist {
                best = idx;
                best_dist = dist;
            }
        }
        current = unvisited.remove(best).clone();
        path.push(current.clone());
    }

    path
}

/// Refines an open path with first-improvement 2-opt until locally optimal.
///
/// Scans index pairs with `i` in `1..len-2` and `j` in `i+1..len-1`,
/// skipping adjacent pairs where the exchange is a no-op. The endpoints stay
/// fixed: home never moves and the tail node never acts as the left boundary
/// of a reversal. An accepted exchange reverses `path[i..=j]` in place and
/// restarts the scan from the beginning; that restart order determines which
/// local optimum is reached, so it must not be swapped for a
/// best-improvement sweep. Terminates because every accepted exchange
/// strictly shortens the path.
pub fn two_opt(path: &mut [String], matrix: &DistanceMatrix) {
    if path.len() < 4 {
        // No non-adjacent index pair exists.
        return;
    }

    let mut improved = true;
    while improved {
        improved = false;
        'scan: for i in 1..path.len() - 2 {
            for j in i + 1..path.len() - 1 {
                if j - i == 1 {
                    continue;
                }
                let old = matrix.between(&path[i - 1], &path[i])
                    + matrix.between(&path[j], &path[j + 1]);
                let new = matrix.between(&path[i - 1], &path[j])
                    + matrix.between(&path[i], &path[j + 1]);
                if new < old {
                    path[i..=j].reverse();
                    improved = true;
                    break 'scan;
                }
            }
        }
    }
}

/// Total length in meters of the open path (no return edge).
pub fn total_length(path: &[String], matrix: &DistanceMatrix) -> f64 {
    path.windows(2)
        .map(|pair| matrix.between(&pair[0], &pair[1]))
        .sum()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    /// Matrix over named points spaced along a meridian; one unit of
    /// latitude is ~111 km, so distances mirror the latitude gaps.
    fn line_matrix(points: &[(&str, f64)]) -> (Vec<String>, DistanceMatrix) {
        let nodes: Vec<String> = points.iter().map(|(name, _)| name.to_string()).collect();
        let coords: HashMap<String, (f64, f64)> = points
            .iter()
            .map(|(name, lat)| (name.to_string(), (*lat, 0.0)))
            .collect();
        let matrix = DistanceMatrix::build(&nodes, &coords);
        (nodes, matrix)
    }

    #[test]
    fn test_nearest_neighbor_walks_the_line() {
        let (nodes, matrix) =
            line_matrix(&[("home", 0.0), ("far", 3.0), ("near", 1.0), ("mid", 2.0)]);
        let path = nearest_neighbor(&nodes, &matrix);
        assert_eq!(path, vec!["home", "near", "mid", "far"]);
    }

    #[test]
    fn test_nearest_neighbor_tie_keeps_input_order() {
        let nodes: Vec<String> = ["home", "first", "second"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        // Both stops share a coordinate, so their distances from home are
        // exactly equal.
        let coords = HashMap::from([
            ("home".to_string(), (0.0, 0.0)),
            ("first".to_string(), (1.0, 1.0)),
            ("second".to_string(), (1.0, 1.0)),
        ]);
        let matrix = DistanceMatrix::build(&nodes, &coords);
        let path = nearest_neighbor(&nodes, &matrix);
        assert_eq!(path, vec!["home", "first", "second"]);
    }

    #[test]
    fn test_nearest_neighbor_home_only() {
        let (nodes, matrix) = line_matrix(&[("home", 0.0)]);
        assert_eq!(nearest_neighbor(&nodes, &matrix), vec!["home"]);
    }

    #[test]
    fn test_two_opt_untangles_path() {
        // home -> d -> c -> b -> e zig-zags along the line; reversing
        // [d, c, b] yields the sorted walk.
        let (nodes, matrix) = line_matrix(&[
            ("home", 0.0),
            ("d", 3.0),
            ("c", 2.0),
            ("b", 1.0),
            ("e", 4.0),
        ]);
        let mut path = nodes.clone();
        let before = total_length(&path, &matrix);

        two_opt(&mut path, &matrix);

        assert_eq!(path, vec!["home", "b", "c", "d", "e"]);
        assert!(total_length(&path, &matrix) < before);
    }

    #[test]
    fn test_two_opt_never_lengthens_path() {
        let (nodes, matrix) = line_matrix(&[
            ("home", 0.0),
            ("a", 2.5),
            ("b", 0.5),
            ("c", 4.0),
            ("d", 1.5),
            ("e", 3.0),
        ]);
        let mut path = nearest_neighbor(&nodes, &matrix);
        let before = total_length(&path, &matrix);
        two_opt(&mut path, &matrix);
        assert!(total_length(&path, &matrix) <= before);
    }

    #[test]
    fn test_two_opt_result_is_locally_optimal() {
        let (nodes, matrix) = line_matrix(&[
            ("home", 0.0),
            ("a", 2.5),
            ("b", 0.5),
            ("c", 4.0),
            ("d", 1.5),
            ("e", 3.0),
        ]);
        let mut path = nearest_neighbor(&nodes, &matrix);
        two_opt(&mut path, &matrix);

        // Replay the scan: no exchange over the same index range may still
        // shorten the path.
        for i in 1..path.len() - 2 {
            for j in i + 1..path.len() - 1 {
                if j - i == 1 {
                    continue;
                }
                let old = matrix.between(&path[i - 1], &path[i])
                    + matrix.between(&path[j], &path[j + 1]);
                let new = matrix.between(&path[i - 1], &path[j])
                    + matrix.between(&path[i], &path[j + 1]);
                assert!(new >= old, "improving exchange left at ({i}, {j})");
            }
        }
    }

    #[test]
    fn test_two_opt_three_nodes_is_noop() {
        // With three nodes there is no valid non-adjacent index pair.
        let (nodes, matrix) = line_matrix(&[("home", 0.0), ("b", 2.0), ("a", 1.0)]);
        let mut path = nodes.clone();
        two_opt(&mut path, &matrix);
        assert_eq!(path, nodes);
    }
}
