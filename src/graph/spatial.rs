use rstar::{RTree, RTreeObject, AABB};
use crate::distance::chebyshev_distance;
use crate::sampling::PivotMatrix;

/// Pivot coordinates carried into the R-tree. Extra pivots are checked
/// exactly after the tree lookup.
pub const INDEX_DIMENSIONS: usize = 8;

type IndexPoint = [f64; INDEX_DIMENSIONS];

/// Wrapper around a pivot-space row to make it compatible with R-Tree spatial indexing
pub struct PivotPoint {
    /// Sequence index the row belongs to
    pub index: usize,
    /// First pivot coordinates, zero padded
    coords: IndexPoint,
}

impl RTreeObject for PivotPoint {
    type Envelope = AABB<IndexPoint>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.coords)
    }
}

fn project(row: &[f64]) -> IndexPoint {
    let mut coords = [0.0; INDEX_DIMENSIONS];
    for (slot, v) in coords.iter_mut().zip(row) {
        *slot = *v;
    }
    coords
}

/// Builds an R-tree spatial index over every row of the pivot matrix.
///
/// Zero padding leaves Chebyshev distances unchanged for matrices with
/// fewer pivots than index dimensions.
pub fn build_rtree(matrix: &PivotMatrix) -> RTree<PivotPoint> {
    let points: Vec<PivotPoint> = (0..matrix.n_rows())
        .map(|index| PivotPoint {
            index,
            coords: project(matrix.row(index)),
        })
        .collect();

    // Bulk load is much more efficient than individual insertions
    RTree::bulk_load(points)
}

/// Finds all rows within Chebyshev distance `epsilon` of row `query` (inclusive).
///
/// The tree answers the box query on the indexed coordinates, which is a
/// superset of the true ball; candidates are then verified on all pivots.
/// The result is sorted and includes `query` itself. An infinite radius
/// returns every row without touching the tree.
pub fn find_within_radius(
    rtree: &RTree<PivotPoint>,
    matrix: &PivotMatrix,
    query: usize,
    epsilon: f64,
) -> Vec<usize> {
    if epsilon == f64::INFINITY {
        return (0..matrix.n_rows()).collect();
    }

    let center = project(matrix.row(query));
    // Widened by a few ulps so rounding never drops a boundary point before verification.
    let slack = |c: f64| (c.abs() + epsilon.abs()) * 4.0 * f64::EPSILON;
    let lower = center.map(|c| c - epsilon - slack(c));
    let upper = center.map(|c| c + epsilon + slack(c));
    let search_area = AABB::from_corners(lower, upper);

    let query_row = matrix.row(query);
    let mut found: Vec<usize> = rtree
        .locate_in_envelope_intersecting(&search_area)
        .map(|point| point.index)
        .filter(|&candidate| chebyshev_distance(query_row, matrix.row(candidate)) <= epsilon)
        .collect();
    found.sort_unstable();
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brute_force(matrix: &PivotMatrix, query: usize, epsilon: f64) -> Vec<usize> {
        (0..matrix.n_rows())
            .filter(|&j| chebyshev_distance(matrix.row(query), matrix.row(j)) <= epsilon)
            .collect()
    }

    #[test]
    fn test_low_dimensional_matches_brute_force() {
        let rows: Vec<Vec<f64>> = (0..30)
            .map(|i| vec![(i % 6) as f64, (i / 6) as f64 * 1.5])
            .collect();
        let matrix = PivotMatrix::from_rows(&rows).unwrap();
        let rtree = build_rtree(&matrix);

        for query in 0..matrix.n_rows() {
            for epsilon in [0.0, 1.0, 1.5, 4.0] {
                assert_eq!(
                    find_within_radius(&rtree, &matrix, query, epsilon),
                    brute_force(&matrix, query, epsilon)
                );
            }
        }
    }

    #[test]
    fn test_pivots_beyond_index_are_verified() {
        // Rows agree on the indexed coordinates and differ only in the last pivot.
        let mut rows = vec![vec![0.0; INDEX_DIMENSIONS + 2]; 3];
        rows[1][INDEX_DIMENSIONS + 1] = 0.5;
        rows[2][INDEX_DIMENSIONS + 1] = 5.0;
        let matrix = PivotMatrix::from_rows(&rows).unwrap();
        let rtree = build_rtree(&matrix);

        assert_eq!(find_within_radius(&rtree, &matrix, 0, 1.0), vec![0, 1]);
        assert_eq!(find_within_radius(&rtree, &matrix, 2, 4.5), vec![1, 2]);
    }

    #[test]
    fn test_unbounded_radius_returns_every_row() {
        let rows: Vec<Vec<f64>> = (0..5).map(|i| vec![i as f64 * 1e300, -(i as f64)]).collect();
        let matrix = PivotMatrix::from_rows(&rows).unwrap();
        let rtree = build_rtree(&matrix);
        assert_eq!(find_within_radius(&rtree, &matrix, 3, f64::INFINITY), vec![0, 1, 2, 3, 4]);
    }
}
