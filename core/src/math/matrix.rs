use ndarray::Array2;
use pathfinding::kuhn_munkres::kuhn_munkres_min;
use pathfinding::matrix::Matrix;

/// Fixed-point scale used to hand real costs to the integer assignment solver.
const COST_SCALE: f64 = 1_000_000.0;

pub struct MatrixHelper;

impl MatrixHelper {
    /// Builds a `rows x cols` cost matrix from a pairwise cost function.
    pub fn cost_matrix<F>(rows: usize, cols: usize, cost: F) -> Array2<f64>
    where
        F: Fn(usize, usize) -> f64,
    {
        Array2::from_shape_fn((rows, cols), |(row, col)| cost(row, col))
    }

    /// Minimum-cost one-to-one assignment over a rectangular cost matrix.
    ///
    /// Returns `(row, col)` pairs sorted by row; `min(rows, cols)` pairs are
    /// produced and a zero dimension yields no pairs.
    pub fn assign(costs: &Array2<f64>) -> Vec<(usize, usize)> {
        let (rows, cols) = costs.dim();
        if rows == 0 || cols == 0 {
            return Vec::new();
        }

        // the solver needs at least as many columns as rows
        let transposed = rows > cols;
        let oriented = if transposed {
            costs.t().to_owned()
        } else {
            costs.clone()
        };
        let (solver_rows, solver_cols) = oriented.dim();
        let scaled = oriented.iter().map(|&c| scale_cost(c)).collect::<Vec<_>>();
        let weights = match Matrix::from_vec(solver_rows, solver_cols, scaled) {
            Ok(weights) => weights,
            Err(_) => return Vec::new(),
        };

        let (_, assignment) = kuhn_munkres_min(&weights);
        let mut pairs: Vec<(usize, usize)> = assignment
            .into_iter()
            .enumerate()
            .map(|(row, col)| if transposed { (col, row) } else { (row, col) })
            .collect();
        pairs.sort_unstable();
        pairs
    }
}

fn scale_cost(cost: f64) -> i64 {
    if cost.is_finite() {
        (cost * COST_SCALE).round() as i64
    } else {
        i64::MAX / 1024
    }
}
