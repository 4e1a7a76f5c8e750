//! Maximum-weight bipartite assignment (Hungarian algorithm).
//!
//! Weights are scaled to integers and solved as a dense O(n^3) minimum-cost
//! problem over a square matrix padded with zero-cost dummy cells. Sibling
//! lists are short, so the cubic cost is irrelevant in practice.

const WEIGHT_SCALE: f64 = 1_000_000.0;

/// Assign rows to columns maximizing total weight.
///
/// Returns, per row, the assigned column, or `None` when the row was left on
/// a padding column. Every real row/column pair may be assigned, including
/// negative weights; callers filter by weight afterwards.
pub fn max_weight_assignment(weights: &[Vec<f64>]) -> Vec<Option<usize>> {
    let rows = weights.len();
    let cols = weights.iter().map(Vec::len).max().unwrap_or(0);
    let size = rows.max(cols);
    if rows == 0 || cols == 0 {
        return vec![None; rows];
    }

    let mut costs = vec![vec![0i64; size]; size];
    for (i, row) in weights.iter().enumerate() {
        for (j, &w) in row.iter().enumerate() {
            costs[i][j] = -(w * WEIGHT_SCALE).round() as i64;
        }
    }

    solve_min_cost(&costs)
        .into_iter()
        .take(rows)
        .enumerate()
        .map(|(i, j)| (j < weights[i].len()).then_some(j))
        .collect()
}

/// Minimum-cost perfect assignment on a square matrix.
///
/// Returns `assignment[row] = column`.
fn solve_min_cost(costs: &[Vec<i64>]) -> Vec<usize> {
    let n = costs.len();
    if n == 0 {
        return Vec::new();
    }
    debug_assert!(costs.iter().all(|row| row.len() == n));

    let inf = i64::MAX / 4;
    // Potentials and matching are 1-based; index 0 is the virtual source.
    let mut u = vec![0i64; n + 1];
    let mut v = vec![0i64; n + 1];
    let mut owner = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];

    for row in 1..=n {
        owner[0] = row;
        let mut col0 = 0usize;
        let mut min_reduced = vec![inf; n + 1];
        let mut visited = vec![false; n + 1];

        loop {
            visited[col0] = true;
            let r = owner[col0];
            let mut delta = inf;
            let mut col1 = 0usize;

            for col in 1..=n {
                if visited[col] {
                    continue;
                }
                let reduced = costs[r - 1][col - 1] - u[r] - v[col];
                if reduced < min_reduced[col] {
                    min_reduced[col] = reduced;
                    way[col] = col0;
                }
                if min_reduced[col] < delta {
                    delta = min_reduced[col];
                    col1 = col;
                }
            }

            for col in 0..=n {
                if visited[col] {
                    u[owner[col]] += delta;
                    v[col] -= delta;
                } else {
                    min_reduced[col] -= delta;
                }
            }

            col0 = col1;
            if owner[col0] == 0 {
                break;
            }
        }

        // Augment along the alternating path back to the source.
        loop {
            let prev = way[col0];
            owner[col0] = owner[prev];
            col0 = prev;
            if col0 == 0 {
                break;
            }
        }
    }

    let mut assignment = vec![0usize; n];
    for col in 1..=n {
        if owner[col] > 0 {
            assignment[owner[col] - 1] = col - 1;
        }
    }
    assignment
}
