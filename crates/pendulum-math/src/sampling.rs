//! Uniform output grids shared by both integration strategies.

/// `n` instants `t0 + i * h`, `h = (t1 - t0) / (n - 1)`, with the last
/// instant pinned to exactly `t1`.
///
/// Callers guarantee `t0 < t1` and `n >= 2`; for `n < 2` the grid holds
/// only `t0` (or nothing for `n == 0`).
pub fn uniform_grid(t0: f64, t1: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![t0],
        _ => {
            let h = (t1 - t0) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { t1 } else { t0 + i as f64 * h })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_samples_are_endpoints() {
        assert_eq!(uniform_grid(0.0, 1.0, 2), vec![0.0, 1.0]);
    }

    #[test]
    fn test_endpoints_exact() {
        let grid = uniform_grid(0.0, 30.0, 2000);
        assert_eq!(grid.len(), 2000);
        assert_eq!(grid[0], 0.0);
        assert_eq!(grid[1999], 30.0);
    }

    #[test]
    fn test_uniform_spacing() {
        let grid = uniform_grid(-2.0, 3.0, 11);
        for w in grid.windows(2) {
            assert!((w[1] - w[0] - 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn test_degenerate_counts() {
        assert!(uniform_grid(0.0, 1.0, 0).is_empty());
        assert_eq!(uniform_grid(0.0, 1.0, 1), vec![0.0]);
    }
}
