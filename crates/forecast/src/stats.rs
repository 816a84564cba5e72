//! Small deterministic numeric helpers shared by the strategies.

pub(crate) fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / (xs.len() as f64)
}

/// Last value of a trailing rolling mean.
///
/// The final window covers the last `min(window, len)` observations; `None`
/// when fewer than `min_periods` observations exist.
pub(crate) fn trailing_mean(xs: &[f64], window: usize, min_periods: usize) -> Option<f64> {
    if xs.len() < min_periods.max(1) {
        return None;
    }
    let start = xs.len().saturating_sub(window);
    Some(mean(&xs[start..]))
}

/// First-order differences: `x[i] - x[i - 1]`.
pub(crate) fn difference(xs: &[f64]) -> Vec<f64> {
    xs.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Solve the square system `a * x = b` by Gaussian elimination with partial
/// pivoting. Returns `None` when the matrix is (numerically) singular.
pub(crate) fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    if a.len() != n || a.iter().any(|row| row.len() != n) {
        return None;
    }

    let scale = a
        .iter()
        .flat_map(|row| row.iter())
        .fold(0.0f64, |acc, v| acc.max(v.abs()));
    if !(scale.is_finite() && scale > 0.0) {
        return None;
    }
    let tolerance = scale * 1e-9;

    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot][col].abs() <= tolerance {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = ((row + 1)..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }

    x.iter().all(|v| v.is_finite()).then_some(x)
}

/// Ordinary least squares line through `(i, ys[i])`: `(intercept, slope)`.
///
/// Needs at least two points.
pub(crate) fn linear_trend(ys: &[f64]) -> Option<(f64, f64)> {
    let n = ys.len();
    if n < 2 {
        return None;
    }
    let x_mean = (n as f64 - 1.0) / 2.0;
    let y_mean = mean(ys);

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (i, y) in ys.iter().enumerate() {
        let dx = i as f64 - x_mean;
        sxy += dx * (y - y_mean);
        sxx += dx * dx;
    }

    let slope = sxy / sxx;
    Some((y_mean - slope * x_mean, slope))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_mean_uses_short_window_until_full() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        assert_eq!(trailing_mean(&xs, 12, 6), Some(3.5));
        assert_eq!(trailing_mean(&xs[..5], 12, 6), None);

        let long: Vec<f64> = (1..=14).map(f64::from).collect();
        // Last 12 of 1..=14 is 3..=14.
        assert_eq!(trailing_mean(&long, 12, 6), Some(8.5));
    }

    #[test]
    fn solves_small_system() {
        let a = vec![vec![2.0, 1.0], vec![1.0, 3.0]];
        let x = solve(a, vec![3.0, 5.0]).unwrap();
        assert!((x[0] - 0.8).abs() < 1e-12);
        assert!((x[1] - 1.4).abs() < 1e-12);
    }

    #[test]
    fn singular_system_is_rejected() {
        let a = vec![vec![1.0, 2.0], vec![2.0, 4.0]];
        assert!(solve(a, vec![1.0, 2.0]).is_none());
        assert!(solve(vec![vec![0.0]], vec![0.0]).is_none());
    }

    #[test]
    fn linear_trend_recovers_exact_line() {
        let ys: Vec<f64> = (0..8).map(|i| 4.0 + 2.5 * i as f64).collect();
        let (intercept, slope) = linear_trend(&ys).unwrap();
        assert!((intercept - 4.0).abs() < 1e-9);
        assert!((slope - 2.5).abs() < 1e-9);
    }

    #[test]
    fn difference_shortens_by_one() {
        assert_eq!(difference(&[1.0, 4.0, 2.0]), vec![3.0, -2.0]);
        assert!(difference(&[1.0]).is_empty());
    }
}
