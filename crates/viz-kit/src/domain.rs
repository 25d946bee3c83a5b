//! Domain computation and stacking over raw data points
//!
//! Values that are missing or non-numeric are skipped, never read as zero.

use viz_core::DataPoint;

/// Unique x categories in insertion order (points without an x value are skipped)
pub fn categories(data: &[DataPoint], x_key: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for point in data {
        if let Some(category) = point.category(x_key) {
            if !out.contains(&category) {
                out.push(category);
            }
        }
    }
    out
}

/// Min/max of the continuous x coordinate (numbers or dates)
pub fn coordinate_extent(data: &[DataPoint], x_key: &str) -> Option<(f64, f64)> {
    extent(data.iter().filter_map(|p| p.coordinate(x_key)))
}

/// Min/max over every numeric value of `keys`
pub fn value_extent<'a>(
    data: &[DataPoint],
    keys: impl IntoIterator<Item = &'a str> + Clone,
) -> Option<(f64, f64)> {
    extent(
        data.iter()
            .flat_map(|p| keys.clone().into_iter().filter_map(move |k| p.number(k))),
    )
}

/// Min/max of an iterator of finite values
pub fn extent(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Final value-axis domain: empty data maps to `[0, 1]`;
/// `include_zero` pulls the baseline into view (bar charts).
pub fn value_domain(extent: Option<(f64, f64)>, include_zero: bool) -> (f64, f64) {
    match extent {
        None => (0.0, 1.0),
        Some((lo, hi)) if include_zero => (lo.min(0.0), hi.max(0.0)),
        Some(range) => range,
    }
}

/// Stacked segment `(y0, y1)` for one key at one point
pub type StackSegment = Option<(f64, f64)>;

/// Stack `keys` on top of each other, point by point.
///
/// Positive values stack upward from zero and negative values downward, so
/// mixed-sign series never overlap. Missing values leave a `None` gap and do
/// not advance the stack. Result is indexed `[key][point]`.
pub fn stack_series(data: &[DataPoint], keys: &[&str]) -> Vec<Vec<StackSegment>> {
    let mut positive = vec![0.0_f64; data.len()];
    let mut negative = vec![0.0_f64; data.len()];

    keys.iter()
        .map(|key| {
            data.iter()
                .enumerate()
                .map(|(i, point)| {
                    let value = point.number(key)?;
                    let base = if value >= 0.0 { &mut positive[i] } else { &mut negative[i] };
                    let y0 = *base;
                    *base += value;
                    Some((y0, *base))
                })
                .collect()
        })
        .collect()
}

/// Min/max over all stacked segment edges
pub fn stacked_extent(stack: &[Vec<StackSegment>]) -> Option<(f64, f64)> {
    extent(
        stack
            .iter()
            .flatten()
            .flatten()
            .flat_map(|&(y0, y1)| [y0, y1]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<DataPoint> {
        vec![
            DataPoint::new().with("m", "Jan").with("a", 3.0).with("b", 1.0),
            DataPoint::new().with("m", "Feb").with("a", -2.0).with("b", "n/a"),
            DataPoint::new().with("m", "Jan").with("a", 5.0).with("b", 4.0),
        ]
    }

    #[test]
    fn test_categories_unique_in_order() {
        assert_eq!(categories(&rows(), "m"), vec!["Jan", "Feb"]);
    }

    #[test]
    fn test_value_extent_skips_non_numeric() {
        assert_eq!(value_extent(&rows(), ["b"]), Some((1.0, 4.0)));
        assert_eq!(value_extent(&rows(), ["a", "b"]), Some((-2.0, 5.0)));
        assert_eq!(value_extent(&rows(), ["missing"]), None);
    }

    #[test]
    fn test_value_domain_defaults() {
        assert_eq!(value_domain(None, false), (0.0, 1.0));
        assert_eq!(value_domain(Some((2.0, 8.0)), true), (0.0, 8.0));
        assert_eq!(value_domain(Some((2.0, 8.0)), false), (2.0, 8.0));
    }

    #[test]
    fn test_stack_series_diverging() {
        let stack = stack_series(&rows(), &["a", "b"]);
        assert_eq!(stack[0][0], Some((0.0, 3.0)));
        assert_eq!(stack[1][0], Some((3.0, 4.0)));
        assert_eq!(stack[0][1], Some((0.0, -2.0)));
        assert_eq!(stack[1][1], None);
        assert_eq!(stacked_extent(&stack), Some((-2.0, 9.0)));
    }
}
