//! Closest-point search used by hover and tooltips
//!
//! Three strategies, picked by the x scale kind and the chart type:
//! - bisection over a series sorted by x (linear / time scales)
//! - bucket lookup on a band scale (categorical x)
//! - Euclidean scan over rendered markers, bounded by a hit radius (scatter)
//!
//! None of them mutate their input.

use crate::scale::BandScale;
use viz_core::DataPoint;

/// Largest horizontal pixel distance between pointer and point for a
/// line-style (continuous axis) hover
pub const LINE_HIT_RADIUS: f64 = 50.0;

/// Extra slack around a scatter marker, in pixels
pub const SCATTER_HIT_PADDING: f64 = 10.0;

/// Hit radius for scatter markers of the given radius
pub fn scatter_hit_radius(point_radius: f64) -> f64 {
    point_radius.max(0.0) + SCATTER_HIT_PADDING
}

/// Nearest point by x in a series sorted by `x_key` (numbers or dates).
///
/// O(log n). Exactly equidistant neighbours resolve to the left one.
/// Points without an x coordinate never win.
pub fn find_closest<'a>(
    series: &'a [DataPoint],
    x_key: &str,
    query: f64,
) -> Option<(usize, &'a DataPoint)> {
    closest_by(series.len(), query, |i| series[i].coordinate(x_key)).map(|i| (i, &series[i]))
}

fn closest_by(len: usize, query: f64, x_at: impl Fn(usize) -> Option<f64>) -> Option<usize> {
    if len == 0 || !query.is_finite() {
        return None;
    }

    // first index whose x is not below the query
    let (mut lo, mut hi) = (0usize, len);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        match x_at(mid) {
            Some(x) if x < query => lo = mid + 1,
            _ => hi = mid,
        }
    }

    let distance = |i: usize| x_at(i).map_or(f64::INFINITY, |x| (x - query).abs());
    let left = lo.checked_sub(1).map(|i| (i, distance(i)));
    let right = (lo < len).then(|| (lo, distance(lo)));

    let best = match (left, right) {
        (Some(l), Some(r)) => {
            if l.1 <= r.1 { l } else { r }
        }
        (Some(l), None) => l,
        (None, Some(r)) => r,
        (None, None) => return None,
    };

    best.1.is_finite().then_some(best.0)
}

/// Category slot under a pixel position on a band scale (clamped)
pub fn find_band_index(band: &BandScale, query_px: f64) -> Option<usize> {
    band.index_at(query_px)
}

/// Nearest rendered point to `query` within `threshold` pixels.
///
/// O(n) scan; meant for on-screen point counts.
pub fn find_nearest_point(points: &[(f64, f64)], query: (f64, f64), threshold: f64) -> Option<usize> {
    let limit = threshold * threshold;

    points
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| {
            let dx = x - query.0;
            let dy = y - query.1;
            (i, dx * dx + dy * dy)
        })
        .filter(|&(_, d)| d.is_finite() && d <= limit)
        .fold(None, |best: Option<(usize, f64)>, (i, d)| match best {
            Some((_, bd)) if bd <= d => best,
            _ => Some((i, d)),
        })
        .map(|(i, _)| i)
}
