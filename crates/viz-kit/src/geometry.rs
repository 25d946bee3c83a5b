//! Series geometry: pixel-space shapes for line, area, bar and scatter series
//!
//! Everything here is computed from data plus already-built scales, so the
//! renderers only have to emit SVG. Missing or non-numeric values are skipped.

use crate::animation::lerp;
use crate::domain::StackSegment;
use crate::path::{CurveKind, area_band_path};
use crate::scale::{BandScale, ChartScale, Scale};
use serde::{Deserialize, Serialize};
use viz_core::DataPoint;

/// Projected data point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    /// Index of the source point in the data
    pub index: usize,
    pub x: f64,
    pub y: f64,
}

impl SeriesPoint {
    pub fn xy(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// Bar layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Categories along x, values along y
    #[default]
    Vertical,
    /// Categories along y, values along x
    Horizontal,
}

/// Pixel position of the value zero, clamped into the scale's domain.
/// Non-linear scales use the range start.
pub fn baseline_px(scale: &ChartScale) -> f64 {
    match scale {
        ChartScale::Linear(s) => {
            let (a, b) = s.domain_bounds();
            s.scale(0.0_f64.clamp(a.min(b), a.max(b)))
        }
        other => other.range_bounds().0,
    }
}

// ============================================================================
// LINE / AREA
// ============================================================================

/// Points of one series in data order; points without a numeric `y_key`
/// or without an x position are left out
pub fn line_points(
    data: &[DataPoint],
    x_key: &str,
    y_key: &str,
    x: &ChartScale,
    y: &ChartScale,
) -> Vec<SeriesPoint> {
    data.iter()
        .enumerate()
        .filter_map(|(index, point)| {
            let px = x.position(point.get(x_key)?)?;
            let py = y.scale_number(point.number(y_key)?)?;
            Some(SeriesPoint { index, x: px, y: py })
        })
        .collect()
}

/// SVG path through `points`
pub fn points_path(points: &[SeriesPoint], curve: CurveKind) -> String {
    let xy: Vec<(f64, f64)> = points.iter().map(SeriesPoint::xy).collect();
    curve.generate(&xy)
}

/// Filled area: an upper edge over a lower edge of equal length
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AreaGeometry {
    pub upper: Vec<SeriesPoint>,
    pub lower: Vec<SeriesPoint>,
}

impl AreaGeometry {
    /// Area between the series and a flat baseline
    pub fn from_baseline(upper: Vec<SeriesPoint>, baseline_y: f64) -> Self {
        let lower = upper.iter().map(|p| SeriesPoint { y: baseline_y, ..*p }).collect();
        Self { upper, lower }
    }

    /// Area of one stacked layer; gaps in the stack are skipped
    pub fn stacked(
        data: &[DataPoint],
        x_key: &str,
        segments: &[StackSegment],
        x: &ChartScale,
        y: &ChartScale,
    ) -> Self {
        let mut upper = Vec::new();
        let mut lower = Vec::new();

        for (index, (point, segment)) in data.iter().zip(segments).enumerate() {
            let Some((y0, y1)) = *segment else { continue };
            let Some(px) = point.get(x_key).and_then(|v| x.position(v)) else {
                continue;
            };
            let (Some(top), Some(bottom)) = (y.scale_number(y1), y.scale_number(y0)) else {
                continue;
            };
            upper.push(SeriesPoint { index, x: px, y: top });
            lower.push(SeriesPoint { index, x: px, y: bottom });
        }

        Self { upper, lower }
    }

    pub fn is_empty(&self) -> bool {
        self.upper.is_empty()
    }

    pub fn path(&self, curve: CurveKind) -> String {
        let upper: Vec<(f64, f64)> = self.upper.iter().map(SeriesPoint::xy).collect();
        let lower: Vec<(f64, f64)> = self.lower.iter().map(SeriesPoint::xy).collect();
        area_band_path(&upper, &lower, curve)
    }

    /// Top edge only (the stroke drawn over the fill)
    pub fn line_path(&self, curve: CurveKind) -> String {
        points_path(&self.upper, curve)
    }

    /// Grow out of the lower edge
    pub fn animate(&self, t: f64) -> Self {
        let upper = self
            .upper
            .iter()
            .zip(&self.lower)
            .map(|(u, l)| SeriesPoint {
                y: lerp(l.y, u.y, t),
                ..*u
            })
            .collect();
        Self {
            upper,
            lower: self.lower.clone(),
        }
    }
}

/// Interpolated points for frame `t`.
///
/// With a previous geometry of the same length, points move from their old
/// positions (data update); otherwise they rise from `baseline_y` (entrance).
pub fn animate_points(
    target: &[SeriesPoint],
    previous: Option<&[SeriesPoint]>,
    baseline_y: f64,
    t: f64,
) -> Vec<SeriesPoint> {
    match previous {
        Some(prev) if prev.len() == target.len() => target
            .iter()
            .zip(prev)
            .map(|(to, from)| SeriesPoint {
                index: to.index,
                x: lerp(from.x, to.x, t),
                y: lerp(from.y, to.y, t),
            })
            .collect(),
        _ => target
            .iter()
            .map(|p| SeriesPoint {
                y: lerp(baseline_y, p.y, t),
                ..*p
            })
            .collect(),
    }
}

// ============================================================================
// SCATTER
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterMarker {
    pub index: usize,
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

pub fn scatter_markers(
    data: &[DataPoint],
    x_key: &str,
    y_key: &str,
    x: &ChartScale,
    y: &ChartScale,
    radius: f64,
) -> Vec<ScatterMarker> {
    line_points(data, x_key, y_key, x, y)
        .into_iter()
        .map(|p| ScatterMarker {
            index: p.index,
            cx: p.x,
            cy: p.y,
            r: radius,
        })
        .collect()
}

impl ScatterMarker {
    /// Marker radius grows with progress
    pub fn animate(&self, t: f64) -> Self {
        Self {
            r: self.r * t.clamp(0.0, 1.0),
            ..self.clone()
        }
    }
}

// ============================================================================
// BARS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct BarRect {
    pub index: usize,
    pub key: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BarRect {
    /// Grow out of the value-axis baseline
    pub fn animate(&self, baseline: f64, orientation: Orientation, t: f64) -> Self {
        let mut out = self.clone();
        match orientation {
            Orientation::Vertical => {
                let (a, b) = (lerp(baseline, self.y, t), lerp(baseline, self.y + self.height, t));
                out.y = a.min(b);
                out.height = (b - a).abs();
            }
            Orientation::Horizontal => {
                let (a, b) = (lerp(baseline, self.x, t), lerp(baseline, self.x + self.width, t));
                out.x = a.min(b);
                out.width = (b - a).abs();
            }
        }
        out
    }
}

/// Layout knobs for [`bar_rects`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarLayout {
    pub orientation: Orientation,
    pub stacked: bool,
    /// Inner padding between grouped bars within one category
    pub group_padding: f64,
}

impl Default for BarLayout {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            stacked: false,
            group_padding: 0.1,
        }
    }
}

/// Bars for the visible `keys`.
///
/// `category` must be a band scale (x for vertical bars, y for horizontal ones);
/// anything else logs a warning and yields no bars. Grouped bars share each band
/// through a sub-band per key; stacked bars use the full band.
pub fn bar_rects(
    data: &[DataPoint],
    x_key: &str,
    keys: &[&str],
    category: &ChartScale,
    value: &ChartScale,
    layout: BarLayout,
) -> Vec<BarRect> {
    let Some(band) = category.as_band() else {
        tracing::warn!(
            orientation = ?layout.orientation,
            kind = ?category.kind(),
            "bar series needs a band scale on its category axis; nothing rendered"
        );
        return Vec::new();
    };
    if keys.is_empty() || band.is_empty() {
        return Vec::new();
    }

    let baseline = baseline_px(value);
    let mut rects = Vec::new();

    if layout.stacked {
        let stack = crate::domain::stack_series(data, keys);
        for (k, key) in keys.iter().enumerate() {
            for (index, point) in data.iter().enumerate() {
                let Some((y0, y1)) = stack[k][index] else { continue };
                let Some(slot) = point.category(x_key).and_then(|c| band.scale(&c)) else {
                    continue;
                };
                let (Some(a), Some(b)) = (value.scale_number(y0), value.scale_number(y1)) else {
                    continue;
                };
                rects.push(place(index, key, slot, band.bandwidth(), a, b, layout.orientation));
            }
        }
    } else {
        let sub = BandScale::new(keys)
            .range(0.0, band.bandwidth())
            .padding(layout.group_padding, 0.0);
        for (index, point) in data.iter().enumerate() {
            let Some(slot) = point.category(x_key).and_then(|c| band.scale(&c)) else {
                continue;
            };
            for (k, key) in keys.iter().enumerate() {
                let Some(v) = point.number(key).and_then(|v| value.scale_number(v)) else {
                    continue;
                };
                let offset = slot + sub.scale_index(k);
                rects.push(place(index, key, offset, sub.bandwidth(), baseline, v, layout.orientation));
            }
        }
    }

    rects
}

/// Rectangle spanning `[a, b]` on the value axis and `[start, start + thickness]`
/// on the category axis
fn place(
    index: usize,
    key: &str,
    start: f64,
    thickness: f64,
    a: f64,
    b: f64,
    orientation: Orientation,
) -> BarRect {
    let (lo, len) = (a.min(b), (b - a).abs());
    match orientation {
        Orientation::Vertical => BarRect {
            index,
            key: key.to_string(),
            x: start,
            y: lo,
            width: thickness,
            height: len,
        },
        Orientation::Horizontal => BarRect {
            index,
            key: key.to_string(),
            x: lo,
            y: start,
            width: len,
            height: thickness,
        },
    }
}
