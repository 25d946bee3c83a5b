//! Chart layout: margins, container size and inner plotting bounds

use serde::{Deserialize, Serialize};

/// Chart margin configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartMargin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl ChartMargin {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self { top, right, bottom, left }
    }

    pub const fn uniform(margin: f64) -> Self {
        Self::new(margin, margin, margin, margin)
    }

    pub const fn symmetric(vertical: f64, horizontal: f64) -> Self {
        Self::new(vertical, horizontal, vertical, horizontal)
    }

    /// Compact margins for sparklines
    pub const fn compact() -> Self {
        Self::new(2.0, 2.0, 2.0, 2.0)
    }

    /// Standard chart margins (room for a left value axis and bottom labels)
    pub const fn standard() -> Self {
        Self::new(20.0, 20.0, 40.0, 50.0)
    }

    /// Layout with a second value axis on the right
    pub const fn dual_axis() -> Self {
        Self::new(20.0, 50.0, 40.0, 50.0)
    }

    /// Negative and NaN sides become zero
    fn sanitized(self) -> Self {
        Self::new(
            non_negative(self.top),
            non_negative(self.right),
            non_negative(self.bottom),
            non_negative(self.left),
        )
    }
}

impl Default for ChartMargin {
    fn default() -> Self {
        Self::standard()
    }
}

/// Partial margin: unset sides fall back to the base margin
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MarginOverrides {
    pub top: Option<f64>,
    pub right: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
}

impl MarginOverrides {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn top(mut self, v: f64) -> Self {
        self.top = Some(v);
        self
    }

    pub fn right(mut self, v: f64) -> Self {
        self.right = Some(v);
        self
    }

    pub fn bottom(mut self, v: f64) -> Self {
        self.bottom = Some(v);
        self
    }

    pub fn left(mut self, v: f64) -> Self {
        self.left = Some(v);
        self
    }

    /// Apply the overrides on top of `base`
    pub fn resolve(&self, base: ChartMargin) -> ChartMargin {
        ChartMargin {
            top: self.top.unwrap_or(base.top),
            right: self.right.unwrap_or(base.right),
            bottom: self.bottom.unwrap_or(base.bottom),
            left: self.left.unwrap_or(base.left),
        }
    }
}

impl From<ChartMargin> for MarginOverrides {
    fn from(m: ChartMargin) -> Self {
        Self {
            top: Some(m.top),
            right: Some(m.right),
            bottom: Some(m.bottom),
            left: Some(m.left),
        }
    }
}

/// Measured container size in CSS pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

impl ContainerSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Not yet measured (or collapsed)
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Chart dimensions with margin handling
///
/// Always produced whole by [`calculate_dimensions`]; never patched field by field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartDimensions {
    pub width: f64,
    pub height: f64,
    pub inner_width: f64,
    pub inner_height: f64,
    pub margin: ChartMargin,
}

impl ChartDimensions {
    /// SVG transform for inner chart area
    pub fn inner_transform(&self) -> String {
        format!("translate({}, {})", self.margin.left, self.margin.top)
    }

    /// ViewBox string for SVG
    pub fn viewbox(&self) -> String {
        format!("0 0 {} {}", self.width, self.height)
    }

    /// Convert container coordinates into inner plot coordinates
    pub fn to_inner(&self, x: f64, y: f64) -> (f64, f64) {
        (x - self.margin.left, y - self.margin.top)
    }

    /// Whether an inner-plot coordinate lies within the plotting bounds
    pub fn contains_inner(&self, x: f64, y: f64) -> bool {
        x >= 0.0 && x <= self.inner_width && y >= 0.0 && y <= self.inner_height
    }

    pub fn container(&self) -> ContainerSize {
        ContainerSize::new(self.width, self.height)
    }
}

impl Default for ChartDimensions {
    fn default() -> Self {
        calculate_dimensions(0.0, 0.0, MarginOverrides::none())
    }
}

/// Container size + margin overrides -> inner plotting bounds
///
/// Inner sizes clamp to zero when margins exceed the container.
pub fn calculate_dimensions(width: f64, height: f64, overrides: MarginOverrides) -> ChartDimensions {
    let width = non_negative(width);
    let height = non_negative(height);
    let margin = overrides.resolve(ChartMargin::default()).sanitized();

    ChartDimensions {
        width,
        height,
        inner_width: (width - margin.left - margin.right).max(0.0),
        inner_height: (height - margin.top - margin.bottom).max(0.0),
        margin,
    }
}

fn non_negative(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_margins_after_resize() {
        let dims = calculate_dimensions(400.0, 300.0, MarginOverrides::none());
        assert_eq!(dims.inner_width, 330.0);
        assert_eq!(dims.inner_height, 240.0);
        assert_eq!(dims.margin, ChartMargin::new(20.0, 20.0, 40.0, 50.0));
    }

    #[test]
    fn test_unmeasured_container() {
        let dims = calculate_dimensions(0.0, 0.0, MarginOverrides::none());
        assert_eq!(dims.inner_width, 0.0);
        assert_eq!(dims.inner_height, 0.0);
    }

    #[test]
    fn test_margins_exceeding_container_clamp_to_zero() {
        for (w, h) in [(0.0, 0.0), (10.0, 5.0), (69.0, 59.0), (70.0, 60.0), (71.0, 61.0)] {
            let dims = calculate_dimensions(w, h, MarginOverrides::none());
            assert!(dims.inner_width >= 0.0);
            assert!(dims.inner_height >= 0.0);
        }

        let dims = calculate_dimensions(100.0, 100.0, ChartMargin::uniform(80.0).into());
        assert_eq!(dims.inner_width, 0.0);
        assert_eq!(dims.inner_height, 0.0);
    }

    #[test]
    fn test_partial_overrides() {
        let dims = calculate_dimensions(200.0, 100.0, MarginOverrides::none().left(10.0).bottom(0.0));
        assert_eq!(dims.margin.left, 10.0);
        assert_eq!(dims.margin.right, 20.0);
        assert_eq!(dims.inner_width, 170.0);
        assert_eq!(dims.inner_height, 80.0);
    }

    #[test]
    fn test_negative_and_nan_inputs() {
        let dims = calculate_dimensions(-50.0, f64::NAN, MarginOverrides::none().top(-5.0));
        assert_eq!(dims.width, 0.0);
        assert_eq!(dims.height, 0.0);
        assert_eq!(dims.margin.top, 0.0);
        assert_eq!(dims.inner_height, 0.0);
    }

    #[test]
    fn test_inner_coordinates() {
        let dims = calculate_dimensions(400.0, 300.0, MarginOverrides::none());
        assert_eq!(dims.to_inner(60.0, 30.0), (10.0, 10.0));
        assert!(dims.contains_inner(10.0, 10.0));
        assert!(!dims.contains_inner(-1.0, 10.0));
        assert!(!dims.contains_inner(331.0, 10.0));
        assert_eq!(dims.inner_transform(), "translate(50, 20)");
    }
}
