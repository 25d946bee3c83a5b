//! SVG path generation: line, step and monotone curves plus area outlines

use std::fmt::Write;

// ============================================================================
// STRATEGY PATTERN: Path Generator Trait
// ============================================================================

/// Strategy trait for path generation
pub trait PathGenerator: Send + Sync {
    fn generate(&self, points: &[(f64, f64)]) -> String;

    /// Continue an existing path through `points` (first point joined with a line)
    fn append(&self, builder: PathBuilder, points: &[(f64, f64)]) -> PathBuilder {
        let path = self.generate(points);
        // generators start with "M"; swap it for "L" to keep the outline connected
        builder.raw(&path.replacen('M', "L", 1))
    }
}

/// Line path generator
#[derive(Debug, Clone, Default)]
pub struct LinePath;

impl PathGenerator for LinePath {
    fn generate(&self, points: &[(f64, f64)]) -> String {
        let Some((&(x, y), rest)) = points.split_first() else {
            return String::new();
        };

        let mut builder = PathBuilder::with_capacity(points.len() * 20).move_to(x, y);
        for &(x, y) in rest {
            builder = builder.line_to(x, y);
        }
        builder.build()
    }
}

/// Step path generator (for step charts)
#[derive(Debug, Clone, Default)]
pub struct StepPath {
    pub step_position: StepPosition,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StepPosition {
    #[default]
    Before,
    After,
    Middle,
}

impl PathGenerator for StepPath {
    fn generate(&self, points: &[(f64, f64)]) -> String {
        let Some(&(x, y)) = points.first() else {
            return String::new();
        };

        let mut builder = PathBuilder::with_capacity(points.len() * 30).move_to(x, y);

        for pair in points.windows(2) {
            let (x0, _) = pair[0];
            let (x1, y1) = pair[1];

            builder = match self.step_position {
                StepPosition::Before => builder.vertical_to(y1).horizontal_to(x1),
                StepPosition::After => builder.horizontal_to(x1).vertical_to(y1),
                StepPosition::Middle => {
                    let mid_x = (x0 + x1) / 2.0;
                    builder.horizontal_to(mid_x).vertical_to(y1).horizontal_to(x1)
                }
            };
        }

        builder.build()
    }
}

/// Monotone cubic interpolation along x: smooth, never overshoots the data
#[derive(Debug, Clone, Default)]
pub struct MonotonePath;

fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

fn secant(a: (f64, f64), b: (f64, f64)) -> f64 {
    let h = b.0 - a.0;
    if h == 0.0 { 0.0 } else { (b.1 - a.1) / h }
}

/// Tangent at an interior point (Fritsch–Carlson / Steffen limiting)
fn interior_tangent(p0: (f64, f64), p1: (f64, f64), p2: (f64, f64)) -> f64 {
    let h0 = p1.0 - p0.0;
    let h1 = p2.0 - p1.0;
    let s0 = secant(p0, p1);
    let s1 = secant(p1, p2);
    let p = if h0 + h1 == 0.0 { 0.0 } else { (s0 * h1 + s1 * h0) / (h0 + h1) };
    let t = (sign(s0) + sign(s1)) * s0.abs().min(s1.abs()).min(0.5 * p.abs());
    if t.is_finite() { t } else { 0.0 }
}

/// Tangent at an end point from its neighbour's tangent
fn end_tangent(a: (f64, f64), b: (f64, f64), neighbour: f64) -> f64 {
    if b.0 - a.0 == 0.0 {
        neighbour
    } else {
        (3.0 * secant(a, b) - neighbour) / 2.0
    }
}

impl PathGenerator for MonotonePath {
    fn generate(&self, points: &[(f64, f64)]) -> String {
        let n = points.len();
        if n < 3 {
            return LinePath.generate(points);
        }

        let mut tangents = vec![0.0; n];
        for i in 1..n - 1 {
            tangents[i] = interior_tangent(points[i - 1], points[i], points[i + 1]);
        }
        tangents[0] = end_tangent(points[0], points[1], tangents[1]);
        tangents[n - 1] = end_tangent(points[n - 2], points[n - 1], tangents[n - 2]);

        let (x, y) = points[0];
        let mut builder = PathBuilder::with_capacity(n * 60).move_to(x, y);
        for i in 0..n - 1 {
            let (x0, y0) = points[i];
            let (x1, y1) = points[i + 1];
            let dx = (x1 - x0) / 3.0;
            builder = builder.cubic_to(
                x0 + dx,
                y0 + dx * tangents[i],
                x1 - dx,
                y1 - dx * tangents[i + 1],
                x1,
                y1,
            );
        }
        builder.build()
    }
}

/// Curve interpolation selected by configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CurveKind {
    Linear,
    #[default]
    Monotone,
    Step(StepPosition),
}

impl CurveKind {
    pub fn generate(&self, points: &[(f64, f64)]) -> String {
        match *self {
            Self::Linear => LinePath.generate(points),
            Self::Monotone => MonotonePath.generate(points),
            Self::Step(step_position) => StepPath { step_position }.generate(points),
        }
    }

    fn append(&self, builder: PathBuilder, points: &[(f64, f64)]) -> PathBuilder {
        match *self {
            Self::Linear => LinePath.append(builder, points),
            Self::Monotone => MonotonePath.append(builder, points),
            Self::Step(step_position) => StepPath { step_position }.append(builder, points),
        }
    }
}

// ============================================================================
// PATH BUILDER (fluent API)
// ============================================================================

/// SVG path builder with fluent API
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    commands: String,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: String::with_capacity(capacity),
        }
    }

    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        let _ = write!(self.commands, "M{:.2},{:.2}", x, y);
        self
    }

    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        let _ = write!(self.commands, "L{:.2},{:.2}", x, y);
        self
    }

    pub fn horizontal_to(mut self, x: f64) -> Self {
        let _ = write!(self.commands, "H{:.2}", x);
        self
    }

    pub fn vertical_to(mut self, y: f64) -> Self {
        let _ = write!(self.commands, "V{:.2}", y);
        self
    }

    pub fn cubic_to(mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) -> Self {
        let _ = write!(
            self.commands,
            "C{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
            x1, y1, x2, y2, x, y
        );
        self
    }

    /// Append pre-built path commands
    pub fn raw(mut self, commands: &str) -> Self {
        self.commands.push_str(commands);
        self
    }

    pub fn close(mut self) -> Self {
        self.commands.push('Z');
        self
    }

    pub fn build(self) -> String {
        self.commands
    }
}

// ============================================================================
// AREA PATHS
// ============================================================================

/// Closed area path between the curve and a horizontal baseline
pub fn area_path(points: &[(f64, f64)], baseline_y: f64, curve: CurveKind) -> String {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return String::new();
    };

    let builder = PathBuilder::new().move_to(first.0, baseline_y);
    curve
        .append(builder, points)
        .line_to(last.0, baseline_y)
        .close()
        .build()
}

/// Closed area between an upper and a lower edge (stacked areas).
/// Both edges run left to right.
pub fn area_band_path(upper: &[(f64, f64)], lower: &[(f64, f64)], curve: CurveKind) -> String {
    if upper.is_empty() {
        return String::new();
    }

    let reversed_lower: Vec<(f64, f64)> = lower.iter().rev().copied().collect();
    let builder = PathBuilder::new().raw(&curve.generate(upper));
    curve.append(builder, &reversed_lower).close().build()
}

/// Generate line path (non-closed)
pub fn line_path(points: &[(f64, f64)]) -> String {
    LinePath.generate(points)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_builder() {
        let path = PathBuilder::new()
            .move_to(0.0, 0.0)
            .line_to(100.0, 100.0)
            .close()
            .build();

        assert!(path.contains("M0.00,0.00"));
        assert!(path.contains("L100.00,100.00"));
        assert!(path.contains("Z"));
    }

    #[test]
    fn test_line_path_generator() {
        let path = LinePath.generate(&[(0.0, 0.0), (50.0, 50.0), (100.0, 0.0)]);

        assert!(path.starts_with("M0.00,0.00"));
        assert!(path.contains("L50.00,50.00"));
        assert!(LinePath.generate(&[]).is_empty());
    }

    #[test]
    fn test_step_path() {
        let path = StepPath::default().generate(&[(0.0, 0.0), (10.0, 5.0)]);
        assert_eq!(path, "M0.00,0.00V5.00H10.00");

        let path = StepPath { step_position: StepPosition::Middle }.generate(&[(0.0, 0.0), (10.0, 5.0)]);
        assert_eq!(path, "M0.00,0.00H5.00V5.00H10.00");
    }

    #[test]
    fn test_monotone_path() {
        let path = MonotonePath.generate(&[(0.0, 0.0), (10.0, 10.0), (20.0, 20.0)]);
        assert!(path.starts_with("M0.00,0.00C"));
        assert_eq!(path.matches('C').count(), 2);
        // collinear data stays on the line
        assert!(path.contains("C3.33,3.33,6.67,6.67,10.00,10.00"));

        // fewer than three points falls back to straight segments
        assert_eq!(MonotonePath.generate(&[(0.0, 0.0), (1.0, 1.0)]), "M0.00,0.00L1.00,1.00");
    }

    #[test]
    fn test_monotone_flat_extremum_does_not_overshoot() {
        let path = MonotonePath.generate(&[(0.0, 0.0), (10.0, 10.0), (20.0, 0.0)]);
        // tangent at the peak is zero: control points share its y
        assert!(path.contains("6.67,10.00,10.00,10.00"));
    }

    #[test]
    fn test_area_path() {
        let path = area_path(&[(0.0, 10.0), (10.0, 5.0)], 20.0, CurveKind::Linear);
        assert_eq!(path, "M0.00,20.00L0.00,10.00L10.00,5.00L10.00,20.00Z");
        assert!(area_path(&[], 20.0, CurveKind::Linear).is_empty());
    }

    #[test]
    fn test_area_band_path() {
        let upper = [(0.0, 2.0), (10.0, 1.0)];
        let lower = [(0.0, 5.0), (10.0, 4.0)];
        let path = area_band_path(&upper, &lower, CurveKind::Linear);
        assert_eq!(
            path,
            "M0.00,2.00L10.00,1.00L10.00,4.00L0.00,5.00Z"
        );
    }
}
