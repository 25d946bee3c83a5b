//! Chart configuration

use serde::{Deserialize, Serialize};
use viz_core::{MarginOverrides, SeriesConfig, SeriesEntry};
use viz_kit::{AnimationConfig, CurveKind, DEFAULT_AXIS_TICKS, Orientation, TooltipConfig};

/// Bar layout: categories along x (`Vertical`) or along y (`Horizontal`)
pub type Layout = Orientation;

/// Series renderer family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Line,
    Area,
    Bar,
    Scatter,
}

impl ChartKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Line => "Line",
            Self::Area => "Area",
            Self::Bar => "Bar",
            Self::Scatter => "Scatter",
        }
    }
}

/// How x values are read and which scale they get
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum XAxisType {
    /// Strings (or anything) as band categories
    #[default]
    Category,
    /// Numbers on a linear scale
    Number,
    /// Dates on a time scale
    Time,
}

/// Full description of one chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub kind: ChartKind,
    pub x_key: String,
    pub x_axis: XAxisType,
    pub layout: Layout,
    /// Configured series; when empty every numeric key except `x_key` is drawn
    pub series: Vec<SeriesEntry>,
    pub margin: MarginOverrides,
    pub nice: bool,
    pub stacked: bool,
    pub include_zero: bool,
    pub curve: CurveKind,
    /// Scatter marker radius
    pub point_radius: f64,
    /// Band padding for categorical axes
    pub band_padding: f64,
    pub tick_count: usize,
    pub animation: AnimationConfig,
    pub tooltip: TooltipConfig,
    /// Custom palette; empty uses the default one
    pub palette: Vec<String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            kind: ChartKind::Line,
            x_key: "x".to_string(),
            x_axis: XAxisType::Category,
            layout: Layout::Vertical,
            series: Vec::new(),
            margin: MarginOverrides::none(),
            nice: true,
            stacked: false,
            include_zero: false,
            curve: CurveKind::Monotone,
            point_radius: 4.0,
            band_padding: 0.0,
            tick_count: DEFAULT_AXIS_TICKS,
            animation: AnimationConfig::default(),
            tooltip: TooltipConfig::default(),
            palette: Vec::new(),
        }
    }
}

impl ChartConfig {
    pub fn new(kind: ChartKind, x_key: impl Into<String>) -> Self {
        Self {
            kind,
            x_key: x_key.into(),
            ..Default::default()
        }
    }

    /// Line chart over dates
    pub fn time_series(x_key: impl Into<String>) -> Self {
        Self {
            x_axis: XAxisType::Time,
            ..Self::new(ChartKind::Line, x_key)
        }
    }

    /// Grouped bar chart over categories
    pub fn bars(x_key: impl Into<String>) -> Self {
        Self {
            band_padding: 0.2,
            include_zero: true,
            ..Self::new(ChartKind::Bar, x_key)
        }
    }

    /// Scatter chart over numeric x
    pub fn scatter(x_key: impl Into<String>) -> Self {
        Self {
            x_axis: XAxisType::Number,
            ..Self::new(ChartKind::Scatter, x_key)
        }
    }

    pub fn series(mut self, key: impl Into<String>, config: SeriesConfig) -> Self {
        self.series.push(SeriesEntry::new(key, config));
        self
    }

    pub fn x_axis(mut self, x_axis: XAxisType) -> Self {
        self.x_axis = x_axis;
        self
    }

    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn margin(mut self, margin: MarginOverrides) -> Self {
        self.margin = margin;
        self
    }

    pub fn nice(mut self, nice: bool) -> Self {
        self.nice = nice;
        self
    }

    pub fn stacked(mut self, stacked: bool) -> Self {
        self.stacked = stacked;
        self
    }

    pub fn include_zero(mut self, include_zero: bool) -> Self {
        self.include_zero = include_zero;
        self
    }

    pub fn curve(mut self, curve: CurveKind) -> Self {
        self.curve = curve;
        self
    }

    pub fn point_radius(mut self, radius: f64) -> Self {
        self.point_radius = radius;
        self
    }

    pub fn band_padding(mut self, padding: f64) -> Self {
        self.band_padding = padding;
        self
    }

    pub fn animation(mut self, animation: AnimationConfig) -> Self {
        self.animation = animation;
        self
    }

    pub fn tooltip(mut self, tooltip: TooltipConfig) -> Self {
        self.tooltip = tooltip;
        self
    }

    pub fn palette(mut self, palette: Vec<String>) -> Self {
        self.palette = palette;
        self
    }

    /// Value axis pulls zero into view (bars and stacks always do)
    pub fn value_includes_zero(&self) -> bool {
        self.include_zero || self.stacked || self.kind == ChartKind::Bar
    }

    /// Categories run along y
    pub fn is_horizontal(&self) -> bool {
        self.kind == ChartKind::Bar && self.layout == Layout::Horizontal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let bars = ChartConfig::bars("month");
        assert_eq!(bars.kind, ChartKind::Bar);
        assert_eq!(bars.x_axis, XAxisType::Category);
        assert!(bars.value_includes_zero());

        let line = ChartConfig::time_series("date");
        assert_eq!(line.x_axis, XAxisType::Time);
        assert!(!line.value_includes_zero());
        assert!(!line.layout(Layout::Horizontal).is_horizontal());
    }

    #[test]
    fn test_series_builder_keeps_order() {
        let config = ChartConfig::default()
            .series("b", SeriesConfig::new("B"))
            .series("a", SeriesConfig::new("A"));
        let keys: Vec<&str> = config.series.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }
}
