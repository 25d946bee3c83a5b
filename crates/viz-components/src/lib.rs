//! # viz-components
//!
//! Leptos SVG components for viz-charts.
//!
//! A [`ChartContainer`] owns one chart context and measures itself; the
//! renderers placed inside it (series, axes, grid, crosshair) read the
//! context and draw into the plot area.

pub mod animate;
pub mod axis;
pub mod container;
pub mod overlay;
pub mod series;

pub use animate::*;
pub use axis::*;
pub use container::*;
pub use overlay::*;
pub use series::*;

pub use viz_state::{ChartConfig, ChartContext, ChartKind, XAxisType, use_chart_context};
