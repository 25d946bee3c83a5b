//! # viz-kit
//!
//! D3.js-style charting primitives for viz-charts. Pure computation only:
//! nothing here touches the DOM except the browser frame driver.
//!
//! ## Architecture
//!
//! Uses Strategy pattern for:
//! - Scale computation (linear, time, band)
//! - Path generation (line, step, monotone, area)
//! - Animation frame sources
//!
//! ## Modules
//!
//! - `scale` - Scale factory and the tagged `ChartScale`
//! - `path` - SVG path builders and curve generators
//! - `domain` - Extents, value domains, stacking
//! - `closest` - Bisection, band lookup and radius hit-testing
//! - `tooltip` - Tooltip content, placement and controller
//! - `animation` - Easing and the frame-driven scheduler
//! - `axis` - Tick generation for axes and grids
//! - `geometry` - Pixel geometry for line, area, bar and scatter series

pub mod animation;
pub mod axis;
pub mod closest;
pub mod domain;
pub mod geometry;
pub mod path;
pub mod scale;
pub mod tooltip;

pub use animation::*;
pub use axis::*;
pub use closest::*;
pub use domain::*;
pub use geometry::*;
pub use path::*;
pub use scale::*;
pub use tooltip::*;

// Re-export colors from viz-core for convenience
pub use viz_core::colors;
