//! # viz-state
//!
//! Reactive chart context for viz-charts.
//! One `ChartContext` per chart instance: raw inputs live in signals, and
//! dimensions, scales, colors and legend are memos derived from them through
//! the pure pipeline in [`model`]. Renderers read; only the mutators write.

pub mod config;
pub mod model;

pub use config::*;
pub use model::*;

use leptos::prelude::*;
use viz_core::{
    ChartDimensions, ColorResolver, ContainerSize, DataPoint, HiddenSeries, HoverState,
    SeriesEntry,
};
use viz_kit::{TooltipController, TooltipState};

// ============================================================================
// CHART CONTEXT
// ============================================================================

/// Writable halves of the context's input signals; only the mutators see them
#[derive(Clone, Copy)]
struct Inputs {
    config: RwSignal<ChartConfig>,
    data: RwSignal<Vec<DataPoint>>,
    size: RwSignal<ContainerSize>,
    hidden: RwSignal<HiddenSeries>,
    hover: RwSignal<HoverState>,
    mouse: RwSignal<Option<(f64, f64)>>,
    tooltip: RwSignal<TooltipState>,
}

/// Per-chart reactive state (cheap to copy; all fields are arena handles)
#[derive(Clone, Copy)]
pub struct ChartContext {
    pub config: ReadSignal<ChartConfig>,
    pub data: ReadSignal<Vec<DataPoint>>,
    /// Measured container size
    pub size: ReadSignal<ContainerSize>,
    pub hidden: ReadSignal<HiddenSeries>,
    pub hover: ReadSignal<HoverState>,
    /// Pointer in container coordinates; `None` once it left the chart
    pub mouse: ReadSignal<Option<(f64, f64)>>,
    pub tooltip: ReadSignal<TooltipState>,

    pub dimensions: Memo<ChartDimensions>,
    pub series: Memo<Vec<SeriesEntry>>,
    pub colors: Memo<ColorResolver>,
    pub scales: Memo<ChartScales>,
    pub legend: Memo<Vec<LegendItem>>,
    /// Pixel x of the hovered point
    pub crosshair: Memo<Option<f64>>,

    inputs: Inputs,
    controller: StoredValue<TooltipController>,
}

impl ChartContext {
    pub fn new(config: ChartConfig, data: Vec<DataPoint>) -> Self {
        let controller = StoredValue::new(TooltipController::new(config.tooltip));

        let inputs = Inputs {
            config: RwSignal::new(config),
            data: RwSignal::new(data),
            size: RwSignal::new(ContainerSize::default()),
            hidden: RwSignal::new(HiddenSeries::new()),
            hover: RwSignal::new(HoverState::cleared()),
            mouse: RwSignal::new(None),
            tooltip: RwSignal::new(TooltipState::Hidden),
        };
        let Inputs { config, data, size, hidden, hover, .. } = inputs;

        let dimensions =
            Memo::new(move |_| config.with(|c| model::compute_dimensions(size.get(), c)));

        let series = Memo::new(move |_| {
            config.with(|c| data.with(|d| model::resolve_series(c, d)))
        });

        let colors = Memo::new(move |_| {
            let palette = config.with(|c| c.palette.clone());
            series.with(|s| ColorResolver::for_series(s, palette))
        });

        let scales = Memo::new(move |_| {
            let dims = dimensions.get();
            config.with(|c| {
                data.with(|d| {
                    series.with(|s| hidden.with(|h| model::compute_scales(d, c, s, h, &dims)))
                })
            })
        });

        let legend = Memo::new(move |_| {
            series.with(|s| hidden.with(|h| colors.with(|cl| model::legend_items(s, h, cl))))
        });

        let crosshair = Memo::new(move |_| {
            hover.with(|hv| config.with(|c| scales.with(|sc| model::crosshair_x(hv, c, sc))))
        });

        Self {
            config: inputs.config.read_only(),
            data: inputs.data.read_only(),
            size: inputs.size.read_only(),
            hidden: inputs.hidden.read_only(),
            hover: inputs.hover.read_only(),
            mouse: inputs.mouse.read_only(),
            tooltip: inputs.tooltip.read_only(),
            dimensions,
            series,
            colors,
            scales,
            legend,
            crosshair,
            inputs,
            controller,
        }
    }

    // ========================================================================
    // Mutators
    // ========================================================================

    /// Replace the data; a stale or emptied hover is dropped
    pub fn set_data(&self, data: Vec<DataPoint>) {
        self.controller.update_value(|c| {
            c.series_changed(&data);
        });
        self.inputs.data.set(data);
        self.refresh();
    }

    pub fn set_config(&self, config: ChartConfig) {
        let tooltip = config.tooltip;
        self.inputs.config.set(config);
        self.controller.set_value(TooltipController::new(tooltip));
        self.refresh();
    }

    /// New container measurement (from the resize observer)
    pub fn set_size(&self, size: ContainerSize) {
        if self.size.get_untracked() == size {
            return;
        }
        self.inputs.size.set(size);
        self.refresh();
    }

    /// Toggle a series on/off; returns `true` when it is now hidden
    pub fn toggle_series(&self, key: &str) -> bool {
        let mut now_hidden = false;
        self.inputs.hidden.update(|h| now_hidden = h.toggle(key));
        tracing::debug!(key, hidden = now_hidden, "series toggled");
        self.refresh();
        now_hidden
    }

    pub fn is_hidden(&self, key: &str) -> bool {
        self.hidden.with(|h| h.is_hidden(key))
    }

    /// Set the hovered point directly (keyboard navigation, linked charts).
    ///
    /// The tooltip follows the new hover: it is anchored at the pointer when
    /// there is one, otherwise at the hovered category.
    pub fn set_hovered_point(&self, hover: HoverState) {
        self.inputs.hover.set(hover);
        self.sync_hover_tooltip();
    }

    /// Pointer moved (`Some`) or left the chart (`None`)
    pub fn set_mouse_position(&self, position: Option<(f64, f64)>) {
        self.inputs.mouse.set(position);
        if position.is_none() {
            self.inputs.hover.set(HoverState::cleared());
        }
        self.refresh();
    }

    pub fn pointer_leave(&self) {
        self.set_mouse_position(None);
    }

    /// Re-run hit-testing for the current pointer against the current data.
    /// Without a pointer, a hover set directly survives while its index is
    /// still in range.
    fn refresh(&self) {
        let Some(mouse) = self.mouse.get_untracked() else {
            let index = self.hover.with_untracked(|h| h.index);
            let hover = index
                .and_then(|i| self.data.with_untracked(|d| d.get(i).cloned().map(|p| (p, i))))
                .map_or_else(HoverState::cleared, |(point, i)| HoverState::new(point, i));
            self.set_hovered_point(hover);
            return;
        };

        let dims = self.dimensions.get_untracked();
        let scales = self.scales.get_untracked();
        let series = self.series.get_untracked();
        let colors = self.colors.get_untracked();

        let (hover, content) = self.config.with_untracked(|config| {
            self.data.with_untracked(|data| {
                self.hidden.with_untracked(|hidden| {
                    let hover =
                        model::locate_hover(data, config, &series, hidden, &scales, &dims, mouse);
                    let content =
                        model::tooltip_content(&hover, config, &series, hidden, &colors, &scales);
                    (hover, content)
                })
            })
        });

        let (ix, iy) = dims.to_inner(mouse.0, mouse.1);
        let inside = dims.contains_inner(ix, iy);
        self.controller.update_value(|c| {
            c.pointer_move(mouse, inside, content, dims.container());
        });

        self.inputs.hover.set(hover);
        self.sync_tooltip();
    }

    /// Tooltip for the current hover, whatever set it
    fn sync_hover_tooltip(&self) {
        let dims = self.dimensions.get_untracked();
        let scales = self.scales.get_untracked();
        let series = self.series.get_untracked();
        let colors = self.colors.get_untracked();

        let resolved = self.config.with_untracked(|config| {
            self.hover.with_untracked(|hover| {
                let content = self.hidden.with_untracked(|hidden| {
                    model::tooltip_content(hover, config, &series, hidden, &colors, &scales)
                })?;
                let anchor = self
                    .mouse
                    .get_untracked()
                    .or_else(|| model::hover_anchor(hover, config, &scales, &dims))?;
                Some((anchor, content))
            })
        });

        self.controller.update_value(|c| match resolved {
            Some((anchor, content)) => {
                c.pointer_move(anchor, true, Some(content), dims.container());
            }
            None => {
                c.pointer_leave();
            }
        });
        self.sync_tooltip();
    }

    fn sync_tooltip(&self) {
        let state = self.controller.with_value(|c| c.state().clone());
        if self.tooltip.get_untracked() != state {
            self.inputs.tooltip.set(state);
        }
    }
}

// ============================================================================
// CONTEXT HELPERS
// ============================================================================

/// Create a chart context and provide it to the component tree below
pub fn provide_chart_context(config: ChartConfig, data: Vec<DataPoint>) -> ChartContext {
    let ctx = ChartContext::new(config, data);
    provide_context(ctx);
    ctx
}

/// Chart context from the nearest chart container.
///
/// Panics when called outside one: a renderer without a chart is a wiring bug.
pub fn use_chart_context() -> ChartContext {
    expect_context::<ChartContext>()
}

/// Chart context, if any (returns None outside a chart container)
pub fn try_use_chart_context() -> Option<ChartContext> {
    use_context::<ChartContext>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use viz_core::SeriesConfig;
    use viz_kit::TooltipConfig;

    fn monthly() -> Vec<DataPoint> {
        vec![
            DataPoint::new().with("month", "Jan").with("sales", 10.0).with("cost", 50.0),
            DataPoint::new().with("month", "Feb").with("sales", 20.0).with("cost", 60.0),
        ]
    }

    fn config() -> ChartConfig {
        ChartConfig::new(ChartKind::Line, "month")
            .nice(false)
            .series("sales", SeriesConfig::new("Sales"))
            .series("cost", SeriesConfig::new("Cost"))
    }

    #[test]
    fn test_resize_updates_dimensions() {
        Owner::new().with(|| {
            let ctx = ChartContext::new(config(), monthly());
            assert_eq!(ctx.dimensions.get_untracked().inner_width, 0.0);

            ctx.set_size(ContainerSize::new(400.0, 300.0));
            let dims = ctx.dimensions.get_untracked();
            assert_eq!((dims.inner_width, dims.inner_height), (330.0, 240.0));
        });
    }

    #[test]
    fn test_toggle_series_changes_domain() {
        Owner::new().with(|| {
            let ctx = ChartContext::new(config(), monthly());
            ctx.set_size(ContainerSize::new(400.0, 300.0));

            let domain = |ctx: &ChartContext| {
                ctx.scales
                    .get_untracked()
                    .y
                    .as_linear()
                    .map(|s| s.domain_bounds())
            };
            assert_eq!(domain(&ctx), Some((10.0, 60.0)));

            assert!(ctx.toggle_series("cost"));
            assert!(ctx.is_hidden("cost"));
            assert_eq!(domain(&ctx), Some((10.0, 20.0)));
            assert!(ctx.legend.get_untracked()[1].hidden);

            assert!(!ctx.toggle_series("cost"));
            assert_eq!(domain(&ctx), Some((10.0, 60.0)));
            // data is retained while hidden
            assert_eq!(ctx.data.get_untracked().len(), 2);
        });
    }

    #[test]
    fn test_pointer_drives_hover_and_tooltip() {
        Owner::new().with(|| {
            let ctx = ChartContext::new(config(), monthly());
            ctx.set_size(ContainerSize::new(400.0, 300.0));

            // right half of the plot area is "Feb"
            ctx.set_mouse_position(Some((50.0 + 250.0, 100.0)));
            assert_eq!(ctx.hover.get_untracked().index, Some(1));
            assert!(ctx.tooltip.get_untracked().is_visible());
            assert!(ctx.crosshair.get_untracked().is_some());

            ctx.pointer_leave();
            assert!(!ctx.hover.get_untracked().is_active());
            assert_eq!(ctx.tooltip.get_untracked(), TooltipState::Hidden);
        });
    }

    #[test]
    fn test_empty_data_clears_tooltip() {
        Owner::new().with(|| {
            let ctx = ChartContext::new(config(), monthly());
            ctx.set_size(ContainerSize::new(400.0, 300.0));
            ctx.set_mouse_position(Some((100.0, 100.0)));
            assert!(ctx.tooltip.get_untracked().is_visible());

            ctx.set_data(Vec::new());
            assert!(!ctx.hover.get_untracked().is_active());
            assert!(!ctx.tooltip.get_untracked().is_visible());
        });
    }

    #[test]
    fn test_set_hovered_point_moves_tooltip() {
        Owner::new().with(|| {
            let ctx = ChartContext::new(config(), monthly());
            ctx.set_size(ContainerSize::new(400.0, 300.0));

            ctx.set_mouse_position(Some((50.0 + 250.0, 100.0)));
            assert_eq!(ctx.tooltip.get_untracked().content().map(|c| c.index), Some(1));

            // linked chart points at Jan while the pointer is still over Feb
            ctx.set_hovered_point(HoverState::new(monthly()[0].clone(), 0));
            assert_eq!(ctx.hover.get_untracked().index, Some(0));
            let tooltip = ctx.tooltip.get_untracked();
            assert_eq!(tooltip.content().map(|c| c.title.as_str()), Some("Jan"));
            assert_eq!(tooltip.content().map(|c| c.index), Some(0));

            ctx.set_hovered_point(HoverState::cleared());
            assert_eq!(ctx.tooltip.get_untracked(), TooltipState::Hidden);
        });
    }

    #[test]
    fn test_keyboard_hover_without_pointer() {
        Owner::new().with(|| {
            let ctx = ChartContext::new(config(), monthly());
            ctx.set_size(ContainerSize::new(400.0, 300.0));

            ctx.set_hovered_point(HoverState::new(monthly()[1].clone(), 1));
            let tooltip = ctx.tooltip.get_untracked();
            assert!(tooltip.is_visible());
            assert_eq!(tooltip.content().map(|c| c.entries.len()), Some(2));
            assert!(ctx.crosshair.get_untracked().is_some());

            // rows follow the legend while the hover stays put
            ctx.toggle_series("cost");
            assert_eq!(ctx.hover.get_untracked().index, Some(1));
            assert_eq!(ctx.tooltip.get_untracked().content().map(|c| c.entries.len()), Some(1));

            // index no longer in range
            ctx.set_data(monthly()[..1].to_vec());
            assert!(!ctx.hover.get_untracked().is_active());
            assert_eq!(ctx.tooltip.get_untracked(), TooltipState::Hidden);
        });
    }

    #[test]
    fn test_reads_follow_mutators() {
        Owner::new().with(|| {
            let ctx = ChartContext::new(config(), monthly());
            ctx.set_size(ContainerSize::new(400.0, 300.0));
            assert_eq!(ctx.size.get_untracked(), ContainerSize::new(400.0, 300.0));

            ctx.set_mouse_position(Some((100.0, 100.0)));
            assert_eq!(ctx.mouse.get_untracked(), Some((100.0, 100.0)));
            assert!(ctx.tooltip.get_untracked().is_visible());

            // replacing the data goes through the tooltip controller too
            ctx.set_data(Vec::new());
            assert!(ctx.data.with_untracked(|d| d.is_empty()));
            assert_eq!(ctx.tooltip.get_untracked(), TooltipState::Hidden);

            ctx.set_config(config().tooltip(TooltipConfig::disabled()));
            assert!(!ctx.config.with_untracked(|c| c.tooltip.enabled));
        });
    }

    #[test]
    fn test_context_instances_are_independent() {
        Owner::new().with(|| {
            let a = ChartContext::new(config(), monthly());
            let b = ChartContext::new(config(), monthly());
            a.toggle_series("sales");
            assert!(a.is_hidden("sales"));
            assert!(!b.is_hidden("sales"));
        });
    }

    #[test]
    #[should_panic]
    fn test_use_outside_container_panics() {
        let _ = use_chart_context();
    }

    #[test]
    fn test_try_use_outside_container() {
        assert!(try_use_chart_context().is_none());
    }
}
