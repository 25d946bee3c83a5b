//! Series renderers: line, area, bar and scatter
//!
//! Geometry is derived from the chart context in memos (pure helpers below);
//! the view only interpolates it with the current animation progress.

use crate::animate::{use_animation_progress, use_previous};
use leptos::prelude::*;
use viz_core::{AxisSide, DataPoint, HiddenSeries, SeriesEntry, colors};
use viz_kit::{
    AreaGeometry, BarLayout, BarRect, ScatterMarker, SeriesPoint, animate_points, bar_rects,
    baseline_px, line_points, points_path, scatter_markers, stack_series,
};
use viz_state::{ChartConfig, ChartContext, ChartScales, use_chart_context, visible_keys};

// ============================================================================
// GEOMETRY (pure)
// ============================================================================

fn side_of(series: &[SeriesEntry], key: &str) -> AxisSide {
    series
        .iter()
        .find(|s| s.key == key)
        .map(|s| s.config.side())
        .unwrap_or_default()
}

/// Pixel points of one series; empty while the series is hidden
pub fn line_geometry(
    data: &[DataPoint],
    config: &ChartConfig,
    scales: &ChartScales,
    series: &[SeriesEntry],
    hidden: &HiddenSeries,
    key: &str,
) -> Vec<SeriesPoint> {
    if hidden.is_hidden(key) {
        return Vec::new();
    }
    let y = scales.value_scale(config, side_of(series, key));
    line_points(data, &config.x_key, key, &scales.x, y)
}

/// Filled area of one series, stacked on the visible series before it when
/// the chart is stacked
pub fn area_geometry(
    data: &[DataPoint],
    config: &ChartConfig,
    scales: &ChartScales,
    series: &[SeriesEntry],
    hidden: &HiddenSeries,
    key: &str,
) -> AreaGeometry {
    if hidden.is_hidden(key) {
        return AreaGeometry::default();
    }
    let side = side_of(series, key);
    let y = scales.value_scale(config, side);

    if !config.stacked {
        let upper = line_points(data, &config.x_key, key, &scales.x, y);
        return AreaGeometry::from_baseline(upper, baseline_px(y));
    }

    let keys = visible_keys(series, hidden, side);
    let Some(layer) = keys.iter().position(|k| *k == key) else {
        return AreaGeometry::default();
    };
    let stack = stack_series(data, &keys);
    AreaGeometry::stacked(data, &config.x_key, &stack[layer], &scales.x, y)
}

/// Bars of every visible series measured on the primary value axis
pub fn bar_geometry(
    data: &[DataPoint],
    config: &ChartConfig,
    scales: &ChartScales,
    series: &[SeriesEntry],
    hidden: &HiddenSeries,
) -> Vec<BarRect> {
    let keys: Vec<&str> = if config.is_horizontal() {
        series
            .iter()
            .filter(|s| !hidden.is_hidden(&s.key))
            .map(|s| s.key.as_str())
            .collect()
    } else {
        visible_keys(series, hidden, AxisSide::Left)
    };
    let layout = BarLayout {
        orientation: config.layout,
        stacked: config.stacked,
        ..Default::default()
    };
    bar_rects(
        data,
        &config.x_key,
        &keys,
        scales.category_scale(config),
        scales.value_scale(config, AxisSide::Left),
        layout,
    )
}

/// Markers of one series; empty while the series is hidden
pub fn scatter_geometry(
    data: &[DataPoint],
    config: &ChartConfig,
    scales: &ChartScales,
    series: &[SeriesEntry],
    hidden: &HiddenSeries,
    key: &str,
) -> Vec<ScatterMarker> {
    if hidden.is_hidden(key) {
        return Vec::new();
    }
    let y = scales.value_scale(config, side_of(series, key));
    scatter_markers(data, &config.x_key, key, &scales.x, y, config.point_radius)
}

// ============================================================================
// REACTIVE HELPERS
// ============================================================================

/// Resolved color of `key` (explicit series color, else palette)
fn color_of(ctx: ChartContext, key: &str) -> String {
    ctx.series.with(|series| {
        ctx.colors.with(|colors| match series.iter().find(|s| s.key == key) {
            Some(entry) => colors.resolve(entry).to_string(),
            None => colors.color_for(key).to_string(),
        })
    })
}

/// Value-axis baseline (zero when in view) for the axis `key` is measured on
fn baseline_of(ctx: ChartContext, key: &str) -> f64 {
    ctx.config.with(|c| {
        ctx.series.with(|series| {
            ctx.scales
                .with(|s| baseline_px(s.value_scale(c, side_of(series, key))))
        })
    })
}

/// Animation that replays when the data or the visible series change
fn use_series_progress(ctx: ChartContext) -> ReadSignal<f64> {
    let config = ctx.config.with_untracked(|c| c.animation);
    use_animation_progress(config, move || {
        ctx.data.track();
        ctx.hidden.track();
    })
}

/// Run `f` with every input of the geometry helpers borrowed
fn with_inputs<T>(
    ctx: ChartContext,
    f: impl FnOnce(&[DataPoint], &ChartConfig, &ChartScales, &[SeriesEntry], &HiddenSeries) -> T,
) -> T {
    ctx.data.with(|data| {
        ctx.config.with(|config| {
            ctx.scales.with(|scales| {
                ctx.series
                    .with(|series| ctx.hidden.with(|hidden| f(data, config, scales, series, hidden)))
            })
        })
    })
}

// ============================================================================
// LINE
// ============================================================================

/// Line series configuration
#[derive(Debug, Clone)]
pub struct LineSeriesConfig {
    pub stroke_width: f64,
    pub show_points: bool,
    pub point_radius: f64,
}

impl Default for LineSeriesConfig {
    fn default() -> Self {
        Self {
            stroke_width: 2.0,
            show_points: false,
            point_radius: 3.0,
        }
    }
}

impl LineSeriesConfig {
    pub fn with_points() -> Self {
        Self {
            show_points: true,
            ..Default::default()
        }
    }
}

#[component]
pub fn LineSeries(
    #[prop(into)] data_key: String,
    #[prop(optional)] config: Option<LineSeriesConfig>,
) -> impl IntoView {
    let ctx = use_chart_context();
    let LineSeriesConfig {
        stroke_width,
        show_points,
        point_radius,
    } = config.unwrap_or_default();
    let key = StoredValue::new(data_key);

    let points = Memo::new(move |_| {
        key.with_value(|k| {
            with_inputs(ctx, |data, config, scales, series, hidden| {
                line_geometry(data, config, scales, series, hidden, k)
            })
        })
    });
    let previous = use_previous(points);
    let progress = use_series_progress(ctx);
    let color = Memo::new(move |_| key.with_value(|k| color_of(ctx, k)));

    let frame = move || {
        let t = progress.get();
        let baseline = key.with_value(|k| baseline_of(ctx, k));
        points.with(|target| {
            previous.with_value(|prev| animate_points(target, prev.as_deref(), baseline, t))
        })
    };

    let path = move || {
        let curve = ctx.config.with(|c| c.curve);
        points_path(&frame(), curve)
    };

    let dots = move || {
        if !show_points {
            return None;
        }
        let hovered = ctx.hover.with(|h| h.index);
        let r = point_radius;
        Some(
            frame()
                .into_iter()
                .map(|p| {
                    let radius = if hovered == Some(p.index) { r * 1.5 } else { r };
                    view! {
                        <circle
                            cx=p.x
                            cy=p.y
                            r=radius
                            fill=colors::BG_PANEL
                            stroke=move || color.get()
                            stroke-width="2"
                        />
                    }
                })
                .collect_view(),
        )
    };

    view! {
        <g class="viz-series viz-line">
            <path
                d=path
                fill="none"
                stroke=move || color.get()
                stroke-width=stroke_width
                stroke-linejoin="round"
                stroke-linecap="round"
            />
            {dots}
        </g>
    }
}

// ============================================================================
// AREA
// ============================================================================

/// Area series configuration
#[derive(Debug, Clone)]
pub struct AreaSeriesConfig {
    pub fill_opacity: f64,
    pub stroke_width: f64,
}

impl Default for AreaSeriesConfig {
    fn default() -> Self {
        Self {
            fill_opacity: 0.25,
            stroke_width: 1.5,
        }
    }
}

#[component]
pub fn AreaSeries(
    #[prop(into)] data_key: String,
    #[prop(optional)] config: Option<AreaSeriesConfig>,
) -> impl IntoView {
    let ctx = use_chart_context();
    let config = config.unwrap_or_default();
    let key = StoredValue::new(data_key);

    let geometry = Memo::new(move |_| {
        key.with_value(|k| {
            with_inputs(ctx, |data, config, scales, series, hidden| {
                area_geometry(data, config, scales, series, hidden, k)
            })
        })
    });
    let progress = use_series_progress(ctx);
    let color = Memo::new(move |_| key.with_value(|k| color_of(ctx, k)));

    let frame = move || {
        let t = progress.get();
        geometry.with(|g| g.animate(t))
    };
    let curve = move || ctx.config.with(|c| c.curve);

    view! {
        <g class="viz-series viz-area">
            <path
                d=move || frame().path(curve())
                fill=move || color.get()
                fill-opacity=config.fill_opacity
                stroke="none"
            />
            <path
                d=move || frame().line_path(curve())
                fill="none"
                stroke=move || color.get()
                stroke-width=config.stroke_width
            />
        </g>
    }
}

// ============================================================================
// BAR
// ============================================================================

/// Bar series configuration
#[derive(Debug, Clone)]
pub struct BarSeriesConfig {
    /// Corner radius
    pub radius: f64,
    /// Opacity of bars outside the hovered category
    pub dimmed_opacity: f64,
}

impl Default for BarSeriesConfig {
    fn default() -> Self {
        Self {
            radius: 2.0,
            dimmed_opacity: 0.6,
        }
    }
}

/// Every visible series as grouped (or stacked) bars
#[component]
pub fn BarSeries(#[prop(optional)] config: Option<BarSeriesConfig>) -> impl IntoView {
    let ctx = use_chart_context();
    let config = config.unwrap_or_default();

    let bars = Memo::new(move |_| {
        with_inputs(ctx, |data, config, scales, series, hidden| {
            bar_geometry(data, config, scales, series, hidden)
        })
    });
    let progress = use_series_progress(ctx);

    let rects = move || {
        let t = progress.get();
        let (baseline, orientation) = ctx.config.with(|c| {
            let baseline = ctx
                .scales
                .with(|s| baseline_px(s.value_scale(c, AxisSide::Left)));
            (baseline, c.layout)
        });
        let hovered = ctx.hover.with(|h| h.index);

        bars.get()
            .into_iter()
            .map(|bar| {
                let color = color_of(ctx, &bar.key);
                let opacity = match hovered {
                    Some(index) if index != bar.index => config.dimmed_opacity,
                    _ => 1.0,
                };
                let r = bar.animate(baseline, orientation, t);
                view! {
                    <rect
                        x=r.x
                        y=r.y
                        width=r.width
                        height=r.height
                        rx=config.radius
                        fill=color
                        fill-opacity=opacity
                    />
                }
            })
            .collect_view()
    };

    view! { <g class="viz-series viz-bars">{rects}</g> }
}

// ============================================================================
// SCATTER
// ============================================================================

#[component]
pub fn ScatterSeries(#[prop(into)] data_key: String) -> impl IntoView {
    let ctx = use_chart_context();
    let key = StoredValue::new(data_key);

    let markers = Memo::new(move |_| {
        key.with_value(|k| {
            with_inputs(ctx, |data, config, scales, series, hidden| {
                scatter_geometry(data, config, scales, series, hidden, k)
            })
        })
    });
    let progress = use_series_progress(ctx);
    let color = Memo::new(move |_| key.with_value(|k| color_of(ctx, k)));

    let circles = move || {
        let t = progress.get();
        let hovered = ctx.hover.with(|h| h.index);
        markers
            .get()
            .into_iter()
            .map(|marker| {
                let m = marker.animate(t);
                let active = hovered == Some(m.index);
                view! {
                    <circle
                        cx=m.cx
                        cy=m.cy
                        r=if active { m.r * 1.5 } else { m.r }
                        fill=move || color.get()
                        fill-opacity=if active { 1.0 } else { 0.75 }
                        stroke=colors::BG_PANEL
                        stroke-width="1"
                    />
                }
            })
            .collect_view()
    };

    view! { <g class="viz-series viz-scatter">{circles}</g> }
}
