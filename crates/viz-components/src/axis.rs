//! Axes and grid

use leptos::prelude::*;
use viz_core::{AxisSide, colors};
use viz_kit::{AxisTick, axis_ticks, grid_lines};
use viz_state::use_chart_context;

const TICK_SIZE: f64 = 5.0;
const LABEL_FONT: &str = "JetBrains Mono, monospace";

/// Axis configuration
#[derive(Debug, Clone, Default)]
pub struct AxisConfig {
    /// Requested tick count; the chart's `tick_count` when unset
    pub tick_count: Option<usize>,
    pub hide_line: bool,
    pub label: Option<String>,
}

impl AxisConfig {
    pub fn ticks(count: usize) -> Self {
        Self {
            tick_count: Some(count),
            ..Default::default()
        }
    }

    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Default::default()
        }
    }
}

/// Bottom axis for the horizontal scale
#[component]
pub fn XAxis(#[prop(optional)] config: Option<AxisConfig>) -> impl IntoView {
    let ctx = use_chart_context();
    let AxisConfig {
        tick_count,
        hide_line,
        label,
    } = config.unwrap_or_default();

    let height = move || ctx.dimensions.with(|d| d.inner_height);
    let width = move || ctx.dimensions.with(|d| d.inner_width);

    let ticks = move || -> Vec<AxisTick> {
        let count = tick_count.unwrap_or_else(|| ctx.config.with(|c| c.tick_count));
        ctx.scales.with(|s| axis_ticks(&s.x, count))
    };

    view! {
        <g class="viz-axis viz-axis-x" transform=move || format!("translate(0, {})", height())>
            {(!hide_line).then(|| view! {
                <line x1="0" y1="0" x2=width y2="0" stroke=colors::BORDER stroke-width="1" />
            })}
            {move || {
                ticks().into_iter().map(|tick| {
                    view! {
                        <g transform=format!("translate({}, 0)", tick.offset)>
                            <line y1="0" y2=TICK_SIZE stroke=colors::BORDER />
                            <text
                                y="16"
                                text-anchor="middle"
                                fill=colors::TEXT_MUTED
                                font-size="10"
                                font-family=LABEL_FONT
                            >
                                {tick.label}
                            </text>
                        </g>
                    }
                }).collect_view()
            }}
            {label.map(|label| view! {
                <text
                    x=move || width() / 2.0
                    y="32"
                    text-anchor="middle"
                    fill=colors::TEXT_MUTED
                    font-size="11"
                >
                    {label}
                </text>
            })}
        </g>
    }
}

/// Vertical axis on the left (primary scale) or right (secondary scale).
///
/// A right axis renders nothing while no visible series uses it.
#[component]
pub fn YAxis(
    #[prop(optional)] side: AxisSide,
    #[prop(optional)] config: Option<AxisConfig>,
) -> impl IntoView {
    let ctx = use_chart_context();
    let AxisConfig {
        tick_count,
        hide_line,
        label,
    } = config.unwrap_or_default();
    let right = side == AxisSide::Right;

    let height = move || ctx.dimensions.with(|d| d.inner_height);
    let offset = move || {
        if right { ctx.dimensions.with(|d| d.inner_width) } else { 0.0 }
    };

    let ticks = move || -> Option<Vec<AxisTick>> {
        let count = tick_count.unwrap_or_else(|| ctx.config.with(|c| c.tick_count));
        ctx.scales.with(|s| {
            let scale = if right { s.y_right.as_ref()? } else { &s.y };
            Some(axis_ticks(scale, count))
        })
    };

    let (anchor, label_x) = if right {
        ("start", TICK_SIZE + 3.0)
    } else {
        ("end", -(TICK_SIZE + 3.0))
    };
    let tick_x2 = if right { TICK_SIZE } else { -TICK_SIZE };
    let title_x = if right { 40.0 } else { -40.0 };

    move || {
        let label = label.clone();
        ticks().map(|ticks| {
            view! {
                <g
                    class="viz-axis viz-axis-y"
                    transform=move || format!("translate({}, 0)", offset())
                >
                    {(!hide_line).then(|| view! {
                        <line x1="0" y1="0" x2="0" y2=height stroke=colors::BORDER stroke-width="1" />
                    })}
                    {ticks.into_iter().map(|tick| {
                        view! {
                            <g transform=format!("translate(0, {})", tick.offset)>
                                <line x1="0" x2=tick_x2 stroke=colors::BORDER />
                                <text
                                    x=label_x
                                    dy="0.32em"
                                    text-anchor=anchor
                                    fill=colors::TEXT_MUTED
                                    font-size="10"
                                    font-family=LABEL_FONT
                                >
                                    {tick.label}
                                </text>
                            </g>
                        }
                    }).collect_view()}
                    {label.map(|label| view! {
                        <text
                            transform=move || format!("translate({}, {}) rotate(-90)", title_x, height() / 2.0)
                            text-anchor="middle"
                            fill=colors::TEXT_MUTED
                            font-size="11"
                        >
                            {label}
                        </text>
                    })}
                </g>
            }
        })
    }
}

/// Grid configuration
#[derive(Debug, Clone)]
pub struct GridConfig {
    pub horizontal: bool,
    pub vertical: bool,
    pub dashed: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            horizontal: true,
            vertical: false,
            dashed: true,
        }
    }
}

impl GridConfig {
    /// Vertical lines only (horizontal bar charts)
    pub fn vertical() -> Self {
        Self {
            horizontal: false,
            vertical: true,
            ..Default::default()
        }
    }

    pub fn both() -> Self {
        Self {
            vertical: true,
            ..Default::default()
        }
    }
}

/// Grid lines at the ticks of the x and primary y scales
#[component]
pub fn CartesianGrid(#[prop(optional)] config: Option<GridConfig>) -> impl IntoView {
    let ctx = use_chart_context();
    let GridConfig {
        horizontal,
        vertical,
        dashed,
    } = config.unwrap_or_default();
    let dasharray = if dashed { "2,2" } else { "none" };

    let width = move || ctx.dimensions.with(|d| d.inner_width);
    let height = move || ctx.dimensions.with(|d| d.inner_height);
    let count = move || ctx.config.with(|c| c.tick_count);

    view! {
        <g class="viz-grid">
            // Horizontal lines
            {move || {
                if !horizontal {
                    return Vec::new();
                }
                let w = width();
                ctx.scales.with(|s| grid_lines(&s.y, count()))
                    .into_iter()
                    .map(|y| view! {
                        <line
                            x1="0" y1=y
                            x2=w y2=y
                            stroke=colors::GRID
                            stroke-width="1"
                            stroke-dasharray=dasharray
                        />
                    })
                    .collect::<Vec<_>>()
            }}

            // Vertical lines
            {move || {
                if !vertical {
                    return Vec::new();
                }
                let h = height();
                ctx.scales.with(|s| grid_lines(&s.x, count()))
                    .into_iter()
                    .map(|x| view! {
                        <line
                            x1=x y1="0"
                            x2=x y2=h
                            stroke=colors::GRID
                            stroke-width="1"
                            stroke-dasharray=dasharray
                        />
                    })
                    .collect::<Vec<_>>()
            }}
        </g>
    }
}
