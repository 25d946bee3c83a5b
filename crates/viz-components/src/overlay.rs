//! Legend, tooltip and crosshair

use leptos::prelude::*;
use viz_core::colors;
use viz_kit::TooltipState;
use viz_state::use_chart_context;

/// Clickable series legend; a click toggles the series on or off
#[component]
pub fn Legend() -> impl IntoView {
    let ctx = use_chart_context();

    view! {
        <div
            class="viz-legend"
            style="display: flex; flex-wrap: wrap; gap: 12px; justify-content: center; padding: 6px 0;"
        >
            {move || {
                ctx.legend.get().into_iter().map(|item| {
                    let key = item.key.clone();
                    let swatch = format!(
                        "display: inline-block; width: 10px; height: 10px; border-radius: 2px; background: {};",
                        item.color
                    );
                    let text_color = if item.hidden { colors::TEXT_MUTED } else { colors::TEXT_PRIMARY };

                    view! {
                        <button
                            class="viz-legend-item"
                            class:hidden=item.hidden
                            style=format!(
                                "display: flex; align-items: center; gap: 6px; background: none; border: none; cursor: pointer; color: {}; opacity: {}; font-size: 12px;",
                                text_color,
                                if item.hidden { 0.5 } else { 1.0 },
                            )
                            on:click=move |_| {
                                ctx.toggle_series(&key);
                            }
                        >
                            <span class="viz-legend-swatch" style=swatch></span>
                            <span class="viz-legend-label">{item.label}</span>
                        </button>
                    }
                }).collect_view()
            }}
        </div>
    }
}

/// Floating tooltip for the hovered point, positioned in container space
#[component]
pub fn ChartTooltip() -> impl IntoView {
    let ctx = use_chart_context();
    let width = move || ctx.config.with(|c| c.tooltip.width);

    move || match ctx.tooltip.get() {
        TooltipState::Hidden => None,
        TooltipState::Visible { content, position } => {
            let style = format!(
                "position: absolute; left: {}px; top: {}px; width: {}px; pointer-events: none; \
                 background: {}; border: 1px solid {}; border-radius: 4px; padding: 8px; \
                 font-size: 11px; font-family: JetBrains Mono, monospace; color: {}; z-index: 10;",
                position.x,
                position.y,
                width(),
                colors::BG_ELEVATED,
                colors::BORDER,
                colors::TEXT_PRIMARY,
            );

            Some(view! {
                <div class="viz-tooltip" style=style>
                    <div class="viz-tooltip-title" style=format!("color: {}; margin-bottom: 4px;", colors::TEXT_MUTED)>
                        {content.title}
                    </div>
                    {content.entries.into_iter().map(|entry| {
                        view! {
                            <div
                                class="viz-tooltip-row"
                                style="display: flex; align-items: center; gap: 6px; line-height: 18px;"
                            >
                                <span style=format!(
                                    "width: 8px; height: 8px; border-radius: 50%; background: {};",
                                    entry.color
                                )></span>
                                <span class="viz-tooltip-label" style="flex: 1;">{entry.label}</span>
                                <span class="viz-tooltip-value">{entry.value}</span>
                            </div>
                        }
                    }).collect_view()}
                </div>
            })
        }
    }
}

/// Vertical guide through the hovered point
#[component]
pub fn Crosshair() -> impl IntoView {
    let ctx = use_chart_context();
    let height = move || ctx.dimensions.with(|d| d.inner_height);

    move || {
        ctx.crosshair.get().map(|x| {
            view! {
                <line
                    class="viz-crosshair"
                    x1=x y1="0"
                    x2=x y2=height
                    stroke=colors::CROSSHAIR
                    stroke-width="1"
                    stroke-dasharray="3,3"
                    pointer-events="none"
                />
            }
        })
    }
}
