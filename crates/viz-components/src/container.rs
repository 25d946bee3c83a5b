//! Chart container: owns the chart context, measures itself, tracks the pointer

use crate::overlay::{ChartTooltip, Legend};
use leptos::ev::MouseEvent;
use leptos::html::Div;
use leptos::prelude::*;
use leptos::svg::Svg;
use viz_core::{DataPoint, colors};
use viz_resize::{ResizeConfig, use_resize_observer_with};
use viz_state::{ChartConfig, provide_chart_context};

/// Responsive chart surface.
///
/// Provides a fresh chart context to its children, feeds it the measured
/// size and the pointer position, and re-reads `data` whenever it changes.
/// Children render inside the plot area (already translated by the margin).
#[component]
pub fn ChartContainer(
    config: ChartConfig,
    #[prop(into)] data: Signal<Vec<DataPoint>>,
    #[prop(default = 320.0)] height: f64,
    #[prop(optional)] legend: bool,
    #[prop(optional)] resize: Option<ResizeConfig>,
    children: Children,
) -> impl IntoView {
    let initial = data.get_untracked();
    tracing::debug!(kind = ?config.kind, x_key = %config.x_key, points = initial.len(), "chart mounted");
    let ctx = provide_chart_context(config, initial);
    let surface = NodeRef::<Div>::new();
    let svg_ref = NodeRef::<Svg>::new();

    use_resize_observer_with(surface, resize.unwrap_or_default(), move |size| {
        ctx.set_size(size)
    });

    // initial data is already in the context
    Effect::new(move |seen: Option<()>| {
        let next = data.get();
        if seen.is_some() {
            tracing::debug!(points = next.len(), "chart data replaced");
            ctx.set_data(next);
        }
    });

    let on_move = move |ev: MouseEvent| {
        let Some(svg) = svg_ref.get() else { return };
        let rect = svg.get_bounding_client_rect();
        ctx.set_mouse_position(Some((
            ev.client_x() as f64 - rect.left(),
            ev.client_y() as f64 - rect.top(),
        )));
    };
    let on_leave = move |_: MouseEvent| ctx.pointer_leave();

    let tooltip = ctx.config.with_untracked(|c| c.tooltip.enabled);
    let dims = move || ctx.dimensions.get();

    view! {
        <div class="viz-chart" style="width: 100%;">
            <div
                node_ref=surface
                class="viz-chart-surface"
                style=format!("position: relative; width: 100%; height: {}px;", height)
            >
                <svg
                    node_ref=svg_ref
                    class="viz-chart-svg"
                    width=move || dims().width
                    height=move || dims().height
                    viewBox=move || dims().viewbox()
                    style="display: block;"
                    on:mousemove=on_move
                    on:mouseleave=on_leave
                >
                    // Background
                    <rect
                        width=move || dims().width
                        height=move || dims().height
                        fill=colors::BG_PANEL
                    />

                    <g transform=move || dims().inner_transform()>
                        {children()}
                    </g>
                </svg>
                {tooltip.then(|| view! { <ChartTooltip /> })}
            </div>
            {legend.then(|| view! { <Legend /> })}
        </div>
    }
}
