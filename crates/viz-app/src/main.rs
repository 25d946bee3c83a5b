//! viz-charts demo (WASM entry point)

use chrono::{Duration, TimeZone, Utc};
use leptos::ev::MouseEvent;
use leptos::prelude::*;
use viz_components::{
    AreaSeries, AxisConfig, BarSeries, CartesianGrid, ChartContainer, Crosshair, GridConfig,
    LineSeries, LineSeriesConfig, ScatterSeries, XAxis, YAxis,
};
use viz_core::export::to_csv;
use viz_core::{AxisSide, DataPoint, SeriesConfig, colors, parse_data};
use viz_kit::{AnimationConfig, Easing};
use viz_resize::ResizeConfig;
use viz_state::{ChartConfig, ChartKind, Layout};

const REGIONS_JSON: &str = r#"[
    {"region": "North", "q1": 120, "q2": 135, "q3": 150},
    {"region": "South", "q1": 98, "q2": 110, "q3": 104},
    {"region": "East", "q1": 143, "q2": 128, "q3": 160},
    {"region": "West", "q1": 87, "q2": 95, "q3": 118}
]"#;

fn main() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
    tracing::info!("viz-charts demo starting");

    leptos::mount::mount_to_body(App);
}

// ============================================================================
// DEMO DATA
// ============================================================================

/// Daily visits and conversion rate; `round` shifts the curve so updates animate
fn traffic(round: u32) -> Vec<DataPoint> {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).single().unwrap_or_default();
    let phase = round as f64 * 0.7;

    (0..30)
        .map(|day| {
            let t = day as f64 / 4.0 + phase;
            DataPoint::new()
                .with("date", start + Duration::days(day))
                .with("visits", (1_200.0 + 400.0 * t.sin() + 12.0 * day as f64).round())
                .with("conversion", ((2.5 + 0.8 * (t * 0.6).cos()) * 100.0).round() / 100.0)
        })
        .collect()
}

fn regions() -> Vec<DataPoint> {
    parse_data(REGIONS_JSON).unwrap_or_else(|e| {
        tracing::error!("Failed to parse region data: {}", e);
        Vec::new()
    })
}

fn samples(round: u32) -> Vec<DataPoint> {
    (0..40)
        .map(|i| {
            let x = i as f64 * 2.5;
            let wobble = ((i * 7 + round as usize * 13) % 17) as f64 - 8.0;
            DataPoint::new()
                .with("height", x)
                .with("weight", 20.0 + x * 0.6 + wobble * 2.0)
        })
        .collect()
}

fn channels() -> Vec<DataPoint> {
    ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]
        .iter()
        .enumerate()
        .map(|(i, day)| {
            let i = i as f64;
            DataPoint::new()
                .with("day", *day)
                .with("search", 40.0 + 6.0 * i)
                .with("social", 25.0 + 10.0 * (i * 0.9).sin().abs() * 3.0)
                .with("direct", 18.0 + 2.0 * i)
        })
        .collect()
}

// ============================================================================
// APP
// ============================================================================

#[component]
fn App() -> impl IntoView {
    let (round, set_round) = signal(0u32);
    let traffic_data = Signal::derive(move || traffic(round.get()));
    let scatter_data = Signal::derive(move || samples(round.get()));
    let region_data = Signal::derive(regions);
    let channel_data = Signal::derive(channels);

    let export_traffic = move |_: MouseEvent| {
        let csv = traffic_data.with_untracked(|data| to_csv(data, &["date", "visits", "conversion"]));
        tracing::info!(rows = csv.lines().count().saturating_sub(1), "traffic export\n{}", csv);
    };

    let line_config = ChartConfig::time_series("date")
        .series("visits", SeriesConfig::new("Visits"))
        .series(
            "conversion",
            SeriesConfig::new("Conversion %")
                .color(colors::PALETTE[3])
                .axis_side(AxisSide::Right),
        )
        .animation(AnimationConfig::default().with_easing(Easing::EaseInOutCubic));

    let bar_config = ChartConfig::bars("region")
        .series("q1", SeriesConfig::new("Q1"))
        .series("q2", SeriesConfig::new("Q2"))
        .series("q3", SeriesConfig::new("Q3"));

    let horizontal_config = ChartConfig::bars("region")
        .layout(Layout::Horizontal)
        .stacked(true)
        .series("q1", SeriesConfig::new("Q1"))
        .series("q2", SeriesConfig::new("Q2"))
        .series("q3", SeriesConfig::new("Q3"));

    let area_config = ChartConfig::new(ChartKind::Area, "day")
        .stacked(true)
        .series("search", SeriesConfig::new("Search"))
        .series("social", SeriesConfig::new("Social"))
        .series("direct", SeriesConfig::new("Direct"));

    let scatter_config = ChartConfig::scatter("height")
        .series("weight", SeriesConfig::new("Weight"))
        .point_radius(5.0)
        .animation(AnimationConfig::fast());

    view! {
        <div class="demo" style="max-width: 1100px; margin: 0 auto; padding: 24px;">
            <header style="display: flex; align-items: center; justify-content: space-between;">
                <h1 style="font-size: 18px; font-weight: 600;">"viz-charts"</h1>
                <div style="display: flex; gap: 8px;">
                    <button on:click=move |_| set_round.update(|r| *r += 1)>"Update data"</button>
                    <button on:click=export_traffic>"Export CSV"</button>
                </div>
            </header>

            <section class="demo-panel">
                <h2 class="demo-title">"Traffic"</h2>
                <ChartContainer config=line_config data=traffic_data legend=true>
                    <CartesianGrid />
                    <XAxis config=AxisConfig::ticks(6) />
                    <YAxis />
                    <YAxis side=AxisSide::Right />
                    <Crosshair />
                    <LineSeries data_key="visits" config=LineSeriesConfig::with_points() />
                    <LineSeries data_key="conversion" />
                </ChartContainer>
            </section>

            <section class="demo-panel">
                <h2 class="demo-title">"Revenue by region"</h2>
                <ChartContainer config=bar_config data=region_data legend=true>
                    <CartesianGrid />
                    <XAxis />
                    <YAxis config=AxisConfig::labelled("k$") />
                    <BarSeries />
                </ChartContainer>
            </section>

            <section class="demo-panel">
                <h2 class="demo-title">"Revenue by region (stacked)"</h2>
                <ChartContainer
                    config=horizontal_config
                    data=region_data
                    height=240.0
                    legend=true
                    resize=ResizeConfig::new().throttle(50)
                >
                    <CartesianGrid config=GridConfig::vertical() />
                    <XAxis />
                    <YAxis />
                    <BarSeries />
                </ChartContainer>
            </section>

            <section class="demo-panel">
                <h2 class="demo-title">"Acquisition channels"</h2>
                <ChartContainer config=area_config data=channel_data legend=true>
                    <CartesianGrid />
                    <XAxis />
                    <YAxis />
                    <Crosshair />
                    <AreaSeries data_key="search" />
                    <AreaSeries data_key="social" />
                    <AreaSeries data_key="direct" />
                </ChartContainer>
            </section>

            <section class="demo-panel">
                <h2 class="demo-title">"Height vs weight"</h2>
                <ChartContainer config=scatter_config data=scatter_data>
                    <CartesianGrid config=GridConfig::both() />
                    <XAxis />
                    <YAxis />
                    <ScatterSeries data_key="weight" />
                </ChartContainer>
            </section>
        </div>
    }
}
