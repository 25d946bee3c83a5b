//! Pure recomputation pipeline behind a chart context
//!
//! dimensions -> scales -> hover -> tooltip. Each stage is a plain function of
//! its inputs so the reactive layer only has to memoize them.

use crate::config::{ChartConfig, ChartKind, XAxisType};
use chrono::{TimeZone, Utc};
use viz_core::{
    AxisSide, ChartDimensions, ColorResolver, CompactNumberFormatter, ContainerSize, DataPoint,
    HiddenSeries, HoverState, SeriesEntry, TimeFormatter, calculate_dimensions,
};
use viz_kit::{
    BandOptions, ChartScale, LINE_HIT_RADIUS, LinearOptions, SeriesStyle, TemporalOptions,
    TimeScale, TooltipContent, TooltipState, band, categories, coordinate_extent, find_band_index,
    find_closest, find_nearest_point, linear, resolve_tooltip, scatter_hit_radius, stack_series,
    stacked_extent, temporal, value_domain, value_extent,
};

/// Scales of one chart.
///
/// For vertical layouts `x` is the category/continuous axis and `y` the value
/// axis; horizontal bar charts swap the roles (`y` is the band scale).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartScales {
    pub x: ChartScale,
    pub y: ChartScale,
    /// Present when at least one visible series sits on the right axis
    pub y_right: Option<ChartScale>,
}

impl ChartScales {
    /// Band scale carrying the categories, if any
    pub fn category_scale(&self, config: &ChartConfig) -> &ChartScale {
        if config.is_horizontal() { &self.y } else { &self.x }
    }

    /// Scale carrying the values of series on `side`
    pub fn value_scale(&self, config: &ChartConfig, side: AxisSide) -> &ChartScale {
        if config.is_horizontal() {
            return &self.x;
        }
        match (side, &self.y_right) {
            (AxisSide::Right, Some(right)) => right,
            _ => &self.y,
        }
    }
}

/// Legend row
#[derive(Debug, Clone, PartialEq)]
pub struct LegendItem {
    pub key: String,
    pub label: String,
    pub color: String,
    pub hidden: bool,
}

// ============================================================================
// STAGE 1: DIMENSIONS
// ============================================================================

pub fn compute_dimensions(size: ContainerSize, config: &ChartConfig) -> ChartDimensions {
    calculate_dimensions(size.width, size.height, config.margin)
}

// ============================================================================
// STAGE 2: SERIES + SCALES
// ============================================================================

/// Configured series, or every numeric key (sorted by key) when none are configured
pub fn resolve_series(config: &ChartConfig, data: &[DataPoint]) -> Vec<SeriesEntry> {
    if !config.series.is_empty() {
        return config.series.clone();
    }

    let mut keys: Vec<&str> = Vec::new();
    for point in data {
        for key in point.numeric_keys(&config.x_key) {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
    }
    keys.sort_unstable();
    keys.into_iter().map(SeriesEntry::plain).collect()
}

/// Keys of visible series on one value axis, in series order
pub fn visible_keys<'a>(
    series: &'a [SeriesEntry],
    hidden: &HiddenSeries,
    side: AxisSide,
) -> Vec<&'a str> {
    series
        .iter()
        .filter(|s| !hidden.is_hidden(&s.key) && s.config.side() == side)
        .map(|s| s.key.as_str())
        .collect()
}

pub fn compute_scales(
    data: &[DataPoint],
    config: &ChartConfig,
    series: &[SeriesEntry],
    hidden: &HiddenSeries,
    dims: &ChartDimensions,
) -> ChartScales {
    let horizontal = config.is_horizontal();
    let category_range = if horizontal {
        (0.0, dims.inner_height)
    } else {
        (0.0, dims.inner_width)
    };
    let value_range = if horizontal {
        (0.0, dims.inner_width)
    } else {
        (dims.inner_height, 0.0)
    };

    let category = category_scale(data, config, category_range);

    // horizontal charts have a single value axis
    let left_keys = if horizontal {
        series
            .iter()
            .filter(|s| !hidden.is_hidden(&s.key))
            .map(|s| s.key.as_str())
            .collect()
    } else {
        visible_keys(series, hidden, AxisSide::Left)
    };
    let right_keys = if horizontal {
        Vec::new()
    } else {
        visible_keys(series, hidden, AxisSide::Right)
    };

    let value = value_scale(data, config, &left_keys, value_range);
    let y_right = (!right_keys.is_empty()).then(|| value_scale(data, config, &right_keys, value_range));

    tracing::debug!(
        width = dims.inner_width,
        height = dims.inner_height,
        points = data.len(),
        left = left_keys.len(),
        right = right_keys.len(),
        "chart scales recomputed"
    );

    if horizontal {
        ChartScales {
            x: value,
            y: category,
            y_right: None,
        }
    } else {
        ChartScales {
            x: category,
            y: value,
            y_right,
        }
    }
}

fn category_scale(data: &[DataPoint], config: &ChartConfig, range: (f64, f64)) -> ChartScale {
    let x_key = config.x_key.as_str();
    match config.x_axis {
        XAxisType::Category => band(
            &categories(data, x_key),
            range,
            BandOptions::padding(config.band_padding),
        )
        .into(),
        XAxisType::Number => {
            let (lo, hi) = coordinate_extent(data, x_key).unwrap_or((0.0, 1.0));
            linear((lo, hi), range, LinearOptions { nice: config.nice, clamp: false }).into()
        }
        XAxisType::Time => {
            let extent = coordinate_extent(data, x_key).and_then(|(lo, hi)| {
                let lo = Utc.timestamp_millis_opt(lo as i64).single()?;
                let hi = Utc.timestamp_millis_opt(hi as i64).single()?;
                Some((lo, hi))
            });
            match extent {
                Some(domain) => temporal(domain, range, TemporalOptions { nice: config.nice }).into(),
                None => TimeScale::new().domain(0, 1).range(range.0, range.1).into(),
            }
        }
    }
}

fn value_scale(
    data: &[DataPoint],
    config: &ChartConfig,
    keys: &[&str],
    range: (f64, f64),
) -> ChartScale {
    let extent = if config.stacked {
        stacked_extent(&stack_series(data, keys))
    } else {
        value_extent(data, keys.iter().copied())
    };
    let domain = value_domain(extent, config.value_includes_zero());
    linear(domain, range, LinearOptions { nice: config.nice, clamp: false }).into()
}

// ============================================================================
// STAGE 3: HOVER
// ============================================================================

/// Point under the pointer (`mouse` in container coordinates).
///
/// Outside the plot area, or with nothing close enough, the hover is cleared.
/// On a continuous axis the closest point must lie within [`LINE_HIT_RADIUS`]
/// pixels of the pointer along that axis.
pub fn locate_hover(
    data: &[DataPoint],
    config: &ChartConfig,
    series: &[SeriesEntry],
    hidden: &HiddenSeries,
    scales: &ChartScales,
    dims: &ChartDimensions,
    mouse: (f64, f64),
) -> HoverState {
    if data.is_empty() {
        return HoverState::cleared();
    }
    let (ix, iy) = dims.to_inner(mouse.0, mouse.1);
    if !dims.contains_inner(ix, iy) {
        return HoverState::cleared();
    }

    let index = if config.kind == ChartKind::Scatter {
        nearest_marker(data, config, series, hidden, scales, (ix, iy))
    } else {
        let category = scales.category_scale(config);
        let query = if config.is_horizontal() { iy } else { ix };
        match category.as_band() {
            Some(band) => find_band_index(band, query).and_then(|slot| {
                let name = band.domain().get(slot)?;
                data.iter()
                    .position(|p| p.category(&config.x_key).as_deref() == Some(name.as_str()))
            }),
            None => category
                .invert(query)
                .and_then(|q| find_closest(data, &config.x_key, q))
                .filter(|(_, point)| {
                    point
                        .get(&config.x_key)
                        .and_then(|x| category.position(x))
                        .is_some_and(|px| (px - query).abs() <= LINE_HIT_RADIUS)
                })
                .map(|(i, _)| i),
        }
    };

    match index {
        Some(i) => HoverState::new(data[i].clone(), i),
        None => HoverState::cleared(),
    }
}

fn nearest_marker(
    data: &[DataPoint],
    config: &ChartConfig,
    series: &[SeriesEntry],
    hidden: &HiddenSeries,
    scales: &ChartScales,
    query: (f64, f64),
) -> Option<usize> {
    let mut indices = Vec::new();
    let mut points = Vec::new();

    for entry in series.iter().filter(|s| !hidden.is_hidden(&s.key)) {
        let y = scales.value_scale(config, entry.config.side());
        for p in viz_kit::line_points(data, &config.x_key, &entry.key, &scales.x, y) {
            indices.push(p.index);
            points.push(p.xy());
        }
    }

    find_nearest_point(&points, query, scatter_hit_radius(config.point_radius)).map(|i| indices[i])
}

/// Pixel x of the hovered point, for the vertical crosshair
pub fn crosshair_x(hover: &HoverState, config: &ChartConfig, scales: &ChartScales) -> Option<f64> {
    if config.is_horizontal() {
        return None;
    }
    let value = hover.point.as_ref()?.get(&config.x_key)?;
    scales.x.position(value)
}

/// Container-space tooltip anchor for a hover that did not come from the
/// pointer (keyboard navigation, linked charts): the hovered category, centred
/// across the value axis.
pub fn hover_anchor(
    hover: &HoverState,
    config: &ChartConfig,
    scales: &ChartScales,
    dims: &ChartDimensions,
) -> Option<(f64, f64)> {
    let value = hover.point.as_ref()?.get(&config.x_key)?;
    let along = scales.category_scale(config).position(value)?;
    let (x, y) = if config.is_horizontal() {
        (dims.inner_width / 2.0, along)
    } else {
        (along, dims.inner_height / 2.0)
    };
    Some((dims.margin.left + x, dims.margin.top + y))
}

// ============================================================================
// STAGE 4: TOOLTIP
// ============================================================================

/// Tooltip rows for the hovered point
pub fn tooltip_content(
    hover: &HoverState,
    config: &ChartConfig,
    series: &[SeriesEntry],
    hidden: &HiddenSeries,
    colors: &ColorResolver,
    scales: &ChartScales,
) -> Option<TooltipContent> {
    let point = hover.point.as_ref()?;
    let index = hover.index?;

    let title_formatter = match &scales.x {
        ChartScale::Time(s) => Some(TimeFormatter::new(s.tick_interval(config.tick_count).approx_ms())),
        _ => None,
    };

    Some(TooltipContent::from_point(
        point,
        index,
        &config.x_key,
        SeriesStyle::new(series, hidden, colors),
        title_formatter.as_ref().map(|f| f as &dyn viz_core::ValueFormatter),
        &CompactNumberFormatter,
    ))
}

/// Full tooltip state for a pointer position
pub fn tooltip_state(
    content: Option<TooltipContent>,
    mouse: Option<(f64, f64)>,
    dims: &ChartDimensions,
    config: &ChartConfig,
) -> TooltipState {
    match mouse {
        Some(pointer) => resolve_tooltip(content, pointer, dims.container(), &config.tooltip),
        None => TooltipState::Hidden,
    }
}

pub fn legend_items(
    series: &[SeriesEntry],
    hidden: &HiddenSeries,
    colors: &ColorResolver,
) -> Vec<LegendItem> {
    series
        .iter()
        .map(|entry| LegendItem {
            key: entry.key.clone(),
            label: entry.config.label.clone(),
            color: colors.resolve(entry).to_string(),
            hidden: hidden.is_hidden(&entry.key),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use viz_core::SeriesConfig;

    fn monthly() -> Vec<DataPoint> {
        vec![
            DataPoint::new().with("month", "Jan").with("sales", 10.0).with("cost", 50.0),
            DataPoint::new().with("month", "Feb").with("sales", 20.0).with("cost", 60.0),
            DataPoint::new().with("month", "Mar").with("sales", 30.0).with("cost", 70.0),
        ]
    }

    fn numeric() -> Vec<DataPoint> {
        [(0.0, 1.0), (10.0, 2.0), (20.0, 3.0)]
            .into_iter()
            .map(|(x, y)| DataPoint::new().with("x", x).with("y", y))
            .collect()
    }

    fn dims() -> ChartDimensions {
        compute_dimensions(ContainerSize::new(400.0, 300.0), &ChartConfig::default())
    }

    #[test]
    fn test_dimensions_from_container() {
        let d = dims();
        assert_eq!((d.inner_width, d.inner_height), (330.0, 240.0));
    }

    #[test]
    fn test_series_fallback_to_numeric_keys() {
        let config = ChartConfig::new(ChartKind::Line, "month");
        let series = resolve_series(&config, &monthly());
        let keys: Vec<&str> = series.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, ["cost", "sales"]);

        // keys introduced by later points still land in key order
        let mut data = monthly();
        data.push(DataPoint::new().with("month", "Apr").with("budget", 5.0));
        let series = resolve_series(&config, &data);
        let keys: Vec<&str> = series.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, ["budget", "cost", "sales"]);
    }

    #[test]
    fn test_hidden_series_changes_domain() {
        let config = ChartConfig::new(ChartKind::Line, "month").nice(false);
        let data = monthly();
        let series = resolve_series(&config, &data);
        let mut hidden = HiddenSeries::new();

        let all = compute_scales(&data, &config, &series, &hidden, &dims());
        assert_eq!(all.y.as_linear().map(|s| s.domain_bounds()), Some((10.0, 70.0)));

        hidden.toggle("cost");
        let fewer = compute_scales(&data, &config, &series, &hidden, &dims());
        assert_eq!(fewer.y.as_linear().map(|s| s.domain_bounds()), Some((10.0, 30.0)));
    }

    #[test]
    fn test_empty_data_is_benign() {
        let config = ChartConfig::new(ChartKind::Line, "x").x_axis(XAxisType::Number).nice(false);
        let scales = compute_scales(&[], &config, &[], &HiddenSeries::new(), &dims());
        assert_eq!(scales.x.as_linear().map(|s| s.domain_bounds()), Some((0.0, 1.0)));
        assert_eq!(scales.y.as_linear().map(|s| s.domain_bounds()), Some((0.0, 1.0)));

        let hover = locate_hover(
            &[],
            &config,
            &[],
            &HiddenSeries::new(),
            &scales,
            &dims(),
            (100.0, 100.0),
        );
        assert!(!hover.is_active());
        assert_eq!(tooltip_state(None, Some((100.0, 100.0)), &dims(), &config), TooltipState::Hidden);
    }

    #[test]
    fn test_right_axis_scale() {
        let config = ChartConfig::new(ChartKind::Line, "month")
            .nice(false)
            .series("sales", SeriesConfig::new("Sales"))
            .series("cost", SeriesConfig::new("Cost").axis_side(AxisSide::Right));
        let data = monthly();
        let scales = compute_scales(&data, &config, &config.series, &HiddenSeries::new(), &dims());

        assert_eq!(scales.y.as_linear().map(|s| s.domain_bounds()), Some((10.0, 30.0)));
        let right = scales.y_right.as_ref().and_then(|s| s.as_linear()).map(|s| s.domain_bounds());
        assert_eq!(right, Some((50.0, 70.0)));
    }

    #[test]
    fn test_hover_bisection_on_numeric_axis() {
        let config = ChartConfig::new(ChartKind::Line, "x").x_axis(XAxisType::Number).nice(false);
        let data = numeric();
        let series = resolve_series(&config, &data);
        let d = dims();
        let scales = compute_scales(&data, &config, &series, &HiddenSeries::new(), &d);

        // x = 8 in data space: 8/20 of the inner width, shifted by the left margin
        let px = d.margin.left + 330.0 * 8.0 / 20.0;
        let hover = locate_hover(&data, &config, &series, &HiddenSeries::new(), &scales, &d, (px, 100.0));
        assert_eq!(hover.index, Some(1));

        // outside the plot area
        let hover = locate_hover(&data, &config, &series, &HiddenSeries::new(), &scales, &d, (1.0, 1.0));
        assert!(!hover.is_active());
    }

    #[test]
    fn test_hover_line_threshold() {
        let config = ChartConfig::new(ChartKind::Line, "x").x_axis(XAxisType::Number).nice(false);
        let data: Vec<DataPoint> = [(0.0, 1.0), (100.0, 2.0)]
            .into_iter()
            .map(|(x, y)| DataPoint::new().with("x", x).with("y", y))
            .collect();
        let series = resolve_series(&config, &data);
        let d = dims();
        let scales = compute_scales(&data, &config, &series, &HiddenSeries::new(), &d);

        // midway: 165 px from either point
        let mid = d.margin.left + 165.0;
        let hover = locate_hover(&data, &config, &series, &HiddenSeries::new(), &scales, &d, (mid, 100.0));
        assert!(!hover.is_active());

        // 40 px left of the second point
        let near = d.margin.left + 330.0 - 40.0;
        let hover = locate_hover(&data, &config, &series, &HiddenSeries::new(), &scales, &d, (near, 100.0));
        assert_eq!(hover.index, Some(1));
    }

    #[test]
    fn test_hover_anchor_on_category() {
        let config = ChartConfig::new(ChartKind::Line, "month").nice(false);
        let data = monthly();
        let series = resolve_series(&config, &data);
        let d = dims();
        let scales = compute_scales(&data, &config, &series, &HiddenSeries::new(), &d);

        let hover = HoverState::new(data[1].clone(), 1);
        let centre = scales.x.position(&"Feb".into()).map(|x| d.margin.left + x);
        let anchor = hover_anchor(&hover, &config, &scales, &d);
        assert_eq!(anchor.map(|a| a.0), centre);
        assert_eq!(anchor.map(|a| a.1), Some(d.margin.top + 120.0));

        assert_eq!(hover_anchor(&HoverState::cleared(), &config, &scales, &d), None);
    }

    #[test]
    fn test_hover_band_lookup() {
        let config = ChartConfig::bars("month");
        let data = monthly();
        let series = resolve_series(&config, &data);
        let d = dims();
        let scales = compute_scales(&data, &config, &series, &HiddenSeries::new(), &d);

        let px = d.margin.left + 330.0 * 0.5;
        let hover = locate_hover(&data, &config, &series, &HiddenSeries::new(), &scales, &d, (px, 100.0));
        assert_eq!(hover.index, Some(1));
        assert_eq!(crosshair_x(&hover, &config, &scales), scales.x.as_band().map(|b| b.scale_center(1)));
    }

    #[test]
    fn test_hover_scatter_radius() {
        let config = ChartConfig::scatter("x").nice(false);
        let data = numeric();
        let series = resolve_series(&config, &data);
        let d = dims();
        let scales = compute_scales(&data, &config, &series, &HiddenSeries::new(), &d);

        let cx = scales.x.scale_number(10.0).unwrap_or_default();
        let cy = scales.y.scale_number(2.0).unwrap_or_default();
        let near = (d.margin.left + cx + 3.0, d.margin.top + cy);
        let hover = locate_hover(&data, &config, &series, &HiddenSeries::new(), &scales, &d, near);
        assert_eq!(hover.index, Some(1));

        let far = (d.margin.left + cx + 60.0, d.margin.top + cy);
        let hover = locate_hover(&data, &config, &series, &HiddenSeries::new(), &scales, &d, far);
        assert!(!hover.is_active());
    }

    #[test]
    fn test_tooltip_and_legend() {
        let config = ChartConfig::new(ChartKind::Line, "month")
            .series("sales", SeriesConfig::new("Sales"))
            .series("cost", SeriesConfig::new("Cost"));
        let data = monthly();
        let colors = ColorResolver::for_series(&config.series, Vec::new());
        let mut hidden = HiddenSeries::new();
        hidden.toggle("cost");
        let scales = compute_scales(&data, &config, &config.series, &hidden, &dims());

        let hover = HoverState::new(data[0].clone(), 0);
        let content = tooltip_content(&hover, &config, &config.series, &hidden, &colors, &scales);
        let content = content.unwrap();
        assert_eq!(content.title, "Jan");
        assert_eq!(content.entries.len(), 1);

        let state = tooltip_state(Some(content), Some((60.0, 40.0)), &dims(), &config);
        assert!(state.is_visible());

        let legend = legend_items(&config.series, &hidden, &colors);
        assert_eq!(legend.len(), 2);
        assert!(!legend[0].hidden);
        assert!(legend[1].hidden);
    }

    #[test]
    fn test_horizontal_bars_swap_axes() {
        let config = ChartConfig::bars("month").layout(crate::Layout::Horizontal);
        let data = monthly();
        let series = resolve_series(&config, &data);
        let scales = compute_scales(&data, &config, &series, &HiddenSeries::new(), &dims());
        assert!(scales.y.as_band().is_some());
        assert!(scales.x.as_linear().is_some());
        assert!(scales.y_right.is_none());
    }
}
