//! Axis tick generation

use crate::scale::{ChartScale, Scale};
use viz_core::{CompactNumberFormatter, TimeFormatter, ValueFormatter};

/// Default number of ticks requested per axis
pub const DEFAULT_AXIS_TICKS: usize = 5;

/// One tick mark: domain value, pixel offset along the axis, label
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    /// Domain value; the category index for band scales
    pub value: f64,
    pub offset: f64,
    pub label: String,
}

/// Ticks with the default label format for the scale kind:
/// compact numbers, calendar-aware dates, or the category names.
pub fn axis_ticks(scale: &ChartScale, count: usize) -> Vec<AxisTick> {
    match scale {
        ChartScale::Time(s) => {
            let formatter = TimeFormatter::new(s.tick_interval(count).approx_ms());
            axis_ticks_with(scale, count, &formatter)
        }
        _ => axis_ticks_with(scale, count, &CompactNumberFormatter),
    }
}

/// Ticks labelled by `formatter` (ignored for band scales)
pub fn axis_ticks_with(
    scale: &ChartScale,
    count: usize,
    formatter: &dyn ValueFormatter,
) -> Vec<AxisTick> {
    match scale {
        ChartScale::Linear(s) => continuous(s, count, formatter),
        ChartScale::Time(s) => continuous(s, count, formatter),
        ChartScale::Band(s) => s
            .domain()
            .iter()
            .enumerate()
            .map(|(i, category)| AxisTick {
                value: i as f64,
                offset: s.scale_center(i),
                label: category.clone(),
            })
            .collect(),
    }
}

fn continuous(scale: &impl Scale, count: usize, formatter: &dyn ValueFormatter) -> Vec<AxisTick> {
    scale
        .ticks(count)
        .into_iter()
        .map(|value| AxisTick {
            value,
            offset: scale.scale(value),
            label: formatter.format(value),
        })
        .collect()
}

/// Pixel offsets of grid lines (continuous ticks, or band boundaries)
pub fn grid_lines(scale: &ChartScale, count: usize) -> Vec<f64> {
    match scale {
        ChartScale::Band(s) => (0..s.len()).map(|i| s.scale_index(i)).collect(),
        _ => axis_ticks_with(scale, count, &CompactNumberFormatter)
            .into_iter()
            .map(|tick| tick.offset)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::{BandOptions, LinearOptions, TemporalOptions, band, linear, temporal};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_linear_ticks() {
        let scale = ChartScale::from(linear((0.0, 2000.0), (300.0, 0.0), LinearOptions::default()));
        let ticks = axis_ticks(&scale, 5);

        assert_eq!(ticks.first().map(|t| t.label.as_str()), Some("0"));
        assert_eq!(ticks.last().map(|t| t.label.as_str()), Some("2K"));
        assert_eq!(ticks.first().map(|t| t.offset), Some(300.0));
        assert_eq!(ticks.last().map(|t| t.offset), Some(0.0));
        assert!(ticks.windows(2).all(|w| w[0].value < w[1].value));
    }

    #[test]
    fn test_band_ticks_at_centers() {
        let scale = ChartScale::from(band(&["a", "b", "c"], (0.0, 90.0), BandOptions::default()));
        let ticks = axis_ticks(&scale, 5);

        let offsets: Vec<f64> = ticks.iter().map(|t| t.offset).collect();
        assert_eq!(offsets, vec![15.0, 45.0, 75.0]);
        assert_eq!(ticks[1].label, "b");
        assert_eq!(grid_lines(&scale, 5), vec![0.0, 30.0, 60.0]);
    }

    #[test]
    fn test_time_ticks_use_day_labels() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 8, 0, 0, 0).unwrap();
        let scale = ChartScale::from(temporal((start, end), (0.0, 700.0), TemporalOptions::default()));

        let ticks = axis_ticks(&scale, 7);
        assert_eq!(ticks.first().map(|t| t.label.as_str()), Some("Mar 01"));
        assert_eq!(ticks.first().map(|t| t.offset), Some(0.0));
    }

    #[test]
    fn test_custom_formatter() {
        let scale = ChartScale::from(linear((0.0, 1.0), (0.0, 100.0), LinearOptions::default()));
        let ticks = axis_ticks_with(&scale, 2, &viz_core::DecimalFormatter { decimals: 1 });
        assert_eq!(ticks.first().map(|t| t.label.as_str()), Some("0.0"));
    }
}
