//! # viz-core
//!
//! Core data model for viz-charts: data points, series configuration,
//! chart layout math and the color palette.
//! Implements Strategy pattern for axis and tooltip value formatting.

pub mod export;
pub mod layout;
pub mod palette;
pub mod point;
pub mod series;

pub use layout::*;
pub use palette::*;
pub use point::*;
pub use series::*;

use chrono::{TimeZone, Utc};

// ============================================================================
// STRATEGY PATTERN: Formatters
// ============================================================================

/// Strategy trait for turning a numeric axis/tooltip value into a label
pub trait ValueFormatter: Send + Sync {
    fn format(&self, value: f64) -> String;
}

/// Fixed-decimals formatter
#[derive(Debug, Clone)]
pub struct DecimalFormatter {
    pub decimals: usize,
}

impl Default for DecimalFormatter {
    fn default() -> Self {
        Self { decimals: 2 }
    }
}

impl ValueFormatter for DecimalFormatter {
    fn format(&self, value: f64) -> String {
        format!("{:.prec$}", value, prec = self.decimals)
    }
}

/// Compact formatter for large numbers (K, M, B suffixes)
///
/// Values below one thousand keep up to two decimals but drop trailing zeros,
/// so axis labels read `5`, `2.5`, `1.25K`.
#[derive(Debug, Clone, Default)]
pub struct CompactNumberFormatter;

impl ValueFormatter for CompactNumberFormatter {
    fn format(&self, value: f64) -> String {
        let abs = value.abs();
        let sign = if value < 0.0 { "-" } else { "" };

        if abs >= 1_000_000_000.0 {
            format!("{}{}B", sign, trim_decimals(abs / 1_000_000_000.0))
        } else if abs >= 1_000_000.0 {
            format!("{}{}M", sign, trim_decimals(abs / 1_000_000.0))
        } else if abs >= 1_000.0 {
            format!("{}{}K", sign, trim_decimals(abs / 1_000.0))
        } else {
            format!("{}{}", sign, trim_decimals(abs))
        }
    }
}

/// Formats millisecond timestamps; the label granularity follows the
/// spacing between neighbouring ticks.
#[derive(Debug, Clone)]
pub struct TimeFormatter {
    /// Distance between neighbouring ticks in milliseconds
    pub interval_ms: i64,
}

impl TimeFormatter {
    pub fn new(interval_ms: i64) -> Self {
        Self { interval_ms }
    }
}

impl Default for TimeFormatter {
    fn default() -> Self {
        Self::new(3_600_000)
    }
}

impl ValueFormatter for TimeFormatter {
    fn format(&self, value: f64) -> String {
        format_time(value as i64, self.interval_ms)
    }
}

/// Format a millisecond timestamp for chart axes
pub fn format_time(timestamp_ms: i64, interval_ms: i64) -> String {
    let Some(dt) = Utc.timestamp_millis_opt(timestamp_ms).single() else {
        return String::new();
    };

    if interval_ms >= 365 * 86_400_000 {
        dt.format("%Y").to_string()
    } else if interval_ms >= 28 * 86_400_000 {
        dt.format("%b %Y").to_string()
    } else if interval_ms >= 86_400_000 {
        dt.format("%b %d").to_string()
    } else if interval_ms >= 60_000 {
        dt.format("%H:%M").to_string()
    } else {
        dt.format("%H:%M:%S").to_string()
    }
}

/// Two decimals at most, trailing zeros removed
fn trim_decimals(value: f64) -> String {
    let s = format!("{:.2}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

// ============================================================================
// COLOR CONSTANTS
// ============================================================================

pub mod colors {
    pub const BG_PANEL: &str = "#141414";
    pub const BG_ELEVATED: &str = "#1a1a1a";
    pub const BORDER: &str = "#2a2a2a";
    pub const TEXT_PRIMARY: &str = "#fafafa";
    pub const TEXT_MUTED: &str = "#888888";
    pub const GRID: &str = "#1f1f1f";
    pub const CROSSHAIR: &str = "#555555";

    /// Default categorical palette, assigned to series in order
    pub const PALETTE: &[&str] = &[
        "#3b82f6", "#22c55e", "#f97316", "#a855f7", "#ef4444", "#14b8a6", "#eab308", "#ec4899",
    ];

    pub fn with_alpha(hex: &str, alpha: f64) -> String {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return format!("#{}", hex);
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
        format!(
            "rgba({}, {}, {}, {:.2})",
            channel(0),
            channel(2),
            channel(4),
            alpha.clamp(0.0, 1.0)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_formatter() {
        let formatter = CompactNumberFormatter;
        assert_eq!(formatter.format(1_500_000.0), "1.5M");
        assert_eq!(formatter.format(2_500.0), "2.5K");
        assert_eq!(formatter.format(500.0), "500");
        assert_eq!(formatter.format(-0.25), "-0.25");
        assert_eq!(formatter.format(0.0), "0");
    }

    #[test]
    fn test_decimal_formatter() {
        let formatter = DecimalFormatter { decimals: 3 };
        assert_eq!(formatter.format(1.23456), "1.235");
    }

    #[test]
    fn test_time_formatter_granularity() {
        // 2023-11-14T22:13:20Z
        let ts = 1_700_000_000_000;
        assert_eq!(format_time(ts, 60_000), "22:13");
        assert_eq!(format_time(ts, 1_000), "22:13:20");
        assert_eq!(format_time(ts, 86_400_000), "Nov 14");
        assert_eq!(format_time(ts, 365 * 86_400_000), "2023");
    }

    #[test]
    fn test_with_alpha() {
        assert_eq!(colors::with_alpha("#22c55e", 0.5), "rgba(34, 197, 94, 0.50)");
    }
}
