//! Series configuration, hidden-series set and hover state

use crate::DataPoint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Which value axis a series is measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisSide {
    #[default]
    Left,
    Right,
}

/// Per data-key display configuration (caller-owned, read-only to the engine)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeriesConfig {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis_side: Option<AxisSide>,
}

impl SeriesConfig {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn axis_side(mut self, side: AxisSide) -> Self {
        self.axis_side = Some(side);
        self
    }

    pub fn side(&self) -> AxisSide {
        self.axis_side.unwrap_or_default()
    }
}

/// A data key paired with its display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesEntry {
    pub key: String,
    pub config: SeriesConfig,
}

impl SeriesEntry {
    pub fn new(key: impl Into<String>, config: SeriesConfig) -> Self {
        Self {
            key: key.into(),
            config,
        }
    }

    /// Series labelled by its own key
    pub fn plain(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            config: SeriesConfig::new(key.clone()),
            key,
        }
    }
}

/// Data keys currently toggled off (e.g. via the legend)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HiddenSeries {
    keys: BTreeSet<String>,
}

impl HiddenSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle a key; returns `true` if the key is now hidden
    pub fn toggle(&mut self, key: &str) -> bool {
        if self.keys.remove(key) {
            false
        } else {
            self.keys.insert(key.to_string());
            true
        }
    }

    pub fn is_hidden(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}

/// At most one hovered point at a time
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HoverState {
    pub point: Option<DataPoint>,
    pub index: Option<usize>,
}

impl HoverState {
    pub fn new(point: DataPoint, index: usize) -> Self {
        Self {
            point: Some(point),
            index: Some(index),
        }
    }

    pub fn cleared() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.point.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_series_toggle() {
        let mut hidden = HiddenSeries::new();
        assert!(hidden.toggle("sales"));
        assert!(hidden.is_hidden("sales"));
        assert!(!hidden.toggle("sales"));
        assert!(hidden.is_empty());
    }

    #[test]
    fn test_series_config_defaults() {
        let config = SeriesConfig::new("Revenue");
        assert_eq!(config.side(), AxisSide::Left);
        assert!(config.color.is_none());

        let config = config.color("#fff").axis_side(AxisSide::Right);
        assert_eq!(config.side(), AxisSide::Right);
    }

    #[test]
    fn test_series_config_json() {
        let config: SeriesConfig =
            serde_json::from_str(r#"{"label": "Cost", "axis_side": "right"}"#).unwrap();
        assert_eq!(config.side(), AxisSide::Right);
        assert_eq!(config.label, "Cost");
    }

    #[test]
    fn test_hover_state() {
        assert!(!HoverState::cleared().is_active());
        assert!(HoverState::new(DataPoint::new(), 2).is_active());
    }
}
