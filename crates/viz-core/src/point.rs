//! Data points: keyed values fed to a chart

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Single value stored under a data key
///
/// JSON numbers become `Number`, RFC 3339 strings become `Date`, any other
/// string is `Text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    Number(f64),
    Date(DateTime<Utc>),
    Text(String),
}

impl DataValue {
    /// Strict numeric value (finite numbers only)
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            _ => None,
        }
    }

    /// Position on a continuous axis: numbers as-is, dates as epoch millis
    pub fn as_coordinate(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            Self::Date(d) => Some(d.timestamp_millis() as f64),
            _ => None,
        }
    }

    /// Label on a categorical axis
    pub fn as_category(&self) -> String {
        match self {
            Self::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            Self::Date(d) => d.to_rfc3339(),
            Self::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for DataValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for DataValue {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<DateTime<Utc>> for DataValue {
    fn from(d: DateTime<Utc>) -> Self {
        Self::Date(d)
    }
}

impl std::fmt::Display for DataValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d %H:%M")),
            other => write!(f, "{}", other.as_category()),
        }
    }
}

/// One row of chart data: data key -> value. An absent key is "undefined".
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct DataPoint {
    values: BTreeMap<String, DataValue>,
}

impl DataPoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<DataValue>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<DataValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&DataValue> {
        self.values.get(key)
    }

    /// Strict numeric value under `key`
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(DataValue::as_number)
    }

    /// Continuous-axis coordinate under `key`
    pub fn coordinate(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(DataValue::as_coordinate)
    }

    /// Categorical label under `key`
    pub fn category(&self, key: &str) -> Option<String> {
        self.get(key).map(DataValue::as_category)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Keys holding numeric values, excluding `x_key`: the candidate series
    pub fn numeric_keys<'a>(&'a self, x_key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.values
            .iter()
            .filter(move |(k, v)| k.as_str() != x_key && v.as_number().is_some())
            .map(|(k, _)| k.as_str())
    }
}

impl<K: Into<String>, V: Into<DataValue>> FromIterator<(K, V)> for DataPoint {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl<'de> Deserialize<'de> for DataPoint {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // JSON null means "undefined": the key is dropped
        let raw = BTreeMap::<String, Option<DataValue>>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key, v)))
            .collect())
    }
}

/// Parse a JSON array of objects into data points
pub fn parse_data(json: &str) -> Result<Vec<DataPoint>, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_value_kinds() {
        assert_eq!(DataValue::from(3.5).as_number(), Some(3.5));
        assert_eq!(DataValue::from("x").as_number(), None);
        assert_eq!(DataValue::Number(f64::NAN).as_number(), None);

        let date = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(DataValue::from(date).as_number(), None);
        assert_eq!(
            DataValue::from(date).as_coordinate(),
            Some(date.timestamp_millis() as f64)
        );
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(DataValue::from(2024_i64).as_category(), "2024");
        assert_eq!(DataValue::from(1.5).as_category(), "1.5");
        assert_eq!(DataValue::from("Mon").as_category(), "Mon");
    }

    #[test]
    fn test_numeric_keys_skip_x_and_text() {
        let point = DataPoint::new()
            .with("month", "Jan")
            .with("sales", 10.0)
            .with("note", "peak")
            .with("cost", 4.0);

        let keys: Vec<&str> = point.numeric_keys("month").collect();
        assert_eq!(keys, vec!["cost", "sales"]);
    }

    #[test]
    fn test_parse_json_rows() {
        let json = r#"[
            {"day": "2024-03-01T00:00:00Z", "visits": 12, "label": "a"},
            {"day": "2024-03-02T00:00:00Z", "visits": null}
        ]"#;
        let rows = parse_data(json).unwrap();
        assert!(matches!(rows[0].get("day"), Some(DataValue::Date(_))));
        assert_eq!(rows[0].number("visits"), Some(12.0));
        assert_eq!(rows[0].category("label").as_deref(), Some("a"));
        assert_eq!(rows[1].get("visits"), None);
    }
}
