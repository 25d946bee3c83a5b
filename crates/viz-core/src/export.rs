//! CSV export of the underlying chart data

use crate::{DataPoint, DataValue};

/// Serialize `data` as CSV with one column per entry in `columns`
///
/// Dates are written as RFC 3339, missing values as empty cells.
pub fn to_csv(data: &[DataPoint], columns: &[&str]) -> String {
    match try_to_csv(data, columns) {
        Ok(csv) => csv,
        Err(e) => {
            tracing::error!("CSV export failed: {}", e);
            String::new()
        }
    }
}

pub fn try_to_csv(data: &[DataPoint], columns: &[&str]) -> Result<String, csv::Error> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(columns)?;

    for point in data {
        writer.write_record(columns.iter().map(|column| cell(point.get(column))))?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn cell(value: Option<&DataValue>) -> String {
    match value {
        Some(DataValue::Number(n)) => n.to_string(),
        Some(DataValue::Date(d)) => d.to_rfc3339(),
        Some(DataValue::Text(s)) => s.clone(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_csv_export() {
        let data = vec![
            DataPoint::new().with("name", "a,b").with("value", 1.5),
            DataPoint::new().with("name", "say \"hi\""),
        ];
        let csv = to_csv(&data, &["name", "value"]);
        assert_eq!(csv, "name,value\n\"a,b\",1.5\n\"say \"\"hi\"\"\",\n");
    }

    #[test]
    fn test_csv_dates_are_rfc3339() {
        let date = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let data = vec![DataPoint::new().with("date", date).with("v", 2.0)];
        let csv = to_csv(&data, &["date", "v"]);
        assert_eq!(csv, "date,v\n2024-01-01T00:00:00+00:00,2\n");
    }
}
