//! Historical daily-observation CSV retrieval and parsing.
//!
//! BOM publishes one CSV per station per month, preceded by a free-text
//! preamble of varying length. The parser scans for the real header line,
//! hands the tabular remainder to polars, coerces the `Date` column and
//! filters rows to the requested range. A failed month is skipped, never
//! fatal: the caller gets whatever months succeeded.

use crate::bom::client::BomClient;
use crate::bom::error::BomError;
use crate::stations::directory::Station;
use chrono::{Datelike, NaiveDate};
use log::warn;
use polars::prelude::*;
use serde_json::{Map, Value};
use std::io::Cursor;

/// Lines scanned for the CSV header before giving up on a month.
const HEADER_SCAN_LIMIT: usize = 21;

/// Months touched by the inclusive date range, as `YYYYMM` strings in
/// chronological order.
pub fn months_in_range(start: NaiveDate, end: NaiveDate) -> Vec<String> {
    let mut months = Vec::new();
    let mut current = match start.with_day(1) {
        Some(d) => d,
        None => return months,
    };
    while current <= end {
        months.push(current.format("%Y%m").to_string());
        let next = if current.month() == 12 {
            current
                .with_year(current.year() + 1)
                .and_then(|d| d.with_month(1))
        } else {
            current.with_month(current.month() + 1)
        };
        match next {
            Some(d) => current = d,
            None => break,
        }
    }
    months
}

/// Fetches and parses historical data for every month in the range,
/// concatenated in request order. Partial failure is tolerated per month.
pub async fn fetch_historical_data(
    client: &BomClient,
    station: &Station,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<Map<String, Value>> {
    let mut all_rows = Vec::new();
    for month in months_in_range(start, end) {
        let url = station.history_url_template.replace("YYYYMM", &month);
        let content = match client.fetch_history_csv(&url).await {
            Ok(content) => content,
            Err(e) => {
                warn!("Skipping historical month {month} for {}: {e}", station.name);
                continue;
            }
        };
        match parse_month_csv(&content, start, end) {
            Ok(mut rows) => all_rows.append(&mut rows),
            Err(e) => {
                warn!("Skipping historical month {month} for {}: {e}", station.name);
            }
        }
    }
    all_rows
}

/// Parses one month's CSV content and returns the rows within `[start, end]`
/// as column-to-value maps, with null and blank cells omitted.
pub fn parse_month_csv(
    content: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Map<String, Value>>, BomError> {
    let lines: Vec<&str> = content.lines().collect();
    let header_line = lines
        .iter()
        .take(HEADER_SCAN_LIMIT)
        .position(|line| {
            line.contains("Date") && (line.contains(',') || line.to_lowercase().contains("temperature"))
        })
        .ok_or(BomError::CsvHeaderNotFound)?;

    let csv_section = lines[header_line..].join("\n");
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_ignore_errors(true)
        .with_parse_options(
            CsvParseOptions::default().with_truncate_ragged_lines(true),
        )
        .into_reader_with_file_handle(Cursor::new(csv_section.into_bytes()))
        .finish()
        .map_err(BomError::CsvRead)?;

    if df.height() == 0 {
        return Ok(Vec::new());
    }
    if df.column("Date").is_err() {
        return Err(BomError::CsvDateColumnMissing);
    }

    let filtered = df
        .lazy()
        .with_columns([col("Date").str().to_date(StrptimeOptions {
            format: None,
            strict: false,
            exact: true,
            cache: true,
        })])
        .filter(
            col("Date")
                .gt_eq(lit(start))
                .and(col("Date").lt_eq(lit(end))),
        )
        .collect()?;

    let mut rows = Vec::with_capacity(filtered.height());
    for row_idx in 0..filtered.height() {
        let mut row = Map::new();
        for column in filtered.get_columns() {
            let value = column.get(row_idx)?;
            if let Some(json) = any_value_to_json(&value) {
                row.insert(column.name().to_string(), json);
            }
        }
        if !row.is_empty() {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn any_value_to_json(value: &AnyValue<'_>) -> Option<Value> {
    match value {
        AnyValue::Null => None,
        AnyValue::String(s) => non_blank(s),
        AnyValue::StringOwned(s) => non_blank(s.as_str()),
        AnyValue::Boolean(b) => Some(Value::Bool(*b)),
        AnyValue::Int8(v) => Some(Value::from(*v)),
        AnyValue::Int16(v) => Some(Value::from(*v)),
        AnyValue::Int32(v) => Some(Value::from(*v)),
        AnyValue::Int64(v) => Some(Value::from(*v)),
        AnyValue::UInt8(v) => Some(Value::from(*v)),
        AnyValue::UInt16(v) => Some(Value::from(*v)),
        AnyValue::UInt32(v) => Some(Value::from(*v)),
        AnyValue::UInt64(v) => Some(Value::from(*v)),
        AnyValue::Float32(v) => serde_json::Number::from_f64(f64::from(*v)).map(Value::Number),
        AnyValue::Float64(v) => serde_json::Number::from_f64(*v).map(Value::Number),
        AnyValue::Date(days) => {
            let date = NaiveDate::from_num_days_from_ce_opt(days + EPOCH_DAYS_FROM_CE)?;
            Some(Value::String(date.format("%Y-%m-%d").to_string()))
        }
        other => Some(Value::String(format!("{other}"))),
    }
}

/// Days between 0001-01-01 (chrono's CE origin) and the Unix epoch.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

fn non_blank(s: &str) -> Option<Value> {
    if s.trim().is_empty() {
        None
    } else {
        Some(Value::String(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_list_spans_the_range_inclusive() {
        let months = months_in_range(date(2023, 1, 15), date(2023, 2, 10));
        assert_eq!(months, vec!["202301", "202302"]);
    }

    #[test]
    fn month_list_crosses_year_boundary() {
        let months = months_in_range(date(2022, 11, 30), date(2023, 2, 1));
        assert_eq!(months, vec!["202211", "202212", "202301", "202302"]);
    }

    #[test]
    fn single_day_range_is_one_month() {
        let months = months_in_range(date(2023, 6, 7), date(2023, 6, 7));
        assert_eq!(months, vec!["202306"]);
    }

    const SAMPLE_CSV: &str = "\
Daily Weather Observations for Perth, Western Australia\n\
Prepared at 09:00 local time\n\
\n\
,Date,Minimum temperature (\u{b0}C),Maximum temperature (\u{b0}C),Rainfall (mm)\n\
,2023-01-14,18.2,31.0,0\n\
,2023-01-15,17.9,33.4,\n\
,2023-01-16,19.1,35.2,1.2\n\
,2023-02-11,20.0,36.0,0\n";

    #[test]
    fn rows_are_filtered_to_the_requested_range() {
        let rows = parse_month_csv(SAMPLE_CSV, date(2023, 1, 15), date(2023, 2, 10)).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Date"], "2023-01-15");
        assert_eq!(rows[1]["Date"], "2023-01-16");
    }

    #[test]
    fn blank_cells_are_omitted_from_rows() {
        let rows = parse_month_csv(SAMPLE_CSV, date(2023, 1, 15), date(2023, 1, 15)).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(!rows[0].contains_key("Rainfall (mm)"));
    }

    #[test]
    fn missing_header_is_an_error() {
        let err = parse_month_csv("no tabular data here\n", date(2023, 1, 1), date(2023, 1, 31));
        assert!(matches!(err, Err(BomError::CsvHeaderNotFound)));
    }
}
