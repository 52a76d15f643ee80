use crate::errors::SimError;
use crate::models::timestamp::Timestamp;
use crate::numerics::time_series::{Interpolant, TimeSeries};
use csv::{ReaderBuilder, StringRecord, Trim};
use nalgebra as na;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// Header names of the time column and the three field components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldColumns {
    pub time: String,
    pub x: String,
    pub y: String,
    pub z: String,
}

impl Default for FieldColumns {
    // STK magnetic field report layout
    fn default() -> Self {
        FieldColumns {
            time: "Time (UTCG)".to_string(),
            x: "x (nT)".to_string(),
            y: "y (nT)".to_string(),
            z: "z (nT)".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
}

fn find_column(headers: &StringRecord, name: &str) -> Result<usize, SimError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| SimError::MissingColumn(name.to_string()))
}

/// Reads every row through `parse_row`, skipping rows it rejects.
fn load_rows<R, T, F>(
    reader: R,
    columns: &[&str],
    scale: f64,
    parse_row: F,
) -> Result<(TimeSeries<T>, LoadReport), SimError>
where
    R: Read,
    T: Interpolant,
    F: Fn(&StringRecord, &[usize]) -> Result<(Timestamp, T), String>,
{
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let indices = columns
        .iter()
        .map(|name| find_column(&headers, name))
        .collect::<Result<Vec<_>, _>>()?;

    let mut series = TimeSeries::new();
    let mut report = LoadReport::default();

    for (line, result) in rdr.records().enumerate() {
        // Header is line 1
        let line = line + 2;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!(line, error = %e, "Skipping unreadable row");
                report.skipped += 1;
                continue;
            }
        };

        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        if record.len() != headers.len() {
            warn!(
                line,
                found = record.len(),
                expected = headers.len(),
                "Skipping malformed row (column count)"
            );
            report.skipped += 1;
            continue;
        }

        match parse_row(&record, &indices) {
            Ok((time, value)) => {
                series.push(time, value * scale);
                report.loaded += 1;
            }
            Err(reason) => {
                warn!(line, %reason, "Skipping malformed row");
                report.skipped += 1;
            }
        }
    }

    series.sort();
    let duplicates = series.dedup_times();
    if duplicates > 0 {
        warn!(duplicates, "Dropped samples repeating an earlier timestamp");
        report.loaded -= duplicates;
        report.skipped += duplicates;
    }
    info!(loaded = report.loaded, skipped = report.skipped, "Loaded time series");
    Ok((series, report))
}

fn parse_number(record: &StringRecord, index: usize) -> Result<f64, String> {
    let text = &record[index];
    text.parse::<f64>()
        .map_err(|_| format!("invalid number '{}'", text))
}

fn parse_time(record: &StringRecord, index: usize) -> Result<Timestamp, String> {
    Timestamp::parse(&record[index]).map_err(|e| e.to_string())
}

/// Loads a vector field series, multiplying every sample by `scale`.
pub fn load_vector_series<R: Read>(
    reader: R,
    columns: &FieldColumns,
    scale: f64,
) -> Result<(TimeSeries<na::Vector3<f64>>, LoadReport), SimError> {
    let names = [
        columns.time.as_str(),
        columns.x.as_str(),
        columns.y.as_str(),
        columns.z.as_str(),
    ];
    load_rows(reader, &names, scale, |record, idx| {
        let time = parse_time(record, idx[0])?;
        let value = na::Vector3::new(
            parse_number(record, idx[1])?,
            parse_number(record, idx[2])?,
            parse_number(record, idx[3])?,
        );
        Ok((time, value))
    })
}

pub fn load_scalar_series<R: Read>(
    reader: R,
    time_column: &str,
    value_column: &str,
    scale: f64,
) -> Result<(TimeSeries<f64>, LoadReport), SimError> {
    load_rows(reader, &[time_column, value_column], scale, |record, idx| {
        Ok((parse_time(record, idx[0])?, parse_number(record, idx[1])?))
    })
}

pub fn load_vector_file(
    path: &Path,
    columns: &FieldColumns,
    scale: f64,
) -> Result<(TimeSeries<na::Vector3<f64>>, LoadReport), SimError> {
    info!(path = %path.display(), "Reading magnetic field data");
    load_vector_series(File::open(path)?, columns, scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const GOOD: &str = "\
\"Time (UTCG)\",\"x (nT)\",\"y (nT)\",\"z (nT)\"
1 Oct 2025 07:00:00.000,100.0,0.0,-50.0
1 Oct 2025 07:00:01.000,110.0,5.0,-50.0
1 Oct 2025 07:00:02.000,120.0,10.0,-50.0
";

    #[test]
    fn loads_and_scales_vectors() {
        let (series, report) =
            load_vector_series(GOOD.as_bytes(), &FieldColumns::default(), 0.5).unwrap();
        assert_eq!(report, LoadReport { loaded: 3, skipped: 0 });
        assert!(series.is_sorted());
        assert_abs_diff_eq!(
            series.samples()[1].value,
            na::Vector3::new(55.0, 2.5, -25.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let input = "\
Time (UTCG),x (nT),y (nT),z (nT)
1 Oct 2025 07:00:00.000,1,2,3
1 Oct 2025 07:00:01.000,1,2
1 Oct 2025 07:00:02.000,1,2,3,4
not a time,1,2,3
1 Oct 2025 07:00:04.000,1,abc,3
1 Oct 2025 07:00:05.000,4,5,6
";
        let (series, report) =
            load_vector_series(input.as_bytes(), &FieldColumns::default(), 1.0).unwrap();
        let rows = 6;
        assert_eq!(report.skipped, 4);
        assert_eq!(report.loaded, rows - report.skipped);
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn rows_out_of_order_are_sorted() {
        let input = "\
Time,B
1 Oct 2025 07:00:02,3
1 Oct 2025 07:00:00,1
1 Oct 2025 07:00:01,2
";
        let (series, _) = load_scalar_series(input.as_bytes(), "Time", "B", 1.0).unwrap();
        let values: Vec<f64> = series.samples().iter().map(|s| s.value).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn repeated_timestamps_keep_the_first_row() {
        let input = "\
Time,B
1 Oct 2025 07:00:00,1
1 Oct 2025 07:00:01,2
1 Oct 2025 07:00:01,9
1 Oct 2025 07:00:02,3
1 Oct 2025 07:00:03,4
";
        let (series, report) = load_scalar_series(input.as_bytes(), "Time", "B", 1.0).unwrap();
        assert_eq!(report, LoadReport { loaded: 4, skipped: 1 });
        let values: Vec<f64> = series.samples().iter().map(|s| s.value).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0]);
        assert!(series.lagrange_interpolate(series.samples()[1].time).is_ok());
    }

    #[test]
    fn missing_column_is_fatal() {
        let columns = FieldColumns {
            z: "w (nT)".to_string(),
            ..FieldColumns::default()
        };
        let result = load_vector_series(GOOD.as_bytes(), &columns, 1.0);
        assert!(matches!(result, Err(SimError::MissingColumn(name)) if name == "w (nT)"));
    }
}
