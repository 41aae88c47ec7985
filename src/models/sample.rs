use chrono::NaiveDateTime;

use crate::models::QueryResult;

/// One timestamped host resource reading from the `stats` table.
///
/// Numeric fields are null when the producer failed to read them; they are
/// never negative when present. Timestamps are UTC at second precision.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub timestamp: NaiveDateTime,
    pub cpu_usage: Option<f64>,
    pub memory_usage: Option<f64>,
}

pub const SAMPLE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

impl Sample {
    /// Extract samples from an executed `timestamp, cpu_usage, memory_usage`
    /// projection. Rows with an unparseable timestamp are skipped; missing or
    /// non-numeric usage values become `None`.
    pub fn from_result(result: &QueryResult) -> Vec<Sample> {
        let ts_idx = result.column_index("timestamp");
        let cpu_idx = result.column_index("cpu_usage");
        let mem_idx = result.column_index("memory_usage");

        let Some(ts_idx) = ts_idx else {
            return Vec::new();
        };

        result
            .rows
            .iter()
            .filter_map(|row| {
                let ts = row.get(ts_idx)?.as_str()?;
                let timestamp = NaiveDateTime::parse_from_str(ts, SAMPLE_TIME_FORMAT).ok()?;
                let cpu_usage = cpu_idx.and_then(|i| row.get(i)).and_then(|v| v.as_f64());
                let memory_usage = mem_idx.and_then(|i| row.get(i)).and_then(|v| v.as_f64());
                Some(Sample { timestamp, cpu_usage, memory_usage })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_rows_and_skips_bad_timestamps() {
        let result = QueryResult {
            columns: vec!["timestamp".into(), "cpu_usage".into(), "memory_usage".into()],
            rows: vec![
                vec![json!("2026-08-29 10:00:00"), json!(12.5), json!(40.0)],
                vec![json!("not a time"), json!(1.0), json!(2.0)],
                vec![json!("2026-08-29 10:00:30"), json!(null), json!(41.0)],
            ],
        };

        let samples = Sample::from_result(&result);
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].cpu_usage, Some(12.5));
        assert_eq!(samples[1].cpu_usage, None);
        assert_eq!(samples[1].memory_usage, Some(41.0));
    }

    #[test]
    fn missing_timestamp_column_yields_nothing() {
        let result = QueryResult {
            columns: vec!["cpu_usage".into()],
            rows: vec![vec![json!(10.0)]],
        };
        assert!(Sample::from_result(&result).is_empty());
    }
}
