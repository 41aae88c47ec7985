//! KPI aggregation over an executed result set.

use crate::models::{QueryResult, Summary};

/// Column names the summarizer recognizes, matched case-sensitively.
const CPU_COLUMN: &str = "cpu_usage";
const MEMORY_COLUMN: &str = "memory_usage";

/// Derive quick KPIs from a result set.
///
/// `count` is always the row count. The averages exist only when the result
/// contains the recognized column with at least one numeric value; nulls and
/// stray non-numeric values are skipped, not errors.
pub fn summarize(result: &QueryResult) -> Summary {
    if result.rows.is_empty() {
        return Summary { avg_cpu: None, avg_memory: None, count: 0 };
    }

    Summary {
        avg_cpu: column_mean(result, CPU_COLUMN),
        avg_memory: column_mean(result, MEMORY_COLUMN),
        count: result.rows.len(),
    }
}

fn column_mean(result: &QueryResult, name: &str) -> Option<f64> {
    let idx = result.column_index(name)?;

    let values: Vec<f64> = result
        .rows
        .iter()
        .filter_map(|row| row.get(idx).and_then(|v| v.as_f64()))
        .collect();

    if values.is_empty() {
        return None;
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    Some(round2(mean))
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
