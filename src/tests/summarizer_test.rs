use serde_json::json;

use crate::models::QueryResult;
use crate::services::summarizer::summarize;

fn stats_result(rows: Vec<Vec<serde_json::Value>>) -> QueryResult {
    QueryResult {
        columns: vec!["cpu_usage".into(), "memory_usage".into(), "timestamp".into()],
        rows,
    }
}

#[test]
fn empty_result_has_zero_count_and_no_averages() {
    let summary = summarize(&QueryResult::empty());
    assert_eq!(summary.count, 0);
    assert_eq!(summary.avg_cpu, None);
    assert_eq!(summary.avg_memory, None);
}

#[test]
fn averages_both_recognized_columns() {
    let result = stats_result(vec![
        vec![json!(10.0), json!(20.0), json!("2026-08-29 10:00:00")],
        vec![json!(30.0), json!(40.0), json!("2026-08-29 10:00:30")],
    ]);

    let summary = summarize(&result);
    assert_eq!(summary.count, 2);
    assert_eq!(summary.avg_cpu, Some(20.0));
    assert_eq!(summary.avg_memory, Some(30.0));
}

#[test]
fn averages_round_to_two_decimals() {
    let result = stats_result(vec![
        vec![json!(10.0), json!(0.0), json!("t")],
        vec![json!(10.0), json!(0.0), json!("t")],
        vec![json!(11.0), json!(0.0), json!("t")],
    ]);

    // 31 / 3 = 10.333...
    assert_eq!(summarize(&result).avg_cpu, Some(10.33));
}

#[test]
fn nulls_and_strays_are_skipped_not_errors() {
    let result = stats_result(vec![
        vec![json!(null), json!(50.0), json!("t")],
        vec![json!("garbage"), json!(null), json!("t")],
        vec![json!(20.0), json!(70.0), json!("t")],
    ]);

    let summary = summarize(&result);
    assert_eq!(summary.count, 3);
    assert_eq!(summary.avg_cpu, Some(20.0));
    assert_eq!(summary.avg_memory, Some(60.0));
}

#[test]
fn all_null_column_yields_no_average() {
    let result = stats_result(vec![
        vec![json!(null), json!(1.0), json!("t")],
        vec![json!(null), json!(3.0), json!("t")],
    ]);

    let summary = summarize(&result);
    assert_eq!(summary.avg_cpu, None);
    assert_eq!(summary.avg_memory, Some(2.0));
}

#[test]
fn unrecognized_columns_still_count_rows() {
    let result = QueryResult {
        columns: vec!["host".into(), "uptime".into()],
        rows: vec![vec![json!("web-1"), json!(42)], vec![json!("web-2"), json!(7)]],
    };

    let summary = summarize(&result);
    assert_eq!(summary.count, 2);
    assert_eq!(summary.avg_cpu, None);
    assert_eq!(summary.avg_memory, None);
}

#[test]
fn column_match_is_case_sensitive() {
    let result = QueryResult {
        columns: vec!["CPU_USAGE".into()],
        rows: vec![vec![json!(99.0)]],
    };

    assert_eq!(summarize(&result).avg_cpu, None);
}
