use once_cell::sync::Lazy;
use regex::Regex;

use crate::services::query_gate::{DEFAULT_ROW_CAP, extract_limit, sanitize};
use crate::utils::ApiError;

static SANITIZED_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)^SELECT .* LIMIT \d+;$").unwrap());

fn assert_accepted(raw: &str) -> String {
    match sanitize(raw, DEFAULT_ROW_CAP) {
        Ok(sql) => sql,
        Err(e) => panic!("expected '{}' to be accepted, got: {}", raw, e),
    }
}

#[test]
fn accepted_output_is_bounded_select() {
    let inputs = [
        "SELECT * FROM stats",
        "select cpu_usage from stats limit 10",
        "  SELECT memory_usage, timestamp FROM stats ORDER BY timestamp DESC LIMIT 100;  ",
        "select * from stats where cpu_usage > 50",
    ];

    for raw in inputs {
        let sql = assert_accepted(raw);
        assert!(SANITIZED_SHAPE.is_match(&sql), "unexpected shape: {}", sql);
        let limit = extract_limit(&sql).expect("sanitized text always has a limit");
        assert!(limit <= DEFAULT_ROW_CAP, "limit {} exceeds cap in: {}", limit, sql);
    }
}

#[test]
fn missing_limit_is_auto_appended_with_cap() {
    let sql = assert_accepted("SELECT * FROM stats");
    assert_eq!(sql, format!("SELECT * FROM stats LIMIT {};", DEFAULT_ROW_CAP));
}

#[test]
fn oversized_limit_is_rewritten_to_cap() {
    let sql = assert_accepted("select * from stats limit 5000");
    assert_eq!(extract_limit(&sql), Some(DEFAULT_ROW_CAP));
    // The rest of the statement is untouched.
    assert!(sql.to_lowercase().starts_with("select * from stats"));
}

#[test]
fn in_cap_limit_is_preserved() {
    let sql = assert_accepted("SELECT * FROM stats LIMIT 5");
    assert_eq!(extract_limit(&sql), Some(5));
}

#[test]
fn custom_cap_is_honored() {
    let sql = sanitize("SELECT * FROM stats LIMIT 500", 100).unwrap();
    assert_eq!(extract_limit(&sql), Some(100));
}

#[test]
fn non_select_is_rejected() {
    let err = sanitize("DROP TABLE stats", DEFAULT_ROW_CAP).unwrap_err();
    assert!(matches!(err, ApiError::InvalidSql(_)));
}

#[test]
fn forbidden_keywords_rejected_in_any_case() {
    let inputs = [
        "SELECT * FROM stats; DELETE FROM stats",
        "SELECT * FROM stats WHERE 1=1 UNION SELECT 1; drop table stats",
        "select * from stats where id in (select id from stats) ; TRUNCATE stats",
    ];
    for raw in inputs {
        assert!(sanitize(raw, DEFAULT_ROW_CAP).is_err(), "should reject: {}", raw);
    }

    for raw in [
        "SELECT * FROM stats WHERE x = 1 OR delete",
        "SELECT DeLeTe FROM stats",
        "SELECT 1 WHERE  TRUNCATE  ",
        "select grant from t",
    ] {
        let err = sanitize(raw, DEFAULT_ROW_CAP).unwrap_err();
        assert!(
            matches!(err, ApiError::SqlSafetyViolation(_)),
            "expected safety violation for '{}', got: {}",
            raw,
            err
        );
    }
}

#[test]
fn keyword_as_identifier_substring_is_allowed() {
    // Whole-token matching: `created_at` must not trigger the CREATE block,
    // `updated_at` must not trigger UPDATE.
    let sql = assert_accepted("SELECT created_at, updated_at, dropped_count FROM stats LIMIT 10");
    assert!(sql.contains("created_at"));
}

#[test]
fn statement_stacking_is_rejected() {
    assert!(sanitize("SELECT 1; SELECT 2", DEFAULT_ROW_CAP).is_err());
    // One trailing terminator is fine.
    assert!(sanitize("SELECT 1;", DEFAULT_ROW_CAP).is_ok());
}

#[test]
fn empty_input_is_rejected() {
    assert!(sanitize("", DEFAULT_ROW_CAP).is_err());
    assert!(sanitize("   ;  ", DEFAULT_ROW_CAP).is_err());
}

#[test]
fn rejection_reasons_are_client_errors() {
    for raw in ["DROP TABLE stats", "SELECT delete FROM t", "SELECT 1; SELECT 2"] {
        let err = sanitize(raw, DEFAULT_ROW_CAP).unwrap_err();
        assert!(err.is_client_error(), "'{}' should map to a 400", raw);
    }
}
