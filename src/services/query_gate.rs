//! Validates raw console input into a bounded, read-only SELECT.
//!
//! This is a best-effort allow-list over regex-grade token matching, not a
//! SQL grammar. It guarantees the executed text starts with SELECT, carries
//! no write/DDL keyword as a standalone token, and ends in a single
//! `LIMIT n;` with `n` at or below the configured cap.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::utils::{ApiError, ApiResult};

/// Default row cap applied when the deployment does not configure one.
pub const DEFAULT_ROW_CAP: u64 = 1000;

/// Write/DDL keywords rejected when they appear as standalone tokens.
const FORBIDDEN_KEYWORDS: &[&str] =
    &["insert", "update", "delete", "drop", "alter", "create", "truncate", "grant", "revoke"];

static SELECT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*select\b").expect("valid regex"));

// Identifier-shaped tokens. Matching whole tokens (not substrings) is what
// lets a column named `created_at` through while still catching `CREATE`.
static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").expect("valid regex"));

static LIMIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\blimit\s+(\d+)\b").expect("valid regex"));

/// Validate and rewrite one raw console query.
///
/// On success the returned text matches `^SELECT .* LIMIT \d+;$`
/// (case-insensitive) with the limit at most `cap`. A missing LIMIT clause is
/// auto-appended with the cap; an oversized one is silently rewritten down to
/// it. Rejection is terminal: nothing partially sanitized is ever returned.
pub fn sanitize(raw: &str, cap: u64) -> ApiResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ApiError::invalid_sql("Query is empty"));
    }

    // One trailing terminator is fine; any other semicolon means statement
    // stacking and is rejected outright.
    let stmt = trimmed.strip_suffix(';').unwrap_or(trimmed).trim_end();
    if stmt.contains(';') {
        return Err(ApiError::invalid_sql("Only a single statement is allowed"));
    }

    if !SELECT_RE.is_match(stmt) {
        return Err(ApiError::invalid_sql("Only SELECT statements are allowed"));
    }

    for token in TOKEN_RE.find_iter(stmt) {
        let word = token.as_str().to_ascii_lowercase();
        if FORBIDDEN_KEYWORDS.contains(&word.as_str()) {
            return Err(ApiError::sql_safety_violation(format!(
                "Forbidden keyword in query: {}",
                word.to_ascii_uppercase()
            )));
        }
    }

    let bounded = match LIMIT_RE.captures(stmt) {
        None => format!("{} LIMIT {}", stmt, cap),
        Some(caps) => {
            // Digits-only capture; a parse failure can only be overflow,
            // which is as over-cap as it gets.
            let requested: u64 = caps[1].parse().unwrap_or(u64::MAX);
            if requested > cap {
                LIMIT_RE.replace(stmt, format!("LIMIT {}", cap).as_str()).into_owned()
            } else {
                stmt.to_string()
            }
        },
    };

    Ok(format!("{};", bounded))
}

/// The numeric limit of a sanitized statement, if one is present.
pub fn extract_limit(sql: &str) -> Option<u64> {
    LIMIT_RE.captures(sql).and_then(|caps| caps[1].parse().ok())
}
