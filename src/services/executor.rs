//! Store access: runs one statement on a scoped connection and reads the
//! result set eagerly.

use mysql_async::prelude::Queryable;
use mysql_async::{Opts, OptsBuilder, Pool};
use serde_json::Value;

use crate::config::DatabaseConfig;
use crate::models::QueryResult;
use crate::utils::{ApiError, ApiResult};

pub struct StoreExecutor {
    pool: Pool,
}

impl StoreExecutor {
    pub fn new(config: &DatabaseConfig) -> Self {
        let opts: Opts = OptsBuilder::default()
            .ip_or_hostname(config.host.clone())
            .tcp_port(config.port)
            .user(Some(config.user.clone()))
            .pass(Some(config.password.clone()))
            .db_name(Some(config.name.clone()))
            .into();
        Self { pool: Pool::new(opts) }
    }

    /// Execute exactly the given statement and collect the full result set.
    ///
    /// The connection is scoped to this call and returned to the pool on
    /// every exit path. Safety comes entirely from the gate; the store may
    /// still reject an approved statement (unknown column, type error) and
    /// that surfaces as a query failure, not a panic.
    pub async fn query(&self, sql: &str) -> ApiResult<QueryResult> {
        let mut conn = self
            .pool
            .get_conn()
            .await
            .map_err(|e| ApiError::store_unavailable(format!("failed to get connection: {}", e)))?;

        let rows: Vec<mysql_async::Row> = conn
            .query(sql)
            .await
            .map_err(|e| ApiError::query_failed(format!("statement '{}' failed: {}", sql, e)))?;

        tracing::debug!("SQL '{}' returned {} rows", sql, rows.len());

        drop(conn);

        Ok(rows_to_result(rows))
    }

    /// Run a parameterized write statement (sampler inserts).
    pub async fn exec_drop<P>(&self, sql: &str, params: P) -> ApiResult<()>
    where
        P: Into<mysql_async::Params> + Send,
    {
        let mut conn = self
            .pool
            .get_conn()
            .await
            .map_err(|e| ApiError::store_unavailable(format!("failed to get connection: {}", e)))?;

        conn.exec_drop(sql, params.into())
            .await
            .map_err(|e| ApiError::query_failed(format!("statement failed: {}", e)))?;

        drop(conn);
        Ok(())
    }

    /// Create the `stats` table when it does not exist yet, so a fresh
    /// deployment can start sampling without manual provisioning.
    pub async fn ensure_schema(&self) -> ApiResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS stats (
                id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
                timestamp DATETIME NOT NULL,
                cpu_usage DOUBLE NULL,
                memory_usage DOUBLE NULL,
                host VARCHAR(255) NULL,
                KEY idx_stats_timestamp (timestamp)
            )
        "#;

        let mut conn = self
            .pool
            .get_conn()
            .await
            .map_err(|e| ApiError::store_unavailable(format!("failed to get connection: {}", e)))?;

        conn.query_drop(ddl)
            .await
            .map_err(|e| ApiError::query_failed(format!("schema provisioning failed: {}", e)))?;

        drop(conn);
        Ok(())
    }
}

fn rows_to_result(rows: Vec<mysql_async::Row>) -> QueryResult {
    if rows.is_empty() {
        return QueryResult::empty();
    }

    let col_count = rows[0].columns_ref().len();

    let mut columns = Vec::with_capacity(col_count);
    for col in rows[0].columns_ref().iter() {
        columns.push(col.name_str().to_string());
    }

    let mut result_rows = Vec::with_capacity(rows.len());
    for row in rows.iter() {
        let mut row_data = Vec::with_capacity(col_count);
        for col_idx in 0..col_count {
            row_data.push(value_to_json(&row[col_idx]));
        }
        result_rows.push(row_data);
    }

    QueryResult { columns, rows: result_rows }
}

/// Keep the source column's natural representation: numbers stay numbers,
/// NULL becomes JSON null, datetimes use one consistent textual form.
fn value_to_json(value: &mysql_async::Value) -> Value {
    match value {
        mysql_async::Value::NULL => Value::Null,
        mysql_async::Value::Bytes(bytes) => match std::str::from_utf8(bytes) {
            Ok(s) => Value::String(s.to_string()),
            Err(_) => Value::String(String::from_utf8_lossy(bytes).to_string()),
        },
        mysql_async::Value::Int(i) => Value::from(*i),
        mysql_async::Value::UInt(u) => Value::from(*u),
        mysql_async::Value::Float(f) => {
            serde_json::Number::from_f64(f64::from(*f)).map_or(Value::Null, Value::Number)
        },
        mysql_async::Value::Double(d) => {
            serde_json::Number::from_f64(*d).map_or(Value::Null, Value::Number)
        },
        mysql_async::Value::Date(year, month, day, hour, minute, second, _micro) => {
            Value::String(format!(
                "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                year, month, day, hour, minute, second
            ))
        },
        mysql_async::Value::Time(_neg, days, hours, minutes, seconds, _micro) => {
            let total_hours = days * 24 + u32::from(*hours);
            Value::String(format!("{}:{:02}:{:02}", total_hours, minutes, seconds))
        },
    }
}
