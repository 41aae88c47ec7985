use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /api/query`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct QueryRequest {
    pub sql: String,
}

/// One executed result set: column names in projection order plus rows of
/// values aligned to those columns. Numbers stay numbers, datetimes are
/// `YYYY-MM-DD HH:MM:SS` strings, SQL NULL becomes JSON null.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct QueryResult {
    pub columns: Vec<String>,
    #[schema(value_type = Vec<Vec<Object>>)]
    pub rows: Vec<Vec<serde_json::Value>>,
}

impl QueryResult {
    pub fn empty() -> Self {
        Self { columns: Vec::new(), rows: Vec::new() }
    }

    /// Index of a column by exact (case-sensitive) name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// KPI aggregates derived from a result set. Absent averages serialize as
/// null, matching what the dashboard renders as an em dash.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Summary {
    pub avg_cpu: Option<f64>,
    pub avg_memory: Option<f64>,
    pub count: usize,
}

/// Response of both `POST /api/query` and `GET /api/query`. `sql` echoes the
/// sanitized statement that was actually executed.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QueryResponse {
    pub columns: Vec<String>,
    #[schema(value_type = Vec<Vec<Object>>)]
    pub rows: Vec<Vec<serde_json::Value>>,
    pub summary: Summary,
    pub sql: String,
}
