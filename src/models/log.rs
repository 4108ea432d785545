//! Persisted analysis log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One request/response pair from the analysis log.
///
/// Rows are written once at the end of a successful upload-analysis cycle
/// and never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisLog {
    /// Database-assigned id, monotonically increasing.
    pub id: i32,
    /// The aggregated document text that was analyzed.
    pub request_text: String,
    /// The JSON-serialized analysis result.
    pub response_text: String,
    /// When the row was written.
    pub timestamp: DateTime<Utc>,
}
