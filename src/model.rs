use crate::resolve::TableSummary;
use schemars::JsonSchema;
use serde::Serialize;

/// Outcome of one logical edit. `no_op` marks a well-formed request that
/// resolved to zero primitive operations; nothing was submitted.
#[derive(Debug, Serialize, JsonSchema)]
pub struct EditResponse {
    pub message: String,
    pub requests_sent: usize,
    pub no_op: bool,
}

impl EditResponse {
    pub fn applied(message: impl Into<String>, requests_sent: usize) -> Self {
        Self {
            message: message.into(),
            requests_sent,
            no_op: false,
        }
    }

    pub fn no_op(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            requests_sent: 0,
            no_op: true,
        }
    }
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct SheetInfo {
    pub title: String,
    pub sheet_id: i64,
    pub index: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_count: Option<i64>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct SheetListResponse {
    pub spreadsheet_id: String,
    pub title: String,
    pub sheets: Vec<SheetInfo>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct TableListResponse {
    pub document_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub tables: Vec<TableSummary>,
}
