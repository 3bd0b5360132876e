use crate::config::ServerConfig;
use crate::errors::{EngineError, InvalidParamsError};
use crate::model::{EditResponse, SheetListResponse, TableListResponse};
use crate::state::AppState;
use crate::tools;
use anyhow::{Result, anyhow};
use rmcp::{
    ErrorData as McpError, Json, ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
    transport::stdio,
};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use {once_cell::sync::Lazy, regex::Regex};

const INSTRUCTIONS: &str = "\
Workspace MCP: index-addressed editing of Google Docs and Sheets.

EVERY edit re-reads document/spreadsheet metadata immediately before
computing indices. Never reuse an offset across calls: any mutation
invalidates previously observed offsets (sheet ids stay stable).

DOCS WORKFLOW:
1) docs_list_tables to find table start offsets and dimensions.
2) docs_insert_text / docs_delete_range / docs_replace_range /
   docs_style_range for offset-addressed edits.
3) docs_table_cell_set to replace and restyle one table cell atomically.
Indices are 1-based character offsets into the flattened body; ranges are
end-exclusive.

SHEETS WORKFLOW:
1) sheets_list_sheets for titles, sheet ids and grid sizes.
2) sheets_format_range / sheets_merge_cells / sheets_unmerge_cells for
   formatting, sheets_insert_rows / sheets_insert_columns /
   sheets_delete_rows / sheets_delete_columns for structure,
   sheets_add_conditional_format / sheets_clear_conditional_formats for
   rules.
Ranges use A1 notation (B2:D10, 3:5 for whole rows, A:C for whole
columns), optionally prefixed 'Sheet Name'!. Row numbers are 1-based;
band deletes accept several independent bands and order them safely in
one atomic call.

All edits in one tool call land in a single atomic batchUpdate: the
remote API applies all requests or none. A response with no_op=true means
the request was valid but resolved to zero operations; nothing was sent.";

#[derive(Clone)]
pub struct WorkspaceServer {
    state: Arc<AppState>,
    tool_router: ToolRouter<WorkspaceServer>,
}

impl WorkspaceServer {
    pub fn new(config: Arc<ServerConfig>) -> Result<Self> {
        let state = Arc::new(AppState::new(config)?);
        Ok(Self::from_state(state))
    }

    pub fn from_state(state: Arc<AppState>) -> Self {
        Self {
            state,
            tool_router: Self::tool_router(),
        }
    }

    pub async fn run_stdio(self) -> Result<()> {
        let service = self
            .serve(stdio())
            .await
            .inspect_err(|error| tracing::error!("serving error: {:?}", error))?;
        service.waiting().await?;
        Ok(())
    }

    pub async fn run(self) -> Result<()> {
        self.run_stdio().await
    }

    fn ensure_tool_enabled(&self, tool: &str) -> Result<()> {
        tracing::info!(tool = tool, "tool invocation requested");
        if self.state.config().is_tool_enabled(tool) {
            Ok(())
        } else {
            Err(ToolDisabledError::new(tool).into())
        }
    }

    async fn run_tool_with_timeout<T, F>(&self, tool: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
        T: Serialize,
    {
        let result = if let Some(timeout_duration) = self.state.config().tool_timeout() {
            match tokio::time::timeout(timeout_duration, fut).await {
                Ok(result) => result,
                Err(_) => Err(anyhow!(
                    "tool '{}' timed out after {}ms",
                    tool,
                    timeout_duration.as_millis()
                )),
            }
        } else {
            fut.await
        }?;

        self.ensure_response_size(tool, &result)?;
        Ok(result)
    }

    fn ensure_response_size<T: Serialize>(&self, tool: &str, value: &T) -> Result<()> {
        let Some(limit) = self.state.config().max_response_bytes() else {
            return Ok(());
        };
        let payload = serde_json::to_vec(value)
            .map_err(|e| anyhow!("failed to serialize response for {}: {}", tool, e))?;
        if payload.len() > limit {
            return Err(ResponseTooLargeError::new(tool, payload.len(), limit).into());
        }
        Ok(())
    }
}

#[tool_router]
impl WorkspaceServer {
    #[tool(
        name = "docs_list_tables",
        description = "List tables in a document with start offsets and dimensions"
    )]
    pub async fn docs_list_tables(
        &self,
        Parameters(params): Parameters<tools::DocsListTablesParams>,
    ) -> Result<Json<TableListResponse>, McpError> {
        self.ensure_tool_enabled("docs_list_tables")
            .map_err(|e| to_mcp_error_for_tool("docs_list_tables", e))?;
        self.run_tool_with_timeout(
            "docs_list_tables",
            tools::docs_list_tables(self.state.clone(), params),
        )
        .await
        .map(Json)
        .map_err(|e| to_mcp_error_for_tool("docs_list_tables", e))
    }

    #[tool(
        name = "docs_insert_text",
        description = "Insert text at a character offset (or append)"
    )]
    pub async fn docs_insert_text(
        &self,
        Parameters(params): Parameters<tools::DocsInsertTextParams>,
    ) -> Result<Json<EditResponse>, McpError> {
        self.ensure_tool_enabled("docs_insert_text")
            .map_err(|e| to_mcp_error_for_tool("docs_insert_text", e))?;
        self.run_tool_with_timeout(
            "docs_insert_text",
            tools::docs_insert_text(self.state.clone(), params),
        )
        .await
        .map(Json)
        .map_err(|e| to_mcp_error_for_tool("docs_insert_text", e))
    }

    #[tool(
        name = "docs_delete_range",
        description = "Delete a character range from a document"
    )]
    pub async fn docs_delete_range(
        &self,
        Parameters(params): Parameters<tools::DocsDeleteRangeParams>,
    ) -> Result<Json<EditResponse>, McpError> {
        self.ensure_tool_enabled("docs_delete_range")
            .map_err(|e| to_mcp_error_for_tool("docs_delete_range", e))?;
        self.run_tool_with_timeout(
            "docs_delete_range",
            tools::docs_delete_range(self.state.clone(), params),
        )
        .await
        .map(Json)
        .map_err(|e| to_mcp_error_for_tool("docs_delete_range", e))
    }

    #[tool(
        name = "docs_replace_range",
        description = "Replace a character range with new text and optional styling"
    )]
    pub async fn docs_replace_range(
        &self,
        Parameters(params): Parameters<tools::DocsReplaceRangeParams>,
    ) -> Result<Json<EditResponse>, McpError> {
        self.ensure_tool_enabled("docs_replace_range")
            .map_err(|e| to_mcp_error_for_tool("docs_replace_range", e))?;
        self.run_tool_with_timeout(
            "docs_replace_range",
            tools::docs_replace_range(self.state.clone(), params),
        )
        .await
        .map(Json)
        .map_err(|e| to_mcp_error_for_tool("docs_replace_range", e))
    }

    #[tool(
        name = "docs_style_range",
        description = "Apply character or paragraph styling to a range"
    )]
    pub async fn docs_style_range(
        &self,
        Parameters(params): Parameters<tools::DocsStyleRangeParams>,
    ) -> Result<Json<EditResponse>, McpError> {
        self.ensure_tool_enabled("docs_style_range")
            .map_err(|e| to_mcp_error_for_tool("docs_style_range", e))?;
        self.run_tool_with_timeout(
            "docs_style_range",
            tools::docs_style_range(self.state.clone(), params),
        )
        .await
        .map(Json)
        .map_err(|e| to_mcp_error_for_tool("docs_style_range", e))
    }

    #[tool(
        name = "docs_table_cell_set",
        description = "Replace and restyle one table cell atomically"
    )]
    pub async fn docs_table_cell_set(
        &self,
        Parameters(params): Parameters<tools::DocsTableCellSetParams>,
    ) -> Result<Json<EditResponse>, McpError> {
        self.ensure_tool_enabled("docs_table_cell_set")
            .map_err(|e| to_mcp_error_for_tool("docs_table_cell_set", e))?;
        self.run_tool_with_timeout(
            "docs_table_cell_set",
            tools::docs_table_cell_set(self.state.clone(), params),
        )
        .await
        .map(Json)
        .map_err(|e| to_mcp_error_for_tool("docs_table_cell_set", e))
    }

    #[tool(
        name = "sheets_list_sheets",
        description = "List sheets with ids and grid sizes"
    )]
    pub async fn sheets_list_sheets(
        &self,
        Parameters(params): Parameters<tools::SheetsListSheetsParams>,
    ) -> Result<Json<SheetListResponse>, McpError> {
        self.ensure_tool_enabled("sheets_list_sheets")
            .map_err(|e| to_mcp_error_for_tool("sheets_list_sheets", e))?;
        self.run_tool_with_timeout(
            "sheets_list_sheets",
            tools::sheets_list_sheets(self.state.clone(), params),
        )
        .await
        .map(Json)
        .map_err(|e| to_mcp_error_for_tool("sheets_list_sheets", e))
    }

    #[tool(
        name = "sheets_format_range",
        description = "Apply cell formatting to an A1 range"
    )]
    pub async fn sheets_format_range(
        &self,
        Parameters(params): Parameters<tools::SheetsFormatRangeParams>,
    ) -> Result<Json<EditResponse>, McpError> {
        self.ensure_tool_enabled("sheets_format_range")
            .map_err(|e| to_mcp_error_for_tool("sheets_format_range", e))?;
        self.run_tool_with_timeout(
            "sheets_format_range",
            tools::sheets_format_range(self.state.clone(), params),
        )
        .await
        .map(Json)
        .map_err(|e| to_mcp_error_for_tool("sheets_format_range", e))
    }

    #[tool(
        name = "sheets_delete_rows",
        description = "Delete one or more whole-row bands"
    )]
    pub async fn sheets_delete_rows(
        &self,
        Parameters(params): Parameters<tools::SheetsDeleteRowsParams>,
    ) -> Result<Json<EditResponse>, McpError> {
        self.ensure_tool_enabled("sheets_delete_rows")
            .map_err(|e| to_mcp_error_for_tool("sheets_delete_rows", e))?;
        self.run_tool_with_timeout(
            "sheets_delete_rows",
            tools::sheets_delete_rows(self.state.clone(), params),
        )
        .await
        .map(Json)
        .map_err(|e| to_mcp_error_for_tool("sheets_delete_rows", e))
    }

    #[tool(
        name = "sheets_delete_columns",
        description = "Delete one or more whole-column bands"
    )]
    pub async fn sheets_delete_columns(
        &self,
        Parameters(params): Parameters<tools::SheetsDeleteColumnsParams>,
    ) -> Result<Json<EditResponse>, McpError> {
        self.ensure_tool_enabled("sheets_delete_columns")
            .map_err(|e| to_mcp_error_for_tool("sheets_delete_columns", e))?;
        self.run_tool_with_timeout(
            "sheets_delete_columns",
            tools::sheets_delete_columns(self.state.clone(), params),
        )
        .await
        .map(Json)
        .map_err(|e| to_mcp_error_for_tool("sheets_delete_columns", e))
    }

    #[tool(name = "sheets_insert_rows", description = "Insert blank rows")]
    pub async fn sheets_insert_rows(
        &self,
        Parameters(params): Parameters<tools::SheetsInsertRowsParams>,
    ) -> Result<Json<EditResponse>, McpError> {
        self.ensure_tool_enabled("sheets_insert_rows")
            .map_err(|e| to_mcp_error_for_tool("sheets_insert_rows", e))?;
        self.run_tool_with_timeout(
            "sheets_insert_rows",
            tools::sheets_insert_rows(self.state.clone(), params),
        )
        .await
        .map(Json)
        .map_err(|e| to_mcp_error_for_tool("sheets_insert_rows", e))
    }

    #[tool(name = "sheets_insert_columns", description = "Insert blank columns")]
    pub async fn sheets_insert_columns(
        &self,
        Parameters(params): Parameters<tools::SheetsInsertColumnsParams>,
    ) -> Result<Json<EditResponse>, McpError> {
        self.ensure_tool_enabled("sheets_insert_columns")
            .map_err(|e| to_mcp_error_for_tool("sheets_insert_columns", e))?;
        self.run_tool_with_timeout(
            "sheets_insert_columns",
            tools::sheets_insert_columns(self.state.clone(), params),
        )
        .await
        .map(Json)
        .map_err(|e| to_mcp_error_for_tool("sheets_insert_columns", e))
    }

    #[tool(name = "sheets_merge_cells", description = "Merge a rectangular range")]
    pub async fn sheets_merge_cells(
        &self,
        Parameters(params): Parameters<tools::SheetsMergeCellsParams>,
    ) -> Result<Json<EditResponse>, McpError> {
        self.ensure_tool_enabled("sheets_merge_cells")
            .map_err(|e| to_mcp_error_for_tool("sheets_merge_cells", e))?;
        self.run_tool_with_timeout(
            "sheets_merge_cells",
            tools::sheets_merge_cells(self.state.clone(), params),
        )
        .await
        .map(Json)
        .map_err(|e| to_mcp_error_for_tool("sheets_merge_cells", e))
    }

    #[tool(name = "sheets_unmerge_cells", description = "Unmerge a range")]
    pub async fn sheets_unmerge_cells(
        &self,
        Parameters(params): Parameters<tools::SheetsUnmergeCellsParams>,
    ) -> Result<Json<EditResponse>, McpError> {
        self.ensure_tool_enabled("sheets_unmerge_cells")
            .map_err(|e| to_mcp_error_for_tool("sheets_unmerge_cells", e))?;
        self.run_tool_with_timeout(
            "sheets_unmerge_cells",
            tools::sheets_unmerge_cells(self.state.clone(), params),
        )
        .await
        .map(Json)
        .map_err(|e| to_mcp_error_for_tool("sheets_unmerge_cells", e))
    }

    #[tool(
        name = "sheets_add_conditional_format",
        description = "Add a conditional format rule to a range"
    )]
    pub async fn sheets_add_conditional_format(
        &self,
        Parameters(params): Parameters<tools::AddConditionalFormatParams>,
    ) -> Result<Json<EditResponse>, McpError> {
        self.ensure_tool_enabled("sheets_add_conditional_format")
            .map_err(|e| to_mcp_error_for_tool("sheets_add_conditional_format", e))?;
        self.run_tool_with_timeout(
            "sheets_add_conditional_format",
            tools::sheets_add_conditional_format(self.state.clone(), params),
        )
        .await
        .map(Json)
        .map_err(|e| to_mcp_error_for_tool("sheets_add_conditional_format", e))
    }

    #[tool(
        name = "sheets_clear_conditional_formats",
        description = "Delete all conditional format rules on a sheet"
    )]
    pub async fn sheets_clear_conditional_formats(
        &self,
        Parameters(params): Parameters<tools::ClearConditionalFormatsParams>,
    ) -> Result<Json<EditResponse>, McpError> {
        self.ensure_tool_enabled("sheets_clear_conditional_formats")
            .map_err(|e| to_mcp_error_for_tool("sheets_clear_conditional_formats", e))?;
        self.run_tool_with_timeout(
            "sheets_clear_conditional_formats",
            tools::sheets_clear_conditional_formats(self.state.clone(), params),
        )
        .await
        .map(Json)
        .map_err(|e| to_mcp_error_for_tool("sheets_clear_conditional_formats", e))
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for WorkspaceServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(INSTRUCTIONS.to_string()),
            ..ServerInfo::default()
        }
    }
}

fn to_mcp_error_for_tool(tool: &str, error: anyhow::Error) -> McpError {
    if error.is::<ToolDisabledError>() || error.is::<ResponseTooLargeError>() {
        return McpError::invalid_request(error.to_string(), None);
    }

    if let Some(engine) = error.downcast_ref::<EngineError>() {
        return match engine {
            EngineError::InvalidFormat(_)
            | EngineError::IndexOutOfRange(_)
            | EngineError::NotATable(_) => {
                let msg = format_invalid_params_message(
                    tool,
                    &engine.to_string(),
                    None,
                    None,
                    tool_minimal_example(tool),
                );
                McpError::invalid_params(msg, None)
            }
            EngineError::NotFound(_) | EngineError::EmptyDocument => {
                McpError::invalid_request(engine.to_string(), None)
            }
            EngineError::InvalidArgument(m) => {
                McpError::invalid_params(format!("remote rejected request: {m}"), None)
            }
            EngineError::PermissionDenied(_)
            | EngineError::Unavailable(_)
            | EngineError::NoOp => McpError::internal_error(engine.to_string(), None),
        };
    }

    if let Some(inv) = error.downcast_ref::<InvalidParamsError>() {
        let msg = format_invalid_params_message(
            tool,
            inv.message(),
            inv.path(),
            None,
            tool_minimal_example(tool),
        );
        return McpError::invalid_params(msg, None);
    }

    if let Some(serde_err) = error.downcast_ref::<serde_json::Error>() {
        let problem = serde_err.to_string();
        let variants = extract_expected_variants(&problem);
        let msg = format_invalid_params_message(
            tool,
            &problem,
            None,
            if variants.is_empty() {
                None
            } else {
                Some(&variants)
            },
            tool_minimal_example(tool),
        );
        return McpError::invalid_params(msg, None);
    }

    McpError::internal_error(error.to_string(), None)
}

fn format_invalid_params_message(
    tool: &str,
    problem: &str,
    path: Option<&str>,
    variants: Option<&[String]>,
    example: Option<&'static str>,
) -> String {
    let mut out = String::new();
    out.push_str(&format!("Invalid params for tool '{tool}': {problem}"));

    if let Some(path) = path {
        out.push_str(&format!("\npath: {path}"));
    }

    if let Some(variants) = variants
        && !variants.is_empty()
    {
        out.push_str("\nvalid variants: ");
        out.push_str(&variants.join(", "));
    }

    if let Some(example) = example {
        out.push_str("\nexample: ");
        out.push_str(example);
    }

    out
}

fn tool_minimal_example(tool: &str) -> Option<&'static str> {
    match tool {
        "sheets_delete_rows" => {
            Some(r#"{"spreadsheet_id":"<id>","rows":["3:5"],"sheet_name":"Sheet1"}"#)
        }
        "sheets_delete_columns" => {
            Some(r#"{"spreadsheet_id":"<id>","columns":["A:C"],"sheet_name":"Sheet1"}"#)
        }
        "sheets_format_range" => Some(
            r##"{"spreadsheet_id":"<id>","range":"B2:D10","background_color":"#FFF2CC","bold":true}"##,
        ),
        "sheets_add_conditional_format" => Some(
            r##"{"spreadsheet_id":"<id>","range":"B2:B100","rule":{"kind":"cell_is","operator":"greater_than","value":"100"},"style":{"background_color":"#FFE0E0"}}"##,
        ),
        "docs_table_cell_set" => Some(
            r#"{"document_id":"<id>","table_start_index":120,"row":0,"column":1,"text":"Q2","text_style":{"bold":true}}"#,
        ),
        "docs_replace_range" => Some(
            r#"{"document_id":"<id>","start_index":10,"end_index":15,"text":"replacement"}"#,
        ),
        _ => None,
    }
}

fn extract_expected_variants(problem: &str) -> Vec<String> {
    static EXPECTED_TAIL_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"expected(?: one of)? (?P<tail>.*)$").expect("regex"));
    static BACKTICK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").expect("regex"));

    let Some(caps) = EXPECTED_TAIL_RE.captures(problem) else {
        return Vec::new();
    };
    let tail = caps.name("tail").map(|m| m.as_str()).unwrap_or("");
    BACKTICK_RE
        .captures_iter(tail)
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

#[derive(Debug, Error)]
#[error("tool '{tool_name}' is disabled by server configuration")]
struct ToolDisabledError {
    tool_name: String,
}

impl ToolDisabledError {
    fn new(tool_name: &str) -> Self {
        Self {
            tool_name: tool_name.to_ascii_lowercase(),
        }
    }
}

#[derive(Debug, Error)]
#[error(
    "tool '{tool_name}' response too large ({size} bytes > {limit} bytes); reduce request size"
)]
struct ResponseTooLargeError {
    tool_name: String,
    size: usize,
    limit: usize,
}

impl ResponseTooLargeError {
    fn new(tool_name: &str, size: usize, limit: usize) -> Self {
        Self {
            tool_name: tool_name.to_ascii_lowercase(),
            size,
            limit,
        }
    }
}

#[cfg(test)]
mod typed_errors_tests {
    use super::to_mcp_error_for_tool;
    use crate::errors::{EngineError, InvalidParamsError};
    use rmcp::model::ErrorCode;

    #[test]
    fn invalid_format_is_invalid_params_with_example() {
        let err = EngineError::invalid_format("'X9:Q' is not a whole-row band");
        let mcp = to_mcp_error_for_tool("sheets_delete_rows", err.into());

        assert_eq!(mcp.code, ErrorCode::INVALID_PARAMS);
        assert!(mcp.message.to_ascii_lowercase().contains("example:"));
        assert!(mcp.message.contains("3:5"));
    }

    #[test]
    fn missing_sheet_is_invalid_request() {
        let err = EngineError::not_found("sheet 'Q5' does not exist");
        let mcp = to_mcp_error_for_tool("sheets_format_range", err.into());

        assert_eq!(mcp.code, ErrorCode::INVALID_REQUEST);
        assert!(mcp.message.contains("Q5"));
    }

    #[test]
    fn invalid_params_error_carries_path() {
        let err = InvalidParamsError::new("sheets_format_range", "font_size must be 1-400 points")
            .with_path("font_size");
        let mcp = to_mcp_error_for_tool("sheets_format_range", err.into());

        assert_eq!(mcp.code, ErrorCode::INVALID_PARAMS);
        assert!(mcp.message.to_ascii_lowercase().contains("path: font_size"));
    }

    #[test]
    fn unavailable_is_internal_error() {
        let err = EngineError::Unavailable("backend timed out".to_string());
        let mcp = to_mcp_error_for_tool("docs_insert_text", err.into());

        assert_eq!(mcp.code, ErrorCode::INTERNAL_ERROR);
    }
}
