use crate::colors::hex_to_color;
use crate::errors::{EngineError, InvalidParamsError};
use crate::fields::{ParagraphStyleMask, TextStyleMask};
use crate::model::{EditResponse, TableListResponse};
use crate::plan::RangeEditPlan;
use crate::resolve::{body_end_index, list_tables, resolve_table_cell_range};
use crate::state::AppState;
use crate::tools::param_enums::{NamedStyle, ParagraphAlignment};
use anyhow::Result;
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;

/// Optional character-level style attributes, as callers supply them.
/// Colors are hex strings; everything else maps 1:1 onto the wire style.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct TextStyleParams {
    #[serde(default)]
    pub bold: Option<bool>,
    #[serde(default)]
    pub italic: Option<bool>,
    #[serde(default)]
    pub underline: Option<bool>,
    #[serde(default)]
    pub strikethrough: Option<bool>,
    #[serde(default)]
    pub font_size: Option<f64>,
    /// Hex text color, e.g. `#C0392B` or `F00`.
    #[serde(default)]
    pub color: Option<String>,
}

impl TextStyleParams {
    pub fn to_mask(&self, tool: &'static str) -> Result<TextStyleMask> {
        let mut mask = TextStyleMask::new();
        if let Some(v) = self.bold {
            mask = mask.bold(v);
        }
        if let Some(v) = self.italic {
            mask = mask.italic(v);
        }
        if let Some(v) = self.underline {
            mask = mask.underline(v);
        }
        if let Some(v) = self.strikethrough {
            mask = mask.strikethrough(v);
        }
        if let Some(size) = self.font_size {
            if !(1.0..=400.0).contains(&size) {
                return Err(InvalidParamsError::new(tool, "font_size must be 1-400 points")
                    .with_path("font_size")
                    .into());
            }
            mask = mask.font_size_pt(size);
        }
        if let Some(hex) = self.color.as_deref() {
            let color = hex_to_color(hex).ok_or_else(|| {
                InvalidParamsError::new(
                    tool,
                    format!("invalid color '{hex}' (expected #RGB or #RRGGBB)"),
                )
                .with_path("color")
            })?;
            mask = mask.foreground_color(color);
        }
        Ok(mask)
    }
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ParagraphStyleParams {
    #[serde(default)]
    pub named_style: Option<NamedStyle>,
    #[serde(default)]
    pub alignment: Option<ParagraphAlignment>,
}

impl ParagraphStyleParams {
    pub fn to_mask(&self) -> ParagraphStyleMask {
        let mut mask = ParagraphStyleMask::new();
        if let Some(style) = self.named_style {
            mask = mask.named_style(style.wire_name());
        }
        if let Some(alignment) = self.alignment {
            mask = mask.alignment(alignment.wire_name());
        }
        mask
    }
}

fn require_document_id(tool: &'static str, document_id: &str) -> Result<()> {
    if document_id.trim().is_empty() {
        return Err(InvalidParamsError::new(tool, "document_id is required")
            .with_path("document_id")
            .into());
    }
    Ok(())
}

/// Validate a caller-supplied span against the freshly fetched body. The
/// final newline of the body can never be edited, so the last addressable
/// index is `body_end - 1`.
fn check_span(tool: &'static str, start: i64, end: i64, body_end: i64) -> Result<()> {
    if start < 1 || end < start {
        return Err(InvalidParamsError::new(
            tool,
            format!("invalid range [{start}, {end}) (indices are 1-based, end exclusive)"),
        )
        .into());
    }
    if end > body_end - 1 {
        return Err(EngineError::index_out_of_range(format!(
            "range end {end} exceeds document end {}",
            body_end - 1
        ))
        .into());
    }
    Ok(())
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DocsInsertTextParams {
    pub document_id: String,
    /// Character offset to insert at (1-based stream offset). Omit to
    /// append at the end of the body.
    #[serde(default)]
    pub index: Option<i64>,
    pub text: String,
}

pub async fn docs_insert_text(
    state: Arc<AppState>,
    params: DocsInsertTextParams,
) -> Result<EditResponse> {
    require_document_id("docs_insert_text", &params.document_id)?;
    if params.text.is_empty() {
        return Ok(EditResponse::no_op("nothing to insert: text is empty"));
    }

    let document = state.api().get_document(&params.document_id).await?;
    let body_end = body_end_index(&document);
    let index = params.index.unwrap_or(body_end - 1);
    if index < 1 || index > body_end - 1 {
        return Err(EngineError::index_out_of_range(format!(
            "insertion index {index} outside [1, {}]",
            body_end - 1
        ))
        .into());
    }

    let requests = RangeEditPlan::new(index, index)?
        .insert_text(&params.text)
        .build()?;
    let count = requests.len();
    state
        .api()
        .docs_batch_update(&params.document_id, requests)
        .await?;

    Ok(EditResponse::applied(
        format!(
            "Inserted {} characters at index {index}",
            params.text.chars().count()
        ),
        count,
    ))
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DocsDeleteRangeParams {
    pub document_id: String,
    pub start_index: i64,
    pub end_index: i64,
}

pub async fn docs_delete_range(
    state: Arc<AppState>,
    params: DocsDeleteRangeParams,
) -> Result<EditResponse> {
    require_document_id("docs_delete_range", &params.document_id)?;

    let document = state.api().get_document(&params.document_id).await?;
    check_span(
        "docs_delete_range",
        params.start_index,
        params.end_index,
        body_end_index(&document),
    )?;

    let plan = RangeEditPlan::new(params.start_index, params.end_index)?.delete_existing();
    let requests = match plan.build() {
        Ok(requests) => requests,
        Err(EngineError::NoOp) => {
            return Ok(EditResponse::no_op("range is empty; nothing deleted"));
        }
        Err(e) => return Err(e.into()),
    };
    let count = requests.len();
    state
        .api()
        .docs_batch_update(&params.document_id, requests)
        .await?;

    Ok(EditResponse::applied(
        format!(
            "Deleted [{}, {})",
            params.start_index, params.end_index
        ),
        count,
    ))
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DocsReplaceRangeParams {
    pub document_id: String,
    pub start_index: i64,
    pub end_index: i64,
    /// Replacement text. Omit (or pass empty) to delete the range only.
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub text_style: Option<TextStyleParams>,
    #[serde(default)]
    pub paragraph_style: Option<ParagraphStyleParams>,
}

pub async fn docs_replace_range(
    state: Arc<AppState>,
    params: DocsReplaceRangeParams,
) -> Result<EditResponse> {
    require_document_id("docs_replace_range", &params.document_id)?;

    // All parameter translation happens before the metadata fetch so a
    // malformed color or style never costs a remote call.
    let text_mask = match &params.text_style {
        Some(style) => style.to_mask("docs_replace_range")?,
        None => TextStyleMask::new(),
    };
    let para_mask = params
        .paragraph_style
        .as_ref()
        .map(|style| style.to_mask())
        .unwrap_or_default();

    let document = state.api().get_document(&params.document_id).await?;
    check_span(
        "docs_replace_range",
        params.start_index,
        params.end_index,
        body_end_index(&document),
    )?;

    let mut plan =
        RangeEditPlan::new(params.start_index, params.end_index)?.delete_existing();
    if let Some(text) = &params.text {
        plan = plan.insert_text(text);
    }
    let requests = match plan.style_text(text_mask).style_paragraph(para_mask).build() {
        Ok(requests) => requests,
        Err(EngineError::NoOp) => {
            return Ok(EditResponse::no_op(
                "empty range, no replacement text and no style: nothing to do",
            ));
        }
        Err(e) => return Err(e.into()),
    };
    let count = requests.len();
    state
        .api()
        .docs_batch_update(&params.document_id, requests)
        .await?;

    Ok(EditResponse::applied(
        format!(
            "Replaced [{}, {}) with {} characters",
            params.start_index,
            params.end_index,
            params
                .text
                .as_deref()
                .map(|t| t.chars().count())
                .unwrap_or(0)
        ),
        count,
    ))
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DocsStyleRangeParams {
    pub document_id: String,
    pub start_index: i64,
    pub end_index: i64,
    #[serde(default)]
    pub text_style: Option<TextStyleParams>,
    #[serde(default)]
    pub paragraph_style: Option<ParagraphStyleParams>,
}

pub async fn docs_style_range(
    state: Arc<AppState>,
    params: DocsStyleRangeParams,
) -> Result<EditResponse> {
    require_document_id("docs_style_range", &params.document_id)?;

    let text_mask = match &params.text_style {
        Some(style) => style.to_mask("docs_style_range")?,
        None => TextStyleMask::new(),
    };
    let para_mask = params
        .paragraph_style
        .as_ref()
        .map(|style| style.to_mask())
        .unwrap_or_default();
    if text_mask.is_empty() && para_mask.is_empty() {
        return Ok(EditResponse::no_op("no style attributes supplied"));
    }

    let document = state.api().get_document(&params.document_id).await?;
    check_span(
        "docs_style_range",
        params.start_index,
        params.end_index,
        body_end_index(&document),
    )?;

    let requests = match RangeEditPlan::new(params.start_index, params.end_index)?
        .style_text(text_mask)
        .style_paragraph(para_mask)
        .build()
    {
        Ok(requests) => requests,
        Err(EngineError::NoOp) => {
            return Ok(EditResponse::no_op("range is empty; nothing to style"));
        }
        Err(e) => return Err(e.into()),
    };
    let count = requests.len();
    state
        .api()
        .docs_batch_update(&params.document_id, requests)
        .await?;

    Ok(EditResponse::applied(
        format!(
            "Styled [{}, {})",
            params.start_index, params.end_index
        ),
        count,
    ))
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DocsTableCellSetParams {
    pub document_id: String,
    /// Start offset of the table element (see `docs_list_tables`).
    pub table_start_index: i64,
    /// Zero-based row within the table.
    pub row: u32,
    /// Zero-based column within the table.
    pub column: u32,
    /// New cell content. Omit to keep the existing content and restyle it.
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub text_style: Option<TextStyleParams>,
    #[serde(default)]
    pub paragraph_style: Option<ParagraphStyleParams>,
}

/// Replace one table cell's content and restyle the result, in a single
/// atomic batch. The cell span is resolved from fresh structure metadata
/// immediately before the batch is built; nothing is reused across calls.
pub async fn docs_table_cell_set(
    state: Arc<AppState>,
    params: DocsTableCellSetParams,
) -> Result<EditResponse> {
    require_document_id("docs_table_cell_set", &params.document_id)?;
    let text_mask = match &params.text_style {
        Some(style) => style.to_mask("docs_table_cell_set")?,
        None => TextStyleMask::new(),
    };
    let para_mask = params
        .paragraph_style
        .as_ref()
        .map(|style| style.to_mask())
        .unwrap_or_default();

    let document = state.api().get_document(&params.document_id).await?;
    let span = resolve_table_cell_range(
        &document,
        params.table_start_index,
        params.row,
        params.column,
    )?;

    let mut plan = RangeEditPlan::new(span.start, span.end)?;
    if params.text.is_some() {
        plan = plan.delete_existing();
    }
    if let Some(text) = &params.text {
        plan = plan.insert_text(text);
    }
    let requests = match plan.style_text(text_mask).style_paragraph(para_mask).build() {
        Ok(requests) => requests,
        Err(EngineError::NoOp) => {
            return Ok(EditResponse::no_op(
                "cell is empty and no text or style was supplied",
            ));
        }
        Err(e) => return Err(e.into()),
    };
    let count = requests.len();
    state
        .api()
        .docs_batch_update(&params.document_id, requests)
        .await?;

    Ok(EditResponse::applied(
        format!(
            "Updated table cell ({}, {}) at span [{}, {})",
            params.row, params.column, span.start, span.end
        ),
        count,
    ))
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DocsListTablesParams {
    pub document_id: String,
}

pub async fn docs_list_tables(
    state: Arc<AppState>,
    params: DocsListTablesParams,
) -> Result<TableListResponse> {
    require_document_id("docs_list_tables", &params.document_id)?;
    let document = state.api().get_document(&params.document_id).await?;
    Ok(TableListResponse {
        document_id: document.document_id.clone(),
        title: document.title.clone(),
        tables: list_tables(&document),
    })
}
