//! Typed subset of the Docs v1 surface this engine reads and emits.
//!
//! The read model deserializes only the structural fields the resolver
//! walks; everything else in the document payload is ignored. Requests
//! serialize as the API's one-hot objects (`{"insertText": {...}}`) via
//! externally tagged enum variants.

use crate::colors::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub document_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Body,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    #[serde(default)]
    pub content: Vec<StructuralElement>,
}

/// One entry in the flattened content stream. The API omits `startIndex`
/// on the first element, which starts at 0.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralElement {
    #[serde(default)]
    pub start_index: i64,
    #[serde(default)]
    pub end_index: i64,
    #[serde(default)]
    pub paragraph: Option<Paragraph>,
    #[serde(default)]
    pub table: Option<Table>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Paragraph {}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(default)]
    pub rows: i64,
    #[serde(default)]
    pub columns: i64,
    #[serde(default)]
    pub table_rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    #[serde(default)]
    pub start_index: i64,
    #[serde(default)]
    pub end_index: i64,
    #[serde(default)]
    pub table_cells: Vec<TableCell>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    #[serde(default)]
    pub start_index: i64,
    #[serde(default)]
    pub end_index: i64,
    #[serde(default)]
    pub content: Vec<StructuralElement>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub index: i64,
}

/// Half-open `[startIndex, endIndex)` span in the content stream.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocRange {
    pub start_index: i64,
    pub end_index: i64,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PtSize {
    pub magnitude: f64,
    pub unit: &'static str,
}

impl PtSize {
    pub fn points(magnitude: f64) -> Self {
        Self {
            magnitude,
            unit: "PT",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionalColor {
    pub color: RgbColorWrapper,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RgbColorWrapper {
    pub rgb_color: Color,
}

impl From<Color> for OptionalColor {
    fn from(color: Color) -> Self {
        Self {
            color: RgbColorWrapper { rgb_color: color },
        }
    }
}

/// Character-level style payload. Built exclusively through
/// [`crate::fields::TextStyleMask`] so the payload and the field mask can
/// never disagree.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strikethrough: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<PtSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground_color: Option<OptionalColor>,
}

/// Paragraph-level style payload; see [`crate::fields::ParagraphStyleMask`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub named_style_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DocsRequest {
    InsertText {
        location: Location,
        text: String,
    },
    DeleteContentRange {
        range: DocRange,
    },
    UpdateTextStyle {
        range: DocRange,
        text_style: TextStyle,
        fields: String,
    },
    UpdateParagraphStyle {
        range: DocRange,
        paragraph_style: ParagraphStyle,
        fields: String,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateDocumentRequest {
    pub requests: Vec<DocsRequest>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateDocumentResponse {
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default)]
    pub replies: Vec<serde_json::Value>,
}
