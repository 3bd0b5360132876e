//! Typed subset of the Sheets v4 surface this engine reads and emits.

use crate::colors::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spreadsheet {
    pub spreadsheet_id: String,
    #[serde(default)]
    pub properties: Option<SpreadsheetProperties>,
    #[serde(default)]
    pub sheets: Vec<Sheet>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadsheetProperties {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    pub properties: SheetProperties,
    #[serde(default)]
    pub conditional_formats: Vec<ConditionalFormatRule>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    pub sheet_id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub index: i64,
    #[serde(default)]
    pub grid_properties: Option<GridProperties>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridProperties {
    #[serde(default)]
    pub row_count: i64,
    #[serde(default)]
    pub column_count: i64,
}

/// Zero-based, half-open rectangle. An axis with no bounds at all means the
/// range spans that whole dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRange {
    pub sheet_id: i64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub start_row_index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub end_row_index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub start_column_index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub end_column_index: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SheetDimension {
    Rows,
    Columns,
}

impl SheetDimension {
    pub fn noun(self) -> &'static str {
        match self {
            Self::Rows => "rows",
            Self::Columns => "columns",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionRange {
    pub sheet_id: i64,
    pub dimension: SheetDimension,
    pub start_index: i64,
    pub end_index: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextFormat {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub foreground_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub font_size: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberFormat {
    #[serde(rename = "type")]
    pub format_type: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub pattern: Option<String>,
}

/// Cell-level format payload. Built through
/// [`crate::fields::CellFormatMask`] so the payload and the `repeatCell`
/// field mask always agree in membership.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellFormat {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub background_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub text_format: Option<TextFormat>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub horizontal_alignment: Option<HorizontalAlign>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub number_format: Option<NumberFormat>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_entered_format: Option<CellFormat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MergeType {
    MergeAll,
    MergeColumns,
    MergeRows,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionValue {
    pub user_entered_value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooleanCondition {
    #[serde(rename = "type")]
    pub condition_type: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub values: Vec<ConditionValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooleanRule {
    pub condition: BooleanCondition,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub format: Option<CellFormat>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalFormatRule {
    #[serde(default)]
    pub ranges: Vec<GridRange>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub boolean_rule: Option<BooleanRule>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SheetsRequest {
    RepeatCell {
        range: GridRange,
        cell: CellData,
        fields: String,
    },
    DeleteDimension {
        range: DimensionRange,
    },
    InsertDimension {
        range: DimensionRange,
        inherit_from_before: bool,
    },
    MergeCells {
        range: GridRange,
        merge_type: MergeType,
    },
    UnmergeCells {
        range: GridRange,
    },
    AddConditionalFormatRule {
        rule: ConditionalFormatRule,
        index: i64,
    },
    DeleteConditionalFormatRule {
        sheet_id: i64,
        index: i64,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateSpreadsheetRequest {
    pub requests: Vec<SheetsRequest>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateSpreadsheetResponse {
    #[serde(default)]
    pub spreadsheet_id: Option<String>,
    #[serde(default)]
    pub replies: Vec<serde_json::Value>,
}
