use crate::address::{RangeAddress, column_letters_to_index, parse_range_address};
use crate::api::sheets::{CellData, SheetDimension, SheetsRequest, Spreadsheet};
use crate::colors::hex_to_color;
use crate::errors::{EngineError, InvalidParamsError};
use crate::fields::CellFormatMask;
use crate::model::{EditResponse, SheetInfo, SheetListResponse};
use crate::plan::{DimensionBand, dimension_delete_requests, dimension_insert_request};
use crate::resolve::resolve_sheet_id;
use crate::state::AppState;
use crate::tools::param_enums::{CellAlignment, MergeKind, NumberFormatKind};
use anyhow::Result;
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SheetsListSheetsParams {
    pub spreadsheet_id: String,
}

pub async fn sheets_list_sheets(
    state: Arc<AppState>,
    params: SheetsListSheetsParams,
) -> Result<SheetListResponse> {
    require_spreadsheet_id("sheets_list_sheets", &params.spreadsheet_id)?;
    let spreadsheet = state.api().get_spreadsheet(&params.spreadsheet_id).await?;

    let sheets = spreadsheet
        .sheets
        .iter()
        .map(|sheet| SheetInfo {
            title: sheet.properties.title.clone(),
            sheet_id: sheet.properties.sheet_id,
            index: sheet.properties.index,
            row_count: sheet.properties.grid_properties.map(|g| g.row_count),
            column_count: sheet.properties.grid_properties.map(|g| g.column_count),
        })
        .collect();

    Ok(SheetListResponse {
        spreadsheet_id: spreadsheet.spreadsheet_id.clone(),
        title: spreadsheet
            .properties
            .as_ref()
            .map(|p| p.title.clone())
            .unwrap_or_default(),
        sheets,
    })
}

/// Optional cell format attributes, as callers supply them.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct CellFormatParams {
    /// Hex fill color, e.g. `#FFF2CC`.
    #[serde(default)]
    pub background_color: Option<String>,
    /// Hex text color.
    #[serde(default)]
    pub text_color: Option<String>,
    #[serde(default)]
    pub bold: Option<bool>,
    #[serde(default)]
    pub italic: Option<bool>,
    #[serde(default)]
    pub font_size: Option<i64>,
    #[serde(default)]
    pub horizontal_alignment: Option<CellAlignment>,
    #[serde(default)]
    pub number_format: Option<NumberFormatKind>,
    /// Number format pattern, e.g. `#,##0.00`; only used with
    /// `number_format`.
    #[serde(default)]
    pub number_pattern: Option<String>,
}

impl CellFormatParams {
    pub fn to_mask(&self, tool: &'static str) -> Result<CellFormatMask> {
        let mut mask = CellFormatMask::new();
        if let Some(hex) = self.background_color.as_deref() {
            let color = hex_to_color(hex).ok_or_else(|| invalid_color(tool, "background_color", hex))?;
            mask = mask.background_color(color);
        }
        if let Some(hex) = self.text_color.as_deref() {
            let color = hex_to_color(hex).ok_or_else(|| invalid_color(tool, "text_color", hex))?;
            mask = mask.text_color(color);
        }
        if let Some(v) = self.bold {
            mask = mask.bold(v);
        }
        if let Some(v) = self.italic {
            mask = mask.italic(v);
        }
        if let Some(size) = self.font_size {
            if !(1..=400).contains(&size) {
                return Err(InvalidParamsError::new(tool, "font_size must be 1-400 points")
                    .with_path("font_size")
                    .into());
            }
            mask = mask.font_size(size);
        }
        if let Some(align) = self.horizontal_alignment {
            mask = mask.horizontal_alignment(align.to_wire());
        }
        if let Some(kind) = self.number_format {
            mask = mask.number_format(kind.wire_name(), self.number_pattern.clone());
        }
        Ok(mask)
    }
}

fn invalid_color(tool: &'static str, path: &'static str, hex: &str) -> anyhow::Error {
    InvalidParamsError::new(
        tool,
        format!("invalid color '{hex}' (expected #RGB or #RRGGBB)"),
    )
    .with_path(path)
    .into()
}

fn require_spreadsheet_id(tool: &'static str, spreadsheet_id: &str) -> Result<()> {
    if spreadsheet_id.trim().is_empty() {
        return Err(InvalidParamsError::new(tool, "spreadsheet_id is required")
            .with_path("spreadsheet_id")
            .into());
    }
    Ok(())
}

/// Parse the target range, then resolve its sheet against fresh metadata.
/// Parse failures never cost a remote call.
pub(crate) async fn resolve_range(
    state: &AppState,
    spreadsheet_id: &str,
    range_text: &str,
    default_sheet: Option<&str>,
) -> Result<(i64, RangeAddress), EngineError> {
    let parsed = parse_range_address(range_text, default_sheet)?;
    let spreadsheet = state.api().get_spreadsheet(spreadsheet_id).await?;
    let sheet_id = resolve_sheet_id(&spreadsheet, parsed.sheet_name.as_deref())?;
    Ok((sheet_id, parsed.address))
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SheetsFormatRangeParams {
    pub spreadsheet_id: String,
    /// A1 range: `B2:D10`, `3:5`, `A:C`, optionally `Sheet!`-prefixed.
    pub range: String,
    /// Sheet to target when `range` carries no `Sheet!` prefix. Defaults
    /// to the first sheet.
    #[serde(default)]
    pub sheet_name: Option<String>,
    #[serde(flatten)]
    pub format: CellFormatParams,
}

pub async fn sheets_format_range(
    state: Arc<AppState>,
    params: SheetsFormatRangeParams,
) -> Result<EditResponse> {
    require_spreadsheet_id("sheets_format_range", &params.spreadsheet_id)?;
    let mask = params.format.to_mask("sheets_format_range")?;
    let Some((format, fields)) = mask.into_parts() else {
        return Ok(EditResponse::no_op("no format attributes supplied"));
    };

    let (sheet_id, address) = resolve_range(
        &state,
        &params.spreadsheet_id,
        &params.range,
        params.sheet_name.as_deref(),
    )
    .await?;

    let requests = vec![SheetsRequest::RepeatCell {
        range: address.to_grid_range(sheet_id),
        cell: CellData {
            user_entered_format: Some(format),
        },
        fields,
    }];
    let count = requests.len();
    state
        .api()
        .sheets_batch_update(&params.spreadsheet_id, requests)
        .await?;

    Ok(EditResponse::applied(
        format!("Formatted {}", params.range),
        count,
    ))
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SheetsDeleteRowsParams {
    pub spreadsheet_id: String,
    /// Row bands in 1-based inclusive A1 form: `"3"` or `"3:5"`. Several
    /// independent bands may be given; they land in one atomic call.
    pub rows: Vec<String>,
    #[serde(default)]
    pub sheet_name: Option<String>,
}

pub async fn sheets_delete_rows(
    state: Arc<AppState>,
    params: SheetsDeleteRowsParams,
) -> Result<EditResponse> {
    require_spreadsheet_id("sheets_delete_rows", &params.spreadsheet_id)?;
    delete_bands(
        state,
        "sheets_delete_rows",
        &params.spreadsheet_id,
        params.sheet_name.as_deref(),
        &params.rows,
        SheetDimension::Rows,
    )
    .await
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SheetsDeleteColumnsParams {
    pub spreadsheet_id: String,
    /// Column bands in letter form: `"C"` or `"A:C"`.
    pub columns: Vec<String>,
    #[serde(default)]
    pub sheet_name: Option<String>,
}

pub async fn sheets_delete_columns(
    state: Arc<AppState>,
    params: SheetsDeleteColumnsParams,
) -> Result<EditResponse> {
    require_spreadsheet_id("sheets_delete_columns", &params.spreadsheet_id)?;
    delete_bands(
        state,
        "sheets_delete_columns",
        &params.spreadsheet_id,
        params.sheet_name.as_deref(),
        &params.columns,
        SheetDimension::Columns,
    )
    .await
}

async fn delete_bands(
    state: Arc<AppState>,
    tool: &'static str,
    spreadsheet_id: &str,
    sheet_name: Option<&str>,
    band_texts: &[String],
    dimension: SheetDimension,
) -> Result<EditResponse> {
    if band_texts.is_empty() {
        return Err(InvalidParamsError::new(tool, "at least one band is required").into());
    }

    let mut bands = Vec::with_capacity(band_texts.len());
    let mut named_sheet: Option<String> = sheet_name.map(str::to_string);
    for text in band_texts {
        let parsed = parse_range_address(text, sheet_name)?;
        if let Some(name) = parsed.sheet_name {
            match &named_sheet {
                Some(existing) if *existing != name => {
                    return Err(InvalidParamsError::new(
                        tool,
                        format!("bands target different sheets ('{existing}' vs '{name}')"),
                    )
                    .into());
                }
                _ => named_sheet = Some(name),
            }
        }
        let band = match (dimension, parsed.address) {
            (SheetDimension::Rows, RangeAddress::RowBand { start_row, end_row }) => DimensionBand {
                start: start_row,
                end: end_row,
            },
            (
                SheetDimension::Columns,
                RangeAddress::ColBand {
                    start_col,
                    end_col,
                },
            ) => DimensionBand {
                start: start_col,
                end: end_col,
            },
            _ => {
                return Err(EngineError::invalid_format(format!(
                    "'{text}' is not a whole-{} band",
                    match dimension {
                        SheetDimension::Rows => "row",
                        SheetDimension::Columns => "column",
                    }
                ))
                .into());
            }
        };
        bands.push(band);
    }

    let spreadsheet = state.api().get_spreadsheet(spreadsheet_id).await?;
    let sheet_id = resolve_sheet_id(&spreadsheet, named_sheet.as_deref())?;
    check_bands_in_bounds(tool, &spreadsheet, sheet_id, dimension, &bands)?;

    let requests = dimension_delete_requests(sheet_id, dimension, &bands);
    if requests.is_empty() {
        return Ok(EditResponse::no_op("all requested bands are empty"));
    }
    let count = requests.len();
    state
        .api()
        .sheets_batch_update(spreadsheet_id, requests)
        .await?;

    Ok(EditResponse::applied(
        format!("Deleted {} {} band(s)", count, dimension.noun()),
        count,
    ))
}

fn check_bands_in_bounds(
    tool: &'static str,
    spreadsheet: &Spreadsheet,
    sheet_id: i64,
    dimension: SheetDimension,
    bands: &[DimensionBand],
) -> Result<(), EngineError> {
    let Some(grid) = spreadsheet
        .sheets
        .iter()
        .find(|sheet| sheet.properties.sheet_id == sheet_id)
        .and_then(|sheet| sheet.properties.grid_properties)
    else {
        return Ok(());
    };
    let limit = match dimension {
        SheetDimension::Rows => grid.row_count,
        SheetDimension::Columns => grid.column_count,
    };
    for band in bands {
        if band.end > limit {
            return Err(EngineError::index_out_of_range(format!(
                "{tool}: band [{}, {}) exceeds sheet {} count {limit}",
                band.start,
                band.end,
                dimension.noun()
            )));
        }
    }
    Ok(())
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SheetsInsertRowsParams {
    pub spreadsheet_id: String,
    /// 1-based row the new band starts at; existing rows shift down.
    pub at_row: i64,
    #[serde(default = "default_count")]
    pub count: i64,
    #[serde(default)]
    pub sheet_name: Option<String>,
}

fn default_count() -> i64 {
    1
}

pub async fn sheets_insert_rows(
    state: Arc<AppState>,
    params: SheetsInsertRowsParams,
) -> Result<EditResponse> {
    require_spreadsheet_id("sheets_insert_rows", &params.spreadsheet_id)?;
    if params.at_row < 1 {
        return Err(InvalidParamsError::new("sheets_insert_rows", "at_row is 1-based")
            .with_path("at_row")
            .into());
    }
    insert_band(
        state,
        "sheets_insert_rows",
        &params.spreadsheet_id,
        params.sheet_name.as_deref(),
        SheetDimension::Rows,
        params.at_row - 1,
        params.count,
    )
    .await
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SheetsInsertColumnsParams {
    pub spreadsheet_id: String,
    /// Column letters the new band starts at, e.g. `C`; existing columns
    /// shift right.
    pub at_column: String,
    #[serde(default = "default_count")]
    pub count: i64,
    #[serde(default)]
    pub sheet_name: Option<String>,
}

pub async fn sheets_insert_columns(
    state: Arc<AppState>,
    params: SheetsInsertColumnsParams,
) -> Result<EditResponse> {
    require_spreadsheet_id("sheets_insert_columns", &params.spreadsheet_id)?;
    let at = column_letters_to_index(&params.at_column)?;
    insert_band(
        state,
        "sheets_insert_columns",
        &params.spreadsheet_id,
        params.sheet_name.as_deref(),
        SheetDimension::Columns,
        at,
        params.count,
    )
    .await
}

async fn insert_band(
    state: Arc<AppState>,
    tool: &'static str,
    spreadsheet_id: &str,
    sheet_name: Option<&str>,
    dimension: SheetDimension,
    at: i64,
    count: i64,
) -> Result<EditResponse> {
    if count < 1 {
        return Err(InvalidParamsError::new(tool, "count must be at least 1")
            .with_path("count")
            .into());
    }

    let spreadsheet = state.api().get_spreadsheet(spreadsheet_id).await?;
    let sheet_id = resolve_sheet_id(&spreadsheet, sheet_name)?;

    let requests = vec![dimension_insert_request(sheet_id, dimension, at, count)];
    state
        .api()
        .sheets_batch_update(spreadsheet_id, requests)
        .await?;

    Ok(EditResponse::applied(
        format!("Inserted {count} {} at index {at}", dimension.noun()),
        1,
    ))
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SheetsMergeCellsParams {
    pub spreadsheet_id: String,
    /// Bounded rectangle like `A1:C3`.
    pub range: String,
    #[serde(default)]
    pub merge_type: MergeKind,
    #[serde(default)]
    pub sheet_name: Option<String>,
}

pub async fn sheets_merge_cells(
    state: Arc<AppState>,
    params: SheetsMergeCellsParams,
) -> Result<EditResponse> {
    require_spreadsheet_id("sheets_merge_cells", &params.spreadsheet_id)?;
    let (sheet_id, address) = resolve_range(
        &state,
        &params.spreadsheet_id,
        &params.range,
        params.sheet_name.as_deref(),
    )
    .await?;

    let RangeAddress::Rect {
        start_row,
        end_row,
        start_col,
        end_col,
    } = address
    else {
        return Err(EngineError::InvalidArgument(format!(
            "merge requires a bounded rectangle, got '{}'",
            params.range
        ))
        .into());
    };
    if (end_row - start_row) * (end_col - start_col) < 2 {
        return Ok(EditResponse::no_op("range covers a single cell"));
    }

    let requests = vec![SheetsRequest::MergeCells {
        range: address.to_grid_range(sheet_id),
        merge_type: params.merge_type.to_wire(),
    }];
    state
        .api()
        .sheets_batch_update(&params.spreadsheet_id, requests)
        .await?;

    Ok(EditResponse::applied(
        format!("Merged {}", params.range),
        1,
    ))
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SheetsUnmergeCellsParams {
    pub spreadsheet_id: String,
    pub range: String,
    #[serde(default)]
    pub sheet_name: Option<String>,
}

pub async fn sheets_unmerge_cells(
    state: Arc<AppState>,
    params: SheetsUnmergeCellsParams,
) -> Result<EditResponse> {
    require_spreadsheet_id("sheets_unmerge_cells", &params.spreadsheet_id)?;
    let (sheet_id, address) = resolve_range(
        &state,
        &params.spreadsheet_id,
        &params.range,
        params.sheet_name.as_deref(),
    )
    .await?;

    let requests = vec![SheetsRequest::UnmergeCells {
        range: address.to_grid_range(sheet_id),
    }];
    state
        .api()
        .sheets_batch_update(&params.spreadsheet_id, requests)
        .await?;

    Ok(EditResponse::applied(
        format!("Unmerged {}", params.range),
        1,
    ))
}
