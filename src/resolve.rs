//! Structural resolution against freshly fetched metadata.
//!
//! Every function here is pure over a metadata snapshot the caller just
//! fetched. Resolved offsets are invalid the moment any mutating call
//! lands; callers re-fetch before computing indices and never carry a
//! resolved offset across a submission. Sheet ids are the one exception:
//! the remote system keeps them stable for the sheet's lifetime.

use crate::api::docs::Document;
use crate::api::sheets::Spreadsheet;
use crate::errors::EngineError;
use serde::Serialize;

/// Resolve a sheet title to its numeric id. Titles match exactly and
/// case-sensitively; with no title the first sheet in listed order wins.
pub fn resolve_sheet_id(
    spreadsheet: &Spreadsheet,
    sheet_name: Option<&str>,
) -> Result<i64, EngineError> {
    match sheet_name {
        Some(name) => spreadsheet
            .sheets
            .iter()
            .find(|sheet| sheet.properties.title == name)
            .map(|sheet| sheet.properties.sheet_id)
            .ok_or_else(|| EngineError::not_found(format!("sheet '{name}' does not exist"))),
        None => spreadsheet
            .sheets
            .first()
            .map(|sheet| sheet.properties.sheet_id)
            .ok_or(EngineError::EmptyDocument),
    }
}

/// Count of conditional-format rules on the named (or first) sheet.
pub fn conditional_format_count(
    spreadsheet: &Spreadsheet,
    sheet_name: Option<&str>,
) -> Result<usize, EngineError> {
    let sheet_id = resolve_sheet_id(spreadsheet, sheet_name)?;
    Ok(spreadsheet
        .sheets
        .iter()
        .find(|sheet| sheet.properties.sheet_id == sheet_id)
        .map(|sheet| sheet.conditional_formats.len())
        .unwrap_or(0))
}

/// Content offset span of one table cell, end-exclusive. Zero length when
/// the cell is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSpan {
    pub start: i64,
    pub end: i64,
}

impl CellSpan {
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Walk the document structure to the cell at zero-based `(row, column)`
/// of the table starting at `table_start_index`.
///
/// The cell's content span excludes the cell's own marker and the trailing
/// paragraph delimiter, so an empty cell resolves to `start == end` and an
/// insertion at `start` is always valid.
pub fn resolve_table_cell_range(
    document: &Document,
    table_start_index: i64,
    row: u32,
    column: u32,
) -> Result<CellSpan, EngineError> {
    let element = document
        .body
        .content
        .iter()
        .find(|element| element.start_index == table_start_index)
        .ok_or_else(|| {
            EngineError::not_found(format!(
                "no structural element starts at index {table_start_index}"
            ))
        })?;

    let table = element
        .table
        .as_ref()
        .ok_or(EngineError::NotATable(table_start_index))?;

    let table_row = table.table_rows.get(row as usize).ok_or_else(|| {
        EngineError::index_out_of_range(format!(
            "row {row} exceeds table height {}",
            table.table_rows.len()
        ))
    })?;

    let cell = table_row.table_cells.get(column as usize).ok_or_else(|| {
        EngineError::index_out_of_range(format!(
            "column {column} exceeds table width {}",
            table_row.table_cells.len()
        ))
    })?;

    // First content element starts right after the cell marker; the span
    // ends before the cell's closing delimiter.
    let start = cell
        .content
        .first()
        .map(|element| element.start_index)
        .unwrap_or(cell.start_index + 1);
    let end = (cell.end_index - 1).max(start);

    Ok(CellSpan { start, end })
}

/// End index of the document body; the last valid insertion point is one
/// before it (the final newline cannot be written past).
pub fn body_end_index(document: &Document) -> i64 {
    document
        .body
        .content
        .last()
        .map(|element| element.end_index)
        .unwrap_or(1)
}

#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
pub struct TableSummary {
    pub start_index: i64,
    pub rows: i64,
    pub columns: i64,
}

/// Tables in body order, with the start offsets needed to address cells.
pub fn list_tables(document: &Document) -> Vec<TableSummary> {
    document
        .body
        .content
        .iter()
        .filter_map(|element| {
            element.table.as_ref().map(|table| TableSummary {
                start_index: element.start_index,
                rows: dimension_or_len(table.rows, table.table_rows.len()),
                columns: dimension_or_len(
                    table.columns,
                    table
                        .table_rows
                        .first()
                        .map(|row| row.table_cells.len())
                        .unwrap_or(0),
                ),
            })
        })
        .collect()
}

fn dimension_or_len(declared: i64, walked: usize) -> i64 {
    if declared > 0 { declared } else { walked as i64 }
}
