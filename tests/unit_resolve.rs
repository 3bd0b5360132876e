use assert_matches::assert_matches;
use serde_json::json;
use workspace_mcp::api::docs::Document;
use workspace_mcp::api::sheets::Spreadsheet;
use workspace_mcp::errors::EngineError;
use workspace_mcp::resolve::{
    body_end_index, conditional_format_count, list_tables, resolve_sheet_id,
    resolve_table_cell_range,
};

fn sample_spreadsheet() -> Spreadsheet {
    serde_json::from_value(json!({
        "spreadsheetId": "abc123",
        "properties": {"title": "Budget"},
        "sheets": [
            {"properties": {"sheetId": 0, "title": "Summary", "index": 0,
                "gridProperties": {"rowCount": 100, "columnCount": 26}}},
            {"properties": {"sheetId": 1712, "title": "Q1 Data", "index": 1},
                "conditionalFormats": [
                    {"ranges": [{"sheetId": 1712, "startRowIndex": 0, "endRowIndex": 5,
                                 "startColumnIndex": 0, "endColumnIndex": 2}],
                     "booleanRule": {"condition": {"type": "NUMBER_GREATER",
                                                    "values": [{"userEnteredValue": "10"}]}}},
                    {"ranges": [], "booleanRule": {"condition": {"type": "CUSTOM_FORMULA",
                        "values": [{"userEnteredValue": "=A1>0"}]}}}
                ]}
        ]
    }))
    .expect("sample spreadsheet")
}

#[test]
fn named_sheet_resolves_exactly() {
    let spreadsheet = sample_spreadsheet();
    assert_eq!(resolve_sheet_id(&spreadsheet, Some("Q1 Data")).unwrap(), 1712);
    assert_eq!(resolve_sheet_id(&spreadsheet, Some("Summary")).unwrap(), 0);
}

#[test]
fn lookup_is_case_sensitive() {
    let spreadsheet = sample_spreadsheet();
    assert_matches!(
        resolve_sheet_id(&spreadsheet, Some("q1 data")),
        Err(EngineError::NotFound(_))
    );
}

#[test]
fn omitted_name_takes_first_sheet() {
    let spreadsheet = sample_spreadsheet();
    assert_eq!(resolve_sheet_id(&spreadsheet, None).unwrap(), 0);
}

#[test]
fn missing_sheet_is_not_found() {
    let spreadsheet = sample_spreadsheet();
    assert_matches!(
        resolve_sheet_id(&spreadsheet, Some("Nope")),
        Err(EngineError::NotFound(message)) if message.contains("Nope")
    );
}

#[test]
fn spreadsheet_without_sheets_is_empty_document() {
    let empty: Spreadsheet =
        serde_json::from_value(json!({"spreadsheetId": "x", "sheets": []})).unwrap();
    assert_matches!(resolve_sheet_id(&empty, None), Err(EngineError::EmptyDocument));
    // A named lookup on an empty spreadsheet is still NotFound.
    assert_matches!(
        resolve_sheet_id(&empty, Some("Sheet1")),
        Err(EngineError::NotFound(_))
    );
}

#[test]
fn rule_counts_come_from_the_resolved_sheet() {
    let spreadsheet = sample_spreadsheet();
    assert_eq!(
        conditional_format_count(&spreadsheet, Some("Q1 Data")).unwrap(),
        2
    );
    assert_eq!(conditional_format_count(&spreadsheet, None).unwrap(), 0);
}

/// A document whose body is: one paragraph [1, 10), then a 2x2 table at
/// [10, 30), then a closing paragraph [30, 32). Cell (0,0) holds "ab",
/// cell (0,1) is empty.
fn sample_document() -> Document {
    serde_json::from_value(json!({
        "documentId": "doc-1",
        "title": "Report",
        "body": {"content": [
            {"startIndex": 1, "endIndex": 10, "paragraph": {}},
            {"startIndex": 10, "endIndex": 30, "table": {
                "rows": 2, "columns": 2,
                "tableRows": [
                    {"startIndex": 11, "endIndex": 20, "tableCells": [
                        {"startIndex": 11, "endIndex": 15, "content": [
                            {"startIndex": 12, "endIndex": 15, "paragraph": {}}
                        ]},
                        {"startIndex": 15, "endIndex": 17, "content": [
                            {"startIndex": 16, "endIndex": 17, "paragraph": {}}
                        ]}
                    ]},
                    {"startIndex": 20, "endIndex": 29, "tableCells": [
                        {"startIndex": 20, "endIndex": 24, "content": [
                            {"startIndex": 21, "endIndex": 24, "paragraph": {}}
                        ]},
                        {"startIndex": 24, "endIndex": 28, "content": [
                            {"startIndex": 25, "endIndex": 28, "paragraph": {}}
                        ]}
                    ]}
                ]
            }},
            {"startIndex": 30, "endIndex": 32, "paragraph": {}}
        ]}
    }))
    .expect("sample document")
}

#[test]
fn table_cell_span_excludes_marker_and_delimiter() {
    let document = sample_document();
    let span = resolve_table_cell_range(&document, 10, 0, 0).unwrap();
    assert_eq!((span.start, span.end), (12, 14));
    assert!(!span.is_empty());
}

#[test]
fn empty_cell_resolves_to_zero_length() {
    let document = sample_document();
    let span = resolve_table_cell_range(&document, 10, 0, 1).unwrap();
    assert_eq!(span.start, span.end);
    assert!(span.is_empty());
}

#[test]
fn non_table_offset_is_not_a_table() {
    let document = sample_document();
    assert_matches!(
        resolve_table_cell_range(&document, 1, 0, 0),
        Err(EngineError::NotATable(1))
    );
    assert_matches!(
        resolve_table_cell_range(&document, 99, 0, 0),
        Err(EngineError::NotFound(_))
    );
}

#[test]
fn out_of_bounds_cell_is_rejected() {
    let document = sample_document();
    assert_matches!(
        resolve_table_cell_range(&document, 10, 2, 0),
        Err(EngineError::IndexOutOfRange(_))
    );
    assert_matches!(
        resolve_table_cell_range(&document, 10, 0, 2),
        Err(EngineError::IndexOutOfRange(_))
    );
}

#[test]
fn body_end_and_tables_come_from_structure() {
    let document = sample_document();
    assert_eq!(body_end_index(&document), 32);

    let tables = list_tables(&document);
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].start_index, 10);
    assert_eq!(tables[0].rows, 2);
    assert_eq!(tables[0].columns, 2);
}
