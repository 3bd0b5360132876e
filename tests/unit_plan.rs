use assert_matches::assert_matches;
use workspace_mcp::api::docs::DocsRequest;
use workspace_mcp::api::sheets::{SheetDimension, SheetsRequest};
use workspace_mcp::errors::EngineError;
use workspace_mcp::fields::{ParagraphStyleMask, TextStyleMask};
use workspace_mcp::plan::{
    DimensionBand, RangeEditPlan, clear_conditional_format_requests, dimension_delete_requests,
    dimension_insert_request,
};

#[test]
fn replace_emits_delete_insert_style_in_order() {
    // Existing content of length 5 at [10, 15), replaced by 8 characters.
    let requests = RangeEditPlan::new(10, 15)
        .unwrap()
        .delete_existing()
        .insert_text("newtext8")
        .style_text(TextStyleMask::new().bold(true))
        .build()
        .unwrap();

    assert_eq!(requests.len(), 3);
    assert_matches!(
        &requests[0],
        DocsRequest::DeleteContentRange { range }
            if range.start_index == 10 && range.end_index == 15
    );
    assert_matches!(
        &requests[1],
        DocsRequest::InsertText { location, text }
            if location.index == 10 && text == "newtext8"
    );
    // Style covers the new content: [10, 10 + 8).
    assert_matches!(
        &requests[2],
        DocsRequest::UpdateTextStyle { range, fields, .. }
            if range.start_index == 10 && range.end_index == 18 && fields == "bold"
    );
}

#[test]
fn empty_target_skips_the_delete() {
    let requests = RangeEditPlan::new(20, 20)
        .unwrap()
        .delete_existing()
        .insert_text("abc")
        .build()
        .unwrap();

    assert_eq!(requests.len(), 1);
    assert_matches!(
        &requests[0],
        DocsRequest::InsertText { location, text } if location.index == 20 && text == "abc"
    );
}

#[test]
fn style_without_insert_keeps_original_bounds() {
    let requests = RangeEditPlan::new(5, 12)
        .unwrap()
        .style_text(TextStyleMask::new().italic(true))
        .build()
        .unwrap();

    assert_eq!(requests.len(), 1);
    assert_matches!(
        &requests[0],
        DocsRequest::UpdateTextStyle { range, .. }
            if range.start_index == 5 && range.end_index == 12
    );
}

#[test]
fn paragraph_style_covers_trailing_delimiter() {
    // With an insert: delimiter sits one past the inserted text.
    let requests = RangeEditPlan::new(10, 15)
        .unwrap()
        .delete_existing()
        .insert_text("abc")
        .style_paragraph(ParagraphStyleMask::new().named_style("HEADING_2"))
        .build()
        .unwrap();
    assert_matches!(
        requests.last().unwrap(),
        DocsRequest::UpdateParagraphStyle { range, fields, .. }
            if range.start_index == 10 && range.end_index == 14 && fields == "namedStyleType"
    );

    // Without an insert: delimiter sits one past the original range.
    let requests = RangeEditPlan::new(10, 15)
        .unwrap()
        .style_paragraph(ParagraphStyleMask::new().named_style("HEADING_2"))
        .build()
        .unwrap();
    assert_matches!(
        requests.last().unwrap(),
        DocsRequest::UpdateParagraphStyle { range, .. }
            if range.start_index == 10 && range.end_index == 16
    );
}

#[test]
fn char_style_on_empty_result_is_suppressed() {
    // Deleting without replacement leaves nothing to character-style, but
    // the delete itself must still go out.
    let requests = RangeEditPlan::new(10, 15)
        .unwrap()
        .delete_existing()
        .build()
        .unwrap();
    assert_eq!(requests.len(), 1);

    // An empty cell with a style request but no text: nothing to cover.
    let result = RangeEditPlan::new(10, 10)
        .unwrap()
        .style_text(TextStyleMask::new().bold(true))
        .build();
    assert_matches!(result, Err(EngineError::NoOp));
}

#[test]
fn empty_plan_signals_noop() {
    let result = RangeEditPlan::new(10, 10)
        .unwrap()
        .delete_existing()
        .insert_text("")
        .build();
    assert_matches!(result, Err(EngineError::NoOp));
}

#[test]
fn invalid_bounds_are_rejected() {
    assert_matches!(
        RangeEditPlan::new(10, 5),
        Err(EngineError::IndexOutOfRange(_))
    );
    assert_matches!(
        RangeEditPlan::new(-1, 5),
        Err(EngineError::IndexOutOfRange(_))
    );
}

#[test]
fn insert_length_counts_characters_not_bytes() {
    let requests = RangeEditPlan::new(1, 1)
        .unwrap()
        .insert_text("héllo")
        .style_text(TextStyleMask::new().bold(true))
        .build()
        .unwrap();

    assert_matches!(
        &requests[1],
        DocsRequest::UpdateTextStyle { range, .. }
            if range.start_index == 1 && range.end_index == 6
    );
}

#[test]
fn row_band_delete_translates_one_based_inclusive() {
    // Rows 3-5, 1-based inclusive, arrive as the zero-based band [2, 5).
    let requests = dimension_delete_requests(
        42,
        SheetDimension::Rows,
        &[DimensionBand { start: 2, end: 5 }],
    );
    assert_eq!(requests.len(), 1);
    assert_matches!(
        &requests[0],
        SheetsRequest::DeleteDimension { range }
            if range.sheet_id == 42 && range.start_index == 2 && range.end_index == 5
    );
}

#[test]
fn multiple_bands_delete_bottom_to_top() {
    let requests = dimension_delete_requests(
        7,
        SheetDimension::Rows,
        &[
            DimensionBand { start: 0, end: 2 },
            DimensionBand { start: 10, end: 12 },
            DimensionBand { start: 5, end: 6 },
        ],
    );

    let starts: Vec<i64> = requests
        .iter()
        .map(|r| match r {
            SheetsRequest::DeleteDimension { range } => range.start_index,
            other => panic!("unexpected request {other:?}"),
        })
        .collect();
    assert_eq!(starts, vec![10, 5, 0]);
}

#[test]
fn empty_bands_are_dropped() {
    let requests = dimension_delete_requests(
        7,
        SheetDimension::Columns,
        &[DimensionBand { start: 3, end: 3 }],
    );
    assert!(requests.is_empty());
}

#[test]
fn insert_band_inherits_from_before_unless_at_edge() {
    assert_matches!(
        dimension_insert_request(1, SheetDimension::Rows, 4, 2),
        SheetsRequest::InsertDimension {
            range,
            inherit_from_before: true,
        } if range.start_index == 4 && range.end_index == 6
    );
    assert_matches!(
        dimension_insert_request(1, SheetDimension::Rows, 0, 1),
        SheetsRequest::InsertDimension {
            inherit_from_before: false,
            ..
        }
    );
}

#[test]
fn conditional_format_clear_descends_strictly() {
    let requests = clear_conditional_format_requests(9, 4);

    let indices: Vec<i64> = requests
        .iter()
        .map(|r| match r {
            SheetsRequest::DeleteConditionalFormatRule { sheet_id, index } => {
                assert_eq!(*sheet_id, 9);
                *index
            }
            other => panic!("unexpected request {other:?}"),
        })
        .collect();
    assert_eq!(indices, vec![3, 2, 1, 0]);

    assert!(clear_conditional_format_requests(9, 0).is_empty());
}

#[test]
fn requests_serialize_as_one_hot_camel_case() {
    let requests = RangeEditPlan::new(10, 15)
        .unwrap()
        .delete_existing()
        .insert_text("hi")
        .build()
        .unwrap();

    let json = serde_json::to_value(&requests).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            {"deleteContentRange": {"range": {"startIndex": 10, "endIndex": 15}}},
            {"insertText": {"location": {"index": 10}, "text": "hi"}}
        ])
    );
}
