use assert_matches::assert_matches;
use workspace_mcp::address::{
    RangeAddress, cell_address, column_letters_to_index, index_to_column_letters,
    parse_cell_address, parse_range_address,
};
use workspace_mcp::errors::EngineError;

#[test]
fn column_letters_decode_base_26() {
    assert_eq!(column_letters_to_index("A").unwrap(), 0);
    assert_eq!(column_letters_to_index("Z").unwrap(), 25);
    assert_eq!(column_letters_to_index("AA").unwrap(), 26);
    assert_eq!(column_letters_to_index("AZ").unwrap(), 51);
    assert_eq!(column_letters_to_index("ba").unwrap(), 52);
}

#[test]
fn letters_and_index_round_trip_both_ways() {
    for n in 0..2_000 {
        let letters = index_to_column_letters(n).unwrap();
        assert_eq!(column_letters_to_index(&letters).unwrap(), n);
    }
    for letters in ["A", "Q", "AA", "ZZ", "ABC", "xfd"] {
        let n = column_letters_to_index(letters).unwrap();
        assert_eq!(
            index_to_column_letters(n).unwrap(),
            letters.to_ascii_uppercase()
        );
    }
}

#[test]
fn non_letter_input_is_invalid_format() {
    assert_matches!(
        column_letters_to_index("A1"),
        Err(EngineError::InvalidFormat(_))
    );
    assert_matches!(column_letters_to_index(""), Err(EngineError::InvalidFormat(_)));
    assert_matches!(
        index_to_column_letters(-1),
        Err(EngineError::InvalidFormat(_))
    );
}

#[test]
fn cell_addresses_parse_one_based() {
    assert_eq!(parse_cell_address("B12").unwrap(), (11, 1));
    assert_eq!(parse_cell_address("a1").unwrap(), (0, 0));
    assert_eq!(parse_cell_address("AA100").unwrap(), (99, 26));

    assert_matches!(parse_cell_address("12B"), Err(EngineError::InvalidFormat(_)));
    assert_matches!(parse_cell_address("B0"), Err(EngineError::InvalidFormat(_)));
    assert_matches!(parse_cell_address(""), Err(EngineError::InvalidFormat(_)));
}

#[test]
fn rectangle_parses_half_open() {
    let parsed = parse_range_address("A1:B2", None).unwrap();
    assert_eq!(
        parsed.address,
        RangeAddress::Rect {
            start_row: 0,
            end_row: 2,
            start_col: 0,
            end_col: 2,
        }
    );
    assert!(parsed.sheet_name.is_none());
}

#[test]
fn single_cell_is_a_unit_rectangle() {
    let parsed = parse_range_address("C3", None).unwrap();
    assert_eq!(
        parsed.address,
        RangeAddress::Rect {
            start_row: 2,
            end_row: 3,
            start_col: 2,
            end_col: 3,
        }
    );
}

#[test]
fn row_band_has_no_column_bounds() {
    let parsed = parse_range_address("3:5", None).unwrap();
    assert_eq!(
        parsed.address,
        RangeAddress::RowBand {
            start_row: 2,
            end_row: 5,
        }
    );

    let single = parse_range_address("3", None).unwrap();
    assert_eq!(
        single.address,
        RangeAddress::RowBand {
            start_row: 2,
            end_row: 3,
        }
    );
}

#[test]
fn column_band_has_no_row_bounds() {
    let parsed = parse_range_address("A:C", None).unwrap();
    assert_eq!(
        parsed.address,
        RangeAddress::ColBand {
            start_col: 0,
            end_col: 3,
        }
    );

    let single = parse_range_address("A", None).unwrap();
    assert_eq!(
        single.address,
        RangeAddress::ColBand {
            start_col: 0,
            end_col: 1,
        }
    );
}

#[test]
fn reversed_bounds_normalize() {
    let parsed = parse_range_address("B2:A1", None).unwrap();
    assert_eq!(
        parsed.address,
        RangeAddress::Rect {
            start_row: 0,
            end_row: 2,
            start_col: 0,
            end_col: 2,
        }
    );
}

#[test]
fn sheet_prefix_overrides_default_and_strips_quotes() {
    let parsed = parse_range_address("'Q1 Data'!A1:B2", Some("Sheet1")).unwrap();
    assert_eq!(parsed.sheet_name.as_deref(), Some("Q1 Data"));

    let defaulted = parse_range_address("A1:B2", Some("Sheet1")).unwrap();
    assert_eq!(defaulted.sheet_name.as_deref(), Some("Sheet1"));
}

#[test]
fn garbage_is_invalid_format() {
    for bad in ["", "A1:B", "1A", "A-1", "A1:B2:C3", "Sheet1!"] {
        assert_matches!(
            parse_range_address(bad, None),
            Err(EngineError::InvalidFormat(_)),
            "expected InvalidFormat for {bad:?}"
        );
    }
}

#[test]
fn band_to_grid_range_keeps_unbounded_axis_absent() {
    let parsed = parse_range_address("3:5", None).unwrap();
    let grid = parsed.address.to_grid_range(77);
    assert_eq!(grid.sheet_id, 77);
    assert_eq!(grid.start_row_index, Some(2));
    assert_eq!(grid.end_row_index, Some(5));
    assert_eq!(grid.start_column_index, None);
    assert_eq!(grid.end_column_index, None);

    // Unbounded axes must not serialize at all.
    let json = serde_json::to_value(&grid).unwrap();
    assert!(json.get("startColumnIndex").is_none());
    assert!(json.get("endColumnIndex").is_none());
}

#[test]
fn cell_address_formats_back() {
    assert_eq!(cell_address(0, 0), "A1");
    assert_eq!(cell_address(11, 1), "B12");
    assert_eq!(cell_address(99, 26), "AA100");
}
