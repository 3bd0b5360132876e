use serde_json::json;
use workspace_mcp::colors::{Color, color_to_hex, hex_to_color};
use workspace_mcp::fields::{CellFormatMask, ParagraphStyleMask, TextStyleMask};

#[test]
fn hex_forms_expand_to_unit_interval() {
    let red = hex_to_color("#FF0000").unwrap();
    assert_eq!(
        red,
        Color {
            red: 1.0,
            green: 0.0,
            blue: 0.0
        }
    );
    assert_eq!(hex_to_color("F00").unwrap(), red);
    assert_eq!(hex_to_color("#f00").unwrap(), red);

    assert!(hex_to_color("#F0000").is_none());
    assert!(hex_to_color("red").is_none());
}

#[test]
fn hex_round_trips_through_color() {
    for hex in ["#000000", "#FFFFFF", "#C0392B", "#1A2B3C"] {
        let color = hex_to_color(hex).unwrap();
        assert_eq!(color_to_hex(&color), hex);
    }
}

#[test]
fn text_style_mask_and_payload_agree() {
    let (style, fields) = TextStyleMask::new()
        .bold(true)
        .font_size_pt(11.0)
        .foreground_color(hex_to_color("#336699").unwrap())
        .into_parts()
        .unwrap();

    assert_eq!(fields, "bold,fontSize,foregroundColor");

    let payload = serde_json::to_value(&style).unwrap();
    let populated: Vec<&str> = payload.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(populated, vec!["bold", "fontSize", "foregroundColor"]);

    // Unset attributes appear in neither the payload nor the mask.
    assert!(payload.get("italic").is_none());
    assert!(!fields.contains("italic"));
}

#[test]
fn empty_masks_build_nothing() {
    assert!(TextStyleMask::new().into_parts().is_none());
    assert!(ParagraphStyleMask::new().into_parts().is_none());
    assert!(CellFormatMask::new().into_parts().is_none());
}

#[test]
fn paragraph_mask_uses_wire_names() {
    let (style, fields) = ParagraphStyleMask::new()
        .named_style("HEADING_1")
        .alignment("CENTER")
        .into_parts()
        .unwrap();

    assert_eq!(fields, "namedStyleType,alignment");
    assert_eq!(
        serde_json::to_value(&style).unwrap(),
        json!({"namedStyleType": "HEADING_1", "alignment": "CENTER"})
    );
}

#[test]
fn cell_format_mask_roots_paths_at_the_cell() {
    let (format, fields) = CellFormatMask::new()
        .background_color(hex_to_color("#FFF2CC").unwrap())
        .bold(true)
        .horizontal_alignment(workspace_mcp::api::sheets::HorizontalAlign::Center)
        .into_parts()
        .unwrap();

    assert_eq!(
        fields,
        "userEnteredFormat.backgroundColor,userEnteredFormat.textFormat.bold,userEnteredFormat.horizontalAlignment"
    );

    let payload = serde_json::to_value(&format).unwrap();
    assert!(payload.get("backgroundColor").is_some());
    assert_eq!(payload["textFormat"]["bold"], json!(true));
    assert_eq!(payload["horizontalAlignment"], json!("CENTER"));
    assert!(payload.get("numberFormat").is_none());
}

#[test]
fn text_color_and_size_share_the_text_format_object() {
    let (format, fields) = CellFormatMask::new()
        .text_color(hex_to_color("#000000").unwrap())
        .font_size(9)
        .into_parts()
        .unwrap();

    let payload = serde_json::to_value(&format).unwrap();
    let text_format = payload["textFormat"].as_object().unwrap();
    assert_eq!(text_format.len(), 2);
    assert!(fields.contains("userEnteredFormat.textFormat.foregroundColor"));
    assert!(fields.contains("userEnteredFormat.textFormat.fontSize"));
}

#[test]
fn number_format_carries_type_and_pattern() {
    let (format, fields) = CellFormatMask::new()
        .number_format("CURRENCY", Some("$#,##0.00".to_string()))
        .into_parts()
        .unwrap();

    assert_eq!(fields, "userEnteredFormat.numberFormat");
    assert_eq!(
        serde_json::to_value(&format).unwrap(),
        json!({"numberFormat": {"type": "CURRENCY", "pattern": "$#,##0.00"}})
    );
}
