use assert_matches::assert_matches;
use serde_json::json;
use workspace_mcp::tools::param_enums::ConditionOperator;
use workspace_mcp::tools::rules::{
    ConditionalRuleSpec, ConditionalStyleSpec, build_condition, build_rule_format,
};

#[test]
fn operators_map_to_condition_types() {
    let cases = [
        (ConditionOperator::LessThan, "NUMBER_LESS"),
        (ConditionOperator::LessThanOrEqual, "NUMBER_LESS_THAN_EQ"),
        (ConditionOperator::GreaterThan, "NUMBER_GREATER"),
        (ConditionOperator::GreaterThanOrEqual, "NUMBER_GREATER_THAN_EQ"),
        (ConditionOperator::Equal, "NUMBER_EQ"),
        (ConditionOperator::NotEqual, "NUMBER_NOT_EQ"),
        (ConditionOperator::Between, "NUMBER_BETWEEN"),
        (ConditionOperator::NotBetween, "NUMBER_NOT_BETWEEN"),
    ];
    for (operator, expected) in cases {
        assert_eq!(operator.condition_type(), expected);
    }
}

#[test]
fn cell_is_condition_carries_one_value() {
    let condition = build_condition(&ConditionalRuleSpec::CellIs {
        operator: ConditionOperator::GreaterThan,
        value: " 100 ".to_string(),
        value2: None,
    })
    .unwrap();

    assert_eq!(condition.condition_type, "NUMBER_GREATER");
    assert_eq!(condition.values.len(), 1);
    assert_eq!(condition.values[0].user_entered_value, "100");
}

#[test]
fn between_requires_a_second_value() {
    let missing = build_condition(&ConditionalRuleSpec::CellIs {
        operator: ConditionOperator::Between,
        value: "1".to_string(),
        value2: None,
    });
    assert!(missing.is_err());

    let condition = build_condition(&ConditionalRuleSpec::CellIs {
        operator: ConditionOperator::Between,
        value: "1".to_string(),
        value2: Some("10".to_string()),
    })
    .unwrap();
    assert_eq!(condition.values.len(), 2);
}

#[test]
fn expression_normalizes_the_leading_equals() {
    let bare = build_condition(&ConditionalRuleSpec::Expression {
        formula: "A1>0".to_string(),
    })
    .unwrap();
    assert_eq!(bare.condition_type, "CUSTOM_FORMULA");
    assert_eq!(bare.values[0].user_entered_value, "=A1>0");

    let prefixed = build_condition(&ConditionalRuleSpec::Expression {
        formula: "=A1>0".to_string(),
    })
    .unwrap();
    assert_eq!(prefixed.values[0].user_entered_value, "=A1>0");
}

#[test]
fn empty_rule_inputs_are_rejected() {
    assert!(
        build_condition(&ConditionalRuleSpec::CellIs {
            operator: ConditionOperator::Equal,
            value: "  ".to_string(),
            value2: None,
        })
        .is_err()
    );
    assert!(
        build_condition(&ConditionalRuleSpec::Expression {
            formula: String::new(),
        })
        .is_err()
    );
}

#[test]
fn rule_format_defaults_to_light_red_fill() {
    let format = build_rule_format(&ConditionalStyleSpec::default()).unwrap();
    let json = serde_json::to_value(&format).unwrap();

    let background = &json["backgroundColor"];
    assert_eq!(background["red"], json!(1.0));
    assert!(json.get("textFormat").is_none());
}

#[test]
fn rule_format_builds_text_attributes_together() {
    let format = build_rule_format(&ConditionalStyleSpec {
        background_color: Some("#FFF".to_string()),
        text_color: Some("#C0392B".to_string()),
        bold: Some(true),
    })
    .unwrap();

    let json = serde_json::to_value(&format).unwrap();
    assert_eq!(json["textFormat"]["bold"], json!(true));
    assert!(json["textFormat"].get("foregroundColor").is_some());
}

#[test]
fn malformed_style_color_is_invalid_format() {
    let result = build_rule_format(&ConditionalStyleSpec {
        background_color: Some("nope".to_string()),
        ..Default::default()
    });
    assert_matches!(
        result.unwrap_err().downcast_ref::<workspace_mcp::EngineError>(),
        Some(workspace_mcp::EngineError::InvalidFormat(_))
    );
}

#[test]
fn rule_specs_deserialize_from_snake_case_tags() {
    let spec: ConditionalRuleSpec = serde_json::from_value(json!({
        "kind": "cell_is",
        "operator": "greater_than_or_equal",
        "value": "5"
    }))
    .unwrap();
    assert_matches!(
        spec,
        ConditionalRuleSpec::CellIs {
            operator: ConditionOperator::GreaterThanOrEqual,
            ..
        }
    );

    let expr: ConditionalRuleSpec = serde_json::from_value(json!({
        "kind": "expression",
        "formula": "=ISBLANK(A1)"
    }))
    .unwrap();
    assert_matches!(expr, ConditionalRuleSpec::Expression { .. });
}
