use crate::api::sheets::{
    BooleanCondition, BooleanRule, CellFormat, ConditionValue, ConditionalFormatRule,
    SheetsRequest, TextFormat,
};
use crate::colors::hex_to_color;
use crate::errors::{EngineError, InvalidParamsError};
use crate::model::EditResponse;
use crate::plan::clear_conditional_format_requests;
use crate::resolve::{conditional_format_count, resolve_sheet_id};
use crate::state::AppState;
use crate::tools::param_enums::ConditionOperator;
use crate::tools::sheets_edit::resolve_range;
use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConditionalRuleSpec {
    /// Compare each cell's value against one (or two, for between) bounds.
    CellIs {
        operator: ConditionOperator,
        value: String,
        #[serde(default)]
        value2: Option<String>,
    },
    /// Arbitrary custom formula evaluated per cell.
    Expression { formula: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ConditionalStyleSpec {
    /// Hex fill applied to matching cells. Defaults to a light red.
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
    #[serde(default)]
    pub bold: Option<bool>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddConditionalFormatParams {
    pub spreadsheet_id: String,
    /// A1 range the rule applies to.
    pub range: String,
    pub rule: ConditionalRuleSpec,
    #[serde(default)]
    pub style: ConditionalStyleSpec,
    #[serde(default)]
    pub sheet_name: Option<String>,
}

pub async fn sheets_add_conditional_format(
    state: Arc<AppState>,
    params: AddConditionalFormatParams,
) -> Result<EditResponse> {
    if params.spreadsheet_id.trim().is_empty() {
        return Err(InvalidParamsError::new(
            "sheets_add_conditional_format",
            "spreadsheet_id is required",
        )
        .with_path("spreadsheet_id")
        .into());
    }

    let condition = build_condition(&params.rule)?;
    let format = build_rule_format(&params.style)?;

    let (sheet_id, address) = resolve_range(
        &state,
        &params.spreadsheet_id,
        &params.range,
        params.sheet_name.as_deref(),
    )
    .await?;

    let rule = ConditionalFormatRule {
        ranges: vec![address.to_grid_range(sheet_id)],
        boolean_rule: Some(BooleanRule {
            condition,
            format: Some(format),
        }),
    };

    let requests = vec![SheetsRequest::AddConditionalFormatRule { rule, index: 0 }];
    state
        .api()
        .sheets_batch_update(&params.spreadsheet_id, requests)
        .await?;

    Ok(EditResponse::applied(
        format!("Added conditional format rule on {}", params.range),
        1,
    ))
}

pub fn build_condition(spec: &ConditionalRuleSpec) -> Result<BooleanCondition> {
    match spec {
        ConditionalRuleSpec::CellIs {
            operator,
            value,
            value2,
        } => {
            if value.trim().is_empty() {
                return Err(InvalidParamsError::new(
                    "sheets_add_conditional_format",
                    "rule.value is required",
                )
                .with_path("rule.value")
                .into());
            }
            let mut values = vec![ConditionValue {
                user_entered_value: value.trim().to_string(),
            }];
            if operator.takes_two_values() {
                let second = value2.as_deref().map(str::trim).unwrap_or_default();
                if second.is_empty() {
                    return Err(InvalidParamsError::new(
                        "sheets_add_conditional_format",
                        format!("operator '{:?}' needs rule.value2", operator),
                    )
                    .with_path("rule.value2")
                    .into());
                }
                values.push(ConditionValue {
                    user_entered_value: second.to_string(),
                });
            }
            Ok(BooleanCondition {
                condition_type: operator.condition_type().to_string(),
                values,
            })
        }
        ConditionalRuleSpec::Expression { formula } => {
            let trimmed = formula.trim();
            if trimmed.is_empty() {
                return Err(InvalidParamsError::new(
                    "sheets_add_conditional_format",
                    "rule.formula is required",
                )
                .with_path("rule.formula")
                .into());
            }
            // Custom formula values must carry the leading '='.
            let formula = if trimmed.starts_with('=') {
                trimmed.to_string()
            } else {
                format!("={trimmed}")
            };
            Ok(BooleanCondition {
                condition_type: "CUSTOM_FORMULA".to_string(),
                values: vec![ConditionValue {
                    user_entered_value: formula,
                }],
            })
        }
    }
}

pub fn build_rule_format(style: &ConditionalStyleSpec) -> Result<CellFormat> {
    // Defaults aim for determinism and readability.
    let background_hex = style.background_color.as_deref().unwrap_or("#FFE0E0");
    let background = hex_to_color(background_hex).ok_or_else(|| {
        EngineError::invalid_format(format!("invalid style.background_color '{background_hex}'"))
    })?;

    let mut format = CellFormat {
        background_color: Some(background),
        ..Default::default()
    };

    let mut text_format = TextFormat::default();
    let mut has_text_format = false;
    if let Some(hex) = style.text_color.as_deref() {
        let color = hex_to_color(hex).ok_or_else(|| {
            EngineError::invalid_format(format!("invalid style.text_color '{hex}'"))
        })?;
        text_format.foreground_color = Some(color);
        has_text_format = true;
    }
    if let Some(bold) = style.bold {
        text_format.bold = Some(bold);
        has_text_format = true;
    }
    if has_text_format {
        format.text_format = Some(text_format);
    }

    Ok(format)
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ClearConditionalFormatsParams {
    pub spreadsheet_id: String,
    /// Sheet whose rules are cleared. Defaults to the first sheet.
    #[serde(default)]
    pub sheet_name: Option<String>,
}

/// Delete every conditional-format rule on one sheet in a single atomic
/// call. Deletions run highest index first; the remote contract shifts
/// later rules down on every delete, so ascending order would miss half
/// the rules.
pub async fn sheets_clear_conditional_formats(
    state: Arc<AppState>,
    params: ClearConditionalFormatsParams,
) -> Result<EditResponse> {
    if params.spreadsheet_id.trim().is_empty() {
        return Err(InvalidParamsError::new(
            "sheets_clear_conditional_formats",
            "spreadsheet_id is required",
        )
        .with_path("spreadsheet_id")
        .into());
    }

    let spreadsheet = state.api().get_spreadsheet(&params.spreadsheet_id).await?;
    let sheet_id = resolve_sheet_id(&spreadsheet, params.sheet_name.as_deref())?;
    let rule_count = conditional_format_count(&spreadsheet, params.sheet_name.as_deref())?;

    if rule_count == 0 {
        return Ok(EditResponse::no_op("sheet has no conditional format rules"));
    }

    let requests = clear_conditional_format_requests(sheet_id, rule_count);
    let count = requests.len();
    state
        .api()
        .sheets_batch_update(&params.spreadsheet_id, requests)
        .await?;

    Ok(EditResponse::applied(
        format!("Cleared {rule_count} conditional format rule(s)"),
        count,
    ))
}
