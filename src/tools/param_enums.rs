use crate::api::sheets::{HorizontalAlign, MergeType};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Paragraph named styles exposed to callers, mapped to the wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NamedStyle {
    NormalText,
    Title,
    Subtitle,
    #[serde(alias = "h1")]
    Heading1,
    #[serde(alias = "h2")]
    Heading2,
    #[serde(alias = "h3")]
    Heading3,
    #[serde(alias = "h4")]
    Heading4,
    #[serde(alias = "h5")]
    Heading5,
    #[serde(alias = "h6")]
    Heading6,
}

impl NamedStyle {
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::NormalText => "NORMAL_TEXT",
            Self::Title => "TITLE",
            Self::Subtitle => "SUBTITLE",
            Self::Heading1 => "HEADING_1",
            Self::Heading2 => "HEADING_2",
            Self::Heading3 => "HEADING_3",
            Self::Heading4 => "HEADING_4",
            Self::Heading5 => "HEADING_5",
            Self::Heading6 => "HEADING_6",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ParagraphAlignment {
    Start,
    Center,
    End,
    Justified,
}

impl ParagraphAlignment {
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::Center => "CENTER",
            Self::End => "END",
            Self::Justified => "JUSTIFIED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CellAlignment {
    Left,
    Center,
    Right,
}

impl CellAlignment {
    pub fn to_wire(self) -> HorizontalAlign {
        match self {
            Self::Left => HorizontalAlign::Left,
            Self::Center => HorizontalAlign::Center,
            Self::Right => HorizontalAlign::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MergeKind {
    #[default]
    All,
    Columns,
    Rows,
}

impl MergeKind {
    pub fn to_wire(self) -> MergeType {
        match self {
            Self::All => MergeType::MergeAll,
            Self::Columns => MergeType::MergeColumns,
            Self::Rows => MergeType::MergeRows,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NumberFormatKind {
    Text,
    Number,
    Percent,
    Currency,
    Date,
    Time,
    DateTime,
    Scientific,
}

impl NumberFormatKind {
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Number => "NUMBER",
            Self::Percent => "PERCENT",
            Self::Currency => "CURRENCY",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::DateTime => "DATE_TIME",
            Self::Scientific => "SCIENTIFIC",
        }
    }
}

/// Comparison operators for cell-value conditional format rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    #[serde(alias = "lessThan")]
    LessThan,
    #[serde(alias = "lessThanOrEqual")]
    LessThanOrEqual,
    #[serde(alias = "greaterThan")]
    GreaterThan,
    #[serde(alias = "greaterThanOrEqual")]
    GreaterThanOrEqual,
    #[serde(alias = "equal")]
    Equal,
    #[serde(alias = "notEqual")]
    NotEqual,
    #[serde(alias = "between")]
    Between,
    #[serde(alias = "notBetween")]
    NotBetween,
}

impl ConditionOperator {
    pub fn condition_type(self) -> &'static str {
        match self {
            Self::LessThan => "NUMBER_LESS",
            Self::LessThanOrEqual => "NUMBER_LESS_THAN_EQ",
            Self::GreaterThan => "NUMBER_GREATER",
            Self::GreaterThanOrEqual => "NUMBER_GREATER_THAN_EQ",
            Self::Equal => "NUMBER_EQ",
            Self::NotEqual => "NUMBER_NOT_EQ",
            Self::Between => "NUMBER_BETWEEN",
            Self::NotBetween => "NUMBER_NOT_BETWEEN",
        }
    }

    pub fn takes_two_values(self) -> bool {
        matches!(self, Self::Between | Self::NotBetween)
    }
}
