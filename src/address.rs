use crate::api::sheets::GridRange;
use crate::errors::EngineError;
use schemars::JsonSchema;
use serde::Serialize;
use {once_cell::sync::Lazy, regex::Regex};

/// A spreadsheet region parsed from A1 text.
///
/// Bounds are zero-based with exclusive ends. An unbounded axis is expressed
/// by the variant itself, never by sentinel values: a `RowBand` has no column
/// bounds at all, and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum RangeAddress {
    Rect {
        start_row: i64,
        end_row: i64,
        start_col: i64,
        end_col: i64,
    },
    RowBand {
        start_row: i64,
        end_row: i64,
    },
    ColBand {
        start_col: i64,
        end_col: i64,
    },
}

impl RangeAddress {
    pub fn to_grid_range(&self, sheet_id: i64) -> GridRange {
        match *self {
            RangeAddress::Rect {
                start_row,
                end_row,
                start_col,
                end_col,
            } => GridRange {
                sheet_id,
                start_row_index: Some(start_row),
                end_row_index: Some(end_row),
                start_column_index: Some(start_col),
                end_column_index: Some(end_col),
            },
            RangeAddress::RowBand { start_row, end_row } => GridRange {
                sheet_id,
                start_row_index: Some(start_row),
                end_row_index: Some(end_row),
                start_column_index: None,
                end_column_index: None,
            },
            RangeAddress::ColBand {
                start_col,
                end_col,
            } => GridRange {
                sheet_id,
                start_row_index: None,
                end_row_index: None,
                start_column_index: Some(start_col),
                end_column_index: Some(end_col),
            },
        }
    }
}

/// A parsed range plus the sheet it names, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRange {
    pub sheet_name: Option<String>,
    pub address: RangeAddress,
}

/// Decode base-26 column letters (`A`=0, `Z`=25, `AA`=26). Case-insensitive.
pub fn column_letters_to_index(letters: &str) -> Result<i64, EngineError> {
    if letters.is_empty() {
        return Err(EngineError::invalid_format("empty column letters"));
    }
    let mut index: i64 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(EngineError::invalid_format(format!(
                "invalid column letters '{letters}'"
            )));
        }
        index = index * 26 + (c.to_ascii_uppercase() as i64 - 'A' as i64 + 1);
    }
    Ok(index - 1)
}

/// Exact inverse of [`column_letters_to_index`].
pub fn index_to_column_letters(index: i64) -> Result<String, EngineError> {
    if index < 0 {
        return Err(EngineError::invalid_format(format!(
            "negative column index {index}"
        )));
    }
    let mut remaining = index + 1;
    let mut letters = Vec::new();
    while remaining > 0 {
        let digit = ((remaining - 1) % 26) as u8;
        letters.push(b'A' + digit);
        remaining = (remaining - 1) / 26;
    }
    letters.reverse();
    Ok(String::from_utf8(letters).unwrap_or_default())
}

static CELL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([A-Za-z]+)([0-9]+)$").expect("regex"));
static ROW_BAND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+)(?::([0-9]+))?$").expect("regex"));
static COL_BAND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z]+)(?::([A-Za-z]+))?$").expect("regex"));

/// Parse a single cell like `B12` into zero-based `(row, column)`.
pub fn parse_cell_address(text: &str) -> Result<(i64, i64), EngineError> {
    let caps = CELL_RE
        .captures(text.trim())
        .ok_or_else(|| EngineError::invalid_format(format!("invalid cell address '{text}'")))?;
    let col = column_letters_to_index(&caps[1])?;
    let row: i64 = caps[2]
        .parse()
        .map_err(|_| EngineError::invalid_format(format!("invalid row in '{text}'")))?;
    if row < 1 {
        return Err(EngineError::invalid_format(format!(
            "row numbers are 1-based: '{text}'"
        )));
    }
    Ok((row - 1, col))
}

/// Parse A1 range text into a [`ParsedRange`].
///
/// Accepts three shapes: a bounded rectangle (`A1:B2`, single cells count as
/// 1x1), a whole-row band (`3` or `3:5`) and a whole-column band (`A` or
/// `A:C`). Band forms are recognized by shape (all-digit vs all-letter)
/// before the rectangle fallback. A `Sheet!` prefix (single quotes stripped)
/// overrides `default_sheet_name`.
pub fn parse_range_address(
    text: &str,
    default_sheet_name: Option<&str>,
) -> Result<ParsedRange, EngineError> {
    let trimmed = text.trim();
    let (sheet_name, body) = match trimmed.rsplit_once('!') {
        Some((sheet, rest)) => {
            let sheet = sheet.trim_matches('\'');
            if sheet.is_empty() {
                return Err(EngineError::invalid_format(format!(
                    "empty sheet name in '{text}'"
                )));
            }
            (Some(sheet.to_string()), rest)
        }
        None => (default_sheet_name.map(str::to_string), trimmed),
    };

    if body.is_empty() {
        return Err(EngineError::invalid_format("empty range"));
    }

    if let Some(caps) = ROW_BAND_RE.captures(body) {
        let first: i64 = caps[1]
            .parse()
            .map_err(|_| EngineError::invalid_format(format!("invalid row band '{body}'")))?;
        let second: i64 = match caps.get(2) {
            Some(m) => m
                .as_str()
                .parse()
                .map_err(|_| EngineError::invalid_format(format!("invalid row band '{body}'")))?,
            None => first,
        };
        if first < 1 || second < 1 {
            return Err(EngineError::invalid_format(format!(
                "row numbers are 1-based: '{body}'"
            )));
        }
        let (lo, hi) = (first.min(second), first.max(second));
        return Ok(ParsedRange {
            sheet_name,
            address: RangeAddress::RowBand {
                start_row: lo - 1,
                end_row: hi,
            },
        });
    }

    if let Some(caps) = COL_BAND_RE.captures(body) {
        let first = column_letters_to_index(&caps[1])?;
        let second = match caps.get(2) {
            Some(m) => column_letters_to_index(m.as_str())?,
            None => first,
        };
        let (lo, hi) = (first.min(second), first.max(second));
        return Ok(ParsedRange {
            sheet_name,
            address: RangeAddress::ColBand {
                start_col: lo,
                end_col: hi + 1,
            },
        });
    }

    let (start_text, end_text) = match body.split_once(':') {
        Some((a, b)) => (a, b),
        None => (body, body),
    };
    let (start_row, start_col) = parse_cell_address(start_text)?;
    let (end_row, end_col) = parse_cell_address(end_text)?;

    Ok(ParsedRange {
        sheet_name,
        address: RangeAddress::Rect {
            start_row: start_row.min(end_row),
            end_row: start_row.max(end_row) + 1,
            start_col: start_col.min(end_col),
            end_col: start_col.max(end_col) + 1,
        },
    })
}

/// Format a zero-based `(row, column)` back into A1 text.
pub fn cell_address(row: i64, col: i64) -> String {
    let letters = index_to_column_letters(col).unwrap_or_default();
    format!("{}{}", letters, row + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_round_trip_through_index() {
        for letters in ["A", "Z", "AA", "AZ", "ZZ", "AAA", "xfd"] {
            let index = column_letters_to_index(letters).unwrap();
            assert_eq!(
                index_to_column_letters(index).unwrap(),
                letters.to_ascii_uppercase()
            );
        }
    }

    #[test]
    fn sheet_prefix_overrides_default() {
        let parsed = parse_range_address("'Q1 Data'!A1:B2", Some("Sheet1")).unwrap();
        assert_eq!(parsed.sheet_name.as_deref(), Some("Q1 Data"));
    }
}
