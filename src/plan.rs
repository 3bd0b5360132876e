//! Drift-compensating request builders.
//!
//! Within one batch submission the remote API applies requests in order,
//! shifting indices internally as it goes. The builders here compute every
//! request's bounds against the state the stream will be in once the
//! preceding requests have conceptually applied, so a whole logical edit
//! lands in a single atomic call. Chaining separate calls is different:
//! offsets must be re-resolved between calls, and that is the caller's job.

use crate::api::docs::{DocRange, DocsRequest, Location};
use crate::api::sheets::{DimensionRange, SheetDimension, SheetsRequest};
use crate::errors::EngineError;
use crate::fields::{ParagraphStyleMask, TextStyleMask};

/// One logical edit against a content span `[start, end)`: optionally
/// delete what is there, insert replacement text, then restyle the result.
///
/// Emission order is fixed: delete, insert, character style, paragraph
/// style. Delete and insert are the only operations that move offsets, and
/// every later request's bounds assume both have already happened, so
/// reordering would invalidate them.
#[derive(Debug, Clone)]
pub struct RangeEditPlan {
    start: i64,
    end: i64,
    delete_existing: bool,
    insert_text: Option<String>,
    text_style: Option<TextStyleMask>,
    paragraph_style: Option<ParagraphStyleMask>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlanState {
    Unedited,
    Deleted,
    Inserted,
    Styled,
}

impl RangeEditPlan {
    pub fn new(start: i64, end: i64) -> Result<Self, EngineError> {
        if start < 0 || end < start {
            return Err(EngineError::index_out_of_range(format!(
                "invalid content range [{start}, {end})"
            )));
        }
        Ok(Self {
            start,
            end,
            delete_existing: false,
            insert_text: None,
            text_style: None,
            paragraph_style: None,
        })
    }

    /// Request deletion of the existing `[start, end)` content. A
    /// zero-length range makes this a no-op rather than an error.
    pub fn delete_existing(mut self) -> Self {
        self.delete_existing = true;
        self
    }

    /// Request insertion at `start`. Empty text produces no request.
    pub fn insert_text(mut self, text: impl Into<String>) -> Self {
        self.insert_text = Some(text.into());
        self
    }

    /// Request a character-level style over the resulting content. An
    /// empty mask produces no request.
    pub fn style_text(mut self, mask: TextStyleMask) -> Self {
        if !mask.is_empty() {
            self.text_style = Some(mask);
        }
        self
    }

    /// Request a paragraph-level style over the resulting content plus its
    /// trailing delimiter.
    pub fn style_paragraph(mut self, mask: ParagraphStyleMask) -> Self {
        if !mask.is_empty() {
            self.paragraph_style = Some(mask);
        }
        self
    }

    /// Compile the plan into its ordered request sequence.
    ///
    /// Walks a single forward path (unedited -> deleted -> inserted ->
    /// styled); no step can revisit an earlier state, which is what makes
    /// the offset arithmetic sound. Signals [`EngineError::NoOp`] instead
    /// of producing an empty batch.
    pub fn build(self) -> Result<Vec<DocsRequest>, EngineError> {
        let mut requests = Vec::new();
        let mut state = PlanState::Unedited;

        if self.delete_existing && self.end > self.start {
            requests.push(DocsRequest::DeleteContentRange {
                range: DocRange {
                    start_index: self.start,
                    end_index: self.end,
                },
            });
            state = PlanState::Deleted;
        }

        let mut inserted_len = 0_i64;
        if let Some(text) = &self.insert_text
            && !text.is_empty()
        {
            // After a delete, `start` is exactly where the removed content
            // began; without one it is the untouched insertion point.
            requests.push(DocsRequest::InsertText {
                location: Location { index: self.start },
                text: text.clone(),
            });
            inserted_len = text.chars().count() as i64;
            state = PlanState::Inserted;
        }

        // Where the content now ends, and where its trailing paragraph
        // delimiter sits. When nothing was inserted the original bounds
        // still hold, because styling does not move offsets.
        let (new_end, para_end) = match state {
            PlanState::Inserted => (self.start + inserted_len, self.start + inserted_len + 1),
            _ => (self.end, self.end + 1),
        };

        if let Some(mask) = self.text_style
            && new_end > self.start
            && let Some((style, fields)) = mask.into_parts()
        {
            requests.push(DocsRequest::UpdateTextStyle {
                range: DocRange {
                    start_index: self.start,
                    end_index: new_end,
                },
                text_style: style,
                fields,
            });
            state = PlanState::Styled;
        }

        if let Some(mask) = self.paragraph_style
            && let Some((style, fields)) = mask.into_parts()
        {
            requests.push(DocsRequest::UpdateParagraphStyle {
                range: DocRange {
                    start_index: self.start,
                    end_index: para_end,
                },
                paragraph_style: style,
                fields,
            });
            state = PlanState::Styled;
        }

        if state == PlanState::Unedited {
            return Err(EngineError::NoOp);
        }
        Ok(requests)
    }
}

/// A contiguous zero-based, end-exclusive row or column band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionBand {
    pub start: i64,
    pub end: i64,
}

/// Build `deleteDimension` requests for one or more bands in a single
/// atomic call.
///
/// Bands are emitted bottom-to-top (descending start index), so a deletion
/// never shifts the indices a later request in the same call was computed
/// against. Zero-length bands are dropped.
pub fn dimension_delete_requests(
    sheet_id: i64,
    dimension: SheetDimension,
    bands: &[DimensionBand],
) -> Vec<SheetsRequest> {
    let mut ordered: Vec<DimensionBand> = bands
        .iter()
        .copied()
        .filter(|band| band.end > band.start)
        .collect();
    ordered.sort_by(|a, b| b.start.cmp(&a.start));

    ordered
        .into_iter()
        .map(|band| SheetsRequest::DeleteDimension {
            range: DimensionRange {
                sheet_id,
                dimension,
                start_index: band.start,
                end_index: band.end,
            },
        })
        .collect()
}

/// Build the `insertDimension` request for a band of `count` rows/columns
/// starting at zero-based `at`.
pub fn dimension_insert_request(
    sheet_id: i64,
    dimension: SheetDimension,
    at: i64,
    count: i64,
) -> SheetsRequest {
    SheetsRequest::InsertDimension {
        range: DimensionRange {
            sheet_id,
            dimension,
            start_index: at,
            end_index: at + count,
        },
        // Inherit formatting from the band above/left unless inserting at
        // the very edge, where nothing precedes the new band.
        inherit_from_before: at > 0,
    }
}

/// Delete every conditional-format rule on a sheet.
///
/// The remote contract shifts rules above a deleted index down by one, so
/// a bulk clear must delete highest index first; ascending order would
/// self-invalidate halfway through.
pub fn clear_conditional_format_requests(sheet_id: i64, rule_count: usize) -> Vec<SheetsRequest> {
    (0..rule_count as i64)
        .rev()
        .map(|index| SheetsRequest::DeleteConditionalFormatRule { sheet_id, index })
        .collect()
}
