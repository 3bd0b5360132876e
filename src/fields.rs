//! Field-mask builders.
//!
//! The remote APIs only overwrite attributes named in a request's field
//! mask. A payload field without a mask entry is ignored; a mask entry
//! without a payload field resets the attribute. Each builder here updates
//! the payload and the mask in the same setter, so the two can never
//! diverge in membership.

use crate::api::docs::{ParagraphStyle, PtSize, TextStyle};
use crate::api::sheets::{CellFormat, HorizontalAlign, NumberFormat, TextFormat};
use crate::colors::Color;

/// Builder for a Docs `updateTextStyle` payload + mask pair.
#[derive(Debug, Default, Clone)]
pub struct TextStyleMask {
    style: TextStyle,
    fields: Vec<&'static str>,
}

impl TextStyleMask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bold(mut self, value: bool) -> Self {
        self.style.bold = Some(value);
        self.fields.push("bold");
        self
    }

    pub fn italic(mut self, value: bool) -> Self {
        self.style.italic = Some(value);
        self.fields.push("italic");
        self
    }

    pub fn underline(mut self, value: bool) -> Self {
        self.style.underline = Some(value);
        self.fields.push("underline");
        self
    }

    pub fn strikethrough(mut self, value: bool) -> Self {
        self.style.strikethrough = Some(value);
        self.fields.push("strikethrough");
        self
    }

    pub fn font_size_pt(mut self, points: f64) -> Self {
        self.style.font_size = Some(PtSize::points(points));
        self.fields.push("fontSize");
        self
    }

    pub fn foreground_color(mut self, color: Color) -> Self {
        self.style.foreground_color = Some(color.into());
        self.fields.push("foregroundColor");
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The paired payload and comma-joined mask, or `None` when no
    /// attribute was set.
    pub fn into_parts(self) -> Option<(TextStyle, String)> {
        if self.fields.is_empty() {
            return None;
        }
        Some((self.style, self.fields.join(",")))
    }
}

/// Builder for a Docs `updateParagraphStyle` payload + mask pair.
#[derive(Debug, Default, Clone)]
pub struct ParagraphStyleMask {
    style: ParagraphStyle,
    fields: Vec<&'static str>,
}

impl ParagraphStyleMask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named_style(mut self, wire_name: &'static str) -> Self {
        self.style.named_style_type = Some(wire_name);
        self.fields.push("namedStyleType");
        self
    }

    pub fn alignment(mut self, wire_name: &'static str) -> Self {
        self.style.alignment = Some(wire_name);
        self.fields.push("alignment");
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_parts(self) -> Option<(ParagraphStyle, String)> {
        if self.fields.is_empty() {
            return None;
        }
        Some((self.style, self.fields.join(",")))
    }
}

/// Builder for a Sheets `repeatCell` cell payload + mask pair. Mask paths
/// are rooted at the cell (`userEnteredFormat.*`).
#[derive(Debug, Default, Clone)]
pub struct CellFormatMask {
    format: CellFormat,
    fields: Vec<&'static str>,
}

impl CellFormatMask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn background_color(mut self, color: Color) -> Self {
        self.format.background_color = Some(color);
        self.fields.push("userEnteredFormat.backgroundColor");
        self
    }

    pub fn bold(mut self, value: bool) -> Self {
        self.text_format().bold = Some(value);
        self.fields.push("userEnteredFormat.textFormat.bold");
        self
    }

    pub fn italic(mut self, value: bool) -> Self {
        self.text_format().italic = Some(value);
        self.fields.push("userEnteredFormat.textFormat.italic");
        self
    }

    pub fn font_size(mut self, points: i64) -> Self {
        self.text_format().font_size = Some(points);
        self.fields.push("userEnteredFormat.textFormat.fontSize");
        self
    }

    pub fn text_color(mut self, color: Color) -> Self {
        self.text_format().foreground_color = Some(color);
        self.fields
            .push("userEnteredFormat.textFormat.foregroundColor");
        self
    }

    pub fn horizontal_alignment(mut self, align: HorizontalAlign) -> Self {
        self.format.horizontal_alignment = Some(align);
        self.fields.push("userEnteredFormat.horizontalAlignment");
        self
    }

    pub fn number_format(mut self, format_type: impl Into<String>, pattern: Option<String>) -> Self {
        self.format.number_format = Some(NumberFormat {
            format_type: format_type.into(),
            pattern,
        });
        self.fields.push("userEnteredFormat.numberFormat");
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_parts(self) -> Option<(CellFormat, String)> {
        if self.fields.is_empty() {
            return None;
        }
        Some((self.format, self.fields.join(",")))
    }

    fn text_format(&mut self) -> &mut TextFormat {
        self.format.text_format.get_or_insert_with(TextFormat::default)
    }
}
