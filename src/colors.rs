use serde::{Deserialize, Serialize};

/// An RGB color in the API's normalized representation: unit-interval
/// components, full opacity assumed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Color {
    #[serde(default)]
    pub red: f32,
    #[serde(default)]
    pub green: f32,
    #[serde(default)]
    pub blue: f32,
}

/// Convert a hex color string into a [`Color`].
///
/// Accepts 3- or 6-digit hex, case-insensitive, optional `#` prefix. The
/// 3-digit form expands by digit duplication (`F00` -> `FF0000`). Returns
/// `None` for anything else; whether that is fatal is the caller's call.
pub fn hex_to_color(text: &str) -> Option<Color> {
    let hex = text.trim().strip_prefix('#').unwrap_or(text.trim());

    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return None,
    };

    if !expanded.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&expanded[range], 16)
            .map(|v| v as f32 / 255.0)
            .ok()
    };

    Some(Color {
        red: channel(0..2)?,
        green: channel(2..4)?,
        blue: channel(4..6)?,
    })
}

/// Render a [`Color`] back to `#RRGGBB` for confirmations.
pub fn color_to_hex(color: &Color) -> String {
    let to_byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "#{:02X}{:02X}{:02X}",
        to_byte(color.red),
        to_byte(color.green),
        to_byte(color.blue)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_and_long_forms_agree() {
        assert_eq!(hex_to_color("#FF0000"), hex_to_color("F00"));
        assert_eq!(hex_to_color("abc"), hex_to_color("#AABBCC"));
    }

    #[test]
    fn malformed_input_is_none_not_error() {
        assert!(hex_to_color("").is_none());
        assert!(hex_to_color("#12345").is_none());
        assert!(hex_to_color("GGGGGG").is_none());
    }
}
