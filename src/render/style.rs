//! Style attributes to CSS-ready values, with dark-mode adjustment.

use serde::Serialize;

use super::colors::{palette, CssColor, Rgb};
use crate::types::StyleAttributes;

pub const DEFAULT_FONT_SIZE: f64 = 13.0;

/// Blend applied to explicit colors that would be unreadable in dark mode.
const DARK_MODE_TEXT_LIFT: f64 = 0.6;
const DARK_MODE_FILL_DIM: f64 = 0.7;
const DARK_MODE_BORDER_DIM: f64 = 0.5;

/// Rendering-ready attributes for one cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStyle {
    pub color: CssColor,
    pub background: CssColor,
    pub border: CssColor,
    pub font_weight: &'static str,
    pub font_style: &'static str,
    pub text_decoration: String,
    pub text_align: &'static str,
    pub font_size: String,
}

/// Resolve `style` for the current theme.
///
/// In dark mode unset colors take the dark theme defaults, explicit dark text
/// is lightened and explicit light fills/borders are darkened. Colors that
/// are not hex strings pass through untouched.
pub fn resolve_style(style: &StyleAttributes, dark_mode: bool) -> ResolvedStyle {
    let (text, background, grid) = if dark_mode {
        (
            palette::DARK_TEXT,
            palette::DARK_BACKGROUND,
            palette::DARK_GRID_LINE,
        )
    } else {
        (
            palette::LIGHT_TEXT,
            palette::LIGHT_BACKGROUND,
            palette::LIGHT_GRID_LINE,
        )
    };

    let color = match style.font_color.as_deref() {
        Some(c) if dark_mode => adjust(c, |rgb| {
            (!rgb.is_light()).then(|| rgb.lighten(DARK_MODE_TEXT_LIFT))
        }),
        Some(c) => c.to_string(),
        None => text.to_string(),
    };
    let background = match style.background_color.as_deref() {
        Some(c) if dark_mode => adjust(c, |rgb| {
            rgb.is_light().then(|| rgb.darken(DARK_MODE_FILL_DIM))
        }),
        Some(c) => c.to_string(),
        None => background.to_string(),
    };
    let border = match style.border_color.as_deref() {
        Some(c) if dark_mode => adjust(c, |rgb| {
            rgb.is_light().then(|| rgb.darken(DARK_MODE_BORDER_DIM))
        }),
        Some(c) => c.to_string(),
        None => grid.to_string(),
    };

    let mut decorations = Vec::new();
    if style.underline == Some(true) {
        decorations.push("underline");
    }
    if style.strikethrough == Some(true) {
        decorations.push("line-through");
    }
    let text_decoration = if decorations.is_empty() {
        "none".to_string()
    } else {
        decorations.join(" ")
    };

    let font_size = style
        .font_size
        .filter(|s| s.is_finite() && *s > 0.0)
        .unwrap_or(DEFAULT_FONT_SIZE);

    ResolvedStyle {
        color,
        background,
        border,
        font_weight: if style.bold == Some(true) {
            "bold"
        } else {
            "normal"
        },
        font_style: if style.italic == Some(true) {
            "italic"
        } else {
            "normal"
        },
        text_decoration,
        text_align: style.align.map_or("left", |a| a.as_css()),
        font_size: format!("{font_size}px"),
    }
}

/// Apply `f` to a hex color; keep the input when it does not parse or `f`
/// declines.
fn adjust(css: &str, f: impl FnOnce(Rgb) -> Option<Rgb>) -> CssColor {
    Rgb::from_hex(css)
        .and_then(f)
        .map_or_else(|| css.to_string(), Rgb::to_hex)
}
