//! Keyboard model: DOM key names to [`Key`], and movement targets.

use crate::layout::SheetExtent;
use crate::types::CellPos;

/// Keys the grid reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    Tab,
    Enter,
    Escape,
    F2,
    Delete,
    Backspace,
    /// A single printable character.
    Char(char),
    /// Anything else (modifier-only presses, function keys, ...).
    Other,
}

impl Key {
    /// Map a `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "ArrowUp" | "Up" => Self::ArrowUp,
            "ArrowDown" | "Down" => Self::ArrowDown,
            "ArrowLeft" | "Left" => Self::ArrowLeft,
            "ArrowRight" | "Right" => Self::ArrowRight,
            "Home" => Self::Home,
            "End" => Self::End,
            "PageUp" => Self::PageUp,
            "PageDown" => Self::PageDown,
            "Tab" => Self::Tab,
            "Enter" => Self::Enter,
            "Escape" | "Esc" => Self::Escape,
            "F2" => Self::F2,
            "Delete" | "Del" => Self::Delete,
            "Backspace" => Self::Backspace,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if !c.is_control() => Self::Char(c),
                    _ => Self::Other,
                }
            }
        }
    }

    /// Keys that move the active cell or the selection focus.
    pub fn is_movement(self) -> bool {
        matches!(
            self,
            Self::ArrowUp
                | Self::ArrowDown
                | Self::ArrowLeft
                | Self::ArrowRight
                | Self::Home
                | Self::End
                | Self::PageUp
                | Self::PageDown
                | Self::Tab
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
    };
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
    };
    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
    };
}

/// Where a movement key takes `from`, or `None` for non-movement keys.
///
/// Results are clamped into the hard maxima of `extent`; Ctrl+End targets the
/// far corner of the materialized extent.
pub fn move_target(
    from: CellPos,
    key: Key,
    mods: Modifiers,
    extent: &SheetExtent,
    page_rows: u32,
) -> Option<CellPos> {
    let target = match key {
        Key::ArrowUp => CellPos::new(from.row.saturating_sub(1), from.col),
        Key::ArrowDown => CellPos::new(from.row.saturating_add(1), from.col),
        Key::ArrowLeft => CellPos::new(from.row, from.col.saturating_sub(1)),
        Key::ArrowRight => CellPos::new(from.row, from.col.saturating_add(1)),
        Key::Tab if mods.shift => CellPos::new(from.row, from.col.saturating_sub(1)),
        Key::Tab => CellPos::new(from.row, from.col.saturating_add(1)),
        Key::PageUp => CellPos::new(from.row.saturating_sub(page_rows), from.col),
        Key::PageDown => CellPos::new(from.row.saturating_add(page_rows), from.col),
        Key::Home if mods.ctrl => CellPos::new(0, 0),
        Key::Home => CellPos::new(from.row, 0),
        Key::End if mods.ctrl => extent.last_cell(),
        Key::End => CellPos::new(from.row, extent.cols.saturating_sub(1)),
        _ => return None,
    };
    Some(extent.clamp(target))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dom_printable() {
        assert_eq!(Key::from_dom("a"), Key::Char('a'));
        assert_eq!(Key::from_dom("="), Key::Char('='));
        assert_eq!(Key::from_dom("Shift"), Key::Other);
        assert_eq!(Key::from_dom("ArrowLeft"), Key::ArrowLeft);
    }

    #[test]
    fn test_move_clamps_at_hard_maximum() {
        let extent = SheetExtent::new(10, 5, 10, 5);
        let from = CellPos::new(9, 4);
        assert_eq!(
            move_target(from, Key::ArrowDown, Modifiers::NONE, &extent, 20),
            Some(CellPos::new(9, 4))
        );
        assert_eq!(
            move_target(from, Key::Tab, Modifiers::NONE, &extent, 20),
            Some(CellPos::new(9, 4))
        );
    }
}
