//! Active cell and rectangular range selection.
//!
//! A pointer drag is `start_selection` (mouse down), any number of
//! `update_selection` (mouse enter), then `end_selection` (mouse up), after
//! which the range is frozen until the next `start_selection` or `clear`.

pub mod navigation;

use crate::types::{CellPos, SelectionRange};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionModel {
    active: CellPos,
    range: Option<SelectionRange>,
    dragging: bool,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// The focused cell (receives edits and keyboard navigation).
    pub fn active(&self) -> CellPos {
        self.active
    }

    pub fn range(&self) -> Option<SelectionRange> {
        self.range
    }

    /// The range, or the active cell as a 1x1 range when there is none.
    pub fn effective_range(&self) -> SelectionRange {
        self.range
            .unwrap_or_else(|| SelectionRange::single(self.active))
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Begin a fresh selection at `(row, col)`; it also becomes the active cell.
    pub fn start_selection(&mut self, row: u32, col: u32) {
        let pos = CellPos::new(row, col);
        self.active = pos;
        self.range = Some(SelectionRange::single(pos));
        self.dragging = true;
    }

    /// Move the focus of an in-progress selection. No-op (returns false)
    /// when no drag is in progress or the focus is unchanged.
    pub fn update_selection(&mut self, row: u32, col: u32) -> bool {
        if !self.dragging {
            return false;
        }
        let Some(range) = self.range.as_mut() else {
            return false;
        };
        let focus = CellPos::new(row, col);
        if range.focus == focus {
            return false;
        }
        range.focus = focus;
        true
    }

    /// Finish the drag, keeping the range.
    pub fn end_selection(&mut self) {
        self.dragging = false;
    }

    /// Drop the range; the active cell stays.
    pub fn clear(&mut self) {
        self.range = None;
        self.dragging = false;
    }

    /// Modifier-click: span from the active cell to `(row, col)`.
    /// The active cell does not move; a following drag keeps extending.
    pub fn extend_to(&mut self, row: u32, col: u32) {
        self.range = Some(SelectionRange::new(self.active, CellPos::new(row, col)));
        self.dragging = true;
    }

    /// Plain navigation: move the active cell and collapse the range onto it.
    pub fn move_active(&mut self, pos: CellPos) {
        self.active = pos;
        self.range = Some(SelectionRange::single(pos));
        self.dragging = false;
    }

    /// Shift-navigation: keep the active cell as anchor and move the focus.
    pub fn move_focus(&mut self, pos: CellPos) {
        let anchor = self.range.map_or(self.active, |r| r.anchor);
        self.range = Some(SelectionRange::new(anchor, pos));
    }

    /// Current focus (the cell shift-navigation moves from).
    pub fn focus(&self) -> CellPos {
        self.range.map_or(self.active, |r| r.focus)
    }

    pub fn is_selected(&self, row: u32, col: u32) -> bool {
        self.range.is_some_and(|r| r.contains(row, col))
    }

    pub fn is_active_cell(&self, row: u32, col: u32) -> bool {
        self.active == CellPos::new(row, col)
    }

    /// Addresses of the range in row-major order (empty without a range).
    pub fn range_addresses(&self) -> Vec<String> {
        self.range.map(|r| r.addresses()).unwrap_or_default()
    }
}
