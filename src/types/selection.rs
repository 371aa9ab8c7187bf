use serde::Serialize;

use super::CellPos;

/// Rectangular selection between an anchor and a (possibly dragged) focus.
///
/// Anchor/focus order is kept for drag direction; [`bounds`](Self::bounds)
/// normalises it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectionRange {
    pub anchor: CellPos,
    pub focus: CellPos,
}

impl SelectionRange {
    /// A 1x1 range at `pos`.
    pub fn single(pos: CellPos) -> Self {
        Self {
            anchor: pos,
            focus: pos,
        }
    }

    pub fn new(anchor: CellPos, focus: CellPos) -> Self {
        Self { anchor, focus }
    }

    /// Get normalized bounds `(min_row, min_col, max_row, max_col)`.
    pub fn bounds(&self) -> (u32, u32, u32, u32) {
        (
            self.anchor.row.min(self.focus.row),
            self.anchor.col.min(self.focus.col),
            self.anchor.row.max(self.focus.row),
            self.anchor.col.max(self.focus.col),
        )
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        let (min_row, min_col, max_row, max_col) = self.bounds();
        (min_row..=max_row).contains(&row) && (min_col..=max_col).contains(&col)
    }

    /// Number of columns spanned.
    pub fn width(&self) -> u32 {
        let (_, min_col, _, max_col) = self.bounds();
        max_col - min_col + 1
    }

    /// Number of rows spanned.
    pub fn height(&self) -> u32 {
        let (min_row, _, max_row, _) = self.bounds();
        max_row - min_row + 1
    }

    /// Top-left corner.
    pub fn top_left(&self) -> CellPos {
        let (min_row, min_col, _, _) = self.bounds();
        CellPos::new(min_row, min_col)
    }

    /// Addresses covered by the range in row-major order.
    pub fn addresses(&self) -> Vec<String> {
        let (min_row, min_col, max_row, max_col) = self.bounds();
        let cells = (self.width() as usize).saturating_mul(self.height() as usize);
        let mut out = Vec::with_capacity(cells.min(1 << 16));
        for row in min_row..=max_row {
            for col in min_col..=max_col {
                out.push(crate::cell_ref::to_address(row, col));
            }
        }
        out
    }
}
