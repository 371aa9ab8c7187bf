//! Fixed-size pool of renderable cell slots.
//!
//! The pool is sized from the container (rows/cols needed to cover it plus
//! overscan), so its slot count only changes on resize. Scrolling rebinds
//! slots to new addresses. A cell maps to slot
//! `(row % pool_rows) * pool_cols + (col % pool_cols)`, which keeps a cell in
//! the same slot for as long as it stays in the window; only the rows/columns
//! that scrolled in take over the slots of the ones that scrolled out.

use super::VisibleWindow;
use crate::types::CellPos;

#[derive(Debug, Clone, Default)]
pub struct CellPool {
    rows: u32,
    cols: u32,
    slots: Vec<Option<CellPos>>,
}

impl CellPool {
    pub fn new(rows: u32, cols: u32) -> Self {
        let mut pool = Self::default();
        pool.resize(rows, cols);
        pool
    }

    /// Pool dimensions `(rows, cols)`.
    pub fn dims(&self) -> (u32, u32) {
        (self.rows, self.cols)
    }

    /// Total slot count.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Change the pool dimensions, dropping all bindings.
    /// Returns true if the dimensions changed.
    pub fn resize(&mut self, rows: u32, cols: u32) -> bool {
        let (rows, cols) = (rows.max(1), cols.max(1));
        if rows == self.rows && cols == self.cols && !self.slots.is_empty() {
            return false;
        }
        self.rows = rows;
        self.cols = cols;
        self.slots = vec![None; (rows as usize).saturating_mul(cols as usize)];
        true
    }

    /// Slot index a cell occupies.
    pub fn slot_for(&self, row: u32, col: u32) -> usize {
        (row % self.rows) as usize * self.cols as usize + (col % self.cols) as usize
    }

    /// Bind every cell of `window` to its slot and vacate the rest.
    ///
    /// Returns how many slots changed occupant. Cells beyond the pool
    /// dimensions (a window larger than the pool) are not bound.
    pub fn bind(&mut self, window: &VisibleWindow) -> usize {
        let rows = window.row_count.min(self.rows);
        let cols = window.col_count.min(self.cols);
        let fitted = VisibleWindow {
            row_count: rows,
            col_count: cols,
            ..*window
        };

        let mut next = vec![None; self.slots.len()];
        for pos in fitted.cells() {
            let idx = self.slot_for(pos.row, pos.col);
            if let Some(slot) = next.get_mut(idx) {
                *slot = Some(pos);
            }
        }
        let changed = self
            .slots
            .iter()
            .zip(&next)
            .filter(|(old, new)| old != new)
            .count();
        self.slots = next;
        changed
    }

    /// Occupant of slot `index`, if any.
    pub fn occupant(&self, index: usize) -> Option<CellPos> {
        self.slots.get(index).copied().flatten()
    }

    /// Bound slots as `(slot_index, position)`.
    pub fn bound(&self) -> impl Iterator<Item = (usize, CellPos)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.map(|pos| (idx, pos)))
    }

    /// Number of bound slots.
    pub fn bound_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}
