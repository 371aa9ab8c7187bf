//! Materialized sheet bounds and the batched growth policy.

use crate::types::CellPos;

/// How far the sheet is currently materialized, and how far it may grow.
///
/// `rows`/`cols` only ever increase, in whole batches, and never past
/// `max_rows`/`max_cols`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetExtent {
    pub rows: u32,
    pub cols: u32,
    pub max_rows: u32,
    pub max_cols: u32,
}

/// Growth step sizes and trigger margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthPolicy {
    pub row_batch: u32,
    pub col_batch: u32,
    pub margin: u32,
}

impl SheetExtent {
    pub fn new(rows: u32, cols: u32, max_rows: u32, max_cols: u32) -> Self {
        let max_rows = max_rows.max(1);
        let max_cols = max_cols.max(1);
        Self {
            rows: rows.clamp(1, max_rows),
            cols: cols.clamp(1, max_cols),
            max_rows,
            max_cols,
        }
    }

    /// Grow so that rows `< demand_rows + margin` and cols `< demand_cols +
    /// margin` are materialized. Returns true if either bound grew.
    pub fn grow_to_cover(
        &mut self,
        demand_rows: u32,
        demand_cols: u32,
        policy: &GrowthPolicy,
    ) -> bool {
        let new_rows = grow_axis(
            self.rows,
            demand_rows.saturating_add(policy.margin),
            policy.row_batch,
            self.max_rows,
        );
        let new_cols = grow_axis(
            self.cols,
            demand_cols.saturating_add(policy.margin),
            policy.col_batch,
            self.max_cols,
        );
        let grew = new_rows != self.rows || new_cols != self.cols;
        if grew {
            log::debug!(
                "materialized bound grew {}x{} -> {}x{}",
                self.rows,
                self.cols,
                new_rows,
                new_cols
            );
        }
        self.rows = new_rows;
        self.cols = new_cols;
        grew
    }

    /// Grow (in batches) until `pos` lies inside the materialized bound.
    pub fn include(&mut self, pos: CellPos, policy: &GrowthPolicy) -> bool {
        let exact = GrowthPolicy {
            margin: 0,
            ..*policy
        };
        self.grow_to_cover(pos.row.saturating_add(1), pos.col.saturating_add(1), &exact)
    }

    /// Clamp a position into the hard maxima.
    pub fn clamp(&self, pos: CellPos) -> CellPos {
        CellPos::new(
            pos.row.min(self.max_rows.saturating_sub(1)),
            pos.col.min(self.max_cols.saturating_sub(1)),
        )
    }

    /// Bottom-right materialized cell.
    pub fn last_cell(&self) -> CellPos {
        CellPos::new(self.rows.saturating_sub(1), self.cols.saturating_sub(1))
    }
}

fn grow_axis(current: u32, demand: u32, batch: u32, max: u32) -> u32 {
    if demand <= current || current >= max {
        return current;
    }
    let batch = batch.max(1);
    let shortfall = demand - current;
    let batches = shortfall.div_ceil(batch);
    current
        .saturating_add(batches.saturating_mul(batch))
        .min(max)
}
