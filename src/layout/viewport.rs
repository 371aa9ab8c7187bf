//! Viewport state and visible-window computation.
//!
//! Cells have a fixed size, so every lookup here is O(1): the first visible
//! row is `floor(scroll_y / cell_height)` and the span is
//! `ceil(height / cell_height) + overscan`.

use serde::Serialize;

use crate::types::CellPos;

/// Fixed cell dimensions in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    pub cell_width: f32,
    pub cell_height: f32,
}

impl CellMetrics {
    pub const fn new(cell_width: f32, cell_height: f32) -> Self {
        Self {
            cell_width,
            cell_height,
        }
    }

    /// Left edge of column `col` in sheet coordinates.
    pub fn col_x(&self, col: u32) -> f32 {
        col as f32 * self.cell_width
    }

    /// Top edge of row `row` in sheet coordinates.
    pub fn row_y(&self, row: u32) -> f32 {
        row as f32 * self.cell_height
    }
}

/// A scroll position in sheet pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScrollOffset {
    pub x: f32,
    pub y: f32,
}

impl ScrollOffset {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Rows `[start_row, start_row + row_count)` x cols `[start_col, start_col + col_count)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleWindow {
    pub start_row: u32,
    pub start_col: u32,
    pub row_count: u32,
    pub col_count: u32,
}

impl VisibleWindow {
    /// One past the last row.
    pub fn end_row(&self) -> u32 {
        self.start_row.saturating_add(self.row_count)
    }

    /// One past the last column.
    pub fn end_col(&self) -> u32 {
        self.start_col.saturating_add(self.col_count)
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        (self.start_row..self.end_row()).contains(&row)
            && (self.start_col..self.end_col()).contains(&col)
    }

    pub fn cell_count(&self) -> usize {
        (self.row_count as usize).saturating_mul(self.col_count as usize)
    }

    /// Positions in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellPos> {
        let (start_col, end_col) = (self.start_col, self.end_col());
        (self.start_row..self.end_row())
            .flat_map(move |row| (start_col..end_col).map(move |col| CellPos::new(row, col)))
    }
}

/// Convert a non-negative pixel quotient to a cell count/index.
/// The cast is safe: the value is clamped into `[0, u32::MAX]` first.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_cells(value: f32) -> u32 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, u32::MAX as f32) as u32
}

/// Viewport state - the visible pixel region into the logical grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// Horizontal scroll position in sheet coordinates
    pub scroll_x: f32,
    /// Vertical scroll position in sheet coordinates
    pub scroll_y: f32,
    /// Container width in pixels
    pub width: f32,
    /// Container height in pixels
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn offset(&self) -> ScrollOffset {
        ScrollOffset::new(self.scroll_x, self.scroll_y)
    }

    /// Resize the container. Returns true if the size changed.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        let (width, height) = (width.max(0.0), height.max(0.0));
        let changed = (self.width - width).abs() > f32::EPSILON
            || (self.height - height).abs() > f32::EPSILON;
        self.width = width;
        self.height = height;
        changed
    }

    /// Rows needed to cover the container plus overscan, before clamping.
    pub fn row_span(&self, metrics: &CellMetrics, overscan: u32) -> u32 {
        to_cells((self.height / metrics.cell_height).ceil()).saturating_add(overscan)
    }

    /// Columns needed to cover the container plus overscan, before clamping.
    pub fn col_span(&self, metrics: &CellMetrics, overscan: u32) -> u32 {
        to_cells((self.width / metrics.cell_width).ceil()).saturating_add(overscan)
    }

    /// First row intersecting the viewport.
    pub fn first_row(&self, metrics: &CellMetrics) -> u32 {
        to_cells((self.scroll_y / metrics.cell_height).floor())
    }

    /// First column intersecting the viewport.
    pub fn first_col(&self, metrics: &CellMetrics) -> u32 {
        to_cells((self.scroll_x / metrics.cell_width).floor())
    }

    /// Compute the window of cells to materialize, clamped so that
    /// `start + count` never exceeds `total_rows` / `total_cols`.
    pub fn visible_window(
        &self,
        metrics: &CellMetrics,
        overscan: u32,
        total_rows: u32,
        total_cols: u32,
    ) -> VisibleWindow {
        let start_row = self.first_row(metrics).min(total_rows.saturating_sub(1));
        let start_col = self.first_col(metrics).min(total_cols.saturating_sub(1));
        let row_count = self
            .row_span(metrics, overscan)
            .min(total_rows.saturating_sub(start_row));
        let col_count = self
            .col_span(metrics, overscan)
            .min(total_cols.saturating_sub(start_col));
        VisibleWindow {
            start_row,
            start_col,
            row_count,
            col_count,
        }
    }

    /// On-screen position of a cell's top-left corner.
    pub fn cell_origin(&self, metrics: &CellMetrics, row: u32, col: u32) -> (f32, f32) {
        (
            metrics.col_x(col) - self.scroll_x,
            metrics.row_y(row) - self.scroll_y,
        )
    }

    /// Clamp scroll position so the viewport stays inside
    /// `total_rows x total_cols` cells.
    pub fn clamp_scroll(&mut self, metrics: &CellMetrics, total_rows: u32, total_cols: u32) {
        let max_x = (metrics.col_x(total_cols) - self.width).max(0.0);
        let max_y = (metrics.row_y(total_rows) - self.height).max(0.0);
        self.scroll_x = sanitize(self.scroll_x).clamp(0.0, max_x);
        self.scroll_y = sanitize(self.scroll_y).clamp(0.0, max_y);
    }

    /// Set absolute scroll position (clamped). Returns true if it moved.
    pub fn set_scroll(
        &mut self,
        offset: ScrollOffset,
        metrics: &CellMetrics,
        total_rows: u32,
        total_cols: u32,
    ) -> bool {
        let before = self.offset();
        self.scroll_x = offset.x;
        self.scroll_y = offset.y;
        self.clamp_scroll(metrics, total_rows, total_cols);
        (before.x - self.scroll_x).abs() > f32::EPSILON
            || (before.y - self.scroll_y).abs() > f32::EPSILON
    }

    /// Scroll the minimum distance that brings `pos` fully into view.
    /// Returns true if the scroll position changed.
    pub fn scroll_into_view(&mut self, metrics: &CellMetrics, pos: CellPos) -> bool {
        let (left, top) = (metrics.col_x(pos.col), metrics.row_y(pos.row));
        let (right, bottom) = (left + metrics.cell_width, top + metrics.cell_height);
        let mut target = self.offset();

        if left < self.scroll_x {
            target.x = left;
        } else if right > self.scroll_x + self.width {
            target.x = (right - self.width).max(0.0);
        }
        if top < self.scroll_y {
            target.y = top;
        } else if bottom > self.scroll_y + self.height {
            target.y = (bottom - self.height).max(0.0);
        }

        let moved = (target.x - self.scroll_x).abs() > f32::EPSILON
            || (target.y - self.scroll_y).abs() > f32::EPSILON;
        self.scroll_x = target.x;
        self.scroll_y = target.y;
        moved
    }
}

fn sanitize(v: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}
