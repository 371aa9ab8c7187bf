//! Scroll, resize and window recomputation for [`Grid`].
//!
//! Scroll events are coalesced: [`Grid::request_scroll`] only records the
//! latest offset and reports whether an animation frame must be scheduled;
//! the work happens once per frame in [`Grid::on_animation_frame`].

use super::Grid;
use crate::layout::ScrollOffset;
use crate::sync::Backend;
use crate::types::CellPos;

impl<B: Backend + 'static> Grid<B> {
    /// Record a scroll position. Returns true when the host must request an
    /// animation frame (none is pending yet).
    #[must_use]
    pub fn request_scroll(&mut self, x: f32, y: f32) -> bool {
        self.frames.request(ScrollOffset::new(x, y))
    }

    /// Whether a recompute is waiting for the next frame.
    pub fn frame_pending(&self) -> bool {
        self.frames.is_scheduled()
    }

    /// Apply the most recent requested scroll. Returns true if the window
    /// changed and the host should redraw.
    pub fn on_animation_frame(&mut self) -> bool {
        match self.frames.take() {
            Some(offset) => self.set_scroll(offset.x, offset.y),
            None => false,
        }
    }

    /// Scroll immediately (no coalescing). Returns true if the window changed.
    pub fn set_scroll(&mut self, x: f32, y: f32) -> bool {
        self.viewport.scroll_x = x;
        self.viewport.scroll_y = y;
        self.recompute()
    }

    /// New container size. Returns true if the window changed.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        let resized = self.viewport.resize(width, height);
        self.recompute() || resized
    }

    /// Scroll the minimum distance that brings `pos` into view, growing the
    /// materialized extent first if needed.
    pub fn ensure_visible(&mut self, pos: CellPos) -> bool {
        let pos = self.extent.clamp(pos);
        let policy = self.growth_policy();
        let grew = self.extent.include(pos, &policy);
        let scrolled = self.viewport.scroll_into_view(&self.metrics, pos);
        let changed = self.recompute();
        grew || scrolled || changed
    }

    /// Grow the extent toward the demanded window, clamp scroll, recompute
    /// the window and rebind the pool. Returns true if anything visible changed.
    pub(crate) fn recompute(&mut self) -> bool {
        let overscan = self.config.overscan;
        let row_span = self.viewport.row_span(&self.metrics, overscan);
        let col_span = self.viewport.col_span(&self.metrics, overscan);
        let pool_resized = self.pool.resize(
            row_span.min(self.extent.max_rows),
            col_span.min(self.extent.max_cols),
        );

        let demand_rows = self
            .viewport
            .first_row(&self.metrics)
            .saturating_add(row_span);
        let demand_cols = self
            .viewport
            .first_col(&self.metrics)
            .saturating_add(col_span);
        let policy = self.growth_policy();
        let grew = self.extent.grow_to_cover(demand_rows, demand_cols, &policy);

        self.viewport
            .clamp_scroll(&self.metrics, self.extent.rows, self.extent.cols);
        let window = self.viewport.visible_window(
            &self.metrics,
            overscan,
            self.extent.rows,
            self.extent.cols,
        );
        let rebound = self.pool.bind(&window);
        let changed = pool_resized || grew || rebound > 0 || window != self.window;
        if changed {
            log::trace!(
                "window rows {}..{} cols {}..{} ({rebound} slot(s) rebound)",
                window.start_row,
                window.end_row(),
                window.start_col,
                window.end_col()
            );
            self.needs_render = true;
        }
        self.window = window;
        changed
    }
}
