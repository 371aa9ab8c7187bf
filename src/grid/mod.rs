//! The grid: composition root of the engine.
//!
//! A [`Grid`] wires the viewport window, the shared cell store, the selection
//! model, the edit session and the sync gateway together. It is a plain
//! struct with injected dependencies, so several independent grids (or
//! tests) can share one process. Event handlers return an [`EventResponse`]
//! telling the host whether to redraw and, when an edit was committed, the
//! future that completes the backend round trip.

pub mod clipboard;
mod events;
mod scroll;
#[cfg(target_arch = "wasm32")]
mod web;

use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use serde::Serialize;

use crate::config::GridConfig;
use crate::editor::{CellInput, EditSession};
use crate::error::Result;
use crate::layout::{
    CellMetrics, CellPool, FrameCoalescer, GrowthPolicy, SheetExtent, Viewport, VisibleWindow,
};
use crate::selection::SelectionModel;
use crate::store::CellStore;
use crate::sync::{Backend, CellEdit, CommitReceipt, CommitResult, SyncGateway};
use crate::types::{CellPos, StyleAttributes};

#[cfg(target_arch = "wasm32")]
pub use web::XlGrid;

/// Backend round trip of a commit; resolves after reconciliation (or revert).
pub type CommitTask = Pin<Box<dyn Future<Output = Result<CommitReceipt>>>>;

/// Sheet fetch; resolves to the number of cells loaded.
pub type LoadTask = Pin<Box<dyn Future<Output = Result<usize>>>>;

/// What the host should do after an event.
#[must_use]
#[derive(Default)]
pub struct EventResponse {
    /// The grid consumed the event (the host should `preventDefault`).
    pub handled: bool,
    /// Visible state changed.
    pub redraw: bool,
    /// A commit to drive to completion.
    pub commit: Option<CommitTask>,
}

impl EventResponse {
    pub(crate) fn ignored() -> Self {
        Self::default()
    }

    pub(crate) fn redraw() -> Self {
        Self {
            handled: true,
            redraw: true,
            commit: None,
        }
    }

    pub(crate) fn with_commit(mut self, commit: Option<CommitTask>) -> Self {
        if commit.is_some() {
            self.commit = commit;
        }
        self
    }
}

impl fmt::Debug for EventResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventResponse")
            .field("handled", &self.handled)
            .field("redraw", &self.redraw)
            .field("commit", &self.commit.is_some())
            .finish()
    }
}

/// One bound pool slot, as handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderCell {
    pub slot: usize,
    pub row: u32,
    pub col: u32,
    pub address: String,
    pub value: String,
    pub formula: String,
    pub style: StyleAttributes,
    /// Left edge in sheet coordinates (the scroll container moves, not the cells).
    pub pixel_left: f32,
    pub pixel_top: f32,
    pub selected: bool,
    pub active: bool,
}

pub struct Grid<B> {
    config: GridConfig,
    metrics: CellMetrics,
    sheet: String,
    store: Rc<RefCell<CellStore>>,
    gateway: SyncGateway<B>,
    viewport: Viewport,
    extent: SheetExtent,
    pool: CellPool,
    frames: FrameCoalescer,
    window: VisibleWindow,
    selection: SelectionModel,
    editor: EditSession,
    needs_render: bool,
}

impl<B: Backend + 'static> Grid<B> {
    /// Build a grid showing `sheet`. The cell store is the one the gateway
    /// writes to.
    ///
    /// # Errors
    /// Returns [`crate::XlgridError::Config`] if `config` is invalid.
    pub fn new(
        config: GridConfig,
        sheet: impl Into<String>,
        gateway: SyncGateway<B>,
    ) -> Result<Self> {
        config.validate()?;
        let metrics = CellMetrics::new(config.cell_width, config.cell_height);
        let extent = SheetExtent::new(
            config.initial_rows,
            config.initial_cols,
            config.max_rows,
            config.max_cols,
        );
        let mut grid = Self {
            metrics,
            sheet: sheet.into(),
            store: Rc::clone(gateway.store()),
            gateway,
            viewport: Viewport::new(0.0, 0.0),
            extent,
            pool: CellPool::default(),
            frames: FrameCoalescer::new(),
            window: VisibleWindow::default(),
            selection: SelectionModel::new(),
            editor: EditSession::new(),
            needs_render: true,
            config,
        };
        grid.recompute();
        Ok(grid)
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn metrics(&self) -> CellMetrics {
        self.metrics
    }

    /// Name of the sheet being shown.
    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    pub fn store(&self) -> &Rc<RefCell<CellStore>> {
        &self.store
    }

    pub fn gateway(&self) -> &SyncGateway<B> {
        &self.gateway
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn extent(&self) -> &SheetExtent {
        &self.extent
    }

    pub fn pool(&self) -> &CellPool {
        &self.pool
    }

    /// Clamped window of cells currently bound to the pool.
    pub fn window(&self) -> VisibleWindow {
        self.window
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn editor(&self) -> &EditSession {
        &self.editor
    }

    /// Whether visible state changed since the last [`take_needs_render`](Self::take_needs_render).
    pub fn needs_render(&self) -> bool {
        self.needs_render
    }

    pub fn take_needs_render(&mut self) -> bool {
        std::mem::take(&mut self.needs_render)
    }

    pub fn is_selected(&self, row: u32, col: u32) -> bool {
        self.selection.is_selected(row, col)
    }

    pub fn is_active_cell(&self, row: u32, col: u32) -> bool {
        self.selection.is_active_cell(row, col)
    }

    /// Render data for every bound slot, in slot order.
    pub fn visible_cells(&self) -> Vec<RenderCell> {
        let store = self.store.borrow();
        self.pool
            .bound()
            .map(|(slot, pos)| {
                let address = pos.address();
                let record = store.peek(&self.sheet, &address);
                RenderCell {
                    slot,
                    row: pos.row,
                    col: pos.col,
                    value: record.value.clone(),
                    formula: record.formula.clone(),
                    style: record.style.clone(),
                    address,
                    pixel_left: self.metrics.col_x(pos.col),
                    pixel_top: self.metrics.row_y(pos.row),
                    selected: self.selection.is_selected(pos.row, pos.col),
                    active: self.selection.is_active_cell(pos.row, pos.col),
                }
            })
            .collect()
    }

    /// Cell under a point given in container coordinates, if it lies inside
    /// the materialized extent.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<CellPos> {
        if !(x.is_finite() && y.is_finite()) || x < 0.0 || y < 0.0 {
            return None;
        }
        let probe = Viewport {
            scroll_x: self.viewport.scroll_x + x,
            scroll_y: self.viewport.scroll_y + y,
            ..self.viewport.clone()
        };
        let pos = CellPos::new(
            probe.first_row(&self.metrics),
            probe.first_col(&self.metrics),
        );
        (pos.row < self.extent.rows && pos.col < self.extent.cols).then_some(pos)
    }

    /// Cancel any edit, reset selection and scroll, and show `sheet`.
    ///
    /// The returned task fetches the sheet into the store; if it fails the
    /// last-known snapshot stays.
    pub fn switch_sheet(&mut self, sheet: &str) -> LoadTask {
        self.editor.cancel();
        self.selection = SelectionModel::new();
        self.sheet = sheet.to_string();
        self.set_scroll(0.0, 0.0);
        self.needs_render = true;
        log::info!("switched to sheet {sheet}");
        self.load()
    }

    /// Fetch the current sheet into the store.
    pub fn load(&self) -> LoadTask {
        Box::pin(self.gateway.refresh(&self.sheet))
    }

    pub(crate) fn growth_policy(&self) -> GrowthPolicy {
        GrowthPolicy {
            row_batch: self.config.row_growth_batch,
            col_batch: self.config.col_growth_batch,
            margin: self.config.growth_margin,
        }
    }

    /// Commit one classified draft to `pos`.
    pub(crate) fn commit_input(&self, pos: CellPos, input: CellInput) -> CommitTask {
        let edit = input.into_edit(pos.address());
        self.track(self.gateway.commit(&self.sheet, edit))
    }

    /// Commit several cells as one batch; `None` when there is nothing to send.
    pub(crate) fn commit_edits(&self, edits: Vec<CellEdit>) -> Option<CommitTask> {
        if edits.is_empty() {
            return None;
        }
        Some(self.track(self.gateway.commit_batch(&self.sheet, edits)))
    }

    /// Revert the optimistic writes of a failed commit before surfacing the error.
    fn track(&self, commit: impl Future<Output = CommitResult> + 'static) -> CommitTask {
        let gateway = self.gateway.clone();
        Box::pin(async move {
            match commit.await {
                Ok(receipt) => Ok(receipt),
                Err(failure) => {
                    let restored = gateway.revert(&failure);
                    log::warn!("reverted {restored} cell(s) after failed commit");
                    Err(failure.error)
                }
            }
        })
    }
}
