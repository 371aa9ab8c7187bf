//! Browser binding: `XlGrid`, a [`Grid`] over [`HttpBackend`] exported to
//! JavaScript.
//!
//! The grid lives in an `Rc<RefCell<_>>` shared with the animation-frame
//! closure and with spawned commit tasks. No borrow is held across a call
//! back into JavaScript.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::{Function, Promise};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, spawn_local};
use web_sys::HtmlElement;

use super::{EventResponse, Grid, LoadTask};
use crate::config::{BackendConfig, GridConfig};
use crate::editor::input::InputOverlay;
use crate::editor::EditState;
use crate::render::resolve_style;
use crate::selection::navigation::{Key, Modifiers};
use crate::store::CellStore;
use crate::sync::{HttpBackend, SyncGateway};
use crate::types::CellPos;

struct WebState {
    grid: Grid<HttpBackend>,
    render_callback: Option<Function>,
    frame_closure: Option<Closure<dyn FnMut(f64)>>,
    overlay: InputOverlay,
    container: Option<HtmlElement>,
}

type SharedState = Rc<RefCell<WebState>>;

#[wasm_bindgen]
pub struct XlGrid {
    state: SharedState,
}

#[wasm_bindgen]
impl XlGrid {
    /// `grid_config` may be `undefined` for defaults; `backend_config` needs
    /// at least `baseUrl` and `workbookId`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        grid_config: JsValue,
        backend_config: JsValue,
        sheet: &str,
    ) -> Result<XlGrid, JsValue> {
        console_error_panic_hook::set_once();
        crate::logging::init(log::LevelFilter::Info);

        let grid_config: GridConfig = if grid_config.is_undefined() || grid_config.is_null() {
            GridConfig::default()
        } else {
            serde_wasm_bindgen::from_value(grid_config)?
        };
        let backend_config: BackendConfig = serde_wasm_bindgen::from_value(backend_config)?;
        let backend = Rc::new(HttpBackend::new(&backend_config)?);
        let store = Rc::new(RefCell::new(CellStore::new()));
        let gateway = SyncGateway::new(
            backend,
            store,
            backend_config.workbook_id.clone(),
            backend_config.refresh_after_commit,
        );
        let grid = Grid::new(grid_config, sheet, gateway)?;

        Ok(XlGrid {
            state: Rc::new(RefCell::new(WebState {
                grid,
                render_callback: None,
                frame_closure: None,
                overlay: InputOverlay::new(),
                container: None,
            })),
        })
    }

    /// Set the console log level ("error", "warn", "info", "debug", "trace").
    pub fn set_log_level(&self, level: &str) {
        crate::logging::init(crate::logging::parse_level(level));
    }

    /// Scroll container the edit overlay is appended to.
    pub fn set_container(&self, container: HtmlElement) {
        self.state.borrow_mut().container = Some(container);
    }

    /// Called after any change that needs a repaint.
    pub fn set_render_callback(&self, callback: Option<Function>) {
        self.state.borrow_mut().render_callback = callback;
    }

    pub fn resize(&self, width: f32, height: f32) -> bool {
        self.state.borrow_mut().grid.resize(width, height)
    }

    /// Scroll event; the recompute runs on the next animation frame.
    pub fn on_scroll(&self, scroll_x: f32, scroll_y: f32) {
        let schedule = self
            .state
            .borrow_mut()
            .grid
            .request_scroll(scroll_x, scroll_y);
        if schedule {
            schedule_frame(&self.state);
        }
    }

    /// Total materialized size in pixels, for the scroll spacer.
    pub fn content_size(&self) -> Vec<f32> {
        let s = self.state.borrow();
        let metrics = s.grid.metrics();
        let extent = s.grid.extent();
        vec![metrics.col_x(extent.cols), metrics.row_y(extent.rows)]
    }

    /// Bound pool slots as an array of render cells.
    pub fn visible_cells(&self) -> Result<JsValue, JsValue> {
        let cells = self.state.borrow().grid.visible_cells();
        Ok(serde_wasm_bindgen::to_value(&cells)?)
    }

    pub fn visible_window(&self) -> Result<JsValue, JsValue> {
        let window = self.state.borrow().grid.window();
        Ok(serde_wasm_bindgen::to_value(&window)?)
    }

    pub fn cell_style(&self, row: u32, col: u32, dark_mode: bool) -> Result<JsValue, JsValue> {
        let s = self.state.borrow();
        let store = s.grid.store().borrow();
        let record = store.peek(s.grid.sheet(), &CellPos::new(row, col).address());
        let style = resolve_style(&record.style, dark_mode);
        Ok(serde_wasm_bindgen::to_value(&style)?)
    }

    pub fn is_selected(&self, row: u32, col: u32) -> bool {
        self.state.borrow().grid.is_selected(row, col)
    }

    pub fn is_active_cell(&self, row: u32, col: u32) -> bool {
        self.state.borrow().grid.is_active_cell(row, col)
    }

    pub fn active_address(&self) -> String {
        self.state.borrow().grid.selection().active().address()
    }

    pub fn is_editing(&self) -> bool {
        self.state.borrow().grid.editor().is_editing()
    }

    pub fn sheet(&self) -> String {
        self.state.borrow().grid.sheet().to_string()
    }

    pub fn on_cell_mouse_down(&self, row: u32, col: u32, shift: bool) {
        let response = self.state.borrow_mut().grid.on_cell_mouse_down(
            row,
            col,
            Modifiers { shift, ctrl: false },
        );
        dispatch(&self.state, response);
    }

    pub fn on_cell_mouse_enter(&self, row: u32, col: u32) {
        let response = self.state.borrow_mut().grid.on_cell_mouse_enter(row, col);
        dispatch(&self.state, response);
    }

    pub fn on_cell_mouse_up(&self) {
        let response = self.state.borrow_mut().grid.on_cell_mouse_up();
        dispatch(&self.state, response);
    }

    pub fn on_cell_double_click(&self, row: u32, col: u32) {
        let response = self.state.borrow_mut().grid.on_cell_double_click(row, col);
        dispatch(&self.state, response);
    }

    /// Returns true when the grid consumed the key (call `preventDefault`).
    pub fn on_key_down(&self, key: &str, shift: bool, ctrl: bool) -> bool {
        if ctrl && key.eq_ignore_ascii_case("c") && !self.is_editing() {
            self.copy_selection();
            return true;
        }
        let response = self
            .state
            .borrow_mut()
            .grid
            .on_key_down(Key::from_dom(key), Modifiers { shift, ctrl });
        let handled = response.handled;
        dispatch(&self.state, response);
        handled
    }

    pub fn on_draft_input(&self, draft: &str) {
        let response = self.state.borrow_mut().grid.on_draft_input(draft);
        dispatch(&self.state, response);
    }

    pub fn on_editor_blur(&self) {
        let response = self.state.borrow_mut().grid.on_editor_blur();
        dispatch(&self.state, response);
    }

    /// Selection as TSV; also written to the system clipboard.
    pub fn copy_selection(&self) -> String {
        let text = self.state.borrow().grid.copy_selection();
        if let Some(window) = web_sys::window() {
            let _ = window.navigator().clipboard().write_text(&text);
        }
        text
    }

    pub fn paste(&self, text: &str) {
        let commit = self.state.borrow_mut().grid.paste(text);
        let response = EventResponse {
            handled: true,
            redraw: true,
            commit,
        };
        dispatch(&self.state, response);
    }

    /// Show another sheet; resolves with the number of cells loaded.
    pub fn switch_sheet(&self, sheet: &str) -> Promise {
        let task = self.state.borrow_mut().grid.switch_sheet(sheet);
        sync_overlay(&self.state);
        invoke_render_callback(&self.state);
        run_load(&self.state, task)
    }

    /// (Re)load the current sheet.
    pub fn load(&self) -> Promise {
        let task = self.state.borrow().grid.load();
        run_load(&self.state, task)
    }

    pub fn pending_edits(&self) -> usize {
        self.state.borrow().grid.gateway().pending_count()
    }
}

fn schedule_frame(state: &SharedState) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let mut s = state.borrow_mut();
    if s.frame_closure.is_none() {
        let weak = Rc::downgrade(state);
        let closure = Closure::wrap(Box::new(move |_timestamp: f64| {
            if let Some(state) = weak.upgrade() {
                handle_frame(&state);
            }
        }) as Box<dyn FnMut(f64)>);
        s.frame_closure = Some(closure);
    }
    if let Some(callback) = s.frame_closure.as_ref() {
        if window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .is_err()
        {
            log::warn!("requestAnimationFrame failed; applying scroll now");
            drop(s);
            handle_frame(state);
        }
    }
}

fn handle_frame(state: &SharedState) {
    let changed = state.borrow_mut().grid.on_animation_frame();
    if changed {
        invoke_render_callback(state);
    }
}

/// Drive a commit (if any), keep the overlay in step and repaint.
fn dispatch(state: &SharedState, response: EventResponse) {
    if let Some(commit) = response.commit {
        let weak = Rc::downgrade(state);
        spawn_local(async move {
            if let Err(e) = commit.await {
                log::error!("{e}");
            }
            settle(&weak);
        });
    }
    sync_overlay(state);
    if response.redraw {
        invoke_render_callback(state);
    }
}

/// A commit finished (applied or reverted): the store changed.
fn settle(weak: &Weak<RefCell<WebState>>) {
    if let Some(state) = weak.upgrade() {
        invoke_render_callback(&state);
    }
}

fn run_load(state: &SharedState, task: LoadTask) -> Promise {
    let weak = Rc::downgrade(state);
    future_to_promise(async move {
        let loaded = task.await?;
        settle(&weak);
        Ok(JsValue::from(u32::try_from(loaded).unwrap_or(u32::MAX)))
    })
}

/// Show the overlay when an edit starts, hide it when it ends.
fn sync_overlay(state: &SharedState) {
    let mut s = state.borrow_mut();
    let WebState {
        grid,
        overlay,
        container,
        ..
    } = &mut *s;
    match grid.editor().state() {
        EditState::Editing {
            cell,
            draft,
            original,
        } => {
            if overlay.shown_for() != Some(*cell) {
                let metrics = grid.metrics();
                let rect = [
                    metrics.col_x(cell.col),
                    metrics.row_y(cell.row),
                    metrics.cell_width,
                    metrics.cell_height,
                ];
                overlay.show(*cell, rect, draft, draft == original, container.as_ref());
            }
        }
        EditState::Viewing => {
            if overlay.shown_for().is_some() {
                overlay.hide();
            }
        }
    }
}

fn invoke_render_callback(state: &SharedState) {
    let callback = state.borrow().render_callback.clone();
    if let Some(callback) = callback {
        let _ = callback.call0(&JsValue::NULL);
    }
}
