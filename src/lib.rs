//! xlgrid - virtualized spreadsheet grid engine for the web
//!
//! The engine behind a browser spreadsheet front end whose formulas and
//! persistence live in a backend service:
//! - A1-style address codec (`"AB123"` <-> row/column)
//! - Viewport windowing over up to 100,000 rows x 1,000 columns
//! - A fixed pool of renderable cell slots, rebound as the user scrolls
//! - Active cell, range selection and single-cell edit mode
//! - Optimistic edits reconciled with the backend of record
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { XlGrid } from 'xlgrid';
//! await init();
//! const grid = new XlGrid(undefined, { baseUrl, workbookId }, 'Sheet1');
//! grid.set_container(scroller);
//! grid.set_render_callback(() => paint(grid.visible_cells()));
//! await grid.load();
//! ```
//!
//! # Usage (Rust)
//!
//! [`Grid`] is generic over a [`sync::Backend`], so the whole engine runs
//! natively against any backend implementation (see `tests/`).

pub mod cell_ref;
pub mod config;
pub mod editor;
pub mod error;
pub mod grid;
pub mod layout;
pub mod logging;
pub mod render;
pub mod selection;
pub mod store;
pub mod sync;
pub mod types;

use wasm_bindgen::prelude::*;

pub use cell_ref::{column_to_letters, letters_to_column, parse_address, parse_range, to_address};
pub use config::{BackendConfig, GridConfig};
pub use editor::{CellInput, EditEvent, EditOutcome, EditSession, EditState};
pub use error::{Result, XlgridError};
pub use grid::{CommitTask, EventResponse, Grid, LoadTask, RenderCell};
pub use selection::SelectionModel;
pub use store::CellStore;
pub use sync::{Backend, CellEdit, CommitFailure, CommitReceipt, HttpBackend, SyncGateway};
pub use types::*;

#[cfg(target_arch = "wasm32")]
pub use grid::XlGrid;

/// Address of a 0-based `(row, col)`, e.g. `(0, 27)` -> `"AB1"`.
#[must_use]
#[wasm_bindgen(js_name = "toAddress")]
pub fn to_address_js(row: u32, col: u32) -> String {
    to_address(row, col)
}

/// Parse an address into `[row, col]` (0-based).
///
/// # Errors
/// Returns an error if the address is malformed.
#[wasm_bindgen(js_name = "parseAddress")]
pub fn parse_address_js(address: &str) -> std::result::Result<Vec<u32>, JsValue> {
    let pos = parse_address(address).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(vec![pos.row, pos.col])
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
