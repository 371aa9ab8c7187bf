//! Common test utilities: an in-memory backend and grid/gateway builders.
//!
//! `MockBackend` behaves like the real service: it keeps one cell map per
//! sheet, answers edits with the stored value, "computes" formulas from a
//! canned table, and can be told to fail or reject.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use xlgrid::sync::{
    BatchEditRequest, BatchEditResponse, CellResult, EditRequest, EditResponse, SheetRequest,
    SheetResponse,
};
use xlgrid::{
    Backend, CellEdit, CellRecord, CellStore, Grid, GridConfig, Result, SheetCellMap, SyncGateway,
    XlgridError,
};

pub const SHEET: &str = "Sheet1";
pub const WORKBOOK: &str = "wb-test";

/// One request the backend received.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Edit(EditRequest),
    Batch(BatchEditRequest),
    Fetch(SheetRequest),
}

#[derive(Default)]
pub struct MockBackend {
    pub sheets: RefCell<HashMap<String, SheetCellMap>>,
    pub calls: RefCell<Vec<Call>>,
    /// Formula body -> value the backend computes for it.
    pub formulas: RefCell<HashMap<String, String>>,
    /// Edits fail with HTTP 500.
    pub fail_edits: Cell<bool>,
    /// Edits come back with `success: false`.
    pub reject_edits: Cell<bool>,
    /// Sheet fetches fail with HTTP 503.
    pub fail_fetch: Cell<bool>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a sheet with literal values.
    pub fn with_cells(self, sheet: &str, cells: &[(&str, &str)]) -> Self {
        let map = cells
            .iter()
            .map(|(address, value)| ((*address).to_string(), CellRecord::literal(*value)))
            .collect();
        self.sheets.borrow_mut().insert(sheet.to_string(), map);
        self
    }

    pub fn with_formula(self, formula: &str, value: &str) -> Self {
        self.formulas
            .borrow_mut()
            .insert(formula.to_string(), value.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn edit_calls(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::Edit(_) | Call::Batch(_)))
            .count()
    }

    pub fn fetch_calls(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::Fetch(_)))
            .count()
    }

    pub fn stored(&self, sheet: &str, address: &str) -> Option<CellRecord> {
        self.sheets
            .borrow()
            .get(sheet)
            .and_then(|cells| cells.get(address))
            .cloned()
    }

    /// Store an edit the way the service would and return the computed value.
    fn apply(&self, sheet: &str, edit: &CellEdit) -> String {
        let value = if edit.formula.is_empty() {
            edit.value.clone()
        } else {
            self.formulas
                .borrow()
                .get(&edit.formula)
                .cloned()
                .unwrap_or_else(|| "#NAME?".to_string())
        };
        let mut sheets = self.sheets.borrow_mut();
        let cells = sheets.entry(sheet.to_string()).or_default();
        let style = cells
            .get(&edit.address)
            .map(|r| r.style.clone())
            .unwrap_or_default();
        cells.insert(
            edit.address.clone(),
            CellRecord {
                value: value.clone(),
                formula: edit.formula.clone(),
                style,
            },
        );
        value
    }

    fn check_edit_failure(&self) -> Result<()> {
        if self.fail_edits.get() {
            return Err(XlgridError::Http {
                status: 500,
                message: "internal error".into(),
            });
        }
        Ok(())
    }
}

impl Backend for MockBackend {
    async fn submit_edit(&self, request: &EditRequest) -> Result<EditResponse> {
        self.calls.borrow_mut().push(Call::Edit(request.clone()));
        self.check_edit_failure()?;
        if self.reject_edits.get() {
            return Ok(EditResponse {
                success: false,
                error: Some("read-only sheet".into()),
                ..EditResponse::default()
            });
        }
        let edit = CellEdit {
            address: request.address.clone(),
            value: request.value.clone(),
            formula: request.formula.clone(),
        };
        let value = self.apply(&request.sheet, &edit);
        Ok(EditResponse {
            success: true,
            value: Some(value),
            formula: Some(request.formula.clone()),
            error: None,
        })
    }

    async fn submit_batch(&self, request: &BatchEditRequest) -> Result<BatchEditResponse> {
        self.calls.borrow_mut().push(Call::Batch(request.clone()));
        self.check_edit_failure()?;
        if self.reject_edits.get() {
            return Ok(BatchEditResponse {
                success: false,
                results: Vec::new(),
                error: Some("read-only sheet".into()),
            });
        }
        let results = request
            .edits
            .iter()
            .map(|edit| CellResult {
                address: edit.address.clone(),
                value: Some(self.apply(&request.sheet, edit)),
                formula: Some(edit.formula.clone()),
            })
            .collect();
        Ok(BatchEditResponse {
            success: true,
            results,
            error: None,
        })
    }

    async fn fetch_sheet(&self, request: &SheetRequest) -> Result<SheetResponse> {
        self.calls.borrow_mut().push(Call::Fetch(request.clone()));
        if self.fail_fetch.get() {
            return Err(XlgridError::Http {
                status: 503,
                message: "unavailable".into(),
            });
        }
        let cells = self
            .sheets
            .borrow()
            .get(&request.sheet_name)
            .cloned()
            .unwrap_or_default();
        Ok(SheetResponse { cells })
    }
}

/// Gateway over `backend` with a fresh store.
pub fn gateway(
    backend: MockBackend,
    refresh_after_commit: bool,
) -> (Rc<MockBackend>, SyncGateway<MockBackend>) {
    let backend = Rc::new(backend);
    let store = Rc::new(RefCell::new(CellStore::new()));
    let gateway = SyncGateway::new(
        Rc::clone(&backend),
        store,
        WORKBOOK,
        refresh_after_commit,
    );
    (backend, gateway)
}

/// Grid of `width` x `height` pixels over `backend`, showing [`SHEET`].
pub fn grid(backend: MockBackend, width: f32, height: f32) -> (Rc<MockBackend>, Grid<MockBackend>) {
    let (backend, gateway) = gateway(backend, false);
    let mut grid = Grid::new(GridConfig::default(), SHEET, gateway).unwrap();
    let _ = grid.resize(width, height);
    (backend, grid)
}

/// Value currently shown for `address` on [`SHEET`].
pub fn shown<B: Backend + 'static>(grid: &Grid<B>, address: &str) -> String {
    grid.store().borrow().get(SHEET, address).value
}

/// Run a future to completion on a fresh single-threaded runtime.
pub fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}
