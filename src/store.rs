//! In-memory cell cache, one map per sheet.
//!
//! The store is the single source of truth the renderer reads from. Writers
//! are the edit path ([`CellStore::set_local`], synchronous and optimistic)
//! and backend reconciliation ([`CellStore::replace_sheet`], whole-sheet
//! swap). Cells are never deleted; clearing writes an empty value.

use std::collections::HashMap;

use crate::types::{CellRecord, SheetCellMap};

#[derive(Debug, Default)]
pub struct CellStore {
    sheets: HashMap<String, SheetCellMap>,
    empty: CellRecord,
}

impl CellStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a cell; an empty record if the sheet or cell is absent.
    pub fn get(&self, sheet: &str, address: &str) -> CellRecord {
        self.peek(sheet, address).clone()
    }

    /// Borrow a cell without cloning; the shared empty record if absent.
    pub fn peek(&self, sheet: &str, address: &str) -> &CellRecord {
        self.sheets
            .get(sheet)
            .and_then(|cells| cells.get(address))
            .unwrap_or(&self.empty)
    }

    /// Optimistic overwrite of one cell, visible to the next `get`.
    pub fn set_local(&mut self, sheet: &str, address: &str, record: CellRecord) {
        self.sheets
            .entry(sheet.to_string())
            .or_default()
            .insert(address.to_string(), record);
    }

    /// Swap in a complete sheet snapshot, returning the previous one.
    pub fn replace_sheet(&mut self, sheet: &str, cells: SheetCellMap) -> Option<SheetCellMap> {
        self.sheets.insert(sheet.to_string(), cells)
    }

    pub fn has_sheet(&self, sheet: &str) -> bool {
        self.sheets.contains_key(sheet)
    }

    /// All cells of a sheet.
    pub fn sheet(&self, sheet: &str) -> Option<&SheetCellMap> {
        self.sheets.get(sheet)
    }

    /// Number of cells held for a sheet.
    pub fn cell_count(&self, sheet: &str) -> usize {
        self.sheets.get(sheet).map_or(0, HashMap::len)
    }

    /// Names of sheets with a loaded snapshot, sorted.
    pub fn sheet_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sheets.keys().cloned().collect();
        names.sort();
        names
    }
}
