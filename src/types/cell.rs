use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::StyleAttributes;
use crate::cell_ref;
use crate::error::Result;

/// A 0-based (row, col) grid position. Orders row-major.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct CellPos {
    pub row: u32,
    pub col: u32,
}

impl CellPos {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Address string for this position, e.g. `(1, 2)` -> `"C2"`.
    pub fn address(self) -> String {
        cell_ref::to_address(self.row, self.col)
    }

    /// Parse an address string into a position.
    ///
    /// # Errors
    /// Returns [`crate::XlgridError::InvalidAddress`] on malformed input.
    pub fn from_address(address: &str) -> Result<Self> {
        cell_ref::parse_address(address)
    }
}

impl fmt::Display for CellPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address())
    }
}

/// Value, formula and style of one cell as held by the cell store.
///
/// `formula` is stored without the leading `=` and is empty for literals.
/// `value` is whatever the backend last computed (or the optimistic literal).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CellRecord {
    pub value: String,
    pub formula: String,
    pub style: StyleAttributes,
}

impl CellRecord {
    /// A literal (non-formula) record with default style.
    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn is_formula(&self) -> bool {
        !self.formula.is_empty()
    }

    /// Text shown when the cell enters edit mode: `=` + formula, or the value.
    pub fn edit_text(&self) -> String {
        if self.is_formula() {
            format!("={}", self.formula)
        } else {
            self.value.clone()
        }
    }
}

/// All cells of one sheet, keyed by address.
pub type SheetCellMap = HashMap<String, CellRecord>;
