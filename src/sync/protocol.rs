//! JSON wire types exchanged with the backend.

use serde::{Deserialize, Serialize};

use crate::types::SheetCellMap;

/// One `(address, value, formula)` tuple of an edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellEdit {
    pub address: String,
    #[serde(default)]
    pub value: String,
    /// Formula body without `=`; empty for literals.
    #[serde(default)]
    pub formula: String,
}

impl CellEdit {
    pub fn literal(address: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            value: value.into(),
            formula: String::new(),
        }
    }

    pub fn formula(address: impl Into<String>, formula: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            value: String::new(),
            formula: formula.into(),
        }
    }
}

/// `POST /api/cells/update`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRequest {
    pub workbook_id: String,
    pub sheet: String,
    pub address: String,
    pub value: String,
    pub formula: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditResponse {
    pub success: bool,
    /// Authoritative value; supersedes the optimistic one when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `POST /api/cells/batch-update`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchEditRequest {
    pub workbook_id: String,
    pub sheet: String,
    pub edits: Vec<CellEdit>,
}

/// Per-cell result of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellResult {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchEditResponse {
    pub success: bool,
    #[serde(default)]
    pub results: Vec<CellResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `POST /api/sheets/fetch`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetRequest {
    pub workbook_id: String,
    pub sheet_name: String,
}

/// Full `address -> {value, formula, style}` map of one sheet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetResponse {
    #[serde(default)]
    pub cells: SheetCellMap,
}
