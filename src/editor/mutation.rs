//! Turning an edit draft into the values sent to the backend and written
//! optimistically to the store.

use crate::sync::CellEdit;
use crate::types::CellRecord;

/// A classified draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellInput {
    /// Plain value, stored as typed.
    Literal(String),
    /// Formula body without the leading `=`; the backend computes the value.
    Formula(String),
}

impl CellInput {
    /// Classify a draft:
    /// - `=...` with a non-empty body -> Formula (body after `=`)
    /// - anything else (including a lone `=`) -> Literal
    pub fn classify(draft: &str) -> Self {
        match draft.strip_prefix('=') {
            Some(body) if !body.is_empty() => Self::Formula(body.to_string()),
            _ => Self::Literal(draft.to_string()),
        }
    }

    /// Value to send; empty for formulas.
    pub fn value(&self) -> &str {
        match self {
            Self::Literal(v) => v,
            Self::Formula(_) => "",
        }
    }

    /// Formula to send; empty for literals.
    pub fn formula(&self) -> &str {
        match self {
            Self::Literal(_) => "",
            Self::Formula(f) => f,
        }
    }

    pub fn into_edit(self, address: impl Into<String>) -> CellEdit {
        let address = address.into();
        match self {
            Self::Literal(value) => CellEdit {
                address,
                value,
                formula: String::new(),
            },
            Self::Formula(formula) => CellEdit {
                address,
                value: String::new(),
                formula,
            },
        }
    }
}

/// Record written to the store before the backend answers.
///
/// Style is carried over. A formula edit keeps the previous displayed value
/// until the backend supplies the computed one, so the cell never flashes
/// blank.
pub fn optimistic_record(previous: &CellRecord, edit: &CellEdit) -> CellRecord {
    let value = if edit.formula.is_empty() || !edit.value.is_empty() {
        edit.value.clone()
    } else {
        previous.value.clone()
    };
    CellRecord {
        value,
        formula: edit.formula.clone(),
        style: previous.style.clone(),
    }
}
