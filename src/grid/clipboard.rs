//! Copy/paste for [`Grid`] as tab-separated text.
//!
//! Fields containing a tab, newline, carriage return or quote are wrapped in
//! quotes with inner quotes doubled, the same way desktop spreadsheets put
//! cells on the clipboard; [`parse_tsv`] reads that format back.

use super::{CommitTask, Grid};
use crate::editor::CellInput;
use crate::store::CellStore;
use crate::sync::Backend;
use crate::types::{CellPos, SelectionRange};

/// Quote a field for TSV if needed.
pub fn escape_cell_value(value: &str) -> String {
    let needs_quoting = value.contains(['\t', '\n', '\r', '"']);
    if needs_quoting {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Displayed values of `range` on `sheet`, row-major, as TSV.
/// Formula cells contribute their computed value.
pub fn range_to_tsv(store: &CellStore, sheet: &str, range: &SelectionRange) -> String {
    let (min_row, min_col, max_row, max_col) = range.bounds();
    let mut out = String::new();
    for row in min_row..=max_row {
        if row > min_row {
            out.push('\n');
        }
        for col in min_col..=max_col {
            if col > min_col {
                out.push('\t');
            }
            let record = store.peek(sheet, &CellPos::new(row, col).address());
            out.push_str(&escape_cell_value(&record.value));
        }
    }
    out
}

/// Split TSV text into rows of fields, honouring quoted fields.
/// A single trailing newline does not produce an empty last row.
pub fn parse_tsv(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' if field.is_empty() => in_quotes = true,
            '\t' => row.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            _ => field.push(c),
        }
    }
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }
    rows
}

impl<B: Backend + 'static> Grid<B> {
    /// The selection (or active cell) as TSV.
    pub fn copy_selection(&self) -> String {
        let range = self.selection.effective_range();
        range_to_tsv(&self.store.borrow(), &self.sheet, &range)
    }

    /// Paste TSV at the top-left of the selection as one batched commit.
    ///
    /// Cells past the hard maxima are dropped; `=`-prefixed fields become
    /// formulas. The pasted block becomes the selection. Returns `None`
    /// while editing (the text input owns the paste) or for empty text.
    pub fn paste(&mut self, text: &str) -> Option<CommitTask> {
        if self.editor.is_editing() {
            return None;
        }
        let origin = self.selection.effective_range().top_left();
        let mut edits = Vec::new();
        let mut last = origin;

        for (dr, fields) in parse_tsv(text).into_iter().enumerate() {
            let Some(row) = offset(origin.row, dr, self.extent.max_rows) else {
                break;
            };
            for (dc, field) in fields.into_iter().enumerate() {
                let Some(col) = offset(origin.col, dc, self.extent.max_cols) else {
                    break;
                };
                let pos = CellPos::new(row, col);
                last = CellPos::new(last.row.max(row), last.col.max(col));
                edits.push(CellInput::classify(&field).into_edit(pos.address()));
            }
        }
        if edits.is_empty() {
            return None;
        }

        let policy = self.growth_policy();
        self.extent.include(last, &policy);
        self.selection.move_active(origin);
        if last != origin {
            self.selection.move_focus(last);
        }
        self.recompute();
        self.needs_render = true;
        log::debug!("pasting {} cell(s) at {origin}", edits.len());
        self.commit_edits(edits)
    }
}

/// `base + delta` if it stays below `max`.
fn offset(base: u32, delta: usize, max: u32) -> Option<u32> {
    let value = base.checked_add(u32::try_from(delta).ok()?)?;
    (value < max).then_some(value)
}
