//! Pointer and keyboard handlers for [`Grid`].
//!
//! Handlers translate host events into selection and edit-session calls and
//! report back through [`EventResponse`].

use super::{EventResponse, Grid};
use crate::editor::EditEvent;
use crate::selection::navigation::{move_target, Key, Modifiers};
use crate::sync::{Backend, CellEdit};
use crate::types::CellPos;

impl<B: Backend + 'static> Grid<B> {
    /// Mouse down on a cell: starts a drag selection, or with Shift extends
    /// from the active cell. An edit on another cell is committed first.
    pub fn on_cell_mouse_down(&mut self, row: u32, col: u32, mods: Modifiers) -> EventResponse {
        let pos = self.extent.clamp(CellPos::new(row, col));
        if self.editor.editing_cell() == Some(pos) {
            return EventResponse::ignored();
        }
        let commit = self.finish_edit();
        if mods.shift {
            self.selection.extend_to(pos.row, pos.col);
        } else {
            self.selection.start_selection(pos.row, pos.col);
        }
        self.needs_render = true;
        EventResponse::redraw().with_commit(commit)
    }

    /// Pointer entered a cell; extends an in-progress drag.
    pub fn on_cell_mouse_enter(&mut self, row: u32, col: u32) -> EventResponse {
        let pos = self.extent.clamp(CellPos::new(row, col));
        if self.selection.update_selection(pos.row, pos.col) {
            self.needs_render = true;
            return EventResponse::redraw();
        }
        EventResponse::ignored()
    }

    pub fn on_cell_mouse_up(&mut self) -> EventResponse {
        if !self.selection.is_dragging() {
            return EventResponse::ignored();
        }
        self.selection.end_selection();
        EventResponse {
            handled: true,
            ..EventResponse::default()
        }
    }

    /// Double-click: select the cell and start editing its current text.
    pub fn on_cell_double_click(&mut self, row: u32, col: u32) -> EventResponse {
        let pos = self.extent.clamp(CellPos::new(row, col));
        if self.editor.editing_cell() == Some(pos) {
            return EventResponse::ignored();
        }
        let commit = self.finish_edit();
        self.selection.move_active(pos);
        self.begin_edit();
        EventResponse::redraw().with_commit(commit)
    }

    /// Keyboard entry point. While editing only Enter, Tab and Escape are
    /// consumed; everything else belongs to the text input.
    pub fn on_key_down(&mut self, key: Key, mods: Modifiers) -> EventResponse {
        if self.editor.is_editing() {
            return self.on_editing_key(key, mods);
        }
        match key {
            Key::Enter | Key::F2 => {
                self.begin_edit();
                EventResponse::redraw()
            }
            Key::Escape => {
                if self.selection.range().is_none() {
                    return EventResponse::ignored();
                }
                self.selection.clear();
                self.needs_render = true;
                EventResponse::redraw()
            }
            Key::Delete | Key::Backspace => match self.clear_selection() {
                Some(commit) => EventResponse::redraw().with_commit(Some(commit)),
                None => EventResponse {
                    handled: true,
                    ..EventResponse::default()
                },
            },
            Key::Char(c) if !mods.ctrl => {
                let cell = self.selection.active();
                let original = self.current_text(cell);
                self.editor.apply(EditEvent::BeginWith {
                    cell,
                    original,
                    draft: c.to_string(),
                });
                self.ensure_visible(cell);
                self.needs_render = true;
                EventResponse::redraw()
            }
            _ if key.is_movement() => self.navigate(key, mods),
            _ => EventResponse::ignored(),
        }
    }

    /// Text input changed while editing.
    pub fn on_draft_input(&mut self, draft: &str) -> EventResponse {
        if self.editor.input(draft) {
            EventResponse {
                handled: true,
                ..EventResponse::default()
            }
        } else {
            EventResponse::ignored()
        }
    }

    /// Editor lost focus: same as Enter.
    pub fn on_editor_blur(&mut self) -> EventResponse {
        if !self.editor.is_editing() {
            return EventResponse::ignored();
        }
        let commit = self.finish_edit();
        EventResponse::redraw().with_commit(commit)
    }

    /// Enter edit mode on the active cell with its current text.
    pub fn begin_edit(&mut self) -> bool {
        let cell = self.selection.active();
        let original = self.current_text(cell);
        let started = self.editor.begin(cell, original);
        if started {
            self.ensure_visible(cell);
            self.needs_render = true;
        }
        started
    }

    /// Leave edit mode discarding the draft. The store is untouched.
    pub fn cancel_edit(&mut self) -> bool {
        let cancelled = self.editor.cancel();
        if cancelled {
            self.needs_render = true;
        }
        cancelled
    }

    fn on_editing_key(&mut self, key: Key, mods: Modifiers) -> EventResponse {
        match key {
            Key::Enter => {
                let commit = self.finish_edit();
                EventResponse::redraw().with_commit(commit)
            }
            Key::Tab => {
                let commit = self.finish_edit();
                self.navigate(key, mods).with_commit(commit)
            }
            Key::Escape => {
                self.cancel_edit();
                EventResponse::redraw()
            }
            _ => EventResponse::ignored(),
        }
    }

    /// Confirm the edit; a changed draft becomes a commit.
    fn finish_edit(&mut self) -> Option<super::CommitTask> {
        if !self.editor.is_editing() {
            return None;
        }
        self.needs_render = true;
        let draft = self.editor.confirm()?;
        Some(self.commit_input(draft.cell, draft.input))
    }

    fn navigate(&mut self, key: Key, mods: Modifiers) -> EventResponse {
        let extend = mods.shift && key != Key::Tab;
        let from = if extend {
            self.selection.focus()
        } else {
            self.selection.active()
        };
        let Some(target) = move_target(from, key, mods, &self.extent, self.config.page_rows) else {
            return EventResponse::ignored();
        };
        if extend {
            self.selection.move_focus(target);
        } else {
            self.selection.move_active(target);
        }
        self.ensure_visible(target);
        self.needs_render = true;
        EventResponse::redraw()
    }

    /// Text a cell shows when entering edit mode.
    fn current_text(&self, cell: CellPos) -> String {
        self.store
            .borrow()
            .peek(&self.sheet, &cell.address())
            .edit_text()
    }

    /// Clear every non-empty cell of the selection with one batched commit.
    fn clear_selection(&mut self) -> Option<super::CommitTask> {
        let range = self.selection.effective_range();
        let mut targets: Vec<CellPos> = {
            let store = self.store.borrow();
            store
                .sheet(&self.sheet)
                .map(|cells| {
                    cells
                        .iter()
                        .filter(|(_, record)| !record.value.is_empty() || record.is_formula())
                        .filter_map(|(address, _)| CellPos::from_address(address).ok())
                        .filter(|pos| range.contains(pos.row, pos.col))
                        .collect()
                })
                .unwrap_or_default()
        };
        targets.sort_unstable();
        let edits = targets
            .into_iter()
            .map(|pos| CellEdit::literal(pos.address(), ""))
            .collect();
        let commit = self.commit_edits(edits);
        if commit.is_some() {
            self.needs_render = true;
        }
        commit
    }
}
