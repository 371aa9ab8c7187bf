//! Single-cell edit mode.
//!
//! [`EditState`] is a two-state machine (`Viewing` / `Editing`) with a pure
//! [`EditState::transition`] function; [`EditSession`] owns the current state
//! for one grid. Committing a draft that equals the text the cell had when
//! editing began yields no commit, so clicking away from an untouched editor
//! causes no backend traffic.

#[cfg(target_arch = "wasm32")]
pub(crate) mod input;
pub mod mutation;

use crate::types::CellPos;

pub use mutation::CellInput;

/// Edit state of one grid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditState {
    #[default]
    Viewing,
    Editing {
        cell: CellPos,
        /// In-progress text.
        draft: String,
        /// Text the cell had when editing began (`=formula` or value).
        original: String,
    },
}

/// Inputs to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditEvent {
    /// Double-click / Enter / F2: edit starting from the current text.
    Begin { cell: CellPos, original: String },
    /// Type-to-edit: edit starting from `draft` instead of the current text.
    BeginWith {
        cell: CellPos,
        original: String,
        draft: String,
    },
    /// The text input changed.
    Input(String),
    /// Enter / Tab / blur.
    Confirm,
    /// Escape.
    Cancel,
}

/// A draft that must be committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftCommit {
    pub cell: CellPos,
    pub input: CellInput,
}

/// What a transition produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The event does not apply in the current state.
    Ignored,
    Started,
    Updated,
    /// Confirmed with a changed draft.
    Commit(DraftCommit),
    /// Confirmed with the original text: nothing to send.
    Unmodified,
    /// Cancelled; the draft is dropped.
    Discarded,
}

impl EditState {
    /// Pure transition function.
    pub fn transition(self, event: EditEvent) -> (Self, EditOutcome) {
        match (self, event) {
            (Self::Viewing, EditEvent::Begin { cell, original }) => (
                Self::Editing {
                    cell,
                    draft: original.clone(),
                    original,
                },
                EditOutcome::Started,
            ),
            (
                Self::Viewing,
                EditEvent::BeginWith {
                    cell,
                    original,
                    draft,
                },
            ) => (
                Self::Editing {
                    cell,
                    draft,
                    original,
                },
                EditOutcome::Started,
            ),
            (Self::Editing { cell, original, .. }, EditEvent::Input(draft)) => (
                Self::Editing {
                    cell,
                    draft,
                    original,
                },
                EditOutcome::Updated,
            ),
            (
                Self::Editing {
                    cell,
                    draft,
                    original,
                },
                EditEvent::Confirm,
            ) => {
                let outcome = if draft == original {
                    EditOutcome::Unmodified
                } else {
                    EditOutcome::Commit(DraftCommit {
                        cell,
                        input: CellInput::classify(&draft),
                    })
                };
                (Self::Viewing, outcome)
            }
            (Self::Editing { .. }, EditEvent::Cancel) => (Self::Viewing, EditOutcome::Discarded),
            (state, _) => (state, EditOutcome::Ignored),
        }
    }
}

/// Owner of one grid's [`EditState`].
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    state: EditState,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditState::Editing { .. })
    }

    /// Cell being edited.
    pub fn editing_cell(&self) -> Option<CellPos> {
        match &self.state {
            EditState::Editing { cell, .. } => Some(*cell),
            EditState::Viewing => None,
        }
    }

    /// Current draft; only meaningful while editing.
    pub fn draft(&self) -> Option<&str> {
        match &self.state {
            EditState::Editing { draft, .. } => Some(draft),
            EditState::Viewing => None,
        }
    }

    /// Feed an event through the state machine.
    pub fn apply(&mut self, event: EditEvent) -> EditOutcome {
        let (next, outcome) = std::mem::take(&mut self.state).transition(event);
        self.state = next;
        outcome
    }

    /// Start editing `cell` whose current text is `original`.
    pub fn begin(&mut self, cell: CellPos, original: String) -> bool {
        self.apply(EditEvent::Begin { cell, original }) == EditOutcome::Started
    }

    pub fn input(&mut self, draft: impl Into<String>) -> bool {
        self.apply(EditEvent::Input(draft.into())) == EditOutcome::Updated
    }

    /// Leave edit mode keeping the draft; `Some` only if it must be committed.
    pub fn confirm(&mut self) -> Option<DraftCommit> {
        match self.apply(EditEvent::Confirm) {
            EditOutcome::Commit(commit) => Some(commit),
            _ => None,
        }
    }

    /// Leave edit mode dropping the draft.
    pub fn cancel(&mut self) -> bool {
        self.apply(EditEvent::Cancel) == EditOutcome::Discarded
    }
}
