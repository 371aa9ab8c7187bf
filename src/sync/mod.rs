//! Boundary between the local cell store and the backend of record.
//!
//! Every commit is applied to the [`CellStore`] synchronously, before the
//! returned future is first polled, so readers never observe a gap between
//! the old and new value. The future then performs the single network round
//! trip, reconciles any authoritative values the backend returned, and
//! optionally re-fetches the whole sheet.
//!
//! The gateway never reverts on its own. A failed commit yields a
//! [`CommitFailure`] carrying the optimistic writes, which the caller hands
//! back to [`SyncGateway::revert`].

mod http;
pub mod protocol;

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

use crate::cell_ref::parse_address;
use crate::editor::mutation::optimistic_record;
use crate::error::{Result, XlgridError};
use crate::store::CellStore;
use crate::types::CellRecord;

pub use http::HttpBackend;
pub use protocol::{
    BatchEditRequest, BatchEditResponse, CellEdit, CellResult, EditRequest, EditResponse,
    SheetRequest, SheetResponse,
};

/// The backend of record. Implementations are single-threaded; futures need
/// not be `Send`.
#[allow(async_fn_in_trait)]
pub trait Backend {
    /// Apply one cell edit.
    async fn submit_edit(&self, request: &EditRequest) -> Result<EditResponse>;

    /// Apply an ordered list of edits in one round trip.
    async fn submit_batch(&self, request: &BatchEditRequest) -> Result<BatchEditResponse>;

    /// Fetch the full cell map of a sheet.
    async fn fetch_sheet(&self, request: &SheetRequest) -> Result<SheetResponse>;
}

/// An optimistic write awaiting its acknowledgement.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEdit {
    pub sheet: String,
    pub address: String,
    pub value: String,
    pub formula: String,
    /// Record the cell held before this write; restored on revert. A failed
    /// settle moves it past older writes the backend also refused.
    pub previous: CellRecord,
    pub seq: u64,
    /// Another edit owned the cell when this one settled; its answer is
    /// ignored and it is not reverted.
    pub superseded: bool,
}

/// Outcome of a successful commit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommitReceipt {
    pub sheet: String,
    /// Cells sent to the backend.
    pub committed: usize,
    /// Cells whose value/formula was replaced by the backend's answer.
    pub reconciled: usize,
    /// Cells whose answer was ignored because a newer edit owns the cell.
    pub superseded: usize,
    /// Whether the post-commit sheet refresh succeeded.
    pub refreshed: bool,
}

/// A commit the backend did not accept.
#[derive(Debug, thiserror::Error)]
#[error("commit of {count} cell(s) failed: {error}", count = .pending.len())]
pub struct CommitFailure {
    #[source]
    pub error: XlgridError,
    /// The optimistic writes of the failed commit, in commit order.
    pub pending: Vec<PendingEdit>,
}

pub type CommitResult = std::result::Result<CommitReceipt, CommitFailure>;

/// In-flight edits of one cell and which of them the store currently shows.
///
/// Each in-flight edit carries its restore base: the record a revert of that
/// edit writes back. A failed edit hands its base to the next newer edit, so
/// a rejected value is never restored.
#[derive(Debug, Default)]
struct CellChain {
    in_flight: Vec<(u64, CellRecord)>,
    owner: Option<u64>,
}

/// Per-cell chains of unacknowledged edits.
///
/// The newest edit owns the cell. If the owner fails, ownership falls back
/// to the newest older edit still in flight, whose optimistic record is
/// exactly what the revert restores.
#[derive(Debug, Default)]
struct PendingLedger {
    next_seq: u64,
    cells: HashMap<(String, String), CellChain>,
    in_flight: usize,
}

impl PendingLedger {
    fn record(&mut self, sheet: &str, address: &str, base: CellRecord) -> u64 {
        self.next_seq += 1;
        self.in_flight += 1;
        let chain = self
            .cells
            .entry((sheet.to_string(), address.to_string()))
            .or_default();
        chain.in_flight.push((self.next_seq, base));
        chain.owner = Some(self.next_seq);
        self.next_seq
    }

    /// Mark `edit` acknowledged and set `edit.superseded` when it no longer
    /// owns the cell. A failed owner gets its current restore base in
    /// `edit.previous`.
    fn settle(&mut self, edit: &mut PendingEdit, succeeded: bool) {
        self.in_flight = self.in_flight.saturating_sub(1);
        let key = (edit.sheet.clone(), edit.address.clone());
        let Some(chain) = self.cells.get_mut(&key) else {
            edit.superseded = true;
            return;
        };
        let base = chain
            .in_flight
            .iter()
            .position(|(seq, _)| *seq == edit.seq)
            .map(|index| chain.in_flight.remove(index).1);
        let owns = chain.owner == Some(edit.seq);
        edit.superseded = !owns;

        if !succeeded {
            if owns {
                if let Some(base) = base {
                    edit.previous = base;
                }
                chain.owner = chain
                    .in_flight
                    .iter()
                    .map(|(seq, _)| *seq)
                    .filter(|seq| *seq < edit.seq)
                    .max();
            } else if let Some(base) = base {
                // The next newer edit would otherwise restore this rejected write.
                if let Some((_, newer)) = chain
                    .in_flight
                    .iter_mut()
                    .filter(|(seq, _)| *seq > edit.seq)
                    .min_by_key(|(seq, _)| *seq)
                {
                    *newer = base;
                }
            }
        }
        if chain.in_flight.is_empty() {
            self.cells.remove(&key);
        }
    }
}

/// Sends committed edits to a [`Backend`] and reconciles the shared store.
///
/// Cheap to clone; clones share the backend, store and pending ledger.
pub struct SyncGateway<B> {
    backend: Rc<B>,
    store: Rc<RefCell<CellStore>>,
    ledger: Rc<RefCell<PendingLedger>>,
    workbook_id: String,
    refresh_after_commit: bool,
}

impl<B> Clone for SyncGateway<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Rc::clone(&self.backend),
            store: Rc::clone(&self.store),
            ledger: Rc::clone(&self.ledger),
            workbook_id: self.workbook_id.clone(),
            refresh_after_commit: self.refresh_after_commit,
        }
    }
}

impl<B: Backend + 'static> SyncGateway<B> {
    pub fn new(
        backend: Rc<B>,
        store: Rc<RefCell<CellStore>>,
        workbook_id: impl Into<String>,
        refresh_after_commit: bool,
    ) -> Self {
        Self {
            backend,
            store,
            ledger: Rc::new(RefCell::new(PendingLedger::default())),
            workbook_id: workbook_id.into(),
            refresh_after_commit,
        }
    }

    pub fn store(&self) -> &Rc<RefCell<CellStore>> {
        &self.store
    }

    pub fn backend(&self) -> &Rc<B> {
        &self.backend
    }

    pub fn workbook_id(&self) -> &str {
        &self.workbook_id
    }

    /// Edits written locally whose acknowledgement has not arrived.
    pub fn pending_count(&self) -> usize {
        self.ledger.borrow().in_flight
    }

    /// Commit one cell.
    ///
    /// The store is updated before this returns; the future performs the
    /// round trip. An invalid address fails without touching the store.
    pub fn commit(
        &self,
        sheet: &str,
        edit: CellEdit,
    ) -> impl Future<Output = CommitResult> + 'static {
        let staged = self.stage(sheet, std::slice::from_ref(&edit));
        let this = self.clone();
        let sheet = sheet.to_string();
        async move {
            let pending = staged.map_err(|error| CommitFailure {
                error,
                pending: Vec::new(),
            })?;
            this.send_single(sheet, edit, pending).await
        }
    }

    /// Commit an ordered list of edits as one optimistic batch, one round
    /// trip and at most one refresh. An empty batch resolves immediately
    /// without any backend call.
    pub fn commit_batch(
        &self,
        sheet: &str,
        edits: Vec<CellEdit>,
    ) -> impl Future<Output = CommitResult> + 'static {
        let staged = self.stage(sheet, &edits);
        let this = self.clone();
        let sheet = sheet.to_string();
        async move {
            let pending = staged.map_err(|error| CommitFailure {
                error,
                pending: Vec::new(),
            })?;
            if pending.is_empty() {
                return Ok(CommitReceipt {
                    sheet,
                    ..CommitReceipt::default()
                });
            }
            this.send_batch(sheet, edits, pending).await
        }
    }

    /// Restore the pre-edit records of a failed commit, newest first.
    /// Superseded writes are skipped. Returns the number of cells restored.
    pub fn revert(&self, failure: &CommitFailure) -> usize {
        let mut store = self.store.borrow_mut();
        let mut restored = 0;
        for edit in failure.pending.iter().rev().filter(|e| !e.superseded) {
            log::debug!("reverting {}!{}", edit.sheet, edit.address);
            store.set_local(&edit.sheet, &edit.address, edit.previous.clone());
            restored += 1;
        }
        restored
    }

    /// Fetch `sheet` and swap it into the store. On failure the last-known
    /// snapshot is kept. Resolves to the number of cells loaded.
    pub fn refresh(&self, sheet: &str) -> impl Future<Output = Result<usize>> + 'static {
        let this = self.clone();
        let sheet = sheet.to_string();
        async move { this.fetch_and_replace(&sheet).await }
    }

    /// Validate every address, then write all edits locally and record them.
    fn stage(&self, sheet: &str, edits: &[CellEdit]) -> Result<Vec<PendingEdit>> {
        for edit in edits {
            parse_address(&edit.address)?;
        }

        let mut store = self.store.borrow_mut();
        let mut ledger = self.ledger.borrow_mut();
        // A cell edited twice in one batch reverts to what it held before the batch.
        let mut before: HashMap<&str, CellRecord> = HashMap::new();
        let mut pending = Vec::with_capacity(edits.len());

        for edit in edits {
            let previous = before
                .entry(edit.address.as_str())
                .or_insert_with(|| store.get(sheet, &edit.address))
                .clone();
            let current = store.peek(sheet, &edit.address);
            let record = optimistic_record(current, edit);
            store.set_local(sheet, &edit.address, record);

            let seq = ledger.record(sheet, &edit.address, previous.clone());
            pending.push(PendingEdit {
                sheet: sheet.to_string(),
                address: edit.address.clone(),
                value: edit.value.clone(),
                formula: edit.formula.clone(),
                previous,
                seq,
                superseded: false,
            });
        }

        if !pending.is_empty() {
            log::debug!("staged {} optimistic edit(s) on {sheet}", pending.len());
        }
        Ok(pending)
    }

    async fn send_single(
        &self,
        sheet: String,
        edit: CellEdit,
        mut pending: Vec<PendingEdit>,
    ) -> CommitResult {
        let request = EditRequest {
            workbook_id: self.workbook_id.clone(),
            sheet: sheet.clone(),
            address: edit.address.clone(),
            value: edit.value,
            formula: edit.formula,
        };
        let outcome = self.backend.submit_edit(&request).await;
        let succeeded = matches!(&outcome, Ok(r) if r.success);
        self.settle(&mut pending, succeeded);

        let response = match outcome {
            Ok(response) if response.success => response,
            Ok(response) => {
                return Err(self.fail(
                    XlgridError::Rejected {
                        address: edit.address,
                        reason: response.error.unwrap_or_else(|| "rejected".into()),
                    },
                    pending,
                ))
            }
            Err(error) => return Err(self.fail(error, pending)),
        };

        let mut receipt = CommitReceipt {
            sheet,
            committed: 1,
            ..CommitReceipt::default()
        };
        for edit in &pending {
            if edit.superseded {
                receipt.superseded += 1;
            } else if self.reconcile(
                edit,
                response.value.as_deref(),
                response.formula.as_deref(),
            ) {
                receipt.reconciled += 1;
            }
        }
        receipt.refreshed = self.refresh_after_success(&receipt.sheet).await;
        Ok(receipt)
    }

    async fn send_batch(
        &self,
        sheet: String,
        edits: Vec<CellEdit>,
        mut pending: Vec<PendingEdit>,
    ) -> CommitResult {
        let request = BatchEditRequest {
            workbook_id: self.workbook_id.clone(),
            sheet: sheet.clone(),
            edits,
        };
        let outcome = self.backend.submit_batch(&request).await;
        let succeeded = matches!(&outcome, Ok(r) if r.success);
        self.settle(&mut pending, succeeded);

        let response = match outcome {
            Ok(response) if response.success => response,
            Ok(response) => {
                return Err(self.fail(
                    XlgridError::Rejected {
                        address: describe_batch(&request.edits),
                        reason: response.error.unwrap_or_else(|| "rejected".into()),
                    },
                    pending,
                ))
            }
            Err(error) => return Err(self.fail(error, pending)),
        };

        let results: HashMap<&str, &CellResult> = response
            .results
            .iter()
            .map(|r| (r.address.as_str(), r))
            .collect();

        let mut receipt = CommitReceipt {
            sheet,
            committed: pending.len(),
            ..CommitReceipt::default()
        };
        for edit in &pending {
            if edit.superseded {
                receipt.superseded += 1;
                continue;
            }
            let Some(result) = results.get(edit.address.as_str()) else {
                continue;
            };
            if self.reconcile(edit, result.value.as_deref(), result.formula.as_deref()) {
                receipt.reconciled += 1;
            }
        }
        receipt.refreshed = self.refresh_after_success(&receipt.sheet).await;
        Ok(receipt)
    }

    fn settle(&self, pending: &mut [PendingEdit], succeeded: bool) {
        let mut ledger = self.ledger.borrow_mut();
        for edit in pending.iter_mut() {
            ledger.settle(edit, succeeded);
        }
    }

    fn fail(&self, error: XlgridError, pending: Vec<PendingEdit>) -> CommitFailure {
        log::warn!(
            "commit of {} cell(s) on {} failed: {error}",
            pending.len(),
            pending.first().map_or("?", |p| p.sheet.as_str())
        );
        CommitFailure { error, pending }
    }

    /// Overwrite the optimistic record with the backend's authoritative
    /// value/formula, keeping style. Returns false if nothing was returned.
    fn reconcile(&self, edit: &PendingEdit, value: Option<&str>, formula: Option<&str>) -> bool {
        if value.is_none() && formula.is_none() {
            return false;
        }
        let mut store = self.store.borrow_mut();
        let mut record = store.get(&edit.sheet, &edit.address);
        if let Some(value) = value {
            record.value = value.to_string();
        }
        if let Some(formula) = formula {
            record.formula = formula.trim_start_matches('=').to_string();
        }
        store.set_local(&edit.sheet, &edit.address, record);
        true
    }

    async fn refresh_after_success(&self, sheet: &str) -> bool {
        if !self.refresh_after_commit {
            return false;
        }
        match self.fetch_and_replace(sheet).await {
            Ok(_) => true,
            Err(e) => {
                log::warn!("refresh of {sheet} after commit failed, keeping snapshot: {e}");
                false
            }
        }
    }

    async fn fetch_and_replace(&self, sheet: &str) -> Result<usize> {
        let request = SheetRequest {
            workbook_id: self.workbook_id.clone(),
            sheet_name: sheet.to_string(),
        };
        let response = self.backend.fetch_sheet(&request).await?;
        let count = response.cells.len();
        self.store.borrow_mut().replace_sheet(sheet, response.cells);
        log::info!("loaded {count} cell(s) for {sheet}");
        Ok(count)
    }
}

fn describe_batch(edits: &[CellEdit]) -> String {
    match edits {
        [] => String::new(),
        [only] => only.address.clone(),
        [first, rest @ ..] => format!("{} (+{} more)", first.address, rest.len()),
    }
}
