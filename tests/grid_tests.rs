//! Grid integration tests: render data, clipboard, clearing, sheet switching
//! and revert of failed commits.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use std::rc::Rc;

use common::{block_on, gateway, grid, shown, Call, MockBackend, SHEET};
use xlgrid::grid::clipboard::{parse_tsv, range_to_tsv};
use xlgrid::selection::navigation::{Key, Modifiers};
use xlgrid::{CellPos, CellRecord, Grid, GridConfig, SelectionRange, StyleAttributes};

fn loaded_grid(backend: MockBackend) -> (Rc<MockBackend>, Grid<MockBackend>) {
    let (backend, grid) = grid(backend, 1100.0, 264.0);
    block_on(grid.load()).unwrap();
    (backend, grid)
}

fn select(grid: &mut Grid<MockBackend>, from: (u32, u32), to: (u32, u32)) {
    let _ = grid.on_cell_mouse_down(from.0, from.1, Modifiers::NONE);
    let _ = grid.on_cell_mouse_enter(to.0, to.1);
    let _ = grid.on_cell_mouse_up();
}

/// Addresses of the single batch request the backend received.
fn batch_addresses(backend: &MockBackend) -> Vec<String> {
    let batches: Vec<_> = backend
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            Call::Batch(request) => Some(request),
            _ => None,
        })
        .collect();
    assert_eq!(batches.len(), 1, "expected exactly one batch");
    batches[0].edits.iter().map(|e| e.address.clone()).collect()
}

// =============================================================================
// RENDER DATA
// =============================================================================

#[test]
fn test_visible_cells_reflect_store() {
    let backend = MockBackend::new().with_cells(SHEET, &[("A1", "a"), ("B2", "b")]);
    let (_backend, mut grid) = loaded_grid(backend);
    let bold = CellRecord {
        value: "b".into(),
        formula: String::new(),
        style: StyleAttributes {
            bold: Some(true),
            ..StyleAttributes::default()
        },
    };
    grid.store().borrow_mut().set_local(SHEET, "B2", bold);

    let cells = grid.visible_cells();
    assert_eq!(cells.len(), 196);

    let b2 = cells.iter().find(|c| c.address == "B2").unwrap();
    assert_eq!((b2.row, b2.col), (1, 1));
    assert_eq!(b2.value, "b");
    assert_eq!(b2.style.bold, Some(true));
    assert_eq!((b2.pixel_left, b2.pixel_top), (100.0, 24.0));
    assert_eq!(b2.slot, grid.pool().slot_for(1, 1));
    assert!(!b2.active);

    let a1 = cells.iter().find(|c| c.address == "A1").unwrap();
    assert!(a1.active);
    assert_eq!(a1.value, "a");

    let empty = cells.iter().find(|c| c.address == "N14").unwrap();
    assert!(empty.value.is_empty());
    assert!(grid.take_needs_render());
}

#[test]
fn test_render_cell_serializes_camel_case() {
    let (_backend, grid) = loaded_grid(MockBackend::new());
    let cells = grid.visible_cells();
    let json = serde_json::to_value(&cells[0]).unwrap();
    assert!(json.get("pixelLeft").is_some());
    assert!(json.get("pixelTop").is_some());
    assert_eq!(json["address"], "A1");
}

#[test]
fn test_needs_render_flag() {
    let (_backend, mut grid) = loaded_grid(MockBackend::new());
    assert!(grid.take_needs_render());
    assert!(!grid.needs_render());

    let _ = grid.on_key_down(Key::ArrowDown, Modifiers::NONE);
    assert!(grid.needs_render());
}

// =============================================================================
// CLIPBOARD
// =============================================================================

#[test]
fn test_copy_selection_as_tsv() {
    let backend = MockBackend::new().with_cells(
        SHEET,
        &[("A1", "a"), ("B1", "b"), ("A2", "c"), ("B2", "tab\there")],
    );
    let (_backend, mut grid) = loaded_grid(backend);

    select(&mut grid, (0, 0), (1, 1));
    assert_eq!(grid.copy_selection(), "a\tb\nc\t\"tab\there\"");

    // No range: just the active cell.
    let _ = grid.on_key_down(Key::Escape, Modifiers::NONE);
    assert_eq!(grid.copy_selection(), "a");
}

#[test]
fn test_copy_keeps_blank_cells() {
    let backend = MockBackend::new().with_cells(SHEET, &[("C3", "x")]);
    let (_backend, grid) = loaded_grid(backend);
    let range = SelectionRange::new(CellPos::new(1, 1), CellPos::new(2, 2));
    let tsv = range_to_tsv(&grid.store().borrow(), SHEET, &range);
    assert_eq!(tsv, "\t\n\tx");
    assert_eq!(parse_tsv(&tsv), vec![vec!["", ""], vec!["", "x"]]);
}

#[test]
fn test_paste_is_one_batch_and_selects_block() {
    let backend = MockBackend::new()
        .with_cells(SHEET, &[("A1", "10")])
        .with_formula("A1*2", "20");
    let (backend, mut grid) = loaded_grid(backend);
    let _ = grid.on_cell_mouse_down(1, 1, Modifiers::NONE);
    let _ = grid.on_cell_mouse_up();

    let commit = grid.paste("1\t2\n3\t=A1*2\n").unwrap();
    assert_eq!(shown(&grid, "B2"), "1");
    assert_eq!(shown(&grid, "C2"), "2");
    assert_eq!(shown(&grid, "B3"), "3");
    assert_eq!(grid.store().borrow().get(SHEET, "C3").formula, "A1*2");
    assert_eq!(
        grid.selection().range(),
        Some(SelectionRange::new(CellPos::new(1, 1), CellPos::new(2, 2)))
    );
    assert!(grid.is_active_cell(1, 1));

    let receipt = block_on(commit).unwrap();
    assert_eq!(receipt.committed, 4);
    assert_eq!(batch_addresses(&backend), vec!["B2", "C2", "B3", "C3"]);
    assert_eq!(shown(&grid, "C3"), "20");
}

#[test]
fn test_paste_ignored_while_editing_or_empty() {
    let (backend, mut grid) = loaded_grid(MockBackend::new());
    assert!(grid.paste("").is_none());

    let _ = grid.on_key_down(Key::F2, Modifiers::NONE);
    assert!(grid.paste("a\tb").is_none());
    assert_eq!(backend.edit_calls(), 0);
}

#[test]
fn test_paste_drops_cells_past_maxima() {
    let config = GridConfig {
        max_rows: 10,
        max_cols: 20,
        initial_rows: 10,
        initial_cols: 20,
        ..GridConfig::default()
    };
    let (backend, gw) = gateway(MockBackend::new(), false);
    let mut grid = Grid::new(config, SHEET, gw).unwrap();
    let _ = grid.resize(1100.0, 264.0);
    let _ = grid.on_cell_mouse_down(9, 19, Modifiers::NONE);
    let _ = grid.on_cell_mouse_up();

    let commit = grid.paste("a\tb\tc\nd\te\tf").unwrap();
    block_on(commit).unwrap();
    assert_eq!(batch_addresses(&backend), vec!["T10"]);
    assert_eq!(
        grid.selection().range(),
        Some(SelectionRange::single(CellPos::new(9, 19)))
    );
}

#[test]
fn test_paste_grows_extent() {
    let (_backend, mut grid) = loaded_grid(MockBackend::new());
    assert_eq!(grid.extent().cols, 26);
    let _ = grid.on_cell_mouse_down(0, 25, Modifiers::NONE);
    let _ = grid.on_cell_mouse_up();

    let commit = grid.paste("1\t2\t3").unwrap();
    assert!(grid.extent().cols > 27);
    assert_eq!(shown(&grid, "AB1"), "3");
    block_on(commit).unwrap();
}

// =============================================================================
// CLEARING
// =============================================================================

#[test]
fn test_delete_clears_range_in_one_batch() {
    let backend = MockBackend::new().with_cells(
        SHEET,
        &[("B2", "4"), ("A1", "1"), ("B1", "2"), ("C5", "outside")],
    );
    let (backend, mut grid) = loaded_grid(backend);
    select(&mut grid, (0, 0), (1, 1));

    let response = grid.on_key_down(Key::Delete, Modifiers::NONE);
    let commit = response.commit.unwrap();
    assert_eq!(shown(&grid, "A1"), "");
    assert_eq!(shown(&grid, "B1"), "");
    assert_eq!(shown(&grid, "B2"), "");
    assert_eq!(shown(&grid, "C5"), "outside");

    block_on(commit).unwrap();
    // Row-major order, empty cells skipped.
    assert_eq!(batch_addresses(&backend), vec!["A1", "B1", "B2"]);
    assert_eq!(backend.stored(SHEET, "B1").unwrap().value, "");
}

#[test]
fn test_delete_on_empty_range_sends_nothing() {
    let (backend, mut grid) = loaded_grid(MockBackend::new());
    select(&mut grid, (3, 3), (5, 5));
    let response = grid.on_key_down(Key::Backspace, Modifiers::NONE);
    assert!(response.handled);
    assert!(response.commit.is_none());
    assert_eq!(backend.edit_calls(), 0);
}

// =============================================================================
// SHEETS AND FAILURES
// =============================================================================

#[test]
fn test_switch_sheet_resets_and_loads() {
    let backend = MockBackend::new()
        .with_cells(SHEET, &[("A1", "first")])
        .with_cells("Sheet2", &[("A1", "second")]);
    let (backend, mut grid) = loaded_grid(backend);
    grid.set_scroll(0.0, 2400.0);
    select(&mut grid, (101, 1), (103, 2));
    let _ = grid.on_key_down(Key::F2, Modifiers::NONE);

    let task = grid.switch_sheet("Sheet2");
    assert_eq!(grid.sheet(), "Sheet2");
    assert!(!grid.editor().is_editing());
    assert!(grid.selection().range().is_none());
    assert_eq!(grid.selection().active(), CellPos::new(0, 0));
    assert_eq!(grid.viewport().scroll_y, 0.0);

    assert_eq!(block_on(task).unwrap(), 1);
    let a1 = grid
        .visible_cells()
        .into_iter()
        .find(|c| c.address == "A1")
        .unwrap();
    assert_eq!(a1.value, "second");
    // The first sheet's snapshot stays cached.
    assert_eq!(grid.store().borrow().get(SHEET, "A1").value, "first");
    assert_eq!(backend.fetch_calls(), 2);
}

#[test]
fn test_failed_load_keeps_snapshot() {
    let backend = MockBackend::new().with_cells(SHEET, &[("A1", "cached")]);
    let (backend, grid) = loaded_grid(backend);
    backend.fail_fetch.set(true);
    assert!(block_on(grid.load()).is_err());
    assert_eq!(shown(&grid, "A1"), "cached");
}

#[test]
fn test_failed_commit_reverts_through_task() {
    let backend = MockBackend::new().with_cells(SHEET, &[("A1", "before")]);
    let (backend, mut grid) = loaded_grid(backend);
    backend.fail_edits.set(true);

    let _ = grid.on_key_down(Key::Char('z'), Modifiers::NONE);
    let commit = grid.on_key_down(Key::Enter, Modifiers::NONE).commit.unwrap();
    assert_eq!(shown(&grid, "A1"), "z");

    let err = block_on(commit).unwrap_err();
    assert!(matches!(err, xlgrid::XlgridError::Http { status: 500, .. }));
    assert_eq!(shown(&grid, "A1"), "before");
    assert_eq!(grid.gateway().pending_count(), 0);
}

#[test]
fn test_failed_batch_reverts_through_task() {
    let backend = MockBackend::new().with_cells(SHEET, &[("A1", "1"), ("A2", "2")]);
    let (backend, mut grid) = loaded_grid(backend);
    backend.reject_edits.set(true);
    select(&mut grid, (0, 0), (1, 0));

    let commit = grid.on_key_down(Key::Delete, Modifiers::NONE).commit.unwrap();
    assert_eq!(shown(&grid, "A1"), "");
    assert!(block_on(commit).is_err());
    assert_eq!(shown(&grid, "A1"), "1");
    assert_eq!(shown(&grid, "A2"), "2");
}
