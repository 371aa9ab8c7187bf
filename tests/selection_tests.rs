//! Selection model and keyboard/pointer navigation tests

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{grid, MockBackend};
use xlgrid::selection::navigation::{Key, Modifiers};
use xlgrid::{CellPos, SelectionModel, SelectionRange};

// =============================================================================
// MODEL
// =============================================================================

#[test]
fn test_drag_selects_rectangle_row_major() {
    let mut sel = SelectionModel::new();
    sel.start_selection(0, 0);
    assert!(sel.update_selection(2, 2));
    sel.end_selection();

    assert_eq!(
        sel.range_addresses(),
        vec!["A1", "B1", "C1", "A2", "B2", "C2", "A3", "B3", "C3"]
    );
    assert_eq!(sel.active(), CellPos::new(0, 0));
}

#[test]
fn test_drag_away_from_origin() {
    let mut sel = SelectionModel::new();
    sel.start_selection(2, 3);
    sel.update_selection(4, 5);
    let addresses = sel.range_addresses();
    assert_eq!(addresses.len(), 9);
    assert_eq!(addresses.first().map(String::as_str), Some("D3"));
    assert_eq!(addresses.last().map(String::as_str), Some("F5"));
    assert_eq!(addresses[1], "E3");
    assert_eq!(addresses[3], "D4");
}

#[test]
fn test_reverse_drag_normalizes_bounds() {
    let mut sel = SelectionModel::new();
    sel.start_selection(4, 3);
    sel.update_selection(2, 1);
    let range = sel.range().unwrap();
    assert_eq!(range.bounds(), (2, 1, 4, 3));
    assert_eq!(range.top_left(), CellPos::new(2, 1));
    assert_eq!((range.width(), range.height()), (3, 3));
}

#[test]
fn test_update_without_drag_is_noop() {
    let mut sel = SelectionModel::new();
    assert!(!sel.update_selection(3, 3));
    assert!(sel.range().is_none());

    sel.start_selection(1, 1);
    sel.end_selection();
    assert!(!sel.update_selection(5, 5));
    assert_eq!(sel.range(), Some(SelectionRange::single(CellPos::new(1, 1))));
}

#[test]
fn test_clear_keeps_active_cell() {
    let mut sel = SelectionModel::new();
    sel.start_selection(2, 2);
    sel.update_selection(3, 3);
    sel.clear();
    assert!(sel.range().is_none());
    assert!(!sel.is_selected(2, 2));
    assert!(sel.is_active_cell(2, 2));
    assert_eq!(sel.effective_range(), SelectionRange::single(CellPos::new(2, 2)));
    assert!(sel.range_addresses().is_empty());
}

#[test]
fn test_extend_to_keeps_anchor() {
    let mut sel = SelectionModel::new();
    sel.start_selection(1, 1);
    sel.end_selection();
    sel.extend_to(3, 4);

    assert_eq!(sel.active(), CellPos::new(1, 1));
    assert!(sel.is_selected(3, 4));
    assert!(sel.is_selected(2, 2));
    assert!(!sel.is_selected(0, 0));
}

// =============================================================================
// GRID POINTER
// =============================================================================

#[test]
fn test_mouse_drag() {
    let (_backend, mut grid) = grid(MockBackend::new(), 1100.0, 264.0);
    let down = grid.on_cell_mouse_down(2, 2, Modifiers::NONE);
    assert!(down.redraw);
    assert!(grid.on_cell_mouse_enter(4, 3).redraw);
    assert!(grid.on_cell_mouse_up().handled);

    assert!(grid.is_active_cell(2, 2));
    assert!(grid.is_selected(3, 3));
    assert!(!grid.is_selected(5, 3));

    // Drag finished: hovering no longer changes the range.
    let hover = grid.on_cell_mouse_enter(6, 6);
    assert!(!hover.handled);
    assert!(!grid.is_selected(6, 6));
}

#[test]
fn test_shift_click_extends_from_active() {
    let (_backend, mut grid) = grid(MockBackend::new(), 1100.0, 264.0);
    let _ = grid.on_cell_mouse_down(2, 2, Modifiers::NONE);
    let _ = grid.on_cell_mouse_up();
    let _ = grid.on_cell_mouse_down(5, 5, Modifiers::SHIFT);
    let _ = grid.on_cell_mouse_up();

    assert!(grid.is_active_cell(2, 2));
    assert_eq!(grid.selection().range_addresses().len(), 16);
}

#[test]
fn test_mouse_down_clamped_to_maxima() {
    let (_backend, mut grid) = grid(MockBackend::new(), 1100.0, 264.0);
    let _ = grid.on_cell_mouse_down(u32::MAX, u32::MAX, Modifiers::NONE);
    assert_eq!(grid.selection().active(), CellPos::new(99_999, 999));
}

// =============================================================================
// GRID KEYBOARD
// =============================================================================

#[test]
fn test_arrow_keys_move_active() {
    let (_backend, mut grid) = grid(MockBackend::new(), 1100.0, 264.0);
    assert!(grid.on_key_down(Key::ArrowDown, Modifiers::NONE).handled);
    assert!(grid.on_key_down(Key::ArrowRight, Modifiers::NONE).handled);
    assert_eq!(grid.selection().active(), CellPos::new(1, 1));

    let _ = grid.on_key_down(Key::ArrowUp, Modifiers::NONE);
    let _ = grid.on_key_down(Key::ArrowUp, Modifiers::NONE);
    assert_eq!(grid.selection().active(), CellPos::new(0, 1));
}

#[test]
fn test_shift_arrows_extend_from_focus() {
    let (_backend, mut grid) = grid(MockBackend::new(), 1100.0, 264.0);
    let _ = grid.on_key_down(Key::ArrowDown, Modifiers::NONE);
    let _ = grid.on_key_down(Key::ArrowRight, Modifiers::SHIFT);
    let _ = grid.on_key_down(Key::ArrowRight, Modifiers::SHIFT);
    let _ = grid.on_key_down(Key::ArrowDown, Modifiers::SHIFT);

    assert_eq!(grid.selection().active(), CellPos::new(1, 0));
    assert_eq!(grid.selection().focus(), CellPos::new(2, 2));
    assert_eq!(
        grid.selection().range_addresses(),
        vec!["A2", "B2", "C2", "A3", "B3", "C3"]
    );

    // A plain arrow collapses the range onto the new active cell.
    let _ = grid.on_key_down(Key::ArrowRight, Modifiers::NONE);
    assert_eq!(grid.selection().active(), CellPos::new(1, 1));
    assert_eq!(grid.selection().range_addresses(), vec!["B2"]);
}

#[test]
fn test_tab_moves_right_and_shift_tab_left() {
    let (_backend, mut grid) = grid(MockBackend::new(), 1100.0, 264.0);
    let _ = grid.on_key_down(Key::Tab, Modifiers::NONE);
    let _ = grid.on_key_down(Key::Tab, Modifiers::NONE);
    assert_eq!(grid.selection().active(), CellPos::new(0, 2));
    let _ = grid.on_key_down(Key::Tab, Modifiers::SHIFT);
    assert_eq!(grid.selection().active(), CellPos::new(0, 1));
    assert_eq!(grid.selection().range_addresses(), vec!["B1"]);
}

#[test]
fn test_page_and_ctrl_jumps_scroll_into_view() {
    let (_backend, mut grid) = grid(MockBackend::new(), 1100.0, 264.0);
    let _ = grid.on_key_down(Key::PageDown, Modifiers::NONE);
    assert_eq!(grid.selection().active(), CellPos::new(20, 0));
    assert!(grid.window().contains(20, 0));

    let last = grid.extent().last_cell();
    let _ = grid.on_key_down(Key::End, Modifiers::CTRL);
    assert_eq!(grid.selection().active(), last);
    assert!(grid.window().contains(last.row, last.col));

    let _ = grid.on_key_down(Key::Home, Modifiers::CTRL);
    assert_eq!(grid.selection().active(), CellPos::new(0, 0));
    assert_eq!(grid.viewport().scroll_y, 0.0);
}

#[test]
fn test_escape_clears_range() {
    let (_backend, mut grid) = grid(MockBackend::new(), 1100.0, 264.0);
    let _ = grid.on_cell_mouse_down(0, 0, Modifiers::NONE);
    let _ = grid.on_cell_mouse_enter(2, 2);
    let _ = grid.on_cell_mouse_up();

    assert!(grid.on_key_down(Key::Escape, Modifiers::NONE).redraw);
    assert!(grid.selection().range().is_none());
    assert!(grid.is_active_cell(0, 0));
    // Nothing left to clear.
    assert!(!grid.on_key_down(Key::Escape, Modifiers::NONE).handled);
}

#[test]
fn test_unknown_key_ignored() {
    let (_backend, mut grid) = grid(MockBackend::new(), 1100.0, 264.0);
    let response = grid.on_key_down(Key::from_dom("Shift"), Modifiers::SHIFT);
    assert!(!response.handled);
    assert!(!response.redraw);
    assert!(response.commit.is_none());
}
