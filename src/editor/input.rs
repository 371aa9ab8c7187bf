//! DOM `<input>` overlay showing the edit draft.
//!
//! The element is absolutely positioned inside the grid's scroll container,
//! in the same sheet coordinates as the cell slots. The host forwards its
//! `input`, `keydown` and `blur` events to the grid.

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, HtmlInputElement};

use crate::types::CellPos;

pub(crate) struct InputOverlay {
    input: Option<HtmlInputElement>,
    /// Cell the overlay is currently shown over.
    shown_for: Option<CellPos>,
}

impl InputOverlay {
    pub(crate) fn new() -> Self {
        Self {
            input: None,
            shown_for: None,
        }
    }

    pub(crate) fn shown_for(&self) -> Option<CellPos> {
        self.shown_for
    }

    /// Show over `cell` at `[x, y, w, h]` (CSS pixels, sheet coordinates).
    ///
    /// With `select_all` the text is selected (F2/double-click); otherwise
    /// the caret goes to the end (type-to-edit).
    pub(crate) fn show(
        &mut self,
        cell: CellPos,
        rect: [f32; 4],
        draft: &str,
        select_all: bool,
        container: Option<&HtmlElement>,
    ) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(input) = self.get_or_create_input(&document, container) else {
            return;
        };
        let [x, y, w, h] = rect;
        let style = input.style();
        let _ = style.set_property("display", "block");
        let _ = style.set_property("left", &format!("{x}px"));
        let _ = style.set_property("top", &format!("{y}px"));
        let _ = style.set_property("width", &format!("{w}px"));
        let _ = style.set_property("height", &format!("{h}px"));

        input.set_value(draft);
        let _ = input.focus();
        if select_all {
            input.select();
        } else {
            let end = u32::try_from(draft.encode_utf16().count()).unwrap_or(u32::MAX);
            let _ = input.set_selection_range(end, end);
        }
        self.shown_for = Some(cell);
    }

    /// Hide without calling `blur()`: its handler re-enters the grid.
    pub(crate) fn hide(&mut self) {
        if let Some(ref input) = self.input {
            let _ = input.style().set_property("display", "none");
        }
        self.shown_for = None;
    }

    fn get_or_create_input(
        &mut self,
        document: &Document,
        container: Option<&HtmlElement>,
    ) -> Option<&HtmlInputElement> {
        if self.input.is_none() {
            let input = document
                .create_element("input")
                .ok()?
                .dyn_into::<HtmlInputElement>()
                .ok()?;
            input.set_type("text");
            input.set_class_name("xlgrid-editor");
            let style = input.style();
            let _ = style.set_property("position", "absolute");
            let _ = style.set_property("z-index", "10");
            let _ = style.set_property("box-sizing", "border-box");
            let _ = style.set_property("border", "2px solid #1A73E8");
            let _ = style.set_property("outline", "none");
            let _ = style.set_property("padding", "0 4px");
            let _ = style.set_property("font", "inherit");
            let _ = style.set_property("display", "none");

            if let Some(c) = container {
                let _ = c.append_child(&input);
            } else if let Some(body) = document.body() {
                let _ = body.append_child(&input);
            }
            self.input = Some(input);
        }
        self.input.as_ref()
    }
}

impl Drop for InputOverlay {
    fn drop(&mut self) {
        if let Some(ref input) = self.input {
            if let Some(parent) = input.parent_node() {
                let _ = parent.remove_child(input);
            }
        }
    }
}
