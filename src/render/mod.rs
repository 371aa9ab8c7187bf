//! Rendering collaborator contract.
//!
//! The grid hands the host page [`crate::grid::RenderCell`]s; this module
//! turns their style attributes into CSS values. Nothing here touches the
//! cell store.

pub mod colors;
mod style;

pub use colors::{palette, CssColor, Rgb};
pub use style::{resolve_style, ResolvedStyle, DEFAULT_FONT_SIZE};
