//! Data types shared by the grid engine.

mod cell;
mod selection;
mod style;

pub use cell::*;
pub use selection::*;
pub use style::*;
