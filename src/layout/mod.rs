//! Virtualized layout: which part of the (huge) grid is materialized.
//!
//! This module handles:
//! - Viewport state and the visible window for fixed-size cells
//! - The materialized sheet extent and its batched growth
//! - The fixed-size pool of renderable slots
//! - Coalescing scroll recomputation to one per animation frame

mod extent;
mod frame;
mod pool;
mod viewport;

pub use extent::{GrowthPolicy, SheetExtent};
pub use frame::FrameCoalescer;
pub use pool::CellPool;
pub use viewport::{CellMetrics, ScrollOffset, VisibleWindow, Viewport};
