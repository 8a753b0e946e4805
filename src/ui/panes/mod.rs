//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: Compiled program with syntax highlighting and current instruction indicator
//! - [`memory`]: Registers and written memory cells
//! - [`terminal`]: Output from `$print` and the halt notice
//! - [`status`]: Status bar with keybindings and execution state
//! - `utils`: Shared block and scrolling helpers
//!
//! Each pane module exports a primary `render_*_pane()` function together
//! with its scroll state and render data types.

mod utils;

pub mod memory;
pub mod source;
pub mod status;
pub mod terminal;

pub use memory::{render_memory_pane, MemoryRenderData, MemoryScrollState};
pub use source::{render_source_pane, SourceRenderData, SourceScrollState};
pub use status::{render_status_bar, StatusRenderData};
pub use terminal::render_terminal_pane;
