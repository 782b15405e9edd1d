//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: Source code with syntax highlighting and current line indicator
//! - [`output`]: Values written so far
//! - [`stack`]: Globals and call frames with their variables
//! - [`status`]: Status bar with keybindings and execution state
//!
//! Each module exports one `render_*` function plus any scroll state it keeps
//! between frames.

pub mod output;
pub mod source;
pub mod stack;
pub mod status;

pub use output::render_output_pane;
pub use source::{render_source_pane, SourceScrollState};
pub use stack::{render_stack_pane, StackScrollState};
pub use status::{render_status_bar, StatusRenderData};
