//! Application module: the view model used by the TUI and runtime.
//!
//! `App` lives in `app::model` and holds the cursor, the open-path prompt
//! and the status line.

mod model;

pub use model::*;
