//! Diagnostic emitters: render collected diagnostics somewhere a human
//! (or another tool) can read them.

pub mod terminal;

pub use terminal::{ColorMode, TerminalEmitter};
