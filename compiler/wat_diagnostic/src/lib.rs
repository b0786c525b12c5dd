//! `wat_diagnostic` — the Error Handler external collaborator (spec §6)
//! and the error taxonomy (spec §7) this front end reports through it.
//!
//! # Error Guarantees
//!
//! `ErrorGuaranteed` is type-level proof that at least one error was
//! emitted through a `DiagnosticQueue`, so a semantic action that fails
//! can return `Result<T, ErrorGuaranteed>` instead of failing silently.

pub mod emitter;
mod diagnostic;
mod error_code;
mod guarantee;
mod reporter;

pub use diagnostic::{unexpected_token, Diagnostic, Label, Severity};
pub use error_code::ErrorKind;
pub use guarantee::ErrorGuaranteed;
pub use reporter::{CollectingReporter, DiagnosticQueue, NullReporter, Reporter};
