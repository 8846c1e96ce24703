//! Diagnostic system for generation-time errors.
//!
//! Every resolution or validation failure aborts generation for the
//! offending file with a diagnostic carrying:
//! - an error code for searchability
//! - a clear message (what went wrong)
//! - a primary span (where it went wrong)
//! - context labels and notes (why it's wrong)
//!
//! Runtime errors of generated artifacts (protocol violations, application
//! exceptions) are a separate family and live in `thrum_runtime`.

mod diagnostic;
mod error_code;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
