// Error types for the preset bridge and render harness
//
// This module defines custom error types for preset parsing and external
// render invocations, each carrying a stable numeric code so batch reports
// and CLI output can be matched programmatically.

mod format;
mod render;

pub use format::{log_format_error, FormatError, FormatErrorCodes};
pub use render::{log_render_error, RenderError, RenderErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// the CLI and report boundary.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
