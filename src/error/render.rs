// Render adapter error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Render error code constants
///
/// Error code range: 4001-4005
pub struct RenderErrorCodes {}

impl RenderErrorCodes {
    /// Renderer process could not be started
    pub const SPAWN_FAILED: i32 = 4001;

    /// Renderer exceeded its timeout and was killed
    pub const TIMEOUT: i32 = 4002;

    /// Renderer exited with a non-zero status
    pub const ABNORMAL_EXIT: i32 = 4003;

    /// Renderer finished but left no output file
    pub const MISSING_OUTPUT: i32 = 4004;

    /// Output file exists but is not a decodable buffer
    pub const DECODE_FAILED: i32 = 4005;
}

/// Log a render error with structured context
pub fn log_render_error(err: &RenderError, context: &str) {
    error!(
        "Render error in {}: code={}, component=RenderAdapter, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Render failures
///
/// A render failure only fails the preset it happened on. The batch
/// orchestrator records it as a failed row and moves on.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// The renderer executable could not be launched
    SpawnFailed { program: String, reason: String },

    /// The renderer ran past its deadline
    Timeout { program: String, timeout_ms: u64 },

    /// The renderer exited abnormally
    AbnormalExit {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    /// No output file after the call
    MissingOutput { path: String },

    /// Output file could not be decoded as audio
    DecodeFailed { path: String, reason: String },
}

impl RenderError {
    /// Stable tag written into report rows
    pub fn reason_tag(&self) -> &'static str {
        match self {
            RenderError::SpawnFailed { .. } => "spawn_failed",
            RenderError::Timeout { .. } => "timeout",
            RenderError::AbnormalExit { .. } => "abnormal_exit",
            RenderError::MissingOutput { .. } => "missing_output",
            RenderError::DecodeFailed { .. } => "decode_failed",
        }
    }
}

impl ErrorCode for RenderError {
    fn code(&self) -> i32 {
        match self {
            RenderError::SpawnFailed { .. } => RenderErrorCodes::SPAWN_FAILED,
            RenderError::Timeout { .. } => RenderErrorCodes::TIMEOUT,
            RenderError::AbnormalExit { .. } => RenderErrorCodes::ABNORMAL_EXIT,
            RenderError::MissingOutput { .. } => RenderErrorCodes::MISSING_OUTPUT,
            RenderError::DecodeFailed { .. } => RenderErrorCodes::DECODE_FAILED,
        }
    }

    fn message(&self) -> String {
        match self {
            RenderError::SpawnFailed { program, reason } => {
                format!("Failed to launch renderer {}: {}", program, reason)
            }
            RenderError::Timeout {
                program,
                timeout_ms,
            } => {
                format!("Renderer {} timed out after {} ms", program, timeout_ms)
            }
            RenderError::AbnormalExit {
                program,
                code,
                stderr,
            } => match code {
                Some(code) => format!(
                    "Renderer {} exited with status {}: {}",
                    program,
                    code,
                    stderr.trim()
                ),
                None => format!(
                    "Renderer {} terminated by signal: {}",
                    program,
                    stderr.trim()
                ),
            },
            RenderError::MissingOutput { path } => {
                format!("Renderer produced no output at {}", path)
            }
            RenderError::DecodeFailed { path, reason } => {
                format!("Cannot decode render output {}: {}", path, reason)
            }
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RenderError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for RenderError {}
