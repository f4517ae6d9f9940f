// Preset container error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Preset format error code constants
///
/// Error code range: 3001-3005
pub struct FormatErrorCodes {}

impl FormatErrorCodes {
    /// No `<?xml ...?><tal ` start marker in the container
    pub const MISSING_START_MARKER: i32 = 3001;

    /// Start marker found but no `</tal>` after it
    pub const MISSING_END_MARKER: i32 = 3002;

    /// Embedded block is not well-formed XML
    pub const MALFORMED_XML: i32 = 3003;

    /// No `<programs><program .../>` node in the block
    pub const MISSING_PROGRAM: i32 = 3004;

    /// Container or archive could not be read at all
    pub const UNREADABLE: i32 = 3005;
}

/// Log a preset format error with structured context
///
/// Emits one line with the error code, the component and the message.
pub fn log_format_error(err: &FormatError, context: &str) {
    error!(
        "Format error in {}: code={}, component=PresetParser, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Preset parsing errors
///
/// Fatal for the single preset being converted. Callers surface these,
/// they are never replaced by a default snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// The XML declaration + root tag marker is absent
    MissingStartMarker,

    /// The closing root tag is absent after the start marker
    MissingEndMarker,

    /// The enclosed text failed to parse as XML
    MalformedXml { reason: String },

    /// The program tree has no program node
    MissingProgram,

    /// The container could not be read
    Unreadable { path: String, reason: String },
}

impl ErrorCode for FormatError {
    fn code(&self) -> i32 {
        match self {
            FormatError::MissingStartMarker => FormatErrorCodes::MISSING_START_MARKER,
            FormatError::MissingEndMarker => FormatErrorCodes::MISSING_END_MARKER,
            FormatError::MalformedXml { .. } => FormatErrorCodes::MALFORMED_XML,
            FormatError::MissingProgram => FormatErrorCodes::MISSING_PROGRAM,
            FormatError::Unreadable { .. } => FormatErrorCodes::UNREADABLE,
        }
    }

    fn message(&self) -> String {
        match self {
            FormatError::MissingStartMarker => {
                "Program XML block not found in preset container".to_string()
            }
            FormatError::MissingEndMarker => {
                "Program XML closing tag not found in preset container".to_string()
            }
            FormatError::MalformedXml { reason } => {
                format!("Malformed program XML: {}", reason)
            }
            FormatError::MissingProgram => "Missing <program> node in program XML".to_string(),
            FormatError::Unreadable { path, reason } => {
                format!("Cannot read {}: {}", path, reason)
            }
        }
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FormatError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for FormatError {}
