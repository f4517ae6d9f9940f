// Patchmatch - preset translation and render-comparison harness
// Offline, one preset at a time: parse -> map, or render -> extract -> compare -> decide

// Module declarations
pub mod analysis;
pub mod audio;
pub mod batch;
pub mod config;
pub mod convert;
pub mod error;
pub mod mapping;
pub mod preset;
pub mod render;
pub mod testing;

// Re-exports for convenience
pub use analysis::decision::ValidationMode;
pub use analysis::{Analyzer, Assessment};
pub use audio::AudioBuffer;
pub use config::AppConfig;
pub use convert::{convert_archive, convert_blob, convert_file};
pub use error::{ErrorCode, FormatError, RenderError};
pub use mapping::{map_program, NativeSnapshot};
pub use preset::{AttributeSet, AttributeValue};
pub use render::{ProcessRenderer, Renderer};
