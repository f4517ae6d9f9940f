//! Render adapter boundary.
//!
//! Both engines are black boxes reached through [`Renderer`]: given a preset
//! path and a destination path, a renderer produces one buffer for the fixed
//! stimulus script. Comparison code only ever sees the trait, so it can be
//! driven by synthetic renderers in tests.

mod process;

use std::path::Path;

pub use process::{substitute_args, ProcessRenderer};

use crate::audio::AudioBuffer;
use crate::error::RenderError;

/// Placeholder replaced by the preset path in renderer arguments
pub const PRESET_PLACEHOLDER: &str = "{preset}";
/// Placeholder replaced by the output path in renderer arguments
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Path-in, buffer-out rendering of one preset
pub trait Renderer {
    /// Short label used in logs
    fn name(&self) -> &str;

    /// Render `preset`, using `output` as the scratch output file
    fn render(&self, preset: &Path, output: &Path) -> Result<AudioBuffer, RenderError>;
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn render(&self, preset: &Path, output: &Path) -> Result<AudioBuffer, RenderError> {
        (**self).render(preset, output)
    }
}
