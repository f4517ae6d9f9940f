//! In-process renderers and preset builders for tests.

use std::path::Path;

use crate::audio::{read_render_output, write_wav, AudioBuffer};
use crate::config::OutputFormat;
use crate::error::RenderError;
use crate::render::Renderer;

/// Renderer that synthesizes a buffer per preset
///
/// The buffer goes through the same file contract as an external renderer:
/// it is written to the output path as 16-bit WAV and decoded back.
pub struct SignalRenderer<F> {
    name: String,
    generate: F,
}

impl<F> SignalRenderer<F>
where
    F: Fn(&Path) -> AudioBuffer,
{
    pub fn new(name: impl Into<String>, generate: F) -> Self {
        Self {
            name: name.into(),
            generate,
        }
    }
}

impl<F> Renderer for SignalRenderer<F>
where
    F: Fn(&Path) -> AudioBuffer,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self, preset: &Path, output: &Path) -> Result<AudioBuffer, RenderError> {
        let buffer = (self.generate)(preset);
        write_wav(output, &buffer).map_err(|err| RenderError::DecodeFailed {
            path: output.display().to_string(),
            reason: err.to_string(),
        })?;
        read_render_output(output, OutputFormat::Wav, buffer.sample_rate())
    }
}

/// Renderer that always fails with the same error
pub struct FailingRenderer {
    error: RenderError,
}

impl FailingRenderer {
    pub fn new(error: RenderError) -> Self {
        Self { error }
    }
}

impl Renderer for FailingRenderer {
    fn name(&self) -> &str {
        "failing"
    }

    fn render(&self, _preset: &Path, _output: &Path) -> Result<AudioBuffer, RenderError> {
        Err(self.error.clone())
    }
}

/// Build a preset container embedding one program node
///
/// The program block is wrapped in binary header and trailer bytes the way
/// a vendor container would carry it.
pub fn preset_container(attrs: &[(&str, &str)]) -> Vec<u8> {
    let attributes: String = attrs
        .iter()
        .map(|(key, value)| format!(" {}=\"{}\"", key, escape_attribute(value)))
        .collect();
    let xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?> <tal curprogram=\"0\" version=\"1.7\">\
         <programs><program{attributes}/></programs><midimap/></tal>"
    );

    let mut blob = b"VST3\x01\x00\x00\x00Comp\x00\x00\x00\x10".to_vec();
    blob.extend_from_slice(xml.as_bytes());
    blob.extend_from_slice(b"\x00\x00Info\x00List");
    blob
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::{program_attributes, AttributeValue};
    use crate::testing::signals;
    use tempfile::tempdir;

    #[test]
    fn container_round_trips_through_parser() {
        let blob = preset_container(&[("programname", "Bass & Lead"), ("sawvolume", "0.5")]);
        let attrs = program_attributes(&blob).unwrap();
        assert_eq!(
            attrs.get("programname"),
            Some(&AttributeValue::Text("Bass & Lead".to_string()))
        );
        assert_eq!(attrs.number("sawvolume"), 0.5);
    }

    #[test]
    fn signal_renderer_goes_through_wav() {
        let dir = tempdir().unwrap();
        let renderer = SignalRenderer::new("tone", |_: &Path| {
            signals::sine(441.0, 0.5, 256, 44_100)
        });
        let buffer = renderer
            .render(Path::new("x.vstpreset"), &dir.path().join("out.wav"))
            .unwrap();
        assert_eq!(buffer.len(), 256);
        assert!(dir.path().join("out.wav").exists());
    }
}
