// Decoders for renderer output files
//
// WAV input goes through hound; raw float input is reinterpreted with
// bytemuck. Any decode problem is reported as a RenderError so the batch
// can record it against the preset.

use std::fs;
use std::path::Path;

use crate::audio::AudioBuffer;
use crate::config::OutputFormat;
use crate::error::RenderError;

/// Full-scale divisor for 16-bit PCM
const PCM16_SCALE: f32 = 32_768.0;

fn decode_failed(path: &Path, reason: impl ToString) -> RenderError {
    RenderError::DecodeFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Read a mono WAV file
///
/// 16-bit PCM is the renderer contract; float and wider integer files are
/// accepted as well.
pub fn read_wav(path: &Path) -> Result<AudioBuffer, RenderError> {
    let mut reader = hound::WavReader::open(path).map_err(|err| decode_failed(path, err))?;
    let spec = reader.spec();
    if spec.channels != 1 {
        return Err(decode_failed(
            path,
            format!("expected mono, found {} channels", spec.channels),
        ));
    }

    let samples = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<Vec<f32>, _>>()
            .map_err(|err| decode_failed(path, err))?,
        hound::SampleFormat::Int => match spec.bits_per_sample {
            16 => reader
                .samples::<i16>()
                .map(|sample| sample.map(|value| value as f32 / PCM16_SCALE))
                .collect::<Result<Vec<f32>, _>>()
                .map_err(|err| decode_failed(path, err))?,
            bits @ (24 | 32) => {
                let scale = (1i64 << (bits - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|sample| sample.map(|value| value as f32 / scale))
                    .collect::<Result<Vec<f32>, _>>()
                    .map_err(|err| decode_failed(path, err))?
            }
            other => {
                return Err(decode_failed(
                    path,
                    format!("unsupported bits per sample {}", other),
                ))
            }
        },
    };

    Ok(AudioBuffer::new(samples, spec.sample_rate))
}

/// Read headerless little-endian `f32` samples
///
/// A trailing partial sample is dropped.
pub fn read_raw_f32(path: &Path, sample_rate: u32) -> Result<AudioBuffer, RenderError> {
    let bytes = fs::read(path).map_err(|err| decode_failed(path, err))?;
    let usable = bytes.len() - bytes.len() % 4;
    let samples: Vec<f32> = bytemuck::pod_collect_to_vec::<u8, [u8; 4]>(&bytes[..usable])
        .into_iter()
        .map(f32::from_le_bytes)
        .collect();
    Ok(AudioBuffer::new(samples, sample_rate))
}

/// Decode a renderer's output file
///
/// A missing file is [`RenderError::MissingOutput`], not a decode error.
/// A WAV whose header rate differs from `sample_rate` is rejected, since
/// block alignment and pitch estimates assume that rate.
pub fn read_render_output(
    path: &Path,
    format: OutputFormat,
    sample_rate: u32,
) -> Result<AudioBuffer, RenderError> {
    if !path.is_file() {
        return Err(RenderError::MissingOutput {
            path: path.display().to_string(),
        });
    }

    match resolve_format(path, format) {
        OutputFormat::RawF32 => read_raw_f32(path, sample_rate),
        _ => {
            let buffer = read_wav(path)?;
            if buffer.sample_rate() != sample_rate {
                return Err(decode_failed(
                    path,
                    format!(
                        "sample rate {} Hz, expected {} Hz",
                        buffer.sample_rate(),
                        sample_rate
                    ),
                ));
            }
            Ok(buffer)
        }
    }
}

fn resolve_format(path: &Path, format: OutputFormat) -> OutputFormat {
    if format != OutputFormat::Auto {
        return format;
    }
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("f32") | Some("raw") | Some("bin") => OutputFormat::RawF32,
        _ => OutputFormat::Wav,
    }
}

/// Write a buffer as mono 16-bit PCM
pub fn write_wav(path: &Path, buffer: &AudioBuffer) -> Result<(), hound::Error> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: buffer.sample_rate(),
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in buffer.samples() {
        let scaled = (sample.clamp(-1.0, 1.0) * PCM16_SCALE).round();
        writer.write_sample(scaled.clamp(i16::MIN as f32, i16::MAX as f32) as i16)?;
    }
    writer.finalize()
}
