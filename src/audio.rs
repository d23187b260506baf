//! Audio Decoding
//!
//! Decodes uploaded WAV audio into 16kHz mono i16 samples for the speech
//! recognizer. Uploads are spooled through a scoped temp file that is
//! removed on every exit path.

use std::path::Path;

use thiserror::Error;

/// Sample rate expected by the speech recognizer
pub const TARGET_SAMPLE_RATE: u32 = 16000;

/// Audio decode errors
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("WAV decode error: {0}")]
    WavDecode(#[from] hound::Error),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Decode a WAV file into 16kHz mono i16 samples
pub fn decode_wav_file(path: &Path) -> Result<Vec<i16>, AudioError> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    // Read all samples as f32 in -1.0..1.0
    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let max_value = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .filter_map(|s| s.ok())
                .map(|s| s as f32 / max_value)
                .collect()
        }
        hound::SampleFormat::Float => reader.samples::<f32>().filter_map(|s| s.ok()).collect(),
    };

    // Downmix multi-channel by averaging
    let mono: Vec<f32> = if spec.channels > 1 {
        samples
            .chunks(spec.channels as usize)
            .map(|chunk| chunk.iter().sum::<f32>() / chunk.len() as f32)
            .collect()
    } else {
        samples
    };

    let resampled = if spec.sample_rate != TARGET_SAMPLE_RATE {
        resample(&mono, spec.sample_rate, TARGET_SAMPLE_RATE)
    } else {
        mono
    };

    Ok(resampled
        .into_iter()
        .map(|s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
        .collect())
}

/// Whether a filename looks like a supported upload
pub fn is_supported_upload(filename: &str) -> bool {
    filename.to_lowercase().ends_with(".wav")
}

/// Simple linear resampler
fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let src_idx = i as f64 * ratio;
            let idx = src_idx.floor() as usize;
            let frac = src_idx.fract() as f32;

            if idx + 1 < samples.len() {
                samples[idx] * (1.0 - frac) + samples[idx + 1] * frac
            } else if idx < samples.len() {
                samples[idx]
            } else {
                0.0
            }
        })
        .collect()
}
