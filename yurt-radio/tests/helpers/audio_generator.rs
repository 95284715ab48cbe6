//! WAV fixture generator
//!
//! Every generated file gets distinct content (the tone frequency differs), so
//! each one hashes to its own catalog identity.

use std::path::{Path, PathBuf};

/// Generate a mono 16-bit WAV tone of `duration_seconds` at `frequency` Hz
pub fn generate_test_wav(path: &Path, duration_seconds: u32, frequency: f32) -> anyhow::Result<PathBuf> {
    let sample_rate = 8000;
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    let total_samples = duration_seconds * sample_rate;

    for i in 0..total_samples {
        let t = i as f32 / sample_rate as f32;
        let sample = (0.3 * (2.0 * std::f32::consts::PI * frequency * t).sin() * i16::MAX as f32) as i16;
        writer.write_sample(sample)?;
    }

    writer.finalize()?;
    Ok(path.to_path_buf())
}

/// Generate `count` one-second tracks named `track_000.wav`, `track_001.wav`, ...
pub fn generate_library(dir: &Path, count: usize) -> anyhow::Result<Vec<PathBuf>> {
    (0..count)
        .map(|i| {
            let path = dir.join(format!("track_{:03}.wav", i));
            generate_test_wav(&path, 1, 220.0 + 20.0 * i as f32)
        })
        .collect()
}
