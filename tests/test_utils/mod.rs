// tests/test_utils/mod.rs
//
// Shared helpers for integration tests: synthetic signals, WAV
// fixtures, and throwaway directories.
#![allow(dead_code)]

use hound::{SampleFormat, WavSpec, WavWriter};
use std::f64::consts::PI;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Fresh directory under the system temp dir, unique per call.
pub fn temp_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("hitscore-{}-{}", label, Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

/// Mono sine wave at `freq` Hz.
pub fn sine(freq: f64, amplitude: f32, secs: f64, sample_rate: u32) -> Vec<f32> {
    let n = (secs * sample_rate as f64) as usize;
    (0..n)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            (2.0 * PI * freq * t).sin() as f32 * amplitude
        })
        .collect()
}

/// Impulses every `period` samples, zeros elsewhere.
pub fn clicks(period: usize, secs: f64, sample_rate: u32) -> Vec<f32> {
    let n = (secs * sample_rate as f64) as usize;
    let mut samples = vec![0.0f32; n];
    let mut i = 0;
    while i < n {
        samples[i] = 0.9;
        i += period;
    }
    samples
}

/// Write mono f32 samples as a 16-bit PCM WAV.
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) {
    write_wav_channels(path, samples, sample_rate, 1);
}

/// Write a stereo WAV duplicating `samples` onto both channels.
pub fn write_stereo_wav(path: &Path, samples: &[f32], sample_rate: u32) {
    write_wav_channels(path, samples, sample_rate, 2);
}

fn write_wav_channels(path: &Path, samples: &[f32], sample_rate: u32, channels: u16) {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).expect("create WAV writer");
    for &s in samples {
        let value = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        for _ in 0..channels {
            writer.write_sample(value).expect("write sample");
        }
    }
    writer.finalize().expect("finalize WAV");
}
