// src/core/loader.rs
//
// Decodes audio into the bounded mono analysis window every extractor
// works on: up to 30 s (starting at 15 s for longer tracks), stride-
// decimated toward 11025 Hz, peak-normalized to 0.95.
// Uses Symphonia for format-agnostic decoding.

use log::{debug, warn};
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::LoadError;

/// Target analysis rate. Decimation keeps an integer stride, so the
/// effective rate can land above this (48000 Hz becomes 12000 Hz).
pub const TARGET_SAMPLE_RATE: u32 = 11025;

/// Length of the analysis window in seconds.
pub const WINDOW_SECS: f64 = 30.0;

/// Window start for tracks longer than the window, skipping intros.
pub const WINDOW_OFFSET_SECS: f64 = 15.0;

/// Windows whose peak absolute amplitude stays at or below this count
/// as silence and are left unscaled.
const SILENCE_PEAK: f32 = 1e-3;

const PEAK_TARGET: f32 = 0.95;

/// Mono analysis window plus the metadata the scoring stages need.
///
/// Immutable once loaded; a failed load never produces a partial one.
#[derive(Debug, Clone)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
    duration: f64,
    silent: bool,
}

impl Waveform {
    /// Decode `path` and prepare the analysis window.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let decoded = decode_window(path)?;
        debug!(
            "decoded {}: {} mono samples at {} Hz, {:.2}s total",
            path.display(),
            decoded.samples.len(),
            decoded.sample_rate,
            decoded.duration
        );
        Self::condition(decoded.samples, decoded.sample_rate, decoded.duration)
    }

    /// Build a waveform from raw mono samples, applying the same window
    /// selection, decimation, and normalization as a file load.
    pub fn from_samples(samples: Vec<f32>, sample_rate: u32) -> Result<Self, LoadError> {
        let duration = samples.len() as f64 / sample_rate as f64;
        let windowed = select_window(samples, sample_rate, duration);
        Self::condition(windowed, sample_rate, duration)
    }

    fn condition(samples: Vec<f32>, sample_rate: u32, duration: f64) -> Result<Self, LoadError> {
        if samples.is_empty() {
            return Err(LoadError::EmptyWindow);
        }

        let (mut samples, sample_rate) = decimate(samples, sample_rate);

        let peak = samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max);
        let silent = peak <= SILENCE_PEAK;
        if silent {
            warn!("analysis window is near-silent, skipping peak normalization");
        } else {
            let scale = PEAK_TARGET / peak;
            for s in &mut samples {
                *s *= scale;
            }
            debug!("peak-normalized {:.4} -> {}", peak, PEAK_TARGET);
        }

        Ok(Self {
            samples,
            sample_rate,
            duration,
            silent,
        })
    }

    /// Samples of the analysis window, in [-1, 1].
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Effective sample rate after decimation.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Full-track duration in seconds, independent of the window.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// True when the window never exceeded the silence peak threshold.
    pub fn is_silent(&self) -> bool {
        self.silent
    }
}

struct DecodedWindow {
    samples: Vec<f32>,
    sample_rate: u32,
    duration: f64,
}

/// Decode the analysis window of `path` as mono at the source rate.
///
/// When the container reports a duration up front, decoding stops as
/// soon as the window is filled; otherwise the whole track is decoded
/// and the window is cut afterwards.
fn decode_window(path: &Path) -> Result<DecodedWindow, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension() {
        hint.with_extension(ext.to_str().unwrap_or(""));
    }

    let meta_opts = MetadataOptions::default();
    let fmt_opts = FormatOptions::default();

    let mut probed = symphonia::default::get_probe()
        .format(&hint, mss, &fmt_opts, &meta_opts)
        .map_err(LoadError::Probe)?;

    let track = probed
        .format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(LoadError::NoAudioTrack)?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or(LoadError::NoSampleRate)?;

    let channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(2);
    if channels == 0 {
        return Err(LoadError::NoChannels);
    }

    let known_duration = track
        .codec_params
        .n_frames
        .map(|n| n as f64 / sample_rate as f64);

    // Window bounds in source-rate frames, when the duration is known
    // up front. Unknown durations decode fully and window afterwards.
    let bounds = known_duration.map(|duration| window_bounds(sample_rate, duration));

    let dec_opts = DecoderOptions::default();
    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &dec_opts)
        .map_err(LoadError::UnsupportedCodec)?;

    let mut window: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;
    let mut current_frame: usize = 0;

    loop {
        let packet = match probed.format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break
            }
            Err(symphonia::core::errors::Error::ResetRequired) => {
                decoder.reset();
                continue;
            }
            Err(e) => return Err(LoadError::Decode(e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(buf) => buf,
            Err(symphonia::core::errors::Error::DecodeError(_)) => continue,
            Err(e) => return Err(LoadError::Decode(e)),
        };

        if sample_buf.is_none() {
            let spec = *decoded.spec();
            let capacity = decoded.capacity() as u64;
            sample_buf = Some(SampleBuffer::new(capacity, spec));
        }

        let buf = match sample_buf {
            Some(ref mut buf) => buf,
            None => continue,
        };
        buf.copy_interleaved_ref(decoded);

        // Downmix each decoded block immediately to bound memory.
        let interleaved = buf.samples();
        let frames = interleaved.len() / channels;

        match bounds {
            Some((start, end)) => {
                let block_start = current_frame;
                let block_end = current_frame + frames;
                let take_from = block_start.max(start);
                let take_to = block_end.min(end);

                if take_from < take_to {
                    mix_frames(
                        interleaved,
                        channels,
                        take_from - block_start,
                        take_to - block_start,
                        &mut window,
                    );
                }

                current_frame = block_end;
                if current_frame >= end {
                    break;
                }
            }
            None => {
                mix_frames(interleaved, channels, 0, frames, &mut window);
                current_frame += frames;
            }
        }
    }

    if bounds.is_none() {
        let duration = current_frame as f64 / sample_rate as f64;
        let window = select_window(window, sample_rate, duration);
        if window.is_empty() {
            return Err(LoadError::EmptyWindow);
        }
        return Ok(DecodedWindow {
            samples: window,
            sample_rate,
            duration,
        });
    }

    if window.is_empty() {
        return Err(LoadError::EmptyWindow);
    }

    Ok(DecodedWindow {
        samples: window,
        sample_rate,
        duration: known_duration.unwrap_or(0.0),
    })
}

/// Average interleaved frames [from, to) down to mono.
fn mix_frames(interleaved: &[f32], channels: usize, from: usize, to: usize, out: &mut Vec<f32>) {
    for frame in from..to {
        let base = frame * channels;
        let mut sum = 0.0f32;
        for ch in 0..channels {
            sum += interleaved[base + ch];
        }
        out.push(sum / channels as f32);
    }
}

/// [start, end) of the analysis window in frames at `sample_rate`.
fn window_bounds(sample_rate: u32, duration: f64) -> (usize, usize) {
    let start_secs = if duration > WINDOW_SECS {
        WINDOW_OFFSET_SECS
    } else {
        0.0
    };
    let length_secs = WINDOW_SECS.min(duration);

    let start = (start_secs * sample_rate as f64) as usize;
    let end = start + (length_secs * sample_rate as f64) as usize;
    (start, end)
}

/// Cut the analysis window out of a fully decoded track.
fn select_window(samples: Vec<f32>, sample_rate: u32, duration: f64) -> Vec<f32> {
    let (start, end) = window_bounds(sample_rate, duration);
    if start == 0 && end >= samples.len() {
        return samples;
    }

    let start = start.min(samples.len());
    let end = end.min(samples.len());
    samples[start..end].to_vec()
}

/// Integer-stride decimation toward the target rate. Deliberately not
/// anti-aliased; the accuracy trade-off is accepted for speed.
fn decimate(samples: Vec<f32>, sample_rate: u32) -> (Vec<f32>, u32) {
    let step = (sample_rate / TARGET_SAMPLE_RATE) as usize;
    if step <= 1 {
        return (samples, sample_rate);
    }

    let decimated: Vec<f32> = samples.iter().step_by(step).copied().collect();
    (decimated, sample_rate / step as u32)
}
