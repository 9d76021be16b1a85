use super::decode::WaveformBuffer;
use super::features::RawFeatures;

// Tuning constants for the three descriptor scans. These are empirical
// calibration values; changing them shifts the 0-100 scales that the
// cluster engine and the exports are calibrated against.
const ENERGY_MAX_SAMPLES: usize = 20_000;
const ENERGY_DB_OFFSET: f64 = 60.0;
const ENERGY_SCALE: f64 = 1.6;

const BRIGHTNESS_WINDOWS: usize = 60;
const BRIGHTNESS_WINDOW_LEN: usize = 1024;
const BRIGHTNESS_ZCR_MIN: f64 = 0.02;
const BRIGHTNESS_ZCR_MAX: f64 = 0.12;

const TEMPO_HOP: usize = 2048;
const TEMPO_PEAK_RATIO: f64 = 1.6;
const TEMPO_PEAK_FLOOR: f64 = 0.04;
const TEMPO_MIN: f64 = 60.0;
const TEMPO_MAX: f64 = 180.0;
const TEMPO_DENSITY_SCALE: f64 = 5.0;

/// Compute the three per-track descriptors from a decoded waveform.
///
/// Only the first channel is read. All three scans are deliberately
/// heuristic: brightness is a zero-crossing-rate proxy rather than a
/// spectral centroid, and tempo is an energy-peak density rather than real
/// beat tracking. The scans are pure functions of the sample data, so
/// repeated calls on the same buffer return identical values.
pub fn extract(wave: &WaveformBuffer) -> RawFeatures {
    let samples = wave.primary_channel();
    if samples.is_empty() {
        return RawFeatures {
            energy: 0.0,
            brightness: 0.0,
            tempo: TEMPO_MIN as u32,
        };
    }

    let energy = energy_score(samples);
    let brightness = brightness_score(samples);
    let tempo = tempo_estimate(samples, wave.duration());

    log::debug!(
        "Extracted features: energy={:.1}, brightness={:.1}, tempo={}",
        energy,
        brightness,
        tempo
    );

    RawFeatures {
        energy,
        brightness,
        tempo,
    }
}

/// RMS loudness over a strided subsample, mapped onto a 0-100 scale.
///
/// The stride keeps the scan at roughly `ENERGY_MAX_SAMPLES` points no
/// matter how long the track is, which makes the cost flat and the result
/// deterministic for a given waveform.
fn energy_score(samples: &[f32]) -> f64 {
    let stride = (samples.len() / ENERGY_MAX_SAMPLES).max(1);

    let mut sum_squares = 0.0f64;
    let mut count = 0usize;
    for &s in samples.iter().step_by(stride) {
        sum_squares += f64::from(s) * f64::from(s);
        count += 1;
    }
    let rms = (sum_squares / count as f64).sqrt();

    // 20*log10 converts RMS to dBFS; the offset and scale place typically
    // mastered material in the upper half of the range. Silence gives
    // -inf dB and clamps to 0.
    let energy = (rms.log10() * 20.0 + ENERGY_DB_OFFSET) * ENERGY_SCALE;
    round1(energy.clamp(0.0, 100.0))
}

/// Zero-crossing rate averaged over evenly spaced windows, mapped so a
/// rate of 0.02 reads as 0 and 0.12 as 100.
fn brightness_score(samples: &[f32]) -> f64 {
    let window_stride = (samples.len() / BRIGHTNESS_WINDOWS).max(1);

    let mut total_rate = 0.0f64;
    let mut windows = 0usize;

    for w in 0..BRIGHTNESS_WINDOWS {
        let start = w * window_stride;
        let end = start + BRIGHTNESS_WINDOW_LEN;
        if end > samples.len() {
            // Window starts grow monotonically, so no later window fits either.
            break;
        }

        let mut crossings = 0usize;
        for pair in samples[start..end].windows(2) {
            let (prev, cur) = (pair[0], pair[1]);
            if (cur >= 0.0 && prev < 0.0) || (cur < 0.0 && prev >= 0.0) {
                crossings += 1;
            }
        }

        total_rate += crossings as f64 / BRIGHTNESS_WINDOW_LEN as f64;
        windows += 1;
    }

    if windows == 0 {
        return 0.0;
    }

    let avg_rate = total_rate / windows as f64;
    let brightness =
        (avg_rate - BRIGHTNESS_ZCR_MIN) / (BRIGHTNESS_ZCR_MAX - BRIGHTNESS_ZCR_MIN) * 100.0;
    round1(brightness.clamp(0.0, 100.0))
}

/// Energy-peak density mapped into a plausible BPM range.
///
/// A hop counts as a peak when its RMS jumps past `TEMPO_PEAK_RATIO` times
/// the previous hop and clears an absolute floor that keeps low-level noise
/// from registering. Peaks per second are then pushed through an affine map
/// and clamped to 60-180 BPM, so even a pathological waveform reports
/// something a musician would recognize as a tempo.
fn tempo_estimate(samples: &[f32], duration: f64) -> u32 {
    if duration <= 0.0 {
        return TEMPO_MIN as u32;
    }

    let mut peaks = 0usize;
    let mut prev_rms = 0.0f64;

    for hop in samples.chunks(TEMPO_HOP) {
        let sum_squares: f64 = hop.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
        // The divisor stays at the full hop size even for the final short
        // hop, underweighting the tail instead of inflating it.
        let local_rms = (sum_squares / TEMPO_HOP as f64).sqrt();

        if local_rms > prev_rms * TEMPO_PEAK_RATIO && local_rms > TEMPO_PEAK_FLOOR {
            peaks += 1;
        }
        prev_rms = local_rms;
    }

    let density = peaks as f64 / duration;
    let tempo = (TEMPO_MIN + density * TEMPO_DENSITY_SCALE).clamp(TEMPO_MIN, TEMPO_MAX);
    tempo.floor() as u32
}

/// Round to one decimal place for stable display and export.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
