//! Channel mixing and sample-rate conversion.
//!
//! Whisper wants 16 kHz mono `f32`.  Capture devices usually deliver 44.1 or
//! 48 kHz, often stereo, so every chunk goes through [`downmix`] and then
//! [`resample`] on its way to the recogniser.

/// Sample rate expected by the speech recogniser.
pub const WHISPER_SAMPLE_RATE: u32 = 16_000;

/// Average interleaved frames down to a single channel.
///
/// A trailing partial frame is dropped.  Zero channels yields no samples.
///
/// ```rust
/// use quick_translate::audio::downmix;
///
/// let mono = downmix(&[0.2, 0.4, -1.0, 0.0], 2);
/// assert_eq!(mono.len(), 2);
/// assert!((mono[0] - 0.3).abs() < 1e-6);
/// ```
pub fn downmix(samples: &[f32], channels: u16) -> Vec<f32> {
    let width = usize::from(channels);
    match width {
        0 => Vec::new(),
        1 => samples.to_vec(),
        _ => samples
            .chunks_exact(width)
            .map(|frame| frame.iter().sum::<f32>() / width as f32)
            .collect(),
    }
}

/// Convert `samples` from `from_rate` to `to_rate` with linear interpolation.
///
/// Output length is `ceil(len * to_rate / from_rate)`.  Equal rates return a
/// copy of the input.
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() || from_rate == 0 {
        return samples.to_vec();
    }

    let step = f64::from(from_rate) / f64::from(to_rate);
    let out_len = (samples.len() as f64 / step).ceil() as usize;
    let last = samples.len() - 1;

    (0..out_len)
        .map(|i| {
            let pos = i as f64 * step;
            let left = (pos.floor() as usize).min(last);
            let right = (left + 1).min(last);
            let t = (pos - left as f64) as f32;
            samples[left] + (samples[right] - samples[left]) * t
        })
        .collect()
}
