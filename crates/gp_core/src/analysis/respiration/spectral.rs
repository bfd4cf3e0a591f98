//! Spectral helpers: linear detrending and Welch power spectral density.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use std::f64::consts::PI;

/// One-sided power spectral density.
#[derive(Debug, Clone, PartialEq)]
pub struct Psd {
    /// Hz, `k * fs / segment_len`
    pub freqs: Vec<f64>,
    /// Units²/Hz
    pub power: Vec<f64>,
}

impl Psd {
    /// Frequency and power of the strongest bin inside `[min_hz, max_hz]`.
    /// Ties resolve to the lowest frequency.
    pub fn peak_in_band(&self, min_hz: f64, max_hz: f64) -> Option<(f64, f64)> {
        let mut best: Option<(f64, f64)> = None;
        for (&f, &p) in self.freqs.iter().zip(self.power.iter()) {
            if f < min_hz || f > max_hz {
                continue;
            }
            match best {
                Some((_, bp)) if p <= bp => {}
                _ => best = Some((f, p)),
            }
        }
        best
    }
}

/// Remove the least-squares line through `signal` (indexed 0..n).
pub fn detrend_linear(signal: &[f64]) -> Vec<f64> {
    let n = signal.len();
    if n < 2 {
        return vec![0.0; n];
    }
    let nf = n as f64;
    let mean_i = (nf - 1.0) / 2.0;
    let mean_y = signal.iter().sum::<f64>() / nf;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (i, &y) in signal.iter().enumerate() {
        let di = i as f64 - mean_i;
        sxy += di * (y - mean_y);
        sxx += di * di;
    }
    let slope = sxy / sxx;

    signal
        .iter()
        .enumerate()
        .map(|(i, &y)| y - (mean_y + slope * (i as f64 - mean_i)))
        .collect()
}

/// Periodic Hann window (the FFT-bin flavour).
pub fn hann_window(len: usize) -> Vec<f64> {
    if len == 1 {
        return vec![1.0];
    }
    (0..len)
        .map(|k| 0.5 - 0.5 * (2.0 * PI * k as f64 / len as f64).cos())
        .collect()
}

/// Welch's averaged periodogram.
///
/// Hann window, 50% overlap, per-segment mean removal, density scaling,
/// one-sided spectrum. `segment_len` is capped at the signal length.
/// Returns `None` for an empty signal or zero segment length.
pub fn welch_psd(signal: &[f64], fs: f64, segment_len: usize) -> Option<Psd> {
    let n = signal.len();
    let nperseg = segment_len.min(n);
    if nperseg == 0 || !(fs > 0.0) {
        return None;
    }
    let noverlap = nperseg / 2;
    let step = nperseg - noverlap;
    let n_segments = (n - noverlap) / step;
    let n_bins = nperseg / 2 + 1;

    let window = hann_window(nperseg);
    let scale = 1.0 / (fs * window.iter().map(|w| w * w).sum::<f64>());

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(nperseg);
    let mut buffer = vec![Complex::new(0.0, 0.0); nperseg];
    let mut power = vec![0.0; n_bins];

    for s in 0..n_segments {
        let segment = &signal[s * step..s * step + nperseg];
        let mean = segment.iter().sum::<f64>() / nperseg as f64;
        for ((slot, &x), &w) in buffer.iter_mut().zip(segment).zip(&window) {
            *slot = Complex::new((x - mean) * w, 0.0);
        }
        fft.process(&mut buffer);
        for (acc, c) in power.iter_mut().zip(&buffer) {
            *acc += c.norm_sqr() * scale;
        }
    }

    // Fold negative frequencies; DC and (even length) Nyquist are unique.
    let fold_end = if nperseg % 2 == 0 { n_bins - 1 } else { n_bins };
    for p in power.iter_mut().take(fold_end).skip(1) {
        *p *= 2.0;
    }
    for p in power.iter_mut() {
        *p /= n_segments as f64;
    }

    let freqs = (0..n_bins).map(|k| k as f64 * fs / nperseg as f64).collect();
    Some(Psd { freqs, power })
}
