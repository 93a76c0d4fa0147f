//! Spectral Repeater — Bandwidth Fill by Mix-and-Sum
//!
//! Fills a wide output bandwidth with frequency-shifted copies of a
//! narrowband complex baseband signal. Each input block is mixed to
//! `num_copies` evenly spaced carrier offsets and the shifted copies are
//! summed coherently, so a wideband transmitter can be driven with repeated
//! narrowband content. The block is a 1:1-rate transform: input and output
//! run at the same sample rate and every call produces exactly as many
//! samples as it consumes.
//!
//! ## Algorithm
//!
//! ```text
//! copies  = max(1, floor(output_bw / input_bw))
//! spacing = output_bw / copies
//! f_i     = -output_bw + i * spacing        for i in [0, copies)
//! y[k]    = sum_i  x[k] * exp(j * 2π * f_i * (cursor + k) / fs)
//! ```
//!
//! The sample cursor advances by the block length on every call, so the
//! mixers stay phase-continuous across block boundaries regardless of how
//! the host scheduler sizes its buffers.
//!
//! No gain normalization is applied by default: the summed output scales
//! linearly with the copy count. Enable [`SpectralRepeater::set_normalize`]
//! to divide the sum by the copy count instead.
//!
//! ## Example
//!
//! ```rust
//! use bwfill_core::spectral_repeater::SpectralRepeater;
//! use num_complex::Complex64;
//!
//! // Fill 4 kHz of output bandwidth with a 1 kHz-wide input at 16 kHz
//! let mut repeater = SpectralRepeater::new(1_000.0, 4_000.0, 16_000.0).unwrap();
//! assert_eq!(repeater.num_copies(), 4);
//!
//! let input = vec![Complex64::new(1.0, 0.0); 64];
//! let output = repeater.process(&input);
//! assert_eq!(output.len(), 64);
//! ```

use crate::config::RepeaterConfig;
use crate::types::{DspError, DspResult, IQBuffer, IQSample};
use num_complex::Complex64;
use std::f64::consts::PI;

/// Derived replication plan: how many copies to place and how far apart.
///
/// Always recomputed as a whole when a bandwidth changes, so a reader can
/// never observe a fresh bandwidth against a stale spacing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplicationPlan {
    /// Number of frequency-shifted copies (>= 1).
    pub num_copies: usize,
    /// Spacing between adjacent copies in Hz.
    pub shift_spacing: f64,
}

impl ReplicationPlan {
    /// Derive the plan from the configured bandwidths.
    ///
    /// `num_copies = max(1, floor(output_bw / input_bw))` and
    /// `shift_spacing = output_bw / num_copies`.
    pub fn derive(input_bw: f64, output_bw: f64) -> Self {
        let num_copies = ((output_bw / input_bw).floor() as usize).max(1);
        Self {
            num_copies,
            shift_spacing: output_bw / num_copies as f64,
        }
    }
}

/// Mix-and-sum bandwidth-fill block.
///
/// Owns the bandwidth configuration, the derived [`ReplicationPlan`], and the
/// running sample cursor. The cursor is the absolute index of the next
/// block's first sample; it advances monotonically and is never reset short
/// of recreating the block, which keeps the mixers phase-continuous for the
/// lifetime of the instance.
#[derive(Debug, Clone)]
pub struct SpectralRepeater {
    /// Bandwidth of the input signal in Hz.
    input_bw: f64,
    /// Target output bandwidth in Hz.
    output_bw: f64,
    /// Sample rate in Hz (equal on input and output).
    sample_rate: f64,
    /// Derived copy count and spacing.
    plan: ReplicationPlan,
    /// Absolute sample index of the next block's first sample.
    sample_idx: u64,
    /// Scale the summed block by 1/num_copies when set.
    normalize: bool,
}

impl Default for SpectralRepeater {
    /// Default configuration: 12 kHz of input filling 20 MHz of output
    /// bandwidth at unit sample rate.
    fn default() -> Self {
        Self {
            input_bw: 12e3,
            output_bw: 20e6,
            sample_rate: 1.0,
            plan: ReplicationPlan::derive(12e3, 20e6),
            sample_idx: 0,
            normalize: false,
        }
    }
}

impl SpectralRepeater {
    /// Create a new spectral repeater.
    ///
    /// * `input_bw` - bandwidth of the input signal in Hz
    /// * `output_bw` - target output bandwidth to fill in Hz
    /// * `sample_rate` - sample rate in Hz
    ///
    /// All three parameters must be strictly positive and finite; degenerate
    /// values are rejected here rather than surfacing later as NaN samples.
    pub fn new(input_bw: f64, output_bw: f64, sample_rate: f64) -> DspResult<Self> {
        if !(input_bw > 0.0) || !input_bw.is_finite() {
            return Err(DspError::InvalidBandwidth(input_bw));
        }
        if !(output_bw > 0.0) || !output_bw.is_finite() {
            return Err(DspError::InvalidBandwidth(output_bw));
        }
        if !(sample_rate > 0.0) || !sample_rate.is_finite() {
            return Err(DspError::InvalidSampleRate(sample_rate));
        }
        Ok(Self {
            input_bw,
            output_bw,
            sample_rate,
            plan: ReplicationPlan::derive(input_bw, output_bw),
            sample_idx: 0,
            normalize: false,
        })
    }

    /// Build a repeater from a [`RepeaterConfig`] section.
    pub fn from_config(config: &RepeaterConfig) -> DspResult<Self> {
        let mut repeater = Self::new(
            config.input_bandwidth,
            config.output_bandwidth,
            config.sample_rate,
        )?;
        repeater.normalize = config.normalize;
        Ok(repeater)
    }

    /// Mix-and-sum one block of samples.
    ///
    /// Returns an output block of the same length as the input and advances
    /// the sample cursor so successive calls remain phase-continuous.
    pub fn process(&mut self, input: &[IQSample]) -> IQBuffer {
        let mut output = vec![Complex64::new(0.0, 0.0); input.len()];
        self.process_into(input, &mut output);
        output
    }

    /// Mix-and-sum into a caller-provided output buffer.
    ///
    /// This is the host-scheduler form of the transform: the scheduler hands
    /// in an output buffer of matching length and expects the number of
    /// produced samples back, which for this 1:1-rate block always equals the
    /// input length. If `output` is shorter than `input`, only the leading
    /// `output.len()` samples are consumed and produced.
    pub fn process_into(&mut self, input: &[IQSample], output: &mut [IQSample]) -> usize {
        let n = input.len().min(output.len());
        let input = &input[..n];
        let output = &mut output[..n];

        for out in output.iter_mut() {
            *out = Complex64::new(0.0, 0.0);
        }

        // Time vector for the whole block, anchored at the current cursor.
        let t: Vec<f64> = (0..n as u64)
            .map(|k| (self.sample_idx + k) as f64 / self.sample_rate)
            .collect();

        let ReplicationPlan {
            num_copies,
            shift_spacing,
        } = self.plan;

        for i in 0..num_copies {
            // The first copy sits a full output bandwidth below baseband.
            let freq_shift = -self.output_bw + i as f64 * shift_spacing;
            let omega = 2.0 * PI * freq_shift;
            for ((out, &x), &tk) in output.iter_mut().zip(input).zip(&t) {
                *out += x * Complex64::from_polar(1.0, omega * tk);
            }
        }

        if self.normalize {
            let scale = 1.0 / num_copies as f64;
            for out in output.iter_mut() {
                *out *= scale;
            }
        }

        self.sample_idx += n as u64;
        n
    }

    /// Update the input bandwidth and re-derive the replication plan.
    ///
    /// Non-positive or non-finite values are ignored and leave the
    /// configuration untouched. Returns `true` if the update was applied.
    pub fn set_input_bandwidth(&mut self, input_bw: f64) -> bool {
        if !(input_bw > 0.0) || !input_bw.is_finite() {
            return false;
        }
        self.input_bw = input_bw;
        self.plan = ReplicationPlan::derive(self.input_bw, self.output_bw);
        tracing::info!(
            input_bw_hz = self.input_bw,
            num_copies = self.plan.num_copies,
            shift_spacing_hz = self.plan.shift_spacing,
            "input bandwidth updated"
        );
        true
    }

    /// Update the output bandwidth under the same guard and derivation rule
    /// as [`SpectralRepeater::set_input_bandwidth`].
    pub fn set_output_bandwidth(&mut self, output_bw: f64) -> bool {
        if !(output_bw > 0.0) || !output_bw.is_finite() {
            return false;
        }
        self.output_bw = output_bw;
        self.plan = ReplicationPlan::derive(self.input_bw, self.output_bw);
        tracing::info!(
            output_bw_hz = self.output_bw,
            num_copies = self.plan.num_copies,
            shift_spacing_hz = self.plan.shift_spacing,
            "output bandwidth updated"
        );
        true
    }

    /// Enable or disable power normalization of the summed block.
    pub fn set_normalize(&mut self, normalize: bool) {
        self.normalize = normalize;
    }

    /// Whether power normalization is enabled.
    pub fn normalize(&self) -> bool {
        self.normalize
    }

    /// Get the input bandwidth in Hz.
    pub fn input_bandwidth(&self) -> f64 {
        self.input_bw
    }

    /// Get the output bandwidth in Hz.
    pub fn output_bandwidth(&self) -> f64 {
        self.output_bw
    }

    /// Get the sample rate in Hz.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Get the current replication plan.
    pub fn plan(&self) -> ReplicationPlan {
        self.plan
    }

    /// Number of frequency-shifted copies placed across the output bandwidth.
    pub fn num_copies(&self) -> usize {
        self.plan.num_copies
    }

    /// Spacing between adjacent copies in Hz.
    pub fn shift_spacing(&self) -> f64 {
        self.plan.shift_spacing
    }

    /// Absolute sample index of the next block's first sample.
    pub fn sample_index(&self) -> u64 {
        self.sample_idx
    }
}

/// Fill a block with frequency-shifted copies (one-shot, cursor starts at 0).
pub fn fill_spectrum(
    input: &[IQSample],
    input_bw: f64,
    output_bw: f64,
    sample_rate: f64,
) -> DspResult<IQBuffer> {
    let mut repeater = SpectralRepeater::new(input_bw, output_bw, sample_rate)?;
    Ok(repeater.process(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: a repeater placing 4 copies at -4, -3, -2, -1 kHz.
    fn four_copy_repeater() -> SpectralRepeater {
        SpectralRepeater::new(1_000.0, 4_000.0, 16_000.0).unwrap()
    }

    /// Helper: correlate a signal against a complex exponential at `freq_hz`.
    fn correlate_tone(signal: &[IQSample], freq_hz: f64, sample_rate: f64) -> f64 {
        let mut sum = Complex64::new(0.0, 0.0);
        for (k, &s) in signal.iter().enumerate() {
            let angle = 2.0 * PI * freq_hz * k as f64 / sample_rate;
            sum += s * Complex64::from_polar(1.0, -angle);
        }
        sum.norm()
    }

    #[test]
    fn test_copy_count_formula() {
        let repeater = SpectralRepeater::new(12e3, 20e6, 1.0).unwrap();
        assert_eq!(repeater.num_copies(), 1666);
        assert_eq!(repeater.shift_spacing(), 20e6 / 1666.0);
    }

    #[test]
    fn test_copy_count_is_at_least_one() {
        // Input wider than the output bandwidth still yields one copy.
        let repeater = SpectralRepeater::new(8_000.0, 1_000.0, 48_000.0).unwrap();
        assert_eq!(repeater.num_copies(), 1);
        assert_eq!(repeater.shift_spacing(), 1_000.0);
    }

    #[test]
    fn test_spacing_is_exact() {
        let plan = ReplicationPlan::derive(1_000.0, 4_000.0);
        assert_eq!(plan.num_copies, 4);
        assert_eq!(plan.shift_spacing, 1_000.0);
    }

    #[test]
    fn test_default_configuration() {
        let repeater = SpectralRepeater::default();
        assert_eq!(repeater.input_bandwidth(), 12e3);
        assert_eq!(repeater.output_bandwidth(), 20e6);
        assert_eq!(repeater.sample_rate(), 1.0);
        assert_eq!(repeater.num_copies(), 1666);
        assert_eq!(repeater.sample_index(), 0);
        assert!(!repeater.normalize());
    }

    #[test]
    fn test_construction_rejects_degenerate_parameters() {
        assert!(matches!(
            SpectralRepeater::new(0.0, 20e6, 1.0),
            Err(DspError::InvalidBandwidth(_))
        ));
        assert!(matches!(
            SpectralRepeater::new(12e3, -1.0, 1.0),
            Err(DspError::InvalidBandwidth(_))
        ));
        assert!(matches!(
            SpectralRepeater::new(12e3, 20e6, 0.0),
            Err(DspError::InvalidSampleRate(_))
        ));
        assert!(matches!(
            SpectralRepeater::new(f64::NAN, 20e6, 1.0),
            Err(DspError::InvalidBandwidth(_))
        ));
        assert!(matches!(
            SpectralRepeater::new(12e3, 20e6, f64::INFINITY),
            Err(DspError::InvalidSampleRate(_))
        ));
    }

    #[test]
    fn test_length_preservation() {
        let mut repeater = four_copy_repeater();
        for n in [0, 1, 7, 64, 1000] {
            let input = vec![Complex64::new(0.3, -0.7); n];
            let output = repeater.process(&input);
            assert_eq!(output.len(), n);
        }
    }

    #[test]
    fn test_cursor_advances_by_block_length() {
        let mut repeater = four_copy_repeater();
        assert_eq!(repeater.sample_index(), 0);
        repeater.process(&vec![Complex64::new(1.0, 0.0); 7]);
        assert_eq!(repeater.sample_index(), 7);
        repeater.process(&[]);
        assert_eq!(repeater.sample_index(), 7);
        repeater.process(&vec![Complex64::new(1.0, 0.0); 64]);
        assert_eq!(repeater.sample_index(), 71);
    }

    #[test]
    fn test_phase_continuity_across_blocks() {
        let input: Vec<IQSample> = (0..128)
            .map(|k| {
                let angle = 2.0 * PI * 500.0 * k as f64 / 16_000.0;
                Complex64::from_polar(0.8, angle)
            })
            .collect();

        // One block vs. the same samples split across two calls.
        let mut one = four_copy_repeater();
        let whole = one.process(&input);

        let mut two = four_copy_repeater();
        let first = two.process(&input[..64]);
        let second = two.process(&input[64..]);

        for k in 0..64 {
            assert!(
                (whole[k] - first[k]).norm() < 1e-12,
                "Discontinuity at sample {} (first half)",
                k
            );
            assert!(
                (whole[64 + k] - second[k]).norm() < 1e-12,
                "Discontinuity at sample {} (second half)",
                k
            );
        }
    }

    #[test]
    fn test_single_copy_identity() {
        // With one copy the block is a pure mixer at -output_bw.
        let mut repeater = SpectralRepeater::new(2_000.0, 1_000.0, 8_000.0).unwrap();
        assert_eq!(repeater.num_copies(), 1);

        let input: Vec<IQSample> = (0..64)
            .map(|k| Complex64::new((k as f64 * 0.3).cos(), (k as f64 * 0.2).sin()))
            .collect();
        let output = repeater.process(&input);

        for (k, (&x, &y)) in input.iter().zip(output.iter()).enumerate() {
            // Magnitude is preserved exactly: no energy scaling with one copy.
            assert!(
                (x.norm() - y.norm()).abs() < 1e-12,
                "Magnitude changed at sample {}: {} -> {}",
                k,
                x.norm(),
                y.norm()
            );
            let t = k as f64 / 8_000.0;
            let expected = x * Complex64::from_polar(1.0, 2.0 * PI * -1_000.0 * t);
            assert!(
                (y - expected).norm() < 1e-12,
                "Mixer mismatch at sample {}",
                k
            );
        }
    }

    #[test]
    fn test_invalid_update_is_rejected() {
        let mut repeater = four_copy_repeater();
        let plan = repeater.plan();

        assert!(!repeater.set_input_bandwidth(0.0));
        assert!(!repeater.set_input_bandwidth(-5.0));
        assert!(!repeater.set_input_bandwidth(f64::NAN));
        assert!(!repeater.set_output_bandwidth(0.0));

        assert_eq!(repeater.plan(), plan);
        assert_eq!(repeater.input_bandwidth(), 1_000.0);
        assert_eq!(repeater.output_bandwidth(), 4_000.0);
    }

    #[test]
    fn test_update_rederives_plan() {
        let mut repeater = four_copy_repeater();
        assert!(repeater.set_input_bandwidth(2_000.0));
        assert_eq!(repeater.num_copies(), 2);
        assert_eq!(repeater.shift_spacing(), 2_000.0);

        assert!(repeater.set_output_bandwidth(8_000.0));
        assert_eq!(repeater.num_copies(), 4);
        assert_eq!(repeater.shift_spacing(), 2_000.0);
    }

    #[test]
    fn test_linearity_in_amplitude() {
        let input: Vec<IQSample> = (0..48)
            .map(|k| Complex64::new((k as f64 * 0.7).sin(), (k as f64 * 0.4).cos()))
            .collect();
        let scaled: Vec<IQSample> = input.iter().map(|&x| x * 3.5).collect();

        let mut a = four_copy_repeater();
        let mut b = four_copy_repeater();
        let out = a.process(&input);
        let out_scaled = b.process(&scaled);

        for k in 0..input.len() {
            assert!(
                (out_scaled[k] - out[k] * 3.5).norm() < 1e-9,
                "Linearity violated at sample {}",
                k
            );
        }
    }

    #[test]
    fn test_coherent_sum_at_cursor_zero() {
        // At t = 0 every mixer is exactly 1, so the first output sample of a
        // fresh block is the input times the copy count.
        let mut repeater = four_copy_repeater();
        let input = vec![Complex64::new(1.0, 0.0); 16];
        let output = repeater.process(&input);
        assert!((output[0].re - 4.0).abs() < 1e-12);
        assert!(output[0].im.abs() < 1e-12);
    }

    #[test]
    fn test_energy_scales_with_copy_count() {
        // Copies land on orthogonal DFT bins for this configuration, so the
        // summed energy is num_copies times the input energy.
        let mut repeater = four_copy_repeater();
        let input = vec![Complex64::new(1.0, 0.0); 256];
        let output = repeater.process(&input);

        let energy_in: f64 = input.iter().map(|s| s.norm_sqr()).sum();
        let energy_out: f64 = output.iter().map(|s| s.norm_sqr()).sum();
        assert!(
            (energy_out / energy_in - 4.0).abs() < 1e-9,
            "Energy ratio {} != copy count",
            energy_out / energy_in
        );
    }

    #[test]
    fn test_normalization_option() {
        let mut repeater = four_copy_repeater();
        repeater.set_normalize(true);
        assert!(repeater.normalize());

        let input = vec![Complex64::new(1.0, 0.0); 16];
        let output = repeater.process(&input);
        // The coherent sum at t = 0 collapses back to unit amplitude.
        assert!((output[0].re - 1.0).abs() < 1e-12);
        assert!(output[0].im.abs() < 1e-12);
    }

    #[test]
    fn test_copies_land_on_expected_frequencies() {
        // DC input -> pure tones at -output_bw + i * spacing.
        let mut repeater = four_copy_repeater();
        let input = vec![Complex64::new(1.0, 0.0); 256];
        let output = repeater.process(&input);

        for i in 0..4 {
            let freq = -4_000.0 + i as f64 * 1_000.0;
            let corr = correlate_tone(&output, freq, 16_000.0);
            assert!(
                corr > 255.9,
                "Expected a copy at {} Hz, correlation {}",
                freq,
                corr
            );
        }
        // Nothing above baseband and nothing at the unshifted frequency.
        for freq in [0.0, 1_000.0, 2_000.0] {
            let corr = correlate_tone(&output, freq, 16_000.0);
            assert!(corr < 1e-6, "Unexpected energy at {} Hz: {}", freq, corr);
        }
    }

    #[test]
    fn test_process_into_matches_process() {
        let input: Vec<IQSample> = (0..33)
            .map(|k| Complex64::new((k as f64 * 0.9).cos(), -(k as f64 * 0.5).sin()))
            .collect();

        let mut a = four_copy_repeater();
        let mut b = four_copy_repeater();

        let out = a.process(&input);
        let mut buf = vec![Complex64::new(0.0, 0.0); input.len()];
        let produced = b.process_into(&input, &mut buf);

        assert_eq!(produced, input.len());
        for k in 0..input.len() {
            assert!((out[k] - buf[k]).norm() < 1e-12);
        }
    }

    #[test]
    fn test_from_config() {
        let config = RepeaterConfig {
            input_bandwidth: 1_000.0,
            output_bandwidth: 4_000.0,
            sample_rate: 16_000.0,
            normalize: true,
        };
        let repeater = SpectralRepeater::from_config(&config).unwrap();
        assert_eq!(repeater.num_copies(), 4);
        assert!(repeater.normalize());

        let bad = RepeaterConfig {
            sample_rate: 0.0,
            ..RepeaterConfig::default()
        };
        assert!(SpectralRepeater::from_config(&bad).is_err());
    }

    #[test]
    fn test_one_shot() {
        let input = vec![Complex64::new(1.0, 0.0); 32];
        let output = fill_spectrum(&input, 1_000.0, 4_000.0, 16_000.0).unwrap();

        let mut repeater = four_copy_repeater();
        let expected = repeater.process(&input);
        for k in 0..input.len() {
            assert!((output[k] - expected[k]).norm() < 1e-12);
        }
    }
}
