//! # Bandwidth-Fill DSP Library
//!
//! This crate provides the core Digital Signal Processing (DSP) block for
//! filling a wide output bandwidth with frequency-shifted copies of a
//! narrowband complex baseband signal, e.g. to drive a wideband transmitter
//! with repeated narrowband content spread across multiple sub-channels.
//!
//! ## Overview
//!
//! The [`spectral_repeater::SpectralRepeater`] derives a replication plan
//! (copy count and spacing) from the configured bandwidths, then mixes each
//! input block to every planned carrier offset and sums the copies
//! coherently. A running sample cursor keeps the mixers phase-continuous
//! across block boundaries, whatever block sizes the host scheduler picks.
//!
//! ## Signal Flow
//!
//! ```text
//! narrowband IQ ──► Spectral Repeater ──► wideband IQ
//!                   (N mixers at
//!                    -output_bw + i*spacing,
//!                    coherent sum)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use bwfill_core::prelude::*;
//!
//! // Place 4 copies of a 1 kHz-wide signal across 4 kHz at 16 kHz sample rate
//! let mut repeater = SpectralRepeater::new(1_000.0, 4_000.0, 16_000.0).unwrap();
//! assert_eq!(repeater.num_copies(), 4);
//! assert_eq!(repeater.shift_spacing(), 1_000.0);
//!
//! let input = vec![IQSample::new(1.0, 0.0); 256];
//! let output = repeater.process(&input);
//! assert_eq!(output.len(), input.len());
//!
//! // The plan follows bandwidth updates
//! repeater.set_input_bandwidth(2_000.0);
//! assert_eq!(repeater.num_copies(), 2);
//! ```

pub mod config;
pub mod observe;
pub mod spectral_repeater;
pub mod types;

pub mod prelude {
    pub use crate::config::{FillConfig, RepeaterConfig};
    pub use crate::observe::{init_logging, LogConfig};
    pub use crate::spectral_repeater::{fill_spectrum, ReplicationPlan, SpectralRepeater};
    pub use crate::types::{Complex, DspError, DspResult, IQBuffer, IQSample};
}
