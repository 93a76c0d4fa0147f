//! Core types for bandwidth-fill signal processing
//!
//! Complex I/Q samples are the unit of input and output everywhere in this
//! crate. A sample carries both amplitude and phase:
//!
//! ```text
//!            Q (Imaginary)
//!            ^
//!            |     * (I=0.7, Q=0.7)
//!            |    /
//!            |   / magnitude = 1.0
//!            |  /  phase = 45°
//!            | /
//!   ---------+---------> I (Real)
//!            |
//! ```

use num_complex::Complex64;

/// Type alias for complex numbers using f64 precision
pub type Complex = Complex64;

/// A single I/Q sample point
pub type IQSample = Complex64;

/// A buffer of I/Q samples
pub type IQBuffer = Vec<IQSample>;

/// Result type for DSP operations
pub type DspResult<T> = Result<T, DspError>;

/// Errors that can occur during DSP operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum DspError {
    #[error("Invalid bandwidth: {0} Hz. Must be positive and finite")]
    InvalidBandwidth(f64),

    #[error("Invalid sample rate: {0} Hz. Must be positive and finite")]
    InvalidSampleRate(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DspError::InvalidBandwidth(-12.0);
        assert!(err.to_string().contains("-12"));
        let err = DspError::InvalidSampleRate(0.0);
        assert!(err.to_string().contains("sample rate"));
    }
}
