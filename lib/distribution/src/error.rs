use thiserror::Error;

/// Errors raised by the distribution core.
///
/// Only invalid input can fail a computation; numeric underflow degrades to
/// `0.0` instead of being reported.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DistError {
    #[error("Invalid range: min ({min}) must be less than max ({max})")]
    InvalidRange { min: u64, max: u64 },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, DistError>;

/// Rejects rates that are not finite and strictly positive.
pub(crate) fn check_rate(rate: f64) -> Result<f64> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(DistError::InvalidParameter(format!(
            "rate must be positive and finite, got {rate}"
        )));
    }
    Ok(rate)
}

pub(crate) fn check_range(min: u64, max: u64) -> Result<()> {
    if min >= max {
        return Err(DistError::InvalidRange { min, max });
    }
    Ok(())
}
