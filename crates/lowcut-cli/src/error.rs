//! Error types for the lowcut CLI.

use lowcut_core::{DesignError, MAX_ORDER};

/// Errors raised while validating arguments or moving audio in and out.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Output bit depth other than 16, 24 or 32.
    #[error("unsupported bit depth {0} (expected 16, 24 or 32)")]
    UnsupportedBitDepth(u16),

    /// Filter order the designer cannot build.
    #[error("invalid filter order {0} (expected even, 2..={max})", max = MAX_ORDER)]
    InvalidOrder(usize),

    /// Block size of zero.
    #[error("block size must be at least 1")]
    InvalidBlockSize,

    /// Too few points for a response sweep.
    #[error("response needs at least 2 points, got {0}")]
    TooFewPoints(usize),

    /// The clamped parameters still do not design at this sample rate.
    #[error("filter design failed: {0}")]
    Design(#[from] DesignError),
}

/// Convenience result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Checks an order against the designer's range.
pub fn validate_order(order: usize) -> Result<usize> {
    if order == 0 || order % 2 != 0 || order > MAX_ORDER {
        return Err(CliError::InvalidOrder(order));
    }
    Ok(order)
}
