//! Domain error types.

use thiserror::Error;

/// Errors raised when an inventory price string cannot be read as a whole amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    /// No digits before the currency label.
    #[error("price {raw:?} has no numeric part")]
    Missing { raw: String },

    /// The amount carries a non-zero fractional part.
    #[error("price {raw:?} is not a whole number")]
    NotWhole { raw: String },

    /// The numeric part is not a plain decimal number.
    #[error("price {raw:?} is malformed")]
    Malformed { raw: String },

    /// The amount does not fit in 64 bits.
    #[error("price {raw:?} is out of range")]
    OutOfRange { raw: String },
}
