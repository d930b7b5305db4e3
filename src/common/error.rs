use thiserror::Error;

use super::metadata::ECLevel;

// Error
//------------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq, Copy, Clone)]
pub enum QRError {
    // QR builder
    #[error("data too long: {len} bits exceed the capacity of {capacity} bits")]
    DataTooLong { len: usize, capacity: usize },
    #[error("invalid version")]
    InvalidVersion,
    #[error("invalid masking pattern")]
    InvalidMaskingPattern,
    #[error("invalid character for the requested encoding")]
    InvalidChar,
    #[error("no block table for version {version} at error correction level {ec_level:?}")]
    InvalidTable { version: usize, ec_level: ECLevel },

    // Galois field
    #[error("log of {0} is undefined in GF(256)")]
    MathDomain(u8),

    // QR symbol
    #[error("module ({row}, {col}) is outside a {width}x{width} symbol")]
    IndexOutOfRange { row: i32, col: i32, width: usize },
}

pub type QRResult<T> = Result<T, QRError>;
