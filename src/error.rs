//! Error types.

use core::fmt;

/// Errors produced when decoding points or operating on byte-level scalars.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// Input is not a valid point encoding (bad tag, bad length, or a
    /// coordinate outside the field).
    Decode,

    /// Decoded coordinates do not satisfy the curve equation.
    NotOnCurve,

    /// A compressed x-coordinate has no square root, i.e. no point with
    /// this x-coordinate exists on the curve.
    NoSquareRoot,

    /// Scalar input is not exactly 32 bytes.
    InvalidScalarLength,

    /// The operation is undefined for the point at infinity.
    PointAtInfinity,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Decode => write!(f, "invalid point encoding"),
            Error::NotOnCurve => write!(f, "point not on curve"),
            Error::NoSquareRoot => write!(f, "no point with the given x-coordinate"),
            Error::InvalidScalarLength => write!(f, "scalar must be 32 bytes"),
            Error::PointAtInfinity => write!(f, "operation undefined at infinity"),
        }
    }
}

impl core::error::Error for Error {}

/// Result type with the crate-local [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
