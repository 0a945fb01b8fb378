//! Affine points and SEC1 point encodings.

use super::FieldElement;
use crate::{Error, Result};
use core::ops::Neg;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

/// SEC1 tag for the point at infinity.
const TAG_IDENTITY: u8 = 0x00;

/// SEC1 tag for a compressed point with even y.
const TAG_COMPRESSED_EVEN: u8 = 0x02;

/// SEC1 tag for a compressed point with odd y.
const TAG_COMPRESSED_ODD: u8 = 0x03;

/// SEC1 tag for an uncompressed point.
const TAG_UNCOMPRESSED: u8 = 0x04;

/// a = -3 in the curve equation y² = x³ + ax + b.
#[rustfmt::skip]
pub(super) const CURVE_EQUATION_A: FieldElement = FieldElement::from_bytes_unchecked(&[
    0xff, 0xff, 0xff, 0xfe, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x00,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfc,
]);

/// b in the curve equation y² = x³ + ax + b.
#[rustfmt::skip]
pub(super) const CURVE_EQUATION_B: FieldElement = FieldElement::from_bytes_unchecked(&[
    0x28, 0xe9, 0xfa, 0x9e, 0x9d, 0x9f, 0x5e, 0x34,
    0x4d, 0x5a, 0x9e, 0x4b, 0xcf, 0x65, 0x09, 0xa7,
    0xf3, 0x97, 0x89, 0xf5, 0x15, 0xab, 0x8f, 0x92,
    0xdd, 0xbc, 0xbd, 0x41, 0x4d, 0x94, 0x0e, 0x93,
]);

/// x-coordinate of the generator.
#[rustfmt::skip]
const GENERATOR_X: FieldElement = FieldElement::from_bytes_unchecked(&[
    0x32, 0xc4, 0xae, 0x2c, 0x1f, 0x19, 0x81, 0x19,
    0x5f, 0x99, 0x04, 0x46, 0x6a, 0x39, 0xc9, 0x94,
    0x8f, 0xe3, 0x0b, 0xbf, 0xf2, 0x66, 0x0b, 0xe1,
    0x71, 0x5a, 0x45, 0x89, 0x33, 0x4c, 0x74, 0xc7,
]);

/// y-coordinate of the generator.
#[rustfmt::skip]
const GENERATOR_Y: FieldElement = FieldElement::from_bytes_unchecked(&[
    0xbc, 0x37, 0x36, 0xa2, 0xf4, 0xf6, 0x77, 0x9c,
    0x59, 0xbd, 0xce, 0xe3, 0x6b, 0x69, 0x21, 0x53,
    0xd0, 0xa9, 0x87, 0x7c, 0xc6, 0x2a, 0x47, 0x40,
    0x02, 0xdf, 0x32, 0xe5, 0x21, 0x39, 0xf0, 0xa0,
]);

/// Right-hand side of the curve equation: x³ + ax + b.
pub(super) fn curve_equation_rhs(x: &FieldElement) -> FieldElement {
    (x.square() + CURVE_EQUATION_A) * x + CURVE_EQUATION_B
}

/// A point on the SM2 curve in affine coordinates.
///
/// The point at infinity has no affine coordinates; it is represented by
/// the sentinel (0, 0), which does not satisfy the curve equation and so
/// cannot collide with a real point.
#[derive(Clone, Copy, Debug)]
pub struct AffinePoint {
    /// x-coordinate.
    pub(crate) x: FieldElement,

    /// y-coordinate.
    pub(crate) y: FieldElement,
}

impl AffinePoint {
    /// Sentinel for the additive identity (the point at infinity).
    pub const IDENTITY: Self = Self {
        x: FieldElement::ZERO,
        y: FieldElement::ZERO,
    };

    /// Base point of the SM2 curve.
    pub const GENERATOR: Self = Self {
        x: GENERATOR_X,
        y: GENERATOR_Y,
    };

    /// Is this the sentinel for the point at infinity?
    pub fn is_identity(&self) -> Choice {
        self.x.is_zero() & self.y.is_zero()
    }

    /// Decodes an affine point from its SEC1 encoding: `[0x00]` for the
    /// identity, `0x04 || x || y` for uncompressed and `0x02/0x03 || x`
    /// for compressed points.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (&tag, body) = bytes.split_first().ok_or(Error::Decode)?;

        match (tag, body.len()) {
            (TAG_IDENTITY, 0) => Ok(Self::IDENTITY),
            (TAG_UNCOMPRESSED, 64) => {
                let (x_bytes, y_bytes) = body.split_at(32);
                let x = decode_coordinate(x_bytes)?;
                let y = decode_coordinate(y_bytes)?;

                if y.square() != curve_equation_rhs(&x) {
                    return Err(Error::NotOnCurve);
                }

                Ok(Self { x, y })
            }
            (TAG_COMPRESSED_EVEN | TAG_COMPRESSED_ODD, 32) => {
                let x = decode_coordinate(body)?;
                let beta = Option::<FieldElement>::from(curve_equation_rhs(&x).sqrt())
                    .ok_or(Error::NoSquareRoot)?;

                let y_is_odd = Choice::from(tag & 1);
                let y = FieldElement::conditional_select(
                    &beta,
                    &-beta,
                    beta.is_odd() ^ y_is_odd,
                );

                Ok(Self { x, y })
            }
            _ => Err(Error::Decode),
        }
    }

    /// Returns the SEC1 encoding of this point.
    pub fn to_encoded_point(&self, compress: bool) -> EncodedPoint {
        if self.is_identity().into() {
            EncodedPoint::identity()
        } else if compress {
            EncodedPoint::compressed(&self.x.to_bytes(), self.y.is_odd())
        } else {
            EncodedPoint::uncompressed(&self.x.to_bytes(), &self.y.to_bytes())
        }
    }
}

/// Decodes a canonical (< p) big-endian field element from a 32-byte slice.
fn decode_coordinate(bytes: &[u8]) -> Result<FieldElement> {
    let bytes: [u8; 32] = bytes.try_into().map_err(|_| Error::Decode)?;
    Option::from(FieldElement::from_bytes(&bytes)).ok_or(Error::Decode)
}

impl ConditionallySelectable for AffinePoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
        }
    }
}

impl ConstantTimeEq for AffinePoint {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.x.ct_eq(&other.x) & self.y.ct_eq(&other.y)
    }
}

impl PartialEq for AffinePoint {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for AffinePoint {}

impl Default for AffinePoint {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Neg for AffinePoint {
    type Output = AffinePoint;

    fn neg(self) -> AffinePoint {
        AffinePoint {
            x: self.x,
            y: -self.y,
        }
    }
}

impl Neg for &AffinePoint {
    type Output = AffinePoint;

    fn neg(self) -> AffinePoint {
        -*self
    }
}

/// A SEC1 point encoding: a single `0x00` byte for the identity, 33 bytes
/// for a compressed point, 65 bytes for an uncompressed point.
#[derive(Clone, Copy, Debug)]
pub struct EncodedPoint {
    bytes: [u8; 65],
    len: usize,
}

impl EncodedPoint {
    /// Encoding of the point at infinity.
    pub fn identity() -> Self {
        Self {
            bytes: [0u8; 65],
            len: 1,
        }
    }

    /// Uncompressed encoding from coordinate bytes.
    fn uncompressed(x: &[u8; 32], y: &[u8; 32]) -> Self {
        let mut bytes = [0u8; 65];
        bytes[0] = TAG_UNCOMPRESSED;
        bytes[1..33].copy_from_slice(x);
        bytes[33..65].copy_from_slice(y);
        Self { bytes, len: 65 }
    }

    /// Compressed encoding from the x-coordinate and the parity of y.
    fn compressed(x: &[u8; 32], y_is_odd: Choice) -> Self {
        let mut bytes = [0u8; 65];
        bytes[0] = u8::conditional_select(&TAG_COMPRESSED_EVEN, &TAG_COMPRESSED_ODD, y_is_odd);
        bytes[1..33].copy_from_slice(x);
        Self { bytes, len: 33 }
    }

    /// The SEC1 tag byte.
    pub fn tag(&self) -> u8 {
        self.bytes[0]
    }

    /// Does this encode the point at infinity?
    pub fn is_identity(&self) -> bool {
        self.tag() == TAG_IDENTITY
    }

    /// Encoding length in bytes (1, 33 or 65).
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; even the identity occupies one byte.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

impl AsRef<[u8]> for EncodedPoint {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl PartialEq for EncodedPoint {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for EncodedPoint {}
