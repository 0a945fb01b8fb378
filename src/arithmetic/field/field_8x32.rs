//! Field arithmetic modulo p = 2^256 − 2^224 − 2^96 + 2^64 − 1 (32-bit limbs).
//!
//! Portable backend for targets without a fast 64x64 multiplier.

use crate::arithmetic::util::{adc32, mac32, sbb32};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

const fn bytes_to_words(b: &[u8; 32]) -> [u32; 8] {
    let mut w = [0u32; 8];
    let mut i = 0;
    while i < 8 {
        let j = 32 - 4 * (i + 1);
        w[i] = ((b[j] as u32) << 24)
            | ((b[j + 1] as u32) << 16)
            | ((b[j + 2] as u32) << 8)
            | (b[j + 3] as u32);
        i += 1;
    }
    w
}

/// Constant representing the modulus
/// p = 2^256 − 2^224 − 2^96 + 2^64 − 1
const MODULUS: FieldElement8x32 = FieldElement8x32([
    0xFFFF_FFFF,
    0xFFFF_FFFF,
    0x0000_0000,
    0xFFFF_FFFF,
    0xFFFF_FFFF,
    0xFFFF_FFFF,
    0xFFFF_FFFF,
    0xFFFF_FFFE,
]);

/// R = 2^256 mod p
const R: FieldElement8x32 = FieldElement8x32([
    0x0000_0001,
    0x0000_0000,
    0xFFFF_FFFF,
    0x0000_0000,
    0x0000_0000,
    0x0000_0000,
    0x0000_0000,
    0x0000_0001,
]);

/// R^2 = 2^512 mod p
const R2: FieldElement8x32 = FieldElement8x32([
    0x0000_0003,
    0x0000_0002,
    0xFFFF_FFFF,
    0x0000_0002,
    0x0000_0001,
    0x0000_0001,
    0x0000_0002,
    0x0000_0004,
]);

/// INV = -(p^-1 mod 2^32) mod 2^32
const INV: u32 = 1;

/// An element in the finite field modulo p.
// Eight little-endian 32-bit limbs in Montgomery form, always fully reduced.
#[derive(Clone, Copy, Debug)]
pub struct FieldElement8x32(pub(crate) [u32; 8]);

impl FieldElement8x32 {
    /// Zero element.
    pub const ZERO: Self = Self([0; 8]);

    /// Multiplicative identity.
    pub const ONE: Self = R;

    pub(crate) const fn from_bytes_unchecked(bytes: &[u8; 32]) -> Self {
        Self(bytes_to_words(bytes)).mul(&R2)
    }

    /// Attempts to parse the given byte array as a big-endian field element.
    ///
    /// Returns None if the byte array does not contain an integer in the
    /// range `[0, p)`.
    pub fn from_bytes(bytes: &[u8; 32]) -> CtOption<Self> {
        let words = bytes_to_words(bytes);

        let mut borrow = 0;
        let mut i = 0;
        while i < 8 {
            let (_, b) = sbb32(words[i], MODULUS.0[i], borrow);
            borrow = b;
            i += 1;
        }
        let is_some = (borrow as u8) & 1;

        CtOption::new(Self(words).mul(&R2), Choice::from(is_some))
    }

    /// Parses the given byte array as a big-endian integer and reduces it
    /// modulo p with a single conditional subtraction (valid as p > 2^255).
    pub const fn from_bytes_reduced(bytes: &[u8; 32]) -> Self {
        let w = bytes_to_words(bytes);
        Self::sub_inner(w, 0, MODULUS.0, 0).mul(&R2)
    }

    /// Returns the big-endian encoding of this field element.
    pub fn to_bytes(self) -> [u8; 32] {
        let mut t = [0u32; 16];
        t[..8].copy_from_slice(&self.0);
        let res = Self::montgomery_reduce(&t);
        let mut ret = [0u8; 32];
        for i in 0..8 {
            ret[4 * i..4 * (i + 1)].copy_from_slice(&res.0[7 - i].to_be_bytes());
        }
        ret
    }

    /// Determine if this field element is zero.
    pub fn is_zero(&self) -> Choice {
        self.ct_eq(&Self::ZERO)
    }

    /// Determine if this field element is odd: `self mod 2 == 1`.
    pub fn is_odd(&self) -> Choice {
        let bytes = self.to_bytes();
        (bytes[31] & 1).into()
    }

    /// Returns self + rhs mod p.
    pub const fn add(&self, rhs: &Self) -> Self {
        let mut w = [0u32; 8];
        let mut carry = 0;
        let mut i = 0;
        while i < 8 {
            let (wi, c) = adc32(self.0[i], rhs.0[i], carry);
            w[i] = wi;
            carry = c;
            i += 1;
        }

        Self::sub_inner(w, carry, MODULUS.0, 0)
    }

    /// Returns 2 * self mod p.
    pub const fn double(&self) -> Self {
        self.add(self)
    }

    /// Returns self - rhs mod p.
    pub const fn subtract(&self, rhs: &Self) -> Self {
        Self::sub_inner(self.0, 0, rhs.0, 0)
    }

    /// Returns -self mod p.
    pub const fn neg(&self) -> Self {
        Self::ZERO.subtract(self)
    }

    #[inline]
    const fn sub_inner(l: [u32; 8], l8: u32, r: [u32; 8], r8: u32) -> Self {
        let mut w = [0u32; 8];
        let mut borrow = 0;
        let mut i = 0;
        while i < 8 {
            let (wi, b) = sbb32(l[i], r[i], borrow);
            w[i] = wi;
            borrow = b;
            i += 1;
        }
        let (_, borrow) = sbb32(l8, r8, borrow);

        // If underflow occurred on the final limb, borrow is an all-ones
        // mask; conditionally add the modulus back.
        let mut carry = 0;
        let mut i = 0;
        while i < 8 {
            let (wi, c) = adc32(w[i], MODULUS.0[i] & borrow, carry);
            w[i] = wi;
            carry = c;
            i += 1;
        }

        Self(w)
    }

    /// Montgomery reduction of a 512-bit product.
    ///
    /// References:
    /// - Handbook of Applied Cryptography, Chapter 14
    ///   Algorithm 14.32
    ///   http://cacr.uwaterloo.ca/hac/about/chap14.pdf
    #[inline]
    const fn montgomery_reduce(t: &[u32; 16]) -> Self {
        let mut r = *t;
        let mut carry2 = 0;

        let mut i = 0;
        while i < 8 {
            let k = r[i].wrapping_mul(INV);
            let (_, mut carry) = mac32(r[i], k, MODULUS.0[0], 0);
            let mut j = 1;
            while j < 8 {
                let (w, c) = mac32(r[i + j], k, MODULUS.0[j], carry);
                r[i + j] = w;
                carry = c;
                j += 1;
            }
            let (w, c) = adc32(r[i + 8], carry2, carry);
            r[i + 8] = w;
            carry2 = c;
            i += 1;
        }

        // Result may be within MODULUS of the correct value
        let hi = [r[8], r[9], r[10], r[11], r[12], r[13], r[14], r[15]];
        Self::sub_inner(hi, carry2, MODULUS.0, 0)
    }

    /// Returns self * rhs mod p.
    pub const fn mul(&self, rhs: &Self) -> Self {
        // Schoolbook 8x8 product, then a Montgomery reduction of the
        // 512-bit result.
        let mut t = [0u32; 16];
        let mut i = 0;
        while i < 8 {
            let mut carry = 0;
            let mut j = 0;
            while j < 8 {
                let (w, c) = mac32(t[i + j], self.0[i], rhs.0[j], carry);
                t[i + j] = w;
                carry = c;
                j += 1;
            }
            t[i + 8] = carry;
            i += 1;
        }

        Self::montgomery_reduce(&t)
    }

    /// Returns self * self mod p.
    pub const fn square(&self) -> Self {
        self.mul(self)
    }
}

impl ConditionallySelectable for FieldElement8x32 {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut limbs = [0u32; 8];
        for (i, limb) in limbs.iter_mut().enumerate() {
            *limb = u32::conditional_select(&a.0[i], &b.0[i], choice);
        }
        Self(limbs)
    }
}

impl ConstantTimeEq for FieldElement8x32 {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0
            .iter()
            .zip(other.0.iter())
            .fold(Choice::from(1), |acc, (a, b)| acc & a.ct_eq(b))
    }
}

impl Default for FieldElement8x32 {
    fn default() -> Self {
        Self::ZERO
    }
}

#[cfg(feature = "zeroize")]
impl Zeroize for FieldElement8x32 {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}
