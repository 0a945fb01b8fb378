//! Arithmetic modulo the SM2 group order n (64-bit limbs).
//!
//! The u128-based carry helpers compile on every target, so the scalar
//! field uses this backend unconditionally.

use crate::arithmetic::util::{adc64, mac64, sbb64};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

const fn bytes_to_u64(b: &[u8; 8]) -> u64 {
    ((b[0] as u64) << 56)
        | ((b[1] as u64) << 48)
        | ((b[2] as u64) << 40)
        | ((b[3] as u64) << 32)
        | ((b[4] as u64) << 24)
        | ((b[5] as u64) << 16)
        | ((b[6] as u64) << 8)
        | (b[7] as u64)
}

const fn bytes_to_words(b: &[u8; 32]) -> [u64; 4] {
    let w3 = bytes_to_u64(&[b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]);
    let w2 = bytes_to_u64(&[b[8], b[9], b[10], b[11], b[12], b[13], b[14], b[15]]);
    let w1 = bytes_to_u64(&[b[16], b[17], b[18], b[19], b[20], b[21], b[22], b[23]]);
    let w0 = bytes_to_u64(&[b[24], b[25], b[26], b[27], b[28], b[29], b[30], b[31]]);
    [w0, w1, w2, w3]
}

/// Constant representing the group order
/// n = FFFFFFFE FFFFFFFF FFFFFFFF FFFFFFFF 7203DF6B 21C6052B 53BBF409 39D54123
const MODULUS: Scalar4x64 = Scalar4x64([
    0x53BB_F409_39D5_4123,
    0x7203_DF6B_21C6_052B,
    0xFFFF_FFFF_FFFF_FFFF,
    0xFFFF_FFFE_FFFF_FFFF,
]);

/// R = 2^256 mod n
const R: Scalar4x64 = Scalar4x64([
    0xAC44_0BF6_C62A_BEDD,
    0x8DFC_2094_DE39_FAD4,
    0x0000_0000_0000_0000,
    0x0000_0001_0000_0000,
]);

/// R^2 = 2^512 mod n
const R2: Scalar4x64 = Scalar4x64([
    0x9011_92AF_7C11_4F20,
    0x3464_504A_DE6F_A2FA,
    0x620F_C84C_3AFF_E0D4,
    0x1EB5_E412_A22B_3D3B,
]);

/// INV = -(n^-1 mod 2^64) mod 2^64
const INV: u64 = 0x327F_9E88_7235_0975;

/// An element in the scalar field modulo the group order n.
// Four little-endian 64-bit limbs in Montgomery form, always fully reduced.
#[derive(Clone, Copy, Debug)]
pub struct Scalar4x64(pub(crate) [u64; 4]);

impl Scalar4x64 {
    /// Zero scalar.
    pub const ZERO: Self = Self([0, 0, 0, 0]);

    /// Multiplicative identity.
    pub const ONE: Self = R;

    /// Attempts to parse the given byte array as a big-endian scalar.
    ///
    /// Returns None if the byte array does not contain an integer in the
    /// range `[0, n)`.
    pub fn from_bytes(bytes: &[u8; 32]) -> CtOption<Self> {
        let words = bytes_to_words(bytes);

        let (_, borrow) = sbb64(words[0], MODULUS.0[0], 0);
        let (_, borrow) = sbb64(words[1], MODULUS.0[1], borrow);
        let (_, borrow) = sbb64(words[2], MODULUS.0[2], borrow);
        let (_, borrow) = sbb64(words[3], MODULUS.0[3], borrow);
        let is_some = (borrow as u8) & 1;

        CtOption::new(Self(words).mul(&R2), Choice::from(is_some))
    }

    /// Parses the given byte array as a big-endian integer and reduces it
    /// modulo n. Since n > 2^255, a single conditional subtraction covers
    /// the full 256-bit input range.
    pub const fn from_bytes_reduced(bytes: &[u8; 32]) -> Self {
        let w = bytes_to_words(bytes);
        let reduced = Self::sub_inner(
            w[0],
            w[1],
            w[2],
            w[3],
            0,
            MODULUS.0[0],
            MODULUS.0[1],
            MODULUS.0[2],
            MODULUS.0[3],
            0,
        );
        reduced.mul(&R2)
    }

    /// Converts a small integer into a scalar.
    pub const fn from_u64(w: u64) -> Self {
        Self([w, 0, 0, 0]).mul(&R2)
    }

    /// Returns the big-endian encoding of this scalar.
    pub fn to_bytes(self) -> [u8; 32] {
        let res = Self::montgomery_reduce(self.0[0], self.0[1], self.0[2], self.0[3], 0, 0, 0, 0);
        let mut ret = [0u8; 32];
        ret[0..8].copy_from_slice(&res.0[3].to_be_bytes());
        ret[8..16].copy_from_slice(&res.0[2].to_be_bytes());
        ret[16..24].copy_from_slice(&res.0[1].to_be_bytes());
        ret[24..32].copy_from_slice(&res.0[0].to_be_bytes());
        ret
    }

    /// Determine if this scalar is zero.
    pub fn is_zero(&self) -> Choice {
        self.ct_eq(&Self::ZERO)
    }

    /// Returns self + rhs mod n.
    pub const fn add(&self, rhs: &Self) -> Self {
        let (w0, carry) = adc64(self.0[0], rhs.0[0], 0);
        let (w1, carry) = adc64(self.0[1], rhs.0[1], carry);
        let (w2, carry) = adc64(self.0[2], rhs.0[2], carry);
        let (w3, w4) = adc64(self.0[3], rhs.0[3], carry);

        Self::sub_inner(
            w0,
            w1,
            w2,
            w3,
            w4,
            MODULUS.0[0],
            MODULUS.0[1],
            MODULUS.0[2],
            MODULUS.0[3],
            0,
        )
    }

    /// Returns self - rhs mod n.
    pub const fn subtract(&self, rhs: &Self) -> Self {
        Self::sub_inner(
            self.0[0], self.0[1], self.0[2], self.0[3], 0, rhs.0[0], rhs.0[1], rhs.0[2], rhs.0[3],
            0,
        )
    }

    /// Returns -self mod n.
    pub const fn neg(&self) -> Self {
        Self::ZERO.subtract(self)
    }

    #[inline]
    #[allow(clippy::too_many_arguments)]
    const fn sub_inner(
        l0: u64,
        l1: u64,
        l2: u64,
        l3: u64,
        l4: u64,
        r0: u64,
        r1: u64,
        r2: u64,
        r3: u64,
        r4: u64,
    ) -> Self {
        let (w0, borrow) = sbb64(l0, r0, 0);
        let (w1, borrow) = sbb64(l1, r1, borrow);
        let (w2, borrow) = sbb64(l2, r2, borrow);
        let (w3, borrow) = sbb64(l3, r3, borrow);
        let (_, borrow) = sbb64(l4, r4, borrow);

        let (w0, carry) = adc64(w0, MODULUS.0[0] & borrow, 0);
        let (w1, carry) = adc64(w1, MODULUS.0[1] & borrow, carry);
        let (w2, carry) = adc64(w2, MODULUS.0[2] & borrow, carry);
        let (w3, _) = adc64(w3, MODULUS.0[3] & borrow, carry);

        Self([w0, w1, w2, w3])
    }

    /// Montgomery reduction of a 512-bit product.
    #[inline]
    #[allow(clippy::too_many_arguments)]
    const fn montgomery_reduce(
        r0: u64,
        r1: u64,
        r2: u64,
        r3: u64,
        r4: u64,
        r5: u64,
        r6: u64,
        r7: u64,
    ) -> Self {
        let k = r0.wrapping_mul(INV);
        let (_, carry) = mac64(r0, k, MODULUS.0[0], 0);
        let (r1, carry) = mac64(r1, k, MODULUS.0[1], carry);
        let (r2, carry) = mac64(r2, k, MODULUS.0[2], carry);
        let (r3, carry) = mac64(r3, k, MODULUS.0[3], carry);
        let (r4, carry2) = adc64(r4, 0, carry);

        let k = r1.wrapping_mul(INV);
        let (_, carry) = mac64(r1, k, MODULUS.0[0], 0);
        let (r2, carry) = mac64(r2, k, MODULUS.0[1], carry);
        let (r3, carry) = mac64(r3, k, MODULUS.0[2], carry);
        let (r4, carry) = mac64(r4, k, MODULUS.0[3], carry);
        let (r5, carry2) = adc64(r5, carry2, carry);

        let k = r2.wrapping_mul(INV);
        let (_, carry) = mac64(r2, k, MODULUS.0[0], 0);
        let (r3, carry) = mac64(r3, k, MODULUS.0[1], carry);
        let (r4, carry) = mac64(r4, k, MODULUS.0[2], carry);
        let (r5, carry) = mac64(r5, k, MODULUS.0[3], carry);
        let (r6, carry2) = adc64(r6, carry2, carry);

        let k = r3.wrapping_mul(INV);
        let (_, carry) = mac64(r3, k, MODULUS.0[0], 0);
        let (r4, carry) = mac64(r4, k, MODULUS.0[1], carry);
        let (r5, carry) = mac64(r5, k, MODULUS.0[2], carry);
        let (r6, carry) = mac64(r6, k, MODULUS.0[3], carry);
        let (r7, r8) = adc64(r7, carry2, carry);

        Self::sub_inner(
            r4,
            r5,
            r6,
            r7,
            r8,
            MODULUS.0[0],
            MODULUS.0[1],
            MODULUS.0[2],
            MODULUS.0[3],
            0,
        )
    }

    /// Returns self * rhs mod n.
    pub const fn mul(&self, rhs: &Self) -> Self {
        let (w0, carry) = mac64(0, self.0[0], rhs.0[0], 0);
        let (w1, carry) = mac64(0, self.0[0], rhs.0[1], carry);
        let (w2, carry) = mac64(0, self.0[0], rhs.0[2], carry);
        let (w3, w4) = mac64(0, self.0[0], rhs.0[3], carry);

        let (w1, carry) = mac64(w1, self.0[1], rhs.0[0], 0);
        let (w2, carry) = mac64(w2, self.0[1], rhs.0[1], carry);
        let (w3, carry) = mac64(w3, self.0[1], rhs.0[2], carry);
        let (w4, w5) = mac64(w4, self.0[1], rhs.0[3], carry);

        let (w2, carry) = mac64(w2, self.0[2], rhs.0[0], 0);
        let (w3, carry) = mac64(w3, self.0[2], rhs.0[1], carry);
        let (w4, carry) = mac64(w4, self.0[2], rhs.0[2], carry);
        let (w5, w6) = mac64(w5, self.0[2], rhs.0[3], carry);

        let (w3, carry) = mac64(w3, self.0[3], rhs.0[0], 0);
        let (w4, carry) = mac64(w4, self.0[3], rhs.0[1], carry);
        let (w5, carry) = mac64(w5, self.0[3], rhs.0[2], carry);
        let (w6, w7) = mac64(w6, self.0[3], rhs.0[3], carry);

        Self::montgomery_reduce(w0, w1, w2, w3, w4, w5, w6, w7)
    }

    /// Returns self * self mod n.
    pub const fn square(&self) -> Self {
        self.mul(self)
    }
}

impl ConditionallySelectable for Scalar4x64 {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self([
            u64::conditional_select(&a.0[0], &b.0[0], choice),
            u64::conditional_select(&a.0[1], &b.0[1], choice),
            u64::conditional_select(&a.0[2], &b.0[2], choice),
            u64::conditional_select(&a.0[3], &b.0[3], choice),
        ])
    }
}

impl ConstantTimeEq for Scalar4x64 {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0[0].ct_eq(&other.0[0])
            & self.0[1].ct_eq(&other.0[1])
            & self.0[2].ct_eq(&other.0[2])
            & self.0[3].ct_eq(&other.0[3])
    }
}

impl Default for Scalar4x64 {
    fn default() -> Self {
        Self::ZERO
    }
}

#[cfg(feature = "zeroize")]
impl Zeroize for Scalar4x64 {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}
