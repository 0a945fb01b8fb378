//! Arithmetic modulo the SM2 group order
//! n = FFFFFFFE FFFFFFFF FFFFFFFF FFFFFFFF 7203DF6B 21C6052B 53BBF409 39D54123.

mod scalar_4x64;

use scalar_4x64::Scalar4x64 as ScalarImpl;

use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

#[cfg(test)]
use num_bigint::BigUint;

/// An element in the scalar field of the SM2 curve, i.e. an integer
/// modulo the group order n.
///
/// Always fully reduced; the internal representation is in Montgomery form.
#[derive(Clone, Copy, Debug)]
pub struct Scalar(ScalarImpl);

impl Scalar {
    /// Zero scalar.
    pub const ZERO: Self = Self(ScalarImpl::ZERO);

    /// Multiplicative identity.
    pub const ONE: Self = Self(ScalarImpl::ONE);

    /// Determine if this scalar is zero.
    pub fn is_zero(&self) -> Choice {
        self.0.is_zero()
    }

    /// Attempts to parse the given byte array as a big-endian scalar.
    ///
    /// Returns None if the byte array does not contain an integer in the
    /// range `[0, n)`.
    pub fn from_bytes(bytes: &[u8; 32]) -> CtOption<Self> {
        ScalarImpl::from_bytes(bytes).map(Self)
    }

    /// Parses the given byte array as a big-endian integer and reduces it
    /// modulo n.
    pub fn from_bytes_reduced(bytes: &[u8; 32]) -> Self {
        Self(ScalarImpl::from_bytes_reduced(bytes))
    }

    /// Returns the big-endian encoding of this scalar.
    pub fn to_bytes(self) -> [u8; 32] {
        self.0.to_bytes()
    }

    /// Returns self * rhs mod n.
    pub const fn mul(&self, rhs: &Self) -> Self {
        Self(self.0.mul(&rhs.0))
    }

    /// Returns self * self mod n.
    pub const fn square(&self) -> Self {
        Self(self.0.square())
    }

    /// Raises self to the power `2^k` by repeated squaring.
    fn pow2k(&self, k: usize) -> Self {
        let mut x = *self;
        for _ in 0..k {
            x = x.square();
        }
        x
    }

    /// Returns the multiplicative inverse of self, computed as
    /// `self^(n - 2)`.
    ///
    /// The zero scalar maps to zero, so inversion is total: callers that
    /// need to distinguish the zero case must check `is_zero` themselves.
    pub fn invert(&self) -> Self {
        // The top 128 bits of n - 2 have the regular shape 1^31 0 1^96 and
        // are assembled from runs of ones; the irregular low 128 bits are
        // covered by a fixed window decomposition over the odd digits
        // 1, 11, 101, 111, 1111 and 10101 (binary).
        let x1 = *self;
        let x2 = x1.pow2k(1) * x1;
        let x4 = x2.pow2k(2) * x2;
        let x8 = x4.pow2k(4) * x4;
        let x16 = x8.pow2k(8) * x8;
        let x24 = x16.pow2k(8) * x8;
        let x28 = x24.pow2k(4) * x4;
        let x30 = x28.pow2k(2) * x2;
        let x31 = x30.pow2k(1) * x1;
        let x32 = x31.pow2k(1) * x1;

        let d1 = x1;
        let d11 = x2;
        let d101 = x1.pow2k(2) * x1;
        let d111 = d11.pow2k(1) * x1;
        let d1111 = x4;
        let d10101 = d101.pow2k(2) * x1;

        let mut t = x31.pow2k(1);
        for _ in 0..3 {
            t = t.pow2k(32) * x32;
        }

        for (squarings, digit) in [
            (4, d111),
            (3, d1),
            (11, d1111),
            (5, d1111),
            (3, d101),
            (5, d10101),
            (1, d1),
            (3, d1),
            (7, d111),
            (5, d11),
            (9, d101),
            (7, d10101),
            (5, d10101),
            (5, d111),
            (4, d111),
            (5, d1111),
            (2, d11),
            (2, d1),
            (7, d1),
            (3, d1),
            (5, d111),
            (5, d111),
            (6, d10101),
            (2, d1),
            (6, d1),
            (3, d1),
            (5, d1),
        ] {
            t = t.pow2k(squarings) * digit;
        }

        t
    }

    #[cfg(test)]
    pub fn order_as_biguint() -> BigUint {
        use num_bigint::ToBigUint;
        (-Scalar::ONE).to_biguint().unwrap() + 1.to_biguint().unwrap()
    }
}

impl From<u64> for Scalar {
    fn from(w: u64) -> Self {
        Self(ScalarImpl::from_u64(w))
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Scalar {}

impl Default for Scalar {
    fn default() -> Self {
        Self::ZERO
    }
}

impl ConditionallySelectable for Scalar {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self(ScalarImpl::conditional_select(&a.0, &b.0, choice))
    }
}

impl ConstantTimeEq for Scalar {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl Add<Scalar> for Scalar {
    type Output = Scalar;

    fn add(self, other: Scalar) -> Scalar {
        Scalar(self.0.add(&other.0))
    }
}

impl Add<&Scalar> for Scalar {
    type Output = Scalar;

    fn add(self, other: &Scalar) -> Scalar {
        Scalar(self.0.add(&other.0))
    }
}

impl Add<&Scalar> for &Scalar {
    type Output = Scalar;

    fn add(self, other: &Scalar) -> Scalar {
        Scalar(self.0.add(&other.0))
    }
}

impl AddAssign<Scalar> for Scalar {
    fn add_assign(&mut self, rhs: Scalar) {
        *self = *self + &rhs;
    }
}

impl Sub<Scalar> for Scalar {
    type Output = Scalar;

    fn sub(self, other: Scalar) -> Scalar {
        Scalar(self.0.subtract(&other.0))
    }
}

impl Sub<&Scalar> for Scalar {
    type Output = Scalar;

    fn sub(self, other: &Scalar) -> Scalar {
        Scalar(self.0.subtract(&other.0))
    }
}

impl Sub<&Scalar> for &Scalar {
    type Output = Scalar;

    fn sub(self, other: &Scalar) -> Scalar {
        Scalar(self.0.subtract(&other.0))
    }
}

impl SubAssign<Scalar> for Scalar {
    fn sub_assign(&mut self, rhs: Scalar) {
        *self = *self - &rhs;
    }
}

impl Mul<Scalar> for Scalar {
    type Output = Scalar;

    fn mul(self, other: Scalar) -> Scalar {
        Scalar(self.0.mul(&other.0))
    }
}

impl Mul<&Scalar> for Scalar {
    type Output = Scalar;

    fn mul(self, other: &Scalar) -> Scalar {
        Scalar(self.0.mul(&other.0))
    }
}

impl Mul<&Scalar> for &Scalar {
    type Output = Scalar;

    fn mul(self, other: &Scalar) -> Scalar {
        Scalar(self.0.mul(&other.0))
    }
}

impl MulAssign<Scalar> for Scalar {
    fn mul_assign(&mut self, rhs: Scalar) {
        *self = *self * &rhs;
    }
}

impl Neg for Scalar {
    type Output = Scalar;

    fn neg(self) -> Scalar {
        Scalar(self.0.neg())
    }
}

impl Neg for &Scalar {
    type Output = Scalar;

    fn neg(self) -> Scalar {
        Scalar(self.0.neg())
    }
}

#[cfg(feature = "zeroize")]
impl Zeroize for Scalar {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use num_bigint::{BigUint, ToBigUint};
    use proptest::prelude::*;

    use super::Scalar;
    use crate::arithmetic::util::{biguint_to_bytes, bytes_to_biguint};

    impl From<&BigUint> for Scalar {
        fn from(x: &BigUint) -> Self {
            let bytes = biguint_to_bytes(x);
            Self::from_bytes(&bytes).unwrap()
        }
    }

    impl ToBigUint for Scalar {
        fn to_biguint(&self) -> Option<BigUint> {
            Some(bytes_to_biguint(&self.to_bytes()))
        }
    }

    const SA: [u8; 32] = hex!("128b2fa8bd433c6c068c8d803dff79792a519a55171b1b650c23661d15897263");
    const SB: [u8; 32] = hex!("d4f94f92fa8a7d56bfbdd7c4c3c3c93f8ed0724cf0f8d2f2096e1eed74c9b9d1");

    #[test]
    fn roundtrip() {
        let sa = Scalar::from_bytes(&SA).unwrap();
        assert_eq!(sa.to_bytes(), SA);
        assert_eq!(Scalar::ZERO.to_bytes(), [0; 32]);
        assert_eq!(
            Scalar::ONE.to_bytes(),
            hex!("0000000000000000000000000000000000000000000000000000000000000001")
        );
    }

    #[test]
    fn from_bytes_rejects_order() {
        // n itself must be rejected
        assert!(bool::from(
            Scalar::from_bytes(&hex!(
                "fffffffeffffffffffffffffffffffff7203df6b21c6052b53bbf40939d54123"
            ))
            .is_none()
        ));
        assert!(bool::from(Scalar::from_bytes(&[0xff; 32]).is_none()));
    }

    #[test]
    fn from_bytes_reduced() {
        assert_eq!(
            Scalar::from_bytes_reduced(&[0xff; 32]).to_bytes(),
            hex!("000000010000000000000000000000008dfc2094de39fad4ac440bf6c62abedc")
        );

        // n reduces to zero
        assert_eq!(
            Scalar::from_bytes_reduced(&hex!(
                "fffffffeffffffffffffffffffffffff7203df6b21c6052b53bbf40939d54123"
            )),
            Scalar::ZERO
        );
    }

    #[test]
    fn multiply_known_answer() {
        let sa = Scalar::from_bytes(&SA).unwrap();
        let sb = Scalar::from_bytes(&SB).unwrap();
        assert_eq!(
            (sa * sb).to_bytes(),
            hex!("af359670cf91d0bfa8e58b9fe855a7083c04035d7e0287e80e85d8943ad0ef1a")
        );
        assert_eq!(
            (sa + sb).to_bytes(),
            hex!("e7847f3bb7cdb9c2c64a654501c342b8b9220ca20813ee571591850a8a532c34")
        );
    }

    #[test]
    fn invert() {
        // Inversion is total: the zero scalar maps to zero.
        assert_eq!(Scalar::ZERO.invert(), Scalar::ZERO);
        assert_eq!(Scalar::ONE.invert(), Scalar::ONE);

        let sa = Scalar::from_bytes(&SA).unwrap();
        let inv_sa = sa.invert();
        assert_eq!(sa * inv_sa, Scalar::ONE);
        assert_eq!(
            inv_sa.to_bytes(),
            hex!("8bd2cec9af792a8c957591c9d40f27f73117c9614055d01f870d3365977e5034")
        );
    }

    #[test]
    fn negation() {
        let sa = Scalar::from_bytes(&SA).unwrap();
        assert_eq!(sa + -sa, Scalar::ZERO);
        assert_eq!(-(-sa), sa);
        assert_eq!(-Scalar::ZERO, Scalar::ZERO);
    }

    prop_compose! {
        fn scalar()(bytes in any::<[u8; 32]>()) -> Scalar {
            Scalar::from_bytes_reduced(&bytes)
        }
    }

    proptest! {
        #[test]
        fn fuzzy_add(
            a in scalar(),
            b in scalar()
        ) {
            let a_bi = a.to_biguint().unwrap();
            let b_bi = b.to_biguint().unwrap();
            let res_bi = (&a_bi + &b_bi) % Scalar::order_as_biguint();
            assert_eq!(a + b, Scalar::from(&res_bi));
        }

        #[test]
        fn fuzzy_mul(
            a in scalar(),
            b in scalar()
        ) {
            let a_bi = a.to_biguint().unwrap();
            let b_bi = b.to_biguint().unwrap();
            let res_bi = (&a_bi * &b_bi) % Scalar::order_as_biguint();
            assert_eq!(a * b, Scalar::from(&res_bi));
        }

        #[test]
        fn fuzzy_invert(
            a in scalar()
        ) {
            let a = if bool::from(a.is_zero()) { Scalar::ONE } else { a };
            assert_eq!(a * a.invert(), Scalar::ONE);
        }

        #[test]
        fn fuzzy_reduce(
            bytes in any::<[u8; 32]>()
        ) {
            let res_bi = bytes_to_biguint(&bytes) % Scalar::order_as_biguint();
            assert_eq!(Scalar::from_bytes_reduced(&bytes), Scalar::from(&res_bi));
        }
    }
}
