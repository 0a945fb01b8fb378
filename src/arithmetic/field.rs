//! Field arithmetic modulo p = 2^256 − 2^224 − 2^96 + 2^64 − 1, the base
//! field of the SM2 curve.

use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(any(target_pointer_width = "32", feature = "force-32-bit"))] {
        mod field_8x32;
        use field_8x32::FieldElement8x32 as FieldElementImpl;
    } else {
        mod field_4x64;
        use field_4x64::FieldElement4x64 as FieldElementImpl;
    }
}

use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

#[cfg(test)]
use num_bigint::BigUint;

/// An element in the finite field used for curve coordinates.
///
/// Always fully reduced; the internal representation is in Montgomery form.
#[derive(Clone, Copy, Debug)]
pub struct FieldElement(FieldElementImpl);

impl FieldElement {
    /// Zero element.
    pub const ZERO: Self = Self(FieldElementImpl::ZERO);

    /// Multiplicative identity.
    pub const ONE: Self = Self(FieldElementImpl::ONE);

    /// Determine if this field element is zero.
    pub fn is_zero(&self) -> Choice {
        self.0.is_zero()
    }

    /// Determine if this field element is odd in the SEC1 sense:
    /// `self mod 2 == 1`.
    pub fn is_odd(&self) -> Choice {
        self.0.is_odd()
    }

    /// Parses the given byte array as a field element without checking that
    /// it is in the correct range.
    pub(crate) const fn from_bytes_unchecked(bytes: &[u8; 32]) -> Self {
        Self(FieldElementImpl::from_bytes_unchecked(bytes))
    }

    /// Attempts to parse the given byte array as a big-endian field element.
    ///
    /// Returns None if the byte array does not contain an integer in the
    /// range `[0, p)`.
    pub fn from_bytes(bytes: &[u8; 32]) -> CtOption<Self> {
        FieldElementImpl::from_bytes(bytes).map(Self)
    }

    /// Parses the given byte array as a big-endian integer and reduces it
    /// modulo p.
    pub fn from_bytes_reduced(bytes: &[u8; 32]) -> Self {
        Self(FieldElementImpl::from_bytes_reduced(bytes))
    }

    /// Returns the big-endian encoding of this field element.
    pub fn to_bytes(self) -> [u8; 32] {
        self.0.to_bytes()
    }

    /// Returns 2 * self.
    pub fn double(&self) -> Self {
        Self(self.0.double())
    }

    /// Returns self * rhs mod p.
    pub const fn mul(&self, rhs: &Self) -> Self {
        Self(self.0.mul(&rhs.0))
    }

    /// Returns self * self mod p.
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

    /// Run ladder shared by `invert` and `sqrt`: returns
    /// `(x^(2^30 - 1), x^(2^31 - 1), x^(2^32 - 1))`.
    fn pow_runs(&self) -> (Self, Self, Self) {
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
        (x30, x31, x32)
    }

    /// Returns the multiplicative inverse of self, computed as
    /// `self^(p - 2)`.
    ///
    /// The zero element maps to zero, so inversion is total: callers that
    /// need to distinguish the zero case must check `is_zero` themselves.
    pub fn invert(&self) -> Self {
        // p - 2 = 2^255 + ... has the regular binary shape
        // 1^31 0 1^128 0^32 1^32 0 1^30 01, so the whole exponent is covered
        // by runs of ones assembled from the shared ladder.
        let (x30, x31, x32) = self.pow_runs();

        let mut t = x31.pow2k(1);
        for _ in 0..4 {
            t = t.pow2k(32) * x32;
        }
        t = t.pow2k(32);
        t = t.pow2k(32) * x32;
        t = t.pow2k(30) * x30;
        t.pow2k(2) * *self
    }

    /// Returns the square root of self mod p, or `None` if no square root
    /// exists.
    pub fn sqrt(&self) -> CtOption<Self> {
        // p ≡ 3 (mod 4), so a square root (when it exists) is
        // self^((p + 1)/4). The candidate is squared and compared against
        // the input to detect non-residues.
        let (_, x31, x32) = self.pow_runs();

        let mut t = x31.pow2k(1);
        for _ in 0..4 {
            t = t.pow2k(32) * x32;
        }
        t = t.pow2k(31);
        t = t.pow2k(1) * *self;
        let sqrt = t.pow2k(62);

        CtOption::new(sqrt, sqrt.square().ct_eq(self))
    }

    #[cfg(test)]
    pub fn modulus_as_biguint() -> BigUint {
        use num_bigint::ToBigUint;
        (-FieldElement::ONE).to_biguint().unwrap() + 1.to_biguint().unwrap()
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for FieldElement {}

impl Default for FieldElement {
    fn default() -> Self {
        Self::ZERO
    }
}

impl ConditionallySelectable for FieldElement {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self(FieldElementImpl::conditional_select(&a.0, &b.0, choice))
    }
}

impl ConstantTimeEq for FieldElement {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl Add<FieldElement> for FieldElement {
    type Output = FieldElement;

    fn add(self, other: FieldElement) -> FieldElement {
        FieldElement(self.0.add(&other.0))
    }
}

impl Add<&FieldElement> for FieldElement {
    type Output = FieldElement;

    fn add(self, other: &FieldElement) -> FieldElement {
        FieldElement(self.0.add(&other.0))
    }
}

impl Add<&FieldElement> for &FieldElement {
    type Output = FieldElement;

    fn add(self, other: &FieldElement) -> FieldElement {
        FieldElement(self.0.add(&other.0))
    }
}

impl AddAssign<FieldElement> for FieldElement {
    fn add_assign(&mut self, rhs: FieldElement) {
        *self = *self + &rhs;
    }
}

impl Sub<FieldElement> for FieldElement {
    type Output = FieldElement;

    fn sub(self, other: FieldElement) -> FieldElement {
        FieldElement(self.0.subtract(&other.0))
    }
}

impl Sub<&FieldElement> for FieldElement {
    type Output = FieldElement;

    fn sub(self, other: &FieldElement) -> FieldElement {
        FieldElement(self.0.subtract(&other.0))
    }
}

impl Sub<&FieldElement> for &FieldElement {
    type Output = FieldElement;

    fn sub(self, other: &FieldElement) -> FieldElement {
        FieldElement(self.0.subtract(&other.0))
    }
}

impl SubAssign<FieldElement> for FieldElement {
    fn sub_assign(&mut self, rhs: FieldElement) {
        *self = *self - &rhs;
    }
}

impl Mul<FieldElement> for FieldElement {
    type Output = FieldElement;

    fn mul(self, other: FieldElement) -> FieldElement {
        FieldElement(self.0.mul(&other.0))
    }
}

impl Mul<&FieldElement> for FieldElement {
    type Output = FieldElement;

    fn mul(self, other: &FieldElement) -> FieldElement {
        FieldElement(self.0.mul(&other.0))
    }
}

impl Mul<&FieldElement> for &FieldElement {
    type Output = FieldElement;

    fn mul(self, other: &FieldElement) -> FieldElement {
        FieldElement(self.0.mul(&other.0))
    }
}

impl MulAssign<FieldElement> for FieldElement {
    fn mul_assign(&mut self, rhs: FieldElement) {
        *self = *self * &rhs;
    }
}

impl Neg for FieldElement {
    type Output = FieldElement;

    fn neg(self) -> FieldElement {
        FieldElement(self.0.neg())
    }
}

impl Neg for &FieldElement {
    type Output = FieldElement;

    fn neg(self) -> FieldElement {
        FieldElement(self.0.neg())
    }
}

#[cfg(feature = "zeroize")]
impl Zeroize for FieldElement {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use num_bigint::{BigUint, ToBigUint};
    use proptest::prelude::*;

    use super::FieldElement;
    use crate::arithmetic::util::{biguint_to_bytes, bytes_to_biguint};

    impl From<&BigUint> for FieldElement {
        fn from(x: &BigUint) -> Self {
            let bytes = biguint_to_bytes(x);
            Self::from_bytes(&bytes).unwrap()
        }
    }

    impl ToBigUint for FieldElement {
        fn to_biguint(&self) -> Option<BigUint> {
            Some(bytes_to_biguint(&self.to_bytes()))
        }
    }

    const A: [u8; 32] = hex!("6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296");
    const B: [u8; 32] = hex!("5ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c3e27d2604b");

    #[test]
    fn zero_is_additive_identity() {
        let zero = FieldElement::ZERO;
        let one = FieldElement::ONE;
        assert_eq!(zero + zero, zero);
        assert_eq!(one + zero, one);
    }

    #[test]
    fn one_is_multiplicative_identity() {
        let one = FieldElement::ONE;
        assert_eq!(one * one, one);
    }

    #[test]
    fn from_bytes() {
        assert_eq!(
            FieldElement::from_bytes(&[0; 32]).unwrap(),
            FieldElement::ZERO
        );
        assert_eq!(
            FieldElement::from_bytes(&hex!(
                "0000000000000000000000000000000000000000000000000000000000000001"
            ))
            .unwrap(),
            FieldElement::ONE
        );

        // p itself must be rejected
        assert!(bool::from(
            FieldElement::from_bytes(&hex!(
                "fffffffeffffffffffffffffffffffffffffffff00000000ffffffffffffffff"
            ))
            .is_none()
        ));
        assert!(bool::from(FieldElement::from_bytes(&[0xff; 32]).is_none()));
    }

    #[test]
    fn from_bytes_reduced() {
        assert_eq!(
            FieldElement::from_bytes_reduced(&[0xff; 32]).to_bytes(),
            hex!("0000000100000000000000000000000000000000ffffffff0000000000000000")
        );

        // p reduces to zero
        assert_eq!(
            FieldElement::from_bytes_reduced(&hex!(
                "fffffffeffffffffffffffffffffffffffffffff00000000ffffffffffffffff"
            )),
            FieldElement::ZERO
        );
    }

    #[test]
    fn to_bytes() {
        assert_eq!(FieldElement::ZERO.to_bytes(), [0; 32]);
        assert_eq!(
            FieldElement::ONE.to_bytes(),
            hex!("0000000000000000000000000000000000000000000000000000000000000001")
        );
    }

    #[test]
    fn multiply_known_answer() {
        let a = FieldElement::from_bytes(&A).unwrap();
        let b = FieldElement::from_bytes(&B).unwrap();
        assert_eq!(
            (a * b).to_bytes(),
            hex!("3479bc4369e0a86a15bc83cba586775491eed93ec13a330ac9b7a057133a4bd8")
        );
        assert_eq!(
            a.square().to_bytes(),
            hex!("4c7c393d0f6a6f368596ad838361d55109779519a650f115f724f2dedb1440da")
        );
    }

    #[test]
    fn negation() {
        let two = FieldElement::ONE.double();
        let neg_two = -two;
        assert_eq!(two + neg_two, FieldElement::ZERO);
        assert_eq!(-neg_two, two);
    }

    #[test]
    fn invert() {
        // Inversion is total: the zero element maps to zero.
        assert_eq!(FieldElement::ZERO.invert(), FieldElement::ZERO);

        let one = FieldElement::ONE;
        assert_eq!(one.invert(), one);

        let a = FieldElement::from_bytes(&A).unwrap();
        let inv_a = a.invert();
        assert_eq!(a * inv_a, one);
        assert_eq!(
            inv_a.to_bytes(),
            hex!("6c22ee4b6c31d3f950785ed5c54b41d981d143adddedaf575b4b43ca29b618e5")
        );
    }

    #[test]
    fn sqrt() {
        let one = FieldElement::ONE;
        let two = one + one;
        let four = two.square();
        assert_eq!(four.sqrt().unwrap(), two);

        let a = FieldElement::from_bytes(&A).unwrap();
        assert_eq!(
            a.square().sqrt().unwrap().to_bytes(),
            hex!("94e82e0c1ed3bdb80743191a9c5bbf0d88fc827dd214cc600b5ec6ba27673d69")
        );
    }

    #[test]
    fn is_odd() {
        assert!(!bool::from(FieldElement::ZERO.is_odd()));
        assert!(bool::from(FieldElement::ONE.is_odd()));
        assert!(!bool::from(FieldElement::ONE.double().is_odd()));
    }

    prop_compose! {
        fn field_element()(bytes in any::<[u8; 32]>()) -> FieldElement {
            FieldElement::from_bytes_reduced(&bytes)
        }
    }

    proptest! {
        #[test]
        fn fuzzy_add(
            a in field_element(),
            b in field_element()
        ) {
            let a_bi = a.to_biguint().unwrap();
            let b_bi = b.to_biguint().unwrap();
            let res_bi = (&a_bi + &b_bi) % FieldElement::modulus_as_biguint();
            let res_ref = FieldElement::from(&res_bi);
            assert_eq!(a + b, res_ref);
        }

        #[test]
        fn fuzzy_sub(
            a in field_element(),
            b in field_element()
        ) {
            let m = FieldElement::modulus_as_biguint();
            let a_bi = a.to_biguint().unwrap();
            let b_bi = b.to_biguint().unwrap();
            let res_bi = (&m + &a_bi - &b_bi) % &m;
            let res_ref = FieldElement::from(&res_bi);
            assert_eq!(a - b, res_ref);
        }

        #[test]
        fn fuzzy_mul(
            a in field_element(),
            b in field_element()
        ) {
            let a_bi = a.to_biguint().unwrap();
            let b_bi = b.to_biguint().unwrap();
            let res_bi = (&a_bi * &b_bi) % FieldElement::modulus_as_biguint();
            let res_ref = FieldElement::from(&res_bi);
            assert_eq!(a * b, res_ref);
        }

        #[test]
        fn fuzzy_square(
            a in field_element()
        ) {
            let a_bi = a.to_biguint().unwrap();
            let res_bi = (&a_bi * &a_bi) % FieldElement::modulus_as_biguint();
            let res_ref = FieldElement::from(&res_bi);
            assert_eq!(a.square(), res_ref);
        }

        #[test]
        fn fuzzy_invert(
            a in field_element()
        ) {
            let a = if bool::from(a.is_zero()) { FieldElement::ONE } else { a };
            let inv = a.invert();
            assert_eq!(a * inv, FieldElement::ONE);
        }

        #[test]
        fn fuzzy_sqrt(
            a in field_element()
        ) {
            let sqr = a.square();
            let root = sqr.sqrt().unwrap();
            assert!(root == a || root == -a);
        }
    }
}
