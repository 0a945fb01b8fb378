//! Projective points in Jacobian coordinates.

#![allow(clippy::op_ref)]

use super::{AffinePoint, FieldElement};
use crate::{EncodedPoint, Error, Result};
use core::{
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

/// A point on the SM2 curve in Jacobian coordinates (X, Y, Z), where the
/// affine point is (X/Z², Y/Z³) and the point at infinity has Z = 0.
#[derive(Clone, Copy, Debug)]
pub struct ProjectivePoint {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) z: FieldElement,
}

impl ProjectivePoint {
    /// Additive identity of the group: the point at infinity.
    pub const IDENTITY: Self = Self {
        x: FieldElement::ONE,
        y: FieldElement::ONE,
        z: FieldElement::ZERO,
    };

    /// Base point of the SM2 curve.
    pub const GENERATOR: Self = Self {
        x: AffinePoint::GENERATOR.x,
        y: AffinePoint::GENERATOR.y,
        z: FieldElement::ONE,
    };

    /// Is this the point at infinity?
    pub fn is_identity(&self) -> Choice {
        self.z.is_zero()
    }

    /// Returns the affine representation of this point. The point at
    /// infinity maps to the affine (0, 0) sentinel, without branching,
    /// because field inversion sends zero to zero.
    pub fn to_affine(&self) -> AffinePoint {
        let zinv = self.z.invert();
        let zinv2 = zinv.square();
        AffinePoint {
            x: self.x * zinv2,
            y: self.y * (zinv2 * zinv),
        }
    }

    /// Returns `-self`.
    fn neg(&self) -> ProjectivePoint {
        ProjectivePoint {
            x: self.x,
            y: -self.y,
            z: self.z,
        }
    }

    /// Doubles this point.
    ///
    /// Uses the dbl-2001-b formulas, which are specialized for a = -3 and
    /// remain valid at the point at infinity.
    #[inline]
    pub fn double(&self) -> ProjectivePoint {
        let delta = self.z.square();
        let gamma = self.y.square();
        let beta = self.x * gamma;
        let t = (self.x - delta) * (self.x + delta);
        let alpha = t.double() + t;
        let beta4 = beta.double().double();

        let x3 = alpha.square() - beta4.double();
        let z3 = (self.y + self.z).square() - gamma - delta;
        let y3 = alpha * (beta4 - x3) - gamma.square().double().double().double();

        ProjectivePoint {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Returns `self + other`, complete for all inputs.
    ///
    /// The general Jacobian addition (add-2007-bl) degenerates to
    /// (0, 0, 0) when both inputs represent the same point; that case is
    /// detected via the h and r intermediates and the doubling result is
    /// substituted with a constant-time select. Operands at infinity are
    /// likewise patched in branchlessly. P + (-P) yields Z = 0 from the
    /// formulas directly.
    fn add(&self, other: &ProjectivePoint) -> ProjectivePoint {
        let z1z1 = self.z.square();
        let z2z2 = other.z.square();
        let u1 = self.x * z2z2;
        let u2 = other.x * z1z1;
        let s1 = self.y * (z2z2 * other.z);
        let s2 = other.y * (z1z1 * self.z);
        let h = u2 - u1;
        let r = s2 - s1;

        let hh = h.square();
        let i = hh.double().double();
        let j = h * i;
        let rr = r.double();
        let v = u1 * i;

        let x3 = rr.square() - j - v.double();
        let y3 = rr * (v - x3) - (s1 * j).double();
        let z3 = ((self.z + other.z).square() - z1z1 - z2z2) * h;

        let mut ret = ProjectivePoint {
            x: x3,
            y: y3,
            z: z3,
        };
        ret.conditional_assign(&self.double(), h.is_zero() & r.is_zero());
        ret.conditional_assign(self, other.is_identity());
        ret.conditional_assign(other, self.is_identity());
        ret
    }

    /// Returns `self + other`, where other is affine (madd-2007-bl).
    /// Complete in the same way as [`ProjectivePoint::add`]; the affine
    /// (0, 0) identity sentinel is also handled.
    pub(super) fn add_mixed(&self, other: &AffinePoint) -> ProjectivePoint {
        let z1z1 = self.z.square();
        let u2 = other.x * z1z1;
        let s2 = other.y * (z1z1 * self.z);
        let h = u2 - self.x;
        let r = s2 - self.y;

        let hh = h.square();
        let i = hh.double().double();
        let j = h * i;
        let rr = r.double();
        let v = self.x * i;

        let x3 = rr.square() - j - v.double();
        let y3 = rr * (v - x3) - (self.y * j).double();
        let z3 = (self.z + h).square() - z1z1 - hh;

        let mut ret = ProjectivePoint {
            x: x3,
            y: y3,
            z: z3,
        };
        ret.conditional_assign(&self.double(), h.is_zero() & r.is_zero());
        ret.conditional_assign(self, other.is_identity());
        ret.conditional_assign(&Self::from(*other), self.is_identity());
        ret
    }

    /// Returns `self - other`.
    fn sub(&self, other: &ProjectivePoint) -> ProjectivePoint {
        self.add(&other.neg())
    }

    /// Returns `self - other`.
    fn sub_mixed(&self, other: &AffinePoint) -> ProjectivePoint {
        self.add_mixed(&-other)
    }

    /// Decodes a point from its SEC1 encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        AffinePoint::from_bytes(bytes).map(Self::from)
    }

    /// Returns the uncompressed SEC1 encoding of this point; the point at
    /// infinity encodes as the single byte `0x00`.
    pub fn to_bytes(&self) -> EncodedPoint {
        self.to_affine().to_encoded_point(false)
    }

    /// Returns the compressed SEC1 encoding of this point; the point at
    /// infinity encodes as the single byte `0x00`.
    pub fn to_bytes_compressed(&self) -> EncodedPoint {
        self.to_affine().to_encoded_point(true)
    }

    /// Returns the big-endian affine x-coordinate of this point, or an
    /// error for the point at infinity.
    pub fn x_bytes(&self) -> Result<[u8; 32]> {
        if self.is_identity().into() {
            return Err(Error::PointAtInfinity);
        }
        Ok(self.to_affine().x.to_bytes())
    }
}

impl From<AffinePoint> for ProjectivePoint {
    fn from(p: AffinePoint) -> Self {
        let projective = ProjectivePoint {
            x: p.x,
            y: p.y,
            z: FieldElement::ONE,
        };
        Self::conditional_select(&projective, &Self::IDENTITY, p.is_identity())
    }
}

impl From<&AffinePoint> for ProjectivePoint {
    fn from(p: &AffinePoint) -> Self {
        Self::from(*p)
    }
}

impl From<ProjectivePoint> for AffinePoint {
    fn from(p: ProjectivePoint) -> AffinePoint {
        p.to_affine()
    }
}

impl From<&ProjectivePoint> for AffinePoint {
    fn from(p: &ProjectivePoint) -> AffinePoint {
        p.to_affine()
    }
}

impl ConditionallySelectable for ProjectivePoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        ProjectivePoint {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            z: FieldElement::conditional_select(&a.z, &b.z, choice),
        }
    }
}

impl ConstantTimeEq for ProjectivePoint {
    fn ct_eq(&self, other: &Self) -> Choice {
        // Cross-multiply the coordinates by the opposing Z powers so both
        // sides share the denominator Z₁²Z₂² (resp. Z₁³Z₂³). If either
        // point is at infinity all four products on that axis are zero,
        // which compares equal exactly against another point at infinity:
        // a finite point always contributes a non-zero X product.
        let z1z1 = self.z.square();
        let z2z2 = other.z.square();

        let x_eq = (self.x * z2z2).ct_eq(&(other.x * z1z1));
        let y_eq = (self.y * (z2z2 * other.z)).ct_eq(&(other.y * (z1z1 * self.z)));
        x_eq & y_eq
    }
}

impl PartialEq for ProjectivePoint {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for ProjectivePoint {}

impl Default for ProjectivePoint {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Add<ProjectivePoint> for ProjectivePoint {
    type Output = ProjectivePoint;

    fn add(self, other: ProjectivePoint) -> ProjectivePoint {
        ProjectivePoint::add(&self, &other)
    }
}

impl Add<&ProjectivePoint> for ProjectivePoint {
    type Output = ProjectivePoint;

    fn add(self, other: &ProjectivePoint) -> ProjectivePoint {
        ProjectivePoint::add(&self, other)
    }
}

impl Add<&ProjectivePoint> for &ProjectivePoint {
    type Output = ProjectivePoint;

    fn add(self, other: &ProjectivePoint) -> ProjectivePoint {
        ProjectivePoint::add(self, other)
    }
}

impl AddAssign<ProjectivePoint> for ProjectivePoint {
    fn add_assign(&mut self, rhs: ProjectivePoint) {
        *self = ProjectivePoint::add(self, &rhs);
    }
}

impl AddAssign<&ProjectivePoint> for ProjectivePoint {
    fn add_assign(&mut self, rhs: &ProjectivePoint) {
        *self = ProjectivePoint::add(self, rhs);
    }
}

impl Add<AffinePoint> for ProjectivePoint {
    type Output = ProjectivePoint;

    fn add(self, other: AffinePoint) -> ProjectivePoint {
        ProjectivePoint::add_mixed(&self, &other)
    }
}

impl Add<&AffinePoint> for ProjectivePoint {
    type Output = ProjectivePoint;

    fn add(self, other: &AffinePoint) -> ProjectivePoint {
        ProjectivePoint::add_mixed(&self, other)
    }
}

impl Add<&AffinePoint> for &ProjectivePoint {
    type Output = ProjectivePoint;

    fn add(self, other: &AffinePoint) -> ProjectivePoint {
        ProjectivePoint::add_mixed(self, other)
    }
}

impl AddAssign<AffinePoint> for ProjectivePoint {
    fn add_assign(&mut self, rhs: AffinePoint) {
        *self = ProjectivePoint::add_mixed(self, &rhs);
    }
}

impl AddAssign<&AffinePoint> for ProjectivePoint {
    fn add_assign(&mut self, rhs: &AffinePoint) {
        *self = ProjectivePoint::add_mixed(self, rhs);
    }
}

impl Sub<ProjectivePoint> for ProjectivePoint {
    type Output = ProjectivePoint;

    fn sub(self, other: ProjectivePoint) -> ProjectivePoint {
        ProjectivePoint::sub(&self, &other)
    }
}

impl Sub<&ProjectivePoint> for ProjectivePoint {
    type Output = ProjectivePoint;

    fn sub(self, other: &ProjectivePoint) -> ProjectivePoint {
        ProjectivePoint::sub(&self, other)
    }
}

impl Sub<&ProjectivePoint> for &ProjectivePoint {
    type Output = ProjectivePoint;

    fn sub(self, other: &ProjectivePoint) -> ProjectivePoint {
        ProjectivePoint::sub(self, other)
    }
}

impl SubAssign<ProjectivePoint> for ProjectivePoint {
    fn sub_assign(&mut self, rhs: ProjectivePoint) {
        *self = ProjectivePoint::sub(self, &rhs);
    }
}

impl SubAssign<&ProjectivePoint> for ProjectivePoint {
    fn sub_assign(&mut self, rhs: &ProjectivePoint) {
        *self = ProjectivePoint::sub(self, rhs);
    }
}

impl Sub<AffinePoint> for ProjectivePoint {
    type Output = ProjectivePoint;

    fn sub(self, other: AffinePoint) -> ProjectivePoint {
        ProjectivePoint::sub_mixed(&self, &other)
    }
}

impl Sub<&AffinePoint> for ProjectivePoint {
    type Output = ProjectivePoint;

    fn sub(self, other: &AffinePoint) -> ProjectivePoint {
        ProjectivePoint::sub_mixed(&self, other)
    }
}

impl Sum for ProjectivePoint {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(ProjectivePoint::IDENTITY, |a, b| a + b)
    }
}

impl<'a> Sum<&'a ProjectivePoint> for ProjectivePoint {
    fn sum<I: Iterator<Item = &'a ProjectivePoint>>(iter: I) -> Self {
        iter.cloned().sum()
    }
}

impl Neg for ProjectivePoint {
    type Output = ProjectivePoint;

    fn neg(self) -> ProjectivePoint {
        ProjectivePoint::neg(&self)
    }
}

impl Neg for &ProjectivePoint {
    type Output = ProjectivePoint;

    fn neg(self) -> ProjectivePoint {
        ProjectivePoint::neg(self)
    }
}
