//! A pure-Rust implementation of group operations on the SM2 elliptic
//! curve, constant time throughout.

pub(crate) mod affine;
pub(crate) mod field;
mod mul;
pub(crate) mod projective;
pub(crate) mod scalar;

mod util;

pub use self::{
    affine::{AffinePoint, EncodedPoint},
    field::FieldElement,
    projective::ProjectivePoint,
    scalar::Scalar,
};
