#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg"
)]
#![forbid(unsafe_code)]
#![warn(
    clippy::mod_module_files,
    clippy::cast_lossless,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::checked_conversions,
    clippy::implicit_saturating_sub,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    missing_docs,
    rust_2018_idioms,
    unused_lifetimes,
    unused_qualifications
)]

#[cfg(any(test, feature = "std"))]
extern crate std;

mod arithmetic;
mod error;

pub use crate::{
    arithmetic::{AffinePoint, EncodedPoint, FieldElement, ProjectivePoint, Scalar},
    error::{Error, Result},
};

/// Interprets `bytes` as a 32-byte big-endian scalar, reducing it modulo
/// the group order. Values at or above the order are valid inputs, not
/// errors.
fn scalar_from_slice(bytes: &[u8]) -> Result<Scalar> {
    let bytes: &[u8; 32] = bytes.try_into().map_err(|_| Error::InvalidScalarLength)?;
    Ok(Scalar::from_bytes_reduced(bytes))
}

/// Multiplies `point` by the 32-byte big-endian scalar `k`, in constant
/// time with respect to the scalar.
pub fn scalar_mult(point: &ProjectivePoint, k: &[u8]) -> Result<ProjectivePoint> {
    Ok(point * &scalar_from_slice(k)?)
}

/// Multiplies the SM2 generator by the 32-byte big-endian scalar `k`, in
/// constant time with respect to the scalar.
pub fn scalar_base_mult(k: &[u8]) -> Result<ProjectivePoint> {
    Ok(ProjectivePoint::mul_by_generator(&scalar_from_slice(k)?))
}

/// Computes `k⁻¹ mod n` for the group order `n`, returning the result as
/// 32 big-endian bytes. The inverse of zero is defined to be zero.
pub fn order_inverse(k: &[u8]) -> Result<[u8; 32]> {
    Ok(scalar_from_slice(k)?.invert().to_bytes())
}

/// Computes `a · b mod n` for the group order `n`, returning the result
/// as 32 big-endian bytes.
pub fn order_mul(a: &[u8], b: &[u8]) -> Result<[u8; 32]> {
    Ok((scalar_from_slice(a)? * scalar_from_slice(b)?).to_bytes())
}

/// Computes the implicit-signature combination `(e · t + s) mod n` used
/// by MQV-style key exchange and certificateless signing, returning the
/// result as 32 big-endian bytes.
pub fn implicit_sig(s: &[u8], e: &[u8], t: &[u8]) -> Result<[u8; 32]> {
    let s = scalar_from_slice(s)?;
    let e = scalar_from_slice(e)?;
    let t = scalar_from_slice(t)?;
    Ok((e * t + s).to_bytes())
}
