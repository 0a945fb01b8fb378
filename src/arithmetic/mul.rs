//! Constant-time scalar multiplication using signed fixed windows.

use super::{ProjectivePoint, Scalar};
use core::ops::{Mul, MulAssign};

#[cfg(feature = "precomputed-tables")]
use super::AffinePoint;
use subtle::{Choice, ConditionallyNegatable, ConditionallySelectable, ConstantTimeEq};

/// Number of 6-bit Booth windows covering a 256-bit scalar, plus one for
/// the carry out of the top window.
const WINDOWS: usize = 43;

/// Recodes a 7-bit window into signed-digit form: a magnitude in `0..=32`
/// and a sign bit, such that `(-1)^sign * magnitude = window - 2^6 * carry`
/// where the carry is consumed by the next-higher window reading the top
/// bit of this one.
fn booth_recode(window: u8) -> (u8, Choice) {
    debug_assert!(window < (1 << 7));

    // All-ones when the top bit (the sign) is set.
    let s = !((window >> 6).wrapping_sub(1));
    let d = (1u8 << 7) - window - 1;
    let d = (d & s) | (window & !s);
    let d = (d >> 1) + (d & 1);

    (d, Choice::from(s & 1))
}

/// Extracts the `j`-th overlapping 7-bit Booth window from a little-endian
/// scalar encoding. Window `j` spans bits `6j - 1 ..= 6j + 5`, with bit -1
/// reading as zero.
fn booth_window(le_bytes: &[u8; 32], j: usize) -> u8 {
    debug_assert!(j < WINDOWS);

    if j == 0 {
        return (le_bytes[0] << 1) & 0x7f;
    }

    let pos = 6 * j - 1;
    let byte = pos / 8;
    let shift = pos % 8;
    let mut window = le_bytes[byte] >> shift;
    if shift > 1 && byte + 1 < 32 {
        window |= le_bytes[byte + 1] << (8 - shift);
    }
    window & 0x7f
}

/// Lookup table containing the multiples `[p, 2p, 3p, ..., 32p]`.
struct LookupTable([ProjectivePoint; 32]);

impl From<&ProjectivePoint> for LookupTable {
    fn from(p: &ProjectivePoint) -> Self {
        let mut points = [*p; 32];
        for j in 0..31 {
            points[j + 1] = p + &points[j];
        }
        LookupTable(points)
    }
}

impl LookupTable {
    /// Given 0 <= x <= 32, returns x * p in constant time via a linear
    /// scan of the table; x = 0 yields the identity.
    fn select(&self, x: u8) -> ProjectivePoint {
        debug_assert!(x <= 32);

        let mut t = ProjectivePoint::IDENTITY;
        for (j, entry) in self.0.iter().enumerate() {
            t.conditional_assign(entry, x.ct_eq(&(j as u8 + 1)));
        }
        t
    }
}

/// Left-to-right Booth multiplication: six doublings then one signed table
/// lookup per window.
fn mul_windowed(x: &ProjectivePoint, k: &Scalar) -> ProjectivePoint {
    let table = LookupTable::from(x);
    let mut le_bytes = k.to_bytes();
    le_bytes.reverse();

    let mut acc = ProjectivePoint::IDENTITY;
    for j in (0..WINDOWS).rev() {
        for _ in 0..6 {
            acc = acc.double();
        }

        let (magnitude, sign) = booth_recode(booth_window(&le_bytes, j));
        let mut entry = table.select(magnitude);
        entry.conditional_negate(sign);
        acc += &entry;
    }
    acc
}

/// Precomputed multiples of the generator: one 32-entry affine table per
/// Booth window, table `j` holding `[B, 2B, ..., 32B]` for `B = 2^(6j) G`.
/// With the doublings folded into the tables, fixed-base multiplication is
/// 43 lookups and mixed additions.
#[cfg(feature = "precomputed-tables")]
struct BasepointTable {
    tables: [[AffinePoint; 32]; WINDOWS],
}

#[cfg(feature = "precomputed-tables")]
impl BasepointTable {
    fn new() -> Self {
        let mut tables = [[AffinePoint::IDENTITY; 32]; WINDOWS];
        let mut base = ProjectivePoint::GENERATOR;

        for table in tables.iter_mut() {
            let mut row = base;
            for entry in table.iter_mut() {
                *entry = row.to_affine();
                row += &base;
            }
            for _ in 0..6 {
                base = base.double();
            }
        }

        Self { tables }
    }

    fn select(table: &[AffinePoint; 32], x: u8) -> AffinePoint {
        debug_assert!(x <= 32);

        let mut t = AffinePoint::IDENTITY;
        for (j, entry) in table.iter().enumerate() {
            t.conditional_assign(entry, x.ct_eq(&(j as u8 + 1)));
        }
        t
    }

    fn mul_base(&self, k: &Scalar) -> ProjectivePoint {
        let mut le_bytes = k.to_bytes();
        le_bytes.reverse();

        let mut acc = ProjectivePoint::IDENTITY;
        for (j, table) in self.tables.iter().enumerate() {
            let (magnitude, sign) = booth_recode(booth_window(&le_bytes, j));
            let mut entry = Self::select(table, magnitude);
            entry.conditional_negate(sign);
            acc = acc.add_mixed(&entry);
        }
        acc
    }
}

cfg_if::cfg_if! {
    if #[cfg(all(feature = "precomputed-tables", feature = "std"))] {
        static BASEPOINT_TABLE: std::sync::LazyLock<BasepointTable> =
            std::sync::LazyLock::new(BasepointTable::new);
    } else if #[cfg(all(feature = "precomputed-tables", feature = "critical-section"))] {
        static BASEPOINT_TABLE: once_cell::sync::Lazy<BasepointTable> =
            once_cell::sync::Lazy::new(BasepointTable::new);
    } else if #[cfg(feature = "precomputed-tables")] {
        compile_error!("the `precomputed-tables` feature requires `std` or `critical-section`");
    }
}

impl ProjectivePoint {
    /// Multiplies the generator by a scalar.
    pub fn mul_by_generator(k: &Scalar) -> ProjectivePoint {
        #[cfg(feature = "precomputed-tables")]
        {
            BASEPOINT_TABLE.mul_base(k)
        }
        #[cfg(not(feature = "precomputed-tables"))]
        {
            mul_windowed(&ProjectivePoint::GENERATOR, k)
        }
    }
}

impl Mul<Scalar> for ProjectivePoint {
    type Output = ProjectivePoint;

    fn mul(self, other: Scalar) -> ProjectivePoint {
        mul_windowed(&self, &other)
    }
}

impl Mul<&Scalar> for &ProjectivePoint {
    type Output = ProjectivePoint;

    fn mul(self, other: &Scalar) -> ProjectivePoint {
        mul_windowed(self, other)
    }
}

impl Mul<&Scalar> for ProjectivePoint {
    type Output = ProjectivePoint;

    fn mul(self, other: &Scalar) -> ProjectivePoint {
        mul_windowed(&self, other)
    }
}

impl MulAssign<Scalar> for ProjectivePoint {
    fn mul_assign(&mut self, rhs: Scalar) {
        *self = mul_windowed(self, &rhs);
    }
}

impl MulAssign<&Scalar> for ProjectivePoint {
    fn mul_assign(&mut self, rhs: &Scalar) {
        *self = mul_windowed(self, rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::{booth_recode, booth_window, ProjectivePoint, Scalar, WINDOWS};
    use hex_literal::hex;

    /// Bit-at-a-time double-and-add, not constant time; reference only.
    fn mul_reference(p: &ProjectivePoint, k: &Scalar) -> ProjectivePoint {
        let bytes = k.to_bytes();
        let mut acc = ProjectivePoint::IDENTITY;
        for byte in bytes.iter() {
            for bit in (0..8).rev() {
                acc = acc.double();
                if byte >> bit & 1 == 1 {
                    acc += p;
                }
            }
        }
        acc
    }

    #[test]
    fn booth_windows_recompose_scalar() {
        // sum over j of (-1)^sign_j * magnitude_j * 2^(6j) must equal the
        // scalar
        use num_bigint::BigInt;

        for bytes in [
            hex!("128b2fa8bd433c6c068c8d803dff79792a519a55171b1b650c23661d15897263"),
            hex!("fffffffeffffffffffffffffffffffff7203df6b21c6052b53bbf40939d54122"),
            [0u8; 32],
            {
                let mut b = [0u8; 32];
                b[31] = 1;
                b
            },
        ] {
            let mut le_bytes = bytes;
            le_bytes.reverse();

            let mut acc = BigInt::from(0u8);
            for j in (0..WINDOWS).rev() {
                let (magnitude, sign) = booth_recode(booth_window(&le_bytes, j));
                let digit = if bool::from(sign) {
                    -BigInt::from(magnitude)
                } else {
                    BigInt::from(magnitude)
                };
                acc += digit << (6 * j);
            }

            assert_eq!(acc, BigInt::from_bytes_be(num_bigint::Sign::Plus, &bytes));
        }
    }

    #[test]
    fn booth_recode_extremes() {
        assert_eq!(booth_recode(0).0, 0);
        let (m, s) = booth_recode(0x7f);
        assert_eq!(m, 0);
        assert!(bool::from(s));
        let (m, s) = booth_recode(0x40);
        assert_eq!(m, 32);
        assert!(bool::from(s));
        let (m, s) = booth_recode(0x3f);
        assert_eq!(m, 32);
        assert!(!bool::from(s));
    }

    #[test]
    fn top_window_is_in_range() {
        // n - 1 has all its top bits set; the final window plus the carry
        // out of window 41 must stay within 0..=32
        let k = -Scalar::ONE;
        let mut le_bytes = k.to_bytes();
        le_bytes.reverse();
        let (magnitude, _) = booth_recode(booth_window(&le_bytes, WINDOWS - 1));
        assert!(magnitude <= 32);
    }

    #[test]
    fn windowed_vs_reference() {
        let g = ProjectivePoint::GENERATOR;

        for k in [
            Scalar::ZERO,
            Scalar::ONE,
            Scalar::from(2u64),
            Scalar::from(31u64),
            Scalar::from(32u64),
            Scalar::from(33u64),
            Scalar::from(112233445566778899u64),
            -Scalar::ONE,
        ] {
            assert_eq!(g * k, mul_reference(&g, &k));
        }
    }

    #[test]
    fn fixed_base_vs_variable_base() {
        let g = ProjectivePoint::GENERATOR;

        for k in [
            Scalar::ZERO,
            Scalar::ONE,
            Scalar::from(2u64),
            Scalar::from(112233445566778899u64),
            -Scalar::ONE,
            Scalar::from_bytes_reduced(&hex!(
                "128b2fa8bd433c6c068c8d803dff79792a519a55171b1b650c23661d15897263"
            )),
        ] {
            assert_eq!(ProjectivePoint::mul_by_generator(&k), g * k);
        }
    }

    #[test]
    fn known_multiple() {
        let k = Scalar::from_bytes_reduced(&hex!(
            "128b2fa8bd433c6c068c8d803dff79792a519a55171b1b650c23661d15897263"
        ));
        let p = ProjectivePoint::mul_by_generator(&k).to_affine();
        assert_eq!(
            p.x.to_bytes(),
            hex!("d5548c7825cbb56150a3506cd57464af8a1ae0519dfaf3c58221dc810caf28dd")
        );
        assert_eq!(
            p.y.to_bytes(),
            hex!("921073768fe3d59ce54e79a49445cf73fed23086537027264d168946d479533e")
        );
    }

    #[test]
    fn order_times_generator_is_identity() {
        // n * G = O, and (n - 1) * G = -G
        let n_minus_1 = -Scalar::ONE;
        let p = ProjectivePoint::mul_by_generator(&n_minus_1);
        assert_eq!(p, -ProjectivePoint::GENERATOR);
        assert_eq!(p + ProjectivePoint::GENERATOR, ProjectivePoint::IDENTITY);
    }
}
