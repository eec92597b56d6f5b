//! # Baby Jubjub Curve Arithmetic
//!
//! The twisted Edwards curve `a·x² + y² = 1 + d·x²·y²` (`a = 168700`,
//! `d = 168696`) defined over the BN254 scalar field, in the coordinates used
//! by circomlib. Signing keys and POD `eddsa_pubkey` values are points on
//! this curve.
//!
//! ## Security Invariant
//!
//! `Point` fields are private. The only ways to obtain a point are the
//! generator [`Point::base8`], the identity, group operations on existing
//! points, [`Point::new`] (checked) and [`Point::unpack`] (checked). The
//! addition law is complete for on-curve points because `d` is a non-square,
//! so the denominators in [`Point::add`] never vanish.
//!
//! ## Packing
//!
//! 32 bytes: `y` little-endian, with bit 255 set when `x > (p - 1) / 2`.

use std::sync::OnceLock;

use ark_ff::{BigInteger, Field, MontFp, PrimeField};
use num_bigint::BigUint;

use crate::error::CryptoError;
use crate::field::{fr_to_biguint, is_field_element, Fr};

const COEFF_A: Fr = MontFp!("168700");
const COEFF_D: Fr = MontFp!("168696");

const BASE8_X: Fr =
    MontFp!("5299619240641551281634865583518297030282874472190772894086521144482721001553");
const BASE8_Y: Fr =
    MontFp!("16950150798460657717958625567821834550301663161624707787222815936182638968203");

/// Order of the prime-order subgroup generated by [`Point::base8`].
pub fn subgroup_order() -> &'static BigUint {
    static ORDER: OnceLock<BigUint> = OnceLock::new();
    ORDER.get_or_init(|| {
        BigUint::parse_bytes(
            b"2736030358979909402780800718157159386076813972158567259200215660948447373041",
            10,
        )
        .unwrap_or_default()
    })
}

/// An affine point on Baby Jubjub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    x: Fr,
    y: Fr,
}

impl Point {
    /// Build a point from coordinates, rejecting anything off the curve.
    pub fn new(x: Fr, y: Fr) -> Result<Self, CryptoError> {
        let point = Self { x, y };
        if !point.is_on_curve() {
            return Err(CryptoError::InvalidPoint(
                "coordinates do not satisfy the curve equation".to_string(),
            ));
        }
        Ok(point)
    }

    /// The neutral element `(0, 1)`.
    pub fn identity() -> Self {
        Self {
            x: Fr::ZERO,
            y: Fr::ONE,
        }
    }

    /// Generator of the prime-order subgroup (`8 · G`).
    pub fn base8() -> Self {
        Self {
            x: BASE8_X,
            y: BASE8_Y,
        }
    }

    /// Affine `x` coordinate.
    pub fn x(&self) -> Fr {
        self.x
    }

    /// Affine `y` coordinate.
    pub fn y(&self) -> Fr {
        self.y
    }

    /// Coordinates as canonical integers.
    pub fn coordinates(&self) -> (BigUint, BigUint) {
        (fr_to_biguint(self.x), fr_to_biguint(self.y))
    }

    /// Returns true if the point satisfies the curve equation.
    pub fn is_on_curve(&self) -> bool {
        let x2 = self.x.square();
        let y2 = self.y.square();
        COEFF_A * x2 + y2 == Fr::ONE + COEFF_D * x2 * y2
    }

    /// Twisted Edwards addition.
    pub fn add(&self, other: &Point) -> Point {
        let x1x2 = self.x * other.x;
        let y1y2 = self.y * other.y;
        let dxy = COEFF_D * x1x2 * y1y2;
        let x_den = (Fr::ONE + dxy).inverse().unwrap_or(Fr::ZERO);
        let y_den = (Fr::ONE - dxy).inverse().unwrap_or(Fr::ZERO);
        Point {
            x: (self.x * other.y + self.y * other.x) * x_den,
            y: (y1y2 - COEFF_A * x1x2) * y_den,
        }
    }

    /// Scalar multiplication by a non-negative integer (double-and-add).
    pub fn mul_scalar(&self, scalar: &BigUint) -> Point {
        let mut acc = Point::identity();
        let mut addend = *self;
        for i in 0..scalar.bits() {
            if scalar.bit(i) {
                acc = acc.add(&addend);
            }
            addend = addend.add(&addend);
        }
        acc
    }

    /// Compress to 32 bytes.
    pub fn pack(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.y.into_bigint().to_bytes_le());
        if self.x.into_bigint() > Fr::MODULUS_MINUS_ONE_DIV_TWO {
            out[31] |= 0x80;
        }
        out
    }

    /// Decompress 32 bytes produced by [`Point::pack`].
    pub fn unpack(packed: &[u8; 32]) -> Result<Point, CryptoError> {
        let mut bytes = *packed;
        let x_is_negative = bytes[31] & 0x80 != 0;
        bytes[31] &= 0x7f;

        let y_int = BigUint::from_bytes_le(&bytes);
        if !is_field_element(&y_int) {
            return Err(CryptoError::InvalidPoint(
                "y coordinate is not a field element".to_string(),
            ));
        }
        let y = Fr::from(y_int);
        let y2 = y.square();

        let denominator = (COEFF_A - COEFF_D * y2)
            .inverse()
            .ok_or_else(|| CryptoError::InvalidPoint("degenerate y coordinate".to_string()))?;
        let mut x = ((Fr::ONE - y2) * denominator)
            .sqrt()
            .ok_or_else(|| CryptoError::InvalidPoint("x coordinate has no square root".to_string()))?;

        if x.into_bigint() > Fr::MODULUS_MINUS_ONE_DIV_TWO {
            x = -x;
        }
        if x_is_negative {
            x = -x;
        }
        let point = Point { x, y };
        // x = 0 has no negative form, so its sign bit must be clear.
        if point.pack() != *packed {
            return Err(CryptoError::InvalidPoint(
                "non-canonical point encoding".to_string(),
            ));
        }
        Ok(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base8_is_on_curve() {
        assert!(Point::base8().is_on_curve());
        assert!(Point::identity().is_on_curve());
    }

    #[test]
    fn test_base8_has_subgroup_order() {
        let p = Point::base8().mul_scalar(subgroup_order());
        assert_eq!(p, Point::identity());
    }

    #[test]
    fn test_identity_is_neutral() {
        let b = Point::base8();
        assert_eq!(b.add(&Point::identity()), b);
        assert_eq!(Point::identity().add(&b), b);
    }

    #[test]
    fn test_scalar_mul_matches_repeated_addition() {
        let b = Point::base8();
        let three = b.add(&b).add(&b);
        assert_eq!(b.mul_scalar(&BigUint::from(3u32)), three);
        assert_eq!(b.mul_scalar(&BigUint::from(0u32)), Point::identity());
    }

    #[test]
    fn test_pack_unpack_roundtrip() {
        for k in [1u32, 2, 7, 1000, 123456789] {
            let p = Point::base8().mul_scalar(&BigUint::from(k));
            let packed = p.pack();
            assert_eq!(Point::unpack(&packed).unwrap(), p, "k={k}");
        }
    }

    #[test]
    fn test_negated_point_sets_sign_bit() {
        let p = Point::base8();
        let neg = Point::new(-p.x(), p.y()).unwrap();
        assert_ne!(p.pack()[31] & 0x80, neg.pack()[31] & 0x80);
        assert_eq!(Point::unpack(&neg.pack()).unwrap(), neg);
    }

    #[test]
    fn test_unpack_rejects_y_above_modulus() {
        let mut bytes = [0xffu8; 32];
        bytes[31] = 0x7f;
        assert!(matches!(
            Point::unpack(&bytes),
            Err(CryptoError::InvalidPoint(_))
        ));
    }

    #[test]
    fn test_unpack_rejects_some_non_points() {
        // Roughly half of all y values have no matching x.
        let rejected = (2u8..40)
            .filter(|b| {
                let mut bytes = [0u8; 32];
                bytes[0] = *b;
                Point::unpack(&bytes).is_err()
            })
            .count();
        assert!(rejected > 0);
    }

    #[test]
    fn test_unpack_rejects_sign_bit_on_zero_x() {
        // y = 1 (identity) and y = p - 1 (the order-2 point) both have x = 0.
        let mut one = [0u8; 32];
        one[0] = 1;
        let minus_one: [u8; 32] = (-Fr::ONE)
            .into_bigint()
            .to_bytes_le()
            .try_into()
            .unwrap();

        for canonical in [one, minus_one] {
            let point = Point::unpack(&canonical).unwrap();
            assert_eq!(point.x(), Fr::ZERO);
            assert_eq!(point.pack(), canonical);

            let mut signed = canonical;
            signed[31] |= 0x80;
            assert!(matches!(
                Point::unpack(&signed),
                Err(CryptoError::InvalidPoint(_))
            ));
        }
    }

    #[test]
    fn test_new_rejects_off_curve() {
        assert!(Point::new(Fr::from(1u64), Fr::from(1u64)).is_err());
    }
}
