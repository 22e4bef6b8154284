//! Elliptic curves.

use crate::Sign;
use hex_literal::hex;

/// Elliptic curve.
///
/// Used for ECDSA signing and verification, point checks, and scalar
/// multiplication.
/// All values are big-endian.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct EllipticCurve<'a> {
    /// Curve coefficient a sign.
    pub coef_sign: Sign,
    /// Curve coefficient |a|.
    ///
    /// **Note:** Absolute value, |a| < p.
    pub coef: &'a [u8],
    /// Curve coefficient b.
    pub coef_b: &'a [u8],
    /// Curve modulus value p.
    ///
    /// **Note:** Odd integer prime, 0 < p < 2<sup>384</sup>
    pub modulus: &'a [u8],
    /// Curve base point G coordinate x.
    ///
    /// **Note:** x < p
    pub base_point_x: &'a [u8],
    /// Curve base point G coordinate y.
    ///
    /// **Note:** y < p
    pub base_point_y: &'a [u8],
    /// Curve prime order n.
    ///
    /// **Note:** Integer prime.
    pub prime_order: &'a [u8],
}

/// nist P-256 (prime256v1)
pub const NIST_P256: EllipticCurve<'static> = EllipticCurve {
    coef_sign: Sign::Neg,
    coef: &hex!("0000000000000000000000000000000000000000000000000000000000000003"),
    coef_b: &hex!("5ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c3e27d2604b"),
    modulus: &hex!("ffffffff00000001000000000000000000000000ffffffffffffffffffffffff"),
    base_point_x: &hex!("6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296"),
    base_point_y: &hex!("4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5"),
    prime_order: &hex!("ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551"),
};

/// brainpool P224r1
pub const P224R1: EllipticCurve<'static> = EllipticCurve {
    coef_sign: Sign::Pos,
    coef: &hex!("68A5E62C A9CE6C1C 299803A6 C1530B51 4E182AD8 B0042A59 CAD29F43"),
    coef_b: &hex!("2580F63C CFE44138 870713B1 A92369E3 3E2135D2 66DBB372 386C400B"),
    modulus: &hex!("D7C134AA 26436686 2A183025 75D1D787 B09F0757 97DA89F5 7EC8C0FF"),
    base_point_x: &hex!("0D9029AD 2C7E5CF4 340823B2 A87DC68C 9E4CE317 4C1E6EFD EE12C07D"),
    base_point_y: &hex!("58AA56F7 72C0726F 24C6B89E 4ECDAC24 354B9E99 CAA3F6D3 761402CD"),
    prime_order: &hex!("D7C134AA 26436686 2A183025 75D0FB98 D116BC4B 6DDEBCA3 A5A7939F"),
};

/// nist P-192
pub const NIST_P192: EllipticCurve<'static> = EllipticCurve {
    coef_sign: Sign::Neg,
    coef: &hex!("000000000000000000000000000000000000000000000003"),
    coef_b: &hex!("64210519 E59C80E7 0FA7E9AB 72243049 FEB8DEEC C146B9B1"),
    modulus: &hex!("FFFFFFFF FFFFFFFF FFFFFFFF FFFFFFFE FFFFFFFF FFFFFFFF"),
    base_point_x: &hex!("188DA80E B03090F6 7CBF20EB 43A18800 F4FF0AFD 82FF1012"),
    base_point_y: &hex!("07192B95 FFC8DA78 631011ED 6B24CDD5 73F977A1 1E794811"),
    prime_order: &hex!("FFFFFFFF FFFFFFFF FFFFFFFF 99DEF836 146BC9B1 B4D22831"),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths() {
        for (curve, len) in [(NIST_P256, 32), (P224R1, 28), (NIST_P192, 24)] {
            assert_eq!(curve.coef.len(), len);
            assert_eq!(curve.coef_b.len(), len);
            assert_eq!(curve.modulus.len(), len);
            assert_eq!(curve.base_point_x.len(), len);
            assert_eq!(curve.base_point_y.len(), len);
            assert_eq!(curve.prime_order.len(), len);
        }
    }
}
