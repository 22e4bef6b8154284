//! Named operands and operand sets.

use crate::curve::EllipticCurve;

/// Sign bit for the elliptic curve coefficient a.
#[repr(u32)]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Sign {
    /// Positive.
    #[default]
    Pos = 0,
    /// Negative.
    Neg = 1,
}

impl From<Sign> for u32 {
    fn from(s: Sign) -> Self {
        s as u32
    }
}

/// Operand names.
///
/// Each operation reads a fixed subset of these,
/// see [`OperationKind::required_operands`].
///
/// [`OperationKind::required_operands`]: crate::OperationKind::required_operands
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperandName {
    /// RSA modulus n, or the modulus of a Montgomery parameter computation.
    Modulus,
    /// RSA exponent e or d.
    Exponent,
    /// Base of the modular exponentiation (message or ciphertext).
    Base,
    /// RSA prime factor p.
    PrimeP,
    /// RSA prime factor q.
    PrimeQ,
    /// CRT exponent d mod (p - 1).
    CrtDp,
    /// CRT exponent d mod (q - 1).
    CrtDq,
    /// CRT coefficient q<sup>-1</sup> mod p.
    CrtQinv,
    /// Curve modulus p.
    CurvePrime,
    /// Curve coefficient |a|.
    ///
    /// The sign is carried by [`OperandSet::coef_sign`].
    CurveA,
    /// Curve coefficient b.
    CurveB,
    /// Curve base point G coordinate x.
    GeneratorX,
    /// Curve base point G coordinate y.
    GeneratorY,
    /// Curve prime order n.
    CurveOrder,
    /// ECDSA private key d.
    PrivateKey,
    /// ECDSA nonce k.
    Nonce,
    /// Public-key curve point xQ.
    PublicX,
    /// Public-key curve point yQ.
    PublicY,
    /// Message hash z.
    Hash,
    /// Signature part r.
    SignatureR,
    /// Signature part s.
    SignatureS,
    /// Curve point coordinate x (point check, scalar multiplication).
    PointX,
    /// Curve point coordinate y (point check, scalar multiplication).
    PointY,
    /// Scalar multiplier k.
    Scalar,
    /// Montgomery parameter R<sup>2</sup> mod p.
    MontgomeryParam,
}

impl OperandName {
    /// Number of operand names.
    pub const COUNT: usize = OperandName::MontgomeryParam as usize + 1;

    const fn idx(self) -> usize {
        self as usize
    }
}

/// Set of named operands borrowed from the caller.
///
/// # Example
///
/// ```
/// use stm32l4_hal_pka::{OperandName, OperandSet};
///
/// const MODULUS: [u8; 2] = [0x0C, 0xA1];
///
/// let ops: OperandSet = OperandSet::new()
///     .with(OperandName::Modulus, &MODULUS)
///     .with(OperandName::Exponent, &[0x03])
///     .with(OperandName::Base, &[0x41]);
/// assert_eq!(ops.get(OperandName::Modulus), Some(&MODULUS[..]));
/// assert_eq!(ops.get(OperandName::Hash), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperandSet<'a> {
    values: [Option<&'a [u8]>; OperandName::COUNT],
    coef_sign: Sign,
}

impl Default for OperandSet<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> OperandSet<'a> {
    /// Create an empty operand set with a positive curve coefficient sign.
    pub const fn new() -> OperandSet<'a> {
        OperandSet {
            values: [None; OperandName::COUNT],
            coef_sign: Sign::Pos,
        }
    }

    /// Set an operand, returning the modified set.
    #[must_use = "with returns a modified OperandSet"]
    pub const fn with(mut self, name: OperandName, value: &'a [u8]) -> OperandSet<'a> {
        self.values[name.idx()] = Some(value);
        self
    }

    /// Set the sign of the curve coefficient a, returning the modified set.
    #[must_use = "with_coef_sign returns a modified OperandSet"]
    pub const fn with_coef_sign(mut self, sign: Sign) -> OperandSet<'a> {
        self.coef_sign = sign;
        self
    }

    /// Set every curve operand from `curve`, returning the modified set.
    ///
    /// This sets the coefficient sign, [`CurvePrime`], [`CurveA`], [`CurveB`],
    /// [`GeneratorX`], [`GeneratorY`], and [`CurveOrder`].
    ///
    /// [`CurvePrime`]: OperandName::CurvePrime
    /// [`CurveA`]: OperandName::CurveA
    /// [`CurveB`]: OperandName::CurveB
    /// [`GeneratorX`]: OperandName::GeneratorX
    /// [`GeneratorY`]: OperandName::GeneratorY
    /// [`CurveOrder`]: OperandName::CurveOrder
    #[must_use = "with_curve returns a modified OperandSet"]
    pub const fn with_curve(self, curve: &EllipticCurve<'a>) -> OperandSet<'a> {
        self.with_coef_sign(curve.coef_sign)
            .with(OperandName::CurvePrime, curve.modulus)
            .with(OperandName::CurveA, curve.coef)
            .with(OperandName::CurveB, curve.coef_b)
            .with(OperandName::GeneratorX, curve.base_point_x)
            .with(OperandName::GeneratorY, curve.base_point_y)
            .with(OperandName::CurveOrder, curve.prime_order)
    }

    /// Set an operand in place.
    pub fn set(&mut self, name: OperandName, value: &'a [u8]) {
        self.values[name.idx()] = Some(value);
    }

    /// Remove an operand in place.
    pub fn remove(&mut self, name: OperandName) -> Option<&'a [u8]> {
        self.values[name.idx()].take()
    }

    /// Get an operand.
    pub const fn get(&self, name: OperandName) -> Option<&'a [u8]> {
        self.values[name.idx()]
    }

    /// Sign of the curve coefficient a.
    pub const fn coef_sign(&self) -> Sign {
        self.coef_sign
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::NIST_P256;

    #[test]
    fn count() {
        assert_eq!(OperandName::COUNT, 25);
    }

    #[test]
    fn set_get_remove() {
        let mut ops: OperandSet = OperandSet::new();
        assert_eq!(ops.get(OperandName::Nonce), None);
        ops.set(OperandName::Nonce, &[1, 2]);
        assert_eq!(ops.get(OperandName::Nonce), Some(&[1u8, 2][..]));
        assert_eq!(ops.remove(OperandName::Nonce), Some(&[1u8, 2][..]));
        assert_eq!(ops.get(OperandName::Nonce), None);
    }

    #[test]
    fn later_value_wins() {
        let ops: OperandSet = OperandSet::new()
            .with(OperandName::Base, &[1])
            .with(OperandName::Base, &[2]);
        assert_eq!(ops.get(OperandName::Base), Some(&[2u8][..]));
    }

    #[test]
    fn with_curve() {
        let ops: OperandSet = OperandSet::new().with_curve(&NIST_P256);
        assert_eq!(ops.coef_sign(), Sign::Neg);
        assert_eq!(ops.get(OperandName::CurvePrime), Some(NIST_P256.modulus));
        assert_eq!(ops.get(OperandName::CurveB), Some(NIST_P256.coef_b));
        assert_eq!(ops.get(OperandName::CurveOrder), Some(NIST_P256.prime_order));
        assert_eq!(ops.get(OperandName::PrivateKey), None);
    }
}
