//! Operation descriptors and results.

use crate::OperandName;
use crate::codec::Operand;

/// PKA operation codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum PkaOpcode {
    /// Montgomery parameter computation then modular exponentiation.
    MontgomeryParameterExponentiation = 0b000000,
    /// Montgomery parameter computation only.
    MontgomeryParameter = 0b000001,
    /// Montgomery parameter computation then ECC scalar multiplication.
    MontgomeryParameterEcc = 0b100000,
    /// ECDSA signing.
    EcdsaSign = 0b100100,
    /// ECDSA verification.
    EcdsaVerify = 0b100110,
    /// Point on elliptic curve Fp check.
    Point = 0b101000,
    /// RSA CRT exponentiation.
    RsaCrt = 0b000111,
}

impl From<PkaOpcode> for u8 {
    fn from(x: PkaOpcode) -> Self {
        x as u8
    }
}

/// Operation kinds.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperationKind {
    /// Modular exponentiation, base<sup>exponent</sup> mod modulus.
    ModExp,
    /// Modular exponentiation with the Chinese remainder theorem.
    ModExpCrt,
    /// ECDSA signing.
    EcdsaSign,
    /// ECDSA verification.
    EcdsaVerify,
    /// Point on curve check.
    PointCheck,
    /// ECC scalar multiplication, k × P.
    EccScalarMul,
    /// Montgomery parameter R<sup>2</sup> mod modulus.
    MontgomeryParam,
}

impl OperationKind {
    /// All operation kinds.
    pub const ALL: [OperationKind; 7] = [
        OperationKind::ModExp,
        OperationKind::ModExpCrt,
        OperationKind::EcdsaSign,
        OperationKind::EcdsaVerify,
        OperationKind::PointCheck,
        OperationKind::EccScalarMul,
        OperationKind::MontgomeryParam,
    ];

    /// Operands that must be present for [`Pka::configure`].
    ///
    /// [`Pka::configure`]: crate::Pka::configure
    pub const fn required_operands(&self) -> &'static [OperandName] {
        use OperandName::*;

        match self {
            OperationKind::ModExp => &[Modulus, Exponent, Base],
            OperationKind::ModExpCrt => &[PrimeP, PrimeQ, CrtDp, CrtDq, CrtQinv, Base],
            OperationKind::EcdsaSign => &[
                CurvePrime, CurveA, CurveB, GeneratorX, GeneratorY, CurveOrder, PrivateKey, Nonce,
                Hash,
            ],
            OperationKind::EcdsaVerify => &[
                CurvePrime, CurveA, CurveB, GeneratorX, GeneratorY, CurveOrder, PublicX, PublicY,
                Hash, SignatureR, SignatureS,
            ],
            OperationKind::PointCheck => {
                &[CurvePrime, CurveA, CurveB, PointX, PointY, MontgomeryParam]
            }
            OperationKind::EccScalarMul => &[CurvePrime, CurveA, PointX, PointY, Scalar],
            OperationKind::MontgomeryParam => &[Modulus],
        }
    }

    /// Largest operand the accelerator accepts for this operation, in bits.
    pub const fn max_bits(&self) -> usize {
        if self.is_ecc() { 384 } else { 2048 }
    }

    /// Largest operand the accelerator accepts for this operation, in bytes.
    pub const fn max_bytes(&self) -> usize {
        self.max_bits() / 8
    }

    /// Returns `true` for elliptic curve operations.
    pub const fn is_ecc(&self) -> bool {
        matches!(
            self,
            OperationKind::EcdsaSign
                | OperationKind::EcdsaVerify
                | OperationKind::PointCheck
                | OperationKind::EccScalarMul
        )
    }

    pub(crate) const fn opcode(&self) -> PkaOpcode {
        match self {
            OperationKind::ModExp => PkaOpcode::MontgomeryParameterExponentiation,
            OperationKind::ModExpCrt => PkaOpcode::RsaCrt,
            OperationKind::EcdsaSign => PkaOpcode::EcdsaSign,
            OperationKind::EcdsaVerify => PkaOpcode::EcdsaVerify,
            OperationKind::PointCheck => PkaOpcode::Point,
            OperationKind::EccScalarMul => PkaOpcode::MontgomeryParameterEcc,
            OperationKind::MontgomeryParam => PkaOpcode::MontgomeryParameter,
        }
    }
}

/// ECDSA signature.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EcdsaSignature {
    /// Signature part r.
    pub r: Operand,
    /// Signature part s.
    pub s: Operand,
}

/// Curve point.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CurvePoint {
    /// Coordinate x.
    pub x: Operand,
    /// Coordinate y.
    pub y: Operand,
}

/// Result of a completed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResultSet {
    /// Single operand, from [`ModExp`], [`ModExpCrt`], and [`MontgomeryParam`].
    ///
    /// [`ModExp`]: OperationKind::ModExp
    /// [`ModExpCrt`]: OperationKind::ModExpCrt
    /// [`MontgomeryParam`]: OperationKind::MontgomeryParam
    Value(Operand),
    /// Signature from [`OperationKind::EcdsaSign`].
    Signature(EcdsaSignature),
    /// Point from [`OperationKind::EccScalarMul`].
    Point(CurvePoint),
    /// Boolean from [`EcdsaVerify`] (signature valid) and [`PointCheck`]
    /// (point on curve).
    ///
    /// [`EcdsaVerify`]: OperationKind::EcdsaVerify
    /// [`PointCheck`]: OperationKind::PointCheck
    Valid(bool),
}

impl ResultSet {
    /// Single operand result, if any.
    pub fn into_value(self) -> Option<Operand> {
        match self {
            ResultSet::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Signature result, if any.
    pub fn into_signature(self) -> Option<EcdsaSignature> {
        match self {
            ResultSet::Signature(sig) => Some(sig),
            _ => None,
        }
    }

    /// Point result, if any.
    pub fn into_point(self) -> Option<CurvePoint> {
        match self {
            ResultSet::Point(pt) => Some(pt),
            _ => None,
        }
    }

    /// Boolean result, if any.
    pub fn valid(&self) -> Option<bool> {
        match self {
            ResultSet::Valid(v) => Some(*v),
            _ => None,
        }
    }
}
