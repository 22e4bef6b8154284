//! PKA RAM layout.
//!
//! Offsets are in bytes from the peripheral base address.
//! Operand slots are written least significant word first and are followed by
//! one zero word.

use crate::{OperandName, OperandSet, OperationKind, Sign, codec::words_for};
use arrayvec::ArrayVec;
use static_assertions as sa;

/// PKA RAM offset.
pub const RAM_OFFSET: usize = 0x400;
/// PKA RAM size in 32-bit words.
pub const RAM_NUM_DW: usize = 894;
/// End of the PKA RAM (exclusive).
pub const RAM_END: usize = RAM_OFFSET + RAM_NUM_DW * 4;

/// Modular exponentiation.
#[allow(missing_docs)]
pub mod mod_exp {
    pub const IN_EXP_NB_BITS: usize = 0x400;
    pub const IN_OP_NB_BITS: usize = 0x404;
    pub const IN_EXPONENT_BASE: usize = 0x8B4;
    pub const IN_EXPONENT: usize = 0xBD4;
    pub const IN_MODULUS: usize = 0xD5C;
    pub const OUT_RESULT: usize = 0x724;
}

/// Montgomery parameter computation.
#[allow(missing_docs)]
pub mod montgomery {
    pub const IN_MOD_NB_BITS: usize = 0x404;
    pub const IN_MODULUS: usize = 0xD5C;
    pub const OUT_PARAMETER: usize = 0x594;
}

/// RSA CRT exponentiation.
#[allow(missing_docs)]
pub mod rsa_crt {
    pub const IN_MOD_NB_BITS: usize = 0x404;
    pub const IN_DP_CRT: usize = 0x65C;
    pub const IN_DQ_CRT: usize = 0xBD4;
    pub const IN_QINV_CRT: usize = 0x7EC;
    pub const IN_PRIME_P: usize = 0x97C;
    pub const IN_PRIME_Q: usize = 0xD5C;
    pub const IN_EXPONENT_BASE: usize = 0xEEC;
    pub const OUT_RESULT: usize = 0x724;
}

/// ECC scalar multiplication.
#[allow(missing_docs)]
pub mod ecc_scalar_mul {
    pub const IN_EXP_NB_BITS: usize = 0x400;
    pub const IN_OP_NB_BITS: usize = 0x404;
    pub const IN_A_COEFF_SIGN: usize = 0x408;
    pub const IN_A_COEFF: usize = 0x40C;
    pub const IN_MOD_GF: usize = 0x460;
    pub const IN_K: usize = 0x508;
    pub const IN_INITIAL_POINT_X: usize = 0x55C;
    pub const IN_INITIAL_POINT_Y: usize = 0x5B0;
    pub const OUT_RESULT_X: usize = 0x55C;
    pub const OUT_RESULT_Y: usize = 0x5B0;
}

/// Point on elliptic curve Fp check.
#[allow(missing_docs)]
pub mod point_check {
    pub const IN_MOD_NB_BITS: usize = 0x404;
    pub const IN_A_COEFF_SIGN: usize = 0x408;
    pub const IN_A_COEFF: usize = 0x40C;
    pub const IN_B_COEFF: usize = 0x7FC;
    pub const IN_MOD_GF: usize = 0x460;
    pub const IN_INITIAL_POINT_X: usize = 0x55C;
    pub const IN_INITIAL_POINT_Y: usize = 0x5B0;
    pub const IN_MONTGOMERY_PARAM: usize = 0x4B4;
    /// Zero when the point is on the curve.
    pub const OUT_ERROR: usize = 0x400;
}

/// ECDSA signing.
#[allow(missing_docs)]
pub mod ecdsa_sign {
    pub const IN_ORDER_NB_BITS: usize = 0x400;
    pub const IN_MOD_NB_BITS: usize = 0x404;
    pub const IN_A_COEFF_SIGN: usize = 0x408;
    pub const IN_A_COEFF: usize = 0x40C;
    pub const IN_MOD_GF: usize = 0x460;
    pub const IN_K: usize = 0x508;
    pub const IN_INITIAL_POINT_X: usize = 0x55C;
    pub const IN_INITIAL_POINT_Y: usize = 0x5B0;
    pub const IN_HASH_E: usize = 0xDE8;
    pub const IN_PRIVATE_KEY_D: usize = 0xE3C;
    pub const IN_ORDER_N: usize = 0xE94;
    pub const OUT_SIGNATURE_R: usize = 0x700;
    pub const OUT_SIGNATURE_S: usize = 0x754;
    /// 0 on success, 1 when R is zero, 2 when S is zero.
    pub const OUT_ERROR: usize = 0xEE8;
}

/// ECDSA verification.
#[allow(missing_docs)]
pub mod ecdsa_verify {
    pub const IN_ORDER_NB_BITS: usize = 0x404;
    pub const IN_MOD_NB_BITS: usize = 0x4B4;
    pub const IN_A_COEFF_SIGN: usize = 0x45C;
    pub const IN_A_COEFF: usize = 0x460;
    pub const IN_MOD_GF: usize = 0x4B8;
    pub const IN_INITIAL_POINT_X: usize = 0x5E8;
    pub const IN_INITIAL_POINT_Y: usize = 0x63C;
    pub const IN_PUBLIC_KEY_POINT_X: usize = 0xF40;
    pub const IN_PUBLIC_KEY_POINT_Y: usize = 0xF94;
    pub const IN_SIGNATURE_R: usize = 0x1098;
    pub const IN_SIGNATURE_S: usize = 0xA44;
    pub const IN_HASH_E: usize = 0xFE8;
    pub const IN_ORDER_N: usize = 0xD5C;
    /// Zero when the signature is valid.
    pub const OUT_RESULT: usize = 0x5B0;
}

sa::const_assert!(RAM_END == 0x11F8);
sa::const_assert!(ecdsa_verify::IN_SIGNATURE_R + 13 * 4 <= RAM_END);
sa::const_assert!(rsa_crt::IN_EXPONENT_BASE + 65 * 4 <= RAM_END);
sa::const_assert!(mod_exp::IN_MODULUS + 65 * 4 <= rsa_crt::IN_EXPONENT_BASE);

/// Operand widths of a session, in bytes, after stripping leading zeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) struct Widths {
    /// Modulus or curve prime width.
    pub op: usize,
    /// Exponent, prime factor, curve order, or scalar width.
    pub aux: usize,
}

impl Widths {
    /// Width of the result operand(s).
    pub const fn result(&self, kind: OperationKind) -> usize {
        match kind {
            OperationKind::EcdsaSign => self.aux,
            _ => self.op,
        }
    }
}

/// Compute the session widths from the operands.
///
/// Absent operands have zero width.
pub(crate) fn widths(kind: OperationKind, ops: &OperandSet) -> Widths {
    let len = |name: OperandName| -> usize {
        ops.get(name)
            .map_or(0, |v| crate::codec::strip_leading_zeros(v).len())
    };
    match kind {
        OperationKind::ModExp => Widths {
            op: len(OperandName::Modulus),
            aux: len(OperandName::Exponent),
        },
        OperationKind::ModExpCrt => {
            let half: usize = len(OperandName::PrimeP).max(len(OperandName::PrimeQ));
            Widths {
                op: half * 2,
                aux: half,
            }
        }
        OperationKind::EcdsaSign | OperationKind::EcdsaVerify => Widths {
            op: len(OperandName::CurvePrime),
            aux: len(OperandName::CurveOrder),
        },
        OperationKind::PointCheck => Widths {
            op: len(OperandName::CurvePrime),
            aux: 0,
        },
        OperationKind::EccScalarMul => Widths {
            op: len(OperandName::CurvePrime),
            aux: len(OperandName::Scalar),
        },
        OperationKind::MontgomeryParam => Widths {
            op: len(OperandName::Modulus),
            aux: 0,
        },
    }
}

/// Operand whose width sets [`Widths::op`] for `kind`.
pub(crate) fn op_width_source(kind: OperationKind, ops: &OperandSet) -> OperandName {
    let len = |name: OperandName| -> usize {
        ops.get(name)
            .map_or(0, |v| crate::codec::strip_leading_zeros(v).len())
    };
    match kind {
        OperationKind::ModExp | OperationKind::MontgomeryParam => OperandName::Modulus,
        OperationKind::ModExpCrt if len(OperandName::PrimeQ) > len(OperandName::PrimeP) => {
            OperandName::PrimeQ
        }
        OperationKind::ModExpCrt => OperandName::PrimeP,
        _ => OperandName::CurvePrime,
    }
}

/// Location of an operand slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SlotLoc {
    /// Byte offset from the peripheral base.
    pub offset: usize,
    /// Slot width in bytes, rounded up to whole words.
    pub width: usize,
    /// Widest value the slot accepts, in bytes.
    pub limit: usize,
}

/// Slot of `name` for `kind`.
///
/// Returns `None` for operands that are validated but not loaded.
pub(crate) const fn slot(kind: OperationKind, name: OperandName, w: &Widths) -> Option<SlotLoc> {
    use OperandName::*;

    const fn loc(offset: usize, width: usize) -> Option<SlotLoc> {
        Some(SlotLoc {
            offset,
            width: words_for(width) * 4,
            limit: width,
        })
    }

    match kind {
        OperationKind::ModExp => match name {
            Modulus => loc(mod_exp::IN_MODULUS, w.op),
            Exponent => loc(mod_exp::IN_EXPONENT, w.aux),
            Base => loc(mod_exp::IN_EXPONENT_BASE, w.op),
            _ => None,
        },
        OperationKind::ModExpCrt => match name {
            PrimeP => loc(rsa_crt::IN_PRIME_P, w.aux),
            PrimeQ => loc(rsa_crt::IN_PRIME_Q, w.aux),
            CrtDp => loc(rsa_crt::IN_DP_CRT, w.aux),
            CrtDq => loc(rsa_crt::IN_DQ_CRT, w.aux),
            CrtQinv => loc(rsa_crt::IN_QINV_CRT, w.aux),
            Base => loc(rsa_crt::IN_EXPONENT_BASE, w.op),
            _ => None,
        },
        OperationKind::EcdsaSign => match name {
            CurveA => loc(ecdsa_sign::IN_A_COEFF, w.op),
            CurvePrime => loc(ecdsa_sign::IN_MOD_GF, w.op),
            Nonce => loc(ecdsa_sign::IN_K, w.aux),
            GeneratorX => loc(ecdsa_sign::IN_INITIAL_POINT_X, w.op),
            GeneratorY => loc(ecdsa_sign::IN_INITIAL_POINT_Y, w.op),
            Hash => loc(ecdsa_sign::IN_HASH_E, w.aux),
            PrivateKey => loc(ecdsa_sign::IN_PRIVATE_KEY_D, w.aux),
            CurveOrder => loc(ecdsa_sign::IN_ORDER_N, w.aux),
            _ => None,
        },
        OperationKind::EcdsaVerify => match name {
            CurveA => loc(ecdsa_verify::IN_A_COEFF, w.op),
            CurvePrime => loc(ecdsa_verify::IN_MOD_GF, w.op),
            GeneratorX => loc(ecdsa_verify::IN_INITIAL_POINT_X, w.op),
            GeneratorY => loc(ecdsa_verify::IN_INITIAL_POINT_Y, w.op),
            PublicX => loc(ecdsa_verify::IN_PUBLIC_KEY_POINT_X, w.op),
            PublicY => loc(ecdsa_verify::IN_PUBLIC_KEY_POINT_Y, w.op),
            SignatureR => loc(ecdsa_verify::IN_SIGNATURE_R, w.aux),
            SignatureS => loc(ecdsa_verify::IN_SIGNATURE_S, w.aux),
            Hash => loc(ecdsa_verify::IN_HASH_E, w.aux),
            CurveOrder => loc(ecdsa_verify::IN_ORDER_N, w.aux),
            _ => None,
        },
        OperationKind::PointCheck => match name {
            CurveA => loc(point_check::IN_A_COEFF, w.op),
            CurveB => loc(point_check::IN_B_COEFF, w.op),
            CurvePrime => loc(point_check::IN_MOD_GF, w.op),
            PointX => loc(point_check::IN_INITIAL_POINT_X, w.op),
            PointY => loc(point_check::IN_INITIAL_POINT_Y, w.op),
            MontgomeryParam => loc(point_check::IN_MONTGOMERY_PARAM, w.op),
            _ => None,
        },
        OperationKind::EccScalarMul => match name {
            CurveA => loc(ecc_scalar_mul::IN_A_COEFF, w.op),
            CurvePrime => loc(ecc_scalar_mul::IN_MOD_GF, w.op),
            Scalar => loc(ecc_scalar_mul::IN_K, w.aux),
            PointX => loc(ecc_scalar_mul::IN_INITIAL_POINT_X, w.op),
            PointY => loc(ecc_scalar_mul::IN_INITIAL_POINT_Y, w.op),
            _ => None,
        },
        OperationKind::MontgomeryParam => match name {
            Modulus => loc(montgomery::IN_MODULUS, w.op),
            _ => None,
        },
    }
}

/// Length and sign words written before the operands.
pub(crate) fn header(kind: OperationKind, w: &Widths, sign: Sign) -> ArrayVec<(usize, u32), 3> {
    let bits = |bytes: usize| (bytes * 8) as u32;
    let mut hdr: ArrayVec<(usize, u32), 3> = ArrayVec::new();
    match kind {
        OperationKind::ModExp => {
            hdr.push((mod_exp::IN_EXP_NB_BITS, bits(w.aux)));
            hdr.push((mod_exp::IN_OP_NB_BITS, bits(w.op)));
        }
        OperationKind::ModExpCrt => hdr.push((rsa_crt::IN_MOD_NB_BITS, bits(w.op))),
        OperationKind::EcdsaSign => {
            hdr.push((ecdsa_sign::IN_ORDER_NB_BITS, bits(w.aux)));
            hdr.push((ecdsa_sign::IN_MOD_NB_BITS, bits(w.op)));
            hdr.push((ecdsa_sign::IN_A_COEFF_SIGN, sign.into()));
        }
        OperationKind::EcdsaVerify => {
            hdr.push((ecdsa_verify::IN_ORDER_NB_BITS, bits(w.aux)));
            hdr.push((ecdsa_verify::IN_MOD_NB_BITS, bits(w.op)));
            hdr.push((ecdsa_verify::IN_A_COEFF_SIGN, sign.into()));
        }
        OperationKind::PointCheck => {
            hdr.push((point_check::IN_MOD_NB_BITS, bits(w.op)));
            hdr.push((point_check::IN_A_COEFF_SIGN, sign.into()));
        }
        OperationKind::EccScalarMul => {
            hdr.push((ecc_scalar_mul::IN_EXP_NB_BITS, bits(w.aux)));
            hdr.push((ecc_scalar_mul::IN_OP_NB_BITS, bits(w.op)));
            hdr.push((ecc_scalar_mul::IN_A_COEFF_SIGN, sign.into()));
        }
        OperationKind::MontgomeryParam => hdr.push((montgomery::IN_MOD_NB_BITS, bits(w.op))),
    }
    hdr
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_loaded_slot_is_in_ram() {
        let w: Widths = Widths { op: 256, aux: 256 };
        for kind in OperationKind::ALL {
            let w: Widths = if kind.is_ecc() {
                Widths { op: 48, aux: 48 }
            } else {
                w
            };
            for &name in kind.required_operands() {
                if let Some(loc) = slot(kind, name, &w) {
                    assert!(loc.offset >= RAM_OFFSET);
                    assert_eq!(loc.offset % 4, 0);
                    assert!(loc.offset + loc.width + 4 <= RAM_END, "{kind:?} {name:?}");
                }
            }
        }
    }

    #[test]
    fn unused_operands_have_no_slot() {
        let w: Widths = Widths { op: 32, aux: 32 };
        assert_eq!(slot(OperationKind::EcdsaVerify, OperandName::CurveB, &w), None);
        assert_eq!(slot(OperationKind::EcdsaSign, OperandName::CurveB, &w), None);
        assert_eq!(slot(OperationKind::ModExp, OperandName::Hash, &w), None);
    }

    #[test]
    fn slot_width_is_word_aligned() {
        let w: Widths = Widths { op: 29, aux: 3 };
        assert_eq!(
            slot(OperationKind::ModExp, OperandName::Base, &w),
            Some(SlotLoc {
                offset: mod_exp::IN_EXPONENT_BASE,
                width: 32,
                limit: 29,
            })
        );
        assert_eq!(
            slot(OperationKind::ModExp, OperandName::Exponent, &w),
            Some(SlotLoc {
                offset: mod_exp::IN_EXPONENT,
                width: 4,
                limit: 3,
            })
        );
    }

    #[test]
    fn crt_width_follows_wider_prime() {
        let p: [u8; 3] = [1, 2, 3];
        let q: [u8; 4] = [1, 2, 3, 4];
        let ops: OperandSet = OperandSet::new()
            .with(OperandName::PrimeP, &p)
            .with(OperandName::PrimeQ, &q);
        assert_eq!(widths(OperationKind::ModExpCrt, &ops), Widths { op: 8, aux: 4 });
        assert_eq!(
            op_width_source(OperationKind::ModExpCrt, &ops),
            OperandName::PrimeQ
        );
        let ops: OperandSet = ops.with(OperandName::PrimeQ, &[0, 0, 1]);
        assert_eq!(
            op_width_source(OperationKind::ModExpCrt, &ops),
            OperandName::PrimeP
        );
    }

    #[test]
    fn sign_header() {
        let w: Widths = Widths { op: 32, aux: 32 };
        let hdr = header(OperationKind::EcdsaSign, &w, Sign::Neg);
        assert_eq!(
            hdr.as_slice(),
            &[
                (ecdsa_sign::IN_ORDER_NB_BITS, 256),
                (ecdsa_sign::IN_MOD_NB_BITS, 256),
                (ecdsa_sign::IN_A_COEFF_SIGN, 1)
            ]
        );
    }
}
