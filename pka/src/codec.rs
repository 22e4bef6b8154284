//! Operand buffer codec.
//!
//! Operands cross the driver API as big-endian byte strings.
//! The PKA RAM holds them as 32-bit words, least significant word first,
//! followed by one zero word.
//! This module is the only place where the byte order changes.

use crate::error::OperandTooLarge;
use arrayvec::ArrayVec;
use core::fmt;

/// Largest operand in bytes (RSA-2048).
pub const MAX_OPERAND_BYTES: usize = 256;

/// Largest slot in 32-bit words, not counting the trailing zero word.
pub const MAX_SLOT_WORDS: usize = MAX_OPERAND_BYTES / 4;

/// Big-endian unsigned integer read back from the accelerator.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Operand {
    bytes: ArrayVec<u8, MAX_OPERAND_BYTES>,
}

impl Operand {
    /// Create an operand from big-endian bytes.
    ///
    /// # Example
    ///
    /// ```
    /// use stm32l4_hal_pka::codec::Operand;
    ///
    /// let op = Operand::from_be_bytes(&[0x01, 0x00, 0x01]).unwrap();
    /// assert_eq!(op.as_be_bytes(), &[0x01, 0x00, 0x01]);
    /// assert!(Operand::from_be_bytes(&[0; 257]).is_err());
    /// ```
    pub fn from_be_bytes(bytes: &[u8]) -> Result<Operand, OperandTooLarge> {
        let mut op = Operand::default();
        op.bytes
            .try_extend_from_slice(bytes)
            .map_err(|_| OperandTooLarge {
                len: bytes.len(),
                slot_width: MAX_OPERAND_BYTES,
            })?;
        Ok(op)
    }

    /// Big-endian bytes of the operand.
    pub fn as_be_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length in bytes, including leading zeros.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the operand has no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns `true` if every byte is zero.
    pub fn is_zero(&self) -> bool {
        self.bytes.iter().all(|&b| b == 0)
    }
}

impl AsRef<[u8]> for Operand {
    fn as_ref(&self) -> &[u8] {
        self.as_be_bytes()
    }
}

impl fmt::Debug for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Operand(")?;
        self.bytes.iter().try_for_each(|b| write!(f, "{b:02x}"))?;
        f.write_str(")")
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Operand {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Operand({=[u8]:x})", self.as_be_bytes())
    }
}

/// Operand in accelerator word order, least significant word first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slot {
    words: [u32; MAX_SLOT_WORDS],
    len: usize,
}

impl Slot {
    /// Slot of `num_words` zero words.
    ///
    /// `num_words` saturates at [`MAX_SLOT_WORDS`].
    pub const fn zeroed(num_words: usize) -> Slot {
        Slot {
            words: [0; MAX_SLOT_WORDS],
            len: if num_words > MAX_SLOT_WORDS {
                MAX_SLOT_WORDS
            } else {
                num_words
            },
        }
    }

    /// Words of the slot, least significant first.
    pub fn words(&self) -> &[u32] {
        &self.words[..self.len]
    }

    /// Mutable words of the slot, least significant first.
    pub fn words_mut(&mut self) -> &mut [u32] {
        &mut self.words[..self.len]
    }

    /// Width of the slot in bytes.
    pub const fn width(&self) -> usize {
        self.len * 4
    }
}

/// Number of 32-bit words needed to hold `bytes` bytes.
pub const fn words_for(bytes: usize) -> usize {
    bytes.div_ceil(4)
}

/// Width of the slot in bytes needed to hold `bytes` bytes.
pub const fn slot_width_for(bytes: usize) -> usize {
    words_for(bytes) * 4
}

/// Strip leading zero bytes.
///
/// An all-zero input strips to an empty slice.
pub fn strip_leading_zeros(value: &[u8]) -> &[u8] {
    let first: usize = value.iter().position(|&b| b != 0).unwrap_or(value.len());
    &value[first..]
}

/// Left-pad `value` with zeros to `slot_width` bytes and convert to
/// accelerator word order.
///
/// # Example
///
/// ```
/// use stm32l4_hal_pka::codec::encode;
///
/// let slot = encode(&[0x01, 0x02, 0x03, 0x04, 0x05], 8).unwrap();
/// assert_eq!(slot.words(), &[0x0203_0405, 0x0000_0001]);
/// assert!(encode(&[0; 9], 8).is_err());
/// ```
pub fn encode(value: &[u8], slot_width: usize) -> Result<Slot, OperandTooLarge> {
    let num_words: usize = words_for(slot_width);
    if value.len() > slot_width || num_words > MAX_SLOT_WORDS {
        return Err(OperandTooLarge {
            len: value.len(),
            slot_width,
        });
    }

    let mut slot: Slot = Slot::zeroed(num_words);
    value.iter().rev().enumerate().for_each(|(idx, &byte)| {
        slot.words[idx / 4] |= u32::from(byte) << ((idx % 4) * 8);
    });
    Ok(slot)
}

/// Copy the low-order `result_width` bytes out of `slot` as big-endian bytes.
///
/// Bytes beyond the slot read as zero.
/// `result_width` saturates at [`MAX_OPERAND_BYTES`].
///
/// # Example
///
/// ```
/// use stm32l4_hal_pka::codec::{decode, encode};
///
/// let slot = encode(&[0xAB, 0xCD], 4).unwrap();
/// assert_eq!(decode(&slot, 2).as_be_bytes(), &[0xAB, 0xCD]);
/// assert_eq!(decode(&slot, 3).as_be_bytes(), &[0x00, 0xAB, 0xCD]);
/// ```
pub fn decode(slot: &Slot, result_width: usize) -> Operand {
    let width: usize = result_width.min(MAX_OPERAND_BYTES);
    let mut op: Operand = Operand::default();
    (0..width).rev().for_each(|idx| {
        let word: u32 = slot.words().get(idx / 4).copied().unwrap_or(0);
        op.bytes.push((word >> ((idx % 4) * 8)) as u8);
    });
    op
}
