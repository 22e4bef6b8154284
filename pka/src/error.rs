use crate::{OperandName, OperationKind, State};

/// Hardware fault reported by the PKA status register.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fault {
    /// An AHB access to the PKA RAM occurred while the PKA core was computing
    /// and using its internal RAM.
    /// (AHB PKA_RAM access is not allowed while a PKA operation is in progress).
    ///
    /// The session is lost; a fresh session with the same operands may be
    /// retried.
    Ram,
    /// Address access is out of range (unmapped address).
    ///
    /// The operand layout is wrong; retrying without changing the
    /// configuration will fail again.
    Address,
}

impl Fault {
    /// Returns `true` if a fresh session with the same operands may succeed.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Fault::Ram)
    }
}

/// PKA errors.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// An operand required by the operation was not provided.
    MissingOperand(OperandName),
    /// An operand is wider than the slot it is loaded into, or wider than the
    /// accelerator supports for the operation class.
    OperandTooLarge(OperandName),
    /// Method called in a session state that does not allow it.
    InvalidState(State),
    /// An operation is in progress.
    Busy,
    /// The completion flag was not set within the polling budget.
    ///
    /// The operation is still running; waiting again is allowed.
    Timeout,
    /// Result requested before the operation completed successfully.
    ResultNotReady,
    /// Result requested for an operation other than the one loaded.
    Mode {
        /// Operation the session was configured for.
        configured: OperationKind,
    },
    /// See [`Fault::Ram`].
    Ram,
    /// See [`Fault::Address`].
    Address,
    /// ECDSA signature part R is equal to 0.
    Rzero,
    /// ECDSA signature part S is equal to 0.
    Szero,
    /// Unknown ECDSA signing result code.
    Unknown {
        /// Unknown result code bits.
        bits: u32,
    },
}

impl From<Fault> for Error {
    fn from(fault: Fault) -> Self {
        match fault {
            Fault::Ram => Error::Ram,
            Fault::Address => Error::Address,
        }
    }
}

/// An operand did not fit in its accelerator slot.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OperandTooLarge {
    /// Length of the operand in bytes.
    pub len: usize,
    /// Width of the slot in bytes.
    pub slot_width: usize,
}
