//! Register-level access to the PKA.

use crate::{
    Fault,
    codec::{MAX_SLOT_WORDS, Slot},
    layout::{RAM_NUM_DW, RAM_OFFSET},
};
use core::sync::atomic::{AtomicU32, Ordering::SeqCst};

/// Control register bits.
pub mod cr {
    /// PKA enable.
    pub const EN: u32 = 1 << 0;
    /// Start the operation.
    pub const START: u32 = 1 << 1;
    /// Operation mode shift.
    pub const MODE_SHIFT: u32 = 8;
    /// Operation mode mask.
    pub const MODE_MASK: u32 = 0b11_1111 << MODE_SHIFT;
    /// End of operation interrupt enable.
    pub const PROCENDIE: u32 = 1 << 17;
    /// RAM error interrupt enable.
    pub const RAMERRIE: u32 = 1 << 19;
    /// Address error interrupt enable.
    pub const ADDRERRIE: u32 = 1 << 20;
    /// All interrupt enables.
    pub const IE_MASK: u32 = PROCENDIE | RAMERRIE | ADDRERRIE;

    /// Operation mode field value.
    pub const fn mode(opcode: u8) -> u32 {
        ((opcode as u32) << MODE_SHIFT) & MODE_MASK
    }

    /// Operation mode from a control register value.
    pub const fn mode_of(cr: u32) -> u8 {
        ((cr & MODE_MASK) >> MODE_SHIFT) as u8
    }
}

/// Status register bits.
pub mod sr {
    /// Operation in progress.
    pub const BUSY: u32 = 1 << 16;
    /// End of operation.
    pub const PROCENDF: u32 = 1 << 17;
    /// RAM error.
    pub const RAMERRF: u32 = 1 << 19;
    /// Address error.
    pub const ADDRERRF: u32 = 1 << 20;
}

/// Clear flag register bits.
pub mod clrfr {
    /// Clear end of operation flag.
    pub const PROCENDFC: u32 = 1 << 17;
    /// Clear RAM error flag.
    pub const RAMERRFC: u32 = 1 << 19;
    /// Clear address error flag.
    pub const ADDRERRFC: u32 = 1 << 20;
    /// Clear all flags.
    pub const ALL: u32 = PROCENDFC | RAMERRFC | ADDRERRFC;
}

/// Status register value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status(u32);

impl Status {
    /// Create a status from raw bits.
    pub const fn from_bits(bits: u32) -> Status {
        Status(bits)
    }

    /// Raw bits.
    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Operation in progress.
    pub const fn busy(&self) -> bool {
        self.0 & sr::BUSY != 0
    }

    /// End of operation.
    pub const fn procend(&self) -> bool {
        self.0 & sr::PROCENDF != 0
    }

    /// Hardware fault, if any.
    ///
    /// An address error takes priority over a RAM error.
    pub const fn fault(&self) -> Option<Fault> {
        if self.0 & sr::ADDRERRF != 0 {
            Some(Fault::Address)
        } else if self.0 & sr::RAMERRF != 0 {
            Some(Fault::Ram)
        } else {
            None
        }
    }

    /// Operation finished, successfully or not.
    pub const fn is_done(&self) -> bool {
        self.procend() || self.fault().is_some()
    }
}

/// Single-slot completion event.
///
/// Written once by the interrupt adapter, taken once by the dispatcher.
#[derive(Debug)]
pub struct Completion {
    status: AtomicU32,
    #[cfg(feature = "aio")]
    waker: futures_util::task::AtomicWaker,
}

impl Default for Completion {
    fn default() -> Self {
        Self::new()
    }
}

impl Completion {
    const SIGNALED: u32 = 1 << 31;

    /// Create an empty completion.
    pub const fn new() -> Completion {
        Completion {
            status: AtomicU32::new(0),
            #[cfg(feature = "aio")]
            waker: futures_util::task::AtomicWaker::new(),
        }
    }

    /// Store the status captured by the interrupt handler and wake the waiter.
    pub fn signal(&self, status: Status) {
        self.status.store(status.bits() | Self::SIGNALED, SeqCst);
        #[cfg(feature = "aio")]
        self.waker.wake();
    }

    /// Returns `true` if a status has been signaled and not taken.
    pub fn is_signaled(&self) -> bool {
        self.status.load(SeqCst) & Self::SIGNALED != 0
    }

    /// Take the signaled status, leaving the completion empty.
    pub fn take(&self) -> Option<Status> {
        let bits: u32 = self.status.swap(0, SeqCst);
        if bits & Self::SIGNALED != 0 {
            Some(Status(bits & !Self::SIGNALED))
        } else {
            None
        }
    }

    /// Discard any signaled status.
    pub fn reset(&self) {
        self.status.store(0, SeqCst);
    }

    /// Poll for the signaled status.
    #[cfg(feature = "aio")]
    #[cfg_attr(docsrs, doc(cfg(feature = "aio")))]
    pub fn poll(&self, cx: &mut core::task::Context<'_>) -> core::task::Poll<Status> {
        self.waker.register(cx.waker());
        match self.take() {
            Some(status) => {
                self.waker.take();
                core::task::Poll::Ready(status)
            }
            None => core::task::Poll::Pending,
        }
    }
}

/// PKA peripheral registers and RAM.
///
/// Implemented by [`hw::PkaRegs`] for the silicon and by software models for
/// host testing.
///
/// [`hw::PkaRegs`]: crate::hw::PkaRegs
pub trait PkaPeripheral {
    /// Read the control register.
    fn cr(&self) -> u32;

    /// Write the control register.
    fn set_cr(&mut self, cr: u32);

    /// Read the status register.
    fn sr(&mut self) -> Status;

    /// Write the clear flag register.
    fn clear_flags(&mut self, clrfr: u32);

    /// Write one RAM word at `offset` bytes from the peripheral base.
    fn write_word(&mut self, offset: usize, word: u32);

    /// Read one RAM word at `offset` bytes from the peripheral base.
    fn read_word(&mut self, offset: usize) -> u32;

    /// Completion event resolved by [`service_interrupt`].
    ///
    /// [`service_interrupt`]: PkaPeripheral::service_interrupt
    fn completion(&self) -> &Completion;

    /// Suspend until an interrupt may have signaled the completion.
    fn wait_for_interrupt(&mut self);

    /// Write a slot and its trailing zero word at `offset`.
    fn write_slot(&mut self, offset: usize, slot: &Slot) {
        let words: &[u32] = slot.words();
        words
            .iter()
            .enumerate()
            .for_each(|(idx, &dw)| self.write_word(offset + idx * 4, dw));
        self.write_word(offset + words.len() * 4, 0);
    }

    /// Read a slot of `width` bytes at `offset`.
    fn read_slot(&mut self, offset: usize, width: usize) -> Slot {
        let mut slot: Slot = Slot::zeroed(crate::codec::words_for(width).min(MAX_SLOT_WORDS));
        slot.words_mut()
            .iter_mut()
            .enumerate()
            .for_each(|(idx, dw)| *dw = self.read_word(offset + idx * 4));
        slot
    }

    /// Zero the entire PKA RAM.
    fn zero_ram(&mut self) {
        (0..RAM_NUM_DW).for_each(|dw| self.write_word(RAM_OFFSET + dw * 4, 0));
    }

    /// Interrupt adapter.
    ///
    /// Captures the status register into the [`Completion`], clears the flags,
    /// and masks the PKA interrupt sources.
    /// Call this from the PKA interrupt handler.
    fn service_interrupt(&mut self) {
        let status: Status = self.sr();
        let ctrl: u32 = self.cr();
        self.set_cr(ctrl & !(cr::IE_MASK | cr::START));
        self.clear_flags(clrfr::ALL);
        trace!("PKA IRQ sr={:#X}", status.bits());
        self.completion().signal(status);
    }
}
