//! Memory-mapped PKA backend.

use crate::{
    layout::RAM_END,
    periph::{Completion, PkaPeripheral, Status, cr},
};
use core::{
    ptr::{read_volatile, write_volatile},
    sync::atomic::{Ordering::SeqCst, compiler_fence},
};

/// PKA base address on the STM32L4+ and STM32L4Qx devices.
pub const PKA_BASE: usize = 0x5006_2000;

const CR: usize = 0x00;
const SR: usize = 0x04;
const CLRFR: usize = 0x08;

static COMPLETION: Completion = Completion::new();

/// Memory-mapped PKA registers.
///
/// Created with [`PkaRegs::new`].
#[derive(Debug)]
pub struct PkaRegs {
    base: usize,
}

impl PkaRegs {
    /// Create the register backend for the PKA at `base`.
    ///
    /// This does not enable the peripheral, see [`enable`](Self::enable).
    ///
    /// # Safety
    ///
    /// 1. `base` must be the address of a PKA peripheral whose bus clock is
    ///    enabled.
    /// 2. The caller is responsible for ensuring the backend has exclusive
    ///    access to the PKA.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use stm32l4_hal_pka::{
    ///     Pka,
    ///     hw::{PKA_BASE, PkaRegs},
    /// };
    ///
    /// let mut regs: PkaRegs = unsafe { PkaRegs::new(PKA_BASE) };
    /// regs.enable();
    /// let mut pka: Pka<PkaRegs> = Pka::new(regs);
    /// ```
    pub const unsafe fn new(base: usize) -> PkaRegs {
        PkaRegs { base }
    }

    /// Base address.
    pub const fn base(&self) -> usize {
        self.base
    }

    /// Enable the PKA.
    ///
    /// After the PKA reset is released the PKA RAM is cleared automatically,
    /// taking 894 clock cycles.
    /// During this time the setting of EN bit in PKA_CR is ignored.
    pub fn enable(&mut self) {
        self.set_cr(cr::EN);
        while self.cr() & cr::EN == 0 {
            self.set_cr(cr::EN);
        }
    }

    /// Disable the PKA.
    pub fn disable(&mut self) {
        self.set_cr(0);
    }

    #[inline]
    fn reg(&self, offset: usize) -> *mut u32 {
        (self.base + offset) as *mut u32
    }
}

impl PkaPeripheral for PkaRegs {
    fn cr(&self) -> u32 {
        unsafe { read_volatile(self.reg(CR)) }
    }

    fn set_cr(&mut self, cr: u32) {
        unsafe { write_volatile(self.reg(CR), cr) }
    }

    fn sr(&mut self) -> Status {
        Status::from_bits(unsafe { read_volatile(self.reg(SR)) })
    }

    fn clear_flags(&mut self, clrfr: u32) {
        unsafe { write_volatile(self.reg(CLRFR), clrfr) }
    }

    fn write_word(&mut self, offset: usize, word: u32) {
        debug_assert_eq!(offset % 4, 0);
        debug_assert!(offset < RAM_END);
        compiler_fence(SeqCst);
        unsafe { write_volatile(self.reg(offset), word) };
        compiler_fence(SeqCst);
    }

    fn read_word(&mut self, offset: usize) -> u32 {
        debug_assert_eq!(offset % 4, 0);
        debug_assert!(offset < RAM_END);
        compiler_fence(SeqCst);
        let word: u32 = unsafe { read_volatile(self.reg(offset)) };
        compiler_fence(SeqCst);
        word
    }

    fn completion(&self) -> &Completion {
        &COMPLETION
    }

    fn wait_for_interrupt(&mut self) {
        cfg_if::cfg_if! {
            if #[cfg(all(target_arch = "arm", target_os = "none"))] {
                // checked with interrupts masked so the wakeup cannot be lost
                // between the check and the WFI
                cortex_m::interrupt::free(|_| {
                    if !COMPLETION.is_signaled() {
                        cortex_m::asm::wfi();
                    }
                });
            } else {
                core::hint::spin_loop();
            }
        }
    }
}

/// PKA interrupt handler body.
///
/// # Safety
///
/// `base` must be the address of the PKA serviced by the driver.
///
/// # Example
///
/// ```ignore
/// use stm32l4_hal_pka::hw::{PKA_BASE, on_interrupt};
///
/// #[interrupt]
/// fn PKA() {
///     unsafe { on_interrupt(PKA_BASE) }
/// }
/// ```
pub unsafe fn on_interrupt(base: usize) {
    let mut regs: PkaRegs = unsafe { PkaRegs::new(base) };
    regs.service_interrupt();
}
