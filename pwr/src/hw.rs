//! Memory-mapped power control and RTC backup register backends.

use crate::{BackupRegisters, PowerMode, PwrPeripheral, VoltageRange, WakeupFlags, WakeupPin};
use core::{
    ptr::{read_volatile, write_volatile},
    sync::atomic::{Ordering::SeqCst, compiler_fence},
};

/// PWR base address.
pub const PWR_BASE: usize = 0x4000_7000;

/// RTC base address.
pub const RTC_BASE: usize = 0x4000_2800;

const CR1: usize = 0x00;
const CR3: usize = 0x08;
const CR4: usize = 0x0C;
const SR1: usize = 0x10;
const SR2: usize = 0x14;
const SCR: usize = 0x18;

const RTC_BKP0R: usize = 0x50;
const RTC_BKP_COUNT: usize = 32;

const SCB_SCR_SLEEPDEEP: u32 = 0x1 << 2;

mod cr1 {
    pub const LPMS: u32 = 0b111;
    pub const LPMS_STOP0: u32 = 0b000;
    pub const LPMS_STOP1: u32 = 0b001;
    pub const LPMS_STOP2: u32 = 0b010;
    pub const LPMS_STANDBY: u32 = 0b011;
    pub const LPMS_SHUTDOWN: u32 = 0b100;
    pub const DBP: u32 = 1 << 8;
    pub const VOS: u32 = 0b11 << 9;
    pub const VOS_RANGE1: u32 = 0b01 << 9;
    pub const VOS_RANGE2: u32 = 0b10 << 9;
    pub const LPR: u32 = 1 << 14;
}

mod cr3 {
    pub const EWUP: u32 = 0x1F;
    pub const RRS: u32 = 1 << 8;
    pub const EIWUL: u32 = 1 << 15;
}

mod cr4 {
    pub const WP: u32 = 0x1F;
}

mod sr1 {
    pub const SBF: u32 = 1 << 8;
}

mod sr2 {
    pub const REGLPF: u32 = 1 << 9;
    pub const VOSF: u32 = 1 << 10;
}

mod scr {
    pub const CWUF: u32 = 0x1F;
    pub const CSBF: u32 = 1 << 8;
}

#[inline]
unsafe fn read(addr: usize) -> u32 {
    unsafe { read_volatile(addr as *const u32) }
}

#[inline]
unsafe fn write(addr: usize, val: u32) {
    unsafe { write_volatile(addr as *mut u32, val) }
}

#[inline]
unsafe fn modify(addr: usize, f: impl FnOnce(u32) -> u32) {
    unsafe { write(addr, f(read(addr))) }
}

const fn lpms(mode: PowerMode) -> u32 {
    match mode {
        PowerMode::Stop1 => cr1::LPMS_STOP1,
        PowerMode::Stop2 => cr1::LPMS_STOP2,
        PowerMode::Standby => cr1::LPMS_STANDBY,
        PowerMode::Shutdown => cr1::LPMS_SHUTDOWN,
        _ => cr1::LPMS_STOP0,
    }
}

fn set_sleepdeep(deep: bool) {
    let scr = unsafe { &(*cortex_m::peripheral::SCB::PTR).scr };
    if deep {
        unsafe { scr.modify(|val| val | SCB_SCR_SLEEPDEEP) };
    } else {
        unsafe { scr.modify(|val| val & !SCB_SCR_SLEEPDEEP) };
    }
}

/// Memory-mapped power control registers.
#[derive(Debug)]
pub struct CortexPwr {
    base: usize,
}

impl CortexPwr {
    /// Create the power control backend for the PWR at `base`.
    ///
    /// # Safety
    ///
    /// 1. `base` must be the address of the PWR peripheral with its bus clock
    ///    enabled.
    /// 2. The caller is responsible for ensuring the backend has exclusive
    ///    access to the PWR and to `SCB.SCR`.
    pub const unsafe fn new(base: usize) -> CortexPwr {
        CortexPwr { base }
    }

    fn reg(&self, offset: usize) -> usize {
        self.base + offset
    }
}

impl PwrPeripheral for CortexPwr {
    fn set_voltage_range(&mut self, range: VoltageRange) {
        let vos: u32 = match range {
            VoltageRange::Range1 => cr1::VOS_RANGE1,
            VoltageRange::Range2 => cr1::VOS_RANGE2,
        };
        unsafe { modify(self.reg(CR1), |bits| (bits & !cr1::VOS) | vos) };
        while unsafe { read(self.reg(SR2)) } & sr2::VOSF != 0 {}
    }

    fn set_low_power_run(&mut self, enable: bool) {
        if enable {
            unsafe { modify(self.reg(CR1), |bits| bits | cr1::LPR) };
        } else {
            unsafe { modify(self.reg(CR1), |bits| bits & !cr1::LPR) };
            while unsafe { read(self.reg(SR2)) } & sr2::REGLPF != 0 {}
        }
    }

    fn configure_wakeup(&mut self, pins: &[WakeupPin; 5], internal: bool) {
        let (en, falling) = pins
            .iter()
            .enumerate()
            .fold((0, 0), |(en, falling), (idx, pin)| {
                (
                    en | (u32::from(pin.en()) << idx),
                    falling | (u32::from(pin.edge()) << idx),
                )
            });
        unsafe {
            modify(self.reg(CR4), |bits| (bits & !cr4::WP) | falling);
            modify(self.reg(CR3), |bits| {
                let bits: u32 = (bits & !(cr3::EWUP | cr3::EIWUL)) | en;
                if internal { bits | cr3::EIWUL } else { bits }
            });
            // a stale flag wakes the device immediately
            write(self.reg(SCR), scr::CWUF);
        }
    }

    fn sleep(&mut self, mode: PowerMode) {
        let deep: bool = mode.is_stop();
        if deep {
            unsafe { modify(self.reg(CR1), |bits| (bits & !cr1::LPMS) | lpms(mode)) };
        }
        set_sleepdeep(deep);
        compiler_fence(SeqCst);
        cfg_if::cfg_if! {
            if #[cfg(all(target_arch = "arm", target_os = "none"))] {
                cortex_m::asm::wfi();
            }
        }
        compiler_fence(SeqCst);
        set_sleepdeep(false);
    }

    fn power_off(&mut self, mode: PowerMode, retain_sram2: bool) -> ! {
        cfg_if::cfg_if! {
            if #[cfg(all(target_arch = "arm", target_os = "none"))] {
                cortex_m::interrupt::disable();
            }
        }

        unsafe {
            modify(self.reg(CR3), |bits| {
                if retain_sram2 {
                    bits | cr3::RRS
                } else {
                    bits & !cr3::RRS
                }
            });
            modify(self.reg(CR1), |bits| (bits & !cr1::LPMS) | lpms(mode));
        }
        set_sleepdeep(true);

        cfg_if::cfg_if! {
            if #[cfg(all(target_arch = "arm", target_os = "none"))] {
                cortex_m::asm::wfi();
            }
        }

        // wfi does not return once the regulator is off
        loop {
            compiler_fence(SeqCst)
        }
    }

    fn take_boot_flags(&mut self) -> (bool, WakeupFlags) {
        let sr1: u32 = unsafe { read(self.reg(SR1)) };
        unsafe { write(self.reg(SCR), scr::CSBF | scr::CWUF) };
        (sr1 & sr1::SBF != 0, WakeupFlags::from_bits(sr1))
    }
}

/// RTC backup registers BKP0R to BKP31R.
///
/// Writes lift the backup domain write protection (`PWR_CR1.DBP`) for the
/// duration of the write.
#[derive(Debug)]
pub struct RtcBackup {
    rtc_base: usize,
    pwr_base: usize,
}

impl RtcBackup {
    /// Create the backup register backend.
    ///
    /// # Safety
    ///
    /// 1. `rtc_base` and `pwr_base` must be the addresses of the RTC and PWR
    ///    peripherals, with the PWR bus clock enabled.
    /// 2. The caller is responsible for ensuring no other code modifies
    ///    `PWR_CR1.DBP` concurrently.
    pub const unsafe fn new(rtc_base: usize, pwr_base: usize) -> RtcBackup {
        RtcBackup { rtc_base, pwr_base }
    }

    fn bkp(&self, idx: usize) -> usize {
        debug_assert!(idx < RTC_BKP_COUNT);
        self.rtc_base + RTC_BKP0R + idx * 4
    }
}

impl BackupRegisters for RtcBackup {
    const COUNT: usize = RTC_BKP_COUNT;

    fn read(&self, idx: usize) -> u32 {
        unsafe { read(self.bkp(idx)) }
    }

    fn write(&mut self, idx: usize, val: u32) {
        let cr1_addr: usize = self.pwr_base + CR1;
        let saved: u32 = unsafe { read(cr1_addr) };
        unsafe {
            write(cr1_addr, saved | cr1::DBP);
            compiler_fence(SeqCst);
            write(self.bkp(idx), val);
            compiler_fence(SeqCst);
            write(cr1_addr, saved);
        }
    }
}
