//! Low-power mode transitions for the STM32L4 series.
//!
//! [`Controller`] moves the device between the run modes and enters the
//! low-power modes:
//!
//! * Sleep and stop modes retain the CPU context.
//!   [`Controller::enter_mode`] returns once a wake source fires.
//! * Standby and shutdown do not.
//!   [`Controller::power_down`] validates the entry and returns a
//!   [`PowerDown`] whose [`enter`](PowerDown::enter) never returns; after the
//!   reset [`Controller::boot_reason`] and [`Controller::read_backup`] recover
//!   the state persisted in the backup registers.
//!
//! Clock and wake-source constraints are checked before any register is
//! written.
//!
//! The clocks, GPIOs, periodic tick and interrupt masks belong to the
//! [`Platform`] collaborator.
//!
//! # Example
//!
//! ```no_run
//! use stm32l4_hal_pwr::{
//!     BootReason, Controller, PowerMode, WakeSources, WakeupPin, Wkup,
//!     hw::{CortexPwr, PWR_BASE, RTC_BASE, RtcBackup},
//! };
//! # use stm32l4_hal_pwr::{Platform, RtcClock, SysClk, ClockSource};
//! # struct Board;
//! # impl Platform for Board {
//! #     fn sysclk(&self) -> SysClk { SysClk::new(ClockSource::Msi, 4_000_000) }
//! #     fn rtc_clock(&self) -> Option<RtcClock> { Some(RtcClock::Lse) }
//! #     fn quiesce(&mut self) {}
//! #     fn restore(&mut self) {}
//! #     fn suspend_tick(&mut self) {}
//! #     fn resume_tick(&mut self) {}
//! #     fn arm_wake_sources(&mut self, _: &WakeSources) {}
//! #     fn disarm_wake_sources(&mut self, _: &WakeSources) {}
//! # }
//!
//! let pwr: CortexPwr = unsafe { CortexPwr::new(PWR_BASE) };
//! let backup: RtcBackup = unsafe { RtcBackup::new(RTC_BASE, PWR_BASE) };
//! let mut ctrl = Controller::new(pwr, Board, backup);
//!
//! let boots: u32 = match ctrl.boot_reason() {
//!     BootReason::Cold => 0,
//!     _ => ctrl.read_backup(0)?,
//! };
//!
//! const WAKE: WakeSources = WakeSources::new().with_pin(Wkup::Wkup1, WakeupPin::Rising);
//! let mut pd = ctrl.power_down(PowerMode::Standby, &WAKE)?;
//! pd.write_backup(0, boots + 1)?;
//! pd.enter();
//! # Ok::<(), stm32l4_hal_pwr::Error>(())
//! ```
#![cfg_attr(not(test), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

#[macro_use]
mod macros;

mod boot;
mod clock;
mod controller;
mod error;
pub mod hw;
mod mode;
mod wake;

pub use boot::{BootReason, WakeupFlags};
pub use clock::{ClockSource, LprunRange, RtcClock, SysClk};
pub use controller::{BackupRegisters, Controller, Platform, PowerDown, PwrPeripheral};
pub use error::Error;
pub use mode::{CurrentTier, PowerMode, Retention, VoltageRange};
pub use wake::{EXTI_LINES, WakeSource, WakeSources, WakeupPin, Wkup, can_wake};
