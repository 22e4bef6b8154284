//! Power-mode transition controller.

use crate::{
    BootReason, Error, PowerMode, RtcClock, SysClk, VoltageRange, WakeSources, WakeupFlags,
    WakeupPin, clock, wake,
};

/// Power control registers.
///
/// Implemented by [`hw::CortexPwr`](crate::hw::CortexPwr) for the silicon and
/// by recording mocks in tests.
pub trait PwrPeripheral {
    /// Select the voltage scaling range and wait for the regulator to settle.
    fn set_voltage_range(&mut self, range: VoltageRange);

    /// Enter (`true`) or exit (`false`) low-power run, waiting for the
    /// regulator on exit.
    fn set_low_power_run(&mut self, enable: bool);

    /// Enable the wakeup pins and the internal (RTC) wakeup line for standby
    /// and shutdown, and clear stale wakeup flags.
    fn configure_wakeup(&mut self, pins: &[WakeupPin; 5], internal: bool);

    /// Enter a context-retaining low-power mode.
    ///
    /// Returns when a wake source fires.
    fn sleep(&mut self, mode: PowerMode);

    /// Enter standby or shutdown.
    ///
    /// The next code to execute is the reset handler.
    fn power_off(&mut self, mode: PowerMode, retain_sram2: bool) -> !;

    /// Read and clear the standby and wakeup flags.
    fn take_boot_flags(&mut self) -> (bool, WakeupFlags);
}

/// Clock, GPIO, tick and interrupt collaborator.
pub trait Platform {
    /// Current system clock.
    fn sysclk(&self) -> SysClk;

    /// RTC clock, `None` if the RTC is not clocked.
    fn rtc_clock(&self) -> Option<RtcClock>;

    /// Gate non-essential clocks and set unused GPIOs to analog without pull.
    fn quiesce(&mut self);

    /// Reconfigure the clocks and GPIOs quiesced by [`quiesce`](Self::quiesce).
    fn restore(&mut self);

    /// Stop the periodic tick so it does not wake the device.
    fn suspend_tick(&mut self);

    /// Restart the periodic tick.
    fn resume_tick(&mut self);

    /// Unmask the EXTI lines and RTC events in `sources`.
    fn arm_wake_sources(&mut self, sources: &WakeSources);

    /// Mask the EXTI lines and RTC events in `sources`.
    fn disarm_wake_sources(&mut self, sources: &WakeSources);
}

/// Registers that survive standby and shutdown.
pub trait BackupRegisters {
    /// Number of 32-bit registers.
    const COUNT: usize;

    /// Read register `idx`, `idx < COUNT`.
    fn read(&self, idx: usize) -> u32;

    /// Write register `idx`, `idx < COUNT`.
    fn write(&mut self, idx: usize, val: u32);
}

/// Power-mode transition controller.
///
/// Owns the power registers, the platform collaborator, and the backup
/// registers.
/// Exclusive access follows from `&mut self`; at most one transition is in
/// flight.
#[derive(Debug)]
pub struct Controller<P, C, B> {
    pwr: P,
    platform: C,
    backup: B,
    mode: PowerMode,
}

impl<P, C, B> Controller<P, C, B>
where
    P: PwrPeripheral,
    C: Platform,
    B: BackupRegisters,
{
    /// Create a new controller.
    ///
    /// The device comes out of reset in [`PowerMode::RunRange1`].
    pub const fn new(pwr: P, platform: C, backup: B) -> Self {
        Controller {
            pwr,
            platform,
            backup,
            mode: PowerMode::RunRange1,
        }
    }

    /// Free the collaborators.
    pub fn free(self) -> (P, C, B) {
        (self.pwr, self.platform, self.backup)
    }

    /// Current run mode.
    pub const fn mode(&self) -> PowerMode {
        self.mode
    }

    /// Platform collaborator.
    pub const fn platform(&self) -> &C {
        &self.platform
    }

    /// Mutable platform collaborator.
    pub fn platform_mut(&mut self) -> &mut C {
        &mut self.platform
    }

    /// Switch between run modes.
    ///
    /// The system clock must already be within the limit of `to`; the clock
    /// is not changed.
    /// Requesting the current mode does nothing.
    ///
    /// # Errors
    ///
    /// * [`Error::UnsupportedTransition`] if `to` is not a run mode reachable
    ///   from the current mode.
    /// * [`Error::UnsupportedClock`] or [`Error::PllInLowPowerRun`] if the
    ///   system clock is not allowed in `to`.
    pub fn set_run_mode(&mut self, to: PowerMode) -> Result<(), Error> {
        let from: PowerMode = self.mode;
        if to == from {
            return Ok(());
        }
        if !to.is_run() {
            return Err(Error::UnsupportedTransition { from, to });
        }
        self.check_transition(to)?;
        clock::check(to, self.platform.sysclk())?;

        match (from, to) {
            (PowerMode::RunRange2, PowerMode::RunRange1) => {
                self.pwr.set_voltage_range(VoltageRange::Range1)
            }
            (PowerMode::RunRange1, PowerMode::RunRange2) => {
                self.pwr.set_voltage_range(VoltageRange::Range2)
            }
            (PowerMode::RunRange2, PowerMode::LpRun) => self.pwr.set_low_power_run(true),
            (PowerMode::LpRun, PowerMode::RunRange2) => self.pwr.set_low_power_run(false),
            _ => return Err(Error::UnsupportedTransition { from, to }),
        }
        self.mode = to;
        debug!("run mode {} -> {}", from, to);
        Ok(())
    }

    /// Enter a mode that returns to the caller.
    ///
    /// For a sleep or stop mode this quiesces the platform, suspends the tick,
    /// arms `sources`, and sleeps until one of them fires.
    /// On wake-up the platform is restored, the tick resumed, and execution
    /// continues in the run mode the low-power mode was entered from.
    ///
    /// A run mode is passed to [`set_run_mode`](Self::set_run_mode).
    ///
    /// # Errors
    ///
    /// * [`Error::NonRetaining`] for standby and shutdown, use
    ///   [`power_down`](Self::power_down).
    /// * [`Error::UnsupportedTransition`] if `mode` cannot be entered from the
    ///   current mode.
    /// * [`Error::UnsupportedWakeSource`], [`Error::RtcClockUnavailable`], or
    ///   [`Error::NoWakeSource`] if `sources` cannot wake the device.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use stm32l4_hal_pwr::{
    ///     Controller, PowerMode, WakeSources,
    ///     hw::{CortexPwr, PWR_BASE, RTC_BASE, RtcBackup},
    /// };
    /// # use stm32l4_hal_pwr::{Platform, RtcClock, SysClk, ClockSource};
    /// # struct Board;
    /// # impl Platform for Board {
    /// #     fn sysclk(&self) -> SysClk { SysClk::new(ClockSource::Msi, 4_000_000) }
    /// #     fn rtc_clock(&self) -> Option<RtcClock> { Some(RtcClock::Lse) }
    /// #     fn quiesce(&mut self) {}
    /// #     fn restore(&mut self) {}
    /// #     fn suspend_tick(&mut self) {}
    /// #     fn resume_tick(&mut self) {}
    /// #     fn arm_wake_sources(&mut self, _: &WakeSources) {}
    /// #     fn disarm_wake_sources(&mut self, _: &WakeSources) {}
    /// # }
    ///
    /// let pwr: CortexPwr = unsafe { CortexPwr::new(PWR_BASE) };
    /// let backup: RtcBackup = unsafe { RtcBackup::new(RTC_BASE, PWR_BASE) };
    /// let mut ctrl = Controller::new(pwr, Board, backup);
    ///
    /// const WAKE: WakeSources = WakeSources::new().with_rtc_wakeup_timer();
    /// ctrl.enter_mode(PowerMode::Stop2, &WAKE)?;
    /// // the RTC wake-up timer fired
    /// # Ok::<(), stm32l4_hal_pwr::Error>(())
    /// ```
    pub fn enter_mode(&mut self, mode: PowerMode, sources: &WakeSources) -> Result<(), Error> {
        if !mode.retains_context() {
            return Err(Error::NonRetaining { mode });
        }
        wake::validate(mode, sources, self.platform.rtc_clock())?;
        if mode.is_run() {
            return self.set_run_mode(mode);
        }
        self.check_transition(mode)?;

        debug!("entering {} from {}", mode, self.mode);
        self.prepare(sources);
        self.pwr.sleep(mode);
        self.platform.disarm_wake_sources(sources);
        self.platform.restore();
        self.platform.resume_tick();
        trace!("woke from {}", mode);
        Ok(())
    }

    /// Validate a standby or shutdown entry.
    ///
    /// Nothing is written until [`PowerDown::enter`] is called.
    ///
    /// An empty `sources` set is allowed, the device then wakes only by reset.
    ///
    /// # Errors
    ///
    /// * [`Error::UnsupportedTransition`] if `mode` is not standby or
    ///   shutdown, or cannot be entered from the current mode.
    /// * [`Error::UnsupportedWakeSource`] or [`Error::RtcClockUnavailable`] if
    ///   `sources` cannot wake the device.
    pub fn power_down(
        &mut self,
        mode: PowerMode,
        sources: &WakeSources,
    ) -> Result<PowerDown<'_, P, C, B>, Error> {
        if mode.retains_context() {
            return Err(Error::UnsupportedTransition {
                from: self.mode,
                to: mode,
            });
        }
        self.check_transition(mode)?;
        wake::validate(mode, sources, self.platform.rtc_clock())?;
        Ok(PowerDown {
            ctrl: self,
            mode,
            sources: *sources,
            retain_sram2: false,
        })
    }

    /// Why the device booted.
    ///
    /// This reads and clears the standby and wakeup flags, call it once early
    /// in the boot sequence.
    pub fn boot_reason(&mut self) -> BootReason {
        let (standby, wakeup) = self.pwr.take_boot_flags();
        let reason: BootReason = if standby {
            BootReason::Standby { wakeup }
        } else if !wakeup.is_empty() {
            BootReason::Wakeup { wakeup }
        } else {
            BootReason::Cold
        };
        debug!("boot reason {}", reason);
        reason
    }

    /// Read a backup register.
    ///
    /// # Errors
    ///
    /// * [`Error::BackupIndex`] if `idx` is out of range.
    pub fn read_backup(&self, idx: usize) -> Result<u32, Error> {
        check_backup_idx::<B>(idx)?;
        Ok(self.backup.read(idx))
    }

    /// Write a backup register.
    ///
    /// # Errors
    ///
    /// * [`Error::BackupIndex`] if `idx` is out of range.
    pub fn write_backup(&mut self, idx: usize, val: u32) -> Result<(), Error> {
        check_backup_idx::<B>(idx)?;
        self.backup.write(idx, val);
        Ok(())
    }

    fn check_transition(&self, to: PowerMode) -> Result<(), Error> {
        if self.mode.can_enter(to) {
            Ok(())
        } else {
            warn!("unsupported transition {} -> {}", self.mode, to);
            Err(Error::UnsupportedTransition {
                from: self.mode,
                to,
            })
        }
    }

    fn prepare(&mut self, sources: &WakeSources) {
        self.platform.quiesce();
        self.platform.suspend_tick();
        self.platform.arm_wake_sources(sources);
    }
}

fn check_backup_idx<B: BackupRegisters>(idx: usize) -> Result<(), Error> {
    if idx < B::COUNT {
        Ok(())
    } else {
        Err(Error::BackupIndex {
            idx,
            count: B::COUNT,
        })
    }
}

/// Validated standby or shutdown entry.
///
/// Created with [`Controller::power_down`].
///
/// # Example
///
/// ```no_run
/// use stm32l4_hal_pwr::{Controller, PowerMode, WakeSources, WakeupPin, Wkup};
/// # use stm32l4_hal_pwr::{BackupRegisters, Platform, PwrPeripheral};
///
/// fn park<P: PwrPeripheral, C: Platform, B: BackupRegisters>(
///     ctrl: &mut Controller<P, C, B>,
///     counter: u32,
/// ) -> Result<(), stm32l4_hal_pwr::Error> {
///     const WAKE: WakeSources = WakeSources::new().with_pin(Wkup::Wkup1, WakeupPin::Falling);
///
///     let mut pd = ctrl.power_down(PowerMode::Standby, &WAKE)?;
///     pd.write_backup(0, counter)?;
///     pd.retain_sram2().enter()
/// }
/// ```
#[derive(Debug)]
pub struct PowerDown<'a, P, C, B> {
    ctrl: &'a mut Controller<P, C, B>,
    mode: PowerMode,
    sources: WakeSources,
    retain_sram2: bool,
}

impl<P, C, B> PowerDown<'_, P, C, B>
where
    P: PwrPeripheral,
    C: Platform,
    B: BackupRegisters,
{
    /// Mode that will be entered.
    pub const fn mode(&self) -> PowerMode {
        self.mode
    }

    /// Persist a value across the power-down.
    ///
    /// Read it back after reset with [`Controller::read_backup`].
    ///
    /// # Errors
    ///
    /// * [`Error::BackupIndex`] if `idx` is out of range.
    pub fn write_backup(&mut self, idx: usize, val: u32) -> Result<(), Error> {
        self.ctrl.write_backup(idx, val)
    }

    /// Keep SRAM2 powered in standby.
    ///
    /// This has no effect in shutdown.
    #[must_use]
    pub fn retain_sram2(mut self) -> Self {
        self.retain_sram2 = self.mode == PowerMode::Standby;
        self
    }

    /// Enter the mode.
    ///
    /// This does not return, the device resets on wake-up.
    pub fn enter(self) -> ! {
        debug!("powering down to {}", self.mode);
        let ctrl: &mut Controller<P, C, B> = self.ctrl;
        ctrl.prepare(&self.sources);
        ctrl.pwr
            .configure_wakeup(self.sources.pins(), self.sources.uses_rtc());
        ctrl.pwr.power_off(self.mode, self.retain_sram2)
    }
}
