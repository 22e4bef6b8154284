//! Power modes and the transition table.

/// Power mode.
///
/// Ordered from the highest to the lowest current consumption.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerMode {
    /// Run mode, voltage scaling range 1, up to 80 MHz.
    RunRange1,
    /// Run mode, voltage scaling range 2, up to 26 MHz.
    RunRange2,
    /// Low-power run mode, up to 2 MHz.
    LpRun,
    /// Sleep mode, CPU clock stopped.
    Sleep,
    /// Low-power sleep mode, entered from low-power run.
    LpSleep,
    /// Stop 0 mode, main regulator on.
    Stop0,
    /// Stop 1 mode, low-power regulator.
    Stop1,
    /// Stop 2 mode, most of the core domain powered down.
    Stop2,
    /// Standby mode, core domain powered off.
    Standby,
    /// Shutdown mode, only the backup domain is powered.
    Shutdown,
}

/// Current consumption tier, ordered from the highest consumption.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CurrentTier {
    /// Tens of µA per MHz.
    Run,
    /// Low-power run.
    LowPowerRun,
    /// Peripherals clocked, CPU stopped.
    Sleep,
    /// Low-power sleep.
    LowPowerSleep,
    /// Clocks stopped, SRAM and registers retained.
    Stop,
    /// Below one µA.
    Standby,
    /// Tens of nA.
    Shutdown,
}

/// Resources retained by a power mode.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Retention {
    /// CPU registers; execution resumes after the entry call.
    pub cpu_context: bool,
    /// SRAM1 contents.
    pub sram1: bool,
    /// SRAM2 contents.
    ///
    /// In standby this is optional, see
    /// [`PowerDown::retain_sram2`](crate::PowerDown::retain_sram2).
    pub sram2: bool,
    /// RTC backup registers.
    pub backup: bool,
}

impl Retention {
    const ALL: Retention = Retention {
        cpu_context: true,
        sram1: true,
        sram2: true,
        backup: true,
    };

    const BACKUP_ONLY: Retention = Retention {
        cpu_context: false,
        sram1: false,
        sram2: false,
        backup: true,
    };
}

impl PowerMode {
    /// All power modes.
    pub const ALL: [PowerMode; 10] = [
        PowerMode::RunRange1,
        PowerMode::RunRange2,
        PowerMode::LpRun,
        PowerMode::Sleep,
        PowerMode::LpSleep,
        PowerMode::Stop0,
        PowerMode::Stop1,
        PowerMode::Stop2,
        PowerMode::Standby,
        PowerMode::Shutdown,
    ];

    /// Returns `true` for the run modes.
    pub const fn is_run(&self) -> bool {
        matches!(
            self,
            PowerMode::RunRange1 | PowerMode::RunRange2 | PowerMode::LpRun
        )
    }

    /// Returns `true` for sleep and low-power sleep.
    pub const fn is_sleep(&self) -> bool {
        matches!(self, PowerMode::Sleep | PowerMode::LpSleep)
    }

    /// Returns `true` for the stop modes.
    pub const fn is_stop(&self) -> bool {
        matches!(self, PowerMode::Stop0 | PowerMode::Stop1 | PowerMode::Stop2)
    }

    /// Returns `true` if execution resumes after the entry call.
    ///
    /// Standby and shutdown exit through a reset.
    pub const fn retains_context(&self) -> bool {
        !matches!(self, PowerMode::Standby | PowerMode::Shutdown)
    }

    /// Resources retained in this mode.
    pub const fn retention(&self) -> Retention {
        match self {
            PowerMode::Standby | PowerMode::Shutdown => Retention::BACKUP_ONLY,
            _ => Retention::ALL,
        }
    }

    /// Current consumption tier.
    pub const fn tier(&self) -> CurrentTier {
        match self {
            PowerMode::RunRange1 | PowerMode::RunRange2 => CurrentTier::Run,
            PowerMode::LpRun => CurrentTier::LowPowerRun,
            PowerMode::Sleep => CurrentTier::Sleep,
            PowerMode::LpSleep => CurrentTier::LowPowerSleep,
            PowerMode::Stop0 | PowerMode::Stop1 | PowerMode::Stop2 => CurrentTier::Stop,
            PowerMode::Standby => CurrentTier::Standby,
            PowerMode::Shutdown => CurrentTier::Shutdown,
        }
    }

    /// Maximum system clock frequency in a run mode.
    ///
    /// Returns `None` for low-power modes.
    pub const fn max_sysclk_hz(&self) -> Option<u32> {
        match self {
            PowerMode::RunRange1 => Some(80_000_000),
            PowerMode::RunRange2 => Some(26_000_000),
            PowerMode::LpRun => Some(2_000_000),
            _ => None,
        }
    }

    /// Returns `true` if `to` can be entered from `self`.
    ///
    /// Low-power modes are left by a wake-up, not by a transition; they have
    /// no outgoing entries.
    ///
    /// # Example
    ///
    /// ```
    /// use stm32l4_hal_pwr::PowerMode;
    ///
    /// assert!(PowerMode::RunRange2.can_enter(PowerMode::LpRun));
    /// assert!(!PowerMode::RunRange1.can_enter(PowerMode::LpRun));
    /// assert!(PowerMode::LpRun.can_enter(PowerMode::LpSleep));
    /// assert!(!PowerMode::LpRun.can_enter(PowerMode::Stop2));
    /// ```
    pub const fn can_enter(&self, to: PowerMode) -> bool {
        use PowerMode::*;

        match self {
            RunRange1 => matches!(
                to,
                RunRange2 | Sleep | Stop0 | Stop1 | Stop2 | Standby | Shutdown
            ),
            RunRange2 => matches!(
                to,
                RunRange1 | LpRun | Sleep | Stop0 | Stop1 | Stop2 | Standby | Shutdown
            ),
            LpRun => matches!(to, RunRange2 | LpSleep | Stop1 | Standby | Shutdown),
            _ => false,
        }
    }
}

/// Voltage scaling range.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VoltageRange {
    /// High performance range.
    Range1,
    /// Low-power range.
    Range2,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_non_retaining_modes_lose_context() {
        for mode in PowerMode::ALL {
            let retention: Retention = mode.retention();
            assert_eq!(retention.cpu_context, mode.retains_context());
            assert_eq!(retention.sram1, mode.retains_context());
            assert!(retention.backup);
        }
    }

    #[test]
    fn tiers_follow_mode_order() {
        for pair in PowerMode::ALL.windows(2) {
            assert!(pair[0].tier() <= pair[1].tier(), "{pair:?}");
        }
    }

    #[test]
    fn low_power_modes_are_terminal() {
        for from in PowerMode::ALL.iter().filter(|mode| !mode.is_run()) {
            for to in PowerMode::ALL {
                assert!(!from.can_enter(to), "{from:?} -> {to:?}");
            }
        }
    }

    #[test]
    fn transition_table() {
        use PowerMode::*;

        let entries: [(PowerMode, &[PowerMode]); 3] = [
            (
                RunRange1,
                &[RunRange2, Sleep, Stop0, Stop1, Stop2, Standby, Shutdown],
            ),
            (
                RunRange2,
                &[
                    RunRange1, LpRun, Sleep, Stop0, Stop1, Stop2, Standby, Shutdown,
                ],
            ),
            (LpRun, &[RunRange2, LpSleep, Stop1, Standby, Shutdown]),
        ];
        for (from, allowed) in entries {
            for to in PowerMode::ALL {
                assert_eq!(from.can_enter(to), allowed.contains(&to), "{from:?} -> {to:?}");
            }
        }
    }

    #[test]
    fn sysclk_limits() {
        assert_eq!(PowerMode::RunRange1.max_sysclk_hz(), Some(80_000_000));
        assert_eq!(PowerMode::RunRange2.max_sysclk_hz(), Some(26_000_000));
        assert_eq!(PowerMode::LpRun.max_sysclk_hz(), Some(2_000_000));
        assert_eq!(PowerMode::Stop2.max_sysclk_hz(), None);
    }
}
