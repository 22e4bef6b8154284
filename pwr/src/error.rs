use crate::{PowerMode, WakeSource};

/// Power control errors.
///
/// Every error is reported before any register is written.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The transition is not in the mode transition table.
    UnsupportedTransition {
        /// Current mode.
        from: PowerMode,
        /// Requested mode.
        to: PowerMode,
    },
    /// The system clock is too fast for the target mode.
    UnsupportedClock {
        /// Requested mode.
        mode: PowerMode,
        /// Current system clock frequency in hertz.
        sysclk_hz: u32,
    },
    /// The PLL must be off in low-power run mode.
    PllInLowPowerRun,
    /// An RTC wake source was requested without a suitable RTC clock.
    ///
    /// In shutdown mode only the LSE keeps running.
    RtcClockUnavailable {
        /// Requested mode.
        mode: PowerMode,
    },
    /// The wake source cannot wake the device from the requested mode.
    UnsupportedWakeSource {
        /// Requested mode.
        mode: PowerMode,
        /// First offending source.
        source: WakeSource,
    },
    /// A context-retaining low-power mode was requested without any wake
    /// source, the device would never resume.
    NoWakeSource {
        /// Requested mode.
        mode: PowerMode,
    },
    /// Standby or shutdown was requested through a returning entry point.
    ///
    /// Use [`Controller::power_down`](crate::Controller::power_down).
    NonRetaining {
        /// Requested mode.
        mode: PowerMode,
    },
    /// Backup register index out of range.
    BackupIndex {
        /// Requested index.
        idx: usize,
        /// Number of backup registers.
        count: usize,
    },
}
