//! System and RTC clock descriptions used to validate mode entry.

use crate::{Error, PowerMode};

/// System clock source.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockSource {
    /// Multi-speed internal oscillator.
    Msi,
    /// 16 MHz high speed internal oscillator.
    Hsi16,
    /// High speed external oscillator.
    Hse,
    /// Main PLL.
    Pll,
}

/// System clock configuration, as reported by the clock collaborator.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SysClk {
    /// Clock source.
    pub source: ClockSource,
    /// Frequency in hertz.
    pub hz: u32,
}

impl SysClk {
    /// Create a new system clock description.
    pub const fn new(source: ClockSource, hz: u32) -> SysClk {
        SysClk { source, hz }
    }

    /// MSI at a low-power run range.
    ///
    /// # Example
    ///
    /// ```
    /// use stm32l4_hal_pwr::{ClockSource, LprunRange, SysClk};
    ///
    /// const CLK: SysClk = SysClk::lprun(LprunRange::Range2M);
    /// assert_eq!(CLK.source, ClockSource::Msi);
    /// assert_eq!(CLK.hz, 2_000_000);
    /// ```
    pub const fn lprun(range: LprunRange) -> SysClk {
        SysClk {
            source: ClockSource::Msi,
            hz: range.hz(),
        }
    }
}

/// RTC clock source.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RtcClock {
    /// 32.768 kHz low speed external oscillator.
    Lse,
    /// 32 kHz low speed internal oscillator.
    Lsi,
    /// HSE divided by 32.
    HseDiv32,
}

/// MSI clock ranges for low-power run.
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LprunRange {
    /// Range 0 around 100 kHz.
    Range100k = 0b0000,
    /// Range 1 around 200 kHz.
    Range200k = 0b0001,
    /// Range 2 around 400 kHz.
    Range400k = 0b0010,
    /// Range 3 around 800 kHz.
    Range800k = 0b0011,
    /// Range 4 around 1 MHz.
    Range1M = 0b0100,
    /// Range 5 around 2 MHz.
    Range2M = 0b0101,
}

impl LprunRange {
    /// Nominal frequency in hertz.
    pub const fn hz(&self) -> u32 {
        match self {
            LprunRange::Range100k => 100_000,
            LprunRange::Range200k => 200_000,
            LprunRange::Range400k => 400_000,
            LprunRange::Range800k => 800_000,
            LprunRange::Range1M => 1_000_000,
            LprunRange::Range2M => 2_000_000,
        }
    }
}

/// Check that `clk` is allowed in the run mode `mode`.
///
/// Low-power modes place no constraint on the system clock.
pub(crate) fn check(mode: PowerMode, clk: SysClk) -> Result<(), Error> {
    if mode == PowerMode::LpRun && clk.source == ClockSource::Pll {
        return Err(Error::PllInLowPowerRun);
    }
    match mode.max_sysclk_hz() {
        Some(max) if clk.hz > max => Err(Error::UnsupportedClock {
            mode,
            sysclk_hz: clk.hz,
        }),
        _ => Ok(()),
    }
}

/// Check that an RTC clocked by `rtc` keeps running in `mode`.
pub(crate) fn check_rtc(mode: PowerMode, rtc: Option<RtcClock>) -> Result<(), Error> {
    match (mode, rtc) {
        (_, None) | (PowerMode::Shutdown, Some(RtcClock::Lsi | RtcClock::HseDiv32)) => {
            Err(Error::RtcClockUnavailable { mode })
        }
        // the HSE is off in stop and standby
        (mode, Some(RtcClock::HseDiv32)) if !mode.is_sleep() => {
            Err(Error::RtcClockUnavailable { mode })
        }
        _ => Ok(()),
    }
}
