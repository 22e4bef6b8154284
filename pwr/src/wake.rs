//! Wake-up sources.

use crate::{Error, PowerMode, RtcClock, clock};

/// Number of EXTI lines.
pub const EXTI_LINES: u8 = 41;

/// Wakeup pin options for standby and shutdown.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WakeupPin {
    /// Wakeup pin disabled.
    #[default]
    Disabled,
    /// Wakeup pin enabled with a rising edge.
    Rising,
    /// Wakeup pin enabled with a falling edge.
    Falling,
}

impl WakeupPin {
    /// Returns `true` if the pin is enabled.
    pub const fn en(&self) -> bool {
        !matches!(self, WakeupPin::Disabled)
    }

    /// Returns `true` for a falling edge.
    pub const fn edge(&self) -> bool {
        matches!(self, WakeupPin::Falling)
    }
}

/// Wakeup pin WKUP1 to WKUP5.
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Wkup {
    /// WKUP1 (PA0)
    Wkup1 = 0,
    /// WKUP2 (PC13)
    Wkup2 = 1,
    /// WKUP3 (PE6)
    Wkup3 = 2,
    /// WKUP4 (PA2)
    Wkup4 = 3,
    /// WKUP5 (PC5)
    Wkup5 = 4,
}

impl Wkup {
    /// All wakeup pins.
    pub const ALL: [Wkup; 5] = [Wkup::Wkup1, Wkup::Wkup2, Wkup::Wkup3, Wkup::Wkup4, Wkup::Wkup5];

    /// Bit of the pin in the wakeup enable, polarity, and flag registers.
    pub const fn mask(&self) -> u32 {
        1 << (*self as u8)
    }
}

/// A single wake-up source.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WakeSource {
    /// EXTI line.
    Exti(u8),
    /// RTC alarm.
    RtcAlarm,
    /// RTC wake-up timer.
    RtcWakeupTimer,
    /// Wakeup pin.
    Pin(Wkup),
}

/// Set of wake-up sources for a low-power mode entry.
///
/// # Example
///
/// ```
/// use stm32l4_hal_pwr::{WakeSource, WakeSources, WakeupPin, Wkup};
///
/// const STOP: WakeSources = WakeSources::new().with_exti(13).with_rtc_wakeup_timer();
/// const STANDBY: WakeSources = WakeSources::new().with_pin(Wkup::Wkup1, WakeupPin::Falling);
///
/// assert!(STOP.iter().eq([WakeSource::Exti(13), WakeSource::RtcWakeupTimer]));
/// assert!(STANDBY.iter().eq([WakeSource::Pin(Wkup::Wkup1)]));
/// ```
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WakeSources {
    exti: u64,
    invalid_exti: Option<u8>,
    rtc_alarm: bool,
    rtc_wakeup_timer: bool,
    pins: [WakeupPin; 5],
}

impl WakeSources {
    /// No wake-up sources.
    pub const fn new() -> WakeSources {
        WakeSources {
            exti: 0,
            invalid_exti: None,
            rtc_alarm: false,
            rtc_wakeup_timer: false,
            pins: [WakeupPin::Disabled; 5],
        }
    }

    /// Add an EXTI line.
    ///
    /// Lines at or above [`EXTI_LINES`] are rejected when the set is used.
    #[must_use]
    pub const fn with_exti(mut self, line: u8) -> WakeSources {
        if line < EXTI_LINES {
            self.exti |= 1 << line;
        } else {
            self.invalid_exti = Some(line);
        }
        self
    }

    /// Add the RTC alarm.
    #[must_use]
    pub const fn with_rtc_alarm(mut self) -> WakeSources {
        self.rtc_alarm = true;
        self
    }

    /// Add the RTC wake-up timer.
    #[must_use]
    pub const fn with_rtc_wakeup_timer(mut self) -> WakeSources {
        self.rtc_wakeup_timer = true;
        self
    }

    /// Configure a wakeup pin.
    #[must_use]
    pub const fn with_pin(mut self, pin: Wkup, edge: WakeupPin) -> WakeSources {
        self.pins[pin as usize] = edge;
        self
    }

    /// Wakeup pin configuration, indexed by [`Wkup`].
    pub const fn pins(&self) -> &[WakeupPin; 5] {
        &self.pins
    }

    /// Returns `true` if an RTC source is set.
    pub const fn uses_rtc(&self) -> bool {
        self.rtc_alarm || self.rtc_wakeup_timer
    }

    /// Returns `true` if no source is set.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Iterate over the sources.
    pub fn iter(&self) -> impl Iterator<Item = WakeSource> + '_ {
        let exti = (0..EXTI_LINES)
            .filter(|line| self.exti & (1 << line) != 0)
            .chain(self.invalid_exti)
            .map(WakeSource::Exti);
        let rtc = [
            (self.rtc_alarm, WakeSource::RtcAlarm),
            (self.rtc_wakeup_timer, WakeSource::RtcWakeupTimer),
        ]
        .into_iter()
        .filter_map(|(set, source)| set.then_some(source));
        let pins = Wkup::ALL
            .into_iter()
            .filter(|&pin| self.pins[pin as usize].en())
            .map(WakeSource::Pin);
        exti.chain(rtc).chain(pins)
    }
}

/// Returns `true` if `source` can wake the device from `mode`.
pub const fn can_wake(mode: PowerMode, source: WakeSource) -> bool {
    match source {
        WakeSource::Exti(line) => line < EXTI_LINES && (mode.is_sleep() || mode.is_stop()),
        WakeSource::RtcAlarm | WakeSource::RtcWakeupTimer => !mode.is_run(),
        WakeSource::Pin(_) => !mode.retains_context(),
    }
}

/// Check `sources` for entering `mode` with the RTC clocked by `rtc`.
pub(crate) fn validate(
    mode: PowerMode,
    sources: &WakeSources,
    rtc: Option<RtcClock>,
) -> Result<(), Error> {
    if let Some(source) = sources.iter().find(|&source| !can_wake(mode, source)) {
        return Err(Error::UnsupportedWakeSource { mode, source });
    }
    if sources.uses_rtc() {
        clock::check_rtc(mode, rtc)?;
    }
    if !mode.is_run() && mode.retains_context() && sources.is_empty() {
        return Err(Error::NoWakeSource { mode });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iter_order() {
        let sources: WakeSources = WakeSources::new()
            .with_pin(Wkup::Wkup3, WakeupPin::Rising)
            .with_rtc_alarm()
            .with_exti(40)
            .with_exti(0);
        let collected: Vec<WakeSource> = sources.iter().collect();
        assert_eq!(
            collected,
            [
                WakeSource::Exti(0),
                WakeSource::Exti(40),
                WakeSource::RtcAlarm,
                WakeSource::Pin(Wkup::Wkup3),
            ]
        );
        assert!(!sources.is_empty());
        assert!(WakeSources::new().is_empty());
    }

    #[test]
    fn invalid_exti_line() {
        let sources: WakeSources = WakeSources::new().with_exti(EXTI_LINES);
        assert!(!sources.is_empty());
        assert_eq!(
            validate(PowerMode::Stop1, &sources, None),
            Err(Error::UnsupportedWakeSource {
                mode: PowerMode::Stop1,
                source: WakeSource::Exti(EXTI_LINES),
            })
        );
        let sources: WakeSources = WakeSources::new().with_exti(u8::MAX);
        assert_eq!(sources.iter().count(), 1);
    }

    #[test]
    fn sources_per_mode() {
        let exti: WakeSource = WakeSource::Exti(13);
        let pin: WakeSource = WakeSource::Pin(Wkup::Wkup2);
        for mode in PowerMode::ALL {
            let retaining_low_power: bool = mode.is_sleep() || mode.is_stop();
            assert_eq!(can_wake(mode, exti), retaining_low_power, "{mode:?}");
            assert_eq!(can_wake(mode, pin), !mode.retains_context(), "{mode:?}");
            assert_eq!(can_wake(mode, WakeSource::RtcAlarm), !mode.is_run(), "{mode:?}");
        }
    }

    #[test]
    fn no_wake_source() {
        let none: WakeSources = WakeSources::new();
        for mode in [PowerMode::Sleep, PowerMode::LpSleep, PowerMode::Stop0, PowerMode::Stop2] {
            assert_eq!(
                validate(mode, &none, Some(RtcClock::Lse)),
                Err(Error::NoWakeSource { mode })
            );
        }
        // reset-only wake-up
        assert_eq!(validate(PowerMode::Shutdown, &none, None), Ok(()));
        assert_eq!(validate(PowerMode::RunRange2, &none, None), Ok(()));
    }

    #[test]
    fn rtc_needs_clock() {
        let rtc: WakeSources = WakeSources::new().with_rtc_wakeup_timer();
        assert_eq!(validate(PowerMode::Stop2, &rtc, Some(RtcClock::Lse)), Ok(()));
        assert_eq!(
            validate(PowerMode::Stop2, &rtc, None),
            Err(Error::RtcClockUnavailable {
                mode: PowerMode::Stop2
            })
        );
        assert_eq!(
            validate(PowerMode::Shutdown, &rtc, Some(RtcClock::Lsi)),
            Err(Error::RtcClockUnavailable {
                mode: PowerMode::Shutdown
            })
        );
    }

    #[test]
    fn pins_only_in_standby_and_shutdown() {
        let sources: WakeSources = WakeSources::new().with_pin(Wkup::Wkup5, WakeupPin::Falling);
        assert_eq!(validate(PowerMode::Standby, &sources, None), Ok(()));
        assert_eq!(
            validate(PowerMode::Stop2, &sources, None),
            Err(Error::UnsupportedWakeSource {
                mode: PowerMode::Stop2,
                source: WakeSource::Pin(Wkup::Wkup5),
            })
        );
        assert_eq!(sources.pins()[Wkup::Wkup5 as usize], WakeupPin::Falling);
        assert!(sources.pins()[Wkup::Wkup5 as usize].edge());
    }
}
