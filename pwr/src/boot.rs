//! Boot-time recovery after standby and shutdown.

use crate::Wkup;

/// Wakeup flags captured at boot.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WakeupFlags(u32);

impl WakeupFlags {
    const PINS: u32 = 0x1F;
    const INTERNAL: u32 = 1 << 15;

    /// Create flags from the status register 1 bits.
    ///
    /// Bits 0 to 4 are the wakeup pin flags, bit 15 the internal (RTC) wakeup
    /// flag.
    pub const fn from_bits(bits: u32) -> WakeupFlags {
        WakeupFlags(bits & (Self::PINS | Self::INTERNAL))
    }

    /// Raw bits.
    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Returns `true` if `pin` caused the wake-up.
    pub const fn pin(&self, pin: Wkup) -> bool {
        self.0 & pin.mask() != 0
    }

    /// Returns `true` if an RTC event caused the wake-up.
    pub const fn rtc(&self) -> bool {
        self.0 & Self::INTERNAL != 0
    }

    /// Returns `true` if no flag is set.
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Reason for the last boot.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootReason {
    /// Power-on or pin reset; backup registers hold whatever was last written
    /// before the reset.
    Cold,
    /// Exit from standby.
    Standby {
        /// Wake-up event, empty for a reset pin exit.
        wakeup: WakeupFlags,
    },
    /// Exit from shutdown through a wake-up event.
    ///
    /// Shutdown has no flag of its own.
    Wakeup {
        /// Wake-up event.
        wakeup: WakeupFlags,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags() {
        let flags: WakeupFlags = WakeupFlags::from_bits(0xFFFF_FFFF);
        assert_eq!(flags.bits(), 0x801F);
        for pin in Wkup::ALL {
            assert!(flags.pin(pin));
        }
        assert!(flags.rtc());

        let flags: WakeupFlags = WakeupFlags::from_bits(1 << 1);
        assert!(flags.pin(Wkup::Wkup2));
        assert!(!flags.pin(Wkup::Wkup1));
        assert!(!flags.rtc());
        assert!(!flags.is_empty());
        assert!(WakeupFlags::from_bits(1 << 8).is_empty());
    }
}
