//! STM32L4 HAL.
//!
//! * [`pka`]: public key accelerator sessions (RSA, ECDSA, ECC).
//! * [`pwr`]: low-power mode transitions.
#![cfg_attr(not(test), no_std)]

pub use cortex_m;
#[cfg(feature = "rt")]
pub use cortex_m_rt;

pub use stm32l4_hal_pka as pka;
pub use stm32l4_hal_pwr as pwr;
