//! Heartbeat status LED driver.
//!
//! A single GPIO drives the board LED.  The heartbeat task holds it high for
//! one half period and low for the next, forever, so a stalled scheduler is
//! visible at a glance.
//!
//! ## Dual-target design
//!
//! Generic over `embedded_hal::digital::OutputPin`.
//! On ESP-IDF: an `esp_idf_hal::gpio::PinDriver` in output mode.
//! On host/test: [`SimLedPin`], which tracks and logs the level.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};
use log::{info, warn};

use crate::error::{Error, Result};

pub struct HeartbeatLed<P> {
    pin: P,
    half_period_ms: u32,
    lit: bool,
}

impl<P: OutputPin> HeartbeatLed<P> {
    /// Take ownership of `pin` and drive it low.
    pub fn new(pin: P, half_period_ms: u32) -> Self {
        let mut led = Self {
            pin,
            half_period_ms,
            lit: false,
        };
        if led.set(false).is_err() {
            warn!("LED: initial write failed");
        }
        led
    }

    pub fn set(&mut self, lit: bool) -> Result<()> {
        self.pin
            .set_state(PinState::from(lit))
            .map_err(|_| Error::Gpio)?;
        self.lit = lit;
        Ok(())
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    pub fn half_period_ms(&self) -> u32 {
        self.half_period_ms
    }

    /// Full blink period, saturating at `u32::MAX`.
    pub fn period_ms(&self) -> u32 {
        self.half_period_ms.saturating_mul(2)
    }

    /// One full blink: on, wait, off, wait.  Write failures are logged and
    /// the timing is kept.
    pub fn cycle(&mut self, delay: &mut impl DelayNs) {
        for lit in [true, false] {
            if let Err(e) = self.set(lit) {
                warn!("LED: {}", e);
            }
            delay.delay_ms(self.half_period_ms);
        }
    }

    /// Heartbeat task body.  Never returns.
    pub fn run(mut self, mut delay: impl DelayNs) -> ! {
        info!("LED task: heartbeat every {} ms", self.period_ms());
        loop {
            self.cycle(&mut delay);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Host simulation pin
// ───────────────────────────────────────────────────────────────

/// Stand-in for the board LED on host builds.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Default)]
pub struct SimLedPin {
    high: bool,
}

#[cfg(not(target_os = "espidf"))]
impl SimLedPin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_high(&self) -> bool {
        self.high
    }
}

#[cfg(not(target_os = "espidf"))]
impl embedded_hal::digital::ErrorType for SimLedPin {
    type Error = core::convert::Infallible;
}

#[cfg(not(target_os = "espidf"))]
impl OutputPin for SimLedPin {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        self.high = false;
        log::debug!("LED(sim): off");
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        self.high = true;
        log::debug!("LED(sim): on");
        Ok(())
    }
}
