//! Speaker amplifier enable gate.
//!
//! The amplifier is a two-state gate over a digital output: high powers the
//! speaker driver, low cuts it. Only the speaker subsystem drives it.

use embedded_hal::digital::OutputPin;

use crate::error::SpeakerError;

pub struct SpeakerAmplifier<P: OutputPin> {
    pin: P,
    enabled: bool,
}

impl<P: OutputPin> SpeakerAmplifier<P> {
    /// Take ownership of the enable pin and drive it low.
    pub fn new(mut pin: P) -> Result<Self, SpeakerError> {
        pin.set_low().map_err(pin_error)?;
        Ok(Self { pin, enabled: false })
    }

    pub fn enable(&mut self) -> Result<(), SpeakerError> {
        self.pin.set_high().map_err(pin_error)?;
        if !self.enabled {
            log::debug!("speaker amplifier on");
        }
        self.enabled = true;
        Ok(())
    }

    /// Drive the pin low. Safe to call when already disabled.
    pub fn disable(&mut self) -> Result<(), SpeakerError> {
        self.pin.set_low().map_err(pin_error)?;
        if self.enabled {
            log::debug!("speaker amplifier off");
        }
        self.enabled = false;
        Ok(())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable for the lifetime of the returned guard.
    pub fn enable_scoped(&mut self) -> Result<AmplifierGuard<'_, P>, SpeakerError> {
        self.enable()?;
        Ok(AmplifierGuard { amp: self, armed: true })
    }
}

fn pin_error<E: core::fmt::Debug>(err: E) -> SpeakerError {
    SpeakerError::DeviceUnavailable(format!("amplifier enable pin: {:?}", err))
}

/// Disables the amplifier when dropped.
pub struct AmplifierGuard<'a, P: OutputPin> {
    amp: &'a mut SpeakerAmplifier<P>,
    armed: bool,
}

impl<P: OutputPin> AmplifierGuard<'_, P> {
    /// Disable now and report a pin failure instead of logging it.
    pub fn disable(mut self) -> Result<(), SpeakerError> {
        self.armed = false;
        self.amp.disable()
    }
}

impl<P: OutputPin> Drop for AmplifierGuard<'_, P> {
    fn drop(&mut self) {
        if self.armed {
            if let Err(e) = self.amp.disable() {
                log::warn!("{}", e);
            }
        }
    }
}
