//! Native-mode session over an outbound transport
//!
//! [`SysexOutput`] is the seam between the pure encoder and whatever carries
//! bytes to the device. [`PadKontrol`] wraps an output with encode-and-send
//! helpers.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::encoder::{self, LedText};
use crate::error::{SessionError, TransportError};
use crate::midi::format_hex;
use crate::protocol::{LedState, LightState};

/// Sends complete SysEx messages to the device, verbatim
pub trait SysexOutput {
    fn send_sysex(&self, data: &[u8]) -> Result<(), TransportError>;
}

impl<T: SysexOutput + ?Sized> SysexOutput for Arc<T> {
    fn send_sysex(&self, data: &[u8]) -> Result<(), TransportError> {
        (**self).send_sysex(data)
    }
}

impl<T: SysexOutput + ?Sized> SysexOutput for &T {
    fn send_sysex(&self, data: &[u8]) -> Result<(), TransportError> {
        (**self).send_sysex(data)
    }
}

/// Output that keeps every message in memory; useful for tests and dry runs
#[derive(Debug, Default, Clone)]
pub struct RecordingOutput {
    sent: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages sent so far, oldest first
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.sent.lock().clone()
    }

    pub fn clear(&self) {
        self.sent.lock().clear();
    }
}

impl SysexOutput for RecordingOutput {
    fn send_sysex(&self, data: &[u8]) -> Result<(), TransportError> {
        self.sent.lock().push(data.to_vec());
        Ok(())
    }
}

/// Put the device into native mode.
///
/// Sends on, enable output and init in that order, then the "YES" test
/// message if `show_test` is set.
pub fn enter_native_mode<O: SysexOutput + ?Sized>(
    out: &O,
    show_test: bool,
) -> Result<(), TransportError> {
    info!("Entering native mode");

    out.send_sysex(&encoder::native_mode_on())?;
    out.send_sysex(&encoder::native_mode_enable_output())?;
    out.send_sysex(&encoder::native_mode_init())?;

    if show_test {
        out.send_sysex(&encoder::native_mode_test())?;
    }

    Ok(())
}

/// Return the device to normal MIDI controller mode
pub fn exit_native_mode<O: SysexOutput + ?Sized>(out: &O) -> Result<(), TransportError> {
    info!("Leaving native mode");
    out.send_sysex(&encoder::native_mode_off())
}

/// Finish a session, leaving native mode only if `exit` is set
pub fn end_session<O: SysexOutput + ?Sized>(out: &O, exit: bool) -> Result<(), TransportError> {
    if exit {
        exit_native_mode(out)
    } else {
        info!("Leaving the device in native mode");
        Ok(())
    }
}

/// padKONTROL in native mode, driven through a [`SysexOutput`]
pub struct PadKontrol<O: SysexOutput> {
    output: O,
}

impl<O: SysexOutput> PadKontrol<O> {
    pub fn new(output: O) -> Self {
        Self { output }
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn into_output(self) -> O {
        self.output
    }

    fn send(&self, data: &[u8]) -> Result<(), TransportError> {
        debug!("Sending: {}", format_hex(data));
        self.output.send_sysex(data)
    }

    pub fn enter_native_mode(&self, show_test: bool) -> Result<(), TransportError> {
        enter_native_mode(&self.output, show_test)
    }

    pub fn exit_native_mode(&self) -> Result<(), TransportError> {
        exit_native_mode(&self.output)
    }

    /// Show a 3-character string on the LED display
    pub fn led(&self, text: &str, state: LedState) -> Result<(), SessionError> {
        let text = LedText::new(text)?;
        self.led_text(text, state)?;
        Ok(())
    }

    /// Show already-encoded text on the LED display
    pub fn led_text(&self, text: LedText, state: LedState) -> Result<(), TransportError> {
        self.send(&encoder::led(text, state))
    }

    pub fn light(
        &self,
        target: impl Into<u8>,
        state: impl Into<LightState>,
    ) -> Result<(), TransportError> {
        self.send(&encoder::light(target, state))
    }

    pub fn flash(&self, target: impl Into<u8>, duration: f32) -> Result<(), TransportError> {
        self.send(&encoder::light_flash(target, duration))
    }

    /// Set the display and many lights at once; unlisted lights turn off
    pub fn light_group(
        &self,
        text: LedText,
        lights: impl IntoIterator<Item = (u8, bool)>,
    ) -> Result<(), SessionError> {
        let msg = encoder::light_group(text, lights)?;
        self.send(&msg)?;
        Ok(())
    }
}
