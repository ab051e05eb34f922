//! Light feedback for controller input
//!
//! An [`InputHandler`] that logs every event and answers pad and button
//! presses with lights on the device.

use tracing::{debug, info, warn};

use crate::config::FeedbackConfig;
use crate::error::{DecodeError, TransportError};
use crate::input::{InputHandler, PadEvent};
use crate::protocol::{LightState, PAD_COUNT};
use crate::session::{PadKontrol, SysexOutput};

pub struct FeedbackHandler<O: SysexOutput> {
    pad: PadKontrol<O>,
    pad_echo: bool,
    flash_duration: f32,
    invalid_count: u64,
}

impl<O: SysexOutput> FeedbackHandler<O> {
    pub fn new(output: O, config: &FeedbackConfig) -> Self {
        Self {
            pad: PadKontrol::new(output),
            pad_echo: config.pad_echo,
            flash_duration: config.flash_duration,
            invalid_count: 0,
        }
    }

    /// Messages that failed to decode so far
    pub fn invalid_count(&self) -> u64 {
        self.invalid_count
    }

    pub fn into_output(self) -> O {
        self.pad.into_output()
    }

    fn report(result: Result<(), TransportError>) {
        if let Err(e) = result {
            warn!("Failed to update light: {}", e);
        }
    }
}

impl<O: SysexOutput> InputHandler for FeedbackHandler<O> {
    fn on_pad_down(&mut self, pad: u8, velocity: u8) {
        info!("{}", PadEvent::PadDown { pad, velocity });
        if self.pad_echo && pad < PAD_COUNT {
            Self::report(self.pad.light(pad, LightState::On));
        }
    }

    fn on_pad_up(&mut self, pad: u8) {
        info!("{}", PadEvent::PadUp { pad });
        if self.pad_echo && pad < PAD_COUNT {
            Self::report(self.pad.light(pad, LightState::Off));
        }
    }

    fn on_button_down(&mut self, button: u8) {
        info!("{}", PadEvent::ButtonDown { button });
        Self::report(self.pad.flash(button, self.flash_duration));
    }

    fn on_button_up(&mut self, button: u8) {
        info!("{}", PadEvent::ButtonUp { button });
    }

    fn on_knob(&mut self, knob: u8, value: u8) {
        info!("{}", PadEvent::Knob { knob, value });
    }

    fn on_rotary_left(&mut self) {
        info!("{}", PadEvent::RotaryLeft);
    }

    fn on_rotary_right(&mut self) {
        info!("{}", PadEvent::RotaryRight);
    }

    fn on_xy(&mut self, x: u8, y: u8) {
        debug!("{}", PadEvent::XyPad { x, y });
    }

    fn on_invalid(&mut self, error: DecodeError) -> Result<(), DecodeError> {
        self.invalid_count += 1;
        warn!("Skipping message: {}", error);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder;
    use crate::input::dispatch;
    use crate::protocol::{BUTTON_FLAM, PREAMBLE, SYSEX_END};
    use crate::session::RecordingOutput;

    fn device_message(command: u8, first: u8, second: u8) -> Vec<u8> {
        let mut msg = PREAMBLE.to_vec();
        msg.extend_from_slice(&[command, first, second, SYSEX_END]);
        msg
    }

    #[test]
    fn test_pad_echo() {
        let out = RecordingOutput::new();
        let mut handler = FeedbackHandler::new(out.clone(), &FeedbackConfig::default());

        dispatch(&mut handler, &device_message(0x45, 64 + 5, 100)).unwrap();
        dispatch(&mut handler, &device_message(0x45, 5, 0)).unwrap();

        assert_eq!(
            out.sent(),
            vec![encoder::light(5u8, true), encoder::light(5u8, false)]
        );
    }

    #[test]
    fn test_pad_echo_disabled() {
        let out = RecordingOutput::new();
        let config = FeedbackConfig {
            pad_echo: false,
            flash_duration: 0.5,
        };
        let mut handler = FeedbackHandler::new(out.clone(), &config);

        dispatch(&mut handler, &device_message(0x45, 64, 100)).unwrap();
        assert!(out.sent().is_empty());
    }

    #[test]
    fn test_button_flash() {
        let out = RecordingOutput::new();
        let config = FeedbackConfig {
            pad_echo: true,
            flash_duration: 1.0,
        };
        let mut handler = FeedbackHandler::new(out.clone(), &config);

        dispatch(&mut handler, &device_message(0x48, BUTTON_FLAM - 0x10, 127)).unwrap();
        dispatch(&mut handler, &device_message(0x48, BUTTON_FLAM - 0x10, 0)).unwrap();

        assert_eq!(out.sent(), vec![encoder::light_flash(BUTTON_FLAM, 1.0)]);
    }

    #[test]
    fn test_invalid_messages_are_counted_not_fatal() {
        let out = RecordingOutput::new();
        let mut handler = FeedbackHandler::new(out.clone(), &FeedbackConfig::default());

        assert!(dispatch(&mut handler, &device_message(0x99, 0, 0)).is_ok());
        assert!(dispatch(&mut handler, &[0xF0, 0xF7]).is_ok());
        dispatch(&mut handler, &device_message(0x49, 0, 10)).unwrap();

        assert_eq!(handler.invalid_count(), 2);
        assert!(out.sent().is_empty());
    }
}
