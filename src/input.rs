//! Input decoding and dispatch
//!
//! Classifies one complete SysEx message from the padKONTROL and hands the
//! result to an [`InputHandler`]. The classifier keeps no state between
//! messages, so it can run directly inside a MIDI input callback.

use std::fmt;

use crate::error::DecodeError;
use crate::protocol::{
    event, Button, BUTTON_OFFSET, BUTTON_PRESSED, PAD_DOWN_OFFSET, ROTARY_CLOCKWISE,
};

/// Minimum length carrying the event byte and its two data bytes
const MIN_EVENT_LEN: usize = 8;

/// Decoded controller event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PadEvent {
    /// Pad hit: pad (0-15), velocity (0-127)
    PadDown { pad: u8, velocity: u8 },

    /// Pad released
    PadUp { pad: u8 },

    /// Button pressed; carries the button's light code
    ButtonDown { button: u8 },

    /// Button released
    ButtonUp { button: u8 },

    /// Knob moved: knob index, value (0-127)
    Knob { knob: u8, value: u8 },

    /// Rotary encoder turned counter-clockwise
    RotaryLeft,

    /// Rotary encoder turned clockwise
    RotaryRight,

    /// X/Y pad position
    XyPad { x: u8, y: u8 },
}

impl PadEvent {
    /// Classify a complete SysEx message (0xF0 ... 0xF7).
    ///
    /// Only positions 5-7 are inspected; the preamble is not checked.
    pub fn parse(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() < MIN_EVENT_LEN {
            return Err(DecodeError::Truncated {
                len: data.len(),
                raw: data.to_vec(),
            });
        }

        let (command, first, second) = (data[5], data[6], data[7]);

        let event = match command {
            event::PAD => {
                if first >= PAD_DOWN_OFFSET {
                    PadEvent::PadDown {
                        pad: first - PAD_DOWN_OFFSET,
                        velocity: second,
                    }
                } else {
                    PadEvent::PadUp { pad: first }
                }
            }
            event::BUTTON => {
                let button = first.wrapping_add(BUTTON_OFFSET);
                if second == BUTTON_PRESSED {
                    PadEvent::ButtonDown { button }
                } else {
                    PadEvent::ButtonUp { button }
                }
            }
            event::KNOB => PadEvent::Knob {
                knob: first,
                value: second,
            },
            event::ROTARY => {
                if second == ROTARY_CLOCKWISE {
                    PadEvent::RotaryRight
                } else {
                    PadEvent::RotaryLeft
                }
            }
            event::XY_PAD => PadEvent::XyPad {
                x: first,
                y: second,
            },
            _ => {
                return Err(DecodeError::UnknownCommand {
                    command,
                    raw: data.to_vec(),
                })
            }
        };

        Ok(event)
    }
}

/// Button code rendered by name where one exists
struct ButtonName(u8);

impl fmt::Display for ButtonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Button::from_code(self.0) {
            Some(button) => write!(f, "{} button", button),
            None => write!(f, "button #{}", self.0),
        }
    }
}

impl fmt::Display for PadEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PadEvent::PadDown { pad, velocity } => {
                write!(f, "pad #{} down, velocity {}/127", pad, velocity)
            }
            PadEvent::PadUp { pad } => write!(f, "pad #{} up", pad),
            PadEvent::ButtonDown { button } => write!(f, "{} down", ButtonName(button)),
            PadEvent::ButtonUp { button } => write!(f, "{} up", ButtonName(button)),
            PadEvent::Knob { knob, value } => write!(f, "knob #{} value = {}", knob, value),
            PadEvent::RotaryLeft => write!(f, "rotary turned left"),
            PadEvent::RotaryRight => write!(f, "rotary turned right"),
            PadEvent::XyPad { x, y } => write!(f, "x/y pad (x = {}, y = {})", x, y),
        }
    }
}

/// Receiver of decoded controller events.
///
/// Every callback defaults to doing nothing, except [`on_invalid`] which
/// hands the error back so [`dispatch`] reports it. Override `on_invalid` to
/// log and carry on instead.
///
/// [`on_invalid`]: InputHandler::on_invalid
pub trait InputHandler {
    fn on_pad_down(&mut self, _pad: u8, _velocity: u8) {}

    fn on_pad_up(&mut self, _pad: u8) {}

    fn on_button_down(&mut self, _button: u8) {}

    fn on_button_up(&mut self, _button: u8) {}

    fn on_knob(&mut self, _knob: u8, _value: u8) {}

    fn on_rotary_left(&mut self) {}

    fn on_rotary_right(&mut self) {}

    fn on_xy(&mut self, _x: u8, _y: u8) {}

    /// Called for messages that do not decode; the raw bytes are in the error
    fn on_invalid(&mut self, error: DecodeError) -> Result<(), DecodeError> {
        Err(error)
    }
}

/// Invoke the callback matching an already decoded event
pub fn deliver<H: InputHandler + ?Sized>(handler: &mut H, event: &PadEvent) {
    match *event {
        PadEvent::PadDown { pad, velocity } => handler.on_pad_down(pad, velocity),
        PadEvent::PadUp { pad } => handler.on_pad_up(pad),
        PadEvent::ButtonDown { button } => handler.on_button_down(button),
        PadEvent::ButtonUp { button } => handler.on_button_up(button),
        PadEvent::Knob { knob, value } => handler.on_knob(knob, value),
        PadEvent::RotaryLeft => handler.on_rotary_left(),
        PadEvent::RotaryRight => handler.on_rotary_right(),
        PadEvent::XyPad { x, y } => handler.on_xy(x, y),
    }
}

/// Decode one framed SysEx message and call exactly one handler method.
///
/// Returns whatever [`InputHandler::on_invalid`] returns for messages that
/// do not decode; `Ok(())` otherwise.
pub fn dispatch<H: InputHandler + ?Sized>(
    handler: &mut H,
    data: &[u8],
) -> Result<(), DecodeError> {
    match PadEvent::parse(data) {
        Ok(event) => {
            deliver(handler, &event);
            Ok(())
        }
        Err(error) => handler.on_invalid(error),
    }
}

#[cfg(test)]
mod tests;
