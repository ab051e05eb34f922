//! padkontrol - Korg padKONTROL native-mode library
//!
//! Builds the device's SysEx commands (lights, LED display, native mode) and
//! decodes its pad, button, knob, rotary and X/Y pad events.
//!
//! ```no_run
//! use padkontrol::encoder::{self, LedText};
//! use padkontrol::input::{dispatch, InputHandler};
//! use padkontrol::protocol::{Button, LedState};
//!
//! struct Printer;
//!
//! impl InputHandler for Printer {
//!     fn on_pad_down(&mut self, pad: u8, velocity: u8) {
//!         println!("pad #{} down, velocity {}", pad, velocity);
//!     }
//! }
//!
//! let hello = encoder::led(LedText::new("Hi ").unwrap(), LedState::On);
//! let flash = encoder::light_flash(Button::ProgChange, 0.5);
//! # let _ = (hello, flash);
//!
//! let message = [0xF0, 0x42, 0x40, 0x6E, 0x08, 0x45, 0x40, 0x64, 0xF7];
//! dispatch(&mut Printer, &message).unwrap();
//! ```

pub mod config;
pub mod device;
pub mod encoder;
pub mod error;
pub mod feedback;
pub mod input;
pub mod midi;
pub mod monitor;
pub mod protocol;
pub mod session;

pub use encoder::LedText;
pub use error::{DecodeError, EncodeError, SessionError, TransportError};
pub use input::{dispatch, InputHandler, PadEvent};
pub use protocol::{Button, LedState, LightState};
pub use session::{PadKontrol, SysexOutput};
