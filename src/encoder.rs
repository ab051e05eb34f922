//! Outbound message builders
//!
//! Pure functions producing complete SysEx messages for the padKONTROL in
//! native mode. Nothing here performs I/O; hand the bytes to a
//! [`SysexOutput`](crate::session::SysexOutput) to transmit them.

use crate::error::EncodeError;
use crate::protocol::{
    cmd, LedState, LightState, LED_TEXT_LEN, LIGHT_GROUP_BITS, LIGHT_GROUP_BYTES,
    LIGHT_GROUP_MAX_INDEX, ONESHOT_MAX, PREAMBLE, SYSEX_END,
};

/// Output enable payload: port/velocity setup followed by the 16 pad notes
const ENABLE_OUTPUT_PAYLOAD: [u8; 45] = [
    0x3F, 0x2A, 0x00, 0x00, 0x05, 0x05, 0x05, 0x7F, 0x7E, 0x7F, 0x7F, 0x03, //
    0x0A, 0x0A, 0x0A, 0x0A, 0x0A, 0x0A, 0x0A, 0x0A, //
    0x0A, 0x0A, 0x0A, 0x0A, 0x0A, 0x0A, 0x0A, 0x0A, //
    0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, //
    0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F, 0x10, //
    SYSEX_END,
];

/// Preamble + payload, where the payload carries its own terminator
fn message(payload: &[u8]) -> Vec<u8> {
    let mut msg = Vec::with_capacity(PREAMBLE.len() + payload.len());
    msg.extend_from_slice(&PREAMBLE);
    msg.extend_from_slice(payload);
    msg
}

/// Switch the device into native mode. Must be sent first.
pub fn native_mode_on() -> Vec<u8> {
    message(&[cmd::MODE_CONTROL, 0x00, 0x01, SYSEX_END])
}

/// Return the device to its normal MIDI controller mode
pub fn native_mode_off() -> Vec<u8> {
    message(&[cmd::MODE_CONTROL, 0x00, 0x00, SYSEX_END])
}

/// Enable pad/button/knob output. Must precede [`native_mode_init`].
pub fn native_mode_enable_output() -> Vec<u8> {
    message(&ENABLE_OUTPUT_PAYLOAD)
}

/// Clear all lights and the display. Must be sent after [`native_mode_on`].
pub fn native_mode_init() -> Vec<u8> {
    message(&[
        cmd::EXTENDED,
        0x0A,
        0x01,
        0x00,
        0x00,
        0x00,
        0x00,
        0x00,
        0x00,
        0x29,
        0x29,
        0x29,
        SYSEX_END,
    ])
}

/// Show "YES" on the display; confirms native mode is active
pub fn native_mode_test() -> Vec<u8> {
    message(&[cmd::LED_DISPLAY, 0x04, 0x00, b'Y', b'E', b'S', SYSEX_END])
}

/// Convert a 3-character string to the display's character codes.
///
/// Characters keep their order. Fails if the string is not exactly three
/// characters or a character is outside 7-bit ASCII.
pub fn encode_text(text: &str) -> Result<[u8; LED_TEXT_LEN], EncodeError> {
    let len = text.chars().count();
    if len != LED_TEXT_LEN {
        return Err(EncodeError::InvalidText {
            text: text.to_string(),
            len,
        });
    }

    let mut out = [0u8; LED_TEXT_LEN];
    for (slot, ch) in out.iter_mut().zip(text.chars()) {
        if !ch.is_ascii() {
            return Err(EncodeError::NonAsciiText { ch });
        }
        *slot = ch as u8;
    }
    Ok(out)
}

/// Text for the LED display, already in wire form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LedText([u8; LED_TEXT_LEN]);

impl LedText {
    /// Encode a 3-character string
    pub fn new(text: &str) -> Result<Self, EncodeError> {
        encode_text(text).map(Self)
    }

    /// Use character codes that were encoded earlier
    pub const fn from_bytes(bytes: [u8; LED_TEXT_LEN]) -> Self {
        Self(bytes)
    }

    pub fn bytes(&self) -> [u8; LED_TEXT_LEN] {
        self.0
    }

    fn reversed(&self) -> [u8; LED_TEXT_LEN] {
        let mut bytes = self.0;
        bytes.reverse();
        bytes
    }
}

impl From<[u8; LED_TEXT_LEN]> for LedText {
    fn from(bytes: [u8; LED_TEXT_LEN]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl TryFrom<&str> for LedText {
    type Error = EncodeError;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        Self::new(text)
    }
}

/// Set the LED display. Text goes out in forward order.
pub fn led(text: LedText, state: LedState) -> Vec<u8> {
    let mut msg = message(&[cmd::LED_DISPLAY, 0x04, state.to_byte()]);
    msg.extend_from_slice(&text.bytes());
    msg.push(SYSEX_END);
    msg
}

/// Set a single pad (0-15) or button light.
///
/// `state` may be a [`LightState`] or a `bool` (true = on, false = off).
pub fn light(target: impl Into<u8>, state: impl Into<LightState>) -> Vec<u8> {
    message(&[cmd::LIGHT, target.into(), state.into().to_byte(), SYSEX_END])
}

/// One-shot speed for a duration between 0.0 (9ms) and 1.0 (279ms).
///
/// Out-of-range durations are clamped; NaN counts as 0.
pub fn flash_speed(duration: f32) -> u8 {
    let duration = if duration.is_nan() {
        0.0
    } else {
        duration.clamp(0.0, 1.0)
    };
    ((ONESHOT_MAX as f32) * duration).floor() as u8
}

/// Flash a pad or button light once
pub fn light_flash(target: impl Into<u8>, duration: f32) -> Vec<u8> {
    light(target, LightState::OneShot(flash_speed(duration)))
}

/// Pack light indices into the 5-byte group bitmask.
///
/// Only raised flags are written; anything not listed (or listed as false)
/// stays off. Lights beyond index 34 can only be listed as off.
pub fn light_group_mask(
    lights: impl IntoIterator<Item = (u8, bool)>,
) -> Result<[u8; LIGHT_GROUP_BYTES], EncodeError> {
    let mut mask = [0u8; LIGHT_GROUP_BYTES];
    for (index, on) in lights {
        if on {
            if index > LIGHT_GROUP_MAX_INDEX {
                return Err(EncodeError::LightOutOfRange { index });
            }
            let byte = (index / LIGHT_GROUP_BITS) as usize;
            let bit = index % LIGHT_GROUP_BITS;
            mask[byte] |= 1 << bit;
        }
    }
    Ok(mask)
}

/// Set the LED display and many lights with one message.
///
/// Unlike [`led`], the display text is sent in reverse order.
pub fn light_group(
    text: LedText,
    lights: impl IntoIterator<Item = (u8, bool)>,
) -> Result<Vec<u8>, EncodeError> {
    let mask = light_group_mask(lights)?;

    let mut msg = message(&[cmd::EXTENDED, 0x0A, 0x01]);
    msg.extend_from_slice(&mask);
    msg.push(0x00);
    msg.extend_from_slice(&text.reversed());
    msg.push(SYSEX_END);
    Ok(msg)
}
