//! Error types for the padKONTROL codec and transport

use thiserror::Error;

use crate::midi::format_hex;

/// Errors raised while building an outbound message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// LED text must be exactly three characters
    #[error("LED text '{text}' must be 3 characters long (got {len})")]
    InvalidText { text: String, len: usize },

    /// LED text characters must fit in a 7-bit SysEx data byte
    #[error("LED text character {ch:?} is not ASCII")]
    NonAsciiText { ch: char },

    /// Light group bitmask only covers indices 0-34
    #[error("light index {index} does not fit in a light group (must be 0-34)")]
    LightOutOfRange { index: u8 },
}

/// Errors raised while classifying an inbound message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Message too short to carry the command and its two data bytes
    #[error("truncated SysEx ({len} bytes): {}", format_hex(.raw))]
    Truncated { len: usize, raw: Vec<u8> },

    /// Command byte at position 5 is not a known input event
    #[error("unrecognised SysEx command 0x{command:02X}: {}", format_hex(.raw))]
    UnknownCommand { command: u8, raw: Vec<u8> },
}

impl DecodeError {
    /// The raw message that failed to decode
    pub fn raw(&self) -> &[u8] {
        match self {
            DecodeError::Truncated { raw, .. } | DecodeError::UnknownCommand { raw, .. } => raw,
        }
    }
}

/// Errors raised by the MIDI transport
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{direction} port matching '{pattern}' not found")]
    PortNotFound {
        direction: &'static str,
        pattern: String,
    },

    #[error("failed to initialise MIDI {0}")]
    Init(#[from] midir::InitError),

    #[error("failed to connect to port '{port}': {reason}")]
    Connect { port: String, reason: String },

    #[error("failed to send SysEx: {0}")]
    Send(#[from] midir::SendError),

    #[error("not connected to output port")]
    NotConnected,
}

/// Error from an encode-and-send call
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_keeps_raw_message() {
        let raw = vec![0xF0, 0x42, 0x40, 0xF7];
        let err = DecodeError::Truncated {
            len: raw.len(),
            raw: raw.clone(),
        };
        assert_eq!(err.raw(), raw.as_slice());
        assert_eq!(err.to_string(), "truncated SysEx (4 bytes): F0 42 40 F7");
    }

    #[test]
    fn test_unknown_command_display() {
        let err = DecodeError::UnknownCommand {
            command: 0x99,
            raw: vec![0xF0, 0x99, 0xF7],
        };
        assert_eq!(err.to_string(), "unrecognised SysEx command 0x99: F0 99 F7");
    }
}
