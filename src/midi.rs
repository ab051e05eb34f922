//! MIDI byte-stream utilities
//!
//! SysEx framing for inbound data, port lookup and hex formatting.

use midir::MidiIO;
use tracing::{debug, trace, warn};

use crate::protocol::{SYSEX_END, SYSEX_START};

/// Longest SysEx message kept, terminator included; anything longer is dropped
pub const MAX_SYSEX_LEN: usize = 1024;

/// First system real-time status byte (clock, active sensing, ...)
const REALTIME_START: u8 = 0xF8;

/// Reassembles SysEx messages from raw MIDI input.
///
/// Bytes are buffered from a 0xF0 until the next 0xF7; the buffered message
/// (terminator included) is then returned and the buffer reset. Real-time
/// bytes (0xF8-0xFF) may be interleaved anywhere and are skipped. Any other
/// status byte, a 0xF0 arriving mid-message, or a message growing past
/// [`MAX_SYSEX_LEN`] drops the partial message. Bytes seen outside a message
/// are ignored.
#[derive(Debug, Default)]
pub struct SysexFramer {
    buffer: Vec<u8>,
    in_message: bool,
}

impl SysexFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte; returns a message when it completes one
    pub fn push_byte(&mut self, byte: u8) -> Option<Vec<u8>> {
        match byte {
            REALTIME_START..=0xFF => {
                trace!("Skipping real-time byte: {:02X}", byte);
                None
            }
            SYSEX_START => {
                if self.in_message {
                    debug!("Dropping incomplete SysEx: {}", format_hex(&self.buffer));
                }
                self.buffer.clear();
                self.buffer.push(byte);
                self.in_message = true;
                None
            }
            SYSEX_END if self.in_message => {
                self.buffer.push(byte);
                self.in_message = false;
                Some(std::mem::take(&mut self.buffer))
            }
            0x80..=0xFF if self.in_message => {
                debug!(
                    "Status byte {:02X} interrupted SysEx: {}",
                    byte,
                    format_hex(&self.buffer)
                );
                self.reset();
                None
            }
            0x00..=0x7F if self.in_message => {
                if self.buffer.len() + 1 >= MAX_SYSEX_LEN {
                    warn!("Dropping SysEx longer than {} bytes", MAX_SYSEX_LEN);
                    self.reset();
                } else {
                    self.buffer.push(byte);
                }
                None
            }
            _ => {
                trace!("Ignoring byte outside SysEx: {:02X}", byte);
                None
            }
        }
    }

    /// Feed a chunk; returns completed messages in arrival order
    pub fn push(&mut self, data: &[u8]) -> Vec<Vec<u8>> {
        data.iter().filter_map(|&b| self.push_byte(b)).collect()
    }

    /// Whether a message has started but not yet completed
    pub fn is_pending(&self) -> bool {
        self.in_message
    }

    /// Discard any partial message
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.in_message = false;
    }
}

/// Find a port whose name contains `pattern` (case-insensitive)
pub fn find_port_by_substring<T: MidiIO>(midi_io: &T, pattern: &str) -> Option<(T::Port, String)> {
    let pattern = pattern.to_lowercase();
    for port in midi_io.ports() {
        if let Ok(name) = midi_io.port_name(&port) {
            if name.to_lowercase().contains(&pattern) {
                debug!("Found port '{}' matching pattern '{}'", name, pattern);
                return Some((port, name));
            }
        }
    }
    None
}

/// Format MIDI bytes as hex string for debugging
pub fn format_hex(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
