//! Korg padKONTROL MIDI transport
//!
//! Opens the device's MIDI ports with midir, reassembles inbound SysEx and
//! forwards complete messages over a channel in arrival order.

use std::sync::Arc;

use midir::{Ignore, MidiInput, MidiInputConnection, MidiOutput, MidiOutputConnection};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::error::TransportError;
use crate::midi::{find_port_by_substring, format_hex, SysexFramer};
use crate::session::SysexOutput;

/// Client name reported to the MIDI system
const CLIENT_NAME: &str = "padkontrol";

/// Framed messages buffered between the MIDI thread and the consumer
const MESSAGE_QUEUE: usize = 1000;

/// padKONTROL MIDI connection
pub struct PadKontrolDevice {
    /// MIDI input connection; the framer lives inside the callback state
    input_conn: Option<MidiInputConnection<SysexFramer>>,

    /// MIDI output connection
    output_conn: Option<Arc<Mutex<MidiOutputConnection>>>,

    /// Sender for framed inbound messages
    message_tx: mpsc::Sender<Vec<u8>>,

    /// Receiver handed out to the consumer
    message_rx: Option<mpsc::Receiver<Vec<u8>>>,

    /// Input port name pattern
    input_port_name: String,

    /// Output port name pattern
    output_port_name: String,
}

impl PadKontrolDevice {
    /// Create a device for the given port name patterns (substring match)
    pub fn new(input_port_name: impl Into<String>, output_port_name: impl Into<String>) -> Self {
        let (message_tx, message_rx) = mpsc::channel(MESSAGE_QUEUE);

        Self {
            input_conn: None,
            output_conn: None,
            message_tx,
            message_rx: Some(message_rx),
            input_port_name: input_port_name.into(),
            output_port_name: output_port_name.into(),
        }
    }

    /// Connect to the padKONTROL MIDI ports
    pub fn connect(&mut self) -> Result<(), TransportError> {
        self.disconnect();

        info!(
            "Connecting to padKONTROL - Input: '{}', Output: '{}'",
            self.input_port_name, self.output_port_name
        );

        // Connect input
        let mut midi_in = MidiInput::new(&format!("{}-input", CLIENT_NAME))?;
        // SysEx is filtered by default; clock and active sensing are noise here
        midi_in.ignore(Ignore::TimeAndActiveSense);

        debug!("Found {} MIDI input ports", midi_in.port_count());

        let (in_port, port_name) = find_port_by_substring(&midi_in, &self.input_port_name)
            .ok_or_else(|| TransportError::PortNotFound {
                direction: "input",
                pattern: self.input_port_name.clone(),
            })?;

        info!("Connecting to input port: {}", port_name);

        let message_tx = self.message_tx.clone();
        let input_conn = midi_in
            .connect(
                &in_port,
                CLIENT_NAME,
                move |_timestamp, data, framer: &mut SysexFramer| {
                    trace!("MIDI in: {}", format_hex(data));
                    for message in framer.push(data) {
                        // Don't block the MIDI thread
                        if let Err(e) = message_tx.try_send(message) {
                            warn!("Dropping inbound SysEx: {}", e);
                        }
                    }
                },
                SysexFramer::new(),
            )
            .map_err(|e| TransportError::Connect {
                port: port_name.clone(),
                reason: e.to_string(),
            })?;

        self.input_conn = Some(input_conn);

        // Connect output
        let midi_out = MidiOutput::new(&format!("{}-output", CLIENT_NAME))?;

        debug!("Found {} MIDI output ports", midi_out.port_count());

        let (out_port, port_name) = find_port_by_substring(&midi_out, &self.output_port_name)
            .ok_or_else(|| TransportError::PortNotFound {
                direction: "output",
                pattern: self.output_port_name.clone(),
            })?;

        info!("Connecting to output port: {}", port_name);

        let output_conn = midi_out
            .connect(&out_port, CLIENT_NAME)
            .map_err(|e| TransportError::Connect {
                port: port_name.clone(),
                reason: e.to_string(),
            })?;

        self.output_conn = Some(Arc::new(Mutex::new(output_conn)));

        info!("padKONTROL connected");
        Ok(())
    }

    /// Close both ports
    pub fn disconnect(&mut self) {
        let was_connected = self.input_conn.is_some() || self.output_conn.is_some();
        self.input_conn = None;
        self.output_conn = None;
        if was_connected {
            info!("padKONTROL disconnected");
        }
    }

    pub fn is_connected(&self) -> bool {
        self.input_conn.is_some() && self.output_conn.is_some()
    }

    /// Take the receiver of framed inbound SysEx messages
    pub fn take_message_receiver(&mut self) -> Option<mpsc::Receiver<Vec<u8>>> {
        self.message_rx.take()
    }
}

impl SysexOutput for PadKontrolDevice {
    fn send_sysex(&self, data: &[u8]) -> Result<(), TransportError> {
        let output = self
            .output_conn
            .as_ref()
            .ok_or(TransportError::NotConnected)?;

        output.lock().send(data)?;

        trace!("Sent: {}", format_hex(data));
        Ok(())
    }
}

impl Drop for PadKontrolDevice {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Port discovery utilities
pub mod discovery {
    use super::*;

    /// Substring shared by every padKONTROL port name
    pub const DEVICE_KEYWORD: &str = "padkontrol";

    /// Input port carrying native-mode SysEx
    pub const INPUT_KEYWORD: &str = "port a";

    /// Output port accepting native-mode SysEx
    pub const OUTPUT_KEYWORD: &str = "ctrl";

    /// Information about a MIDI port
    #[derive(Debug, Clone)]
    pub struct PortInfo {
        pub index: usize,
        pub name: String,
    }

    impl PortInfo {
        pub fn is_padkontrol(&self) -> bool {
            self.name.to_lowercase().contains(DEVICE_KEYWORD)
        }
    }

    fn port_infos<T: midir::MidiIO>(midi_io: &T) -> Vec<PortInfo> {
        midi_io
            .ports()
            .iter()
            .enumerate()
            .filter_map(|(index, port)| {
                midi_io
                    .port_name(port)
                    .ok()
                    .map(|name| PortInfo { index, name })
            })
            .collect()
    }

    /// Discover input ports
    pub fn discover_input_ports() -> Result<Vec<PortInfo>, TransportError> {
        let midi_in = MidiInput::new(&format!("{}-discovery", CLIENT_NAME))?;
        Ok(port_infos(&midi_in))
    }

    /// Discover output ports
    pub fn discover_output_ports() -> Result<Vec<PortInfo>, TransportError> {
        let midi_out = MidiOutput::new(&format!("{}-discovery", CLIENT_NAME))?;
        Ok(port_infos(&midi_out))
    }

    /// Pick the native-mode ports out of the discovered ones
    pub fn select_padkontrol_ports(
        inputs: &[PortInfo],
        outputs: &[PortInfo],
    ) -> Option<(String, String)> {
        let input = inputs
            .iter()
            .find(|p| p.is_padkontrol() && p.name.to_lowercase().contains(INPUT_KEYWORD))?;
        let output = outputs
            .iter()
            .find(|p| p.is_padkontrol() && p.name.to_lowercase().contains(OUTPUT_KEYWORD))?;
        Some((input.name.clone(), output.name.clone()))
    }

    /// Find padKONTROL ports automatically
    pub fn find_padkontrol_ports() -> Option<(String, String)> {
        let inputs = discover_input_ports().ok()?;
        let outputs = discover_output_ports().ok()?;
        select_padkontrol_ports(&inputs, &outputs)
    }
}
