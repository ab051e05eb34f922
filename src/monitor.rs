//! Input monitor for debugging and development
//!
//! Prints every inbound message with its decoded event, and lists ports.

use anyhow::{Context, Result};
use colored::*;
use std::time::Instant;

use crate::config::AppConfig;
use crate::device::{discovery, PadKontrolDevice};
use crate::error::DecodeError;
use crate::input::{self, InputHandler, PadEvent};
use crate::protocol::event;
use crate::midi::format_hex;
use crate::session;

/// Prints decoded events; keeps no other state
struct MonitorPrinter {
    start_time: Instant,
    raw: Vec<u8>,
}

/// Event kind named by the command byte at position 5
fn command_name(raw: &[u8]) -> &'static str {
    raw.get(5).map_or("SHORT", |&command| event::name(command))
}

impl MonitorPrinter {
    fn print(&self, event: &PadEvent) {
        let hex = format_hex(&self.raw);
        let hex_colored = match event {
            PadEvent::PadDown { .. } => hex.bright_green(),
            PadEvent::PadUp { .. } => hex.bright_red(),
            PadEvent::ButtonDown { .. } | PadEvent::ButtonUp { .. } => hex.bright_yellow(),
            PadEvent::Knob { .. } | PadEvent::XyPad { .. } => hex.bright_cyan(),
            PadEvent::RotaryLeft | PadEvent::RotaryRight => hex.bright_magenta(),
        };

        println!(
            "[{}ms] {} {:<8} => {}",
            format!("{:08}", self.start_time.elapsed().as_millis()).dimmed(),
            hex_colored,
            command_name(&self.raw),
            event.to_string().bright_blue()
        );
    }
}

impl InputHandler for MonitorPrinter {
    fn on_pad_down(&mut self, pad: u8, velocity: u8) {
        self.print(&PadEvent::PadDown { pad, velocity });
    }

    fn on_pad_up(&mut self, pad: u8) {
        self.print(&PadEvent::PadUp { pad });
    }

    fn on_button_down(&mut self, button: u8) {
        self.print(&PadEvent::ButtonDown { button });
    }

    fn on_button_up(&mut self, button: u8) {
        self.print(&PadEvent::ButtonUp { button });
    }

    fn on_knob(&mut self, knob: u8, value: u8) {
        self.print(&PadEvent::Knob { knob, value });
    }

    fn on_rotary_left(&mut self) {
        self.print(&PadEvent::RotaryLeft);
    }

    fn on_rotary_right(&mut self) {
        self.print(&PadEvent::RotaryRight);
    }

    fn on_xy(&mut self, x: u8, y: u8) {
        self.print(&PadEvent::XyPad { x, y });
    }

    fn on_invalid(&mut self, error: DecodeError) -> Result<(), DecodeError> {
        println!(
            "[{}ms] {} {:<8} => {}",
            format!("{:08}", self.start_time.elapsed().as_millis()).dimmed(),
            format_hex(error.raw()).bright_black(),
            command_name(error.raw()),
            error.to_string().red()
        );
        Ok(())
    }
}

/// Monitor controller input until Ctrl+C
pub async fn run_monitor(config: &AppConfig) -> Result<()> {
    println!("{}", "=== padKONTROL Monitor ===".bold().cyan());
    println!("Press Ctrl+C to exit\n");

    let mut device = PadKontrolDevice::new(&config.midi.input_port, &config.midi.output_port);
    device.connect().context("Failed to connect to padKONTROL")?;

    let mut rx = device
        .take_message_receiver()
        .ok_or_else(|| anyhow::anyhow!("Failed to get message receiver"))?;

    // No events arrive outside native mode
    session::enter_native_mode(&device, config.native_mode.show_test_message)?;

    println!("{}", "Monitoring input...".green());
    println!("{}", "Format: [timestamp] HEX KIND => EVENT".dimmed());
    println!("{}\n", "─".repeat(80).dimmed());

    let mut printer = MonitorPrinter {
        start_time: Instant::now(),
        raw: Vec::new(),
    };

    loop {
        tokio::select! {
            Some(message) = rx.recv() => {
                printer.raw = message.clone();
                input::dispatch(&mut printer, &message)?;
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    session::end_session(&device, config.native_mode.exit_on_shutdown)?;
    device.disconnect();

    println!("\n{}", "Monitor stopped".yellow());
    Ok(())
}

/// List all ports in a formatted way
pub fn list_ports_formatted() {
    println!("\n{}", "=== Available MIDI Ports ===".bold().cyan());

    let inputs = discovery::discover_input_ports().unwrap_or_default();
    let outputs = discovery::discover_output_ports().unwrap_or_default();

    for (title, ports) in [("Input Ports:", &inputs), ("Output Ports:", &outputs)] {
        println!("\n{}", title.bold());
        if ports.is_empty() {
            println!("  {}", "No ports found".dimmed());
        }
        for port in ports.iter() {
            let marker = if port.is_padkontrol() {
                "[PADKONTROL]".green()
            } else {
                "[OTHER]".dimmed()
            };
            println!("  {}: {} {}", port.index, marker, port.name);
        }
    }

    if let Some((input, output)) = discovery::select_padkontrol_ports(&inputs, &outputs) {
        println!("\n{}", "Auto-detected padKONTROL:".bold().bright_green());
        println!("  Input:  {}", input.bright_white());
        println!("  Output: {}", output.bright_white());
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_name() {
        assert_eq!(command_name(&[0xF0, 0x42, 0x40, 0x6E, 0x08, 0x45, 0x40, 0x64, 0xF7]), "PAD");
        assert_eq!(command_name(&[0xF0, 0x42, 0x40, 0x6E, 0x08, 0x4B, 0, 0, 0xF7]), "XY_PAD");
        assert_eq!(command_name(&[0xF0, 0x42, 0x40, 0x6E, 0x08, 0x99, 0, 0, 0xF7]), "UNKNOWN");
        assert_eq!(command_name(&[0xF0, 0xF7]), "SHORT");
    }
}
