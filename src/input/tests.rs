//! Tests for input dispatch

use super::*;
use crate::encoder;
use crate::protocol::{BUTTON_FLAM, BUTTON_SCENE, PREAMBLE, SYSEX_END};

/// Records every callback so tests can check exactly one fired
#[derive(Default)]
struct Recorder {
    events: Vec<PadEvent>,
    invalid: Vec<DecodeError>,
}

impl InputHandler for Recorder {
    fn on_pad_down(&mut self, pad: u8, velocity: u8) {
        self.events.push(PadEvent::PadDown { pad, velocity });
    }

    fn on_pad_up(&mut self, pad: u8) {
        self.events.push(PadEvent::PadUp { pad });
    }

    fn on_button_down(&mut self, button: u8) {
        self.events.push(PadEvent::ButtonDown { button });
    }

    fn on_button_up(&mut self, button: u8) {
        self.events.push(PadEvent::ButtonUp { button });
    }

    fn on_knob(&mut self, knob: u8, value: u8) {
        self.events.push(PadEvent::Knob { knob, value });
    }

    fn on_rotary_left(&mut self) {
        self.events.push(PadEvent::RotaryLeft);
    }

    fn on_rotary_right(&mut self) {
        self.events.push(PadEvent::RotaryRight);
    }

    fn on_xy(&mut self, x: u8, y: u8) {
        self.events.push(PadEvent::XyPad { x, y });
    }

    fn on_invalid(&mut self, error: DecodeError) -> Result<(), DecodeError> {
        self.invalid.push(error);
        Ok(())
    }
}

/// Handler relying on every default
struct Silent;

impl InputHandler for Silent {}

fn device_message(command: u8, first: u8, second: u8) -> Vec<u8> {
    let mut msg = PREAMBLE.to_vec();
    msg.extend_from_slice(&[command, first, second, SYSEX_END]);
    msg
}

fn dispatch_one(msg: &[u8]) -> Recorder {
    let mut recorder = Recorder::default();
    dispatch(&mut recorder, msg).unwrap();
    recorder
}

#[test]
fn test_pad_down() {
    let rec = dispatch_one(&device_message(0x45, 64, 100));
    assert_eq!(rec.events, vec![PadEvent::PadDown { pad: 0, velocity: 100 }]);
    assert!(rec.invalid.is_empty());

    let rec = dispatch_one(&device_message(0x45, 64 + 15, 1));
    assert_eq!(rec.events, vec![PadEvent::PadDown { pad: 15, velocity: 1 }]);
}

#[test]
fn test_pad_up() {
    let rec = dispatch_one(&device_message(0x45, 3, 0));
    assert_eq!(rec.events, vec![PadEvent::PadUp { pad: 3 }]);
}

#[test]
fn test_button_down_and_up() {
    let rec = dispatch_one(&device_message(0x48, 0, 127));
    assert_eq!(rec.events, vec![PadEvent::ButtonDown { button: BUTTON_SCENE }]);

    let rec = dispatch_one(&device_message(0x48, 0, 0));
    assert_eq!(rec.events, vec![PadEvent::ButtonUp { button: BUTTON_SCENE }]);

    let rec = dispatch_one(&device_message(0x48, BUTTON_FLAM - 16, 127));
    assert_eq!(rec.events, vec![PadEvent::ButtonDown { button: BUTTON_FLAM }]);
}

#[test]
fn test_button_release_is_any_value_but_127() {
    let rec = dispatch_one(&device_message(0x48, 2, 126));
    assert_eq!(rec.events, vec![PadEvent::ButtonUp { button: 0x12 }]);
}

#[test]
fn test_knob() {
    let rec = dispatch_one(&device_message(0x49, 1, 77));
    assert_eq!(rec.events, vec![PadEvent::Knob { knob: 1, value: 77 }]);
}

#[test]
fn test_rotary_direction() {
    let rec = dispatch_one(&device_message(0x43, 0, 1));
    assert_eq!(rec.events, vec![PadEvent::RotaryRight]);

    let rec = dispatch_one(&device_message(0x43, 0, 0));
    assert_eq!(rec.events, vec![PadEvent::RotaryLeft]);

    let rec = dispatch_one(&device_message(0x43, 0, 0x7F));
    assert_eq!(rec.events, vec![PadEvent::RotaryLeft]);
}

#[test]
fn test_xy_pad() {
    let rec = dispatch_one(&device_message(0x4B, 10, 120));
    assert_eq!(rec.events, vec![PadEvent::XyPad { x: 10, y: 120 }]);
}

#[test]
fn test_unknown_command_fires_only_invalid() {
    let msg = device_message(0x99, 1, 2);
    let rec = dispatch_one(&msg);
    assert!(rec.events.is_empty());
    assert_eq!(
        rec.invalid,
        vec![DecodeError::UnknownCommand {
            command: 0x99,
            raw: msg.clone(),
        }]
    );
    assert_eq!(rec.invalid[0].raw(), msg.as_slice());
}

#[test]
fn test_default_invalid_handler_reports_error() {
    let msg = device_message(0x99, 0, 0);
    let err = dispatch(&mut Silent, &msg).unwrap_err();
    assert!(matches!(err, DecodeError::UnknownCommand { command: 0x99, .. }));
}

#[test]
fn test_default_handlers_ignore_valid_events() {
    for msg in [
        device_message(0x45, 70, 10),
        device_message(0x48, 1, 127),
        device_message(0x49, 0, 5),
        device_message(0x43, 0, 1),
        device_message(0x4B, 5, 5),
    ] {
        assert!(dispatch(&mut Silent, &msg).is_ok());
    }
}

#[test]
fn test_short_messages_are_decode_errors() {
    for len in 0..8 {
        let msg: Vec<u8> = device_message(0x45, 64, 100).into_iter().take(len).collect();
        let rec = dispatch_one(&msg);
        assert!(rec.events.is_empty());
        assert_eq!(
            rec.invalid,
            vec![DecodeError::Truncated {
                len,
                raw: msg.clone(),
            }]
        );
    }

    let err = dispatch(&mut Silent, &[0xF0, 0xF7]).unwrap_err();
    assert!(matches!(err, DecodeError::Truncated { len: 2, .. }));
}

#[test]
fn test_eight_bytes_is_enough() {
    // no terminator, but positions 5-7 are present
    let msg = [0xF0, 0x42, 0x40, 0x6E, 0x08, 0x49, 2, 3];
    assert_eq!(PadEvent::parse(&msg), Ok(PadEvent::Knob { knob: 2, value: 3 }));
}

#[test]
fn test_dispatch_is_independent_per_message() {
    let mut rec = Recorder::default();
    let messages = [
        device_message(0x45, 65, 90),
        device_message(0x99, 0, 0),
        device_message(0x45, 1, 0),
        device_message(0x43, 0, 1),
    ];
    for msg in &messages {
        dispatch(&mut rec, msg).unwrap();
    }
    assert_eq!(
        rec.events,
        vec![
            PadEvent::PadDown { pad: 1, velocity: 90 },
            PadEvent::PadUp { pad: 1 },
            PadEvent::RotaryRight,
        ]
    );
    assert_eq!(rec.invalid.len(), 1);
}

#[test]
fn test_encoder_output_is_not_an_input_event() {
    // host commands and device events use different command bytes
    let mut rec = Recorder::default();
    for msg in [
        encoder::native_mode_on(),
        encoder::light(3u8, true),
        encoder::led(encoder::LedText::new("abc").unwrap(), Default::default()),
    ] {
        dispatch(&mut rec, &msg).unwrap();
    }
    assert!(rec.events.is_empty());
    assert_eq!(rec.invalid.len(), 3);

    let group = encoder::light_group(encoder::LedText::new("abc").unwrap(), [(0, true)]).unwrap();
    assert!(PadEvent::parse(&group).is_err());
}

#[test]
fn test_event_display() {
    assert_eq!(
        PadEvent::PadDown { pad: 4, velocity: 99 }.to_string(),
        "pad #4 down, velocity 99/127"
    );
    assert_eq!(
        PadEvent::ButtonDown { button: BUTTON_FLAM }.to_string(),
        "FLAM button down"
    );
    assert_eq!(PadEvent::ButtonUp { button: 0x2F }.to_string(), "button #47 up");
    assert_eq!(PadEvent::RotaryLeft.to_string(), "rotary turned left");
}

#[test]
fn test_deliver_decoded_event() {
    let mut rec = Recorder::default();
    deliver(&mut rec, &PadEvent::Knob { knob: 0, value: 64 });
    assert_eq!(rec.events, vec![PadEvent::Knob { knob: 0, value: 64 }]);
}
