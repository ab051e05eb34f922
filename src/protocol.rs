//! padKONTROL native-mode protocol constants
//!
//! Wire-level values shared by the encoder and the input dispatcher. Every
//! message of the protocol starts with the Korg preamble and ends with 0xF7.

use std::fmt;

/// Start of System Exclusive
pub const SYSEX_START: u8 = 0xF0;

/// End of System Exclusive
pub const SYSEX_END: u8 = 0xF7;

/// Korg manufacturer / padKONTROL device preamble common to every message
pub const PREAMBLE: [u8; 5] = [SYSEX_START, 0x42, 0x40, 0x6E, 0x08];

/// Outbound command bytes (position 5 of a host-to-device message)
pub mod cmd {
    /// Native mode on/off
    pub const MODE_CONTROL: u8 = 0x00;
    /// Single pad or button light
    pub const LIGHT: u8 = 0x01;
    /// Three-character LED display
    pub const LED_DISPLAY: u8 = 0x22;
    /// Output enable, init and light-group family
    pub const EXTENDED: u8 = 0x3F;
}

/// Inbound event bytes (position 5 of a device-to-host message)
pub mod event {
    pub const ROTARY: u8 = 0x43;
    pub const PAD: u8 = 0x45;
    pub const BUTTON: u8 = 0x48;
    pub const KNOB: u8 = 0x49;
    pub const XY_PAD: u8 = 0x4B;

    pub fn name(event: u8) -> &'static str {
        match event {
            ROTARY => "ROTARY",
            PAD => "PAD",
            BUTTON => "BUTTON",
            KNOB => "KNOB",
            XY_PAD => "XY_PAD",
            _ => "UNKNOWN",
        }
    }
}

/// Number of pads on the device (indices 0-15)
pub const PAD_COUNT: u8 = 16;

/// Pad number offset in pad events (pad down adds 64)
pub const PAD_DOWN_OFFSET: u8 = 64;

/// Button number offset between the button event and the button light code
pub const BUTTON_OFFSET: u8 = 0x10;

/// Button data value for "pressed"
pub const BUTTON_PRESSED: u8 = 127;

/// Rotary data value for a clockwise step
pub const ROTARY_CLOCKWISE: u8 = 1;

// Light codes for the named buttons
pub const BUTTON_SCENE: u8 = 0x10;
pub const BUTTON_MESSAGE: u8 = 0x11;
pub const BUTTON_SETTING: u8 = 0x12;
pub const BUTTON_NOTE_CC: u8 = 0x13;
pub const BUTTON_MIDI_CH: u8 = 0x14;
pub const BUTTON_SW_TYPE: u8 = 0x15;
pub const BUTTON_REL_VAL: u8 = 0x16;
pub const BUTTON_VELOCITY: u8 = 0x17;
pub const BUTTON_PORT: u8 = 0x18;
pub const BUTTON_FIXED_VELOCITY: u8 = 0x19;
pub const BUTTON_PROG_CHANGE: u8 = 0x1A;
pub const BUTTON_X: u8 = 0x1B;
pub const BUTTON_Y: u8 = 0x1C;
pub const BUTTON_KNOB_1_ASSIGN: u8 = 0x1D;
pub const BUTTON_KNOB_2_ASSIGN: u8 = 0x1E;
pub const BUTTON_PEDAL: u8 = 0x1F;
pub const BUTTON_ROLL: u8 = 0x20;
pub const BUTTON_FLAM: u8 = 0x21;
pub const BUTTON_HOLD: u8 = 0x22;
pub const BUTTON_PAD: u8 = 0x30;

/// Named buttons of the padKONTROL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Scene,
    Message,
    Setting,
    NoteCc,
    MidiCh,
    SwType,
    RelVal,
    Velocity,
    Port,
    FixedVelocity,
    ProgChange,
    X,
    Y,
    Knob1Assign,
    Knob2Assign,
    Pedal,
    Roll,
    Flam,
    Hold,
    Pad,
}

impl Button {
    pub const ALL: [Button; 20] = [
        Button::Scene,
        Button::Message,
        Button::Setting,
        Button::NoteCc,
        Button::MidiCh,
        Button::SwType,
        Button::RelVal,
        Button::Velocity,
        Button::Port,
        Button::FixedVelocity,
        Button::ProgChange,
        Button::X,
        Button::Y,
        Button::Knob1Assign,
        Button::Knob2Assign,
        Button::Pedal,
        Button::Roll,
        Button::Flam,
        Button::Hold,
        Button::Pad,
    ];

    /// Light / event code of the button
    pub const fn code(self) -> u8 {
        match self {
            Button::Scene => BUTTON_SCENE,
            Button::Message => BUTTON_MESSAGE,
            Button::Setting => BUTTON_SETTING,
            Button::NoteCc => BUTTON_NOTE_CC,
            Button::MidiCh => BUTTON_MIDI_CH,
            Button::SwType => BUTTON_SW_TYPE,
            Button::RelVal => BUTTON_REL_VAL,
            Button::Velocity => BUTTON_VELOCITY,
            Button::Port => BUTTON_PORT,
            Button::FixedVelocity => BUTTON_FIXED_VELOCITY,
            Button::ProgChange => BUTTON_PROG_CHANGE,
            Button::X => BUTTON_X,
            Button::Y => BUTTON_Y,
            Button::Knob1Assign => BUTTON_KNOB_1_ASSIGN,
            Button::Knob2Assign => BUTTON_KNOB_2_ASSIGN,
            Button::Pedal => BUTTON_PEDAL,
            Button::Roll => BUTTON_ROLL,
            Button::Flam => BUTTON_FLAM,
            Button::Hold => BUTTON_HOLD,
            Button::Pad => BUTTON_PAD,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.code() == code)
    }

    pub fn name(self) -> &'static str {
        match self {
            Button::Scene => "SCENE",
            Button::Message => "MESSAGE",
            Button::Setting => "SETTING",
            Button::NoteCc => "NOTE/CC#",
            Button::MidiCh => "MIDI CH",
            Button::SwType => "SW TYPE",
            Button::RelVal => "REL. VAL",
            Button::Velocity => "VELOCITY",
            Button::Port => "PORT",
            Button::FixedVelocity => "FIXED VELOCITY",
            Button::ProgChange => "PROG CHANGE",
            Button::X => "X",
            Button::Y => "Y",
            Button::Knob1Assign => "KNOB 1 ASSIGN",
            Button::Knob2Assign => "KNOB 2 ASSIGN",
            Button::Pedal => "PEDAL",
            Button::Roll => "ROLL",
            Button::Flam => "FLAM",
            Button::Hold => "HOLD",
            Button::Pad => "PAD",
        }
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Button> for u8 {
    fn from(button: Button) -> Self {
        button.code()
    }
}

// Light state bytes
pub const LIGHT_STATE_OFF: u8 = 0x00;
pub const LIGHT_STATE_ON: u8 = 0x20;
pub const LIGHT_STATE_ONESHOT: u8 = 0x40;
pub const LIGHT_STATE_BLINK: u8 = 0x60;

/// Longest one-shot sub-value (about 279ms)
pub const ONESHOT_MAX: u8 = 30;

/// State of a single pad or button light
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightState {
    Off,
    On,
    /// Flash once; 0 (9ms) to 30 (279ms)
    OneShot(u8),
    Blink,
}

impl LightState {
    pub fn to_byte(self) -> u8 {
        match self {
            LightState::Off => LIGHT_STATE_OFF,
            LightState::On => LIGHT_STATE_ON,
            LightState::OneShot(speed) => LIGHT_STATE_ONESHOT + speed.min(ONESHOT_MAX),
            LightState::Blink => LIGHT_STATE_BLINK,
        }
    }
}

impl From<bool> for LightState {
    fn from(on: bool) -> Self {
        if on {
            LightState::On
        } else {
            LightState::Off
        }
    }
}

// LED display state bytes
pub const LED_STATE_ON: u8 = 0x00;
pub const LED_STATE_BLINK: u8 = 0x01;

/// State of the three-character LED display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LedState {
    #[default]
    On,
    Blink,
}

impl LedState {
    pub fn to_byte(self) -> u8 {
        match self {
            LedState::On => LED_STATE_ON,
            LedState::Blink => LED_STATE_BLINK,
        }
    }
}

/// Length of the LED display text
pub const LED_TEXT_LEN: usize = 3;

/// Number of packed bytes in a light group bitmask
pub const LIGHT_GROUP_BYTES: usize = 5;

/// Flags packed into each light group byte
pub const LIGHT_GROUP_BITS: u8 = 7;

/// Highest index addressable by a light group
pub const LIGHT_GROUP_MAX_INDEX: u8 = LIGHT_GROUP_BYTES as u8 * LIGHT_GROUP_BITS - 1;
