//! Configuration management for padkontrol
//!
//! Handles loading, parsing and validation of the YAML configuration file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct AppConfig {
    pub midi: MidiConfig,
    #[serde(default)]
    pub native_mode: NativeModeConfig,
    #[serde(default)]
    pub feedback: FeedbackConfig,
}

/// MIDI port configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct MidiConfig {
    /// Input port name pattern (case-insensitive substring)
    #[serde(default = "default_input_port")]
    pub input_port: String,
    /// Output port name pattern (case-insensitive substring)
    #[serde(default = "default_output_port")]
    pub output_port: String,
}

/// Native mode session options
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct NativeModeConfig {
    /// Show "YES" on the display once native mode is up
    #[serde(default = "default_true")]
    pub show_test_message: bool,
    /// Send native-mode-off when the application stops
    #[serde(default = "default_true")]
    pub exit_on_shutdown: bool,
}

/// Light feedback for controller input
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct FeedbackConfig {
    /// Light pads while they are held
    #[serde(default = "default_true")]
    pub pad_echo: bool,
    /// Flash length for button presses (0.0 = 9ms, 1.0 = 279ms)
    #[serde(default = "default_flash_duration")]
    pub flash_duration: f32,
}

impl Default for MidiConfig {
    fn default() -> Self {
        Self {
            input_port: default_input_port(),
            output_port: default_output_port(),
        }
    }
}

impl Default for NativeModeConfig {
    fn default() -> Self {
        Self {
            show_test_message: true,
            exit_on_shutdown: true,
        }
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            pad_echo: true,
            flash_duration: default_flash_duration(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file with validation
    pub async fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path))?;

        Self::from_yaml(&contents).with_context(|| format!("Invalid config file: {}", path))
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: AppConfig =
            serde_yaml::from_str(contents).context("Failed to parse YAML config")?;

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self, path: &str) -> Result<()> {
        let yaml = serde_yaml::to_string(self).context("Failed to serialize config to YAML")?;

        fs::write(path, yaml)
            .await
            .with_context(|| format!("Failed to write config file: {}", path))?;

        Ok(())
    }

    /// Validate configuration for correctness
    pub fn validate(&self) -> Result<()> {
        if self.midi.input_port.trim().is_empty() {
            anyhow::bail!("MIDI input_port cannot be empty");
        }
        if self.midi.output_port.trim().is_empty() {
            anyhow::bail!("MIDI output_port cannot be empty");
        }

        let duration = self.feedback.flash_duration;
        if !(0.0..=1.0).contains(&duration) {
            anyhow::bail!(
                "feedback.flash_duration {} is invalid (must be 0.0-1.0)",
                duration
            );
        }

        Ok(())
    }
}

// Default value functions
fn default_input_port() -> String { "padKONTROL 1 PORT A".to_string() }
fn default_output_port() -> String { "padKONTROL 1 CTRL".to_string() }
fn default_true() -> bool { true }
fn default_flash_duration() -> f32 { 0.5 }
