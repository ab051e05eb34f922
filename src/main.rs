//! padkontrol - Korg padKONTROL native-mode driver
//!
//! Puts the controller into native mode, logs its input and answers pad and
//! button presses with light feedback.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use padkontrol::config::AppConfig;
use padkontrol::device::{discovery, PadKontrolDevice};
use padkontrol::feedback::FeedbackHandler;
use padkontrol::midi::format_hex;
use padkontrol::{input, monitor, session};

/// padKONTROL native-mode driver
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (defaults are used if it does not exist)
    #[arg(short, long, env = "PADKONTROL_CONFIG", default_value = "padkontrol.yaml")]
    config: String,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// List available MIDI ports
    #[arg(long)]
    list_ports: bool,

    /// Print decoded input without light feedback
    #[arg(long)]
    monitor: bool,

    /// Pick padKONTROL ports automatically, ignoring the configured names
    #[arg(long)]
    auto_detect: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    init_logging(&args.log_level)?;

    if args.list_ports {
        monitor::list_ports_formatted();
        return Ok(());
    }

    let mut config = load_config(&args.config).await?;

    if args.auto_detect {
        match discovery::find_padkontrol_ports() {
            Some((input, output)) => {
                info!("Auto-detected padKONTROL ports: '{}' / '{}'", input, output);
                config.midi.input_port = input;
                config.midi.output_port = output;
            }
            None => warn!("No padKONTROL found, using configured port names"),
        }
    }

    if args.monitor {
        return monitor::run_monitor(&config).await;
    }

    run_app(config).await?;

    info!("padkontrol shutdown complete");
    Ok(())
}

async fn load_config(path: &str) -> Result<AppConfig> {
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        let config = AppConfig::load(path).await?;
        info!("Configuration loaded from {}", path);
        Ok(config)
    } else {
        info!("No configuration file at {}, using defaults", path);
        Ok(AppConfig::default())
    }
}

async fn run_app(config: AppConfig) -> Result<()> {
    let mut device = PadKontrolDevice::new(&config.midi.input_port, &config.midi.output_port);
    device.connect().context("Failed to connect to padKONTROL")?;

    let mut rx = device
        .take_message_receiver()
        .ok_or_else(|| anyhow::anyhow!("Failed to get message receiver"))?;

    session::enter_native_mode(&device, config.native_mode.show_test_message)
        .context("Failed to enter native mode")?;

    info!("Ready to process padKONTROL input!");

    let mut handler = FeedbackHandler::new(&device, &config.feedback);

    loop {
        tokio::select! {
            Some(message) = rx.recv() => {
                debug!("Received: {}", format_hex(&message));
                // Feedback handler logs and skips invalid messages
                input::dispatch(&mut handler, &message)?;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received, stopping event loop");
                break;
            }
        }
    }

    if handler.invalid_count() > 0 {
        info!("Skipped {} invalid messages", handler.invalid_count());
    }
    drop(handler);

    if let Err(e) = session::end_session(&device, config.native_mode.exit_on_shutdown) {
        warn!("Failed to leave native mode: {}", e);
    }

    device.disconnect();
    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    Ok(())
}
