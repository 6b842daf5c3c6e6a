//! # Touch Pilot
//!
//! Fly a quadcopter from a touchscreen.
//!
//! Reads multitouch events (or a recorded replay), turns them into RC
//! commands and posts them to the vehicle's HTTP endpoint. Typing `c` and
//! Enter on the console toggles the connection heartbeat.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use touch_pilot::cockpit::Cockpit;
use touch_pilot::config::{Config, LoggingConfig};
use touch_pilot::input::replay;
use touch_pilot::input::touchscreen::{MultitouchDecoder, Touchscreen};
use touch_pilot::input::TouchEvent;
use touch_pilot::render::TracingRenderer;
use touch_pilot::session::Session;
use touch_pilot::transport::dispatcher::Dispatcher;
use touch_pilot::transport::heartbeat::Connection;
use touch_pilot::transport::http::HttpSink;

/// Pending touch events between the input thread and the main loop
const TOUCH_CHANNEL_CAPACITY: usize = 64;

/// Pending console lines
const CONSOLE_CHANNEL_CAPACITY: usize = 8;

/// How long shutdown waits for in-flight commands and `{"alive": false}`
const SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(1000);

/// Log file name prefix inside `logging.log_dir`
const LOG_FILE_PREFIX: &str = "touch-pilot.log";

/// Touch Pilot - fly a quadcopter from a touchscreen
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    config: PathBuf,

    /// Touchscreen device (overrides touchscreen.device_path)
    #[arg(short, long)]
    device: Option<String>,

    /// Play touch events from a JSON lines file instead of a touchscreen
    #[arg(short, long)]
    replay: Option<PathBuf>,

    /// Start the heartbeat immediately
    #[arg(long)]
    connect: bool,
}

/// Console input understood by the main loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConsoleCommand {
    ToggleConnection,
    Quit,
}

impl ConsoleCommand {
    fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "c" | "connect" => Some(Self::ToggleConnection),
            "q" | "quit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Delivery tasks that may still be in flight
#[derive(Debug, Default)]
struct PendingDeliveries {
    handles: Vec<JoinHandle<()>>,
}

impl PendingDeliveries {
    /// Tracks a delivery, forgetting the ones already finished.
    fn push(&mut self, handle: JoinHandle<()>) {
        self.handles.retain(|h| !h.is_finished());
        self.handles.push(handle);
    }

    /// Waits for every tracked delivery, at most `limit`.
    ///
    /// # Returns
    ///
    /// `false` if the limit expired first.
    async fn drain(self, limit: Duration) -> bool {
        let all = async {
            for handle in self.handles {
                // Delivery failures are already logged by the dispatcher
                let _ = handle.await;
            }
        };
        tokio::time::timeout(limit, all).await.is_ok()
    }
}

/// Main entry point for Touch Pilot
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Load and validate configuration
///    - Set up console (and optional file) logging
///    - Build the HTTP sink, dispatcher, heartbeat and session
///    - Start the touch source on its own thread or task
///
/// 2. **Main Loop**
///    - Apply each touch event: redraw the pad, send its axes
///    - Toggle the heartbeat on console `c`
///    - Stop on Ctrl+C, console `q`, or end of input
///
/// 3. **Graceful Shutdown**
///    - Disconnect, then wait briefly for the last commands and
///      `{"alive": false}` to go out
///
/// # Errors
///
/// Returns error if:
/// - The configuration file is unreadable or invalid
/// - The HTTP client cannot be built
/// - No touchscreen can be opened, or the replay file is malformed
#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load(&args.config)
        .with_context(|| format!("Failed to load configuration from {}", args.config.display()))?;

    // Keeps the file writer flushing until main returns
    let _log_guard = init_logging(&config.logging)?;

    info!("Touch Pilot v{} starting...", env!("CARGO_PKG_VERSION"));
    info!("Configuration file: {}", args.config.display());

    let sink = HttpSink::new(&config.transport)?;
    info!("Sending commands to {}", sink.url());
    let dispatcher = Dispatcher::new(Arc::new(sink));

    let mut connection = Connection::new(
        dispatcher.clone(),
        Duration::from_millis(config.transport.heartbeat_interval_ms),
    );
    let mut session = Session::new(Cockpit::from_config(&config), TracingRenderer, dispatcher);

    let (touch_tx, mut touch_rx) = mpsc::channel(TOUCH_CHANNEL_CAPACITY);
    start_input(&args, &config, touch_tx)?;

    let (console_tx, mut console_rx) = mpsc::channel(CONSOLE_CHANNEL_CAPACITY);
    spawn_console(console_tx)?;
    let mut console_open = true;
    let mut pending = PendingDeliveries::default();

    if args.connect {
        connection.connect();
    }

    info!("Type 'c' + Enter to toggle the connection, 'q' + Enter or Ctrl+C to exit");

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            event = touch_rx.recv() => match event {
                Some(event) => {
                    if let Some(delivery) = session.handle_event(&event) {
                        pending.push(delivery);
                    }
                }
                None => {
                    info!("Touch input ended");
                    break;
                }
            },

            line = console_rx.recv(), if console_open => match line.as_deref().map(ConsoleCommand::parse) {
                Some(Some(ConsoleCommand::ToggleConnection)) => {
                    let connected = connection.toggle();
                    info!("Connection {}", if connected { "up" } else { "down" });
                }
                Some(Some(ConsoleCommand::Quit)) => {
                    info!("Quit requested, shutting down...");
                    break;
                }
                Some(None) => warn!("Unknown console command (use 'c' or 'q')"),
                None => {
                    debug!("Console closed");
                    console_open = false;
                }
            },

            _ = &mut shutdown => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    if let Some(delivery) = connection.disconnect() {
        pending.push(delivery);
    }
    if !pending.drain(SHUTDOWN_TIMEOUT).await {
        warn!("Timed out delivering final messages to the vehicle");
    }

    info!("Touch Pilot shutdown complete");
    Ok(())
}

/// Sets up console logging plus a daily log file when `log_dir` is set.
///
/// `RUST_LOG` overrides the configured level.
fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let (file_layer, guard) = if config.log_dir.is_empty() {
        (None, None)
    } else {
        std::fs::create_dir_all(&config.log_dir)
            .with_context(|| format!("Failed to create log directory {}", config.log_dir))?;
        let appender = tracing_appender::rolling::daily(&config.log_dir, LOG_FILE_PREFIX);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(writer);
        (Some(layer), Some(guard))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Starts the touch source feeding `tx`.
///
/// The touchscreen blocks on reads, so it gets a plain thread; a replay is
/// a timed tokio task.
fn start_input(args: &Args, config: &Config, tx: mpsc::Sender<TouchEvent>) -> Result<()> {
    if let Some(path) = &args.replay {
        let entries = replay::load(path)?;
        tokio::spawn(replay::play(entries, tx));
        return Ok(());
    }

    let device = args.device.clone().or_else(|| {
        let configured = &config.touchscreen.device_path;
        (!configured.is_empty()).then(|| configured.clone())
    });
    let screen = Touchscreen::open(device.as_deref())?;
    let decoder = MultitouchDecoder::new(config.pads.left, config.pads.right);

    std::thread::Builder::new()
        .name("touchscreen".to_string())
        .spawn(move || {
            if let Err(e) = screen.pump(decoder, tx) {
                error!("Touchscreen stopped: {}", e);
            }
        })
        .context("Failed to start touchscreen thread")?;
    Ok(())
}

/// Forwards stdin lines to `tx` from a plain thread.
fn spawn_console(tx: mpsc::Sender<String>) -> Result<()> {
    std::thread::Builder::new()
        .name("console".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.blocking_send(line).is_err() {
                    break;
                }
            }
        })
        .context("Failed to start console thread")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_capacities() {
        assert!(TOUCH_CHANNEL_CAPACITY >= 16, "Touch channel should absorb a burst of moves");
        assert!(CONSOLE_CHANNEL_CAPACITY > 0);
    }

    #[test]
    fn test_shutdown_timeout() {
        assert_eq!(SHUTDOWN_TIMEOUT, Duration::from_secs(1));
    }

    // ==================== Shutdown Tests ====================

    #[tokio::test(start_paused = true)]
    async fn test_drain_waits_for_last_release() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let delivered = Arc::new(AtomicUsize::new(0));
        let mut pending = PendingDeliveries::default();
        for delay_ms in [10, 400, 50] {
            let delivered = Arc::clone(&delivered);
            pending.push(tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                delivered.fetch_add(1, Ordering::SeqCst);
            }));
        }

        assert!(pending.drain(SHUTDOWN_TIMEOUT).await);
        assert_eq!(delivered.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drain_gives_up_after_timeout() {
        let mut pending = PendingDeliveries::default();
        pending.push(tokio::spawn(std::future::pending::<()>()));

        assert!(!pending.drain(SHUTDOWN_TIMEOUT).await);
    }

    #[tokio::test]
    async fn test_drain_with_nothing_pending() {
        assert!(PendingDeliveries::default().drain(SHUTDOWN_TIMEOUT).await);
    }

    // ==================== CLI Tests ====================

    #[test]
    fn test_console_command_parse() {
        assert_eq!(ConsoleCommand::parse("c"), Some(ConsoleCommand::ToggleConnection));
        assert_eq!(ConsoleCommand::parse("  Connect \n"), Some(ConsoleCommand::ToggleConnection));
        assert_eq!(ConsoleCommand::parse("q"), Some(ConsoleCommand::Quit));
        assert_eq!(ConsoleCommand::parse("QUIT"), Some(ConsoleCommand::Quit));
        assert_eq!(ConsoleCommand::parse(""), None);
        assert_eq!(ConsoleCommand::parse("fly"), None);
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["touch-pilot"]).unwrap();
        assert_eq!(args.config, PathBuf::from("config/default.toml"));
        assert!(args.device.is_none());
        assert!(args.replay.is_none());
        assert!(!args.connect);
    }

    #[test]
    fn test_args_replay_and_connect() {
        let args = Args::try_parse_from([
            "touch-pilot",
            "--config",
            "pilot.toml",
            "--replay",
            "demos/hover.jsonl",
            "--connect",
        ])
        .unwrap();
        assert_eq!(args.config, PathBuf::from("pilot.toml"));
        assert_eq!(args.replay, Some(PathBuf::from("demos/hover.jsonl")));
        assert!(args.connect);
    }
}
