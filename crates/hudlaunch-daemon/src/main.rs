use anyhow::Result;
use clap::{Parser, Subcommand};
use hudlaunch_core::{ProcessLauncher, Properties, Toggled, KEY_POLL_INTERVAL_MS, KEY_TARGET_NAME, VERSION};
use hudlaunch_daemon::{Settings, Watcher};
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// hudlaunch watcher daemon
///
/// Polls the OS process table for the target executable and logs every
/// run-state transition
#[derive(Parser, Debug)]
#[command(name = "hudlaunch-daemon")]
#[command(version = VERSION)]
#[command(about = "hudlaunch daemon - watches the target process", long_about = None)]
struct Cli {
    /// Path to the flat key=value config file
    #[arg(short, long, default_value = "config.ini")]
    config: PathBuf,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Continuous polling of the target's run state
    Watch,

    /// Single poll, then dump statistics
    Check,

    /// Stop the target if running, launch it otherwise
    Toggle,

    /// Write a config file populated with the default keys
    InitConfig {
        /// Output path for the config file
        #[arg(short, long, default_value = "config.ini")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging first
    init_logging()?;

    info!("hudlaunch daemon v{} starting...", VERSION);
    info!("Started at {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));

    // Load the flat store; a missing file is a normal first run
    let settings = load_settings(&cli.config);

    settings
        .validate()
        .map_err(|e| anyhow::anyhow!("Settings validation failed: {}", e))?;

    info!(
        "Watching {:?} every {}ms",
        settings.target_name, settings.poll_interval_ms
    );

    match cli.command {
        Some(Commands::Watch) => run_watch_loop(settings).await?,
        Some(Commands::Check) => run_check_once(settings)?,
        Some(Commands::Toggle) => run_toggle(settings)?,
        Some(Commands::InitConfig { output }) => init_config(output)?,
        None => {
            info!("No command specified, running watch loop by default");
            run_watch_loop(settings).await?
        }
    }

    Ok(())
}

/// Run the continuous polling loop
async fn run_watch_loop(settings: Settings) -> Result<()> {
    info!("Starting watch loop...");

    let mut watcher = Watcher::new(&settings.target_name);
    let poll_interval = Duration::from_millis(settings.poll_interval_ms);

    loop {
        // A failed query is logged and retried on the next tick
        if let Err(e) = watcher.check() {
            error!("Poll failed: {}", e);
        }

        let stats = watcher.stats();
        tracing::debug!(
            "Stats: polls={}, transitions={}, starts={}, kills={}",
            stats.total_polls,
            stats.total_transitions,
            stats.total_starts,
            stats.total_kills
        );

        sleep(poll_interval).await;
    }
}

/// Run a single poll and display statistics
fn run_check_once(settings: Settings) -> Result<()> {
    info!("Running single poll...");

    let mut watcher = Watcher::new(&settings.target_name);
    let state = watcher
        .check()
        .map_err(|e| anyhow::anyhow!("Poll failed: {}", e))?;

    let stats = watcher.stats();
    info!("=== Watcher Status ===");
    info!("Target: {}", watcher.target_name());
    info!("State: {:?} (action now: {})", state, state.action_label());
    info!("Total polls: {}", stats.total_polls);
    info!("Transitions: {}", stats.total_transitions);

    Ok(())
}

/// Stop the target if it is running, launch it otherwise
fn run_toggle(settings: Settings) -> Result<()> {
    let launcher = ProcessLauncher::new();

    let hud_path = settings.hud_path.clone().or_else(|| {
        // Fall back to an executable named after the target next to us
        let cwd = std::env::current_dir().ok()?;
        ProcessLauncher::discover_in_dir(&cwd, &settings.target_name)
            .map(|p| p.to_string_lossy().to_string())
    });

    let result = launcher.toggle(&settings.target_name, hud_path.as_deref().unwrap_or(""));

    match result {
        Ok(Toggled::Started(pid)) => {
            info!("Launched {} (pid {})", settings.target_name, pid);
            Ok(())
        }
        Ok(Toggled::Stopped) => {
            info!("Killed {}", settings.target_name);
            Ok(())
        }
        Err(e) => {
            error!("Toggle failed: {}", e);
            Err(anyhow::anyhow!("{}", e))
        }
    }
}

/// Write a config file populated with the default keys
fn init_config(output: PathBuf) -> Result<()> {
    info!("Writing config file: {:?}", output);

    let defaults = Settings::default();
    let mut props = Properties::load(&output);
    props
        .set(KEY_TARGET_NAME, &defaults.target_name)
        .map_err(|e| anyhow::anyhow!("Failed to write config file: {}", e))?;
    props
        .set(KEY_POLL_INTERVAL_MS, &defaults.poll_interval_ms.to_string())
        .map_err(|e| anyhow::anyhow!("Failed to write config file: {}", e))?;

    info!("Config file written; set HUD_PATH to the target executable");
    Ok(())
}

/// Resolve settings from the flat store, or defaults when it is absent
fn load_settings(path: &PathBuf) -> Settings {
    if path.exists() {
        info!("Loading config from: {:?}", path);
    } else {
        warn!("Config file not found: {:?}, using defaults", path);
    }
    let props = Properties::load(path);
    Settings::from_properties(&props)
}

/// Initialize logging with file and stdout output
fn init_logging() -> Result<()> {
    // Create logs directory if it doesn't exist
    std::fs::create_dir_all("./logs")?;

    // File appender for daemon logs
    let file_appender = tracing_appender::rolling::daily("./logs", "hudlaunch-daemon.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Setup tracing subscriber with both stdout and file output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_ansi(true)
                .with_target(false),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Prevent _guard from being dropped
    std::mem::forget(_guard);

    info!("Logging initialized");

    Ok(())
}
