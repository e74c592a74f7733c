use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::*;
use hudlaunch_core::{
    ProcessLauncher, ProcessScanner, Properties, Toggled, DEFAULT_TARGET_NAME, KEY_HUD_PATH,
    KEY_TARGET_NAME, VERSION,
};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "hudlaunch")]
#[command(author = "hudlaunch Team")]
#[command(version = VERSION)]
#[command(about = "Launch, stop and watch one target process", long_about = None)]
struct Cli {
    /// Path to the flat key=value config file
    #[arg(short, long, default_value = "config.ini", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the target's current run state
    Status {
        /// Machine-readable output
        #[arg(long)]
        json: bool,
    },

    /// Launch the target executable
    Start,

    /// Hard-kill the target process
    Stop,

    /// Stop the target if running, launch it otherwise
    Toggle,

    /// Remember the target executable's path
    SetPath {
        /// Path to the executable
        path: PathBuf,
    },

    /// Live status, refreshed on the poll interval
    Watch {
        /// Refresh interval, e.g. "1s" or "500ms"
        #[arg(long, default_value = "1s", value_parser = humantime::parse_duration)]
        interval: Duration,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate for
        shell: Shell,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    let props = Properties::load(&cli.config);
    let target = props
        .get_or(KEY_TARGET_NAME, DEFAULT_TARGET_NAME)
        .to_string();

    match cli.command {
        Some(Commands::Status { json }) => {
            if json {
                show_status_json(&props, &target);
            } else {
                println!("{}", "=== hudlaunch Status ===".green().bold());
                show_status(&props, &target);
            }
        }
        Some(Commands::Start) => {
            println!("{}", "=== hudlaunch Start ===".green().bold());
            start_target(&props, &target);
        }
        Some(Commands::Stop) => {
            println!("{}", "=== hudlaunch Stop ===".yellow().bold());
            stop_target(&target);
        }
        Some(Commands::Toggle) => {
            println!("{}", "=== hudlaunch Toggle ===".green().bold());
            toggle_target(&props, &target);
        }
        Some(Commands::SetPath { path }) => {
            set_path(cli.config, path);
        }
        Some(Commands::Watch { interval }) => {
            println!("{}", "=== hudlaunch Watch Mode ===".green().bold());
            println!("Press Ctrl+C to exit...\n");
            watch_mode(&props, &target, interval);
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "hudlaunch", &mut std::io::stdout());
        }
        Some(Commands::Version) => {
            println!("hudlaunch v{}", VERSION);
            println!("Launch, stop and watch one target process");
        }
        None => {
            // Default: show status
            println!("{}", "=== hudlaunch Status ===".green().bold());
            show_status(&props, &target);
        }
    }
}

/// Resolve the executable path: the persisted key, else an executable named
/// after the target in the current directory.
fn resolve_path(props: &Properties, target: &str) -> Option<String> {
    if let Some(path) = props.get(KEY_HUD_PATH) {
        if !path.is_empty() {
            return Some(path.to_string());
        }
    }

    let cwd = std::env::current_dir().ok()?;
    ProcessLauncher::discover_in_dir(&cwd, target).map(|p| p.to_string_lossy().to_string())
}

fn show_status(props: &Properties, target: &str) {
    let scanner = ProcessScanner::new();

    match scanner.find(target) {
        Ok(Some(process)) => {
            println!("\n{}", format!("✅ {} is running:", target).green());
            println!("  PID:     {}", process.pid);
            println!("  Memory:  {} MB", process.memory_mb);
            println!("  Command: {}", process.command);
        }
        Ok(None) => {
            println!("\n{}", format!("⚠️  {} is not running", target).yellow());
        }
        Err(e) => {
            println!("\n{}", format!("❌ Error querying {}: {}", target, e).red());
        }
    }

    match resolve_path(props, target) {
        Some(path) => println!("  Path:    {}", path),
        None => println!(
            "  Path:    {}",
            "not set - run 'hudlaunch set-path <file>'".yellow()
        ),
    }

    println!();
}

fn show_status_json(props: &Properties, target: &str) {
    let scanner = ProcessScanner::new();

    let process = match scanner.find(target) {
        Ok(p) => p,
        Err(e) => {
            println!("{}", format!("❌ Error querying {}: {}", target, e).red());
            std::process::exit(1);
        }
    };

    let status = serde_json::json!({
        "target": target,
        "running": process.is_some(),
        "process": process,
        "path": resolve_path(props, target),
    });

    println!(
        "{}",
        serde_json::to_string_pretty(&status).expect("status is always serializable")
    );
}

fn start_target(props: &Properties, target: &str) {
    let path = match resolve_path(props, target) {
        Some(p) => p,
        None => {
            println!("{}", "❌ Executable path is not set".red());
            println!("Run 'hudlaunch set-path <file>' first");
            std::process::exit(1);
        }
    };

    let launcher = ProcessLauncher::new();
    match launcher.start(&path) {
        Ok(pid) => {
            println!("{}", format!("✅ Launched {} (pid {})", target, pid).green());
        }
        Err(e) => {
            println!("{}", format!("❌ {}", e).red());
            std::process::exit(1);
        }
    }
}

fn stop_target(target: &str) {
    let launcher = ProcessLauncher::new();

    match launcher.stop(target) {
        Ok(true) => {
            println!("{}", format!("✅ Killed {}", target).green());
        }
        Ok(false) => {
            println!("{}", format!("⚠️  {} is not running", target).yellow());
        }
        Err(e) => {
            println!("{}", format!("❌ Failed to stop {}: {}", target, e).red());
            std::process::exit(1);
        }
    }
}

fn toggle_target(props: &Properties, target: &str) {
    let launcher = ProcessLauncher::new();
    let path = resolve_path(props, target);

    match launcher.toggle(target, path.as_deref().unwrap_or("")) {
        Ok(Toggled::Started(pid)) => {
            println!("{}", format!("✅ Launched {} (pid {})", target, pid).green());
        }
        Ok(Toggled::Stopped) => {
            println!("{}", format!("✅ Killed {}", target).green());
        }
        Err(e) => {
            println!("{}", format!("❌ {}", e).red());
            if path.is_none() {
                println!("Run 'hudlaunch set-path <file>' first");
            }
            std::process::exit(1);
        }
    }
}

fn set_path(config: PathBuf, path: PathBuf) {
    if !path.is_file() {
        println!("{}", format!("❌ No such file: {:?}", path).red());
        std::process::exit(1);
    }

    // Store the absolute path, like a file picker would hand back
    let absolute = path.canonicalize().unwrap_or(path);

    let mut props = Properties::load(&config);
    match props.set(KEY_HUD_PATH, &absolute.to_string_lossy()) {
        Ok(()) => {
            println!(
                "{}",
                format!("✅ Saved path to {:?}", props.path()).green()
            );
            println!("  {}={}", KEY_HUD_PATH, absolute.to_string_lossy());
        }
        Err(e) => {
            println!("{}", format!("❌ Failed to write config: {}", e).red());
            std::process::exit(1);
        }
    }
}

fn watch_mode(props: &Properties, target: &str, interval: Duration) {
    loop {
        // Clear screen
        print!("\x1B[2J\x1B[1;1H");

        println!("{}", "=== hudlaunch Watch Mode ===".green().bold());
        show_status(props, target);

        std::thread::sleep(interval);
    }
}
