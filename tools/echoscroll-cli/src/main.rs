//! EchoScroll CLI: inspect, replay, and drive the touch autoscroll engine.
//!
//! Usage:
//!   echoscroll speeds                  Show the speed table
//!   echoscroll classify <TRACE>        Classify the touches in a trace
//!   echoscroll replay <TRACE>          Replay a trace and emit engine events
//!   echoscroll live                    Drive the engine from stdin in real time
//!   echoscroll config                  Show the effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use echoscroll_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "echoscroll",
    about = "Touch-driven autoscroll engine",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to the standard location)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the viewport height
    #[arg(long, global = true)]
    screen_height: Option<f64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show speed levels with their delays and labels
    Speeds,

    /// Classify every touch in a trace and print the gestures
    Classify {
        /// Path to a JSONL input trace
        trace: PathBuf,
    },

    /// Replay a trace on virtual time and write engine events
    Replay {
        /// Path to a JSONL input trace
        trace: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep running this long after the last record (ms)
        #[arg(long, default_value = "10000")]
        tail_ms: u64,
    },

    /// Read input records from stdin and drive the engine on the real clock
    Live {
        /// Stop when stdin closes instead of waiting for Ctrl+C
        #[arg(long)]
        exit_on_eof: bool,
    },

    /// Print the effective configuration as JSON
    Config,
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load(),
    };
    if let Some(height) = cli.screen_height {
        config.scroll.screen_height = height;
        config.validate()?;
    }
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    echoscroll_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Speeds => commands::speeds::run(),
        Commands::Classify { trace } => commands::classify::run(trace, &config),
        Commands::Replay {
            trace,
            output,
            tail_ms,
        } => commands::replay::run(trace, output, tail_ms, &config),
        Commands::Live { exit_on_eof } => commands::live::run(exit_on_eof, &config).await,
        Commands::Config => commands::config::run(&config),
    }
}
