//! postboard - a 3D bulletin board client
//!
//! Runs a board session headlessly against an in-memory scene, driven by a
//! command script.

mod command_script;
mod config;
mod headless;

use anyhow::Result;
use clap::Parser;
use command_script::CommandScript;
use config::BoardConfig;
use headless::HeadlessConfig;
use postboard_ui3d::UserId;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless 3D bulletin board client", long_about = None)]
struct Args {
    /// Board configuration file (TOML)
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Override the API base URL from the config file
    #[arg(long)]
    base_url: Option<String>,

    /// Override the board section from the config file
    #[arg(long)]
    section: Option<String>,

    /// Read posts from a JSON file instead of the API
    #[arg(long)]
    posts_file: Option<PathBuf>,

    /// JSON command script to run against the session (default: wait, dump)
    #[arg(long)]
    script: Option<PathBuf>,

    /// User id attributed with scripted clicks
    #[arg(long, default_value = "headless")]
    user: String,

    /// Tracing filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_filter: String,

    /// Write the effective configuration to --config and exit
    #[arg(long)]
    write_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_filter)),
        )
        .with_ansi(std::io::stdout().is_terminal())
        .init();

    info!("Starting postboard v{}", env!("CARGO_PKG_VERSION"));

    let mut board = BoardConfig::load_from_path(&args.config);
    if let Some(base_url) = args.base_url {
        board.api.base_url = base_url;
    }
    if let Some(section) = args.section {
        board.api.section = section;
    }

    if args.write_config {
        board.save_to_path(&args.config)?;
        info!(path = %args.config.display(), "Configuration written");
        return Ok(());
    }

    // Parse the script before anything starts so a bad script costs nothing
    let script = match &args.script {
        Some(path) => CommandScript::from_path(path)?,
        None => CommandScript::default_session(),
    };

    headless::run(HeadlessConfig {
        board,
        posts_file: args.posts_file,
        script,
        user: UserId::new(args.user),
    })
    .await
}
