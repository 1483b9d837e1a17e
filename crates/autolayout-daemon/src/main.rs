//! autolayout
//!
//! Watches i3 window events and splits the focused container along the
//! window's longer side.

mod daemon;
mod i3_ipc;
mod layout;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use autolayout_config::{Config, LogLevel};
use clap::{ArgAction, Parser};
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::i3_ipc::{I3Client, I3EventStream};
use crate::layout::AutoLayout;

const DEFAULT_CONFIG_PATH: &str = "~/.config/autolayout/config.kdl";

#[derive(Parser, Debug)]
#[command(name = "autolayout")]
#[command(about = "Automatic split orientation for i3")]
#[command(version, disable_version_flag = true)]
struct Args {
    /// Run in the background
    #[arg(short = 'b', long = "daemon")]
    daemon: bool,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Print version
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,
}

fn main() {
    let args = parse_args();

    let config = load_config(args.config.as_deref());
    init_tracing(
        config
            .as_ref()
            .map(|config| config.global.log_level)
            .unwrap_or_default(),
    );

    if let Err(err) = config.and_then(|config| run(&args, &config)) {
        error!("{err:#}");
        std::process::exit(1);
    }
}

/// Parse arguments; usage errors exit with status 1, help and version with 0
fn parse_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    }
}

fn init_tracing(level: LogLevel) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str())),
        )
        .init();
}

/// Load the configuration file
///
/// A missing file is only an error when it was named on the command line.
fn load_config(explicit: Option<&str>) -> Result<Config> {
    let raw = explicit.unwrap_or(DEFAULT_CONFIG_PATH);
    let path: PathBuf = shellexpand::tilde(raw).into_owned().into();

    if explicit.is_none() && !path.exists() {
        return Ok(Config::default());
    }

    autolayout_config::parse_config(&path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

fn run(args: &Args, config: &Config) -> Result<()> {
    if args.daemon {
        daemon::daemonize().context("Failed to daemonize")?;
    }

    let socket_path = i3_ipc::resolve_socket_path(
        config.ipc.socket_path.as_deref(),
        &config.ipc.wm_command,
    )
    .context("Failed to locate the i3 IPC socket")?;

    // Built after daemonizing; forking with a live runtime is unsound
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start tokio runtime")?;

    runtime.block_on(serve(&socket_path))
}

async fn serve(socket_path: &Path) -> Result<()> {
    // Separate connections: events may arrive between a command and its reply
    let commands = I3Client::connect(socket_path)
        .await
        .context("Failed to open command connection")?;
    let events = I3Client::connect(socket_path)
        .await
        .context("Failed to open event connection")?;

    let events = I3EventStream::subscribe(events).await?;
    let layout = AutoLayout::new(commands, events);

    let mut sigterm =
        signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;

    info!("autolayout running");

    tokio::select! {
        result = layout.run() => result.context("Window event loop stopped")?,
        _ = tokio::signal::ctrl_c() => info!("Received SIGINT, shutting down"),
        _ = sigterm.recv() => info!("Received SIGTERM, shutting down"),
    }

    Ok(())
}
