//! Sift demo
//!
//! Mounts the dropdown showcase in a headless host, replays the scripted
//! session from the config file, and prints what each dropdown shows.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sift_app::demo::{describe, mount_showcase};
use sift_app::{run_script, AppConfig, Host};
use sift_cn::Dropdown;

#[derive(Parser)]
#[command(name = "sift-demo")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Replay a scripted session against the Sift dropdown showcase", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Print JSON snapshots of every dropdown after the script
    #[arg(long)]
    snapshot: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AppConfig::default(),
    };

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.filter))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    info!(
        width = config.window.width,
        height = config.window.height,
        steps = config.script.len(),
        "starting showcase"
    );

    let mut host = Host::new();
    let items = mount_showcase(&mut host, &config.dropdown).context("Failed to mount showcase")?;
    run_script(&mut host, &config.script).context("Script failed")?;

    for item in &items {
        let Some(snapshot) = host.widget::<Dropdown>(item.id).and_then(Dropdown::snapshot) else {
            continue;
        };
        println!("{}", item.title);
        print!("{}", describe(&snapshot));
        println!();
    }

    if cli.snapshot {
        let snapshots: Vec<_> = items
            .iter()
            .filter_map(|item| host.widget::<Dropdown>(item.id))
            .filter_map(Dropdown::snapshot)
            .collect();
        let json = serde_json::to_string_pretty(&snapshots).context("Failed to serialize snapshots")?;
        println!("{json}");
    }

    Ok(())
}
