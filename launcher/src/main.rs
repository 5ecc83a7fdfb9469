//! gbhost - load Game Boy ROMs into a runtime and show its console
//!
//! Fetches every resource in the manifest (over HTTP, or from a local
//! directory with `--dir`), registers each at the runtime filesystem root,
//! and with `--run` invokes the runtime's entry point. Display lines are
//! written to stdout as they arrive; everything else goes to the log.
//!
//! # Usage
//!
//! ```bash
//! # Load bootRom.gb and tetris.gb from a local server and run
//! gbhost --run
//!
//! # Load from a directory with a custom manifest
//! gbhost --dir roms/ --resource dmg_boot.bin --resource zelda.gb --run
//!
//! # Report the final status as JSON
//! gbhost --base-url https://roms.example/gb/ --json-status
//! ```

mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use gbhost_core::config::{self, Config};
use gbhost_core::{
    CartridgeMain, DirFetcher, Fetcher, HttpFetcher, LoadStatus, MemoryRuntime, Session,
};
use gbhost_shared::ResourceManifest;
use gbhost_shared::fs::{MAX_MANIFEST_BYTES, read_file_with_limit};

/// gbhost - asset loader and console bridge for Game Boy runtimes
#[derive(Parser, Debug)]
#[command(name = "gbhost")]
#[command(about = "Load Game Boy ROMs into a runtime and show its console output")]
#[command(version)]
struct Cli {
    /// Base URL resource names are resolved against
    #[arg(long, conflicts_with = "dir")]
    base_url: Option<String>,

    /// Read resources from a local directory instead of over HTTP
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Resource to load, in order (repeatable)
    #[arg(long = "resource", value_name = "NAME")]
    resources: Vec<String>,

    /// JSON manifest of the form {"resources": [...]}
    #[arg(long, conflicts_with = "resources")]
    manifest: Option<PathBuf>,

    /// Config file to use instead of the platform default
    #[arg(long)]
    config: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Invoke the entry point once loading finishes
    #[arg(long)]
    run: bool,

    /// Print display markup as-is instead of one line per entry
    #[arg(long)]
    html: bool,

    /// Print the final load status as JSON
    #[arg(long)]
    json_status: bool,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded config
    fn apply(&self, config: &mut Config) {
        if let Some(base_url) = &self.base_url {
            config.loader.base_url = base_url.clone();
        }
        if !self.resources.is_empty() {
            config.loader.resources = self.resources.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.loader.timeout_secs = Some(secs);
        }
        if self.html {
            config.display.html = true;
        }
    }

    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => config::load_from(path)?,
            None => config::load(),
        };
        self.apply(&mut config);
        Ok(config)
    }

    fn manifest(&self, config: &Config) -> Result<ResourceManifest> {
        match &self.manifest {
            Some(path) => {
                let bytes = read_file_with_limit(path, MAX_MANIFEST_BYTES)?;
                let json = String::from_utf8(bytes)
                    .with_context(|| format!("{} is not valid UTF-8", path.display()))?;
                ResourceManifest::from_json(&json)
                    .with_context(|| format!("Invalid manifest {}", path.display()))
            }
            None => config.loader.manifest().context("Invalid resource list"),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.load_config()?;
    let manifest = cli.manifest(&config)?;
    let html = config.display.html;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create async runtime")?;

    let status = match &cli.dir {
        Some(dir) => {
            tracing::info!("Loading {} resources from {}", manifest.len(), dir.display());
            let fetcher = DirFetcher::with_limit(dir, config.loader.max_resource_bytes);
            rt.block_on(run_session(manifest, fetcher, cli.run, html))
        }
        None => {
            tracing::info!(
                "Loading {} resources from {}",
                manifest.len(),
                config.loader.base_url
            );
            let fetcher = HttpFetcher::with_options(
                &config.loader.base_url,
                config.loader.timeout(),
                config.loader.max_resource_bytes,
            )?;
            rt.block_on(run_session(manifest, fetcher, cli.run, html))
        }
    };

    if cli.json_status {
        println!("{}", serde_json::to_string(&status)?);
    }
    if status.is_failed() {
        std::process::exit(1);
    }
    Ok(())
}

/// Load everything, optionally run, and return the final status.
async fn run_session<F: Fetcher>(
    manifest: ResourceManifest,
    fetcher: F,
    run: bool,
    html: bool,
) -> LoadStatus {
    let mut runtime = MemoryRuntime::new(CartridgeMain::new());
    runtime.boot();

    let mut session = Session::new(manifest, fetcher, runtime);
    let view = tokio::spawn(render::follow(session.subscribe(), html, std::io::stdout()));

    if let Err(e) = session.on_runtime_ready().await {
        tracing::debug!("Load stopped: {}", e);
    }
    if run && let Err(e) = session.on_entry_point_trigger() {
        tracing::error!("Failed to run: {}", e);
    }

    let status = session.status().clone();
    // Closing the bridge ends the view.
    drop(session);
    if let Err(e) = view.await {
        tracing::warn!("Display task failed: {}", e);
    }

    status
}
