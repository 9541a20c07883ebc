// crates/server/src/main.rs
//! radfetch server binary.
//!
//! Binds the HTTP server and wires the simulated step executor; the real
//! browser driver is an external collaborator plugged in through the
//! `StepExecutor` trait.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use radfetch_core::report_workflow;
use radfetch_server::{create_app_with_static, AppState, SimulatedExecutor};

/// Default port for the server.
const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Parser)]
#[command(name = "radfetch", about = "Portal report automation service")]
struct Cli {
    /// Port to listen on (RADFETCH_PORT and PORT env vars take precedence).
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Directory where finished report files are saved.
    #[arg(long, default_value = "downloads")]
    downloads_dir: PathBuf,

    /// Directory for failure diagnostics and debug traces.
    #[arg(long, default_value = "artifacts")]
    artifacts_dir: PathBuf,

    /// Directory with the UI bundle; defaults to ./static when it exists.
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Pace of the simulated executor, per step.
    #[arg(long, default_value_t = 300)]
    step_delay_ms: u64,
}

/// Get the server port from environment or CLI.
fn get_port(cli: &Cli) -> u16 {
    std::env::var("RADFETCH_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|p| p.parse().ok())
        .unwrap_or(cli.port)
}

/// Get the static directory for serving the UI bundle.
fn get_static_dir(cli: &Cli) -> Option<PathBuf> {
    cli.static_dir.clone().or_else(|| {
        let dir = PathBuf::from("static");
        dir.exists().then_some(dir)
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn,radfetch_server=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let executor = Arc::new(SimulatedExecutor::new(Duration::from_millis(cli.step_delay_ms)));
    let state = AppState::new(
        report_workflow(),
        executor,
        cli.downloads_dir.clone(),
        cli.artifacts_dir.clone(),
    );

    let static_dir = get_static_dir(&cli);
    let app = create_app_with_static(state, static_dir);

    let port = get_port(&cli);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "radfetch listening");

    axum::serve(listener, app).await?;
    Ok(())
}
