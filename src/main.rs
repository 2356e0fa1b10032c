use std::io::Write;

use color_eyre::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use storefront_realtime::app::RealtimeContext;
use storefront_realtime::cli::{parse_args, run_cli_command};
use storefront_realtime::config::ClientConfig;

const DEFAULT_LOG_FILTER: &str = "storefront_realtime=info";

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    // stdout carries the messages, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    // Handle --version / --help before any initialization
    if run_cli_command(parse_args(std::env::args())) {
        return Ok(());
    }

    color_eyre::install()?;
    init_logging();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run())
}

async fn run() -> Result<()> {
    let config = ClientConfig::from_env();
    let mut ctx = RealtimeContext::start(config);

    ctx.listen(|message| {
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", message) {
            warn!("Failed to write message to stdout: {}", e);
        }
    });

    let mut state_rx = ctx.client().state_receiver();
    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result?;
                info!("Interrupted, shutting down");
                break;
            }
            changed = state_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = state_rx.borrow_and_update().clone();
                info!("Connection state: {}", state);
                if state.is_exhausted() {
                    warn!("Giving up on the realtime channel");
                    break;
                }
            }
        }
    }

    ctx.shutdown();
    Ok(())
}
