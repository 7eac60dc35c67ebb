//! `cliframe-echo`: prints its arguments, driven by the `cliframe` run loop.
//!
//! Options: `--upper`, `--repeat=N`, `--debug`. Set `CLIFRAME_LOG=tracing`
//! to route log entries through `tracing` (filtered by `RUST_LOG`) instead
//! of plain stderr lines.

use cliframe::{AppConfig, Runner};

mod cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    let mut runner = Runner::with_logger(cli::EchoApp::default(), config, cli::select_logger())?;
    runner.run();
    Ok(())
}
