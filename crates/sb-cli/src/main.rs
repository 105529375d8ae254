//! sb - local service switchboard
//!
//! Starts, stops and health-checks the services declared in
//! `.switchboard/services.toml`.
//!
//! # Examples
//!
//! ```bash
//! # Everything, with dependencies first; Ctrl+C stops what was started
//! sb up
//!
//! # One service and whatever it depends on
//! sb start call-dashboard
//!
//! # Live status as JSON
//! sb status --json --pretty
//! ```

use sb_cli::Cli;

use std::process::ExitCode;

use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    sb_cli::run(Cli::parse()).await
}
