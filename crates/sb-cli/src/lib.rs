//! sb-cli library
//!
//! Command-line front end over `sb-core`. The binary is a thin wrapper around
//! [`run`].

pub(crate) mod app;
pub(crate) mod cli;
pub(crate) mod commands;
pub(crate) mod logging;
pub(crate) mod output;
pub(crate) mod signals;

#[cfg(test)]
mod tests;

pub use app::{EXIT_CONFIG_ERROR, EXIT_OPERATION_FAILED, run};
pub use cli::Cli;
