use crate::commands::Commands;
use crate::output::OutputFormat;

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "sb")]
#[command(about = "Start, stop and health-check local services")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,

    /// Configuration directory (default: $SB_CONFIG_DIR, else ./.switchboard)
    #[arg(long, global = true, value_name = "DIR")]
    pub(crate) config_dir: Option<PathBuf>,

    /// Machine-readable JSON output
    #[arg(long, global = true)]
    pub(crate) json: bool,

    /// Pretty-print JSON output (implies --json)
    #[arg(long, global = true)]
    pub(crate) pretty: bool,
}

impl Cli {
    pub(crate) fn output_format(&self) -> OutputFormat {
        if self.json || self.pretty {
            OutputFormat::Json {
                pretty: self.pretty,
            }
        } else {
            OutputFormat::Table
        }
    }
}
