use std::time::Duration;

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// List registered services
    List,

    /// Show live status of one or all services
    Status {
        /// Service id (all services when omitted)
        id: Option<String>,
    },

    /// Start services and their dependencies; they keep running after exit
    Start {
        /// Service ids, started in the order given
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        ids: Vec<String>,

        /// Start every registered service
        #[arg(long)]
        all: bool,
    },

    /// Stop services, whoever started them
    Stop {
        /// Service ids
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        ids: Vec<String>,

        /// Stop every registered service
        #[arg(long)]
        all: bool,
    },

    /// Start services, watch them, and stop them on Ctrl+C or SIGTERM
    Up {
        /// Service ids (default: orchestrator.auto_start, else all)
        ids: Vec<String>,

        /// Status refresh interval, e.g. "5s" or "1m"
        #[arg(long, default_value = "5s", value_parser = humantime::parse_duration)]
        interval: Duration,
    },

    /// Show the dependency-first startup order for a service
    Plan {
        id: String,
    },

    /// Print the URL a service is reachable at
    Url {
        id: String,
    },
}
