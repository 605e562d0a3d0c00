// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Folio - WhatsApp support intake service.
//!
//! This is the binary entry point: it loads configuration and dispatches to
//! the `serve`, `doctor` and `tickets` subcommands.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod doctor;
mod serve;
mod tickets;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use folio_config::FolioConfig;
use folio_core::TicketStatus;

/// Folio - WhatsApp support intake service.
#[derive(Parser, Debug)]
#[command(name = "folio", version, about, long_about = None)]
struct Cli {
    /// Load this config file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the webhook server (default).
    Serve,
    /// Check configuration, database and WhatsApp credentials.
    Doctor {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// Inspect and close support tickets.
    Tickets {
        #[command(subcommand)]
        action: TicketsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum TicketsCommand {
    /// List tickets, newest first.
    List {
        /// Only tickets opened by this WhatsApp user id.
        #[arg(long)]
        user: Option<String>,
        /// Only tickets with this status.
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },
    /// Close an open ticket.
    Close {
        /// Ticket (folio) number.
        id: i64,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StatusArg {
    Open,
    Closed,
}

impl From<StatusArg> for TicketStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Open => TicketStatus::Open,
            StatusArg::Closed => TicketStatus::Closed,
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> FolioConfig {
    let loaded = match path {
        Some(path) => folio_config::load_and_validate_path(path),
        None => folio_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            folio_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref());

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Doctor { plain } => doctor::run_doctor(&config, plain).await,
        Commands::Tickets { action } => match action {
            TicketsCommand::List { user, status } => {
                tickets::run_list(&config, user, status.map(Into::into)).await
            }
            TicketsCommand::Close { id } => tickets::run_close(&config, id).await,
        },
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
