// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! reporter - download Sales and Financial reports from App Store Connect
//!
//! Each invocation validates its arguments, issues exactly one request to
//! the reporting service and writes the report file or prints the answer.

mod cli;
mod config;
mod credentials;
mod error;
mod http;
mod output;
mod report;

use anyhow::Result;
use clap::Parser;
use cli::query::{self, QueryOptions};
use cli::{Cli, Commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }
    let colorized = !cli.no_color;

    if let Err(err) = run(cli).await {
        output::print_error(&format!("{:#}", err), colorized);
        let reporter_err = err.downcast_ref::<error::ReporterError>();
        if let Some(hint) = reporter_err.and_then(|e| e.hint()) {
            eprintln!("{}", hint);
        }
        let code = match reporter_err {
            Some(e) if e.is_validation() => 2,
            _ => 1,
        };
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let options = QueryOptions::from_cli(&cli);

    match cli.command {
        Commands::Completions { shell } => {
            cli::completions::execute(shell)?;
        }
        command => {
            if let Some((name, args)) = query::report_args(command) {
                query::execute(name, args, options).await?;
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
