// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Run a single report query

use super::{Cli, Commands};
use crate::config::Config;
use crate::credentials::{CredentialSet, KeychainResolver, Mode, SecretResolver, SecretSource};
use crate::error::ReporterError;
use crate::http::{encode_request, unwrap_response, Client};
use crate::output::{self, Emitted};
use crate::report::{self, ReportArgs, ReportRequest};
use anyhow::{Context, Result};
use std::io;
use std::path::PathBuf;

/// Everything a query needs besides the command itself
pub struct QueryOptions {
    pub account: Option<u64>,
    pub mode: Option<Mode>,
    pub userid: Option<String>,
    pub secret: Option<SecretSource>,
    pub output_dir: PathBuf,
    pub config: Option<PathBuf>,
}

impl QueryOptions {
    pub fn from_cli(cli: &Cli) -> Self {
        let secret = if let Some(item) = &cli.access_token_keychain_item {
            Some(SecretSource::AccessTokenItem(item.clone()))
        } else if let Some(token) = &cli.access_token {
            Some(SecretSource::AccessToken(token.clone()))
        } else if let Some(item) = &cli.password_keychain_item {
            Some(SecretSource::PasswordItem(item.clone()))
        } else {
            cli.password.clone().map(SecretSource::Password)
        };

        Self {
            account: cli.account,
            mode: cli.mode,
            userid: cli.userid.clone(),
            secret,
            output_dir: cli.output_dir.clone(),
            config: cli.config.clone(),
        }
    }
}

/// Map a parsed subcommand onto its table name and arguments
pub fn report_args(command: Commands) -> Option<(&'static str, ReportArgs)> {
    let vendor_date = |vendor: u64, date: String| ReportArgs {
        vendor: Some(vendor),
        date: Some(date),
        ..Default::default()
    };

    let mapped = match command {
        Commands::GetStatus { service } => (
            "getStatus",
            ReportArgs {
                service: Some(service),
                ..Default::default()
            },
        ),
        Commands::GetAccounts { service } => (
            "getAccounts",
            ReportArgs {
                service: Some(service),
                ..Default::default()
            },
        ),
        Commands::GetVendors => ("getVendors", ReportArgs::default()),
        Commands::GetVendorsAndRegions => ("getVendorsAndRegions", ReportArgs::default()),
        Commands::GetFinancialReport {
            vendor,
            regioncode,
            fiscalyear,
            fiscalperiod,
        } => (
            "getFinancialReport",
            ReportArgs {
                vendor: Some(vendor),
                region: Some(regioncode),
                fiscal_year: Some(fiscalyear),
                fiscal_period: Some(fiscalperiod),
                ..Default::default()
            },
        ),
        Commands::GetSalesReport {
            vendor,
            datetype,
            date,
        } => (
            "getSalesReport",
            ReportArgs {
                date_type: Some(datetype),
                ..vendor_date(vendor, date)
            },
        ),
        Commands::GetSubscriptionReport { vendor, date } => {
            ("getSubscriptionReport", vendor_date(vendor, date))
        }
        Commands::GetSubscriptionEventReport { vendor, date } => {
            ("getSubscriptionEventReport", vendor_date(vendor, date))
        }
        Commands::GetSubscriberReport { vendor, date } => {
            ("getSubscriberReport", vendor_date(vendor, date))
        }
        Commands::GetNewsstandReport {
            vendor,
            datetype,
            date,
        } => (
            "getNewsstandReport",
            ReportArgs {
                date_type: Some(datetype),
                ..vendor_date(vendor, date)
            },
        ),
        Commands::GetOptInReport { vendor, date } => ("getOptInReport", vendor_date(vendor, date)),
        Commands::GetSpecificSalesReport {
            reporttype,
            vendor,
            datetype,
            date,
            version,
        } => (
            "getSpecificSalesReport",
            ReportArgs {
                report_type: Some(reporttype),
                date_type: Some(datetype),
                version: Some(version),
                ..vendor_date(vendor, date)
            },
        ),
        Commands::GetSpecificDemographicsReport {
            reporttype,
            vendor,
            datetype,
            date,
            version,
        } => (
            "getSpecificDemographicsReport",
            ReportArgs {
                report_type: Some(reporttype),
                date_type: Some(datetype),
                version: Some(version),
                ..vendor_date(vendor, date)
            },
        ),
        Commands::Completions { .. } => return None,
    };

    Some(mapped)
}

pub async fn execute(name: &str, args: ReportArgs, options: QueryOptions) -> Result<Emitted> {
    execute_with(name, args, options, &KeychainResolver).await
}

pub async fn execute_with(
    name: &str,
    args: ReportArgs,
    options: QueryOptions,
    resolver: &dyn SecretResolver,
) -> Result<Emitted> {
    let config = Config::load(options.config.as_deref())?;
    let spec = report::lookup(name)
        .with_context(|| format!("Unknown command '{}'", name))?;

    let source = options.secret.ok_or(ReporterError::MissingArgument {
        command: name.to_string(),
        argument: "one of -t/-T/-p/-P",
    })?;

    let account = options.account.or(config.defaults.account);
    let request = ReportRequest::new(spec, args);
    report::validate(&request, account)?;

    // Looked up after validation so a bad argument never touches the keychain
    let secret = source.resolve(resolver)?;
    let credentials = CredentialSet::new(
        options.userid.or(config.defaults.userid),
        secret,
        account,
        options.mode.or(config.defaults.mode).unwrap_or_default(),
    );

    let command = request.build()?;
    tracing::debug!(%command, mode = %credentials.mode, "built report command");
    let body = encode_request(&credentials, &command).context("Failed to encode request")?;

    let client = Client::new(&config.http)?;
    let response = client
        .post(config.http.endpoint(command.service), body)
        .await?;
    tracing::debug!(
        status = response.status,
        content_type = %response.content_type,
        "service answered"
    );

    let unwrapped = unwrap_response(response, !command.password_protected)?;
    let stdout = io::stdout();
    let emitted = output::emit(unwrapped, &options.output_dir, &mut stdout.lock())?;
    Ok(emitted)
}
