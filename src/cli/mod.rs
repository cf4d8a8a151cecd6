// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI module - Command line interface definitions and handlers

pub mod completions;
pub mod query;

use crate::credentials::Mode;
use crate::report::{
    DateType, Service, SPECIFIC_DEMOGRAPHICS_REPORT_TYPES, SPECIFIC_SALES_REPORT_TYPES,
};
use clap::builder::PossibleValuesParser;
use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// reporter - download Sales and Financial reports from App Store Connect
#[derive(Parser, Debug)]
#[command(name = "reporter")]
#[command(author, version, about, long_about = None)]
#[command(
    after_help = "For a detailed description of report types, see http://help.apple.com/itc/appssalesandtrends/#/itc37a18bcbf"
)]
#[command(group(
    ArgGroup::new("secret")
        .args(["access_token_keychain_item", "access_token", "password_keychain_item", "password"])
        .multiple(false)
))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Account number (needed if your Apple ID has access to multiple accounts; list them with 'getAccounts')
    #[arg(short, long)]
    pub account: Option<u64>,

    /// Output format: plain text or XML [default: Normal]
    #[arg(short, long, value_enum)]
    pub mode: Option<Mode>,

    /// Apple ID used to sign in
    #[arg(short, long, env = "REPORTER_USERID")]
    pub userid: Option<String>,

    /// Name of the macOS Keychain item that holds the access token
    #[arg(short = 't', long)]
    pub access_token_keychain_item: Option<String>,

    /// Access token (generated in Sales and Trends, Reports, About Reports)
    #[arg(short = 'T', long)]
    pub access_token: Option<String>,

    /// DEPRECATED: name of the macOS Keychain item that holds the Apple ID password
    #[arg(short = 'p', long)]
    pub password_keychain_item: Option<String>,

    /// DEPRECATED: Apple ID password
    #[arg(short = 'P', long)]
    pub password: Option<String>,

    /// Directory report files are written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Configuration file (defaults to .reporter/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check if the reporting service is available for queries
    #[command(name = "getStatus")]
    GetStatus {
        /// Service endpoint to query
        #[arg(value_enum)]
        service: Service,
    },

    /// Fetch a list of accounts accessible to the Apple ID
    #[command(name = "getAccounts")]
    GetAccounts {
        /// Service endpoint to query
        #[arg(value_enum)]
        service: Service,
    },

    /// Fetch a list of vendors accessible to the Apple ID
    #[command(name = "getVendors")]
    GetVendors,

    /// Fetch a list of financial reports you can download by vendor number and region
    #[command(name = "getVendorsAndRegions")]
    GetVendorsAndRegions,

    /// Download a financial report file for a specific region and fiscal period
    #[command(name = "getFinancialReport")]
    GetFinancialReport {
        /// Vendor number of the report to download
        vendor: u64,
        /// Two-character code of the report's country (see 'getVendorsAndRegions')
        regioncode: String,
        /// Four-digit year in Apple's fiscal calendar
        fiscalyear: String,
        /// Period in the fiscal year (1-12)
        fiscalperiod: String,
    },

    /// Download a summary sales report file for a specific date range
    #[command(name = "getSalesReport")]
    GetSalesReport {
        /// Vendor number of the report to download
        vendor: u64,
        /// Length of time covered by the report
        #[arg(value_enum)]
        datetype: DateType,
        /// YYYYMMDD for daily and weekly (the Sunday the week ends), YYYYMM for monthly, YYYY for yearly
        date: String,
    },

    /// Download a subscription report file for a specific day
    #[command(name = "getSubscriptionReport")]
    GetSubscriptionReport {
        /// Vendor number of the report to download
        vendor: u64,
        /// Day covered by the report (YYYYMMDD)
        date: String,
    },

    /// Download an aggregated subscriber activity report file for a specific day
    #[command(name = "getSubscriptionEventReport")]
    GetSubscriptionEventReport {
        /// Vendor number of the report to download
        vendor: u64,
        /// Day covered by the report (YYYYMMDD)
        date: String,
    },

    /// Download a transaction-level subscriber activity report file for a specific day
    #[command(name = "getSubscriberReport")]
    GetSubscriberReport {
        /// Vendor number of the report to download
        vendor: u64,
        /// Day covered by the report (YYYYMMDD)
        date: String,
    },

    /// Download a magazines & newspapers report file for a specific date range
    #[command(name = "getNewsstandReport")]
    GetNewsstandReport {
        /// Vendor number of the report to download
        vendor: u64,
        /// Length of time covered by the report (Daily or Weekly)
        #[arg(value_enum)]
        datetype: DateType,
        /// YYYYMMDD; weekly reports use the Sunday the week ends
        date: String,
    },

    /// Download contact information of customers who opted in to share it
    #[command(name = "getOptInReport")]
    GetOptInReport {
        /// Vendor number of the report to download
        vendor: u64,
        /// Day covered by the report (YYYYMMDD)
        date: String,
    },

    /// Download a sales report file for a specific report type and date
    #[command(name = "getSpecificSalesReport")]
    GetSpecificSalesReport {
        /// Report type according to Apple's documentation
        #[arg(value_parser = PossibleValuesParser::new(SPECIFIC_SALES_REPORT_TYPES.iter().copied()))]
        reporttype: String,
        /// Vendor number of the report to download
        vendor: u64,
        /// Length of time covered by the report
        #[arg(value_enum)]
        datetype: DateType,
        /// YYYYMMDD for daily and weekly (the Sunday the week ends), YYYYMM for monthly, YYYY for yearly
        date: String,
        /// Report version formatted like '1_0' or '1_1'
        #[arg(default_value = "1_0")]
        version: String,
    },

    /// Download a demographics report file for a specific report type and date
    #[command(name = "getSpecificDemographicsReport")]
    GetSpecificDemographicsReport {
        /// Report type according to Apple's documentation
        #[arg(value_parser = PossibleValuesParser::new(SPECIFIC_DEMOGRAPHICS_REPORT_TYPES.iter().copied()))]
        reporttype: String,
        /// Vendor number of the report to download
        vendor: u64,
        /// Length of time covered by the report
        #[arg(value_enum)]
        datetype: DateType,
        /// YYYYMMDD for daily and weekly (the Sunday the week ends), YYYYMM for monthly, YYYY for yearly
        date: String,
        /// Report version formatted like '1_0' or '1_1'
        #[arg(default_value = "1_0")]
        version: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_financial_report() {
        let cli = Cli::try_parse_from([
            "reporter", "-T", "token", "-a", "42", "getFinancialReport", "12345", "US", "2023", "6",
        ])
        .unwrap();
        assert_eq!(cli.account, Some(42));
        assert_eq!(cli.access_token.as_deref(), Some("token"));
        assert!(matches!(
            cli.command,
            Commands::GetFinancialReport { vendor: 12345, ref regioncode, .. } if regioncode == "US"
        ));
    }

    #[test]
    fn test_secret_flags_are_exclusive() {
        let result = Cli::try_parse_from(["reporter", "-T", "token", "-P", "pw", "getVendors"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_specific_sales_defaults_version() {
        let cli = Cli::try_parse_from([
            "reporter", "-T", "t", "getSpecificSalesReport", "amStreams", "1", "Daily", "20240401",
        ])
        .unwrap();
        match cli.command {
            Commands::GetSpecificSalesReport { version, reporttype, .. } => {
                assert_eq!(version, "1_0");
                assert_eq!(reporttype, "amStreams");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_unknown_report_type_is_rejected() {
        let result = Cli::try_parse_from([
            "reporter", "-T", "t", "getSpecificSalesReport", "Bogus", "1", "Daily", "20240401",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_mode_accepts_robot_xml() {
        let cli = Cli::try_parse_from(["reporter", "-T", "t", "-m", "Robot.XML", "getStatus", "Sales"])
            .unwrap();
        assert_eq!(cli.mode, Some(Mode::RobotXml));
    }
}
