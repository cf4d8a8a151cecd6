// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Report commands and the service's command grammar
//!
//! Every supported command is a row in [`COMMANDS`]. A row names the
//! service it talks to, the positional slots of its command string and the
//! facts the validator needs (periodicity, allowed choices, whether an
//! account number is mandatory). Adding a report type means adding a row.

pub mod validate;

use crate::error::{ReporterError, Result};
use clap::ValueEnum;
use std::fmt;

pub use validate::validate;

/// Reporting service endpoint family
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    #[value(name = "Sales")]
    Sales,
    #[value(name = "Finance")]
    Finance,
}

impl Service {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sales => "Sales",
            Self::Finance => "Finance",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Length of time covered by a report
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateType {
    #[value(name = "Daily")]
    Daily,
    #[value(name = "Weekly")]
    Weekly,
    #[value(name = "Monthly")]
    Monthly,
    #[value(name = "Yearly")]
    Yearly,
}

impl DateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::Yearly => "Yearly",
        }
    }
}

impl fmt::Display for DateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One positional element of a command string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    ReportType,
    Vendor,
    Region,
    FiscalYear,
    FiscalPeriod,
    DateType,
    Date,
    Version,
    Literal(&'static str),
}

/// Where a command's date pattern comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Periodicity {
    None,
    Fixed(DateType),
    FromArgs,
}

/// Where a command's endpoint comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceChoice {
    Fixed(Service),
    FromArgs,
}

#[derive(Debug)]
pub struct CommandSpec {
    pub name: &'static str,
    pub service: ServiceChoice,
    pub verb: &'static str,
    pub slots: &'static [Slot],
    pub periodicity: Periodicity,
    /// Empty means any date type is accepted
    pub date_types: &'static [DateType],
    /// Empty means the command takes no report type
    pub report_types: &'static [&'static str],
    pub requires_account: bool,
    /// The file is encrypted and must be handed over still compressed
    pub password_protected: bool,
}

pub const SPECIFIC_SALES_REPORT_TYPES: &[&str] = &[
    "Sales", "PreOrder", "Cloud", "Event", "Customer", "Content", "Station", "Control",
    "amEvent", "amContent", "amControl", "amStreams",
];

pub const SPECIFIC_DEMOGRAPHICS_REPORT_TYPES: &[&str] = &[
    "amContentDemographics",
    "amArtistDemographics",
    "ContentDemographics",
    "ArtistDemographics",
];

const ALL_DATE_TYPES: &[DateType] = &[];
const DAILY_OR_WEEKLY: &[DateType] = &[DateType::Daily, DateType::Weekly];

const fn listing(
    name: &'static str,
    service: ServiceChoice,
    verb: &'static str,
    requires_account: bool,
) -> CommandSpec {
    CommandSpec {
        name,
        service,
        verb,
        slots: &[],
        periodicity: Periodicity::None,
        date_types: ALL_DATE_TYPES,
        report_types: &[],
        requires_account,
        password_protected: false,
    }
}

const fn sales_report(
    name: &'static str,
    slots: &'static [Slot],
    periodicity: Periodicity,
) -> CommandSpec {
    CommandSpec {
        name,
        service: ServiceChoice::Fixed(Service::Sales),
        verb: "getReport",
        slots,
        periodicity,
        date_types: ALL_DATE_TYPES,
        report_types: &[],
        requires_account: false,
        password_protected: false,
    }
}

pub static COMMANDS: &[CommandSpec] = &[
    listing("getStatus", ServiceChoice::FromArgs, "getStatus", false),
    listing("getAccounts", ServiceChoice::FromArgs, "getAccounts", false),
    listing("getVendors", ServiceChoice::Fixed(Service::Sales), "getVendors", true),
    listing(
        "getVendorsAndRegions",
        ServiceChoice::Fixed(Service::Finance),
        "getVendorsAndRegions",
        true,
    ),
    CommandSpec {
        name: "getFinancialReport",
        service: ServiceChoice::Fixed(Service::Finance),
        verb: "getReport",
        slots: &[
            Slot::Vendor,
            Slot::Region,
            Slot::Literal("Financial"),
            Slot::FiscalYear,
            Slot::FiscalPeriod,
        ],
        periodicity: Periodicity::None,
        date_types: ALL_DATE_TYPES,
        report_types: &[],
        requires_account: true,
        password_protected: false,
    },
    sales_report(
        "getSalesReport",
        &[
            Slot::Vendor,
            Slot::Literal("Sales"),
            Slot::Literal("Summary"),
            Slot::DateType,
            Slot::Date,
        ],
        Periodicity::FromArgs,
    ),
    sales_report(
        "getSubscriptionReport",
        &[
            Slot::Vendor,
            Slot::Literal("Subscription"),
            Slot::Literal("Summary"),
            Slot::Literal("Daily"),
            Slot::Date,
        ],
        Periodicity::Fixed(DateType::Daily),
    ),
    sales_report(
        "getSubscriptionEventReport",
        &[
            Slot::Vendor,
            Slot::Literal("SubscriptionEvent"),
            Slot::Literal("Summary"),
            Slot::Literal("Daily"),
            Slot::Date,
        ],
        Periodicity::Fixed(DateType::Daily),
    ),
    sales_report(
        "getSubscriberReport",
        &[
            Slot::Vendor,
            Slot::Literal("Subscriber"),
            Slot::Literal("Detailed"),
            Slot::Literal("Daily"),
            Slot::Date,
        ],
        Periodicity::Fixed(DateType::Daily),
    ),
    CommandSpec {
        date_types: DAILY_OR_WEEKLY,
        ..sales_report(
            "getNewsstandReport",
            &[
                Slot::Vendor,
                Slot::Literal("Newsstand"),
                Slot::Literal("Detailed"),
                Slot::DateType,
                Slot::Date,
            ],
            Periodicity::FromArgs,
        )
    },
    CommandSpec {
        password_protected: true,
        ..sales_report(
            "getOptInReport",
            &[
                Slot::Vendor,
                Slot::Literal("Sales"),
                Slot::Literal("Opt-In"),
                Slot::Literal("Weekly"),
                Slot::Date,
            ],
            Periodicity::Fixed(DateType::Weekly),
        )
    },
    CommandSpec {
        report_types: SPECIFIC_SALES_REPORT_TYPES,
        ..sales_report(
            "getSpecificSalesReport",
            &[
                Slot::Vendor,
                Slot::ReportType,
                Slot::Literal("Detailed"),
                Slot::DateType,
                Slot::Date,
                Slot::Version,
            ],
            Periodicity::FromArgs,
        )
    },
    CommandSpec {
        report_types: SPECIFIC_DEMOGRAPHICS_REPORT_TYPES,
        ..sales_report(
            "getSpecificDemographicsReport",
            &[
                Slot::Vendor,
                Slot::ReportType,
                Slot::Literal("Summary"),
                Slot::DateType,
                Slot::Date,
                Slot::Version,
            ],
            Periodicity::FromArgs,
        )
    },
];

/// Find a command by its user-facing name
pub fn lookup(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| spec.name == name)
}

/// Already-parsed arguments of a single command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportArgs {
    pub service: Option<Service>,
    pub vendor: Option<u64>,
    pub region: Option<String>,
    pub fiscal_year: Option<String>,
    pub fiscal_period: Option<String>,
    pub date_type: Option<DateType>,
    pub date: Option<String>,
    pub report_type: Option<String>,
    pub version: Option<String>,
}

/// A command from the table paired with the arguments it was invoked with
#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub spec: &'static CommandSpec,
    pub args: ReportArgs,
}

impl ReportRequest {
    pub fn new(spec: &'static CommandSpec, args: ReportArgs) -> Self {
        Self { spec, args }
    }

    pub fn service(&self) -> Option<Service> {
        match self.spec.service {
            ServiceChoice::Fixed(service) => Some(service),
            ServiceChoice::FromArgs => self.args.service,
        }
    }

    /// Periodicity that decides the date pattern, if the command has one
    pub fn periodicity(&self) -> Option<DateType> {
        match self.spec.periodicity {
            Periodicity::None => None,
            Periodicity::Fixed(date_type) => Some(date_type),
            Periodicity::FromArgs => self.args.date_type,
        }
    }

    pub(crate) fn slot_value(&self, slot: Slot) -> Option<String> {
        let args = &self.args;
        match slot {
            Slot::ReportType => args.report_type.clone(),
            Slot::Vendor => args.vendor.map(|v| v.to_string()),
            Slot::Region => args.region.clone(),
            Slot::FiscalYear => args.fiscal_year.clone(),
            Slot::FiscalPeriod => args.fiscal_period.clone(),
            Slot::DateType => args.date_type.map(|d| d.as_str().to_string()),
            Slot::Date => args.date.clone(),
            Slot::Version => args.version.clone(),
            Slot::Literal(text) => Some(text.to_string()),
        }
    }

    fn missing(&self, argument: &'static str) -> ReporterError {
        ReporterError::MissingArgument {
            command: self.spec.name.to_string(),
            argument,
        }
    }

    /// Translate into the command understood by the service
    ///
    /// Only fails when a slot has no value, which [`validate`] rules out.
    pub fn build(&self) -> Result<ReportCommand> {
        let service = self.service().ok_or_else(|| self.missing("service"))?;
        let parameters = self
            .spec
            .slots
            .iter()
            .map(|&slot| self.slot_value(slot).ok_or_else(|| self.missing(slot_name(slot))))
            .collect::<Result<Vec<_>>>()?;

        Ok(ReportCommand {
            service,
            verb: self.spec.verb,
            parameters,
            password_protected: self.spec.password_protected,
        })
    }
}

pub(crate) fn slot_name(slot: Slot) -> &'static str {
    match slot {
        Slot::ReportType => "reporttype",
        Slot::Vendor => "vendor",
        Slot::Region => "regioncode",
        Slot::FiscalYear => "fiscalyear",
        Slot::FiscalPeriod => "fiscalperiod",
        Slot::DateType => "datetype",
        Slot::Date => "date",
        Slot::Version => "version",
        Slot::Literal(_) => "literal",
    }
}

/// One logical query, ready to be encoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportCommand {
    pub service: Service,
    pub verb: &'static str,
    pub parameters: Vec<String>,
    pub password_protected: bool,
}

impl fmt::Display for ReportCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.service, self.verb)?;
        if !self.parameters.is_empty() {
            write!(f, ", {}", self.parameters.join(","))?;
        }
        Ok(())
    }
}
