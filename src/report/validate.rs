// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Argument checks that run before any request is built

use super::{slot_name, DateType, ReportRequest, Slot};
use crate::error::{ReporterError, Result};
use chrono::NaiveDate;

/// Check a request against the rules of its command
///
/// `account` is the account number that will be sent with the request.
/// Pure: the same input always gives the same answer.
pub fn validate(request: &ReportRequest, account: Option<u64>) -> Result<()> {
    let spec = request.spec;

    if spec.requires_account && account.unwrap_or(0) == 0 {
        return Err(ReporterError::MissingArgument {
            command: spec.name.to_string(),
            argument: "-a/--account",
        });
    }

    if request.service().is_none() {
        return Err(missing(request, "service"));
    }

    for &slot in spec.slots {
        if request.slot_value(slot).is_none() {
            return Err(missing(request, slot_name(slot)));
        }
    }

    if let Some(report_type) = &request.args.report_type {
        if !spec.report_types.is_empty() && !spec.report_types.contains(&report_type.as_str()) {
            return Err(ReporterError::InvalidFormat {
                field: "reporttype",
                message: format!(
                    "Report type '{}' is not available for command '{}'",
                    report_type, spec.name
                ),
            });
        }
    }

    if spec.slots.contains(&Slot::FiscalYear) {
        check_fiscal_year(request.args.fiscal_year.as_deref().unwrap_or_default())?;
    }

    if spec.slots.contains(&Slot::FiscalPeriod) {
        check_fiscal_period(request.args.fiscal_period.as_deref().unwrap_or_default())?;
    }

    if let Some(date_type) = request.periodicity() {
        if !spec.date_types.is_empty() && !spec.date_types.contains(&date_type) {
            return Err(ReporterError::InvalidFormat {
                field: "datetype",
                message: format!(
                    "Date type '{}' is not available for command '{}'",
                    date_type, spec.name
                ),
            });
        }
        if spec.slots.contains(&Slot::Date) {
            check_date(date_type, request.args.date.as_deref().unwrap_or_default())?;
        }
    }

    Ok(())
}

fn missing(request: &ReportRequest, argument: &'static str) -> ReporterError {
    ReporterError::MissingArgument {
        command: request.spec.name.to_string(),
        argument,
    }
}

fn check_fiscal_year(value: &str) -> Result<()> {
    if parse_date(value, DateType::Yearly).is_none() {
        return Err(ReporterError::InvalidFormat {
            field: "fiscalyear",
            message: "Fiscal year must be specified as YYYY".to_string(),
        });
    }
    Ok(())
}

fn check_fiscal_period(value: &str) -> Result<()> {
    match value.trim().parse::<u32>() {
        Ok(period) if (1..=12).contains(&period) => Ok(()),
        _ => Err(ReporterError::OutOfRange {
            field: "Fiscal period",
            value: value.to_string(),
            min: 1,
            max: 12,
        }),
    }
}

// Weekly dates name the Sunday that ends the week. Only the shape is
// checked; the weekday is left to the service.
fn check_date(date_type: DateType, value: &str) -> Result<()> {
    if parse_date(value, date_type).is_some() {
        return Ok(());
    }

    let message = match date_type {
        DateType::Daily => "Date must be specified as YYYYMMDD for daily reports",
        DateType::Weekly => {
            "Date must be specified as YYYYMMDD for weekly reports, where the day used is the Sunday that week ends"
        }
        DateType::Monthly => "Date must be specified as YYYYMM for monthly reports",
        DateType::Yearly => "Date must be specified as YYYY for yearly reports",
    };

    Err(ReporterError::InvalidFormat {
        field: "date",
        message: message.to_string(),
    })
}

/// Parse a compact date of the shape the periodicity asks for
///
/// Partial dates are anchored to the first day of their period.
fn parse_date(value: &str, date_type: DateType) -> Option<NaiveDate> {
    let width = match date_type {
        DateType::Daily | DateType::Weekly => 8,
        DateType::Monthly => 6,
        DateType::Yearly => 4,
    };
    if value.len() != width || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year: i32 = value[..4].parse().ok()?;
    if year == 0 {
        return None;
    }
    let month: u32 = if width >= 6 { value[4..6].parse().ok()? } else { 1 };
    let day: u32 = if width == 8 { value[6..8].parse().ok()? } else { 1 };

    NaiveDate::from_ymd_opt(year, month, day)
}
