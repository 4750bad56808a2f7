//! Year-to-date aggregation over payroll history.
//!
//! Year-to-date balances are never stored. They are rebuilt for each
//! calculation by replaying the employee's earlier results for the calendar
//! year in pay date order.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{
    EarningsYtd, EmployeeMatch, EmployeeRef, PayrollCalculationResult, PayrollRecord, YtdState,
    normalize_code,
};

/// A history record left out of the aggregate because it could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    /// Position of the record in the history passed in.
    pub index: usize,
    /// Why the record was skipped.
    pub reason: String,
}

/// Year-to-date balances rebuilt from history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YtdAggregate {
    /// Balances summed over every applied record.
    pub ytd: YtdState,
    /// Hours and amount per normalized earnings code.
    pub earnings: BTreeMap<String, EarningsYtd>,
    /// Number of records folded into the balances.
    pub records_applied: usize,
    /// Records for this employee and year that could not be used.
    pub skipped: Vec<SkippedRecord>,
}

/// Rebuilds an employee's year-to-date balances from payroll history.
///
/// Records are kept when they belong to the employee (see
/// [`EmployeeRef::match_record`]) and their pay date falls in `year`. They
/// are applied in ascending pay date order, so the result does not depend on
/// the order of `history`.
///
/// Records with an unreadable pay date or missing or malformed calculations
/// are skipped with a warning and listed in [`YtdAggregate::skipped`]; they
/// never cause an error.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::calculate_employee_ytd;
/// use payroll_engine::models::{EmployeeRef, PayrollRecord};
///
/// let history = vec![PayrollRecord {
///     employee_id: None,
///     employee_name: "Jane Doe".to_string(),
///     pay_date: "2025-01-10".to_string(),
///     calculations: None,
/// }];
///
/// let aggregate = calculate_employee_ytd(&EmployeeRef::by_name("Jane Doe"), &history, 2025);
/// assert_eq!(aggregate.records_applied, 0);
/// assert_eq!(aggregate.skipped.len(), 1);
/// ```
pub fn calculate_employee_ytd(
    employee: &EmployeeRef,
    history: &[PayrollRecord],
    year: i32,
) -> YtdAggregate {
    let mut skipped = Vec::new();
    let mut applicable = Vec::new();

    for (index, record) in history.iter().enumerate() {
        match employee.match_record(record.employee_id, &record.employee_name) {
            EmployeeMatch::NoMatch => continue,
            EmployeeMatch::ByLegacyName => {
                debug!(
                    index,
                    employee = %employee.name,
                    "History record matched by legacy name"
                );
            }
            EmployeeMatch::ById => {}
        }

        let Some(pay_date) = parse_pay_date(&record.pay_date) else {
            skip(
                &mut skipped,
                index,
                format!("unreadable pay date '{}'", record.pay_date),
            );
            continue;
        };
        if pay_date.year() != year {
            continue;
        }

        match read_calculations(record) {
            Ok(result) => applicable.push((pay_date, result)),
            Err(reason) => skip(&mut skipped, index, reason),
        }
    }

    // Stable, so records sharing a date keep their history order
    applicable.sort_by_key(|(pay_date, _)| *pay_date);

    let mut aggregate = YtdAggregate {
        records_applied: applicable.len(),
        skipped,
        ..YtdAggregate::default()
    };
    for (_, result) in &applicable {
        aggregate.ytd += result.this_period();
        for line in &result.earnings_lines {
            let entry = aggregate.earnings.entry(normalize_code(&line.code)).or_default();
            entry.hours += line.hours.unwrap_or_default();
            entry.amount += line.amount;
        }
    }

    aggregate
}

/// Rebuilds an employee's year-to-date hours and amount per earnings code.
///
/// Uses the same record selection as [`calculate_employee_ytd`].
pub fn calculate_earnings_ytd(
    employee: &EmployeeRef,
    history: &[PayrollRecord],
    year: i32,
) -> BTreeMap<String, EarningsYtd> {
    calculate_employee_ytd(employee, history, year).earnings
}

/// Parses a stored pay date, accepting a trailing time component.
fn parse_pay_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            raw.get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        })
}

fn read_calculations(record: &PayrollRecord) -> Result<PayrollCalculationResult, String> {
    let value = record
        .calculations
        .as_ref()
        .ok_or_else(|| "record has no calculations".to_string())?;
    PayrollCalculationResult::deserialize(value)
        .map_err(|e| format!("malformed calculations: {}", e))
}

fn skip(skipped: &mut Vec<SkippedRecord>, index: usize, reason: String) {
    warn!(index, reason = %reason, "Skipping payroll history record");
    skipped.push(SkippedRecord { index, reason });
}
