//! Payroll orchestration.
//!
//! [`calculate_payroll`] runs one pay period end to end:
//!
//! 1. Apply rate overrides and validate the rate table, pay period and lines.
//! 2. Rebuild year-to-date balances and per-code totals from history.
//! 3. Classify earnings into gross, pensionable, insurable, assessable and
//!    vacation-base subtotals.
//! 4. Calculate vacation pay and add any payout to every subtotal.
//! 5. Calculate CPP, EI and WSIB against the pre-period balances.
//! 6. Estimate income tax on gross.
//! 7. Assemble the result with net pay and updated balances.
//!
//! Every step is a pure function of its inputs, so the same input always
//! produces the same result.

use std::time::Instant;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::cpp::{CppInput, CppParameters, calculate_cpp};
use super::earnings::classify_earnings;
use super::ei::{EiParameters, calculate_ei};
use super::income_tax::{TaxCredits, estimate_income_tax};
use super::rounding::{per_period, round2};
use super::vacation::calculate_vacation;
use super::wsib::calculate_wsib;
use super::ytd::calculate_employee_ytd;
use crate::config::{RateOverrides, StatutoryRateTable};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, Deductions, EarningsLine, EarningsTotals,
    EmployeeRef, EmployerContributions, PayPeriodConfig, PayrollCalculationResult, PayrollRecord,
    StatutoryBases, VacationSummary, YtdState,
};

/// Everything needed to calculate one pay period.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::PayrollInput;
///
/// let input: PayrollInput = serde_json::from_value(serde_json::json!({
///     "employee": { "name": "Jane Doe" },
///     "pay_date": "2025-01-10",
///     "pay_period": {
///         "frequency": "biweekly",
///         "pay_type": "hourly",
///         "vacation_mode": "accrue",
///         "vacation_rate": "4"
///     },
///     "earnings_lines": [
///         { "code": "REG", "rate": "25.00", "hours": "80" }
///     ]
/// }))
/// .unwrap();
///
/// assert!(input.history.is_empty());
/// assert!(input.prior_ytd.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollInput {
    /// The employee being paid.
    pub employee: EmployeeRef,
    /// The pay date. Its calendar year selects the year-to-date window.
    pub pay_date: NaiveDate,
    /// Pay period configuration.
    pub pay_period: PayPeriodConfig,
    /// This period's earnings.
    pub earnings_lines: Vec<EarningsLine>,
    /// Earlier payroll records, in any order and for any employee.
    #[serde(default)]
    pub history: Vec<PayrollRecord>,
    /// Year-to-date balances to use instead of replaying history.
    #[serde(default)]
    pub prior_ytd: Option<YtdState>,
    /// Per-employer replacements for rate table entries.
    #[serde(default)]
    pub rate_overrides: RateOverrides,
}

/// Calculates payroll for one employee and pay period.
///
/// Pre-period balances come from `input.prior_ytd` when it is set, and
/// otherwise from replaying `input.history` for the pay date's year. Per-code
/// earnings totals always come from history. History records that cannot be
/// read become audit warnings.
///
/// # Errors
///
/// Returns an error if the rate table (after overrides), the pay period
/// configuration, the caller-supplied year-to-date balances or any earnings
/// line is invalid.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use payroll_engine::calculation::{PayrollInput, calculate_payroll};
/// use payroll_engine::config::{RateOverrides, StatutoryRateTable};
/// use payroll_engine::models::{
///     EarningsLine, EmployeeRef, PayFrequency, PayPeriodConfig, PayType, VacationMode,
/// };
/// use rust_decimal::Decimal;
///
/// let input = PayrollInput {
///     employee: EmployeeRef::by_name("Jane Doe"),
///     pay_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
///     pay_period: PayPeriodConfig {
///         frequency: PayFrequency::Biweekly,
///         pay_type: PayType::Hourly,
///         vacation_mode: VacationMode::Accrue,
///         vacation_rate: Decimal::new(4, 0),
///         federal_basic_personal_amount: None,
///         provincial_basic_personal_amount: None,
///         vacation_pay_override: None,
///     },
///     earnings_lines: vec![EarningsLine::hourly(
///         "REG",
///         "Regular",
///         Decimal::new(25, 0),
///         Decimal::new(80, 0),
///     )],
///     history: vec![],
///     prior_ytd: None,
///     rate_overrides: RateOverrides::default(),
/// };
///
/// let result = calculate_payroll(&input, &StatutoryRateTable::canada_2025()).unwrap();
/// assert_eq!(result.totals.gross_pay.to_string(), "2000.00");
/// assert_eq!(result.net_pay.to_string(), "1579.92");
/// ```
pub fn calculate_payroll(
    input: &PayrollInput,
    rates: &StatutoryRateTable,
) -> EngineResult<PayrollCalculationResult> {
    let start_time = Instant::now();

    let rates = rates.with_overrides(&input.rate_overrides);
    rates.validate()?;
    input.pay_period.validate()?;
    if let Some(prior) = &input.prior_ytd {
        prior.validate()?;
    }

    let pay_period = &input.pay_period;
    let frequency = pay_period.frequency;
    let year = input.pay_date.year();

    let mut steps: Vec<AuditStep> = Vec::new();
    let mut warnings: Vec<AuditWarning> = Vec::new();
    let mut step_number: u32 = 1;

    if rates.tax_year != year {
        warn!(
            employee = %input.employee.name,
            tax_year = rates.tax_year,
            pay_year = year,
            "Rate table year differs from pay date year"
        );
        warnings.push(AuditWarning {
            code: "RATE_TABLE_YEAR_MISMATCH".to_string(),
            message: format!(
                "Rate table for {} used for a pay date in {}",
                rates.tax_year, year
            ),
            severity: "medium".to_string(),
        });
    }

    // Year-to-date balances before this period
    let aggregate = calculate_employee_ytd(&input.employee, &input.history, year);
    for skipped in &aggregate.skipped {
        warnings.push(AuditWarning {
            code: "HISTORY_RECORD_SKIPPED".to_string(),
            message: format!("History record {} skipped: {}", skipped.index, skipped.reason),
            severity: "medium".to_string(),
        });
    }
    let ytd_before = match input.prior_ytd {
        Some(prior) => {
            debug!(employee = %input.employee.name, "Using caller-supplied year-to-date balances");
            prior
        }
        None => aggregate.ytd,
    };

    // Earnings classification
    let classified = classify_earnings(&input.earnings_lines, &aggregate.earnings, step_number)?;
    record_step(&mut steps, classified.audit_step.clone());
    step_number += 1;

    // Vacation pay, then fold any payout into every subtotal
    let vacation = calculate_vacation(
        classified.totals.vacation_base,
        pay_period.vacation_rate,
        pay_period.vacation_mode,
        pay_period.vacation_pay_override,
        step_number,
    );
    record_step(&mut steps, vacation.audit_step.clone());
    step_number += 1;

    let added = vacation.amount_added_to_gross;
    let totals = EarningsTotals {
        gross_pay: round2(classified.totals.gross_pay + added),
        pensionable_earnings: round2(classified.totals.pensionable_earnings + added),
        insurable_earnings: round2(classified.totals.insurable_earnings + added),
        wsib_assessable_earnings: round2(classified.totals.wsib_assessable_earnings + added),
        vacation_base: classified.totals.vacation_base,
    };

    // CPP
    let cpp_params = CppParameters::from_table(&rates, frequency);
    let cpp = calculate_cpp(
        &CppInput {
            current_pensionable: totals.pensionable_earnings,
            ytd_pensionable: ytd_before.pensionable,
            ytd_cpp1: ytd_before.cpp1,
            ytd_cpp2: ytd_before.cpp2,
        },
        &cpp_params,
        step_number,
    );
    record_step(&mut steps, cpp.audit_step.clone());
    step_number += 1;

    // EI
    let ei = calculate_ei(
        totals.insurable_earnings,
        ytd_before.insurable,
        ytd_before.ei,
        &EiParameters::from_table(&rates),
        step_number,
    );
    record_step(&mut steps, ei.audit_step.clone());
    step_number += 1;

    // WSIB
    let wsib = calculate_wsib(
        totals.wsib_assessable_earnings,
        ytd_before.wsib_assessable,
        ytd_before.wsib_premium,
        rates.wsib_rate,
        rates.wsib_max_assessable,
        step_number,
    );
    record_step(&mut steps, wsib.audit_step.clone());
    step_number += 1;

    // Income tax
    let tax = estimate_income_tax(
        totals.gross_pay,
        frequency,
        &TaxCredits::resolve(&rates, pay_period),
        step_number,
    );
    record_step(&mut steps, tax.audit_step.clone());
    step_number += 1;

    let deductions = Deductions {
        income_tax: tax.tax,
        cpp1_employee: cpp.cpp1_employee,
        cpp2_employee: cpp.cpp2_employee,
        ei_employee: ei.ei_employee,
        total: round2(tax.tax + cpp.cpp1_employee + cpp.cpp2_employee + ei.ei_employee),
    };
    let employer_contributions = EmployerContributions {
        cpp1_employer: cpp.cpp1_employer,
        cpp2_employer: cpp.cpp2_employer,
        ei_employer: ei.ei_employer,
        wsib_premium: wsib.premium,
        total: round2(cpp.cpp1_employer + cpp.cpp2_employer + ei.ei_employer + wsib.premium),
    };
    let net_pay = round2(totals.gross_pay - deductions.total);

    record_step(
        &mut steps,
        AuditStep {
            step_number,
            rule_id: "net_pay".to_string(),
            rule_name: "Net Pay".to_string(),
            input: serde_json::json!({
                "gross_pay": totals.gross_pay.to_string(),
                "deductions": deductions.total.to_string()
            }),
            output: serde_json::json!({
                "net_pay": net_pay.to_string()
            }),
            reasoning: format!(
                "${} - (${} tax + ${} CPP + ${} CPP2 + ${} EI) = ${}",
                totals.gross_pay,
                deductions.income_tax,
                deductions.cpp1_employee,
                deductions.cpp2_employee,
                deductions.ei_employee,
                net_pay
            ),
        },
    );

    let vacation_summary = VacationSummary {
        mode: pay_period.vacation_mode,
        rate: pay_period.vacation_rate,
        accrued: vacation.vacation_accrued,
        paid: round2(vacation.vacation_paid + classified.vacation_payout),
        added_to_gross: vacation.amount_added_to_gross,
    };

    let mut result = PayrollCalculationResult {
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        employee: input.employee.clone(),
        pay_date: input.pay_date,
        pay_period: pay_period.clone(),
        earnings_lines: classified.lines,
        totals,
        deductions,
        employer_contributions,
        statutory_bases: StatutoryBases {
            pensionable_tier1: cpp.pensionable_tier1,
            pensionable_tier2: cpp.pensionable_tier2,
            cpp_exemption: round2(per_period(rates.cpp_basic_exemption, frequency)),
            insurable: ei.insurable,
            wsib_assessable: wsib.assessable,
        },
        vacation: vacation_summary,
        net_pay,
        ytd_before,
        ytd_after: ytd_before,
        rates,
        audit_trace: AuditTrace { steps, warnings },
    };
    result.ytd_after = ytd_before + result.this_period();

    info!(
        employee = %result.employee.name,
        pay_date = %result.pay_date,
        records_applied = aggregate.records_applied,
        gross_pay = %result.totals.gross_pay,
        net_pay = %result.net_pay,
        duration_us = start_time.elapsed().as_micros(),
        "Payroll calculation completed"
    );

    Ok(result)
}

fn record_step(steps: &mut Vec<AuditStep>, step: AuditStep) {
    debug!(
        step = step.step_number,
        rule_id = %step.rule_id,
        reasoning = %step.reasoning,
        "Calculation step"
    );
    steps.push(step);
}

/// A payroll calculator bound to one validated rate table.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::PayrollEngine;
///
/// let engine = PayrollEngine::for_year(2025).unwrap();
/// assert_eq!(engine.rates().tax_year, 2025);
/// assert!(PayrollEngine::for_year(1999).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct PayrollEngine {
    rates: StatutoryRateTable,
}

impl PayrollEngine {
    /// Creates an engine after validating the rate table.
    pub fn new(rates: StatutoryRateTable) -> EngineResult<Self> {
        rates.validate()?;
        Ok(Self { rates })
    }

    /// Creates an engine with the built-in table for a tax year.
    pub fn for_year(year: i32) -> EngineResult<Self> {
        let rates = StatutoryRateTable::builtin(year)
            .ok_or(EngineError::RateTableNotFound { year })?;
        Self::new(rates)
    }

    /// The engine's rate table.
    pub fn rates(&self) -> &StatutoryRateTable {
        &self.rates
    }

    /// Calculates one pay period. See [`calculate_payroll`].
    pub fn calculate(&self, input: &PayrollInput) -> EngineResult<PayrollCalculationResult> {
        calculate_payroll(input, &self.rates)
    }
}
