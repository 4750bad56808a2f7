//! Calculation result models for the payroll engine.
//!
//! This module contains the [`PayrollCalculationResult`] type and the
//! structures that make it up: totals, deductions, employer contributions,
//! capped statutory bases, the vacation summary and the audit trace.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{EarningsLineResult, EmployeeRef, PayPeriodConfig, VacationMode, YtdState};
use crate::config::StatutoryRateTable;

/// Earnings subtotals for the period, after vacation pay has been applied.
///
/// # Example
///
/// ```
/// use payroll_engine::models::EarningsTotals;
/// use rust_decimal::Decimal;
///
/// let totals = EarningsTotals {
///     gross_pay: Decimal::new(200000, 2),
///     pensionable_earnings: Decimal::new(200000, 2),
///     insurable_earnings: Decimal::new(200000, 2),
///     wsib_assessable_earnings: Decimal::new(200000, 2),
///     vacation_base: Decimal::new(200000, 2),
/// };
/// assert_eq!(totals.gross_pay.to_string(), "2000.00");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarningsTotals {
    /// Gross pay.
    pub gross_pay: Decimal,
    /// Earnings subject to CPP.
    pub pensionable_earnings: Decimal,
    /// Earnings subject to EI.
    pub insurable_earnings: Decimal,
    /// Earnings subject to WSIB.
    pub wsib_assessable_earnings: Decimal,
    /// Earnings vacation pay is calculated on.
    pub vacation_base: Decimal,
}

/// Amounts withheld from the employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deductions {
    /// Income tax withheld.
    pub income_tax: Decimal,
    /// CPP tier-1 employee contribution.
    pub cpp1_employee: Decimal,
    /// CPP tier-2 employee contribution.
    pub cpp2_employee: Decimal,
    /// EI employee premium.
    pub ei_employee: Decimal,
    /// Sum of the above.
    pub total: Decimal,
}

/// Amounts paid by the employer on top of gross pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerContributions {
    /// CPP tier-1 employer contribution.
    pub cpp1_employer: Decimal,
    /// CPP tier-2 employer contribution.
    pub cpp2_employer: Decimal,
    /// EI employer premium.
    pub ei_employer: Decimal,
    /// WSIB premium.
    pub wsib_premium: Decimal,
    /// Sum of the above.
    pub total: Decimal,
}

/// The portions of this period's earnings each statutory program applied to,
/// after annual ceilings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatutoryBases {
    /// Pensionable earnings under the YMPE.
    pub pensionable_tier1: Decimal,
    /// Pensionable earnings between the YMPE and the YAMPE.
    pub pensionable_tier2: Decimal,
    /// Basic exemption for this period.
    pub cpp_exemption: Decimal,
    /// Insurable earnings under the annual maximum.
    pub insurable: Decimal,
    /// Assessable earnings under the WSIB maximum.
    pub wsib_assessable: Decimal,
}

/// Vacation pay handled in this period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacationSummary {
    /// Accrue or pay.
    pub mode: VacationMode,
    /// Vacation rate as a percentage.
    pub rate: Decimal,
    /// Liability accrued this period.
    pub accrued: Decimal,
    /// Vacation paid this period, including VAC earnings lines.
    pub paid: Decimal,
    /// Amount the vacation calculation added to gross.
    pub added_to_gross: Decimal,
}

/// A single step in the audit trace recording a calculation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// Machine-readable identifier of the rule applied.
    pub rule_id: String,
    /// Human-readable rule name.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A condition worth surfacing that did not stop the calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level ("low", "medium", "high").
    pub severity: String,
}

/// Every step and warning produced by one calculation, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

/// The complete result of a payroll calculation.
///
/// Produced once by the orchestrator and never modified. Display, export and
/// persistence layers consume it; it re-enters the engine only as history
/// for a later YTD aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollCalculationResult {
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The employee the calculation is for.
    pub employee: EmployeeRef,
    /// The pay date; its calendar year selects the YTD window.
    pub pay_date: NaiveDate,
    /// The pay period configuration used.
    pub pay_period: PayPeriodConfig,
    /// Earnings lines with updated year-to-date figures.
    pub earnings_lines: Vec<EarningsLineResult>,
    /// Earnings subtotals.
    pub totals: EarningsTotals,
    /// Employee deductions.
    pub deductions: Deductions,
    /// Employer contributions.
    pub employer_contributions: EmployerContributions,
    /// Earnings each statutory program applied to.
    pub statutory_bases: StatutoryBases,
    /// Vacation handling.
    pub vacation: VacationSummary,
    /// Gross pay less deductions.
    pub net_pay: Decimal,
    /// Year-to-date balances before this period.
    pub ytd_before: YtdState,
    /// Year-to-date balances including this period.
    pub ytd_after: YtdState,
    /// The rate table the calculation used.
    pub rates: StatutoryRateTable,
    /// Audit trace of calculation decisions.
    #[serde(default)]
    pub audit_trace: AuditTrace,
}

impl PayrollCalculationResult {
    /// Returns this period's contribution to every year-to-date balance.
    ///
    /// `ytd_after == ytd_before + this_period()` holds for every result the
    /// engine produces.
    pub fn this_period(&self) -> YtdState {
        YtdState {
            gross: self.totals.gross_pay,
            pensionable: self.totals.pensionable_earnings,
            insurable: self.totals.insurable_earnings,
            wsib_assessable: self.totals.wsib_assessable_earnings,
            wsib_premium: self.employer_contributions.wsib_premium,
            cpp1: self.deductions.cpp1_employee,
            cpp2: self.deductions.cpp2_employee,
            ei: self.deductions.ei_employee,
            income_tax: self.deductions.income_tax,
            vacation_accrued: self.vacation.accrued,
            vacation_paid: self.vacation.paid,
        }
    }
}
