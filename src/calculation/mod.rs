//! Calculation logic for the payroll engine.
//!
//! This module contains the statutory calculations for one pay period: CPP
//! contributions in two tiers, EI premiums, WSIB premiums, vacation pay and
//! the income tax estimate. It also holds the earnings classification, the
//! year-to-date aggregation over payroll history, and the orchestrator that
//! composes them into a [`crate::models::PayrollCalculationResult`].
//!
//! Each statutory function takes a step number and returns its result with an
//! [`crate::models::AuditStep`] explaining the figures.

mod cpp;
mod earnings;
mod ei;
mod income_tax;
mod payroll;
mod rounding;
mod vacation;
mod wsib;
mod ytd;

pub use cpp::{CppContribution, CppInput, CppParameters, calculate_cpp};
pub use earnings::{ClassifiedEarnings, classify_earnings, resolve_line_amount, validate_line};
pub use ei::{EiParameters, EiPremium, calculate_ei};
pub use income_tax::{IncomeTaxEstimate, TaxCredits, estimate_income_tax};
pub use payroll::{PayrollEngine, PayrollInput, calculate_payroll};
pub use rounding::{format_currency, per_period, percent_of, periods_per_year, round2};
pub use vacation::{VacationResult, calculate_vacation};
pub use wsib::{WsibPremium, calculate_wsib};
pub use ytd::{SkippedRecord, YtdAggregate, calculate_earnings_ytd, calculate_employee_ytd};
