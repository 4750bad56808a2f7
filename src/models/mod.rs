//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod calculation_result;
mod earnings;
mod employee;
mod pay_period;
mod payroll_record;
mod ytd;

pub use calculation_result::{
    AuditStep, AuditTrace, AuditWarning, Deductions, EarningsTotals, EmployerContributions,
    PayrollCalculationResult, StatutoryBases, VacationSummary,
};
pub use earnings::{
    BANKED_HOURS_CODE, EarningsLine, EarningsLineResult, EarningsYtd, MAX_INPUT_VALUE,
    VACATION_PAYOUT_CODE, normalize_code,
};
pub use employee::{EmployeeMatch, EmployeeRef};
pub use pay_period::{PayFrequency, PayPeriodConfig, PayType, VacationMode};
pub use payroll_record::PayrollRecord;
pub use ytd::YtdState;
