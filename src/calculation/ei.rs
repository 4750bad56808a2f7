//! Employment Insurance premium calculation.
//!
//! The employee premium applies to insurable earnings up to the annual
//! maximum. The employer pays a multiple of the rounded employee premium.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::rounding::{percent_of, round2};
use crate::config::StatutoryRateTable;
use crate::models::AuditStep;

/// Rates and ceiling for an EI calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EiParameters {
    /// Employee rate (percent).
    pub rate: Decimal,
    /// Employer premium as a multiple of the employee premium.
    pub employer_multiplier: Decimal,
    /// Maximum annual insurable earnings.
    pub max_insurable: Decimal,
}

impl EiParameters {
    /// Builds the parameters from a rate table.
    pub fn from_table(table: &StatutoryRateTable) -> Self {
        Self {
            rate: table.ei_rate,
            employer_multiplier: table.ei_employer_multiplier,
            max_insurable: table.ei_max_insurable,
        }
    }
}

/// The EI premium for one pay period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EiPremium {
    /// Employee premium.
    pub ei_employee: Decimal,
    /// Employer premium.
    pub ei_employer: Decimal,
    /// Insurable earnings the premium was charged on, after the annual cap.
    pub insurable: Decimal,
    /// Employee premiums including this period.
    pub new_ytd_ei: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the EI premium for a pay period.
///
/// Insurable earnings are limited to the room left under the annual maximum.
/// Once year-to-date insurable earnings reach the maximum both premiums are
/// zero.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{EiParameters, calculate_ei};
/// use payroll_engine::config::StatutoryRateTable;
/// use rust_decimal::Decimal;
///
/// let params = EiParameters::from_table(&StatutoryRateTable::canada_2025());
/// let result = calculate_ei(Decimal::new(2000, 0), Decimal::ZERO, Decimal::ZERO, &params, 1);
///
/// assert_eq!(result.ei_employee, Decimal::new(3280, 2));
/// assert_eq!(result.ei_employer, Decimal::new(4592, 2));
/// ```
pub fn calculate_ei(
    current_insurable: Decimal,
    ytd_insurable: Decimal,
    ytd_ei: Decimal,
    params: &EiParameters,
    step_number: u32,
) -> EiPremium {
    let room = (params.max_insurable - ytd_insurable).max(Decimal::ZERO);
    let insurable = round2(current_insurable.max(Decimal::ZERO).min(room));

    let ei_employee = round2(percent_of(insurable, params.rate));
    let ei_employer = round2(ei_employee * params.employer_multiplier);

    let reasoning = if room.is_zero() {
        format!(
            "Year-to-date insurable ${} has reached the maximum of ${}; no premium",
            round2(ytd_insurable),
            params.max_insurable.normalize()
        )
    } else {
        format!(
            "${} x {}% = ${}; employer ${} x {} = ${}",
            insurable,
            params.rate.normalize(),
            ei_employee,
            ei_employee,
            params.employer_multiplier.normalize(),
            ei_employer
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "ei_premium".to_string(),
        rule_name: "EI Premium".to_string(),
        input: serde_json::json!({
            "current_insurable": round2(current_insurable).to_string(),
            "ytd_insurable": round2(ytd_insurable).to_string(),
            "max_insurable": params.max_insurable.normalize().to_string(),
            "rate": params.rate.normalize().to_string()
        }),
        output: serde_json::json!({
            "insurable": insurable.to_string(),
            "ei_employee": ei_employee.to_string(),
            "ei_employer": ei_employer.to_string()
        }),
        reasoning,
    };

    EiPremium {
        ei_employee,
        ei_employer,
        insurable,
        new_ytd_ei: round2(ytd_ei + ei_employee),
        audit_step,
    }
}
