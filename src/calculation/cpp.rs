//! Canada Pension Plan contribution calculation.
//!
//! This module calculates the two-tier CPP contribution for one pay period.
//!
//! ## Tier Structure
//!
//! - **Tier 1 (CPP):** pensionable earnings up to the YMPE, less the
//!   per-period share of the basic exemption, at the base rate.
//! - **Tier 2 (CPP2):** pensionable earnings between the YMPE and the YAMPE
//!   at the CPP2 rate. The basic exemption never applies to tier 2.
//!
//! Employers match the employee contribution in both tiers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::rounding::{per_period, percent_of, round2};
use crate::config::StatutoryRateTable;
use crate::models::{AuditStep, PayFrequency};

/// Earnings and year-to-date figures for one CPP calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CppInput {
    /// Pensionable earnings this period.
    pub current_pensionable: Decimal,
    /// Pensionable earnings earlier in the year.
    pub ytd_pensionable: Decimal,
    /// Tier-1 employee contributions earlier in the year.
    pub ytd_cpp1: Decimal,
    /// Tier-2 employee contributions earlier in the year.
    pub ytd_cpp2: Decimal,
}

/// Rates and ceilings for a CPP calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CppParameters {
    /// Tier-1 rate (percent).
    pub rate1: Decimal,
    /// Tier-2 rate (percent).
    pub rate2: Decimal,
    /// Basic exemption for one pay period.
    pub per_period_exemption: Decimal,
    /// Annual basic exemption, used for the annual tier-1 maximum.
    pub annual_exemption: Decimal,
    /// Tier-1 ceiling.
    pub ympe: Decimal,
    /// Tier-2 ceiling.
    pub yampe: Decimal,
}

impl CppParameters {
    /// Builds the parameters for a rate table and pay frequency.
    pub fn from_table(table: &StatutoryRateTable, frequency: PayFrequency) -> Self {
        Self {
            rate1: table.cpp_rate,
            rate2: table.cpp2_rate,
            per_period_exemption: per_period(table.cpp_basic_exemption, frequency),
            annual_exemption: table.cpp_basic_exemption,
            ympe: table.ympe,
            yampe: table.yampe,
        }
    }

    /// The largest tier-1 employee contribution allowed in a year.
    pub fn max_annual_cpp1(&self) -> Decimal {
        round2(percent_of(
            (self.ympe - self.annual_exemption).max(Decimal::ZERO),
            self.rate1,
        ))
    }

    /// The largest tier-2 employee contribution allowed in a year.
    pub fn max_annual_cpp2(&self) -> Decimal {
        round2(percent_of(
            (self.yampe - self.ympe).max(Decimal::ZERO),
            self.rate2,
        ))
    }
}

/// The CPP contribution for one pay period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CppContribution {
    /// Tier-1 employee contribution.
    pub cpp1_employee: Decimal,
    /// Tier-1 employer contribution (equal to the employee's).
    pub cpp1_employer: Decimal,
    /// Tier-2 employee contribution.
    pub cpp2_employee: Decimal,
    /// Tier-2 employer contribution (equal to the employee's).
    pub cpp2_employer: Decimal,
    /// Pensionable earnings counted under tier 1.
    pub pensionable_tier1: Decimal,
    /// Pensionable earnings counted under tier 2.
    pub pensionable_tier2: Decimal,
    /// Tier-1 contributions including this period.
    pub new_ytd_cpp1: Decimal,
    /// Tier-2 contributions including this period.
    pub new_ytd_cpp2: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the CPP contribution for a pay period.
///
/// # Algorithm
///
/// 1. Tier-1 pensionable is the current earnings, limited to the room left
///    under the YMPE.
/// 2. The per-period exemption is subtracted from tier-1 pensionable only;
///    nothing is owed on tier 1 when the exemption covers it.
/// 3. Earnings beyond the YMPE fall into tier 2, limited to the room left
///    under the YAMPE. Tier 2 does not exist when the YAMPE is not above the
///    YMPE.
/// 4. Each tier is rounded to cents separately and limited to what remains of
///    its annual maximum.
///
/// Negative earnings and exhausted ceilings produce zero contributions.
///
/// # Examples
///
/// Earnings crossing the YMPE within the period:
///
/// ```
/// use payroll_engine::calculation::{CppInput, CppParameters, calculate_cpp};
/// use payroll_engine::config::StatutoryRateTable;
/// use payroll_engine::models::PayFrequency;
/// use rust_decimal::Decimal;
///
/// let table = StatutoryRateTable::canada_2025();
/// let params = CppParameters::from_table(&table, PayFrequency::Biweekly);
/// let input = CppInput {
///     current_pensionable: Decimal::new(2000, 0),
///     ytd_pensionable: Decimal::new(70500, 0),
///     ytd_cpp1: Decimal::ZERO,
///     ytd_cpp2: Decimal::ZERO,
/// };
///
/// let result = calculate_cpp(&input, &params, 1);
/// assert_eq!(result.pensionable_tier1, Decimal::new(80000, 2));
/// assert_eq!(result.pensionable_tier2, Decimal::new(120000, 2));
/// assert_eq!(result.cpp2_employee, Decimal::new(4800, 2));
/// ```
pub fn calculate_cpp(
    input: &CppInput,
    params: &CppParameters,
    step_number: u32,
) -> CppContribution {
    let current = input.current_pensionable.max(Decimal::ZERO);

    // Tier 1: room under the YMPE, exemption applied here only
    let tier1_room = (params.ympe - input.ytd_pensionable).max(Decimal::ZERO);
    let tier1 = current.min(tier1_room);
    let contributory = (tier1 - params.per_period_exemption).max(Decimal::ZERO);
    let cpp1_calculated = round2(percent_of(contributory, params.rate1));
    let cpp1_remaining = (params.max_annual_cpp1() - input.ytd_cpp1).max(Decimal::ZERO);
    let cpp1 = cpp1_calculated.min(cpp1_remaining);

    // Tier 2: whatever is left, up to the YAMPE
    let tier2 = if params.yampe > params.ympe {
        let remaining = current - tier1;
        let cumulative = (input.ytd_pensionable + tier1).max(params.ympe);
        let tier2_room = (params.yampe - cumulative).max(Decimal::ZERO);
        remaining.min(tier2_room).max(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };
    let cpp2_calculated = round2(percent_of(tier2, params.rate2));
    let cpp2_remaining = (params.max_annual_cpp2() - input.ytd_cpp2).max(Decimal::ZERO);
    let cpp2 = cpp2_calculated.min(cpp2_remaining);

    let pensionable_tier1 = round2(tier1);
    let pensionable_tier2 = round2(tier2);
    let new_ytd_cpp1 = round2(input.ytd_cpp1 + cpp1);
    let new_ytd_cpp2 = round2(input.ytd_cpp2 + cpp2);

    let mut reasoning = if tier1 > Decimal::ZERO {
        format!(
            "Tier 1: (${} - ${} exemption) x {}% = ${}",
            pensionable_tier1,
            round2(params.per_period_exemption),
            params.rate1.normalize(),
            cpp1_calculated
        )
    } else {
        format!(
            "Tier 1: year-to-date pensionable ${} has reached the YMPE of ${}",
            round2(input.ytd_pensionable),
            params.ympe.normalize()
        )
    };
    if cpp1 < cpp1_calculated {
        reasoning.push_str(&format!(
            ", limited to ${} remaining of the annual maximum",
            cpp1
        ));
    }
    if tier2 > Decimal::ZERO {
        reasoning.push_str(&format!(
            "; Tier 2: ${} x {}% = ${}",
            pensionable_tier2,
            params.rate2.normalize(),
            cpp2_calculated
        ));
        if cpp2 < cpp2_calculated {
            reasoning.push_str(&format!(
                ", limited to ${} remaining of the annual maximum",
                cpp2
            ));
        }
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "cpp_contribution".to_string(),
        rule_name: "CPP Contribution".to_string(),
        input: serde_json::json!({
            "current_pensionable": round2(input.current_pensionable).to_string(),
            "ytd_pensionable": round2(input.ytd_pensionable).to_string(),
            "ytd_cpp1": round2(input.ytd_cpp1).to_string(),
            "ytd_cpp2": round2(input.ytd_cpp2).to_string(),
            "per_period_exemption": round2(params.per_period_exemption).to_string(),
            "ympe": params.ympe.normalize().to_string(),
            "yampe": params.yampe.normalize().to_string()
        }),
        output: serde_json::json!({
            "pensionable_tier1": pensionable_tier1.to_string(),
            "pensionable_tier2": pensionable_tier2.to_string(),
            "cpp1_employee": cpp1.to_string(),
            "cpp2_employee": cpp2.to_string()
        }),
        reasoning,
    };

    CppContribution {
        cpp1_employee: cpp1,
        cpp1_employer: cpp1,
        cpp2_employee: cpp2,
        cpp2_employer: cpp2,
        pensionable_tier1,
        pensionable_tier2,
        new_ytd_cpp1,
        new_ytd_cpp2,
        audit_step,
    }
}
