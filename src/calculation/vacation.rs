//! Vacation pay calculation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::rounding::{percent_of, round2};
use crate::models::{AuditStep, VacationMode};

/// Vacation pay for one pay period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacationResult {
    /// Vacation pay paid out this period.
    pub vacation_paid: Decimal,
    /// Vacation liability accrued this period.
    pub vacation_accrued: Decimal,
    /// Amount to add to gross and every statutory subtotal.
    pub amount_added_to_gross: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates vacation pay on the period's vacation base.
///
/// In [`VacationMode::Accrue`] the calculated amount is recorded as a
/// liability and nothing is added to gross. In [`VacationMode::Pay`] the
/// amount is paid out and added to gross. An explicit payout amount replaces
/// the calculated one in pay mode and is ignored when accruing.
///
/// A negative base is treated as zero.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_vacation;
/// use payroll_engine::models::VacationMode;
/// use rust_decimal::Decimal;
///
/// let result = calculate_vacation(
///     Decimal::new(2000, 0),
///     Decimal::new(4, 0),
///     VacationMode::Accrue,
///     None,
///     1,
/// );
/// assert_eq!(result.vacation_accrued, Decimal::new(8000, 2));
/// assert_eq!(result.amount_added_to_gross, Decimal::ZERO);
/// ```
pub fn calculate_vacation(
    base_earnings: Decimal,
    rate: Decimal,
    mode: VacationMode,
    payout_override: Option<Decimal>,
    step_number: u32,
) -> VacationResult {
    let base = round2(base_earnings.max(Decimal::ZERO));
    let calculated = round2(percent_of(base, rate));

    let (paid, accrued, reasoning) = match mode {
        VacationMode::Accrue => (
            round2(Decimal::ZERO),
            calculated,
            format!(
                "Accrue: ${} x {}% = ${} recorded as liability",
                base,
                rate.normalize(),
                calculated
            ),
        ),
        VacationMode::Pay => match payout_override {
            Some(amount) => {
                let amount = round2(amount.max(Decimal::ZERO));
                (
                    amount,
                    round2(Decimal::ZERO),
                    format!(
                        "Pay: override of ${} paid in place of calculated ${}",
                        amount, calculated
                    ),
                )
            }
            None => (
                calculated,
                round2(Decimal::ZERO),
                format!(
                    "Pay: ${} x {}% = ${} added to gross",
                    base,
                    rate.normalize(),
                    calculated
                ),
            ),
        },
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "vacation_pay".to_string(),
        rule_name: "Vacation Pay".to_string(),
        input: serde_json::json!({
            "vacation_base": base.to_string(),
            "rate": rate.normalize().to_string(),
            "mode": mode,
            "override": payout_override.map(|v| round2(v).to_string())
        }),
        output: serde_json::json!({
            "vacation_paid": paid.to_string(),
            "vacation_accrued": accrued.to_string(),
            "amount_added_to_gross": paid.to_string()
        }),
        reasoning,
    };

    VacationResult {
        vacation_paid: paid,
        vacation_accrued: accrued,
        amount_added_to_gross: paid,
        audit_step,
    }
}
