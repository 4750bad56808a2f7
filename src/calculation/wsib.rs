//! Workplace Safety and Insurance Board premium calculation.
//!
//! WSIB is paid by the employer alone, on assessable earnings up to an
//! annual maximum. The rate depends on the employer's industry, so callers
//! usually supply it through rate overrides.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::rounding::{percent_of, round2};
use crate::models::AuditStep;

/// The WSIB premium for one pay period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WsibPremium {
    /// Employer premium.
    pub premium: Decimal,
    /// Assessable earnings the premium was charged on, after the annual cap.
    pub assessable: Decimal,
    /// Premiums including this period.
    pub new_ytd_wsib: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the WSIB premium for a pay period.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_wsib;
/// use rust_decimal::Decimal;
///
/// let result = calculate_wsib(
///     Decimal::new(2000, 0),
///     Decimal::ZERO,
///     Decimal::ZERO,
///     Decimal::new(215, 2),
///     Decimal::new(100000, 0),
///     1,
/// );
/// assert_eq!(result.premium, Decimal::new(4300, 2));
/// ```
pub fn calculate_wsib(
    current_assessable: Decimal,
    ytd_assessable: Decimal,
    ytd_premium: Decimal,
    rate: Decimal,
    max_assessable: Decimal,
    step_number: u32,
) -> WsibPremium {
    let room = (max_assessable - ytd_assessable).max(Decimal::ZERO);
    let assessable = round2(current_assessable.max(Decimal::ZERO).min(room));
    let premium = round2(percent_of(assessable, rate));

    let reasoning = if room.is_zero() {
        format!(
            "Year-to-date assessable ${} has reached the maximum of ${}; no premium",
            round2(ytd_assessable),
            max_assessable.normalize()
        )
    } else {
        format!("${} x {}% = ${}", assessable, rate.normalize(), premium)
    };

    WsibPremium {
        premium,
        assessable,
        new_ytd_wsib: round2(ytd_premium + premium),
        audit_step: AuditStep {
            step_number,
            rule_id: "wsib_premium".to_string(),
            rule_name: "WSIB Premium".to_string(),
            input: serde_json::json!({
                "current_assessable": round2(current_assessable).to_string(),
                "ytd_assessable": round2(ytd_assessable).to_string(),
                "max_assessable": max_assessable.normalize().to_string(),
                "rate": rate.normalize().to_string()
            }),
            output: serde_json::json!({
                "assessable": assessable.to_string(),
                "premium": premium.to_string()
            }),
            reasoning,
        },
    }
}
