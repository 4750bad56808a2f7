//! Earnings line models.
//!
//! An [`EarningsLine`] is one row of a pay period's earnings as entered by the
//! caller. The engine echoes each line back as an [`EarningsLineResult`] with
//! its resolved amount and updated year-to-date figures.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Earnings code for vacation pay paid out as earnings.
pub const VACATION_PAYOUT_CODE: &str = "VAC";

/// Earnings code for banked hours, which are recorded but not paid this period.
pub const BANKED_HOURS_CODE: &str = "BANKHRS";

/// Exclusive upper bound on any rate, hours or amount accepted from the caller.
///
/// Values below one trillion keep every product and year-to-date sum the
/// engine forms well inside [`Decimal`]'s range.
pub const MAX_INPUT_VALUE: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Returns the canonical form of an earnings code (trimmed, upper case).
///
/// # Example
///
/// ```
/// use payroll_engine::models::normalize_code;
///
/// assert_eq!(normalize_code(" vac "), "VAC");
/// ```
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// A single earnings line for the current pay period.
///
/// The amount may be given directly or derived from `rate × hours`. The
/// `ytd_hours` and `ytd_amount` fields are accepted for compatibility with
/// stored paystubs but are recomputed by the engine.
///
/// # Example
///
/// ```
/// use payroll_engine::models::EarningsLine;
/// use rust_decimal::Decimal;
///
/// let line = EarningsLine::hourly("REG", "Regular", Decimal::new(25, 0), Decimal::new(80, 0));
/// assert!(!line.is_banked_hours());
/// assert!(!line.is_vacation_payout());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarningsLine {
    /// Short earnings code (e.g. "REG", "OT", "VAC", "BANKHRS").
    pub code: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Hourly rate, if the line is rate based.
    #[serde(default)]
    pub rate: Option<Decimal>,
    /// Hours worked, if the line is rate based.
    #[serde(default)]
    pub hours: Option<Decimal>,
    /// Explicit amount; takes precedence over `rate × hours`.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// Year-to-date hours as last displayed.
    #[serde(default)]
    pub ytd_hours: Decimal,
    /// Year-to-date amount as last displayed.
    #[serde(default)]
    pub ytd_amount: Decimal,
}

impl EarningsLine {
    /// Creates a rate-based line with the amount left to be derived.
    pub fn hourly(code: &str, description: &str, rate: Decimal, hours: Decimal) -> Self {
        Self {
            code: code.to_string(),
            description: description.to_string(),
            rate: Some(rate),
            hours: Some(hours),
            amount: None,
            ytd_hours: Decimal::ZERO,
            ytd_amount: Decimal::ZERO,
        }
    }

    /// Creates a fixed-amount line (salary, bonus, vacation payout).
    pub fn fixed(code: &str, description: &str, amount: Decimal) -> Self {
        Self {
            code: code.to_string(),
            description: description.to_string(),
            rate: None,
            hours: None,
            amount: Some(amount),
            ytd_hours: Decimal::ZERO,
            ytd_amount: Decimal::ZERO,
        }
    }

    /// Returns true for banked-hours lines.
    pub fn is_banked_hours(&self) -> bool {
        normalize_code(&self.code) == BANKED_HOURS_CODE
    }

    /// Returns true for vacation payout lines.
    pub fn is_vacation_payout(&self) -> bool {
        normalize_code(&self.code) == VACATION_PAYOUT_CODE
    }
}

/// An earnings line as it appears on the calculated paystub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarningsLineResult {
    /// Earnings code as entered.
    pub code: String,
    /// Human-readable description.
    pub description: String,
    /// Hourly rate, if any.
    pub rate: Option<Decimal>,
    /// Hours this period, if any.
    pub hours: Option<Decimal>,
    /// Resolved amount this period.
    pub amount: Decimal,
    /// Year-to-date hours including this period.
    pub ytd_hours: Decimal,
    /// Year-to-date amount including this period.
    pub ytd_amount: Decimal,
    /// Whether the line counted towards gross pay.
    pub included_in_gross: bool,
    /// Whether the line counted towards the vacation base.
    pub included_in_vacation_base: bool,
    /// Whether the line counted towards WSIB assessable earnings.
    pub included_in_wsib: bool,
}

/// Year-to-date hours and amount for one earnings code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarningsYtd {
    /// Total hours.
    pub hours: Decimal,
    /// Total amount.
    pub amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_code_predicates_ignore_case_and_whitespace() {
        let vac = EarningsLine::fixed(" vac", "Vacation payout", dec("120.00"));
        let banked = EarningsLine::hourly("BankHrs ", "Banked", dec("25"), dec("4"));

        assert!(vac.is_vacation_payout());
        assert!(!vac.is_banked_hours());
        assert!(banked.is_banked_hours());
        assert!(!banked.is_vacation_payout());
    }

    #[test]
    fn test_deserialize_minimal_line() {
        let json = r#"{ "code": "REG", "rate": "25.00", "hours": "80" }"#;

        let line: EarningsLine = serde_json::from_str(json).unwrap();
        assert_eq!(line.code, "REG");
        assert_eq!(line.description, "");
        assert_eq!(line.rate, Some(dec("25.00")));
        assert_eq!(line.hours, Some(dec("80")));
        assert_eq!(line.amount, None);
        assert_eq!(line.ytd_hours, Decimal::ZERO);
        assert_eq!(line.ytd_amount, Decimal::ZERO);
    }

    #[test]
    fn test_fixed_line_has_no_rate_or_hours() {
        let line = EarningsLine::fixed("SAL", "Salary", dec("2500.00"));
        assert_eq!(line.amount, Some(dec("2500.00")));
        assert!(line.rate.is_none());
        assert!(line.hours.is_none());
    }

    #[test]
    fn test_earnings_ytd_default_is_zero() {
        let ytd = EarningsYtd::default();
        assert_eq!(ytd.hours, Decimal::ZERO);
        assert_eq!(ytd.amount, Decimal::ZERO);
    }

    #[test]
    fn test_max_input_value_is_one_trillion() {
        assert_eq!(MAX_INPUT_VALUE, dec("1000000000000"));
    }
}
