//! Earnings line resolution and classification.
//!
//! Each line's amount is resolved, then the line is assigned to the period's
//! subtotals by its code:
//!
//! | Code      | Gross / CPP / EI | Vacation base | WSIB |
//! |-----------|------------------|---------------|------|
//! | `BANKHRS` | no               | no            | no   |
//! | `VAC`     | yes              | no            | no   |
//! | other     | yes              | yes           | yes  |

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::rounding::round2;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, EarningsLine, EarningsLineResult, EarningsTotals, EarningsYtd, MAX_INPUT_VALUE,
    normalize_code,
};

/// The period's earnings after classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedEarnings {
    /// Each line with its resolved amount and updated year-to-date figures.
    pub lines: Vec<EarningsLineResult>,
    /// Subtotals before vacation pay.
    pub totals: EarningsTotals,
    /// Total of `VAC` lines, which is vacation already paid as earnings.
    pub vacation_payout: Decimal,
    /// The audit step recording the classification.
    pub audit_step: AuditStep,
}

/// Resolves the amount of an earnings line.
///
/// An explicit amount wins. Otherwise `rate × hours` rounded to cents when
/// both are present, else zero. The line must already have passed
/// [`validate_line`], which bounds the product.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::resolve_line_amount;
/// use payroll_engine::models::EarningsLine;
/// use rust_decimal::Decimal;
///
/// let line = EarningsLine::hourly("REG", "Regular", Decimal::new(2550, 2), Decimal::new(375, 1));
/// assert_eq!(resolve_line_amount(&line), Decimal::new(95625, 2));
/// ```
pub fn resolve_line_amount(line: &EarningsLine) -> Decimal {
    match (line.amount, line.rate, line.hours) {
        (Some(amount), _, _) => round2(amount),
        (None, Some(rate), Some(hours)) => round2(rate * hours),
        _ => round2(Decimal::ZERO),
    }
}

/// Checks that a line has a code and that its rate, hours, amount and
/// `rate × hours` are non-negative and below [`MAX_INPUT_VALUE`].
///
/// # Errors
///
/// Returns [`EngineError::InvalidEarningsLine`] describing the problem.
pub fn validate_line(line: &EarningsLine) -> EngineResult<()> {
    if line.code.trim().is_empty() {
        return Err(invalid_line(line, "earnings code cannot be empty".to_string()));
    }

    let fields = [
        ("rate", line.rate),
        ("hours", line.hours),
        ("amount", line.amount),
    ];
    for (field, value) in fields {
        let Some(value) = value else { continue };
        if value < Decimal::ZERO {
            return Err(invalid_line(
                line,
                format!("{} cannot be negative, got {}", field, value),
            ));
        }
        if value >= MAX_INPUT_VALUE {
            return Err(invalid_line(
                line,
                format!("{} must be less than {}, got {}", field, MAX_INPUT_VALUE, value),
            ));
        }
    }

    if let (None, Some(rate), Some(hours)) = (line.amount, line.rate, line.hours) {
        let within_limit = rate
            .checked_mul(hours)
            .is_some_and(|product| product < MAX_INPUT_VALUE);
        if !within_limit {
            return Err(invalid_line(
                line,
                format!("rate x hours must be less than {}", MAX_INPUT_VALUE),
            ));
        }
    }

    Ok(())
}

fn invalid_line(line: &EarningsLine, message: String) -> EngineError {
    EngineError::InvalidEarningsLine {
        code: line.code.clone(),
        message,
    }
}

/// Validates and classifies the period's earnings lines.
///
/// `earnings_ytd` holds the historical totals per normalized code; each line's
/// year-to-date figures are the historical totals plus this period's lines
/// with the same code, up to and including that line.
///
/// # Errors
///
/// Returns the first validation error from [`validate_line`].
pub fn classify_earnings(
    lines: &[EarningsLine],
    earnings_ytd: &BTreeMap<String, EarningsYtd>,
    step_number: u32,
) -> EngineResult<ClassifiedEarnings> {
    let mut running = earnings_ytd.clone();
    let mut results = Vec::with_capacity(lines.len());

    let mut gross = Decimal::ZERO;
    let mut vacation_base = Decimal::ZERO;
    let mut wsib = Decimal::ZERO;
    let mut vacation_payout = Decimal::ZERO;
    let mut banked = Decimal::ZERO;

    for line in lines {
        validate_line(line)?;

        let amount = resolve_line_amount(line);
        let hours = line.hours.unwrap_or(Decimal::ZERO);
        let banked_hours = line.is_banked_hours();
        let vacation_payout_line = line.is_vacation_payout();

        let included_in_gross = !banked_hours;
        let included_in_vacation_base = !banked_hours && !vacation_payout_line;
        let included_in_wsib = included_in_vacation_base;

        if included_in_gross {
            gross += amount;
        } else {
            banked += amount;
        }
        if included_in_vacation_base {
            vacation_base += amount;
        }
        if included_in_wsib {
            wsib += amount;
        }
        if vacation_payout_line {
            vacation_payout += amount;
        }

        let ytd = running.entry(normalize_code(&line.code)).or_default();
        ytd.hours += hours;
        ytd.amount += amount;

        results.push(EarningsLineResult {
            code: line.code.clone(),
            description: line.description.clone(),
            rate: line.rate,
            hours: line.hours,
            amount,
            ytd_hours: ytd.hours,
            ytd_amount: round2(ytd.amount),
            included_in_gross,
            included_in_vacation_base,
            included_in_wsib,
        });
    }

    let totals = EarningsTotals {
        gross_pay: round2(gross),
        pensionable_earnings: round2(gross),
        insurable_earnings: round2(gross),
        wsib_assessable_earnings: round2(wsib),
        vacation_base: round2(vacation_base),
    };
    let vacation_payout = round2(vacation_payout);

    let audit_step = AuditStep {
        step_number,
        rule_id: "earnings_classification".to_string(),
        rule_name: "Earnings Classification".to_string(),
        input: serde_json::json!({
            "line_count": lines.len(),
            "codes": lines.iter().map(|l| normalize_code(&l.code)).collect::<Vec<_>>()
        }),
        output: serde_json::json!({
            "gross_pay": totals.gross_pay.to_string(),
            "vacation_base": totals.vacation_base.to_string(),
            "wsib_assessable_earnings": totals.wsib_assessable_earnings.to_string(),
            "vacation_payout": vacation_payout.to_string(),
            "banked": round2(banked).to_string()
        }),
        reasoning: format!(
            "{} line(s): gross ${}, vacation base ${}, banked ${} excluded",
            lines.len(),
            totals.gross_pay,
            totals.vacation_base,
            round2(banked)
        ),
    };

    Ok(ClassifiedEarnings {
        lines: results,
        totals,
        vacation_payout,
        audit_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn no_history() -> BTreeMap<String, EarningsYtd> {
        BTreeMap::new()
    }

    #[test]
    fn test_resolve_explicit_amount_wins() {
        let mut line = EarningsLine::hourly("REG", "Regular", dec("25"), dec("80"));
        line.amount = Some(dec("1500"));

        assert_eq!(resolve_line_amount(&line), dec("1500.00"));
    }

    #[test]
    fn test_resolve_rate_times_hours_rounds() {
        // 17.333 x 3 = 51.999
        let line = EarningsLine::hourly("OT", "Overtime", dec("17.333"), dec("3"));
        assert_eq!(resolve_line_amount(&line), dec("52.00"));
    }

    #[test]
    fn test_resolve_missing_hours_is_zero() {
        let mut line = EarningsLine::hourly("REG", "Regular", dec("25"), dec("0"));
        line.hours = None;

        assert_eq!(resolve_line_amount(&line), dec("0.00"));
    }

    #[test]
    fn test_validate_rejects_negative_hours() {
        let line = EarningsLine::hourly("REG", "Regular", dec("25"), dec("-8"));

        match validate_line(&line) {
            Err(EngineError::InvalidEarningsLine { code, message }) => {
                assert_eq!(code, "REG");
                assert!(message.contains("hours"));
            }
            other => panic!("Expected InvalidEarningsLine, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_negative_amount() {
        let line = EarningsLine::fixed("BONUS", "Bonus", dec("-100"));
        assert!(validate_line(&line).is_err());
    }

    #[test]
    fn test_validate_rejects_amount_at_limit() {
        let line = EarningsLine::fixed("REG", "Salary", MAX_INPUT_VALUE);

        match validate_line(&line) {
            Err(EngineError::InvalidEarningsLine { code, message }) => {
                assert_eq!(code, "REG");
                assert!(message.contains("amount must be less than"));
            }
            other => panic!("Expected InvalidEarningsLine, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_rate_times_hours_over_limit() {
        // Each factor is in range but the product would overflow a Decimal
        let line = EarningsLine::hourly("OT", "Overtime", dec("999999999999"), dec("999999999999"));

        match validate_line(&line) {
            Err(EngineError::InvalidEarningsLine { code, message }) => {
                assert_eq!(code, "OT");
                assert!(message.contains("rate x hours"));
            }
            other => panic!("Expected InvalidEarningsLine, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_ignores_rate_times_hours_when_amount_given() {
        let mut line = EarningsLine::hourly("REG", "Regular", dec("900000"), dec("900000"));
        line.amount = Some(dec("2000"));

        assert!(validate_line(&line).is_ok());
        assert_eq!(resolve_line_amount(&line), dec("2000.00"));
    }

    #[test]
    fn test_validate_rejects_empty_code() {
        let line = EarningsLine::fixed("  ", "Nothing", dec("100"));

        match validate_line(&line) {
            Err(EngineError::InvalidEarningsLine { message, .. }) => {
                assert!(message.contains("empty"));
            }
            other => panic!("Expected InvalidEarningsLine, got {:?}", other),
        }
    }

    #[test]
    fn test_regular_line_counts_everywhere() {
        let lines = vec![EarningsLine::hourly("REG", "Regular", dec("25"), dec("80"))];
        let classified = classify_earnings(&lines, &no_history(), 1).unwrap();

        assert_eq!(classified.totals.gross_pay, dec("2000.00"));
        assert_eq!(classified.totals.pensionable_earnings, dec("2000.00"));
        assert_eq!(classified.totals.insurable_earnings, dec("2000.00"));
        assert_eq!(classified.totals.wsib_assessable_earnings, dec("2000.00"));
        assert_eq!(classified.totals.vacation_base, dec("2000.00"));

        let line = &classified.lines[0];
        assert!(line.included_in_gross);
        assert!(line.included_in_vacation_base);
        assert!(line.included_in_wsib);
    }

    #[test]
    fn test_vacation_payout_line_excluded_from_base_and_wsib() {
        let lines = vec![
            EarningsLine::hourly("REG", "Regular", dec("25"), dec("80")),
            EarningsLine::fixed("vac", "Vacation payout", dec("300")),
        ];
        let classified = classify_earnings(&lines, &no_history(), 1).unwrap();

        assert_eq!(classified.totals.gross_pay, dec("2300.00"));
        assert_eq!(classified.totals.pensionable_earnings, dec("2300.00"));
        assert_eq!(classified.totals.vacation_base, dec("2000.00"));
        assert_eq!(classified.totals.wsib_assessable_earnings, dec("2000.00"));
        assert_eq!(classified.vacation_payout, dec("300.00"));

        let vac = &classified.lines[1];
        assert!(vac.included_in_gross);
        assert!(!vac.included_in_vacation_base);
        assert!(!vac.included_in_wsib);
    }

    #[test]
    fn test_banked_hours_excluded_from_everything() {
        let lines = vec![
            EarningsLine::hourly("REG", "Regular", dec("25"), dec("80")),
            EarningsLine::hourly("BANKHRS", "Banked", dec("25"), dec("4")),
        ];
        let classified = classify_earnings(&lines, &no_history(), 1).unwrap();

        assert_eq!(classified.totals.gross_pay, dec("2000.00"));
        assert_eq!(classified.totals.vacation_base, dec("2000.00"));
        assert_eq!(classified.totals.wsib_assessable_earnings, dec("2000.00"));
        assert!(!classified.lines[1].included_in_gross);
        assert_eq!(classified.lines[1].amount, dec("100.00"));
        assert!(classified.audit_step.reasoning.contains("banked $100.00"));
    }

    #[test]
    fn test_ytd_adds_history_by_normalized_code() {
        let mut history = BTreeMap::new();
        history.insert(
            "REG".to_string(),
            EarningsYtd {
                hours: dec("160"),
                amount: dec("4000.00"),
            },
        );

        let lines = vec![EarningsLine::hourly(" reg ", "Regular", dec("25"), dec("80"))];
        let classified = classify_earnings(&lines, &history, 1).unwrap();

        assert_eq!(classified.lines[0].ytd_hours, dec("240"));
        assert_eq!(classified.lines[0].ytd_amount, dec("6000.00"));
        assert_eq!(classified.lines[0].code, " reg ");
    }

    #[test]
    fn test_repeated_codes_accumulate_within_period() {
        let lines = vec![
            EarningsLine::hourly("OT", "Overtime week 1", dec("37.5"), dec("2")),
            EarningsLine::hourly("OT", "Overtime week 2", dec("37.5"), dec("4")),
        ];
        let classified = classify_earnings(&lines, &no_history(), 1).unwrap();

        assert_eq!(classified.lines[0].ytd_amount, dec("75.00"));
        assert_eq!(classified.lines[1].ytd_amount, dec("225.00"));
        assert_eq!(classified.lines[1].ytd_hours, dec("6"));
    }

    #[test]
    fn test_invalid_line_stops_classification() {
        let lines = vec![
            EarningsLine::hourly("REG", "Regular", dec("25"), dec("80")),
            EarningsLine::fixed("BONUS", "Bonus", dec("-1")),
        ];

        assert!(classify_earnings(&lines, &no_history(), 1).is_err());
    }

    #[test]
    fn test_no_lines() {
        let classified = classify_earnings(&[], &no_history(), 1).unwrap();

        assert!(classified.lines.is_empty());
        assert_eq!(classified.totals.gross_pay, dec("0.00"));
    }
}
