//! Income tax withholding estimate.
//!
//! Withholding is estimated with the Tax Credit Method using flat federal and
//! provincial rates:
//!
//! 1. Annualize the period's gross: `annual = gross × periods_per_year`.
//! 2. `federal = max(0, annual × federal_rate − federal_bpa × federal_rate)`.
//! 3. `provincial = max(0, annual × provincial_rate − provincial_bpa × provincial_rate)`.
//! 4. `tax = round2((federal + provincial) / periods_per_year)`.
//!
//! This is an approximation. It does not apply the graduated federal or
//! provincial brackets and will differ from CRA tables at higher incomes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::rounding::{percent_of, periods_per_year, round2};
use crate::config::StatutoryRateTable;
use crate::models::{AuditStep, PayFrequency, PayPeriodConfig};

/// Flat rates and basic personal amounts for the estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCredits {
    /// Federal rate (percent).
    pub federal_rate: Decimal,
    /// Provincial rate (percent).
    pub provincial_rate: Decimal,
    /// Federal basic personal amount.
    pub federal_basic_personal_amount: Decimal,
    /// Provincial basic personal amount.
    pub provincial_basic_personal_amount: Decimal,
}

impl TaxCredits {
    /// Takes rates from the table, and basic personal amounts from the pay
    /// period when it sets them or from the table otherwise.
    pub fn resolve(table: &StatutoryRateTable, pay_period: &PayPeriodConfig) -> Self {
        Self {
            federal_rate: table.federal_tax_rate,
            provincial_rate: table.provincial_tax_rate,
            federal_basic_personal_amount: pay_period
                .federal_basic_personal_amount
                .unwrap_or(table.federal_basic_personal_amount),
            provincial_basic_personal_amount: pay_period
                .provincial_basic_personal_amount
                .unwrap_or(table.provincial_basic_personal_amount),
        }
    }
}

/// The income tax estimate for one pay period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTaxEstimate {
    /// Annual federal tax, rounded for display.
    pub federal_annual: Decimal,
    /// Annual provincial tax, rounded for display.
    pub provincial_annual: Decimal,
    /// Tax to withhold this period.
    pub tax: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Estimates income tax to withhold from a period's gross pay.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{TaxCredits, estimate_income_tax};
/// use payroll_engine::models::PayFrequency;
/// use rust_decimal::Decimal;
///
/// let credits = TaxCredits {
///     federal_rate: Decimal::new(145, 1),
///     provincial_rate: Decimal::new(505, 2),
///     federal_basic_personal_amount: Decimal::new(16129, 0),
///     provincial_basic_personal_amount: Decimal::new(12747, 0),
/// };
/// let estimate = estimate_income_tax(Decimal::new(2000, 0), PayFrequency::Biweekly, &credits, 1);
/// assert_eq!(estimate.tax, Decimal::new(27629, 2));
/// ```
pub fn estimate_income_tax(
    gross: Decimal,
    frequency: PayFrequency,
    credits: &TaxCredits,
    step_number: u32,
) -> IncomeTaxEstimate {
    let periods = Decimal::from(periods_per_year(frequency));
    let annual = gross * periods;

    let federal = (percent_of(annual, credits.federal_rate)
        - percent_of(credits.federal_basic_personal_amount, credits.federal_rate))
    .max(Decimal::ZERO);
    let provincial = (percent_of(annual, credits.provincial_rate)
        - percent_of(
            credits.provincial_basic_personal_amount,
            credits.provincial_rate,
        ))
    .max(Decimal::ZERO);

    let tax = round2((federal + provincial) / periods);
    let federal_annual = round2(federal);
    let provincial_annual = round2(provincial);

    let audit_step = AuditStep {
        step_number,
        rule_id: "income_tax".to_string(),
        rule_name: "Income Tax (Tax Credit Method)".to_string(),
        input: serde_json::json!({
            "gross": round2(gross).to_string(),
            "periods_per_year": periods.to_string(),
            "federal_rate": credits.federal_rate.normalize().to_string(),
            "provincial_rate": credits.provincial_rate.normalize().to_string(),
            "federal_basic_personal_amount": credits.federal_basic_personal_amount.to_string(),
            "provincial_basic_personal_amount": credits.provincial_basic_personal_amount.to_string()
        }),
        output: serde_json::json!({
            "annual_income": round2(annual).to_string(),
            "federal_annual": federal_annual.to_string(),
            "provincial_annual": provincial_annual.to_string(),
            "tax": tax.to_string()
        }),
        reasoning: format!(
            "Annual ${}: federal ${} + provincial ${} = ${} / {} periods = ${}",
            round2(annual),
            federal_annual,
            provincial_annual,
            round2(federal + provincial),
            periods,
            tax
        ),
    };

    IncomeTaxEstimate {
        federal_annual,
        provincial_annual,
        tax,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PayType, VacationMode};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn credits_2025() -> TaxCredits {
        TaxCredits {
            federal_rate: dec("14.5"),
            provincial_rate: dec("5.05"),
            federal_basic_personal_amount: dec("16129"),
            provincial_basic_personal_amount: dec("12747"),
        }
    }

    fn pay_period(federal: Option<Decimal>) -> PayPeriodConfig {
        PayPeriodConfig {
            frequency: PayFrequency::Biweekly,
            pay_type: PayType::Hourly,
            vacation_mode: VacationMode::Accrue,
            vacation_rate: dec("4"),
            federal_basic_personal_amount: federal,
            provincial_basic_personal_amount: None,
            vacation_pay_override: None,
        }
    }

    #[test]
    fn test_biweekly_estimate() {
        let estimate = estimate_income_tax(dec("2000"), PayFrequency::Biweekly, &credits_2025(), 1);

        // 52000 x 14.5% - 16129 x 14.5% = 5201.295
        assert_eq!(estimate.federal_annual, dec("5201.30"));
        // 52000 x 5.05% - 12747 x 5.05% = 1982.2765
        assert_eq!(estimate.provincial_annual, dec("1982.28"));
        // 7183.5715 / 26 = 276.2912
        assert_eq!(estimate.tax, dec("276.29"));
    }

    #[test]
    fn test_income_below_personal_amounts_owes_nothing() {
        let estimate = estimate_income_tax(dec("400"), PayFrequency::Biweekly, &credits_2025(), 1);

        // 10400 annual is under both basic personal amounts
        assert_eq!(estimate.federal_annual, dec("0.00"));
        assert_eq!(estimate.provincial_annual, dec("0.00"));
        assert_eq!(estimate.tax, dec("0.00"));
    }

    #[test]
    fn test_between_personal_amounts_only_federal_is_zero() {
        // 14000 annual: under the federal amount, over the provincial one
        let estimate = estimate_income_tax(dec("1400"), PayFrequency::Monthly, &credits_2025(), 1);

        assert_eq!(estimate.federal_annual, dec("0.00"));
        // (14000 - 12747) x 5.05% = 63.2765
        assert_eq!(estimate.provincial_annual, dec("63.28"));
        // 63.2765 / 12 = 5.273
        assert_eq!(estimate.tax, dec("5.27"));
    }

    #[test]
    fn test_frequency_changes_annualization() {
        let weekly = estimate_income_tax(dec("1000"), PayFrequency::Weekly, &credits_2025(), 1);
        let biweekly = estimate_income_tax(dec("2000"), PayFrequency::Biweekly, &credits_2025(), 1);

        // Same annual income, so the weekly tax is half the biweekly tax
        assert_eq!(weekly.federal_annual, biweekly.federal_annual);
        assert_eq!(weekly.tax, dec("138.15"));
    }

    #[test]
    fn test_zero_gross() {
        let estimate =
            estimate_income_tax(Decimal::ZERO, PayFrequency::Monthly, &credits_2025(), 1);
        assert_eq!(estimate.tax, dec("0.00"));
    }

    #[test]
    fn test_resolve_prefers_pay_period_amounts() {
        let table = StatutoryRateTable::canada_2025();

        let credits = TaxCredits::resolve(&table, &pay_period(Some(dec("20000"))));
        assert_eq!(credits.federal_basic_personal_amount, dec("20000"));
        assert_eq!(credits.provincial_basic_personal_amount, dec("12747"));
        assert_eq!(credits.federal_rate, dec("14.5"));
    }

    #[test]
    fn test_resolve_falls_back_to_table() {
        let table = StatutoryRateTable::canada_2024();

        let credits = TaxCredits::resolve(&table, &pay_period(None));
        assert_eq!(credits.federal_basic_personal_amount, dec("15705"));
        assert_eq!(credits.provincial_basic_personal_amount, dec("12399"));
    }

    #[test]
    fn test_audit_step() {
        let estimate = estimate_income_tax(dec("2000"), PayFrequency::Biweekly, &credits_2025(), 9);

        assert_eq!(estimate.audit_step.step_number, 9);
        assert_eq!(estimate.audit_step.rule_id, "income_tax");
        assert_eq!(estimate.audit_step.output["annual_income"], "52000.00");
        assert!(estimate.audit_step.reasoning.ends_with("= $276.29"));
    }
}
