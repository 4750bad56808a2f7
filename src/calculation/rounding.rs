//! Rounding and pay period helpers shared by every calculation.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::PayFrequency;

/// Rounds a monetary amount to cents, with halves rounded toward positive
/// infinity, and fixes the scale at two decimal places.
///
/// Every amount a calculation module returns passes through this function,
/// and each module rounds its own outputs before any other module sees
/// them.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::round2;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round2(Decimal::from_str("110.990375").unwrap()).to_string(), "110.99");
/// assert_eq!(round2(Decimal::from_str("0.125").unwrap()).to_string(), "0.13");
/// assert_eq!(round2(Decimal::from_str("-0.125").unwrap()).to_string(), "-0.12");
/// assert_eq!(round2(Decimal::from(2000)).to_string(), "2000.00");
/// ```
pub fn round2(value: Decimal) -> Decimal {
    let strategy = if value.is_sign_negative() {
        RoundingStrategy::MidpointTowardZero
    } else {
        RoundingStrategy::MidpointAwayFromZero
    };
    let mut rounded = value.round_dp_with_strategy(2, strategy);
    rounded.rescale(2);
    rounded
}

/// Returns the number of pay periods in a year for a frequency.
pub fn periods_per_year(frequency: PayFrequency) -> u32 {
    match frequency {
        PayFrequency::Weekly => 52,
        PayFrequency::Biweekly => 26,
        PayFrequency::Semimonthly => 24,
        PayFrequency::Monthly => 12,
    }
}

/// Divides an annual amount evenly across the year's pay periods, unrounded.
pub fn per_period(annual: Decimal, frequency: PayFrequency) -> Decimal {
    annual / Decimal::from(periods_per_year(frequency))
}

/// Applies a percentage rate (5.95 means 5.95%) without rounding.
pub fn percent_of(amount: Decimal, rate_percent: Decimal) -> Decimal {
    amount * rate_percent / Decimal::ONE_HUNDRED
}

/// Formats an amount as Canadian dollars with thousands separators.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::format_currency;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_currency(Decimal::new(123456789, 3)), "$123,456.79");
/// assert_eq!(format_currency(Decimal::new(-1234, 2)), "-$12.34");
/// assert_eq!(format_currency(Decimal::ZERO), "$0.00");
/// ```
pub fn format_currency(amount: Decimal) -> String {
    let rounded = round2(amount);
    let digits = rounded.abs().to_string();
    let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, cents)
}
