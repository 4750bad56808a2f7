//! Pay period configuration models.
//!
//! This module contains the [`PayPeriodConfig`] type and the enums it is built
//! from. A configuration is fixed for the duration of a single calculation.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::MAX_INPUT_VALUE;
use crate::error::{EngineError, EngineResult};

/// How often an employee is paid.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayFrequency;
///
/// let frequency: PayFrequency = "Biweekly".parse().unwrap();
/// assert_eq!(frequency, PayFrequency::Biweekly);
/// assert!("fortnightly".parse::<PayFrequency>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayFrequency {
    /// 52 pay periods per year.
    Weekly,
    /// 26 pay periods per year.
    Biweekly,
    /// 24 pay periods per year.
    Semimonthly,
    /// 12 pay periods per year.
    Monthly,
}

impl PayFrequency {
    /// Returns the serialized name of the frequency.
    pub fn as_str(&self) -> &'static str {
        match self {
            PayFrequency::Weekly => "weekly",
            PayFrequency::Biweekly => "biweekly",
            PayFrequency::Semimonthly => "semimonthly",
            PayFrequency::Monthly => "monthly",
        }
    }
}

impl fmt::Display for PayFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayFrequency {
    type Err = EngineError;

    /// Parses a frequency name, ignoring case and surrounding whitespace.
    ///
    /// Unrecognized names are rejected rather than mapped to a default
    /// number of periods.
    fn from_str(s: &str) -> EngineResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Ok(PayFrequency::Weekly),
            "biweekly" => Ok(PayFrequency::Biweekly),
            "semimonthly" => Ok(PayFrequency::Semimonthly),
            "monthly" => Ok(PayFrequency::Monthly),
            _ => Err(EngineError::UnknownPayFrequency {
                value: s.to_string(),
            }),
        }
    }
}

/// Whether the employee is paid by the hour or a fixed salary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayType {
    /// Paid per hour worked.
    Hourly,
    /// Paid a fixed amount per period.
    Salary,
}

/// How vacation pay is handled in a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VacationMode {
    /// Vacation pay is recorded as a liability and not paid this period.
    Accrue,
    /// Vacation pay is paid out with this period's earnings.
    Pay,
}

/// Per-calculation pay period configuration.
///
/// Basic personal amounts are optional; when absent the rate table's
/// defaults apply.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{PayFrequency, PayPeriodConfig, PayType, VacationMode};
/// use rust_decimal::Decimal;
///
/// let config = PayPeriodConfig {
///     frequency: PayFrequency::Biweekly,
///     pay_type: PayType::Hourly,
///     vacation_mode: VacationMode::Accrue,
///     vacation_rate: Decimal::new(4, 0),
///     federal_basic_personal_amount: Some(Decimal::new(16129, 0)),
///     provincial_basic_personal_amount: Some(Decimal::new(12747, 0)),
///     vacation_pay_override: None,
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriodConfig {
    /// Pay frequency.
    pub frequency: PayFrequency,
    /// Hourly or salaried.
    pub pay_type: PayType,
    /// Accrue or pay vacation.
    pub vacation_mode: VacationMode,
    /// Vacation rate as a percentage (e.g. 4 for 4%).
    pub vacation_rate: Decimal,
    /// Federal TD1 basic personal amount.
    #[serde(default)]
    pub federal_basic_personal_amount: Option<Decimal>,
    /// Provincial TD1 basic personal amount.
    #[serde(default)]
    pub provincial_basic_personal_amount: Option<Decimal>,
    /// Explicit vacation payout in `pay` mode, replacing the calculated amount.
    #[serde(default)]
    pub vacation_pay_override: Option<Decimal>,
}

impl PayPeriodConfig {
    /// Checks that every configured value is in range.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPayPeriod`] naming the first field that
    /// is out of range.
    pub fn validate(&self) -> EngineResult<()> {
        if self.vacation_rate < Decimal::ZERO || self.vacation_rate > Decimal::ONE_HUNDRED {
            return Err(invalid(
                "vacation_rate",
                format!("must be between 0 and 100, got {}", self.vacation_rate),
            ));
        }

        let amounts = [
            (
                "federal_basic_personal_amount",
                self.federal_basic_personal_amount,
            ),
            (
                "provincial_basic_personal_amount",
                self.provincial_basic_personal_amount,
            ),
            ("vacation_pay_override", self.vacation_pay_override),
        ];
        for (field, value) in amounts {
            let Some(value) = value else { continue };
            if value < Decimal::ZERO {
                return Err(invalid(field, format!("cannot be negative, got {}", value)));
            }
            if value >= MAX_INPUT_VALUE {
                return Err(invalid(
                    field,
                    format!("must be less than {}, got {}", MAX_INPUT_VALUE, value),
                ));
            }
        }

        Ok(())
    }
}

fn invalid(field: &str, message: String) -> EngineError {
    EngineError::InvalidPayPeriod {
        field: field.to_string(),
        message,
    }
}
