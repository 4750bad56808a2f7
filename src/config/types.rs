//! Statutory rate table types.
//!
//! This module contains the strongly-typed rate table deserialized from YAML
//! configuration files, the built-in tables, and caller overrides.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::PayFrequency;

/// Rates and thresholds for one tax year.
///
/// Percentages are stored as percent values (5.95 means 5.95%). The table is a
/// constant lookup; calculations never modify it.
///
/// # Example
///
/// ```
/// use payroll_engine::config::StatutoryRateTable;
/// use payroll_engine::models::PayFrequency;
/// use rust_decimal::Decimal;
///
/// let table = StatutoryRateTable::canada_2025();
/// assert_eq!(table.ympe, Decimal::new(71300, 0));
/// assert!(table.validate().is_ok());
///
/// let exemption = table.per_period_exemption(PayFrequency::Monthly);
/// assert_eq!(exemption.round_dp(2), Decimal::new(29167, 2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatutoryRateTable {
    /// The tax year these values apply to.
    pub tax_year: i32,
    /// CPP tier-1 employee rate (percent).
    pub cpp_rate: Decimal,
    /// CPP tier-2 (CPP2) employee rate (percent).
    pub cpp2_rate: Decimal,
    /// Annual CPP basic exemption.
    pub cpp_basic_exemption: Decimal,
    /// Year's maximum pensionable earnings (tier-1 ceiling).
    pub ympe: Decimal,
    /// Year's additional maximum pensionable earnings (tier-2 ceiling).
    pub yampe: Decimal,
    /// EI employee rate (percent).
    pub ei_rate: Decimal,
    /// Employer EI premium as a multiple of the employee premium.
    pub ei_employer_multiplier: Decimal,
    /// Maximum annual insurable earnings.
    pub ei_max_insurable: Decimal,
    /// WSIB premium rate (percent). Varies by employer and industry.
    pub wsib_rate: Decimal,
    /// Maximum annual WSIB assessable earnings.
    pub wsib_max_assessable: Decimal,
    /// Flat federal withholding rate (percent).
    pub federal_tax_rate: Decimal,
    /// Flat provincial withholding rate (percent).
    pub provincial_tax_rate: Decimal,
    /// Default federal basic personal amount.
    pub federal_basic_personal_amount: Decimal,
    /// Default provincial basic personal amount.
    pub provincial_basic_personal_amount: Decimal,
}

impl StatutoryRateTable {
    /// Federal and Ontario values for 2025.
    pub fn canada_2025() -> Self {
        Self {
            tax_year: 2025,
            cpp_rate: Decimal::new(595, 2),
            cpp2_rate: Decimal::new(400, 2),
            cpp_basic_exemption: Decimal::new(3500, 0),
            ympe: Decimal::new(71300, 0),
            yampe: Decimal::new(81200, 0),
            ei_rate: Decimal::new(164, 2),
            ei_employer_multiplier: Decimal::new(14, 1),
            ei_max_insurable: Decimal::new(65700, 0),
            wsib_rate: Decimal::new(215, 2),
            wsib_max_assessable: Decimal::new(100000, 0),
            federal_tax_rate: Decimal::new(145, 1),
            provincial_tax_rate: Decimal::new(505, 2),
            federal_basic_personal_amount: Decimal::new(16129, 0),
            provincial_basic_personal_amount: Decimal::new(12747, 0),
        }
    }

    /// Federal and Ontario values for 2024.
    pub fn canada_2024() -> Self {
        Self {
            tax_year: 2024,
            cpp_rate: Decimal::new(595, 2),
            cpp2_rate: Decimal::new(400, 2),
            cpp_basic_exemption: Decimal::new(3500, 0),
            ympe: Decimal::new(68500, 0),
            yampe: Decimal::new(73200, 0),
            ei_rate: Decimal::new(166, 2),
            ei_employer_multiplier: Decimal::new(14, 1),
            ei_max_insurable: Decimal::new(63200, 0),
            wsib_rate: Decimal::new(215, 2),
            wsib_max_assessable: Decimal::new(100000, 0),
            federal_tax_rate: Decimal::new(145, 1),
            provincial_tax_rate: Decimal::new(505, 2),
            federal_basic_personal_amount: Decimal::new(15705, 0),
            provincial_basic_personal_amount: Decimal::new(12399, 0),
        }
    }

    /// Returns the built-in table for a tax year, if there is one.
    pub fn builtin(year: i32) -> Option<Self> {
        match year {
            2024 => Some(Self::canada_2024()),
            2025 => Some(Self::canada_2025()),
            _ => None,
        }
    }

    /// The annual basic exemption spread evenly over the year's pay periods.
    ///
    /// Not rounded; the CPP calculation subtracts it at full precision.
    pub fn per_period_exemption(&self, frequency: PayFrequency) -> Decimal {
        crate::calculation::per_period(self.cpp_basic_exemption, frequency)
    }

    /// Returns a copy with every override that is set applied.
    pub fn with_overrides(&self, overrides: &RateOverrides) -> Self {
        let pick = |value: Option<Decimal>, current: Decimal| value.unwrap_or(current);
        Self {
            tax_year: self.tax_year,
            cpp_rate: pick(overrides.cpp_rate, self.cpp_rate),
            cpp2_rate: pick(overrides.cpp2_rate, self.cpp2_rate),
            cpp_basic_exemption: pick(overrides.cpp_basic_exemption, self.cpp_basic_exemption),
            ympe: pick(overrides.ympe, self.ympe),
            yampe: pick(overrides.yampe, self.yampe),
            ei_rate: pick(overrides.ei_rate, self.ei_rate),
            ei_employer_multiplier: pick(
                overrides.ei_employer_multiplier,
                self.ei_employer_multiplier,
            ),
            ei_max_insurable: pick(overrides.ei_max_insurable, self.ei_max_insurable),
            wsib_rate: pick(overrides.wsib_rate, self.wsib_rate),
            wsib_max_assessable: pick(overrides.wsib_max_assessable, self.wsib_max_assessable),
            federal_tax_rate: pick(overrides.federal_tax_rate, self.federal_tax_rate),
            provincial_tax_rate: pick(overrides.provincial_tax_rate, self.provincial_tax_rate),
            federal_basic_personal_amount: self.federal_basic_personal_amount,
            provincial_basic_personal_amount: self.provincial_basic_personal_amount,
        }
    }

    /// Checks that every rate is a percentage and every cap is non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRateTable`] naming the first bad field.
    /// Values are reported rather than clamped.
    pub fn validate(&self) -> EngineResult<()> {
        let percentages = [
            ("cpp_rate", self.cpp_rate),
            ("cpp2_rate", self.cpp2_rate),
            ("ei_rate", self.ei_rate),
            ("wsib_rate", self.wsib_rate),
            ("federal_tax_rate", self.federal_tax_rate),
            ("provincial_tax_rate", self.provincial_tax_rate),
        ];
        for (field, value) in percentages {
            if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
                return Err(invalid(
                    field,
                    format!("must be between 0 and 100, got {}", value),
                ));
            }
        }

        let amounts = [
            ("cpp_basic_exemption", self.cpp_basic_exemption),
            ("ympe", self.ympe),
            ("yampe", self.yampe),
            ("ei_employer_multiplier", self.ei_employer_multiplier),
            ("ei_max_insurable", self.ei_max_insurable),
            ("wsib_max_assessable", self.wsib_max_assessable),
            (
                "federal_basic_personal_amount",
                self.federal_basic_personal_amount,
            ),
            (
                "provincial_basic_personal_amount",
                self.provincial_basic_personal_amount,
            ),
        ];
        for (field, value) in amounts {
            if value < Decimal::ZERO {
                return Err(invalid(field, format!("cannot be negative, got {}", value)));
            }
        }

        if self.yampe < self.ympe {
            return Err(invalid(
                "yampe",
                format!("must be at least ympe ({}), got {}", self.ympe, self.yampe),
            ));
        }

        Ok(())
    }
}

fn invalid(field: &str, message: String) -> EngineError {
    EngineError::InvalidRateTable {
        field: field.to_string(),
        message,
    }
}

/// Per-employer replacements for rate table entries.
///
/// Every field is optional; unset fields keep the table's value.
///
/// # Example
///
/// ```
/// use payroll_engine::config::{RateOverrides, StatutoryRateTable};
/// use rust_decimal::Decimal;
///
/// let overrides = RateOverrides {
///     wsib_rate: Some(Decimal::new(312, 2)),
///     ..RateOverrides::default()
/// };
/// let table = StatutoryRateTable::canada_2025().with_overrides(&overrides);
/// assert_eq!(table.wsib_rate, Decimal::new(312, 2));
/// assert_eq!(table.ei_rate, Decimal::new(164, 2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateOverrides {
    /// CPP tier-1 rate (percent).
    pub cpp_rate: Option<Decimal>,
    /// CPP tier-2 rate (percent).
    pub cpp2_rate: Option<Decimal>,
    /// Annual CPP basic exemption.
    pub cpp_basic_exemption: Option<Decimal>,
    /// Tier-1 ceiling.
    pub ympe: Option<Decimal>,
    /// Tier-2 ceiling.
    pub yampe: Option<Decimal>,
    /// EI employee rate (percent).
    pub ei_rate: Option<Decimal>,
    /// EI employer multiplier.
    pub ei_employer_multiplier: Option<Decimal>,
    /// Maximum insurable earnings.
    pub ei_max_insurable: Option<Decimal>,
    /// WSIB rate (percent).
    pub wsib_rate: Option<Decimal>,
    /// Maximum WSIB assessable earnings.
    pub wsib_max_assessable: Option<Decimal>,
    /// Federal withholding rate (percent).
    pub federal_tax_rate: Option<Decimal>,
    /// Provincial withholding rate (percent).
    pub provincial_tax_rate: Option<Decimal>,
}

impl RateOverrides {
    /// Returns true when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == RateOverrides::default()
    }
}
