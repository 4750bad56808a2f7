//! Year-to-date balances.

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::MAX_INPUT_VALUE;
use crate::error::{EngineError, EngineResult};

/// Cumulative totals for an employee within one calendar year.
///
/// A `YtdState` is never stored and mutated as a ledger. It is derived by
/// summing each prior period's contribution, so addition is field-wise and
/// associative.
///
/// # Example
///
/// ```
/// use payroll_engine::models::YtdState;
/// use rust_decimal::Decimal;
///
/// let first = YtdState { gross: Decimal::new(200000, 2), ..YtdState::default() };
/// let second = YtdState { gross: Decimal::new(150050, 2), ..YtdState::default() };
///
/// let total: YtdState = [first, second].into_iter().sum();
/// assert_eq!(total.gross, Decimal::new(350050, 2));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct YtdState {
    /// Gross pay.
    pub gross: Decimal,
    /// CPP pensionable earnings.
    pub pensionable: Decimal,
    /// EI insurable earnings.
    pub insurable: Decimal,
    /// WSIB assessable earnings.
    pub wsib_assessable: Decimal,
    /// WSIB premium (employer).
    pub wsib_premium: Decimal,
    /// CPP tier-1 employee contribution.
    pub cpp1: Decimal,
    /// CPP tier-2 employee contribution.
    pub cpp2: Decimal,
    /// EI employee premium.
    pub ei: Decimal,
    /// Income tax withheld.
    pub income_tax: Decimal,
    /// Vacation pay accrued as a liability.
    pub vacation_accrued: Decimal,
    /// Vacation pay paid out.
    pub vacation_paid: Decimal,
}

impl YtdState {
    /// Checks that every balance is in range for caller-supplied totals.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidYtdState`] naming the first field that
    /// is negative or not below [`MAX_INPUT_VALUE`].
    pub fn validate(&self) -> EngineResult<()> {
        let fields = [
            ("gross", self.gross),
            ("pensionable", self.pensionable),
            ("insurable", self.insurable),
            ("wsib_assessable", self.wsib_assessable),
            ("wsib_premium", self.wsib_premium),
            ("cpp1", self.cpp1),
            ("cpp2", self.cpp2),
            ("ei", self.ei),
            ("income_tax", self.income_tax),
            ("vacation_accrued", self.vacation_accrued),
            ("vacation_paid", self.vacation_paid),
        ];
        for (field, value) in fields {
            let message = if value < Decimal::ZERO {
                format!("cannot be negative, got {}", value)
            } else if value >= MAX_INPUT_VALUE {
                format!("must be less than {}, got {}", MAX_INPUT_VALUE, value)
            } else {
                continue;
            };
            return Err(EngineError::InvalidYtdState {
                field: field.to_string(),
                message,
            });
        }

        Ok(())
    }
}

impl Add for YtdState {
    type Output = YtdState;

    fn add(self, rhs: YtdState) -> YtdState {
        YtdState {
            gross: self.gross + rhs.gross,
            pensionable: self.pensionable + rhs.pensionable,
            insurable: self.insurable + rhs.insurable,
            wsib_assessable: self.wsib_assessable + rhs.wsib_assessable,
            wsib_premium: self.wsib_premium + rhs.wsib_premium,
            cpp1: self.cpp1 + rhs.cpp1,
            cpp2: self.cpp2 + rhs.cpp2,
            ei: self.ei + rhs.ei,
            income_tax: self.income_tax + rhs.income_tax,
            vacation_accrued: self.vacation_accrued + rhs.vacation_accrued,
            vacation_paid: self.vacation_paid + rhs.vacation_paid,
        }
    }
}

impl AddAssign for YtdState {
    fn add_assign(&mut self, rhs: YtdState) {
        *self = *self + rhs;
    }
}

impl Sum for YtdState {
    fn sum<I: Iterator<Item = YtdState>>(iter: I) -> YtdState {
        iter.fold(YtdState::default(), Add::add)
    }
}
