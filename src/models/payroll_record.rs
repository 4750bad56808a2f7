//! Stored payroll history records.
//!
//! History arrives from whatever persistence layer the caller uses, so a
//! [`PayrollRecord`] keeps the pay date and the calculation as raw data. The
//! YTD aggregator parses them and skips records it cannot read.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PayrollCalculationResult;
use crate::error::{EngineError, EngineResult};

/// One previously calculated pay period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollRecord {
    /// Stable employee identifier; absent on legacy imports.
    #[serde(default)]
    pub employee_id: Option<Uuid>,
    /// Employee display name.
    #[serde(default)]
    pub employee_name: String,
    /// Pay date as stored, normally `YYYY-MM-DD`.
    #[serde(default)]
    pub pay_date: String,
    /// The stored [`PayrollCalculationResult`], if any.
    #[serde(default)]
    pub calculations: Option<serde_json::Value>,
}

impl PayrollRecord {
    /// Builds a history record from a finished calculation.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SerializationError`] if the result cannot be
    /// converted to JSON.
    pub fn from_result(result: &PayrollCalculationResult) -> EngineResult<Self> {
        let calculations =
            serde_json::to_value(result).map_err(|e| EngineError::SerializationError {
                message: e.to_string(),
            })?;

        Ok(Self {
            employee_id: result.employee.id,
            employee_name: result.employee.name.clone(),
            pay_date: result.pay_date.format("%Y-%m-%d").to_string(),
            calculations: Some(calculations),
        })
    }
}
