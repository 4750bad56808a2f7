//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while loading rate tables or
//! validating a payroll calculation request.

use thiserror::Error;

/// The main error type for the payroll engine.
///
/// Only invalid input is reported as an error. Degraded history data is
/// skipped by the YTD aggregator and arithmetic edge cases resolve to zero
/// contributions, so neither ever surfaces here.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::RateTableNotFound { year: 2019 };
/// assert_eq!(error.to_string(), "No statutory rate table for tax year 2019");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file or directory was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No rate table is available for the requested tax year.
    #[error("No statutory rate table for tax year {year}")]
    RateTableNotFound {
        /// The tax year that was requested.
        year: i32,
    },

    /// A statutory rate table entry is out of range.
    #[error("Invalid rate table field '{field}': {message}")]
    InvalidRateTable {
        /// The offending field.
        field: String,
        /// What made the value invalid.
        message: String,
    },

    /// A pay period configuration value is out of range.
    #[error("Invalid pay period field '{field}': {message}")]
    InvalidPayPeriod {
        /// The offending field.
        field: String,
        /// What made the value invalid.
        message: String,
    },

    /// An earnings line was invalid or contained inconsistent data.
    #[error("Invalid earnings line '{code}': {message}")]
    InvalidEarningsLine {
        /// The earnings code of the invalid line.
        code: String,
        /// What made the line invalid.
        message: String,
    },

    /// A caller-supplied year-to-date balance is out of range.
    #[error("Invalid year-to-date field '{field}': {message}")]
    InvalidYtdState {
        /// The offending field.
        field: String,
        /// What made the value invalid.
        message: String,
    },

    /// A finished calculation could not be converted into a history record.
    #[error("Failed to serialize payroll result: {message}")]
    SerializationError {
        /// The serializer's description of the failure.
        message: String,
    },

    /// A pay frequency string did not name a supported frequency.
    #[error("Unknown pay frequency: {value}")]
    UnknownPayFrequency {
        /// The unrecognized value.
        value: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/2025.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/2025.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/rates/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/rates/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_rate_table_displays_field_and_message() {
        let error = EngineError::InvalidRateTable {
            field: "yampe".to_string(),
            message: "must be at least ympe (71300)".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid rate table field 'yampe': must be at least ympe (71300)"
        );
    }

    #[test]
    fn test_invalid_pay_period_displays_field_and_message() {
        let error = EngineError::InvalidPayPeriod {
            field: "vacation_rate".to_string(),
            message: "must be between 0 and 100".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid pay period field 'vacation_rate': must be between 0 and 100"
        );
    }

    #[test]
    fn test_invalid_earnings_line_displays_code_and_message() {
        let error = EngineError::InvalidEarningsLine {
            code: "OT".to_string(),
            message: "hours cannot be negative".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid earnings line 'OT': hours cannot be negative"
        );
    }

    #[test]
    fn test_invalid_ytd_state_displays_field_and_message() {
        let error = EngineError::InvalidYtdState {
            field: "insurable".to_string(),
            message: "cannot be negative, got -10000".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid year-to-date field 'insurable': cannot be negative, got -10000"
        );
    }

    #[test]
    fn test_serialization_error_displays_message() {
        let error = EngineError::SerializationError {
            message: "key must be a string".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to serialize payroll result: key must be a string"
        );
    }

    #[test]
    fn test_unknown_pay_frequency_displays_value() {
        let error = EngineError::UnknownPayFrequency {
            value: "fortnightly".to_string(),
        };
        assert_eq!(error.to_string(), "Unknown pay frequency: fortnightly");
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_missing_table() -> EngineResult<()> {
            Err(EngineError::RateTableNotFound { year: 2001 })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_missing_table()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
