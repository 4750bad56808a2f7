//! Employee identity used to select payroll history.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a history record was matched to an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeMatch {
    /// Both sides carry the same stable identifier.
    ById,
    /// At least one side has no identifier and the names match.
    ///
    /// Legacy imports only; names are not unique and change on rename.
    ByLegacyName,
    /// The record belongs to someone else.
    NoMatch,
}

impl EmployeeMatch {
    /// Returns true unless the record belongs to someone else.
    pub fn is_match(self) -> bool {
        self != EmployeeMatch::NoMatch
    }
}

/// Identifies the employee a calculation is for.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{EmployeeMatch, EmployeeRef};
///
/// let jane = EmployeeRef::by_name("Jane Doe");
/// assert_eq!(jane.match_record(None, "  jane doe "), EmployeeMatch::ByLegacyName);
/// assert_eq!(jane.match_record(None, "John Smith"), EmployeeMatch::NoMatch);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRef {
    /// Stable identifier, when the employee has one.
    #[serde(default)]
    pub id: Option<Uuid>,
    /// Display name.
    pub name: String,
}

impl EmployeeRef {
    /// Creates a reference with a stable identifier.
    pub fn new(id: Uuid, name: &str) -> Self {
        Self {
            id: Some(id),
            name: name.to_string(),
        }
    }

    /// Creates a name-only reference for legacy data.
    pub fn by_name(name: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
        }
    }

    /// Decides whether a history record belongs to this employee.
    ///
    /// Identifiers are authoritative when both sides have one: two different
    /// ids never match even if the names agree. Otherwise names are compared
    /// case-insensitively after trimming.
    pub fn match_record(&self, record_id: Option<Uuid>, record_name: &str) -> EmployeeMatch {
        match (self.id, record_id) {
            (Some(ours), Some(theirs)) if ours == theirs => EmployeeMatch::ById,
            (Some(_), Some(_)) => EmployeeMatch::NoMatch,
            _ if names_match(&self.name, record_name) => EmployeeMatch::ByLegacyName,
            _ => EmployeeMatch::NoMatch,
        }
    }
}

fn names_match(a: &str, b: &str) -> bool {
    let a = a.trim();
    !a.is_empty() && a.to_lowercase() == b.trim().to_lowercase()
}
