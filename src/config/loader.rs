//! Rate table loading functionality.
//!
//! This module provides the [`RateTableLoader`] type for loading statutory
//! rate tables from YAML files.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::StatutoryRateTable;

/// Loads and provides access to statutory rate tables by tax year.
///
/// # Directory Structure
///
/// Each YAML file in the directory holds one table:
/// ```text
/// config/rates/
/// ├── 2024.yaml
/// └── 2025.yaml
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::RateTableLoader;
///
/// let loader = RateTableLoader::load("./config/rates").unwrap();
/// let table = loader.get(2025).unwrap();
/// println!("YMPE for 2025: ${}", table.ympe);
/// ```
#[derive(Debug, Clone)]
pub struct RateTableLoader {
    tables: BTreeMap<i32, StatutoryRateTable>,
}

impl RateTableLoader {
    /// Loads every `*.yaml` rate table in the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `RateTableLoader` on success, or an error if:
    /// - The directory is missing or contains no YAML files
    /// - Any file contains invalid YAML or is missing a field
    /// - Any table fails validation
    /// - Two files declare the same tax year
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let dir = path.as_ref();
        let dir_str = dir.display().to_string();

        if !dir.is_dir() {
            return Err(EngineError::ConfigNotFound { path: dir_str });
        }

        let entries = fs::read_dir(dir).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                paths.push(path);
            }
        }
        paths.sort();

        if paths.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no rate files found)", dir_str),
            });
        }

        let mut tables = BTreeMap::new();
        for path in paths {
            let table = Self::load_yaml(&path)?;
            table.validate()?;
            debug!(path = %path.display(), tax_year = table.tax_year, "Loaded rate table");

            if tables.contains_key(&table.tax_year) {
                return Err(EngineError::ConfigParseError {
                    path: path.display().to_string(),
                    message: format!("duplicate rate table for tax year {}", table.tax_year),
                });
            }
            tables.insert(table.tax_year, table);
        }

        Ok(Self { tables })
    }

    /// Creates a loader from tables already in memory.
    ///
    /// Later tables replace earlier ones for the same tax year.
    pub fn from_tables(tables: impl IntoIterator<Item = StatutoryRateTable>) -> Self {
        Self {
            tables: tables.into_iter().map(|t| (t.tax_year, t)).collect(),
        }
    }

    /// Creates a loader holding the built-in tables.
    pub fn builtin() -> Self {
        Self::from_tables([
            StatutoryRateTable::canada_2024(),
            StatutoryRateTable::canada_2025(),
        ])
    }

    /// Loads and parses a YAML file.
    fn load_yaml(path: &Path) -> EngineResult<StatutoryRateTable> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Gets the rate table for a tax year.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::RateTableNotFound`] when no table covers `year`.
    pub fn get(&self, year: i32) -> EngineResult<&StatutoryRateTable> {
        self.tables
            .get(&year)
            .ok_or(EngineError::RateTableNotFound { year })
    }

    /// Returns the tax years available, oldest first.
    pub fn years(&self) -> Vec<i32> {
        self.tables.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::path::PathBuf;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/rates"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "payroll_engine_{}_{}",
            name,
            uuid::Uuid::new_v4()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load_shipped_tables() {
        let result = RateTableLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.years(), vec![2024, 2025]);
    }

    #[test]
    fn test_shipped_tables_match_builtins() {
        let loader = RateTableLoader::load(config_path()).unwrap();

        assert_eq!(
            loader.get(2025).unwrap(),
            &StatutoryRateTable::canada_2025()
        );
        assert_eq!(
            loader.get(2024).unwrap(),
            &StatutoryRateTable::canada_2024()
        );
    }

    #[test]
    fn test_get_unknown_year_returns_error() {
        let loader = RateTableLoader::builtin();

        match loader.get(2030) {
            Err(EngineError::RateTableNotFound { year }) => assert_eq!(year, 2030),
            other => panic!("Expected RateTableNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        match RateTableLoader::load("/nonexistent/path") {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("nonexistent"));
            }
            other => panic!("Expected ConfigNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_load_empty_directory_returns_error() {
        let dir = scratch_dir("empty");

        match RateTableLoader::load(&dir) {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("no rate files found"));
            }
            other => panic!("Expected ConfigNotFound, got {:?}", other),
        }

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_load_malformed_yaml_returns_parse_error() {
        let dir = scratch_dir("malformed");
        fs::write(dir.join("2025.yaml"), "tax_year: [not a number").unwrap();

        match RateTableLoader::load(&dir) {
            Err(EngineError::ConfigParseError { path, .. }) => {
                assert!(path.ends_with("2025.yaml"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_load_invalid_table_returns_validation_error() {
        let dir = scratch_dir("invalid");
        let mut table = StatutoryRateTable::canada_2025();
        table.yampe = dec("1000");
        fs::write(dir.join("2025.yaml"), serde_yaml::to_string(&table).unwrap()).unwrap();

        match RateTableLoader::load(&dir) {
            Err(EngineError::InvalidRateTable { field, .. }) => assert_eq!(field, "yampe"),
            other => panic!("Expected InvalidRateTable, got {:?}", other),
        }

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_load_duplicate_year_returns_error() {
        let dir = scratch_dir("duplicate");
        let yaml = serde_yaml::to_string(&StatutoryRateTable::canada_2025()).unwrap();
        fs::write(dir.join("a.yaml"), &yaml).unwrap();
        fs::write(dir.join("b.yaml"), &yaml).unwrap();

        match RateTableLoader::load(&dir) {
            Err(EngineError::ConfigParseError { message, .. }) => {
                assert!(message.contains("duplicate"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_non_yaml_files_are_ignored() {
        let dir = scratch_dir("mixed");
        let yaml = serde_yaml::to_string(&StatutoryRateTable::canada_2024()).unwrap();
        fs::write(dir.join("2024.yaml"), yaml).unwrap();
        fs::write(dir.join("README.txt"), "not a table").unwrap();

        let loader = RateTableLoader::load(&dir).unwrap();
        assert_eq!(loader.years(), vec![2024]);

        fs::remove_dir_all(dir).unwrap();
    }
}
