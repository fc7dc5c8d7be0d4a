//! Configuration management and validation.
//!
//! Provides the engine configuration: which areas form the catalog, which
//! age-bracket list is active, the name of the area column in wide files,
//! and a few reporting limits. Catalogs and bracket lists are injected here
//! rather than read from module-level constants so that every service can be
//! exercised with synthetic catalogs.

use crate::app::models::{AgeBracket, BracketSet};
use crate::app::services::area_catalog::AreaCatalog;
use crate::constants::{
    DEFAULT_AREA_COLUMN, DEFAULT_AREAS, DEFAULT_MAX_REPORTED_FAILURES,
    DEFAULT_TEMPLATE_BLANK_ROWS, presets,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Bracket list selection: a named preset or an explicit list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BracketConfig {
    /// `"coarse"` or `"fine"`
    Preset(String),
    /// Explicit ordered `{code, label}` list
    Custom(Vec<AgeBracket>),
}

impl BracketConfig {
    /// Resolve into a validated bracket set
    pub fn resolve(&self) -> Result<BracketSet> {
        match self {
            BracketConfig::Preset(name) => BracketSet::preset(name),
            BracketConfig::Custom(brackets) => BracketSet::new(brackets.clone()),
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Name of the wide-file column holding the area code
    pub area_column: String,

    /// Area catalog in canonical order
    pub areas: Vec<String>,

    /// Active age-bracket list
    pub brackets: BracketConfig,

    /// Also check declared `TOTAL M` / `TOTAL F` / `TOTAL` cells on import
    pub validate_grand_totals: bool,

    /// Zero-count rows added to generated templates after the example row
    pub template_blank_rows: usize,

    /// Maximum per-record failure messages reported after an import
    pub max_reported_failures: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            area_column: DEFAULT_AREA_COLUMN.to_string(),
            areas: DEFAULT_AREAS.iter().map(|a| a.to_string()).collect(),
            brackets: BracketConfig::Preset(presets::COARSE.to_string()),
            validate_grand_totals: false,
            template_blank_rows: DEFAULT_TEMPLATE_BLANK_ROWS,
            max_reported_failures: DEFAULT_MAX_REPORTED_FAILURES,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file; missing keys take default values
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(
                format!("Failed to read config file {}", path.display()),
                e,
            )
        })?;
        let config = Self::from_json_str(&content)?;
        debug!(
            "Loaded config from {}: {} areas, area column '{}'",
            path.display(),
            config.areas.len(),
            config.area_column
        );
        Ok(config)
    }

    /// Parse configuration from JSON text and validate it
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(content)
            .map_err(|e| Error::serialization("Invalid configuration JSON", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration as a whole
    pub fn validate(&self) -> Result<()> {
        if self.area_column.trim().is_empty() {
            return Err(Error::configuration("Area column name cannot be blank"));
        }

        let brackets = self.bracket_set()?;
        if brackets
            .wide_columns()
            .iter()
            .any(|column| column == &self.area_column)
        {
            return Err(Error::configuration(format!(
                "Area column '{}' collides with a count column",
                self.area_column
            )));
        }

        self.catalog()?;

        if self.max_reported_failures == 0 {
            return Err(Error::configuration(
                "max_reported_failures must be at least 1",
            ));
        }

        Ok(())
    }

    /// Build the area catalog
    pub fn catalog(&self) -> Result<AreaCatalog> {
        AreaCatalog::new(self.areas.iter().cloned())
    }

    /// Resolve the active bracket set
    pub fn bracket_set(&self) -> Result<BracketSet> {
        self.brackets.resolve()
    }

    /// Use a custom area catalog
    pub fn with_areas<I, S>(mut self, areas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.areas = areas.into_iter().map(Into::into).collect();
        self
    }

    /// Use a named bracket preset
    pub fn with_bracket_preset(mut self, preset: impl Into<String>) -> Self {
        self.brackets = BracketConfig::Preset(preset.into());
        self
    }

    /// Use an explicit bracket list
    pub fn with_brackets(mut self, brackets: &BracketSet) -> Self {
        self.brackets = BracketConfig::Custom(brackets.iter().cloned().collect());
        self
    }

    /// Set the area column name
    pub fn with_area_column(mut self, column: impl Into<String>) -> Self {
        self.area_column = column.into();
        self
    }

    /// Enable grand-total checks on import
    pub fn with_grand_total_validation(mut self) -> Self {
        self.validate_grand_totals = true;
        self
    }

    /// Set the number of zero rows in generated templates
    pub fn with_template_blank_rows(mut self, rows: usize) -> Self {
        self.template_blank_rows = rows;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.area_column, "BARANGAY");
        assert_eq!(config.bracket_set().unwrap(), BracketSet::coarse());
        assert_eq!(config.catalog().unwrap().len(), 14);
        assert!(!config.validate_grand_totals);
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config = EngineConfig::from_json_str(r#"{"brackets": "fine"}"#).unwrap();
        assert_eq!(config.bracket_set().unwrap(), BracketSet::fine());
        assert_eq!(config.area_column, "BARANGAY");
        assert_eq!(config.template_blank_rows, DEFAULT_TEMPLATE_BLANK_ROWS);
    }

    #[test]
    fn test_custom_brackets_from_json() {
        let json = r#"{
            "areas": ["North", "South"],
            "brackets": [
                {"code": "YOUNG", "label": "0-14"},
                {"code": "ADULT", "label": "15-64"}
            ],
            "validate_grand_totals": true
        }"#;
        let config = EngineConfig::from_json_str(json).unwrap();
        let brackets = config.bracket_set().unwrap();
        assert_eq!(brackets.codes(), vec!["YOUNG", "ADULT"]);
        assert_eq!(config.catalog().unwrap().describe(), "North, South");
        assert!(config.validate_grand_totals);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        assert!(EngineConfig::from_json_str(r#"{"brackets": "weekly"}"#).is_err());
        assert!(EngineConfig::from_json_str(r#"{"areas": []}"#).is_err());
        assert!(EngineConfig::from_json_str(r#"{"areas": ["A", "A"]}"#).is_err());
        assert!(EngineConfig::from_json_str(r#"{"areas": ["North", "TOTAL"]}"#).is_err());
        assert!(EngineConfig::from_json_str(r#"{"area_column": "  "}"#).is_err());
        assert!(EngineConfig::from_json_str(r#"{"area_column": "TOTAL"}"#).is_err());
        assert!(EngineConfig::from_json_str(r#"{"max_reported_failures": 0}"#).is_err());
        assert!(EngineConfig::from_json_str("not json").is_err());
    }

    #[test]
    fn test_builder_methods() {
        let brackets = BracketSet::from_pairs(&[("A", "A")]).unwrap();
        let config = EngineConfig::default()
            .with_areas(["X", "Y"])
            .with_brackets(&brackets)
            .with_area_column("AREA")
            .with_grand_total_validation()
            .with_template_blank_rows(1);

        assert!(config.validate().is_ok());
        assert_eq!(config.bracket_set().unwrap(), brackets);
        assert_eq!(config.area_column, "AREA");
        assert_eq!(config.template_blank_rows, 1);
        assert!(config.validate_grand_totals);

        let fine = EngineConfig::default().with_bracket_preset("fine");
        assert_eq!(fine.bracket_set().unwrap().len(), 20);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"areas": ["Only"]}}"#).unwrap();

        let config = EngineConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.areas, vec!["Only".to_string()]);

        let missing = EngineConfig::from_json_file(Path::new("/nonexistent/config.json"));
        assert!(matches!(missing, Err(Error::Io { .. })));
    }
}
