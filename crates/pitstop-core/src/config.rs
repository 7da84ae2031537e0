//! Engine configuration
//!
//! Thresholds, keyword tables and the category synonym map. Config is loaded
//! with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/pitstop/config/engine.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! An override is merged onto the embedded defaults: tables merge key by key
//! and any other value (arrays included) replaces the default. An override
//! only needs the settings it changes; `categories = []` clears the keyword
//! table.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/engine.toml");

/// Keyword list for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryKeywords {
    pub name: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Lexical confidence below which history is consulted
    pub lexical_min_confidence: f64,
    /// Normalized edit-distance similarity needed for a description match
    pub description_similarity: f64,
    /// Relative amount similarity needed for an amount match
    pub amount_similarity: f64,
    /// Confidence reported for the default category
    pub fallback_confidence: f64,
    /// Below this confidence the chat router offers recategorization
    pub recategorize_below: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            lexical_min_confidence: 0.3,
            description_similarity: 0.6,
            amount_similarity: 0.8,
            fallback_confidence: 0.3,
            recategorize_below: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    pub daily_max_gap_days: f64,
    pub weekly_max_gap_days: f64,
    pub monthly_max_gap_days: f64,
    /// Relative change between halves that counts as a trend
    pub trend_change: f64,
    /// Minimum transactions for trend and predictability
    pub min_transactions: usize,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            daily_max_gap_days: 2.0,
            weekly_max_gap_days: 10.0,
            monthly_max_gap_days: 35.0,
            trend_change: 0.10,
            min_transactions: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyConfig {
    pub min_transactions: usize,
    pub z_threshold: f64,
    /// Above this z-score the suggested action asks to verify the charge
    pub severe_z: f64,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            min_transactions: 3,
            z_threshold: 2.0,
            severe_z: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    pub breach_percent: f64,
    pub approaching_percent: f64,
    /// Occurrences of an identical (description, amount) pair to call it recurring
    pub min_recurring: usize,
    pub goal_behind_progress: f64,
    pub goal_behind_days: i64,
    pub goal_urgent_days: i64,
    pub goal_almost_progress: f64,
    /// Share of total expenses above which a category is a cost-reduction candidate
    pub cost_share_percent: f64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            breach_percent: 100.0,
            approaching_percent: 90.0,
            min_recurring: 2,
            goal_behind_progress: 50.0,
            goal_behind_days: 90,
            goal_urgent_days: 30,
            goal_almost_progress: 80.0,
            cost_share_percent: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub creep_threshold: f64,
    pub creep_high_threshold: f64,
    pub creep_window_months: u32,
    pub creep_confidence: f64,
    pub surplus_confidence: f64,
    pub deficit_confidence: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            creep_threshold: 0.15,
            creep_high_threshold: 0.25,
            creep_window_months: 3,
            creep_confidence: 0.8,
            surplus_confidence: 0.7,
            deficit_confidence: 0.8,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub income_category: String,
    pub default_category: Option<String>,
    pub max_transactions: Option<usize>,
    pub classifier: ClassifierConfig,
    pub patterns: PatternConfig,
    pub anomalies: AnomalyConfig,
    pub insights: InsightConfig,
    pub forecast: ForecastConfig,
    pub categories: Vec<CategoryKeywords>,
    pub synonyms: HashMap<String, String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            income_category: "Income".to_string(),
            default_category: None,
            max_transactions: None,
            classifier: ClassifierConfig::default(),
            patterns: PatternConfig::default(),
            anomalies: AnomalyConfig::default(),
            insights: InsightConfig::default(),
            forecast: ForecastConfig::default(),
            categories: Vec::new(),
            synonyms: HashMap::new(),
        }
    }
}

impl EngineConfig {
    /// Embedded defaults, including the shipped keyword and synonym tables
    pub fn builtin() -> Self {
        parse_config(DEFAULT_CONFIG).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Embedded config is invalid, using bare defaults");
            Self::default()
        })
    }

    /// Load from the override location if present, else the embedded defaults
    pub fn load() -> Result<Self> {
        load_config(None)
    }

    /// Load from an explicit path, which must exist
    pub fn from_path(path: &Path) -> Result<Self> {
        load_config(Some(path))
    }

    /// Parse an override from TOML content, layered onto the embedded defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }

    /// Whether `name` is the income bucket
    pub fn is_income_category(&self, name: &str) -> bool {
        name.eq_ignore_ascii_case(&self.income_category)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("pitstop").join("config").join("engine.toml"))
}

/// Load configuration (override first, then default)
///
/// An explicit path must exist. The data-dir override is optional.
fn load_config(explicit_path: Option<&Path>) -> Result<EngineConfig> {
    let path = match explicit_path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().filter(|p| p.exists()),
    };

    match path {
        Some(p) => {
            tracing::debug!(path = %p.display(), "Loading engine config override");
            parse_config(&fs::read_to_string(&p)?)
        }
        None => parse_config(""),
    }
}

/// Merge `overrides` into `base`, recursing into tables present in both
fn merge_tables(base: &mut toml::Table, overrides: toml::Table) {
    for (key, value) in overrides {
        match value {
            toml::Value::Table(nested) if matches!(base.get(&key), Some(toml::Value::Table(_))) => {
                if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
                    merge_tables(existing, nested);
                }
            }
            value => {
                base.insert(key, value);
            }
        }
    }
}

/// Parse an override on top of the embedded defaults and validate the result
fn parse_config(content: &str) -> Result<EngineConfig> {
    let mut table: toml::Table = toml::from_str(DEFAULT_CONFIG)?;
    merge_tables(&mut table, toml::from_str(content)?);
    let mut config = EngineConfig::deserialize(toml::Value::Table(table))?;

    // Keyword matching is case-insensitive; store the table lowercased once
    for entry in &mut config.categories {
        entry.keywords = entry
            .keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
    }
    config.synonyms = config
        .synonyms
        .into_iter()
        .map(|(k, v)| (k.trim().to_lowercase(), v))
        .collect();

    validate(&config)?;
    Ok(config)
}

fn validate(config: &EngineConfig) -> Result<()> {
    let ratios = [
        ("classifier.lexical_min_confidence", config.classifier.lexical_min_confidence),
        ("classifier.description_similarity", config.classifier.description_similarity),
        ("classifier.amount_similarity", config.classifier.amount_similarity),
        ("classifier.fallback_confidence", config.classifier.fallback_confidence),
        ("classifier.recategorize_below", config.classifier.recategorize_below),
        ("forecast.creep_confidence", config.forecast.creep_confidence),
        ("forecast.surplus_confidence", config.forecast.surplus_confidence),
        ("forecast.deficit_confidence", config.forecast.deficit_confidence),
    ];
    for (key, value) in ratios {
        if !(0.0..=1.0).contains(&value) {
            return Err(Error::Config(format!("{} must be within [0, 1], got {}", key, value)));
        }
    }

    if config.forecast.creep_window_months == 0 {
        return Err(Error::Config(
            "forecast.creep_window_months must be at least 1".to_string(),
        ));
    }
    if config.anomalies.z_threshold <= 0.0 {
        return Err(Error::Config(
            "anomalies.z_threshold must be positive".to_string(),
        ));
    }

    for entry in &config.categories {
        if entry.name.trim().is_empty() {
            return Err(Error::Config("category keyword entry without a name".to_string()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_default_config() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.income_category, "Income");
        assert_eq!(config.classifier, ClassifierConfig::default());
        assert_eq!(config.anomalies, AnomalyConfig::default());

        let names: Vec<&str> = config.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Housing", "Food", "Transport", "Entertainment", "Health", "Education"]
        );
        assert_eq!(config.synonyms.get("fuel").map(String::as_str), Some("Transport"));
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = EngineConfig::from_toml(
            r#"
            [anomalies]
            z_threshold = 2.5
            "#,
        )
        .unwrap();

        assert_eq!(config.anomalies.z_threshold, 2.5);
        assert_eq!(config.anomalies.severe_z, 3.0);
        assert_eq!(config.forecast, ForecastConfig::default());
        assert_eq!(config.categories, EngineConfig::builtin().categories);
        assert_eq!(config.synonyms.get("fuel").map(String::as_str), Some("Transport"));
    }

    #[test]
    fn test_override_tables_merge_and_arrays_replace() {
        let config = EngineConfig::from_toml(
            r#"
            [synonyms]
            petrol = "Transport"

            [[categories]]
            name = "Food"
            keywords = ["deli"]
            "#,
        )
        .unwrap();

        assert_eq!(config.synonyms.get("petrol").map(String::as_str), Some("Transport"));
        assert_eq!(config.synonyms.get("fuel").map(String::as_str), Some("Transport"));
        assert_eq!(config.categories.len(), 1);

        let cleared = EngineConfig::from_toml("categories = []").unwrap();
        assert!(cleared.categories.is_empty());
    }

    #[test]
    fn test_keywords_are_lowercased() {
        let config = EngineConfig::from_toml(
            r#"
            [[categories]]
            name = "Food"
            keywords = ["SuperMarket", "  ", "Deli "]
            "#,
        )
        .unwrap();

        assert_eq!(config.categories[0].keywords, vec!["supermarket", "deli"]);
    }

    #[test]
    fn test_rejects_out_of_range_ratio() {
        let err = EngineConfig::from_toml(
            r#"
            [classifier]
            amount_similarity = 1.5
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rejects_invalid_toml() {
        let err = EngineConfig::from_toml("income_category = [").unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
    }

    #[test]
    fn test_from_path_reads_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "income_category = \"Salary\"").unwrap();

        let config = EngineConfig::from_path(file.path()).unwrap();
        assert_eq!(config.income_category, "Salary");
        assert!(config.is_income_category("salary"));
    }

    #[test]
    fn test_from_missing_path_is_an_error() {
        let err = EngineConfig::from_path(Path::new("/nonexistent/engine.toml")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_empty_override_is_builtin() {
        assert_eq!(EngineConfig::from_toml("").unwrap(), EngineConfig::builtin());
    }
}
