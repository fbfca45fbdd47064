// Configuration loading and validation (config/analysis.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use courtvalue_core::columns::DeclaredColumns;
use courtvalue_core::efficiency::{RecordFilter, DEFAULT_MIN_MINUTES};
use courtvalue_core::matching::{MatchSettings, DEFAULT_FUZZY_THRESHOLD};
use courtvalue_core::similarity::SimilarityMetric;

pub const CONFIG_FILE: &str = "analysis.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("no config file and no defaults at {path}")]
    NoDefaults { path: PathBuf },

    #[error("failed to install default config at {path}: {source}")]
    InstallError {
        path: PathBuf,
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// analysis.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub efficiency: EfficiencyConfig,
    #[serde(default)]
    pub rollup: RollupConfig,
    #[serde(default)]
    pub synthetic: SyntheticConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

/// Where the datasets live. Overrides replace the default file name inside
/// `dir` for one dataset; `.csv` overrides are read as CSV.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub dir: String,
    pub per_game: Option<String>,
    pub advanced: Option<String>,
    pub player_salaries: Option<String>,
    pub team_salaries: Option<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: "nba_data".into(),
            per_game: None,
            advanced: None,
            player_salaries: None,
            team_salaries: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub fuzzy_threshold: f64,
    pub similarity: SimilarityMetric,
    pub salary_player_column: Option<String>,
    pub salary_value_column: Option<String>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            similarity: SimilarityMetric::Gestalt,
            salary_player_column: None,
            salary_value_column: None,
        }
    }
}

impl MatchingConfig {
    pub fn settings(&self) -> MatchSettings {
        MatchSettings {
            fuzzy_threshold: self.fuzzy_threshold,
            similarity: self.similarity,
        }
    }

    /// Declared salary columns, when both are configured.
    pub fn declared_columns(&self) -> Option<DeclaredColumns> {
        match (&self.salary_player_column, &self.salary_value_column) {
            (Some(player), Some(salary)) => Some(DeclaredColumns {
                player: player.clone(),
                salary: salary.clone(),
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EfficiencyConfig {
    pub metric: String,
    pub top_n: usize,
    pub min_minutes: f64,
    pub salary_min_millions: Option<f64>,
    pub salary_max_millions: Option<f64>,
}

impl Default for EfficiencyConfig {
    fn default() -> Self {
        Self {
            metric: "PER".into(),
            top_n: 20,
            min_minutes: DEFAULT_MIN_MINUTES,
            salary_min_millions: None,
            salary_max_millions: None,
        }
    }
}

impl EfficiencyConfig {
    /// A missing bound is open on that side.
    pub fn filter(&self) -> RecordFilter {
        let range = match (self.salary_min_millions, self.salary_max_millions) {
            (None, None) => None,
            (lo, hi) => Some((lo.unwrap_or(0.0), hi.unwrap_or(f64::INFINITY))),
        };
        RecordFilter {
            min_minutes: self.min_minutes,
            salary_range_millions: range,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RollupConfig {
    pub stats: Vec<String>,
}

impl Default for RollupConfig {
    fn default() -> Self {
        Self {
            stats: vec!["PTS".into(), "TRB".into(), "AST".into()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self { seed: 42 }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportConfig {
    pub ranking_csv: Option<String>,
    pub report_json: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/analysis.toml` relative to `base_dir`.
///
/// Does not copy defaults; `load_config()` does that first.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = std::fs::read_to_string(&path).map_err(|_| ConfigError::FileNotFound {
        path: path.clone(),
    })?;
    let config = parse_config(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;
    validate(&config)?;
    Ok(config)
}

pub fn parse_config(text: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(text)
}

/// Install `config/analysis.toml` from `defaults/analysis.toml` when it is
/// missing. Returns the installed path, or `None` when a config file was
/// already in place.
pub fn install_default_config(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.is_file() {
        return Ok(None);
    }
    let source = base_dir.join("defaults").join(CONFIG_FILE);
    if !source.is_file() {
        return Err(ConfigError::NoDefaults { path: source });
    }

    let install_err = |e| ConfigError::InstallError {
        path: target.clone(),
        source: e,
    };
    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(install_err)?;
    }
    std::fs::copy(&source, &target).map_err(install_err)?;
    info!("installed default config at {}", target.display());
    Ok(Some(target))
}

/// Load config relative to the current working directory, copying defaults
/// first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    install_default_config(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.data.dir.trim().is_empty() {
        return Err(invalid("data.dir", "must not be empty"));
    }

    let threshold = config.matching.fuzzy_threshold;
    if !(threshold > 0.0 && threshold <= 1.0) {
        return Err(invalid(
            "matching.fuzzy_threshold",
            format!("must be in (0, 1], got {threshold}"),
        ));
    }
    if config.matching.salary_player_column.is_some() != config.matching.salary_value_column.is_some() {
        return Err(invalid(
            "matching.salary_player_column",
            "salary_player_column and salary_value_column must be set together",
        ));
    }

    let eff = &config.efficiency;
    if eff.metric.trim().is_empty() {
        return Err(invalid("efficiency.metric", "must not be empty"));
    }
    if eff.top_n == 0 {
        return Err(invalid("efficiency.top_n", "must be > 0"));
    }
    if !eff.min_minutes.is_finite() || eff.min_minutes < 0.0 {
        return Err(invalid(
            "efficiency.min_minutes",
            format!("must be >= 0, got {}", eff.min_minutes),
        ));
    }
    for (field, bound) in [
        ("efficiency.salary_min_millions", eff.salary_min_millions),
        ("efficiency.salary_max_millions", eff.salary_max_millions),
    ] {
        if let Some(v) = bound {
            if !v.is_finite() || v < 0.0 {
                return Err(invalid(field, format!("must be >= 0, got {v}")));
            }
        }
    }
    if let (Some(lo), Some(hi)) = (eff.salary_min_millions, eff.salary_max_millions) {
        if lo > hi {
            return Err(invalid(
                "efficiency.salary_min_millions",
                format!("must not exceed salary_max_millions ({lo} > {hi})"),
            ));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn crate_root() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    }

    /// Fresh scratch directory holding a `config/analysis.toml` with `text`.
    fn scratch_with_config(name: &str, text: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("config").join(CONFIG_FILE), text).unwrap();
        tmp
    }

    fn expect_validation_field(result: Result<Config, ConfigError>, expected: &str) {
        match result {
            Err(ConfigError::ValidationError { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected validation error on {expected}, got {other:?}"),
        }
    }

    #[test]
    fn defaults_file_parses_and_validates() {
        let text = fs::read_to_string(crate_root().join("defaults").join(CONFIG_FILE)).unwrap();
        let config = parse_config(&text).expect("defaults parse");
        validate(&config).expect("defaults valid");

        assert_eq!(config.data.dir, "nba_data");
        assert!(config.data.player_salaries.is_none());
        assert!((config.matching.fuzzy_threshold - 0.8).abs() < f64::EPSILON);
        assert_eq!(config.matching.similarity, SimilarityMetric::Gestalt);
        assert!(config.matching.declared_columns().is_none());
        assert_eq!(config.efficiency.metric, "PER");
        assert_eq!(config.efficiency.top_n, 20);
        assert!((config.efficiency.min_minutes - 15.0).abs() < f64::EPSILON);
        assert_eq!(config.efficiency.filter().salary_range_millions, None);
        assert_eq!(config.rollup.stats, vec!["PTS", "TRB", "AST", "STL", "BLK"]);
        assert_eq!(config.synthetic.seed, 42);
        assert!(config.export.ranking_csv.is_none());
    }

    #[test]
    fn empty_file_uses_built_in_defaults() {
        let config = parse_config("").expect("empty parses");
        validate(&config).expect("built-in defaults valid");
        assert_eq!(config.efficiency.top_n, 20);
        assert_eq!(config.synthetic.seed, 42);
    }

    #[test]
    fn default_config_is_installed_once() {
        let tmp = std::env::temp_dir().join("courtvalue_config_install");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::copy(
            crate_root().join("defaults").join(CONFIG_FILE),
            tmp.join("defaults").join(CONFIG_FILE),
        )
        .unwrap();

        let installed = install_default_config(&tmp).unwrap();
        assert_eq!(installed, Some(tmp.join("config").join(CONFIG_FILE)));
        assert_eq!(load_config_from(&tmp).unwrap().efficiency.top_n, 20);

        // Local edits survive a second call.
        fs::write(tmp.join("config").join(CONFIG_FILE), "[efficiency]\ntop_n = 5\n").unwrap();
        assert_eq!(install_default_config(&tmp).unwrap(), None);
        assert_eq!(load_config_from(&tmp).unwrap().efficiency.top_n, 5);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn existing_config_needs_no_defaults() {
        let tmp = scratch_with_config("courtvalue_config_no_defaults", "");
        assert_eq!(install_default_config(&tmp).unwrap(), None);
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_defaults_and_config_is_an_error() {
        let tmp = std::env::temp_dir().join("courtvalue_config_nothing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        assert!(matches!(
            install_default_config(&tmp),
            Err(ConfigError::NoDefaults { .. })
        ));
        assert!(matches!(load_config_from(&tmp), Err(ConfigError::FileNotFound { .. })));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let tmp = scratch_with_config("courtvalue_config_bad_toml", "[efficiency\ntop_n = ");
        assert!(matches!(load_config_from(&tmp), Err(ConfigError::ParseError { .. })));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn unknown_similarity_is_a_parse_error() {
        assert!(parse_config("[matching]\nsimilarity = \"soundex\"\nfuzzy_threshold = 0.8\n").is_err());
    }

    // -- Validation --

    #[test]
    fn threshold_must_be_in_unit_interval() {
        for bad in ["0.0", "1.5", "-0.2"] {
            let tmp = scratch_with_config(
                "courtvalue_config_threshold",
                &format!("[matching]\nfuzzy_threshold = {bad}\nsimilarity = \"gestalt\"\n"),
            );
            expect_validation_field(load_config_from(&tmp), "matching.fuzzy_threshold");
            let _ = fs::remove_dir_all(&tmp);
        }
    }

    #[test]
    fn declared_columns_must_come_in_pairs() {
        let mut config = Config::default();
        config.matching.salary_player_column = Some("player_name".into());
        expect_validation_field(validate(&config).map(|_| config.clone()), "matching.salary_player_column");

        config.matching.salary_value_column = Some("current_salary".into());
        validate(&config).unwrap();
        let declared = config.matching.declared_columns().unwrap();
        assert_eq!(declared.salary, "current_salary");
    }

    #[test]
    fn efficiency_section_is_checked() {
        let mut config = Config::default();
        config.efficiency.top_n = 0;
        expect_validation_field(validate(&config).map(|_| config.clone()), "efficiency.top_n");

        let mut config = Config::default();
        config.efficiency.min_minutes = -1.0;
        expect_validation_field(validate(&config).map(|_| config.clone()), "efficiency.min_minutes");

        let mut config = Config::default();
        config.efficiency.salary_min_millions = Some(30.0);
        config.efficiency.salary_max_millions = Some(10.0);
        expect_validation_field(
            validate(&config).map(|_| config.clone()),
            "efficiency.salary_min_millions",
        );
    }

    #[test]
    fn half_open_salary_range() {
        let mut config = EfficiencyConfig::default();
        config.salary_max_millions = Some(25.0);
        assert_eq!(config.filter().salary_range_millions, Some((0.0, 25.0)));
    }
}
