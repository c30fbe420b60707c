//! Configuration management: TOML settings file plus environment overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::nlp::PipelineConfig;

/// Settings file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "parse-report.toml";

/// Sentences processed when the settings file does not list any.
pub const DEFAULT_SENTENCES: &[&str] = &[
    "As she walked past it, the driver's glass started to open.",
    "With a handkerchief she wiped the sweat from her forehead.",
    "Prudently, they had diversified into banking and insurance, and as a result their influence was felt at the highest level.",
    "The arranged marriage would be the social event of the following year.",
    "When at last she spoke, her words were heavy and disjointed.",
    "The road to the coast was busy with traffic in both directions.",
    "The expected date came and went.",
    "She sighed at the irony of it all, the waste of it all.",
    "All through August the rain hardly stopped.",
    "Thank the gods he didn't have to know of this.",
];

/// Errors from loading or validating settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Run settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Input sentences, processed in order
    #[serde(default = "default_sentences")]
    pub sentences: Vec<String>,
    /// Pre-computed tagging output, one line per sentence
    #[serde(default = "default_side_file")]
    pub side_file: PathBuf,
    /// Report file (overwritten on every run)
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// CoreNLP pipeline
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

fn default_sentences() -> Vec<String> {
    DEFAULT_SENTENCES.iter().map(|s| s.to_string()).collect()
}

fn default_side_file() -> PathBuf {
    PathBuf::from("stanza_output.txt")
}

fn default_output() -> PathBuf {
    PathBuf::from("corenlp_output.txt")
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sentences: default_sentences(),
            side_file: default_side_file(),
            output: default_output(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply environment variable overrides (see `PipelineConfig::with_env_overrides`).
    pub fn with_env_overrides(mut self) -> Self {
        self.pipeline = self.pipeline.with_env_overrides();
        self
    }

    /// Reject settings that cannot produce a report.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sentences.is_empty() {
            return Err(ConfigError::Invalid("no sentences configured".to_string()));
        }
        if self.pipeline.annotators.is_empty() {
            return Err(ConfigError::Invalid(
                "pipeline.annotators must not be empty".to_string(),
            ));
        }
        if self.pipeline.threads == 0 {
            return Err(ConfigError::Invalid(
                "pipeline.threads must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load settings.
///
/// An explicit `path` must exist. Without one, `parse-report.toml` in the
/// working directory is used when present, otherwise built-in defaults.
/// Environment overrides are applied last.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let settings = match path {
        Some(path) => read_settings(path)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                read_settings(default_path)?
            } else {
                debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                Settings::default()
            }
        }
    };

    Ok(settings.with_env_overrides())
}

fn read_settings(path: &Path) -> Result<Settings, ConfigError> {
    info!("Loading settings from {}", path.display());
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Settings::from_toml(&text, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_reproduce_original_run() {
        let settings = Settings::default();
        assert_eq!(settings.sentences.len(), 10);
        assert_eq!(
            settings.sentences[9],
            "Thank the gods he didn't have to know of this."
        );
        assert_eq!(settings.side_file, PathBuf::from("stanza_output.txt"));
        assert_eq!(settings.output, PathBuf::from("corenlp_output.txt"));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_from_toml() {
        let text = r#"
            sentences = ["The road was busy.", "It rained."]
            output = "out/report.txt"

            [pipeline]
            endpoint = "http://nlp:9000"
            threads = 8
        "#;
        let settings = Settings::from_toml(text, Path::new("test.toml")).unwrap();
        assert_eq!(settings.sentences.len(), 2);
        assert_eq!(settings.output, PathBuf::from("out/report.txt"));
        assert_eq!(settings.side_file, PathBuf::from("stanza_output.txt"));
        assert_eq!(settings.pipeline.endpoint, "http://nlp:9000");
        assert_eq!(settings.pipeline.threads, 8);
        assert_eq!(settings.pipeline.parse_maxlen, 120);
    }

    #[test]
    fn test_invalid_toml_names_file() {
        let err = Settings::from_toml("sentences = 3", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_validate_rejects_empty_inputs() {
        let mut settings = Settings::default();
        settings.sentences.clear();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.pipeline.annotators.clear();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.pipeline.threads = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_explicit_missing_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_settings(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_load_explicit_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.toml");
        std::fs::write(&path, "sentences = [\"One.\"]\nside_file = \"tags.txt\"\n").unwrap();
        let settings = load_settings(Some(&path)).unwrap();
        assert_eq!(settings.sentences, vec!["One."]);
        assert_eq!(settings.side_file, PathBuf::from("tags.txt"));
    }
}
