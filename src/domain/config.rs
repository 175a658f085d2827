use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};

use crate::domain::Author;

/// Configuration for a board session.
///
/// Controls the simulated network delay, how votes feed into scores, the
/// identity used for the local viewer, and where seed data comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Milliseconds the simulated backend waits before completing a submit,
    /// login or register action.
    submit_delay_ms: u64,

    /// Whether casting a vote adjusts the target's aggregate score.
    ///
    /// When `false`, only the viewer's vote state changes and scores stay as
    /// seeded.
    pub tally_votes: bool,

    /// Display name of the local viewer.
    viewer_name: String,

    /// Reputation shown for the local viewer.
    viewer_reputation: u32,

    /// Optional YAML or JSON fixture file replacing the built-in seed data.
    pub fixtures: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            submit_delay_ms: default_submit_delay_ms(),
            tally_votes: true,
            viewer_name: default_viewer_name(),
            viewer_reputation: default_viewer_reputation(),
            fixtures: None,
        }
    }
}

/// Errors raised while reading or writing a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("Failed to access config file {path}: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
    /// The file is not valid configuration TOML.
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// The configuration could not be serialised.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Loads the configuration if the file exists, otherwise returns the
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The simulated network delay.
    #[must_use]
    pub const fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    /// Sets the simulated network delay.
    pub fn set_submit_delay(&mut self, delay: Duration) {
        self.submit_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
    }

    /// The author recorded on answers and questions posted by the viewer.
    #[must_use]
    pub fn viewer(&self) -> Author {
        Author::new(self.viewer_name.clone(), self.viewer_reputation)
    }
}

const fn default_submit_delay_ms() -> u64 {
    1500
}

fn default_viewer_name() -> String {
    "You".to_string()
}

const fn default_viewer_reputation() -> u32 {
    500
}

const fn default_tally_votes() -> bool {
    true
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_submit_delay_ms")]
        submit_delay_ms: u64,

        #[serde(default = "default_tally_votes")]
        tally_votes: bool,

        #[serde(default = "default_viewer_name")]
        viewer_name: String,

        #[serde(default = "default_viewer_reputation")]
        viewer_reputation: u32,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        fixtures: Option<PathBuf>,
    },
}

impl From<Versions> for super::Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                submit_delay_ms,
                tally_votes,
                viewer_name,
                viewer_reputation,
                fixtures,
            } => Self {
                submit_delay_ms,
                tally_votes,
                viewer_name,
                viewer_reputation,
                fixtures,
            },
        }
    }
}

impl From<super::Config> for Versions {
    fn from(config: super::Config) -> Self {
        Self::V1 {
            submit_delay_ms: config.submit_delay_ms,
            tally_votes: config.tally_votes,
            viewer_name: config.viewer_name,
            viewer_reputation: config.viewer_reputation,
            fixtures: config.fixtures,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\nsubmit_delay_ms = 10\ntally_votes = false\nviewer_name = \"Ada\"\nviewer_reputation = 42\nfixtures = \"seed.yaml\"\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.submit_delay(), Duration::from_millis(10));
        assert!(!config.tally_votes);
        assert_eq!(config.viewer(), Author::new("Ada", 42));
        assert_eq!(config.fixtures, Some(PathBuf::from("seed.yaml")));
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.to_string().starts_with("Failed to access config file"));
    }

    #[test]
    fn load_or_default_tolerates_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        assert_eq!(Config::load_or_default(&missing).unwrap(), Config::default());
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\nsubmit_delay_ms = \"slow\"\n")
            .unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.to_string().starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        // Deserialising a file with only the version tag yields the defaults.
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn save_then_load_keeps_settings() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("qa.toml");
        let mut config = Config::default();
        config.set_submit_delay(Duration::from_millis(250));
        config.tally_votes = false;

        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
