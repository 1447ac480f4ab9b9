use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default attachment size cap: 2 MiB, enforced before a file is read.
const DEFAULT_ATTACHMENT_LIMIT: u64 = 2 * 1024 * 1024;

/// Tool configuration, read from an optional `.mietlog.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Default path of the case file, used when `--file` is not given.
    pub data_file: Option<PathBuf>,

    /// Maximum attachment size in bytes. Files larger than this are
    /// rejected before they are read.
    pub attachment_limit: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: None,
            attachment_limit: DEFAULT_ATTACHMENT_LIMIT,
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content
    /// is invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized or the
    /// file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }
}

const fn default_attachment_limit() -> u64 {
    DEFAULT_ATTACHMENT_LIMIT
}

/// The serialized versions of the configuration. Allows the format and the
/// domain type to evolve independently without breaking existing files.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data_file: Option<PathBuf>,

        #[serde(default = "default_attachment_limit")]
        attachment_limit: u64,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                data_file,
                attachment_limit,
            } => Self {
                data_file,
                attachment_limit,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            data_file: config.data_file,
            attachment_limit: config.attachment_limit,
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
        file.write_all(b"_version = \"1\"\ndata_file = \"my-case.json\"\nattachment_limit = 1024\n")
            .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.data_file, Some(PathBuf::from("my-case.json")));
        assert_eq!(config.attachment_limit, 1024);
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn minimal_file_returns_defaults() {
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn save_and_load_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        let config = Config {
            data_file: Some(PathBuf::from("cases/home.json")),
            attachment_limit: 4096,
        };

        config.save(&path).unwrap();
        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
