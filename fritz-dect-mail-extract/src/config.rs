use config::{Config, ConfigError, Environment, File};
use extractors::AttachmentClassifier;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub imap: ImapConfig,
    pub extract: ExtractConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ImapConfig {
    /// Used when the server address carries no `:port` suffix.
    pub port: u16,
    pub mailbox: String,
}

impl Default for ImapConfig {
    fn default() -> Self {
        Self {
            port: 993,
            mailbox: "INBOX".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ExtractConfig {
    pub subject_marker: String,
    pub temperature_prefix: String,
    pub energy_prefix: String,
    pub combined_file_name: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            subject_marker: "FRITZ!DECT".to_string(),
            temperature_prefix: "ha_temp".to_string(),
            energy_prefix: "ha_stat".to_string(),
            combined_file_name: "combined.csv".to_string(),
        }
    }
}

impl ExtractConfig {
    pub fn classifier(&self) -> AttachmentClassifier {
        AttachmentClassifier::new(&self.temperature_prefix, &self.energy_prefix)
    }
}

impl AppConfig {
    /// Loads the config file if present, then applies `FRITZ_DECT_CONFIG_*`
    /// environment overrides (e.g. `FRITZ_DECT_CONFIG_IMAP__PORT=143`).
    ///
    /// An explicitly given path must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<(Self, PathBuf), ConfigError> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(get_config_path);

        let builder = Config::builder()
            .add_source(File::from(config_path.clone()).required(path.is_some()))
            .add_source(
                Environment::with_prefix("FRITZ_DECT_CONFIG")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = builder.try_deserialize()?;

        Ok((config, config_path))
    }
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("fritz-dect-mail-extract").join("config.toml")
    } else {
        PathBuf::from("fritz-dect-mail-extract.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.imap.port, 993);
        assert_eq!(config.imap.mailbox, "INBOX");
        assert_eq!(config.extract.subject_marker, "FRITZ!DECT");
        assert_eq!(config.extract.combined_file_name, "combined.csv");
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[imap]
port = 1993

[extract]
energy_prefix = "energy_"
"#,
        )
        .unwrap();

        let (config, loaded_from) = AppConfig::load(Some(&path)).unwrap();

        assert_eq!(loaded_from, path);
        assert_eq!(config.imap.port, 1993);
        assert_eq!(config.imap.mailbox, "INBOX");
        assert_eq!(config.extract.energy_prefix, "energy_");
        assert_eq!(config.extract.temperature_prefix, "ha_temp");
    }

    #[test]
    fn test_environment_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[extract]\ncombined_file_name = \"from-file.csv\"\n").unwrap();

        std::env::set_var("FRITZ_DECT_CONFIG_EXTRACT__COMBINED_FILE_NAME", "override.csv");
        let loaded = AppConfig::load(Some(&path));
        std::env::remove_var("FRITZ_DECT_CONFIG_EXTRACT__COMBINED_FILE_NAME");

        let (config, _) = loaded.unwrap();
        assert_eq!(config.extract.combined_file_name, "override.csv");
        assert_eq!(config.extract.subject_marker, "FRITZ!DECT");
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        assert!(AppConfig::load(Some(&path)).is_err());
    }
}
