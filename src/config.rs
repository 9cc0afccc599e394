use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Trending videos CSV
    pub data_path: PathBuf,
    /// Region passed to the category lookup
    pub region_code: String,
    /// SVG file every chart is drawn to
    pub output_path: PathBuf,
    /// Saved `videoCategories.list` response, used instead of the API when set
    pub category_file: Option<PathBuf>,
    pub width: u32,
    pub height: u32,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("trending_videos.csv"),
            region_code: "US".to_string(),
            output_path: PathBuf::from("output/chart.svg"),
            category_file: None,
            width: 1000,
            height: 700,
            logging: LoggingSection::default(),
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Config {
    fn validate(&mut self) -> anyhow::Result<()> {
        if self.width < 200 || self.height < 150 {
            bail!(
                "Chart size {}x{} is too small, use at least 200x150",
                self.width,
                self.height
            );
        }
        if self.region_code.len() != 2 || !self.region_code.chars().all(|c| c.is_ascii_alphabetic()) {
            bail!("region_code must be a two-letter code, got {:?}", self.region_code);
        }
        self.region_code = self.region_code.to_ascii_uppercase();
        Ok(())
    }
}

/// Load the configuration from `path`.
///
/// A missing file falls back to the defaults unless the path was asked for
/// explicitly.
pub fn load_config(path: &Path, explicit: bool) -> anyhow::Result<Config> {
    let mut config = if path.exists() || explicit {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str::<Config>(&config_str)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?
    } else {
        Config::default()
    };
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    fn write_config(body: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", body).unwrap();
        file
    }

    #[test]
    fn test_missing_default_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = load_config(&dir.path().join("config.toml"), false).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(load_config(&dir.path().join("custom.toml"), true).is_err());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let file = write_config(
            r#"
data_path = "data/videos.csv"
region_code = "gb"

[logging]
level = "debug"
"#,
        );
        let config = load_config(file.path(), true).unwrap();
        assert_eq!(config.data_path, PathBuf::from("data/videos.csv"));
        assert_eq!(config.region_code, "GB");
        assert_eq!(config.width, 1000);
        assert_eq!(config.output_path, PathBuf::from("output/chart.svg"));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, None);
    }

    #[test]
    fn test_rejects_small_chart() {
        let file = write_config("width = 100\nheight = 100\n");
        let err = load_config(file.path(), true).unwrap_err();
        assert!(err.to_string().contains("too small"));
    }

    #[test]
    fn test_rejects_bad_region() {
        let file = write_config("region_code = \"USA\"\n");
        assert!(load_config(file.path(), true).is_err());
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let file = write_config("width = \"wide\"\n");
        assert!(load_config(file.path(), true).is_err());
    }
}
