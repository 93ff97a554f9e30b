use anyhow::{bail, Context, Result};
use globset::Glob;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub synonyms: SynonymsConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_name_contains")]
    pub name_contains: String,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            name_contains: default_name_contains(),
            extension: default_extension(),
            delimiter: default_delimiter(),
            exclude_globs: Vec::new(),
        }
    }
}

impl CatalogConfig {
    /// The delimiter as a single byte. Validated by [`load_config`].
    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter.as_bytes().first().copied().unwrap_or(b',')
    }
}

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}
fn default_name_contains() -> String {
    "price".to_string()
}
fn default_extension() -> String {
    "csv".to_string()
}
fn default_delimiter() -> String {
    ",".to_string()
}

/// Extra header labels, appended to the built-in vocabulary.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SynonymsConfig {
    #[serde(default)]
    pub product: Vec<String>,
    #[serde(default)]
    pub price: Vec<String>,
    #[serde(default)]
    pub weight: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub renumber: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            title: default_title(),
            renumber: false,
        }
    }
}

fn default_output() -> PathBuf {
    PathBuf::from("my_output.html")
}
fn default_title() -> String {
    "Позиции продуктов".to_string()
}

/// Default config path used when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "./config/pm.toml";

/// Load the config at `path`, falling back to defaults when the default
/// path does not exist. An explicitly named file must exist.
pub fn load_config_or_default(path: &Path) -> Result<Config> {
    if path == Path::new(DEFAULT_CONFIG_PATH) && !path.exists() {
        return Ok(Config::default());
    }
    load_config(path)
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    // Validate catalog
    if config.catalog.name_contains.is_empty() {
        bail!("catalog.name_contains must not be empty");
    }
    if config.catalog.extension.trim_start_matches('.').is_empty() {
        bail!("catalog.extension must not be empty");
    }
    let delimiter = config.catalog.delimiter.as_bytes();
    if delimiter.len() != 1 || !delimiter[0].is_ascii() {
        bail!(
            "catalog.delimiter must be a single ASCII character, got '{}'",
            config.catalog.delimiter
        );
    }
    for pattern in &config.catalog.exclude_globs {
        Glob::new(pattern)
            .with_context(|| format!("catalog.exclude_globs: invalid pattern '{}'", pattern))?;
    }

    // Validate synonyms
    let synonyms = &config.synonyms;
    for (key, labels) in [
        ("product", &synonyms.product),
        ("price", &synonyms.price),
        ("weight", &synonyms.weight),
    ] {
        if labels.iter().any(|l| l.trim().is_empty()) {
            bail!("synonyms.{} must not contain empty labels", key);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("pm.toml");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn empty_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let cfg = load_config(&write_config(&tmp, "")).unwrap();
        assert_eq!(cfg.catalog.name_contains, "price");
        assert_eq!(cfg.catalog.extension, "csv");
        assert_eq!(cfg.catalog.delimiter_byte(), b',');
        assert_eq!(cfg.report.output, PathBuf::from("my_output.html"));
        assert!(!cfg.report.renumber);
    }

    #[test]
    fn sections_are_parsed() {
        let tmp = TempDir::new().unwrap();
        let cfg = load_config(&write_config(
            &tmp,
            r#"
[catalog]
directory = "/srv/prices"
delimiter = ";"
exclude_globs = ["*_old.csv"]

[synonyms]
product = ["product"]

[report]
renumber = true
title = "Prices"
"#,
        ))
        .unwrap();
        assert_eq!(cfg.catalog.directory, PathBuf::from("/srv/prices"));
        assert_eq!(cfg.catalog.delimiter_byte(), b';');
        assert_eq!(cfg.catalog.exclude_globs, vec!["*_old.csv".to_string()]);
        assert_eq!(cfg.synonyms.product, vec!["product".to_string()]);
        assert!(cfg.report.renumber);
        assert_eq!(cfg.report.title, "Prices");
    }

    #[test]
    fn rejects_multi_char_delimiter() {
        let tmp = TempDir::new().unwrap();
        let err = load_config(&write_config(&tmp, "[catalog]\ndelimiter = \";;\"\n")).unwrap_err();
        assert!(err.to_string().contains("catalog.delimiter"));
    }

    #[test]
    fn rejects_bad_glob() {
        let tmp = TempDir::new().unwrap();
        let err =
            load_config(&write_config(&tmp, "[catalog]\nexclude_globs = [\"a[\"]\n")).unwrap_err();
        assert!(err.to_string().contains("exclude_globs"));
    }

    #[test]
    fn rejects_empty_synonym() {
        let tmp = TempDir::new().unwrap();
        let err = load_config(&write_config(&tmp, "[synonyms]\nweight = [\" \"]\n")).unwrap_err();
        assert!(err.to_string().contains("synonyms.weight"));
    }

    #[test]
    fn missing_default_path_falls_back() {
        // Tests run from the crate root, which ships no config/pm.toml.
        let cfg = load_config_or_default(Path::new(DEFAULT_CONFIG_PATH)).unwrap();
        assert_eq!(cfg.catalog.directory, PathBuf::from("."));
    }

    #[test]
    fn missing_explicit_path_is_error() {
        let tmp = TempDir::new().unwrap();
        assert!(load_config_or_default(&tmp.path().join("nope.toml")).is_err());
    }
}
