//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables: `SCAFFAI_<SECTION>__<KEY>`, e.g.
//!    `SCAFFAI_TEMPLATES__BASE_URL`
//! 3. Config files: `--config FILE` alone, or else the user file
//!    ([`AppConfig::config_path`]) overlaid by `./.scaffai.toml`
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use scaffai_adapters::LoaderConfig;
use scaffai_core::application::CompilerOptions;

/// Project-local config file name.
pub const LOCAL_CONFIG_FILE: &str = ".scaffai.toml";

const ENV_PREFIX: &str = "SCAFFAI";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub templates: TemplateConfig,
    pub compiler: CompilerConfig,
    pub output: OutputConfig,
}

/// `[templates]`: where templates come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Remote catalog root; remote loading is skipped when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Keep going with builtin templates when a source fails.
    pub fallback_mode: bool,
    pub local_dirs: Vec<PathBuf>,
    /// `0` disables the timeout.
    pub request_timeout_secs: u64,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        let loader = LoaderConfig::default();
        Self {
            base_url: loader.base_url,
            api_key: loader.api_key,
            fallback_mode: loader.fallback_mode,
            local_dirs: loader.local_dirs,
            request_timeout_secs: loader.request_timeout_secs,
        }
    }
}

/// `[compiler]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub cache_enabled: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            cache_enabled: CompilerOptions::default().cache_enabled,
        }
    }
}

/// `[output]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "human".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment on top of defaults.
    ///
    /// An explicit `config_file` must exist; the implicit user and project
    /// files are optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let mut builder = Config::builder();

        builder = match config_file {
            Some(path) => builder.add_source(toml_file(path).required(true)),
            None => builder
                .add_source(toml_file(&Self::config_path()).required(false))
                .add_source(toml_file(Path::new(LOCAL_CONFIG_FILE)).required(false)),
        };

        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("templates.local_dirs"),
            )
            .build()
            .context("failed to read configuration sources")?;

        settings
            .try_deserialize()
            .context("configuration has invalid values")
    }

    /// Path to the user configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.scaffai.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "scaffai", "scaffai")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    pub fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            base_url: self.templates.base_url.clone(),
            api_key: self.templates.api_key.clone(),
            fallback_mode: self.templates.fallback_mode,
            local_dirs: self.templates.local_dirs.clone(),
            request_timeout_secs: self.templates.request_timeout_secs,
        }
    }

    pub fn compiler_options(&self) -> CompilerOptions {
        CompilerOptions {
            cache_enabled: self.compiler.cache_enabled,
        }
    }

    /// Copy with secrets masked, for display.
    pub fn redacted(&self) -> Self {
        let mut shown = self.clone();
        if shown.templates.api_key.is_some() {
            shown.templates.api_key = Some("********".into());
        }
        shown
    }
}

fn toml_file(path: &Path) -> File<config::FileSourceFile, FileFormat> {
    File::from(path).format(FileFormat::Toml)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_loader_and_compiler() {
        let cfg = AppConfig::default();
        assert!(cfg.templates.fallback_mode);
        assert_eq!(cfg.templates.request_timeout_secs, 30);
        assert!(cfg.compiler.cache_enabled);
        assert!(!cfg.output.no_color);
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.toml");
        std::fs::write(
            &path,
            "[templates]\nbase_url = \"https://templates.example.com\"\nfallback_mode = false\n\n\
             [compiler]\ncache_enabled = false\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(
            cfg.templates.base_url.as_deref(),
            Some("https://templates.example.com")
        );
        assert!(!cfg.templates.fallback_mode);
        assert!(!cfg.compiler_options().cache_enabled);
        // untouched keys keep their defaults
        assert_eq!(cfg.templates.request_timeout_secs, 30);
    }

    #[test]
    fn missing_explicit_file_is_error() {
        let path = PathBuf::from("/definitely/not/here/scaffai.toml");
        assert!(AppConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn loader_config_carries_template_section() {
        let mut cfg = AppConfig::default();
        cfg.templates.api_key = Some("k".into());
        cfg.templates.local_dirs = vec![PathBuf::from("tpl")];

        let loader = cfg.loader_config();
        assert_eq!(loader.api_key.as_deref(), Some("k"));
        assert_eq!(loader.local_dirs, vec![PathBuf::from("tpl")]);
    }

    #[test]
    fn redacted_masks_api_key() {
        let mut cfg = AppConfig::default();
        cfg.templates.api_key = Some("secret".into());
        assert_eq!(cfg.redacted().templates.api_key.as_deref(), Some("********"));
        assert!(AppConfig::default().redacted().templates.api_key.is_none());
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
