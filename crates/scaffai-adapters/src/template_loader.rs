//! Template loading from builtin, local and remote sources.
//!
//! # Sources
//!
//! | Source | Method | I/O |
//! |--------|--------|-----|
//! | builtin | [`TemplateLoader::load_builtin`] | none, always succeeds |
//! | local file | [`TemplateLoader::load_local`] | `tokio::fs` |
//! | local directory | [`TemplateLoader::load_local_dir`] | `tokio::fs` |
//! | remote catalog | [`TemplateLoader::load_remote_list`], [`TemplateLoader::load_remote`] | `reqwest` |
//!
//! # Remote catalog
//!
//! ```text
//! GET {base_url}/templates        -> [{ "id", "name", "version" }, ...]
//! GET {base_url}/templates/{id}   -> Template JSON
//! ```
//!
//! When `api_key` is configured every request carries
//! `Authorization: Bearer <key>`.
//!
//! Every definition, local or remote, goes through
//! [`DomainValidator::template_from_value`] before it is returned.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, instrument};
use url::Url;

use scaffai_core::{
    application::ApplicationError,
    domain::{DomainValidator, Template},
    error::{ScaffaiError, ScaffaiResult},
};

use crate::builtin_templates;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Loader settings, usually derived from the CLI's `[templates]` config section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Remote catalog root. Remote loading is skipped when unset.
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    /// Swallow local/remote failures and keep the builtin set.
    pub fallback_mode: bool,
    /// Directories of `*.json` template definitions, loaded after builtins.
    pub local_dirs: Vec<PathBuf>,
    /// Per-request timeout; `0` disables it.
    pub request_timeout_secs: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            fallback_mode: true,
            local_dirs: Vec::new(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// One entry of the remote catalog listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteTemplateSummary {
    pub id: String,
    pub name: String,
    pub version: String,
}

/// Outcome of a batch load: what loaded, and why the rest did not.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub templates: Vec<Template>,
    pub failures: Vec<ScaffaiError>,
}

/// Transport-level failures; all surface as `RemoteUnavailable`.
#[derive(Debug, Error)]
enum FetchError {
    #[error("no remote base URL configured")]
    NotConfigured,

    #[error("invalid base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request to {url} failed: {source}")]
    Request {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status {
        url: Url,
        status: reqwest::StatusCode,
    },

    #[error("invalid JSON from {url}: {source}")]
    Decode {
        url: Url,
        #[source]
        source: reqwest::Error,
    },
}

impl From<FetchError> for ScaffaiError {
    fn from(e: FetchError) -> Self {
        ApplicationError::RemoteUnavailable {
            reason: e.to_string(),
        }
        .into()
    }
}

pub struct TemplateLoader {
    config: LoaderConfig,
    client: reqwest::Client,
}

impl TemplateLoader {
    pub fn new(config: LoaderConfig) -> Self {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("scaffai/", env!("CARGO_PKG_VERSION")));
        if config.request_timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.request_timeout_secs));
        }

        Self {
            client: builder.build().unwrap_or_else(|_| reqwest::Client::new()),
            config,
        }
    }

    /// The hard-coded builtin set.
    pub fn load_builtin(&self) -> ScaffaiResult<Vec<Template>> {
        Ok(builtin_templates::all_templates()?)
    }

    /// Load and validate one JSON template definition.
    ///
    /// # Errors
    ///
    /// `TemplateLoad` if the file cannot be read, is not JSON, or fails
    /// validation; the reason names the offending field.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn load_local(&self, path: &Path) -> ScaffaiResult<Template> {
        let load_error = |reason: String| ApplicationError::TemplateLoad {
            source_name: path.display().to_string(),
            reason,
        };

        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| load_error(e.to_string()))?;
        let candidate: Value =
            serde_json::from_str(&raw).map_err(|e| load_error(format!("invalid JSON: {e}")))?;
        let template = DomainValidator::template_from_value(candidate)
            .map_err(|e| load_error(e.to_string()))?;

        debug!(id = %template.id, "loaded local template");
        Ok(template)
    }

    /// Load every `*.json` file in `dir`, in file-name order.
    ///
    /// A bad file does not stop the batch; it is returned in
    /// [`LoadReport::failures`] for the caller to judge. Only an unreadable
    /// directory fails outright.
    #[instrument(skip(self), fields(dir = %dir.display()))]
    pub async fn load_local_dir(&self, dir: &Path) -> ScaffaiResult<LoadReport> {
        let dir_error = |e: std::io::Error| ApplicationError::TemplateLoad {
            source_name: dir.display().to_string(),
            reason: format!("failed to read templates directory: {e}"),
        };

        let mut entries = tokio::fs::read_dir(dir).await.map_err(dir_error)?;
        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(dir_error)? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut report = LoadReport::default();
        for path in paths {
            match self.load_local(&path).await {
                Ok(template) => report.templates.push(template),
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "template file failed to load");
                    report.failures.push(e);
                }
            }
        }

        info!(
            count = report.templates.len(),
            failed = report.failures.len(),
            "loaded local templates"
        );
        Ok(report)
    }

    /// `GET {base_url}/templates`.
    #[instrument(skip(self))]
    pub async fn load_remote_list(&self) -> ScaffaiResult<Vec<RemoteTemplateSummary>> {
        let url = self.catalog_url(&["templates"])?;
        let list: Vec<RemoteTemplateSummary> = self.get_json(url).await?;
        debug!(count = list.len(), "fetched remote catalog");
        Ok(list)
    }

    /// `GET {base_url}/templates/{id}`, validated like a local definition.
    #[instrument(skip(self))]
    pub async fn load_remote(&self, id: &str) -> ScaffaiResult<Template> {
        let url = self.catalog_url(&["templates", id])?;
        let candidate: Value = self.get_json(url.clone()).await?;

        let template = DomainValidator::template_from_value(candidate).map_err(|e| {
            ApplicationError::TemplateLoad {
                source_name: url.to_string(),
                reason: e.to_string(),
            }
        })?;

        debug!(id = %template.id, "loaded remote template");
        Ok(template)
    }

    /// Fetch the listing, then each template. A failing listing is an error;
    /// per-template failures land in [`LoadReport::failures`].
    #[instrument(skip(self))]
    pub async fn load_remote_all(&self) -> ScaffaiResult<LoadReport> {
        let summaries = self.load_remote_list().await?;

        let mut report = LoadReport::default();
        for summary in summaries {
            match self.load_remote(&summary.id).await {
                Ok(template) => report.templates.push(template),
                Err(e) => {
                    debug!(id = %summary.id, error = %e, "remote template failed to load");
                    report.failures.push(e);
                }
            }
        }

        info!(
            count = report.templates.len(),
            failed = report.failures.len(),
            "loaded remote templates"
        );
        Ok(report)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn catalog_url(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let raw = self
            .config
            .base_url
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(FetchError::NotConfigured)?;
        let base = Url::parse(raw).map_err(|e| FetchError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;
        build_url(&base, segments)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        let mut request = self.client.get(url.clone());
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status(),
                url,
            });
        }

        response
            .json()
            .await
            .map_err(|source| FetchError::Decode { url, source })
    }
}

/// Append path segments to `base`, preserving its query string.
fn build_url(base: &Url, segments: &[&str]) -> Result<Url, FetchError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| FetchError::InvalidUrl {
            url: base.to_string(),
            reason: "URL cannot have path segments".into(),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
