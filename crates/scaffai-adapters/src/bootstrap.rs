//! Builds a ready-to-use [`TemplateManager`].
//!
//! Load order: builtins (never fail), then each configured local directory,
//! then the remote catalog when a base URL is set. A failure is either a whole
//! source (unreadable directory, unreachable catalog) or a single template in
//! it. With `fallback_mode` on, both kinds are logged and reported through
//! [`InitOutcome::Degraded`]; with it off, the first one is returned.

use tracing::{info, instrument, warn};

use scaffai_core::{
    application::{CompilerOptions, InitOutcome, TemplateManager},
    error::{ScaffaiError, ScaffaiResult},
};

use crate::{
    template_loader::{LoadReport, LoaderConfig, TemplateLoader},
    template_store::InMemoryStore,
};

#[instrument(
    skip_all,
    fields(
        remote = config.base_url.is_some(),
        local_dirs = config.local_dirs.len(),
        fallback = config.fallback_mode
    )
)]
pub async fn initialize(
    config: &LoaderConfig,
    options: CompilerOptions,
) -> ScaffaiResult<(TemplateManager, InitOutcome)> {
    let loader = TemplateLoader::new(config.clone());
    let manager = TemplateManager::new(Box::new(InMemoryStore::new()), options);

    let builtin = manager.register_all(loader.load_builtin()?)?;
    let mut failures = Vec::new();

    let mut local = 0;
    for dir in &config.local_dirs {
        let loaded = loader.load_local_dir(dir).await;
        local += absorb(&manager, config, "local", loaded, &mut failures)?;
    }

    let mut remote = 0;
    if config.base_url.is_some() {
        let loaded = loader.load_remote_all().await;
        remote = absorb(&manager, config, "remote", loaded, &mut failures)?;
    }

    let outcome = if failures.is_empty() {
        InitOutcome::Complete {
            builtin,
            local,
            remote,
        }
    } else {
        InitOutcome::Degraded {
            builtin,
            local,
            remote,
            reason: failures.join("; "),
        }
    };

    info!(
        builtin,
        local,
        remote,
        degraded = outcome.is_degraded(),
        "template manager initialized"
    );
    Ok((manager, outcome))
}

/// Register what a batch loaded and run every failure, whole-batch or
/// per-template, through [`tolerate`]. Returns the number registered.
fn absorb(
    manager: &TemplateManager,
    config: &LoaderConfig,
    source: &str,
    loaded: ScaffaiResult<LoadReport>,
    failures: &mut Vec<String>,
) -> ScaffaiResult<usize> {
    let report = match loaded {
        Ok(report) => report,
        Err(e) => {
            failures.push(tolerate(config, source, e)?);
            return Ok(0);
        }
    };

    for error in report.failures {
        failures.push(tolerate(config, source, error)?);
    }

    match manager.register_all(report.templates) {
        Ok(count) => Ok(count),
        Err(e) => {
            failures.push(tolerate(config, source, e)?);
            Ok(0)
        }
    }
}

/// Swallow `error` in fallback mode, returning its message; propagate otherwise.
fn tolerate(config: &LoaderConfig, source: &str, error: ScaffaiError) -> ScaffaiResult<String> {
    if !config.fallback_mode {
        return Err(error);
    }
    warn!(source, error = %error, "template source failed, continuing with fallback");
    Ok(format!("{source}: {error}"))
}
