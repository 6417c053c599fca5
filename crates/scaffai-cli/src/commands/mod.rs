//! Command handlers. Each module translates parsed arguments into calls on
//! the core services and renders the result; no template logic lives here.

pub mod compile;
pub mod completions;
pub mod config;
pub mod extract;
pub mod init;
pub mod list;
pub mod stats;

use tracing::debug;

use scaffai_core::application::{InitOutcome, TemplateManager};

use crate::{
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Build a [`TemplateManager`] from the configured template sources.
///
/// Bootstrap is async (remote catalog, local directory reads); the CLI is
/// not, so a single-threaded runtime drives it to completion here.
pub(crate) fn load_manager(config: &AppConfig, output: &OutputManager) -> CliResult<TemplateManager> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::IoError {
            message: "failed to start async runtime".into(),
            source: e,
        })?;

    let (manager, outcome) = runtime.block_on(scaffai_adapters::initialize(
        &config.loader_config(),
        config.compiler_options(),
    ))?;

    debug!(total = outcome.total(), "templates loaded");
    if let InitOutcome::Degraded { reason, .. } = &outcome {
        output.warning(&format!(
            "Some template sources failed, continuing with what loaded ({reason})"
        ))?;
    }

    Ok(manager)
}
