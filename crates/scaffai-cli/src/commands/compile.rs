//! Implementation of the `scaffai compile` command.
//!
//! Prints the rendered prompt to stdout so it can be piped straight into a
//! model client; `--json` prints the whole compiled prompt instead.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{info, instrument};

use scaffai_core::domain::PromptContext;

use crate::{
    cli::CompileArgs,
    commands::load_manager,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(template = %args.template_id))]
pub fn execute(args: CompileArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    if args.template_id.trim().is_empty() {
        return Err(CliError::invalid_input("template id must not be empty"));
    }
    let manager = load_manager(&config, &output)?;

    let context = build_context(&args);
    let variables: BTreeMap<String, Value> = args.vars.iter().cloned().collect();

    let prompt = manager.compile(&args.template_id, &context, &variables)?;
    info!(prompt_id = %prompt.id, bytes = prompt.content.len(), "prompt compiled");

    if args.json || output.wants_json() {
        output.json(prompt.as_ref())?;
    } else {
        output.data(&prompt.content)?;
    }
    Ok(())
}

fn build_context(args: &CompileArgs) -> PromptContext {
    let mut context = PromptContext::new();
    if let Some(project_type) = &args.project_type {
        context = context.project_type(project_type);
    }
    if let Some(ui_library) = &args.ui_library {
        context = context.ui_library(ui_library);
    }
    if let Some(framework) = &args.framework {
        context = context.framework(framework);
    }
    for feature in args.features.iter().filter(|f| !f.trim().is_empty()) {
        context = context.feature(feature.trim());
    }
    context
}
