//! `scaffai stats`: template count, cache size and categories in use.

use crate::{
    cli::StatsArgs, commands::load_manager, config::AppConfig, error::CliResult,
    output::OutputManager,
};

pub fn execute(args: StatsArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let manager = load_manager(&config, &output)?;
    let stats = manager.stats()?;

    if args.json || output.wants_json() {
        output.json(&stats)?;
        return Ok(());
    }

    let categories: Vec<&str> = stats.categories.iter().map(|c| c.as_str()).collect();
    output.header("Template Manager:")?;
    output.data(&format!("  templates   {}", stats.templates_count))?;
    output.data(&format!(
        "  cache       {} {}",
        stats.cache_size,
        output.dim(if manager.options().cache_enabled {
            "(enabled)"
        } else {
            "(disabled)"
        })
    ))?;
    output.data(&format!("  categories  {}", categories.join(", ")))?;
    Ok(())
}
