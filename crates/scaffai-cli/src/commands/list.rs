//! Implementation of the `scaffai list` command.

use serde::Serialize;

use scaffai_core::domain::Template;

use crate::{
    cli::{ListArgs, ListFormat},
    commands::load_manager,
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// Row shape for `--format json`; the full template body is left out.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TemplateSummary<'a> {
    id: &'a str,
    name: &'a str,
    category: &'a str,
    version: &'a str,
    description: &'a str,
    required_variables: Vec<&'a str>,
}

impl<'a> From<&'a Template> for TemplateSummary<'a> {
    fn from(t: &'a Template) -> Self {
        Self {
            id: &t.id,
            name: &t.name,
            category: t.category.as_str(),
            version: &t.version,
            description: &t.description,
            required_variables: t.required_variables().map(|v| v.name.as_str()).collect(),
        }
    }
}

pub fn execute(args: ListArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let manager = load_manager(&config, &output)?;
    let templates = match args.category {
        Some(category) => manager.list_by_category(category)?,
        None => manager.list()?,
    };

    let format = if output.wants_json() {
        ListFormat::Json
    } else {
        args.format
    };

    match format {
        ListFormat::Table => {
            if templates.is_empty() {
                output.info("No templates found")?;
                return Ok(());
            }
            output.header("Available Templates:")?;
            let width = templates.iter().map(|t| t.id.len()).max().unwrap_or(0);
            for t in &templates {
                output.data(&format!(
                    "  {:<width$}  {} {}",
                    t.id,
                    t.name,
                    output.dim(&format!("[{} @ {}]", t.category, t.version)),
                ))?;
            }
        }
        ListFormat::List => {
            for t in &templates {
                output.data(&t.id)?;
            }
        }
        ListFormat::Json => {
            let rows: Vec<TemplateSummary<'_>> = templates.iter().map(Into::into).collect();
            output.json(&rows)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scaffai_core::domain::{TemplateCategory, Variable, VariableType};

    #[test]
    fn summary_lists_required_variables_only() {
        let template = Template::builder()
            .id("t")
            .name("T")
            .category(TemplateCategory::Animation)
            .variable(Variable::required("a", VariableType::String))
            .variable(Variable::optional("b", VariableType::String))
            .content("{{a}}")
            .build()
            .unwrap();

        let json = serde_json::to_value(TemplateSummary::from(&template)).unwrap();
        assert_eq!(json["category"], "animation");
        assert_eq!(json["requiredVariables"], serde_json::json!(["a"]));
        assert!(json.get("content").is_none());
    }
}
