//! Built-in templates.
//!
//! This module provides [`all_templates`], the hard-coded set that ships with
//! scaffai. It needs no I/O and is the guaranteed fallback when local or
//! remote sources are unavailable.
//!
//! | id | category |
//! |----|----------|
//! | `react-project` | project-creation |
//! | `react-component` | component-generation |
//! | `landing-page` | page-layout |
//! | `animated-section` | animation |
//!
//! Every template instructs the model to answer with `===FILE: <path> ===`
//! markers so the reply can be fed straight to the extractor.

use tracing::{debug, instrument};

use scaffai_core::domain::{
    DomainError, Template, TemplateCategory, TemplateMetadata, Variable, VariableType,
};

const AUTHOR: &str = "scaffai";

/// Output contract appended to every builtin prompt.
const FILE_FORMAT_INSTRUCTIONS: &str = "\
Return every file using this exact format, with no commentary between files:

===FILE: path/relative/to/project/root ===
<file content>
";

/// Load the builtin set.
///
/// Errors only if a builtin fails its own validation, which the tests below
/// rule out.
#[instrument]
pub fn all_templates() -> Result<Vec<Template>, DomainError> {
    let templates = vec![
        react_project()?,
        react_component()?,
        landing_page()?,
        animated_section()?,
    ];
    debug!(count = templates.len(), "builtin templates built");
    Ok(templates)
}

fn metadata() -> TemplateMetadata {
    TemplateMetadata::new(AUTHOR)
        .license("MIT")
        .compatibility(vec!["react@18".into(), "vite@5".into()])
}

fn react_project() -> Result<Template, DomainError> {
    let content = format!(
        "\
You are a senior frontend engineer. Create a complete {{{{projectType}}}} project named {{{{projectName}}}}.

Project description: {{{{description}}}}

Requirements:
- React with {{{{framework}}}}
- UI library: {{{{uiLibraryName}}}} (package `{{{{uiLibraryPackage}}}}`)
{{{{#if features.includes 'typescript'}}}}- Use TypeScript with strict mode everywhere
{{{{/if}}}}{{{{#if features.includes 'routing'}}}}- Client-side routing with react-router, one route per page
{{{{/if}}}}{{{{#if features.includes 'state'}}}}- Global state management with a small, typed store
{{{{/if}}}}{{{{#if features.includes 'testing'}}}}- Unit tests for every component with Vitest and Testing Library
{{{{/if}}}}- A README.md with setup and run instructions
- A package.json with all dependencies and scripts

{FILE_FORMAT_INSTRUCTIONS}"
    );

    Template::builder()
        .id("react-project")
        .name("React Project")
        .description("Complete React project with configurable UI library and features")
        .category(TemplateCategory::ProjectCreation)
        .tag("react")
        .tag("project")
        .variable(
            Variable::required("projectName", VariableType::String)
                .description("Package and directory name of the project"),
        )
        .variable(
            Variable::optional("description", VariableType::String)
                .description("One-line summary of what the project does")
                .default_value("A modern web application"),
        )
        .variable(
            Variable::optional("framework", VariableType::String)
                .description("Build tooling / meta-framework")
                .default_value("vite")
                .options(["vite", "next", "remix"]),
        )
        .variable(
            Variable::optional("projectType", VariableType::String)
                .default_value("web application"),
        )
        .variable(
            Variable::optional("uiLibrary", VariableType::String)
                .default_value("tailwind")
                .options(["mui", "antd", "chakra", "mantine", "tailwind", "shadcn", "bootstrap"]),
        )
        .variable(Variable::optional("features", VariableType::Array))
        .content(content)
        .metadata(metadata().dependencies(vec!["react".into(), "react-dom".into()]))
        .build()
}

fn react_component() -> Result<Template, DomainError> {
    let content = format!(
        "\
Create a reusable React component called {{{{componentName}}}}.

Purpose: {{{{componentDescription}}}}
Styling: {{{{uiLibraryName}}}} (`{{{{uiLibraryPackage}}}}`)
{{{{#if props}}}}Props: {{{{props}}}}
{{{{/if}}}}{{{{#if features.includes 'typescript'}}}}Write it in TypeScript and export the props interface.
{{{{/if}}}}{{{{#if features.includes 'accessibility'}}}}Meet WCAG 2.1 AA: keyboard navigation, aria attributes, focus management.
{{{{/if}}}}{{{{#if withTests}}}}Include a test file next to the component.
{{{{/if}}}}{{{{#if withStory}}}}Include a Storybook story covering every visual state.
{{{{/if}}}}
{FILE_FORMAT_INSTRUCTIONS}"
    );

    Template::builder()
        .id("react-component")
        .name("React Component")
        .description("Single reusable component with optional tests and story")
        .category(TemplateCategory::ComponentGeneration)
        .tag("react")
        .tag("component")
        .variable(Variable::required("componentName", VariableType::String))
        .variable(
            Variable::optional("componentDescription", VariableType::String)
                .default_value("A reusable UI component"),
        )
        .variable(Variable::optional("props", VariableType::Array))
        .variable(Variable::optional("withTests", VariableType::Boolean).default_value(true))
        .variable(Variable::optional("withStory", VariableType::Boolean).default_value(false))
        .variable(Variable::optional("uiLibrary", VariableType::String).default_value("tailwind"))
        .content(content)
        .metadata(metadata())
        .build()
}

fn landing_page() -> Result<Template, DomainError> {
    let content = format!(
        "\
Design a responsive landing page for {{{{productName}}}}.

Tagline: {{{{tagline}}}}
Sections, in order: {{{{sections}}}}
UI library: {{{{uiLibraryName}}}}
{{{{#if primaryColor}}}}Brand color: {{{{primaryColor}}}}
{{{{/if}}}}{{{{#if features.includes 'dark-mode'}}}}Support a dark mode toggle that persists the user's choice.
{{{{/if}}}}{{{{#if features.includes 'animations'}}}}Add subtle entrance animations to each section.
{{{{/if}}}}{{{{#if features.includes 'seo'}}}}Add meta tags, Open Graph data and semantic landmarks.
{{{{/if}}}}
Split the page into one component per section plus a page component that composes them.

{FILE_FORMAT_INSTRUCTIONS}"
    );

    Template::builder()
        .id("landing-page")
        .name("Landing Page")
        .description("Marketing landing page composed of section components")
        .category(TemplateCategory::PageLayout)
        .tag("react")
        .tag("landing")
        .tag("marketing")
        .variable(Variable::required("productName", VariableType::String))
        .variable(
            Variable::optional("tagline", VariableType::String)
                .default_value("Build faster with less effort"),
        )
        .variable(
            Variable::optional("sections", VariableType::Array).default_value(
                serde_json::json!(["hero", "features", "pricing", "testimonials", "footer"]),
            ),
        )
        .variable(Variable::optional("primaryColor", VariableType::String))
        .variable(Variable::optional("uiLibrary", VariableType::String).default_value("tailwind"))
        .content(content)
        .metadata(metadata())
        .build()
}

fn animated_section() -> Result<Template, DomainError> {
    let content = format!(
        "\
Create an animated React section component named {{{{sectionName}}}}.

Animation style: {{{{animationType}}}}
Trigger: {{{{trigger}}}}
Duration: {{{{duration}}}}ms
{{{{#if features.includes 'framer-motion'}}}}Use framer-motion for all animation.
{{{{/if}}}}{{{{#if features.includes 'gsap'}}}}Use GSAP with ScrollTrigger for all animation.
{{{{/if}}}}{{{{#if respectReducedMotion}}}}Honour prefers-reduced-motion by disabling non-essential motion.
{{{{/if}}}}
{FILE_FORMAT_INSTRUCTIONS}"
    );

    Template::builder()
        .id("animated-section")
        .name("Animated Section")
        .description("Section component with scroll or hover driven animation")
        .category(TemplateCategory::Animation)
        .tag("react")
        .tag("animation")
        .variable(Variable::required("sectionName", VariableType::String))
        .variable(
            Variable::optional("animationType", VariableType::String)
                .default_value("fade-up")
                .options(["fade-up", "slide-in", "scale", "stagger"]),
        )
        .variable(
            Variable::optional("trigger", VariableType::String)
                .default_value("scroll")
                .options(["scroll", "hover", "load"]),
        )
        .variable(Variable::optional("duration", VariableType::Number).default_value(600))
        .variable(
            Variable::optional("respectReducedMotion", VariableType::Boolean).default_value(true),
        )
        .content(content)
        .metadata(metadata())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn builtins_are_valid_and_unique() {
        let templates = all_templates().unwrap();
        assert_eq!(templates.len(), 4);

        let ids: BTreeSet<_> = templates.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), 4);
        for t in &templates {
            t.validate().unwrap();
        }
    }

    #[test]
    fn covers_scaffolding_categories() {
        let categories: BTreeSet<_> = all_templates()
            .unwrap()
            .into_iter()
            .map(|t| t.category.as_str())
            .collect();
        for expected in [
            "project-creation",
            "component-generation",
            "page-layout",
            "animation",
        ] {
            assert!(categories.contains(expected), "missing {expected}");
        }
    }

    #[test]
    fn builtins_ask_for_file_markers() {
        for t in all_templates().unwrap() {
            assert!(t.content.contains("===FILE:"), "{} lacks marker contract", t.id);
        }
    }
}
