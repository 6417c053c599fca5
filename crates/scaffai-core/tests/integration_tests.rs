//! Integration tests for scaffai-core, driven through the public API only.

use std::collections::BTreeMap;
use std::sync::RwLock;

use scaffai_core::{
    application::ApplicationError,
    domain::{DomainError, DomainValidator},
    prelude::*,
};
use serde_json::{Value, json};

/// Minimal store for exercising the manager without the adapters crate.
#[derive(Default)]
struct VecStore(RwLock<Vec<Template>>);

impl TemplateStore for VecStore {
    fn register(&self, template: Template) -> ScaffaiResult<()> {
        let mut all = self.0.write().map_err(|_| ApplicationError::StoreLockError)?;
        match all.iter_mut().find(|t| t.id == template.id) {
            Some(slot) => *slot = template,
            None => all.push(template),
        }
        Ok(())
    }

    fn get(&self, id: &str) -> ScaffaiResult<Template> {
        self.0
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| ApplicationError::TemplateNotFound { id: id.into() }.into())
    }

    fn list_by_category(&self, category: TemplateCategory) -> ScaffaiResult<Vec<Template>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|t| t.category == category)
            .collect())
    }

    fn list(&self) -> ScaffaiResult<Vec<Template>> {
        Ok(self
            .0
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?
            .clone())
    }

    fn len(&self) -> usize {
        self.0.read().map(|v| v.len()).unwrap_or(0)
    }
}

fn manager() -> TemplateManager {
    TemplateManager::new(Box::<VecStore>::default(), CompilerOptions::default())
}

fn component_template() -> Template {
    Template::builder()
        .id("component")
        .name("Component")
        .category(TemplateCategory::ComponentGeneration)
        .variable(Variable::required("componentName", VariableType::String))
        .variable(Variable::optional("uiLibrary", VariableType::String))
        .content(
            "Build {{componentName}} with {{uiLibraryName}} ({{uiLibraryPackage}})\
             {{#if features.includes 'typescript'}} in TypeScript{{/if}}",
        )
        .build()
        .unwrap()
}

#[test]
fn compile_derives_ui_library_fields() {
    let manager = manager();
    manager.register(component_template()).unwrap();

    let ctx = PromptContext::new()
        .ui_library("mui")
        .feature("typescript");
    let vars = BTreeMap::from([("componentName".to_string(), json!("Card"))]);

    let prompt = manager.compile("component", &ctx, &vars).unwrap();
    assert_eq!(
        prompt.content,
        "Build Card with Material-UI (@mui/material) in TypeScript"
    );
}

#[test]
fn explicit_variables_override_context() {
    let manager = manager();
    manager.register(component_template()).unwrap();

    let ctx = PromptContext::new()
        .ui_library("mui")
        .custom_variable("componentName", "FromContext");
    let vars = BTreeMap::from([("componentName".to_string(), json!("FromCaller"))]);

    let prompt = manager.compile("component", &ctx, &vars).unwrap();
    assert!(prompt.content.starts_with("Build FromCaller"));
    assert!(!prompt.content.contains("TypeScript"));
}

#[test]
fn unknown_template_is_not_found() {
    let err = manager()
        .compile("missing", &PromptContext::new(), &BTreeMap::new())
        .unwrap_err();
    assert!(matches!(
        err,
        ScaffaiError::Application(ApplicationError::TemplateNotFound { .. })
    ));
}

#[test]
fn reregistering_replaces_without_evicting_cache() {
    let manager = manager();
    manager.register(component_template()).unwrap();
    let vars = BTreeMap::from([("componentName".to_string(), json!("Card"))]);

    let first = manager.compile("component", &PromptContext::new(), &vars).unwrap();

    let replacement = Template::builder()
        .id("component")
        .name("Component v2")
        .category(TemplateCategory::ComponentGeneration)
        .content("v2 {{componentName}}")
        .build()
        .unwrap();
    manager.register(replacement).unwrap();
    assert_eq!(manager.list().unwrap().len(), 1);

    let cached = manager.compile("component", &PromptContext::new(), &vars).unwrap();
    assert_eq!(cached.content, first.content);

    manager.clear_cache();
    let fresh = manager.compile("component", &PromptContext::new(), &vars).unwrap();
    assert_eq!(fresh.content, "v2 Card");
}

#[test]
fn template_from_json_round_trips_through_manager() {
    let definition = json!({
        "id": "json-tpl",
        "name": "From JSON",
        "version": "2.0.0",
        "category": "page-layout",
        "content": "{{#if hero}}Hero: {{hero}}{{/if}}",
        "variables": [{ "name": "hero", "type": "string", "required": false }],
        "metadata": { "author": "tests" }
    });
    let template = DomainValidator::template_from_value(definition).unwrap();

    let manager = manager();
    manager.register(template).unwrap();

    let out = manager
        .compile("json-tpl", &PromptContext::new(), &BTreeMap::new())
        .unwrap();
    assert_eq!(out.content, "");

    let stats = manager.stats().unwrap();
    assert_eq!(stats.templates_count, 1);
    assert_eq!(stats.categories, vec![TemplateCategory::PageLayout]);
}

#[test]
fn candidate_missing_metadata_is_rejected() {
    let definition = json!({
        "id": "x", "name": "x", "version": "1", "category": "animation",
        "content": "", "variables": []
    });
    let err = DomainValidator::validate_candidate(&definition).unwrap_err();
    assert!(matches!(err, DomainError::TemplateValidation { ref field, .. } if field == "metadata"));
}

#[test]
fn compiled_prompt_serializes_camel_case() {
    let manager = manager();
    manager.register(component_template()).unwrap();
    let vars = BTreeMap::from([("componentName".to_string(), json!("Card"))]);

    let prompt = manager.compile("component", &PromptContext::new(), &vars).unwrap();
    let value: Value = serde_json::to_value(prompt.as_ref()).unwrap();

    assert_eq!(value["metadata"]["templateId"], json!("component"));
    assert!(value["metadata"]["compiledAt"].is_string());
}
