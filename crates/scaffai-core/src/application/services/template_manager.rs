//! Template Manager - registry, compiler and compile cache.
//!
//! The manager is constructed explicitly by the caller and passed around by
//! reference; there is no global instance. It owns:
//!
//! 1. A [`TemplateStore`] holding registered templates
//! 2. The compile cache, keyed by [`cache_key`]
//!
//! Loading templates from builtin/local/remote sources is the job of
//! `scaffai_adapters::bootstrap`, which fills a manager and reports an
//! [`InitOutcome`].

use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, PoisonError, RwLock},
};

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::{
    application::{ApplicationError, ports::TemplateStore},
    domain::{
        CompiledMetadata, CompiledPrompt, DomainError, PromptContext, Template, TemplateCategory,
        cache_key,
    },
    error::ScaffaiResult,
};

/// Compiler behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Return a previously compiled prompt for structurally identical input.
    pub cache_enabled: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            cache_enabled: true,
        }
    }
}

/// Read-only snapshot returned by [`TemplateManager::stats`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerStats {
    pub templates_count: usize,
    pub cache_size: usize,
    /// Categories with at least one registered template.
    pub categories: Vec<TemplateCategory>,
}

/// How initialization went.
///
/// Hard failures are reported as `Err(..)` by the initializer; this type only
/// distinguishes a full load from one that fell back to builtin templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    /// Every configured source loaded.
    Complete {
        builtin: usize,
        local: usize,
        remote: usize,
    },
    /// A configured source failed and fallback mode swallowed the error.
    Degraded {
        builtin: usize,
        local: usize,
        remote: usize,
        reason: String,
    },
}

impl InitOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    /// Total templates admitted across all sources.
    pub fn total(&self) -> usize {
        match self {
            Self::Complete {
                builtin,
                local,
                remote,
            }
            | Self::Degraded {
                builtin,
                local,
                remote,
                ..
            } => builtin + local + remote,
        }
    }
}

/// Template registry plus compiler.
pub struct TemplateManager {
    store: Box<dyn TemplateStore>,
    cache: RwLock<HashMap<String, Arc<CompiledPrompt>>>,
    options: CompilerOptions,
}

impl TemplateManager {
    pub fn new(store: Box<dyn TemplateStore>, options: CompilerOptions) -> Self {
        Self {
            store,
            cache: RwLock::new(HashMap::new()),
            options,
        }
    }

    pub fn options(&self) -> CompilerOptions {
        self.options
    }

    /// Insert or replace a template. The compile cache is left untouched, so
    /// prompts compiled from a replaced template stay cached until
    /// [`clear_cache`](Self::clear_cache).
    pub fn register(&self, template: Template) -> ScaffaiResult<()> {
        debug!(id = %template.id, category = %template.category, "registering template");
        self.store.register(template)
    }

    /// Register several templates, stopping at the first failure.
    pub fn register_all(&self, templates: Vec<Template>) -> ScaffaiResult<usize> {
        let count = templates.len();
        for template in templates {
            self.register(template)?;
        }
        Ok(count)
    }

    pub fn get(&self, id: &str) -> ScaffaiResult<Template> {
        self.store.get(id)
    }

    pub fn list(&self) -> ScaffaiResult<Vec<Template>> {
        self.store.list()
    }

    pub fn list_by_category(&self, category: TemplateCategory) -> ScaffaiResult<Vec<Template>> {
        self.store.list_by_category(category)
    }

    /// Compile a template against a context and explicit variables.
    ///
    /// # Algorithm
    ///
    /// 1. Cache lookup (when enabled)
    /// 2. Resolve the template
    /// 3. Merge context + variables, derive UI-library fields
    /// 4. Check required variables, before any substitution
    /// 5. Fill declared defaults for absent optional variables
    /// 6. Render conditionals and interpolations
    ///
    /// # Errors
    ///
    /// - `ApplicationError::TemplateNotFound` for an unknown id
    /// - `DomainError::MissingRequiredVariable` if a required variable is
    ///   absent or null; nothing is cached in that case
    #[instrument(skip(self, context, variables), fields(template_id = %template_id))]
    pub fn compile(
        &self,
        template_id: &str,
        context: &PromptContext,
        variables: &BTreeMap<String, Value>,
    ) -> ScaffaiResult<Arc<CompiledPrompt>> {
        let key = cache_key(template_id, context, variables);

        if self.options.cache_enabled {
            let cache = self
                .cache
                .read()
                .map_err(|_| ApplicationError::StoreLockError)?;
            if let Some(hit) = cache.get(&key) {
                debug!(key = %key, "compile cache hit");
                return Ok(Arc::clone(hit));
            }
        }

        let template = self.store.get(template_id)?;
        let mut data = context.merge(variables);

        if let Some(missing) = template
            .required_variables()
            .find(|v| data.get(&v.name).is_none_or(Value::is_null))
        {
            return Err(DomainError::MissingRequiredVariable {
                name: missing.name.clone(),
            }
            .into());
        }

        for variable in &template.variables {
            if let Some(default) = &variable.default_value {
                let slot = data.entry(variable.name.clone()).or_insert(Value::Null);
                if slot.is_null() {
                    *slot = default.clone();
                }
            }
        }

        let content = template.ast()?.render(&data);

        let compiled = Arc::new(CompiledPrompt {
            id: Uuid::new_v4(),
            content,
            variables: data,
            metadata: CompiledMetadata {
                template_id: template.id.clone(),
                compiled_at: Utc::now(),
                context: context.clone(),
            },
        });

        if self.options.cache_enabled {
            debug!(key = %key, "compile cache miss, storing");
            self.cache
                .write()
                .map_err(|_| ApplicationError::StoreLockError)?
                .insert(key, Arc::clone(&compiled));
        }

        Ok(compiled)
    }

    /// Drop every cached compile result.
    pub fn clear_cache(&self) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        debug!("compile cache cleared");
    }

    pub fn cache_size(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Read-only introspection; no side effects.
    pub fn stats(&self) -> ScaffaiResult<CompilerStats> {
        let templates = self.store.list()?;
        let categories = TemplateCategory::ALL
            .into_iter()
            .filter(|c| templates.iter().any(|t| t.category == *c))
            .collect();

        Ok(CompilerStats {
            templates_count: templates.len(),
            cache_size: self.cache_size(),
            categories,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockTemplateStore;
    use crate::domain::{Variable, VariableType};
    use crate::error::ScaffaiError;
    use serde_json::json;

    fn template() -> Template {
        Template::builder()
            .id("greet")
            .name("Greeting")
            .category(TemplateCategory::Documentation)
            .variable(Variable::required("who", VariableType::String))
            .variable(Variable::optional("tone", VariableType::String).default_value("warm"))
            .content("Say hi to {{who}} in a {{tone}} tone{{#if features.includes 'emoji'}} :){{/if}}")
            .build()
            .unwrap()
    }

    fn store_returning(template: Template) -> MockTemplateStore {
        let mut store = MockTemplateStore::new();
        store
            .expect_get()
            .returning(move |_| Ok(template.clone()));
        store
    }

    fn vars(pairs: &[(&str, Value)]) -> BTreeMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn compiles_with_defaults_and_context() {
        let manager = TemplateManager::new(
            Box::new(store_returning(template())),
            CompilerOptions::default(),
        );
        let ctx = PromptContext::new().feature("emoji");
        let out = manager
            .compile("greet", &ctx, &vars(&[("who", json!("Ada"))]))
            .unwrap();

        assert_eq!(out.content, "Say hi to Ada in a warm tone :)");
        assert_eq!(out.metadata.template_id, "greet");
        assert_eq!(out.variables["tone"], json!("warm"));
    }

    #[test]
    fn missing_required_variable_fails_and_is_not_cached() {
        let manager = TemplateManager::new(
            Box::new(store_returning(template())),
            CompilerOptions::default(),
        );
        let err = manager
            .compile("greet", &PromptContext::new(), &BTreeMap::new())
            .unwrap_err();

        assert!(matches!(
            err,
            ScaffaiError::Domain(DomainError::MissingRequiredVariable { ref name }) if name == "who"
        ));
        assert_eq!(manager.cache_size(), 0);
    }

    #[test]
    fn null_required_variable_counts_as_missing() {
        let manager = TemplateManager::new(
            Box::new(store_returning(template())),
            CompilerOptions::default(),
        );
        let err = manager
            .compile("greet", &PromptContext::new(), &vars(&[("who", Value::Null)]))
            .unwrap_err();
        assert!(matches!(
            err,
            ScaffaiError::Domain(DomainError::MissingRequiredVariable { .. })
        ));
    }

    #[test]
    fn cache_hit_skips_store_lookup() {
        let mut store = MockTemplateStore::new();
        let t = template();
        store
            .expect_get()
            .times(1)
            .returning(move |_| Ok(t.clone()));
        let manager = TemplateManager::new(Box::new(store), CompilerOptions::default());
        let v = vars(&[("who", json!("Ada"))]);

        let first = manager.compile("greet", &PromptContext::new(), &v).unwrap();
        let second = manager.compile("greet", &PromptContext::new(), &v).unwrap();

        assert_eq!(first.id, second.id);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(manager.cache_size(), 1);
    }

    #[test]
    fn disabled_cache_yields_distinct_ids() {
        let manager = TemplateManager::new(
            Box::new(store_returning(template())),
            CompilerOptions {
                cache_enabled: false,
            },
        );
        let v = vars(&[("who", json!("Ada"))]);

        let first = manager.compile("greet", &PromptContext::new(), &v).unwrap();
        let second = manager.compile("greet", &PromptContext::new(), &v).unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(first.content, second.content);
        assert_eq!(manager.cache_size(), 0);
    }

    #[test]
    fn clear_cache_forces_recompile() {
        let manager = TemplateManager::new(
            Box::new(store_returning(template())),
            CompilerOptions::default(),
        );
        let v = vars(&[("who", json!("Ada"))]);

        let first = manager.compile("greet", &PromptContext::new(), &v).unwrap();
        manager.clear_cache();
        assert_eq!(manager.cache_size(), 0);
        let second = manager.compile("greet", &PromptContext::new(), &v).unwrap();

        assert_ne!(first.id, second.id);
    }

    #[test]
    fn unknown_template_propagates_store_error() {
        let mut store = MockTemplateStore::new();
        store.expect_get().returning(|id| {
            Err(ApplicationError::TemplateNotFound { id: id.to_string() }.into())
        });
        let manager = TemplateManager::new(Box::new(store), CompilerOptions::default());

        let err = manager
            .compile("nope", &PromptContext::new(), &BTreeMap::new())
            .unwrap_err();
        assert!(matches!(
            err,
            ScaffaiError::Application(ApplicationError::TemplateNotFound { .. })
        ));
    }

    #[test]
    fn stats_reports_distinct_categories() {
        let mut store = MockTemplateStore::new();
        let t = template();
        store
            .expect_list()
            .returning(move || Ok(vec![t.clone(), t.clone()]));
        let manager = TemplateManager::new(Box::new(store), CompilerOptions::default());

        let stats = manager.stats().unwrap();
        assert_eq!(stats.templates_count, 2);
        assert_eq!(stats.cache_size, 0);
        assert_eq!(stats.categories, vec![TemplateCategory::Documentation]);
    }

    #[test]
    fn init_outcome_totals() {
        let outcome = InitOutcome::Degraded {
            builtin: 4,
            local: 1,
            remote: 0,
            reason: "offline".into(),
        };
        assert!(outcome.is_degraded());
        assert_eq!(outcome.total(), 5);
    }
}
