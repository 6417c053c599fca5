//! In-memory template store.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use scaffai_core::{
    application::{ApplicationError, ports::TemplateStore},
    domain::{DomainValidator as validator, Template, TemplateCategory},
    error::{ScaffaiError, ScaffaiResult},
};


/// Thread-safe in-memory template store.
///
/// Keeps first-registration order; re-registering an id replaces the
/// template in place.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<StoreInner>>,
}

#[derive(Default)]
struct StoreInner {
    order: Vec<String>,
    templates: HashMap<String, Template>,
}

impl StoreInner {
    fn ordered(&self) -> impl Iterator<Item = &Template> {
        self.order.iter().filter_map(|id| self.templates.get(id))
    }
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TemplateStore for InMemoryStore {
    fn register(&self, template: Template) -> ScaffaiResult<()> {
        // Validate before insertion
        validator::validate_template(&template).map_err(ScaffaiError::Domain)?;

        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        if !inner.templates.contains_key(&template.id) {
            inner.order.push(template.id.clone());
        }
        inner.templates.insert(template.id.clone(), template);
        Ok(())
    }

    fn get(&self, id: &str) -> ScaffaiResult<Template> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.templates.get(id).cloned().ok_or_else(|| {
            ApplicationError::TemplateNotFound { id: id.to_string() }.into()
        })
    }

    fn list_by_category(&self, category: TemplateCategory) -> ScaffaiResult<Vec<Template>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        Ok(inner
            .ordered()
            .filter(|t| t.category == category)
            .cloned()
            .collect())
    }

    fn list(&self) -> ScaffaiResult<Vec<Template>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        Ok(inner.ordered().cloned().collect())
    }

    fn len(&self) -> usize {
        self.inner.read().map(|i| i.templates.len()).unwrap_or(0)
    }
}
