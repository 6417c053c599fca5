//! Caller-supplied compile context.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::value_objects::ui_library_info;

/// Situational data merged with explicit variables during compilation.
///
/// ## Built-in keys
///
/// | Key | Source |
/// |-----|--------|
/// | `projectType` | `project_type` |
/// | `uiLibrary` | `ui_library` |
/// | `framework` | `framework` |
/// | `features` | `features` (array) |
/// | `uiLibraryName` | derived from `uiLibrary` |
/// | `uiLibraryPackage` | derived from `uiLibrary` |
///
/// `custom_variables` are merged on top of the built-ins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_library: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub custom_variables: BTreeMap<String, Value>,
}

impl PromptContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project_type(mut self, project_type: impl Into<String>) -> Self {
        self.project_type = Some(project_type.into());
        self
    }

    pub fn ui_library(mut self, ui_library: impl Into<String>) -> Self {
        self.ui_library = Some(ui_library.into());
        self
    }

    pub fn framework(mut self, framework: impl Into<String>) -> Self {
        self.framework = Some(framework.into());
        self
    }

    pub fn feature(mut self, feature: impl Into<String>) -> Self {
        self.features.push(feature.into());
        self
    }

    pub fn custom_variable(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.custom_variables.insert(key.into(), value.into());
        self
    }

    /// Flatten into a data set and overlay `variables` (later wins).
    ///
    /// Derived UI-library fields are added last, only where the caller has
    /// not supplied them.
    pub fn merge(&self, variables: &BTreeMap<String, Value>) -> BTreeMap<String, Value> {
        let mut data = BTreeMap::new();

        if let Some(v) = &self.project_type {
            data.insert("projectType".to_string(), Value::String(v.clone()));
        }
        if let Some(v) = &self.ui_library {
            data.insert("uiLibrary".to_string(), Value::String(v.clone()));
        }
        if let Some(v) = &self.framework {
            data.insert("framework".to_string(), Value::String(v.clone()));
        }
        data.insert(
            "features".to_string(),
            Value::Array(self.features.iter().cloned().map(Value::String).collect()),
        );

        data.extend(
            self.custom_variables
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        data.extend(variables.iter().map(|(k, v)| (k.clone(), v.clone())));

        if let Some(Value::String(library)) = data.get("uiLibrary") {
            let info = ui_library_info(library);
            data.entry("uiLibraryName".to_string())
                .or_insert(Value::String(info.display_name));
            data.entry("uiLibraryPackage".to_string())
                .or_insert(Value::String(info.package_name));
        }

        data
    }
}
