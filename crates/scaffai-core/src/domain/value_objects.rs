//! Value objects: template categories, variable types, and the UI-library
//! lookup table used to derive display/package names during compilation.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

// ============================================================================
// TemplateCategory
// ============================================================================

/// What a template produces.
///
/// Serialized in kebab-case (`"project-creation"`), matching the remote
/// catalog's JSON contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateCategory {
    ProjectCreation,
    ComponentGeneration,
    PageLayout,
    Animation,
    Styling,
    Testing,
    Documentation,
}

impl TemplateCategory {
    /// All categories in declaration order.
    pub const ALL: [TemplateCategory; 7] = [
        Self::ProjectCreation,
        Self::ComponentGeneration,
        Self::PageLayout,
        Self::Animation,
        Self::Styling,
        Self::Testing,
        Self::Documentation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProjectCreation => "project-creation",
            Self::ComponentGeneration => "component-generation",
            Self::PageLayout => "page-layout",
            Self::Animation => "animation",
            Self::Styling => "styling",
            Self::Testing => "testing",
            Self::Documentation => "documentation",
        }
    }
}

impl fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| DomainError::UnknownCategory(s.to_string()))
    }
}

// ============================================================================
// VariableType
// ============================================================================

/// Declared type of a template variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    String,
    Number,
    Boolean,
    Array,
    Object,
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        };
        f.write_str(s)
    }
}

// ============================================================================
// UI library lookup
// ============================================================================

/// Display and package names derived from a UI-library id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiLibraryInfo {
    pub display_name: String,
    pub package_name: String,
}

/// `(id, display name, npm package)`.
const UI_LIBRARIES: &[(&str, &str, &str)] = &[
    ("mui", "Material-UI", "@mui/material"),
    ("material-ui", "Material-UI", "@mui/material"),
    ("antd", "Ant Design", "antd"),
    ("ant-design", "Ant Design", "antd"),
    ("chakra", "Chakra UI", "@chakra-ui/react"),
    ("chakra-ui", "Chakra UI", "@chakra-ui/react"),
    ("mantine", "Mantine", "@mantine/core"),
    ("tailwind", "Tailwind CSS", "tailwindcss"),
    ("tailwindcss", "Tailwind CSS", "tailwindcss"),
    ("shadcn", "shadcn/ui", "shadcn-ui"),
    ("bootstrap", "React Bootstrap", "react-bootstrap"),
];

/// Resolve a UI-library id through the fixed lookup table.
///
/// Lookup is case-insensitive. Unknown ids pass through unchanged as both the
/// display name and the package name.
pub fn ui_library_info(id: &str) -> UiLibraryInfo {
    let key = id.trim().to_lowercase();
    UI_LIBRARIES
        .iter()
        .find(|(lib, _, _)| *lib == key)
        .map(|(_, display, package)| UiLibraryInfo {
            display_name: (*display).to_string(),
            package_name: (*package).to_string(),
        })
        .unwrap_or_else(|| UiLibraryInfo {
            display_name: id.to_string(),
            package_name: id.to_string(),
        })
}
