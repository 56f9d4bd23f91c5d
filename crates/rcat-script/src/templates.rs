//! Template loading and management.
//!
//! A templates file maps each method name to a Handlebars source:
//!
//! ```yaml
//! version: "1.0"
//! templates:
//!   fisher:
//!     description: Fisher's exact test
//!     packages: []
//!     template: |
//!       data <- read.csv({{r_str data_file}}, check.names = FALSE)
//!       ...
//! ```

use rcat_core::Method;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Built-in templates, compiled into the crate.
pub const BUILTIN_TEMPLATES: &str = include_str!("../templates/categorical.yaml");

/// Top-level templates file structure
#[derive(Debug, Clone, Deserialize)]
pub struct TemplatesFile {
    pub version: String,
    pub templates: HashMap<String, Template>,
}

/// A single template definition
#[derive(Debug, Clone, Deserialize)]
pub struct Template {
    pub description: String,
    /// R packages the script needs; each gets an install-if-missing directive
    #[serde(default)]
    pub packages: Vec<String>,
    pub template: String,
}

impl TemplatesFile {
    /// Load templates from a YAML file
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read templates file {}: {}", path.display(), e))?;
        Self::from_yaml(&content)
    }

    /// Parse templates from YAML content
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        serde_yaml::from_str(yaml).map_err(|e| format!("Failed to parse templates YAML: {}", e))
    }

    pub fn builtin() -> Result<Self, String> {
        Self::from_yaml(BUILTIN_TEMPLATES)
    }

    /// Get the template for a method
    pub fn get(&self, method: Method) -> Option<&Template> {
        self.templates.get(method.name())
    }

    /// Methods this file has no template for
    pub fn missing_methods(&self) -> Vec<Method> {
        Method::ALL
            .into_iter()
            .filter(|m| !self.templates.contains_key(m.name()))
            .collect()
    }
}
