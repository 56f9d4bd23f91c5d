//! rcat-script: R script generation for categorical tests
//!
//! Turns a method, its variable bindings and the name of the data artifact
//! into the complete source of an R script. Which template is used is decided
//! here; decisions that depend on the data (2x2 shape, significance of the
//! overall test) stay inside the generated script and are made by R.
//!
//! # Example
//!
//! ```ignore
//! use rcat_core::{Method, ResolvedBindings};
//! use rcat_script::ScriptEngine;
//!
//! let engine = ScriptEngine::builtin()?;
//! let bindings = ResolvedBindings::Single { variable: "color".into() };
//! let script = engine.render(Method::GoodnessOfFit, &bindings, "data_1a2b3c4d.csv", Some(&[0.3, 0.3, 0.4]))?;
//! assert!(script.text().contains("c(0.3, 0.3, 0.4)"));
//! ```

pub mod directive;
pub mod renderer;
pub mod templates;

pub use directive::dependency_directive;

use rcat_core::{Method, RcatError, ResolvedBindings, Result};
use renderer::TemplateRenderer;
use serde_json::{json, Value};
use std::path::Path;
use templates::TemplatesFile;

/// Script text produced for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedScript {
    method: Method,
    data_file: String,
    text: String,
}

impl RenderedScript {
    pub fn method(&self) -> Method {
        self.method
    }

    /// Name of the data artifact the script reads
    pub fn data_file(&self) -> &str {
        &self.data_file
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// Compiled templates for all four methods.
pub struct ScriptEngine {
    renderer: TemplateRenderer,
    templates: TemplatesFile,
}

impl ScriptEngine {
    /// Engine over the templates compiled into this crate
    pub fn builtin() -> Result<Self> {
        let templates = TemplatesFile::builtin().map_err(RcatError::Render)?;
        Self::from_templates(templates)
    }

    /// Engine over a replacement templates file
    pub fn from_file(path: &Path) -> Result<Self> {
        let templates = TemplatesFile::load(path).map_err(RcatError::Render)?;
        Self::from_templates(templates)
    }

    pub fn from_templates(templates: TemplatesFile) -> Result<Self> {
        let missing = templates.missing_methods();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|m| m.name()).collect();
            return Err(RcatError::Render(format!(
                "templates file has no template for: {}",
                names.join(", ")
            )));
        }
        for method in Method::ALL {
            if let Some(template) = templates.get(method) {
                for package in &template.packages {
                    dependency_directive(package).map_err(RcatError::Render)?;
                }
            }
        }
        let renderer = TemplateRenderer::new(&templates).map_err(RcatError::Render)?;
        Ok(Self {
            renderer,
            templates,
        })
    }

    /// Render the script for `method`.
    ///
    /// `expected_probs` only affects goodness-of-fit; `None` or an empty slice
    /// leaves the fit test on its uniform default.
    pub fn render(
        &self,
        method: Method,
        bindings: &ResolvedBindings,
        data_file: &str,
        expected_probs: Option<&[f64]>,
    ) -> Result<RenderedScript> {
        let template = self.templates.get(method).ok_or_else(|| {
            RcatError::Render(format!("no template for method {}", method))
        })?;

        let data = script_data(method, bindings, data_file, expected_probs)?;
        let body = self
            .renderer
            .render(method.name(), &data)
            .map_err(RcatError::Render)?;

        let mut text = format!("# rcat {}: {}\n", rcat_core::RCAT_VERSION, template.description);
        for package in &template.packages {
            text.push_str(&dependency_directive(package).map_err(RcatError::Render)?);
            text.push('\n');
        }
        text.push_str(&body);
        if !text.ends_with('\n') {
            text.push('\n');
        }

        tracing::debug!(method = %method, bytes = text.len(), "rendered script");
        Ok(RenderedScript {
            method,
            data_file: data_file.to_string(),
            text,
        })
    }

    /// Like [`ScriptEngine::render`], taking the method by name.
    pub fn render_named(
        &self,
        method: &str,
        bindings: &ResolvedBindings,
        data_file: &str,
        expected_probs: Option<&[f64]>,
    ) -> Result<RenderedScript> {
        let method: Method = method.parse()?;
        self.render(method, bindings, data_file, expected_probs)
    }
}

fn script_data(
    method: Method,
    bindings: &ResolvedBindings,
    data_file: &str,
    expected_probs: Option<&[f64]>,
) -> Result<Value> {
    let mut data = json!({
        "data_file": data_file,
        "method": method.name(),
        "variable": null,
        "row_var": null,
        "col_var": null,
        "expected_probs": null,
    });

    match (method.uses_paired_variables(), bindings) {
        (false, ResolvedBindings::Single { variable }) => {
            data["variable"] = json!(variable);
            if let Some(probs) = expected_probs.filter(|p| !p.is_empty()) {
                data["expected_probs"] = json!(probs);
            }
        }
        (true, ResolvedBindings::Paired { row, col }) => {
            data["row_var"] = json!(row);
            data["col_var"] = json!(col);
        }
        _ => {
            return Err(RcatError::InvalidRequest(format!(
                "bindings {:?} do not fit method {}",
                bindings, method
            )))
        }
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paired() -> ResolvedBindings {
        ResolvedBindings::Paired {
            row: "before".into(),
            col: "after".into(),
        }
    }

    #[test]
    fn rejects_mismatched_bindings() {
        let engine = ScriptEngine::builtin().unwrap();
        let err = engine
            .render(Method::GoodnessOfFit, &paired(), "data_x.csv", None)
            .unwrap_err();
        assert!(matches!(err, RcatError::InvalidRequest(_)));
    }

    #[test]
    fn render_named_rejects_unknown_method() {
        let engine = ScriptEngine::builtin().unwrap();
        let err = engine
            .render_named("kruskal", &paired(), "data_x.csv", None)
            .unwrap_err();
        assert!(matches!(err, RcatError::InvalidMethod(ref m) if m == "kruskal"));
    }

    #[test]
    fn incomplete_templates_are_rejected() {
        let templates = TemplatesFile::from_yaml(
            r#"
version: "1.0"
templates:
  fisher:
    description: Fisher only
    template: "print(1)"
"#,
        )
        .unwrap();
        let err = ScriptEngine::from_templates(templates).err().unwrap();
        assert!(err.to_string().contains("chisq-gof"));
    }

    #[test]
    fn unsafe_package_names_are_rejected_at_load() {
        let yaml = r#"
version: "1.0"
templates:
  chisq-gof: { description: a, template: "1", packages: ["bad name"] }
  chisq-assoc: { description: b, template: "2" }
  mcnemar: { description: c, template: "3" }
  fisher: { description: d, template: "4" }
"#;
        let templates = TemplatesFile::from_yaml(yaml).unwrap();
        assert!(ScriptEngine::from_templates(templates).is_err());
    }

    #[test]
    fn header_names_the_method() {
        let engine = ScriptEngine::builtin().unwrap();
        let script = engine
            .render(Method::Fisher, &paired(), "data_x.csv", None)
            .unwrap();
        assert!(script.text().starts_with("# rcat "));
        assert!(script.text().lines().next().unwrap().contains("Fisher"));
        assert_eq!(script.data_file(), "data_x.csv");
        assert_eq!(script.method(), Method::Fisher);
    }
}
