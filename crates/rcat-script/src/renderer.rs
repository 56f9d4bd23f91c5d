//! Template rendering.
//!
//! Uses Handlebars with HTML escaping turned off (the output is R source, not
//! markup) and strict mode on, so a template that names an unknown variable
//! fails instead of rendering an empty string. Custom helpers:
//! - r_str: Quote a value as an R string literal
//! - r_vector: Format a numeric array as an R `c(...)` vector

use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext,
    RenderErrorReason,
};
use serde_json::Value;

use crate::templates::TemplatesFile;

/// Compiled renderer with registered helpers
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl TemplateRenderer {
    /// Compile every template in `templates`.
    pub fn new(templates: &TemplatesFile) -> Result<Self, String> {
        let mut handlebars = Handlebars::new();

        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);

        handlebars.register_helper("r_str", Box::new(RStringHelper));
        handlebars.register_helper("r_vector", Box::new(RVectorHelper));

        for (name, template) in &templates.templates {
            handlebars
                .register_template_string(name, &template.template)
                .map_err(|e| format!("Template '{}' failed to compile: {}", name, e))?;
        }

        Ok(TemplateRenderer { handlebars })
    }

    /// Render a named template with data
    pub fn render(&self, template_name: &str, data: &Value) -> Result<String, String> {
        self.handlebars
            .render(template_name, data)
            .map_err(|e| format!("Render error: {}", e))
    }
}

/// `"..."` with backslashes, quotes and line breaks escaped.
pub fn r_string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// `c(0.3, 0.3, 0.4)`
pub fn r_numeric_vector(values: &[f64]) -> String {
    let items: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("c({})", items.join(", "))
}

// ============================================================================
// Custom Helpers
// ============================================================================

struct RStringHelper;

impl HelperDef for RStringHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let value = h
            .param(0)
            .ok_or(RenderErrorReason::ParamNotFoundForIndex("r_str", 0))?;
        let text = match value.value() {
            Value::String(s) => s.clone(),
            Value::Null => {
                return Err(RenderErrorReason::Other(format!(
                    "r_str: '{}' is null",
                    value.relative_path().map(String::as_str).unwrap_or("value")
                ))
                .into())
            }
            other => other.to_string(),
        };
        out.write(&r_string_literal(&text))?;
        Ok(())
    }
}

struct RVectorHelper;

impl HelperDef for RVectorHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        _r: &'reg Handlebars<'reg>,
        _ctx: &'rc Context,
        _rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let array = h
            .param(0)
            .and_then(|v| v.value().as_array())
            .ok_or(RenderErrorReason::ParamNotFoundForIndex("r_vector", 0))?;

        let mut numbers = Vec::with_capacity(array.len());
        for item in array {
            let n = item.as_f64().ok_or_else(|| {
                RenderErrorReason::Other(format!("r_vector: {} is not a number", item))
            })?;
            numbers.push(n);
        }

        out.write(&r_numeric_vector(&numbers))?;
        Ok(())
    }
}
