use handlebars::Handlebars;
use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashMap;

static PROMPT_REGISTRY: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("review_file", include_str!("review_file.hbs"));
    m
});

/// Default analysis instructions embedded in the review prompt when the
/// active configuration does not supply its own.
pub const REVIEW_RUBRIC: &str = "\
Please analyze this code for:
1. Code quality and best practices
2. Potential bugs or issues
3. Security vulnerabilities
4. Performance improvements
5. Maintainability concerns

Provide specific, actionable feedback in a clear, professional tone.
Focus on the most important issues first.";

/// Render a prompt by name using Handlebars.
///
/// Usage:
///     render("review_file", json!({"path": "src/lib.rs", ...}))
///
pub fn render(name: &str, ctx: &Value) -> anyhow::Result<String> {
    let template = PROMPT_REGISTRY
        .get(name)
        .ok_or_else(|| anyhow::anyhow!("unknown prompt '{name}'"))?;

    let mut hb = Handlebars::new();
    hb.set_strict_mode(true); // fail if a variable is missing

    hb.render_template(template, ctx)
        .map_err(|e| anyhow::anyhow!("rendering prompt '{name}' failed: {e}"))
}
