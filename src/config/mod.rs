//! Static review configuration.
//!
//! Everything here is pure data: a base configuration with documented
//! defaults, and named presets expressed as partial overrides on top of it.
//! Selection happens once at startup via [`presets::resolve_config`]; no
//! component mutates configuration after that.

pub mod presets;

pub use presets::{Severity, customize_prompt, framework_rules, resolve_config, review_prompt};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rule toggles for one language or framework, keyed by rule name.
pub type RuleToggles = BTreeMap<String, bool>;

/// Configuration for one external linter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinterSettings {
    pub enabled: bool,
    /// Seconds the linter may run before it is reported as timed out.
    pub timeout_secs: u64,
    /// Extra arguments appended after the built-in ones.
    pub extra_args: Vec<String>,
}

impl Default for LinterSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: 30,
            extra_args: Vec::new(),
        }
    }
}

impl LinterSettings {
    pub fn with_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extra_args: args.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

/// Parameters for the AI review call.
///
/// `model` applies to the OpenAI-compatible provider; Anthropic and Gemini
/// carry their own default model names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Replaces the built-in review rubric when set.
    pub custom_prompt: Option<String>,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 1000,
            temperature: 0.3,
            custom_prompt: None,
        }
    }
}

/// The full configuration record one review run operates under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Globs a changed file must match to be reviewed.
    pub include_patterns: Vec<String>,
    /// Globs that exclude a file even when included above.
    pub exclude_patterns: Vec<String>,
    /// Files larger than this (bytes) are skipped.
    pub max_file_size: u64,
    /// Per-linter toggles, keyed by linter binary name.
    pub linters: BTreeMap<String, LinterSettings>,
    pub ai: AiSettings,
    /// Review focus areas surfaced to the AI prompt machinery.
    pub review_categories: Vec<String>,
    /// Per-language rule toggles (python, javascript, typescript, react, ...).
    pub language_rules: BTreeMap<String, RuleToggles>,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self::from_overrides(PresetOverrides::default())
    }
}

/// A named preset is just the fields it changes; everything left as `None`
/// is back-filled from the documented defaults exactly once, here.
#[derive(Debug, Clone, Default)]
pub struct PresetOverrides {
    pub include_patterns: Option<Vec<String>>,
    pub exclude_patterns: Option<Vec<String>>,
    pub max_file_size: Option<u64>,
    pub linters: Option<BTreeMap<String, LinterSettings>>,
    pub ai: Option<AiSettings>,
    pub review_categories: Option<Vec<String>>,
    pub language_rules: Option<BTreeMap<String, RuleToggles>>,
}

impl ReviewConfig {
    /// Merge a partial preset over the base defaults.
    pub fn from_overrides(overrides: PresetOverrides) -> Self {
        Self {
            include_patterns: overrides
                .include_patterns
                .unwrap_or_else(default_include_patterns),
            exclude_patterns: overrides
                .exclude_patterns
                .unwrap_or_else(default_exclude_patterns),
            max_file_size: overrides.max_file_size.unwrap_or(DEFAULT_MAX_FILE_SIZE),
            linters: overrides.linters.unwrap_or_else(default_linters),
            ai: overrides.ai.unwrap_or_default(),
            review_categories: overrides
                .review_categories
                .unwrap_or_else(default_review_categories),
            language_rules: overrides
                .language_rules
                .unwrap_or_else(default_language_rules),
        }
    }

    /// Settings for a linter, if that linter is enabled in this config.
    pub fn enabled_linter(&self, name: &str) -> Option<&LinterSettings> {
        self.linters.get(name).filter(|settings| settings.enabled)
    }
}

/// Default per-file review cutoff, 1 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;

fn default_include_patterns() -> Vec<String> {
    [
        "*.py", "*.js", "*.ts", "*.jsx", "*.tsx", "*.java", "*.cpp", "*.c", "*.go", "*.rs",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_exclude_patterns() -> Vec<String> {
    [
        "*.min.js",
        "*.min.css",
        "*.map",
        "node_modules/*",
        "venv/*",
        "__pycache__/*",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_linters() -> BTreeMap<String, LinterSettings> {
    let mut linters = BTreeMap::new();
    linters.insert(
        "pylint".to_string(),
        LinterSettings::with_args(["--disable=C0114"]),
    );
    linters.insert("flake8".to_string(), LinterSettings::default());
    linters.insert("black".to_string(), LinterSettings::default());
    linters.insert("isort".to_string(), LinterSettings::default());
    linters.insert("eslint".to_string(), LinterSettings::default());
    linters.insert("prettier".to_string(), LinterSettings::default());
    linters
}

fn default_review_categories() -> Vec<String> {
    [
        "code_quality",
        "security",
        "performance",
        "maintainability",
        "documentation",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub(crate) fn toggles<const N: usize>(rules: [(&str, bool); N]) -> RuleToggles {
    rules
        .iter()
        .map(|(name, on)| (name.to_string(), *on))
        .collect()
}

fn default_language_rules() -> BTreeMap<String, RuleToggles> {
    let mut rules = BTreeMap::new();
    rules.insert(
        "python".to_string(),
        toggles([
            ("type_hints", true),
            ("docstrings", true),
            ("imports", true),
            ("formatting", true),
        ]),
    );
    rules.insert(
        "javascript".to_string(),
        toggles([("es6_features", true), ("async_await", true), ("error_handling", true)]),
    );
    rules.insert(
        "typescript".to_string(),
        toggles([("strict_types", true), ("interface_usage", true), ("generic_types", true)]),
    );
    rules.insert(
        "react".to_string(),
        toggles([("hooks_rules", true), ("component_structure", true), ("state_management", true)]),
    );
    rules
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_backfilled_once() {
        let config = ReviewConfig::default();
        assert!(config.include_patterns.contains(&"*.py".to_string()));
        assert!(config.exclude_patterns.contains(&"node_modules/*".to_string()));
        assert_eq!(config.max_file_size, DEFAULT_MAX_FILE_SIZE);
        assert_eq!(config.ai.model, "gpt-3.5-turbo");
        assert_eq!(config.ai.max_tokens, 1000);
        assert!(config.linters.contains_key("pylint"));
        assert_eq!(config.review_categories.len(), 5);
    }

    #[test]
    fn overrides_replace_only_named_fields() {
        let config = ReviewConfig::from_overrides(PresetOverrides {
            review_categories: Some(vec!["security".to_string()]),
            ..PresetOverrides::default()
        });
        assert_eq!(config.review_categories, vec!["security".to_string()]);
        // Untouched fields keep the defaults.
        assert_eq!(config.include_patterns, ReviewConfig::default().include_patterns);
        assert_eq!(config.ai, AiSettings::default());
    }

    #[test]
    fn pylint_carries_its_default_disable_flag() {
        let config = ReviewConfig::default();
        let pylint = config.enabled_linter("pylint").expect("pylint enabled");
        assert_eq!(pylint.extra_args, vec!["--disable=C0114".to_string()]);
        assert_eq!(pylint.timeout_secs, 30);
    }

    #[test]
    fn disabled_linters_are_not_surfaced() {
        let mut config = ReviewConfig::default();
        config
            .linters
            .get_mut("black")
            .expect("black configured")
            .enabled = false;
        assert!(config.enabled_linter("black").is_none());
        assert!(config.enabled_linter("nonexistent").is_none());
    }
}
