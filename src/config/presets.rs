//! Named configuration presets and the static prompt/label lookup tables.
//!
//! Presets are alternatives a project selects by key (`--project-type`);
//! an unrecognized key falls back to the default preset rather than failing.

use super::{PresetOverrides, ReviewConfig, RuleToggles, toggles};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

static PRESETS: Lazy<BTreeMap<&'static str, ReviewConfig>> = Lazy::new(|| {
    let mut presets = BTreeMap::new();
    presets.insert("default", ReviewConfig::default());
    presets.insert("web_app", web_app_preset());
    presets.insert("api", api_preset());
    presets.insert("data_science", data_science_preset());
    presets
});

/// Look up the preset for a project type, falling back to the default
/// preset for unrecognized keys. Never fails.
pub fn resolve_config(project_type: &str) -> ReviewConfig {
    PRESETS
        .get(project_type)
        .cloned()
        .unwrap_or_else(ReviewConfig::default)
}

fn web_app_preset() -> ReviewConfig {
    let mut language_rules = BTreeMap::new();
    language_rules.insert(
        "javascript".to_string(),
        toggles([
            ("es6_features", true),
            ("async_await", true),
            ("error_handling", true),
            ("security_best_practices", true),
        ]),
    );
    language_rules.insert(
        "react".to_string(),
        toggles([
            ("hooks_rules", true),
            ("component_structure", true),
            ("state_management", true),
            ("performance_optimization", true),
        ]),
    );

    ReviewConfig::from_overrides(PresetOverrides {
        review_categories: Some(categories(["security", "performance", "accessibility"])),
        language_rules: Some(language_rules),
        ..PresetOverrides::default()
    })
}

fn api_preset() -> ReviewConfig {
    let mut language_rules = BTreeMap::new();
    language_rules.insert(
        "python".to_string(),
        toggles([
            ("type_hints", true),
            ("docstrings", true),
            ("error_handling", true),
            ("input_validation", true),
        ]),
    );

    ReviewConfig::from_overrides(PresetOverrides {
        review_categories: Some(categories(["security", "performance", "documentation"])),
        language_rules: Some(language_rules),
        ..PresetOverrides::default()
    })
}

fn data_science_preset() -> ReviewConfig {
    let mut language_rules = BTreeMap::new();
    language_rules.insert(
        "python".to_string(),
        toggles([
            ("type_hints", true),
            ("docstrings", true),
            ("numpy_pandas_best_practices", true),
            ("memory_optimization", true),
        ]),
    );

    ReviewConfig::from_overrides(PresetOverrides {
        review_categories: Some(categories(["code_quality", "performance", "documentation"])),
        language_rules: Some(language_rules),
        ..PresetOverrides::default()
    })
}

fn categories<const N: usize>(names: [&str; N]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Language-specific suffixes appended to the AI review prompt.
static LANGUAGE_PROMPT_SUFFIXES: Lazy<BTreeMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut suffixes = BTreeMap::new();
    suffixes.insert(
        "python",
        "\n\nPay special attention to Python best practices, PEP 8 compliance, and type hints.",
    );
    suffixes.insert(
        "javascript",
        "\n\nFocus on ES6+ features, async/await patterns, and modern JavaScript practices.",
    );
    suffixes.insert(
        "typescript",
        "\n\nEmphasize TypeScript-specific features like strict typing, interfaces, and generics.",
    );
    suffixes.insert(
        "react",
        "\n\nConsider React best practices, hooks rules, component structure, and performance optimization.",
    );
    suffixes
});

/// Append the language-specific suffix to a base prompt. Lookup is
/// case-insensitive; unknown languages return the base prompt unchanged.
pub fn customize_prompt(language: &str, base_prompt: &str) -> String {
    match LANGUAGE_PROMPT_SUFFIXES.get(language.to_lowercase().as_str()) {
        Some(suffix) => format!("{base_prompt}{suffix}"),
        None => base_prompt.to_string(),
    }
}

/// Focused prompt bodies per review category, for projects that want one
/// category emphasized over the general rubric.
static REVIEW_PROMPTS: Lazy<BTreeMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut prompts = BTreeMap::new();
    prompts.insert(
        "security",
        "Focus on security vulnerabilities:\n\
         - SQL injection prevention\n\
         - XSS protection\n\
         - Input validation\n\
         - Authentication/authorization\n\
         - Secure coding practices",
    );
    prompts.insert(
        "performance",
        "Focus on performance optimization:\n\
         - Algorithm efficiency\n\
         - Memory usage\n\
         - Database query optimization\n\
         - Caching strategies\n\
         - Resource management",
    );
    prompts.insert(
        "maintainability",
        "Focus on code maintainability:\n\
         - Code organization\n\
         - Naming conventions\n\
         - Function/method complexity\n\
         - Code duplication\n\
         - Modularity",
    );
    prompts.insert(
        "documentation",
        "Focus on documentation quality:\n\
         - Function/method documentation\n\
         - Code comments\n\
         - README files\n\
         - API documentation\n\
         - Inline documentation",
    );
    prompts
});

/// The focused prompt body for a review category, if one is registered.
pub fn review_prompt(category: &str) -> Option<&'static str> {
    REVIEW_PROMPTS.get(category.to_lowercase().as_str()).copied()
}

/// Rule toggles for a specific framework (django, flask, express, react).
static FRAMEWORK_RULES: Lazy<BTreeMap<&'static str, RuleToggles>> = Lazy::new(|| {
    let mut rules = BTreeMap::new();
    rules.insert(
        "django",
        toggles([
            ("check_orm_usage", true),
            ("check_security_middleware", true),
            ("check_url_patterns", true),
        ]),
    );
    rules.insert(
        "flask",
        toggles([
            ("check_blueprint_usage", true),
            ("check_error_handling", true),
            ("check_security_headers", true),
        ]),
    );
    rules.insert(
        "express",
        toggles([
            ("check_middleware_order", true),
            ("check_error_handling", true),
            ("check_route_security", true),
        ]),
    );
    rules.insert(
        "react",
        toggles([
            ("check_hooks_dependencies", true),
            ("check_prop_types", true),
            ("check_memoization", true),
        ]),
    );
    rules
});

pub fn framework_rules(framework: &str) -> Option<&'static RuleToggles> {
    FRAMEWORK_RULES.get(framework.to_lowercase().as_str())
}

/// Severity scale attached to findings when a project wants to triage them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Human-facing label used in comment bodies.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Critical => "🔴 Critical - Must fix immediately",
            Self::High => "🟠 High - Should fix soon",
            Self::Medium => "🟡 Medium - Consider fixing",
            Self::Low => "🟢 Low - Nice to have",
            Self::Info => "ℹ️ Info - FYI only",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Critical => write!(f, "critical"),
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
            Self::Info => write!(f, "info"),
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "critical" => Ok(Self::Critical),
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            "info" => Ok(Self::Info),
            other => Err(format!("unknown severity: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn unknown_project_type_falls_back_to_default() {
        assert_eq!(resolve_config("unknown_key"), resolve_config("default"));
    }

    #[test]
    fn presets_override_categories_but_share_base_fields() {
        let web = resolve_config("web_app");
        assert_eq!(
            web.review_categories,
            vec!["security", "performance", "accessibility"]
        );
        // Fields the preset does not touch keep the shared defaults.
        assert_eq!(web.include_patterns, ReviewConfig::default().include_patterns);
        assert_eq!(web.ai, ReviewConfig::default().ai);

        let api = resolve_config("api");
        assert!(api.language_rules["python"]["input_validation"]);

        let ds = resolve_config("data_science");
        assert!(ds.language_rules["python"]["numpy_pandas_best_practices"]);
    }

    #[test]
    fn prompt_suffix_lookup_is_case_insensitive() {
        let customized = customize_prompt("Python", "Review this.");
        assert!(customized.starts_with("Review this."));
        assert!(customized.contains("PEP 8"));

        assert_eq!(customize_prompt("cobol", "Review this."), "Review this.");
    }

    #[test]
    fn category_prompts_cover_the_focused_categories() {
        assert!(review_prompt("security").unwrap().contains("SQL injection"));
        assert!(review_prompt("PERFORMANCE").unwrap().contains("Algorithm efficiency"));
        assert!(review_prompt("code_quality").is_none());
    }

    #[test]
    fn framework_rules_lookup() {
        assert!(framework_rules("django").unwrap()["check_orm_usage"]);
        assert!(framework_rules("rails").is_none());
    }

    #[test]
    fn severity_ordering_and_labels() {
        assert!(Severity::Critical > Severity::High);
        assert_eq!(Severity::from_str("HIGH").unwrap(), Severity::High);
        assert!(Severity::Info.label().contains("FYI"));
    }
}
