//! Variable substitution for paths, filters and pipelines
//!
//! Handles `${NAME}` references in configured text. Names resolve against
//! the job's variables first, then the process environment.

use crate::error::{Error, Result};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Regex for matching variable references: ${NAME} or ${scope.name}
static VARIABLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{\s*([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*)\s*\}").unwrap()
});

/// Environment name lookup applied to raw configured text
pub trait NameResolver {
    /// Substitute every resolvable reference in `text`
    fn resolve(&self, text: &str) -> String;
}

impl<F> NameResolver for F
where
    F: Fn(&str) -> String,
{
    fn resolve(&self, text: &str) -> String {
        self(text)
    }
}

/// Named variables available to substitution
#[derive(Debug, Clone)]
pub struct VariableSpace {
    vars: HashMap<String, String>,
    use_env: bool,
}

impl Default for VariableSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableSpace {
    /// Create a variable space that falls back to the process environment
    pub fn new() -> Self {
        Self {
            vars: HashMap::new(),
            use_env: true,
        }
    }

    /// Create a variable space that only knows explicitly set variables
    pub fn isolated() -> Self {
        Self {
            vars: HashMap::new(),
            use_env: false,
        }
    }

    /// Create a variable space from a map
    pub fn with_vars(vars: HashMap<String, String>) -> Self {
        Self {
            vars,
            use_env: true,
        }
    }

    /// Set a variable
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Look up a variable by name
    pub fn get(&self, name: &str) -> Option<String> {
        if let Some(value) = self.vars.get(name) {
            return Some(value.clone());
        }
        if self.use_env {
            return std::env::var(name).ok();
        }
        None
    }

    /// Substitute references, leaving undefined ones verbatim
    pub fn render(&self, text: &str) -> String {
        VARIABLE_REGEX
            .replace_all(text, |caps: &regex::Captures<'_>| {
                self.get(&caps[1]).unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    /// Substitute references, failing on any undefined variable
    pub fn render_strict(&self, text: &str) -> Result<String> {
        let missing: Vec<String> = extract_variables(text)
            .into_iter()
            .filter(|name| self.get(name).is_none())
            .collect();

        if missing.is_empty() {
            Ok(self.render(text))
        } else {
            Err(Error::undefined_var(missing.join(", ")))
        }
    }
}

impl NameResolver for VariableSpace {
    fn resolve(&self, text: &str) -> String {
        self.render(text)
    }
}

/// Check if a string contains variable references
pub fn has_variables(s: &str) -> bool {
    VARIABLE_REGEX.is_match(s)
}

/// Extract all variable names from a text
pub fn extract_variables(text: &str) -> Vec<String> {
    VARIABLE_REGEX
        .captures_iter(text)
        .map(|cap| cap[1].to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space() -> VariableSpace {
        let mut vars = VariableSpace::isolated();
        vars.set("ROOT", "parent").set("IDX", "1");
        vars
    }

    #[test]
    fn test_simple_substitution() {
        assert_eq!(space().render("$.${ROOT}.child"), "$.parent.child");
    }

    #[test]
    fn test_multiple_substitutions() {
        assert_eq!(
            space().render("$.${ROOT}.list[${IDX}]"),
            "$.parent.list[1]"
        );
    }

    #[test]
    fn test_whitespace_in_reference() {
        assert_eq!(space().render("${ ROOT }"), "parent");
        assert_eq!(space().render("${ROOT}"), "parent");
    }

    #[test]
    fn test_undefined_left_verbatim() {
        assert_eq!(space().render("a.${MISSING}.b"), "a.${MISSING}.b");
    }

    #[test]
    fn test_render_strict() {
        assert_eq!(space().render_strict("${ROOT}").unwrap(), "parent");

        let err = space().render_strict("${ROOT}.${NOPE}").unwrap_err();
        assert!(err.to_string().contains("NOPE"));
    }

    #[test]
    fn test_no_variables() {
        assert_eq!(space().render("plain.path[0]"), "plain.path[0]");
        assert!(!has_variables("plain.path[0]"));
        assert!(has_variables("${X}"));
        assert!(!has_variables("$X"));
    }

    #[test]
    fn test_extract_variables() {
        assert_eq!(extract_variables("${a} and ${b.c}"), vec!["a", "b.c"]);
    }

    #[test]
    fn test_env_fallback() {
        if let Ok(path) = std::env::var("PATH") {
            assert_eq!(VariableSpace::new().render("${PATH}"), path);
            assert_eq!(VariableSpace::isolated().render("${PATH}"), "${PATH}");
        }
    }

    #[test]
    fn test_closure_resolver() {
        let upper = |s: &str| s.to_uppercase();
        assert_eq!(upper.resolve("abc"), "ABC");
    }
}
