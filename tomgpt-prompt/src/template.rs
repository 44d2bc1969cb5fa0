use std::collections::{BTreeSet, HashMap};

use regex::Regex;
use tomgpt_core::{TomGptError, Value};

const VARIABLE_PATTERN: &str = r"\{\{\s*(\w+)\s*\}\}";

/// `{{ name }}` placeholder template.
///
/// Every placeholder must have a value at render time; single braces pass
/// through untouched.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
    pattern: Regex,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Result<Self, TomGptError> {
        let pattern =
            Regex::new(VARIABLE_PATTERN).map_err(|e| TomGptError::InvalidConfig(e.to_string()))?;
        Ok(Self {
            template: template.into(),
            pattern,
        })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Placeholder names in first-seen order, without duplicates.
    pub fn input_variables(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.pattern
            .captures_iter(&self.template)
            .filter_map(|caps| {
                let name = caps[1].to_string();
                seen.insert(name.clone()).then_some(name)
            })
            .collect()
    }

    pub fn uses(&self, variable: &str) -> bool {
        self.input_variables().iter().any(|name| name == variable)
    }

    /// Substitutes every placeholder; string values are inserted without
    /// JSON quoting.
    pub fn render(&self, vars: &HashMap<String, Value>) -> Result<String, TomGptError> {
        if let Some(missing) = self
            .input_variables()
            .into_iter()
            .find(|name| !vars.contains_key(name))
        {
            return Err(TomGptError::InvalidConfig(format!(
                "missing prompt variable '{missing}'"
            )));
        }
        let rendered = self
            .pattern
            .replace_all(&self.template, |caps: &regex::Captures| {
                match vars.get(&caps[1]) {
                    Some(Value::String(text)) => text.clone(),
                    Some(value) => value.to_string(),
                    None => String::new(),
                }
            });
        Ok(rendered.into_owned())
    }
}
