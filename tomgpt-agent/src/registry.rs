use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tomgpt_core::Tool;

use crate::ToolRegistryError;

/// The fixed set of tools one deployment exposes to the loop.
///
/// Lookup is exact and case-sensitive; listing follows registration order so
/// the prompt is stable.
#[derive(Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    by_name: HashMap<String, usize>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("names", &self.names())
            .finish()
    }
}

impl ToolRegistry {
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> ToolRegistryBuilder {
        ToolRegistryBuilder::default()
    }

    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.by_name.get(name).map(|&index| &self.tools[index])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// One `name: description` line per tool.
    pub fn render_descriptions(&self) -> String {
        self.tools
            .iter()
            .map(|tool| format!("{}: {}", tool.name(), tool.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn render_names(&self) -> String {
        self.names().join(", ")
    }
}

#[derive(Clone, Default)]
pub struct ToolRegistryBuilder {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistryBuilder {
    pub fn register(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn register_all(mut self, tools: impl IntoIterator<Item = Arc<dyn Tool>>) -> Self {
        self.tools.extend(tools);
        self
    }

    pub fn build(self) -> Result<ToolRegistry, ToolRegistryError> {
        if self.tools.is_empty() {
            return Err(ToolRegistryError::Empty);
        }

        let mut seen = HashSet::new();
        let mut by_name = HashMap::new();
        for (index, tool) in self.tools.iter().enumerate() {
            let name = tool.name();
            if name.trim().is_empty() {
                return Err(ToolRegistryError::InvalidName {
                    name: name.to_string(),
                });
            }
            if !seen.insert(name.to_string()) {
                return Err(ToolRegistryError::DuplicateName {
                    name: name.to_string(),
                });
            }
            by_name.insert(name.to_string(), index);
        }

        Ok(ToolRegistry {
            tools: self.tools,
            by_name,
        })
    }
}
