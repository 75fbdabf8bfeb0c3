//! Name → (class, configuration) table
//!
//! Shared by the tool and agent registries. Each registry kind owns one
//! table; entries are registered at start-up and a later registration under
//! the same name replaces the earlier one.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use crate::core::error::{Result, SwitchboardError};

/// Which kind of component a registered name builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentClass {
    /// Side-effect-free tool signalling a routing decision
    Routing,
    /// Tool delegating to an external service
    Service,
    /// System-prompt-plus-tools wrapper around the model
    Agent,
}

impl std::fmt::Display for ComponentClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComponentClass::Routing => write!(f, "routing"),
            ComponentClass::Service => write!(f, "service"),
            ComponentClass::Agent => write!(f, "agent"),
        }
    }
}

/// A registered component: its class and the configuration it is built from
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryEntry {
    pub class: ComponentClass,
    pub config: Value,
}

impl RegistryEntry {
    /// String field of the configuration, if present
    pub fn config_str(&self, key: &str) -> Option<&str> {
        self.config.get(key).and_then(Value::as_str)
    }
}

/// Registration table for one component kind
#[derive(Debug, Clone)]
pub struct Registry {
    kind: &'static str,
    entries: HashMap<String, RegistryEntry>,
}

impl Registry {
    /// Create an empty registry; `kind` labels log lines and errors
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: HashMap::new(),
        }
    }

    /// Register a component, replacing any earlier registration
    pub fn register(&mut self, name: impl Into<String>, class: ComponentClass, config: Value) {
        let name = name.into();
        let previous = self
            .entries
            .insert(name.clone(), RegistryEntry { class, config });

        if previous.is_some() {
            warn!(kind = self.kind, %name, "Overwriting existing registration");
        } else {
            debug!(kind = self.kind, %name, %class, "Registered");
        }
    }

    /// Look up a registration
    pub fn entry(&self, name: &str) -> Result<&RegistryEntry> {
        self.entries
            .get(name)
            .ok_or_else(|| SwitchboardError::NotRegistered {
                kind: self.kind,
                name: name.to_string(),
            })
    }

    /// Whether a name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// The set of registered names
    pub fn available(&self) -> HashSet<String> {
        self.entries.keys().cloned().collect()
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
