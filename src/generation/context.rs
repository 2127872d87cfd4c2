//! Workflow context - the record of one create-function invocation
//!
//! Each stage returns a [`ContextUpdate`] describing what it decided; the
//! orchestrator folds those into the [`WorkflowContext`] it owns. Stages never
//! see the context itself.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Properties produced by a single stage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextUpdate {
    properties: BTreeMap<String, String>,
}

impl ContextUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property, replacing any earlier value for the same key
    pub fn set(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.properties.insert(key.into(), value.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Identity and accumulated properties of one invocation
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowContext {
    pub invocation_id: Uuid,
    pub started_at: DateTime<Utc>,
    properties: BTreeMap<String, String>,
}

impl WorkflowContext {
    pub fn new() -> Self {
        Self {
            invocation_id: Uuid::new_v4(),
            started_at: Utc::now(),
            properties: BTreeMap::new(),
        }
    }

    /// Fold a stage's update into this context
    pub fn merge(&mut self, update: ContextUpdate) {
        self.properties.extend(update.properties);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    /// Milliseconds since the invocation started
    pub fn elapsed_ms(&self) -> i64 {
        (Utc::now() - self.started_at).num_milliseconds()
    }
}

impl Default for WorkflowContext {
    fn default() -> Self {
        Self::new()
    }
}
