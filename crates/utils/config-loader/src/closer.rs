use serde::{Deserialize, Serialize};

/// What a registry does when a resource fails to construct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OnAddError {
    /// Abort startup immediately.
    #[default]
    Panic,
    /// Hand the error to a caller-supplied handler and skip registration.
    Handle,
}

/// How a registry reports the failures collected while closing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregate {
    /// Join every failure message into one string.
    #[default]
    Flatten,
    /// Keep every failure as its own error value.
    Collect,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
#[non_exhaustive]
pub struct CloserConfig {
    /// Name used in log fields.
    pub label: String,
    pub on_add_error: OnAddError,
    pub aggregate: Aggregate,
    /// Only used by [`Aggregate::Flatten`].
    pub separator: String,
}

impl Default for CloserConfig {
    fn default() -> Self {
        Self {
            label: "multi-closer".to_string(),
            on_add_error: OnAddError::default(),
            aggregate: Aggregate::default(),
            separator: ": ".to_string(),
        }
    }
}

impl CloserConfig {
    pub fn new(on_add_error: OnAddError, aggregate: Aggregate) -> Self {
        Self {
            on_add_error,
            aggregate,
            ..Self::default()
        }
    }
}
