use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
#[non_exhaustive]
pub struct LoggerConfig {
    pub max_level: String,
    /// Colored output on the console writer.
    pub ansi: bool,
    /// Include file and line of the callsite.
    pub with_location: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            max_level: "INFO".to_string(),
            ansi: true,
            with_location: true,
        }
    }
}

impl LoggerConfig {
    pub fn with_max_level(mut self, level: impl Into<String>) -> Self {
        self.max_level = level.into();
        self
    }
}
