use crate::{
    BoxError, MultiCloser,
    error::BuildError,
    multi_closer::DEFAULT_LABEL,
    policy::{AddPolicy, ClosePolicy, DEFAULT_SEPARATOR, ErrorHandler},
};
use config_loader::closer::{Aggregate, CloserConfig, OnAddError};
use logger::warn;
use std::{borrow::Cow, fmt};

/// Builds a [`MultiCloser`] from individual settings or a [`CloserConfig`].
///
/// A handler cannot come from a config file, so selecting
/// [`OnAddError::Handle`] requires [`error_handler`](Self::error_handler)
/// before [`build`](Self::build).
pub struct MultiCloserBuilder {
    label: Cow<'static, str>,
    on_add_error: OnAddError,
    aggregate: Aggregate,
    separator: Cow<'static, str>,
    handler: Option<ErrorHandler>,
}

impl Default for MultiCloserBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiCloserBuilder {
    pub fn new() -> Self {
        Self {
            label: Cow::Borrowed(DEFAULT_LABEL),
            on_add_error: OnAddError::Panic,
            aggregate: Aggregate::Flatten,
            separator: Cow::Borrowed(DEFAULT_SEPARATOR),
            handler: None,
        }
    }

    pub fn from_config(config: &CloserConfig) -> Self {
        Self {
            label: Cow::Owned(config.label.clone()),
            on_add_error: config.on_add_error,
            aggregate: config.aggregate,
            separator: Cow::Owned(config.separator.clone()),
            handler: None,
        }
    }

    pub fn label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.label = label.into();
        self
    }

    pub fn on_add_error(mut self, on_add_error: OnAddError) -> Self {
        self.on_add_error = on_add_error;
        self
    }

    pub fn aggregate(mut self, aggregate: Aggregate) -> Self {
        self.aggregate = aggregate;
        self
    }

    pub fn separator(mut self, separator: impl Into<Cow<'static, str>>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn error_handler<F>(mut self, handler: F) -> Self
    where
        F: FnMut(BoxError) + Send + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    pub fn build(self) -> Result<MultiCloser, BuildError> {
        let add_policy = match (self.on_add_error, self.handler) {
            (OnAddError::Handle, Some(handler)) => AddPolicy::from_handler(handler),
            (OnAddError::Handle, None) => {
                return Err(BuildError::missing_error_handler(self.label));
            }
            (OnAddError::Panic, handler) => {
                if handler.is_some() {
                    warn!(closer = %self.label, "error handler set but add errors panic, handler is unused");
                }
                AddPolicy::Panic
            }
        };

        let close_policy = match self.aggregate {
            Aggregate::Flatten => ClosePolicy::flatten_with(self.separator),
            Aggregate::Collect => ClosePolicy::Collect,
        };

        Ok(MultiCloser::new(add_policy, close_policy).with_label(self.label))
    }
}

impl fmt::Debug for MultiCloserBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiCloserBuilder")
            .field("label", &self.label)
            .field("on_add_error", &self.on_add_error)
            .field("aggregate", &self.aggregate)
            .field("separator", &self.separator)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_match_simple() {
        let closer = MultiCloserBuilder::new().build().unwrap();
        assert!(matches!(closer.add_policy(), AddPolicy::Panic));
        assert_eq!(closer.close_policy(), &ClosePolicy::flatten());
        assert_eq!(closer.label(), DEFAULT_LABEL);
    }

    #[test]
    fn test_handle_without_handler_is_rejected() {
        let config = CloserConfig::new(OnAddError::Handle, Aggregate::Collect);
        let err = MultiCloserBuilder::from_config(&config).build().unwrap_err();

        assert!(matches!(err, BuildError::MissingErrorHandler { ref label } if label == DEFAULT_LABEL));
    }

    #[test]
    fn test_from_config_applies_every_setting() {
        let mut config = CloserConfig::new(OnAddError::Handle, Aggregate::Flatten);
        config.label = "workers".to_string();
        config.separator = " / ".to_string();

        let closer = MultiCloserBuilder::from_config(&config)
            .error_handler(|_| {})
            .build()
            .unwrap();

        assert_eq!(closer.label(), "workers");
        assert!(matches!(closer.add_policy(), AddPolicy::Handle(_)));
        assert_eq!(closer.close_policy(), &ClosePolicy::flatten_with(" / "));
    }

    #[test]
    fn test_panic_policy_ignores_handler() {
        let closer = MultiCloserBuilder::new()
            .aggregate(Aggregate::Collect)
            .error_handler(|_| {})
            .build()
            .unwrap();

        assert!(matches!(closer.add_policy(), AddPolicy::Panic));
        assert_eq!(closer.close_policy(), &ClosePolicy::Collect);
    }
}
