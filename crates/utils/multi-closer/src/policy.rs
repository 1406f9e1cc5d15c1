use crate::{
    BoxError,
    error::{CloseError, MultiError},
};
use std::{borrow::Cow, fmt, sync::Mutex};

pub const DEFAULT_SEPARATOR: &str = ": ";

/// Receives every construction error passed to `add` under [`AddPolicy::Handle`].
pub type ErrorHandler = Box<dyn FnMut(BoxError) + Send>;

/// What `add` does with a construction error.
pub enum AddPolicy {
    /// Panic. A resource that cannot be built at startup is a configuration
    /// error and the process is not expected to continue.
    Panic,

    /// Call the handler and skip registration; `add` returns `None`.
    ///
    /// The lock only makes the registry `Sync`; `add` reaches the handler
    /// through `&mut self` and never contends on it.
    Handle(Mutex<ErrorHandler>),
}

impl AddPolicy {
    pub fn handle<F>(handler: F) -> Self
    where
        F: FnMut(BoxError) + Send + 'static,
    {
        Self::Handle(Mutex::new(Box::new(handler)))
    }

    pub(crate) fn from_handler(handler: ErrorHandler) -> Self {
        Self::Handle(Mutex::new(handler))
    }
}

impl fmt::Debug for AddPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Panic => f.write_str("Panic"),
            Self::Handle(_) => f.write_str("Handle(..)"),
        }
    }
}

/// How `close` reports failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClosePolicy {
    /// Join the failure messages, in encounter order, with `separator`.
    Flatten { separator: Cow<'static, str> },

    /// Keep each failure in a [`MultiError`].
    Collect,
}

impl ClosePolicy {
    pub fn flatten() -> Self {
        Self::Flatten {
            separator: Cow::Borrowed(DEFAULT_SEPARATOR),
        }
    }

    pub fn flatten_with(separator: impl Into<Cow<'static, str>>) -> Self {
        Self::Flatten {
            separator: separator.into(),
        }
    }

    pub(crate) fn aggregator(&self) -> Aggregator<'_> {
        match self {
            Self::Flatten { separator } => Aggregator::Flatten {
                separator: &**separator,
                message: None,
            },
            Self::Collect => Aggregator::Collect(MultiError::new()),
        }
    }
}

impl Default for ClosePolicy {
    fn default() -> Self {
        Self::flatten()
    }
}

/// Accumulates close failures for a single `close` call.
pub(crate) enum Aggregator<'a> {
    Flatten {
        separator: &'a str,
        message: Option<String>,
    },
    Collect(MultiError),
}

impl Aggregator<'_> {
    pub(crate) fn push(&mut self, err: BoxError) {
        match self {
            Self::Flatten { separator, message } => {
                let err = err.to_string();
                *message = Some(match message.take() {
                    Some(joined) => format!("{joined}{separator}{err}"),
                    None => err,
                });
            }
            Self::Collect(multi) => multi.push(err),
        }
    }

    pub(crate) fn finish(self) -> Result<(), CloseError> {
        match self {
            Self::Flatten { message, .. } => match message {
                Some(message) => Err(CloseError::flattened(message)),
                None => Ok(()),
            },
            Self::Collect(multi) => multi.into_result().map_err(CloseError::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(policy: &ClosePolicy, errors: &[&'static str]) -> Result<(), CloseError> {
        let mut aggregator = policy.aggregator();
        for err in errors {
            aggregator.push((*err).into());
        }
        aggregator.finish()
    }

    #[test]
    fn test_empty_aggregate_is_ok() {
        assert!(run(&ClosePolicy::flatten(), &[]).is_ok());
        assert!(run(&ClosePolicy::Collect, &[]).is_ok());
    }

    #[test]
    fn test_flatten_joins_in_order() {
        let err = run(&ClosePolicy::flatten(), &["e1", "e2", "e3"]).unwrap_err();
        assert_eq!(err.to_string(), "e1: e2: e3");
    }

    #[test]
    fn test_flatten_custom_separator() {
        let err = run(&ClosePolicy::flatten_with(" | "), &["e1", "e2"]).unwrap_err();
        assert_eq!(err.to_string(), "e1 | e2");
    }

    #[test]
    fn test_collect_keeps_each_error() {
        let err = run(&ClosePolicy::Collect, &["e1", "e2"]).unwrap_err();
        let messages: Vec<_> = err
            .as_multi()
            .unwrap()
            .iter()
            .map(|e| e.to_string())
            .collect();
        assert_eq!(messages, vec!["e1", "e2"]);
    }

    #[test]
    fn test_add_policy_debug_hides_handler() {
        let policy = AddPolicy::handle(|_| {});
        assert_eq!(format!("{:?}", policy), "Handle(..)");
        assert_eq!(format!("{:?}", AddPolicy::Panic), "Panic");
    }
}
