use crate::BoxError;
use std::{fmt, slice};
use thiserror::Error;

/// Ordered collection of the errors returned while closing resources.
///
/// Pushing a non-empty nested [`MultiError`] (or [`CloseError::Multiple`])
/// splices its errors in place, so nested registries report a single flat list.
#[derive(Debug, Default)]
pub struct MultiError {
    errors: Vec<BoxError>,
}

impl MultiError {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty nested error is still a failure and is kept as one entry.
    pub fn push(&mut self, err: impl Into<BoxError>) {
        let err: BoxError = err.into();
        let err = match err.downcast::<MultiError>() {
            Ok(nested) if !nested.is_empty() => {
                self.errors.extend(nested.errors);
                return;
            }
            Ok(empty) => {
                self.errors.push(empty);
                return;
            }
            Err(err) => err,
        };

        match err.downcast::<CloseError>() {
            Ok(nested) => match *nested {
                CloseError::Multiple(nested) if !nested.is_empty() => {
                    self.errors.extend(nested.errors);
                }
                other => self.errors.push(Box::new(other)),
            },
            Err(err) => self.errors.push(err),
        }
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[BoxError] {
        &self.errors
    }

    pub fn iter(&self) -> slice::Iter<'_, BoxError> {
        self.errors.iter()
    }

    pub fn into_errors(self) -> Vec<BoxError> {
        self.errors
    }

    /// Errors whose concrete type is `E`, in the order they were collected.
    pub fn downcast_iter<E>(&self) -> impl Iterator<Item = &E>
    where
        E: std::error::Error + 'static,
    {
        self.errors.iter().filter_map(|e| e.downcast_ref::<E>())
    }

    /// `Ok(())` when nothing was collected.
    pub fn into_result(self) -> Result<(), MultiError> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for MultiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.len() == 1 {
            return write!(f, "1 error occurred:\n\t* {}\n\n", self.errors[0]);
        }

        write!(f, "{} errors occurred:", self.errors.len())?;
        for err in &self.errors {
            write!(f, "\n\t* {}", err)?;
        }
        f.write_str("\n\n")
    }
}

impl std::error::Error for MultiError {}

impl<E: Into<BoxError>> FromIterator<E> for MultiError {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        let mut multi = MultiError::new();
        multi.extend(iter);
        multi
    }
}

impl<E: Into<BoxError>> Extend<E> for MultiError {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        for err in iter {
            self.push(err);
        }
    }
}

impl IntoIterator for MultiError {
    type Item = BoxError;
    type IntoIter = std::vec::IntoIter<BoxError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a MultiError {
    type Item = &'a BoxError;
    type IntoIter = slice::Iter<'a, BoxError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// Aggregate result of closing a registry.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CloseError {
    /// Every failure message joined into one string.
    #[error("{message}")]
    Flattened { message: String },

    /// Every failure kept as its own error.
    #[error(transparent)]
    Multiple(#[from] MultiError),
}

impl CloseError {
    pub fn flattened(message: impl Into<String>) -> Self {
        Self::Flattened {
            message: message.into(),
        }
    }

    pub fn as_multi(&self) -> Option<&MultiError> {
        match self {
            Self::Multiple(multi) => Some(multi),
            Self::Flattened { .. } => None,
        }
    }

    pub fn into_multi(self) -> Option<MultiError> {
        match self {
            Self::Multiple(multi) => Some(multi),
            Self::Flattened { .. } => None,
        }
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BuildError {
    #[error("closer '{label}' handles add errors but no error handler was set")]
    MissingErrorHandler { label: String },
}

impl BuildError {
    pub fn missing_error_handler(label: impl Into<String>) -> Self {
        Self::MissingErrorHandler {
            label: label.into(),
        }
    }
}

pub type CloseResult<T> = Result<T, CloseError>;
