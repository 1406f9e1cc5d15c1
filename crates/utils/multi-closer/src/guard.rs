use crate::{MultiCloser, error::CloseError};
use logger::error;

/// Closes the wrapped registry when dropped.
///
/// Failures on drop can only be logged; call [`CloseGuard::close`] to get them
/// back instead.
#[derive(Debug)]
pub struct CloseGuard {
    closer: Option<MultiCloser>,
}

impl CloseGuard {
    pub(crate) fn new(closer: MultiCloser) -> Self {
        Self {
            closer: Some(closer),
        }
    }

    /// Access the registry, e.g. to add resources built after the guard.
    pub fn closer_mut(&mut self) -> &mut MultiCloser {
        // Only `close`, `disarm` and `drop` take the closer, and all of them
        // consume the guard.
        self.closer
            .as_mut()
            .expect("close guard holds its closer until consumed")
    }

    /// Close now and return the result. Nothing happens on drop afterwards.
    pub fn close(mut self) -> Result<(), CloseError> {
        match self.closer.take() {
            Some(closer) => closer.close(),
            None => Ok(()),
        }
    }

    /// Take the registry back without closing it.
    pub fn disarm(mut self) -> Option<MultiCloser> {
        self.closer.take()
    }
}

impl Drop for CloseGuard {
    fn drop(&mut self) {
        if let Some(closer) = self.closer.take() {
            if let Err(e) = closer.close() {
                error!(closer = %closer.label(), error = %e, "failed to close resources on drop");
            }
        }
    }
}
