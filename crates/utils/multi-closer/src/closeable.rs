use std::fmt;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A resource with a single teardown operation.
///
/// `close` takes `&self` so the registry and the code that built the resource
/// can share it. Whether closing twice is safe is up to the implementor.
pub trait Closeable: Send + Sync {
    fn close(&self) -> Result<(), BoxError>;
}

/// Adapts a closure into a [`Closeable`].
pub struct FnCloser<F> {
    f: F,
}

impl<F> FnCloser<F>
where
    F: Fn() -> Result<(), BoxError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Closeable for FnCloser<F>
where
    F: Fn() -> Result<(), BoxError> + Send + Sync,
{
    fn close(&self) -> Result<(), BoxError> {
        (self.f)()
    }
}

impl<F> fmt::Debug for FnCloser<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnCloser")
            .field("f", &std::any::type_name::<F>())
            .finish()
    }
}
