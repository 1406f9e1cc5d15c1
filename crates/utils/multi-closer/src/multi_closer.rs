use crate::{
    BoxError, Closeable, FnCloser,
    builder::MultiCloserBuilder,
    error::CloseError,
    guard::CloseGuard,
    policy::{AddPolicy, ClosePolicy},
};
use logger::{debug, error, warn};
use std::{
    borrow::Cow,
    fmt,
    sync::{
        Arc, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
};

pub(crate) const DEFAULT_LABEL: &str = "multi-closer";

struct Entry {
    name: Cow<'static, str>,
    resource: Arc<dyn Closeable>,
}

/// Owns the resources built at startup and closes them together.
///
/// Resources are closed in the order they were added. Every resource is
/// closed even when an earlier one fails; failures are aggregated according
/// to the [`ClosePolicy`].
///
/// The registry itself is not idempotent: calling [`close`](Self::close)
/// twice closes every resource twice, and resources added after a close are
/// closed by the next one. Both cases are logged.
///
/// Registration needs `&mut self`. `close` takes `&self` so a registry can be
/// nested as a [`Closeable`], but it is meant to be called once, from the
/// single scope that owns shutdown; concurrent calls close every resource
/// concurrently.
pub struct MultiCloser {
    label: Cow<'static, str>,
    add_policy: AddPolicy,
    close_policy: ClosePolicy,
    entries: Vec<Entry>,
    close_calls: AtomicUsize,
}

impl MultiCloser {
    pub fn new(add_policy: AddPolicy, close_policy: ClosePolicy) -> Self {
        Self {
            label: Cow::Borrowed(DEFAULT_LABEL),
            add_policy,
            close_policy,
            entries: Vec::new(),
            close_calls: AtomicUsize::new(0),
        }
    }

    /// Panics on construction errors, joins close errors into one message.
    pub fn simple() -> Self {
        Self::new(AddPolicy::Panic, ClosePolicy::flatten())
    }

    /// Hands construction errors to `handler`, collects close errors.
    pub fn with_handler<F>(handler: F) -> Self
    where
        F: FnMut(BoxError) + Send + 'static,
    {
        Self::new(AddPolicy::handle(handler), ClosePolicy::Collect)
    }

    /// Panics on construction errors, collects close errors.
    pub fn with_multi_error() -> Self {
        Self::new(AddPolicy::Panic, ClosePolicy::Collect)
    }

    pub fn builder() -> MultiCloserBuilder {
        MultiCloserBuilder::new()
    }

    pub fn with_label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.label = label.into();
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn add_policy(&self) -> &AddPolicy {
        &self.add_policy
    }

    pub fn close_policy(&self) -> &ClosePolicy {
        &self.close_policy
    }

    /// Register the result of a constructor.
    ///
    /// On success the resource is registered and a shared handle is returned.
    /// On failure the [`AddPolicy`] decides: `Panic` panics with the error,
    /// `Handle` passes the error to the handler and returns `None`.
    pub fn add<C, E>(&mut self, constructed: Result<C, E>) -> Option<Arc<C>>
    where
        C: Closeable + 'static,
        E: Into<BoxError>,
    {
        self.add_named(std::any::type_name::<C>(), constructed)
    }

    /// Like [`add`](Self::add), with the name used in logs.
    pub fn add_named<C, E>(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        constructed: Result<C, E>,
    ) -> Option<Arc<C>>
    where
        C: Closeable + 'static,
        E: Into<BoxError>,
    {
        let name = name.into();

        match constructed {
            Ok(resource) => {
                let resource = Arc::new(resource);
                self.push(name, resource.clone());
                Some(resource)
            }
            Err(err) => {
                self.reject(name, err.into());
                None
            }
        }
    }

    /// Register a resource whose constructor cannot fail.
    pub fn register<C>(&mut self, resource: C) -> Arc<C>
    where
        C: Closeable + 'static,
    {
        let resource = Arc::new(resource);
        self.push(std::any::type_name::<C>().into(), resource.clone());
        resource
    }

    /// Register a teardown closure.
    pub fn add_fn<F, E>(&mut self, name: impl Into<Cow<'static, str>>, f: F)
    where
        F: Fn() -> Result<(), E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        let closer = FnCloser::new(move || f().map_err(Into::into));
        self.push(name.into(), Arc::new(closer));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of the registered resources, in close order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_ref())
    }

    /// Close every registered resource in insertion order.
    pub fn close(&self) -> Result<(), CloseError> {
        self.close_all()
    }

    /// Close the registry when the returned guard goes out of scope.
    pub fn into_guard(self) -> CloseGuard {
        CloseGuard::new(self)
    }

    fn push(&mut self, name: Cow<'static, str>, resource: Arc<dyn Closeable>) {
        if self.close_calls.load(Ordering::Relaxed) > 0 {
            warn!(closer = %self.label, resource = %name, "resource added after close");
        }

        debug!(closer = %self.label, resource = %name, position = self.entries.len(), "registered resource");
        self.entries.push(Entry { name, resource });
    }

    fn reject(&mut self, name: Cow<'static, str>, err: BoxError) {
        match &mut self.add_policy {
            AddPolicy::Panic => {
                error!(closer = %self.label, resource = %name, error = %err, "failed to construct resource");
                panic!("{}: failed to construct {}: {}", self.label, name, err);
            }
            AddPolicy::Handle(handler) => {
                debug!(closer = %self.label, resource = %name, error = %err, "construction error passed to handler");
                let handler = handler.get_mut().unwrap_or_else(PoisonError::into_inner);
                handler(err);
            }
        }
    }

    fn close_all(&self) -> Result<(), CloseError> {
        let calls = self.close_calls.fetch_add(1, Ordering::Relaxed) + 1;
        if calls > 1 {
            warn!(closer = %self.label, calls, "closing again, every resource will be closed once more");
        }

        let mut aggregator = self.close_policy.aggregator();
        let mut failed = 0usize;

        for entry in &self.entries {
            match entry.resource.close() {
                Ok(()) => debug!(closer = %self.label, resource = %entry.name, "closed"),
                Err(err) => {
                    warn!(closer = %self.label, resource = %entry.name, error = %err, "failed to close");
                    failed += 1;
                    aggregator.push(err);
                }
            }
        }

        debug!(closer = %self.label, total = self.entries.len(), failed, "close finished");
        aggregator.finish()
    }
}

impl Default for MultiCloser {
    fn default() -> Self {
        Self::simple()
    }
}

/// Lets a registry be registered inside another one.
impl Closeable for MultiCloser {
    fn close(&self) -> Result<(), BoxError> {
        self.close_all().map_err(Into::into)
    }
}

impl fmt::Debug for MultiCloser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiCloser")
            .field("label", &self.label)
            .field("add_policy", &self.add_policy)
            .field("close_policy", &self.close_policy)
            .field("resources", &self.names().collect::<Vec<_>>())
            .field("close_calls", &self.close_calls.load(Ordering::Relaxed))
            .finish()
    }
}
