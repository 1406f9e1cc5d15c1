use config_loader::{FileFormat, load_config_str};
use multi_closer::{
    BoxError, BuildError, CloseError, Closeable, CloserConfig, MultiCloser, MultiCloserBuilder,
};
use pretty_assertions::assert_eq;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

#[derive(Default)]
struct Counter {
    closes: AtomicUsize,
}

impl Closeable for Counter {
    fn close(&self) -> Result<(), BoxError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct Broken;

impl Closeable for Broken {
    fn close(&self) -> Result<(), BoxError> {
        Err("socket already gone".into())
    }
}

#[test]
fn test_guard_closes_on_drop() {
    let mut closer = MultiCloser::simple();
    let counter = closer.register(Counter::default());

    {
        let _guard = closer.into_guard();
        assert_eq!(counter.closes.load(Ordering::SeqCst), 0);
    }

    assert_eq!(counter.closes.load(Ordering::SeqCst), 1);
}

#[test]
fn test_guard_drop_swallows_failures() {
    let mut closer = MultiCloser::with_multi_error();
    let counter = closer.register(Counter::default());
    closer.register(Broken);

    drop(closer.into_guard());

    assert_eq!(counter.closes.load(Ordering::SeqCst), 1);
}

#[test]
fn test_explicit_guard_close_returns_result_and_disarms() {
    let mut closer = MultiCloser::with_multi_error();
    let counter = closer.register(Counter::default());
    closer.register(Broken);

    let err = closer.into_guard().close().unwrap_err();

    assert!(matches!(err, CloseError::Multiple(ref multi) if multi.len() == 1));
    assert_eq!(counter.closes.load(Ordering::SeqCst), 1);
}

#[test]
fn test_guard_accepts_late_resources() {
    let mut guard = MultiCloser::simple().into_guard();
    let counter = guard.closer_mut().register(Counter::default());
    assert_eq!(guard.closer_mut().len(), 1);

    drop(guard);
    assert_eq!(counter.closes.load(Ordering::SeqCst), 1);
}

#[test]
fn test_disarmed_guard_does_not_close() {
    let mut closer = MultiCloser::simple();
    let counter = closer.register(Counter::default());

    let closer = closer.into_guard().disarm().expect("armed guard");
    assert_eq!(counter.closes.load(Ordering::SeqCst), 0);

    closer.close().unwrap();
    assert_eq!(counter.closes.load(Ordering::SeqCst), 1);
}

#[test]
fn test_build_from_loaded_config() {
    let config: CloserConfig = load_config_str(
        r#"
            label = "ingest"
            on_add_error = "handle"
            aggregate = "collect"
        "#,
        FileFormat::Toml,
    )
    .unwrap();

    let rejected = Arc::new(AtomicUsize::new(0));
    let sink = rejected.clone();

    let mut closer = MultiCloserBuilder::from_config(&config)
        .error_handler(move |_| {
            sink.fetch_add(1, Ordering::SeqCst);
        })
        .build()
        .unwrap();

    assert_eq!(closer.label(), "ingest");
    assert!(closer.add(Err::<Counter, _>("dial tcp: timeout")).is_none());
    assert_eq!(rejected.load(Ordering::SeqCst), 1);

    closer.register(Broken);
    let err = closer.close().unwrap_err();
    assert_eq!(err.as_multi().map(|m| m.len()), Some(1));
}

#[test]
fn test_config_handler_policy_requires_handler() {
    let config: CloserConfig =
        load_config_str(r#"{"on_add_error": "handle"}"#, FileFormat::Json).unwrap();

    let err = MultiCloserBuilder::from_config(&config).build().unwrap_err();
    assert_eq!(
        err.to_string(),
        "closer 'multi-closer' handles add errors but no error handler was set"
    );
    assert!(matches!(err, BuildError::MissingErrorHandler { .. }));
}

#[test]
fn test_config_separator_is_used_when_flattening() {
    let config: CloserConfig =
        load_config_str("separator: \" -> \"\n", FileFormat::Yaml).unwrap();

    let mut closer = MultiCloserBuilder::from_config(&config).build().unwrap();
    closer.register(Broken);
    closer.register(Broken);

    assert_eq!(
        closer.close().unwrap_err().to_string(),
        "socket already gone -> socket already gone"
    );
}
