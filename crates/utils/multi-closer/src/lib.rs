//! Group the closeable resources built at startup so they can be shut down
//! together with a single call.
//!
//! ```
//! use multi_closer::{BoxError, Closeable, MultiCloser};
//!
//! struct Pool;
//!
//! impl Pool {
//!     fn connect(dsn: &str) -> Result<Pool, std::io::Error> {
//!         let _ = dsn;
//!         Ok(Pool)
//!     }
//! }
//!
//! impl Closeable for Pool {
//!     fn close(&self) -> Result<(), BoxError> {
//!         Ok(())
//!     }
//! }
//!
//! let mut closer = MultiCloser::with_multi_error();
//! let _pool = closer.add(Pool::connect("postgres://localhost")).unwrap();
//! assert!(closer.close().is_ok());
//! ```
pub mod builder;
pub mod closeable;
pub mod error;
pub mod guard;
pub mod multi_closer;
pub mod policy;

pub use builder::MultiCloserBuilder;
pub use closeable::{BoxError, Closeable, FnCloser};
pub use config_loader::closer::{Aggregate, CloserConfig, OnAddError};
pub use error::{BuildError, CloseError, CloseResult, MultiError};
pub use guard::CloseGuard;
pub use multi_closer::MultiCloser;
pub use policy::{AddPolicy, ClosePolicy, DEFAULT_SEPARATOR, ErrorHandler};
