//! Test utilities for jrender
//!
//! Helpers shared by unit and integration tests: logging setup, a scriptable
//! converter and on-disk site fixtures.
//!
//! # Example
//!
//! ```rust,no_run
//! use jrender::test_utils::{SiteFixture, init_test_logging};
//!
//! init_test_logging(None);
//! let fixture = SiteFixture::new()
//!     .unwrap()
//!     .with_layout("default", "<main>{{ content }}</main>")
//!     .unwrap();
//! assert!(fixture.path().join("_layouts/default.html").exists());
//! ```

pub mod fixtures;
pub mod stub;

pub use fixtures::{SiteFixture, sample_layouts};
pub use stub::StubConverter;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` when given, otherwise
/// `RUST_LOG`; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=jrender=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
