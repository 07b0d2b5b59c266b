// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared helpers for integration tests.

use dircfg::domain::{ConfigError, ConfigValue, Result};
use dircfg::ports::Reader;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Returns the path of a file or directory under `tests/fixtures`.
#[allow(dead_code)]
pub fn fixture(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(relative)
}

/// Installs a test-writer tracing subscriber once per test binary.
///
/// Output is captured by the test harness and only shows for failing tests.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

/// A reader whose values can be swapped and whose reads are counted.
///
/// Clones share state, so a test can keep a handle after moving the reader into a
/// `Config`.
#[derive(Debug, Clone, Default)]
#[allow(dead_code)]
pub struct MockReader {
    values: Arc<Mutex<ConfigValue>>,
    reads: Arc<AtomicUsize>,
    fail: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl MockReader {
    /// Creates a mock returning `values`.
    pub fn new(values: impl Into<ConfigValue>) -> Self {
        Self {
            values: Arc::new(Mutex::new(values.into())),
            ..Self::default()
        }
    }

    /// Replaces the values returned by later reads.
    pub fn set_values(&self, values: impl Into<ConfigValue>) {
        *self.values.lock().unwrap() = values.into();
    }

    /// Makes every later read fail until reset.
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Returns how many times `read` was called.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl Reader for MockReader {
    fn name(&self) -> &str {
        "mock"
    }

    fn read(&self) -> Result<ConfigValue> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(ConfigError::ConfigurationNotFound {
                path: PathBuf::from("mock"),
                source: None,
            });
        }
        Ok(self.values.lock().unwrap().clone())
    }
}
