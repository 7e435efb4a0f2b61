//! Thread-safe handle to one obfuscation session.

use crate::{Mapping, Mappings, Obfuscator, ObfuscatorConfig, Result, Value};
use std::sync::{Arc, Mutex, MutexGuard};

/// Cloneable, lock-guarded [`Obfuscator`].
///
/// All clones share one consistency store, so worker threads hand out the
/// same substitutes. Each call takes the lock once.
#[derive(Debug, Clone, Default)]
pub struct SharedObfuscator {
    inner: Arc<Mutex<Obfuscator>>,
}

impl SharedObfuscator {
    /// Create a shared obfuscator with the given config.
    pub fn new(config: ObfuscatorConfig) -> Result<Self> {
        Ok(Self::from(Obfuscator::new(config)?))
    }

    fn lock(&self) -> MutexGuard<'_, Obfuscator> {
        // A panic mid-call can only leave a partially filled cache behind.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run `f` with exclusive access to the engine.
    pub fn with<R>(&self, f: impl FnOnce(&mut Obfuscator) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn obfuscate_string(&self, value: &str) -> String {
        self.lock().obfuscate_string(value)
    }

    pub fn obfuscate_value(&self, value: &Value) -> Value {
        self.lock().obfuscate_value(value)
    }

    pub fn obfuscate_mapping(&self, map: &Mapping) -> Mapping {
        self.lock().obfuscate_mapping(map)
    }

    pub fn obfuscate_json(&self, doc: &serde_json::Value) -> serde_json::Value {
        self.lock().obfuscate_json(doc)
    }

    /// Snapshot of the current mappings.
    pub fn mappings(&self) -> Mappings {
        self.lock().mappings()
    }

    pub fn restore(&self, mappings: &Mappings) {
        self.lock().restore(mappings);
    }

    pub fn reset(&self) {
        self.lock().reset();
    }

    /// Copy of the active config.
    pub fn config(&self) -> ObfuscatorConfig {
        self.lock().config().clone()
    }
}

impl From<Obfuscator> for SharedObfuscator {
    fn from(engine: Obfuscator) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }
}
