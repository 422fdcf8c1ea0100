//! # Failing Store
//!
//! A KeyValueStore wrapper that simulates write failures, for exercising
//! the editor's save-error paths without a real full disk.

use crate::kv::KeyValueStore;
use crate::{StorageError, StorageResult};

/// Policy for when failures should occur
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Never fail (passthrough)
    Never,
    /// Fail every write
    Always,
    /// Fail after N successful writes
    AfterWrites(usize),
    /// Fail any write that would push usage past N bytes
    QuotaBytes(usize),
}

/// Wrapper around a KeyValueStore that can simulate failures
///
/// Reads always pass through.
#[derive(Debug)]
pub struct FailingStore<S: KeyValueStore> {
    inner: S,
    policy: FailurePolicy,
    write_count: usize,
}

impl<S: KeyValueStore> FailingStore<S> {
    /// Create a new failing store with the given policy
    pub fn new(inner: S, policy: FailurePolicy) -> Self {
        Self {
            inner,
            policy,
            write_count: 0,
        }
    }

    /// Check if a write of `key`/`value` should fail based on policy
    fn check_write(&self, key: &str, value: &str) -> StorageResult<()> {
        match &self.policy {
            FailurePolicy::Never => Ok(()),
            FailurePolicy::Always => Err(StorageError::Unavailable(
                "writes disabled by failure policy".to_string(),
            )),
            FailurePolicy::AfterWrites(n) if self.write_count >= *n => Err(
                StorageError::Unavailable(format!("failing after {} writes", n)),
            ),
            FailurePolicy::AfterWrites(_) => Ok(()),
            FailurePolicy::QuotaBytes(limit) => {
                let existing = self
                    .inner
                    .get(key)?
                    .map(|old| key.len() + old.len())
                    .unwrap_or(0);
                let needed = self.inner.used_bytes()? - existing + key.len() + value.len();
                if needed > *limit {
                    Err(StorageError::QuotaExceeded {
                        needed,
                        limit: *limit,
                    })
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Get the underlying store (for inspection)
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Get mutable access to the underlying store
    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Get the number of writes that have succeeded
    pub fn write_count(&self) -> usize {
        self.write_count
    }

    pub fn policy(&self) -> &FailurePolicy {
        &self.policy
    }

    /// Reset the failure policy
    pub fn set_policy(&mut self, policy: FailurePolicy) {
        self.policy = policy;
        self.write_count = 0;
    }
}

impl<S: KeyValueStore> KeyValueStore for FailingStore<S> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        if let Err(err) = self.check_write(key, value) {
            log::debug!("simulated failure writing {}: {}", key, err);
            return Err(err);
        }
        self.inner.set(key, value)?;
        self.write_count += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<bool> {
        if matches!(self.policy, FailurePolicy::Always) {
            return Err(StorageError::Unavailable(
                "writes disabled by failure policy".to_string(),
            ));
        }
        self.inner.remove(key)
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        self.inner.keys()
    }
}
