//! # Storage Traits
//!
//! The persistence layer only needs a named slot that can be read and
//! overwritten. Any medium offering that (a directory of files, an in-memory
//! map, a browser-style local storage) can back the goal repository.

use anyhow::Result;

/// Minimal get/set contract over string values
pub trait KeyValueStore {
    /// Read the value stored under `key`, or `None` when the slot is empty
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace whatever is stored under `key` with `value`
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}
