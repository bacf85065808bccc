use super::PrefsBackend;
use crate::error::{Result, StoreError};
use std::cell::RefCell;
use std::collections::HashMap;

/// In-memory preference backend for testing.
///
/// Uses `RefCell` for interior mutability since itemstore is
/// single-threaded. Writes are "committed" immediately; the error
/// simulation toggles let tests exercise the sentinel paths in
/// `ItemStore` without a real backend failure.
#[derive(Default)]
pub struct MemBackend {
    values: RefCell<HashMap<String, String>>,
    simulate_write_error: RefCell<bool>,
    simulate_commit_error: RefCell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `put_string` and `remove` fail until switched off.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Make `commit` fail until switched off.
    pub fn set_simulate_commit_error(&self, simulate: bool) {
        *self.simulate_commit_error.borrow_mut() = simulate;
    }

    /// Test helper: seed a raw value directly, bypassing the trait.
    pub fn seed(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    /// Test helper: inspect the raw stored value.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }
}

impl PrefsBackend for MemBackend {
    fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn put_string(&self, key: &str, value: &str) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(StoreError::Backend("Simulated write error".to_string()));
        }
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(StoreError::Backend("Simulated write error".to_string()));
        }
        self.values.borrow_mut().remove(key);
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        if *self.simulate_commit_error.borrow() {
            return Err(StoreError::Backend("Simulated commit error".to_string()));
        }
        Ok(())
    }
}
