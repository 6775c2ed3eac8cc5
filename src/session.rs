// 🔑 Session Store - Key/value slot that receives the authenticated user
// The directory only needs somewhere to put the current user; this trait is that somewhere.

use crate::error::AuthError;
use parking_lot::RwLock;
use std::collections::HashMap;

pub trait SessionStore: Send + Sync {
    fn set(&self, key: &str, value: String) -> Result<(), AuthError>;
    fn get(&self, key: &str) -> Result<Option<String>, AuthError>;
    fn remove(&self, key: &str) -> Result<(), AuthError>;
}

/// Process-local store, the default for the CLI and tests
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    values: RwLock<HashMap<String, String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn set(&self, key: &str, value: String) -> Result<(), AuthError> {
        self.values.write().insert(key.to_string(), value);
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, AuthError> {
        Ok(self.values.read().get(key).cloned())
    }

    fn remove(&self, key: &str) -> Result<(), AuthError> {
        self.values.write().remove(key);
        Ok(())
    }
}
