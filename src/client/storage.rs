//! Durable client-side storage.

use std::collections::HashMap;
use std::fmt;

/// Key-value storage surviving client restarts (the browser's localStorage
/// in the real client). Entries are never garbage-collected here.
pub trait Storage {
    fn get(&self, key: &StorageKey) -> Option<String>;
    fn set(&mut self, key: &StorageKey, value: String);
    fn remove(&mut self, key: &StorageKey);
}

/// Typed storage key: purpose plus owning identity. Rendering to the stored
/// string happens in exactly one place.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Token,
    IsAdmin,
    Name,
    Email,
    /// Per-user cart, one entry per email.
    Cart { email: String },
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token => write!(f, "token"),
            Self::IsAdmin => write!(f, "isAdmin"),
            Self::Name => write!(f, "name"),
            Self::Email => write!(f, "email"),
            Self::Cart { email } => write!(f, "{email}_cart"),
        }
    }
}

/// In-memory storage backend.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &StorageKey) -> bool {
        self.entries.contains_key(&key.to_string())
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &StorageKey) -> Option<String> {
        self.entries.get(&key.to_string()).cloned()
    }

    fn set(&mut self, key: &StorageKey, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &StorageKey) {
        self.entries.remove(&key.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cart_key_is_scoped_to_email() {
        let a = StorageKey::Cart { email: "a@x.com".into() };
        let b = StorageKey::Cart { email: "b@x.com".into() };
        assert_ne!(a.to_string(), b.to_string());
        assert_eq!(a.to_string(), "a@x.com_cart");
    }

    #[test]
    fn set_get_remove() {
        let mut storage = MemoryStorage::new();
        storage.set(&StorageKey::Token, "t".into());
        assert_eq!(storage.get(&StorageKey::Token).as_deref(), Some("t"));
        storage.remove(&StorageKey::Token);
        assert_eq!(storage.get(&StorageKey::Token), None);
    }
}
