//! Session store
//!
//! Sessions are held in an explicit store passed to whoever needs one, never
//! in process-wide globals. The in-memory backing is TTL-aware: expired
//! entries are dropped on access or by an explicit sweep.

use std::collections::HashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;

pub trait SessionStore: Send + Sync {
    fn put(&mut self, key: &str, value: String, ttl: Duration);
    fn get(&mut self, key: &str) -> Option<String>;
    fn expire(&mut self, key: &str);
}

struct SessionEntry {
    value: String,
    expires_at: Instant,
}

/// TTL-aware in-memory session store
#[derive(Default)]
pub struct MemorySessionStore {
    entries: HashMap<String, SessionEntry>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every expired entry
    pub fn purge_expired(&mut self) {
        let now = Instant::now();
        self.entries.retain(|_, entry| entry.expires_at > now);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn put(&mut self, key: &str, value: String, ttl: Duration) {
        self.entries.insert(
            key.to_string(),
            SessionEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    fn get(&mut self, key: &str) -> Option<String> {
        match self.entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn expire(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Generate an opaque session token
pub fn new_session_token() -> String {
    Uuid::new_v4().to_string()
}
