//! Interest tags per user.

use std::sync::Mutex;

use tracing::debug;

use crate::cache::{Cache, EvictionPolicy};

pub struct PreferenceStore {
    users: Mutex<Cache<Vec<String>>>,
}

impl PreferenceStore {
    pub fn new(policy: Box<dyn EvictionPolicy>) -> Self {
        Self {
            users: Mutex::new(Cache::new(policy)),
        }
    }

    /// Replace the interests of `user_id`.
    pub fn set(&self, user_id: &str, interests: Vec<String>) {
        let mut users = self.users.lock().unwrap_or_else(|e| e.into_inner());
        debug!(user_id, interests = interests.len(), "Preferences stored");
        users.insert(user_id, interests);
    }

    /// Interests of `user_id`, empty for unknown users.
    pub fn get(&self, user_id: &str) -> Vec<String> {
        let mut users = self.users.lock().unwrap_or_else(|e| e.into_inner());
        users.get(user_id).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.users.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn evictions(&self) -> u64 {
        self.users.lock().unwrap_or_else(|e| e.into_inner()).evictions()
    }

    pub fn clear(&self) {
        self.users.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

impl Default for PreferenceStore {
    fn default() -> Self {
        Self {
            users: Mutex::new(Cache::unbounded()),
        }
    }
}
