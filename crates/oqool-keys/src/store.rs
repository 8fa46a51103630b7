//! Key storage.
//!
//! The authority talks to storage through [`KeyStore`] so that a durable
//! backend can replace [`MemoryKeyStore`] without touching verification
//! logic. Hashes are always computed by the authority before they reach the
//! store.

use crate::hashing::KeyHash;
use crate::KeyError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;

/// A key record. The hash is never serialized.
#[derive(Debug, Clone, Serialize)]
pub struct StoredApiKey {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub key_hash: KeyHash,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub permissions: Vec<String>,
    pub is_active: bool,
}

impl StoredApiKey {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    /// Active and not expired.
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && !self.is_expired_at(now)
    }
}

pub trait KeyStore: Send + Sync {
    /// Insert a new record. Fails if an active record already has the hash.
    fn insert(&self, key: StoredApiKey) -> Result<(), KeyError>;

    fn get(&self, id: &Uuid) -> Option<StoredApiKey>;

    /// The active record with this hash, if any.
    fn find_active_by_hash(&self, hash: &KeyHash) -> Option<StoredApiKey>;

    /// Record a use at `at`. Returns false, leaving the record alone, if the
    /// id is unknown or the key is no longer usable at `at`.
    fn touch(&self, id: &Uuid, at: DateTime<Utc>) -> bool;

    /// Flip an active record to inactive. Returns false if it was unknown
    /// or already inactive.
    fn deactivate(&self, id: &Uuid) -> bool;

    /// Physically delete records whose expiry is at or before `now`.
    fn remove_expired(&self, now: DateTime<Utc>) -> usize;

    fn list(&self) -> Vec<StoredApiKey>;
}

/// Process-local store; contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryKeyStore {
    keys: RwLock<HashMap<Uuid, StoredApiKey>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.keys.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyStore for MemoryKeyStore {
    fn insert(&self, key: StoredApiKey) -> Result<(), KeyError> {
        let mut keys = self.keys.write().unwrap_or_else(PoisonError::into_inner);

        if keys.contains_key(&key.id) {
            return Err(KeyError::DuplicateId(key.id.to_string()));
        }
        if let Some(existing) = keys
            .values()
            .find(|k| k.is_active && k.key_hash == key.key_hash)
        {
            return Err(KeyError::HashCollision(existing.id.to_string()));
        }

        keys.insert(key.id, key);
        Ok(())
    }

    fn get(&self, id: &Uuid) -> Option<StoredApiKey> {
        self.keys
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    fn find_active_by_hash(&self, hash: &KeyHash) -> Option<StoredApiKey> {
        self.keys
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .find(|k| k.is_active && k.key_hash == *hash)
            .cloned()
    }

    fn touch(&self, id: &Uuid, at: DateTime<Utc>) -> bool {
        let mut keys = self.keys.write().unwrap_or_else(PoisonError::into_inner);
        match keys.get_mut(id) {
            Some(key) if key.is_usable_at(at) => {
                key.last_used = Some(at);
                true
            }
            _ => false,
        }
    }

    fn deactivate(&self, id: &Uuid) -> bool {
        let mut keys = self.keys.write().unwrap_or_else(PoisonError::into_inner);
        match keys.get_mut(id) {
            Some(key) if key.is_active => {
                key.is_active = false;
                true
            }
            _ => false,
        }
    }

    fn remove_expired(&self, now: DateTime<Utc>) -> usize {
        let mut keys = self.keys.write().unwrap_or_else(PoisonError::into_inner);
        let before = keys.len();
        keys.retain(|_, k| !k.is_expired_at(now));
        before - keys.len()
    }

    fn list(&self) -> Vec<StoredApiKey> {
        let mut all: Vec<StoredApiKey> = self
            .keys
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        all.sort_by_key(|k| k.created_at);
        all
    }
}
