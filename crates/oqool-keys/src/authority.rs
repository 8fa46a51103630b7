//! API key authority: issue, verify, revoke and sweep bearer keys.

use crate::hashing::{generate_key_material, KeyHasher};
use crate::store::{KeyStore, MemoryKeyStore, StoredApiKey};
use crate::KeyError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Permission that grants every capability.
pub const WILDCARD_PERMISSION: &str = "*";

/// Permission to list, revoke and sweep keys. Only granted explicitly;
/// the wildcard does not cover it.
pub const MANAGE_KEYS_PERMISSION: &str = "keys:manage";

/// A freshly issued key. `key` is the only copy of the plaintext.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedKey {
    pub id: Uuid,
    pub key: String,
}

/// Outcome of presenting a key. Failures carry no detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyVerification {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

impl KeyVerification {
    pub fn invalid() -> Self {
        Self {
            valid: false,
            key_id: None,
            permissions: None,
        }
    }

    fn granted(key: &StoredApiKey) -> Self {
        Self {
            valid: true,
            key_id: Some(key.id),
            permissions: Some(key.permissions.clone()),
        }
    }

    /// True if valid and the granted set covers `permission`.
    pub fn allows(&self, permission: &str) -> bool {
        self.valid
            && self
                .permissions
                .as_deref()
                .is_some_and(|perms| permits(perms, permission))
    }
}

fn permits(permissions: &[String], permission: &str) -> bool {
    permissions
        .iter()
        .any(|p| {
            p == permission || (p == WILDCARD_PERMISSION && permission != MANAGE_KEYS_PERMISSION)
        })
}

pub struct ApiKeyAuthority {
    store: Box<dyn KeyStore>,
    hasher: KeyHasher,
}

impl ApiKeyAuthority {
    pub fn new(store: Box<dyn KeyStore>, hasher: KeyHasher) -> Self {
        Self { store, hasher }
    }

    /// In-memory authority hashing with the given deployment secret.
    pub fn in_memory(secret: &str) -> Self {
        Self::new(Box::new(MemoryKeyStore::new()), KeyHasher::new(secret))
    }

    /// Issue a key that never expires.
    pub fn generate(&self, name: &str, permissions: Vec<String>) -> Result<IssuedKey, KeyError> {
        self.generate_with_expiry(name, permissions, None)
    }

    pub fn generate_with_expiry(
        &self,
        name: &str,
        permissions: Vec<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<IssuedKey, KeyError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(KeyError::EmptyName);
        }

        let key = generate_key_material();
        let record = StoredApiKey {
            id: Uuid::new_v4(),
            key_hash: self.hasher.hash(&key),
            name: name.to_string(),
            created_at: Utc::now(),
            last_used: None,
            expires_at,
            permissions,
            is_active: true,
        };
        let id = record.id;

        if let Err(err) = self.store.insert(record) {
            tracing::error!(key_id = %id, error = %err, "refusing to store api key");
            return Err(err);
        }

        tracing::info!(key_id = %id, name = %name, "api key issued");
        Ok(IssuedKey { id, key })
    }

    /// Check a presented key and record the use on success.
    pub fn verify(&self, plaintext: &str) -> KeyVerification {
        let hash = self.hasher.hash(plaintext);
        let now = Utc::now();

        match self.store.find_active_by_hash(&hash) {
            // touch rechecks usability under the write lock
            Some(key) if key.is_usable_at(now) && self.store.touch(&key.id, now) => {
                tracing::debug!(key_id = %key.id, "api key verified");
                KeyVerification::granted(&key)
            }
            _ => {
                tracing::debug!("api key rejected");
                KeyVerification::invalid()
            }
        }
    }

    /// Soft-delete. True only when an active key was deactivated.
    pub fn revoke(&self, id: &Uuid) -> bool {
        let revoked = self.store.deactivate(id);
        if revoked {
            tracing::info!(key_id = %id, "api key revoked");
        }
        revoked
    }

    pub fn has_permission(&self, id: &Uuid, permission: &str) -> bool {
        match self.store.get(id) {
            Some(key) if key.is_active => permits(&key.permissions, permission),
            _ => false,
        }
    }

    /// Delete keys whose expiry has passed; the only physical deletion.
    pub fn cleanup_expired_keys(&self) -> usize {
        let removed = self.store.remove_expired(Utc::now());
        if removed > 0 {
            tracing::info!(removed, "expired api keys removed");
        }
        removed
    }

    pub fn list_keys(&self) -> Vec<StoredApiKey> {
        self.store.list()
    }

    pub fn get_key(&self, id: &Uuid) -> Option<StoredApiKey> {
        self.store.get(id)
    }
}

impl Default for ApiKeyAuthority {
    fn default() -> Self {
        Self::new(Box::new(MemoryKeyStore::new()), KeyHasher::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn perms(list: &[&str]) -> Vec<String> {
        list.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_generate_then_verify() {
        let authority = ApiKeyAuthority::default();
        let issued = authority.generate("test", perms(&["read"])).unwrap();

        let result = authority.verify(&issued.key);
        assert!(result.valid);
        assert_eq!(result.key_id, Some(issued.id));
        assert_eq!(result.permissions, Some(perms(&["read"])));
    }

    #[test]
    fn test_single_character_mutations_fail() {
        let authority = ApiKeyAuthority::default();
        let issued = authority.generate("test", perms(&["read"])).unwrap();

        for (i, c) in issued.key.char_indices() {
            let replacement = if c == 'a' { 'b' } else { 'a' };
            let mut mutated = issued.key.clone();
            mutated.replace_range(i..i + c.len_utf8(), &replacement.to_string());
            assert!(!authority.verify(&mutated).valid, "mutation at {} accepted", i);
        }
        assert!(!authority.verify(&issued.key[1..]).valid);
        assert!(!authority.verify(&format!("{}0", issued.key)).valid);
    }

    #[test]
    fn test_verify_updates_last_used() {
        let authority = ApiKeyAuthority::default();
        let issued = authority.generate("test", perms(&["*"])).unwrap();
        assert!(authority.get_key(&issued.id).unwrap().last_used.is_none());

        authority.verify(&issued.key);
        assert!(authority.get_key(&issued.id).unwrap().last_used.is_some());
    }

    #[test]
    fn test_failed_verify_does_not_touch() {
        let authority = ApiKeyAuthority::default();
        let issued = authority
            .generate_with_expiry("old", perms(&["*"]), Some(Utc::now() - Duration::seconds(1)))
            .unwrap();

        assert_eq!(authority.verify(&issued.key), KeyVerification::invalid());
        assert!(authority.get_key(&issued.id).unwrap().last_used.is_none());
    }

    #[test]
    fn test_revoke() {
        let authority = ApiKeyAuthority::default();
        let issued = authority.generate("test", perms(&["*"])).unwrap();

        assert!(authority.revoke(&issued.id));
        assert!(!authority.verify(&issued.key).valid);
        assert!(!authority.revoke(&issued.id));
        assert!(!authority.revoke(&Uuid::new_v4()));

        let record = authority.get_key(&issued.id).unwrap();
        assert!(!record.is_active);
    }

    #[test]
    fn test_wrong_revoked_and_expired_look_the_same() {
        let authority = ApiKeyAuthority::default();
        let revoked = authority.generate("r", perms(&["*"])).unwrap();
        authority.revoke(&revoked.id);
        let expired = authority
            .generate_with_expiry("e", perms(&["*"]), Some(Utc::now() - Duration::minutes(1)))
            .unwrap();

        let wrong = authority.verify("oqool_not_a_key");
        assert_eq!(authority.verify(&revoked.key), wrong);
        assert_eq!(authority.verify(&expired.key), wrong);
    }

    #[test]
    fn test_has_permission() {
        let authority = ApiKeyAuthority::default();
        let admin = authority.generate("admin", perms(&["*"])).unwrap();
        let reader = authority.generate("reader", perms(&["read_file"])).unwrap();

        assert!(authority.has_permission(&admin.id, "anything"));
        assert!(authority.has_permission(&admin.id, "delete_file"));
        assert!(authority.has_permission(&reader.id, "read_file"));
        assert!(!authority.has_permission(&reader.id, "write_file"));
        assert!(!authority.has_permission(&reader.id, "read"));

        authority.revoke(&admin.id);
        assert!(!authority.has_permission(&admin.id, "anything"));
        assert!(!authority.has_permission(&Uuid::new_v4(), "read_file"));
    }

    #[test]
    fn test_wildcard_does_not_cover_key_management() {
        let authority = ApiKeyAuthority::default();
        let wildcard = authority.generate("wild", perms(&["*"])).unwrap();
        let manager = authority.generate("ops", perms(&["keys:manage"])).unwrap();

        assert!(!authority.has_permission(&wildcard.id, MANAGE_KEYS_PERMISSION));
        assert!(!authority.verify(&wildcard.key).allows(MANAGE_KEYS_PERMISSION));
        assert!(authority.has_permission(&manager.id, MANAGE_KEYS_PERMISSION));
        assert!(authority.verify(&manager.key).allows(MANAGE_KEYS_PERMISSION));
        assert!(!authority.has_permission(&manager.id, "read_file"));
    }

    #[test]
    fn test_verification_allows() {
        let authority = ApiKeyAuthority::default();
        let reader = authority.generate("reader", perms(&["read_file"])).unwrap();
        let result = authority.verify(&reader.key);
        assert!(result.allows("read_file"));
        assert!(!result.allows("write_file"));
        assert!(!KeyVerification::invalid().allows("read_file"));
    }

    #[test]
    fn test_empty_name_rejected() {
        let authority = ApiKeyAuthority::default();
        assert!(matches!(authority.generate("  ", vec![]), Err(KeyError::EmptyName)));
    }

    #[test]
    fn test_cleanup_expired_keys() {
        let authority = ApiKeyAuthority::default();
        let past = Some(Utc::now() - Duration::seconds(30));
        let future = Some(Utc::now() + Duration::days(1));

        authority.generate_with_expiry("a", perms(&["*"]), past).unwrap();
        authority.generate_with_expiry("b", perms(&["*"]), past).unwrap();
        let live = authority.generate_with_expiry("c", perms(&["*"]), future).unwrap();
        let forever = authority.generate("d", perms(&["*"])).unwrap();

        assert_eq!(authority.cleanup_expired_keys(), 2);
        assert_eq!(authority.cleanup_expired_keys(), 0);

        let remaining: Vec<Uuid> = authority.list_keys().iter().map(|k| k.id).collect();
        assert_eq!(remaining.len(), 2);
        assert!(remaining.contains(&live.id));
        assert!(remaining.contains(&forever.id));
        assert!(authority.verify(&live.key).valid);
    }

    #[test]
    fn test_concurrent_verification() {
        use std::sync::Arc;

        let authority = Arc::new(ApiKeyAuthority::default());
        let issued = authority.generate("shared", perms(&["*"])).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let authority = Arc::clone(&authority);
                let key = issued.key.clone();
                std::thread::spawn(move || (0..50).all(|_| authority.verify(&key).valid))
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
