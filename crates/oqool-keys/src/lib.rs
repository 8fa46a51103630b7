//! Oqool Keys: bearer credentials for the developer command API
//!
//! Keys are issued once in plaintext, stored only as a keyed hash, checked
//! on every command request, soft-deleted on revocation, and physically
//! removed only by an explicit expiry sweep.
//!
//! # Example
//!
//! ```
//! use oqool_keys::ApiKeyAuthority;
//!
//! let authority = ApiKeyAuthority::in_memory("deployment-secret");
//! let issued = authority.generate("ci", vec!["read_file".to_string()]).unwrap();
//!
//! let check = authority.verify(&issued.key);
//! assert!(check.valid);
//! assert!(authority.has_permission(&issued.id, "read_file"));
//!
//! assert!(authority.revoke(&issued.id));
//! assert!(!authority.verify(&issued.key).valid);
//! ```

pub mod authority;
pub mod hashing;
pub mod store;

pub use authority::{
    ApiKeyAuthority, IssuedKey, KeyVerification, MANAGE_KEYS_PERMISSION, WILDCARD_PERMISSION,
};
pub use hashing::{KeyHash, KeyHasher, KEY_PREFIX};
pub use store::{KeyStore, MemoryKeyStore, StoredApiKey};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("Name is required")]
    EmptyName,
    /// Two live records would share a hash; one key could authenticate as another.
    #[error("key hash collision with existing record {0}")]
    HashCollision(String),
    #[error("key id {0} already exists")]
    DuplicateId(String),
}
