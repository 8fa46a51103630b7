//! Shared handler state.
use crate::config::ApiConfig;
use crate::metrics::ApiMetrics;
use oqool_classify::Classifier;
use oqool_commands::{CommandExecutor, FileSandbox};
use oqool_keys::{ApiKeyAuthority, KeyHasher, MemoryKeyStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub keys: Arc<ApiKeyAuthority>,
    pub classifier: Classifier,
    pub executor: Arc<CommandExecutor>,
    pub metrics: Arc<ApiMetrics>,
    pub config: Arc<ApiConfig>,
    admin_secret: Option<blake3::Hash>,
}

impl AppState {
    pub fn from_config(config: ApiConfig) -> Result<Self, prometheus::Error> {
        let hasher = match config.key_pepper.as_deref() {
            Some(pepper) => KeyHasher::new(pepper),
            None => {
                tracing::warn!("OQOOL_KEY_PEPPER not set; key hashes use the default pepper");
                KeyHasher::default()
            }
        };

        Ok(Self {
            keys: Arc::new(ApiKeyAuthority::new(Box::new(MemoryKeyStore::new()), hasher)),
            classifier: Classifier::new(config.classifier_mode),
            executor: Arc::new(CommandExecutor::new(FileSandbox::new(&config.workspace_root))),
            metrics: Arc::new(ApiMetrics::new()?),
            admin_secret: config
                .admin_secret
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(|s| blake3::hash(s.as_bytes())),
            config: Arc::new(config),
        })
    }

    /// True if `presented` is the configured bootstrap admin secret.
    pub fn is_admin_secret(&self, presented: &str) -> bool {
        self.admin_secret
            .is_some_and(|secret| blake3::hash(presented.as_bytes()) == secret)
    }
}
