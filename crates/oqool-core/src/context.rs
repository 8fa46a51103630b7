//! Request Context: per-request identity and timing
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub key_id: Option<String>,
    started: Instant,
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            key_id: None,
            started: Instant::now(),
        }
    }

    pub fn with_key(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }

    /// Milliseconds since the request was received.
    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
