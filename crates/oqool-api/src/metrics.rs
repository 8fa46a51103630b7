//! Prometheus counters served at `/metrics`.
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

pub struct ApiMetrics {
    registry: Registry,
    pub classifications: IntCounterVec,
    pub key_verifications: IntCounterVec,
    pub commands: IntCounterVec,
}

impl ApiMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let classifications = IntCounterVec::new(
            Opts::new("oqool_classifications_total", "Messages classified, by question type"),
            &["type"],
        )?;
        let key_verifications = IntCounterVec::new(
            Opts::new("oqool_key_verifications_total", "API key verifications, by outcome"),
            &["outcome"],
        )?;
        let commands = IntCounterVec::new(
            Opts::new("oqool_commands_total", "Commands executed, by type and status"),
            &["type", "status"],
        )?;

        registry.register(Box::new(classifications.clone()))?;
        registry.register(Box::new(key_verifications.clone()))?;
        registry.register(Box::new(commands.clone()))?;

        Ok(Self {
            registry,
            classifications,
            key_verifications,
            commands,
        })
    }

    pub fn record_verification(&self, valid: bool) {
        let outcome = if valid { "valid" } else { "invalid" };
        self.key_verifications.with_label_values(&[outcome]).inc();
    }

    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_show_up_in_exposition() {
        let metrics = ApiMetrics::new().unwrap();
        metrics.classifications.with_label_values(&["religious"]).inc();
        metrics.record_verification(false);
        metrics.commands.with_label_values(&["read_file", "success"]).inc();

        let text = metrics.encode().unwrap();
        assert!(text.contains("oqool_classifications_total{type=\"religious\"} 1"));
        assert!(text.contains("oqool_key_verifications_total{outcome=\"invalid\"} 1"));
        assert!(text.contains("oqool_commands_total{status=\"success\",type=\"read_file\"} 1"));
    }
}
