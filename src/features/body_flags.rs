use super::{FeatureExtractor, FeatureScore};
use crate::message::EmailMessage;

const EXTERNAL_SENDER_BANNER: &str = "external sender";

/// Flags text the receiving organization injects into mail from outside
pub struct BodyFlagAnalyzer;

impl Default for BodyFlagAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl BodyFlagAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl FeatureExtractor for BodyFlagAnalyzer {
    fn extract(&self, message: &EmailMessage) -> FeatureScore {
        let body = message.body_text().to_lowercase();
        let mut evidence = Vec::new();

        if body.contains(EXTERNAL_SENDER_BANNER) {
            evidence.push("external sender banner detected".to_string());
        }

        FeatureScore::new(self.name(), evidence)
    }

    fn name(&self) -> &str {
        "body_flags"
    }
}
