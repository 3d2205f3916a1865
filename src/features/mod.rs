pub mod authentication;
pub mod body_flags;
pub mod domain_features;
pub mod legitimacy;
pub mod link_analyzer;
pub mod sender_alignment;
pub mod sender_domains;

use crate::config::ScoringTables;
use crate::message::EmailMessage;
use serde::Serialize;

/// Reasons one extractor found in a message, in detection order
#[derive(Debug, Clone, Serialize)]
pub struct FeatureScore {
    pub feature_name: String,
    pub evidence: Vec<String>,
}

impl FeatureScore {
    pub fn new(feature_name: &str, evidence: Vec<String>) -> Self {
        Self {
            feature_name: feature_name.to_string(),
            evidence,
        }
    }
}

pub trait FeatureExtractor: Send + Sync {
    fn extract(&self, message: &EmailMessage) -> FeatureScore;
    fn name(&self) -> &str;
}

/// Runs the message-level extractors in their fixed order
pub struct FeatureEngine {
    extractors: Vec<Box<dyn FeatureExtractor>>,
}

impl Default for FeatureEngine {
    fn default() -> Self {
        Self::new(&ScoringTables::default())
    }
}

impl FeatureEngine {
    pub fn new(tables: &ScoringTables) -> Self {
        Self {
            extractors: vec![
                Box::new(authentication::AuthenticationAnalyzer::new()),
                Box::new(sender_alignment::SenderAlignmentAnalyzer::new(tables)),
                Box::new(body_flags::BodyFlagAnalyzer::new()),
            ],
        }
    }

    pub fn analyze(&self, message: &EmailMessage) -> Vec<FeatureScore> {
        self.extractors
            .iter()
            .map(|extractor| {
                let score = extractor.extract(message);
                for reason in &score.evidence {
                    log::debug!("{}: {}", extractor.name(), reason);
                }
                score
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extractor_order() {
        let engine = FeatureEngine::default();
        let scores = engine.analyze(&EmailMessage::default());
        let names: Vec<&str> = scores.iter().map(|s| s.feature_name.as_str()).collect();

        assert_eq!(names, vec!["authentication", "sender_alignment", "body_flags"]);
        assert!(scores.iter().all(|s| s.evidence.is_empty()));
    }

    #[test]
    fn test_evidence_collected_per_extractor() {
        let engine = FeatureEngine::default();
        let message = EmailMessage::from_value(json!({
            "headers": {
                "authentication-results": ["dmarc=fail"],
                "from": ["a@example.com"],
                "reply-to": ["b@elsewhere.example"]
            },
            "plainText": "External Sender"
        }));

        let scores = engine.analyze(&message);
        assert_eq!(scores[0].evidence, vec!["DMARC failed"]);
        assert_eq!(scores[1].evidence, vec!["reply-to domain differs from sender"]);
        assert_eq!(scores[2].evidence, vec!["external sender banner detected"]);
    }
}
