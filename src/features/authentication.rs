use super::{FeatureExtractor, FeatureScore};
use crate::message::EmailMessage;

/// Reads the verdicts the receiving MTA recorded in `Authentication-Results`
pub struct AuthenticationAnalyzer;

impl Default for AuthenticationAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthenticationAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// All Authentication-Results values, lower-cased and space-joined
    pub fn combined_results(message: &EmailMessage) -> String {
        message
            .header("authentication-results")
            .map(|value| value.strings().join(" "))
            .unwrap_or_default()
            .to_lowercase()
    }
}

impl FeatureExtractor for AuthenticationAnalyzer {
    fn extract(&self, message: &EmailMessage) -> FeatureScore {
        let auth = Self::combined_results(message);
        let mut evidence = Vec::new();

        if auth.contains("spf=fail") {
            evidence.push("SPF failed".to_string());
        }
        if auth.contains("dkim=fail") || auth.contains("dkim=none") {
            evidence.push("DKIM missing or failed".to_string());
        }
        if auth.contains("dmarc=fail") {
            evidence.push("DMARC failed".to_string());
        }

        FeatureScore::new(self.name(), evidence)
    }

    fn name(&self) -> &str {
        "authentication"
    }
}
