use super::legitimacy::LegitimacyModel;
use super::sender_domains::{SenderDomainResolver, SenderDomains};
use super::{FeatureExtractor, FeatureScore};
use crate::config::ScoringTables;
use crate::message::EmailMessage;

/// Checks the From domain's legitimacy and whether replies are routed elsewhere
pub struct SenderAlignmentAnalyzer {
    resolver: SenderDomainResolver,
    model: LegitimacyModel,
}

impl Default for SenderAlignmentAnalyzer {
    fn default() -> Self {
        Self::new(&ScoringTables::default())
    }
}

impl SenderAlignmentAnalyzer {
    pub fn new(tables: &ScoringTables) -> Self {
        Self {
            resolver: SenderDomainResolver::new(),
            model: LegitimacyModel::new(tables),
        }
    }

    pub fn sender_domains(&self, message: &EmailMessage) -> SenderDomains {
        self.resolver.resolve(message)
    }
}

impl FeatureExtractor for SenderAlignmentAnalyzer {
    fn extract(&self, message: &EmailMessage) -> FeatureScore {
        let domains = self.sender_domains(message);
        log::debug!(
            "Sender domains: from='{}' reply-to='{}' return-path='{}'",
            domains.from_domain,
            domains.reply_to_domain,
            domains.return_path_domain
        );

        let mut evidence = Vec::new();

        if !domains.from_domain.is_empty() {
            let score = self.model.score(&domains.from_domain);
            if LegitimacyModel::is_suspicious(score) {
                evidence.push(format!(
                    "sender domain looks suspicious (score={:.2}): {}",
                    score, domains.from_domain
                ));
            }
        }

        // The reply-to domain is compared, never scored
        if domains.reply_to_differs() {
            evidence.push("reply-to domain differs from sender".to_string());
        }

        FeatureScore::new(self.name(), evidence)
    }

    fn name(&self) -> &str {
        "sender_alignment"
    }
}
