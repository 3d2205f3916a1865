use crate::config::ScoringTables;
use crate::features::link_analyzer::{LinkAnalyzer, SuspiciousLink};
use crate::features::FeatureEngine;
use crate::message::EmailMessage;
use serde::Serialize;

/// Number of reasons that drives the trust score to zero
const MAX_RISK: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Buckets are closed at the bottom: 0.3 is medium, 0.7 is low
    pub fn from_trust_score(trust_score: f64) -> Self {
        if trust_score < 0.3 {
            RiskLevel::High
        } else if trust_score < 0.7 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub trust_score: f64,
    pub risk_level: RiskLevel,
    pub reasons: Vec<String>,
    pub suspicious_links: Vec<SuspiciousLink>,
}

/// Combines authentication, sender, body and link signals into one verdict.
/// Holds no per-message state; one instance can score any number of messages.
pub struct PhishingScorer {
    features: FeatureEngine,
    links: LinkAnalyzer,
}

impl Default for PhishingScorer {
    fn default() -> Self {
        Self::new(ScoringTables::default())
    }
}

impl PhishingScorer {
    pub fn new(tables: ScoringTables) -> Self {
        let tables = tables.normalized();
        Self {
            features: FeatureEngine::new(&tables),
            links: LinkAnalyzer::new(&tables),
        }
    }

    pub fn score_email(&self, message: &EmailMessage) -> ScoreResult {
        if let Some(subject) = &message.subject {
            log::debug!("Scoring message: {}", subject);
        }

        let mut reasons: Vec<String> = self
            .features
            .analyze(message)
            .into_iter()
            .flat_map(|score| score.evidence)
            .collect();

        let suspicious_links = self.links.evaluate(message);
        if !suspicious_links.is_empty() {
            reasons.push("one or more links appear suspicious".to_string());
        }

        let trust_score = Self::trust_score(reasons.len());
        let risk_level = RiskLevel::from_trust_score(trust_score);

        log::debug!(
            "Verdict: trust={:.2} risk={:?} reasons={} suspicious_links={}",
            trust_score,
            risk_level,
            reasons.len(),
            suspicious_links.len()
        );

        ScoreResult {
            trust_score: round2(trust_score),
            risk_level,
            reasons,
            suspicious_links,
        }
    }

    /// Score a raw JSON value; anything that is not an object scores as an empty message
    pub fn score_value(&self, value: serde_json::Value) -> ScoreResult {
        self.score_email(&EmailMessage::from_value(value))
    }

    /// Unrounded trust score for a reason count, floored at zero
    pub fn trust_score(reason_count: usize) -> f64 {
        (1.0 - reason_count as f64 / MAX_RISK).max(0.0)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
