use super::domain_features::{DomainFeatureExtractor, FeatureSet};
use crate::config::ScoringTables;

/// Scores below this are reported as suspicious, for sender and link domains alike
pub const SUSPICIOUS_SCORE_THRESHOLD: f64 = 0.4;

const BASELINE: f64 = 0.5;
const SUSPICIOUS_TLD_WEIGHT: f64 = -2.0;
const DIGIT_RATIO_WEIGHT: f64 = -1.0;
const HYPHEN_WEIGHT: f64 = -0.3;
const SHORT_LEN_WEIGHT: f64 = 0.05;
const SHORT_LEN_CAP: usize = 20;
const LONG_LEN_WEIGHT: f64 = -0.05;
const LONG_LEN_START: usize = 30;
const LABEL_WEIGHT: f64 = -0.4;
const LABEL_ALLOWANCE: usize = 4;
const BRAND_WEIGHT: f64 = 0.4;

// exp(700) is still finite, so the sigmoid never reaches 0.0 or 1.0
const Z_FLOOR: f64 = -700.0;
const Z_CEIL: f64 = 30.0;

/// Fixed linear-logistic legitimacy model over domain features.
///
/// The weights are hand-tuned, not learned, and are part of the output
/// contract: the same domain must always produce the same score.
#[derive(Debug, Clone, Default)]
pub struct LegitimacyModel {
    extractor: DomainFeatureExtractor,
}

impl LegitimacyModel {
    pub fn new(tables: &ScoringTables) -> Self {
        Self {
            extractor: DomainFeatureExtractor::new(tables),
        }
    }

    pub fn features(&self, domain: &str) -> FeatureSet {
        self.extractor.extract(domain)
    }

    /// Legitimacy of a domain in the open interval (0, 1)
    pub fn score(&self, domain: &str) -> f64 {
        sigmoid(Self::linear_score(&self.features(domain)))
    }

    pub fn linear_score(f: &FeatureSet) -> f64 {
        let mut z = BASELINE;

        if f.suspicious_tld != 0.0 {
            z += SUSPICIOUS_TLD_WEIGHT;
        }

        z += DIGIT_RATIO_WEIGHT * f.digit_ratio;
        z += HYPHEN_WEIGHT * f.hyphen_count as f64;

        z += SHORT_LEN_WEIGHT * f.len.min(SHORT_LEN_CAP) as f64;
        if f.len > LONG_LEN_START {
            z += LONG_LEN_WEIGHT * (f.len - LONG_LEN_START) as f64;
        }

        if f.label_count > LABEL_ALLOWANCE {
            z += LABEL_WEIGHT * (f.label_count - LABEL_ALLOWANCE) as f64;
        }

        z += BRAND_WEIGHT * f.contains_brand_keyword;
        z
    }

    pub fn is_suspicious(score: f64) -> bool {
        score < SUSPICIOUS_SCORE_THRESHOLD
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z.clamp(Z_FLOOR, Z_CEIL)).exp())
}
