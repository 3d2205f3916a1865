use crate::config::ScoringTables;
use serde::Serialize;

/// Numeric description of a single domain string.
///
/// Ratios are in `[0, 1]` and fall back to `0.0` for the empty domain.
/// Flags are encoded as `0.0`/`1.0` so every feature can enter a linear score.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeatureSet {
    pub len: usize,
    pub dot_count: usize,
    pub hyphen_count: usize,
    pub digit_count: usize,
    pub digit_ratio: f64,
    pub label_count: usize,
    pub suspicious_tld: f64,
    pub contains_brand_keyword: f64,
    pub vowel_ratio: f64,
}

impl FeatureSet {
    /// Feature name/value pairs in a fixed order
    pub fn as_pairs(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("len", self.len as f64),
            ("dot_count", self.dot_count as f64),
            ("hyphen_count", self.hyphen_count as f64),
            ("digit_count", self.digit_count as f64),
            ("digit_ratio", self.digit_ratio),
            ("label_count", self.label_count as f64),
            ("suspicious_tld", self.suspicious_tld),
            ("contains_brand_keyword", self.contains_brand_keyword),
            ("vowel_ratio", self.vowel_ratio),
        ]
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.as_pairs()
            .into_iter()
            .find(|(feature, _)| *feature == name)
            .map(|(_, value)| value)
    }
}

#[derive(Debug, Clone)]
pub struct DomainFeatureExtractor {
    suspicious_tlds: Vec<String>,
    brand_keywords: Vec<String>,
}

impl Default for DomainFeatureExtractor {
    fn default() -> Self {
        Self::new(&ScoringTables::default())
    }
}

impl DomainFeatureExtractor {
    pub fn new(tables: &ScoringTables) -> Self {
        Self {
            suspicious_tlds: tables.suspicious_tlds.clone(),
            brand_keywords: tables.brand_keywords.clone(),
        }
    }

    pub fn extract(&self, domain: &str) -> FeatureSet {
        let d = domain.to_lowercase();

        let len = d.chars().count();
        let dot_count = d.matches('.').count();
        let hyphen_count = d.matches('-').count();
        let digit_count = d.chars().filter(|c| c.is_ascii_digit()).count();
        let vowel_count = d.chars().filter(|c| "aeiou".contains(*c)).count();

        let labels: Vec<&str> = if d.is_empty() {
            Vec::new()
        } else {
            d.split('.').collect()
        };
        let tld = labels.last().copied().unwrap_or_default();

        let suspicious_tld = self.suspicious_tlds.iter().any(|t| t == tld);
        let contains_brand_keyword = self
            .brand_keywords
            .iter()
            .any(|keyword| d.contains(keyword.as_str()));

        FeatureSet {
            len,
            dot_count,
            hyphen_count,
            digit_count,
            digit_ratio: ratio(digit_count, len),
            label_count: labels.len(),
            suspicious_tld: flag(suspicious_tld),
            contains_brand_keyword: flag(contains_brand_keyword),
            vowel_ratio: ratio(vowel_count, len),
        }
    }
}

fn ratio(count: usize, len: usize) -> f64 {
    if len == 0 {
        0.0
    } else {
        count as f64 / len as f64
    }
}

fn flag(set: bool) -> f64 {
    if set {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_domain() {
        let features = DomainFeatureExtractor::default().extract("");
        assert_eq!(features, FeatureSet::default());
        assert_eq!(features.label_count, 0);
        assert_eq!(features.digit_ratio, 0.0);
        assert_eq!(features.vowel_ratio, 0.0);
    }

    #[test]
    fn test_counts_and_ratios() {
        let features = DomainFeatureExtractor::default().extract("Secure-Login99.Example.XYZ");

        assert_eq!(features.len, 26);
        assert_eq!(features.dot_count, 2);
        assert_eq!(features.hyphen_count, 1);
        assert_eq!(features.digit_count, 2);
        assert!((features.digit_ratio - 2.0 / 26.0).abs() < 1e-12);
        assert_eq!(features.label_count, 3);
        assert_eq!(features.suspicious_tld, 1.0);
        assert_eq!(features.contains_brand_keyword, 1.0);
        // e, u, e, o, i, e, a, e
        assert!((features.vowel_ratio - 8.0 / 26.0).abs() < 1e-12);
    }

    #[test]
    fn test_brand_keyword_is_substring_match() {
        let extractor = DomainFeatureExtractor::default();

        assert_eq!(extractor.extract("paypal-login.xyz").contains_brand_keyword, 1.0);
        assert_eq!(extractor.extract("mypaypalsucks.com").contains_brand_keyword, 1.0);
        assert_eq!(extractor.extract("example.com").contains_brand_keyword, 0.0);
    }

    #[test]
    fn test_tld_is_last_label_only() {
        let extractor = DomainFeatureExtractor::default();

        assert_eq!(extractor.extract("shop.example.com").suspicious_tld, 0.0);
        assert_eq!(extractor.extract("example.shop").suspicious_tld, 1.0);
        assert_eq!(extractor.extract("ru").suspicious_tld, 1.0);
        assert_eq!(extractor.extract("example.com.").suspicious_tld, 0.0);
        assert_eq!(extractor.extract("example.com.").label_count, 3);
    }

    #[test]
    fn test_injected_tables() {
        let tables = ScoringTables {
            suspicious_tlds: vec!["test".to_string()],
            brand_keywords: vec!["acme".to_string()],
            ..ScoringTables::default()
        };
        let features = DomainFeatureExtractor::new(&tables).extract("acme-corp.test");

        assert_eq!(features.suspicious_tld, 1.0);
        assert_eq!(features.contains_brand_keyword, 1.0);

        let features = DomainFeatureExtractor::new(&tables).extract("paypal.xyz");
        assert_eq!(features.suspicious_tld, 0.0);
        assert_eq!(features.contains_brand_keyword, 0.0);
    }

    #[test]
    fn test_named_lookup() {
        let features = DomainFeatureExtractor::default().extract("a1.ru");

        assert_eq!(features.get("len"), Some(5.0));
        assert_eq!(features.get("digit_ratio"), Some(0.2));
        assert_eq!(features.get("suspicious_tld"), Some(1.0));
        assert_eq!(features.get("missing"), None);
    }
}
