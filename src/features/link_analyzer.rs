use super::legitimacy::LegitimacyModel;
use crate::config::ScoringTables;
use crate::domain_utils::DomainUtils;
use crate::message::{EmailMessage, Link};
use serde::Serialize;

/// A link that tripped at least one check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuspiciousLink {
    pub href: String,
    pub domain: String,
    pub reasons: Vec<String>,
}

pub struct LinkAnalyzer {
    shorteners: Vec<String>,
    bad_tlds: Vec<String>,
    model: LegitimacyModel,
}

impl Default for LinkAnalyzer {
    fn default() -> Self {
        Self::new(&ScoringTables::default())
    }
}

impl LinkAnalyzer {
    pub fn new(tables: &ScoringTables) -> Self {
        Self {
            shorteners: tables.shorteners.clone(),
            bad_tlds: tables.bad_tlds.clone(),
            model: LegitimacyModel::new(tables),
        }
    }

    /// Suspicious links of a message, in message order
    pub fn evaluate(&self, message: &EmailMessage) -> Vec<SuspiciousLink> {
        message
            .links()
            .iter()
            .filter_map(|link| self.analyze_link(link))
            .collect()
    }

    pub fn analyze_link(&self, link: &Link) -> Option<SuspiciousLink> {
        let href = link.href.as_str();
        let domain = DomainUtils::network_location(href).unwrap_or_default();
        let mut reasons = Vec::new();

        if href.starts_with("http://") {
            reasons.push("uses HTTP instead of HTTPS".to_string());
        }

        if DomainUtils::ends_with_any(&domain, &self.shorteners) {
            reasons.push("URL shortener".to_string());
        }

        if DomainUtils::ends_with_any(&domain, &self.bad_tlds) {
            reasons.push("suspicious TLD".to_string());
        }

        if !domain.is_empty() {
            let score = self.model.score(&domain);
            if LegitimacyModel::is_suspicious(score) {
                reasons.push(format!("domain looks suspicious (score={:.2})", score));
            }
        }

        if reasons.is_empty() {
            return None;
        }

        log::debug!("Suspicious link {} ({}): {:?}", href, domain, reasons);
        Some(SuspiciousLink {
            href: href.to_string(),
            domain,
            reasons,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn link(href: &str) -> Link {
        Link {
            href: href.to_string(),
        }
    }

    #[test]
    fn test_http_shortener() {
        let analyzer = LinkAnalyzer::default();
        let result = analyzer.analyze_link(&link("http://bit.ly/fake-link")).unwrap();

        assert_eq!(result.href, "http://bit.ly/fake-link");
        assert_eq!(result.domain, "bit.ly");
        assert_eq!(
            result.reasons,
            vec!["uses HTTP instead of HTTPS", "URL shortener"]
        );
    }

    #[test]
    fn test_bad_tld_and_low_score() {
        let analyzer = LinkAnalyzer::default();
        let result = analyzer
            .analyze_link(&link("https://a1b2.ru/verify"))
            .unwrap();

        assert_eq!(
            result.reasons,
            vec!["suspicious TLD", "domain looks suspicious (score=0.19)"]
        );
    }

    #[test]
    fn test_clean_https_link() {
        let analyzer = LinkAnalyzer::default();
        assert!(analyzer
            .analyze_link(&link("https://www.example.com/account"))
            .is_none());
    }

    #[test]
    fn test_unparsable_href_only_checks_scheme() {
        let analyzer = LinkAnalyzer::default();

        let result = analyzer.analyze_link(&link("http://")).unwrap();
        assert_eq!(result.domain, "");
        assert_eq!(result.reasons, vec!["uses HTTP instead of HTTPS"]);

        assert!(analyzer.analyze_link(&link("bit.ly/relative")).is_none());
        assert!(analyzer.analyze_link(&link("")).is_none());
    }

    #[test]
    fn test_scheme_relative_and_ported_links() {
        let analyzer = LinkAnalyzer::default();
        let expected = vec!["suspicious TLD", "domain looks suspicious (score=0.24)"];

        for href in ["//evil.ru/x", "https://evil.ru:443/x", "https://evil.ru:8443/x"] {
            let result = analyzer.analyze_link(&link(href)).unwrap();
            assert_eq!(result.domain, "evil.ru", "{}", href);
            assert_eq!(result.reasons, expected, "{}", href);
        }
    }

    #[test]
    fn test_scheme_check_is_case_sensitive() {
        let analyzer = LinkAnalyzer::default();
        let result = analyzer.analyze_link(&link("HTTP://bit.ly/x")).unwrap();
        assert_eq!(result.reasons, vec!["URL shortener"]);
    }

    #[test]
    fn test_suffix_match_not_label_match() {
        let analyzer = LinkAnalyzer::default();
        let result = analyzer
            .analyze_link(&link("https://microsoft.co"))
            .unwrap();
        assert_eq!(result.reasons, vec!["URL shortener"]);
    }

    #[test]
    fn test_evaluate_preserves_order_and_duplicates() {
        let analyzer = LinkAnalyzer::default();
        let message = EmailMessage::from_value(json!({
            "links": [
                {"href": "http://bit.ly/one"},
                {"href": "https://example.com/fine"},
                {"href": "https://promo.shop/deal"},
                {"href": "http://bit.ly/one"}
            ]
        }));

        let links = analyzer.evaluate(&message);
        let hrefs: Vec<&str> = links.iter().map(|l| l.href.as_str()).collect();
        assert_eq!(
            hrefs,
            vec!["http://bit.ly/one", "https://promo.shop/deal", "http://bit.ly/one"]
        );
    }

    #[test]
    fn test_injected_shorteners() {
        let tables = ScoringTables {
            shorteners: vec!["is.gd".to_string()],
            ..ScoringTables::default()
        };
        let analyzer = LinkAnalyzer::new(&tables);

        assert!(analyzer.analyze_link(&link("https://bit.ly/x")).is_none());
        assert_eq!(
            analyzer.analyze_link(&link("https://is.gd/x")).unwrap().reasons,
            vec!["URL shortener"]
        );
    }
}
