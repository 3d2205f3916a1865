use url::Url;

/// Minimal domain helpers shared by the sender and link checks
pub struct DomainUtils;

impl DomainUtils {
    /// Domain part of an address: everything after the last `@`, trimmed
    /// and lower-cased. Input without `@` has no domain.
    pub fn extract_domain(address: &str) -> Option<String> {
        address
            .rsplit_once('@')
            .map(|(_, domain)| domain.trim().to_lowercase())
    }

    /// Domain of a header line such as `"Display Name" <user@example.com>`.
    /// Only the last whitespace-delimited token is considered.
    pub fn domain_from_mailbox(mailbox: &str) -> String {
        mailbox
            .split_whitespace()
            .last()
            .map(|token| token.trim_matches(|c: char| c == '<' || c == '>'))
            .and_then(Self::extract_domain)
            .unwrap_or_default()
    }

    /// Host of a URL, lower-cased and without any port. Scheme-relative
    /// references (`//host/path`) carry a host; other relative or
    /// unparsable references have none.
    pub fn network_location(href: &str) -> Option<String> {
        let parsed = if href.starts_with("//") {
            Url::parse(&format!("http:{}", href)).ok()?
        } else {
            Url::parse(href).ok()?
        };

        parsed.host_str().map(|host| host.to_lowercase())
    }

    /// True when domain ends with any of the given suffixes
    pub fn ends_with_any(domain: &str, suffixes: &[String]) -> bool {
        suffixes.iter().any(|suffix| domain.ends_with(suffix.as_str()))
    }
}
