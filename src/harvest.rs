use crate::message::{EmailMessage, Link};
use regex::Regex;
use std::collections::HashSet;

/// Rebuilds the link list and HTML-derived text for messages that were
/// exported without them (raw JSON dumps rather than mail-client requests).
pub struct LinkHarvester {
    anchor_regex: Regex,
    text_url_regex: Regex,
    hidden_block_regex: Regex,
    tag_regex: Regex,
    whitespace_regex: Regex,
}

impl Default for LinkHarvester {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkHarvester {
    pub fn new() -> Self {
        Self {
            anchor_regex: Regex::new(r#"(?is)<a\b[^>]*?\bhref\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
                .unwrap(),
            text_url_regex: Regex::new(r#"(?i)(?:https?://|mailto:|www\.)[^\s<>"]+"#).unwrap(),
            hidden_block_regex: Regex::new(
                r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>|<noscript\b.*?</noscript\s*>",
            )
            .unwrap(),
            tag_regex: Regex::new(r"(?s)<[^>]*>").unwrap(),
            whitespace_regex: Regex::new(r"\s+").unwrap(),
        }
    }

    /// Anchors from the HTML part first, then URLs written out in plain text.
    /// Duplicate hrefs keep their first position.
    pub fn extract_links(&self, html: Option<&str>, plain: Option<&str>) -> Vec<Link> {
        let mut hrefs = Vec::new();

        if let Some(html) = html {
            for cap in self.anchor_regex.captures_iter(html) {
                if let Some(href) = cap.get(1).or_else(|| cap.get(2)) {
                    hrefs.push(decode_html_entities(href.as_str()));
                }
            }
        }

        if let Some(plain) = plain {
            for found in self.text_url_regex.find_iter(plain) {
                let raw = found.as_str();
                if raw.starts_with("www.") {
                    hrefs.push(format!("http://{}", raw));
                } else {
                    hrefs.push(raw.to_string());
                }
            }
        }

        let mut seen = HashSet::new();
        hrefs
            .into_iter()
            .filter(|href| !href.is_empty() && seen.insert(href.trim().to_string()))
            .map(|href| Link { href })
            .collect()
    }

    /// Visible text of an HTML fragment with whitespace collapsed
    pub fn text_from_html(&self, html: &str) -> String {
        let visible = self.hidden_block_regex.replace_all(html, " ");
        let text = self.tag_regex.replace_all(&visible, " ");
        let text = decode_html_entities(&text);
        self.whitespace_regex
            .replace_all(&text, " ")
            .trim()
            .to_string()
    }

    /// Fill `textFromHtml` and `links` when the message carries HTML but lacks them
    pub fn complete(&self, message: &mut EmailMessage) {
        if message.text_from_html.is_none() {
            if let Some(html) = &message.html {
                message.text_from_html = Some(self.text_from_html(html));
            }
        }

        if message.links.is_none() {
            let links =
                self.extract_links(message.html.as_deref(), message.plain_text.as_deref());
            log::debug!("Harvested {} link(s) from message body", links.len());
            message.links = Some(links);
        }
    }
}

fn decode_html_entities(text: &str) -> String {
    let entities = [
        ("&lt;", "<"),
        ("&gt;", ">"),
        ("&quot;", "\""),
        ("&#39;", "'"),
        ("&#x27;", "'"),
        ("&nbsp;", " "),
        ("&amp;", "&"),
    ];

    let mut result = text.to_string();
    for (entity, replacement) in &entities {
        result = result.replace(entity, replacement);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hrefs(links: &[Link]) -> Vec<&str> {
        links.iter().map(|l| l.href.as_str()).collect()
    }

    #[test]
    fn test_anchor_extraction() {
        let harvester = LinkHarvester::new();
        let html = r#"<p>Hi</p><A class="btn" HREF="https://a.example/x?a=1&amp;b=2">Go</A>
            <a href='http://b.example'>B</a><a name="top">no link</a>"#;

        let links = harvester.extract_links(Some(html), None);
        assert_eq!(
            hrefs(&links),
            vec!["https://a.example/x?a=1&b=2", "http://b.example"]
        );
    }

    #[test]
    fn test_plain_text_urls() {
        let harvester = LinkHarvester::new();
        let plain = "Visit www.example.com/offer or https://secure.example.net/login,\n\
                     mail mailto:help@example.org \"https://quoted.example\"";

        let links = harvester.extract_links(None, Some(plain));
        assert_eq!(
            hrefs(&links),
            vec![
                "http://www.example.com/offer",
                "https://secure.example.net/login,",
                "mailto:help@example.org",
                "https://quoted.example",
            ]
        );
    }

    #[test]
    fn test_deduplicates_in_order() {
        let harvester = LinkHarvester::new();
        let html = r#"<a href="https://a.example">1</a><a href="">empty</a>"#;
        let plain = "https://b.example then https://a.example again";

        let links = harvester.extract_links(Some(html), Some(plain));
        assert_eq!(hrefs(&links), vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn test_text_from_html() {
        let harvester = LinkHarvester::new();
        let html = "<html><head><style>p { color: red; }</style>\
                    <script>alert('x')</script></head>\
                    <body><p>External&nbsp;sender:</p>\n<p>Tom &amp; Jerry</p></body></html>";

        assert_eq!(harvester.text_from_html(html), "External sender: Tom & Jerry");
        assert_eq!(harvester.text_from_html(""), "");
    }

    #[test]
    fn test_complete_fills_missing_fields_only() {
        let harvester = LinkHarvester::new();

        let mut message = EmailMessage::from_value(json!({
            "html": "<a href=\"http://bit.ly/x\">click</a>",
            "plainText": "or www.example.com"
        }));
        harvester.complete(&mut message);
        assert_eq!(
            hrefs(message.links()),
            vec!["http://bit.ly/x", "http://www.example.com"]
        );
        assert_eq!(message.text_from_html.as_deref(), Some("click"));

        let mut message = EmailMessage::from_value(json!({
            "html": "<a href=\"http://bit.ly/x\">click</a>",
            "textFromHtml": "kept",
            "links": []
        }));
        harvester.complete(&mut message);
        assert!(message.links().is_empty());
        assert_eq!(message.text_from_html.as_deref(), Some("kept"));
    }
}
