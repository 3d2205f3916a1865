use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;

/// A header or author field as sent by the host: usually a list of
/// strings, sometimes a bare string, occasionally something else entirely.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    Single(String),
    Many(Vec<Value>),
    Other(Value),
}

impl From<Value> for HeaderValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => HeaderValue::Single(s),
            Value::Array(items) => HeaderValue::Many(items),
            other => HeaderValue::Other(other),
        }
    }
}

impl<'de> Deserialize<'de> for HeaderValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(HeaderValue::from)
    }
}

impl HeaderValue {
    /// The value a single-valued consumer should look at: the string itself,
    /// or the first element of a sequence when that element is a string.
    pub fn first(&self) -> Option<&str> {
        match self {
            HeaderValue::Single(s) => Some(s),
            HeaderValue::Many(items) => items.first().and_then(Value::as_str),
            HeaderValue::Other(_) => None,
        }
    }

    /// Every string carried by the value. A bare string counts as one element.
    pub fn strings(&self) -> Vec<&str> {
        match self {
            HeaderValue::Single(s) => vec![s.as_str()],
            HeaderValue::Many(items) => items.iter().filter_map(Value::as_str).collect(),
            HeaderValue::Other(_) => Vec::new(),
        }
    }

    /// True when the value carries nothing worth reading (empty string or
    /// sequence, null, false, zero, empty object). Empty values give way to
    /// the next source in a fallback chain.
    pub fn is_empty(&self) -> bool {
        match self {
            HeaderValue::Single(s) => s.is_empty(),
            HeaderValue::Many(items) => items.is_empty(),
            HeaderValue::Other(value) => match value {
                Value::Null => true,
                Value::Bool(b) => !b,
                Value::Number(n) => n.as_f64() == Some(0.0),
                Value::Object(map) => map.is_empty(),
                Value::String(s) => s.is_empty(),
                Value::Array(items) => items.is_empty(),
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Link {
    pub href: String,
}

/// Message description forwarded by the mail client. Every field is
/// optional and a field of the wrong shape reads as empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailMessage {
    #[serde(default, deserialize_with = "lenient_headers")]
    pub headers: HashMap<String, HeaderValue>,
    #[serde(default, deserialize_with = "lenient_header_value")]
    pub author: Option<HeaderValue>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub plain_text: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub text_from_html: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub raw_snippet: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub html: Option<String>,
    #[serde(default, deserialize_with = "lenient_links")]
    pub links: Option<Vec<Link>>,
}

impl EmailMessage {
    /// Decode a message from an arbitrary JSON value; anything that is not
    /// an object yields an empty message.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
            _ => EmailMessage::default(),
        }
    }

    /// Header lookup by lower-case name, tolerating hosts that keep the
    /// original capitalization. When several spellings are present and none
    /// is lower-case, the lexicographically smallest key wins.
    pub fn header(&self, name: &str) -> Option<&HeaderValue> {
        let name_lower = name.to_lowercase();
        self.headers.get(&name_lower).or_else(|| {
            self.headers
                .iter()
                .filter(|(k, _)| k.to_lowercase() == name_lower)
                .min_by(|(a, _), (b, _)| a.cmp(b))
                .map(|(_, v)| v)
        })
    }

    pub fn links(&self) -> &[Link] {
        self.links.as_deref().unwrap_or_default()
    }

    /// Plain text, HTML-derived text and snippet concatenated in that order
    pub fn body_text(&self) -> String {
        [&self.plain_text, &self.text_from_html, &self.raw_snippet]
            .into_iter()
            .map(|part| part.as_deref().unwrap_or_default())
            .collect()
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_header_value<'de, D>(deserializer: D) -> Result<Option<HeaderValue>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        value => Some(HeaderValue::from(value)),
    })
}

fn lenient_headers<'de, D>(deserializer: D) -> Result<HashMap<String, HeaderValue>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map
            .into_iter()
            .map(|(name, value)| (name, HeaderValue::from(value)))
            .collect(),
        _ => HashMap::new(),
    })
}

fn lenient_links<'de, D>(deserializer: D) -> Result<Option<Vec<Link>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| Link {
                    href: item
                        .get("href")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                })
                .collect(),
        ),
        _ => None,
    })
}
