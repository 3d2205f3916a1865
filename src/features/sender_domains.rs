use crate::domain_utils::DomainUtils;
use crate::message::{EmailMessage, HeaderValue};

/// Normalized sender-side domains of a message. Missing values are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SenderDomains {
    pub from_domain: String,
    pub reply_to_domain: String,
    pub return_path_domain: String,
}

impl SenderDomains {
    pub fn reply_to_differs(&self) -> bool {
        !self.reply_to_domain.is_empty() && self.reply_to_domain != self.from_domain
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SenderDomainResolver;

impl SenderDomainResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(&self, message: &EmailMessage) -> SenderDomains {
        // From falls back to the client-supplied author when the header is absent or empty
        let from = Self::non_empty(message.header("from"))
            .or_else(|| Self::non_empty(message.author.as_ref()));

        SenderDomains {
            from_domain: Self::domain_of(from),
            reply_to_domain: Self::domain_of(Self::non_empty(message.header("reply-to"))),
            return_path_domain: Self::domain_of(Self::non_empty(message.header("return-path"))),
        }
    }

    fn non_empty(value: Option<&HeaderValue>) -> Option<&HeaderValue> {
        value.filter(|v| !v.is_empty())
    }

    fn domain_of(value: Option<&HeaderValue>) -> String {
        value
            .and_then(HeaderValue::first)
            .map(DomainUtils::domain_from_mailbox)
            .unwrap_or_default()
    }
}
