//! Core types for bounce classification

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Line that marks the end of input when present in a body
pub const END_OF_EMAIL: &str = "__END_OF_EMAIL_MESSAGE__";

/// A decoded message handed to the classifier
///
/// Header names are stored lower-cased. Every `Received` header is kept in
/// order; for any other header the first occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundMessage {
    headers: HashMap<String, String>,
    received: Vec<String>,
    body: Vec<String>,
}

impl InboundMessage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header, keeping the first value for repeated names
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.add_header(name, value);
        self
    }

    /// Replace the body with the lines of `text`
    #[must_use]
    pub fn with_body(mut self, text: &str) -> Self {
        self.body = text.lines().map(str::to_string).collect();
        self
    }

    pub(crate) fn add_header(&mut self, name: &str, value: impl Into<String>) {
        let name = name.trim().to_lowercase();
        if name == "received" {
            self.received.push(value.into());
        } else {
            self.headers.entry(name).or_insert_with(|| value.into());
        }
    }

    pub(crate) fn set_body(&mut self, lines: Vec<String>) {
        self.body = lines;
    }

    /// Value of a header, looked up case-insensitively
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Whether the header is present with a non-blank value
    #[must_use]
    pub fn has_header(&self, name: &str) -> bool {
        self.header(name).is_some_and(|v| !v.trim().is_empty())
    }

    #[must_use]
    pub fn from(&self) -> &str {
        self.header("from").unwrap_or_default()
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        self.header("subject").unwrap_or_default()
    }

    /// `Received` headers in the order they appear in the message
    #[must_use]
    pub fn received(&self) -> &[String] {
        &self.received
    }

    #[must_use]
    pub fn body(&self) -> &[String] {
        &self.body
    }

    /// Iterate over the scalar headers
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Delivery status of one failed recipient
///
/// Every field is a plain string and stays empty when unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldRecord {
    /// Failed recipient address
    pub recipient: String,

    /// DSN action, lower-cased (e.g., "failed")
    pub action: String,

    /// Enhanced status code (e.g., "5.1.1")
    pub status: String,

    /// Remote host that rejected the message
    pub rhost: String,

    /// Local host that reported the failure
    pub lhost: String,

    /// Diagnostic type (e.g., "SMTP")
    pub spec: String,

    /// Error message text
    pub diagnosis: String,

    /// Arrival or last attempt date as found in the bounce
    pub date: String,

    /// Agent identifier of the extractor that produced the record
    pub agent: String,

    /// Failure category
    pub reason: String,

    /// SMTP command the error answered (e.g., "RCPT")
    pub command: String,
}

impl FieldRecord {
    #[must_use]
    pub const fn has_recipient(&self) -> bool {
        !self.recipient.is_empty()
    }
}

/// Records and the original message recovered from one bounce
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Extraction {
    pub records: Vec<FieldRecord>,

    /// Header lines of the original message kept by the weed-out filter
    pub rfc822: Vec<String>,
}

/// Result of running one extractor over a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The message lacks something this format always carries
    NotThisFormat,

    /// The format looked plausible but no recipient was extracted
    NothingExtracted,

    Extracted(Extraction),
}

impl ScanOutcome {
    #[must_use]
    pub const fn is_extracted(&self) -> bool {
        matches!(self, Self::Extracted(_))
    }

    #[must_use]
    pub fn into_extraction(self) -> Option<Extraction> {
        match self {
            Self::Extracted(extraction) => Some(extraction),
            Self::NotThisFormat | Self::NothingExtracted => None,
        }
    }
}

/// A recognized bounce
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bounce {
    /// Agent identifier of the extractor that recognized the message
    pub agent: String,

    pub records: Vec<FieldRecord>,

    pub rfc822: Vec<String>,
}

/// Final outcome of classifying a message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum Classification {
    Recognized(Bounce),

    /// No extractor produced a record; the message may not be a bounce at all
    Unrecognized,
}

impl Classification {
    #[must_use]
    pub const fn is_recognized(&self) -> bool {
        matches!(self, Self::Recognized(_))
    }

    #[must_use]
    pub const fn bounce(&self) -> Option<&Bounce> {
        match self {
            Self::Recognized(bounce) => Some(bounce),
            Self::Unrecognized => None,
        }
    }
}

/// Failure category assigned when a diagnosis matches a pattern
#[derive(Debug, Clone)]
pub struct ReasonOverride {
    pub reason: &'static str,
    pub pattern: Regex,
}

impl ReasonOverride {
    /// Build an override from a pattern known to be valid
    ///
    /// # Panics
    ///
    /// Panics if `pattern` is not a valid regular expression.
    #[must_use]
    pub fn new(reason: &'static str, pattern: &str) -> Self {
        Self {
            reason,
            pattern: Regex::new(pattern).unwrap(),
        }
    }
}

impl fmt::Display for ReasonOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => /{}/", self.reason, self.pattern)
    }
}
