//! Google Mail

use super::Extractor;
use crate::section::{Line, Markers, Section};
use crate::types::{InboundMessage, ScanOutcome};
use regex::Regex;
use std::sync::LazyLock;

static FROM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[@](?:googlemail|gmail)[.]com>?$").unwrap());

static SUBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Delivery[ ]Status[ ]Notification").unwrap());

static BEGIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Delivery to the following recipients? (?:failed permanently|has been delayed|failed):$")
        .unwrap()
});

static RFC822: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^----- (?:Original message|Message header follows) -----$").unwrap()
});

static RECIPIENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]+([^ \t]+@[^ \t]+)$").unwrap());

static TECHNICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Technical details of (?:permanent|temporary) failure:").unwrap());

static RETURNED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^The error that the other server returned was:").unwrap());

// ... by mx.example.jp. [192.0.2.1].
static RHOST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bby ([^ \t]+?)[.]? \[\d{1,3}[.]\d{1,3}[.]\d{1,3}[.]\d{1,3}\]").unwrap()
});

/// Bounces from Gmail
///
/// The failed addresses are listed first; a single "Technical details"
/// paragraph follows and applies to all of them.
#[derive(Debug, Clone, Copy, Default)]
pub struct Google;

impl Extractor for Google {
    fn agent(&self) -> &'static str {
        "US::Google"
    }

    fn description(&self) -> &'static str {
        "Google Gmail: https://mail.google.com"
    }

    fn header_list(&self) -> &'static [&'static str] {
        &["X-Failed-Recipients"]
    }

    fn matches(&self, message: &InboundMessage) -> bool {
        FROM.is_match(message.from()) && SUBJECT.is_match(message.subject())
    }

    fn scan(&self, message: &InboundMessage) -> ScanOutcome {
        if !FROM.is_match(message.from()) {
            return ScanOutcome::NotThisFormat;
        }

        let markers = Markers {
            begin: &BEGIN,
            rfc822: &RFC822,
        };
        let mut technical = false;
        let mut details: Vec<String> = Vec::new();
        let mut rhost = String::new();

        let mut section = Section::walk(message.body(), &markers, |section, line| {
            let Line::Field(e) = line else {
                return;
            };
            if technical {
                if RETURNED.is_match(e) {
                    return;
                }
                if let Some(cv) = RHOST.captures(e)
                    && rhost.is_empty()
                {
                    rhost = cv[1].to_lowercase();
                }
                details.push(e.trim().to_string());
            } else if TECHNICAL.is_match(e) {
                technical = true;
            } else if let Some(cv) = RECIPIENT.captures(e) {
                section.add_recipient(&cv[1]);
            }
        });

        let diagnosis = details.join(" ");
        for record in section.records_mut() {
            if record.diagnosis.is_empty() {
                record.diagnosis.clone_from(&diagnosis);
            }
            if record.rhost.is_empty() {
                record.rhost.clone_from(&rhost);
            }
        }
        section.finish(self.agent())
    }
}
