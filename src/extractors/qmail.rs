//! qmail

use super::Extractor;
use crate::section::{Line, Markers, Section};
use crate::types::{InboundMessage, ReasonOverride, ScanOutcome};
use regex::Regex;
use std::sync::LazyLock;

static FROM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^mailer-daemon@").unwrap());

static SUBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^failure notice").unwrap());

static BEGIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Hi[.] This is the qmail").unwrap());

static RFC822: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^--- Below this line is a copy of the message[.]").unwrap());

// <kijitora@example.jp>:
static RECIPIENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<([^ <>]+@[^ <>]+)>:[ \t]*$").unwrap());

// Remote host said: 550 5.1.1 ... (#5.1.1)
static STATUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[(]#(\d[.]\d+[.]\d+)[)]").unwrap());

// Connected to 192.0.2.1 but sender was rejected.
static CONNECTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Connected to ([^ ]+) but").unwrap());

static OVERRIDES: LazyLock<Vec<ReasonOverride>> = LazyLock::new(|| {
    vec![
        ReasonOverride::new(
            "hostunknown",
            r"Sorry, I couldn't find any host (?:named|by that name)",
        ),
        ReasonOverride::new("userunknown", r"Sorry, no mailbox here by that name"),
        ReasonOverride::new("mailboxfull", r"(?i)disk quota exceeded|mailbox is full"),
        ReasonOverride::new(
            "expired",
            r"I'm not going to try again; this message has been in the queue too long",
        ),
    ]
});

/// Bounces generated by qmail
///
/// Each failed address sits alone on a line in angle brackets, followed by
/// free text describing the failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct Qmail;

impl Extractor for Qmail {
    fn agent(&self) -> &'static str {
        "MTA::Qmail"
    }

    fn description(&self) -> &'static str {
        "qmail"
    }

    fn reason_overrides(&self) -> &[ReasonOverride] {
        &OVERRIDES
    }

    fn matches(&self, message: &InboundMessage) -> bool {
        FROM.is_match(message.from()) || SUBJECT.is_match(message.subject())
    }

    fn scan(&self, message: &InboundMessage) -> ScanOutcome {
        let markers = Markers {
            begin: &BEGIN,
            rfc822: &RFC822,
        };
        Section::walk(message.body(), &markers, |section, line| {
            let Line::Field(e) = line else {
                return;
            };
            if let Some(cv) = RECIPIENT.captures(e) {
                section.add_recipient(&cv[1]);
                return;
            }
            if !section.has_current_recipient() {
                return;
            }
            if let Some(cv) = CONNECTED.captures(e) {
                section.current().rhost = cv[1].to_lowercase();
            }
            if let Some(cv) = STATUS.captures(e) {
                section.current().status = cv[1].to_string();
            }
            section.append_diagnosis(e.trim());
        })
        .finish(self.agent())
    }
}
