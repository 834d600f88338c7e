//! Sendmail

use super::Extractor;
use crate::section::{Line, Markers, Section};
use crate::types::{InboundMessage, ScanOutcome};
use regex::Regex;
use std::sync::LazyLock;

static FROM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^Mail Delivery Subsystem|MAILER-DAEMON)").unwrap());

static SUBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:Returned mail: |Warning: could not send message|\[BOUNCE\])").unwrap()
});

static BEGIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Content-Type: message/delivery-status").unwrap());

static RFC822: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Content-Type: (?:message/rfc822|text/rfc822-headers)").unwrap()
});

// >>> RCPT To:<kijitora@example.jp>
static COMMAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^>>> (HELO|EHLO|MAIL|RCPT|DATA|QUIT)\b").unwrap());

// <<< 550 5.1.1 <kijitora@example.jp>... User Unknown
static REPLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<<< ([45]\d{2}[ -].+)$").unwrap());

/// Bounces generated by Sendmail
///
/// Besides the RFC 3464 report, the human readable part usually holds the
/// SMTP transcript. The failing command and the first error reply are read
/// from it when the report leaves them out.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sendmail;

impl Extractor for Sendmail {
    fn agent(&self) -> &'static str {
        "MTA::Sendmail"
    }

    fn description(&self) -> &'static str {
        "V8Sendmail: /usr/sbin/sendmail"
    }

    fn matches(&self, message: &InboundMessage) -> bool {
        FROM.is_match(message.from()) || SUBJECT.is_match(message.subject())
    }

    fn scan(&self, message: &InboundMessage) -> ScanOutcome {
        if !self.matches(message) {
            return ScanOutcome::NotThisFormat;
        }

        let markers = Markers {
            begin: &BEGIN,
            rfc822: &RFC822,
        };
        let mut command = String::new();
        let mut reply = String::new();

        let mut section = Section::walk(message.body(), &markers, |section, line| match line {
            Line::Preamble(e) => {
                if let Some(cv) = COMMAND.captures(e) {
                    command = cv[1].to_uppercase();
                } else if let Some(cv) = REPLY.captures(e)
                    && reply.is_empty()
                {
                    reply = cv[1].to_string();
                }
            }
            Line::Field(e) => {
                section.rfc3464_field(e);
            }
            Line::Begin(_) => {}
        });

        for record in section.records_mut() {
            if record.command.is_empty() {
                record.command.clone_from(&command);
            }
            if record.diagnosis.is_empty() {
                record.diagnosis.clone_from(&reply);
            }
        }
        section.finish(self.agent())
    }
}
