//! Yahoo! Mail

use super::Extractor;
use crate::section::{Line, Markers, Section};
use crate::types::{InboundMessage, ScanOutcome};
use regex::Regex;
use std::sync::LazyLock;

static SUBJECT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^Failure Notice").unwrap());

static BEGIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Sorry, we were unable to deliver your message").unwrap());

static RFC822: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^--- Below this line is a copy of the message[.]").unwrap());

static RECIPIENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<([^ <>]+@[^ <>]+)>:?[ \t]*$").unwrap());

// Remote host said: 550 5.1.1 <kijitora@example.jp>... User Unknown [RCPT_TO]
static REMOTE_HOST_SAID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Remote host said:[ ]*(.+)$").unwrap());

static COMMAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(HELO|EHLO|MAIL_FROM|RCPT_TO|DATA)\]").unwrap());

static CONTINUATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[ \t]+(.+)$").unwrap());

/// Bounces from Yahoo! Mail
///
/// All Yahoo bounces carry `X-YMailISG`. Each failed address is followed by
/// the remote reply, tagged with the SMTP command it answered.
#[derive(Debug, Clone, Copy, Default)]
pub struct Yahoo;

impl Extractor for Yahoo {
    fn agent(&self) -> &'static str {
        "US::Yahoo"
    }

    fn description(&self) -> &'static str {
        "Yahoo! MAIL: https://www.yahoo.com"
    }

    fn header_list(&self) -> &'static [&'static str] {
        &["X-YMailISG"]
    }

    fn matches(&self, message: &InboundMessage) -> bool {
        SUBJECT.is_match(message.subject()) || message.has_header("x-ymailisg")
    }

    fn scan(&self, message: &InboundMessage) -> ScanOutcome {
        if !message.has_header("x-ymailisg") {
            return ScanOutcome::NotThisFormat;
        }

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
            if let Some(cv) = REMOTE_HOST_SAID.captures(e) {
                section.current().diagnosis = cv[1].to_string();
            } else if let Some(cv) = CONTINUATION.captures(e)
                && !section.current().diagnosis.is_empty()
            {
                section.append_diagnosis(&cv[1]);
            }
            if let Some(cv) = COMMAND.captures(e) {
                let verb = cv[1].split('_').next().unwrap_or_default();
                section.current().command = verb.to_string();
            }
        })
        .finish(self.agent())
    }
}
