//! Exim

use super::Extractor;
use crate::section::{Cursor, Line, Markers, Section};
use crate::types::{InboundMessage, ReasonOverride, ScanOutcome};
use regex::Regex;
use std::sync::LazyLock;

static FROM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^Mail Delivery System").unwrap());

static SUBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:Mail delivery failed|Warning: message .+ delayed)").unwrap()
});

static BEGIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^This message was created automatically by mail delivery software[.]").unwrap()
});

static RFC822: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^------ This is a copy of the message.*headers[.] ------$").unwrap()
});

//   kijitora@example.jp
static RECIPIENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]+<?([^ \t<>]+@[^ \t<>]+?)>?:?$").unwrap());

//     SMTP error from remote mail server after RCPT TO:<kijitora@example.jp>:
static COMMAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)SMTP error from remote (?:mail )?server after (HELO|EHLO|MAIL FROM|RCPT TO|DATA|end of data)")
        .unwrap()
});

//     host mx.example.jp [192.0.2.1]: 550 5.1.1 <kijitora@example.jp>: User unknown
static HOST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bhost ([^ \t]+) \[[0-9a-fA-F:.]+\]").unwrap());

static INDENTED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[ \t]+(.+)$").unwrap());

static OVERRIDES: LazyLock<Vec<ReasonOverride>> = LazyLock::new(|| {
    vec![
        ReasonOverride::new("expired", r"retry timeout exceeded"),
        ReasonOverride::new(
            "hostunknown",
            r"all relevant MX records point to non-existent hosts|Unrouteable address",
        ),
        ReasonOverride::new("mailboxfull", r"mailbox is full|quota exceeded"),
    ]
});

/// Bounces generated by Exim
///
/// Failed addresses are indented by two spaces; the remote reply follows on
/// lines indented deeper. When the body lists nobody, the
/// `X-Failed-Recipients` header still names the addresses.
#[derive(Debug, Clone, Copy, Default)]
pub struct Exim;

impl Extractor for Exim {
    fn agent(&self) -> &'static str {
        "MTA::Exim"
    }

    fn description(&self) -> &'static str {
        "Exim"
    }

    fn header_list(&self) -> &'static [&'static str] {
        &["X-Failed-Recipients"]
    }

    fn reason_overrides(&self) -> &[ReasonOverride] {
        &OVERRIDES
    }

    fn matches(&self, message: &InboundMessage) -> bool {
        FROM.is_match(message.from()) || SUBJECT.is_match(message.subject())
    }

    fn scan(&self, message: &InboundMessage) -> ScanOutcome {
        if !SUBJECT.is_match(message.subject()) && !message.has_header("x-failed-recipients") {
            return ScanOutcome::NotThisFormat;
        }

        let markers = Markers {
            begin: &BEGIN,
            rfc822: &RFC822,
        };
        let mut section = Section::walk(message.body(), &markers, |section, line| {
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
            let Some(cv) = INDENTED.captures(e) else {
                return;
            };
            if let Some(command) = COMMAND.captures(e) {
                let verb = match command[1].to_uppercase().as_str() {
                    "END OF DATA" => "DATA".to_string(),
                    other => other.split_whitespace().next().unwrap_or_default().to_string(),
                };
                section.current().command = verb;
            }
            if let Some(host) = HOST.captures(e) {
                section.current().rhost = host[1].to_lowercase();
            }
            section.append_diagnosis(&cv[1]);
        });

        if section.recipients() == 0
            && section.cursor().has(Cursor::DELIVERY_STATUS)
            && let Some(failed) = message.header("x-failed-recipients")
        {
            for address in failed.split(',').map(str::trim).filter(|a| !a.is_empty()) {
                section.add_recipient(address);
            }
        }
        section.finish(self.agent())
    }
}
