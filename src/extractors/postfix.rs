//! Postfix

use super::Extractor;
use crate::section::{Line, Markers, Section};
use crate::types::{InboundMessage, ScanOutcome};
use regex::Regex;
use std::sync::LazyLock;

static FROM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^Mail Delivery System").unwrap());

static SUBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:Undelivered Mail Returned to Sender|Delayed Mail \(still being retried\))")
        .unwrap()
});

static BEGIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Content-Type: message/delivery-status").unwrap());

static RFC822: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Content-Type: (?:message/rfc822|text/rfc822-headers)").unwrap()
});

// This is the mail system at host mx.example.jp.
static MAIL_SYSTEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^This is the (?:mail system|Postfix program) at host ([^ ]+?)[.]?$").unwrap()
});

// <kijitora@example.jp>: host mx.example.jp[192.0.2.1] said: 550 5.1.1
static REPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<([^ <>]+@[^ <>]+)>:?[ ]*(.*)$").unwrap());

static CONTINUATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[ \t]+(.+)$").unwrap());

/// Bounces generated by Postfix
///
/// The records come from the RFC 3464 part. The human readable part names
/// the reporting host and carries the full remote reply, which is used when
/// the report has no `Diagnostic-Code` for a recipient.
#[derive(Debug, Clone, Copy, Default)]
pub struct Postfix;

impl Extractor for Postfix {
    fn agent(&self) -> &'static str {
        "MTA::Postfix"
    }

    fn description(&self) -> &'static str {
        "Postfix"
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
        let mut reports: Vec<(String, String)> = Vec::new();

        let mut section = Section::walk(message.body(), &markers, |section, line| match line {
            Line::Preamble(e) => {
                if let Some(cv) = MAIL_SYSTEM.captures(e) {
                    section.set_lhost(&cv[1]);
                } else if let Some(cv) = REPORT.captures(e) {
                    reports.push((cv[1].to_string(), cv[2].to_string()));
                } else if let Some(cv) = CONTINUATION.captures(e)
                    && let Some((_, text)) = reports.last_mut()
                {
                    text.push(' ');
                    text.push_str(&cv[1]);
                }
            }
            Line::Field(e) => {
                section.rfc3464_field(e);
            }
            Line::Begin(_) => {}
        });

        for record in section.records_mut() {
            if !record.diagnosis.is_empty() {
                continue;
            }
            if let Some((_, text)) = reports
                .iter()
                .find(|(address, _)| address.eq_ignore_ascii_case(&record.recipient))
            {
                record.diagnosis.clone_from(text);
            }
        }
        section.finish(self.agent())
    }
}
