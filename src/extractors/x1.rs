//! Unknown MTA #1

use super::Extractor;
use crate::section::{Line, Markers, Section};
use crate::types::{InboundMessage, ScanOutcome};
use regex::Regex;
use std::sync::LazyLock;

static FROM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""Mail Deliver System" "#).unwrap());

static SUBJECT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^Returned Mail: ").unwrap());

static BEGIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^The original message was received at (.+)$").unwrap());

static RFC822: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Received: from \d+[.]\d+[.]\d+[.]\d").unwrap());

// kijitora@example.co.jp [User unknown]
static RECIPIENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^ ]+?@[^ ]+?)[ ]+\[(.+)\]$").unwrap());

/// Bounces from an unidentified MTA signing as "Mail Deliver System"
///
/// ```text
/// The original message was received at Thu, 29 Apr 2010 23:34:45 +0900 (JST)
/// from shironeko@example.jp
///
/// ---The following addresses had delivery errors---
///
/// kijitora@example.co.jp [User unknown]
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct X1;

impl Extractor for X1 {
    fn agent(&self) -> &'static str {
        "MTA::X1"
    }

    fn description(&self) -> &'static str {
        "Unknown MTA #1"
    }

    fn matches(&self, message: &InboundMessage) -> bool {
        FROM.is_match(message.from()) && SUBJECT.is_match(message.subject())
    }

    fn scan(&self, message: &InboundMessage) -> ScanOutcome {
        if !self.matches(message) {
            return ScanOutcome::NotThisFormat;
        }

        let markers = Markers {
            begin: &BEGIN,
            rfc822: &RFC822,
        };
        Section::walk(message.body(), &markers, |section, line| match line {
            Line::Begin(e) => {
                if let Some(cv) = BEGIN.captures(e) {
                    section.set_date(&cv[1]);
                }
            }
            Line::Field(e) => {
                if let Some(cv) = RECIPIENT.captures(e) {
                    section.add_recipient(&cv[1]).diagnosis = cv[2].to_string();
                } else if let Some(cv) = BEGIN.captures(e) {
                    section.set_date(&cv[1]);
                }
            }
            Line::Preamble(_) => {}
        })
        .finish(self.agent())
    }
}
