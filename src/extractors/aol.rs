//! Aol Mail

use super::Extractor;
use crate::section::{Line, Markers, Section};
use crate::types::{InboundMessage, ReasonOverride, ScanOutcome};
use regex::Regex;
use std::sync::LazyLock;

static FROM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Postmaster <Postmaster@AOL[.]com>$").unwrap());

static SUBJECT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^Undeliverable: ").unwrap());

static BEGIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Content-Type: message/delivery-status").unwrap());

static RFC822: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Content-Type: message/rfc822").unwrap());

static OVERRIDES: LazyLock<Vec<ReasonOverride>> = LazyLock::new(|| {
    vec![ReasonOverride::new(
        "hostunknown",
        r"Host[ ]or[ ]domain[ ]name[ ]not[ ]found",
    )]
});

/// Bounces sent by Aol Mail
///
/// Every Aol bounce carries `X-AOL-IP`; the body is a plain RFC 3464 report.
#[derive(Debug, Clone, Copy, Default)]
pub struct Aol;

impl Extractor for Aol {
    fn agent(&self) -> &'static str {
        "US::Aol"
    }

    fn description(&self) -> &'static str {
        "Aol Mail: http://www.aol.com"
    }

    fn header_list(&self) -> &'static [&'static str] {
        &["X-AOL-IP"]
    }

    fn reason_overrides(&self) -> &[ReasonOverride] {
        &OVERRIDES
    }

    fn matches(&self, message: &InboundMessage) -> bool {
        FROM.is_match(message.from()) || SUBJECT.is_match(message.subject())
    }

    fn scan(&self, message: &InboundMessage) -> ScanOutcome {
        if !message.has_header("x-aol-ip") {
            return ScanOutcome::NotThisFormat;
        }

        let markers = Markers {
            begin: &BEGIN,
            rfc822: &RFC822,
        };
        Section::walk(message.body(), &markers, |section, line| {
            if let Line::Field(e) = line {
                section.rfc3464_field(e);
            }
        })
        .finish(self.agent())
    }
}
