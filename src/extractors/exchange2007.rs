//! Microsoft Exchange Server 2007

use super::Extractor;
use crate::section::{Line, Markers, Section};
use crate::types::{InboundMessage, ReasonOverride, ScanOutcome};
use regex::Regex;
use std::sync::LazyLock;

static SUBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:Undeliverable|Non_remis_|Non remis|Non recapitabile|Unzustellbar):").unwrap()
});

static BEGIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Diagnostic information for administrators:$").unwrap());

static RFC822: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Original message headers:$").unwrap());

static GENERATING_SERVER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Generating server: ([^ ]+)$").unwrap());

static RECIPIENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<?([^ <>]+@[^ <>]+?)>?$").unwrap());

// #550 5.1.1 RESOLVER.ADR.RecipNotFound; not found ##
static ERROR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#([45]\d{2}[ ]+(\d[.]\d+[.]\d+)[ ]+.+?)(?:[ ]*##.*)?$").unwrap());

// Remote Server returned '550 5.1.1 RESOLVER.ADR.RecipNotFound; not found'
static REMOTE_SERVER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Remote Server returned '(.+)'$").unwrap());

static OVERRIDES: LazyLock<Vec<ReasonOverride>> = LazyLock::new(|| {
    vec![
        ReasonOverride::new("userunknown", r"RESOLVER[.]ADR[.](?:Ex)?RecipNotFound"),
        ReasonOverride::new("mailboxfull", r"STOREDRV[.]Deliver[.]Exception:QuotaExceeded"),
        ReasonOverride::new("hostunknown", r"DNS domain .+ does not exist"),
        ReasonOverride::new("expired", r"QUEUE[.]Expired"),
    ]
});

/// Bounces generated by Microsoft Exchange Server 2007 and later
///
/// ```text
/// Diagnostic information for administrators:
///
/// Generating server: mta2.example.jp
///
/// kijitora@example.jp
/// #550 5.1.1 RESOLVER.ADR.RecipNotFound; not found ##
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Exchange2007;

impl Extractor for Exchange2007 {
    fn agent(&self) -> &'static str {
        "MTA::Exchange2007"
    }

    fn description(&self) -> &'static str {
        "Microsoft Exchange Server 2007"
    }

    fn reason_overrides(&self) -> &[ReasonOverride] {
        &OVERRIDES
    }

    fn matches(&self, message: &InboundMessage) -> bool {
        SUBJECT.is_match(message.subject())
    }

    fn scan(&self, message: &InboundMessage) -> ScanOutcome {
        if !SUBJECT.is_match(message.subject()) {
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
            if let Some(cv) = GENERATING_SERVER.captures(e) {
                section.set_lhost(&cv[1]);
            } else if let Some(cv) = RECIPIENT.captures(e) {
                section.add_recipient(&cv[1]);
            } else if section.has_current_recipient()
                && let Some(cv) = ERROR.captures(e)
            {
                let record = section.current();
                record.diagnosis = cv[1].to_string();
                record.status = cv[2].to_string();
            } else if section.has_current_recipient()
                && let Some(cv) = REMOTE_SERVER.captures(e)
            {
                section.current().diagnosis = cv[1].to_string();
            }
        })
        .finish(self.agent())
    }
}
