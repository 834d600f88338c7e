//! Post-processing of extracted records

use crate::rfc5322;
use crate::rhost;
use crate::status;
use crate::types::{FieldRecord, InboundMessage, ReasonOverride};
use regex::Regex;
use std::sync::LazyLock;

static BOUNDARY_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" [-]{2,}[^ ].+$").unwrap());

static SMTP_COMMAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(HELO|EHLO|MAIL|RCPT|DATA|QUIT)\b").unwrap());

/// Collapse whitespace and cut a trailing MIME boundary fragment
#[must_use]
pub fn sweep(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    BOUNDARY_TAIL.replace(&collapsed, "").into_owned()
}

/// Fill defaults and derived fields of a record produced by an extractor
pub fn normalize(record: &mut FieldRecord, message: &InboundMessage, overrides: &[ReasonOverride]) {
    let received = message.received();
    if record.lhost.is_empty()
        && let Some(first) = received.first()
    {
        record.lhost = rfc5322::received(first).from.unwrap_or_default();
    }
    if record.rhost.is_empty()
        && let Some(last) = received.last()
    {
        record.rhost = rfc5322::received(last).by.unwrap_or_default();
    }

    record.diagnosis = sweep(&record.diagnosis.replace("\\n", " "));

    if let Some(rule) = overrides
        .iter()
        .find(|rule| rule.pattern.is_match(&record.diagnosis))
    {
        record.reason = rule.reason.to_string();
    }

    if status::is_placeholder(&record.status)
        && let Some(found) = status::find(&record.diagnosis)
    {
        record.status = found;
    }

    if record.reason.is_empty()
        && let Some(reason) = rhost::reason(&record.rhost, &record.status)
    {
        record.reason = reason.to_string();
    }

    if record.command.is_empty()
        && let Some(cv) = SMTP_COMMAND.captures(&record.diagnosis)
    {
        record.command = cv[1].to_string();
    }

    if record.spec.is_empty() {
        record.spec = "SMTP".to_string();
    }
}
