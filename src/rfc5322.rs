//! Helpers for RFC 5322 header text found in bounces

use regex::Regex;
use std::sync::LazyLock;

static FROM_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bfrom[ \t]+(\[?[^ \t()\[\];]+\]?)(?:[ \t]+\(([^)]*)\))?").unwrap()
});

static BY_CLAUSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bby[ \t]+([^ \t()\[\];]+)").unwrap());

static IPV4: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[?\d{1,3}[.]\d{1,3}[.]\d{1,3}[.]\d{1,3}\]?$").unwrap());

static HEADER_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9][A-Za-z0-9-]*):").unwrap());

/// Headers of the original message worth keeping
const KEPT_HEADERS: &[&str] = &[
    "return-path",
    "received",
    "from",
    "sender",
    "reply-to",
    "to",
    "cc",
    "date",
    "subject",
    "message-id",
    "in-reply-to",
    "references",
    "content-type",
    "x-mailer",
    "list-id",
];

/// Hosts named by one `Received` header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceivedHosts {
    /// Host the message came from
    pub from: Option<String>,

    /// Host that received it
    pub by: Option<String>,
}

/// Pull the `from` and `by` hosts out of a `Received` header value
///
/// When the `from` clause names a bare IP address or an unqualified name, the
/// host from the parenthesized comment is preferred if it has a domain.
#[must_use]
pub fn received(value: &str) -> ReceivedHosts {
    let from = FROM_CLAUSE.captures(value).map(|cv| {
        let token = cv[1].trim_matches(['[', ']']);
        let comment_host = cv
            .get(2)
            .and_then(|m| m.as_str().split_whitespace().next())
            .filter(|h| h.contains('.') && !IPV4.is_match(h));

        match comment_host {
            Some(host) if IPV4.is_match(token) || !token.contains('.') => host.to_lowercase(),
            _ => token.to_lowercase(),
        }
    });

    let by = BY_CLAUSE
        .captures(value)
        .map(|cv| cv[1].trim_end_matches('.').to_lowercase());

    ReceivedHosts { from, by }
}

/// Keep the well-known header lines of an original message
///
/// Folded continuation lines follow the header they belong to; everything
/// else, including body text, is dropped.
#[must_use]
pub fn weedout(lines: &[String]) -> Vec<String> {
    let mut kept = Vec::new();
    let mut keeping = false;

    for line in lines {
        if line.starts_with([' ', '\t']) {
            if keeping {
                kept.push(line.clone());
            }
            continue;
        }

        keeping = HEADER_NAME
            .captures(line)
            .is_some_and(|cv| KEPT_HEADERS.contains(&cv[1].to_lowercase().as_str()));
        if keeping {
            kept.push(line.clone());
        }
    }

    kept
}
