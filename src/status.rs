//! Status code inference from diagnostic text

use regex::Regex;
use std::sync::LazyLock;

static ENHANCED_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([245][.]\d{1,2}[.]\d{1,3})\b").unwrap());

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d[.]0[.]0$").unwrap());

/// Known error phrases and the status they imply, checked in order
static PHRASES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        (
            "5.1.1",
            r"(?i)user unknown|unknown user|no such user|recipient not found|mailbox not found|no mailbox here|recipnotfound|does not exist",
        ),
        (
            "5.2.2",
            r"(?i)mailbox (?:is )?full|quota exceeded|over ?quota|insufficient disk space",
        ),
        (
            "5.1.2",
            r"(?i)host unknown|host or domain name not found|no such domain|couldn't find any host|unrouteable address",
        ),
        (
            "5.3.4",
            r"(?i)message (?:is )?too (?:big|large)|message size exceeds|exceeds size limit",
        ),
        ("5.2.1", r"(?i)mailbox (?:disabled|inactive)|account (?:disabled|suspended)"),
        (
            "5.7.1",
            r"(?i)relay(?:ing)? (?:denied|not permitted)|access denied|rejected for policy reasons",
        ),
        ("4.4.7", r"(?i)retry timeout exceeded|message expired|delivery time expired"),
    ]
    .into_iter()
    .map(|(status, pattern)| (status, Regex::new(pattern).unwrap()))
    .collect()
});

/// Whether `status` is missing or only a class placeholder such as "5.0.0"
#[must_use]
pub fn is_placeholder(status: &str) -> bool {
    status.is_empty() || PLACEHOLDER.is_match(status)
}

/// Find a status code for a diagnosis
///
/// An enhanced status code written in the text wins; otherwise the first
/// known error phrase decides. Dotted runs that belong to an IP address and
/// class placeholders such as "5.0.0" are not taken as codes.
#[must_use]
pub fn find(diagnosis: &str) -> Option<String> {
    for m in ENHANCED_CODE.find_iter(diagnosis) {
        let before = diagnosis[..m.start()].chars().next_back();
        let mut after = diagnosis[m.end()..].chars();
        let in_address = before.is_some_and(|c| c == '.' || c.is_ascii_digit())
            || (after.next() == Some('.') && after.next().is_some_and(|c| c.is_ascii_digit()));
        if !in_address && !is_placeholder(m.as_str()) {
            return Some(m.as_str().to_string());
        }
    }

    PHRASES
        .iter()
        .find(|(_, pattern)| pattern.is_match(diagnosis))
        .map(|(status, _)| (*status).to_string())
}
