//! Failure reasons decided by the remote host that rejected a message
//!
//! Some large providers answer with status codes whose meaning is specific
//! to them. When such a host shows up as `rhost`, its own table decides the
//! reason.

use regex::Regex;
use std::sync::LazyLock;

struct RemoteHost {
    pattern: Regex,
    reasons: &'static [(&'static str, &'static str)],
}

static REMOTE_HOSTS: LazyLock<Vec<RemoteHost>> = LazyLock::new(|| {
    vec![
        RemoteHost {
            // Exchange Online Protection
            pattern: Regex::new(r"(?i)[.]protection[.]outlook[.]com$").unwrap(),
            reasons: &[
                ("5.1.1", "userunknown"),
                ("5.1.10", "userunknown"),
                ("5.2.2", "mailboxfull"),
                ("5.4.1", "rejected"),
                ("5.7.1", "rejected"),
                ("5.7.606", "securityerror"),
                ("5.7.607", "securityerror"),
                ("5.7.608", "securityerror"),
            ],
        },
        RemoteHost {
            // Google Apps
            pattern: Regex::new(r"(?i)(?:^|[.])aspmx[.]l[.]google[.]com$").unwrap(),
            reasons: &[
                ("5.1.1", "userunknown"),
                ("5.2.1", "suspend"),
                ("5.2.2", "mailboxfull"),
                ("5.7.1", "blocked"),
            ],
        },
    ]
});

/// Whether `rhost` has a host specific reason table
#[must_use]
pub fn matches(rhost: &str) -> bool {
    REMOTE_HOSTS.iter().any(|h| h.pattern.is_match(rhost))
}

/// Reason for `status` according to the table of `rhost`
#[must_use]
pub fn reason(rhost: &str, status: &str) -> Option<&'static str> {
    if rhost.is_empty() || status.is_empty() {
        return None;
    }
    REMOTE_HOSTS
        .iter()
        .find(|h| h.pattern.is_match(rhost))?
        .reasons
        .iter()
        .find(|(code, _)| *code == status)
        .map(|(_, reason)| *reason)
}
