use bounce_extract::rfc5322::{self, ReceivedHosts};
use bounce_extract::{FieldRecord, InboundMessage, ReasonOverride, normalize, rhost, status, sweep};

// --- sweep ---

#[test]
fn test_sweep_collapses_whitespace() {
    assert_eq!(sweep("  550   5.1.1\tUser\n unknown  "), "550 5.1.1 User unknown");
}

#[test]
fn test_sweep_cuts_boundary_tail() {
    assert_eq!(
        sweep("550 5.1.1 User unknown --9B095B5ADSN=_01D0B1F1A3F9DCA0"),
        "550 5.1.1 User unknown"
    );
    assert_eq!(sweep("550 user - unknown"), "550 user - unknown");
}

// --- status ---

#[test]
fn test_status_placeholder() {
    assert!(status::is_placeholder(""));
    assert!(status::is_placeholder("5.0.0"));
    assert!(status::is_placeholder("4.0.0"));
    assert!(!status::is_placeholder("5.1.1"));
    assert!(!status::is_placeholder("5.0.1"));
}

#[test]
fn test_status_find_embedded_code() {
    assert_eq!(
        status::find("550 5.2.2 Mailbox Full").as_deref(),
        Some("5.2.2")
    );
    assert_eq!(
        status::find("421 4.4.7 Delivery time expired.").as_deref(),
        Some("4.4.7")
    );
    assert_eq!(
        status::find("message rejected (5.7.1.)").as_deref(),
        Some("5.7.1")
    );
}

#[test]
fn test_status_find_skips_ip_addresses() {
    assert_eq!(
        status::find("Connection refused by 192.0.2.25 user unknown").as_deref(),
        Some("5.1.1")
    );
    assert_eq!(status::find("Connected to 10.2.3.4"), None);
}

#[test]
fn test_status_find_from_phrase() {
    assert_eq!(status::find("Mailbox is full").as_deref(), Some("5.2.2"));
    assert_eq!(
        status::find("Sorry, I couldn't find any host named example.jp").as_deref(),
        Some("5.1.2")
    );
    assert_eq!(status::find("Relaying denied").as_deref(), Some("5.7.1"));
    assert_eq!(status::find("Something odd happened"), None);
}

// --- rhost ---

#[test]
fn test_rhost_matches() {
    assert!(rhost::matches("neko.mail.protection.outlook.com"));
    assert!(rhost::matches("ASPMX.L.GOOGLE.COM"));
    assert!(rhost::matches("alt1.aspmx.l.google.com"));
    assert!(!rhost::matches("notaspmx.l.google.com"));
    assert!(!rhost::matches("mx.example.jp"));
}

#[test]
fn test_rhost_reason() {
    assert_eq!(
        rhost::reason("neko.mail.protection.outlook.com", "5.7.606"),
        Some("securityerror")
    );
    assert_eq!(rhost::reason("aspmx.l.google.com", "5.2.1"), Some("suspend"));
    assert_eq!(rhost::reason("aspmx.l.google.com", "5.9.9"), None);
    assert_eq!(rhost::reason("mx.example.jp", "5.1.1"), None);
    assert_eq!(rhost::reason("", "5.1.1"), None);
}

// --- rfc5322 ---

#[test]
fn test_received_named_hosts() {
    let hosts = rfc5322::received(
        "from mx.example.org (mx.example.org [192.0.2.10]) by MTA.example.jp. (Postfix) with ESMTP",
    );
    assert_eq!(
        hosts,
        ReceivedHosts {
            from: Some("mx.example.org".to_string()),
            by: Some("mta.example.jp".to_string()),
        }
    );
}

#[test]
fn test_received_prefers_comment_host_for_ip() {
    let hosts = rfc5322::received("from [192.0.2.1] (relay.example.org [192.0.2.1]) by mx");
    assert_eq!(hosts.from.as_deref(), Some("relay.example.org"));

    let hosts = rfc5322::received("from localhost (relay.example.org) by mx.example.jp");
    assert_eq!(hosts.from.as_deref(), Some("relay.example.org"));

    let hosts = rfc5322::received("from 192.0.2.1 by mx.example.jp");
    assert_eq!(hosts.from.as_deref(), Some("192.0.2.1"));
}

#[test]
fn test_received_without_clauses() {
    assert_eq!(rfc5322::received("(qmail 1234 invoked by uid 0)").from, None);
    assert_eq!(rfc5322::received(""), ReceivedHosts::default());
}

#[test]
fn test_weedout_keeps_known_headers_and_folds() {
    let lines: Vec<String> = [
        "Received: from mx.example.org",
        "\tby mx.example.jp",
        "X-Spam-Score: 0.1",
        "\tfolded spam detail",
        "From: shironeko@example.org",
        "Subject: Nyaan",
        "Nyaan nyaan",
    ]
    .iter()
    .map(|l| (*l).to_string())
    .collect();

    assert_eq!(
        rfc5322::weedout(&lines),
        vec![
            "Received: from mx.example.org",
            "\tby mx.example.jp",
            "From: shironeko@example.org",
            "Subject: Nyaan",
        ]
    );
}

// --- normalize ---

#[test]
fn test_normalize_fills_defaults() {
    let message = InboundMessage::new()
        .with_header("Received", "from relay.example.org (relay.example.org [192.0.2.2]) by a.example.jp")
        .with_header("Received", "from a.example.jp by B.example.jp with ESMTP");
    let mut record = FieldRecord {
        recipient: "kijitora@example.jp".to_string(),
        diagnosis: "  host said:\\n 550   user unknown (in reply to RCPT TO command) ".to_string(),
        ..Default::default()
    };

    normalize(&mut record, &message, &[]);

    assert_eq!(record.lhost, "relay.example.org");
    assert_eq!(record.rhost, "b.example.jp");
    assert_eq!(
        record.diagnosis,
        "host said: 550 user unknown (in reply to RCPT TO command)"
    );
    assert_eq!(record.status, "5.1.1");
    assert_eq!(record.command, "RCPT");
    assert_eq!(record.spec, "SMTP");
    assert!(record.reason.is_empty());
}

#[test]
fn test_normalize_keeps_extracted_values() {
    let message = InboundMessage::new().with_header("Received", "from a.example.jp by b.example.jp");
    let mut record = FieldRecord {
        recipient: "kijitora@example.jp".to_string(),
        status: "5.2.2".to_string(),
        lhost: "mx.example.jp".to_string(),
        rhost: "mx.example.org".to_string(),
        spec: "X-UNIX".to_string(),
        command: "DATA".to_string(),
        diagnosis: "550 5.1.1 user unknown".to_string(),
        ..Default::default()
    };

    normalize(&mut record, &message, &[]);

    assert_eq!(record.status, "5.2.2");
    assert_eq!(record.lhost, "mx.example.jp");
    assert_eq!(record.rhost, "mx.example.org");
    assert_eq!(record.spec, "X-UNIX");
    assert_eq!(record.command, "DATA");
}

#[test]
fn test_normalize_first_override_wins() {
    let overrides = [
        ReasonOverride::new("mailboxfull", r"(?i)quota"),
        ReasonOverride::new("suspend", r"(?i)disabled"),
    ];
    let mut record = FieldRecord {
        recipient: "kijitora@example.jp".to_string(),
        rhost: "aspmx.l.google.com".to_string(),
        status: "5.2.1".to_string(),
        diagnosis: "Quota exceeded, account disabled".to_string(),
        ..Default::default()
    };

    normalize(&mut record, &InboundMessage::new(), &overrides);

    assert_eq!(record.reason, "mailboxfull");
}

#[test]
fn test_normalize_remote_host_reason() {
    let mut record = FieldRecord {
        recipient: "kijitora@example.jp".to_string(),
        rhost: "aspmx.l.google.com".to_string(),
        status: "5.2.1".to_string(),
        diagnosis: "The email account that you tried to reach is disabled".to_string(),
        ..Default::default()
    };

    normalize(&mut record, &InboundMessage::new(), &[]);

    assert_eq!(record.reason, "suspend");
}

#[test]
fn test_status_find_skips_placeholder_code() {
    assert_eq!(
        status::find("550 5.0.0 <kijitora@example.jp>... User unknown").as_deref(),
        Some("5.1.1")
    );
    assert_eq!(
        status::find("550 5.0.0 see 5.2.2 Mailbox full").as_deref(),
        Some("5.2.2")
    );
    assert_eq!(status::find("550 5.0.0 Something odd happened"), None);
}

#[test]
fn test_normalize_replaces_placeholder_repeated_in_text() {
    let mut record = FieldRecord {
        recipient: "kijitora@example.jp".to_string(),
        status: "5.0.0".to_string(),
        diagnosis: "550 5.0.0 <kijitora@example.jp>... User unknown".to_string(),
        ..Default::default()
    };

    normalize(&mut record, &InboundMessage::new(), &[]);

    assert_eq!(record.status, "5.1.1");
}
