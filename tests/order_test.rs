use bounce_extract::*;
use regex::Regex;

const STANDARD_AGENTS: [&str; 9] = [
    "MTA::Sendmail",
    "MTA::Postfix",
    "MTA::Qmail",
    "MTA::Exim",
    "MTA::Exchange2007",
    "MTA::X1",
    "US::Aol",
    "US::Google",
    "US::Yahoo",
];

fn registry() -> Registry {
    Registry::standard().unwrap()
}

/// Extractor known only to the tests
struct Bespoke;

impl Extractor for Bespoke {
    fn agent(&self) -> &'static str {
        "Test::Bespoke"
    }

    fn description(&self) -> &'static str {
        "Bounces from an in-house relay"
    }

    fn header_list(&self) -> &'static [&'static str] {
        &["X-Bespoke-Bounce", "Return-Path"]
    }

    fn matches(&self, message: &InboundMessage) -> bool {
        message.has_header("x-bespoke-bounce")
    }

    fn scan(&self, message: &InboundMessage) -> ScanOutcome {
        let Some(recipient) = message.header("x-bespoke-bounce") else {
            return ScanOutcome::NotThisFormat;
        };
        ScanOutcome::Extracted(Extraction {
            records: vec![FieldRecord {
                recipient: recipient.to_string(),
                agent: self.agent().to_string(),
                diagnosis: "550 5.1.1 no such user".to_string(),
                ..Default::default()
            }],
            rfc822: Vec::new(),
        })
    }
}

// --- Registry ---

#[test]
fn test_standard_registration_order() {
    let registry = registry();
    let agents: Vec<&str> = registry.extractors().iter().map(|e| e.agent()).collect();

    assert_eq!(agents, STANDARD_AGENTS);
    assert_eq!(registry.len(), 9);
    assert!(!registry.is_empty());
}

#[test]
fn test_get_by_agent() {
    let registry = registry();

    assert_eq!(registry.get("US::Aol").unwrap().description(), "Aol Mail: http://www.aol.com");
    assert!(registry.get("US::Nope").is_none());
}

#[test]
fn test_disable_extractor() {
    let registry = Registry::builder()
        .standard_extractors()
        .disable("US::Aol")
        .build()
        .unwrap();

    assert_eq!(registry.len(), 8);
    assert!(registry.get("US::Aol").is_none());
    assert!(registry.declared_by("X-AOL-IP").is_empty());
}

#[test]
fn test_disable_unknown_agent() {
    let err = Registry::builder()
        .standard_extractors()
        .disable("MTA::Nope")
        .build()
        .unwrap_err();

    assert!(matches!(err, ParseError::UnknownAgent(ref agent) if agent == "MTA::Nope"));
}

#[test]
fn test_duplicate_agent() {
    let err = Registry::builder()
        .extractor(Box::new(Bespoke))
        .extractor(Box::new(Bespoke))
        .build()
        .unwrap_err();

    assert!(matches!(err, ParseError::DuplicateAgent(ref agent) if agent == "Test::Bespoke"));
}

#[test]
fn test_empty_registry() {
    let err = Registry::builder().build().unwrap_err();
    assert!(matches!(err, ParseError::EmptyRegistry));

    let err = Registry::builder()
        .extractor(Box::new(Bespoke))
        .disable("Test::Bespoke")
        .build()
        .unwrap_err();
    assert!(matches!(err, ParseError::EmptyRegistry));
}

// --- Header index ---

#[test]
fn test_declared_by_is_case_insensitive() {
    let registry = registry();

    assert_eq!(
        registry.declared_by("x-failed-recipients"),
        vec!["MTA::Exim", "US::Google"]
    );
    assert_eq!(registry.declared_by("X-AOL-IP"), vec!["US::Aol"]);
    assert_eq!(registry.declared_by("x-ymailisg"), vec!["US::Yahoo"]);
    assert!(registry.declared_by("subject").is_empty());
}

#[test]
fn test_index_headers_in_declaration_order() {
    let registry = registry();
    let headers: Vec<&str> = registry.index().headers().collect();

    assert_eq!(headers, vec!["x-failed-recipients", "x-aol-ip", "x-ymailisg"]);
    assert_eq!(registry.index().len(), 3);
}

#[test]
fn test_skipped_headers_are_never_indexed() {
    let registry = Registry::builder()
        .standard_extractors()
        .extractor(Box::new(Bespoke))
        .build()
        .unwrap();

    assert!(registry.declared_by("Return-Path").is_empty());
    assert_eq!(registry.declared_by("X-Bespoke-Bounce"), vec!["Test::Bespoke"]);
    assert!(DEFAULT_SKIPPED_HEADERS.contains(&"return-path"));
}

#[test]
fn test_skip_header_on_builder() {
    let registry = Registry::builder()
        .standard_extractors()
        .skip_header("X-AOL-IP")
        .build()
        .unwrap();

    assert!(registry.declared_by("x-aol-ip").is_empty());

    let message = InboundMessage::new()
        .with_header("Subject", "Undeliverable: hello")
        .with_header("X-AOL-IP", "192.0.2.1");
    assert_eq!(registry.candidate_order(&message)[0], "MTA::Postfix");
}

// --- Candidate order ---

#[test]
fn test_order_without_hints_follows_tiers() {
    let order = registry().candidate_order(&InboundMessage::new());

    assert_eq!(
        order,
        vec![
            "MTA::Exim",
            "MTA::Exchange2007",
            "MTA::Qmail",
            "MTA::Postfix",
            "MTA::Sendmail",
            "MTA::X1",
            "US::Google",
            "US::Aol",
            "US::Yahoo",
        ]
    );
}

#[test]
fn test_order_from_subject_keyword() {
    let message =
        InboundMessage::new().with_header("Subject", "Returned mail: see transcript for details");
    let order = registry().candidate_order(&message);

    assert_eq!(
        order,
        vec![
            "MTA::Postfix",
            "MTA::Sendmail",
            "MTA::X1",
            "MTA::Exim",
            "MTA::Exchange2007",
            "MTA::Qmail",
            "US::Google",
            "US::Aol",
            "US::Yahoo",
        ]
    );
}

#[test]
fn test_declared_header_comes_before_subject_match() {
    let message = InboundMessage::new()
        .with_header("Subject", "Undeliverable: hello")
        .with_header("X-AOL-IP", "192.0.2.1");
    let order = registry().candidate_order(&message);

    assert_eq!(
        order,
        vec![
            "US::Aol",
            "MTA::Postfix",
            "MTA::Exchange2007",
            "MTA::Exim",
            "MTA::Qmail",
            "MTA::Sendmail",
            "MTA::X1",
            "US::Google",
            "US::Yahoo",
        ]
    );
}

#[test]
fn test_shared_header_keeps_registration_order() {
    let message = InboundMessage::new()
        .with_header("Subject", "Delivery Status Notification (Failure)")
        .with_header("X-Failed-Recipients", "kijitora@example.jp");
    let order = registry().candidate_order(&message);

    assert_eq!(&order[..2], &["MTA::Exim", "US::Google"]);
}

#[test]
fn test_blank_header_value_is_not_a_hint() {
    let message = InboundMessage::new().with_header("X-AOL-IP", "  ");
    let order = registry().candidate_order(&message);

    assert_eq!(order[0], "MTA::Exim");
}

#[test]
fn test_order_covers_every_agent_once() {
    let messages = [
        InboundMessage::new(),
        InboundMessage::new()
            .with_header("Subject", "Warning: delivery notification failure, returned")
            .with_header("X-Failed-Recipients", "a@example.jp")
            .with_header("X-YMailISG", "abc")
            .with_header("X-AOL-IP", "192.0.2.1"),
    ];

    for message in &messages {
        let mut order = registry().candidate_order(message);
        assert_eq!(order.len(), STANDARD_AGENTS.len());
        order.sort_unstable();
        order.dedup();
        assert_eq!(order.len(), STANDARD_AGENTS.len());
    }
}

#[test]
fn test_unlisted_extractor_is_tried_last() {
    let registry = Registry::builder()
        .standard_extractors()
        .extractor(Box::new(Bespoke))
        .build()
        .unwrap();

    let order = registry.candidate_order(&InboundMessage::new());
    assert_eq!(order.last(), Some(&"Test::Bespoke"));

    let message = InboundMessage::new().with_header("X-Bespoke-Bounce", "a@example.jp");
    assert_eq!(registry.candidate_order(&message)[0], "Test::Bespoke");
}

#[test]
fn test_custom_order_tables() {
    let tables = OrderTables {
        subjects: vec![(
            Regex::new("(?i)nyaan").unwrap(),
            vec!["US::Yahoo".to_string(), "MTA::Gone".to_string()],
        )],
        tiers: vec![vec!["MTA::Qmail".to_string()]],
    };
    let registry = Registry::builder()
        .standard_extractors()
        .order_tables(tables)
        .build()
        .unwrap();

    let message = InboundMessage::new().with_header("Subject", "Nyaan");
    let order = registry.candidate_order(&message);

    assert_eq!(&order[..2], &["US::Yahoo", "MTA::Qmail"]);
    assert_eq!(order[2], "MTA::Sendmail");
    assert_eq!(order.len(), 9);
}

#[test]
fn test_custom_extractor_is_dispatched() {
    let registry = Registry::builder()
        .standard_extractors()
        .extractor(Box::new(Bespoke))
        .build()
        .unwrap();
    let message = InboundMessage::new().with_header("X-Bespoke-Bounce", "neko@example.jp");

    let classification = registry.classify(&message);
    let bounce = classification.bounce().unwrap();

    assert_eq!(bounce.agent, "Test::Bespoke");
    assert_eq!(bounce.records[0].recipient, "neko@example.jp");
    assert_eq!(bounce.records[0].status, "5.1.1");
    assert_eq!(bounce.records[0].spec, "SMTP");
}
