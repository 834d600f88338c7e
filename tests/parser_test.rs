use bounce_extract::{Registry, parse_message};

#[test]
fn test_parse_headers_and_body() {
    let raw = b"Received: from mx.example.org by mx.example.jp\r\n\
                Received: from mx.example.jp by omr.example.jp\r\n\
                From: Postmaster <Postmaster@AOL.com>\r\n\
                Subject: Undeliverable: hello\r\n\
                X-AOL-IP: 192.0.2.1\r\n\
                \r\n\
                first line\r\n\
                \r\n\
                third line\r\n";

    let message = parse_message(raw).unwrap();

    assert_eq!(message.from(), "Postmaster <Postmaster@AOL.com>");
    assert_eq!(message.subject(), "Undeliverable: hello");
    assert_eq!(message.header("x-aol-ip"), Some("192.0.2.1"));
    assert_eq!(
        message.received(),
        [
            "from mx.example.org by mx.example.jp",
            "from mx.example.jp by omr.example.jp"
        ]
    );
    assert_eq!(message.body(), ["first line", "", "third line"]);
}

#[test]
fn test_parse_without_body() {
    let raw = b"From: alice@example.com\r\nSubject: hello\r\n\r\n";

    let message = parse_message(raw).unwrap();

    assert_eq!(message.subject(), "hello");
    assert!(message.body().is_empty());
}

#[test]
fn test_parse_invalid_utf8_body() {
    let raw = b"Subject: hello\r\n\r\nbroken \xff byte\r\n";

    let message = parse_message(raw).unwrap();

    assert_eq!(message.body().len(), 1);
    assert!(message.body()[0].starts_with("broken "));
}

#[test]
fn test_parse_and_classify() {
    let raw = b"From: Postmaster <Postmaster@AOL.com>\r\n\
                Subject: Undeliverable: hello\r\n\
                X-AOL-IP: 192.0.2.1\r\n\
                \r\n\
                Content-Type: message/delivery-status\r\n\
                \r\n\
                Reporting-MTA: dns; omr-m5.mx.aol.com\r\n\
                Final-Recipient: RFC822; user@example.jp\r\n\
                Action: failed\r\n\
                Status: 5.2.2\r\n\
                Diagnostic-Code: smtp; 550 5.2.2 Mailbox Full\r\n";

    let message = parse_message(raw).unwrap();
    let classification = Registry::standard().unwrap().classify(&message);
    let bounce = classification.bounce().unwrap();

    assert_eq!(bounce.agent, "US::Aol");
    assert_eq!(bounce.records[0].recipient, "user@example.jp");
    assert_eq!(bounce.records[0].lhost, "omr-m5.mx.aol.com");
    assert_eq!(bounce.records[0].status, "5.2.2");
}
