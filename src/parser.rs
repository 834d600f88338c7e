//! Raw message reader

use crate::error::{ParseError, Result};
use crate::types::InboundMessage;
use tracing::debug;

/// Parse raw message bytes into an [`InboundMessage`]
///
/// Only the top-level header block is decoded. The body is kept as plain
/// lines, whatever MIME structure it has.
pub fn parse_message(raw: &[u8]) -> Result<InboundMessage> {
    let (headers, offset) =
        mailparse::parse_headers(raw).map_err(|e| ParseError::Structure(e.to_string()))?;

    let mut message = InboundMessage::new();
    for header in &headers {
        message.add_header(&header.get_key(), header.get_value());
    }

    let body = raw.get(offset..).unwrap_or_default();
    message.set_body(parse_body(&String::from_utf8_lossy(body)));

    debug!(
        "Parsed message: {} ({} received, {} body lines)",
        message.subject(),
        message.received().len(),
        message.body().len()
    );

    Ok(message)
}

fn parse_body(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}
