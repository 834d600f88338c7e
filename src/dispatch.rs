//! Dispatcher: first extractor that extracts a record wins

use crate::normalize::normalize;
use crate::registry::Registry;
use crate::types::{Bounce, Classification, InboundMessage, ScanOutcome};
use tracing::{debug, trace};

/// Classify `message` with the extractors of `registry`
///
/// Candidates are tried in planned order, each at most once. A message no
/// extractor understands is [`Classification::Unrecognized`], which is a
/// normal outcome and not an error.
#[must_use]
pub fn classify(registry: &Registry, message: &InboundMessage) -> Classification {
    let order = registry.plan(message);
    let mut tried = vec![false; registry.len()];

    for position in order {
        if std::mem::replace(&mut tried[position], true) {
            continue;
        }
        let extractor = &registry.extractors()[position];
        if !extractor.matches(message) {
            trace!("{} does not match", extractor.agent());
            continue;
        }

        match extractor.scan(message) {
            ScanOutcome::Extracted(mut extraction) => {
                for record in &mut extraction.records {
                    normalize(record, message, extractor.reason_overrides());
                }
                debug!(
                    "Recognized by {}: {} recipient(s)",
                    extractor.agent(),
                    extraction.records.len()
                );
                return Classification::Recognized(Bounce {
                    agent: extractor.agent().to_string(),
                    records: extraction.records,
                    rfc822: extraction.rfc822,
                });
            }
            ScanOutcome::NotThisFormat => trace!("{} declined", extractor.agent()),
            ScanOutcome::NothingExtracted => {
                trace!("{} found no recipient", extractor.agent());
            }
        }
    }

    debug!("Unrecognized message: {}", message.subject());
    Classification::Unrecognized
}
