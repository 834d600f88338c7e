//! Header signature index

use crate::extractors::Extractor;
use crate::types::InboundMessage;

/// Headers never indexed: every bounce may carry them
pub const DEFAULT_SKIPPED_HEADERS: &[&str] = &["return-path", "x-mailer"];

/// Maps a header name to the extractors that declared it
///
/// Entries keep declaration order: headers in the order they were first
/// declared, extractors in registration order within a header.
#[derive(Debug, Clone, Default)]
pub struct HeaderIndex {
    entries: Vec<(String, Vec<usize>)>,
}

impl HeaderIndex {
    pub(crate) fn build(extractors: &[Box<dyn Extractor>], skipped: &[String]) -> Self {
        let mut index = Self::default();

        for (position, extractor) in extractors.iter().enumerate() {
            for header in extractor.header_list() {
                let name = header.to_lowercase();
                if skipped.contains(&name) {
                    continue;
                }
                match index.entries.iter_mut().find(|(h, _)| *h == name) {
                    Some((_, owners)) => {
                        if !owners.contains(&position) {
                            owners.push(position);
                        }
                    }
                    None => index.entries.push((name, vec![position])),
                }
            }
        }

        index
    }

    /// Positions of the extractors that declared `header`
    #[must_use]
    pub fn lookup(&self, header: &str) -> &[usize] {
        let name = header.to_lowercase();
        self.entries
            .iter()
            .find(|(h, _)| *h == name)
            .map_or(&[], |(_, owners)| owners.as_slice())
    }

    /// Indexed header names in declaration order
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(h, _)| h.as_str())
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Extractors whose declared headers are present on `message`
    pub(crate) fn present_on<'a>(
        &'a self,
        message: &'a InboundMessage,
    ) -> impl Iterator<Item = usize> + 'a {
        self.entries
            .iter()
            .filter(|(header, _)| message.has_header(header))
            .flat_map(|(_, owners)| owners.iter().copied())
    }
}
