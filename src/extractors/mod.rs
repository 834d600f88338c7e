//! Format specific bounce extractors
//!
//! Each extractor knows one mail system's bounce layout. They all share the
//! [`Section`](crate::section::Section) walker and differ only in marker
//! lines, header gates and the handling of delivery status lines.

mod aol;
mod exchange2007;
mod exim;
mod google;
mod postfix;
mod qmail;
mod sendmail;
mod x1;
mod yahoo;

pub use aol::Aol;
pub use exchange2007::Exchange2007;
pub use exim::Exim;
pub use google::Google;
pub use postfix::Postfix;
pub use qmail::Qmail;
pub use sendmail::Sendmail;
pub use x1::X1;
pub use yahoo::Yahoo;

use crate::types::{InboundMessage, ReasonOverride, ScanOutcome};

/// Contract every bounce format implements
///
/// Extractors are stateless; all per-message state lives inside `scan`.
pub trait Extractor: Send + Sync {
    /// Stable identifier stamped on every record, e.g. `"US::Aol"`
    fn agent(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Headers whose presence points at this format
    fn header_list(&self) -> &'static [&'static str] {
        &[]
    }

    /// Ordered diagnosis patterns that decide the failure reason
    fn reason_overrides(&self) -> &[ReasonOverride] {
        &[]
    }

    /// Cheap gate checked before `scan`
    fn matches(&self, message: &InboundMessage) -> bool;

    fn scan(&self, message: &InboundMessage) -> ScanOutcome;
}

/// Every built-in extractor in registration order
#[must_use]
pub fn standard() -> Vec<Box<dyn Extractor>> {
    vec![
        Box::new(Sendmail),
        Box::new(Postfix),
        Box::new(Qmail),
        Box::new(Exim),
        Box::new(Exchange2007),
        Box::new(X1),
        Box::new(Aol),
        Box::new(Google),
        Box::new(Yahoo),
    ]
}
