// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]
#![allow(clippy::significant_drop_tightening)]

//! Bounce Mail Extractor
//!
//! Recognizes bounce messages produced by many different mail systems and
//! extracts one structured record per failed recipient.
//!
//! # Features
//!
//! - One extractor per bounce format, sharing a single line walker
//! - Candidate ordering from format specific headers, subject keywords and
//!   priority tiers
//! - Status code inference and failure reasons from diagnostic text
//! - Read-only registry, safe to share between threads
//!
//! # Example
//!
//! ```rust
//! use bounce_extract::{InboundMessage, Registry};
//!
//! let registry = Registry::standard().unwrap();
//! let message = InboundMessage::new()
//!     .with_header("From", "Postmaster <Postmaster@AOL.com>")
//!     .with_header("Subject", "Undeliverable: hello")
//!     .with_header("X-AOL-IP", "192.0.2.1")
//!     .with_body(
//!         "Content-Type: message/delivery-status\n\
//!          \n\
//!          Final-Recipient: RFC822; user@example.jp\n\
//!          Action: failed\n\
//!          Status: 5.2.2\n\
//!          Diagnostic-Code: smtp; 550 5.2.2 Mailbox Full\n",
//!     );
//!
//! let classification = registry.classify(&message);
//! let bounce = classification.bounce().unwrap();
//! println!("{}: {}", bounce.agent, bounce.records[0].recipient);
//! ```

mod dispatch;
mod error;
pub mod extractors;
mod index;
mod normalize;
mod order;
mod parser;
mod registry;
pub mod rfc5322;
pub mod rhost;
pub mod section;
pub mod status;
mod types;

pub use dispatch::classify;
pub use error::{ParseError, Result};
pub use extractors::Extractor;
pub use index::{DEFAULT_SKIPPED_HEADERS, HeaderIndex};
pub use normalize::{normalize, sweep};
pub use order::OrderTables;
pub use parser::parse_message;
pub use registry::{Registry, RegistryBuilder};
pub use types::*;
