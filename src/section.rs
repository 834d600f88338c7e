//! Line walker shared by every extractor
//!
//! A bounce body is walked once, top to bottom. The walker tracks which
//! block the current line belongs to, keeps the quoted original message and
//! hands every line of the delivery status block to the format's handler.
//! Formats only supply their marker regexes and a handler; recipient
//! splitting, continuation folding and connection fields live here.

use crate::rfc5322;
use crate::types::{END_OF_EMAIL, Extraction, FieldRecord, ScanOutcome};
use regex::Regex;
use std::sync::LazyLock;

static FINAL_RECIPIENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^final-recipient:[ ]*rfc822;[ ]*<?([^ <>]+)>?[ ]*$").unwrap()
});

static ACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^action:[ ]*(.+)$").unwrap());

static STATUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^status:[ ]*(\d[.]\d+[.]\d+)").unwrap());

static REMOTE_MTA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^remote-mta:[ ]*dns;[ ]*(.+)$").unwrap());

static DIAGNOSTIC_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^diagnostic-code:[ ]*(.+?);[ ]*(.+)$").unwrap());

static DIAGNOSTIC_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^diagnostic-code:[ ]*").unwrap());

static CONTINUATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[ \t]+(.+)$").unwrap());

static LAST_ATTEMPT_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^last-attempt-date:[ ]*(.+)$").unwrap());

static REPORTING_MTA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^reporting-mta:[ ]*dns;[ ]*(.+)$").unwrap());

static ARRIVAL_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^arrival-date:[ ]*(.+)$").unwrap());

/// Which blocks of the body the walk has entered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor(u8);

impl Cursor {
    pub const DELIVERY_STATUS: u8 = 1 << 0;
    pub const MESSAGE_RFC822: u8 = 1 << 1;

    /// Nothing has been entered yet
    #[must_use]
    pub const fn is_before(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn has(self, block: u8) -> bool {
        self.0 & block != 0
    }

    pub const fn enter(&mut self, block: u8) {
        self.0 |= block;
    }
}

/// Marker lines that open the two blocks of a format
#[derive(Debug, Clone, Copy)]
pub struct Markers<'a> {
    /// First line of the delivery status block
    pub begin: &'a Regex,

    /// First line of the quoted original message
    pub rfc822: &'a Regex,
}

/// A line offered to the format handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// Non-empty line before the delivery status block
    Preamble(&'a str),

    /// The line that matched the begin marker
    Begin(&'a str),

    /// Non-empty line inside the delivery status block
    Field(&'a str),
}

/// Values shared by every recipient of one bounce
#[derive(Debug, Clone, Default)]
struct Connection {
    lhost: String,
    date: String,
}

/// Per-scan accumulator
///
/// Created by [`Section::walk`] and consumed by [`Section::finish`]; it never
/// outlives a single scan.
#[derive(Debug, Default)]
pub struct Section {
    cursor: Cursor,
    blank_lines: usize,
    previous: String,
    lookback: String,
    records: Vec<FieldRecord>,
    rfc822: Vec<String>,
    recipients: usize,
    connection: Connection,
}

impl Section {
    /// Walk `lines`, calling `handle` for every line the format may read
    pub fn walk<F>(lines: &[String], markers: &Markers<'_>, mut handle: F) -> Self
    where
        F: FnMut(&mut Self, Line<'_>),
    {
        let mut section = Self::default();

        for line in lines {
            let line = line.as_str();
            if line == END_OF_EMAIL {
                break;
            }
            section.previous = std::mem::replace(&mut section.lookback, line.to_string());

            if section.cursor.is_before() && markers.begin.is_match(line) {
                section.cursor.enter(Cursor::DELIVERY_STATUS);
                handle(&mut section, Line::Begin(line));
                continue;
            }

            if !section.cursor.has(Cursor::MESSAGE_RFC822) && markers.rfc822.is_match(line) {
                section.cursor.enter(Cursor::MESSAGE_RFC822);
                continue;
            }

            if section.cursor.has(Cursor::MESSAGE_RFC822) {
                if line.is_empty() {
                    section.blank_lines += 1;
                    if section.blank_lines > 1 {
                        break;
                    }
                    continue;
                }
                section.rfc822.push(line.to_string());
            } else if line.is_empty() {
                continue;
            } else if section.cursor.has(Cursor::DELIVERY_STATUS) {
                handle(&mut section, Line::Field(line));
            } else {
                handle(&mut section, Line::Preamble(line));
            }
        }

        section
    }

    #[must_use]
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// The raw line before the current one, as left by any fold
    #[must_use]
    pub fn previous_line(&self) -> &str {
        &self.previous
    }

    /// Record being filled
    pub fn current(&mut self) -> &mut FieldRecord {
        if self.records.is_empty() {
            self.records.push(FieldRecord::default());
        }
        let last = self.records.len() - 1;
        &mut self.records[last]
    }

    /// Whether the record being filled already has a recipient
    #[must_use]
    pub fn has_current_recipient(&self) -> bool {
        self.records.last().is_some_and(FieldRecord::has_recipient)
    }

    /// Set the recipient, starting a new record if the current one has one
    pub fn add_recipient(&mut self, address: &str) -> &mut FieldRecord {
        if self.has_current_recipient() {
            self.records.push(FieldRecord::default());
        }
        self.recipients += 1;
        let record = self.current();
        record.recipient = address.to_string();
        record
    }

    #[must_use]
    pub const fn recipients(&self) -> usize {
        self.recipients
    }

    pub fn records_mut(&mut self) -> impl Iterator<Item = &mut FieldRecord> {
        self.records.iter_mut()
    }

    /// Append `text` to the current diagnosis with a single space
    pub fn append_diagnosis(&mut self, text: &str) {
        let record = self.current();
        if !record.diagnosis.is_empty() {
            record.diagnosis.push(' ');
        }
        record.diagnosis.push_str(text);
    }

    /// Fold a continuation line onto the diagnosis and rewrite the lookback
    /// so that a further continuation folds as well
    pub fn fold_diagnosis(&mut self, line: &str, text: &str) {
        self.append_diagnosis(text);
        self.lookback = format!("Diagnostic-Code: {line}");
    }

    /// Reporting host for every record; the first value wins
    pub fn set_lhost(&mut self, host: &str) {
        if self.connection.lhost.is_empty() {
            self.connection.lhost = host.to_lowercase();
        }
    }

    /// Arrival date for every record; the first value wins
    pub fn set_date(&mut self, date: &str) {
        if self.connection.date.is_empty() {
            self.connection.date = date.to_string();
        }
    }

    /// Apply the RFC 3464 field table to a delivery status line
    ///
    /// Returns `false` when the line is not a known field.
    pub fn rfc3464_field(&mut self, line: &str) -> bool {
        if let Some(cv) = FINAL_RECIPIENT.captures(line) {
            self.add_recipient(&cv[1]);
        } else if let Some(cv) = ACTION.captures(line) {
            self.current().action = cv[1].trim().to_lowercase();
        } else if let Some(cv) = STATUS.captures(line) {
            self.current().status = cv[1].to_string();
        } else if let Some(cv) = REMOTE_MTA.captures(line) {
            self.current().rhost = cv[1].trim().to_lowercase();
        } else if let Some(cv) = DIAGNOSTIC_CODE.captures(line) {
            let record = self.current();
            record.spec = cv[1].trim().to_uppercase();
            record.diagnosis = cv[2].to_string();
        } else if let Some(cv) = LAST_ATTEMPT_DATE.captures(line) {
            self.current().date = cv[1].to_string();
        } else if let Some(cv) = REPORTING_MTA.captures(line) {
            self.set_lhost(cv[1].trim());
        } else if let Some(cv) = ARRIVAL_DATE.captures(line) {
            self.set_date(&cv[1]);
        } else if DIAGNOSTIC_PREFIX.is_match(&self.previous)
            && let Some(cv) = CONTINUATION.captures(line)
        {
            self.fold_diagnosis(line, &cv[1]);
        } else {
            return false;
        }
        true
    }

    /// Turn the walk into a scan outcome stamped with `agent`
    #[must_use]
    pub fn finish(self, agent: &str) -> ScanOutcome {
        if self.recipients == 0 {
            return ScanOutcome::NothingExtracted;
        }

        let Connection { lhost, date } = self.connection;
        let records: Vec<FieldRecord> = self
            .records
            .into_iter()
            .filter(FieldRecord::has_recipient)
            .map(|mut record| {
                record.agent = agent.to_string();
                if record.lhost.is_empty() {
                    record.lhost.clone_from(&lhost);
                }
                if record.date.is_empty() {
                    record.date.clone_from(&date);
                }
                record
            })
            .collect();

        if records.is_empty() {
            return ScanOutcome::NothingExtracted;
        }

        ScanOutcome::Extracted(Extraction {
            records,
            rfc822: rfc5322::weedout(&self.rfc822),
        })
    }
}
