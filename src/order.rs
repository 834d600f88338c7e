//! Candidate order planning
//!
//! Extractors are tried one after another until one of them extracts a
//! record. The order only affects how many scans are wasted before the
//! right one; every registered extractor is always part of it.

use crate::index::HeaderIndex;
use crate::types::InboundMessage;
use regex::Regex;
use std::collections::HashMap;
use tracing::warn;

/// Static tables the planner draws from, naming extractors by agent
#[derive(Debug, Clone)]
pub struct OrderTables {
    /// Subject keyword patterns and the extractors they point at
    pub subjects: Vec<(Regex, Vec<String>)>,

    /// Priority tiers, most specific first
    pub tiers: Vec<Vec<String>>,
}

fn agents(list: &[&str]) -> Vec<String> {
    list.iter().map(|a| (*a).to_string()).collect()
}

impl OrderTables {
    /// Tables tuned for the built-in extractors
    ///
    /// # Panics
    ///
    /// Never in practice; the patterns are fixed and valid.
    #[must_use]
    pub fn standard() -> Self {
        let subjects = [
            (r"(?i)delivery", &["MTA::Exim", "US::Google"][..]),
            (
                r"(?i)noti(?:ce|fi)",
                &["MTA::Qmail", "MTA::Sendmail", "US::Google"][..],
            ),
            (
                r"(?i)return",
                &["MTA::Postfix", "MTA::Sendmail", "MTA::X1"][..],
            ),
            (
                r"(?i)undeliver",
                &["MTA::Postfix", "MTA::Exchange2007"][..],
            ),
            (r"(?i)failure", &["MTA::Qmail", "US::Google"][..]),
            (
                r"(?i)warning",
                &["MTA::Postfix", "MTA::Sendmail", "MTA::Exim"][..],
            ),
        ]
        .into_iter()
        .map(|(pattern, list)| (Regex::new(pattern).unwrap(), agents(list)))
        .collect();

        let tiers = vec![
            // Many subject variants, some of them MIME encoded
            agents(&["MTA::Exim"]),
            // No specific header and few subject hints
            agents(&["MTA::Exchange2007"]),
            // No specific header but listed in the subject table
            agents(&["MTA::Qmail", "MTA::Postfix", "MTA::Sendmail"]),
            // Rare or old formats
            agents(&["MTA::X1"]),
            // Specific header shared with other formats
            agents(&["US::Google"]),
            // Specific header of their own
            agents(&["US::Aol", "US::Yahoo"]),
        ];

        Self { subjects, tiers }
    }
}

impl Default for OrderTables {
    fn default() -> Self {
        Self::standard()
    }
}

/// Order tables resolved to registry positions
#[derive(Debug, Clone, Default)]
pub(crate) struct Planner {
    subjects: Vec<(Regex, Vec<usize>)>,
    tiers: Vec<usize>,
    count: usize,
}

impl Planner {
    pub(crate) fn new(tables: &OrderTables, positions: &HashMap<&str, usize>, count: usize) -> Self {
        let resolve = |list: &[String]| -> Vec<usize> {
            list.iter()
                .filter_map(|agent| {
                    let position = positions.get(agent.as_str()).copied();
                    if position.is_none() {
                        warn!("Order table names unregistered agent {agent}");
                    }
                    position
                })
                .collect()
        };

        Self {
            subjects: tables
                .subjects
                .iter()
                .map(|(pattern, list)| (pattern.clone(), resolve(list)))
                .collect(),
            tiers: tables.tiers.iter().flat_map(|tier| resolve(tier)).collect(),
            count,
        }
    }

    /// Candidate positions for `message`, without duplicates
    pub(crate) fn plan(&self, index: &HeaderIndex, message: &InboundMessage) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.count);
        let mut seen = vec![false; self.count];
        let mut push = |position: usize| {
            if !seen[position] {
                seen[position] = true;
                order.push(position);
            }
        };

        index.present_on(message).for_each(&mut push);

        let subject = message.subject();
        if !subject.is_empty() {
            self.subjects
                .iter()
                .filter(|(pattern, _)| pattern.is_match(subject))
                .flat_map(|(_, list)| list.iter().copied())
                .for_each(&mut push);
        }

        self.tiers.iter().copied().for_each(&mut push);
        (0..self.count).for_each(&mut push);

        order
    }
}
