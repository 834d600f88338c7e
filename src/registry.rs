//! Registry of extractors
//!
//! Built once at start-up and read-only afterwards, so a single registry can
//! be shared by reference between any number of threads.

use crate::dispatch;
use crate::error::{ParseError, Result};
use crate::extractors::{self, Extractor};
use crate::index::{DEFAULT_SKIPPED_HEADERS, HeaderIndex};
use crate::order::{OrderTables, Planner};
use crate::types::{Classification, InboundMessage};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Extractors with their header index and resolved order tables
pub struct Registry {
    extractors: Vec<Box<dyn Extractor>>,
    index: HeaderIndex,
    planner: Planner,
}

impl Registry {
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Registry of every built-in extractor with the standard order tables
    pub fn standard() -> Result<Self> {
        Self::builder().standard_extractors().build()
    }

    #[must_use]
    pub fn extractors(&self) -> &[Box<dyn Extractor>] {
        &self.extractors
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.extractors.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }

    #[must_use]
    pub const fn index(&self) -> &HeaderIndex {
        &self.index
    }

    /// Extractor registered under `agent`
    #[must_use]
    pub fn get(&self, agent: &str) -> Option<&dyn Extractor> {
        self.extractors
            .iter()
            .find(|e| e.agent() == agent)
            .map(|e| &**e)
    }

    /// Agents that declared `header`, in registration order
    #[must_use]
    pub fn declared_by(&self, header: &str) -> Vec<&'static str> {
        self.index
            .lookup(header)
            .iter()
            .map(|&position| self.extractors[position].agent())
            .collect()
    }

    /// Agents in the order the dispatcher will try them for `message`
    #[must_use]
    pub fn candidate_order(&self, message: &InboundMessage) -> Vec<&'static str> {
        self.plan(message)
            .into_iter()
            .map(|position| self.extractors[position].agent())
            .collect()
    }

    pub(crate) fn plan(&self, message: &InboundMessage) -> Vec<usize> {
        self.planner.plan(&self.index, message)
    }

    /// See [`classify`](crate::classify)
    #[must_use]
    pub fn classify(&self, message: &InboundMessage) -> Classification {
        dispatch::classify(self, message)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field(
                "extractors",
                &self.extractors.iter().map(|e| e.agent()).collect::<Vec<_>>(),
            )
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

/// Configuration of a [`Registry`]
pub struct RegistryBuilder {
    extractors: Vec<Box<dyn Extractor>>,
    disabled: Vec<String>,
    skipped_headers: Vec<String>,
    tables: OrderTables,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryBuilder {
    /// Empty builder with the standard order tables and skipped headers
    #[must_use]
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
            disabled: Vec::new(),
            skipped_headers: DEFAULT_SKIPPED_HEADERS
                .iter()
                .map(|h| (*h).to_string())
                .collect(),
            tables: OrderTables::standard(),
        }
    }

    /// Register every built-in extractor
    #[must_use]
    pub fn standard_extractors(mut self) -> Self {
        self.extractors.extend(extractors::standard());
        self
    }

    /// Register one extractor after those already registered
    #[must_use]
    pub fn extractor(mut self, extractor: Box<dyn Extractor>) -> Self {
        self.extractors.push(extractor);
        self
    }

    /// Leave out the extractor registered under `agent`
    #[must_use]
    pub fn disable(mut self, agent: &str) -> Self {
        self.disabled.push(agent.to_string());
        self
    }

    /// Never index `header`, whatever extractors declare
    #[must_use]
    pub fn skip_header(mut self, header: &str) -> Self {
        self.skipped_headers.push(header.to_lowercase());
        self
    }

    #[must_use]
    pub fn order_tables(mut self, tables: OrderTables) -> Self {
        self.tables = tables;
        self
    }

    pub fn build(self) -> Result<Registry> {
        let Self {
            mut extractors,
            disabled,
            skipped_headers,
            tables,
        } = self;

        for agent in &disabled {
            if !extractors.iter().any(|e| e.agent() == agent) {
                return Err(ParseError::UnknownAgent(agent.clone()));
            }
        }
        extractors.retain(|e| !disabled.iter().any(|agent| agent == e.agent()));

        if extractors.is_empty() {
            return Err(ParseError::EmptyRegistry);
        }

        let mut positions: HashMap<&str, usize> = HashMap::new();
        for (position, extractor) in extractors.iter().enumerate() {
            if positions.insert(extractor.agent(), position).is_some() {
                return Err(ParseError::DuplicateAgent(extractor.agent().to_string()));
            }
        }

        let index = HeaderIndex::build(&extractors, &skipped_headers);
        let planner = Planner::new(&tables, &positions, extractors.len());
        debug!(
            "Built registry with {} extractors and {} indexed headers",
            extractors.len(),
            index.len()
        );

        Ok(Registry {
            extractors,
            index,
            planner,
        })
    }
}
