// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Rule installation boundary.

use crate::{FlowRule, TableId};
use tracing::debug;

/// Errors raised by a rule sink.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SinkError {
    #[error("switch rejected rule on table {table}: {reason}")]
    Rejected { table: TableId, reason: String },
}

/// Anything that accepts synthesized rules for installation.
///
/// The composition engine performs no I/O of its own; the sink is where the
/// already-computed rule set leaves the engine.
pub trait RuleSink {
    fn install(&mut self, rule: FlowRule) -> Result<(), SinkError>;
}

/// Sink that keeps every installed rule, for tests and inspection.
#[derive(Debug, Default)]
pub struct CollectingSink {
    rules: Vec<FlowRule>,
}

impl CollectingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn rules(&self) -> &[FlowRule] {
        &self.rules
    }

    #[must_use]
    pub fn into_rules(self) -> Vec<FlowRule> {
        self.rules
    }

    /// Rules installed on the given table, in installation order.
    pub fn rules_on(&self, table: TableId) -> impl Iterator<Item = &FlowRule> {
        self.rules.iter().filter(move |r| r.table == table)
    }
}

impl RuleSink for CollectingSink {
    fn install(&mut self, rule: FlowRule) -> Result<(), SinkError> {
        self.rules.push(rule);
        Ok(())
    }
}

/// Sink that logs each rule instead of installing it anywhere.
#[derive(Debug, Default)]
pub struct LoggingSink;

impl RuleSink for LoggingSink {
    fn install(&mut self, rule: FlowRule) -> Result<(), SinkError> {
        debug!("installing {rule}");
        Ok(())
    }
}
