// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

use openflow::{Register, TableId};
use ordermap::OrderMap;

/// The concrete resource assignment resolved for one app instance.
///
/// Produced once by the composition engine, immutable thereafter, and owned
/// exclusively by that instance. Entrypoints alias the table of their target
/// state; they never receive a table id of their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub states: OrderMap<String, TableId>,
    pub exitpoints: OrderMap<String, TableId>,
    pub entrypoints: OrderMap<String, TableId>,
    pub full_mapping: OrderMap<String, Register>,
}

impl AppConfig {
    #[must_use]
    pub fn state_table(&self, state: &str) -> Option<TableId> {
        self.states.get(state).copied()
    }

    #[must_use]
    pub fn exit_table(&self, point: &str) -> Option<TableId> {
        self.exitpoints.get(point).copied()
    }

    #[must_use]
    pub fn entry_table(&self, point: &str) -> Option<TableId> {
        self.entrypoints.get(point).copied()
    }

    /// Register holding the given variable for this instance.
    #[must_use]
    pub fn register_of(&self, var: &str) -> Option<Register> {
        self.full_mapping.get(var).copied()
    }

    /// All table ids owned by this instance (states and exitpoints).
    pub fn owned_tables(&self) -> impl Iterator<Item = TableId> + '_ {
        self.states
            .values()
            .chain(self.exitpoints.values())
            .copied()
    }
}
