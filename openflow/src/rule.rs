// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Match/action rule shapes.

use crate::{Register, TableId};
use serde::{Deserialize, Serialize};

/// Priority of the catch-all wiring rules synthesized between apps. Lowest
/// possible, so any rule an app installs on the same table wins.
pub const PRIORITY_WIRING: u16 = 0;

/// Default priority for app-internal rules.
pub const PRIORITY_APP: u16 = 100;

/// One action within a rule.
///
/// `PushRegister`/`PopRegister` operate on the per-packet scratch stack; the
/// stack is how a multi-register rename survives overwriting its own inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Push the register's current value onto the scratch stack.
    PushRegister(Register),
    /// Pop the top of the scratch stack into the register.
    PopRegister(Register),
    /// Copy `src` into `dst`, clobbering `dst`.
    CopyRegister { src: Register, dst: Register },
    /// Load an immediate value into a register.
    Load { dst: Register, value: u64 },
    /// Re-enter the pipeline at the given table. Works for any target
    /// ordering, but the switch bounds the re-entry depth.
    Resubmit(TableId),
}

/// One instruction attached to a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    /// Apply the actions in order.
    Apply(Vec<Action>),
    /// Continue at the given table. Only valid for strictly increasing
    /// table order.
    GotoTable(TableId),
}

/// Match side of a rule. [`FlowMatch::any`] matches every packet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowMatch {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub in_port: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub eth_type: Option<u16>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub registers: Vec<(Register, u64)>,
}

impl FlowMatch {
    /// The catch-all match.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn in_port(mut self, port: u32) -> Self {
        self.in_port = Some(port);
        self
    }

    #[must_use]
    pub fn eth_type(mut self, eth_type: u16) -> Self {
        self.eth_type = Some(eth_type);
        self
    }

    #[must_use]
    pub fn register(mut self, reg: Register, value: u64) -> Self {
        self.registers.push((reg, value));
        self
    }

    #[must_use]
    pub fn is_any(&self) -> bool {
        self.in_port.is_none() && self.eth_type.is_none() && self.registers.is_empty()
    }
}

/// A complete rule, ready for installation on one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowRule {
    pub table: TableId,
    pub priority: u16,
    pub r#match: FlowMatch,
    pub instructions: Vec<Instruction>,
}

impl FlowRule {
    #[must_use]
    pub fn new(
        table: TableId,
        priority: u16,
        r#match: FlowMatch,
        instructions: Vec<Instruction>,
    ) -> Self {
        Self {
            table,
            priority,
            r#match,
            instructions,
        }
    }

    /// Flattened view of the rule's actions, in application order.
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.instructions.iter().flat_map(|i| match i {
            Instruction::Apply(actions) => actions.as_slice(),
            Instruction::GotoTable(_) => &[],
        })
    }
}
