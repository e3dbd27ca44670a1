// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

use crate::{Action, FlowMatch, FlowRule, Instruction, Register, TableId};
use std::fmt::{Display, Formatter};

impl Display for Register {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Display for TableId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::PushRegister(reg) => write!(f, "push({reg})"),
            Action::PopRegister(reg) => write!(f, "pop({reg})"),
            Action::CopyRegister { src, dst } => write!(f, "move({src}->{dst})"),
            Action::Load { dst, value } => write!(f, "load({value:#x}->{dst})"),
            Action::Resubmit(table) => write!(f, "resubmit({table})"),
        }
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Instruction::Apply(actions) => {
                f.write_str("apply[")?;
                for (n, action) in actions.iter().enumerate() {
                    if n > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{action}")?;
                }
                f.write_str("]")
            }
            Instruction::GotoTable(table) => write!(f, "goto({table})"),
        }
    }
}

impl Display for FlowMatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_any() {
            return f.write_str("any");
        }
        let mut sep = "";
        if let Some(port) = self.in_port {
            write!(f, "in_port={port}")?;
            sep = ",";
        }
        if let Some(eth_type) = self.eth_type {
            write!(f, "{sep}eth_type={eth_type:#06x}")?;
            sep = ",";
        }
        for (reg, value) in &self.registers {
            write!(f, "{sep}{reg}={value:#x}")?;
            sep = ",";
        }
        Ok(())
    }
}

impl Display for FlowRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "table={} prio={} match={} ",
            self.table, self.priority, self.r#match
        )?;
        for (n, instruction) in self.instructions.iter().enumerate() {
            if n > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{instruction}")?;
        }
        Ok(())
    }
}
