// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Packet registers.

use serde::{Deserialize, Serialize};

/// A scratch slot carried with a packet through the pipeline.
///
/// The switch exposes eight general-purpose packet registers plus the
/// metadata register. These nine slots are all the composition engine has
/// for giving every app a consistent view of the pipeline-wide variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Register {
    Reg0,
    Reg1,
    Reg2,
    Reg3,
    Reg4,
    Reg5,
    Reg6,
    Reg7,
    Metadata,
}

impl Register {
    /// Every physical register, in allocation order.
    pub const POOL: [Register; 9] = [
        Register::Reg0,
        Register::Reg1,
        Register::Reg2,
        Register::Reg3,
        Register::Reg4,
        Register::Reg5,
        Register::Reg6,
        Register::Reg7,
        Register::Metadata,
    ];

    /// Stable lowercase name, as used in rule dumps and config documents.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Register::Reg0 => "reg0",
            Register::Reg1 => "reg1",
            Register::Reg2 => "reg2",
            Register::Reg3 => "reg3",
            Register::Reg4 => "reg4",
            Register::Reg5 => "reg5",
            Register::Reg6 => "reg6",
            Register::Reg7 => "reg7",
            Register::Metadata => "metadata",
        }
    }
}
