// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

use serde::{Deserialize, Serialize};

/// Identifier of one flow table on the switch.
///
/// The low range is set aside for infrastructure and legacy fixed-function
/// tables; composition hands out ids from [`TableId::FIRST_DYNAMIC`] up to
/// [`TableId::MAX`] only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableId(u8);

impl TableId {
    /// First table id available to dynamically composed apps.
    pub const FIRST_DYNAMIC: TableId = TableId(200);
    /// Highest table id the switch supports.
    pub const MAX: TableId = TableId(u8::MAX);

    #[must_use]
    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Whether this id lies in the reserved legacy range.
    #[must_use]
    pub const fn is_reserved(self) -> bool {
        self.0 < Self::FIRST_DYNAMIC.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_range() {
        assert!(TableId::new(0).is_reserved());
        assert!(TableId::new(199).is_reserved());
        assert!(!TableId::FIRST_DYNAMIC.is_reserved());
        assert!(!TableId::MAX.is_reserved());
    }

    #[test]
    fn ordering_follows_raw_id() {
        assert!(TableId::new(200) < TableId::new(201));
        assert!(TableId::FIRST_DYNAMIC < TableId::MAX);
    }
}
