// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Table-id and register allocation.

use crate::CompositionError;
use contract::{AppConfig, Contract};
use openflow::{Register, TableId};
use ordermap::{OrderMap, OrderSet};

/// Hands out flow-table ids for dynamically composed apps.
///
/// One allocator lives for exactly one composition pass and is threaded
/// through it by `&mut`; ids below [`TableId::FIRST_DYNAMIC`] belong to the
/// legacy fixed-function range and are never produced.
#[derive(Debug)]
pub struct TableIdAllocator {
    next: u16,
}

impl Default for TableIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl TableIdAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next: u16::from(TableId::FIRST_DYNAMIC.as_u8()),
        }
    }

    /// The next unused table id.
    pub fn next_id(&mut self) -> Result<TableId, CompositionError> {
        let Ok(raw) = u8::try_from(self.next) else {
            return Err(CompositionError::TableSpaceExhausted);
        };
        self.next += 1;
        Ok(TableId::new(raw))
    }
}

/// Resolve a conflict-free [`AppConfig`] for one app instance.
///
/// `global_vars` is the pipeline-wide shared variable set; every one of them
/// must end up with a register here, or the whole composition is over
/// capacity and aborts. Fixed public registers are kept as declared, and a
/// register reserved by the contract's private mapping is never handed to a
/// shared variable, even if otherwise free.
pub fn allocate(
    app: &str,
    contract: &Contract,
    global_vars: &OrderSet<String>,
    tables: &mut TableIdAllocator,
) -> Result<AppConfig, CompositionError> {
    let mut mapping: OrderMap<String, Register> = contract.public_mapping.clone();

    let taken: OrderSet<Register> = mapping
        .values()
        .chain(contract.private_mapping.values())
        .copied()
        .collect();
    let mut free_regs = Register::POOL.into_iter().filter(|r| !taken.contains(r));

    let mut starved = Vec::new();
    for var in global_vars {
        if mapping.contains_key(var) {
            continue;
        }
        match free_regs.next() {
            Some(reg) => {
                mapping.insert(var.clone(), reg);
            }
            None => starved.push(var.clone()),
        }
    }
    if !starved.is_empty() {
        return Err(CompositionError::RegisterExhausted {
            app: app.to_string(),
            vars: starved,
        });
    }

    // Entry targets must resolve before any table id is drawn.
    for entry in &contract.entrypoints {
        if !contract.states.contains(&entry.target) {
            return Err(CompositionError::UnknownState {
                app: app.to_string(),
                entrypoint: entry.name.clone(),
                target: entry.target.clone(),
            });
        }
    }

    let mut states = OrderMap::new();
    for state in &contract.states {
        states.insert(state.clone(), tables.next_id()?);
    }
    let mut exitpoints = OrderMap::new();
    for exit in &contract.exitpoints {
        exitpoints.insert(exit.name.clone(), tables.next_id()?);
    }
    // Entrypoints alias their target state's table; no fresh id.
    let mut entrypoints = OrderMap::new();
    for entry in &contract.entrypoints {
        let Some(table) = states.get(&entry.target).copied() else {
            return Err(CompositionError::UnknownState {
                app: app.to_string(),
                entrypoint: entry.name.clone(),
                target: entry.target.clone(),
            });
        };
        entrypoints.insert(entry.name.clone(), table);
    }

    Ok(AppConfig {
        states,
        exitpoints,
        entrypoints,
        full_mapping: mapping,
    })
}

#[allow(clippy::unwrap_used, clippy::panic)]
#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn vars<const N: usize>(names: [&str; N]) -> OrderSet<String> {
        names.into_iter().map(String::from).collect()
    }

    #[test]
    fn keeps_fixed_public_registers() {
        let contract = Contract::builder()
            .state("main")
            .public_var("src_vpc", Register::Reg6)
            .build()
            .unwrap();
        let mut tables = TableIdAllocator::new();
        let config = allocate("a", &contract, &vars(["src_vpc", "dst_vpc"]), &mut tables).unwrap();
        assert_eq!(config.register_of("src_vpc"), Some(Register::Reg6));
        // dst_vpc takes the first free pool register
        assert_eq!(config.register_of("dst_vpc"), Some(Register::Reg0));
    }

    #[test]
    fn private_registers_never_serve_shared_variables() {
        let contract = Contract::builder()
            .state("main")
            .private_var("scratch", Register::Reg0)
            .build()
            .unwrap();
        let mut tables = TableIdAllocator::new();
        let config = allocate("a", &contract, &vars(["x"]), &mut tables).unwrap();
        assert_eq!(config.register_of("x"), Some(Register::Reg1));
        assert_eq!(config.register_of("scratch"), None);
    }

    #[test]
    fn entrypoints_alias_their_target_state() {
        let contract = Contract::builder()
            .state("first")
            .state("second")
            .entrypoint("rx", "second", Vec::<String>::new())
            .exitpoint("tx", Vec::<String>::new())
            .build()
            .unwrap();
        let mut tables = TableIdAllocator::new();
        let config = allocate("a", &contract, &OrderSet::new(), &mut tables).unwrap();
        assert_eq!(config.entry_table("rx"), config.state_table("second"));
        // states and exitpoints each own a fresh id
        assert_eq!(config.state_table("first"), Some(TableId::new(200)));
        assert_eq!(config.state_table("second"), Some(TableId::new(201)));
        assert_eq!(config.exit_table("tx"), Some(TableId::new(202)));
    }

    #[test]
    fn table_ids_are_unique_across_apps_and_never_reserved() {
        let contract = Contract::builder()
            .state("s1")
            .state("s2")
            .exitpoint("tx", Vec::<String>::new())
            .build()
            .unwrap();
        let mut tables = TableIdAllocator::new();
        let a = allocate("a", &contract, &OrderSet::new(), &mut tables).unwrap();
        let b = allocate("b", &contract, &OrderSet::new(), &mut tables).unwrap();
        let all: Vec<TableId> = a.owned_tables().chain(b.owned_tables()).collect();
        let unique: OrderSet<TableId> = all.iter().copied().collect();
        assert_eq!(unique.len(), all.len());
        assert!(all.iter().all(|t| !t.is_reserved()));
    }

    #[test]
    fn fails_over_capacity_naming_the_starved_variables() {
        let contract = Contract::builder().state("main").build().unwrap();
        let names: Vec<String> = (0..10).map(|n| format!("v{n}")).collect();
        let global: OrderSet<String> = names.iter().cloned().collect();
        let mut tables = TableIdAllocator::new();
        let err = allocate("a", &contract, &global, &mut tables).unwrap_err();
        match err {
            CompositionError::RegisterExhausted { app, vars } => {
                assert_eq!(app, "a");
                assert_eq!(vars, vec!["v9".to_string()]);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn table_space_exhausts_past_the_last_id() {
        let mut tables = TableIdAllocator::new();
        for n in 0u8..56 {
            let id = tables.next_id().unwrap();
            assert_eq!(id.as_u8(), 200 + n);
        }
        assert!(matches!(
            tables.next_id(),
            Err(CompositionError::TableSpaceExhausted)
        ));
    }
}
