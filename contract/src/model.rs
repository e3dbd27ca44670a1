// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

use crate::ContractError;
use openflow::Register;
use ordermap::{OrderMap, OrderSet};

/// A named point through which packets enter an app's state machine.
///
/// `consumes` documents the variables the app expects to be meaningful on
/// entry. It is carried for future validation and not enforced here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entrypoint {
    pub name: String,
    pub target: String,
    pub consumes: OrderSet<String>,
}

/// A named point through which packets leave an app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exitpoint {
    pub name: String,
    pub provides: OrderSet<String>,
}

/// The static interface of one app type.
///
/// `public_mapping` pins a variable to a fixed register, shared pipeline-wide
/// (typically for compatibility with legacy fixed-function tables).
/// `private_mapping` reserves a register for app-internal use; a reserved
/// register is never handed to a shared variable, even if otherwise free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contract {
    pub states: OrderSet<String>,
    pub entrypoints: Vec<Entrypoint>,
    pub exitpoints: Vec<Exitpoint>,
    pub public_mapping: OrderMap<String, Register>,
    pub private_mapping: OrderMap<String, Register>,
}

impl Contract {
    #[must_use]
    pub fn builder() -> ContractBuilder {
        ContractBuilder::default()
    }

    /// Entrypoint by name, if declared.
    #[must_use]
    pub fn entrypoint(&self, name: &str) -> Option<&Entrypoint> {
        self.entrypoints.iter().find(|e| e.name == name)
    }

    /// Exitpoint by name, if declared.
    #[must_use]
    pub fn exitpoint(&self, name: &str) -> Option<&Exitpoint> {
        self.exitpoints.iter().find(|e| e.name == name)
    }
}

/// Builder for [`Contract`]. Validation happens in [`ContractBuilder::build`].
#[derive(Debug, Default)]
pub struct ContractBuilder {
    states: Vec<String>,
    entrypoints: Vec<Entrypoint>,
    exitpoints: Vec<Exitpoint>,
    public: Vec<(String, Register)>,
    private: Vec<(String, Register)>,
}

impl ContractBuilder {
    /// Declare an internal state.
    #[must_use]
    pub fn state(mut self, name: impl Into<String>) -> Self {
        self.states.push(name.into());
        self
    }

    /// Declare an entrypoint targeting one of the declared states.
    #[must_use]
    pub fn entrypoint<I, S>(mut self, name: impl Into<String>, target: impl Into<String>, consumes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entrypoints.push(Entrypoint {
            name: name.into(),
            target: target.into(),
            consumes: consumes.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Declare an exitpoint.
    #[must_use]
    pub fn exitpoint<I, S>(mut self, name: impl Into<String>, provides: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exitpoints.push(Exitpoint {
            name: name.into(),
            provides: provides.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Pin a shared variable to a fixed register.
    #[must_use]
    pub fn public_var(mut self, name: impl Into<String>, reg: Register) -> Self {
        self.public.push((name.into(), reg));
        self
    }

    /// Reserve a register for app-internal use.
    #[must_use]
    pub fn private_var(mut self, name: impl Into<String>, reg: Register) -> Self {
        self.private.push((name.into(), reg));
        self
    }

    /// Validate and freeze the contract.
    pub fn build(self) -> Result<Contract, ContractError> {
        let mut states = OrderSet::new();
        for state in self.states {
            if !states.insert(state.clone()) {
                return Err(ContractError::DuplicateState(state));
            }
        }

        let mut seen_points = OrderSet::new();
        for entry in &self.entrypoints {
            if !seen_points.insert(entry.name.clone()) {
                return Err(ContractError::DuplicateEntrypoint(entry.name.clone()));
            }
            if !states.contains(&entry.target) {
                return Err(ContractError::UnknownTargetState {
                    entrypoint: entry.name.clone(),
                    target: entry.target.clone(),
                });
            }
        }
        let mut seen_points = OrderSet::new();
        for exit in &self.exitpoints {
            if !seen_points.insert(exit.name.clone()) {
                return Err(ContractError::DuplicateExitpoint(exit.name.clone()));
            }
        }

        // Register reservations (public and private alike) must be pairwise
        // distinct: a register can hold one variable at a time.
        let mut public_mapping = OrderMap::new();
        let mut private_mapping = OrderMap::new();
        let mut by_register: OrderMap<Register, String> = OrderMap::new();
        for (dst, pairs) in [
            (&mut public_mapping, self.public),
            (&mut private_mapping, self.private),
        ] {
            for (var, reg) in pairs {
                if let Some(first) = by_register.get(&reg) {
                    return Err(ContractError::RegisterDoubleReserved {
                        reg,
                        first: first.clone(),
                        second: var,
                    });
                }
                if dst.insert(var.clone(), reg).is_some() {
                    return Err(ContractError::DuplicateVariable(var));
                }
                by_register.insert(reg, var);
            }
        }
        for var in public_mapping.keys() {
            if private_mapping.contains_key(var) {
                return Err(ContractError::DuplicateVariable(var.clone()));
            }
        }

        Ok(Contract {
            states,
            entrypoints: self.entrypoints,
            exitpoints: self.exitpoints,
            public_mapping,
            private_mapping,
        })
    }
}
