// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

use crate::{AppConfig, AppError, Contract, ContractError};
use openflow::RuleSink;
use ordermap::OrderMap;
use std::collections::BTreeMap;

/// Constructor parameters for one app instance, as given in the composition
/// graph document.
pub type AppParams = BTreeMap<String, serde_yaml_ng::Value>;

/// One live app instance.
///
/// The engine drives instances through exactly this sequence: spawn (via the
/// registered factory), [`DatapathApp::apply_config`] with the resolved
/// resources, then [`DatapathApp::start`] once the cross-app wiring is in
/// place. Rules an app installs in `start` are its own business.
pub trait DatapathApp {
    fn apply_config(&mut self, config: AppConfig);
    fn start(&mut self, sink: &mut dyn RuleSink) -> Result<(), AppError>;
}

type AppFactory = Box<dyn Fn(&AppParams) -> Result<Box<dyn DatapathApp>, AppError>>;

/// An app type: its contract plus the factory that spawns instances.
pub struct AppKind {
    contract: Contract,
    factory: AppFactory,
}

impl AppKind {
    pub fn new<F>(contract: Contract, factory: F) -> Self
    where
        F: Fn(&AppParams) -> Result<Box<dyn DatapathApp>, AppError> + 'static,
    {
        Self {
            contract,
            factory: Box::new(factory),
        }
    }

    #[must_use]
    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    pub fn spawn(&self, params: &AppParams) -> Result<Box<dyn DatapathApp>, AppError> {
        (self.factory)(params)
    }
}

/// Registry of app types, keyed by the type name used in composition graphs.
#[derive(Default)]
pub struct AppRegistry {
    kinds: OrderMap<String, AppKind>,
}

impl AppRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an app kind under `name`. Names are unique.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        kind: AppKind,
    ) -> Result<(), ContractError> {
        let name = name.into();
        if self.kinds.contains_key(&name) {
            return Err(ContractError::DuplicateAppKind(name));
        }
        self.kinds.insert(name, kind);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AppKind> {
        self.kinds.get(name)
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;
    impl DatapathApp for Noop {
        fn apply_config(&mut self, _config: AppConfig) {}
        fn start(&mut self, _sink: &mut dyn RuleSink) -> Result<(), AppError> {
            Ok(())
        }
    }

    fn kind() -> AppKind {
        let contract = Contract::builder().state("main").build().unwrap();
        AppKind::new(contract, |_| Ok(Box::new(Noop)))
    }

    #[test]
    fn register_and_spawn() {
        let mut registry = AppRegistry::new();
        registry.register("noop", kind()).unwrap();
        let spawned = registry.get("noop").unwrap().spawn(&AppParams::new());
        assert!(spawned.is_ok());
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn rejects_duplicate_kind() {
        let mut registry = AppRegistry::new();
        registry.register("noop", kind()).unwrap();
        let err = registry.register("noop", kind()).unwrap_err();
        assert_eq!(err, ContractError::DuplicateAppKind("noop".to_string()));
    }
}
