// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Sample datapath apps.
//!
//! Small apps with deliberately different contract shapes: a head app that
//! pins a shared variable to a fixed register, a filter that maps everything
//! dynamically but reserves a private register, and a two-state forwarder.
//! They exist for tests and for the demo binary; their internal rules are
//! placeholders.

use contract::{AppConfig, AppError, AppKind, AppRegistry, Contract, ContractError, DatapathApp};
use openflow::{Action, FlowMatch, FlowRule, Instruction, PRIORITY_APP, Register, RuleSink};
use tracing::debug;

fn require_config(config: Option<&AppConfig>) -> Result<&AppConfig, AppError> {
    config.ok_or_else(|| AppError::Startup("started before apply_config".to_string()))
}

/// Head-of-pipeline app that tags every packet with its VPC id.
///
/// Pins `src_vpc` to `reg6` for compatibility with the legacy
/// fixed-function tables that still read the VPC tag there.
pub struct VpcClassifier {
    vpc: u64,
    config: Option<AppConfig>,
}

impl VpcClassifier {
    pub fn kind() -> Result<AppKind, ContractError> {
        let contract = Contract::builder()
            .state("classify")
            .exitpoint("classified", ["src_vpc"])
            .public_var("src_vpc", Register::Reg6)
            .build()?;
        Ok(AppKind::new(contract, |params| {
            let vpc = params
                .get("vpc")
                .ok_or(AppError::MissingParameter("vpc"))?
                .as_u64()
                .ok_or_else(|| {
                    AppError::BadParameter("vpc", "expected an unsigned integer".to_string())
                })?;
            Ok(Box::new(VpcClassifier { vpc, config: None }))
        }))
    }
}

impl DatapathApp for VpcClassifier {
    fn apply_config(&mut self, config: AppConfig) {
        self.config = Some(config);
    }

    fn start(&mut self, sink: &mut dyn RuleSink) -> Result<(), AppError> {
        let config = require_config(self.config.as_ref())?;
        let (Some(classify), Some(out), Some(tag)) = (
            config.state_table("classify"),
            config.exit_table("classified"),
            config.register_of("src_vpc"),
        ) else {
            return Err(AppError::Startup("incomplete config".to_string()));
        };
        debug!("classifier tagging vpc {} in {tag}", self.vpc);
        sink.install(FlowRule::new(
            classify,
            PRIORITY_APP,
            FlowMatch::any(),
            vec![
                Instruction::Apply(vec![Action::Load {
                    dst: tag,
                    value: self.vpc,
                }]),
                Instruction::GotoTable(out),
            ],
        ))?;
        Ok(())
    }
}

/// Stateless security-group filter. All of its variables are mapped
/// dynamically; `reg7` is reserved for its connection-tracking mark.
pub struct SecurityGroups {
    config: Option<AppConfig>,
}

impl SecurityGroups {
    pub fn kind() -> Result<AppKind, ContractError> {
        let contract = Contract::builder()
            .state("filter")
            .entrypoint("rx", "filter", ["src_vpc"])
            .exitpoint("accept", ["src_vpc"])
            .private_var("ct_mark", Register::Reg7)
            .build()?;
        Ok(AppKind::new(contract, |_params| {
            Ok(Box::new(SecurityGroups { config: None }))
        }))
    }
}

impl DatapathApp for SecurityGroups {
    fn apply_config(&mut self, config: AppConfig) {
        self.config = Some(config);
    }

    fn start(&mut self, sink: &mut dyn RuleSink) -> Result<(), AppError> {
        let config = require_config(self.config.as_ref())?;
        let (Some(filter), Some(accept)) = (
            config.state_table("filter"),
            config.exit_table("accept"),
        ) else {
            return Err(AppError::Startup("incomplete config".to_string()));
        };
        // Permissive placeholder verdict; real rules would match on flows.
        sink.install(FlowRule::new(
            filter,
            PRIORITY_APP,
            FlowMatch::any(),
            vec![Instruction::GotoTable(accept)],
        ))?;
        Ok(())
    }
}

/// Two-state forwarder: a lookup state resolving the destination VPC and a
/// rewrite state. Everything is mapped dynamically.
pub struct L3Forwarder {
    config: Option<AppConfig>,
}

impl L3Forwarder {
    pub fn kind() -> Result<AppKind, ContractError> {
        let contract = Contract::builder()
            .state("lookup")
            .state("rewrite")
            .entrypoint("rx", "lookup", ["src_vpc"])
            .exitpoint("tx", ["src_vpc", "dst_vpc"])
            .build()?;
        Ok(AppKind::new(contract, |_params| {
            Ok(Box::new(L3Forwarder { config: None }))
        }))
    }
}

impl DatapathApp for L3Forwarder {
    fn apply_config(&mut self, config: AppConfig) {
        self.config = Some(config);
    }

    fn start(&mut self, sink: &mut dyn RuleSink) -> Result<(), AppError> {
        let config = require_config(self.config.as_ref())?;
        let (Some(lookup), Some(rewrite), Some(tx), Some(dst)) = (
            config.state_table("lookup"),
            config.state_table("rewrite"),
            config.exit_table("tx"),
            config.register_of("dst_vpc"),
        ) else {
            return Err(AppError::Startup("incomplete config".to_string()));
        };
        sink.install(FlowRule::new(
            lookup,
            PRIORITY_APP,
            FlowMatch::any(),
            vec![
                Instruction::Apply(vec![Action::Load { dst, value: 0 }]),
                Instruction::GotoTable(rewrite),
            ],
        ))?;
        sink.install(FlowRule::new(
            rewrite,
            PRIORITY_APP,
            FlowMatch::any(),
            vec![Instruction::GotoTable(tx)],
        ))?;
        Ok(())
    }
}

/// Registry with every sample app, keyed by the type names the demo graphs
/// use.
pub fn default_registry() -> Result<AppRegistry, ContractError> {
    let mut registry = AppRegistry::new();
    registry.register("classifier", VpcClassifier::kind()?)?;
    registry.register("secgroups", SecurityGroups::kind()?)?;
    registry.register("router", L3Forwarder::kind()?)?;
    Ok(registry)
}
