// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Per-edge wiring rule synthesis.

use crate::{CompositionError, rename::plan_renames};
use config::Edge;
use contract::AppConfig;
use openflow::{Action, FlowMatch, FlowRule, Instruction, PRIORITY_WIRING, Register};
use ordermap::{OrderMap, OrderSet};

/// Synthesize the one rule that connects an exitpoint to an entrypoint.
///
/// The rule lives on the exitpoint's table, matches every packet at the
/// lowest priority (it wires apps together, it implements no policy), and
/// carries exactly the renames the two register assignments require plus one
/// control transfer: a goto when the destination table lies strictly ahead,
/// an explicit re-entry otherwise (self- and backward edges included).
pub fn synthesize_edge(
    edge: &Edge,
    configs: &OrderMap<String, AppConfig>,
    global_vars: &OrderSet<String>,
) -> Result<FlowRule, CompositionError> {
    let exit_cfg = configs
        .get(&edge.exitpoint.vertex)
        .ok_or_else(|| CompositionError::UnknownVertex(edge.exitpoint.vertex.clone()))?;
    let entry_cfg = configs
        .get(&edge.entrypoint.vertex)
        .ok_or_else(|| CompositionError::UnknownVertex(edge.entrypoint.vertex.clone()))?;

    let source_table = exit_cfg.exit_table(&edge.exitpoint.point).ok_or_else(|| {
        CompositionError::UnknownExitpoint {
            vertex: edge.exitpoint.vertex.clone(),
            point: edge.exitpoint.point.clone(),
        }
    })?;
    let dest_table = entry_cfg.entry_table(&edge.entrypoint.point).ok_or_else(|| {
        CompositionError::UnknownEntrypoint {
            vertex: edge.entrypoint.vertex.clone(),
            point: edge.entrypoint.point.clone(),
        }
    })?;

    // Every shared variable must survive the boundary under the downstream
    // app's register assignment.
    let moves: Vec<(Register, Register)> = global_vars
        .iter()
        .filter_map(|var| {
            match (exit_cfg.register_of(var), entry_cfg.register_of(var)) {
                (Some(exit_reg), Some(entry_reg)) if exit_reg != entry_reg => {
                    Some((exit_reg, entry_reg))
                }
                _ => None,
            }
        })
        .collect();
    let mut actions = plan_renames(&moves);

    let instructions = if source_table < dest_table {
        let mut instructions = Vec::new();
        if !actions.is_empty() {
            instructions.push(Instruction::Apply(actions));
        }
        instructions.push(Instruction::GotoTable(dest_table));
        instructions
    } else {
        actions.push(Action::Resubmit(dest_table));
        vec![Instruction::Apply(actions)]
    };

    Ok(FlowRule::new(
        source_table,
        PRIORITY_WIRING,
        FlowMatch::any(),
        instructions,
    ))
}
