// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The whole-graph composition pass.

use crate::{CompositionError, alloc::TableIdAllocator, alloc::allocate, synth::synthesize_edge};
use config::CompositionGraph;
use contract::{AppConfig, AppKind, AppRegistry, DatapathApp};
use openflow::{FlowRule, RuleSink};
use ordermap::{OrderMap, OrderSet};
use tracing::{debug, error, info};

/// Everything a successful composition produced, for inspection.
#[derive(Debug)]
pub struct Composition {
    /// Resolved resources, one entry per vertex, in graph order.
    pub configs: OrderMap<String, AppConfig>,
    /// The cross-app wiring rules, one per edge, in graph order.
    pub wiring: Vec<FlowRule>,
}

/// Runs composition passes against a registry of app kinds.
pub struct Composer {
    registry: AppRegistry,
}

impl Composer {
    #[must_use]
    pub fn new(registry: AppRegistry) -> Self {
        Self { registry }
    }

    /// Compose the datapath described by `graph`.
    ///
    /// The pass allocates resources and spawns every app, synthesizes every
    /// wiring rule, and only then starts installing: first the wiring, then
    /// each app's internal rules via [`DatapathApp::start`], in graph order.
    /// Any failure aborts the whole pass; whatever subset of rules may have
    /// reached the sink by then, the datapath must not be declared ready.
    pub fn compose(
        &self,
        graph: &CompositionGraph,
        sink: &mut dyn RuleSink,
    ) -> Result<Composition, CompositionError> {
        self.compose_inner(graph, sink).inspect_err(|e| {
            error!("composition aborted: {e}");
        })
    }

    fn compose_inner(
        &self,
        graph: &CompositionGraph,
        sink: &mut dyn RuleSink,
    ) -> Result<Composition, CompositionError> {
        graph.validate()?;

        let mut kinds: Vec<&AppKind> = Vec::with_capacity(graph.vertices.len());
        for vertex in &graph.vertices {
            let kind = self.registry.get(&vertex.kind).ok_or_else(|| {
                CompositionError::UnknownAppKind {
                    vertex: vertex.name.clone(),
                    kind: vertex.kind.clone(),
                }
            })?;
            kinds.push(kind);
        }

        let global_vars = shared_variables(&kinds);
        debug!("pipeline-wide shared variables: {global_vars:?}");

        // One allocator for the whole pass; vertex order decides who gets
        // which tables, so identical inputs reproduce identical results.
        let mut tables = TableIdAllocator::new();
        let mut configs: OrderMap<String, AppConfig> = OrderMap::new();
        let mut apps: Vec<(String, Box<dyn DatapathApp>)> = Vec::new();
        for (vertex, kind) in graph.vertices.iter().zip(&kinds) {
            let config = allocate(&vertex.name, kind.contract(), &global_vars, &mut tables)?;
            debug!(
                "'{}': tables {:?}, registers {:?}",
                vertex.name, config.states, config.full_mapping
            );
            let mut app = kind.spawn(&vertex.params).map_err(|e| {
                CompositionError::App {
                    app: vertex.name.clone(),
                    source: e,
                }
            })?;
            app.apply_config(config.clone());
            configs.insert(vertex.name.clone(), config);
            apps.push((vertex.name.clone(), app));
        }

        // Synthesize every edge before installing anything: a dangling
        // reference must not leave the pipeline half wired.
        let mut wiring = Vec::with_capacity(graph.edges.len());
        for edge in &graph.edges {
            let rule = synthesize_edge(edge, &configs, &global_vars)?;
            debug!("{} -> {}: {rule}", edge.exitpoint, edge.entrypoint);
            wiring.push(rule);
        }

        for rule in &wiring {
            sink.install(rule.clone())?;
        }
        for (name, app) in &mut apps {
            app.start(&mut *sink).map_err(|e| CompositionError::App {
                app: name.clone(),
                source: e,
            })?;
        }

        info!(
            "composed datapath: {} apps, {} wiring rules",
            apps.len(),
            wiring.len()
        );
        Ok(Composition { configs, wiring })
    }
}

/// Union of every variable any contract declares as shared: fixed public
/// mappings plus the variables named at entry and exit points. Each app must
/// end up with a register for each of these.
fn shared_variables(kinds: &[&AppKind]) -> OrderSet<String> {
    let mut vars = OrderSet::new();
    for kind in kinds {
        let contract = kind.contract();
        for var in contract.public_mapping.keys() {
            vars.insert(var.clone());
        }
        for entry in &contract.entrypoints {
            for var in &entry.consumes {
                vars.insert(var.clone());
            }
        }
        for exit in &contract.exitpoints {
            for var in &exit.provides {
                vars.insert(var.clone());
            }
        }
    }
    vars
}
