// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

#![deny(clippy::all, clippy::pedantic)]
#![deny(rustdoc::all)]
#![allow(rustdoc::missing_crate_level_docs)]

mod args;

use crate::args::{CmdArgs, Parser};

use composer::Composer;
use composer::sample_apps::default_registry;
use config::CompositionGraph;
use openflow::LoggingSink;

use tracing::{error, info};

fn init_logging() {
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_file(true)
        .with_level(true)
        .with_line_number(true)
        .init();
}

fn main() {
    /* parse cmd line args */
    let args = CmdArgs::parse();

    /* initialize logging */
    init_logging();
    info!("Starting datapath composition...");

    let doc = match std::fs::read_to_string(args.graph()) {
        Ok(doc) => doc,
        Err(e) => {
            error!("Failed to read '{}': {e}", args.graph().display());
            std::process::exit(1);
        }
    };
    let graph = match CompositionGraph::from_yaml(&doc) {
        Ok(graph) => graph,
        Err(e) => {
            error!("Bad composition graph: {e}");
            std::process::exit(1);
        }
    };

    let registry = match default_registry() {
        Ok(registry) => registry,
        Err(e) => {
            error!("Bad app contract: {e}");
            std::process::exit(1);
        }
    };

    /* an incompletely wired pipeline must never come up: any composition
     * failure refuses readiness */
    let composer = Composer::new(registry);
    let mut sink = LoggingSink;
    match composer.compose(&graph, &mut sink) {
        Ok(composition) => {
            info!(
                "Datapath is ready: {} apps, {} wiring rules",
                composition.configs.len(),
                composition.wiring.len()
            );
        }
        Err(e) => {
            error!("Composition failed: {e}");
            std::process::exit(1);
        }
    }
}
