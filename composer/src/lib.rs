// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! # Datapath Composition Engine
//!
//! This crate turns a declarative [composition graph](config::CompositionGraph)
//! of packet-processing apps into a concrete datapath on one shared
//! flow-table and register space:
//!
//! - the allocator gives every app instance a disjoint set of table ids and
//!   a register assignment covering every pipeline-wide variable
//!   ([`allocate`], [`TableIdAllocator`]);
//! - the synthesizer emits, per edge, the register renames and the control
//!   transfer that splice two apps together ([`synthesize_edge`]);
//! - [`Composer::compose`] runs the whole pass: resolve app kinds, allocate,
//!   spawn and configure instances, synthesize all wiring, install it, and
//!   start the apps.
//!
//! The pass is a single-threaded, offline operation, run once per topology
//! (re)configuration. There is no partial success: the first error aborts
//! everything, and no wiring rule reaches the sink unless every edge
//! synthesized cleanly — a half-wired pipeline is worse than refusing to
//! come up.

#![deny(clippy::all, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod alloc;
mod compose;
mod rename;
pub mod sample_apps;
mod synth;

use thiserror::Error;

pub use alloc::{TableIdAllocator, allocate};
pub use compose::{Composer, Composition};
pub use rename::plan_renames;
pub use synth::synthesize_edge;

use contract::AppError;

/// The reasons why a composition pass may abort.
///
/// None of these are recoverable by retrying the same inputs; the caller
/// must refuse to bring the datapath up.
#[derive(Debug, Error)]
pub enum CompositionError {
    #[error(transparent)]
    Graph(#[from] config::GraphError),
    #[error("vertex '{vertex}' names unknown app kind '{kind}'")]
    UnknownAppKind { vertex: String, kind: String },
    #[error("app '{app}': not enough free registers for shared variables {vars:?}")]
    RegisterExhausted { app: String, vars: Vec<String> },
    #[error("app '{app}': entrypoint '{entrypoint}' targets unknown state '{target}'")]
    UnknownState {
        app: String,
        entrypoint: String,
        target: String,
    },
    #[error("no app config for vertex '{0}'")]
    UnknownVertex(String),
    #[error("vertex '{vertex}' has no exitpoint '{point}'")]
    UnknownExitpoint { vertex: String, point: String },
    #[error("vertex '{vertex}' has no entrypoint '{point}'")]
    UnknownEntrypoint { vertex: String, point: String },
    #[error("flow table space exhausted")]
    TableSpaceExhausted,
    #[error("app '{app}': {source}")]
    App {
        app: String,
        #[source]
        source: AppError,
    },
    #[error(transparent)]
    Sink(#[from] openflow::SinkError),
}
