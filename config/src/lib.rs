// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Composition graph model.
//!
//! A composition graph declares which app instances exist (vertices) and how
//! their exit points connect to other instances' entry points (edges). The
//! on-disk form is YAML; connectors use the compact
//! `"vertex.direction.point"` string form.

#![deny(clippy::all, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod graph;

use thiserror::Error;

pub use graph::{CompositionGraph, Connector, Direction, Edge, Vertex};

/// The reasons why we may reject a composition graph document
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("malformed connector '{0}', expected 'vertex.direction.point'")]
    MalformedConnector(String),
    #[error("bad direction '{0}', expected 'in' or 'out'")]
    BadDirection(String),
    #[error("connector '{0}' is not an exitpoint")]
    NotAnExitpoint(Connector),
    #[error("connector '{0}' is not an entrypoint")]
    NotAnEntrypoint(Connector),
    #[error("a vertex named '{0}' already exists")]
    DuplicateVertex(String),
    #[error("edge refers to non-existent vertex '{0}'")]
    UnknownVertex(String),
    #[error("failed to parse composition graph: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}
