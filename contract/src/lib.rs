// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! App contracts and the app registry.
//!
//! A [`Contract`] is the static interface a packet-processing app exposes:
//! its internal states, named entry and exit points, and its register
//! requirements. Contracts are declared once per app *type* and attached to
//! that type in the [`AppRegistry`] together with a factory; the composition
//! engine resolves a concrete [`AppConfig`] (table ids + register map) per
//! app *instance* and hands it to the spawned [`DatapathApp`].

#![deny(clippy::all, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod appconfig;
mod model;
mod registry;

use thiserror::Error;

pub use appconfig::AppConfig;
pub use model::{Contract, ContractBuilder, Entrypoint, Exitpoint};
pub use registry::{AppKind, AppParams, AppRegistry, DatapathApp};

use openflow::Register;

/// The reasons why we may reject a contract declaration or a registration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContractError {
    #[error("state '{0}' declared twice")]
    DuplicateState(String),
    #[error("entrypoint '{0}' declared twice")]
    DuplicateEntrypoint(String),
    #[error("exitpoint '{0}' declared twice")]
    DuplicateExitpoint(String),
    #[error("variable '{0}' mapped twice")]
    DuplicateVariable(String),
    #[error("register {reg} reserved for both '{first}' and '{second}'")]
    RegisterDoubleReserved {
        reg: Register,
        first: String,
        second: String,
    },
    #[error("entrypoint '{entrypoint}' targets unknown state '{target}'")]
    UnknownTargetState { entrypoint: String, target: String },
    #[error("an app kind named '{0}' is already registered")]
    DuplicateAppKind(String),
}

/// Failures raised by app factories and app startup.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("missing mandatory parameter: {0}")]
    MissingParameter(&'static str),
    #[error("bad value for parameter '{0}': {1}")]
    BadParameter(&'static str, String),
    #[error("failed to start: {0}")]
    Startup(String),
    #[error(transparent)]
    Sink(#[from] openflow::SinkError),
}
