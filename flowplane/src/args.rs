// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

pub(crate) use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "flowplane")]
#[command(about = "Composes an OpenFlow datapath from a declarative app graph", long_about = None)]
pub(crate) struct CmdArgs {
    #[arg(long, value_name = "composition graph YAML")]
    graph: PathBuf,
}

impl CmdArgs {
    pub fn graph(&self) -> &Path {
        &self.graph
    }
}
