// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

use crate::GraphError;
use contract::AppParams;
use ordermap::OrderSet;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// One app instance in the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// Unique instance name.
    pub name: String,
    /// App type name; the factory key in the app registry.
    #[serde(rename = "type")]
    pub kind: String,
    /// Constructor parameters handed to the factory.
    #[serde(default, skip_serializing_if = "AppParams::is_empty")]
    pub params: AppParams,
}

/// Which side of an app a connector names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::In => f.write_str("in"),
            Direction::Out => f.write_str("out"),
        }
    }
}

impl FromStr for Direction {
    type Err = GraphError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "in" => Ok(Direction::In),
            "out" => Ok(Direction::Out),
            other => Err(GraphError::BadDirection(other.to_string())),
        }
    }
}

/// One end of an edge: a named point on a named vertex.
///
/// The compact string form is `"vertex.direction.point"`, e.g.
/// `"classifier.out.tx"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connector {
    pub vertex: String,
    pub direction: Direction,
    pub point: String,
}

impl Display for Connector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.vertex, self.direction, self.point)
    }
}

impl FromStr for Connector {
    type Err = GraphError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let malformed = || GraphError::MalformedConnector(input.to_string());
        let mut parts = input.split('.');
        let (Some(vertex), Some(direction), Some(point), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };
        if vertex.is_empty() || point.is_empty() {
            return Err(malformed());
        }
        Ok(Connector {
            vertex: vertex.to_string(),
            direction: direction.parse()?,
            point: point.to_string(),
        })
    }
}

impl Serialize for Connector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Connector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let compact = String::deserialize(deserializer)?;
        compact.parse().map_err(serde::de::Error::custom)
    }
}

/// A directed connection from one app's exitpoint to another's entrypoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(rename = "exit")]
    pub exitpoint: Connector,
    #[serde(rename = "entry")]
    pub entrypoint: Connector,
}

impl Edge {
    /// Build an edge, checking connector directions.
    pub fn new(exitpoint: Connector, entrypoint: Connector) -> Result<Self, GraphError> {
        if exitpoint.direction != Direction::Out {
            return Err(GraphError::NotAnExitpoint(exitpoint));
        }
        if entrypoint.direction != Direction::In {
            return Err(GraphError::NotAnEntrypoint(entrypoint));
        }
        Ok(Self {
            exitpoint,
            entrypoint,
        })
    }
}

/// The declarative description of one datapath: app instances and their
/// wiring. Vertex and edge order is meaningful; composition iterates both in
/// the order given here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompositionGraph {
    #[serde(default)]
    pub vertices: Vec<Vertex>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl CompositionGraph {
    /// Parse and validate a YAML composition graph document.
    pub fn from_yaml(doc: &str) -> Result<Self, GraphError> {
        let graph: Self = serde_yaml_ng::from_str(doc)?;
        graph.validate()?;
        Ok(graph)
    }

    /// Structural validation: vertex names are unique, every edge endpoint
    /// names a known vertex with the right direction. Whether the named
    /// points exist on the apps' contracts is checked during composition.
    pub fn validate(&self) -> Result<(), GraphError> {
        let mut names: OrderSet<&str> = OrderSet::new();
        for vertex in &self.vertices {
            if !names.insert(vertex.name.as_str()) {
                return Err(GraphError::DuplicateVertex(vertex.name.clone()));
            }
        }
        for edge in &self.edges {
            if edge.exitpoint.direction != Direction::Out {
                return Err(GraphError::NotAnExitpoint(edge.exitpoint.clone()));
            }
            if edge.entrypoint.direction != Direction::In {
                return Err(GraphError::NotAnEntrypoint(edge.entrypoint.clone()));
            }
            for connector in [&edge.exitpoint, &edge.entrypoint] {
                if !names.contains(connector.vertex.as_str()) {
                    return Err(GraphError::UnknownVertex(connector.vertex.clone()));
                }
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn vertex(&self, name: &str) -> Option<&Vertex> {
        self.vertices.iter().find(|v| v.name == name)
    }
}
