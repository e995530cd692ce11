// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connector definitions: the typed attachment points owned by nodes.

use crate::connection::ConnectionId;
use crate::node::NodeId;
use crate::types::AcceptedType;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a connector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectorId(pub Uuid);

impl ConnectorId {
    /// Create a new random connector ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectorId {
    fn default() -> Self {
        Self::new()
    }
}

/// Connector classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectorKind {
    /// Receives structural connections
    Input,
    /// Originates structural connections
    Output,
    /// Accepts variable bindings only
    Modifier,
    /// The single port of a variable node
    Variable,
}

impl ConnectorKind {
    /// Vertical offset from the connector's local position to the center of
    /// its glyph, used to anchor connection curves
    pub fn anchor_offset(self) -> f32 {
        match self {
            Self::Modifier => 0.0,
            _ => 4.0,
        }
    }
}

/// Factory-supplied description of a connector: the only way node-specific
/// catalog data enters the core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorSpec {
    /// User-facing name
    pub name: String,
    /// Maximum number of connections, -1 for unbounded
    pub max_connections: i32,
    /// What the connector accepts
    pub accepted: AcceptedType,
}

impl ConnectorSpec {
    /// Create a new connector description
    pub fn new(name: impl Into<String>, max_connections: i32, accepted: AcceptedType) -> Self {
        Self {
            name: name.into(),
            max_connections,
            accepted,
        }
    }

    /// Create an unbounded connector description
    pub fn unbounded(name: impl Into<String>, accepted: AcceptedType) -> Self {
        Self::new(name, -1, accepted)
    }
}

/// A typed attachment point on a node.
///
/// Owned exclusively by its node: removing the node removes its connectors
/// and their connections. The connection list is kept in insertion order,
/// which is also the render attempt order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connector {
    /// Unique ID
    pub id: ConnectorId,
    /// Owning node (back-reference, never owning)
    pub node: NodeId,
    /// User-facing name
    pub name: String,
    /// Classification
    pub kind: ConnectorKind,
    /// What the connector accepts
    pub accepted: AcceptedType,
    /// Position relative to the owning node's top-left corner
    pub position: [f32; 2],
    /// Maximum number of connections, -1 for unbounded
    pub max_connections: i32,
    /// Whether the connector is drawn highlighted (drag candidate)
    pub highlighted: bool,
    /// Connections this connector participates in, insertion order
    connections: Vec<ConnectionId>,
}

impl Connector {
    /// Create a connector from its description
    pub fn from_spec(
        spec: &ConnectorSpec,
        node: NodeId,
        kind: ConnectorKind,
        position: [f32; 2],
    ) -> Self {
        Self {
            id: ConnectorId::new(),
            node,
            name: spec.name.clone(),
            kind,
            accepted: spec.accepted,
            position,
            max_connections: spec.max_connections,
            highlighted: false,
            connections: Vec::new(),
        }
    }

    /// Connections this connector participates in
    pub fn connections(&self) -> &[ConnectionId] {
        &self.connections
    }

    /// Number of connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// True if another connection would exceed `max_connections`
    pub fn at_capacity(&self) -> bool {
        self.max_connections != -1 && self.connections.len() >= self.max_connections as usize
    }

    pub(crate) fn push_connection(&mut self, id: ConnectionId) {
        self.connections.push(id);
    }

    /// Drop a connection from the list; tolerates an id that is not present
    /// so teardown stays idempotent.
    pub(crate) fn remove_connection(&mut self, id: ConnectionId) {
        self.connections.retain(|c| *c != id);
    }
}
