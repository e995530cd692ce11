// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection (edge) definitions for the graph.

use crate::connector::ConnectorId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Create a new random connection ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

/// An edge joining exactly two connectors.
///
/// Start/end is arbitrary, not directional; a connection is live exactly as
/// long as it is registered in both endpoint connectors' lists. Only
/// [`Graph::connect`](crate::graph::Graph::connect) creates connections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// Unique connection ID
    pub id: ConnectionId,
    /// One endpoint
    pub start: ConnectorId,
    /// The other endpoint
    pub end: ConnectorId,
    /// Transient per-frame flag: set once the connection has been drawn so a
    /// single render pass draws each edge at most once
    pub rendered: bool,
    /// Whether the connection is drawn highlighted
    pub highlight: bool,
}

impl Connection {
    pub(crate) fn new(start: ConnectorId, end: ConnectorId) -> Self {
        Self {
            id: ConnectionId::new(),
            start,
            end,
            rendered: false,
            highlight: false,
        }
    }

    /// Check if this connection touches a specific connector
    pub fn involves(&self, connector: ConnectorId) -> bool {
        self.start == connector || self.end == connector
    }

    /// The endpoint opposite to `connector`, or `None` if `connector` is not
    /// an endpoint of this connection
    pub fn other_end(&self, connector: ConnectorId) -> Option<ConnectorId> {
        if self.start == connector {
            Some(self.end)
        } else if self.end == connector {
            Some(self.start)
        } else {
            None
        }
    }
}
