// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph arena and mutation commands.
//!
//! The graph owns every node, connector and connection in
//! insertion-ordered arenas; entities refer to each other through ids, so
//! destroying an entity can never leave a dangling reference behind.

use crate::connection::{Connection, ConnectionId};
use crate::connector::{Connector, ConnectorId, ConnectorKind};
use crate::naming::NameAllocator;
use crate::node::{
    Node, NodeBody, NodeId, NodeTemplate, TemplateBody, CONNECTOR_ROW_PITCH, CONNECTOR_START_Y,
    CONNECTOR_TOP_MARGIN, MODIFIER_PITCH, MODIFIER_START_X, NODE_MARGIN,
};
use crate::types::TypeRegistry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Why a connection attempt was rejected.
///
/// The editor surface discards this and simply leaves the graph unchanged;
/// the variants exist for logging and tests.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConnectError {
    /// Connector id not present in the graph
    #[error("Connector not found: {0:?}")]
    UnknownConnector(ConnectorId),

    /// Two connectors of the identical kind never connect directly
    #[error("Connectors have the same kind")]
    SameKind,

    /// Modifiers only accept variable bindings
    #[error("Modifier connectors only accept variable connectors")]
    ModifierNeedsVariable,

    /// A connector may not connect to itself or to its own node
    #[error("Connection endpoints must belong to two distinct nodes")]
    SelfConnection,

    /// The declared-type relation failed in at least one direction
    #[error("Incompatible connector types")]
    IncompatibleTypes,

    /// An endpoint is already at its connection limit
    #[error("Connector is at its connection limit")]
    AtCapacity,
}

/// The node graph: nodes, their connectors, and the connections between
/// them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    nodes: IndexMap<NodeId, Node>,
    connectors: IndexMap<ConnectorId, Connector>,
    connections: IndexMap<ConnectionId, Connection>,
    names: NameAllocator,
}

impl Graph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a node from a template and add it to the graph.
    ///
    /// Assigns a unique display name and lays the connectors out: inputs
    /// down the left edge, outputs down the right edge, modifiers along the
    /// bottom. The node lands at the workspace origin; the surface assigns
    /// the real position.
    pub fn insert(&mut self, template: &NodeTemplate) -> NodeId {
        let id = NodeId::new();
        let display_name = self.names.allocate(&template.name);
        let size = template.size();

        let body = match &template.body {
            TemplateBody::Action {
                inputs,
                modifiers,
                outputs,
                ..
            } => {
                let input_ids = inputs
                    .iter()
                    .enumerate()
                    .map(|(i, spec)| {
                        let y = CONNECTOR_START_Y + i as f32 * CONNECTOR_ROW_PITCH;
                        self.add_connector(spec, id, ConnectorKind::Input, [0.0, y])
                    })
                    .collect();
                let modifier_ids = modifiers
                    .iter()
                    .enumerate()
                    .map(|(i, spec)| {
                        let x = MODIFIER_START_X + i as f32 * MODIFIER_PITCH;
                        self.add_connector(
                            spec,
                            id,
                            ConnectorKind::Modifier,
                            [x, size[1] - NODE_MARGIN],
                        )
                    })
                    .collect();
                let output_ids = outputs
                    .iter()
                    .enumerate()
                    .map(|(i, spec)| {
                        let y = CONNECTOR_START_Y + i as f32 * CONNECTOR_ROW_PITCH;
                        self.add_connector(
                            spec,
                            id,
                            ConnectorKind::Output,
                            [size[0] - NODE_MARGIN, y],
                        )
                    })
                    .collect();
                NodeBody::Action {
                    inputs: input_ids,
                    modifiers: modifier_ids,
                    outputs: output_ids,
                }
            }
            TemplateBody::Variable { value, accepted } => {
                let spec = crate::connector::ConnectorSpec::unbounded(&template.name, *accepted);
                let connector = self.add_connector(
                    &spec,
                    id,
                    ConnectorKind::Variable,
                    [size[0] / 2.0, size[1] / 2.0],
                );
                NodeBody::Variable {
                    connector,
                    value: value.clone(),
                }
            }
        };

        info!(template = %template.id, name = %display_name, "node added");

        self.nodes.insert(
            id,
            Node {
                id,
                template_id: template.id.clone(),
                display_name,
                declared_type: template.declared_type,
                position: [0.0, 0.0],
                size,
                selected: false,
                body,
            },
        );
        id
    }

    fn add_connector(
        &mut self,
        spec: &crate::connector::ConnectorSpec,
        node: NodeId,
        kind: ConnectorKind,
        position: [f32; 2],
    ) -> ConnectorId {
        let connector = Connector::from_spec(spec, node, kind, position);
        let id = connector.id;
        self.connectors.insert(id, connector);
        id
    }

    /// Remove a node, destroying all of its connections and connectors
    /// first. No-op on an unknown id.
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        let connector_ids = self.nodes.get(&node_id)?.connector_ids();

        self.destroy_node_connections(node_id);
        for connector_id in connector_ids {
            self.connectors.shift_remove(&connector_id);
        }

        let node = self.nodes.shift_remove(&node_id);
        if let Some(node) = &node {
            info!(name = %node.display_name, "node removed");
        }
        node
    }

    /// Attempt to establish a connection between two connectors.
    ///
    /// This is the single edge-creation path. The rules are checked in
    /// order and the first failure rejects the attempt:
    /// same-kind, modifier-pairs-with-variable-only, distinct nodes,
    /// declared-type compatibility in both directions, capacity on each
    /// endpoint. On success the connection is registered in exactly both
    /// endpoints' lists.
    pub fn connect(
        &mut self,
        a: ConnectorId,
        b: ConnectorId,
        types: &TypeRegistry,
    ) -> Result<ConnectionId, ConnectError> {
        let ca = self
            .connectors
            .get(&a)
            .ok_or(ConnectError::UnknownConnector(a))?;
        let cb = self
            .connectors
            .get(&b)
            .ok_or(ConnectError::UnknownConnector(b))?;

        if ca.kind == cb.kind {
            return Err(ConnectError::SameKind);
        }
        if ca.kind == ConnectorKind::Modifier && cb.kind != ConnectorKind::Variable {
            return Err(ConnectError::ModifierNeedsVariable);
        }
        if cb.kind == ConnectorKind::Modifier && ca.kind != ConnectorKind::Variable {
            return Err(ConnectError::ModifierNeedsVariable);
        }
        if a == b || ca.node == cb.node {
            return Err(ConnectError::SelfConnection);
        }

        // Checked in both ordered directions; the relation must hold
        // symmetrically.
        if !self.accepts(ca, cb, types) || !self.accepts(cb, ca, types) {
            return Err(ConnectError::IncompatibleTypes);
        }

        if ca.at_capacity() || cb.at_capacity() {
            return Err(ConnectError::AtCapacity);
        }

        let connection = Connection::new(a, b);
        let id = connection.id;
        self.connections.insert(id, connection);
        if let Some(connector) = self.connectors.get_mut(&a) {
            connector.push_connection(id);
        }
        if let Some(connector) = self.connectors.get_mut(&b) {
            connector.push_connection(id);
        }

        debug!(?a, ?b, "connection established");
        Ok(id)
    }

    /// Whether connector `x` accepts the node that owns connector `y`
    fn accepts(&self, x: &Connector, y: &Connector, types: &TypeRegistry) -> bool {
        let Some(owner) = self.nodes.get(&y.node) else {
            return false;
        };
        types.satisfies(owner.declared_type, x.accepted.element())
    }

    /// Destroy a connection, removing it from both endpoints' lists.
    ///
    /// Tolerates endpoints that no longer know the connection, so teardown
    /// stays safe to repeat.
    pub fn destroy_connection(&mut self, id: ConnectionId) -> Option<Connection> {
        let connection = self.connections.shift_remove(&id)?;
        if let Some(connector) = self.connectors.get_mut(&connection.start) {
            connector.remove_connection(id);
        }
        if let Some(connector) = self.connectors.get_mut(&connection.end) {
            connector.remove_connection(id);
        }
        Some(connection)
    }

    /// Destroy every connection of one connector.
    ///
    /// The id list is snapshotted first: destruction mutates the live list.
    pub fn destroy_connector_connections(&mut self, connector_id: ConnectorId) {
        let snapshot: Vec<ConnectionId> = self
            .connectors
            .get(&connector_id)
            .map(|c| c.connections().to_vec())
            .unwrap_or_default();
        for id in snapshot {
            self.destroy_connection(id);
        }
    }

    /// Destroy every connection touching a node
    pub fn destroy_node_connections(&mut self, node_id: NodeId) {
        let connector_ids = self
            .nodes
            .get(&node_id)
            .map(Node::connector_ids)
            .unwrap_or_default();
        for connector_id in connector_ids {
            self.destroy_connector_connections(connector_id);
        }
    }

    /// All connection ids touching a node, in connector render order
    pub fn node_connections(&self, node_id: NodeId) -> Vec<ConnectionId> {
        let Some(node) = self.nodes.get(&node_id) else {
            return Vec::new();
        };
        node.connector_ids()
            .into_iter()
            .filter_map(|id| self.connectors.get(&id))
            .flat_map(|connector| connector.connections().iter().copied())
            .collect()
    }

    /// Reset the per-frame rendered flag on every connection
    pub fn mark_connections_not_rendered(&mut self) {
        for connection in self.connections.values_mut() {
            connection.rendered = false;
        }
    }

    /// Workspace position of a connector's glyph center: node position plus
    /// local position plus the kind-dependent vertical offset
    pub fn connector_anchor(&self, connector_id: ConnectorId) -> Option<[f32; 2]> {
        let connector = self.connectors.get(&connector_id)?;
        let node = self.nodes.get(&connector.node)?;
        Some([
            node.position[0] + connector.position[0],
            node.position[1] + connector.position[1] + connector.kind.anchor_offset(),
        ])
    }

    /// Label of the endpoint opposite `origin`, for UI readouts of what a
    /// port is connected to. `None` when `origin` owns neither endpoint.
    pub fn connection_label(&self, connection_id: ConnectionId, origin: NodeId) -> Option<String> {
        let connection = self.connections.get(&connection_id)?;
        let start = self.connectors.get(&connection.start)?;
        let end = self.connectors.get(&connection.end)?;

        let far = if start.node == origin {
            end
        } else if end.node == origin {
            start
        } else {
            return None;
        };
        let far_node = self.nodes.get(&far.node)?;
        Some(far_node.label_for(&far.name))
    }

    /// Whether a node has no incoming structural connections: an action
    /// node is an orphan iff every input connector is empty, a variable
    /// node iff its single connector is empty
    pub fn is_orphan(&self, node_id: NodeId) -> bool {
        let Some(node) = self.nodes.get(&node_id) else {
            return false;
        };
        match &node.body {
            NodeBody::Action { inputs, .. } => inputs
                .iter()
                .filter_map(|id| self.connectors.get(id))
                .all(|c| c.connection_count() == 0),
            NodeBody::Variable { connector, .. } => self
                .connectors
                .get(connector)
                .is_some_and(|c| c.connection_count() == 0),
        }
    }

    /// Whether the graph contains orphaned nodes. The first-added node is
    /// skipped unless `include_first`: by convention it is the root and
    /// expected to be unconnected.
    pub fn has_orphans(&self, include_first: bool) -> bool {
        let skip = usize::from(!include_first);
        self.nodes.keys().skip(skip).any(|id| self.is_orphan(*id))
    }

    /// All orphaned nodes, with the same first-node convention as
    /// [`Self::has_orphans`]
    pub fn orphans(&self, include_first: bool) -> Vec<NodeId> {
        let skip = usize::from(!include_first);
        self.nodes
            .keys()
            .skip(skip)
            .copied()
            .filter(|id| self.is_orphan(*id))
            .collect()
    }

    /// Hit-test a node's connectors in node-local coordinates.
    ///
    /// Action nodes test the left strip against inputs, the right strip
    /// against outputs and the bottom strip against modifiers; a variable
    /// node answers with its single connector anywhere on its body.
    pub fn connector_at(&self, node_id: NodeId, local: [f32; 2]) -> Option<ConnectorId> {
        let node = self.nodes.get(&node_id)?;
        let [x, y] = local;
        let [width, height] = node.size;
        let row = NODE_MARGIN + CONNECTOR_TOP_MARGIN;

        match &node.body {
            NodeBody::Action {
                inputs,
                modifiers,
                outputs,
            } => {
                if x >= 0.0 && x <= NODE_MARGIN {
                    self.find_in_band(inputs, |c| y >= c.position[1] && y <= c.position[1] + row)
                } else if x >= width - NODE_MARGIN && x <= width {
                    self.find_in_band(outputs, |c| y >= c.position[1] && y <= c.position[1] + row)
                } else if y >= height - NODE_MARGIN && y <= height {
                    self.find_in_band(modifiers, |c| x >= c.position[0] && x <= c.position[0] + row)
                } else {
                    None
                }
            }
            NodeBody::Variable { connector, .. } => Some(*connector),
        }
    }

    fn find_in_band(
        &self,
        ids: &[ConnectorId],
        hit: impl Fn(&Connector) -> bool,
    ) -> Option<ConnectorId> {
        ids.iter()
            .filter_map(|id| self.connectors.get(id))
            .find(|c| hit(c))
            .map(|c| c.id)
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All node ids in insertion order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// All nodes in reverse insertion order, most recently added first.
    /// Hit-testing walks this so the top-most node wins on overlap.
    pub fn nodes_rev(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values().rev()
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get a connector by ID
    pub fn connector(&self, connector_id: ConnectorId) -> Option<&Connector> {
        self.connectors.get(&connector_id)
    }

    /// Get a mutable connector by ID
    pub fn connector_mut(&mut self, connector_id: ConnectorId) -> Option<&mut Connector> {
        self.connectors.get_mut(&connector_id)
    }

    /// Get a connection by ID
    pub fn connection(&self, connection_id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&connection_id)
    }

    /// Get a mutable connection by ID
    pub fn connection_mut(&mut self, connection_id: ConnectionId) -> Option<&mut Connection> {
        self.connections.get_mut(&connection_id)
    }

    /// All connections
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Number of connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::ConnectorSpec;
    use crate::node::{NodeTemplate, TemplateBody, ACTION_SIZE};
    use crate::types::{AcceptedType, TypeId};

    struct Fixture {
        types: TypeRegistry,
        any: TypeId,
        action_ty: TypeId,
        value_ty: TypeId,
    }

    impl Fixture {
        fn new() -> Self {
            let mut types = TypeRegistry::new();
            let any = types.register("Any", None);
            let action_ty = types.register("Action", Some(any));
            let value_ty = types.register("Value", Some(any));
            Self {
                types,
                any,
                action_ty,
                value_ty,
            }
        }

        fn action_template(&self, input_max: i32) -> NodeTemplate {
            NodeTemplate {
                id: "action".to_string(),
                name: "Action".to_string(),
                declared_type: self.action_ty,
                body: TemplateBody::Action {
                    size: ACTION_SIZE,
                    inputs: vec![ConnectorSpec::new(
                        "In",
                        input_max,
                        AcceptedType::One(self.action_ty),
                    )],
                    modifiers: vec![ConnectorSpec::new(
                        "Mod",
                        1,
                        AcceptedType::One(self.value_ty),
                    )],
                    outputs: vec![ConnectorSpec::unbounded(
                        "Out",
                        AcceptedType::One(self.action_ty),
                    )],
                },
            }
        }

        fn variable_template(&self) -> NodeTemplate {
            NodeTemplate {
                id: "value".to_string(),
                name: "Value".to_string(),
                declared_type: self.value_ty,
                body: TemplateBody::Variable {
                    value: "42".to_string(),
                    accepted: AcceptedType::One(self.any),
                },
            }
        }
    }

    fn groups(graph: &Graph, id: NodeId) -> (Vec<ConnectorId>, Vec<ConnectorId>, Vec<ConnectorId>) {
        match &graph.node(id).unwrap().body {
            NodeBody::Action {
                inputs,
                modifiers,
                outputs,
            } => (inputs.clone(), modifiers.clone(), outputs.clone()),
            NodeBody::Variable { .. } => panic!("expected action node"),
        }
    }

    fn variable_connector(graph: &Graph, id: NodeId) -> ConnectorId {
        match &graph.node(id).unwrap().body {
            NodeBody::Variable { connector, .. } => *connector,
            NodeBody::Action { .. } => panic!("expected variable node"),
        }
    }

    #[test]
    fn test_insert_assigns_unique_names() {
        let f = Fixture::new();
        let mut graph = Graph::new();
        let a = graph.insert(&f.action_template(-1));
        let b = graph.insert(&f.action_template(-1));
        assert_eq!(graph.node(a).unwrap().display_name, "Action#0");
        assert_eq!(graph.node(b).unwrap().display_name, "Action#1");
    }

    #[test]
    fn test_connect_output_to_input() {
        let f = Fixture::new();
        let mut graph = Graph::new();
        let a = graph.insert(&f.action_template(-1));
        let b = graph.insert(&f.action_template(-1));
        let (_, _, a_out) = groups(&graph, a);
        let (b_in, _, _) = groups(&graph, b);

        let id = graph.connect(a_out[0], b_in[0], &f.types).unwrap();
        assert_eq!(graph.connector(a_out[0]).unwrap().connections(), &[id]);
        assert_eq!(graph.connector(b_in[0]).unwrap().connections(), &[id]);
    }

    #[test]
    fn test_connect_is_symmetric() {
        let f = Fixture::new();

        let mut forward = Graph::new();
        let a = forward.insert(&f.action_template(-1));
        let b = forward.insert(&f.action_template(-1));
        let (_, _, a_out) = groups(&forward, a);
        let (b_in, _, _) = groups(&forward, b);
        assert!(forward.connect(a_out[0], b_in[0], &f.types).is_ok());

        let mut reverse = Graph::new();
        let a = reverse.insert(&f.action_template(-1));
        let b = reverse.insert(&f.action_template(-1));
        let (_, _, a_out) = groups(&reverse, a);
        let (b_in, _, _) = groups(&reverse, b);
        assert!(reverse.connect(b_in[0], a_out[0], &f.types).is_ok());
    }

    #[test]
    fn test_same_kind_rejected() {
        let f = Fixture::new();
        let mut graph = Graph::new();
        let a = graph.insert(&f.action_template(-1));
        let b = graph.insert(&f.action_template(-1));
        let (_, _, a_out) = groups(&graph, a);
        let (_, _, b_out) = groups(&graph, b);

        assert_eq!(
            graph.connect(a_out[0], b_out[0], &f.types),
            Err(ConnectError::SameKind)
        );
        assert_eq!(graph.connector(a_out[0]).unwrap().connection_count(), 0);
        assert_eq!(graph.connector(b_out[0]).unwrap().connection_count(), 0);
    }

    #[test]
    fn test_modifier_requires_variable() {
        let f = Fixture::new();
        let mut graph = Graph::new();
        let a = graph.insert(&f.action_template(-1));
        let b = graph.insert(&f.action_template(-1));
        let (_, a_mods, _) = groups(&graph, a);
        let (b_in, _, _) = groups(&graph, b);

        // Types are irrelevant here; the kind rule fires first.
        assert_eq!(
            graph.connect(a_mods[0], b_in[0], &f.types),
            Err(ConnectError::ModifierNeedsVariable)
        );
    }

    #[test]
    fn test_modifier_accepts_variable() {
        let f = Fixture::new();
        let mut graph = Graph::new();
        let a = graph.insert(&f.action_template(-1));
        let v = graph.insert(&f.variable_template());
        let (_, a_mods, _) = groups(&graph, a);
        let var = variable_connector(&graph, v);

        assert!(graph.connect(a_mods[0], var, &f.types).is_ok());
    }

    #[test]
    fn test_same_node_rejected() {
        let f = Fixture::new();
        let mut graph = Graph::new();
        let a = graph.insert(&f.action_template(-1));
        let (a_in, _, a_out) = groups(&graph, a);

        assert_eq!(
            graph.connect(a_out[0], a_in[0], &f.types),
            Err(ConnectError::SelfConnection)
        );
    }

    #[test]
    fn test_incompatible_types_rejected() {
        let f = Fixture::new();
        let mut graph = Graph::new();

        // An input that only accepts value-typed nodes cannot take an
        // action node's output.
        let picky = NodeTemplate {
            id: "picky".to_string(),
            name: "Picky".to_string(),
            declared_type: f.action_ty,
            body: TemplateBody::Action {
                size: ACTION_SIZE,
                inputs: vec![ConnectorSpec::unbounded(
                    "In",
                    AcceptedType::One(f.value_ty),
                )],
                modifiers: vec![],
                outputs: vec![],
            },
        };
        let a = graph.insert(&f.action_template(-1));
        let b = graph.insert(&picky);
        let (_, _, a_out) = groups(&graph, a);
        let (b_in, _, _) = groups(&graph, b);

        assert_eq!(
            graph.connect(a_out[0], b_in[0], &f.types),
            Err(ConnectError::IncompatibleTypes)
        );
        assert_eq!(
            graph.connect(b_in[0], a_out[0], &f.types),
            Err(ConnectError::IncompatibleTypes)
        );
    }

    #[test]
    fn test_many_of_accepts_subtypes() {
        let f = Fixture::new();
        let mut graph = Graph::new();

        let collector = NodeTemplate {
            id: "collector".to_string(),
            name: "Collector".to_string(),
            declared_type: f.action_ty,
            body: TemplateBody::Action {
                size: ACTION_SIZE,
                inputs: vec![ConnectorSpec::unbounded(
                    "Items",
                    AcceptedType::ManyOf(f.any),
                )],
                modifiers: vec![],
                outputs: vec![],
            },
        };
        let a = graph.insert(&f.action_template(-1));
        let b = graph.insert(&collector);
        let (_, _, a_out) = groups(&graph, a);
        let (b_in, _, _) = groups(&graph, b);

        // Action subtypes Any, so the element relation holds.
        assert!(graph.connect(a_out[0], b_in[0], &f.types).is_ok());
    }

    #[test]
    fn test_capacity_enforced() {
        let f = Fixture::new();
        let mut graph = Graph::new();
        let a = graph.insert(&f.action_template(1));
        let b = graph.insert(&f.action_template(1));
        let c = graph.insert(&f.action_template(1));
        let (_, _, b_out) = groups(&graph, b);
        let (_, _, c_out) = groups(&graph, c);
        let (a_in, _, _) = groups(&graph, a);

        assert!(graph.connect(b_out[0], a_in[0], &f.types).is_ok());
        assert_eq!(
            graph.connect(c_out[0], a_in[0], &f.types),
            Err(ConnectError::AtCapacity)
        );
        assert_eq!(graph.connector(a_in[0]).unwrap().connection_count(), 1);
    }

    #[test]
    fn test_dual_registration() {
        let f = Fixture::new();
        let mut graph = Graph::new();
        let a = graph.insert(&f.action_template(-1));
        let b = graph.insert(&f.action_template(-1));
        let c = graph.insert(&f.action_template(-1));
        let (_, _, a_out) = groups(&graph, a);
        let (b_in, _, _) = groups(&graph, b);

        let id = graph.connect(a_out[0], b_in[0], &f.types).unwrap();

        let mut holders = 0;
        for node_id in [a, b, c] {
            for connector_id in graph.node(node_id).unwrap().connector_ids() {
                if graph
                    .connector(connector_id)
                    .unwrap()
                    .connections()
                    .contains(&id)
                {
                    holders += 1;
                }
            }
        }
        assert_eq!(holders, 2);
    }

    #[test]
    fn test_destroy_completeness() {
        let f = Fixture::new();
        let mut graph = Graph::new();
        let a = graph.insert(&f.action_template(-1));
        let b = graph.insert(&f.action_template(-1));
        let v = graph.insert(&f.variable_template());
        let (_, _, a_out) = groups(&graph, a);
        let (b_in, b_mods, _) = groups(&graph, b);
        let var = variable_connector(&graph, v);

        graph.connect(a_out[0], b_in[0], &f.types).unwrap();
        graph.connect(b_mods[0], var, &f.types).unwrap();
        assert_eq!(graph.node_connections(b).len(), 2);

        graph.destroy_node_connections(b);
        assert!(graph.node_connections(b).is_empty());
        assert!(graph.node_connections(a).is_empty());
        assert!(graph.node_connections(v).is_empty());
        assert_eq!(graph.connection_count(), 0);
    }

    #[test]
    fn test_destroy_connection_twice_is_noop() {
        let f = Fixture::new();
        let mut graph = Graph::new();
        let a = graph.insert(&f.action_template(-1));
        let b = graph.insert(&f.action_template(-1));
        let (_, _, a_out) = groups(&graph, a);
        let (b_in, _, _) = groups(&graph, b);

        let id = graph.connect(a_out[0], b_in[0], &f.types).unwrap();
        assert!(graph.destroy_connection(id).is_some());
        assert!(graph.destroy_connection(id).is_none());
    }

    #[test]
    fn test_remove_node_destroys_connections() {
        let f = Fixture::new();
        let mut graph = Graph::new();
        let a = graph.insert(&f.action_template(-1));
        let b = graph.insert(&f.action_template(-1));
        let (_, _, a_out) = groups(&graph, a);
        let (b_in, _, _) = groups(&graph, b);
        graph.connect(a_out[0], b_in[0], &f.types).unwrap();

        graph.remove_node(b);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.connection_count(), 0);
        assert!(graph.node_connections(a).is_empty());

        // Unknown id: nothing happens.
        assert!(graph.remove_node(b).is_none());
    }

    #[test]
    fn test_orphan_tracking() {
        let f = Fixture::new();
        let mut graph = Graph::new();
        let root = graph.insert(&f.action_template(-1));
        let a = graph.insert(&f.action_template(-1));

        // Freshly added, no incoming connections.
        assert!(graph.is_orphan(a));
        assert!(graph.has_orphans(false));
        assert_eq!(graph.orphans(false), vec![a]);

        // The root is skipped unless asked for.
        assert_eq!(graph.orphans(true), vec![root, a]);

        let (_, _, root_out) = groups(&graph, root);
        let (a_in, _, _) = groups(&graph, a);
        graph.connect(root_out[0], a_in[0], &f.types).unwrap();

        assert!(!graph.is_orphan(a));
        assert!(!graph.has_orphans(false));
    }

    #[test]
    fn test_variable_orphan() {
        let f = Fixture::new();
        let mut graph = Graph::new();
        let a = graph.insert(&f.action_template(-1));
        let v = graph.insert(&f.variable_template());
        assert!(graph.is_orphan(v));

        let (_, a_mods, _) = groups(&graph, a);
        let var = variable_connector(&graph, v);
        graph.connect(a_mods[0], var, &f.types).unwrap();
        assert!(!graph.is_orphan(v));
    }

    #[test]
    fn test_connection_label_names_far_end() {
        let f = Fixture::new();
        let mut graph = Graph::new();
        let a = graph.insert(&f.action_template(-1));
        let b = graph.insert(&f.action_template(-1));
        let stranger = graph.insert(&f.action_template(-1));
        let (_, _, a_out) = groups(&graph, a);
        let (b_in, _, _) = groups(&graph, b);
        let id = graph.connect(a_out[0], b_in[0], &f.types).unwrap();

        assert_eq!(
            graph.connection_label(id, a).as_deref(),
            Some("Action#1 (In)")
        );
        assert_eq!(
            graph.connection_label(id, b).as_deref(),
            Some("Action#0 (Out)")
        );
        assert_eq!(graph.connection_label(id, stranger), None);
    }

    #[test]
    fn test_connector_anchor_offsets() {
        let f = Fixture::new();
        let mut graph = Graph::new();
        let a = graph.insert(&f.action_template(-1));
        graph.node_mut(a).unwrap().set_position(100.0, 50.0);
        let (a_in, a_mods, _) = groups(&graph, a);

        // Inputs carry the +4 glyph offset, modifiers do not.
        assert_eq!(graph.connector_anchor(a_in[0]), Some([100.0, 74.0]));
        let modifier = graph.connector(a_mods[0]).unwrap();
        let expected = [
            100.0 + modifier.position[0],
            50.0 + modifier.position[1],
        ];
        assert_eq!(graph.connector_anchor(a_mods[0]), Some(expected));
    }

    #[test]
    fn test_connector_at_action_bands() {
        let f = Fixture::new();
        let mut graph = Graph::new();
        let a = graph.insert(&f.action_template(-1));
        let (a_in, a_mods, a_out) = groups(&graph, a);

        // Left strip hits the first input row.
        assert_eq!(graph.connector_at(a, [4.0, 24.0]), Some(a_in[0]));
        // Right strip hits the first output row.
        assert_eq!(graph.connector_at(a, [196.0, 24.0]), Some(a_out[0]));
        // Bottom strip hits the first modifier glyph.
        assert_eq!(graph.connector_at(a, [32.0, 96.0]), Some(a_mods[0]));
        // Body center hits nothing.
        assert_eq!(graph.connector_at(a, [100.0, 50.0]), None);
    }

    #[test]
    fn test_connector_at_variable_is_whole_body() {
        let f = Fixture::new();
        let mut graph = Graph::new();
        let v = graph.insert(&f.variable_template());
        let var = variable_connector(&graph, v);
        assert_eq!(graph.connector_at(v, [10.0, 70.0]), Some(var));
    }

    #[test]
    fn test_mark_connections_not_rendered() {
        let f = Fixture::new();
        let mut graph = Graph::new();
        let a = graph.insert(&f.action_template(-1));
        let b = graph.insert(&f.action_template(-1));
        let (_, _, a_out) = groups(&graph, a);
        let (b_in, _, _) = groups(&graph, b);
        let id = graph.connect(a_out[0], b_in[0], &f.types).unwrap();

        graph.connection_mut(id).unwrap().rendered = true;
        graph.mark_connections_not_rendered();
        assert!(!graph.connection(id).unwrap().rendered);
    }
}
