// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions: graph vertices and the templates they are built from.

use crate::connector::{ConnectorId, ConnectorSpec};
use crate::types::{AcceptedType, TypeId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default action node size in workspace units
pub const ACTION_SIZE: [f32; 2] = [200.0, 100.0];
/// Default variable node size in workspace units
pub const VARIABLE_SIZE: [f32; 2] = [80.0, 80.0];
/// Horizontal inset of the action body; also the width of the connector
/// strips on either edge
pub const NODE_MARGIN: f32 = 8.0;
/// Vertical offset of the first input/output row below the header
pub const CONNECTOR_START_Y: f32 = 20.0;
/// Vertical distance between input/output rows
pub const CONNECTOR_ROW_PITCH: f32 = 12.0;
/// Horizontal offset of the first modifier glyph
pub const MODIFIER_START_X: f32 = 30.0;
/// Horizontal distance between modifier glyphs
pub const MODIFIER_PITCH: f32 = 30.0;
/// Extra vertical inset between a connector row and its glyph
pub const CONNECTOR_TOP_MARGIN: f32 = 4.0;
/// Side length of a connector glyph
pub const CONNECTOR_GLYPH: f32 = 8.0;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Node classification tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Structural node with input/modifier/output connector groups
    Action,
    /// Value node with a single variable connector
    Variable,
}

/// Connector layout description for a template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TemplateBody {
    /// A structural node
    Action {
        /// Node size in workspace units
        size: [f32; 2],
        /// Input connectors, top to bottom on the left edge
        inputs: Vec<ConnectorSpec>,
        /// Modifier connectors, left to right along the bottom edge
        modifiers: Vec<ConnectorSpec>,
        /// Output connectors, top to bottom on the right edge
        outputs: Vec<ConnectorSpec>,
    },
    /// A value node
    Variable {
        /// Displayed value text
        value: String,
        /// What the variable's single connector accepts
        accepted: AcceptedType,
    },
}

/// Node type definition supplied by the application.
///
/// This is the only place catalog data enters the core: the core never
/// hard-codes a node vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeTemplate {
    /// Unique type identifier
    pub id: String,
    /// Base display name; instances get unique `name#N` names
    pub name: String,
    /// The runtime type the connect rules test connectors against
    pub declared_type: TypeId,
    /// Connector layout
    pub body: TemplateBody,
}

impl NodeTemplate {
    /// Node size for instances of this template
    pub fn size(&self) -> [f32; 2] {
        match &self.body {
            TemplateBody::Action { size, .. } => *size,
            TemplateBody::Variable { .. } => VARIABLE_SIZE,
        }
    }
}

/// Registry of available node templates
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: indexmap::IndexMap<String, NodeTemplate>,
}

impl TemplateRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template
    pub fn register(&mut self, template: NodeTemplate) {
        self.templates.insert(template.id.clone(), template);
    }

    /// Get a template by ID
    pub fn get(&self, id: &str) -> Option<&NodeTemplate> {
        self.templates.get(id)
    }

    /// All registered templates
    pub fn templates(&self) -> impl Iterator<Item = &NodeTemplate> {
        self.templates.values()
    }
}

/// Per-kind node payload: the connectors are arena handles, never owned
/// references
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NodeBody {
    /// Structural node connector groups
    Action {
        /// Input connectors on the left edge
        inputs: Vec<ConnectorId>,
        /// Modifier connectors along the bottom edge
        modifiers: Vec<ConnectorId>,
        /// Output connectors on the right edge
        outputs: Vec<ConnectorId>,
    },
    /// Value node payload
    Variable {
        /// The single variable connector
        connector: ConnectorId,
        /// Displayed value text
        value: String,
    },
}

/// A node instance placed on the surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Template this node was built from
    pub template_id: String,
    /// Unique display name assigned on insertion
    pub display_name: String,
    /// The runtime type the connect rules test connectors against
    pub declared_type: TypeId,
    /// Top-left corner in workspace units
    pub position: [f32; 2],
    /// Size in workspace units
    pub size: [f32; 2],
    /// Whether the node is currently selected
    pub selected: bool,
    /// Per-kind payload
    pub body: NodeBody,
}

impl Node {
    /// Node classification tag
    pub fn kind(&self) -> NodeKind {
        match self.body {
            NodeBody::Action { .. } => NodeKind::Action,
            NodeBody::Variable { .. } => NodeKind::Variable,
        }
    }

    /// All connector handles of this node, in render order
    pub fn connector_ids(&self) -> Vec<ConnectorId> {
        match &self.body {
            NodeBody::Action {
                inputs,
                modifiers,
                outputs,
            } => inputs
                .iter()
                .chain(modifiers.iter())
                .chain(outputs.iter())
                .copied()
                .collect(),
            NodeBody::Variable { connector, .. } => vec![*connector],
        }
    }

    /// Input connector handles; empty for variable nodes
    pub fn input_ids(&self) -> &[ConnectorId] {
        match &self.body {
            NodeBody::Action { inputs, .. } => inputs,
            NodeBody::Variable { .. } => &[],
        }
    }

    /// Human label for one of this node's connectors.
    ///
    /// Action nodes combine node and connector names; a variable node is
    /// labeled by its own name since it only has one port.
    pub fn label_for(&self, connector_name: &str) -> String {
        match self.body {
            NodeBody::Action { .. } => format!("{} ({})", self.display_name, connector_name),
            NodeBody::Variable { .. } => self.display_name.clone(),
        }
    }

    /// Move the node to the given workspace position
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.position = [x, y];
    }
}
