// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node graph core for the `NodeWire` editor.
//!
//! This crate provides the editor-agnostic pieces of a visual node-graph
//! editor:
//! - Typed connectors with capacity limits and a subtype-aware connect rule
//! - A graph arena owning nodes, connectors and connections
//! - Pan/select/drag interaction as a pure event-driven state machine
//! - Orphan analysis for unreachable nodes
//! - An egui painting adapter on top of the state machine
//!
//! ## Architecture
//!
//! All coordinates below the adapter are workspace units; the surface owns
//! the pan offset and zoom and is the only place screen coordinates exist.
//! Nodes are stamped out of application-supplied [`node::NodeTemplate`]s,
//! so the core carries no node vocabulary of its own.

pub mod catalog;
pub mod connection;
pub mod connector;
pub mod graph;
pub mod naming;
pub mod node;
pub mod surface;
pub mod types;
pub mod ui;

pub use connection::{Connection, ConnectionId};
pub use connector::{Connector, ConnectorId, ConnectorKind, ConnectorSpec};
pub use graph::{ConnectError, Graph};
pub use node::{Node, NodeId, NodeKind, NodeTemplate, TemplateRegistry};
pub use surface::{InputEvent, PointerButton, Surface, SurfaceEvent, SurfaceKey};
pub use types::{AcceptedType, TypeId, TypeRegistry};
