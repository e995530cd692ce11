// SPDX-License-Identifier: MIT OR Apache-2.0
//! The editor surface: viewport transform and the interaction state
//! machine.
//!
//! The surface consumes typed input events and mutates the graph through
//! its commands, so every transition is testable without a windowing or
//! graphics backend. The egui adapter in [`crate::ui`] translates real
//! input into these events and paints the result.

use crate::connector::{ConnectorId, ConnectorKind};
use crate::graph::Graph;
use crate::node::{NodeId, NodeTemplate};
use crate::types::TypeRegistry;
use tracing::debug;

/// Gap between the control edge and the workspace rectangle
pub const SURFACE_MARGIN: f32 = 10.0;
/// Inner padding between the workspace border and node space
pub const SURFACE_PADDING: f32 = 8.0;
/// Default workspace rectangle size in workspace units
pub const DEFAULT_WORKSPACE_SIZE: [f32; 2] = [4000.0, 2000.0];

/// Pointer button identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Selection / dragging
    Primary,
    /// Panning / context menu
    Secondary,
}

/// Keys the surface reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKey {
    /// Held to drag the selected node
    DragModifier,
    /// Removes the selected node on release
    Delete,
}

/// A typed input event delivered by the host
#[derive(Debug, Clone, Copy)]
pub enum InputEvent {
    /// A pointer button was pressed at a screen position
    PointerDown {
        /// Which button
        button: PointerButton,
        /// Screen position
        pos: [f32; 2],
    },
    /// The pointer moved
    PointerMove {
        /// Screen position
        pos: [f32; 2],
        /// Whether the primary button is held
        primary_down: bool,
    },
    /// A pointer button was released
    PointerUp {
        /// Which button
        button: PointerButton,
        /// Screen position
        pos: [f32; 2],
    },
    /// A key was pressed
    KeyDown(SurfaceKey),
    /// A key was released
    KeyUp(SurfaceKey),
}

/// Notification emitted by the surface for the host application
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceEvent {
    /// The selected node changed; `None` means the selection was cleared
    SelectionChanged(Option<NodeId>),
    /// A secondary-button click without panning asked for a context menu
    ContextMenuRequested {
        /// Screen x of the release
        x: f32,
        /// Screen y of the release
        y: f32,
    },
}

/// Current interaction mode
#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum Mode {
    #[default]
    Idle,
    PanningView {
        last_cursor: [f32; 2],
        moved: bool,
    },
    DraggingNode,
    DraggingConnection {
        cursor: [f32; 2],
    },
}

/// The editor surface: pan/zoom viewport state plus the interaction state
/// machine orchestrating hit-testing, selection and graph mutation
#[derive(Debug)]
pub struct Surface {
    /// Pan offset in workspace units, clamped to >= 0 on both axes
    offset: [f32; 2],
    zoom: f32,
    workspace_size: [f32; 2],
    /// Host viewport size in screen units, used for auto-centering
    viewport_size: [f32; 2],
    mode: Mode,
    selected_node: Option<NodeId>,
    selected_connector: Option<ConnectorId>,
    /// Node-local grab point recorded on selection
    selection_offset: [f32; 2],
    highlighted_connector: Option<ConnectorId>,
    modifier_down: bool,
    needs_repaint: bool,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface {
    /// Create a surface with the default workspace size
    pub fn new() -> Self {
        Self {
            offset: [0.0, 0.0],
            zoom: 1.0,
            workspace_size: DEFAULT_WORKSPACE_SIZE,
            viewport_size: [0.0, 0.0],
            mode: Mode::Idle,
            selected_node: None,
            selected_connector: None,
            selection_offset: [0.0, 0.0],
            highlighted_connector: None,
            modifier_down: false,
            needs_repaint: false,
        }
    }

    /// Change the size of the workspace rectangle
    pub fn set_workspace_size(&mut self, width: f32, height: f32) {
        self.workspace_size = [width, height];
    }

    /// Workspace rectangle size
    pub fn workspace_size(&self) -> [f32; 2] {
        self.workspace_size
    }

    /// Current zoom factor
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Set the zoom factor, clamped to a usable range
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(0.1, 2.0);
        self.needs_repaint = true;
    }

    /// Current pan offset
    pub fn offset(&self) -> [f32; 2] {
        self.offset
    }

    /// Update the host viewport size; called by the adapter every frame
    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.viewport_size = [width, height];
    }

    /// The currently selected node
    pub fn selected_node(&self) -> Option<NodeId> {
        self.selected_node
    }

    /// The connector recorded as a pending connection source
    pub fn selected_connector(&self) -> Option<ConnectorId> {
        self.selected_connector
    }

    /// True while the view is being panned; the host should hide the
    /// cursor
    pub fn cursor_hidden(&self) -> bool {
        matches!(self.mode, Mode::PanningView { .. })
    }

    /// Live connection drag, as (source connector, cursor screen position)
    pub fn connection_drag(&self) -> Option<(ConnectorId, [f32; 2])> {
        match (self.mode, self.selected_connector) {
            (Mode::DraggingConnection { cursor }, Some(source)) => Some((source, cursor)),
            _ => None,
        }
    }

    /// Consume the repaint request set by state-changing operations
    pub fn take_repaint(&mut self) -> bool {
        std::mem::take(&mut self.needs_repaint)
    }

    /// Origin of node space in unzoomed screen units: margin plus border
    /// plus padding, shifted back by the pan offset
    pub fn view_origin(&self) -> [f32; 2] {
        [
            SURFACE_MARGIN + 1.0 + SURFACE_PADDING - self.offset[0],
            SURFACE_MARGIN + 1.0 + SURFACE_PADDING - self.offset[1],
        ]
    }

    /// Find the node under a screen position.
    ///
    /// Walks nodes most-recently-added first so the top-most node wins on
    /// overlap, and yields the hit point in node-local coordinates.
    pub fn node_at(&self, graph: &Graph, pos: [f32; 2]) -> Option<(NodeId, [f32; 2])> {
        let origin = self.view_origin();
        for node in graph.nodes_rev() {
            let min = [
                (node.position[0] + origin[0]) * self.zoom,
                (node.position[1] + origin[1]) * self.zoom,
            ];
            let max = [
                (node.position[0] + node.size[0] + origin[0]) * self.zoom,
                (node.position[1] + node.size[1] + origin[1]) * self.zoom,
            ];
            if pos[0] >= min[0] && pos[1] >= min[1] && pos[0] <= max[0] && pos[1] <= max[1] {
                let local = [
                    pos[0] / self.zoom - (node.position[0] + origin[0]),
                    pos[1] / self.zoom - (node.position[1] + origin[1]),
                ];
                return Some((node.id, local));
            }
        }
        None
    }

    /// Whether any node sits under a screen position
    pub fn is_node_at(&self, graph: &Graph, pos: [f32; 2]) -> bool {
        self.node_at(graph, pos).is_some()
    }

    /// Add a node centered in the current view
    pub fn add_item(&mut self, graph: &mut Graph, template: &NodeTemplate) -> NodeId {
        let size = template.size();
        let x = self.viewport_size[0] / self.zoom / 2.0 - size[0] / 2.0;
        let y = self.viewport_size[1] / self.zoom / 2.0 - size[1] / 2.0;
        self.add_item_at(graph, template, x, y)
    }

    /// Add a node at a position relative to the current view's top-left
    /// corner
    pub fn add_item_at(
        &mut self,
        graph: &mut Graph,
        template: &NodeTemplate,
        x: f32,
        y: f32,
    ) -> NodeId {
        let id = graph.insert(template);
        if let Some(node) = graph.node_mut(id) {
            node.set_position(self.offset[0] + x, self.offset[1] + y);
        }
        self.needs_repaint = true;
        id
    }

    /// Remove a node and all of its connections from the graph
    pub fn remove_item(&mut self, graph: &mut Graph, node_id: NodeId) {
        if graph.remove_node(node_id).is_some() {
            if self.selected_node == Some(node_id) {
                self.selected_node = None;
                self.selected_connector = None;
            }
            self.needs_repaint = true;
        }
    }

    /// Feed one input event through the state machine
    pub fn handle_event(
        &mut self,
        graph: &mut Graph,
        types: &TypeRegistry,
        event: InputEvent,
    ) -> Vec<SurfaceEvent> {
        let mut events = Vec::new();
        match event {
            InputEvent::PointerDown { button, pos } => {
                self.on_pointer_down(graph, button, pos, &mut events);
            }
            InputEvent::PointerMove { pos, primary_down } => {
                self.on_pointer_move(graph, pos, primary_down);
            }
            InputEvent::PointerUp { button, pos } => {
                self.on_pointer_up(graph, types, button, pos, &mut events);
            }
            InputEvent::KeyDown(SurfaceKey::DragModifier) => self.modifier_down = true,
            InputEvent::KeyUp(SurfaceKey::DragModifier) => self.modifier_down = false,
            InputEvent::KeyDown(SurfaceKey::Delete) => {}
            InputEvent::KeyUp(SurfaceKey::Delete) => {
                if let Some(node_id) = self.selected_node {
                    self.remove_item(graph, node_id);
                }
            }
        }
        events
    }

    fn on_pointer_down(
        &mut self,
        graph: &mut Graph,
        button: PointerButton,
        pos: [f32; 2],
        events: &mut Vec<SurfaceEvent>,
    ) {
        match button {
            PointerButton::Secondary => {
                self.mode = Mode::PanningView {
                    last_cursor: pos,
                    moved: false,
                };
            }
            PointerButton::Primary => {
                self.clear_selection(graph, events);

                if let Some((node_id, local)) = self.node_at(graph, pos) {
                    if let Some(node) = graph.node_mut(node_id) {
                        node.selected = true;
                    }
                    self.selected_node = Some(node_id);
                    self.selection_offset = local;
                    self.selected_connector = graph.connector_at(node_id, local);
                    events.push(SurfaceEvent::SelectionChanged(Some(node_id)));
                }

                self.needs_repaint = true;
            }
        }
    }

    fn on_pointer_move(&mut self, graph: &mut Graph, pos: [f32; 2], primary_down: bool) {
        self.clear_highlight(graph);

        if let Mode::PanningView { last_cursor, moved } = &mut self.mode {
            self.offset[0] = (self.offset[0] + last_cursor[0] - pos[0]).max(0.0);
            self.offset[1] = (self.offset[1] + last_cursor[1] - pos[1]).max(0.0);
            if pos != *last_cursor {
                *moved = true;
            }
            *last_cursor = pos;
            self.needs_repaint = true;
            return;
        }

        if primary_down && self.modifier_down {
            if let Some(node_id) = self.selected_node {
                // Node drag cancels any connection drag in progress.
                self.mode = Mode::DraggingNode;
                let origin = self.view_origin();
                if let Some(node) = graph.node_mut(node_id) {
                    node.set_position(
                        pos[0] / self.zoom - origin[0] - self.selection_offset[0],
                        pos[1] / self.zoom - origin[1] - self.selection_offset[1],
                    );
                }
                self.needs_repaint = true;
                return;
            }
        }

        if primary_down {
            if let Some(source) = self.selected_connector {
                let draggable = graph.connector(source).is_some_and(|c| {
                    matches!(c.kind, ConnectorKind::Output | ConnectorKind::Modifier)
                });
                if draggable {
                    self.mode = Mode::DraggingConnection { cursor: pos };

                    if let Some(target) = self.connector_under(graph, pos) {
                        if target != source {
                            if let Some(connector) = graph.connector_mut(target) {
                                connector.highlighted = true;
                            }
                            self.highlighted_connector = Some(target);
                        }
                    }
                    self.needs_repaint = true;
                }
            }
        }
    }

    fn on_pointer_up(
        &mut self,
        graph: &mut Graph,
        types: &TypeRegistry,
        button: PointerButton,
        pos: [f32; 2],
        events: &mut Vec<SurfaceEvent>,
    ) {
        self.clear_highlight(graph);

        match button {
            PointerButton::Primary => {
                if let Mode::DraggingConnection { .. } = self.mode {
                    if let (Some(source), Some(target)) =
                        (self.selected_connector, self.connector_under(graph, pos))
                    {
                        if let Err(err) = graph.connect(source, target, types) {
                            debug!(%err, "connection rejected");
                        }
                    }
                }
                if matches!(self.mode, Mode::DraggingConnection { .. } | Mode::DraggingNode) {
                    self.mode = Mode::Idle;
                }
                self.needs_repaint = true;
            }
            PointerButton::Secondary => {
                if let Mode::PanningView { moved, .. } = self.mode {
                    self.mode = Mode::Idle;
                    if !moved {
                        events.push(SurfaceEvent::ContextMenuRequested {
                            x: pos[0],
                            y: pos[1],
                        });
                    }
                }
            }
        }
    }

    /// Hit-test for a connector under a screen position
    fn connector_under(&self, graph: &Graph, pos: [f32; 2]) -> Option<ConnectorId> {
        let (node_id, local) = self.node_at(graph, pos)?;
        graph.connector_at(node_id, local)
    }

    fn clear_selection(&mut self, graph: &mut Graph, events: &mut Vec<SurfaceEvent>) {
        if let Some(node) = self.selected_node.and_then(|id| graph.node_mut(id)) {
            node.selected = false;
        }
        self.selected_node = None;
        self.selected_connector = None;
        events.push(SurfaceEvent::SelectionChanged(None));
    }

    fn clear_highlight(&mut self, graph: &mut Graph) {
        if let Some(connector) = self
            .highlighted_connector
            .take()
            .and_then(|id| graph.connector_mut(id))
        {
            connector.highlighted = false;
        }
    }
}
