// SPDX-License-Identifier: MIT OR Apache-2.0
//! egui adapter for the editor surface.
//!
//! Translates egui pointer/keyboard input into the typed events consumed
//! by [`Surface`] and paints the workspace, connections and nodes. All
//! interaction logic lives in [`crate::surface`]; this module only moves
//! pixels.

use crate::connector::Connector;
use crate::graph::Graph;
use crate::node::{
    Node, NodeBody, NodeId, CONNECTOR_GLYPH, CONNECTOR_TOP_MARGIN, NODE_MARGIN,
};
use crate::surface::{
    InputEvent, PointerButton, Surface, SurfaceEvent, SurfaceKey, SURFACE_MARGIN,
};
use crate::types::TypeRegistry;
use egui::{Align2, Color32, FontId, Pos2, Rect, Stroke};

/// Control background behind the workspace
const BACKGROUND_COLOR: Color32 = Color32::from_rgb(38, 38, 38);
/// Workspace rectangle fill
const WORKSPACE_COLOR: Color32 = Color32::from_rgb(153, 153, 153);
/// Workspace and node borders
const BORDER_COLOR: Color32 = Color32::BLACK;
/// Node body fill
const NODE_FILL: Color32 = Color32::from_rgb(102, 102, 102);
/// Selection and drag-candidate highlight
const HIGHLIGHT_COLOR: Color32 = Color32::from_rgb(255, 255, 0);
/// Label text
const TEXT_COLOR: Color32 = Color32::WHITE;

/// Samples per connection curve half
const CURVE_SEGMENTS: usize = 16;

/// A connection curve scheduled for drawing
struct Curve {
    from: Pos2,
    to: Pos2,
    color: Color32,
}

impl Surface {
    /// Run the surface for one frame: feed input, paint, and return the
    /// notifications raised by the interaction state machine.
    pub fn ui(
        &mut self,
        ui: &mut egui::Ui,
        graph: &mut Graph,
        types: &TypeRegistry,
    ) -> Vec<SurfaceEvent> {
        let rect = ui.available_rect_before_wrap();
        let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        self.set_viewport_size(rect.width(), rect.height());

        let mut raised = Vec::new();
        for event in gather_input(ui, &response, rect) {
            raised.extend(self.handle_event(graph, types, event));
        }

        if self.cursor_hidden() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::None);
        }
        if self.take_repaint() {
            ui.ctx().request_repaint();
        }

        self.paint(&painter, rect, graph, types);
        raised
    }

    fn paint(&self, painter: &egui::Painter, rect: Rect, graph: &mut Graph, types: &TypeRegistry) {
        graph.mark_connections_not_rendered();

        painter.rect_filled(rect, 0.0, BACKGROUND_COLOR);
        self.paint_workspace(painter, rect);

        if let Some((source, cursor)) = self.connection_drag() {
            self.paint_live_drag(painter, rect, graph, types, source, cursor);
        }

        self.paint_connections(painter, rect, graph, types);

        for node in graph.nodes() {
            match &node.body {
                NodeBody::Action { .. } => self.paint_action_node(painter, rect, graph, types, node),
                NodeBody::Variable { value, .. } => {
                    self.paint_variable_node(painter, rect, node, value);
                }
            }
        }
    }

    /// Map a workspace point to screen space
    fn to_screen(&self, rect: Rect, point: [f32; 2]) -> Pos2 {
        let origin = self.view_origin();
        Pos2::new(
            rect.left() + (point[0] + origin[0]) * self.zoom(),
            rect.top() + (point[1] + origin[1]) * self.zoom(),
        )
    }

    fn paint_workspace(&self, painter: &egui::Painter, rect: Rect) {
        let offset = self.offset();
        let size = self.workspace_size();
        let workspace = Rect::from_min_max(
            Pos2::new(
                rect.left() + SURFACE_MARGIN - offset[0],
                rect.top() + SURFACE_MARGIN - offset[1],
            ),
            Pos2::new(
                rect.left() + SURFACE_MARGIN + size[0] - offset[0],
                rect.top() + SURFACE_MARGIN + size[1] - offset[1],
            ),
        );
        painter.rect_filled(workspace, 0.0, WORKSPACE_COLOR);
        painter.rect_stroke(workspace, 0.0, Stroke::new(1.0, BORDER_COLOR));
    }

    /// Screen position of a connector's glyph center
    fn anchor_screen(&self, rect: Rect, graph: &Graph, connector: &Connector) -> Option<Pos2> {
        let anchor = graph.connector_anchor(connector.id)?;
        let half = CONNECTOR_GLYPH / 2.0;
        Some(self.to_screen(rect, [anchor[0] + half, anchor[1] + half]))
    }

    fn paint_live_drag(
        &self,
        painter: &egui::Painter,
        rect: Rect,
        graph: &Graph,
        types: &TypeRegistry,
        source: crate::connector::ConnectorId,
        cursor: [f32; 2],
    ) {
        let Some(connector) = graph.connector(source) else {
            return;
        };
        let Some(from) = self.anchor_screen(rect, graph, connector) else {
            return;
        };
        let to = Pos2::new(rect.left() + cursor[0], rect.top() + cursor[1]);
        let [r, g, b] = types.color(connector.accepted.element());
        painter.line_segment([from, to], Stroke::new(1.0, Color32::from_rgb(r, g, b)));
    }

    /// Draw every connection once.
    ///
    /// Each node draws its connectors' connections in list order and marks
    /// them rendered; later passes skip a rendered connection. Exceptions:
    /// the selected node's pass ignores the flag, and connections whose far
    /// endpoint sits on the selected node are left to that node's pass, so
    /// the highlight state always shows.
    fn paint_connections(
        &self,
        painter: &egui::Painter,
        rect: Rect,
        graph: &mut Graph,
        types: &TypeRegistry,
    ) {
        let node_ids: Vec<NodeId> = graph.node_ids().collect();
        for node_id in node_ids {
            for curve in self.collect_connection_curves(rect, graph, types, node_id) {
                let points = connection_curve(curve.from, curve.to);
                for pair in points.windows(2) {
                    painter.line_segment([pair[0], pair[1]], Stroke::new(1.0, curve.color));
                }
            }
        }
    }

    /// One node's share of the connection pass: the curves it draws this
    /// frame, with the drawn connections marked rendered
    fn collect_connection_curves(
        &self,
        rect: Rect,
        graph: &mut Graph,
        types: &TypeRegistry,
        node_id: NodeId,
    ) -> Vec<Curve> {
        let mut curves = Vec::new();
        let mut drawn = Vec::new();

        {
            let Some(node) = graph.node(node_id) else {
                return curves;
            };
            let selected = node.selected;
            for connector_id in node.connector_ids() {
                let Some(connector) = graph.connector(connector_id) else {
                    continue;
                };
                for connection_id in connector.connections() {
                    let Some(connection) = graph.connection(*connection_id) else {
                        continue;
                    };
                    if connection.rendered && !selected {
                        continue;
                    }

                    let start = graph.connector(connection.start);
                    let end = graph.connector(connection.end);
                    let (Some(start), Some(end)) = (start, end) else {
                        continue;
                    };
                    // Defer to the selected far endpoint's pass.
                    let far_selected = |c: &Connector| {
                        c.node != node_id && graph.node(c.node).is_some_and(|n| n.selected)
                    };
                    if far_selected(start) || far_selected(end) {
                        continue;
                    }

                    let from = self.anchor_screen(rect, graph, start);
                    let to = self.anchor_screen(rect, graph, end);
                    let (Some(from), Some(to)) = (from, to) else {
                        continue;
                    };

                    let color = if selected || connection.highlight {
                        HIGHLIGHT_COLOR
                    } else {
                        let [r, g, b] = types.color(connector.accepted.element());
                        Color32::from_rgb(r, g, b)
                    };
                    curves.push(Curve { from, to, color });
                    drawn.push(*connection_id);
                }
            }
        }

        for id in drawn {
            if let Some(connection) = graph.connection_mut(id) {
                connection.rendered = true;
            }
        }
        curves
    }

    fn paint_action_node(
        &self,
        painter: &egui::Painter,
        rect: Rect,
        graph: &Graph,
        types: &TypeRegistry,
        node: &Node,
    ) {
        let zoom = self.zoom();
        let [x, y] = node.position;
        let [width, height] = node.size;

        let body = Rect::from_min_max(
            self.to_screen(rect, [x + NODE_MARGIN, y]),
            self.to_screen(rect, [x + width - NODE_MARGIN, y + height - NODE_MARGIN]),
        );
        painter.rect_filled(body, 0.0, NODE_FILL);
        let border = if node.selected {
            HIGHLIGHT_COLOR
        } else {
            BORDER_COLOR
        };
        painter.rect_stroke(body, 0.0, Stroke::new(1.0, border));

        painter.text(
            Pos2::new(body.center().x, body.top() + 8.0 * zoom),
            Align2::CENTER_CENTER,
            &node.display_name,
            FontId::proportional(12.0 * zoom),
            TEXT_COLOR,
        );

        let NodeBody::Action {
            inputs,
            modifiers,
            outputs,
        } = &node.body
        else {
            return;
        };

        for id in inputs {
            let Some(connector) = graph.connector(*id) else {
                continue;
            };
            let top = y + connector.position[1] + CONNECTOR_TOP_MARGIN;
            let glyph = Rect::from_min_max(
                self.to_screen(rect, [x, top]),
                self.to_screen(rect, [x + NODE_MARGIN, top + CONNECTOR_GLYPH]),
            );
            painter.rect_filled(glyph, 0.0, self.glyph_color(types, connector, node));
            painter.text(
                self.to_screen(rect, [x + NODE_MARGIN + 5.0, y + connector.position[1]]),
                Align2::LEFT_TOP,
                &connector.name,
                FontId::proportional(10.0 * zoom),
                TEXT_COLOR,
            );
        }

        for id in outputs {
            let Some(connector) = graph.connector(*id) else {
                continue;
            };
            let left = x + connector.position[0];
            let top = y + connector.position[1] + CONNECTOR_TOP_MARGIN;
            let glyph = Rect::from_min_max(
                self.to_screen(rect, [left, top]),
                self.to_screen(rect, [left + CONNECTOR_GLYPH, top + CONNECTOR_GLYPH]),
            );
            painter.rect_filled(glyph, 0.0, self.glyph_color(types, connector, node));
            painter.text(
                self.to_screen(rect, [left - 5.0, y + connector.position[1]]),
                Align2::RIGHT_TOP,
                &connector.name,
                FontId::proportional(10.0 * zoom),
                TEXT_COLOR,
            );
        }

        for id in modifiers {
            let Some(connector) = graph.connector(*id) else {
                continue;
            };
            let left = x + connector.position[0];
            let top = y + connector.position[1];
            let glyph = Rect::from_min_max(
                self.to_screen(rect, [left, top]),
                self.to_screen(rect, [left + CONNECTOR_GLYPH, top + CONNECTOR_GLYPH]),
            );
            painter.rect_filled(glyph, 0.0, self.glyph_color(types, connector, node));
            painter.text(
                self.to_screen(rect, [left + CONNECTOR_GLYPH / 2.0, top - 15.0]),
                Align2::CENTER_TOP,
                &connector.name,
                FontId::proportional(10.0 * zoom),
                TEXT_COLOR,
            );
        }
    }

    fn glyph_color(&self, types: &TypeRegistry, connector: &Connector, node: &Node) -> Color32 {
        if connector.highlighted || node.selected {
            HIGHLIGHT_COLOR
        } else {
            let [r, g, b] = types.color(connector.accepted.element());
            Color32::from_rgb(r, g, b)
        }
    }

    fn paint_variable_node(&self, painter: &egui::Painter, rect: Rect, node: &Node, value: &str) {
        let zoom = self.zoom();
        let center = self.to_screen(
            rect,
            [
                node.position[0] + node.size[0] / 2.0,
                node.position[1] + node.size[1] / 2.0,
            ],
        );
        let radius = node.size[0] / 2.0 * zoom;
        let border = if node.selected {
            HIGHLIGHT_COLOR
        } else {
            BORDER_COLOR
        };

        painter.circle_filled(center, radius, NODE_FILL);
        painter.circle_stroke(center, radius, Stroke::new(1.0, border));
        painter.text(
            center,
            Align2::CENTER_CENTER,
            value,
            FontId::proportional(12.0 * zoom),
            TEXT_COLOR,
        );
        painter.text(
            Pos2::new(center.x, center.y + radius + 4.0),
            Align2::CENTER_TOP,
            &node.display_name,
            FontId::proportional(10.0 * zoom),
            TEXT_COLOR,
        );
    }
}

/// Translate this frame's egui input into surface events
fn gather_input(ui: &egui::Ui, response: &egui::Response, rect: Rect) -> Vec<InputEvent> {
    let mut events = Vec::new();
    let hovered = response.hovered();

    ui.input(|i| {
        let pos = i
            .pointer
            .latest_pos()
            .map(|p| [p.x - rect.left(), p.y - rect.top()]);

        events.push(if i.modifiers.ctrl {
            InputEvent::KeyDown(SurfaceKey::DragModifier)
        } else {
            InputEvent::KeyUp(SurfaceKey::DragModifier)
        });

        if let Some(pos) = pos {
            if hovered {
                if i.pointer.button_pressed(egui::PointerButton::Primary) {
                    events.push(InputEvent::PointerDown {
                        button: PointerButton::Primary,
                        pos,
                    });
                }
                if i.pointer.button_pressed(egui::PointerButton::Secondary) {
                    events.push(InputEvent::PointerDown {
                        button: PointerButton::Secondary,
                        pos,
                    });
                }
            }

            events.push(InputEvent::PointerMove {
                pos,
                primary_down: i.pointer.primary_down(),
            });

            if i.pointer.button_released(egui::PointerButton::Primary) {
                events.push(InputEvent::PointerUp {
                    button: PointerButton::Primary,
                    pos,
                });
            }
            if i.pointer.button_released(egui::PointerButton::Secondary) {
                events.push(InputEvent::PointerUp {
                    button: PointerButton::Secondary,
                    pos,
                });
            }
        }

        if i.key_pressed(egui::Key::Delete) {
            events.push(InputEvent::KeyDown(SurfaceKey::Delete));
        }
        if i.key_released(egui::Key::Delete) {
            events.push(InputEvent::KeyUp(SurfaceKey::Delete));
        }
    });

    events
}

/// Sample the connection curve between two anchor points: two cubic
/// halves meeting at the midpoint, control points at the midpoint's x at
/// each endpoint's own height. Horizontally offset endpoints get the
/// S-curve this produces.
fn connection_curve(from: Pos2, to: Pos2) -> Vec<Pos2> {
    let mid = Pos2::new((from.x + to.x) / 2.0, (from.y + to.y) / 2.0);
    let mut points = bezier_points(from, from, Pos2::new(mid.x, from.y), mid, CURVE_SEGMENTS);
    points.extend(
        bezier_points(mid, mid, Pos2::new(mid.x, to.y), to, CURVE_SEGMENTS)
            .into_iter()
            .skip(1),
    );
    points
}

/// Generate points along a cubic bezier curve
fn bezier_points(p0: Pos2, p1: Pos2, p2: Pos2, p3: Pos2, segments: usize) -> Vec<Pos2> {
    let mut points = Vec::with_capacity(segments + 1);
    for i in 0..=segments {
        let t = i as f32 / segments as f32;
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        let x = mt3 * p0.x + 3.0 * mt2 * t * p1.x + 3.0 * mt * t2 * p2.x + t3 * p3.x;
        let y = mt3 * p0.y + 3.0 * mt2 * t * p1.y + 3.0 * mt * t2 * p2.y + t3 * p3.y;

        points.push(Pos2::new(x, y));
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::ConnectorSpec;
    use crate::node::{NodeTemplate, TemplateBody, ACTION_SIZE};
    use crate::surface::Surface;
    use crate::types::{AcceptedType, TypeRegistry};

    fn connected_pair() -> (TypeRegistry, Graph, NodeId, NodeId) {
        let mut types = TypeRegistry::new();
        let flow = types.register("Flow", None);
        let template = NodeTemplate {
            id: "step".to_string(),
            name: "Step".to_string(),
            declared_type: flow,
            body: TemplateBody::Action {
                size: ACTION_SIZE,
                inputs: vec![ConnectorSpec::unbounded("In", AcceptedType::One(flow))],
                modifiers: vec![],
                outputs: vec![ConnectorSpec::unbounded("Out", AcceptedType::One(flow))],
            },
        };

        let mut graph = Graph::new();
        let a = graph.insert(&template);
        let b = graph.insert(&template);
        graph.node_mut(b).unwrap().set_position(300.0, 0.0);

        let out = match &graph.node(a).unwrap().body {
            NodeBody::Action { outputs, .. } => outputs[0],
            NodeBody::Variable { .. } => unreachable!(),
        };
        let input = match &graph.node(b).unwrap().body {
            NodeBody::Action { inputs, .. } => inputs[0],
            NodeBody::Variable { .. } => unreachable!(),
        };
        graph.connect(out, input, &types).unwrap();
        (types, graph, a, b)
    }

    #[test]
    fn test_rendered_flag_dedups_connection_pass() {
        let (types, mut graph, a, b) = connected_pair();
        let surface = Surface::new();
        let rect = Rect::from_min_size(Pos2::ZERO, egui::vec2(800.0, 600.0));

        graph.mark_connections_not_rendered();
        let first = surface.collect_connection_curves(rect, &mut graph, &types, a);
        assert_eq!(first.len(), 1);
        assert!(graph.connections().all(|c| c.rendered));

        // The far endpoint's pass skips the already-drawn connection.
        let second = surface.collect_connection_curves(rect, &mut graph, &types, b);
        assert!(second.is_empty());
    }

    #[test]
    fn test_selected_node_pass_redraws_highlighted() {
        let (types, mut graph, a, b) = connected_pair();
        let surface = Surface::new();
        let rect = Rect::from_min_size(Pos2::ZERO, egui::vec2(800.0, 600.0));

        graph.mark_connections_not_rendered();
        graph.node_mut(b).unwrap().selected = true;

        // The unselected endpoint defers to the selected node's pass, which
        // draws even after the connection has been marked rendered.
        assert!(surface
            .collect_connection_curves(rect, &mut graph, &types, a)
            .is_empty());
        let curves = surface.collect_connection_curves(rect, &mut graph, &types, b);
        assert_eq!(curves.len(), 1);
        assert_eq!(curves[0].color, HIGHLIGHT_COLOR);

        let again = surface.collect_connection_curves(rect, &mut graph, &types, b);
        assert_eq!(again.len(), 1);
    }

    #[test]
    fn test_connection_curve_endpoints() {
        let from = Pos2::new(0.0, 0.0);
        let to = Pos2::new(100.0, 60.0);
        let points = connection_curve(from, to);

        assert_eq!(points.first().copied(), Some(from));
        assert_eq!(points.last().copied(), Some(to));
        // The two halves meet at the midpoint exactly once.
        let mid = Pos2::new(50.0, 30.0);
        assert_eq!(points.iter().filter(|p| **p == mid).count(), 1);
    }

    #[test]
    fn test_bezier_points_straight_line() {
        let p = bezier_points(
            Pos2::new(0.0, 0.0),
            Pos2::new(0.0, 0.0),
            Pos2::new(10.0, 10.0),
            Pos2::new(10.0, 10.0),
            4,
        );
        assert_eq!(p.len(), 5);
        for point in &p {
            assert!((point.x - point.y).abs() < 1e-4);
        }
    }
}
