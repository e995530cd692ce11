// SPDX-License-Identifier: MIT OR Apache-2.0
//! Main application shell hosting the graph surface.

use nodewire_graph::catalog::{create_template_registry, create_type_registry};
use nodewire_graph::{Graph, Surface, SurfaceEvent, TemplateRegistry, TypeRegistry};

/// The editor application
pub struct NodeWireApp {
    types: TypeRegistry,
    templates: TemplateRegistry,
    graph: Graph,
    surface: Surface,
    /// Open catalog menu position, surface-local
    context_menu: Option<[f32; 2]>,
}

impl NodeWireApp {
    fn new() -> Self {
        let (types, handles) = create_type_registry();
        let templates = create_template_registry(&handles);
        Self {
            types,
            templates,
            graph: Graph::new(),
            surface: Surface::new(),
            context_menu: None,
        }
    }

    /// Launch the editor window and run until it is closed
    pub fn run() -> Result<(), eframe::Error> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_title("NodeWire")
                .with_inner_size([1280.0, 800.0]),
            ..Default::default()
        };
        eframe::run_native(
            "NodeWire",
            options,
            Box::new(|_cc| Ok(Box::new(Self::new()))),
        )
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!(
                    "{} nodes, {} connections",
                    self.graph.node_count(),
                    self.graph.connection_count()
                ));

                ui.separator();
                match self
                    .surface
                    .selected_node()
                    .and_then(|id| self.graph.node(id))
                {
                    Some(node) => ui.label(format!("Selected: {}", node.display_name)),
                    None => ui.label("Nothing selected"),
                };

                let orphans = self.graph.orphans(false);
                if !orphans.is_empty() {
                    ui.separator();
                    ui.colored_label(
                        egui::Color32::from_rgb(240, 160, 80),
                        format!("{} orphaned node(s)", orphans.len()),
                    );
                }
            });
        });
    }

    fn show_context_menu(&mut self, ctx: &egui::Context) {
        let Some(pos) = self.context_menu else {
            return;
        };

        let mut chosen = None;
        let templates = &self.templates;
        let area = egui::Area::new(egui::Id::new("catalog_menu"))
            .order(egui::Order::Foreground)
            .fixed_pos(egui::pos2(pos[0], pos[1]))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_min_width(120.0);
                    for template in templates.templates() {
                        if ui.button(&template.name).clicked() {
                            chosen = Some(template.id.clone());
                        }
                    }
                });
            });

        if let Some(id) = chosen {
            if let Some(template) = self.templates.get(&id) {
                let node =
                    self.surface
                        .add_item_at(&mut self.graph, template, pos[0], pos[1]);
                tracing::debug!(?node, template = %id, "placed node from catalog");
            }
            self.context_menu = None;
            return;
        }

        let clicked_away =
            ctx.input(|i| i.pointer.any_pressed()) && !area.response.contains_pointer();
        if clicked_away {
            self.context_menu = None;
        }
    }
}

impl eframe::App for NodeWireApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show_status_bar(ctx);

        let events = egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.surface.ui(ui, &mut self.graph, &self.types))
            .inner;

        for event in events {
            match event {
                SurfaceEvent::SelectionChanged(selection) => {
                    tracing::debug!(?selection, "selection changed");
                    self.context_menu = None;
                }
                SurfaceEvent::ContextMenuRequested { x, y } => {
                    self.context_menu = Some([x, y]);
                }
            }
        }

        self.show_context_menu(ctx);
    }
}
