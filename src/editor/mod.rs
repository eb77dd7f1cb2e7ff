//! # Graph canvas
//!
//! The visual node-based canvas hosting the floating panels.
//!
//! ## Submodules
//! - [`camera`]: graph/screen coordinate transforms
//! - [`node_widgets`]: widget rows inside node bodies
//! - [`style`]: canvas styling
//!
//! ## Main Type
//! [`GraphEditor`] - the canvas widget

pub mod camera;
pub mod node_widgets;
pub mod style;

use crate::config::AppConfig;
use crate::graph::{Connection, Node, PreviewGraph};
use crate::overlay::tracker;
use camera::Camera;
use egui::{Color32, CornerRadius, Pos2, Rect, Sense, Stroke, StrokeKind, Vec2};
use node_widgets::WidgetEvent;
use std::collections::HashSet;
use style::EditorStyle;
use std::path::PathBuf;
use uuid::Uuid;

/// Height of a node's title strip in graph units. Matches the tracker's
/// below-anchor so a panel starts exactly under the strip.
const HEADER_HEIGHT: f32 = tracker::NODE_HEADER_HEIGHT;
const PORT_ROW_HEIGHT: f32 = 25.0;

/// Request the canvas cannot satisfy itself; handled by the app.
pub enum EditorEvent {
    Upload { node_id: Uuid, path: PathBuf },
}

pub struct GraphEditor {
    pub camera: Camera,
    pub dragging_node: Option<Uuid>,
    pub connection_start: Option<(Uuid, String, bool)>,
    pub selected_nodes: HashSet<Uuid>,
    pub style: EditorStyle,
    pub next_z_order: u64,
}

impl Default for GraphEditor {
    fn default() -> Self {
        Self {
            camera: Camera::default(),
            dragging_node: None,
            connection_start: None,
            selected_nodes: HashSet::new(),
            style: EditorStyle::default(),
            next_z_order: 1,
        }
    }
}

impl GraphEditor {
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        graph: &mut PreviewGraph,
        config: &AppConfig,
    ) -> Vec<EditorEvent> {
        let mut events = Vec::new();
        let clip_rect = ui.max_rect();
        let canvas_offset = clip_rect.min;
        let pointer_in_bounds = ui.rect_contains_pointer(clip_rect);
        let pointer_pos = ui.ctx().pointer_latest_pos();

        let mut input_escape = false;
        let mut input_delete = false;
        let mut input_primary_pressed = false;
        let mut input_primary_released = false;
        let mut input_secondary_clicked = false;

        ui.input(|i| {
            // Pan with middle mouse or Alt + left mouse.
            if i.pointer.middle_down() || (i.modifiers.alt && i.pointer.primary_down()) {
                self.camera.pan_by_screen(i.pointer.delta());
            }
            if pointer_in_bounds && let Some(hover) = i.pointer.hover_pos() {
                let anchor = hover - canvas_offset.to_vec2();
                let pinch = i.zoom_delta();
                if pinch != 1.0 {
                    self.camera.zoom_about(anchor, pinch);
                }
                let scroll = i.raw_scroll_delta;
                if scroll.y != 0.0 && !i.modifiers.shift {
                    self.camera.zoom_about(anchor, 1.0 + scroll.y * 0.001);
                }
            }
            input_escape = i.key_pressed(egui::Key::Escape);
            input_delete = i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace);
            input_primary_pressed = i.pointer.primary_pressed();
            input_primary_released = i.pointer.primary_released();
            input_secondary_clicked = i.pointer.secondary_clicked();
        });

        ui.painter().rect_filled(clip_rect, 0.0, Color32::from_gray(32));

        self.draw_connections(ui, graph, canvas_offset);

        // Connection in progress follows the pointer.
        if let Some((node_id, port_name, is_input)) = self.connection_start.clone()
            && let Some(pos) = pointer_pos
            && let Some(node) = graph.nodes.get(&node_id)
        {
            let start = self.port_screen_pos(node, &port_name, is_input, canvas_offset);
            self.draw_bezier(ui, start, pos, Color32::WHITE);
        }

        // Draw nodes low to high z_order so the front node paints last.
        let mut sorted_ids: Vec<Uuid> = graph.nodes.keys().copied().collect();
        sorted_ids.sort_by_key(|id| graph.nodes.get(id).map(|n| n.z_order).unwrap_or(0));

        let mut connect_event = None;
        let mut bring_to_front = None;
        let mut delete_node_id = None;

        for node_id in sorted_ids {
            let Some(node) = graph.nodes.get_mut(&node_id) else {
                continue;
            };

            let mut child_ui = ui.new_child(egui::UiBuilder::new().max_rect(clip_rect));
            let out = self.draw_node(&mut child_ui, node, canvas_offset);

            if out.drag_delta != Vec2::ZERO && self.dragging_node.is_none_or(|d| d == node_id) {
                self.dragging_node = Some(node_id);
                node.position.0 += out.drag_delta.x;
                node.position.1 += out.drag_delta.y;
            }
            if out.pressed {
                if !self.selected_nodes.contains(&node_id) {
                    self.selected_nodes.clear();
                    self.selected_nodes.insert(node_id);
                }
                bring_to_front = Some(node_id);
            }
            if let Some(event) = out.connect {
                connect_event = Some(event);
            }
            if out.delete {
                delete_node_id = Some(node_id);
            }
            match out.widget_event {
                Some(WidgetEvent::AddToolInput) => node.add_tool_input(),
                Some(WidgetEvent::UploadRequested(path)) => {
                    events.push(EditorEvent::Upload { node_id, path });
                }
                None => {}
            }
        }

        if input_primary_released {
            self.dragging_node = None;
        }

        if let Some(id) = bring_to_front
            && let Some(node) = graph.nodes.get_mut(&id)
        {
            node.z_order = self.next_z_order;
            self.next_z_order += 1;
        }

        if let Some(id) = delete_node_id {
            graph.remove_node(id);
            self.selected_nodes.remove(&id);
        }

        // Delete selected, unless a text field is being edited.
        let any_text_editing = ui.memory(|m| m.focused().is_some());
        if input_delete && !any_text_editing {
            for id in self.selected_nodes.drain().collect::<Vec<_>>() {
                graph.remove_node(id);
            }
        }

        // Finalize or cancel a pending connection.
        if let Some((id, port, is_input)) = connect_event {
            match self.connection_start.take() {
                Some((start_id, start_port, start_is_input))
                    if start_is_input != is_input && start_id != id =>
                {
                    let (from_node, from_port, to_node, to_port) = if start_is_input {
                        (id, port, start_id, start_port)
                    } else {
                        (start_id, start_port, id, port)
                    };
                    graph.connections.push(Connection {
                        from_node,
                        from_port,
                        to_node,
                        to_port,
                    });
                }
                _ => self.connection_start = Some((id, port, is_input)),
            }
        }
        if (input_escape || input_secondary_clicked) && self.connection_start.is_some() {
            self.connection_start = None;
        }

        // Deselect on background click.
        if input_primary_pressed
            && pointer_in_bounds
            && self.dragging_node.is_none()
            && let Some(pos) = pointer_pos
            && !self.any_node_contains(graph, pos, canvas_offset)
        {
            self.selected_nodes.clear();
        }

        self.sync_panels(ui, graph, clip_rect, config);

        events
    }

    /// Per-frame panel tracking: recompute every panel's placement from
    /// the current camera and node geometry, then draw it. As long as a
    /// panel is visible another frame is requested so the placement
    /// keeps following the canvas.
    fn sync_panels(
        &self,
        ui: &egui::Ui,
        graph: &mut PreviewGraph,
        clip_rect: Rect,
        config: &AppConfig,
    ) {
        let viewport = clip_rect.size();
        let mut any_visible = false;
        for node in graph.nodes.values_mut() {
            let geometry = node.geometry();
            let node_id = node.id;
            if let Some(panel) = node.panel.as_mut() {
                let placement =
                    tracker::track(&self.camera, Some(geometry), panel.anchor, viewport);
                panel.show(ui.ctx(), node_id, &placement, clip_rect.min, config);
                any_visible |= placement.visible;
            }
        }
        if any_visible {
            ui.ctx().request_repaint();
        }
    }

    fn any_node_contains(&self, graph: &PreviewGraph, pos: Pos2, canvas_offset: Pos2) -> bool {
        graph.nodes.values().any(|node| {
            self.node_screen_rect(node, canvas_offset).contains(pos)
        })
    }

    fn node_screen_rect(&self, node: &Node, canvas_offset: Pos2) -> Rect {
        let min = self.camera.to_screen(Pos2::new(node.position.0, node.position.1))
            + canvas_offset.to_vec2();
        let size = if node.collapsed {
            Vec2::new(node.size.0, HEADER_HEIGHT) * self.camera.scale
        } else {
            Vec2::new(node.size.0, node.size.1) * self.camera.scale
        };
        Rect::from_min_size(min, size)
    }

    fn port_screen_pos(
        &self,
        node: &Node,
        port_name: &str,
        is_input: bool,
        canvas_offset: Pos2,
    ) -> Pos2 {
        let rect = self.node_screen_rect(node, canvas_offset);
        let ports = if is_input { &node.inputs } else { &node.outputs };
        let index = ports.iter().position(|p| p.name == port_name).unwrap_or(0);
        let x = if is_input { rect.min.x } else { rect.max.x };
        let y = rect.min.y
            + (HEADER_HEIGHT + PORT_ROW_HEIGHT * (index as f32 + 0.5)) * self.camera.scale;
        Pos2::new(x, y)
    }

    fn draw_connections(&self, ui: &egui::Ui, graph: &PreviewGraph, canvas_offset: Pos2) {
        for connection in &graph.connections {
            let (Some(from), Some(to)) = (
                graph.nodes.get(&connection.from_node),
                graph.nodes.get(&connection.to_node),
            ) else {
                continue;
            };
            let p1 = self.port_screen_pos(from, &connection.from_port, false, canvas_offset);
            let p2 = self.port_screen_pos(to, &connection.to_port, true, canvas_offset);
            let color = from
                .outputs
                .iter()
                .find(|p| p.name == connection.from_port)
                .map(|p| style::port_color(&p.data_type))
                .unwrap_or(Color32::WHITE);
            self.draw_bezier(ui, p1, p2, color);
        }
    }

    fn draw_bezier(&self, ui: &egui::Ui, p1: Pos2, p2: Pos2, color: Color32) {
        let control = (p2.x - p1.x).abs().max(50.0) * 0.5;
        let c1 = Pos2::new(p1.x + control, p1.y);
        let c2 = Pos2::new(p2.x - control, p2.y);
        ui.painter().add(egui::epaint::CubicBezierShape::from_points_stroke(
            [p1, c1, c2, p2],
            false,
            Color32::TRANSPARENT,
            Stroke::new(2.0 * self.camera.scale.max(0.5), color),
        ));
    }

    fn draw_node(
        &mut self,
        ui: &mut egui::Ui,
        node: &mut Node,
        canvas_offset: Pos2,
    ) -> NodeOutput {
        let zoom = self.camera.scale;
        let node_rect = self.node_screen_rect(node, canvas_offset);
        let mut out = NodeOutput::default();

        // Ports first so their hitboxes win over the node background.
        let mut port_specs: Vec<(String, bool)> = Vec::new();
        if !node.collapsed {
            for input in &node.inputs {
                port_specs.push((input.name.clone(), true));
            }
            for output in &node.outputs {
                port_specs.push((output.name.clone(), false));
            }
        }
        for (name, is_input) in &port_specs {
            let pos = self.port_screen_pos(node, name, *is_input, canvas_offset);
            let hitbox = if self.connection_start.is_some() { 18.0 } else { 12.0 };
            let port_rect = Rect::from_center_size(pos, Vec2::splat(hitbox * zoom));
            let response = ui.interact(
                port_rect,
                ui.id().with(node.id).with(name).with(*is_input),
                Sense::click_and_drag(),
            );
            if response.clicked() || response.drag_started() {
                out.connect = Some((node.id, name.clone(), *is_input));
            }
        }

        // Node background.
        let body_response = ui.interact(
            node_rect.shrink2(Vec2::new(10.0 * zoom, 0.0)),
            ui.id().with(node.id).with("node_bg"),
            Sense::click_and_drag(),
        );
        if body_response.dragged() {
            out.drag_delta = body_response.drag_delta() / zoom;
        }
        out.pressed = body_response.drag_started() || body_response.clicked();
        body_response.context_menu(|ui| {
            let collapse_label = if node.collapsed { "Expand" } else { "Collapse" };
            if ui.button(collapse_label).clicked() {
                node.collapsed = !node.collapsed;
                ui.close();
            }
            if ui.button("Delete").clicked() {
                out.delete = true;
                ui.close();
            }
        });

        ui.painter()
            .rect_filled(node_rect, 5.0, Color32::from_gray(64));
        if self.selected_nodes.contains(&node.id) {
            ui.painter().rect_stroke(
                node_rect.expand(2.0),
                3.0,
                Stroke::new(2.0, Color32::YELLOW),
                StrokeKind::Middle,
            );
        }
        ui.painter().rect_stroke(
            node_rect,
            5.0,
            Stroke::new(1.0, Color32::BLACK),
            StrokeKind::Middle,
        );

        // Header strip.
        let header_rect = Rect::from_min_max(
            node_rect.min,
            Pos2::new(node_rect.max.x, node_rect.min.y + HEADER_HEIGHT * zoom),
        );
        ui.painter().rect_filled(
            header_rect,
            CornerRadius {
                nw: 5,
                ne: 5,
                sw: 0,
                se: 0,
            },
            self.style.header_color(node.node_type.category()),
        );

        // Collapse toggle dot on the header's left edge.
        let dot_center = header_rect.left_center() + Vec2::new(12.0 * zoom, 0.0);
        let dot_rect = Rect::from_center_size(dot_center, Vec2::splat(14.0 * zoom));
        let dot_response = ui.interact(
            dot_rect,
            ui.id().with(node.id).with("collapse"),
            Sense::click(),
        );
        let dot_color = if node.collapsed {
            Color32::from_gray(200)
        } else {
            Color32::from_gray(140)
        };
        ui.painter().circle_filled(dot_center, 5.0 * zoom, dot_color);
        if dot_response.clicked() {
            node.collapsed = !node.collapsed;
        }

        ui.painter().text(
            header_rect.left_center() + Vec2::new(24.0 * zoom, 0.0),
            egui::Align2::LEFT_CENTER,
            node.node_type.title(),
            egui::FontId::proportional(self.style.font_size * zoom),
            Color32::WHITE,
        );

        if node.collapsed {
            return out;
        }

        // Port markers and labels.
        for (name, is_input) in &port_specs {
            let pos = self.port_screen_pos(node, name, *is_input, canvas_offset);
            let ports = if *is_input { &node.inputs } else { &node.outputs };
            let color = ports
                .iter()
                .find(|p| &p.name == name)
                .map(|p| style::port_color(&p.data_type))
                .unwrap_or(Color32::GRAY);
            ui.painter().circle_filled(pos, 4.0 * zoom, color);
            let (anchor, align) = if *is_input {
                (pos + Vec2::new(8.0 * zoom, 0.0), egui::Align2::LEFT_CENTER)
            } else {
                (pos - Vec2::new(8.0 * zoom, 0.0), egui::Align2::RIGHT_CENTER)
            };
            ui.painter().text(
                anchor,
                align,
                name,
                egui::FontId::proportional(11.0 * zoom),
                Color32::from_gray(200),
            );
        }

        // Widget rows under the ports.
        let rows = node.inputs.len().max(node.outputs.len()) as f32;
        let content_top = node_rect.min.y + (HEADER_HEIGHT + PORT_ROW_HEIGHT * rows) * zoom;
        let content_rect = Rect::from_min_max(
            Pos2::new(node_rect.min.x + 12.0 * zoom, content_top),
            node_rect.max - Vec2::splat(8.0 * zoom),
        );
        let has_widget_rows = !node.widgets.is_empty()
            || matches!(
                node.node_type,
                crate::node_types::NodeType::ToolCollection
                    | crate::node_types::NodeType::ReadTextFileTool
            );
        if has_widget_rows && content_rect.height() > 10.0 {
            let mut content_ui = ui.new_child(egui::UiBuilder::new().max_rect(content_rect));
            out.widget_event = node_widgets::draw_widgets(&mut content_ui, node, zoom);
        }

        out
    }
}

struct NodeOutput {
    drag_delta: Vec2,
    connect: Option<(Uuid, String, bool)>,
    pressed: bool,
    delete: bool,
    widget_event: Option<WidgetEvent>,
}

impl Default for NodeOutput {
    fn default() -> Self {
        Self {
            drag_delta: Vec2::ZERO,
            connect: None,
            pressed: false,
            delete: false,
            widget_event: None,
        }
    }
}
