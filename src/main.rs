mod config;
mod editor;
mod events;
mod graph;
mod node_types;
mod overlay;
mod upload;

use chrono::{DateTime, Local};
use config::AppConfig;
use editor::{EditorEvent, GraphEditor};
use eframe::egui;
use events::ExecutionEvent;
use graph::{Node, PreviewGraph};
use node_types::NodeType;
use serde_json::json;
use std::collections::HashMap;
use std::path::Path;
use std::sync::mpsc::{Receiver, Sender, channel};
use upload::UploadOutcome;
use uuid::Uuid;

fn main() -> eframe::Result<()> {
    env_logger::init();
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Node Preview Panels",
        native_options,
        Box::new(|cc| {
            // Remote preview images are fetched through the egui loaders.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(App::new()))
        }),
    )
}

struct App {
    graph: PreviewGraph,
    editor: GraphEditor,
    config: AppConfig,
    /// Host-side "execution completed" intake. The sender half is what a
    /// host integration would hold; the demo toolbar uses it too.
    exec_tx: Sender<ExecutionEvent>,
    exec_rx: Receiver<ExecutionEvent>,
    upload_tx: Sender<UploadOutcome>,
    upload_rx: Receiver<UploadOutcome>,
    /// When each node last delivered a result. Written after the node's
    /// panel handler has run; that ordering is the contract.
    last_executed: HashMap<Uuid, DateTime<Local>>,
    status: Option<String>,
}

impl App {
    fn new() -> Self {
        let (exec_tx, exec_rx) = channel();
        let (upload_tx, upload_rx) = channel();
        Self {
            graph: PreviewGraph::default(),
            editor: GraphEditor::default(),
            config: AppConfig::load_or_default(Path::new(config::CONFIG_FILE)),
            exec_tx,
            exec_rx,
            upload_tx,
            upload_rx,
            last_executed: HashMap::new(),
            status: None,
        }
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.exec_rx.try_recv() {
            if let Some(node) = self.graph.nodes.get_mut(&event.node_id) {
                // Panel handler first, host bookkeeping second.
                if let Some(panel) = node.panel.as_mut() {
                    panel.on_executed(&event.payload);
                }
                self.last_executed.insert(event.node_id, Local::now());
            } else {
                log::warn!("Result for unknown node {}", event.node_id);
            }
        }

        while let Ok(outcome) = self.upload_rx.try_recv() {
            match outcome.result {
                Ok(stored_name) => {
                    if let Some(node) = self.graph.nodes.get_mut(&outcome.node_id)
                        && let Some(widget) = node.widget_mut("file")
                    {
                        widget.value = stored_name.clone();
                    }
                    self.status = Some(format!("Uploaded as {stored_name}"));
                }
                Err(_) => {
                    // Already logged by the worker; nothing changes.
                    self.status = Some("Upload failed, see log".to_string());
                }
            }
        }
    }

    fn add_node(&mut self, node_type: NodeType, canvas_center: egui::Pos2) {
        let pos = self.editor.camera.from_screen(canvas_center);
        let mut node = Node::new(node_type, (pos.x, pos.y));
        node.z_order = self.editor.next_z_order;
        self.editor.next_z_order += 1;
        self.graph.nodes.insert(node.id, node);
    }

    /// Stand-in for the host's executor: feed the selected node a sample
    /// payload through the regular event intake.
    fn send_sample_result(&self) {
        for id in &self.editor.selected_nodes {
            let Some(node) = self.graph.nodes.get(id) else {
                continue;
            };
            let payload = match node.node_type {
                NodeType::TextOutput => json!({ "ui": { "text": ["Sample output text\nline two"] } }),
                NodeType::UiRender => json!({
                    "ui": { "ui_render_url": "/view?filename=sample.html&allow_html=1" }
                }),
                _ => continue,
            };
            let _ = self.exec_tx.send(ExecutionEvent {
                node_id: *id,
                payload,
            });
        }
    }

    fn toolbar(&mut self, ui: &mut egui::Ui, canvas_center: egui::Pos2) {
        ui.horizontal(|ui| {
            ui.label("Add:");
            for node_type in [
                NodeType::TextInput,
                NodeType::TextOutput,
                NodeType::UiRender,
                NodeType::ToolCollection,
                NodeType::ReadTextFileTool,
            ] {
                if ui.button(node_type.title()).clicked() {
                    self.add_node(node_type.clone(), canvas_center);
                }
            }
            ui.separator();
            if ui.button("Send Sample Result").clicked() {
                self.send_sample_result();
            }
            if let Some(id) = self.editor.selected_nodes.iter().next()
                && let Some(time) = self.last_executed.get(id)
            {
                ui.weak(format!("last run {}", time.format("%H:%M:%S")));
            }
            if let Some(status) = &self.status {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.weak(status.as_str());
                });
            }
        });
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events();

        let canvas_center = ctx.available_rect().center();
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.toolbar(ui, canvas_center);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let events = self.editor.show(ui, &mut self.graph, &self.config);
            for event in events {
                match event {
                    EditorEvent::Upload { node_id, path } => {
                        upload::spawn_upload(
                            self.config.upload_url(),
                            path,
                            node_id,
                            self.upload_tx.clone(),
                        );
                        self.status = Some("Uploading...".to_string());
                    }
                }
            }
        });
    }
}
