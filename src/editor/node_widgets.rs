//! Widget rows drawn inside node bodies.
//!
//! Covers the inline value editors plus the two node-specific
//! affordances: the "+ Add Tool" button on ToolCollection nodes and the
//! upload button on ReadTextFileTool nodes.

use crate::graph::Node;
use crate::node_types::NodeType;
use crate::upload;
use std::path::PathBuf;

/// Action requested from inside a node body this frame.
pub enum WidgetEvent {
    AddToolInput,
    /// Upload the file at this path, then write the stored name into the
    /// node's `file` widget.
    UploadRequested(PathBuf),
}

/// Draw the widget rows for `node`. `zoom` scales fonts and spacing.
pub fn draw_widgets(ui: &mut egui::Ui, node: &mut Node, zoom: f32) -> Option<WidgetEvent> {
    let mut event = None;
    let font = egui::FontId::proportional(12.0 * zoom);

    for widget in &mut node.widgets {
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(widget.name.as_str())
                    .font(font.clone())
                    .color(egui::Color32::from_gray(180)),
            );
            let editor = if widget.multiline {
                egui::TextEdit::multiline(&mut widget.value).desired_rows(3)
            } else {
                egui::TextEdit::singleline(&mut widget.value)
            };
            ui.add(editor.font(font.clone()).desired_width(f32::INFINITY));
        });
    }

    match node.node_type {
        NodeType::ToolCollection => {
            if ui.button("+ Add Tool").clicked() {
                event = Some(WidgetEvent::AddToolInput);
            }
        }
        NodeType::ReadTextFileTool => {
            // The path is typed in; the button ships the file off and the
            // `file` widget is filled in once the server names it.
            let path_id = ui.id().with(node.id).with("upload_path");
            let mut path_text: String =
                ui.data_mut(|d| d.get_temp(path_id).unwrap_or_default());
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("path").font(font.clone()));
                ui.add(
                    egui::TextEdit::singleline(&mut path_text)
                        .font(font.clone())
                        .hint_text("local file to upload"),
                );
            });
            ui.data_mut(|d| d.insert_temp(path_id, path_text.clone()));

            if ui.button("Choose file to upload").clicked() && !path_text.is_empty() {
                let path = PathBuf::from(path_text.trim());
                if upload::is_accepted(&path) {
                    event = Some(WidgetEvent::UploadRequested(path));
                } else {
                    log::warn!(
                        "Refusing upload of {}: accepted extensions are {:?}",
                        path.display(),
                        upload::ACCEPTED_EXTENSIONS
                    );
                }
            }
        }
        _ => {}
    }

    event
}
