//! # Floating node panels
//!
//! Panels are DOM-less counterparts of the host's floating previews: a
//! read-only text viewer and a resource preview. Each panel is owned by
//! its node record ([`crate::graph::Node::panel`]) and is dropped with
//! it, so there is no node-id registry to go stale.
//!
//! ## Submodules
//! - [`tracker`]: per-frame screen-space synchronization (the core)
//! - [`content_scale`]: user zoom of the inner content
//! - [`preview_url`]: URL/text extraction from execution payloads

pub mod content_scale;
pub mod preview_url;
pub mod tracker;

use crate::config::AppConfig;
use chrono::{DateTime, Local};
use content_scale::ContentScale;
use egui::{Align, Color32, CornerRadius, FontId, Layout, Pos2, Stroke, Vec2};
use serde_json::Value;
use tracker::{AnchorPolicy, OverlayRect};
use uuid::Uuid;

/// Height in screen pixels of the panel's own control strip. Unlike the
/// body, the strip does not scale with the camera.
pub const PANEL_HEADER_HEIGHT: f32 = 30.0;

/// What a panel renders below its control strip.
pub enum PanelContent {
    /// Read-only text viewer.
    Text(String),
    /// Resource preview; `None` until an execution yields a URL.
    Preview(Option<String>),
}

/// A floating panel tracking one node.
pub struct OverlayPanel {
    pub anchor: AnchorPolicy,
    pub content: PanelContent,
    scale: ContentScale,
    last_updated: Option<DateTime<Local>>,
}

impl OverlayPanel {
    /// Panel covering the node body, used by TextOutput nodes.
    pub fn text_viewer() -> Self {
        Self {
            anchor: AnchorPolicy::below(),
            content: PanelContent::Text("Waiting for output...".to_string()),
            scale: ContentScale::default(),
            last_updated: None,
        }
    }

    /// Panel beside the node, used by UiRender nodes.
    pub fn preview() -> Self {
        Self {
            anchor: AnchorPolicy::beside(),
            content: PanelContent::Preview(None),
            scale: ContentScale::default(),
            last_updated: None,
        }
    }

    /// Execution-completed hook. Updates the displayed content when the
    /// payload yields something; otherwise the panel keeps what it has.
    /// Returns whether anything changed.
    pub fn on_executed(&mut self, payload: &Value) -> bool {
        let changed = match &mut self.content {
            PanelContent::Text(text) => match preview_url::extract_output_text(payload) {
                Some(new_text) => {
                    *text = new_text;
                    true
                }
                None => false,
            },
            PanelContent::Preview(url) => match preview_url::extract_preview_url(payload) {
                Some(new_url) => {
                    *url = Some(new_url);
                    true
                }
                None => false,
            },
        };
        if changed {
            self.last_updated = Some(Local::now());
        }
        changed
    }

    /// Draw the panel at its tracked placement. `origin` is the screen
    /// position of the canvas top-left corner; the tracker works in
    /// canvas-local coordinates.
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        node_id: Uuid,
        placement: &OverlayRect,
        origin: Pos2,
        config: &AppConfig,
    ) {
        if !placement.visible {
            return;
        }
        let size = placement.rect.size();

        egui::Area::new(egui::Id::new(("node_panel", node_id)))
            .order(egui::Order::Foreground)
            .fixed_pos(origin + placement.rect.min.to_vec2())
            .show(ctx, |ui| {
                egui::Frame::new()
                    .fill(Color32::from_gray(34))
                    .stroke(Stroke::new(1.0, Color32::from_gray(51)))
                    .corner_radius(CornerRadius::same(10))
                    .show(ui, |ui| {
                        ui.set_min_size(size);
                        ui.set_max_size(size);
                        self.draw_header(ui, size.x);
                        let body_height = (size.y - PANEL_HEADER_HEIGHT).max(0.0);
                        self.draw_content(ui, Vec2::new(size.x, body_height), config);
                    });
            });
    }

    fn draw_header(&mut self, ui: &mut egui::Ui, width: f32) {
        ui.allocate_ui(Vec2::new(width, PANEL_HEADER_HEIGHT), |ui| {
            ui.horizontal(|ui| {
                if let Some(updated) = self.last_updated {
                    ui.small(format!("updated {}", updated.format("%H:%M:%S")));
                }
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui.small_button("+").clicked() {
                        self.scale.step_in();
                    }
                    if ui.small_button("R").clicked() {
                        self.scale.reset();
                    }
                    if ui.small_button("\u{2212}").clicked() {
                        self.scale.step_out();
                    }
                    ui.label(self.scale.percent_label());
                });
            });
        });
        ui.separator();
    }

    fn draw_content(&mut self, ui: &mut egui::Ui, size: Vec2, config: &AppConfig) {
        let factor = self.scale.factor();
        match &mut self.content {
            PanelContent::Text(text) => {
                egui::ScrollArea::both()
                    .max_height(size.y)
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        ui.add(
                            egui::TextEdit::multiline(&mut text.as_str())
                                .font(FontId::monospace(12.0 * factor))
                                .desired_width(f32::INFINITY),
                        );
                    });
            }
            PanelContent::Preview(url) => match url {
                None => {
                    ui.allocate_ui(size, |ui| {
                        ui.vertical_centered(|ui| {
                            ui.add_space(size.y * 0.4);
                            ui.label("UI Preview Area");
                            ui.weak("Run the workflow to see result");
                        });
                    });
                }
                Some(url) => {
                    let absolute = config.absolute_url(url);
                    if is_image_url(&absolute) {
                        egui::ScrollArea::both()
                            .max_height(size.y)
                            .auto_shrink([false, false])
                            .show(ui, |ui| {
                                ui.add(
                                    egui::Image::new(absolute.as_str())
                                        .fit_to_exact_size(size * factor),
                                );
                            });
                    } else {
                        ui.allocate_ui(size, |ui| {
                            ui.vertical_centered(|ui| {
                                ui.add_space(size.y * 0.35);
                                ui.hyperlink_to("Open preview", absolute.as_str());
                                ui.weak(absolute);
                            });
                        });
                    }
                }
            },
        }
    }
}

/// Whether a URL points at an image the egui loaders can render inline.
fn is_image_url(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let ext = path.rsplit('.').next().unwrap_or_default().to_lowercase();
    matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp" | "svg")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_panel_updates_only_when_payload_has_text() {
        let mut panel = OverlayPanel::text_viewer();
        assert!(panel.on_executed(&json!({ "ui": { "text": ["hello"] } })));
        assert!(matches!(&panel.content, PanelContent::Text(t) if t == "hello"));

        // An unrelated payload leaves existing content unchanged.
        assert!(!panel.on_executed(&json!({ "other": 1 })));
        assert!(matches!(&panel.content, PanelContent::Text(t) if t == "hello"));
    }

    #[test]
    fn preview_panel_keeps_last_url_on_extraction_miss() {
        let mut panel = OverlayPanel::preview();
        assert!(panel.on_executed(&json!({ "ui_render_url": "/view?f=a" })));
        assert!(!panel.on_executed(&json!({ "text": ["no preview here"] })));
        assert!(matches!(&panel.content, PanelContent::Preview(Some(u)) if u == "/view?f=a"));
    }

    #[test]
    fn image_urls_are_recognized_by_extension() {
        assert!(is_image_url("http://h/x.png"));
        assert!(is_image_url("http://h/x.JPG?t=1"));
        assert!(!is_image_url("http://h/view?filename=x.html"));
    }
}
