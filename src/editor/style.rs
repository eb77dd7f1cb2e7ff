//! Editor styling and constants.

use egui::Color32;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Visual styling configuration for the graph canvas.
#[derive(Clone, Serialize, Deserialize)]
pub struct EditorStyle {
    pub header_colors: HashMap<String, Color32>,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
}

fn default_font_size() -> f32 {
    14.0
}

impl Default for EditorStyle {
    fn default() -> Self {
        let mut map = HashMap::new();
        map.insert("Text".into(), Color32::from_rgb(50, 100, 200));
        map.insert("Render".into(), Color32::from_rgb(150, 60, 160));
        map.insert("Tool".into(), Color32::from_rgb(50, 150, 100));
        map.insert("Default".into(), Color32::from_rgb(100, 100, 100));
        Self {
            header_colors: map,
            font_size: 14.0,
        }
    }
}

impl EditorStyle {
    pub fn header_color(&self, category: &str) -> Color32 {
        self.header_colors
            .get(category)
            .or_else(|| self.header_colors.get("Default"))
            .copied()
            .unwrap_or(Color32::GRAY)
    }
}

/// Get the display color for a data type.
pub fn port_color(dt: &crate::node_types::DataType) -> Color32 {
    use crate::node_types::DataType;
    match dt {
        DataType::Text => Color32::KHAKI,
        DataType::Tool => Color32::LIGHT_BLUE,
        DataType::ToolCollection => Color32::from_rgb(255, 165, 0),
    }
}
