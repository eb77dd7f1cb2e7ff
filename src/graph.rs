use crate::node_types::{DataType, NodeType};
use crate::overlay::OverlayPanel;
use crate::overlay::tracker::NodeGeometry;
use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Default, Serialize, Deserialize)]
pub struct PreviewGraph {
    pub nodes: HashMap<Uuid, Node>,
    pub connections: Vec<Connection>,
}

impl PreviewGraph {
    /// Geometry of a node, or `None` when it is not attached to this
    /// graph. Feeding `None` into the tracker hides the panel.
    pub fn geometry_of(&self, id: Uuid) -> Option<NodeGeometry> {
        self.nodes.get(&id).map(Node::geometry)
    }

    /// Remove a node and every connection touching it. The node's panel
    /// is dropped with the node record.
    pub fn remove_node(&mut self, id: Uuid) {
        self.nodes.remove(&id);
        self.connections
            .retain(|c| c.from_node != id && c.to_node != id);
    }
}

#[derive(Serialize, Deserialize)]
pub struct Node {
    pub id: Uuid,
    pub node_type: NodeType,
    pub position: (f32, f32),
    pub size: (f32, f32),
    pub collapsed: bool,
    pub z_order: u64,
    pub inputs: Vec<Port>,
    pub outputs: Vec<Port>,
    pub widgets: Vec<Widget>,
    /// Floating panel owned by this node; dropped when the node is
    /// removed, so a dangling panel cannot outlive its node.
    #[serde(skip)]
    pub panel: Option<OverlayPanel>,
}

impl Node {
    pub fn new(node_type: NodeType, position: (f32, f32)) -> Self {
        let mut node = Self {
            id: Uuid::new_v4(),
            node_type: node_type.clone(),
            position,
            size: (220.0, 100.0),
            collapsed: false,
            z_order: 0,
            inputs: Vec::new(),
            outputs: Vec::new(),
            widgets: Vec::new(),
            panel: None,
        };

        match node_type {
            NodeType::TextInput => {
                node.widgets.push(Widget::multiline("text", ""));
                node.outputs.push(Port::new("text", DataType::Text));
            }
            NodeType::TextOutput => {
                node.inputs.push(Port::new("text", DataType::Text));
                node.size = (400.0, 300.0);
                node.panel = Some(OverlayPanel::text_viewer());
            }
            NodeType::UiRender => {
                node.inputs.push(Port::new("code", DataType::Text));
                node.widgets
                    .push(Widget::singleline("filename_prefix", "ComfyUI_UI"));
                node.size = (260.0, 120.0);
                node.panel = Some(OverlayPanel::preview());
            }
            NodeType::ToolCollection => {
                node.inputs.push(Port::new("tool_1", DataType::Tool));
                node.inputs.push(Port::new("tool_2", DataType::Tool));
                node.outputs
                    .push(Port::new("tool_collection", DataType::ToolCollection));
            }
            NodeType::ReadTextFileTool => {
                node.widgets
                    .push(Widget::singleline("name", "read_text_file"));
                node.widgets
                    .push(Widget::singleline("description", "Read a text file"));
                node.widgets.push(Widget::singleline("file", ""));
                node.size = (260.0, 160.0);
                node.outputs.push(Port::new("tool", DataType::Tool));
            }
        }

        node
    }

    pub fn geometry(&self) -> NodeGeometry {
        NodeGeometry {
            pos: Pos2::new(self.position.0, self.position.1),
            size: Vec2::new(self.size.0, self.size.1),
            collapsed: self.collapsed,
        }
    }

    /// Next free `tool_N` input name: one past the highest existing
    /// suffix, starting at 1.
    pub fn next_tool_name(&self) -> String {
        let mut count = 1;
        for input in &self.inputs {
            if let Some(suffix) = input.name.strip_prefix("tool_")
                && let Ok(num) = suffix.parse::<u32>()
                && num >= count
            {
                count = num + 1;
            }
        }
        format!("tool_{count}")
    }

    pub fn add_tool_input(&mut self) {
        let name = self.next_tool_name();
        self.inputs.push(Port::new(&name, DataType::Tool));
    }

    pub fn widget_mut(&mut self, name: &str) -> Option<&mut Widget> {
        self.widgets.iter_mut().find(|w| w.name == name)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Port {
    pub name: String,
    pub data_type: DataType,
}

impl Port {
    pub fn new(name: &str, data_type: DataType) -> Self {
        Self {
            name: name.to_string(),
            data_type,
        }
    }
}

/// Inline value editor shown in the node body.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Widget {
    pub name: String,
    pub value: String,
    pub multiline: bool,
}

impl Widget {
    pub fn singleline(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            multiline: false,
        }
    }

    pub fn multiline(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            multiline: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub from_node: Uuid,
    pub from_port: String,
    pub to_node: Uuid,
    pub to_port: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_inputs_number_past_the_highest_suffix() {
        let mut node = Node::new(NodeType::ToolCollection, (0.0, 0.0));
        assert_eq!(node.next_tool_name(), "tool_3");
        node.add_tool_input();
        assert_eq!(node.next_tool_name(), "tool_4");

        // Gaps do not get refilled; numbering continues past the max.
        node.inputs.retain(|p| p.name != "tool_2");
        assert_eq!(node.next_tool_name(), "tool_4");

        // Non-numeric suffixes are ignored.
        node.inputs.push(Port::new("tool_extra", DataType::Tool));
        assert_eq!(node.next_tool_name(), "tool_4");
    }

    #[test]
    fn removing_a_node_drops_its_connections_and_panel() {
        let mut graph = PreviewGraph::default();
        let source = Node::new(NodeType::TextInput, (0.0, 0.0));
        let sink = Node::new(NodeType::TextOutput, (300.0, 0.0));
        let (source_id, sink_id) = (source.id, sink.id);
        graph.nodes.insert(source_id, source);
        graph.nodes.insert(sink_id, sink);
        graph.connections.push(Connection {
            from_node: source_id,
            from_port: "text".into(),
            to_node: sink_id,
            to_port: "text".into(),
        });

        graph.remove_node(sink_id);
        assert!(graph.connections.is_empty());
        assert!(graph.geometry_of(sink_id).is_none());
    }

    #[test]
    fn geometry_reflects_the_collapsed_flag() {
        let mut node = Node::new(NodeType::TextOutput, (10.0, 20.0));
        assert!(!node.geometry().collapsed);
        node.collapsed = true;
        assert!(node.geometry().collapsed);
        assert_eq!(node.geometry().pos, Pos2::new(10.0, 20.0));
    }
}
