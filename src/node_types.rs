//! Node and data type definitions.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    /// Editable multiline text source.
    TextInput,
    /// Read-only viewer that displays whatever text it receives.
    TextOutput,
    /// Saves rendered UI markup on the server and previews it in a panel.
    UiRender,
    /// Bundles a variable number of tool inputs into one collection.
    ToolCollection,
    /// Tool that reads an uploaded text file by name.
    ReadTextFileTool,
}

impl NodeType {
    pub fn title(&self) -> &'static str {
        match self {
            Self::TextInput => "Text Input",
            Self::TextOutput => "Text Output",
            Self::UiRender => "UI Render",
            Self::ToolCollection => "Tool Collection",
            Self::ReadTextFileTool => "Read Text File",
        }
    }

    /// Header color category, see [`crate::editor::style::EditorStyle`].
    pub fn category(&self) -> &'static str {
        match self {
            Self::TextInput | Self::TextOutput => "Text",
            Self::UiRender => "Render",
            Self::ToolCollection | Self::ReadTextFileTool => "Tool",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Text,
    Tool,
    ToolCollection,
}
