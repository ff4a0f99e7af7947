//! Canvas Node Types
//!
//! This module defines the diagram elements: lanes and the typed blocks that
//! live inside them. Every node carries a typed data payload; the payload
//! variant determines the node kind.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A 2D position on the canvas
///
/// Positions of parented blocks are relative to the owning lane's origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate
    pub x: f64,

    /// Vertical coordinate
    pub y: f64,
}

impl Position {
    /// Create a position
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Node kinds recognized on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// A horizontal container grouping blocks by role
    Lane,
    /// An actor or external stimulus starting a flow
    Trigger,
    /// A command block (user/system intent)
    Command,
    /// A domain event block
    Event,
    /// A view / read-model block
    View,
    /// A UI wireframe element
    UiElement,
    /// An automated processor (policy/automation)
    Processor,
    /// Legacy untyped block
    GenericBlock,
}

impl NodeKind {
    /// Get the kind as its wire tag
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lane => "lane",
            Self::Trigger => "trigger",
            Self::Command => "command",
            Self::Event => "event",
            Self::View => "view",
            Self::UiElement => "ui-element",
            Self::Processor => "processor",
            Self::GenericBlock => "generic-block",
        }
    }

    /// Whether this kind may be owned by a lane
    ///
    /// Lanes are containers and are never parented themselves.
    #[must_use]
    pub fn is_block(&self) -> bool {
        !matches!(self, Self::Lane)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lane" => Ok(Self::Lane),
            "trigger" => Ok(Self::Trigger),
            "command" => Ok(Self::Command),
            "event" => Ok(Self::Event),
            "view" => Ok(Self::View),
            "ui-element" => Ok(Self::UiElement),
            "processor" => Ok(Self::Processor),
            "generic-block" => Ok(Self::GenericBlock),
            _ => Err(format!("Unknown node kind: {s}")),
        }
    }
}

/// Role a lane plays in the modeled flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LaneRole {
    /// Actors and external stimuli
    Trigger,
    /// Commands and the views they feed
    CommandView,
    /// Domain events
    Event,
}

impl LaneRole {
    /// Get the role as its wire tag
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trigger => "trigger",
            Self::CommandView => "command-view",
            Self::Event => "event",
        }
    }
}

impl fmt::Display for LaneRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Typed data payload, one variant per node kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum NodeData {
    /// Lane container payload
    Lane {
        /// Display label
        label: String,
        /// Which role the lane groups, if declared
        #[serde(default, skip_serializing_if = "Option::is_none")]
        role: Option<LaneRole>,
    },

    /// Trigger block payload
    Trigger {
        /// Display label
        label: String,
    },

    /// Command block payload
    Command {
        /// Display label
        label: String,
        /// Parameter names shown on the block
        #[serde(default)]
        parameters: Vec<String>,
    },

    /// Event block payload
    Event {
        /// Display label
        label: String,
        /// Example payload text shown on the block
        #[serde(default)]
        payload: String,
    },

    /// View block payload
    View {
        /// Display label
        label: String,
        /// Ids of the event nodes this view is projected from
        #[serde(default)]
        sources: Vec<String>,
    },

    /// UI element payload
    UiElement {
        /// Display label
        label: String,
    },

    /// Processor block payload
    Processor {
        /// Display label
        label: String,
    },

    /// Legacy generic block payload
    GenericBlock {
        /// Display label
        label: String,
    },
}

impl NodeData {
    /// Create a lane payload
    #[must_use]
    pub fn lane(label: impl Into<String>) -> Self {
        Self::Lane {
            label: label.into(),
            role: None,
        }
    }

    /// Create a lane payload with a declared role
    #[must_use]
    pub fn lane_with_role(label: impl Into<String>, role: LaneRole) -> Self {
        Self::Lane {
            label: label.into(),
            role: Some(role),
        }
    }

    /// Create a trigger payload
    #[must_use]
    pub fn trigger(label: impl Into<String>) -> Self {
        Self::Trigger {
            label: label.into(),
        }
    }

    /// Create a command payload
    #[must_use]
    pub fn command(label: impl Into<String>) -> Self {
        Self::Command {
            label: label.into(),
            parameters: Vec::new(),
        }
    }

    /// Create an event payload
    #[must_use]
    pub fn event(label: impl Into<String>) -> Self {
        Self::Event {
            label: label.into(),
            payload: String::new(),
        }
    }

    /// Create a view payload
    #[must_use]
    pub fn view(label: impl Into<String>) -> Self {
        Self::View {
            label: label.into(),
            sources: Vec::new(),
        }
    }

    /// Create a UI element payload
    #[must_use]
    pub fn ui_element(label: impl Into<String>) -> Self {
        Self::UiElement {
            label: label.into(),
        }
    }

    /// Create a processor payload
    #[must_use]
    pub fn processor(label: impl Into<String>) -> Self {
        Self::Processor {
            label: label.into(),
        }
    }

    /// Create a legacy generic block payload
    #[must_use]
    pub fn generic_block(label: impl Into<String>) -> Self {
        Self::GenericBlock {
            label: label.into(),
        }
    }

    /// Get the node kind this payload implies
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Lane { .. } => NodeKind::Lane,
            Self::Trigger { .. } => NodeKind::Trigger,
            Self::Command { .. } => NodeKind::Command,
            Self::Event { .. } => NodeKind::Event,
            Self::View { .. } => NodeKind::View,
            Self::UiElement { .. } => NodeKind::UiElement,
            Self::Processor { .. } => NodeKind::Processor,
            Self::GenericBlock { .. } => NodeKind::GenericBlock,
        }
    }

    /// Get the display label
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Lane { label, .. }
            | Self::Trigger { label }
            | Self::Command { label, .. }
            | Self::Event { label, .. }
            | Self::View { label, .. }
            | Self::UiElement { label }
            | Self::Processor { label }
            | Self::GenericBlock { label } => label,
        }
    }

    /// Replace the display label
    pub fn set_label(&mut self, new_label: impl Into<String>) {
        match self {
            Self::Lane { label, .. }
            | Self::Trigger { label }
            | Self::Command { label, .. }
            | Self::Event { label, .. }
            | Self::View { label, .. }
            | Self::UiElement { label }
            | Self::Processor { label }
            | Self::GenericBlock { label } => *label = new_label.into(),
        }
    }
}

/// A diagram element: a lane or a typed block
///
/// Nodes are value objects. Transitions never mutate a node in place across
/// states; each applied command produces new node values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique node id
    pub id: String,

    /// Canvas position (relative to the parent lane for parented blocks)
    pub position: Position,

    /// Declared width, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,

    /// Declared height, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,

    /// Opaque display styling, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<serde_json::Value>,

    /// Id of the owning lane, if the node is parented
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    /// Whether the node is currently selected
    #[serde(default)]
    pub selected: bool,

    /// Last committed placement, distinct from the live in-drag position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_dropped: Option<Position>,

    /// Typed payload; its variant determines the node kind
    pub data: NodeData,
}

impl Node {
    /// Create a node with a freshly minted id
    #[must_use]
    pub fn new(data: NodeData, position: Position) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), data, position)
    }

    /// Create a node with a specific id
    #[must_use]
    pub fn with_id(id: impl Into<String>, data: NodeData, position: Position) -> Self {
        Self {
            id: id.into(),
            position,
            width: None,
            height: None,
            style: None,
            parent_id: None,
            selected: false,
            last_dropped: None,
            data,
        }
    }

    /// Attach the node to an owning lane
    #[must_use]
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Declare the node's size
    #[must_use]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Attach opaque display styling
    #[must_use]
    pub fn with_style(mut self, style: serde_json::Value) -> Self {
        self.style = Some(style);
        self
    }

    /// Get the node kind
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    /// Get the display label
    #[must_use]
    pub fn label(&self) -> &str {
        self.data.label()
    }

    /// Rightmost horizontal extent of the node
    ///
    /// A node without a declared width reads as zero wide.
    #[must_use]
    pub fn right_edge(&self) -> f64 {
        self.position.x + self.width.unwrap_or(0.0)
    }
}
