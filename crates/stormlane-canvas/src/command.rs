//! Canvas Commands
//!
//! This module defines the tagged command union that drives every canvas
//! transition, the primitive change lists used by bulk updates, and the
//! classification that decides which commands enter the undo history.
//!
//! Commands are immutable values. Once a command has been appended to the
//! history log it is never rewritten; replaying the log must therefore be a
//! pure function of the commands themselves.

use crate::edge::{EdgeMarker, EdgePattern};
use crate::node::{Node, Position};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Position of the history pointer inside the command log
///
/// `Base` replaces the `-1` sentinel of the wire format: it names the state
/// in which no logged command is applied — the compaction snapshot when one
/// exists, the empty canvas otherwise. `At(i)` points at the zero-based log
/// index whose command was the last one applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogPosition {
    /// At the replay base; no logged command is applied
    #[default]
    Base,
    /// At the command with this zero-based log index
    At(usize),
}

impl LogPosition {
    /// Convert a wire index into a position
    ///
    /// `-1` maps to [`LogPosition::Base`]; values below `-1` are invalid.
    #[must_use]
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            -1 => Some(Self::Base),
            i if i >= 0 => Some(Self::At(i as usize)),
            _ => None,
        }
    }

    /// Convert the position into its wire index (`Base` is `-1`)
    #[must_use]
    pub fn as_index(&self) -> i64 {
        match self {
            Self::Base => -1,
            Self::At(i) => *i as i64,
        }
    }

    /// Whether the position is the replay base
    #[must_use]
    pub fn is_base(&self) -> bool {
        matches!(self, Self::Base)
    }

    /// Number of log entries applied when the pointer sits here
    #[must_use]
    pub fn applied_count(&self) -> usize {
        match self {
            Self::Base => 0,
            Self::At(i) => i + 1,
        }
    }

    /// The position one step back, or `None` from the base
    #[must_use]
    pub fn previous(&self) -> Option<Self> {
        match self {
            Self::Base => None,
            Self::At(0) => Some(Self::Base),
            Self::At(i) => Some(Self::At(i - 1)),
        }
    }

    /// The position one step forward
    ///
    /// Unbounded; callers check the result against the log length.
    #[must_use]
    pub fn next(&self) -> Self {
        match self {
            Self::Base => Self::At(0),
            Self::At(i) => Self::At(i + 1),
        }
    }
}

impl fmt::Display for LogPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_index())
    }
}

impl Serialize for LogPosition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_index())
    }
}

impl<'de> Deserialize<'de> for LogPosition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        Self::from_index(raw)
            .ok_or_else(|| D::Error::custom(format!("log index out of range: {raw}")))
    }
}

/// A proposed connection between two nodes
///
/// Produced by the rendering layer when the user draws a connection. Both
/// endpoints are optional because an aborted gesture may hand over a partial
/// proposal; the reducer drops proposals that do not name both ends.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    /// Proposed source node id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Proposed target node id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// Source attachment handle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,

    /// Target attachment handle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,

    /// Pattern classification chosen by the collaborator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<EdgePattern>,

    /// Arrowhead marker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<EdgeMarker>,

    /// Condition text displayed along the edge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,

    /// Display priority among parallel edges
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,

    /// Opaque display styling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<serde_json::Value>,
}

impl Connection {
    /// Create a proposal naming both endpoints
    #[must_use]
    pub fn between(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            target: Some(target.into()),
            ..Self::default()
        }
    }

    /// Set the pattern classification
    #[must_use]
    pub fn with_pattern(mut self, pattern: EdgePattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Set the attachment handles
    #[must_use]
    pub fn with_handles(
        mut self,
        source_handle: impl Into<String>,
        target_handle: impl Into<String>,
    ) -> Self {
        self.source_handle = Some(source_handle.into());
        self.target_handle = Some(target_handle.into());
        self
    }

    /// Set the condition text
    #[must_use]
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Whether both endpoints are named
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.source.is_some() && self.target.is_some()
    }
}

/// A primitive change to one node, applied by bulk updates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeChange {
    /// Live position update (in-progress drag)
    Position {
        /// Target node id
        id: String,
        /// New position, if the gesture produced one
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<Position>,
        /// Whether a drag is still in progress; informational only
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dragging: Option<bool>,
    },

    /// Measured or resized dimensions
    Dimensions {
        /// Target node id
        id: String,
        /// New width, if known
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<f64>,
        /// New height, if known
        #[serde(default, skip_serializing_if = "Option::is_none")]
        height: Option<f64>,
    },

    /// Selection toggle
    Select {
        /// Target node id
        id: String,
        /// New selection state
        selected: bool,
    },

    /// Node removal
    Remove {
        /// Target node id
        id: String,
    },
}

/// A primitive change to one edge, applied by bulk updates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EdgeChange {
    /// Selection toggle
    Select {
        /// Target edge id
        id: String,
        /// New selection state
        selected: bool,
    },

    /// Edge removal
    Remove {
        /// Target edge id
        id: String,
    },
}

/// Every command the engine understands
///
/// Three families share the union: native canvas events produced by the
/// diagram surface, modeling-domain events produced by node components, and
/// history-control meta events produced by the history panel. Meta events are
/// handled by the dispatcher and pass through the reducer unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CanvasCommand {
    /// Apply a list of primitive node changes
    ApplyNodeChanges {
        /// Changes in application order
        changes: Vec<NodeChange>,
    },

    /// Apply a list of primitive edge changes
    ApplyEdgeChanges {
        /// Changes in application order
        changes: Vec<EdgeChange>,
    },

    /// Materialize a proposed connection as a new edge
    Connect {
        /// The proposal; dropped unless both endpoints are named
        connection: Connection,
    },

    /// Append a lane container
    AddLane {
        /// The lane node, appended as-is
        node: Node,
    },

    /// Append a typed block, growing the parent lane if needed
    AddBlock {
        /// The block node; its payload variant carries the kind
        node: Node,
    },

    /// Replace a node's display label
    UpdateLabel {
        /// Target node id
        id: String,
        /// New label
        label: String,
    },

    /// Replace a command block's parameter list
    UpdateParameters {
        /// Target node id
        id: String,
        /// New parameter names
        parameters: Vec<String>,
    },

    /// Replace an event block's example payload text
    UpdatePayload {
        /// Target node id
        id: String,
        /// New payload text
        payload: String,
    },

    /// Replace a view block's source-event list
    UpdateSources {
        /// Target node id
        id: String,
        /// New source node ids
        sources: Vec<String>,
    },

    /// Commit a node placement
    ///
    /// Accepts the legacy `move_block` wire tag; both spellings were always
    /// one behavior.
    #[serde(alias = "move_block")]
    MoveNode {
        /// Target node id
        id: String,
        /// Committed position
        position: Position,
    },

    /// Remove a node and every edge touching it
    RemoveNode {
        /// Target node id
        id: String,
    },

    /// Move the history pointer and rebuild the canvas at that point
    TimeTravel {
        /// Target position; `-1` on the wire means the replay base
        index: LogPosition,
    },

    /// Replace the whole history with the given log
    LoadEvents {
        /// The replacement log, replayed from the empty canvas
        events: Vec<CanvasCommand>,
    },

    /// Compact the log prefix into a snapshot of the live canvas
    CreateSnapshot,

    /// Catch-all for command tags this build does not recognize
    ///
    /// Logs written by newer builds must still replay, so unknown tags
    /// deserialize here and fold as no-ops. The foreign payload is not
    /// preserved.
    #[serde(other)]
    Unknown,
}

impl CanvasCommand {
    /// Create a connect command
    #[must_use]
    pub fn connect(connection: Connection) -> Self {
        Self::Connect { connection }
    }

    /// Create an add-lane command
    #[must_use]
    pub fn add_lane(node: Node) -> Self {
        Self::AddLane { node }
    }

    /// Create an add-block command
    #[must_use]
    pub fn add_block(node: Node) -> Self {
        Self::AddBlock { node }
    }

    /// Create an update-label command
    #[must_use]
    pub fn update_label(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::UpdateLabel {
            id: id.into(),
            label: label.into(),
        }
    }

    /// Create a move-node command
    #[must_use]
    pub fn move_node(id: impl Into<String>, position: Position) -> Self {
        Self::MoveNode {
            id: id.into(),
            position,
        }
    }

    /// Create a remove-node command
    #[must_use]
    pub fn remove_node(id: impl Into<String>) -> Self {
        Self::RemoveNode { id: id.into() }
    }

    /// Create a time-travel command
    #[must_use]
    pub fn time_travel(index: LogPosition) -> Self {
        Self::TimeTravel { index }
    }

    /// Create a load-events command
    #[must_use]
    pub fn load_events(events: Vec<CanvasCommand>) -> Self {
        Self::LoadEvents { events }
    }

    /// Get the command kind
    #[must_use]
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::ApplyNodeChanges { .. } => CommandKind::ApplyNodeChanges,
            Self::ApplyEdgeChanges { .. } => CommandKind::ApplyEdgeChanges,
            Self::Connect { .. } => CommandKind::Connect,
            Self::AddLane { .. } => CommandKind::AddLane,
            Self::AddBlock { .. } => CommandKind::AddBlock,
            Self::UpdateLabel { .. } => CommandKind::UpdateLabel,
            Self::UpdateParameters { .. } => CommandKind::UpdateParameters,
            Self::UpdatePayload { .. } => CommandKind::UpdatePayload,
            Self::UpdateSources { .. } => CommandKind::UpdateSources,
            Self::MoveNode { .. } => CommandKind::MoveNode,
            Self::RemoveNode { .. } => CommandKind::RemoveNode,
            Self::TimeTravel { .. } => CommandKind::TimeTravel,
            Self::LoadEvents { .. } => CommandKind::LoadEvents,
            Self::CreateSnapshot => CommandKind::CreateSnapshot,
            Self::Unknown => CommandKind::Unknown,
        }
    }

    /// Whether this command is recorded into the undo history
    #[must_use]
    pub fn is_history_worthy(&self) -> bool {
        self.kind().is_history_worthy()
    }

    /// Whether this command controls the history itself
    #[must_use]
    pub fn is_meta(&self) -> bool {
        self.kind().is_meta()
    }
}

/// Fieldless mirror of [`CanvasCommand`] for classification and display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    /// Bulk node changes
    ApplyNodeChanges,
    /// Bulk edge changes
    ApplyEdgeChanges,
    /// New connection
    Connect,
    /// Add lane
    AddLane,
    /// Add typed block
    AddBlock,
    /// Update label
    UpdateLabel,
    /// Update command parameters
    UpdateParameters,
    /// Update event payload
    UpdatePayload,
    /// Update view sources
    UpdateSources,
    /// Commit a placement
    MoveNode,
    /// Remove a node
    RemoveNode,
    /// Move the history pointer
    TimeTravel,
    /// Replace the history log
    LoadEvents,
    /// Compact the log
    CreateSnapshot,
    /// Unrecognized wire tag
    Unknown,
}

impl CommandKind {
    /// Every kind, in declaration order
    pub const ALL: [CommandKind; 15] = [
        Self::ApplyNodeChanges,
        Self::ApplyEdgeChanges,
        Self::Connect,
        Self::AddLane,
        Self::AddBlock,
        Self::UpdateLabel,
        Self::UpdateParameters,
        Self::UpdatePayload,
        Self::UpdateSources,
        Self::MoveNode,
        Self::RemoveNode,
        Self::TimeTravel,
        Self::LoadEvents,
        Self::CreateSnapshot,
        Self::Unknown,
    ];

    /// Get the kind as its wire tag
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ApplyNodeChanges => "apply_node_changes",
            Self::ApplyEdgeChanges => "apply_edge_changes",
            Self::Connect => "connect",
            Self::AddLane => "add_lane",
            Self::AddBlock => "add_block",
            Self::UpdateLabel => "update_label",
            Self::UpdateParameters => "update_parameters",
            Self::UpdatePayload => "update_payload",
            Self::UpdateSources => "update_sources",
            Self::MoveNode => "move_node",
            Self::RemoveNode => "remove_node",
            Self::TimeTravel => "time_travel",
            Self::LoadEvents => "load_events",
            Self::CreateSnapshot => "create_snapshot",
            Self::Unknown => "unknown",
        }
    }

    /// Whether commands of this kind are recorded into the undo history
    ///
    /// The set is closed on purpose: a misclassified kind either floods the
    /// log with drag noise or silently makes an edit non-undoable, so every
    /// kind must appear in exactly one arm here.
    #[must_use]
    pub fn is_history_worthy(&self) -> bool {
        match self {
            Self::Connect
            | Self::AddLane
            | Self::AddBlock
            | Self::UpdateLabel
            | Self::UpdateParameters
            | Self::UpdatePayload
            | Self::UpdateSources
            | Self::MoveNode
            | Self::RemoveNode => true,
            Self::ApplyNodeChanges
            | Self::ApplyEdgeChanges
            | Self::TimeTravel
            | Self::LoadEvents
            | Self::CreateSnapshot
            | Self::Unknown => false,
        }
    }

    /// Whether this kind controls the history itself
    #[must_use]
    pub fn is_meta(&self) -> bool {
        matches!(self, Self::TimeTravel | Self::LoadEvents | Self::CreateSnapshot)
    }

    /// Whether this kind only affects the live canvas
    #[must_use]
    pub fn is_transient(&self) -> bool {
        !self.is_history_worthy() && !self.is_meta()
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CommandKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "apply_node_changes" => Ok(Self::ApplyNodeChanges),
            "apply_edge_changes" => Ok(Self::ApplyEdgeChanges),
            "connect" => Ok(Self::Connect),
            "add_lane" => Ok(Self::AddLane),
            "add_block" => Ok(Self::AddBlock),
            "update_label" => Ok(Self::UpdateLabel),
            "update_parameters" => Ok(Self::UpdateParameters),
            "update_payload" => Ok(Self::UpdatePayload),
            "update_sources" => Ok(Self::UpdateSources),
            "move_node" | "move_block" => Ok(Self::MoveNode),
            "remove_node" => Ok(Self::RemoveNode),
            "time_travel" => Ok(Self::TimeTravel),
            "load_events" => Ok(Self::LoadEvents),
            "create_snapshot" => Ok(Self::CreateSnapshot),
            "unknown" => Ok(Self::Unknown),
            _ => Err(format!("Unknown command kind: {s}")),
        }
    }
}
