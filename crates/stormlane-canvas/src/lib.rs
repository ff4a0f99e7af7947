//! Stormlane Canvas - Data Model and Pure Reducer
//!
//! This crate provides the canvas layer of the Stormlane engine:
//! - Node: Lanes and typed blocks with per-kind data payloads
//! - Edge: Directed connections with pattern classification
//! - Command: The tagged command union and history classification
//! - State: The `(nodes, edges)` canvas pair with id lookups
//! - Reducer: The total, pure `apply_command` transition
//!
//! ## Usage
//!
//! ```
//! use stormlane_canvas::{
//!     apply_command, CanvasCommand, CanvasState, Node, NodeData, Position,
//! };
//!
//! let lane = Node::with_id("lane-1", NodeData::lane("Orders"), Position::default())
//!     .with_size(800.0, 300.0);
//! let state = apply_command(CanvasState::new(), &CanvasCommand::add_lane(lane));
//! assert_eq!(state.nodes.len(), 1);
//! ```
//!
//! The reducer is deliberately tolerant: malformed or unrecognized commands
//! leave the state unchanged instead of failing, because commands originate
//! from UI gestures that can race with one another. History bookkeeping
//! (undo, replay, compaction) lives in `stormlane-replay`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod command;
pub mod edge;
pub mod node;
pub mod reducer;
pub mod state;

// Re-export main types
pub use command::{
    CanvasCommand, CommandKind, Connection, EdgeChange, LogPosition, NodeChange,
};
pub use edge::{Edge, EdgeMarker, EdgePattern};
pub use node::{LaneRole, Node, NodeData, NodeKind, Position};
pub use reducer::{apply_command, committed_position, LANE_GROWTH_PADDING};
pub use state::CanvasState;
