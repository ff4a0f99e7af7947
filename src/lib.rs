//! Stormlane - Event-Sourced Canvas Engine
//!
//! Facade crate over the two engine crates:
//! - [`canvas`]: The diagram data model and the pure command reducer
//! - [`replay`]: History, time travel, dispatch, and board persistence
//!
//! # Example
//!
//! ```
//! use stormlane::canvas::{CanvasCommand, Connection, Node, NodeData, Position};
//! use stormlane::replay::EditorState;
//!
//! let mut editor = EditorState::new();
//! editor.dispatch(CanvasCommand::add_block(Node::with_id(
//!     "e1",
//!     NodeData::event("OrderPlaced"),
//!     Position::new(100.0, 100.0),
//! )));
//! editor.dispatch(CanvasCommand::add_block(Node::with_id(
//!     "v1",
//!     NodeData::view("Orders"),
//!     Position::new(300.0, 100.0),
//! )));
//! editor.dispatch(CanvasCommand::connect(Connection::between("e1", "v1")));
//!
//! assert_eq!(editor.events().len(), 3);
//! assert_eq!(editor.edges().len(), 1);
//!
//! editor.undo();
//! assert!(editor.edges().is_empty());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use stormlane_canvas as canvas;
pub use stormlane_replay as replay;

pub use stormlane_canvas::{
    apply_command, CanvasCommand, CanvasState, CommandKind, Connection, Edge, LogPosition, Node,
    NodeData, NodeKind, Position,
};
pub use stormlane_replay::{export_json, import_json, BoardDocument, EditorState, HistoryState};
