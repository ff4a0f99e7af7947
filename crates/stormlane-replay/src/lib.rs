//! Stormlane Replay - Event-Sourced History Engine
//!
//! This crate provides the history system for Stormlane:
//! - Replay: Fold a command log into a canvas
//! - History: The undoable log with snapshot compaction
//! - Dispatch: The single entry point every command flows through
//! - Timeline: Human-readable history views and statistics
//! - Document: JSON import and export of whole boards

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod dispatch;
pub mod document;
pub mod error;
pub mod history;
pub mod replay;
pub mod timeline;

pub use dispatch::EditorState;
pub use document::{export_json, import_json, BoardDocument};
pub use error::{Error, Result};
pub use history::{HistoryState, SnapshotBase};
pub use replay::{replay, replay_all};
pub use timeline::{build_timeline, history_stats, HistoryStats, TimelineEntry};
