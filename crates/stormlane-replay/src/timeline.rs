//! Timeline - History query and display API
//!
//! Read-only views over an editor's command log: a human-readable timeline
//! of what happened, and aggregate statistics for history panels. Nothing
//! here mutates the editor.

use crate::dispatch::EditorState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use stormlane_canvas::{CanvasCommand, CommandKind};

/// One row in a history timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    /// Zero-based position in the log
    pub index: usize,
    /// Classification of the logged command
    pub kind: CommandKind,
    /// Human-readable description
    pub summary: String,
    /// Whether the entry is at or before the undo/redo pointer
    pub applied: bool,
}

/// Aggregate statistics over an editor's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    /// Total number of logged commands
    pub event_count: usize,
    /// Number of commands at or before the pointer
    pub applied_count: usize,
    /// Command counts keyed by kind tag
    pub counts_by_kind: HashMap<String, usize>,
    /// Whether a compaction snapshot exists
    pub has_snapshot: bool,
    /// Whether an undo step is available
    pub can_undo: bool,
    /// Whether a redo step is available
    pub can_redo: bool,
}

/// Build a timeline of the editor's logged commands, oldest first
#[must_use]
pub fn build_timeline(editor: &EditorState) -> Vec<TimelineEntry> {
    let applied_count = editor.current_event_index().applied_count();

    editor
        .events()
        .iter()
        .enumerate()
        .map(|(index, command)| TimelineEntry {
            index,
            kind: command.kind(),
            summary: summarize_command(command),
            applied: index < applied_count,
        })
        .collect()
}

/// Calculate aggregate statistics for the editor's history
#[must_use]
pub fn history_stats(editor: &EditorState) -> HistoryStats {
    let mut counts_by_kind: HashMap<String, usize> = HashMap::new();
    for command in editor.events() {
        *counts_by_kind
            .entry(command.kind().as_str().to_string())
            .or_insert(0) += 1;
    }

    HistoryStats {
        event_count: editor.events().len(),
        applied_count: editor.current_event_index().applied_count(),
        counts_by_kind,
        has_snapshot: editor.history().snapshot().is_some(),
        can_undo: editor.can_undo(),
        can_redo: editor.can_redo(),
    }
}

/// One-line description of a command for timeline display
#[must_use]
pub fn summarize_command(command: &CanvasCommand) -> String {
    match command {
        CanvasCommand::ApplyNodeChanges { changes } => {
            format!("Node changes: {} updates", changes.len())
        }
        CanvasCommand::ApplyEdgeChanges { changes } => {
            format!("Edge changes: {} updates", changes.len())
        }
        CanvasCommand::Connect { connection } => {
            let source = connection.source.as_deref().unwrap_or("?");
            let target = connection.target.as_deref().unwrap_or("?");
            format!("Connect {} to {}", source, target)
        }
        CanvasCommand::AddLane { node } => {
            format!("Add lane: {}", truncate(node.label(), 40))
        }
        CanvasCommand::AddBlock { node } => {
            format!("Add {}: {}", node.kind(), truncate(node.label(), 40))
        }
        CanvasCommand::UpdateLabel { id, label } => {
            format!("Rename {} to {}", id, truncate(label, 40))
        }
        CanvasCommand::UpdateParameters { id, parameters } => {
            format!("Update parameters on {} ({})", id, parameters.len())
        }
        CanvasCommand::UpdatePayload { id, payload } => {
            format!("Update payload on {}: {}", id, truncate(payload, 40))
        }
        CanvasCommand::UpdateSources { id, sources } => {
            format!("Update sources on {} ({})", id, sources.len())
        }
        CanvasCommand::MoveNode { id, position } => {
            format!("Move {} to ({}, {})", id, position.x, position.y)
        }
        CanvasCommand::RemoveNode { id } => format!("Remove {}", id),
        CanvasCommand::TimeTravel { index } => format!("Time travel to {}", index),
        CanvasCommand::LoadEvents { events } => {
            format!("Load {} commands", events.len())
        }
        CanvasCommand::CreateSnapshot => "Create snapshot".to_string(),
        CanvasCommand::Unknown => "Unrecognized command".to_string(),
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let cut = max_len.saturating_sub(3);
        let safe_end = s
            .char_indices()
            .take_while(|(i, _)| *i < cut)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}...", &s[..safe_end])
    }
}
