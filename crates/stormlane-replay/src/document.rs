//! Board Document
//!
//! The serialization boundary for a whole board. A saved board is one JSON
//! document carrying the materialized canvas, the command log, and the
//! undo/redo pointer; the canvas is stored materialized so a document stays
//! self-contained even after its log was compacted.
//!
//! The document shape has no field for a compaction base, so a snapshotted
//! session exports as if it were compacted at the pointer: the stored canvas
//! doubles as the replay base, only the redo suffix keeps a place in the
//! log, and the pointer is written as `-1`. On import the rule inverts: a
//! base-pointer document with a non-empty canvas declares that canvas as the
//! base its log folds from.
//!
//! Two wire shapes import. The full document adopts its stored canvas and
//! pointer as-is. The legacy shape, a bare command array from early exports,
//! replays from the empty canvas instead.

use crate::dispatch::EditorState;
use crate::error::{Error, Result};
use crate::history::HistoryState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stormlane_canvas::{CanvasCommand, CanvasState, Edge, LogPosition, Node};
use tracing::{info, instrument};

/// A board persisted as one JSON document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardDocument {
    /// Materialized nodes, in z-order
    #[serde(default)]
    pub nodes: Vec<Node>,

    /// Materialized edges
    #[serde(default)]
    pub edges: Vec<Edge>,

    /// The command log, oldest first
    #[serde(default)]
    pub events: Vec<CanvasCommand>,

    /// The undo/redo pointer; `-1` on the wire means the replay base
    #[serde(default)]
    pub current_event_index: LogPosition,

    /// When this document was exported, if stamped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
}

/// The two wire shapes an import accepts
#[derive(Deserialize)]
#[serde(untagged)]
enum ImportShape {
    Full(BoardDocument),
    Legacy(Vec<CanvasCommand>),
}

impl BoardDocument {
    /// Capture an editor's current state as a document
    ///
    /// A session holding a compaction base cannot write that base into the
    /// document, so it exports as if compacted at the pointer: only the
    /// commands past the pointer keep a place in the log, and the pointer is
    /// written as base. The redo branch survives a reimport; states before
    /// the exported one are not reachable from the document.
    #[must_use]
    pub fn from_editor(editor: &EditorState) -> Self {
        let history = editor.history();
        let (events, current_event_index) = if history.snapshot().is_some() {
            let applied = history.cursor().applied_count().min(history.events().len());
            (history.events()[applied..].to_vec(), LogPosition::Base)
        } else {
            (history.events().to_vec(), history.cursor())
        };

        Self {
            nodes: editor.nodes().to_vec(),
            edges: editor.edges().to_vec(),
            events,
            current_event_index,
            exported_at: None,
        }
    }

    /// Stamp the document with the current export time
    #[must_use]
    pub fn stamped(mut self) -> Self {
        self.exported_at = Some(Utc::now());
        self
    }

    /// Turn the document into a live editor
    ///
    /// The stored canvas and pointer are adopted verbatim; nothing is
    /// replayed. A base pointer over a non-empty canvas marks a compacted
    /// export: that canvas is also the replay base, so a redo folds the
    /// suffix from it rather than from the empty canvas. A pointer past the
    /// end of the log makes the document unusable and is rejected.
    pub fn into_editor(self) -> Result<EditorState> {
        if let LogPosition::At(index) = self.current_event_index {
            if index >= self.events.len() {
                return Err(Error::invalid_document(format!(
                    "currentEventIndex {} out of range for {} events",
                    index,
                    self.events.len()
                )));
            }
        }

        let canvas = CanvasState::from_parts(self.nodes, self.edges);
        let history = if self.current_event_index.is_base() && !canvas.is_empty() {
            HistoryState::with_compacted_log(canvas.clone(), self.events)
        } else {
            HistoryState::with_log(self.events, self.current_event_index)
        };
        Ok(EditorState::from_parts(canvas, history))
    }
}

/// Parse a JSON document into a live editor
///
/// Accepts both wire shapes; see the module docs.
#[instrument(skip(json), fields(bytes = json.len()))]
pub fn import_json(json: &str) -> Result<EditorState> {
    match serde_json::from_str::<ImportShape>(json)? {
        ImportShape::Full(document) => {
            info!(
                "Importing full document: {} nodes, {} events",
                document.nodes.len(),
                document.events.len()
            );
            document.into_editor()
        }
        ImportShape::Legacy(events) => {
            info!("Importing legacy command list: {} events", events.len());
            let mut editor = EditorState::new();
            editor.dispatch(CanvasCommand::load_events(events));
            Ok(editor)
        }
    }
}

/// Serialize an editor as a pretty-printed, timestamped JSON document
pub fn export_json(editor: &EditorState) -> Result<String> {
    let document = BoardDocument::from_editor(editor).stamped();
    Ok(serde_json::to_string_pretty(&document)?)
}
