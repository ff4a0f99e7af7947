//! Dispatcher
//!
//! Single entry point every command flows through. Routes by classification:
//! history-worthy commands mutate the live canvas and append to the log,
//! transient commands mutate the live canvas only, meta commands operate on
//! the history store itself. Unknown commands fall through the transient
//! path, where the reducer ignores them.

use crate::history::HistoryState;
use stormlane_canvas::{apply_command, CanvasCommand, CanvasState, Edge, LogPosition, Node};
use tracing::{debug, instrument};

/// Live canvas plus its command history, driven through [`dispatch`]
///
/// [`dispatch`]: EditorState::dispatch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorState {
    canvas: CanvasState,
    history: HistoryState,
}

impl EditorState {
    /// Create an empty editor: blank canvas, empty history
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble an editor from an already-materialized canvas and history
    #[must_use]
    pub fn from_parts(canvas: CanvasState, history: HistoryState) -> Self {
        Self { canvas, history }
    }

    /// Route one command through the editor
    #[instrument(skip(self, command), fields(kind = %command.kind()))]
    pub fn dispatch(&mut self, command: CanvasCommand) {
        let kind = command.kind();
        if kind.is_meta() {
            self.apply_meta(command);
            return;
        }

        let canvas = std::mem::take(&mut self.canvas);
        self.canvas = apply_command(canvas, &command);
        if kind.is_history_worthy() {
            self.history.record(command);
        } else {
            debug!("Transient command applied without recording");
        }
    }

    fn apply_meta(&mut self, command: CanvasCommand) {
        match command {
            CanvasCommand::TimeTravel { index } => {
                if let Some(state) = self.history.time_travel(index) {
                    self.canvas = state;
                }
            }
            CanvasCommand::LoadEvents { events } => {
                self.canvas = self.history.load(events);
            }
            CanvasCommand::CreateSnapshot => {
                self.history.create_snapshot(&self.canvas);
            }
            _ => {}
        }
    }

    /// Step the pointer back one command; false when already at base
    pub fn undo(&mut self) -> bool {
        match self.history.cursor().previous() {
            Some(target) => {
                self.dispatch(CanvasCommand::time_travel(target));
                true
            }
            None => false,
        }
    }

    /// Step the pointer forward one command; false when nothing to redo
    pub fn redo(&mut self) -> bool {
        if !self.history.can_redo() {
            return false;
        }
        let target = self.history.cursor().next();
        self.dispatch(CanvasCommand::time_travel(target));
        true
    }

    /// The live canvas
    #[must_use]
    pub fn canvas(&self) -> &CanvasState {
        &self.canvas
    }

    /// The history store
    #[must_use]
    pub fn history(&self) -> &HistoryState {
        &self.history
    }

    /// Live nodes, in z-order
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.canvas.nodes
    }

    /// Live edges
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.canvas.edges
    }

    /// The logged commands, oldest first
    #[must_use]
    pub fn events(&self) -> &[CanvasCommand] {
        self.history.events()
    }

    /// The undo/redo pointer
    #[must_use]
    pub fn current_event_index(&self) -> LogPosition {
        self.history.cursor()
    }

    /// Nodes captured by the compaction base, if one exists
    #[must_use]
    pub fn snapshot_nodes(&self) -> Option<&[Node]> {
        self.history.snapshot().map(|base| base.state.nodes.as_slice())
    }

    /// Edges captured by the compaction base, if one exists
    #[must_use]
    pub fn snapshot_edges(&self) -> Option<&[Edge]> {
        self.history.snapshot().map(|base| base.state.edges.as_slice())
    }

    /// Whether an undo step is available
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether a redo step is available
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
}
