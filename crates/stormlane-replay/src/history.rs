//! History Store
//!
//! Owns the append-only command log, the undo/redo pointer, and the optional
//! compaction snapshot. The whole history is one atomic unit owned by a
//! single editing session: created empty, mutated only through these
//! operations, replaced wholesale on load, compacted (never destroyed) on
//! snapshot.
//!
//! The store's standing invariant: replaying `events[0..=cursor]` from the
//! base (snapshot state, or the empty canvas without one) always reproduces
//! the live canvas the dispatcher holds.

use crate::replay::{replay, replay_all};
use serde::{Deserialize, Serialize};
use stormlane_canvas::{CanvasCommand, CanvasState, LogPosition};
use tracing::{debug, info, instrument};

/// Compaction base: a precomputed canvas replacing a discarded log prefix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotBase {
    /// Canvas state the discarded prefix produced
    pub state: CanvasState,

    /// Pointer position in the pre-compaction log this base corresponds to
    pub position: LogPosition,
}

/// The undoable command log with its pointer and optional compaction base
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryState {
    events: Vec<CanvasCommand>,
    cursor: LogPosition,
    snapshot: Option<SnapshotBase>,
}

impl HistoryState {
    /// Create an empty history
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a history from a persisted log and pointer
    ///
    /// Callers are responsible for a pointer that is in range for the log;
    /// the document layer validates before constructing.
    #[must_use]
    pub fn with_log(events: Vec<CanvasCommand>, cursor: LogPosition) -> Self {
        Self {
            events,
            cursor,
            snapshot: None,
        }
    }

    /// Rebuild a history whose pointer sits exactly at a compacted base
    ///
    /// The base canvas stands in for a log prefix that is no longer
    /// available; `events` is the still-redoable suffix and folds from the
    /// base, never from the empty canvas.
    #[must_use]
    pub fn with_compacted_log(base: CanvasState, events: Vec<CanvasCommand>) -> Self {
        Self {
            events,
            cursor: LogPosition::Base,
            snapshot: Some(SnapshotBase {
                state: base,
                position: LogPosition::Base,
            }),
        }
    }

    /// The logged commands, oldest first
    #[must_use]
    pub fn events(&self) -> &[CanvasCommand] {
        &self.events
    }

    /// The current pointer position
    #[must_use]
    pub fn cursor(&self) -> LogPosition {
        self.cursor
    }

    /// The compaction base, if one exists
    #[must_use]
    pub fn snapshot(&self) -> Option<&SnapshotBase> {
        self.snapshot.as_ref()
    }

    /// Number of logged commands
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the log is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Whether stepping the pointer back is possible
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.cursor.is_base()
    }

    /// Whether stepping the pointer forward is possible
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor.applied_count() < self.events.len()
    }

    /// Append a history-worthy command at the pointer
    ///
    /// Commands past the pointer are the redo branch; committing a new
    /// command discards them, which is the classic undo/redo contract.
    pub fn record(&mut self, command: CanvasCommand) {
        let discarded = self.events.len().saturating_sub(self.cursor.applied_count());
        if discarded > 0 {
            debug!("Discarding {discarded} redo commands past the pointer");
        }
        self.events.truncate(self.cursor.applied_count());
        self.events.push(command);
        self.cursor = LogPosition::At(self.events.len() - 1);
    }

    /// Rebuild the canvas at `target` and move the pointer there
    ///
    /// `Base` resolves to the compaction base (or the empty canvas) with no
    /// replay at all. An index past the end of the log is a malformed meta
    /// command: the store stays untouched and `None` is returned.
    pub fn time_travel(&mut self, target: LogPosition) -> Option<CanvasState> {
        let reconstructed = match target {
            LogPosition::Base => self.base_state(),
            LogPosition::At(index) => {
                if index >= self.events.len() {
                    debug!("Time-travel target {index} out of range; ignoring");
                    return None;
                }
                replay(&self.events, target, self.base_state(), 0)
            }
        };
        self.cursor = target;
        Some(reconstructed)
    }

    /// Replace the whole history with the given log
    ///
    /// Discards any compaction base, replays the list from the empty canvas,
    /// and leaves the pointer on the last command (or at base for an empty
    /// list). Returns the replayed canvas.
    #[instrument(skip(self, events), fields(count = events.len()))]
    pub fn load(&mut self, events: Vec<CanvasCommand>) -> CanvasState {
        self.snapshot = None;
        self.events = events;
        self.cursor = match self.events.len() {
            0 => LogPosition::Base,
            n => LogPosition::At(n - 1),
        };
        info!("Loaded {} commands into history", self.events.len());
        replay_all(&self.events)
    }

    /// Compact the log prefix into a snapshot of the live canvas
    ///
    /// Every command at or before the pointer is discarded; the suffix (the
    /// redo branch, if any) stays and is re-indexed from zero. The live state
    /// is stored verbatim as the new base — never recomputed, so the
    /// discarded prefix is never needed again — and the pointer resets to
    /// base, meaning "exactly at the snapshot".
    pub fn create_snapshot(&mut self, live: &CanvasState) {
        let cut = self.cursor;
        let dropped = cut.applied_count().min(self.events.len());
        self.events.drain(..dropped);
        self.snapshot = Some(SnapshotBase {
            state: live.clone(),
            position: cut,
        });
        self.cursor = LogPosition::Base;
        info!(
            "Compacted {dropped} commands into snapshot; {} remain",
            self.events.len()
        );
    }

    /// The state the log replays from: the snapshot base or the empty canvas
    #[must_use]
    pub fn base_state(&self) -> CanvasState {
        self.snapshot
            .as_ref()
            .map(|s| s.state.clone())
            .unwrap_or_default()
    }
}
