//! Replay Engine
//!
//! Reconstructs canvas state at any log position by folding the pure reducer
//! over a command window. The fold is linear in the window length; the
//! snapshot mechanism in [`crate::history`] exists precisely to keep that
//! window short.

use stormlane_canvas::{apply_command, CanvasCommand, CanvasState, LogPosition};

/// Fold `events[start_index..=target]` over the reducer, starting from `base`
///
/// A `Base` target, an empty log, or a target before `start_index` all return
/// `base` unchanged with no replay. A target past the end of the log clamps
/// to the last index. The fold is pure: no accumulator survives between
/// calls, and identical arguments always produce structurally equal results.
#[must_use]
pub fn replay(
    events: &[CanvasCommand],
    target: LogPosition,
    base: CanvasState,
    start_index: usize,
) -> CanvasState {
    let LogPosition::At(target_index) = target else {
        return base;
    };
    if events.is_empty() || target_index < start_index {
        return base;
    }
    let end = target_index.min(events.len() - 1);
    if end < start_index {
        return base;
    }

    events[start_index..=end]
        .iter()
        .fold(base, |state, command| apply_command(state, command))
}

/// Replay an entire log from the empty canvas
///
/// Convenience wrapper for wholesale loads: the state after the last command,
/// or the empty canvas for an empty log.
#[must_use]
pub fn replay_all(events: &[CanvasCommand]) -> CanvasState {
    match events.len() {
        0 => CanvasState::new(),
        n => replay(events, LogPosition::At(n - 1), CanvasState::new(), 0),
    }
}
