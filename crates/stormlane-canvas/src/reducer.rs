//! Canvas Reducer
//!
//! The single pure transition: fold one command into a canvas state. Total by
//! construction — malformed or unrecognized commands degrade to no-ops
//! instead of errors, because commands originate from UI gestures that can
//! race with concurrent edits (a label update may target a node deleted a
//! moment earlier). Domain legality (whether a connection between two block
//! kinds is allowed) is the command producer's concern, not the reducer's.

use crate::command::{CanvasCommand, Connection, EdgeChange, NodeChange};
use crate::edge::Edge;
use crate::node::{Node, NodeData, NodeKind, Position};
use crate::state::CanvasState;
use tracing::debug;

/// Horizontal margin kept between a block's right edge and its lane's edge
pub const LANE_GROWTH_PADDING: f64 = 20.0;

/// Apply one command to the canvas, producing the next canvas
///
/// Pure and synchronous: the result depends only on the arguments, and equal
/// arguments always produce structurally equal results. History-control meta
/// commands are not canvas transitions and pass the state through unchanged.
#[must_use]
pub fn apply_command(mut state: CanvasState, command: &CanvasCommand) -> CanvasState {
    match command {
        CanvasCommand::ApplyNodeChanges { changes } => {
            for change in changes {
                apply_node_change(&mut state, change);
            }
            state
        }
        CanvasCommand::ApplyEdgeChanges { changes } => {
            for change in changes {
                apply_edge_change(&mut state, change);
            }
            state
        }
        CanvasCommand::Connect { connection } => connect(state, connection),
        CanvasCommand::AddLane { node } => {
            state.nodes.push(node.clone());
            state
        }
        CanvasCommand::AddBlock { node } => add_block(state, node),
        CanvasCommand::UpdateLabel { id, label } => {
            match state.node_mut(id) {
                Some(node) => node.data.set_label(label.clone()),
                None => debug!("Ignoring label update for unknown node {id}"),
            }
            state
        }
        CanvasCommand::UpdateParameters { id, parameters } => {
            update_data_field(&mut state, id, "parameters", |data| {
                if let NodeData::Command { parameters: current, .. } = data {
                    *current = parameters.clone();
                    true
                } else {
                    false
                }
            });
            state
        }
        CanvasCommand::UpdatePayload { id, payload } => {
            update_data_field(&mut state, id, "payload", |data| {
                if let NodeData::Event { payload: current, .. } = data {
                    *current = payload.clone();
                    true
                } else {
                    false
                }
            });
            state
        }
        CanvasCommand::UpdateSources { id, sources } => {
            update_data_field(&mut state, id, "sources", |data| {
                if let NodeData::View { sources: current, .. } = data {
                    *current = sources.clone();
                    true
                } else {
                    false
                }
            });
            state
        }
        CanvasCommand::MoveNode { id, position } => {
            match state.node_mut(id) {
                Some(node) => {
                    node.position = *position;
                    node.last_dropped = Some(*position);
                }
                None => debug!("Ignoring move for unknown node {id}"),
            }
            state
        }
        CanvasCommand::RemoveNode { id } => {
            state.nodes.retain(|n| n.id != *id);
            state.edges.retain(|e| !e.touches(id));
            state
        }
        // History control is the dispatcher's job; an unknown tag is a
        // command this build cannot interpret. Both leave the canvas as-is.
        CanvasCommand::TimeTravel { .. }
        | CanvasCommand::LoadEvents { .. }
        | CanvasCommand::CreateSnapshot
        | CanvasCommand::Unknown => state,
    }
}

/// Apply one primitive node change in place
fn apply_node_change(state: &mut CanvasState, change: &NodeChange) {
    match change {
        NodeChange::Position { id, position, .. } => {
            if let (Some(node), Some(position)) = (state.node_mut(id), position) {
                node.position = *position;
            }
        }
        NodeChange::Dimensions { id, width, height } => {
            if let Some(node) = state.node_mut(id) {
                if width.is_some() {
                    node.width = *width;
                }
                if height.is_some() {
                    node.height = *height;
                }
            }
        }
        NodeChange::Select { id, selected } => {
            if let Some(node) = state.node_mut(id) {
                node.selected = *selected;
            }
        }
        NodeChange::Remove { id } => {
            state.nodes.retain(|n| n.id != *id);
        }
    }
}

/// Apply one primitive edge change in place
fn apply_edge_change(state: &mut CanvasState, change: &EdgeChange) {
    match change {
        EdgeChange::Select { id, selected } => {
            if let Some(edge) = state.edges.iter_mut().find(|e| e.id == *id) {
                edge.selected = *selected;
            }
        }
        EdgeChange::Remove { id } => {
            state.edges.retain(|e| e.id != *id);
        }
    }
}

/// Materialize a proposed connection, or drop an incomplete one
fn connect(mut state: CanvasState, connection: &Connection) -> CanvasState {
    let (Some(source), Some(target)) = (&connection.source, &connection.target) else {
        debug!("Ignoring connection proposal without both endpoints");
        return state;
    };

    let id = next_edge_id(&state.edges, source, target);
    state.edges.push(Edge {
        id,
        source: source.clone(),
        target: target.clone(),
        source_handle: connection.source_handle.clone(),
        target_handle: connection.target_handle.clone(),
        pattern: connection.pattern.unwrap_or_default(),
        marker: connection.marker.unwrap_or_default(),
        condition: connection.condition.clone(),
        priority: connection.priority,
        style: connection.style.clone(),
        selected: false,
    });
    state
}

/// Synthesize a fresh edge id for the given endpoints
///
/// Must be a pure function of the current edges so replay reproduces the
/// same ids, and must never collide — including when earlier removals have
/// freed lower suffixes while higher ones are still taken.
fn next_edge_id(edges: &[Edge], source: &str, target: &str) -> String {
    let mut suffix = edges
        .iter()
        .filter(|e| e.source == source && e.target == target)
        .count();
    loop {
        let candidate = format!("edge-{source}-{target}-{suffix}");
        if !edges.iter().any(|e| e.id == candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

/// Append a block and grow its parent lane if the block does not fit
fn add_block(mut state: CanvasState, node: &Node) -> CanvasState {
    state.nodes.push(node.clone());

    let Some(parent_id) = &node.parent_id else {
        return state;
    };
    let required = node.right_edge() + LANE_GROWTH_PADDING;
    match state.node_mut(parent_id) {
        Some(lane) if lane.kind() == NodeKind::Lane => {
            // Growth-only: a block that already fits changes nothing.
            if required > lane.width.unwrap_or(0.0) {
                lane.width = Some(required);
            }
        }
        Some(_) => debug!("Parent {parent_id} is not a lane; skipping width growth"),
        None => debug!("Parent lane {parent_id} not found; skipping width growth"),
    }
    state
}

/// Replace one named field inside a node's data payload
///
/// No-op when the node is missing or its payload variant has no such field.
fn update_data_field<F>(state: &mut CanvasState, id: &str, field: &str, replace: F)
where
    F: FnOnce(&mut NodeData) -> bool,
{
    match state.node_mut(id) {
        Some(node) => {
            if !replace(&mut node.data) {
                debug!("Node {id} has no {field} field; update ignored");
            }
        }
        None => debug!("Ignoring {field} update for unknown node {id}"),
    }
}

/// Fold a committed placement into a node
///
/// Exposed for collaborators that preview a drop before dispatching.
#[must_use]
pub fn committed_position(node: &Node) -> Position {
    node.last_dropped.unwrap_or(node.position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::LogPosition;
    use crate::edge::{EdgeMarker, EdgePattern};

    fn lane(id: &str, width: f64) -> Node {
        Node::with_id(id, NodeData::lane("Lane"), Position::default()).with_size(width, 300.0)
    }

    fn block_in(lane_id: &str, id: &str, x: f64, width: f64) -> Node {
        Node::with_id(id, NodeData::event("E"), Position::new(x, 40.0))
            .with_parent(lane_id)
            .with_size(width, 60.0)
    }

    fn apply_all(state: CanvasState, commands: &[CanvasCommand]) -> CanvasState {
        commands
            .iter()
            .fold(state, |state, command| apply_command(state, command))
    }

    #[test]
    fn test_meta_and_unknown_commands_are_no_ops() {
        let state = apply_all(
            CanvasState::new(),
            &[CanvasCommand::add_lane(lane("lane-1", 800.0))],
        );
        for command in [
            CanvasCommand::time_travel(LogPosition::Base),
            CanvasCommand::load_events(vec![CanvasCommand::remove_node("lane-1")]),
            CanvasCommand::CreateSnapshot,
            CanvasCommand::Unknown,
        ] {
            let next = apply_command(state.clone(), &command);
            assert_eq!(next, state, "{:?} must not touch the canvas", command.kind());
        }
    }

    #[test]
    fn test_add_lane_appends_as_is() {
        let state = apply_command(
            CanvasState::new(),
            &CanvasCommand::add_lane(lane("lane-1", 800.0)),
        );
        assert_eq!(state.nodes.len(), 1);
        assert_eq!(state.node("lane-1").and_then(|n| n.width), Some(800.0));
    }

    #[test]
    fn test_lane_grows_to_fit_new_block() {
        let state = apply_all(
            CanvasState::new(),
            &[
                CanvasCommand::add_lane(lane("lane-1", 800.0)),
                CanvasCommand::add_block(block_in("lane-1", "b1", 750.0, 100.0)),
            ],
        );
        // 750 + 100 + 20 padding
        assert_eq!(state.node("lane-1").and_then(|n| n.width), Some(870.0));
    }

    #[test]
    fn test_lane_growth_is_idempotent_for_fitting_blocks() {
        let state = apply_all(
            CanvasState::new(),
            &[
                CanvasCommand::add_lane(lane("lane-1", 800.0)),
                CanvasCommand::add_block(block_in("lane-1", "b1", 750.0, 100.0)),
                CanvasCommand::add_block(block_in("lane-1", "b2", 500.0, 100.0)),
            ],
        );
        // 500 + 100 + 20 = 620 < 870, so the width stays put.
        assert_eq!(state.node("lane-1").and_then(|n| n.width), Some(870.0));
        assert_eq!(state.nodes.len(), 3);
    }

    #[test]
    fn test_lane_growth_never_shrinks() {
        let mut state = CanvasState::new();
        let mut widths = Vec::new();
        state = apply_command(state, &CanvasCommand::add_lane(lane("lane-1", 100.0)));
        for (i, x) in [0.0, 150.0, 300.0, 450.0].iter().enumerate() {
            let id = format!("b{i}");
            state = apply_command(
                state,
                &CanvasCommand::add_block(block_in("lane-1", &id, *x, 80.0)),
            );
            widths.push(state.node("lane-1").and_then(|n| n.width).unwrap());
        }
        assert!(widths.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(widths.last(), Some(&550.0));
    }

    #[test]
    fn test_lane_without_width_adopts_required_extent() {
        let bare = Node::with_id("lane-1", NodeData::lane("Lane"), Position::default());
        let state = apply_all(
            CanvasState::new(),
            &[
                CanvasCommand::add_lane(bare),
                CanvasCommand::add_block(block_in("lane-1", "b1", 100.0, 50.0)),
            ],
        );
        assert_eq!(state.node("lane-1").and_then(|n| n.width), Some(170.0));
    }

    #[test]
    fn test_block_with_missing_or_non_lane_parent_still_appends() {
        let state = apply_all(
            CanvasState::new(),
            &[
                CanvasCommand::add_block(block_in("ghost", "b1", 10.0, 50.0)),
                CanvasCommand::add_block(
                    Node::with_id("b2", NodeData::trigger("T"), Position::default())
                        .with_parent("b1"),
                ),
            ],
        );
        assert_eq!(state.nodes.len(), 2);
        // b1 is not a lane, so parenting b2 to it grows nothing.
        assert_eq!(state.node("b1").and_then(|n| n.width), Some(50.0));
    }

    #[test]
    fn test_unparented_block_grows_nothing() {
        let state = apply_all(
            CanvasState::new(),
            &[
                CanvasCommand::add_lane(lane("lane-1", 100.0)),
                CanvasCommand::add_block(
                    Node::with_id("b1", NodeData::event("E"), Position::new(900.0, 0.0))
                        .with_size(100.0, 60.0),
                ),
            ],
        );
        assert_eq!(state.node("lane-1").and_then(|n| n.width), Some(100.0));
    }

    #[test]
    fn test_connect_creates_edge_with_defaults() {
        let state = apply_command(
            CanvasState::new(),
            &CanvasCommand::connect(Connection::between("e1", "v1")),
        );
        assert_eq!(state.edges.len(), 1);
        let edge = &state.edges[0];
        assert_eq!(edge.source, "e1");
        assert_eq!(edge.target, "v1");
        assert_eq!(edge.pattern, EdgePattern::Default);
        assert_eq!(edge.marker, EdgeMarker::ArrowClosed);
    }

    #[test]
    fn test_connect_carries_proposal_metadata() {
        let proposal = Connection::between("e1", "v1")
            .with_pattern(EdgePattern::ViewPattern)
            .with_handles("out", "in")
            .with_condition("amount > 0");
        let state = apply_command(CanvasState::new(), &CanvasCommand::connect(proposal));
        let edge = &state.edges[0];
        assert_eq!(edge.pattern, EdgePattern::ViewPattern);
        assert_eq!(edge.source_handle.as_deref(), Some("out"));
        assert_eq!(edge.condition.as_deref(), Some("amount > 0"));
    }

    #[test]
    fn test_connect_without_endpoints_is_a_no_op() {
        for proposal in [
            Connection::default(),
            Connection {
                source: Some("e1".to_string()),
                ..Connection::default()
            },
            Connection {
                target: Some("v1".to_string()),
                ..Connection::default()
            },
        ] {
            let state = apply_command(CanvasState::new(), &CanvasCommand::connect(proposal));
            assert!(state.edges.is_empty());
        }
    }

    #[test]
    fn test_parallel_connections_get_distinct_ids() {
        let connect = CanvasCommand::connect(Connection::between("a", "b"));
        let state = apply_all(CanvasState::new(), &[connect.clone(), connect.clone()]);
        assert_eq!(state.edges.len(), 2);
        assert_ne!(state.edges[0].id, state.edges[1].id);
        assert_eq!(state.edges[0].id, "edge-a-b-0");
        assert_eq!(state.edges[1].id, "edge-a-b-1");
    }

    #[test]
    fn test_edge_ids_stay_unique_after_removals() {
        let connect = CanvasCommand::connect(Connection::between("a", "b"));
        let mut state = apply_all(CanvasState::new(), &[connect.clone(), connect.clone()]);
        // Drop the low suffix; the pair count alone would now re-mint "-1".
        state = apply_command(
            state,
            &CanvasCommand::ApplyEdgeChanges {
                changes: vec![EdgeChange::Remove {
                    id: "edge-a-b-0".to_string(),
                }],
            },
        );
        state = apply_command(state, &connect);
        assert_eq!(state.edges.len(), 2);
        let ids: Vec<&str> = state.edges.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["edge-a-b-1", "edge-a-b-2"]);
    }

    #[test]
    fn test_update_label() {
        let mut state = apply_command(
            CanvasState::new(),
            &CanvasCommand::add_block(block_in("lane-1", "b1", 0.0, 50.0)),
        );
        state = apply_command(state, &CanvasCommand::update_label("b1", "OrderPlaced"));
        assert_eq!(state.node("b1").map(|n| n.label()), Some("OrderPlaced"));

        let unchanged = apply_command(state.clone(), &CanvasCommand::update_label("nope", "X"));
        assert_eq!(unchanged, state);
    }

    #[test]
    fn test_update_parameters_only_touches_command_blocks() {
        let command_block = Node::with_id("c1", NodeData::command("Place order"), Position::default());
        let event_block = Node::with_id("e1", NodeData::event("OrderPlaced"), Position::default());
        let mut state = apply_all(
            CanvasState::new(),
            &[
                CanvasCommand::add_block(command_block),
                CanvasCommand::add_block(event_block),
            ],
        );

        let params = vec!["orderId".to_string(), "amount".to_string()];
        state = apply_command(
            state,
            &CanvasCommand::UpdateParameters {
                id: "c1".to_string(),
                parameters: params.clone(),
            },
        );
        match &state.node("c1").unwrap().data {
            NodeData::Command { parameters, .. } => assert_eq!(*parameters, params),
            other => panic!("Expected command payload, got {other:?}"),
        }

        // Same command against an event block must change nothing.
        let before = state.clone();
        state = apply_command(
            state,
            &CanvasCommand::UpdateParameters {
                id: "e1".to_string(),
                parameters: params,
            },
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_update_payload_and_sources() {
        let mut state = apply_all(
            CanvasState::new(),
            &[
                CanvasCommand::add_block(Node::with_id(
                    "e1",
                    NodeData::event("OrderPlaced"),
                    Position::default(),
                )),
                CanvasCommand::add_block(Node::with_id(
                    "v1",
                    NodeData::view("Orders"),
                    Position::default(),
                )),
            ],
        );

        state = apply_command(
            state,
            &CanvasCommand::UpdatePayload {
                id: "e1".to_string(),
                payload: "{\"orderId\": 42}".to_string(),
            },
        );
        match &state.node("e1").unwrap().data {
            NodeData::Event { payload, .. } => assert_eq!(payload, "{\"orderId\": 42}"),
            other => panic!("Expected event payload, got {other:?}"),
        }

        state = apply_command(
            state,
            &CanvasCommand::UpdateSources {
                id: "v1".to_string(),
                sources: vec!["e1".to_string()],
            },
        );
        match &state.node("v1").unwrap().data {
            NodeData::View { sources, .. } => assert_eq!(sources, &["e1".to_string()]),
            other => panic!("Expected view payload, got {other:?}"),
        }
    }

    #[test]
    fn test_move_node_records_committed_placement() {
        let mut state = apply_command(
            CanvasState::new(),
            &CanvasCommand::add_block(block_in("lane-1", "b1", 0.0, 50.0)),
        );
        state = apply_command(
            state,
            &CanvasCommand::move_node("b1", Position::new(120.0, 80.0)),
        );
        let node = state.node("b1").unwrap();
        assert_eq!(node.position, Position::new(120.0, 80.0));
        assert_eq!(node.last_dropped, Some(Position::new(120.0, 80.0)));
        assert_eq!(committed_position(node), Position::new(120.0, 80.0));
    }

    #[test]
    fn test_drag_updates_position_but_not_committed_placement() {
        let mut state = apply_command(
            CanvasState::new(),
            &CanvasCommand::add_block(block_in("lane-1", "b1", 0.0, 50.0)),
        );
        state = apply_command(
            state,
            &CanvasCommand::ApplyNodeChanges {
                changes: vec![NodeChange::Position {
                    id: "b1".to_string(),
                    position: Some(Position::new(33.0, 44.0)),
                    dragging: Some(true),
                }],
            },
        );
        let node = state.node("b1").unwrap();
        assert_eq!(node.position, Position::new(33.0, 44.0));
        assert!(node.last_dropped.is_none());
    }

    #[test]
    fn test_remove_node_cascades_to_incident_edges() {
        let mut state = apply_all(
            CanvasState::new(),
            &[
                CanvasCommand::add_block(Node::with_id("a", NodeData::event("A"), Position::default())),
                CanvasCommand::add_block(Node::with_id("b", NodeData::view("B"), Position::default())),
                CanvasCommand::add_block(Node::with_id("c", NodeData::view("C"), Position::default())),
                CanvasCommand::connect(Connection::between("a", "b")),
                CanvasCommand::connect(Connection::between("c", "a")),
                CanvasCommand::connect(Connection::between("b", "c")),
            ],
        );
        state = apply_command(state, &CanvasCommand::remove_node("a"));

        assert!(!state.contains_node("a"));
        assert_eq!(state.nodes.len(), 2);
        // Only the edge not touching "a" survives.
        assert_eq!(state.edges.len(), 1);
        assert_eq!(state.edges[0].source, "b");
        assert_eq!(state.edges[0].target, "c");
    }

    #[test]
    fn test_bulk_node_changes() {
        let mut state = apply_all(
            CanvasState::new(),
            &[
                CanvasCommand::add_block(block_in("lane-1", "b1", 0.0, 50.0)),
                CanvasCommand::add_block(block_in("lane-1", "b2", 100.0, 50.0)),
            ],
        );
        state = apply_command(
            state,
            &CanvasCommand::ApplyNodeChanges {
                changes: vec![
                    NodeChange::Select {
                        id: "b1".to_string(),
                        selected: true,
                    },
                    NodeChange::Dimensions {
                        id: "b1".to_string(),
                        width: Some(75.0),
                        height: None,
                    },
                    NodeChange::Remove {
                        id: "b2".to_string(),
                    },
                    NodeChange::Select {
                        id: "missing".to_string(),
                        selected: true,
                    },
                ],
            },
        );
        let b1 = state.node("b1").unwrap();
        assert!(b1.selected);
        assert_eq!(b1.width, Some(75.0));
        assert_eq!(b1.height, Some(60.0));
        assert!(!state.contains_node("b2"));
    }

    #[test]
    fn test_bulk_edge_changes() {
        let mut state = apply_all(
            CanvasState::new(),
            &[
                CanvasCommand::connect(Connection::between("a", "b")),
                CanvasCommand::connect(Connection::between("b", "c")),
            ],
        );
        state = apply_command(
            state,
            &CanvasCommand::ApplyEdgeChanges {
                changes: vec![
                    EdgeChange::Select {
                        id: "edge-a-b-0".to_string(),
                        selected: true,
                    },
                    EdgeChange::Remove {
                        id: "edge-b-c-0".to_string(),
                    },
                ],
            },
        );
        assert_eq!(state.edges.len(), 1);
        assert!(state.edges[0].selected);
    }

    #[test]
    fn test_apply_command_is_deterministic() {
        let commands = vec![
            CanvasCommand::add_lane(lane("lane-1", 400.0)),
            CanvasCommand::add_block(block_in("lane-1", "b1", 380.0, 90.0)),
            CanvasCommand::connect(Connection::between("b1", "b1")),
            CanvasCommand::update_label("b1", "Renamed"),
        ];
        let first = apply_all(CanvasState::new(), &commands);
        let second = apply_all(CanvasState::new(), &commands);
        assert_eq!(first, second);
    }
}
