//! Canvas Edge Types
//!
//! Directed connections between nodes, with the pattern classification the
//! rendering layer uses to pick line styles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Visual/semantic classification of a connection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgePattern {
    /// Trigger or UI element into a command
    CommandPattern,
    /// Event into a view / read model
    ViewPattern,
    /// View or event into an automated processor
    AutomationPattern,
    /// View into a UI element
    UiPattern,
    /// Processor into a command
    ProcessorPattern,
    /// Unclassified connection
    #[default]
    Default,
}

impl EdgePattern {
    /// Get the pattern as its wire tag
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CommandPattern => "command-pattern",
            Self::ViewPattern => "view-pattern",
            Self::AutomationPattern => "automation-pattern",
            Self::UiPattern => "ui-pattern",
            Self::ProcessorPattern => "processor-pattern",
            Self::Default => "default",
        }
    }
}

impl fmt::Display for EdgePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EdgePattern {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "command-pattern" => Ok(Self::CommandPattern),
            "view-pattern" => Ok(Self::ViewPattern),
            "automation-pattern" => Ok(Self::AutomationPattern),
            "ui-pattern" => Ok(Self::UiPattern),
            "processor-pattern" => Ok(Self::ProcessorPattern),
            "default" => Ok(Self::Default),
            _ => Err(format!("Unknown edge pattern: {s}")),
        }
    }
}

/// Arrowhead rendered at the target end of a connection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeMarker {
    /// Open arrowhead
    Arrow,
    /// Filled arrowhead
    #[default]
    ArrowClosed,
}

impl EdgeMarker {
    /// Get the marker as its wire tag
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Arrow => "arrow",
            Self::ArrowClosed => "arrow-closed",
        }
    }
}

impl fmt::Display for EdgeMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A directed connection between two nodes
///
/// Source and target are node ids. The reducer only materializes edges whose
/// originating command names both endpoints; it does not re-check that the
/// referenced nodes still exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Unique edge id
    pub id: String,

    /// Source node id
    pub source: String,

    /// Target node id
    pub target: String,

    /// Source attachment handle, if the renderer distinguishes them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,

    /// Target attachment handle, if the renderer distinguishes them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,

    /// Pattern classification
    #[serde(default)]
    pub pattern: EdgePattern,

    /// Arrowhead marker
    #[serde(default)]
    pub marker: EdgeMarker,

    /// Condition text displayed along the edge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,

    /// Display priority among parallel edges
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,

    /// Opaque display styling, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<serde_json::Value>,

    /// Whether the edge is currently selected
    #[serde(default)]
    pub selected: bool,
}

impl Edge {
    /// Create an edge with defaults for every optional field
    #[must_use]
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
            pattern: EdgePattern::default(),
            marker: EdgeMarker::default(),
            condition: None,
            priority: None,
            style: None,
            selected: false,
        }
    }

    /// Set the pattern classification
    #[must_use]
    pub fn with_pattern(mut self, pattern: EdgePattern) -> Self {
        self.pattern = pattern;
        self
    }

    /// Set the condition text
    #[must_use]
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Whether the edge touches the given node id as source or target
    #[must_use]
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_pattern_round_trip() {
        for pattern in [
            EdgePattern::CommandPattern,
            EdgePattern::ViewPattern,
            EdgePattern::AutomationPattern,
            EdgePattern::UiPattern,
            EdgePattern::ProcessorPattern,
            EdgePattern::Default,
        ] {
            let parsed: EdgePattern = pattern.as_str().parse().unwrap();
            assert_eq!(parsed, pattern);
        }
        assert!("dotted".parse::<EdgePattern>().is_err());
    }

    #[test]
    fn test_edge_pattern_defaults_to_default() {
        assert_eq!(EdgePattern::default(), EdgePattern::Default);
        assert_eq!(EdgeMarker::default(), EdgeMarker::ArrowClosed);
    }

    #[test]
    fn test_edge_new_defaults() {
        let edge = Edge::new("e1", "a", "b");
        assert_eq!(edge.pattern, EdgePattern::Default);
        assert_eq!(edge.marker, EdgeMarker::ArrowClosed);
        assert!(edge.condition.is_none());
        assert!(!edge.selected);
    }

    #[test]
    fn test_edge_touches() {
        let edge = Edge::new("e1", "a", "b");
        assert!(edge.touches("a"));
        assert!(edge.touches("b"));
        assert!(!edge.touches("c"));
    }

    #[test]
    fn test_edge_serialization() {
        let edge = Edge::new("e1", "a", "b").with_pattern(EdgePattern::ViewPattern);
        let json = serde_json::to_string(&edge).unwrap();
        assert!(json.contains("\"pattern\":\"view-pattern\""));
        assert!(json.contains("\"marker\":\"arrow-closed\""));
        assert!(!json.contains("sourceHandle"));

        let parsed: Edge = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, edge);
    }

    #[test]
    fn test_edge_deserialization_fills_missing_fields() {
        let parsed: Edge =
            serde_json::from_str(r#"{"id":"e1","source":"a","target":"b"}"#).unwrap();
        assert_eq!(parsed.pattern, EdgePattern::Default);
        assert_eq!(parsed.marker, EdgeMarker::ArrowClosed);
    }
}
