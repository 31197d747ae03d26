//! Plasma current retrieval from diagnostic trees
//!
//! A tree is a hierarchical store of named signal nodes belonging to one
//! shot. This module defines the seam to whatever backs those trees
//! ([`Tree`], [`TreeProvider`]) and the node naming rules used to locate the
//! plasma current ("Ip") node.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::signal::Signal;
use crate::DEFAULT_TREE;

/// Node name of the plasma current signal
const IP_NODE: &str = "Ip";

/// Errors raised while locating or reading a signal
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Tree not found: {tree} (shot {shot})")]
    TreeNotFound { tree: String, shot: i64 },

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Signal shape mismatch: {data} samples, {dim} timebase points")]
    ShapeMismatch { data: usize, dim: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed tree file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Raw node contents: signed samples and their time dimension
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSignal {
    /// Sample values as stored in the node
    pub data: Vec<f64>,
    /// Time base (seconds) of the samples
    pub dim: Vec<f64>,
}

impl RawSignal {
    /// Create a raw signal from samples and time base
    pub fn new(data: Vec<f64>, dim: Vec<f64>) -> Self {
        Self { data, dim }
    }
}

/// An open tree for a single shot
pub trait Tree {
    /// Shot number the tree belongs to
    fn shot(&self) -> i64;

    /// Logical tree name (e.g. "magnetics")
    fn name(&self) -> &str;

    /// Full path of the current default node, e.g. `\MAGNETICS::TOP`
    fn default_path(&self) -> String;

    /// Read a node's samples and time dimension
    fn node_signal(&self, path: &str) -> Result<RawSignal, SourceError>;
}

/// Opens trees by name and shot number
pub trait TreeProvider {
    /// Open `tree` for `shot`
    fn open(&self, tree: &str, shot: i64) -> Result<Box<dyn Tree>, SourceError>;
}

/// How the plasma current signal should be resolved
#[derive(Clone, Copy)]
pub enum SignalSource<'a> {
    /// A tree the caller already opened; Ip is resolved relative to its default node
    Handle(&'a dyn Tree),
    /// A shot number and tree name to be opened through the provider
    Shot { shot: i64, tree: &'a str },
}

impl<'a> SignalSource<'a> {
    /// Resolve from `shot` in the default tree
    pub fn shot(shot: i64) -> Self {
        SignalSource::Shot {
            shot,
            tree: DEFAULT_TREE,
        }
    }

    /// Shot number this source refers to
    pub fn shot_number(&self) -> i64 {
        match self {
            SignalSource::Handle(tree) => tree.shot(),
            SignalSource::Shot { shot, .. } => *shot,
        }
    }
}

impl fmt::Display for SignalSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalSource::Handle(tree) => write!(f, "{}:{} (open)", tree.name(), tree.shot()),
            SignalSource::Shot { shot, tree } => write!(f, "{}:{}", tree, shot),
        }
    }
}

impl fmt::Debug for SignalSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignalSource({})", self)
    }
}

/// Absolute path of the Ip node in a named tree, e.g. `\magnetics::Ip`
pub fn ip_path(tree: &str) -> String {
    format!("\\{}::{}", tree, IP_NODE)
}

/// Candidate Ip paths relative to an open tree's default node
///
/// The first candidate swaps the last three characters of the default path
/// for `Ip` (`\MAGNETICS::TOP` becomes `\MAGNETICS::Ip`). The second appends
/// `::Ip` to the default path and is only tried when the first node does not
/// exist; any other read error on the first node is returned as is.
pub fn handle_ip_paths(default_path: &str) -> [String; 2] {
    let stem = default_path
        .char_indices()
        .rev()
        .nth(2)
        .map(|(i, _)| &default_path[..i])
        .unwrap_or("");
    [
        format!("{}{}", stem, IP_NODE),
        format!("{}::{}", default_path, IP_NODE),
    ]
}

fn read_from_handle(tree: &dyn Tree) -> Result<RawSignal, SourceError> {
    let [primary, fallback] = handle_ip_paths(&tree.default_path());
    match tree.node_signal(&primary) {
        Err(SourceError::NodeNotFound(_)) => {
            tracing::debug!(path = %primary, fallback = %fallback, "ip_node_fallback");
            tree.node_signal(&fallback)
        }
        other => other,
    }
}

/// Fetch the plasma current signal described by `source`
///
/// The provider is only consulted for [`SignalSource::Shot`]; an open handle
/// is read directly.
pub fn fetch_signal(
    provider: &dyn TreeProvider,
    source: &SignalSource<'_>,
) -> Result<Signal, SourceError> {
    let raw = match source {
        SignalSource::Handle(tree) => read_from_handle(*tree)?,
        SignalSource::Shot { shot, tree } => {
            let opened = provider.open(tree, *shot)?;
            opened.node_signal(&ip_path(tree))?
        }
    };
    let signal = Signal::from_raw(raw)?;
    tracing::trace!(source = %source, samples = signal.len(), "ip_fetched");
    Ok(signal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FixedTree {
        default: String,
        nodes: HashMap<String, RawSignal>,
    }

    impl Tree for FixedTree {
        fn shot(&self) -> i64 {
            1140729030
        }

        fn name(&self) -> &str {
            "magnetics"
        }

        fn default_path(&self) -> String {
            self.default.clone()
        }

        fn node_signal(&self, path: &str) -> Result<RawSignal, SourceError> {
            self.nodes
                .get(path)
                .cloned()
                .ok_or_else(|| SourceError::NodeNotFound(path.to_string()))
        }
    }

    /// Tree whose `\MAGNETICS::Ip` node exists but can't be read
    struct BrokenIpTree;

    impl Tree for BrokenIpTree {
        fn shot(&self) -> i64 {
            1140729030
        }

        fn name(&self) -> &str {
            "magnetics"
        }

        fn default_path(&self) -> String {
            "\\MAGNETICS::TOP".to_string()
        }

        fn node_signal(&self, path: &str) -> Result<RawSignal, SourceError> {
            match path {
                "\\MAGNETICS::Ip" => Err(SourceError::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "connection reset",
                ))),
                "\\MAGNETICS::TOP::Ip" => Ok(raw()),
                _ => Err(SourceError::NodeNotFound(path.to_string())),
            }
        }
    }

    struct NoTrees;

    impl TreeProvider for NoTrees {
        fn open(&self, tree: &str, shot: i64) -> Result<Box<dyn Tree>, SourceError> {
            Err(SourceError::TreeNotFound {
                tree: tree.to_string(),
                shot,
            })
        }
    }

    fn raw() -> RawSignal {
        RawSignal::new(vec![-2e5, -1e5], vec![0.0, 1.0])
    }

    #[test]
    fn test_ip_path() {
        assert_eq!(ip_path("magnetics"), "\\magnetics::Ip");
        assert_eq!(ip_path("cmod"), "\\cmod::Ip");
    }

    #[test]
    fn test_handle_paths_from_top() {
        let [primary, fallback] = handle_ip_paths("\\MAGNETICS::TOP");
        assert_eq!(primary, "\\MAGNETICS::Ip");
        assert_eq!(fallback, "\\MAGNETICS::TOP::Ip");
    }

    #[test]
    fn test_handle_paths_short_default() {
        let [primary, fallback] = handle_ip_paths("ab");
        assert_eq!(primary, "Ip");
        assert_eq!(fallback, "ab::Ip");
    }

    #[test]
    fn test_handle_uses_primary_path() {
        let tree = FixedTree {
            default: "\\MAGNETICS::TOP".to_string(),
            nodes: HashMap::from([("\\MAGNETICS::Ip".to_string(), raw())]),
        };
        let signal = fetch_signal(&NoTrees, &SignalSource::Handle(&tree)).unwrap();
        assert_eq!(signal.current(), &[2e5, 1e5]);
    }

    #[test]
    fn test_handle_falls_back_to_appended_path() {
        let tree = FixedTree {
            default: "\\CMOD::TOP.MAGNETICS".to_string(),
            nodes: HashMap::from([("\\CMOD::TOP.MAGNETICS::Ip".to_string(), raw())]),
        };
        let signal = fetch_signal(&NoTrees, &SignalSource::Handle(&tree)).unwrap();
        assert_eq!(signal.len(), 2);
    }

    #[test]
    fn test_handle_missing_both_paths() {
        let tree = FixedTree {
            default: "\\MAGNETICS::TOP".to_string(),
            nodes: HashMap::new(),
        };
        let result = fetch_signal(&NoTrees, &SignalSource::Handle(&tree));
        assert!(matches!(result, Err(SourceError::NodeNotFound(p)) if p == "\\MAGNETICS::TOP::Ip"));
    }

    #[test]
    fn test_handle_read_error_does_not_fall_back() {
        let result = fetch_signal(&NoTrees, &SignalSource::Handle(&BrokenIpTree));
        match result {
            Err(SourceError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::ConnectionReset),
            other => panic!("expected the read error of the first node, got {:?}", other),
        }
    }

    #[test]
    fn test_shot_source_propagates_open_failure() {
        let result = fetch_signal(&NoTrees, &SignalSource::shot(1140729030));
        assert!(matches!(
            result,
            Err(SourceError::TreeNotFound { shot: 1140729030, .. })
        ));
    }

    #[test]
    fn test_source_display() {
        let source = SignalSource::Shot {
            shot: 42,
            tree: "cmod",
        };
        assert_eq!(source.to_string(), "cmod:42");
        assert_eq!(source.shot_number(), 42);
        assert_eq!(SignalSource::shot(7).to_string(), "magnetics:7");
    }
}
