//! File-backed tree archive
//!
//! Stores one JSON file per (tree, shot) at `<root>/<tree>/<shot>.json`:
//!
//! ```text
//! {
//!   "default": "\\MAGNETICS::TOP",
//!   "nodes": {
//!     "\\MAGNETICS::Ip": { "data": [...], "dim": [...] }
//!   }
//! }
//! ```
//!
//! Node paths are matched case-insensitively.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::source::{RawSignal, SourceError, Tree, TreeProvider};

/// On-disk contents of one tree
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreeFile {
    /// Default node path
    pub default: String,
    /// Signal nodes keyed by full path
    #[serde(default)]
    pub nodes: BTreeMap<String, RawSignal>,
}

/// In-memory tree for a single shot
#[derive(Debug, Clone)]
pub struct ArchiveTree {
    name: String,
    shot: i64,
    file: TreeFile,
}

impl ArchiveTree {
    /// Create an empty tree whose default node is `\<NAME>::TOP`
    pub fn new(name: &str, shot: i64) -> Self {
        Self {
            name: name.to_string(),
            shot,
            file: TreeFile {
                default: format!("\\{}::TOP", name.to_uppercase()),
                nodes: BTreeMap::new(),
            },
        }
    }

    /// Wrap already loaded tree contents
    pub fn from_file(name: &str, shot: i64, file: TreeFile) -> Self {
        Self {
            name: name.to_string(),
            shot,
            file,
        }
    }

    /// Add or replace a node
    pub fn with_node(mut self, path: &str, signal: RawSignal) -> Self {
        self.file.nodes.insert(path.to_string(), signal);
        self
    }

    /// Change the default node path
    pub fn set_default(&mut self, path: &str) {
        self.file.default = path.to_string();
    }

    /// Tree contents as stored on disk
    pub fn file(&self) -> &TreeFile {
        &self.file
    }
}

impl Tree for ArchiveTree {
    fn shot(&self) -> i64 {
        self.shot
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn default_path(&self) -> String {
        self.file.default.clone()
    }

    fn node_signal(&self, path: &str) -> Result<RawSignal, SourceError> {
        self.file
            .nodes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(path))
            .map(|(_, signal)| signal.clone())
            .ok_or_else(|| SourceError::NodeNotFound(path.to_string()))
    }
}

/// Directory of tree files
#[derive(Debug, Clone)]
pub struct Archive {
    root: PathBuf,
}

impl Archive {
    /// Archive rooted at `root`; the directory need not exist yet
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path for `tree` and `shot`
    pub fn tree_path(&self, tree: &str, shot: i64) -> PathBuf {
        self.root
            .join(tree.to_lowercase())
            .join(format!("{}.json", shot))
    }

    /// Write a tree to the archive, creating directories as needed
    pub fn store(&self, tree: &ArchiveTree) -> Result<PathBuf, SourceError> {
        let path = self.tree_path(tree.name(), tree.shot());
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(tree.file())?;
        std::fs::write(&path, json)?;
        tracing::debug!(path = %path.display(), "tree_stored");
        Ok(path)
    }

    /// Shot numbers available for `tree`, sorted ascending
    pub fn shots(&self, tree: &str) -> Result<Vec<i64>, SourceError> {
        let dir = self.root.join(tree.to_lowercase());
        let mut shots = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(shot) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse().ok())
            {
                shots.push(shot);
            }
        }
        shots.sort_unstable();
        Ok(shots)
    }
}

impl TreeProvider for Archive {
    fn open(&self, tree: &str, shot: i64) -> Result<Box<dyn Tree>, SourceError> {
        let path = self.tree_path(tree, shot);
        if !path.is_file() {
            return Err(SourceError::TreeNotFound {
                tree: tree.to_string(),
                shot,
            });
        }
        let contents = std::fs::read_to_string(&path)?;
        let file: TreeFile = serde_json::from_str(&contents)?;
        tracing::trace!(path = %path.display(), nodes = file.nodes.len(), "tree_opened");
        Ok(Box::new(ArchiveTree::from_file(tree, shot, file)))
    }
}
