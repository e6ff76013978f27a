//! Snapshot (de)serialization — the persistence boundary.
//!
//! A [`ProjectSnapshot`] is a materialized, point-in-time copy of the graph
//! plus a format-version tag and a creation timestamp. The store produces
//! and consumes snapshots; writing them to disk, database, or network is the
//! embedder's concern.
//!
//! Version compatibility is enforced here, at decode time, not in
//! `GraphStore::load`: a snapshot value already in hand is trusted, bytes
//! from storage are not.

use crate::model::{ProjectEdge, ProjectNode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Point-in-time, serializable copy of a project graph.
///
/// `updated_at` is the snapshot-creation time, not an edit timestamp of any
/// individual node or edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    pub version: u32,
    #[serde(default)]
    pub nodes: Vec<ProjectNode>,
    #[serde(default)]
    pub edges: Vec<ProjectEdge>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl ProjectSnapshot {
    /// A current-version snapshot with no nodes or edges.
    pub fn empty() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            nodes: Vec::new(),
            edges: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    /// Element-wise graph equality, ignoring `version` and `updated_at`.
    pub fn same_graph(&self, other: &Self) -> bool {
        self.nodes == other.nodes && self.edges == other.edges
    }
}

/// Failure modes when decoding a persisted snapshot.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Payload decoded, but was written by a different format version.
    #[error("snapshot format version {found} is not supported (expected {SNAPSHOT_VERSION})")]
    VersionMismatch { found: u32 },
    /// Payload does not decode as a snapshot at all.
    #[error("malformed snapshot: {0}")]
    Malformed(String),
}

fn check_version(snapshot: ProjectSnapshot) -> Result<ProjectSnapshot, LoadError> {
    if snapshot.version == SNAPSHOT_VERSION {
        Ok(snapshot)
    } else {
        Err(LoadError::VersionMismatch {
            found: snapshot.version,
        })
    }
}

/// Encode a snapshot as the canonical JSON document format.
///
/// # Errors
/// Only if a `serde_json::Value` inside node attributes refuses to
/// serialize, which does not happen for values parsed from JSON.
pub fn to_json(snapshot: &ProjectSnapshot) -> serde_json::Result<String> {
    serde_json::to_string(snapshot)
}

/// Decode a snapshot from its JSON document format, enforcing the version.
///
/// Missing `nodes`/`edges` arrays decode as empty collections.
///
/// # Errors
/// [`LoadError::Malformed`] when the text is not a structurally valid
/// snapshot, [`LoadError::VersionMismatch`] when it is but was written by
/// another format version.
pub fn from_json(text: &str) -> Result<ProjectSnapshot, LoadError> {
    let snapshot: ProjectSnapshot =
        serde_json::from_str(text).map_err(|e| LoadError::Malformed(e.to_string()))?;
    check_version(snapshot)
}

/// Encode a snapshot as MessagePack with named fields (self-describing, so
/// the JSON and MessagePack forms stay field-compatible).
///
/// # Errors
/// See [`to_json`].
pub fn to_msgpack(snapshot: &ProjectSnapshot) -> Result<Vec<u8>, rmp_serde::encode::Error> {
    rmp_serde::to_vec_named(snapshot)
}

/// Decode a snapshot from MessagePack, enforcing the version.
///
/// # Errors
/// Same contract as [`from_json`].
pub fn from_msgpack(bytes: &[u8]) -> Result<ProjectSnapshot, LoadError> {
    let snapshot: ProjectSnapshot =
        rmp_serde::from_slice(bytes).map_err(|e| LoadError::Malformed(e.to_string()))?;
    check_version(snapshot)
}
