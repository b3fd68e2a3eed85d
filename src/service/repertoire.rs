//! The repertoire aggregate and its identifiers.

use crate::model::{Color, Metadata, RepertoireNode};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a [Repertoire].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepertoireId(Uuid);

impl RepertoireId {
    pub fn new() -> Self {
        RepertoireId(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        RepertoireId(uuid)
    }
}

impl Default for RepertoireId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RepertoireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of the user owning repertoires. Opaque to this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(Uuid);

impl OwnerId {
    pub fn new() -> Self {
        OwnerId(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        OwnerId(uuid)
    }
}

impl Default for OwnerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A named tree of prepared opening lines for one color.
///
/// `color` is the side whose moves in the tree are the owner's own choices.
/// `metadata` always describes `tree`; call [Repertoire::refresh_metadata]
/// after changing the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repertoire {
    pub id: RepertoireId,
    pub name: String,
    pub color: Color,
    pub owner_id: OwnerId,
    pub tree: RepertoireNode,
    pub metadata: Metadata,
}

impl Repertoire {
    /// Creates a repertoire whose tree is a lone root at the standard start.
    pub fn new(id: RepertoireId, owner_id: OwnerId, name: String, color: Color) -> Self {
        let tree = RepertoireNode::new_root();
        let metadata = Metadata::of(&tree);
        Self {
            id,
            name,
            color,
            owner_id,
            tree,
            metadata,
        }
    }

    /// Recomputes `metadata` from `tree`.
    pub fn refresh_metadata(&mut self) {
        self.metadata = Metadata::of(&self.tree);
    }
}
