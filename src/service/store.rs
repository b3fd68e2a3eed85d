//! Persistence seam for repertoires.
//!
//! Trees are read and written whole: a caller fetches a repertoire, changes
//! its tree in memory and saves tree and metadata back. Concurrent writers to
//! the same repertoire are not coordinated here (last write wins).

use crate::model::{Color, Metadata, RepertoireNode};
use crate::service::repertoire::{OwnerId, Repertoire, RepertoireId};
use std::collections::HashMap;
use thiserror::Error;
use tracing::trace;

/// Errors reported by a [RepertoireStore].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No repertoire with this id is stored.
    #[error("repertoire {0} does not exist")]
    NotFound(RepertoireId),

    /// The backing storage failed.
    #[error("storage backend failed: {0}")]
    Backend(String),
}

// =#========================================================================#=
// REPERTOIRE STORE (trait)
// =#========================================================================#=
/// Storage for repertoires, keyed by [RepertoireId].
pub trait RepertoireStore {
    /// Returns the repertoire with the given id, or `None` if there is none.
    fn get_by_id(&self, id: RepertoireId) -> Result<Option<Repertoire>, StoreError>;

    /// Replaces tree and metadata of an existing repertoire and returns it.
    fn save(
        &mut self,
        id: RepertoireId,
        tree: RepertoireNode,
        metadata: Metadata,
    ) -> Result<Repertoire, StoreError>;

    /// Creates a repertoire with a lone root at the standard start.
    fn create(&mut self, owner: OwnerId, name: &str, color: Color) -> Result<Repertoire, StoreError>;

    /// Deletes the repertoire with the given id.
    fn delete(&mut self, id: RepertoireId) -> Result<(), StoreError>;

    /// Returns how many repertoires `owner` has.
    fn count_for_owner(&self, owner: OwnerId) -> Result<usize, StoreError>;
}

// =#========================================================================#=
// IN MEMORY STORE
// =#========================================================================#=
/// [RepertoireStore] keeping everything in a [HashMap].
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    repertoires: HashMap<RepertoireId, Repertoire>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored repertoires, over all owners.
    pub fn len(&self) -> usize {
        self.repertoires.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repertoires.is_empty()
    }

    /// Returns all repertoires of `owner`, in no particular order.
    pub fn list_for_owner(&self, owner: OwnerId) -> Vec<&Repertoire> {
        self.repertoires
            .values()
            .filter(|r| r.owner_id == owner)
            .collect()
    }
}

impl RepertoireStore for InMemoryStore {
    fn get_by_id(&self, id: RepertoireId) -> Result<Option<Repertoire>, StoreError> {
        Ok(self.repertoires.get(&id).cloned())
    }

    fn save(
        &mut self,
        id: RepertoireId,
        tree: RepertoireNode,
        metadata: Metadata,
    ) -> Result<Repertoire, StoreError> {
        let repertoire = self.repertoires.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        repertoire.tree = tree;
        repertoire.metadata = metadata;
        trace!(%id, nodes = metadata.total_nodes, "[STORE] Saved repertoire");
        Ok(repertoire.clone())
    }

    fn create(&mut self, owner: OwnerId, name: &str, color: Color) -> Result<Repertoire, StoreError> {
        let repertoire = Repertoire::new(RepertoireId::new(), owner, name.to_string(), color);
        self.repertoires.insert(repertoire.id, repertoire.clone());
        trace!(id = %repertoire.id, "[STORE] Created repertoire");
        Ok(repertoire)
    }

    fn delete(&mut self, id: RepertoireId) -> Result<(), StoreError> {
        self.repertoires
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    fn count_for_owner(&self, owner: OwnerId) -> Result<usize, StoreError> {
        Ok(self
            .repertoires
            .values()
            .filter(|r| r.owner_id == owner)
            .count())
    }
}
