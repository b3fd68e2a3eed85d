//! Repertoire management on top of a [RepertoireStore].
//!
//! [RepertoireService] fetches repertoires from a store, runs the tree
//! operations of [ops](crate::ops) on them, recomputes metadata and saves the
//! results. Owner policies (name length, number of repertoires per owner) are
//! configured through [RepertoireLimits].

mod limits;
mod repertoire;
mod store;

pub use limits::{DEFAULT_MAX_NAME_LENGTH, DEFAULT_MAX_REPERTOIRES_PER_OWNER, RepertoireLimits};
pub use repertoire::{OwnerId, Repertoire, RepertoireId};
pub use store::{InMemoryStore, RepertoireStore, StoreError};

use crate::error::RepertoireError;
use crate::model::{Color, NodeId};
use crate::ops::{self, CanonicalizeReport};
use crate::pgn::PgnParser;
use crate::position::{PositionOracle, ShakmatyOracle};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Repertoire operations backed by a store.
///
/// # Configuration
/// * `with_limits(limits)` - Owner policies (default: [RepertoireLimits::default])
/// * `with_oracle(oracle)` - Chess rules for imports and added moves
///   (default: [ShakmatyOracle])
///
/// # Example
/// ```
/// use repertoire::model::Color;
/// use repertoire::service::{InMemoryStore, OwnerId, RepertoireService};
///
/// let mut service = RepertoireService::new(InMemoryStore::new());
/// let owner = OwnerId::new();
///
/// let rep = service.create_repertoire(owner, "Open games", Color::White).unwrap();
/// let rep = service.import_pgn(rep.id, "1. e4 e5 2. Nf3 Nc6 *").unwrap();
/// assert_eq!(rep.metadata.total_nodes, 5);
/// assert_eq!(rep.metadata.deepest_depth, 4);
/// ```
#[derive(Debug)]
pub struct RepertoireService<S: RepertoireStore, O: PositionOracle = ShakmatyOracle> {
    store: S,
    oracle: O,
    limits: RepertoireLimits,
}

impl<S: RepertoireStore> RepertoireService<S, ShakmatyOracle> {
    /// Creates a service with the default oracle and limits.
    pub fn new(store: S) -> Self {
        Self {
            store,
            oracle: ShakmatyOracle::new(),
            limits: RepertoireLimits::default(),
        }
    }
}

impl<S: RepertoireStore, O: PositionOracle> RepertoireService<S, O> {
    /// Replaces the owner policies.
    pub fn with_limits(mut self, limits: RepertoireLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Replaces the oracle.
    pub fn with_oracle<P: PositionOracle>(self, oracle: P) -> RepertoireService<S, P> {
        RepertoireService {
            store: self.store,
            oracle,
            limits: self.limits,
        }
    }

    pub fn limits(&self) -> &RepertoireLimits {
        &self.limits
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Consumes the service and returns its store.
    pub fn into_store(self) -> S {
        self.store
    }

    // =#====================================================================#=
    // SINGLE REPERTOIRE
    // =#====================================================================#=
    /// Creates an empty repertoire (lone root at the standard start).
    ///
    /// # Errors
    /// `NameRequired`/`NameTooLong` for an invalid name, `LimitReached` if the
    /// owner already has the maximum number of repertoires.
    pub fn create_repertoire(&mut self, owner: OwnerId, name: &str, color: Color) -> Result<Repertoire, RepertoireError> {
        let name = self.limits.validate_name(name)?;
        self.check_capacity(owner)?;

        let repertoire = self.store.create(owner, name, color)?;
        info!(id = %repertoire.id, name, %color, "[REPERTOIRE] Created");
        Ok(repertoire)
    }

    /// Returns the repertoire with the given id.
    pub fn get(&self, id: RepertoireId) -> Result<Repertoire, RepertoireError> {
        self.store.get_by_id(id)?.ok_or(RepertoireError::NotFound(id))
    }

    /// Deletes the repertoire with the given id.
    pub fn delete_repertoire(&mut self, id: RepertoireId) -> Result<(), RepertoireError> {
        self.get(id)?;
        self.store.delete(id)?;
        info!(%id, "[REPERTOIRE] Deleted");
        Ok(())
    }

    /// Parses `pgn` and merges its lines into the repertoire.
    ///
    /// Nothing is saved if parsing fails.
    pub fn import_pgn(&mut self, id: RepertoireId, pgn: &str) -> Result<Repertoire, RepertoireError>
    where
        O: Clone,
    {
        let mut repertoire = self.get(id)?;
        let (imported, headers) = PgnParser::with_oracle(self.oracle.clone()).parse_str(pgn)?;
        debug!(%id, tags = headers.len(), "[REPERTOIRE] Parsed PGN for import");

        ops::merge_into(&mut repertoire.tree, &imported);
        self.persist(repertoire)
    }

    /// Adds the move `san` below node `parent_id` and returns the new node's id.
    pub fn add_move(&mut self, id: RepertoireId, parent_id: NodeId, san: &str) -> Result<(Repertoire, NodeId), RepertoireError> {
        let mut repertoire = self.get(id)?;
        let node_id = ops::add_move(&mut repertoire.tree, parent_id, san, &self.oracle)?;
        Ok((self.persist(repertoire)?, node_id))
    }

    /// Deletes node `node_id` and its subtree.
    pub fn delete_node(&mut self, id: RepertoireId, node_id: NodeId) -> Result<Repertoire, RepertoireError> {
        let mut repertoire = self.get(id)?;
        ops::delete_node(&mut repertoire.tree, node_id)?;
        self.persist(repertoire)
    }

    /// Sets or clears the comment of node `node_id`.
    pub fn set_comment(&mut self, id: RepertoireId, node_id: NodeId, comment: Option<&str>) -> Result<Repertoire, RepertoireError> {
        let mut repertoire = self.get(id)?;
        ops::set_comment(&mut repertoire.tree, node_id, comment)?;
        self.persist(repertoire)
    }

    /// Collapses the transpositions of the repertoire's tree.
    pub fn canonicalize_transpositions(&mut self, id: RepertoireId) -> Result<(Repertoire, CanonicalizeReport), RepertoireError> {
        let mut repertoire = self.get(id)?;
        let report = ops::canonicalize(&mut repertoire.tree);
        Ok((self.persist(repertoire)?, report))
    }

    // =#====================================================================#=
    // SEVERAL REPERTOIRES
    // =#====================================================================#=
    /// Merges the repertoires `ids` into a new repertoire `name` and deletes them.
    ///
    /// All checks happen before anything is written:
    /// 1. At least two ids (`MergeMinimumTwo`), none twice (`MergeDuplicateIds`)
    /// 2. Valid name (`NameRequired`, `NameTooLong`)
    /// 3. Owner below the repertoire limit (`LimitReached`)
    /// 4. Every source exists and belongs to `owner` (`NotFound`)
    /// 5. All sources have the same color (`MergeColorMismatch`)
    ///
    /// Sources are merged in the order given. Once the merged repertoire is
    /// saved, every source is deleted. Deletion failures do not undo the merge;
    /// they are reported as `SourceDeletionFailed`, naming the merged
    /// repertoire and the sources left behind.
    pub fn merge_repertoires(&mut self, owner: OwnerId, ids: &[RepertoireId], name: &str) -> Result<Repertoire, RepertoireError> {
        if ids.len() < 2 {
            return Err(RepertoireError::MergeMinimumTwo);
        }
        let mut seen = HashSet::with_capacity(ids.len());
        if !ids.iter().all(|id| seen.insert(*id)) {
            return Err(RepertoireError::MergeDuplicateIds);
        }
        let name = self.limits.validate_name(name)?;
        self.check_capacity(owner)?;

        let mut sources = Vec::with_capacity(ids.len());
        for &id in ids {
            let source = self.get(id)?;
            if source.owner_id != owner {
                return Err(RepertoireError::NotFound(id));
            }
            sources.push(source);
        }
        let color = sources[0].color;
        if sources.iter().any(|source| source.color != color) {
            return Err(RepertoireError::MergeColorMismatch);
        }

        let mut merged = self.store.create(owner, name, color)?;
        for source in &sources {
            ops::merge_into(&mut merged.tree, &source.tree);
        }
        let merged = self.persist(merged)?;
        info!(id = %merged.id, sources = ids.len(), "[REPERTOIRE] Merged");

        let mut failed = Vec::new();
        for &id in ids {
            if let Err(err) = self.store.delete(id) {
                warn!(%id, error = %err, "[REPERTOIRE] Could not delete merged source");
                failed.push(id);
            }
        }
        if !failed.is_empty() {
            return Err(RepertoireError::SourceDeletionFailed {
                merged: merged.id,
                failed,
            });
        }

        Ok(merged)
    }

    /// Splits the subtree at `node_id` off into a new repertoire.
    ///
    /// The new repertoire holds the line from the root to the node plus the
    /// node's subtree; the original loses the node and its subtree. Without a
    /// `name`, the new repertoire is named `"<original name> - <move>"`.
    ///
    /// # Returns
    /// `(original, extracted)`, both saved with fresh metadata
    pub fn extract_subtree(
        &mut self,
        id: RepertoireId,
        node_id: NodeId,
        name: Option<&str>,
    ) -> Result<(Repertoire, Repertoire), RepertoireError> {
        let original = self.get(id)?;
        let extraction = ops::extract(&original.tree, node_id)?;

        let default_name;
        let name = match name {
            Some(name) => name,
            None => {
                default_name = format!("{} - {}", original.name, extraction.target_move);
                &default_name
            }
        };
        let name = self.limits.validate_name(name)?;
        self.check_capacity(original.owner_id)?;

        let mut extracted = self.store.create(original.owner_id, name, original.color)?;
        extracted.tree = extraction.extracted;
        let extracted = self.persist(extracted)?;

        let mut pruned = original;
        pruned.tree = extraction.pruned;
        let pruned = self.persist(pruned)?;

        info!(from = %id, to = %extracted.id, "[REPERTOIRE] Extracted subtree");
        Ok((pruned, extracted))
    }

    // =#====================================================================#=
    // HELPERS
    // =#====================================================================#=
    fn check_capacity(&self, owner: OwnerId) -> Result<(), RepertoireError> {
        let count = self.store.count_for_owner(owner)?;
        self.limits.check_capacity(count)
    }

    /// Recomputes metadata and saves the tree.
    fn persist(&mut self, mut repertoire: Repertoire) -> Result<Repertoire, RepertoireError> {
        repertoire.refresh_metadata();
        let saved = self
            .store
            .save(repertoire.id, repertoire.tree, repertoire.metadata)?;
        Ok(saved)
    }
}

