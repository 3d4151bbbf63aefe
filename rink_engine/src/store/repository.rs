//! Storage abstraction for tournament records.

use async_trait::async_trait;

use super::errors::StoreResult;
use crate::tournament::{Revision, Tournament};

/// Keyed tournament storage.
///
/// Names are the key. Writes are compare-and-swap on [`Tournament::revision`]
/// so concurrent writers cannot silently overwrite each other.
#[async_trait]
pub trait TournamentStore: Send + Sync {
    /// Load one tournament by name
    async fn load(&self, name: &str) -> StoreResult<Tournament>;

    /// Load every tournament, ordered by name
    async fn load_all(&self) -> StoreResult<Vec<Tournament>>;

    /// Insert a new tournament; fails with `AlreadyExists` on a name clash
    async fn create(&self, tournament: &Tournament) -> StoreResult<()>;

    /// Replace a stored tournament if its revision still equals `expected`.
    ///
    /// The record being saved must already carry its new revision. Returns
    /// the stored revision on success and `StoreError::Conflict` otherwise.
    async fn save(&self, tournament: &Tournament, expected: Revision) -> StoreResult<Revision>;

    /// Remove a tournament
    async fn delete(&self, name: &str) -> StoreResult<()>;
}
