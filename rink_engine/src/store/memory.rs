//! In-memory tournament store.

use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::errors::{StoreError, StoreResult};
use super::repository::TournamentStore;
use crate::tournament::{Revision, Tournament};

/// Process-local store backed by a locked map.
///
/// Cloning shares the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTournamentStore {
    records: Arc<RwLock<HashMap<String, Tournament>>>,
}

impl InMemoryTournamentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tournaments
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl TournamentStore for InMemoryTournamentStore {
    async fn load(&self, name: &str) -> StoreResult<Tournament> {
        self.records
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    async fn load_all(&self) -> StoreResult<Vec<Tournament>> {
        let mut all: Vec<Tournament> = self.records.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn create(&self, tournament: &Tournament) -> StoreResult<()> {
        let mut records = self.records.write().await;
        if records.contains_key(&tournament.name) {
            return Err(StoreError::AlreadyExists(tournament.name.clone()));
        }
        records.insert(tournament.name.clone(), tournament.clone());
        debug!("Stored new tournament '{}'", tournament.name);
        Ok(())
    }

    async fn save(&self, tournament: &Tournament, expected: Revision) -> StoreResult<Revision> {
        let mut records = self.records.write().await;
        let stored = records
            .get_mut(&tournament.name)
            .ok_or_else(|| StoreError::NotFound(tournament.name.clone()))?;

        if stored.revision != expected {
            return Err(StoreError::Conflict {
                name: tournament.name.clone(),
                expected,
                actual: stored.revision,
            });
        }

        *stored = tournament.clone();
        debug!(
            "Saved tournament '{}' at revision {}",
            tournament.name, tournament.revision
        );
        Ok(tournament.revision)
    }

    async fn delete(&self, name: &str) -> StoreResult<()> {
        self.records
            .write()
            .await
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }
}
