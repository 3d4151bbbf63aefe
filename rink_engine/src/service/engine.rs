//! Async facade tying the engine to a tournament store.

use chrono::Utc;
use log::{info, warn};
use std::sync::Arc;

use super::config::EngineConfig;
use super::errors::{EngineError, EngineResult};
use crate::gateway::{Actor, MatchPatch, MatchRef, ScoreLink, apply_match_patch};
use crate::pairing::PairingGenerator;
use crate::standings::{StandingRow, standings_for};
use crate::store::{StoreError, TournamentStore, load_with_retry, with_timeout};
use crate::summary::{TournamentSummary, summarize};
use crate::tournament::{Revision, ScoringMode, Tournament};

/// Tournament operations over a shared store.
///
/// Reads go through [`load_with_retry`]. Writes are compare-and-swap saves at
/// the revision the operation started from and are never retried here; on
/// conflict the caller reloads and decides again.
pub struct TournamentService<S: TournamentStore> {
    store: Arc<S>,
    config: EngineConfig,
    generator: PairingGenerator,
}

impl<S: TournamentStore> Clone for TournamentService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
            generator: self.generator.clone(),
        }
    }
}

impl<S: TournamentStore> TournamentService<S> {
    /// Create a new service
    ///
    /// # Arguments
    ///
    /// * `store` - Shared tournament store
    /// * `config` - Engine configuration
    pub fn new(store: Arc<S>, config: EngineConfig) -> Self {
        let generator = PairingGenerator::new(config.resource_pool.clone(), config.pairing);
        Self {
            store,
            config,
            generator,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate and store a new tournament
    ///
    /// # Errors
    ///
    /// * `EngineError::Validation` - bad name or roster
    /// * `EngineError::Store` - name already taken, or the store failed
    pub async fn create_tournament<I, T>(&self, name: &str, teams: I, mode: ScoringMode) -> EngineResult<Tournament>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let tournament = Tournament::new(name, teams, mode, Utc::now())?;
        with_timeout(self.config.retry.timeout, self.store.create(&tournament)).await?;
        info!(
            "Created {} tournament '{}' with {} teams",
            tournament.scoring_mode,
            tournament.name,
            tournament.teams.len()
        );
        Ok(tournament)
    }

    /// Load one tournament
    pub async fn tournament(&self, name: &str) -> EngineResult<Tournament> {
        Ok(load_with_retry(self.store.as_ref(), name, &self.config.retry).await?)
    }

    /// Load every tournament, ordered by name
    pub async fn tournaments(&self) -> EngineResult<Vec<Tournament>> {
        Ok(with_timeout(self.config.retry.timeout, self.store.load_all()).await?)
    }

    /// Ranked standings, counting matches per the configured options
    pub async fn standings(&self, name: &str) -> EngineResult<Vec<StandingRow>> {
        let tournament = self.tournament(name).await?;
        Ok(standings_for(&tournament, self.config.standings))
    }

    /// Generate, append and save the next round.
    ///
    /// Returns the saved tournament. Fails with a store conflict if anyone
    /// wrote the tournament between the load and the save, in which case
    /// nothing is appended.
    pub async fn generate_next_round(&self, name: &str) -> EngineResult<Tournament> {
        let mut tournament = self.tournament(name).await?;
        let expected = tournament.revision;

        let round = self.generator.generate_round(&tournament)?;
        tournament.push_round(round);
        self.save(&tournament, expected).await?;
        Ok(tournament)
    }

    /// Apply a match patch and save the result.
    ///
    /// `expected_revision` is the revision the caller last read. A stale
    /// revision fails with a retryable conflict and changes nothing.
    pub async fn patch_match(
        &self,
        name: &str,
        round_index: usize,
        match_ref: &MatchRef,
        patch: &MatchPatch,
        expected_revision: Revision,
        actor: Actor,
    ) -> EngineResult<Tournament> {
        let tournament = self.tournament(name).await?;
        let updated = apply_match_patch(&tournament, round_index, match_ref, patch, expected_revision, actor)?;
        self.save(&updated, expected_revision).await?;
        Ok(updated)
    }

    /// Apply a player's patch addressed by a score link
    pub async fn patch_from_link(
        &self,
        link: &ScoreLink,
        patch: &MatchPatch,
        expected_revision: Revision,
    ) -> EngineResult<Tournament> {
        let tournament = self.tournament(&link.tournament).await?;
        let round_index = link.round_index(&tournament)?;
        self.patch_match(
            &link.tournament,
            round_index,
            &link.match_ref(),
            patch,
            expected_revision,
            Actor::Player,
        )
        .await
    }

    /// Progress summary
    pub async fn summary(&self, name: &str) -> EngineResult<TournamentSummary> {
        let tournament = self.tournament(name).await?;
        Ok(summarize(&tournament))
    }

    /// Remove a tournament
    pub async fn delete_tournament(&self, name: &str) -> EngineResult<()> {
        with_timeout(self.config.retry.timeout, self.store.delete(name)).await?;
        info!("Deleted tournament '{}'", name);
        Ok(())
    }

    async fn save(&self, tournament: &Tournament, expected: Revision) -> EngineResult<Revision> {
        match with_timeout(self.config.retry.timeout, self.store.save(tournament, expected)).await {
            Ok(revision) => Ok(revision),
            Err(e @ StoreError::Conflict { .. }) => {
                warn!("Save of '{}' lost a revision race: {}", tournament.name, e);
                Err(EngineError::Store(e))
            }
            Err(e) => Err(e.into()),
        }
    }
}
