//! Next-round generation: seeding, repeat-avoiding pairing and rink assignment.

use log::{debug, info, warn};
use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{
    errors::{PairingError, PairingResult},
    history::{History, extract_history},
};
use crate::standings::{StandingsOptions, compute_standings};
use crate::tournament::{MIN_TEAMS, Match, Resource, ResourcePool, Round, Team, Tournament};

/// Default backtracking budget for the repeat-free pass
pub const DEFAULT_MAX_SEARCH_STEPS: u64 = 200_000;

/// Pairing generator settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingConfig {
    /// Candidate checks allowed in the repeat-free pass before giving up
    /// and falling back to the relaxed pass
    pub max_search_steps: u64,
    /// Which matches count when seeding by standings
    pub seeding: StandingsOptions,
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            max_search_steps: DEFAULT_MAX_SEARCH_STEPS,
            seeding: StandingsOptions::default(),
        }
    }
}

/// Slot in the seeded list. `Bye` fills the odd place; whoever draws it sits out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entrant {
    Team(Team),
    Bye,
}

impl Entrant {
    fn team(&self) -> Option<&Team> {
        match self {
            Entrant::Team(team) => Some(team),
            Entrant::Bye => None,
        }
    }
}

#[derive(Debug)]
struct BudgetSpent;

/// Depth-first pairing search over the seeded list.
///
/// Takes the first unpaired entrant and tries every later entrant in seed
/// order, backtracking on dead ends.
struct PairSearch<'a> {
    entrants: &'a [Entrant],
    history: &'a History,
    prior_byes: &'a HashSet<Team>,
    avoid_repeats: bool,
    budget: Option<u64>,
    steps: u64,
}

impl<'a> PairSearch<'a> {
    fn strict(entrants: &'a [Entrant], history: &'a History, prior_byes: &'a HashSet<Team>, budget: u64) -> Self {
        Self {
            entrants,
            history,
            prior_byes,
            avoid_repeats: true,
            budget: Some(budget),
            steps: 0,
        }
    }

    fn relaxed(entrants: &'a [Entrant], history: &'a History, prior_byes: &'a HashSet<Team>) -> Self {
        Self {
            entrants,
            history,
            prior_byes,
            avoid_repeats: false,
            budget: None,
            steps: 0,
        }
    }

    fn run(&mut self) -> Result<Option<Vec<(usize, usize)>>, BudgetSpent> {
        let mut paired = vec![false; self.entrants.len()];
        let mut pairs = Vec::with_capacity(self.entrants.len() / 2);
        if self.extend(&mut paired, &mut pairs)? {
            Ok(Some(pairs))
        } else {
            Ok(None)
        }
    }

    fn extend(&mut self, paired: &mut [bool], pairs: &mut Vec<(usize, usize)>) -> Result<bool, BudgetSpent> {
        let Some(first) = paired.iter().position(|done| !done) else {
            return Ok(true);
        };
        paired[first] = true;

        for candidate in first + 1..self.entrants.len() {
            if paired[candidate] {
                continue;
            }

            self.steps += 1;
            if self.budget.is_some_and(|limit| self.steps > limit) {
                return Err(BudgetSpent);
            }

            if self.avoid_repeats && self.is_repeat(first, candidate) {
                continue;
            }

            paired[candidate] = true;
            pairs.push((first, candidate));
            if self.extend(paired, pairs)? {
                return Ok(true);
            }
            pairs.pop();
            paired[candidate] = false;
        }

        paired[first] = false;
        Ok(false)
    }

    fn is_repeat(&self, i: usize, j: usize) -> bool {
        match (&self.entrants[i], &self.entrants[j]) {
            (Entrant::Team(x), Entrant::Team(y)) => self.history.has_played(x, y),
            (Entrant::Team(x), Entrant::Bye) | (Entrant::Bye, Entrant::Team(x)) => {
                self.prior_byes.contains(x)
            }
            (Entrant::Bye, Entrant::Bye) => false,
        }
    }
}

/// Builds the next round for a tournament
#[derive(Debug, Clone)]
pub struct PairingGenerator {
    pool: ResourcePool,
    config: PairingConfig,
}

impl PairingGenerator {
    pub fn new(pool: ResourcePool, config: PairingConfig) -> Self {
        Self { pool, config }
    }

    pub fn pool(&self) -> &ResourcePool {
        &self.pool
    }

    /// Generate the next round, shuffling round one with the thread RNG
    pub fn generate_round(&self, tournament: &Tournament) -> PairingResult<Round> {
        self.generate_round_with_rng(tournament, &mut rand::rng())
    }

    /// Generate the next round.
    ///
    /// Round one is seeded by a random shuffle of the roster; later rounds
    /// by the standings order, with roster teams that have no standings row
    /// appended in roster order. Pairing first tries to avoid any repeat
    /// opponent (and a second bye for the same team); if no such pairing
    /// exists, or the search budget runs out, repeats are allowed. Rinks are
    /// then assigned greedily to spread each team's rink usage.
    ///
    /// The tournament is not modified.
    ///
    /// # Errors
    ///
    /// * `PairingError::InsufficientTeams` - fewer than two teams on the roster
    /// * `PairingError::InsufficientResources` - more matches than rinks
    pub fn generate_round_with_rng<R: Rng + ?Sized>(
        &self,
        tournament: &Tournament,
        rng: &mut R,
    ) -> PairingResult<Round> {
        let roster_size = tournament.teams.len();
        if roster_size < MIN_TEAMS {
            return Err(PairingError::InsufficientTeams {
                needed: MIN_TEAMS,
                current: roster_size,
            });
        }

        let needed = roster_size / 2;
        if needed > self.pool.len() {
            return Err(PairingError::InsufficientResources {
                needed,
                available: self.pool.len(),
            });
        }

        let mut entrants: Vec<Entrant> = self
            .seed_order(tournament, rng)
            .into_iter()
            .map(Entrant::Team)
            .collect();
        if entrants.len() % 2 == 1 {
            entrants.push(Entrant::Bye);
        }

        let mut history = extract_history(&tournament.rounds);
        let prior_byes = prior_byes(tournament);
        let index_pairs = self.pair(&entrants, &history, &prior_byes);

        let pairs: Vec<(Team, Team)> = index_pairs
            .into_iter()
            .filter_map(|(i, j)| match (entrants[i].team(), entrants[j].team()) {
                (Some(x), Some(y)) => Some((x.clone(), y.clone())),
                _ => None,
            })
            .collect();

        let mut matches = Vec::with_capacity(pairs.len());
        let mut used_this_round: HashSet<Resource> = HashSet::new();

        for (team1, team2) in pairs {
            let resource = self
                .pick_resource(&team1, &team2, &history, &used_this_round)
                .ok_or(PairingError::InsufficientResources {
                    needed,
                    available: self.pool.len(),
                })?;

            debug!("{} vs {} on {}", team1, team2, resource);
            used_this_round.insert(resource);
            history.record_usage(&team1, resource);
            history.record_usage(&team2, resource);

            matches.push(Match::new(team1, team2, resource, tournament.scoring_mode));
        }

        let round = Round::new(matches);
        info!(
            "Generated round {} for '{}': {} matches",
            tournament.next_round_number(),
            tournament.name,
            round.len()
        );
        Ok(round)
    }

    fn seed_order<R: Rng + ?Sized>(&self, tournament: &Tournament, rng: &mut R) -> Vec<Team> {
        if tournament.rounds.is_empty() {
            let mut order = tournament.teams.clone();
            order.shuffle(rng);
            return order;
        }

        let standings = compute_standings(&tournament.rounds, tournament.scoring_mode, self.config.seeding);
        let mut order: Vec<Team> = standings
            .into_iter()
            .map(|row| row.team)
            .filter(|team| tournament.has_team(team))
            .collect();

        for team in &tournament.teams {
            if !order.contains(team) {
                order.push(team.clone());
            }
        }
        order
    }

    fn pair(&self, entrants: &[Entrant], history: &History, prior_byes: &HashSet<Team>) -> Vec<(usize, usize)> {
        let mut strict = PairSearch::strict(entrants, history, prior_byes, self.config.max_search_steps);
        match strict.run() {
            Ok(Some(pairs)) => {
                debug!("Repeat-free pairing found after {} steps", strict.steps);
                return pairs;
            }
            Ok(None) => warn!("No repeat-free pairing exists, allowing repeat opponents"),
            Err(BudgetSpent) => warn!(
                "Pairing search budget of {} steps spent, allowing repeat opponents",
                self.config.max_search_steps
            ),
        }

        // Without constraints every candidate is accepted, so an even list always pairs.
        let mut relaxed = PairSearch::relaxed(entrants, history, prior_byes);
        match relaxed.run() {
            Ok(Some(pairs)) => pairs,
            Ok(None) | Err(BudgetSpent) => Vec::new(),
        }
    }

    fn pick_resource(
        &self,
        team1: &Team,
        team2: &Team,
        history: &History,
        used: &HashSet<Resource>,
    ) -> Option<Resource> {
        let mut best: Option<(Resource, u32)> = None;
        for resource in self.pool.iter() {
            if used.contains(&resource) {
                continue;
            }
            let cost = history.usage(team1, &resource) + history.usage(team2, &resource);
            if best.is_none_or(|(_, best_cost)| cost < best_cost) {
                best = Some((resource, cost));
            }
        }
        best.map(|(resource, _)| resource)
    }
}

impl Default for PairingGenerator {
    fn default() -> Self {
        Self::new(ResourcePool::default(), PairingConfig::default())
    }
}

/// Generate the next round with the default rink pool and settings
pub fn generate_round(tournament: &Tournament) -> PairingResult<Round> {
    PairingGenerator::default().generate_round(tournament)
}

/// Roster teams that already sat out a generated round
fn prior_byes(tournament: &Tournament) -> HashSet<Team> {
    tournament
        .rounds
        .iter()
        .enumerate()
        .filter(|(_, round)| !round.is_empty())
        .flat_map(|(i, _)| tournament.sitting_out(i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournament::{ScoreCard, ScoringMode};
    use chrono::Utc;
    use rand::{SeedableRng, rngs::StdRng};

    fn tournament(teams: &[&str], mode: ScoringMode) -> Tournament {
        Tournament::new("Test", teams.iter().copied(), mode, Utc::now()).expect("valid tournament")
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn set_score(m: &mut Match, s1: u32, s2: u32) {
        m.scores = ScoreCard::Standard {
            score1: Some(s1),
            score2: Some(s2),
        };
        m.verified = true;
    }

    #[test]
    fn test_single_team_rejected() {
        let mut t = tournament(&["A", "B"], ScoringMode::Standard);
        t.teams.truncate(1);
        let err = PairingGenerator::default()
            .generate_round_with_rng(&t, &mut rng())
            .unwrap_err();
        assert_eq!(err, PairingError::InsufficientTeams { needed: 2, current: 1 });
    }

    #[test]
    fn test_pool_too_small() {
        let t = tournament(&["A", "B", "C", "D", "E", "F"], ScoringMode::Standard);
        let pool = ResourcePool::new(['A'], 2).expect("valid pool");
        let err = PairingGenerator::new(pool, PairingConfig::default())
            .generate_round_with_rng(&t, &mut rng())
            .unwrap_err();
        assert_eq!(err, PairingError::InsufficientResources { needed: 3, available: 2 });
    }

    #[test]
    fn test_first_round_empty_cards() {
        let t = tournament(&["A", "B", "C", "D"], ScoringMode::Skins);
        let round = PairingGenerator::default()
            .generate_round_with_rng(&t, &mut rng())
            .expect("round");
        assert_eq!(round.len(), 2);
        for m in &round {
            assert!(!m.verified);
            assert_eq!(m.scores, ScoreCard::empty(ScoringMode::Skins));
        }
    }

    #[test]
    fn test_later_round_seeded_by_standings() {
        let mut t = tournament(&["A", "B", "C", "D"], ScoringMode::Standard);
        let mut first = Round::new(vec![
            Match::new("A".into(), "B".into(), Resource::new('A', 1), ScoringMode::Standard),
            Match::new("C".into(), "D".into(), Resource::new('A', 2), ScoringMode::Standard),
        ]);
        set_score(&mut first.matches[0], 10, 2);
        set_score(&mut first.matches[1], 6, 5);
        t.push_round(first);

        // Standings: A, C, D, B. A cannot meet B again, so A meets C and D meets B.
        let round = PairingGenerator::default()
            .generate_round_with_rng(&t, &mut rng())
            .expect("round");
        assert!(round.matches[0].is_between(&"A".into(), &"C".into()));
        assert!(round.matches[1].is_between(&"D".into(), &"B".into()));
        assert_eq!(round.matches[0].team1, Team::from("A"));
    }

    #[test]
    fn test_rinks_rotate_away_from_history() {
        let mut t = tournament(&["A", "B", "C", "D"], ScoringMode::Standard);
        t.push_round(Round::new(vec![
            Match::new("A".into(), "B".into(), Resource::new('A', 1), ScoringMode::Standard),
            Match::new("C".into(), "D".into(), Resource::new('A', 2), ScoringMode::Standard),
        ]));

        let round = PairingGenerator::default()
            .generate_round_with_rng(&t, &mut rng())
            .expect("round");
        for m in &round {
            assert_ne!(m.resource, Resource::new('A', 1));
            assert_ne!(m.resource, Resource::new('A', 2));
        }
        assert_eq!(round.matches[0].resource, Resource::new('A', 3));
        assert_eq!(round.matches[1].resource, Resource::new('A', 4));
    }

    #[test]
    fn test_bye_not_repeated_in_strict_pass() {
        let mut t = tournament(&["A", "B", "C"], ScoringMode::Standard);
        // B sat out round one
        t.push_round(Round::new(vec![Match::new(
            "A".into(),
            "C".into(),
            Resource::new('A', 1),
            ScoringMode::Standard,
        )]));

        let round = PairingGenerator::default()
            .generate_round_with_rng(&t, &mut rng())
            .expect("round");
        assert_eq!(round.len(), 1);
        assert!(round.matches[0].involves(&"B".into()));
    }

    #[test]
    fn test_zero_budget_falls_back_to_relaxed_pass() {
        let t = tournament(&["A", "B", "C", "D", "E", "F"], ScoringMode::Standard);
        let config = PairingConfig {
            max_search_steps: 0,
            ..PairingConfig::default()
        };
        let round = PairingGenerator::new(ResourcePool::default(), config)
            .generate_round_with_rng(&t, &mut rng())
            .expect("round");
        assert_eq!(round.len(), 3);
    }

    #[test]
    fn test_same_seed_same_round() {
        let t = tournament(&["A", "B", "C", "D", "E", "F", "G", "H"], ScoringMode::Standard);
        let generator = PairingGenerator::default();
        let first = generator.generate_round_with_rng(&t, &mut rng()).expect("round");
        let second = generator.generate_round_with_rng(&t, &mut rng()).expect("round");
        assert_eq!(first, second);
    }
}
