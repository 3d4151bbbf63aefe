//! Opponent and rink history extracted from prior rounds.

use std::collections::{HashMap, HashSet};

use crate::tournament::{Resource, Round, Team};

/// Unordered pair of teams: `{A, B}` equals `{B, A}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TeamPair(Team, Team);

impl TeamPair {
    pub fn new(x: &Team, y: &Team) -> Self {
        if x <= y {
            Self(x.clone(), y.clone())
        } else {
            Self(y.clone(), x.clone())
        }
    }

    pub fn contains(&self, team: &Team) -> bool {
        &self.0 == team || &self.1 == team
    }
}

/// Who has played whom, and how often each team has used each rink
#[derive(Debug, Clone, Default)]
pub struct History {
    played_pairs: HashSet<TeamPair>,
    resource_usage: HashMap<Team, HashMap<Resource, u32>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `x` and `y` have met in any prior round
    pub fn has_played(&self, x: &Team, y: &Team) -> bool {
        self.played_pairs.contains(&TeamPair::new(x, y))
    }

    /// Times `team` has played on `resource`
    pub fn usage(&self, team: &Team, resource: &Resource) -> u32 {
        self.resource_usage
            .get(team)
            .and_then(|by_rink| by_rink.get(resource))
            .copied()
            .unwrap_or(0)
    }

    pub fn record_pair(&mut self, x: &Team, y: &Team) {
        self.played_pairs.insert(TeamPair::new(x, y));
    }

    pub fn record_usage(&mut self, team: &Team, resource: Resource) {
        *self
            .resource_usage
            .entry(team.clone())
            .or_default()
            .entry(resource)
            .or_insert(0) += 1;
    }

    pub fn played_pairs(&self) -> &HashSet<TeamPair> {
        &self.played_pairs
    }

    pub fn resource_usage(&self) -> &HashMap<Team, HashMap<Resource, u32>> {
        &self.resource_usage
    }
}

/// Single pass over every match of every round.
///
/// Malformed matches (blank team) are ignored.
pub fn extract_history(rounds: &[Round]) -> History {
    let mut history = History::new();

    for m in rounds.iter().flat_map(|r| r.iter()) {
        if !m.is_well_formed() {
            continue;
        }
        history.record_pair(&m.team1, &m.team2);
        history.record_usage(&m.team1, m.resource);
        history.record_usage(&m.team2, m.resource);
    }

    history
}
