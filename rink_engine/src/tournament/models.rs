//! Tournament data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt};

use super::{
    errors::{ValidationError, ValidationResult},
    resource::Resource,
};

/// Record revision, bumped on every accepted write
pub type Revision = u64;

/// Number of skins in a skins-mode match
pub const SKINS_PER_MATCH: usize = 3;

/// Minimum roster size for a tournament
pub const MIN_TEAMS: usize = 2;

/// Largest shot count accepted for one score or one side of a skin
pub const MAX_SHOTS: u32 = 999;

/// Team display name. Identity is the exact (case-sensitive) name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Team(String);

impl Team {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Blank names only appear in malformed stored records
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for Team {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Team {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Scoring rule, fixed for the lifetime of a tournament
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMode {
    /// One score per side, 2 points for a win, 1 each for a draw
    Standard,
    /// Three skins per match plus a bonus for total shots
    Skins,
}

impl fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringMode::Standard => write!(f, "standard"),
            ScoringMode::Skins => write!(f, "skins"),
        }
    }
}

impl std::str::FromStr for ScoringMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(ScoringMode::Standard),
            "skins" => Ok(ScoringMode::Skins),
            other => Err(format!("unknown scoring mode: {other}")),
        }
    }
}

/// Side of a match. `A` is `team1`, `B` is `team2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    A,
    B,
}

/// One sub-game of a skins match
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skin {
    /// Shots for team1
    pub a: Option<u32>,
    /// Shots for team2
    pub b: Option<u32>,
}

impl Skin {
    pub fn new(a: u32, b: u32) -> Self {
        Self {
            a: Some(a),
            b: Some(b),
        }
    }

    /// Both sides entered
    pub fn is_complete(&self) -> bool {
        self.a.is_some() && self.b.is_some()
    }

    pub fn get(&self, side: Side) -> Option<u32> {
        match side {
            Side::A => self.a,
            Side::B => self.b,
        }
    }

    pub fn set(&mut self, side: Side, value: Option<u32>) {
        match side {
            Side::A => self.a = value,
            Side::B => self.b = value,
        }
    }
}

/// Score entry of a match, shaped by the tournament's scoring mode.
///
/// Serialized flat into the match record: `score1`/`score2` for standard,
/// `skins` for skins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScoreCard {
    Skins {
        skins: [Skin; SKINS_PER_MATCH],
    },
    Standard {
        #[serde(default)]
        score1: Option<u32>,
        #[serde(default)]
        score2: Option<u32>,
    },
}

impl ScoreCard {
    /// Blank card for the given mode
    pub fn empty(mode: ScoringMode) -> Self {
        match mode {
            ScoringMode::Standard => ScoreCard::Standard {
                score1: None,
                score2: None,
            },
            ScoringMode::Skins => ScoreCard::Skins {
                skins: [Skin::default(); SKINS_PER_MATCH],
            },
        }
    }

    pub fn mode(&self) -> ScoringMode {
        match self {
            ScoreCard::Standard { .. } => ScoringMode::Standard,
            ScoreCard::Skins { .. } => ScoringMode::Skins,
        }
    }

    /// Whether any score has been entered
    pub fn has_entries(&self) -> bool {
        match self {
            ScoreCard::Standard { score1, score2 } => score1.is_some() || score2.is_some(),
            ScoreCard::Skins { skins } => skins.iter().any(|s| s.a.is_some() || s.b.is_some()),
        }
    }
}

/// A single fixture: two teams on one rink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    #[serde(default)]
    pub team1: Team,
    #[serde(default)]
    pub team2: Team,
    pub resource: Resource,
    /// Organizer lock: scores are authoritative and immutable while set
    #[serde(default)]
    pub verified: bool,
    #[serde(flatten)]
    pub scores: ScoreCard,
}

impl Match {
    /// New unverified match with an empty card for `mode`
    pub fn new(team1: Team, team2: Team, resource: Resource, mode: ScoringMode) -> Self {
        Self {
            team1,
            team2,
            resource,
            verified: false,
            scores: ScoreCard::empty(mode),
        }
    }

    /// Whether either side is `team`
    pub fn involves(&self, team: &Team) -> bool {
        &self.team1 == team || &self.team2 == team
    }

    /// Whether this match is between `x` and `y`, in either orientation
    pub fn is_between(&self, x: &Team, y: &Team) -> bool {
        (&self.team1 == x && &self.team2 == y) || (&self.team1 == y && &self.team2 == x)
    }

    /// The other side of the match, if `team` plays in it
    pub fn opponent_of(&self, team: &Team) -> Option<&Team> {
        if &self.team1 == team {
            Some(&self.team2)
        } else if &self.team2 == team {
            Some(&self.team1)
        } else {
            None
        }
    }

    /// Both team references present
    pub fn is_well_formed(&self) -> bool {
        !self.team1.is_blank() && !self.team2.is_blank()
    }
}

/// One complete set of simultaneous matches.
///
/// Stored as a bare list of matches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Round {
    pub matches: Vec<Match>,
}

impl Round {
    pub fn new(matches: Vec<Match>) -> Self {
        Self { matches }
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Match> {
        self.matches.iter()
    }

    /// Whether `team` has a match in this round
    pub fn features(&self, team: &Team) -> bool {
        self.matches.iter().any(|m| m.involves(team))
    }
}

impl<'a> IntoIterator for &'a Round {
    type Item = &'a Match;
    type IntoIter = std::slice::Iter<'a, Match>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.iter()
    }
}

/// Aggregate root: everything the store persists for one event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub name: String,
    pub teams: Vec<Team>,
    pub scoring_mode: ScoringMode,
    #[serde(default)]
    pub rounds: Vec<Round>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub revision: Revision,
}

impl Tournament {
    /// Create a tournament with an empty round list.
    ///
    /// Names are trimmed and blank roster entries dropped before validation.
    ///
    /// # Errors
    ///
    /// * `ValidationError::EmptyName` - blank tournament name
    /// * `ValidationError::TooFewTeams` - fewer than two named teams
    /// * `ValidationError::DuplicateTeam` - two teams share a name
    pub fn new<I, T>(
        name: &str,
        teams: I,
        scoring_mode: ScoringMode,
        created_at: DateTime<Utc>,
    ) -> ValidationResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let roster: Vec<Team> = teams
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty())
            .map(Team::from)
            .collect();

        if roster.len() < MIN_TEAMS {
            return Err(ValidationError::TooFewTeams {
                needed: MIN_TEAMS,
                current: roster.len(),
            });
        }

        let mut seen = HashSet::new();
        for team in &roster {
            if !seen.insert(team.as_str()) {
                return Err(ValidationError::DuplicateTeam(team.to_string()));
            }
        }

        Ok(Self {
            name: name.to_string(),
            teams: roster,
            scoring_mode,
            rounds: Vec::new(),
            created_at,
            revision: 0,
        })
    }

    /// Round by 0-based index
    pub fn round(&self, index: usize) -> Option<&Round> {
        self.rounds.get(index)
    }

    /// Index of the most recent round
    pub fn latest_round_index(&self) -> Option<usize> {
        self.rounds.len().checked_sub(1)
    }

    /// 1-based number the next generated round will carry
    pub fn next_round_number(&self) -> usize {
        self.rounds.len() + 1
    }

    pub fn has_team(&self, team: &Team) -> bool {
        self.teams.contains(team)
    }

    /// Append a generated round and bump the revision
    pub fn push_round(&mut self, round: Round) -> Revision {
        self.rounds.push(round);
        self.bump_revision()
    }

    /// Advance the revision after an accepted mutation
    pub fn bump_revision(&mut self) -> Revision {
        self.revision += 1;
        self.revision
    }

    /// Roster teams without a match in the given round (byes)
    pub fn sitting_out(&self, round_index: usize) -> Vec<Team> {
        match self.rounds.get(round_index) {
            Some(round) => self
                .teams
                .iter()
                .filter(|t| !round.features(t))
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn test_new_tournament_trims_and_filters() {
        let t = Tournament::new("  Twilight Pairs ", [" Smith ", "", "Jones", "  "], ScoringMode::Standard, now())
            .expect("valid tournament");
        assert_eq!(t.name, "Twilight Pairs");
        assert_eq!(t.teams, vec![Team::from("Smith"), Team::from("Jones")]);
        assert!(t.rounds.is_empty());
        assert_eq!(t.revision, 0);
    }

    #[test]
    fn test_new_tournament_rejects_small_roster() {
        let err = Tournament::new("Solo", ["Only"], ScoringMode::Skins, now()).unwrap_err();
        assert_eq!(err, ValidationError::TooFewTeams { needed: 2, current: 1 });
    }

    #[test]
    fn test_new_tournament_rejects_duplicates() {
        let err = Tournament::new("Dup", ["A", "B", "A"], ScoringMode::Standard, now()).unwrap_err();
        assert_eq!(err, ValidationError::DuplicateTeam("A".to_string()));
    }

    #[test]
    fn test_team_names_are_case_sensitive() {
        assert!(Tournament::new("Case", ["Ace", "ace"], ScoringMode::Standard, now()).is_ok());
    }

    #[test]
    fn test_blank_name_rejected() {
        assert_eq!(
            Tournament::new("   ", ["A", "B"], ScoringMode::Standard, now()).unwrap_err(),
            ValidationError::EmptyName
        );
    }

    #[test]
    fn test_empty_card_shapes() {
        assert_eq!(
            ScoreCard::empty(ScoringMode::Standard),
            ScoreCard::Standard { score1: None, score2: None }
        );
        match ScoreCard::empty(ScoringMode::Skins) {
            ScoreCard::Skins { skins } => assert!(skins.iter().all(|s| !s.is_complete())),
            other => panic!("expected skins card, got {other:?}"),
        }
    }

    #[test]
    fn test_match_json_shape_standard() {
        let mut m = Match::new("A".into(), "B".into(), Resource::new('A', 1), ScoringMode::Standard);
        m.scores = ScoreCard::Standard { score1: Some(7), score2: Some(5) };

        let json = serde_json::to_value(&m).expect("serialize");
        assert_eq!(json["team1"], "A");
        assert_eq!(json["score1"], 7);
        assert_eq!(json["resource"]["zone"], "A");
        assert!(json.get("skins").is_none());

        let back: Match = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, m);
    }

    #[test]
    fn test_match_json_shape_skins() {
        let json = serde_json::json!({
            "team1": "A",
            "team2": "B",
            "resource": { "zone": "B", "rink": 2 },
            "verified": true,
            "skins": [{ "a": 3, "b": 2 }, { "a": null, "b": 4 }, { "a": null, "b": null }]
        });
        let m: Match = serde_json::from_value(json).expect("deserialize");
        assert!(m.verified);
        match m.scores {
            ScoreCard::Skins { skins } => {
                assert_eq!(skins[0], Skin::new(3, 2));
                assert_eq!(skins[1].b, Some(4));
                assert!(!skins[2].is_complete());
            }
            other => panic!("expected skins card, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_team_deserializes_as_blank() {
        let json = serde_json::json!({ "team1": "A", "resource": { "zone": "A", "rink": 1 } });
        let m: Match = serde_json::from_value(json).expect("deserialize");
        assert!(!m.is_well_formed());
        assert_eq!(m.scores, ScoreCard::empty(ScoringMode::Standard));
    }

    #[test]
    fn test_sitting_out_lists_bye_team() {
        let mut t = Tournament::new("Odd", ["A", "B", "C"], ScoringMode::Standard, now()).expect("valid");
        t.push_round(Round::new(vec![Match::new(
            "A".into(),
            "C".into(),
            Resource::new('A', 1),
            ScoringMode::Standard,
        )]));
        assert_eq!(t.sitting_out(0), vec![Team::from("B")]);
        assert!(t.sitting_out(5).is_empty());
        assert_eq!(t.revision, 1);
    }
}
