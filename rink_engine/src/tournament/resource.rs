//! Greens and rinks: the physical playing resources assigned to matches.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::errors::{ValidationError, ValidationResult};

/// Default green letters
pub const DEFAULT_ZONES: [char; 2] = ['A', 'B'];

/// Default rinks per green
pub const DEFAULT_RINKS_PER_ZONE: u32 = 6;

/// A single rink on a green, e.g. `A3`.
///
/// Ordering is green first, then rink number, which is also the
/// iteration order of [`ResourcePool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Resource {
    /// Green letter (always uppercase)
    pub zone: char,
    /// Rink number on the green (1-based)
    pub rink: u32,
}

impl Resource {
    /// Create a resource, normalizing the green letter to uppercase
    pub fn new(zone: char, rink: u32) -> Self {
        Self {
            zone: zone.to_ascii_uppercase(),
            rink,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.zone, self.rink)
    }
}

impl FromStr for Resource {
    type Err = ValidationError;

    /// Parses labels as printed on scorecards and share links.
    ///
    /// Accepts `A3`, `a3`, `A-3`, `A:3` and `A 3`: one green letter, any
    /// non-digit separators, then the rink number.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidResourceLabel(s.to_string());
        let trimmed = s.trim();

        let mut chars = trimmed.chars();
        let zone = chars
            .next()
            .filter(char::is_ascii_alphabetic)
            .ok_or_else(invalid)?;

        let rest = chars.as_str().trim_start_matches(|c: char| !c.is_ascii_digit());
        if rest.is_empty() || !rest.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let rink: u32 = rest.parse().map_err(|_| invalid())?;
        if rink == 0 {
            return Err(invalid());
        }

        Ok(Self::new(zone, rink))
    }
}

/// Fixed pool of rinks available to every round.
///
/// Deserialization goes through [`ResourcePool::new`], so a stored pool is
/// validated like a configured one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawResourcePool", rename_all = "camelCase")]
pub struct ResourcePool {
    zones: Vec<char>,
    rinks_per_zone: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResourcePool {
    zones: Vec<char>,
    rinks_per_zone: u32,
}

impl TryFrom<RawResourcePool> for ResourcePool {
    type Error = ValidationError;

    fn try_from(raw: RawResourcePool) -> ValidationResult<Self> {
        ResourcePool::new(raw.zones, raw.rinks_per_zone)
    }
}

impl ResourcePool {
    /// Create a pool of `zones × 1..=rinks_per_zone`.
    ///
    /// Green letters are uppercased and deduplicated, keeping first-seen order.
    pub fn new(zones: impl IntoIterator<Item = char>, rinks_per_zone: u32) -> ValidationResult<Self> {
        let mut normalized: Vec<char> = Vec::new();
        for zone in zones {
            if !zone.is_ascii_alphabetic() {
                return Err(ValidationError::InvalidResourceLabel(zone.to_string()));
            }
            let zone = zone.to_ascii_uppercase();
            if !normalized.contains(&zone) {
                normalized.push(zone);
            }
        }

        if normalized.is_empty() || rinks_per_zone == 0 {
            return Err(ValidationError::EmptyResourcePool);
        }

        Ok(Self {
            zones: normalized,
            rinks_per_zone,
        })
    }

    /// Green letters in pool order
    pub fn zones(&self) -> &[char] {
        &self.zones
    }

    /// Rinks on each green
    pub fn rinks_per_zone(&self) -> u32 {
        self.rinks_per_zone
    }

    /// Total number of rinks
    pub fn len(&self) -> usize {
        self.zones.len() * self.rinks_per_zone as usize
    }

    /// Whether the pool has no rinks (never true for a validated pool)
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the rink belongs to this pool
    pub fn contains(&self, resource: &Resource) -> bool {
        self.zones.contains(&resource.zone) && (1..=self.rinks_per_zone).contains(&resource.rink)
    }

    /// Iterate rinks green by green, rink number ascending
    pub fn iter(&self) -> impl Iterator<Item = Resource> + '_ {
        self.zones
            .iter()
            .flat_map(move |&zone| (1..=self.rinks_per_zone).map(move |rink| Resource::new(zone, rink)))
    }
}

impl Default for ResourcePool {
    fn default() -> Self {
        Self {
            zones: DEFAULT_ZONES.to_vec(),
            rinks_per_zone: DEFAULT_RINKS_PER_ZONE,
        }
    }
}
