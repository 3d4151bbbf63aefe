//! Pairing generator: builds the next round of fixtures.
//!
//! Seeding, a two-pass backtracking pairing (repeat-free first, repeats
//! allowed second) and greedy rink assignment that spreads each team's rink
//! usage across the pool.
//!
//! ## Example
//!
//! ```
//! use chrono::Utc;
//! use rink_engine::pairing::generate_round;
//! use rink_engine::tournament::{ScoringMode, Tournament};
//!
//! let tournament = Tournament::new("Club Night", ["A", "B", "C", "D", "E"], ScoringMode::Standard, Utc::now())
//!     .expect("valid roster");
//!
//! let round = generate_round(&tournament).expect("five teams can be paired");
//! assert_eq!(round.len(), 2); // one team sits out
//! ```

pub mod errors;
pub mod generator;
pub mod history;

pub use errors::{PairingError, PairingResult};
pub use generator::{DEFAULT_MAX_SEARCH_STEPS, Entrant, PairingConfig, PairingGenerator, generate_round};
pub use history::{History, TeamPair, extract_history};
