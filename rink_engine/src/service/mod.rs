//! Async tournament service over a [`TournamentStore`](crate::store::TournamentStore).
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use rink_engine::service::{EngineConfig, TournamentService};
//! use rink_engine::store::InMemoryTournamentStore;
//! use rink_engine::tournament::ScoringMode;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), rink_engine::service::EngineError> {
//! let service = TournamentService::new(Arc::new(InMemoryTournamentStore::new()), EngineConfig::default());
//! service.create_tournament("Club Night", ["A", "B", "C", "D"], ScoringMode::Skins).await?;
//!
//! let tournament = service.generate_next_round("Club Night").await?;
//! assert_eq!(tournament.rounds[0].len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod errors;

pub use config::EngineConfig;
pub use engine::TournamentService;
pub use errors::{EngineError, EngineResult};
