//! Persistence contract for tournament records.
//!
//! The engine never owns storage. Hosts implement [`TournamentStore`] over
//! whatever backend they have; [`InMemoryTournamentStore`] serves tests and
//! single-process hosts.

pub mod errors;
pub mod memory;
pub mod repository;
pub mod retry;

pub use errors::{StoreError, StoreResult};
pub use memory::InMemoryTournamentStore;
pub use repository::TournamentStore;
pub use retry::{
    DEFAULT_READ_RETRIES, DEFAULT_RETRY_BACKOFF, DEFAULT_STORE_TIMEOUT, RetryPolicy, load_with_retry,
    with_timeout,
};
