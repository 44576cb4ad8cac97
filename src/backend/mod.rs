//! Supabase-style backend: password auth plus a PostgREST table API for
//! flashcard sets and cards. Everything network-facing sits behind the
//! `network` feature; `MemoryRepo` backs offline mode and tests.
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(feature = "network")]
pub mod auth;
pub mod memory;
pub mod repo;

#[cfg(feature = "network")]
pub use auth::AuthClient;
pub use memory::MemoryRepo;
#[cfg(feature = "network")]
pub use repo::RestRepository;
pub use repo::SetRepository;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
}

/// An authenticated identity. Every repository call takes one; in offline
/// mode it carries a fixed local user and placeholder tokens.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("not signed in")]
    NotAuthenticated,
    #[error("you don't own this set")]
    NotAuthorized,
    #[error("set not found")]
    NotFound,
    #[error("backend error ({status}): {message}")]
    Api { status: u16, message: String },
    #[cfg(feature = "network")]
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BackendError>;
