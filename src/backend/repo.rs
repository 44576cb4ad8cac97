//! Storage interface for sets and cards, plus the PostgREST implementation.
use crate::model::{Flashcard, FlashcardSet, NewCard, NewSet, SetPatch};

use super::{Result, Session};

/// What the app needs from storage. `RestRepository` talks to the backend;
/// `MemoryRepo` keeps everything in process for offline mode and tests.
///
/// Authorization invariant: reads are scoped to the session's user, and
/// writes to a set (or its cards) fail with `NotAuthorized` unless the
/// session's user owns the set.
pub trait SetRepository {
    /// All of the user's sets, newest first.
    fn list_sets(&self, session: &Session) -> Result<Vec<FlashcardSet>>;
    fn create_set(&self, session: &Session, set: &NewSet) -> Result<FlashcardSet>;
    fn update_set(&self, session: &Session, set_id: &str, patch: &SetPatch)
    -> Result<FlashcardSet>;
    fn delete_set(&self, session: &Session, set_id: &str) -> Result<()>;
    fn get_set(&self, session: &Session, set_id: &str) -> Result<FlashcardSet>;
    /// Cards of a set, oldest first (stable study order).
    fn list_cards(&self, session: &Session, set_id: &str) -> Result<Vec<Flashcard>>;
    fn create_cards(&self, session: &Session, cards: &[NewCard]) -> Result<Vec<Flashcard>>;
    /// Delete every card of the set, then insert the given ones.
    fn replace_cards(
        &self,
        session: &Session,
        set_id: &str,
        cards: &[NewCard],
    ) -> Result<Vec<Flashcard>>;
}

#[cfg(feature = "network")]
pub use rest::RestRepository;

#[cfg(feature = "network")]
mod rest {
    use serde_json::Value;

    use super::*;
    use crate::backend::BackendError;
    use crate::model::{Flashcard, FlashcardSet};

    pub struct RestRepository {
        base_url: String,
        anon_key: String,
        http: reqwest::blocking::Client,
    }

    impl RestRepository {
        pub fn new(base_url: &str, anon_key: &str) -> Self {
            Self {
                base_url: base_url.trim_end_matches('/').to_string(),
                anon_key: anon_key.to_string(),
                http: reqwest::blocking::Client::new(),
            }
        }

        fn table_url(&self, table: &str, query: &str) -> String {
            format!("{}/rest/v1/{table}?{query}", self.base_url)
        }

        fn get_rows(&self, session: &Session, url: &str) -> Result<Value> {
            let response = self
                .http
                .get(url)
                .header("apikey", &self.anon_key)
                .header(
                    "Authorization",
                    format!("Bearer {}", session.access_token),
                )
                .send()?;
            check_status(&response)?;
            Ok(response.json()?)
        }

        /// POST with `Prefer: return=representation` so inserted rows come
        /// back with their server-assigned ids and timestamps.
        fn insert_rows(
            &self,
            session: &Session,
            url: &str,
            body: &impl serde::Serialize,
        ) -> Result<Value> {
            let response = self
                .http
                .post(url)
                .header("apikey", &self.anon_key)
                .header(
                    "Authorization",
                    format!("Bearer {}", session.access_token),
                )
                .header("Prefer", "return=representation")
                .json(body)
                .send()?;
            check_status(&response)?;
            Ok(response.json()?)
        }

        fn assert_owned(&self, session: &Session, set_id: &str) -> Result<()> {
            match self.get_set(session, set_id) {
                Ok(_) => Ok(()),
                // Row-level filtering hides other users' sets, so a miss on
                // a known id means it isn't ours.
                Err(BackendError::NotFound) => Err(BackendError::NotAuthorized),
                Err(err) => Err(err),
            }
        }
    }

    fn check_status(response: &reqwest::blocking::Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        log::error!("backend request failed with status {status}");
        Err(BackendError::Api {
            status: status.as_u16(),
            message: status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        })
    }

    pub(super) fn sets_query(user_id: &str) -> String {
        format!("user_id=eq.{user_id}&order=created_at.desc")
    }

    pub(super) fn set_by_id_query(user_id: &str, set_id: &str) -> String {
        format!("id=eq.{set_id}&user_id=eq.{user_id}")
    }

    pub(super) fn cards_query(set_id: &str) -> String {
        format!("set_id=eq.{set_id}&order=created_at.asc")
    }

    impl SetRepository for RestRepository {
        fn list_sets(&self, session: &Session) -> Result<Vec<FlashcardSet>> {
            let url = self.table_url("flashcard_sets", &sets_query(&session.user.id));
            let rows = self.get_rows(session, &url)?;
            Ok(serde_json::from_value(rows)?)
        }

        fn create_set(&self, session: &Session, set: &NewSet) -> Result<FlashcardSet> {
            log::info!("creating set '{}'", set.title);
            let url = self.table_url("flashcard_sets", "");
            let rows = self.insert_rows(session, &url, &[set])?;
            let mut sets: Vec<FlashcardSet> = serde_json::from_value(rows)?;
            sets.pop().ok_or(BackendError::NotFound)
        }

        fn update_set(
            &self,
            session: &Session,
            set_id: &str,
            patch: &SetPatch,
        ) -> Result<FlashcardSet> {
            let url = self.table_url(
                "flashcard_sets",
                &set_by_id_query(&session.user.id, set_id),
            );
            let response = self
                .http
                .patch(&url)
                .header("apikey", &self.anon_key)
                .header(
                    "Authorization",
                    format!("Bearer {}", session.access_token),
                )
                .header("Prefer", "return=representation")
                .json(patch)
                .send()?;
            check_status(&response)?;
            let mut sets: Vec<FlashcardSet> = response.json()?;
            // The filter matched nothing: either the set doesn't exist or
            // it belongs to someone else.
            sets.pop().ok_or(BackendError::NotAuthorized)
        }

        fn delete_set(&self, session: &Session, set_id: &str) -> Result<()> {
            self.assert_owned(session, set_id)?;
            let url = self.table_url(
                "flashcard_sets",
                &set_by_id_query(&session.user.id, set_id),
            );
            let response = self
                .http
                .delete(&url)
                .header("apikey", &self.anon_key)
                .header(
                    "Authorization",
                    format!("Bearer {}", session.access_token),
                )
                .send()?;
            check_status(&response)
        }

        fn get_set(&self, session: &Session, set_id: &str) -> Result<FlashcardSet> {
            let url = self.table_url(
                "flashcard_sets",
                &set_by_id_query(&session.user.id, set_id),
            );
            let rows = self.get_rows(session, &url)?;
            let mut sets: Vec<FlashcardSet> = serde_json::from_value(rows)?;
            sets.pop().ok_or(BackendError::NotFound)
        }

        fn list_cards(&self, session: &Session, set_id: &str) -> Result<Vec<Flashcard>> {
            let url = self.table_url("flashcards", &cards_query(set_id));
            let rows = self.get_rows(session, &url)?;
            Ok(serde_json::from_value(rows)?)
        }

        fn create_cards(&self, session: &Session, cards: &[NewCard]) -> Result<Vec<Flashcard>> {
            if cards.is_empty() {
                return Ok(Vec::new());
            }
            self.assert_owned(session, cards[0].set_id)?;
            let url = self.table_url("flashcards", "");
            let rows = self.insert_rows(session, &url, &cards)?;
            Ok(serde_json::from_value(rows)?)
        }

        fn replace_cards(
            &self,
            session: &Session,
            set_id: &str,
            cards: &[NewCard],
        ) -> Result<Vec<Flashcard>> {
            self.assert_owned(session, set_id)?;
            let url = self.table_url("flashcards", &format!("set_id=eq.{set_id}"));
            let response = self
                .http
                .delete(&url)
                .header("apikey", &self.anon_key)
                .header(
                    "Authorization",
                    format!("Bearer {}", session.access_token),
                )
                .send()?;
            check_status(&response)?;
            if cards.is_empty() {
                return Ok(Vec::new());
            }
            let url = self.table_url("flashcards", "");
            let rows = self.insert_rows(session, &url, &cards)?;
            Ok(serde_json::from_value(rows)?)
        }
    }

}
