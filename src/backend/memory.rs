//! In-process repository for offline mode and tests. Enforces the same
//! ownership rules as the real backend so the app behaves identically.
use std::cell::RefCell;

use chrono::Utc;

use crate::model::{Flashcard, FlashcardSet, NewCard, NewSet, SetPatch};

use super::{BackendError, Result, Session, SetRepository, User};

pub const OFFLINE_USER_ID: &str = "local";

/// A session for offline mode; tokens are placeholders nothing inspects.
pub fn offline_session() -> Session {
    Session {
        access_token: "offline".to_string(),
        refresh_token: "offline".to_string(),
        user: User {
            id: OFFLINE_USER_ID.to_string(),
            email: "offline@localhost".to_string(),
        },
    }
}

#[derive(Default)]
struct Inner {
    sets: Vec<FlashcardSet>,
    cards: Vec<Flashcard>,
    next_id: u64,
}

#[derive(Default)]
pub struct MemoryRepo {
    inner: RefCell<Inner>,
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Inner {
    fn fresh_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn owned_set(&self, user_id: &str, set_id: &str) -> Result<&FlashcardSet> {
        let set = self
            .sets
            .iter()
            .find(|s| s.id == set_id)
            .ok_or(BackendError::NotFound)?;
        if set.user_id != user_id {
            return Err(BackendError::NotAuthorized);
        }
        Ok(set)
    }
}

impl SetRepository for MemoryRepo {
    fn list_sets(&self, session: &Session) -> Result<Vec<FlashcardSet>> {
        let inner = self.inner.borrow();
        let mut sets: Vec<FlashcardSet> = inner
            .sets
            .iter()
            .filter(|s| s.user_id == session.user.id)
            .cloned()
            .collect();
        sets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sets)
    }

    fn create_set(&self, session: &Session, set: &NewSet) -> Result<FlashcardSet> {
        if set.user_id != session.user.id {
            return Err(BackendError::NotAuthorized);
        }
        let mut inner = self.inner.borrow_mut();
        let now = Utc::now();
        let created = FlashcardSet {
            id: inner.fresh_id("set"),
            user_id: set.user_id.to_string(),
            title: set.title.to_string(),
            description: if set.description.is_empty() {
                None
            } else {
                Some(set.description.to_string())
            },
            created_at: now,
            updated_at: now,
        };
        inner.sets.push(created.clone());
        Ok(created)
    }

    fn update_set(
        &self,
        session: &Session,
        set_id: &str,
        patch: &SetPatch,
    ) -> Result<FlashcardSet> {
        let mut inner = self.inner.borrow_mut();
        inner.owned_set(&session.user.id, set_id)?;
        let set = inner
            .sets
            .iter_mut()
            .find(|s| s.id == set_id)
            .ok_or(BackendError::NotFound)?;
        set.title = patch.title.to_string();
        set.description = if patch.description.is_empty() {
            None
        } else {
            Some(patch.description.to_string())
        };
        set.updated_at = Utc::now();
        Ok(set.clone())
    }

    fn delete_set(&self, session: &Session, set_id: &str) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        inner.owned_set(&session.user.id, set_id)?;
        inner.sets.retain(|s| s.id != set_id);
        inner.cards.retain(|c| c.set_id != set_id);
        Ok(())
    }

    fn get_set(&self, session: &Session, set_id: &str) -> Result<FlashcardSet> {
        let inner = self.inner.borrow();
        inner.owned_set(&session.user.id, set_id).cloned()
    }

    fn list_cards(&self, session: &Session, set_id: &str) -> Result<Vec<Flashcard>> {
        let inner = self.inner.borrow();
        inner.owned_set(&session.user.id, set_id)?;
        let mut cards: Vec<Flashcard> = inner
            .cards
            .iter()
            .filter(|c| c.set_id == set_id)
            .cloned()
            .collect();
        cards.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(cards)
    }

    fn create_cards(&self, session: &Session, cards: &[NewCard]) -> Result<Vec<Flashcard>> {
        let mut inner = self.inner.borrow_mut();
        let mut created = Vec::with_capacity(cards.len());
        for card in cards {
            inner.owned_set(&session.user.id, card.set_id)?;
            let now = Utc::now();
            let stored = Flashcard {
                id: inner.fresh_id("card"),
                set_id: card.set_id.to_string(),
                front: card.front.to_string(),
                back: card.back.to_string(),
                created_at: now,
                updated_at: now,
            };
            inner.cards.push(stored.clone());
            created.push(stored);
        }
        Ok(created)
    }

    fn replace_cards(
        &self,
        session: &Session,
        set_id: &str,
        cards: &[NewCard],
    ) -> Result<Vec<Flashcard>> {
        {
            let mut inner = self.inner.borrow_mut();
            inner.owned_set(&session.user.id, set_id)?;
            inner.cards.retain(|c| c.set_id != set_id);
        }
        self.create_cards(session, cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_for(user_id: &str) -> Session {
        Session {
            access_token: "t".to_string(),
            refresh_token: "r".to_string(),
            user: User {
                id: user_id.to_string(),
                email: format!("{user_id}@example.com"),
            },
        }
    }

    fn make_set(repo: &MemoryRepo, session: &Session, title: &str) -> FlashcardSet {
        repo.create_set(
            session,
            &NewSet {
                user_id: &session.user.id,
                title,
                description: "",
            },
        )
        .unwrap()
    }

    #[test]
    fn test_create_and_list_sets_scoped_to_user() {
        let repo = MemoryRepo::new();
        let alice = session_for("alice");
        let bob = session_for("bob");
        make_set(&repo, &alice, "Spanish");
        make_set(&repo, &bob, "French");

        let sets = repo.list_sets(&alice).unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].title, "Spanish");
    }

    #[test]
    fn test_writes_to_foreign_set_are_rejected() {
        let repo = MemoryRepo::new();
        let alice = session_for("alice");
        let bob = session_for("bob");
        let set = make_set(&repo, &alice, "Spanish");

        let patch = SetPatch {
            title: "Stolen",
            description: "",
        };
        assert!(matches!(
            repo.update_set(&bob, &set.id, &patch),
            Err(BackendError::NotAuthorized)
        ));
        assert!(matches!(
            repo.delete_set(&bob, &set.id),
            Err(BackendError::NotAuthorized)
        ));
        let card = NewCard {
            set_id: &set.id,
            front: "cat",
            back: "gato",
        };
        assert!(matches!(
            repo.create_cards(&bob, &[card]),
            Err(BackendError::NotAuthorized)
        ));
        assert!(matches!(
            repo.replace_cards(&bob, &set.id, &[]),
            Err(BackendError::NotAuthorized)
        ));
    }

    #[test]
    fn test_unknown_set_is_not_found() {
        let repo = MemoryRepo::new();
        let alice = session_for("alice");
        assert!(matches!(
            repo.get_set(&alice, "set-999"),
            Err(BackendError::NotFound)
        ));
    }

    #[test]
    fn test_replace_cards_swaps_the_full_list() {
        let repo = MemoryRepo::new();
        let session = offline_session();
        let set = make_set(&repo, &session, "Spanish");

        repo.create_cards(
            &session,
            &[
                NewCard {
                    set_id: &set.id,
                    front: "cat",
                    back: "gato",
                },
                NewCard {
                    set_id: &set.id,
                    front: "dog",
                    back: "perro",
                },
            ],
        )
        .unwrap();

        repo.replace_cards(
            &session,
            &set.id,
            &[NewCard {
                set_id: &set.id,
                front: "bird",
                back: "pájaro",
            }],
        )
        .unwrap();

        let cards = repo.list_cards(&session, &set.id).unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].front, "bird");
    }

    #[test]
    fn test_delete_set_removes_its_cards() {
        let repo = MemoryRepo::new();
        let session = offline_session();
        let set = make_set(&repo, &session, "Spanish");
        repo.create_cards(
            &session,
            &[NewCard {
                set_id: &set.id,
                front: "cat",
                back: "gato",
            }],
        )
        .unwrap();

        repo.delete_set(&session, &set.id).unwrap();
        assert!(repo.list_sets(&session).unwrap().is_empty());
        assert!(matches!(
            repo.list_cards(&session, &set.id),
            Err(BackendError::NotFound)
        ));
    }

    #[test]
    fn test_update_set_changes_fields_and_bumps_timestamp() {
        let repo = MemoryRepo::new();
        let session = offline_session();
        let set = make_set(&repo, &session, "Spanish");

        let updated = repo
            .update_set(
                &session,
                &set.id,
                &SetPatch {
                    title: "Spanish 101",
                    description: "Basics",
                },
            )
            .unwrap();
        assert_eq!(updated.title, "Spanish 101");
        assert_eq!(updated.description.as_deref(), Some("Basics"));
        assert!(updated.updated_at >= set.updated_at);
    }

    #[test]
    fn test_cards_keep_creation_order() {
        let repo = MemoryRepo::new();
        let session = offline_session();
        let set = make_set(&repo, &session, "Spanish");
        let drafts: Vec<(String, String)> = (0..5)
            .map(|i| (format!("front {i}"), format!("back {i}")))
            .collect();
        let new_cards: Vec<NewCard> = drafts
            .iter()
            .map(|(front, back)| NewCard {
                set_id: &set.id,
                front,
                back,
            })
            .collect();
        repo.create_cards(&session, &new_cards).unwrap();

        let cards = repo.list_cards(&session, &set.id).unwrap();
        let fronts: Vec<&str> = cards.iter().map(|c| c.front.as_str()).collect();
        assert_eq!(
            fronts,
            vec!["front 0", "front 1", "front 2", "front 3", "front 4"]
        );
    }
}
