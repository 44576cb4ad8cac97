use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named, user-owned collection of flashcards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlashcardSet {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One front/back pair belonging to exactly one set.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: String,
    pub set_id: String,
    pub front: String,
    pub back: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An unpersisted front/back pair: what editor rows and the import preview
/// hold before anything is written to the backend.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDraft {
    pub front: String,
    pub back: String,
}

impl CardDraft {
    pub fn new(front: &str, back: &str) -> Self {
        Self {
            front: front.to_string(),
            back: back.to_string(),
        }
    }

    /// Both sides have non-whitespace content. Required at write time.
    pub fn is_complete(&self) -> bool {
        !self.front.trim().is_empty() && !self.back.trim().is_empty()
    }

    /// Neither side has been touched.
    pub fn is_blank(&self) -> bool {
        self.front.trim().is_empty() && self.back.trim().is_empty()
    }
}

/// Insert payload for `flashcard_sets`; id and timestamps are server-assigned.
#[derive(Clone, Debug, Serialize)]
pub struct NewSet<'a> {
    pub user_id: &'a str,
    pub title: &'a str,
    pub description: &'a str,
}

/// Insert payload for `flashcards`.
#[derive(Clone, Debug, Serialize)]
pub struct NewCard<'a> {
    pub set_id: &'a str,
    pub front: &'a str,
    pub back: &'a str,
}

/// Update payload for an existing set.
#[derive(Clone, Debug, Serialize)]
pub struct SetPatch<'a> {
    pub title: &'a str,
    pub description: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_draft_completeness() {
        assert!(CardDraft::new("cat", "gato").is_complete());
        assert!(!CardDraft::new("cat", "").is_complete());
        assert!(!CardDraft::new("  ", "gato").is_complete());
        assert!(!CardDraft::new("", "").is_complete());
    }

    #[test]
    fn test_card_draft_blankness() {
        assert!(CardDraft::default().is_blank());
        assert!(CardDraft::new(" \t", "").is_blank());
        assert!(!CardDraft::new("cat", "").is_blank());
    }

    #[test]
    fn test_new_card_serializes_flat() {
        let card = NewCard {
            set_id: "s1",
            front: "cat",
            back: "gato",
        };
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["set_id"], "s1");
        assert_eq!(json["front"], "cat");
        assert_eq!(json["back"], "gato");
    }
}
