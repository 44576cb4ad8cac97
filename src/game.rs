use rand::rngs::SmallRng;
use thiserror::Error;

use crate::model::Flashcard;
use crate::quiz::{self, QuizError};

/// Fixed simulation period. The app's event tick runs at this rate and the
/// game advances once per tick while active.
pub const TICK_MS: u64 = 50;

/// Rocket travel limits, in percent of field width.
pub const FIELD_MIN_X: f64 = 5.0;
pub const FIELD_MAX_X: f64 = 95.0;
/// Horizontal distance of one keyboard step.
pub const ROCKET_STEP: f64 = 5.0;

/// Projectiles spawn near the bottom (y is distance from the field top, in
/// percent of field height) and climb a fixed amount each tick.
pub const PROJECTILE_SPAWN_Y: f64 = 90.0;
pub const PROJECTILE_SPEED: f64 = 3.0;
const PROJECTILE_HALF_WIDTH: f64 = 0.75;
const PROJECTILE_HEIGHT: f64 = 3.0;

/// The four answer boxes sit in a fixed row near the top of the field, one
/// per quarter of the width with a small margin on each side. Collision is
/// computed against these slots, never against rendered geometry, so the
/// simulation is deterministic and testable without a screen.
pub const OPTION_ROW_TOP: f64 = 12.0;
pub const OPTION_ROW_BOTTOM: f64 = 20.0;
const OPTION_SLOT_WIDTH: f64 = 25.0;
const OPTION_SLOT_MARGIN: f64 = 2.0;

const CORRECT_HIT_POINTS: u32 = 10;
const WRONG_HIT_PENALTY: u32 = 5;

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("need at least {} cards to play the game, this set has {have}", quiz::MIN_CARDS)]
    NotEnoughCards { have: usize },
}

impl From<QuizError> for GameError {
    fn from(err: QuizError) -> Self {
        match err {
            QuizError::NotEnoughCards { have } => GameError::NotEnoughCards { have },
        }
    }
}

/// Axis-aligned box in field coordinates (percent space, y grows downward).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldRect {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl FieldRect {
    pub fn overlaps(&self, other: &FieldRect) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }
}

/// The slot occupied by answer option `index` (0..4).
pub fn option_slot(index: usize) -> FieldRect {
    let left = index as f64 * OPTION_SLOT_WIDTH + OPTION_SLOT_MARGIN;
    FieldRect {
        left,
        right: left + OPTION_SLOT_WIDTH - 2.0 * OPTION_SLOT_MARGIN,
        top: OPTION_ROW_TOP,
        bottom: OPTION_ROW_BOTTOM,
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projectile {
    pub id: u64,
    pub x: f64,
    pub y: f64,
}

impl Projectile {
    fn rect(&self) -> FieldRect {
        FieldRect {
            left: self.x - PROJECTILE_HALF_WIDTH,
            right: self.x + PROJECTILE_HALF_WIDTH,
            top: self.y - PROJECTILE_HEIGHT,
            bottom: self.y,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hit {
    Correct,
    Incorrect,
}

/// Pure arcade-mode simulation: Idle until `start`, Active until `reset`.
/// All positions are plain numeric state; the UI only draws it.
pub struct GameState {
    cards: Vec<Flashcard>,
    pub card_index: usize,
    pub options: Vec<String>,
    pub score: u32,
    pub active: bool,
    pub rocket_x: f64,
    pub projectiles: Vec<Projectile>,
    next_projectile_id: u64,
    rng: SmallRng,
}

impl GameState {
    pub fn new(cards: Vec<Flashcard>, mut rng: SmallRng) -> Result<Self, GameError> {
        if cards.len() < quiz::MIN_CARDS {
            return Err(GameError::NotEnoughCards { have: cards.len() });
        }
        let options = quiz::build_options(&cards, 0, &mut rng)?;
        Ok(Self {
            cards,
            card_index: 0,
            options,
            score: 0,
            active: false,
            rocket_x: 50.0,
            projectiles: Vec::new(),
            next_projectile_id: 0,
            rng,
        })
    }

    pub fn current_card(&self) -> &Flashcard {
        &self.cards[self.card_index]
    }

    pub fn start(&mut self) {
        self.active = true;
        self.restart_round();
    }

    pub fn reset(&mut self) {
        self.active = false;
        self.restart_round();
    }

    fn restart_round(&mut self) {
        self.score = 0;
        self.card_index = 0;
        self.projectiles.clear();
        self.regenerate_options();
    }

    pub fn move_left(&mut self) {
        self.rocket_x = (self.rocket_x - ROCKET_STEP).clamp(FIELD_MIN_X, FIELD_MAX_X);
    }

    pub fn move_right(&mut self) {
        self.rocket_x = (self.rocket_x + ROCKET_STEP).clamp(FIELD_MIN_X, FIELD_MAX_X);
    }

    /// Spawn a projectile at the rocket's stored x. This is the canonical
    /// origin rule; there is no rendered-center variant.
    pub fn fire(&mut self) {
        if !self.active {
            return;
        }
        self.projectiles.push(Projectile {
            id: self.next_projectile_id,
            x: self.rocket_x,
            y: PROJECTILE_SPAWN_Y,
        });
        self.next_projectile_id += 1;
    }

    /// Advance one simulation step: move projectiles, drop the ones that
    /// left the field, then resolve collisions against the option slots.
    /// Returns the hits resolved this tick.
    pub fn tick(&mut self) -> Vec<Hit> {
        if !self.active {
            return Vec::new();
        }

        for projectile in &mut self.projectiles {
            projectile.y -= PROJECTILE_SPEED;
        }
        self.projectiles.retain(|p| p.y > 0.0);

        let mut hits = Vec::new();
        let mut i = 0;
        while i < self.projectiles.len() {
            let rect = self.projectiles[i].rect();
            let hit_slot = (0..self.options.len()).find(|&s| rect.overlaps(&option_slot(s)));
            match hit_slot {
                Some(slot) => {
                    let correct = self.options[slot] == self.cards[self.card_index].back;
                    self.projectiles.remove(i);
                    if correct {
                        self.score += CORRECT_HIT_POINTS;
                        self.card_index = (self.card_index + 1) % self.cards.len();
                        self.regenerate_options();
                        hits.push(Hit::Correct);
                    } else {
                        self.score = self.score.saturating_sub(WRONG_HIT_PENALTY);
                        hits.push(Hit::Incorrect);
                    }
                }
                None => i += 1,
            }
        }
        hits
    }

    fn regenerate_options(&mut self) {
        // Cannot fail: the card count was checked at construction.
        if let Ok(options) = quiz::build_options(&self.cards, self.card_index, &mut self.rng) {
            self.options = options;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rand::SeedableRng;

    fn deck(n: usize) -> Vec<Flashcard> {
        let now = Utc::now();
        (0..n)
            .map(|i| Flashcard {
                id: format!("c{i}"),
                set_id: "set-1".to_string(),
                front: format!("front {i}"),
                back: format!("back {i}"),
                created_at: now,
                updated_at: now,
            })
            .collect()
    }

    fn game(n: usize) -> GameState {
        GameState::new(deck(n), SmallRng::seed_from_u64(42)).unwrap()
    }

    fn slot_center_x(slot: usize) -> f64 {
        let rect = option_slot(slot);
        (rect.left + rect.right) / 2.0
    }

    /// Place a projectile just above the option row and tick once so it
    /// enters the row on this tick.
    fn shoot_slot(game: &mut GameState, slot: usize) -> Vec<Hit> {
        game.projectiles.push(Projectile {
            id: 999,
            x: slot_center_x(slot),
            y: OPTION_ROW_BOTTOM + PROJECTILE_SPEED,
        });
        game.tick()
    }

    fn correct_slot(game: &GameState) -> usize {
        let correct = game.current_card().back.clone();
        game.options.iter().position(|o| *o == correct).unwrap()
    }

    fn wrong_slot(game: &GameState) -> usize {
        let correct = game.current_card().back.clone();
        game.options.iter().position(|o| *o != correct).unwrap()
    }

    #[test]
    fn test_refuses_small_decks() {
        for n in 0..4 {
            let result = GameState::new(deck(n), SmallRng::seed_from_u64(1));
            assert!(matches!(
                result,
                Err(GameError::NotEnoughCards { have }) if have == n
            ));
        }
    }

    #[test]
    fn test_start_and_reset_state_machine() {
        let mut game = game(5);
        assert!(!game.active);
        game.start();
        assert!(game.active);
        game.score = 30;
        game.fire();
        game.reset();
        assert!(!game.active);
        assert_eq!(game.score, 0);
        assert_eq!(game.card_index, 0);
        assert!(game.projectiles.is_empty());
    }

    #[test]
    fn test_fire_ignored_while_idle_and_tick_is_a_no_op() {
        let mut game = game(4);
        game.fire();
        assert!(game.projectiles.is_empty());
        assert!(game.tick().is_empty());
    }

    #[test]
    fn test_fire_spawns_at_rocket_position() {
        let mut game = game(4);
        game.start();
        game.move_left();
        game.move_left();
        game.fire();
        assert_eq!(game.projectiles.len(), 1);
        assert_eq!(game.projectiles[0].x, 40.0);
        assert_eq!(game.projectiles[0].y, PROJECTILE_SPAWN_Y);
    }

    #[test]
    fn test_rocket_clamped_to_field() {
        let mut game = game(4);
        game.start();
        for _ in 0..30 {
            game.move_left();
        }
        assert_eq!(game.rocket_x, FIELD_MIN_X);
        for _ in 0..60 {
            game.move_right();
        }
        assert_eq!(game.rocket_x, FIELD_MAX_X);
    }

    #[test]
    fn test_projectiles_climb_and_despawn() {
        let mut game = game(4);
        game.start();
        // Park the rocket in the gap between slots 1 and 2 so nothing hits.
        game.rocket_x = option_slot(1).right + 1.0;
        game.fire();
        let y0 = game.projectiles[0].y;
        game.tick();
        assert_eq!(game.projectiles[0].y, y0 - PROJECTILE_SPEED);

        for _ in 0..40 {
            game.tick();
        }
        assert!(game.projectiles.is_empty());
    }

    #[test]
    fn test_correct_hit_scores_and_advances() {
        let mut game = game(6);
        game.start();
        let first_answer = game.current_card().back.clone();
        let slot = correct_slot(&game);
        let hits = shoot_slot(&mut game, slot);
        assert_eq!(hits, vec![Hit::Correct]);
        assert_eq!(game.score, 10);
        assert_eq!(game.card_index, 1);
        assert!(game.projectiles.is_empty());
        assert_eq!(game.options.len(), 4);
        // Fresh options reference the new card's answer.
        assert!(game.options.contains(&game.current_card().back));
        assert_ne!(game.current_card().back, first_answer);
    }

    #[test]
    fn test_question_index_wraps_around() {
        let mut game = game(4);
        game.start();
        for _ in 0..4 {
            let slot = correct_slot(&game);
            shoot_slot(&mut game, slot);
        }
        assert_eq!(game.card_index, 0);
        assert_eq!(game.score, 40);
    }

    #[test]
    fn test_wrong_hit_floors_score_at_zero() {
        let mut game = game(5);
        game.start();
        let slot = wrong_slot(&game);
        let hits = shoot_slot(&mut game, slot);
        assert_eq!(hits, vec![Hit::Incorrect]);
        assert_eq!(game.score, 0);
        assert_eq!(game.card_index, 0);

        // Score a correct hit, then lose half of it.
        let slot = correct_slot(&game);
        shoot_slot(&mut game, slot);
        assert_eq!(game.score, 10);
        let slot = wrong_slot(&game);
        shoot_slot(&mut game, slot);
        assert_eq!(game.score, 5);
    }

    #[test]
    fn test_projectile_between_slots_passes_through() {
        let mut game = game(4);
        game.start();
        let gap_x = option_slot(0).right + OPTION_SLOT_MARGIN;
        game.projectiles.push(Projectile {
            id: 1,
            x: gap_x,
            y: OPTION_ROW_BOTTOM + PROJECTILE_SPEED,
        });
        let hits = game.tick();
        assert!(hits.is_empty());
        assert_eq!(game.projectiles.len(), 1);
    }

    #[test]
    fn test_option_slots_are_disjoint() {
        for a in 0..4 {
            for b in (a + 1)..4 {
                assert!(!option_slot(a).overlaps(&option_slot(b)));
            }
        }
    }

    #[test]
    fn test_slots_fit_in_field() {
        assert!(option_slot(0).left >= 0.0);
        assert!(option_slot(3).right <= 100.0);
    }
}
