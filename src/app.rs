use std::collections::HashMap;

use rand::SeedableRng;
use rand::rngs::SmallRng;

#[cfg(feature = "network")]
use crate::backend::AuthClient;
#[cfg(feature = "network")]
use crate::backend::RestRepository;
use crate::backend::{BackendError, MemoryRepo, Session, SetRepository, memory};
use crate::config::Config;
use crate::game::GameState;
use crate::importer::{self, CardDelimiter, TermDelimiter};
use crate::model::{CardDraft, Flashcard, FlashcardSet, NewCard, NewSet, SetPatch};
use crate::quiz::{self, Question};
use crate::store::SessionCache;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Auth,
    Dashboard,
    SetEditor,
    Import,
    Study,
    Practice,
    Game,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthMode {
    SignIn,
    SignUp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthField {
    Email,
    Password,
}

pub struct AuthState {
    pub mode: AuthMode,
    pub focus: AuthField,
    pub email: LineInput,
    pub password: LineInput,
    pub error: Option<String>,
}

impl AuthState {
    pub fn new() -> Self {
        Self {
            mode: AuthMode::SignIn,
            focus: AuthField::Email,
            email: LineInput::new(""),
            password: LineInput::new(""),
            error: None,
        }
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::SignIn => AuthMode::SignUp,
            AuthMode::SignUp => AuthMode::SignIn,
        };
        self.error = None;
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            AuthField::Email => AuthField::Password,
            AuthField::Password => AuthField::Email,
        };
    }

    pub fn focused_input(&mut self) -> &mut LineInput {
        match self.focus {
            AuthField::Email => &mut self.email,
            AuthField::Password => &mut self.password,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorFocus {
    Title,
    Description,
    Front(usize),
    Back(usize),
}

/// Editor for one set. The focused field is edited through `input`; its
/// committed value lives in `title`/`description`/`cards` and is written
/// back on every focus change.
pub struct EditorState {
    pub set_id: Option<String>,
    pub title: String,
    pub description: String,
    pub cards: Vec<CardDraft>,
    pub focus: EditorFocus,
    pub input: LineInput,
    pub scroll: usize,
    pub message: Option<String>,
}

impl EditorState {
    pub fn new_set() -> Self {
        Self {
            set_id: None,
            title: String::new(),
            description: String::new(),
            cards: vec![CardDraft::default()],
            focus: EditorFocus::Title,
            input: LineInput::new(""),
            scroll: 0,
            message: None,
        }
    }

    pub fn edit_set(set: &FlashcardSet, cards: Vec<CardDraft>) -> Self {
        let cards = if cards.is_empty() {
            vec![CardDraft::default()]
        } else {
            cards
        };
        Self {
            set_id: Some(set.id.clone()),
            title: set.title.clone(),
            description: set.description.clone().unwrap_or_default(),
            cards,
            focus: EditorFocus::Title,
            input: LineInput::new(&set.title),
            scroll: 0,
            message: None,
        }
    }

    /// Write the live input back into the focused field.
    pub fn commit_input(&mut self) {
        let value = self.input.value().to_string();
        match self.focus {
            EditorFocus::Title => self.title = value,
            EditorFocus::Description => self.description = value,
            EditorFocus::Front(i) => {
                if let Some(card) = self.cards.get_mut(i) {
                    card.front = value;
                }
            }
            EditorFocus::Back(i) => {
                if let Some(card) = self.cards.get_mut(i) {
                    card.back = value;
                }
            }
        }
    }

    fn load_focus(&mut self) {
        let value = match self.focus {
            EditorFocus::Title => self.title.as_str(),
            EditorFocus::Description => self.description.as_str(),
            EditorFocus::Front(i) => self.cards.get(i).map_or("", |c| c.front.as_str()),
            EditorFocus::Back(i) => self.cards.get(i).map_or("", |c| c.back.as_str()),
        };
        self.input = LineInput::new(value);
        if let EditorFocus::Front(i) | EditorFocus::Back(i) = self.focus {
            self.scroll = self.scroll.min(i);
        }
    }

    pub fn focus_next(&mut self) {
        self.commit_input();
        self.focus = next_focus(self.focus, self.cards.len());
        self.load_focus();
    }

    pub fn focus_prev(&mut self) {
        self.commit_input();
        self.focus = prev_focus(self.focus, self.cards.len());
        self.load_focus();
    }

    pub fn add_card(&mut self) {
        self.commit_input();
        self.cards.push(CardDraft::default());
        self.focus = EditorFocus::Front(self.cards.len() - 1);
        self.load_focus();
    }

    /// Remove the focused card row. The last remaining row is cleared
    /// instead of removed so the form always has somewhere to type.
    pub fn remove_card(&mut self) {
        let row = match self.focus {
            EditorFocus::Front(i) | EditorFocus::Back(i) => i,
            _ => return,
        };
        if self.cards.len() <= 1 {
            self.cards[0] = CardDraft::default();
        } else {
            self.cards.remove(row);
        }
        let row = row.min(self.cards.len() - 1);
        self.focus = EditorFocus::Front(row);
        self.load_focus();
    }

    /// Merge imported cards in: a single untouched row is replaced,
    /// anything else is appended to.
    pub fn absorb_imported(&mut self, imported: Vec<CardDraft>) {
        if imported.is_empty() {
            return;
        }
        if self.cards.len() == 1 && self.cards[0].is_blank() {
            self.cards = imported;
        } else {
            self.cards.extend(imported);
        }
        self.focus = EditorFocus::Front(0);
        self.scroll = 0;
        self.load_focus();
    }
}

pub fn next_focus(focus: EditorFocus, cards: usize) -> EditorFocus {
    match focus {
        EditorFocus::Title => EditorFocus::Description,
        EditorFocus::Description => EditorFocus::Front(0),
        EditorFocus::Front(i) => EditorFocus::Back(i),
        EditorFocus::Back(i) if i + 1 < cards => EditorFocus::Front(i + 1),
        EditorFocus::Back(_) => EditorFocus::Title,
    }
}

pub fn prev_focus(focus: EditorFocus, cards: usize) -> EditorFocus {
    match focus {
        EditorFocus::Title => EditorFocus::Back(cards.saturating_sub(1)),
        EditorFocus::Description => EditorFocus::Title,
        EditorFocus::Front(0) => EditorFocus::Description,
        EditorFocus::Front(i) => EditorFocus::Back(i - 1),
        EditorFocus::Back(i) => EditorFocus::Front(i),
    }
}

/// Checks run before anything is written to the backend. Fully blank rows
/// are ignored; they are dropped at save time.
pub fn validate_editor(title: &str, cards: &[CardDraft]) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Title is required".to_string());
    }
    let incomplete = cards
        .iter()
        .any(|card| !card.is_blank() && !card.is_complete());
    if incomplete {
        return Err("All cards must have both front and back content".to_string());
    }
    Ok(())
}

pub struct ImportState {
    pub raw: String,
    pub term: TermDelimiter,
    pub card_delim: CardDelimiter,
}

impl ImportState {
    pub fn new() -> Self {
        Self {
            raw: String::new(),
            term: TermDelimiter::default(),
            card_delim: CardDelimiter::default(),
        }
    }

    pub fn preview(&self) -> Vec<CardDraft> {
        importer::parse_cards(&self.raw, self.term, self.card_delim)
    }
}

pub struct StudyState {
    pub set_title: String,
    pub cards: Vec<Flashcard>,
    pub index: usize,
    pub flipped: bool,
}

impl StudyState {
    pub fn next(&mut self) {
        if self.index + 1 < self.cards.len() {
            self.index += 1;
            self.flipped = false;
        }
    }

    pub fn prev(&mut self) {
        if self.index > 0 {
            self.index -= 1;
            self.flipped = false;
        }
    }

    pub fn restart(&mut self) {
        self.index = 0;
        self.flipped = false;
    }
}

pub struct PracticeState {
    pub set_title: String,
    /// Kept so a retake can reshuffle the questions.
    cards: Vec<Flashcard>,
    pub questions: Vec<Question>,
    pub index: usize,
    pub selected: Option<usize>,
    /// Chosen option text keyed by question card id.
    pub answers: HashMap<String, String>,
    pub show_results: bool,
}

pub struct ArcadeState {
    pub set_title: String,
    pub game: GameState,
}

pub struct App {
    pub screen: AppScreen,
    pub theme: &'static Theme,
    pub config: Config,
    pub session: Option<Session>,
    pub offline: bool,
    pub sets: Vec<FlashcardSet>,
    pub selected_set: usize,
    pub confirm_delete: bool,
    /// Dashboard status line, mostly backend errors.
    pub status: Option<String>,
    pub auth: AuthState,
    pub editor: Option<EditorState>,
    pub import: Option<ImportState>,
    pub study: Option<StudyState>,
    pub practice: Option<PracticeState>,
    pub arcade: Option<ArcadeState>,
    pub should_quit: bool,
    repo: Box<dyn SetRepository>,
    #[cfg(feature = "network")]
    auth_client: Option<AuthClient>,
    session_cache: Option<SessionCache>,
    rng: SmallRng,
}

impl App {
    pub fn new(theme_override: Option<&str>, force_offline: bool) -> Self {
        let config = Config::load().unwrap_or_default();
        let theme_name = theme_override.unwrap_or(&config.theme);
        let loaded_theme = Theme::load(theme_name).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));

        #[cfg(feature = "network")]
        let offline = force_offline || !config.has_backend();
        #[cfg(not(feature = "network"))]
        let offline = {
            let _ = force_offline;
            true
        };

        let repo: Box<dyn SetRepository> = if offline {
            Box::new(MemoryRepo::new())
        } else {
            #[cfg(feature = "network")]
            {
                Box::new(RestRepository::new(
                    &config.backend_url,
                    &config.backend_anon_key,
                ))
            }
            #[cfg(not(feature = "network"))]
            unreachable!()
        };

        #[cfg(feature = "network")]
        let auth_client = if offline {
            None
        } else {
            Some(AuthClient::new(
                &config.backend_url,
                &config.backend_anon_key,
            ))
        };

        let session_cache = if offline { None } else { SessionCache::new().ok() };

        let mut app = Self {
            screen: AppScreen::Auth,
            theme,
            config,
            session: None,
            offline,
            sets: Vec::new(),
            selected_set: 0,
            confirm_delete: false,
            status: None,
            auth: AuthState::new(),
            editor: None,
            import: None,
            study: None,
            practice: None,
            arcade: None,
            should_quit: false,
            repo,
            #[cfg(feature = "network")]
            auth_client,
            session_cache,
            rng: SmallRng::from_entropy(),
        };

        if app.offline {
            app.session = Some(memory::offline_session());
            app.screen = AppScreen::Dashboard;
        } else if let Some(session) = app.session_cache.as_ref().and_then(|c| c.load()) {
            app.session = Some(session);
            app.screen = AppScreen::Dashboard;
        }
        if app.screen == AppScreen::Dashboard {
            app.refresh_sets();
        }
        app
    }

    pub fn selected_set(&self) -> Option<&FlashcardSet> {
        self.sets.get(self.selected_set)
    }

    fn session(&self) -> Option<Session> {
        self.session.clone()
    }

    /// Turn a backend failure into a status message. A rejected token sends
    /// the user back to the sign-in screen.
    fn report_error(&mut self, err: BackendError) -> String {
        let expired = matches!(
            err,
            BackendError::NotAuthenticated | BackendError::Api { status: 401, .. }
        );
        if expired && !self.offline {
            if let Some(cache) = &self.session_cache {
                let _ = cache.clear();
            }
            self.session = None;
            self.auth = AuthState::new();
            self.auth.error = Some("Session expired, sign in again".to_string());
            self.screen = AppScreen::Auth;
        }
        err.to_string()
    }

    // Auth

    pub fn submit_auth(&mut self) {
        let email = self.auth.email.value().trim().to_string();
        let password = self.auth.password.value().to_string();
        if email.is_empty() || password.is_empty() {
            self.auth.error = Some("Email and password are required".to_string());
            return;
        }

        #[cfg(feature = "network")]
        if let Some(client) = &self.auth_client {
            let result = match self.auth.mode {
                AuthMode::SignIn => client.sign_in(&email, &password),
                AuthMode::SignUp => client.sign_up(&email, &password),
            };
            match result {
                Ok(session) => {
                    if let Some(cache) = &self.session_cache {
                        let _ = cache.save(&session);
                    }
                    self.session = Some(session);
                    self.auth = AuthState::new();
                    self.screen = AppScreen::Dashboard;
                    self.refresh_sets();
                }
                Err(err) => {
                    self.auth.error = Some(err.to_string());
                }
            }
        }
    }

    /// Drop to the in-process repository. Available from the sign-in screen
    /// so the app is usable without an account.
    pub fn continue_offline(&mut self) {
        self.offline = true;
        self.repo = Box::new(MemoryRepo::new());
        #[cfg(feature = "network")]
        {
            self.auth_client = None;
        }
        self.session_cache = None;
        self.session = Some(memory::offline_session());
        self.screen = AppScreen::Dashboard;
        self.refresh_sets();
    }

    pub fn sign_out(&mut self) {
        if self.offline {
            return;
        }
        #[cfg(feature = "network")]
        if let (Some(client), Some(session)) = (&self.auth_client, &self.session) {
            // Token revocation is best effort, local state is cleared anyway.
            let _ = client.sign_out(session);
        }
        if let Some(cache) = &self.session_cache {
            let _ = cache.clear();
        }
        self.session = None;
        self.sets.clear();
        self.selected_set = 0;
        self.status = None;
        self.auth = AuthState::new();
        self.screen = AppScreen::Auth;
    }

    // Dashboard

    pub fn refresh_sets(&mut self) {
        let Some(session) = self.session() else {
            return;
        };
        match self.repo.list_sets(&session) {
            Ok(sets) => {
                self.sets = sets;
                if self.selected_set >= self.sets.len() {
                    self.selected_set = self.sets.len().saturating_sub(1);
                }
            }
            Err(err) => {
                self.status = Some(self.report_error(err));
            }
        }
    }

    pub fn select_next_set(&mut self) {
        if !self.sets.is_empty() {
            self.selected_set = (self.selected_set + 1) % self.sets.len();
            self.confirm_delete = false;
        }
    }

    pub fn select_prev_set(&mut self) {
        if !self.sets.is_empty() {
            self.selected_set = (self.selected_set + self.sets.len() - 1) % self.sets.len();
            self.confirm_delete = false;
        }
    }

    pub fn request_delete(&mut self) {
        if self.selected_set().is_some() {
            self.confirm_delete = true;
        }
    }

    pub fn confirm_delete_set(&mut self) {
        self.confirm_delete = false;
        let Some(set_id) = self.selected_set().map(|s| s.id.clone()) else {
            return;
        };
        let Some(session) = self.session() else {
            return;
        };
        match self.repo.delete_set(&session, &set_id) {
            Ok(()) => {
                self.status = None;
                self.refresh_sets();
            }
            Err(err) => {
                self.status = Some(self.report_error(err));
            }
        }
    }

    // Editor

    pub fn open_new_set(&mut self) {
        self.editor = Some(EditorState::new_set());
        self.screen = AppScreen::SetEditor;
    }

    pub fn open_edit_set(&mut self) {
        let Some(set) = self.selected_set().cloned() else {
            return;
        };
        let Some(session) = self.session() else {
            return;
        };
        match self.repo.list_cards(&session, &set.id) {
            Ok(cards) => {
                let drafts = cards
                    .iter()
                    .map(|c| CardDraft::new(&c.front, &c.back))
                    .collect();
                self.editor = Some(EditorState::edit_set(&set, drafts));
                self.screen = AppScreen::SetEditor;
            }
            Err(err) => {
                self.status = Some(self.report_error(err));
            }
        }
    }

    pub fn save_editor(&mut self) {
        let Some(session) = self.session() else {
            return;
        };
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        editor.commit_input();

        if let Err(message) = validate_editor(&editor.title, &editor.cards) {
            editor.message = Some(message);
            return;
        }

        let title = editor.title.trim().to_string();
        let description = editor.description.trim().to_string();
        let cards: Vec<CardDraft> = editor
            .cards
            .iter()
            .filter(|c| !c.is_blank())
            .cloned()
            .collect();
        let set_id = editor.set_id.clone();

        let result = match set_id {
            Some(set_id) => self
                .repo
                .update_set(
                    &session,
                    &set_id,
                    &SetPatch {
                        title: &title,
                        description: &description,
                    },
                )
                .and_then(|_| {
                    let new_cards: Vec<NewCard> = cards
                        .iter()
                        .map(|c| NewCard {
                            set_id: &set_id,
                            front: c.front.trim(),
                            back: c.back.trim(),
                        })
                        .collect();
                    self.repo.replace_cards(&session, &set_id, &new_cards)
                })
                .map(|_| ()),
            None => self
                .repo
                .create_set(
                    &session,
                    &NewSet {
                        user_id: &session.user.id,
                        title: &title,
                        description: &description,
                    },
                )
                .and_then(|created| {
                    let new_cards: Vec<NewCard> = cards
                        .iter()
                        .map(|c| NewCard {
                            set_id: &created.id,
                            front: c.front.trim(),
                            back: c.back.trim(),
                        })
                        .collect();
                    self.repo.create_cards(&session, &new_cards)
                })
                .map(|_| ()),
        };

        match result {
            Ok(()) => {
                self.editor = None;
                self.go_to_dashboard();
                self.refresh_sets();
            }
            Err(err) => {
                let message = self.report_error(err);
                if let Some(editor) = self.editor.as_mut() {
                    editor.message = Some(message);
                }
            }
        }
    }

    // Import

    pub fn open_import(&mut self) {
        if self.editor.is_some() {
            self.import = Some(ImportState::new());
            self.screen = AppScreen::Import;
        }
    }

    pub fn cancel_import(&mut self) {
        self.import = None;
        self.screen = AppScreen::SetEditor;
    }

    pub fn confirm_import(&mut self) {
        let Some(import) = self.import.take() else {
            return;
        };
        if let Some(editor) = self.editor.as_mut() {
            editor.absorb_imported(import.preview());
        }
        self.screen = AppScreen::SetEditor;
    }

    // Study modes

    fn load_cards_of_selected(&mut self) -> Option<(FlashcardSet, Vec<Flashcard>)> {
        let set = self.selected_set().cloned()?;
        let session = self.session()?;
        match self.repo.list_cards(&session, &set.id) {
            Ok(cards) => Some((set, cards)),
            Err(err) => {
                self.status = Some(self.report_error(err));
                None
            }
        }
    }

    pub fn start_study(&mut self) {
        let Some((set, cards)) = self.load_cards_of_selected() else {
            return;
        };
        if cards.is_empty() {
            self.status = Some("No flashcards found in this set".to_string());
            return;
        }
        self.study = Some(StudyState {
            set_title: set.title,
            cards,
            index: 0,
            flipped: false,
        });
        self.status = None;
        self.screen = AppScreen::Study;
    }

    pub fn start_practice(&mut self) {
        let Some((set, cards)) = self.load_cards_of_selected() else {
            return;
        };
        match quiz::build_questions(&cards, &mut self.rng) {
            Ok(questions) => {
                self.practice = Some(PracticeState {
                    set_title: set.title,
                    cards,
                    questions,
                    index: 0,
                    selected: None,
                    answers: HashMap::new(),
                    show_results: false,
                });
                self.status = None;
                self.screen = AppScreen::Practice;
            }
            Err(err) => {
                self.status = Some(err.to_string());
            }
        }
    }

    pub fn practice_select(&mut self, option: usize) {
        if let Some(practice) = self.practice.as_mut() {
            if !practice.show_results && option < 4 {
                practice.selected = Some(option);
            }
        }
    }

    pub fn practice_submit(&mut self) {
        let Some(practice) = self.practice.as_mut() else {
            return;
        };
        if practice.show_results {
            return;
        }
        let Some(selected) = practice.selected else {
            return;
        };
        let question = &practice.questions[practice.index];
        practice
            .answers
            .insert(question.card_id.clone(), question.options[selected].clone());

        if practice.index + 1 < practice.questions.len() {
            practice.index += 1;
            practice.selected = None;
        } else {
            practice.show_results = true;
        }
    }

    /// Retake with freshly shuffled options.
    pub fn practice_retry(&mut self) {
        let Some(practice) = self.practice.as_mut() else {
            return;
        };
        if let Ok(questions) = quiz::build_questions(&practice.cards, &mut self.rng) {
            practice.questions = questions;
        }
        practice.index = 0;
        practice.selected = None;
        practice.answers.clear();
        practice.show_results = false;
    }

    pub fn start_game(&mut self) {
        let Some((set, cards)) = self.load_cards_of_selected() else {
            return;
        };
        let rng = SmallRng::from_rng(&mut self.rng).unwrap();
        match GameState::new(cards, rng) {
            Ok(game) => {
                self.arcade = Some(ArcadeState {
                    set_title: set.title,
                    game,
                });
                self.status = None;
                self.screen = AppScreen::Game;
            }
            Err(err) => {
                self.status = Some(err.to_string());
            }
        }
    }

    pub fn on_tick(&mut self) {
        if self.screen == AppScreen::Game {
            if let Some(arcade) = self.arcade.as_mut() {
                arcade.game.tick();
            }
        }
    }

    pub fn go_to_dashboard(&mut self) {
        self.screen = AppScreen::Dashboard;
        self.editor = None;
        self.import = None;
        self.study = None;
        self.practice = None;
        self.arcade = None;
        self.confirm_delete = false;
    }
}
