pub mod auth_form;
pub mod dashboard;
pub mod game_area;
pub mod import_modal;
pub mod practice_area;
pub mod progress_bar;
pub mod set_editor;
pub mod study_card;
