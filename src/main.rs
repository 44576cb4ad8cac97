mod app;
mod backend;
mod config;
mod event;
mod game;
mod importer;
mod model;
mod quiz;
mod store;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use app::{App, AppScreen};
use event::{AppEvent, EventHandler};
use ui::components::auth_form::AuthForm;
use ui::components::dashboard::Dashboard;
use ui::components::game_area::GameArea;
use ui::components::import_modal::ImportModal;
use ui::components::practice_area::PracticeArea;
use ui::components::progress_bar::ProgressBar;
use ui::components::set_editor::SetEditor;
use ui::components::study_card::StudyCard;
use ui::layout::{AppLayout, pack_hint_lines};
use ui::line_input::InputResult;

#[derive(Parser)]
#[command(name = "flashbear", version, about = "Terminal flashcard study app")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Skip sign-in and keep sets in memory")]
    offline: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut app = App::new(cli.theme.as_deref(), cli.offline);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(game::TICK_MS));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Auth => handle_auth_key(app, key),
        AppScreen::Dashboard => handle_dashboard_key(app, key),
        AppScreen::SetEditor => handle_editor_key(app, key),
        AppScreen::Import => handle_import_key(app, key),
        AppScreen::Study => handle_study_key(app, key),
        AppScreen::Practice => handle_practice_key(app, key),
        AppScreen::Game => handle_game_key(app, key),
    }
}

fn handle_auth_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Tab | KeyCode::BackTab => app.auth.toggle_focus(),
        KeyCode::Char('t') if ctrl => app.auth.toggle_mode(),
        KeyCode::Char('o') if ctrl => app.continue_offline(),
        _ => match app.auth.focused_input().handle(key) {
            InputResult::Submit => match app.auth.focus {
                app::AuthField::Email => app.auth.toggle_focus(),
                app::AuthField::Password => app.submit_auth(),
            },
            InputResult::Cancel => app.should_quit = true,
            InputResult::Continue => {}
        },
    }
}

fn handle_dashboard_key(app: &mut App, key: KeyEvent) {
    // Delete confirmation takes priority
    if app.confirm_delete {
        match key.code {
            KeyCode::Char('y') => app.confirm_delete_set(),
            KeyCode::Char('n') | KeyCode::Esc => app.confirm_delete = false,
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('j') | KeyCode::Down => app.select_next_set(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev_set(),
        KeyCode::Char('n') => app.open_new_set(),
        KeyCode::Char('e') => app.open_edit_set(),
        KeyCode::Char('x') | KeyCode::Delete => app.request_delete(),
        KeyCode::Char('s') | KeyCode::Enter => app.start_study(),
        KeyCode::Char('p') => app.start_practice(),
        KeyCode::Char('g') => app.start_game(),
        KeyCode::Char('r') => app.refresh_sets(),
        KeyCode::Char('o') => app.sign_out(),
        _ => {}
    }
}

fn handle_editor_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => app.go_to_dashboard(),
        KeyCode::Char('s') if ctrl => app.save_editor(),
        KeyCode::Char('n') if ctrl => {
            if let Some(editor) = app.editor.as_mut() {
                editor.add_card();
            }
        }
        KeyCode::Char('d') if ctrl => {
            if let Some(editor) = app.editor.as_mut() {
                editor.remove_card();
            }
        }
        KeyCode::Char('p') if ctrl => app.open_import(),
        KeyCode::Tab | KeyCode::Enter => {
            if let Some(editor) = app.editor.as_mut() {
                editor.focus_next();
            }
        }
        KeyCode::BackTab => {
            if let Some(editor) = app.editor.as_mut() {
                editor.focus_prev();
            }
        }
        _ => {
            if let Some(editor) = app.editor.as_mut() {
                editor.input.handle(key);
            }
        }
    }
}

fn handle_import_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => return app.cancel_import(),
        KeyCode::Char('s') if ctrl => return app.confirm_import(),
        _ => {}
    }
    let Some(import) = app.import.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Char('t') if ctrl => import.term = import.term.cycle(),
        KeyCode::Char('b') if ctrl => import.card_delim = import.card_delim.cycle(),
        KeyCode::Enter => import.raw.push('\n'),
        KeyCode::Tab => import.raw.push('\t'),
        KeyCode::Backspace => {
            import.raw.pop();
        }
        KeyCode::Char(ch) if !ctrl => import.raw.push(ch),
        _ => {}
    }
}

fn handle_study_key(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
        return app.go_to_dashboard();
    }
    let Some(study) = app.study.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Char(' ') | KeyCode::Enter => study.flipped = !study.flipped,
        KeyCode::Right | KeyCode::Char('l') => study.next(),
        KeyCode::Left | KeyCode::Char('h') => study.prev(),
        KeyCode::Char('r') => study.restart(),
        _ => {}
    }
}

fn handle_practice_key(app: &mut App, key: KeyEvent) {
    let show_results = app.practice.as_ref().is_some_and(|p| p.show_results);
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_dashboard(),
        KeyCode::Char('r') if show_results => app.practice_retry(),
        KeyCode::Char(ch @ '1'..='4') => {
            app.practice_select(ch as usize - '1' as usize);
        }
        KeyCode::Enter => app.practice_submit(),
        _ => {}
    }
}

fn handle_game_key(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
        return app.go_to_dashboard();
    }
    let Some(arcade) = app.arcade.as_mut() else {
        return;
    };
    let game = &mut arcade.game;
    match key.code {
        KeyCode::Enter => {
            if game.active {
                game.fire();
            } else {
                game.start();
            }
        }
        KeyCode::Char(' ') => game.fire(),
        KeyCode::Left | KeyCode::Char('h') => game.move_left(),
        KeyCode::Right | KeyCode::Char('l') => game.move_right(),
        KeyCode::Char('r') => game.reset(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Auth => render_auth(frame, app),
        AppScreen::Dashboard => render_dashboard(frame, app),
        AppScreen::SetEditor => render_editor(frame, app),
        AppScreen::Import => render_import(frame, app),
        AppScreen::Study => render_study(frame, app),
        AppScreen::Practice => render_practice(frame, app),
        AppScreen::Game => render_game(frame, app),
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect, info: &str) {
    let colors = &app.theme.colors;
    let mode = if app.offline { " offline" } else { "" };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " flashbear ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{info}{mode}"),
            Style::default().fg(colors.dim()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_footer(
    frame: &mut ratatui::Frame,
    app: &App,
    area: ratatui::layout::Rect,
    hints: &[&str],
) {
    let colors = &app.theme.colors;
    let lines: Vec<Line> = pack_hint_lines(hints, area.width as usize)
        .into_iter()
        .take(area.height as usize)
        .map(|line| Line::from(Span::styled(line, Style::default().fg(colors.dim()))))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_auth(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());
    render_header(frame, app, layout.header, "");

    #[cfg(feature = "network")]
    let offline_available = true;
    #[cfg(not(feature = "network"))]
    let offline_available = false;

    let form = AuthForm::new(&app.auth, offline_available, app.theme);
    frame.render_widget(&form, layout.main);

    render_footer(
        frame,
        app,
        layout.footer,
        &[
            "[Tab] Switch field",
            "[Enter] Submit",
            "[Ctrl+T] Sign in/sign up",
            "[Ctrl+O] Offline",
            "[Esc] Quit",
        ],
    );
}

fn render_dashboard(frame: &mut ratatui::Frame, app: &App) {
    let colors = &app.theme.colors;
    let layout = AppLayout::new(frame.area());

    let info = app
        .session
        .as_ref()
        .map(|s| format!(" {}", s.user.email))
        .unwrap_or_default();
    render_header(frame, app, layout.header, &info);

    let dashboard = Dashboard::new(&app.sets, app.selected_set, app.confirm_delete, app.theme);
    frame.render_widget(&dashboard, layout.main);

    if let Some(status) = &app.status {
        let line = Paragraph::new(Span::styled(
            format!("  {status}"),
            Style::default().fg(colors.error()),
        ));
        frame.render_widget(line, layout.footer);
    } else {
        let mut hints = vec![
            "[n] New",
            "[e] Edit",
            "[s] Study",
            "[p] Practice test",
            "[g] Arcade",
            "[x] Delete",
            "[r] Refresh",
        ];
        if !app.offline {
            hints.push("[o] Sign out");
        }
        hints.push("[q] Quit");
        render_footer(frame, app, layout.footer, &hints);
    }
}

fn render_editor(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());
    render_header(frame, app, layout.header, "");

    if let Some(editor) = &app.editor {
        let widget = SetEditor::new(editor, app.theme);
        frame.render_widget(&widget, layout.main);
    }

    render_footer(
        frame,
        app,
        layout.footer,
        &[
            "[Tab/Enter] Next field",
            "[Ctrl+N] Add card",
            "[Ctrl+D] Remove card",
            "[Ctrl+P] Import",
            "[Ctrl+S] Save",
            "[Esc] Discard",
        ],
    );
}

fn render_import(frame: &mut ratatui::Frame, app: &App) {
    // Editor stays visible behind the popup.
    render_editor(frame, app);
    if let Some(import) = &app.import {
        let modal = ImportModal::new(import, app.theme);
        frame.render_widget(&modal, frame.area());
    }
}

fn render_study(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());

    if let Some(study) = &app.study {
        render_header(frame, app, layout.header, &format!(" {}", study.set_title));

        let main = ratatui::layout::Layout::default()
            .direction(ratatui::layout::Direction::Vertical)
            .constraints([
                ratatui::layout::Constraint::Min(8),
                ratatui::layout::Constraint::Length(3),
            ])
            .split(layout.main);

        let card = StudyCard::new(&study.cards[study.index], study.flipped, app.theme);
        frame.render_widget(&card, main[0]);

        let progress = ProgressBar::new("Progress", study.index + 1, study.cards.len(), app.theme);
        frame.render_widget(progress, main[1]);
    }

    render_footer(
        frame,
        app,
        layout.footer,
        &[
            "[Space] Flip",
            "[←/→] Prev/next",
            "[r] Restart",
            "[Esc] Back",
        ],
    );
}

fn render_practice(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());

    if let Some(practice) = &app.practice {
        let info = format!(
            " {} — question {}/{}",
            practice.set_title,
            (practice.index + 1).min(practice.questions.len()),
            practice.questions.len()
        );
        render_header(frame, app, layout.header, &info);

        let area = PracticeArea::new(practice, app.theme);
        frame.render_widget(&area, layout.main);
    }

    render_footer(
        frame,
        app,
        layout.footer,
        &["[1-4] Choose", "[Enter] Submit", "[Esc] Back"],
    );
}

fn render_game(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());

    if let Some(arcade) = &app.arcade {
        render_header(frame, app, layout.header, &format!(" {}", arcade.set_title));

        let area = GameArea::new(&arcade.game, app.theme);
        frame.render_widget(&area, layout.main);
    }

    render_footer(
        frame,
        app,
        layout.footer,
        &[
            "[←/→] Move",
            "[Space] Fire",
            "[Enter] Start",
            "[r] Reset",
            "[Esc] Back",
        ],
    );
}
