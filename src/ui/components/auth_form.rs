use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::app::{AuthField, AuthMode, AuthState};
use crate::ui::layout::centered_rect;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

pub struct AuthForm<'a> {
    pub state: &'a AuthState,
    pub offline_available: bool,
    pub theme: &'a Theme,
}

impl<'a> AuthForm<'a> {
    pub fn new(state: &'a AuthState, offline_available: bool, theme: &'a Theme) -> Self {
        Self {
            state,
            offline_available,
            theme,
        }
    }

    fn render_field(
        &self,
        title: &str,
        input: &LineInput,
        focused: bool,
        mask: bool,
        area: Rect,
        buf: &mut Buffer,
    ) {
        let colors = &self.theme.colors;
        let border = if focused {
            colors.border_focused()
        } else {
            colors.border()
        };
        let block = Block::bordered()
            .title(format!(" {title} "))
            .border_style(Style::default().fg(border));
        let inner = block.inner(area);
        block.render(area, buf);

        let (before, cursor, after) = input.render_parts();
        let masked = |s: &str| "•".repeat(s.chars().count());

        let mut spans = Vec::new();
        spans.push(Span::styled(
            if mask { masked(before) } else { before.to_string() },
            Style::default().fg(colors.fg()),
        ));
        if focused {
            let cursor_text = match cursor {
                Some(_) if mask => "•".to_string(),
                Some(ch) => ch.to_string(),
                None => " ".to_string(),
            };
            spans.push(Span::styled(
                cursor_text,
                Style::default()
                    .fg(colors.input_cursor_fg())
                    .bg(colors.input_cursor_bg()),
            ));
        } else if let Some(ch) = cursor {
            spans.push(Span::styled(
                if mask { "•".to_string() } else { ch.to_string() },
                Style::default().fg(colors.fg()),
            ));
        }
        spans.push(Span::styled(
            if mask { masked(after) } else { after.to_string() },
            Style::default().fg(colors.fg()),
        ));

        Paragraph::new(Line::from(spans)).render(inner, buf);
    }
}

impl Widget for &AuthForm<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let state = self.state;

        let popup = centered_rect(40, 60, area);
        let title = match state.mode {
            AuthMode::SignIn => " Sign in ",
            AuthMode::SignUp => " Create account ",
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(popup);
        block.render(popup, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(2),
                Constraint::Min(0),
            ])
            .split(inner);

        let banner = Paragraph::new(vec![
            Line::from(Span::styled(
                "flashbear",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Study flashcards in your terminal",
                Style::default().fg(colors.dim()),
            )),
        ])
        .alignment(Alignment::Center);
        banner.render(layout[0], buf);

        self.render_field(
            "Email",
            &state.email,
            state.focus == AuthField::Email,
            false,
            layout[1],
            buf,
        );
        self.render_field(
            "Password",
            &state.password,
            state.focus == AuthField::Password,
            true,
            layout[2],
            buf,
        );

        if let Some(error) = &state.error {
            let p = Paragraph::new(Span::styled(
                error.as_str(),
                Style::default().fg(colors.error()),
            ))
            .alignment(Alignment::Center);
            p.render(layout[3], buf);
        } else if self.offline_available {
            let p = Paragraph::new(Span::styled(
                "Ctrl+O: continue offline",
                Style::default().fg(colors.dim()),
            ))
            .alignment(Alignment::Center);
            p.render(layout[3], buf);
        }
    }
}
