use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::game::{self, GameState};
use crate::ui::theme::Theme;

/// Arcade field. The simulation runs in percent coordinates; this widget
/// only maps that state onto terminal cells.
pub struct GameArea<'a> {
    pub game: &'a GameState,
    pub theme: &'a Theme,
}

impl<'a> GameArea<'a> {
    pub fn new(game: &'a GameState, theme: &'a Theme) -> Self {
        Self { game, theme }
    }

    fn cell_x(area: Rect, percent: f64) -> u16 {
        let offset = (percent / 100.0 * area.width.saturating_sub(1) as f64).round() as u16;
        area.x + offset.min(area.width.saturating_sub(1))
    }

    fn cell_y(area: Rect, percent: f64) -> u16 {
        let offset = (percent / 100.0 * area.height.saturating_sub(1) as f64).round() as u16;
        area.y + offset.min(area.height.saturating_sub(1))
    }

    fn render_idle(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Shoot the answer!",
                Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Move with ← →, fire with Space.",
                Style::default().fg(colors.fg()),
            )),
            Line::from(Span::styled(
                "Hit the box matching the prompt: +10. Miss: -5.",
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Enter: start",
                Style::default().fg(colors.dim()),
            )),
        ];
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(area, buf);
    }

    fn render_field(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let game = self.game;

        // Prompt and score above the field.
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(8)])
            .split(area);

        let header = Paragraph::new(vec![
            Line::from(vec![
                Span::styled("Score: ", Style::default().fg(colors.dim())),
                Span::styled(
                    game.score.to_string(),
                    Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(Span::styled(
                game.current_card().front.as_str(),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )),
        ]);
        header.render(layout[0], buf);

        let field = layout[1];
        if field.width < 4 || field.height < 4 {
            return;
        }

        // Answer boxes at their slots.
        for (i, option) in game.options.iter().enumerate() {
            let slot = game::option_slot(i);
            let left = Self::cell_x(field, slot.left);
            let right = Self::cell_x(field, slot.right);
            let top = Self::cell_y(field, slot.top);
            let bottom = Self::cell_y(field, slot.bottom);
            let rect = Rect::new(
                left,
                top,
                (right - left).max(1),
                (bottom - top).max(1),
            );
            let block = Block::bordered()
                .border_style(Style::default().fg(colors.option_bg()));
            let inner = block.inner(rect);
            block.render(rect, buf);
            Paragraph::new(Span::styled(
                option.as_str(),
                Style::default().fg(colors.option_fg()),
            ))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
        }

        // Projectiles.
        for projectile in &game.projectiles {
            let x = Self::cell_x(field, projectile.x);
            let y = Self::cell_y(field, projectile.y);
            buf.set_string(x, y, "│", Style::default().fg(colors.projectile()));
        }

        // Rocket on the bottom row.
        let rocket_x = Self::cell_x(field, game.rocket_x);
        let rocket_y = field.y + field.height - 1;
        buf.set_string(
            rocket_x,
            rocket_y,
            "▲",
            Style::default().fg(colors.rocket()).add_modifier(Modifier::BOLD),
        );
    }
}

impl Widget for &GameArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(" Arcade ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.game.active {
            self.render_field(inner, buf);
        } else {
            self.render_idle(inner, buf);
        }
    }
}
