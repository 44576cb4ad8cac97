use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::model::Flashcard;
use crate::ui::layout::centered_rect;
use crate::ui::theme::Theme;

/// One big flippable card. Shows the front until flipped, then the back.
pub struct StudyCard<'a> {
    pub card: &'a Flashcard,
    pub flipped: bool,
    pub theme: &'a Theme,
}

impl<'a> StudyCard<'a> {
    pub fn new(card: &'a Flashcard, flipped: bool, theme: &'a Theme) -> Self {
        Self {
            card,
            flipped,
            theme,
        }
    }
}

impl Widget for &StudyCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let card_area = centered_rect(60, 50, area);
        let (side, text) = if self.flipped {
            ("definition", self.card.back.as_str())
        } else {
            ("term", self.card.front.as_str())
        };

        let block = Block::bordered()
            .title(format!(" {side} "))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.card_bg()));
        let inner = block.inner(card_area);
        block.render(card_area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(inner);

        let content = Paragraph::new(Span::styled(
            text,
            Style::default()
                .fg(colors.card_fg())
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        content.render(layout[0], buf);

        let hint = Paragraph::new(Line::from(Span::styled(
            "Space: flip",
            Style::default().fg(colors.dim()),
        )))
        .alignment(Alignment::Center);
        hint.render(layout[1], buf);
    }
}
