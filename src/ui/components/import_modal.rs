use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

use crate::app::ImportState;
use crate::ui::layout::centered_rect;
use crate::ui::theme::Theme;

/// Paste-and-preview popup over the set editor. The pasted text is shown
/// verbatim; the preview panel reflects what the current delimiter choice
/// would produce.
pub struct ImportModal<'a> {
    pub state: &'a ImportState,
    pub theme: &'a Theme,
}

impl<'a> ImportModal<'a> {
    pub fn new(state: &'a ImportState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }
}

impl Widget for &ImportModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let state = self.state;

        let popup = centered_rect(70, 80, area);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(" Import flashcards ")
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(popup);
        block.render(popup, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(4),
                Constraint::Length(1),
            ])
            .split(inner);

        let delimiters = Line::from(vec![
            Span::styled("Between term and definition: ", Style::default().fg(colors.dim())),
            Span::styled(
                state.term.label(),
                Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
            ),
            Span::styled("   Between cards: ", Style::default().fg(colors.dim())),
            Span::styled(
                state.card_delim.label(),
                Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
            ),
        ]);
        Paragraph::new(delimiters).render(layout[0], buf);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(layout[1]);

        let raw_block = Block::bordered()
            .title(" Pasted text ")
            .border_style(Style::default().fg(colors.border()));
        let raw_inner = raw_block.inner(columns[0]);
        raw_block.render(columns[0], buf);
        let raw_display = if state.raw.is_empty() {
            Span::styled(
                "Type or paste your cards here",
                Style::default().fg(colors.dim()),
            )
        } else {
            Span::styled(state.raw.as_str(), Style::default().fg(colors.fg()))
        };
        Paragraph::new(raw_display)
            .wrap(Wrap { trim: false })
            .render(raw_inner, buf);

        let preview = state.preview();
        let preview_block = Block::bordered()
            .title(format!(" Preview ({} cards) ", preview.len()))
            .border_style(Style::default().fg(colors.border()));
        let preview_inner = preview_block.inner(columns[1]);
        preview_block.render(columns[1], buf);
        let preview_lines: Vec<Line> = preview
            .iter()
            .take(preview_inner.height as usize)
            .map(|card| {
                Line::from(vec![
                    Span::styled(card.front.clone(), Style::default().fg(colors.fg())),
                    Span::styled(" → ", Style::default().fg(colors.dim())),
                    Span::styled(card.back.clone(), Style::default().fg(colors.accent())),
                ])
            })
            .collect();
        Paragraph::new(preview_lines).render(preview_inner, buf);

        let hints = Paragraph::new(Span::styled(
            "Ctrl+T: term delimiter   Ctrl+B: card delimiter   Ctrl+S: import   Esc: cancel",
            Style::default().fg(colors.dim()),
        ));
        hints.render(layout[2], buf);
    }
}
