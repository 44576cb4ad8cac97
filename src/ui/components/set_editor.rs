use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::app::{EditorFocus, EditorState};
use crate::ui::theme::Theme;

/// Form for creating or editing a set: title, description, and one row per
/// card. The focused field is backed by the editor's live input; everything
/// else shows its committed value.
pub struct SetEditor<'a> {
    pub state: &'a EditorState,
    pub theme: &'a Theme,
}

impl<'a> SetEditor<'a> {
    pub fn new(state: &'a EditorState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    fn field_line(&self, committed: &str, focus: EditorFocus) -> Line<'_> {
        let colors = &self.theme.colors;
        if self.state.focus == focus {
            let (before, cursor, after) = self.state.input.render_parts();
            let mut spans = vec![Span::styled(
                before.to_string(),
                Style::default().fg(colors.fg()),
            )];
            match cursor {
                Some(ch) => spans.push(Span::styled(
                    ch.to_string(),
                    Style::default()
                        .fg(colors.input_cursor_fg())
                        .bg(colors.input_cursor_bg()),
                )),
                None => spans.push(Span::styled(
                    " ",
                    Style::default().bg(colors.input_cursor_bg()),
                )),
            }
            spans.push(Span::styled(
                after.to_string(),
                Style::default().fg(colors.fg()),
            ));
            Line::from(spans)
        } else if committed.is_empty() {
            Line::from(Span::styled("…", Style::default().fg(colors.dim())))
        } else {
            Line::from(Span::styled(
                committed.to_string(),
                Style::default().fg(colors.fg()),
            ))
        }
    }
}

impl Widget for &SetEditor<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let state = self.state;

        let title = if state.set_id.is_some() {
            " Edit set "
        } else {
            " New set "
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(1),
            ])
            .split(inner);

        let label = |text: &str, focused: bool| {
            Span::styled(
                text.to_string(),
                Style::default()
                    .fg(if focused { colors.accent() } else { colors.dim() })
                    .add_modifier(if focused {
                        Modifier::BOLD
                    } else {
                        Modifier::empty()
                    }),
            )
        };

        let mut title_line = vec![label("Title: ", state.focus == EditorFocus::Title)];
        title_line.extend(self.field_line(&state.title, EditorFocus::Title).spans);
        Paragraph::new(Line::from(title_line)).render(layout[0], buf);

        let mut desc_line = vec![label(
            "Description: ",
            state.focus == EditorFocus::Description,
        )];
        desc_line.extend(
            self.field_line(&state.description, EditorFocus::Description)
                .spans,
        );
        Paragraph::new(Line::from(desc_line)).render(layout[1], buf);

        if let Some(message) = &state.message {
            Paragraph::new(Span::styled(
                message.as_str(),
                Style::default().fg(colors.error()),
            ))
            .render(layout[2], buf);
        }

        // One line per card: "3. front │ back"
        let list_area = layout[3];
        let visible = list_area.height as usize;
        let focused_row = match state.focus {
            EditorFocus::Front(i) | EditorFocus::Back(i) => Some(i),
            _ => None,
        };
        let first = match focused_row {
            Some(i) if i >= state.scroll + visible => i + 1 - visible,
            Some(i) if i < state.scroll => i,
            _ => state.scroll,
        };

        for (row, (i, card)) in state
            .cards
            .iter()
            .enumerate()
            .skip(first)
            .take(visible)
            .enumerate()
        {
            let y = list_area.y + row as u16;
            let mut spans = vec![Span::styled(
                format!("{:>3}. ", i + 1),
                Style::default().fg(colors.dim()),
            )];
            spans.extend(self.field_line(&card.front, EditorFocus::Front(i)).spans);
            spans.push(Span::styled(" │ ", Style::default().fg(colors.border())));
            spans.extend(self.field_line(&card.back, EditorFocus::Back(i)).spans);

            Paragraph::new(Line::from(spans))
                .render(Rect::new(list_area.x, y, list_area.width, 1), buf);
        }
    }
}
