use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::app::PracticeState;
use crate::quiz;
use crate::ui::theme::Theme;

/// Practice test screen: one question with four options, or the results
/// summary once the last question is answered.
pub struct PracticeArea<'a> {
    pub state: &'a PracticeState,
    pub theme: &'a Theme,
}

impl<'a> PracticeArea<'a> {
    pub fn new(state: &'a PracticeState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    fn render_question(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let state = self.state;
        let question = &state.questions[state.index];

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(8)])
            .split(area);

        let prompt_block = Block::bordered()
            .title(" Question ")
            .border_style(Style::default().fg(colors.border()));
        let prompt_inner = prompt_block.inner(layout[0]);
        prompt_block.render(layout[0], buf);
        Paragraph::new(Span::styled(
            question.prompt.as_str(),
            Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
        ))
        .wrap(Wrap { trim: true })
        .render(prompt_inner, buf);

        let option_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(layout[1]);

        for (i, option) in question.options.iter().enumerate() {
            let is_selected = state.selected == Some(i);
            let border = if is_selected {
                colors.border_focused()
            } else {
                colors.border()
            };
            let block = Block::bordered()
                .title(format!(" {} ", i + 1))
                .border_style(Style::default().fg(border));
            let inner = block.inner(option_rows[i]);
            block.render(option_rows[i], buf);
            Paragraph::new(Span::styled(
                option.as_str(),
                Style::default()
                    .fg(if is_selected { colors.accent() } else { colors.fg() })
                    .add_modifier(if is_selected {
                        Modifier::BOLD
                    } else {
                        Modifier::empty()
                    }),
            ))
            .render(inner, buf);
        }
    }

    fn render_results(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let state = self.state;
        let score = quiz::score_test(&state.questions, &state.answers);

        let grade_color = if score.percentage >= 80 {
            colors.success()
        } else if score.percentage >= 50 {
            colors.warning()
        } else {
            colors.error()
        };

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Test complete",
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("{}%", score.percentage),
                Style::default().fg(grade_color).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("{} of {} correct", score.correct, score.total),
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "r: retake   Esc: back to sets",
                Style::default().fg(colors.dim()),
            )),
        ];

        let block = Block::bordered()
            .title(" Results ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}

impl Widget for &PracticeArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.state.show_results {
            self.render_results(area, buf);
        } else {
            self.render_question(area, buf);
        }
    }
}
