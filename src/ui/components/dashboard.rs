use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::model::FlashcardSet;
use crate::ui::theme::Theme;

/// Scrollable list of the user's sets with a selection cursor.
pub struct Dashboard<'a> {
    pub sets: &'a [FlashcardSet],
    pub selected: usize,
    pub confirm_delete: bool,
    pub theme: &'a Theme,
}

impl<'a> Dashboard<'a> {
    pub fn new(
        sets: &'a [FlashcardSet],
        selected: usize,
        confirm_delete: bool,
        theme: &'a Theme,
    ) -> Self {
        Self {
            sets,
            selected,
            confirm_delete,
            theme,
        }
    }
}

impl Widget for &Dashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Your sets ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.sets.is_empty() {
            let p = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "No sets yet",
                    Style::default().fg(colors.fg()),
                )),
                Line::from(Span::styled(
                    "Press n to create your first flashcard set",
                    Style::default().fg(colors.dim()),
                )),
            ])
            .alignment(Alignment::Center);
            p.render(inner, buf);
            return;
        }

        let rows_per_set = 2u16;
        let visible = (inner.height / rows_per_set) as usize;
        // Keep the selection in view.
        let first = if self.selected >= visible {
            self.selected + 1 - visible
        } else {
            0
        };

        for (row, (i, set)) in self
            .sets
            .iter()
            .enumerate()
            .skip(first)
            .take(visible)
            .enumerate()
        {
            let y = inner.y + row as u16 * rows_per_set;
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };

            let title_style = Style::default()
                .fg(if is_selected {
                    colors.accent()
                } else {
                    colors.fg()
                })
                .add_modifier(if is_selected {
                    Modifier::BOLD
                } else {
                    Modifier::empty()
                });

            let title_line = if is_selected && self.confirm_delete {
                Line::from(vec![
                    Span::styled(format!(" {indicator} {} ", set.title), title_style),
                    Span::styled(
                        "delete? (y/n)",
                        Style::default().fg(colors.error()).add_modifier(Modifier::BOLD),
                    ),
                ])
            } else {
                Line::from(Span::styled(
                    format!(" {indicator} {}", set.title),
                    title_style,
                ))
            };

            let description = set.description.as_deref().unwrap_or("");
            let meta = format!(
                "     {}{}",
                description,
                if description.is_empty() {
                    set.created_at.format("created %Y-%m-%d").to_string()
                } else {
                    String::new()
                }
            );

            let p = Paragraph::new(vec![
                title_line,
                Line::from(Span::styled(meta, Style::default().fg(colors.dim()))),
            ]);
            p.render(Rect::new(inner.x, y, inner.width, rows_per_set.min(inner.height - (y - inner.y))), buf);
        }
    }
}
