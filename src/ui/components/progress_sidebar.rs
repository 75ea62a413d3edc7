use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;

pub struct ProgressSidebar<'a> {
    current: usize,
    total: usize,
    answered: usize,
    coins: u32,
    theme: &'a Theme,
}

impl<'a> ProgressSidebar<'a> {
    pub fn new(
        current: usize,
        total: usize,
        answered: usize,
        coins: u32,
        theme: &'a Theme,
    ) -> Self {
        Self {
            current,
            total,
            answered,
            coins,
            theme,
        }
    }
}

impl Widget for ProgressSidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let label = Style::default().fg(colors.text_dim());
        let value = Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD);

        let dots: String = (0..self.total)
            .map(|i| {
                if i < self.current {
                    '\u{25cf}'
                } else if i == self.current {
                    '\u{25c9}'
                } else {
                    '\u{25cb}'
                }
            })
            .collect();

        let lines = vec![
            Line::from(vec![
                Span::styled(" Question ", label),
                Span::styled(format!("{}/{}", self.current + 1, self.total), value),
            ]),
            Line::from(Span::styled(format!(" {dots}"), Style::default().fg(colors.accent()))),
            Line::from(""),
            Line::from(vec![
                Span::styled(" Answered ", label),
                Span::styled(self.answered.to_string(), value),
            ]),
            Line::from(vec![
                Span::styled(" Coins    ", label),
                Span::styled(
                    self.coins.to_string(),
                    Style::default().fg(colors.coin()).add_modifier(Modifier::BOLD),
                ),
            ]),
        ];

        let block = Block::bordered()
            .title(" Progress ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        Paragraph::new(lines).block(block).render(area, buf);
    }
}
