use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::ui::theme::Theme;

/// Numbered word choices. Words already placed in a blank are dimmed and
/// struck through.
pub struct WordOptions<'a> {
    options: &'a [&'a str],
    used: &'a [bool],
    theme: &'a Theme,
}

impl<'a> WordOptions<'a> {
    pub fn new(options: &'a [&'a str], used: &'a [bool], theme: &'a Theme) -> Self {
        Self {
            options,
            used,
            theme,
        }
    }
}

impl Widget for WordOptions<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let mut spans: Vec<Span> = Vec::new();
        for (i, word) in self.options.iter().enumerate().take(9) {
            let used = self.used.get(i).copied().unwrap_or(false);
            let (key_style, word_style) = if used {
                let dim = Style::default().fg(colors.option_used());
                (dim, dim.add_modifier(Modifier::CROSSED_OUT))
            } else {
                (
                    Style::default()
                        .fg(colors.option_key())
                        .add_modifier(Modifier::BOLD),
                    Style::default().fg(colors.fg()),
                )
            };
            spans.push(Span::styled(format!(" [{}] ", i + 1), key_style));
            spans.push(Span::styled(word.to_string(), word_style));
            spans.push(Span::raw("  "));
        }

        let block = Block::bordered()
            .title(" Words ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(Line::from(spans))
            .block(block)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
