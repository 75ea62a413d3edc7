use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

const HOW_TO_PLAY: [&str; 4] = [
    "Each sentence has one or more blanks.",
    "Press a number to drop that word into the next empty blank.",
    "Fill every blank and press Enter before the timer runs out.",
    "Each fully correct sentence earns a coin.",
];

pub struct Welcome<'a> {
    name: &'a LineInput,
    question_count: usize,
    timer_secs: u32,
    resuming: bool,
    theme: &'a Theme,
}

impl<'a> Welcome<'a> {
    pub fn new(
        name: &'a LineInput,
        question_count: usize,
        timer_secs: u32,
        resuming: bool,
        theme: &'a Theme,
    ) -> Self {
        Self {
            name,
            question_count,
            timer_secs,
            resuming,
            theme,
        }
    }
}

impl Widget for Welcome<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(HOW_TO_PLAY.len() as u16 + 3),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(inner);

        let subtitle = format!(
            "{} sentences, {} seconds each",
            self.question_count, self.timer_secs
        );
        Paragraph::new(vec![
            Line::from(Span::styled(
                "clozer",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(subtitle, Style::default().fg(colors.text_dim()))),
        ])
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        let mut rules = vec![Line::from(Span::styled(
            "How to play",
            Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
        ))];
        for rule in HOW_TO_PLAY {
            rules.push(Line::from(vec![
                Span::styled("  \u{2022} ", Style::default().fg(colors.accent())),
                Span::styled(rule, Style::default().fg(colors.fg())),
            ]));
        }
        if self.resuming {
            rules.push(Line::from(""));
            rules.push(Line::from(Span::styled(
                "A saved quiz was found and will resume where you left off.",
                Style::default().fg(colors.warning()),
            )));
        }
        Paragraph::new(rules).render(layout[1], buf);

        let (before, cursor_ch, after) = self.name.render_parts();
        let cursor_style = Style::default()
            .fg(colors.bg())
            .bg(colors.fg());
        let mut input_spans = vec![
            Span::styled("Your name: ", Style::default().fg(colors.fg())),
            Span::styled(before.to_string(), Style::default().fg(colors.accent())),
        ];
        match cursor_ch {
            Some(ch) => input_spans.push(Span::styled(ch.to_string(), cursor_style)),
            None => input_spans.push(Span::styled(" ", cursor_style)),
        }
        input_spans.push(Span::styled(after.to_string(), Style::default().fg(colors.accent())));

        let input_block = Block::bordered().border_style(Style::default().fg(colors.border()));
        Paragraph::new(Line::from(input_spans))
            .block(input_block)
            .render(layout[2], buf);
    }
}
