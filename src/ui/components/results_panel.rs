use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::quiz::results::{AnswerReview, ResultsSummary};
use crate::ui::theme::Theme;

pub struct ResultsPanel<'a> {
    summary: &'a ResultsSummary,
    user_name: &'a str,
    scroll: u16,
    theme: &'a Theme,
}

impl<'a> ResultsPanel<'a> {
    pub fn new(
        summary: &'a ResultsSummary,
        user_name: &'a str,
        scroll: u16,
        theme: &'a Theme,
    ) -> Self {
        Self {
            summary,
            user_name,
            scroll,
            theme,
        }
    }

    fn review_lines(&self, review: &AnswerReview) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        let (mark, mark_color) = if review.is_correct {
            ("\u{2713}", colors.success())
        } else {
            ("\u{2717}", colors.error())
        };

        let mut spans = vec![
            Span::styled(
                format!(" {mark} "),
                Style::default().fg(mark_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("Q{}  ", review.index + 1),
                Style::default().fg(colors.text_dim()),
            ),
        ];
        let last = review.fragments.len().saturating_sub(1);
        for (i, fragment) in review.fragments.iter().enumerate() {
            spans.push(Span::styled(fragment.clone(), Style::default().fg(colors.fg())));
            if i == last {
                break;
            }
            let matched = review.blank_matches.get(i).copied().unwrap_or(false);
            let word = review
                .selected
                .get(i)
                .and_then(|s| s.clone())
                .unwrap_or_else(|| "____".to_string());
            let color = if matched { colors.success() } else { colors.error() };
            spans.push(Span::styled(
                word,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ));
        }

        let mut lines = vec![Line::from(spans)];
        if !review.is_correct {
            lines.push(Line::from(Span::styled(
                format!("      answer: {}", review.correct.join(", ")),
                Style::default().fg(colors.text_dim()),
            )));
        }
        lines
    }
}

impl Widget for ResultsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let summary = self.summary;

        let block = Block::bordered()
            .title(" Quiz Complete ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(5),
                Constraint::Min(0),
            ])
            .split(inner);

        let mut title = format!("Well done, {}!", self.user_name);
        if self.user_name.is_empty() {
            title = "Results".to_string();
        }
        Paragraph::new(Line::from(Span::styled(
            title,
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        let label = Style::default().fg(colors.fg());
        let value = Style::default()
            .fg(colors.accent())
            .add_modifier(Modifier::BOLD);
        let time_text = match summary.elapsed_secs() {
            Some(secs) => format!("{}m {:02}s", secs / 60, secs % 60),
            None => "--".to_string(),
        };
        let stats = vec![
            Line::from(vec![
                Span::styled("  Score:    ", label),
                Span::styled(
                    format!(
                        "{}/{} ({}%)",
                        summary.correct_count, summary.attempted_count, summary.score_percentage
                    ),
                    value,
                ),
                Span::styled(
                    format!("  {}", summary.grade.label()),
                    Style::default().fg(colors.text_dim()),
                ),
            ]),
            Line::from(vec![
                Span::styled("  Coins:    ", label),
                Span::styled(
                    format!("{}", summary.total_coins),
                    Style::default().fg(colors.coin()).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("  Blanks:   ", label),
                Span::styled(
                    format!(
                        "{}/{} ({:.1}%)",
                        summary.correct_blanks, summary.total_blanks, summary.blank_accuracy
                    ),
                    value,
                ),
            ]),
            Line::from(vec![
                Span::styled("  Answered: ", label),
                Span::styled(
                    format!("{} of {}", summary.attempted_count, summary.total_questions),
                    value,
                ),
            ]),
            Line::from(vec![
                Span::styled("  Time:     ", label),
                Span::styled(time_text, value),
            ]),
        ];
        Paragraph::new(stats).render(layout[1], buf);

        let review_lines: Vec<Line> = if summary.reviews.is_empty() {
            vec![Line::from(Span::styled(
                "  No questions answered.",
                Style::default().fg(colors.text_dim()),
            ))]
        } else {
            summary
                .reviews
                .iter()
                .flat_map(|r| self.review_lines(r))
                .collect()
        };

        let review_block = Block::bordered()
            .title(" Review ")
            .border_style(Style::default().fg(colors.border()));
        Paragraph::new(review_lines)
            .block(review_block)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .render(layout[2], buf);
    }
}
