use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::ui::theme::Theme;

const EMPTY_SLOT: &str = "________";

#[derive(Clone, Debug, PartialEq, Eq)]
enum TokenKind {
    Fixed,
    Filled { blank: usize },
    Empty { blank: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct SentenceToken {
    text: String,
    kind: TokenKind,
}

/// Interleave fixed fragments with one token per blank.
fn build_tokens(fragments: &[&str], selected: &[Option<String>]) -> Vec<SentenceToken> {
    let mut tokens = Vec::new();
    for (i, fragment) in fragments.iter().enumerate() {
        if !fragment.is_empty() {
            tokens.push(SentenceToken {
                text: fragment.to_string(),
                kind: TokenKind::Fixed,
            });
        }
        if i + 1 == fragments.len() {
            break;
        }
        tokens.push(match selected.get(i).and_then(|s| s.as_deref()) {
            Some(word) => SentenceToken {
                text: format!(" {word} "),
                kind: TokenKind::Filled { blank: i },
            },
            None => SentenceToken {
                text: EMPTY_SLOT.to_string(),
                kind: TokenKind::Empty { blank: i },
            },
        });
    }
    tokens
}

/// The current sentence with its blanks; the blank under `cursor` is
/// highlighted so it can be cleared.
pub struct SentenceArea<'a> {
    fragments: &'a [&'a str],
    selected: &'a [Option<String>],
    cursor: Option<usize>,
    title: String,
    theme: &'a Theme,
}

impl<'a> SentenceArea<'a> {
    pub fn new(
        fragments: &'a [&'a str],
        selected: &'a [Option<String>],
        cursor: Option<usize>,
        title: String,
        theme: &'a Theme,
    ) -> Self {
        Self {
            fragments,
            selected,
            cursor,
            title,
            theme,
        }
    }
}

impl Widget for SentenceArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let spans: Vec<Span> = build_tokens(self.fragments, self.selected)
            .into_iter()
            .map(|token| {
                let under_cursor = |blank: usize| self.cursor == Some(blank);
                let style = match token.kind {
                    TokenKind::Fixed => Style::default().fg(colors.fg()),
                    TokenKind::Filled { blank } => {
                        let style = Style::default()
                            .fg(colors.blank_filled_fg())
                            .bg(colors.blank_filled_bg())
                            .add_modifier(Modifier::BOLD);
                        if under_cursor(blank) {
                            style.bg(colors.blank_cursor_bg()).add_modifier(Modifier::UNDERLINED)
                        } else {
                            style
                        }
                    }
                    TokenKind::Empty { blank } => {
                        let style = Style::default().fg(colors.blank_empty());
                        if under_cursor(blank) {
                            style.bg(colors.blank_cursor_bg())
                        } else {
                            style
                        }
                    }
                };
                Span::styled(token.text, style)
            })
            .collect();

        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(vec![Line::from(""), Line::from(spans)])
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
