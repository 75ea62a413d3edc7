use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

use crate::notify::{Toast, ToastKind};
use crate::ui::theme::Theme;

const TOAST_WIDTH: u16 = 40;

/// Stack of toasts in the top-right corner, newest last.
pub struct ToastStack<'a> {
    toasts: Vec<&'a Toast>,
    theme: &'a Theme,
}

impl<'a> ToastStack<'a> {
    pub fn new(toasts: impl Iterator<Item = &'a Toast>, theme: &'a Theme) -> Self {
        Self {
            toasts: toasts.collect(),
            theme,
        }
    }
}

fn toast_height(toast: &Toast) -> u16 {
    if toast.detail.is_some() { 4 } else { 3 }
}

impl Widget for ToastStack<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let width = TOAST_WIDTH.min(area.width);
        let x = area.x + area.width.saturating_sub(width + 1);
        let mut y = area.y + 1;

        for toast in self.toasts {
            let height = toast_height(toast);
            if y + height > area.y + area.height {
                break;
            }
            let rect = Rect::new(x, y, width, height);
            let accent = match toast.kind {
                ToastKind::Info => colors.accent(),
                ToastKind::Success => colors.success(),
                ToastKind::Error => colors.error(),
            };

            let mut lines = vec![Line::from(Span::styled(
                toast.title.clone(),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ))];
            if let Some(detail) = &toast.detail {
                lines.push(Line::from(Span::styled(
                    detail.clone(),
                    Style::default().fg(colors.fg()),
                )));
            }

            Clear.render(rect, buf);
            Paragraph::new(lines)
                .block(
                    Block::bordered()
                        .border_style(Style::default().fg(accent))
                        .style(Style::default().bg(colors.bg())),
                )
                .wrap(Wrap { trim: true })
                .render(rect, buf);
            y += height;
        }
    }
}
