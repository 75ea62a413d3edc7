use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;

pub fn format_mm_ss(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Countdown bar; turns to warning below 10s and error below 5s.
pub struct TimerBar<'a> {
    remaining: u32,
    ratio: f64,
    theme: &'a Theme,
}

impl<'a> TimerBar<'a> {
    pub fn new(remaining: u32, ratio: f64, theme: &'a Theme) -> Self {
        Self {
            remaining,
            ratio: ratio.clamp(0.0, 1.0),
            theme,
        }
    }

    fn fill_color(&self) -> Color {
        let colors = &self.theme.colors;
        if self.remaining <= 5 {
            colors.error()
        } else if self.remaining <= 10 {
            colors.warning()
        } else {
            colors.bar_filled()
        }
    }
}

impl Widget for TimerBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let fill = self.fill_color();

        let block = Block::bordered()
            .title(format!(" Time {} ", format_mm_ss(self.remaining)))
            .border_style(Style::default().fg(fill));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let filled_width = (self.ratio * inner.width as f64).round() as u16;
        for x in inner.x..inner.x + inner.width {
            let style = if x < inner.x + filled_width {
                Style::default().bg(fill)
            } else {
                Style::default().bg(colors.bar_empty())
            };
            buf[(x, inner.y)].set_style(style);
        }
    }
}
