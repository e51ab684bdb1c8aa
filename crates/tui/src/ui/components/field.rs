use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::ui::theme::Theme;

/// Label column width shared by every form row, including rows rendered
/// outside this module (the network selector).
pub const LABEL_WIDTH: usize = 14;

/// A single-line labeled input. The focused field shows a cursor bar and the
/// accent color; password-style fields are masked with bullets.
pub fn render(
    frame: &mut Frame<'_>,
    area: Rect,
    label: &str,
    value: &str,
    masked: bool,
    focused: bool,
    theme: &Theme,
) {
    let cursor = if focused { "│" } else { "" };
    let shown = if masked {
        "•".repeat(value.chars().count())
    } else {
        value.to_string()
    };

    let value_style = if focused {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.text)
    };

    let line = Line::from(vec![
        Span::styled(
            format!("{label:<width$}", width = LABEL_WIDTH),
            Style::default().fg(theme.text_muted),
        ),
        Span::styled(format!("{shown}{cursor}"), value_style),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// A read-only line in the same column layout as [`render`].
pub fn render_static(frame: &mut Frame<'_>, area: Rect, label: &str, value: &str, theme: &Theme) {
    let line = Line::from(vec![
        Span::styled(
            format!("{label:<width$}", width = LABEL_WIDTH),
            Style::default().fg(theme.text_muted),
        ),
        Span::styled(value.to_string(), Style::default().fg(theme.text_muted)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
