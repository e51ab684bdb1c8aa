use api_types::contract::Contract;
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::AppState,
    ui::{components::card::Card, theme::Theme},
};

/// Series list for the selected contract.
pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, contract: &Contract) {
    let theme = Theme::default();
    let title = format!("series for {}", contract.name);
    let card = Card::new(&title, &theme).focused(true);
    let inner = card.inner(area);
    card.render_frame(frame, area);

    let list = &state.series;

    if let Some(error) = &list.error {
        frame.render_widget(
            Paragraph::new(Span::styled(
                error.as_str(),
                Style::default().fg(theme.error),
            )),
            inner,
        );
        return;
    }

    if list.items.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "No series found",
                Style::default().fg(theme.text_muted),
            )),
            inner,
        );
        return;
    }

    let lines: Vec<Line> = list
        .items
        .iter()
        .enumerate()
        .map(|(idx, series)| {
            let selected = idx == list.selected;
            let marker = if selected { "▸ " } else { "  " };
            let style = if selected {
                Style::default().fg(theme.accent)
            } else {
                Style::default().fg(theme.text)
            };
            Line::from(vec![
                Span::styled(marker, Style::default().fg(theme.accent)),
                Span::styled(series.name.clone(), style),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}
