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

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let card = Card::new("contracts", &theme).focused(true);
    let inner = card.inner(area);
    card.render_frame(frame, area);

    let list = &state.contracts;

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
                "No contracts found",
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
        .map(|(idx, contract)| {
            let selected = idx == list.selected;
            let marker = if selected { "▸ " } else { "  " };
            let name_style = if selected {
                Style::default().fg(theme.accent)
            } else {
                Style::default().fg(theme.text)
            };
            Line::from(vec![
                Span::styled(marker, Style::default().fg(theme.accent)),
                Span::styled(contract.name.clone(), name_style),
                Span::styled(
                    format!("  {}", contract.address),
                    Style::default().fg(theme.text_muted),
                ),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}
