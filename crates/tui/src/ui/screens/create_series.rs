use api_types::contract::Contract;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Span,
    widgets::Paragraph,
};

use crate::{
    app::{AppState, CreateSeriesField},
    ui::{components::card::Card, components::field, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, contract: &Contract) {
    let theme = Theme::default();
    let card = Card::new("create series", &theme).focused(true);
    let inner = card.inner(area);
    card.render_frame(frame, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Name
            Constraint::Length(1), // Private key
            Constraint::Length(1), // Contract (read-only)
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Message
        ])
        .margin(1)
        .split(inner);

    let form = &state.create_series;

    field::render(
        frame,
        rows[0],
        "Name",
        &form.name,
        false,
        form.focus == CreateSeriesField::Name,
        &theme,
    );
    field::render(
        frame,
        rows[1],
        "Private key",
        &form.private_key,
        true,
        form.focus == CreateSeriesField::PrivateKey,
        &theme,
    );
    field::render_static(frame, rows[2], "Contract", &contract.address, &theme);

    if let Some(message) = &form.message {
        frame.render_widget(
            Paragraph::new(Span::styled(
                message.as_str(),
                Style::default().fg(theme.error),
            )),
            rows[4],
        );
    }
}
