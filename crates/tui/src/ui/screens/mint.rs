use api_types::series::Series;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::{AppState, MintField},
    mint::MintOutcome,
    ui::{components::card::Card, components::field, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, series: &Series) {
    let theme = Theme::default();
    let title = format!("mint an NFT on {}", series.name);
    let card = Card::new(&title, &theme).focused(true);
    let inner = card.inner(area);
    card.render_frame(frame, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Name
            Constraint::Length(1), // Owner address
            Constraint::Length(1), // Image path
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Message
            Constraint::Min(0),    // Outcome
        ])
        .margin(1)
        .split(inner);

    let form = &state.mint;

    field::render(
        frame,
        rows[0],
        "Name",
        &form.name,
        false,
        form.focus == MintField::Name,
        &theme,
    );
    field::render(
        frame,
        rows[1],
        "Address",
        &form.owner,
        false,
        form.focus == MintField::Owner,
        &theme,
    );
    field::render(
        frame,
        rows[2],
        "Image file",
        &form.image_path,
        false,
        form.focus == MintField::ImagePath,
        &theme,
    );

    if let Some(message) = &form.message {
        frame.render_widget(
            Paragraph::new(Span::styled(
                message.as_str(),
                Style::default().fg(theme.error),
            )),
            rows[4],
        );
    }

    if let Some(outcome) = &form.outcome {
        render_outcome(frame, rows[5], outcome, &theme);
    }
}

fn render_outcome(frame: &mut Frame<'_>, area: Rect, outcome: &MintOutcome, theme: &Theme) {
    let line = match outcome {
        MintOutcome::Minted { code } => Line::from(vec![
            Span::styled("Redemption code: ", Style::default().fg(theme.text_muted)),
            Span::styled(
                code.clone(),
                Style::default()
                    .fg(theme.positive)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        MintOutcome::Aborted { .. } => Line::from(Span::styled(
            outcome.summary(),
            Style::default().fg(theme.error),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}
