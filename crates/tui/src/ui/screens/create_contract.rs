use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::{AppState, CreateContractField},
    ui::{components::card::Card, components::field, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let card = Card::new("create contract", &theme).focused(true);
    let inner = card.inner(area);
    card.render_frame(frame, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Name
            Constraint::Length(1), // Symbol
            Constraint::Length(1), // Network
            Constraint::Length(1), // Private key
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Message
        ])
        .margin(1)
        .split(inner);

    let form = &state.create_contract;

    field::render(
        frame,
        rows[0],
        "Name",
        &form.name,
        false,
        form.focus == CreateContractField::Name,
        &theme,
    );
    field::render(
        frame,
        rows[1],
        "Symbol",
        &form.symbol,
        false,
        form.focus == CreateContractField::Symbol,
        &theme,
    );
    render_network_selector(frame, rows[2], state, &theme);
    field::render(
        frame,
        rows[3],
        "Private key",
        &form.private_key,
        true,
        form.focus == CreateContractField::PrivateKey,
        &theme,
    );

    if let Some(message) = &form.message {
        frame.render_widget(
            Paragraph::new(Span::styled(
                message.as_str(),
                Style::default().fg(theme.error),
            )),
            rows[5],
        );
    }
}

fn render_network_selector(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let form = &state.create_contract;
    let focused = form.focus == CreateContractField::Network;

    let value = match form.networks.get(form.network_selected) {
        Some(network) => format!("{} ({})", network.name, network.network_id),
        None => "no networks loaded".to_string(),
    };
    let hint = if focused { "  ↑/↓" } else { "" };

    let value_style = if focused {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.text)
    };

    let line = Line::from(vec![
        Span::styled(
            format!("{:<width$}", "Network", width = field::LABEL_WIDTH),
            Style::default().fg(theme.text_muted),
        ),
        Span::styled(value, value_style),
        Span::styled(hint, Style::default().fg(theme.text_muted)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use api_types::network::Network;
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::session::SessionStore;

    fn state_in(dir: &tempfile::TempDir) -> AppState {
        let path = dir.path().join("state.json").to_string_lossy().into_owned();
        AppState {
            session: SessionStore::load(&path),
            login: Default::default(),
            contracts: Default::default(),
            series: Default::default(),
            create_contract: Default::default(),
            create_series: Default::default(),
            mint: Default::default(),
            toast: None,
            last_refresh: None,
        }
    }

    #[test]
    fn network_selector_aligns_with_the_other_form_rows() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(&dir);
        state.create_contract.networks = vec![Network {
            id: 2,
            name: "Mainnet".to_string(),
            network_id: 1,
        }];

        let theme = Theme::default();
        let mut terminal = Terminal::new(TestBackend::new(40, 2)).unwrap();
        terminal
            .draw(|frame| {
                field::render(
                    frame,
                    Rect::new(0, 0, 40, 1),
                    "Name",
                    "Gallery",
                    false,
                    false,
                    &theme,
                );
                render_network_selector(frame, Rect::new(0, 1, 40, 1), &state, &theme);
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let column = field::LABEL_WIDTH as u16;
        let value_start = |y: u16| buffer.cell((column, y)).unwrap().symbol().to_string();
        assert_eq!(value_start(0), "G");
        assert_eq!(value_start(1), "M");
    }
}
