pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{app::AppState, session::View};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let area = frame.area();

    if state.session.view() == &View::Login {
        screens::login::render(frame, area, state);
        components::toast::render(frame, area, state.toast.as_ref());
        return;
    }

    render_shell(frame, area, state);
}

fn render_shell(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();

    // Main layout: info bar, content, bottom bar.
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);

    match state.session.view() {
        View::Login => {}
        View::Contracts => screens::contracts::render(frame, layout[1], state),
        View::Contract { contract } => screens::contract::render(frame, layout[1], state, contract),
        View::CreateContract => screens::create_contract::render(frame, layout[1], state),
        View::CreateSeries { contract } => {
            screens::create_series::render(frame, layout[1], state, contract);
        }
        View::Mint { series, .. } => screens::mint::render(frame, layout[1], state, series),
    }

    render_bottom_bar(frame, layout[2], state, &theme);
    components::toast::render(frame, area, state.toast.as_ref());
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let user = state.login.username.as_str();
    let contract = state
        .session
        .contract()
        .map(|c| c.name.as_str())
        .unwrap_or("-");
    let series = state
        .session
        .series()
        .map(|s| s.name.as_str())
        .unwrap_or("-");
    let refresh = state
        .last_refresh
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());

    let (status, status_style) = if state.session.busy() {
        ("WAIT", Style::default().fg(theme.error))
    } else {
        ("OK", Style::default().fg(theme.positive))
    };

    let line = Line::from(vec![
        Span::styled("User", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {user}  ")),
        Span::styled("Contract", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {contract}  ")),
        Span::styled("Series", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {series}  ")),
        Span::styled("Refresh", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {refresh}  ")),
        Span::styled(status, status_style),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut parts = context_hints(state, theme);

    parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
    parts.push(Span::styled("Ctrl+C", Style::default().fg(theme.accent)));
    parts.push(Span::raw(" quit"));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

/// Context-specific keyboard hints for the current screen.
fn context_hints(state: &AppState, theme: &Theme) -> Vec<Span<'static>> {
    let accent = Style::default().fg(theme.accent);
    match state.session.view() {
        View::Login => Vec::new(),
        View::Contracts => vec![
            Span::styled("↑/↓", accent),
            Span::raw(" select  "),
            Span::styled("Enter", accent),
            Span::raw(" use  "),
            Span::styled("c", accent),
            Span::raw(" create contract  "),
            Span::styled("r", accent),
            Span::raw(" refresh  "),
            Span::styled("q", accent),
            Span::raw(" quit"),
        ],
        View::Contract { .. } => vec![
            Span::styled("↑/↓", accent),
            Span::raw(" select  "),
            Span::styled("Enter", accent),
            Span::raw(" mint  "),
            Span::styled("c", accent),
            Span::raw(" create series  "),
            Span::styled("r", accent),
            Span::raw(" refresh  "),
            Span::styled("Esc", accent),
            Span::raw(" back"),
        ],
        View::CreateContract => vec![
            Span::styled("Tab", accent),
            Span::raw(" next field  "),
            Span::styled("↑/↓", accent),
            Span::raw(" network  "),
            Span::styled("Enter", accent),
            Span::raw(" create  "),
            Span::styled("Esc", accent),
            Span::raw(" back"),
        ],
        View::CreateSeries { .. } => vec![
            Span::styled("Tab", accent),
            Span::raw(" next field  "),
            Span::styled("Enter", accent),
            Span::raw(" create  "),
            Span::styled("Esc", accent),
            Span::raw(" back"),
        ],
        View::Mint { .. } => vec![
            Span::styled("Tab", accent),
            Span::raw(" next field  "),
            Span::styled("Enter", accent),
            Span::raw(" mint  "),
            Span::styled("Esc", accent),
            Span::raw(" back"),
        ],
    }
}
