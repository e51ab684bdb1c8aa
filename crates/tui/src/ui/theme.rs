use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub text: Color,
    pub text_muted: Color,
    pub accent: Color,
    pub positive: Color,
    pub error: Color,
    pub border: Color,
    pub border_focused: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text: Color::Rgb(225, 225, 230),
            text_muted: Color::Rgb(130, 135, 145),
            accent: Color::Rgb(120, 170, 255),
            positive: Color::Rgb(110, 200, 140),
            error: Color::Rgb(220, 95, 95),
            border: Color::Rgb(60, 66, 80),
            border_focused: Color::Rgb(120, 170, 255),
        }
    }
}
