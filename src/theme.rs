use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const DATE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const TAGLINE_STYLE: Style = BASE_STYLE.fg(Color::Gray);

pub(crate) const YEAR_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const LEFT_STYLE: Style = BASE_STYLE.fg(Color::Gray);

pub(crate) const STATUS_STYLE: Style = BASE_STYLE.fg(Color::Gray);

pub(crate) const ACTIVE_TAB_STYLE: Style = BASE_STYLE.add_modifier(Modifier::REVERSED);

pub(crate) const INACTIVE_TAB_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub(crate) mod dots {
    use super::*;

    // Crimson
    pub(crate) const PAST_STYLE: Style = BASE_STYLE.fg(Color::Rgb(220, 20, 61));

    pub(crate) const CURRENT_STYLE: Style = BASE_STYLE.fg(Color::Green);

    pub(crate) const FUTURE_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    pub(crate) const SELECTED_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);
}

pub(crate) mod editor {
    use super::*;

    pub(crate) const PLACEHOLDER_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    pub(crate) const CURSOR_STYLE: Style = BASE_STYLE.add_modifier(Modifier::REVERSED);

    pub(crate) const HINT_STYLE: Style = BASE_STYLE.fg(Color::Gray);

    pub(crate) const TITLE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

    pub(crate) const BULLET_STYLE: Style = BASE_STYLE.fg(Color::Cyan);

    // Marker in front of the field being typed into
    pub(crate) const FOCUS_STYLE: Style = BASE_STYLE.fg(Color::Green);
}
