use ratatui::{
    prelude::Span,
    style::{Color, Modifier, Style},
};

use crate::constants::PALETTE;

pub(super) fn text_color_for_bg(bg_color: Color) -> Color {
    if let Color::Rgb(r, g, b) = bg_color {
        let brightness = (299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000;
        if brightness > 128 {
            Color::Black
        } else {
            Color::White
        }
    } else {
        Color::White
    }
}

pub(super) fn header_style(selected: bool) -> Style {
    let style = Style::default()
        .fg(PALETTE.header_fg)
        .bg(PALETTE.header_bg)
        .add_modifier(Modifier::BOLD);
    if selected {
        style.add_modifier(Modifier::UNDERLINED).fg(PALETTE.accent)
    } else {
        style
    }
}

pub(super) fn filled_style(bg: Color) -> Style {
    Style::default().bg(bg).fg(text_color_for_bg(bg))
}

pub(super) fn badge_span(count: usize) -> Span<'static> {
    Span::styled(
        format!(" {} ", count),
        filled_style(PALETTE.badge_bg).add_modifier(Modifier::BOLD),
    )
}

pub(super) fn input_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(PALETTE.accent)
    } else {
        Style::default().fg(Color::Gray)
    }
}
