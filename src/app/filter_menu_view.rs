use ratatui::prelude::{Line, Span};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Style, Stylize},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState},
};

use crate::{
    constants::PALETTE,
    domain::{BrowseSession, format_header},
};

use super::{App, view_style};

impl App {
    pub(super) fn render_filter_menu(&self, f: &mut Frame, terminal_size: Rect, session: &BrowseSession) {
        let modal_rect = self.modal_rect(terminal_size, 1, 3);
        let filter = session.category_filter();

        let clear_item = {
            let label = Span::raw("Clear all").italic();
            if self.filter_cursor == 0 {
                ListItem::new(Line::from(label)).style(view_style::filled_style(Color::White))
            } else {
                ListItem::new(Line::from(label))
            }
        };

        let items: Vec<ListItem> = std::iter::once(clear_item)
            .chain(filter.options().iter().enumerate().map(|(i, option)| {
                let is_selected = i + 1 == self.filter_cursor;
                let checkbox = if filter.is_selected(option) {
                    "[x] "
                } else {
                    "[ ] "
                };
                let label = if option.is_empty() { "(blank)" } else { option.as_str() };
                let line = Line::from(vec![
                    Span::raw(checkbox).fg(PALETTE.accent),
                    Span::raw(label.to_string()),
                ]);

                if is_selected {
                    ListItem::new(line).style(view_style::filled_style(PALETTE.accent))
                } else {
                    ListItem::new(line)
                }
            }))
            .collect();

        let mut list_state = ListState::default();
        list_state.select(Some(self.filter_cursor));

        let title = format!("Filter by {}", format_header(filter.column()));
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title(Line::from(Span::styled(title, Style::default().fg(Color::White))))
                    .title_alignment(Alignment::Center)
                    .border_style(Style::default().fg(PALETTE.accent)),
            )
            .highlight_style(Style::default());

        f.render_widget(Clear, modal_rect);
        f.render_stateful_widget(list, modal_rect, &mut list_state);
    }
}
