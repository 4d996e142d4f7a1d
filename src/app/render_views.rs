use ratatui::prelude::{Line, Span};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::{
    constants::{PALETTE, TABLE_TITLE},
    domain::format_header,
};

use super::{App, DataState, UiMode, view_style};

impl App {
    pub(super) fn draw_frame(&self, f: &mut Frame) {
        let size = f.size();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(size);

        self.render_top_bar(f, chunks[0]);

        match &self.data {
            DataState::Loading(_) => render_message(f, chunks[1], "Loading..."),
            DataState::Ready { session, .. } => {
                if session.working_set().is_empty() {
                    render_message(f, chunks[1], "No matching formulas");
                } else {
                    self.render_table(f, chunks[1], session);
                }
            }
        }

        self.render_footer(f, chunks[2]);

        if self.ui_mode == UiMode::FilterMenu {
            if let Some(session) = self.session() {
                self.render_filter_menu(f, size, session);
            }
        }
    }

    fn render_top_bar(&self, f: &mut Frame, area: Rect) {
        let searching = self.ui_mode == UiMode::Search;
        let query = self.session().map_or("", |session| session.search_query());
        let cursor = if searching { "_" } else { "" };
        let placeholder = if query.is_empty() && !searching {
            "Search..."
        } else {
            ""
        };

        let mut spans = vec![
            Span::styled("/ ", view_style::input_style(searching)),
            Span::styled(
                format!("{}{}{}", query, cursor, placeholder),
                view_style::input_style(searching),
            ),
            Span::raw("   "),
        ];

        if let Some(session) = self.session() {
            let filter = session.category_filter();
            spans.push(Span::styled(
                format!("f Filter by {}", format_header(filter.column())),
                Style::default().fg(Color::White),
            ));
            if filter.is_active() {
                spans.push(Span::raw(" "));
                spans.push(view_style::badge_span(filter.selected_count()));
            }
        }

        let status = match &self.data {
            DataState::Ready { loaded_at, .. } => {
                format!("loaded {}", loaded_at.format("%H:%M:%S"))
            }
            DataState::Loading(_) => "loading".to_string(),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(
                Line::from(Span::styled(
                    TABLE_TITLE,
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ))
                .alignment(Alignment::Left),
            )
            .title(
                Line::from(Span::styled(status, Style::default().fg(Color::Gray)))
                    .alignment(Alignment::Right),
            )
            .border_style(Style::default().fg(PALETTE.header_bg));

        f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
    }

    fn render_footer(&self, f: &mut Frame, area: Rect) {
        let hints = match self.ui_mode {
            UiMode::Table => {
                "↑↓ move  ⏎ expand  ←→ column  s sort  / search  f filter  c clear  q quit"
            }
            UiMode::Search => "type to search  ⏎ done  esc clear",
            UiMode::FilterMenu => "↑↓ move  space toggle  c clear all  esc close",
        };

        let line = Line::from(vec![
            Span::styled(hints, Style::default().fg(Color::Gray)),
            Span::raw("  "),
            Span::styled(
                self.dataset_path.display().to_string(),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        f.render_widget(Paragraph::new(line), area);
    }
}

fn render_message(f: &mut Frame, area: Rect, message: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);
    let paragraph = Paragraph::new(message)
        .alignment(Alignment::Center)
        .block(block);
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};

    use super::super::tests::ready_app;
    use super::*;

    fn render_to_text(app: &App) -> String {
        let backend = TestBackend::new(100, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| app.draw_frame(f)).unwrap();

        let buffer = terminal.backend().buffer().clone();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer.get(x, y).symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_loading_state_renders_placeholder() {
        let mut app = ready_app();
        app.data = DataState::Loading(None);
        let text = render_to_text(&app);
        assert!(text.contains("Loading..."));
        assert!(text.contains(TABLE_TITLE));
    }

    #[test]
    fn test_ready_state_renders_grouped_table() {
        let app = ready_app();
        let text = render_to_text(&app);
        assert!(text.contains("Formula Id"));
        assert!(text.contains("Count"));
        assert!(text.contains("Cedar"));
        assert!(!text.contains("Loading..."));
    }

    #[test]
    fn test_empty_working_set_renders_message() {
        let mut app = ready_app();
        if let Some(session) = app.session_mut() {
            session.set_search_query("no such formula");
        }
        let text = render_to_text(&app);
        assert!(text.contains("No matching formulas"));
    }

    #[test]
    fn test_filter_menu_lists_options() {
        let mut app = ready_app();
        app.ui_mode = UiMode::FilterMenu;
        let text = render_to_text(&app);
        assert!(text.contains("Clear all"));
        assert!(text.contains("[ ] Floral"));
        assert!(text.contains("[ ] Wood"));
    }
}
