use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::domain::build_table_lines;

use super::{App, UiMode, ui_helpers};

impl App {
    /// Returns `true` when the app should quit.
    pub(super) fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        let quit = match self.ui_mode {
            UiMode::Search => {
                self.handle_search_key(key);
                false
            }
            UiMode::FilterMenu => {
                self.handle_filter_menu_key(key);
                false
            }
            UiMode::Table => self.handle_table_key(key),
        };

        self.render_needed = true;
        quit
    }

    fn handle_table_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('/') => {
                if self.session().is_some() {
                    self.ui_mode = UiMode::Search;
                }
            }
            KeyCode::Char('f') => self.open_filter_menu(),
            KeyCode::Char('c') => self.clear_categories(),
            KeyCode::Esc => {
                if let Some(session) = self.session_mut() {
                    session.set_search_query(String::new());
                }
                self.clamp_cursor();
            }
            KeyCode::Left => {
                let columns = self.column_count();
                self.selected_column = ui_helpers::wrap_prev_index(self.selected_column, columns);
            }
            KeyCode::Right => {
                let columns = self.column_count();
                self.selected_column = ui_helpers::wrap_next_index(self.selected_column, columns);
            }
            KeyCode::Char('s') => self.sort_selected_column(),
            KeyCode::Up => {
                let lines = self.line_count();
                self.cursor = ui_helpers::wrap_prev_index(self.cursor, lines);
            }
            KeyCode::Down => {
                let lines = self.line_count();
                self.cursor = ui_helpers::wrap_next_index(self.cursor, lines);
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.line_count().saturating_sub(1),
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_group_at_cursor(),
            _ => {}
        }
        false
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.ui_mode = UiMode::Table,
            KeyCode::Esc => {
                if let Some(session) = self.session_mut() {
                    session.set_search_query(String::new());
                }
                self.ui_mode = UiMode::Table;
            }
            KeyCode::Backspace => {
                if let Some(session) = self.session_mut() {
                    session.pop_search_char();
                }
            }
            KeyCode::Char(c) => {
                if let Some(session) = self.session_mut() {
                    session.push_search_char(c);
                }
            }
            _ => return,
        }
        self.cursor = 0;
    }

    fn handle_filter_menu_key(&mut self, key: KeyEvent) {
        let entries = self.filter_menu_len();

        match key.code {
            KeyCode::Esc | KeyCode::Char('f') | KeyCode::Char('q') => {
                self.ui_mode = UiMode::Table;
            }
            KeyCode::Up => {
                self.filter_cursor = ui_helpers::wrap_prev_index(self.filter_cursor, entries);
            }
            KeyCode::Down => {
                self.filter_cursor = ui_helpers::wrap_next_index(self.filter_cursor, entries);
            }
            KeyCode::Char('c') => self.clear_categories(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.filter_cursor == 0 {
                    self.clear_categories();
                } else {
                    self.toggle_category_at(self.filter_cursor - 1);
                }
            }
            _ => {}
        }
    }

    fn open_filter_menu(&mut self) {
        if self.session().is_some() {
            self.ui_mode = UiMode::FilterMenu;
            self.filter_cursor = 0;
        }
    }

    /// "Clear all" plus one entry per option.
    pub(super) fn filter_menu_len(&self) -> usize {
        self.session()
            .map_or(0, |session| session.category_filter().options().len() + 1)
    }

    fn toggle_category_at(&mut self, option_index: usize) {
        let Some(value) = self
            .session()
            .and_then(|session| session.category_filter().options().get(option_index))
            .cloned()
        else {
            return;
        };

        if let Some(session) = self.session_mut() {
            session.toggle_category(&value);
        }
        self.clamp_cursor();
    }

    fn clear_categories(&mut self) {
        if let Some(session) = self.session_mut() {
            session.clear_categories();
        }
        self.clamp_cursor();
    }

    fn column_count(&self) -> usize {
        self.session().map_or(0, |session| session.headers().len())
    }

    fn sort_selected_column(&mut self) {
        let selected = self.selected_column;
        let Some(column) = self
            .session()
            .and_then(|session| session.headers().get(selected))
            .cloned()
        else {
            return;
        };

        if let Some(session) = self.session_mut() {
            session.sort_by_column(&column);
        }
    }

    fn toggle_group_at_cursor(&mut self) {
        let Some(group_id) = self.group_id_at(self.cursor) else {
            return;
        };

        if let Some(session) = self.session_mut() {
            session.toggle_expanded(&group_id);
        }

        if let Some(line) = self.summary_line_of(&group_id) {
            self.cursor = line;
        }
    }

    pub(super) fn group_id_at(&self, line_index: usize) -> Option<String> {
        let session = self.session()?;
        let groups = session.groups();
        let lines = build_table_lines(&groups, session.expanded());
        let line = lines.get(line_index)?;
        Some(groups[line.group_index()].id.clone())
    }

    fn summary_line_of(&self, group_id: &str) -> Option<usize> {
        let session = self.session()?;
        let groups = session.groups();
        let lines = build_table_lines(&groups, session.expanded());
        lines
            .iter()
            .position(|line| groups[line.group_index()].id == group_id)
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::super::{App, UiMode, tests::ready_app};
    use crate::domain::SortDirection;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(press(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_q_quits_from_table() {
        let mut app = ready_app();
        assert!(app.handle_key(press(KeyCode::Char('q'))));
    }

    #[test]
    fn test_ctrl_c_quits_from_any_mode() {
        let mut app = ready_app();
        app.handle_key(press(KeyCode::Char('/')));
        assert!(app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    }

    #[test]
    fn test_search_mode_edits_query() {
        let mut app = ready_app();
        app.handle_key(press(KeyCode::Char('/')));
        assert_eq!(app.ui_mode, UiMode::Search);

        // 'q' is text while searching, not quit
        assert!(!app.handle_key(press(KeyCode::Char('q'))));
        app.handle_key(press(KeyCode::Backspace));
        type_text(&mut app, "WOOD");
        app.handle_key(press(KeyCode::Enter));

        assert_eq!(app.ui_mode, UiMode::Table);
        let session = app.session().unwrap();
        assert_eq!(session.search_query(), "WOOD");
        let ids: Vec<String> = session.groups().into_iter().map(|g| g.id).collect();
        assert_eq!(ids, vec!["2"]);
    }

    #[test]
    fn test_esc_in_search_clears_query() {
        let mut app = ready_app();
        app.handle_key(press(KeyCode::Char('/')));
        type_text(&mut app, "rose");
        app.handle_key(press(KeyCode::Esc));
        assert_eq!(app.session().unwrap().search_query(), "");
        assert_eq!(app.ui_mode, UiMode::Table);
    }

    #[test]
    fn test_filter_menu_toggle_and_clear() {
        let mut app = ready_app();
        app.handle_key(press(KeyCode::Char('f')));
        assert_eq!(app.ui_mode, UiMode::FilterMenu);
        assert_eq!(app.filter_menu_len(), 3);

        // options are Floral, Wood; move to Wood
        app.handle_key(press(KeyCode::Down));
        app.handle_key(press(KeyCode::Down));
        app.handle_key(press(KeyCode::Char(' ')));
        assert!(app.session().unwrap().category_filter().is_selected("Wood"));
        assert_eq!(app.line_count(), 1);

        app.handle_key(press(KeyCode::Home));
        app.handle_key(press(KeyCode::Up));
        app.handle_key(press(KeyCode::Up));
        assert_eq!(app.filter_cursor, 0);
        app.handle_key(press(KeyCode::Enter));
        assert!(!app.session().unwrap().category_filter().is_active());
        assert_eq!(app.line_count(), 2);

        app.handle_key(press(KeyCode::Esc));
        assert_eq!(app.ui_mode, UiMode::Table);
    }

    #[test]
    fn test_sort_key_toggles_direction_on_selected_column() {
        let mut app = ready_app();
        app.handle_key(press(KeyCode::Right));
        assert_eq!(app.selected_column, 1);

        app.handle_key(press(KeyCode::Char('s')));
        let sort = app.session().unwrap().sort().cloned().unwrap();
        assert_eq!(sort.column, "formula_name");
        assert_eq!(sort.direction, SortDirection::Ascending);

        app.handle_key(press(KeyCode::Char('s')));
        let sort = app.session().unwrap().sort().cloned().unwrap();
        assert_eq!(sort.direction, SortDirection::Descending);
    }

    #[test]
    fn test_column_selection_wraps() {
        let mut app = ready_app();
        app.handle_key(press(KeyCode::Left));
        assert_eq!(app.selected_column, 3);
        app.handle_key(press(KeyCode::Right));
        assert_eq!(app.selected_column, 0);
    }

    #[test]
    fn test_enter_expands_and_collapses_group() {
        let mut app = ready_app();
        assert_eq!(app.line_count(), 2);

        app.handle_key(press(KeyCode::Enter));
        assert!(app.session().unwrap().is_expanded("1"));
        assert_eq!(app.line_count(), 4);

        // collapse from a detail line snaps back to the summary line
        app.handle_key(press(KeyCode::Down));
        app.handle_key(press(KeyCode::Down));
        assert_eq!(app.group_id_at(app.cursor).as_deref(), Some("1"));
        app.handle_key(press(KeyCode::Enter));
        assert!(!app.session().unwrap().is_expanded("1"));
        assert_eq!(app.cursor, 0);
        assert_eq!(app.line_count(), 2);
    }

    #[test]
    fn test_cursor_wraps_over_lines() {
        let mut app = ready_app();
        app.handle_key(press(KeyCode::Up));
        assert_eq!(app.cursor, 1);
        app.handle_key(press(KeyCode::Down));
        assert_eq!(app.cursor, 0);
    }
}
