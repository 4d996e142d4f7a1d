use std::{
    io,
    path::PathBuf,
    sync::mpsc::{self, Receiver, TryRecvError},
    thread,
    time::{Duration, Instant},
};

use chrono::{DateTime, Local};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use tracing::{error, info};

use crate::{
    cli::BrowseOptions,
    constants::TIME_SETTINGS,
    domain::{BrowseSession, ColumnRoles, Dataset},
    error::LoadError,
    storage::{self, CsvGrammar},
};

mod event_handlers;
mod filter_menu_view;
mod render_views;
mod table_view;
mod ui_helpers;
mod view_style;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum UiMode {
    Table,
    Search,
    FilterMenu,
}

type LoadResult = Result<Dataset, LoadError>;

enum DataState {
    /// Waiting on the loader. `None` once the load has failed; the view keeps
    /// showing the loading state with nothing left to wait for.
    Loading(Option<Receiver<LoadResult>>),
    Ready {
        session: BrowseSession,
        loaded_at: DateTime<Local>,
    },
}

struct App {
    data: DataState,
    roles: ColumnRoles,
    dataset_path: PathBuf,
    ui_mode: UiMode,
    cursor: usize,
    selected_column: usize,
    filter_cursor: usize,
    render_needed: bool,
}

impl App {
    fn new(options: BrowseOptions) -> Self {
        let receiver = spawn_loader(options.dataset_path.clone(), options.grammar);
        Self::with_state(DataState::Loading(Some(receiver)), options)
    }

    fn with_state(data: DataState, options: BrowseOptions) -> Self {
        Self {
            data,
            roles: options.roles,
            dataset_path: options.dataset_path,
            ui_mode: UiMode::Table,
            cursor: 0,
            selected_column: 0,
            filter_cursor: 0,
            render_needed: true,
        }
    }

    fn session(&self) -> Option<&BrowseSession> {
        match &self.data {
            DataState::Ready { session, .. } => Some(session),
            DataState::Loading(_) => None,
        }
    }

    fn session_mut(&mut self) -> Option<&mut BrowseSession> {
        match &mut self.data {
            DataState::Ready { session, .. } => Some(session),
            DataState::Loading(_) => None,
        }
    }

    fn poll_loader(&mut self) {
        let DataState::Loading(Some(receiver)) = &self.data else {
            return;
        };

        let result = match receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => Err(LoadError::Disconnected),
        };

        self.finish_load(result);
    }

    fn finish_load(&mut self, result: LoadResult) {
        match result {
            Ok(dataset) => {
                let session = BrowseSession::new(dataset, self.roles.clone());
                info!(
                    path = %self.dataset_path.display(),
                    rows = session.rows().len(),
                    columns = session.headers().len(),
                    "dataset loaded"
                );
                self.data = DataState::Ready {
                    session,
                    loaded_at: Local::now(),
                };
            }
            Err(e) => {
                error!(path = %self.dataset_path.display(), error = %e, "failed to load CSV");
                self.data = DataState::Loading(None);
            }
        }
        self.render_needed = true;
    }

    fn line_count(&self) -> usize {
        self.session().map_or(0, |session| {
            let groups = session.groups();
            groups
                .iter()
                .map(|group| {
                    if session.is_expanded(&group.id) {
                        1 + group.count()
                    } else {
                        1
                    }
                })
                .sum()
        })
    }

    fn clamp_cursor(&mut self) {
        let count = self.line_count();
        self.cursor = ui_helpers::clamp_index(self.cursor, count);
    }

    fn modal_rect(&self, terminal_size: Rect, numerator: u16, denominator: u16) -> Rect {
        let target_width = terminal_size.width.saturating_mul(numerator) / denominator;
        let target_height = (terminal_size.height.saturating_mul(numerator) / denominator).max(10);

        let max_width = terminal_size.width.saturating_sub(2).max(1);
        let max_height = terminal_size.height.saturating_sub(2).max(1);

        let modal_width = target_width.clamp(1, max_width);
        let modal_height = target_height.clamp(1, max_height);

        let modal_x = (terminal_size.width.saturating_sub(modal_width)) / 2;
        let modal_y = (terminal_size.height.saturating_sub(modal_height)) / 2;

        Rect::new(modal_x, modal_y, modal_width, modal_height)
    }
}

fn spawn_loader(path: PathBuf, grammar: CsvGrammar) -> Receiver<LoadResult> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(storage::load_dataset(&path, grammar));
    });
    rx
}

pub fn run_ui(options: BrowseOptions) -> Result<(), io::Error> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(options);

    let poll_rate = Duration::from_millis(TIME_SETTINGS.poll_ms);
    let render_rate = Duration::from_millis(1000 / TIME_SETTINGS.target_fps);
    let mut last_render = Instant::now();

    loop {
        app.poll_loader();

        if last_render.elapsed() >= render_rate && app.render_needed {
            terminal.draw(|f| {
                app.draw_frame(f);
            })?;
            app.render_needed = false;
            last_render = Instant::now();
        }

        if event::poll(poll_rate)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.handle_key(key) {
                        break;
                    }
                }
                Event::Resize(_, _) => app.render_needed = true,
                _ => {}
            }
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::parse_csv;

    pub(super) const SAMPLE: &str = "formula_id,formula_name,notes,category\n\
        1,Rose,Sweet floral,Floral\n\
        1,Rose,Sweet floral,Floral\n\
        2,Cedar,Woody,Wood\n";

    pub(super) fn ready_app() -> App {
        let mut app = App::with_state(DataState::Loading(None), options());
        app.finish_load(Ok(parse_csv(SAMPLE)));
        app
    }

    fn options() -> BrowseOptions {
        BrowseOptions {
            dataset_path: PathBuf::from("/tmp/formulary_app_test.csv"),
            grammar: CsvGrammar::Plain,
            roles: ColumnRoles::default(),
        }
    }

    #[test]
    fn test_failed_load_stays_loading() {
        let mut app = App::with_state(DataState::Loading(None), options());
        app.finish_load(Err(LoadError::Disconnected));
        assert!(matches!(app.data, DataState::Loading(None)));
        assert!(app.session().is_none());
        assert_eq!(app.line_count(), 0);
    }

    #[test]
    fn test_successful_load_builds_session() {
        let mut app = App::with_state(DataState::Loading(None), options());
        app.finish_load(Ok(parse_csv(SAMPLE)));
        let session = app.session().expect("session after load");
        assert_eq!(session.rows().len(), 3);
        assert_eq!(app.line_count(), 2);
    }

    #[test]
    fn test_poll_loader_receives_dataset() {
        let (tx, rx) = mpsc::channel();
        let mut app = App::with_state(DataState::Loading(Some(rx)), options());

        app.poll_loader();
        assert!(app.session().is_none());

        tx.send(Ok(parse_csv(SAMPLE))).unwrap();
        app.poll_loader();
        assert!(app.session().is_some());
    }

    #[test]
    fn test_poll_loader_disconnect_keeps_loading() {
        let (tx, rx) = mpsc::channel::<LoadResult>();
        drop(tx);
        let mut app = App::with_state(DataState::Loading(Some(rx)), options());
        app.poll_loader();
        assert!(matches!(app.data, DataState::Loading(None)));
    }

    #[test]
    fn test_spawn_loader_reports_missing_file() {
        let rx = spawn_loader(
            PathBuf::from("/tmp/formulary_definitely_missing.csv"),
            CsvGrammar::Plain,
        );
        let result = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }
}
