use std::{io, path::PathBuf};

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use itertools::Itertools;
use serde::Serialize;
use tracing::info;

use crate::{
    app,
    constants::COLUMNS,
    domain::{BrowseSession, ColumnRoles, SortConfig, SortDirection},
    error::CliError,
    logging::{self, LogTarget},
    storage::{self, CsvGrammar},
};

#[derive(Parser, Debug)]
#[command(name = "formulary")]
#[command(about = "Browse fragrance formulas in the terminal", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    #[arg(long, short, global = true, help = "CSV file to load")]
    pub file: Option<PathBuf>,

    #[arg(long, global = true, help = "Parse quoted fields (RFC 4180)")]
    pub quoted: bool,

    #[arg(long, global = true, default_value = COLUMNS.group_key, help = "Column that groups rows")]
    pub group_by: String,

    #[arg(long, global = true, default_value = COLUMNS.filter_column, help = "Column offered in the filter menu")]
    pub filter_column: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(about = "Open the interactive table (default)")]
    Browse,

    #[command(about = "Print the grouped table")]
    Show {
        #[arg(long, short, help = "Case-insensitive search over name and notes")]
        search: Option<String>,

        #[arg(long = "category", short, help = "Keep only this filter value (repeatable)")]
        categories: Vec<String>,

        #[arg(long, help = "Column to sort groups by")]
        sort: Option<String>,

        #[arg(long, requires = "sort", help = "Sort descending")]
        desc: bool,

        #[arg(long, help = "Show member rows under every group")]
        expand: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table, help = "Output format")]
        format: OutputFormat,
    },

    #[command(about = "List the values offered by the filter menu")]
    Categories,

    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(help = "Shell type (bash, zsh, fish)")]
        shell: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

/// Everything needed to locate, parse and interpret the dataset.
#[derive(Debug, Clone)]
pub struct BrowseOptions {
    pub dataset_path: PathBuf,
    pub grammar: CsvGrammar,
    pub roles: ColumnRoles,
}

impl SourceArgs {
    pub fn into_options(self) -> BrowseOptions {
        BrowseOptions {
            dataset_path: storage::resolve_dataset_path(self.file),
            grammar: if self.quoted {
                CsvGrammar::Quoted
            } else {
                CsvGrammar::Plain
            },
            roles: ColumnRoles {
                group_key: self.group_by,
                filter_column: self.filter_column,
                ..ColumnRoles::default()
            },
        }
    }
}

pub struct ShowRequest {
    pub search: Option<String>,
    pub categories: Vec<String>,
    pub sort: Option<String>,
    pub desc: bool,
    pub expand: bool,
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
pub struct GroupExport {
    pub id: String,
    pub count: usize,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct TableExport {
    pub columns: Vec<String>,
    pub groups: Vec<GroupExport>,
}

fn load_session(options: &BrowseOptions) -> Result<BrowseSession, CliError> {
    let dataset = storage::load_dataset(&options.dataset_path, options.grammar)?;
    info!(
        path = %options.dataset_path.display(),
        rows = dataset.rows.len(),
        "dataset loaded"
    );
    Ok(BrowseSession::new(dataset, options.roles.clone()))
}

/// Builds the session a `show` request describes, without touching stdout.
pub fn prepare_show(mut session: BrowseSession, request: &ShowRequest) -> BrowseSession {
    for value in request.categories.iter().unique() {
        session.toggle_category(value);
    }
    if let Some(query) = &request.search {
        session.set_search_query(query.clone());
    }
    if let Some(column) = &request.sort {
        let direction = if request.desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        session.set_sort(Some(SortConfig::new(column.clone(), direction)));
    }
    if request.expand {
        session.expand_all();
    }
    session
}

pub fn export_table(session: &BrowseSession) -> TableExport {
    let headers = session.headers();
    TableExport {
        columns: headers.to_vec(),
        groups: session
            .groups()
            .iter()
            .map(|group| GroupExport {
                id: group.id.clone(),
                count: group.count(),
                rows: group
                    .members
                    .iter()
                    .map(|row| row.values(headers).map(str::to_string).collect())
                    .collect(),
            })
            .collect(),
    }
}

pub fn write_csv<W: io::Write>(session: &BrowseSession, out: W) -> Result<(), CliError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(session.headers())?;
    for group in session.groups() {
        for row in &group.members {
            writer.write_record(row.values(session.headers()))?;
        }
    }
    writer.flush()?;
    Ok(())
}

pub fn show(options: &BrowseOptions, request: &ShowRequest) -> Result<(), CliError> {
    let session = prepare_show(load_session(options)?, request);

    match request.format {
        OutputFormat::Table => print!("{}", session.render_plain()),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&export_table(&session))?;
            println!("{}", json);
        }
        OutputFormat::Csv => write_csv(&session, io::stdout().lock())?,
    }

    Ok(())
}

pub fn list_categories(options: &BrowseOptions) -> Result<(), CliError> {
    let session = load_session(options)?;
    for value in session.category_filter().options() {
        println!("{}", value);
    }
    Ok(())
}

pub fn print_completions(shell: &str) -> Result<(), CliError> {
    use clap_complete::Shell;
    let shell = match shell {
        "bash" => Shell::Bash,
        "zsh" => Shell::Zsh,
        "fish" => Shell::Fish,
        _ => return Err(CliError::UnsupportedShell(shell.to_string())),
    };
    clap_complete::generate(shell, &mut Cli::command(), "formulary", &mut io::stdout());
    Ok(())
}

pub fn run_cli() -> Result<(), io::Error> {
    let cli = Cli::parse();
    let options = cli.source.into_options();

    let command = match cli.command {
        None | Some(Command::Browse) => {
            let _guard = logging::init_logging(LogTarget::StateFile);
            return app::run_ui(options);
        }
        Some(command) => command,
    };

    let _guard = logging::init_logging(LogTarget::Stderr);
    let result = match command {
        Command::Show {
            search,
            categories,
            sort,
            desc,
            expand,
            format,
        } => show(
            &options,
            &ShowRequest {
                search,
                categories,
                sort,
                desc,
                expand,
                format,
            },
        ),
        Command::Categories => list_categories(&options),
        Command::Completions { shell } => print_completions(&shell),
        Command::Browse => Ok(()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        drop(_guard);
        std::process::exit(1);
    }

    Ok(())
}
