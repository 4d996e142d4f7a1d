use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use itertools::Itertools;

use crate::{
    constants::FILE_PATHS,
    domain::{Dataset, Row},
    error::LoadError,
};

/// How field boundaries are recognised in the source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CsvGrammar {
    /// Split on `,` with no quoting or escaping.
    #[default]
    Plain,
    /// RFC 4180 quoting, so fields may contain commas and line breaks.
    Quoted,
}

/// Lenient comma splitter. Never fails: short lines are padded with empty
/// values and surplus fields are dropped, so a blank line becomes a row of
/// empty values. Quoted fields and embedded commas are not understood.
pub fn parse_csv(text: &str) -> Dataset {
    let mut lines = text.trim().split('\n');

    let raw_headers: Vec<String> = match lines.next() {
        Some(line) if !line.trim().is_empty() => {
            line.split(',').map(|h| h.trim().to_string()).collect()
        }
        _ => return Dataset::default(),
    };

    let rows = lines
        .map(|line| Row::from_fields(&raw_headers, line.split(',').map(str::trim)))
        .collect();

    Dataset {
        headers: distinct_headers(raw_headers),
        rows,
    }
}

/// Empty lines never reach the record iterator; the `csv` reader drops them.

pub fn parse_quoted_csv(text: &str) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let raw_headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if raw_headers.iter().all(String::is_empty) {
        return Ok(Dataset::default());
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(Row::from_fields(&raw_headers, record?.iter()));
    }

    Ok(Dataset {
        headers: distinct_headers(raw_headers),
        rows,
    })
}

// A repeated name is one column: first position, last value.
fn distinct_headers(raw: Vec<String>) -> Vec<String> {
    raw.into_iter().unique().collect()
}

pub fn parse_with(text: &str, grammar: CsvGrammar) -> Result<Dataset, LoadError> {
    match grammar {
        CsvGrammar::Plain => Ok(parse_csv(text)),
        CsvGrammar::Quoted => parse_quoted_csv(text),
    }
}

pub fn load_dataset(path: &Path, grammar: CsvGrammar) -> Result<Dataset, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_with(&content, grammar)
}

/// An explicit path wins; otherwise a `./data/formulas.csv` next to the
/// working directory, then the platform data directory.
pub fn resolve_dataset_path(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }

    let local = Path::new(FILE_PATHS.local_dataset);
    if local.exists() {
        return local.to_path_buf();
    }

    get_data_dir().join(FILE_PATHS.dataset_file)
}

pub fn get_data_dir() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "formulary", "formulary") {
        proj_dirs.data_dir().to_path_buf()
    } else {
        PathBuf::from(".")
    }
}

pub fn get_state_dir() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "formulary", "formulary") {
        if let Some(state_dir) = proj_dirs.state_dir() {
            return state_dir.to_path_buf();
        }
        return proj_dirs.cache_dir().to_path_buf();
    }
    PathBuf::from(".")
}
