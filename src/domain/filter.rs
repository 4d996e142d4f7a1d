use std::collections::BTreeSet;

use itertools::Itertools;

use super::Row;

/// Multi-select filter over the distinct values of one column.
///
/// The option list is computed once from the unfiltered rows, so it never
/// shrinks while other filters narrow the working set. An empty selection
/// means the filter is inactive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryFilter {
    column: String,
    options: Vec<String>,
    selected: BTreeSet<String>,
}

impl CategoryFilter {
    pub fn new(rows: &[Row], column: &str) -> Self {
        let options = rows
            .iter()
            .map(|row| row.get(column))
            .unique()
            .sorted()
            .map(str::to_string)
            .collect();

        CategoryFilter {
            column: column.to_string(),
            options,
            selected: BTreeSet::new(),
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_active(&self) -> bool {
        !self.selected.is_empty()
    }

    pub fn is_selected(&self, value: &str) -> bool {
        self.selected.contains(value)
    }

    /// Replaces the selection with a copy that has `value` flipped.
    pub fn toggle(&mut self, value: &str) {
        let mut next = self.selected.clone();
        if !next.remove(value) {
            next.insert(value.to_string());
        }
        self.selected = next;
    }

    pub fn clear(&mut self) {
        self.selected = BTreeSet::new();
    }

    pub fn apply<'a>(&self, rows: &'a [Row]) -> Vec<&'a Row> {
        if self.selected.is_empty() {
            return rows.iter().collect();
        }

        rows.iter()
            .filter(|row| self.selected.contains(row.get(&self.column)))
            .collect()
    }
}
