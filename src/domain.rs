use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::constants::COLUMNS;

mod filter;
mod grouping;
mod search;
mod sort;
mod table;

pub use filter::CategoryFilter;
pub use grouping::{Group, group_rows};
pub use search::search_rows;
pub use sort::{SortConfig, SortDirection, sort_groups};
pub use table::{TableLine, build_table_lines, expand_marker, format_header, header_label, render_plain};

/// One parsed record. Columns absent from the source line read as `""`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Row {
    fields: HashMap<String, String>,
}

impl Row {
    /// Zips `headers` with `fields`, padding missing trailing values with `""`
    /// and ignoring surplus fields.
    pub fn from_fields<'f>(headers: &[String], fields: impl IntoIterator<Item = &'f str>) -> Self {
        let mut fields = fields.into_iter();
        let fields = headers
            .iter()
            .map(|header| {
                let value = fields.next().unwrap_or("");
                (header.clone(), value.to_string())
            })
            .collect();
        Row { fields }
    }

    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn values<'r>(&'r self, headers: &'r [String]) -> impl Iterator<Item = &'r str> + 'r {
        headers.iter().map(move |header| self.get(header))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

/// Which columns carry special meaning for grouping, filtering and search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnRoles {
    pub group_key: String,
    pub filter_column: String,
    pub search_fields: Vec<String>,
}

impl Default for ColumnRoles {
    fn default() -> Self {
        ColumnRoles {
            group_key: COLUMNS.group_key.to_string(),
            filter_column: COLUMNS.filter_column.to_string(),
            search_fields: COLUMNS
                .search_fields
                .iter()
                .map(|field| field.to_string())
                .collect(),
        }
    }
}

/// Owns the unfiltered baseline and every piece of user-controlled state.
/// Groups and table lines are derived on demand and never cached.
pub struct BrowseSession {
    dataset: Dataset,
    roles: ColumnRoles,
    category_filter: CategoryFilter,
    search_query: String,
    sort: Option<SortConfig>,
    expanded: BTreeSet<String>,
}

impl BrowseSession {
    pub fn new(dataset: Dataset, roles: ColumnRoles) -> Self {
        let category_filter = CategoryFilter::new(&dataset.rows, &roles.filter_column);
        Self {
            dataset,
            roles,
            category_filter,
            search_query: String::new(),
            sort: None,
            expanded: BTreeSet::new(),
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.dataset.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.dataset.rows
    }

    pub fn category_filter(&self) -> &CategoryFilter {
        &self.category_filter
    }

    pub fn toggle_category(&mut self, value: &str) {
        self.category_filter.toggle(value);
        debug!(
            column = %self.roles.filter_column,
            value,
            selected = self.category_filter.selected_count(),
            "category filter toggled"
        );
    }

    pub fn clear_categories(&mut self) {
        self.category_filter.clear();
        debug!(column = %self.roles.filter_column, "category filter cleared");
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search_query.push(c);
    }

    pub fn pop_search_char(&mut self) {
        self.search_query.pop();
    }

    pub fn sort(&self) -> Option<&SortConfig> {
        self.sort.as_ref()
    }

    pub fn set_sort(&mut self, sort: Option<SortConfig>) {
        self.sort = sort;
    }

    /// Header-click behaviour: same column flips direction, a new column
    /// starts ascending.
    pub fn sort_by_column(&mut self, column: &str) {
        let next = SortConfig::next(self.sort.as_ref(), column);
        debug!(column, direction = ?next.direction, "sort changed");
        self.sort = Some(next);
    }

    pub fn is_expanded(&self, group_id: &str) -> bool {
        self.expanded.contains(group_id)
    }

    pub fn toggle_expanded(&mut self, group_id: &str) {
        let mut next = self.expanded.clone();
        if !next.remove(group_id) {
            next.insert(group_id.to_string());
        }
        self.expanded = next;
    }

    pub fn expand_all(&mut self) {
        self.expanded = self
            .dataset
            .rows
            .iter()
            .map(|row| row.get(&self.roles.group_key).to_string())
            .collect();
    }

    /// Category filter, then search, over the original parse order.
    pub fn working_set(&self) -> Vec<&Row> {
        let filtered = self.category_filter.apply(&self.dataset.rows);
        search_rows(filtered, &self.search_query, &self.roles.search_fields)
    }

    pub fn groups(&self) -> Vec<Group<'_>> {
        let groups = group_rows(self.working_set(), &self.roles.group_key);
        sort_groups(groups, self.sort.as_ref())
    }

    pub fn render_plain(&self) -> String {
        let groups = self.groups();
        let lines = build_table_lines(&groups, &self.expanded);
        render_plain(self.headers(), &groups, &lines, self.sort.as_ref())
    }

    pub fn expanded(&self) -> &BTreeSet<String> {
        &self.expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::parse_csv;

    const SAMPLE: &str = "formula_id,formula_name,notes,category\n1,Rose,Sweet floral,Floral\n1,Rose,Sweet floral,Floral\n2,Cedar,Woody,Wood\n";

    fn sample_session() -> BrowseSession {
        BrowseSession::new(parse_csv(SAMPLE), ColumnRoles::default())
    }

    fn group_ids(session: &BrowseSession) -> Vec<String> {
        session.groups().iter().map(|g| g.id.clone()).collect()
    }

    #[test]
    fn test_row_pads_missing_trailing_fields() {
        let headers = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let row = Row::from_fields(&headers, ["1"]);
        assert_eq!(row.get("a"), "1");
        assert_eq!(row.get("b"), "");
        assert_eq!(row.get("c"), "");
        assert_eq!(row.values(&headers).collect::<Vec<_>>(), vec!["1", "", ""]);
    }

    #[test]
    fn test_end_to_end_search_wood() {
        let mut session = sample_session();
        assert_eq!(session.rows().len(), 3);

        let groups = session.groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].id, "1");
        assert_eq!(groups[0].count(), 2);
        assert_eq!(groups[1].id, "2");
        assert_eq!(groups[1].count(), 1);

        session.set_search_query("wood");
        assert_eq!(group_ids(&session), vec!["2"]);
    }

    #[test]
    fn test_filter_then_clear_restores_baseline() {
        let csv = "formula_id,formula_name,notes,category\n1,Rose,a,A\n2,Oud,b,B\n3,Musk,c,C\n";
        let mut session = BrowseSession::new(parse_csv(csv), ColumnRoles::default());
        let baseline: Vec<Row> = session.working_set().into_iter().cloned().collect();

        session.toggle_category("A");
        session.toggle_category("B");
        assert_eq!(session.working_set().len(), 2);

        session.clear_categories();
        let restored: Vec<Row> = session.working_set().into_iter().cloned().collect();
        assert_eq!(restored, baseline);
    }

    #[test]
    fn test_search_composes_with_category_filter() {
        let csv = "formula_id,formula_name,notes,category\n1,Rose Absolute,floral,Floral\n2,Rose Wood,woody,Wood\n3,Cedar,woody,Wood\n";
        let mut session = BrowseSession::new(parse_csv(csv), ColumnRoles::default());

        session.toggle_category("Wood");
        session.set_search_query("rose");
        assert_eq!(group_ids(&session), vec!["2"]);

        session.set_search_query("   ");
        assert_eq!(group_ids(&session), vec!["2", "3"]);
    }

    #[test]
    fn test_blank_line_surfaces_as_empty_group_and_option() {
        let csv = "formula_id,formula_name,notes,category\n1,Rose,a,Floral\n\n2,Oud,b,Wood\n";
        let session = BrowseSession::new(parse_csv(csv), ColumnRoles::default());

        assert_eq!(session.rows().len(), 3);
        assert_eq!(group_ids(&session), vec!["1", "", "2"]);
        assert_eq!(session.category_filter().options(), ["", "Floral", "Wood"]);
    }

    #[test]
    fn test_filter_options_ignore_current_filters() {
        let mut session = sample_session();
        session.toggle_category("Wood");
        session.set_search_query("cedar");
        assert_eq!(session.category_filter().options(), ["Floral", "Wood"]);
    }

    #[test]
    fn test_sort_by_column_toggles_direction() {
        let mut session = sample_session();
        assert!(session.sort().is_none());

        session.sort_by_column("formula_name");
        assert_eq!(
            session.sort().map(|s| s.direction),
            Some(SortDirection::Ascending)
        );
        assert_eq!(group_ids(&session), vec!["2", "1"]);

        session.sort_by_column("formula_name");
        assert_eq!(
            session.sort().map(|s| s.direction),
            Some(SortDirection::Descending)
        );
        assert_eq!(group_ids(&session), vec!["1", "2"]);

        session.sort_by_column("formula_id");
        assert_eq!(
            session.sort().map(|s| (s.column.as_str(), s.direction)),
            Some(("formula_id", SortDirection::Ascending))
        );
    }

    #[test]
    fn test_toggle_expanded_flips_state() {
        let mut session = sample_session();
        assert!(!session.is_expanded("1"));
        session.toggle_expanded("1");
        assert!(session.is_expanded("1"));
        session.toggle_expanded("1");
        assert!(!session.is_expanded("1"));
    }

    #[test]
    fn test_expand_all_covers_every_group() {
        let mut session = sample_session();
        session.expand_all();
        assert!(session.is_expanded("1"));
        assert!(session.is_expanded("2"));
        assert_eq!(session.expanded().len(), 2);
    }
}
