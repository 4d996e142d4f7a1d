use super::Row;

/// Keeps rows where any of `fields` contains `query`, ignoring case.
/// A blank query keeps everything.
pub fn search_rows<'a>(rows: Vec<&'a Row>, query: &str, fields: &[String]) -> Vec<&'a Row> {
    if query.trim().is_empty() {
        return rows;
    }

    let needle = query.to_lowercase();
    rows.into_iter()
        .filter(|row| {
            fields
                .iter()
                .any(|field| row.get(field).to_lowercase().contains(&needle))
        })
        .collect()
}
