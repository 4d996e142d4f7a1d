use std::collections::BTreeSet;

use itertools::Itertools;

use super::{Group, SortConfig};

/// One visible line of the grouped table, by index into the group list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableLine {
    Summary { group: usize, expanded: bool },
    Detail { group: usize, member: usize },
}

impl TableLine {
    pub fn group_index(self) -> usize {
        match self {
            TableLine::Summary { group, .. } | TableLine::Detail { group, .. } => group,
        }
    }
}

pub fn build_table_lines(groups: &[Group<'_>], expanded: &BTreeSet<String>) -> Vec<TableLine> {
    let mut lines = Vec::with_capacity(groups.len());
    for (group_idx, group) in groups.iter().enumerate() {
        let is_expanded = expanded.contains(&group.id);
        lines.push(TableLine::Summary {
            group: group_idx,
            expanded: is_expanded,
        });
        if is_expanded {
            lines.extend((0..group.count()).map(|member| TableLine::Detail {
                group: group_idx,
                member,
            }));
        }
    }
    lines
}

/// `formula_id` becomes `Formula Id`.
pub fn format_header(header: &str) -> String {
    let spaced = header.replace('_', " ");
    let mut out = String::with_capacity(spaced.len());
    let mut at_word_start = true;
    for c in spaced.chars() {
        let is_word = c.is_alphanumeric();
        if is_word && at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !is_word;
    }
    out
}

pub fn header_label(header: &str, sort: Option<&SortConfig>) -> String {
    match sort {
        Some(config) if config.column == header => {
            format!("{} {}", format_header(header), config.direction.arrow())
        }
        _ => format_header(header),
    }
}

pub fn expand_marker(expanded: bool) -> &'static str {
    if expanded { "▼" } else { "▶" }
}

/// Column-aligned text rendering of the table lines, as printed by `show`.
pub fn render_plain(
    headers: &[String],
    groups: &[Group<'_>],
    lines: &[TableLine],
    sort: Option<&SortConfig>,
) -> String {
    let mut grid: Vec<Vec<String>> = Vec::with_capacity(lines.len() + 1);

    grid.push(
        std::iter::once(String::new())
            .chain(headers.iter().map(|h| header_label(h, sort)))
            .chain(std::iter::once("Count".to_string()))
            .collect(),
    );

    for line in lines {
        let row = match *line {
            TableLine::Summary { group, expanded } => {
                let group = &groups[group];
                std::iter::once(expand_marker(expanded).to_string())
                    .chain(group.representative.values(headers).map(str::to_string))
                    .chain(std::iter::once(group.count().to_string()))
                    .collect()
            }
            TableLine::Detail { group, member } => {
                let row = groups[group].members[member];
                std::iter::once(String::new())
                    .chain(row.values(headers).map(|v| format!("  {}", v)))
                    .chain(std::iter::once(String::new()))
                    .collect()
            }
        };
        grid.push(row);
    }

    let column_count = headers.len() + 2;
    let widths: Vec<usize> = (0..column_count)
        .map(|col| {
            grid.iter()
                .map(|row| row[col].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    grid.iter()
        .map(|row| {
            row.iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{:<width$}", cell, width = width))
                .join(" ")
                .trim_end()
                .to_string()
        })
        .map(|line| line + "\n")
        .collect()
}
