use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, BorderType, Borders, Cell, Row as TableRow, Table, TableState},
};

use crate::{
    constants::PALETTE,
    domain::{BrowseSession, Group, TableLine, build_table_lines, expand_marker, header_label},
};

use super::{App, ui_helpers, view_style};

const MAX_COLUMN_WIDTH: usize = 28;
const COUNT_WIDTH: u16 = 5;

impl App {
    pub(super) fn render_table(&self, f: &mut Frame, area: Rect, session: &BrowseSession) {
        let groups = session.groups();
        let lines = build_table_lines(&groups, session.expanded());
        let headers = session.headers();

        let header = TableRow::new(
            std::iter::once(Cell::from(""))
                .chain(headers.iter().enumerate().map(|(idx, h)| {
                    Cell::from(header_label(h, session.sort()))
                        .style(view_style::header_style(idx == self.selected_column))
                }))
                .chain(std::iter::once(Cell::from("Count"))),
        )
        .style(view_style::header_style(false));

        let body: Vec<TableRow> = lines
            .iter()
            .enumerate()
            .map(|(line_idx, line)| table_row(headers, &groups, *line, line_idx))
            .collect();

        let widths = column_widths(headers, &groups);

        let table = Table::new(body, widths)
            .header(header)
            .column_spacing(1)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded),
            )
            .highlight_style(
                view_style::filled_style(PALETTE.cursor_bg).add_modifier(Modifier::BOLD),
            );

        let mut state = TableState::default();
        if !lines.is_empty() {
            state.select(Some(ui_helpers::clamp_index(self.cursor, lines.len())));
        }

        f.render_stateful_widget(table, area, &mut state);
    }
}

fn table_row<'t>(
    headers: &'t [String],
    groups: &'t [Group<'_>],
    line: TableLine,
    line_idx: usize,
) -> TableRow<'t> {
    match line {
        TableLine::Summary { group, expanded } => {
            let group = &groups[group];
            let style = if expanded {
                view_style::filled_style(PALETTE.expanded_bg)
            } else {
                Style::default()
            };
            TableRow::new(
                std::iter::once(Cell::from(expand_marker(expanded)))
                    .chain(
                        group
                            .representative
                            .values(headers)
                            .map(|v| Cell::from(ui_helpers::truncate_label(v, MAX_COLUMN_WIDTH))),
                    )
                    .chain(std::iter::once(Cell::from(group.count().to_string()).style(
                        Style::default().add_modifier(Modifier::BOLD),
                    ))),
            )
            .style(style)
        }
        TableLine::Detail { group, member } => {
            let row = groups[group].members[member];
            let bg = if line_idx % 2 == 0 {
                PALETTE.detail_alt_bg
            } else {
                PALETTE.detail_bg
            };
            TableRow::new(
                std::iter::once(Cell::from(""))
                    .chain(
                        row.values(headers)
                            .map(|v| Cell::from(ui_helpers::truncate_label(v, MAX_COLUMN_WIDTH))),
                    )
                    .chain(std::iter::once(Cell::from(""))),
            )
            .style(view_style::filled_style(bg))
        }
    }
}

fn column_widths(headers: &[String], groups: &[Group<'_>]) -> Vec<Constraint> {
    let data_widths = headers.iter().map(|header| {
        let label = header_label(header, None).chars().count() + 2;
        let widest = groups
            .iter()
            .flat_map(|group| group.members.iter())
            .map(|row| row.get(header).chars().count())
            .max()
            .unwrap_or(0);
        Constraint::Length(label.max(widest).min(MAX_COLUMN_WIDTH) as u16)
    });

    std::iter::once(Constraint::Length(2))
        .chain(data_widths)
        .chain(std::iter::once(Constraint::Length(COUNT_WIDTH)))
        .collect()
}
