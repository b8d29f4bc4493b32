use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Stylize,
    text::{Line, Text},
    widgets::{Block, Cell, Paragraph, Row, Table},
};

use dv::domain::SortOrder;
use dv::schema::Align;

use crate::app::App;

pub fn draw<T>(frame: &mut Frame, app: &App<T>) {
    let [table_area, status_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(2)]).areas(frame.area());
    draw_table(frame, app, table_area);
    draw_statusline(frame, app, status_area);
}

fn draw_table<T>(frame: &mut Frame, app: &App<T>, area: Rect) {
    let snapshot = app.engine().view();
    let (curser_row, curser_column) = app.curser();

    // Leading marker column for the selection state.
    let mut header_cells: Vec<Cell> = vec![Cell::from(" ")];
    for (cidx, column) in snapshot.columns.iter().enumerate() {
        let marker = match column.order {
            Some(SortOrder::Ascending) => " ▲",
            Some(SortOrder::Descending) => " ▼",
            None => "",
        };
        let filtered = if column.filtered { "*" } else { "" };
        let mut cell = Cell::from(format!("{}{marker}{filtered}", column.label)).bold();
        if cidx == curser_column {
            cell = cell.underlined();
        }
        header_cells.push(cell);
    }

    let mut rows: Vec<Row> = snapshot
        .rows
        .iter()
        .enumerate()
        .map(|(ridx, row)| {
            let mut cells: Vec<Cell> = Vec::with_capacity(row.cells.len() + 1);
            cells.push(Cell::from(if row.selected { "x" } else { " " }));
            for (text, column) in row.cells.iter().zip(snapshot.columns.iter()) {
                let content = match column.align {
                    Align::Right => Text::from(text.as_str()).right_aligned(),
                    Align::Left => Text::from(text.as_str()),
                };
                cells.push(Cell::from(content));
            }
            let mut table_row = Row::new(cells);
            if ridx == curser_row {
                table_row = table_row.reversed();
            }
            table_row
        })
        .collect();
    if rows.is_empty() {
        rows.push(Row::new(vec![Cell::from(""), Cell::from("No results.")]));
    }

    let mut widths = vec![Constraint::Length(1)];
    widths.extend(snapshot.columns.iter().map(|_| Constraint::Fill(1)));

    let title = Line::from(format!(
        " {} · page {}/{} ",
        app.name(),
        snapshot.page_index + 1,
        snapshot.page_count.max(1)
    ))
    .bold();

    let table = Table::new(rows, widths)
        .header(Row::new(header_cells))
        .block(Block::bordered().title(title));
    frame.render_widget(table, area);
}

fn draw_statusline<T>(frame: &mut Frame, app: &App<T>, area: Rect) {
    let snapshot = app.engine().view();

    let counts = format!(
        "{} of {} row(s) selected",
        snapshot.selected_count, snapshot.filtered_count
    );
    let first = Line::from(vec![
        counts.bold(),
        "  ".into(),
        app.status_message().into(),
    ]);

    let second = match app.filter_input() {
        Some((field, input)) => {
            let at = input
                .input
                .char_indices()
                .nth(input.curser_pos)
                .map(|(idx, _)| idx)
                .unwrap_or(input.input.len());
            Line::from(format!(
                "filter[{field}]: {}▏{}",
                &input.input[..at],
                &input.input[at..]
            ))
        }
        None => Line::from(
            "q quit · ↑↓ row · ←→ column · space select · a select all · s sort · / filter \
             · f search · n/p page · h hide · H unhide · y copy · d delete · c collect",
        )
        .dim(),
    };

    frame.render_widget(Paragraph::new(vec![first, second]), area);
}
