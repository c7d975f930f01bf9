use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Cell, Row, Table};

use super::{ACCENT_BG, BORDER, TEXT_SECONDARY};
use crate::format::{format_bytes, format_percent, truncate_unicode};
use crate::system::process::{ProcessSample, SortColumn};

const NAME_MAX_WIDTH: usize = 48;

const WIDTHS: [Constraint; 6] = [
    Constraint::Length(7),
    Constraint::Length(7),
    Constraint::Length(10),
    Constraint::Length(10),
    Constraint::Length(7),
    Constraint::Min(10),
];

pub fn render(
    frame: &mut Frame,
    area: Rect,
    processes: &[ProcessSample],
    sort_column: SortColumn,
    descending: bool,
) {
    let header = Row::new(SortColumn::ALL.map(|column| {
        let label = header_label(column, sort_column, descending);
        let style = if column == sort_column {
            Style::default().fg(ACCENT_BG).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(TEXT_SECONDARY)
                .add_modifier(Modifier::BOLD)
        };
        Cell::from(label).style(style)
    }));

    let rows = processes.iter().map(|p| {
        Row::new([
            Cell::from(p.pid.to_string()),
            Cell::from(format_percent(p.memory_percent)),
            Cell::from(format_bytes(p.resident_bytes)),
            Cell::from(format_bytes(p.virtual_bytes)),
            Cell::from(format_percent(p.cpu_percent)),
            Cell::from(truncate_unicode(&p.display_name, NAME_MAX_WIDTH)),
        ])
    });

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER))
        .title(Span::styled(
            format!(" Top {} by memory ", processes.len()),
            Style::default()
                .fg(TEXT_SECONDARY)
                .add_modifier(Modifier::BOLD),
        ));

    let table = Table::new(rows, WIDTHS).header(header).block(block);
    frame.render_widget(table, area);
}

/// Column title, with an arrow on the active sort column.
pub fn header_label(column: SortColumn, active: SortColumn, descending: bool) -> String {
    if column != active {
        return column.label().to_string();
    }
    let arrow = if descending { '\u{25bc}' } else { '\u{25b2}' };
    format!("{}{arrow}", column.label())
}
