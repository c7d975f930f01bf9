use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};

use super::{ACCENT_BG, ACCENT_FG, BORDER, GAUGE_EMPTY, TEXT_SECONDARY, pressure_color};
use crate::format::format_bytes;
use crate::system::snapshot::MemorySnapshot;

pub fn render(frame: &mut Frame, area: Rect, snapshot: &MemorySnapshot) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ])
        .split(area);

    render_summary(frame, chunks[0], snapshot);
    render_ram_gauge(frame, chunks[1], snapshot);
    render_swap_gauge(frame, chunks[2], snapshot);
}

fn bordered(title: Option<String>) -> Block<'static> {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER));
    match title {
        Some(title) => block.title(Span::styled(
            title,
            Style::default()
                .fg(TEXT_SECONDARY)
                .add_modifier(Modifier::BOLD),
        )),
        None => block,
    }
}

fn render_summary(frame: &mut Frame, area: Rect, snapshot: &MemorySnapshot) {
    let block = bordered(None);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let pressure = snapshot.memory_pressure;
    let secondary = Style::default().fg(TEXT_SECONDARY);
    let lines = vec![
        Line::from(vec![
            Span::styled(
                " membar ",
                Style::default()
                    .fg(ACCENT_FG)
                    .bg(ACCENT_BG)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                pressure.label(),
                Style::default()
                    .fg(pressure_color(pressure))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(format!("Procs: {}", snapshot.process_count), secondary),
        ]),
        Line::from(Span::styled(
            format!(
                "Wired {}  Compr {}  Apps {}",
                format_bytes(snapshot.memory.wired),
                format_bytes(snapshot.memory.compressed),
                format_bytes(snapshot.memory.app_physical),
            ),
            secondary,
        )),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_ram_gauge(frame: &mut Frame, area: Rect, snapshot: &MemorySnapshot) {
    let mem = &snapshot.memory;
    let ratio = (mem.used_percent() / 100.0).clamp(0.0, 1.0);

    let gauge = Gauge::default()
        .block(bordered(Some(" RAM ".to_string())))
        .gauge_style(
            Style::default()
                .fg(pressure_color(snapshot.memory_pressure))
                .bg(GAUGE_EMPTY),
        )
        .ratio(ratio)
        .label(format!(
            "{}/{} ({:.0}%)",
            format_bytes(mem.used),
            format_bytes(mem.total),
            ratio * 100.0
        ));

    frame.render_widget(gauge, area);
}

fn render_swap_gauge(frame: &mut Frame, area: Rect, snapshot: &MemorySnapshot) {
    let swap = &snapshot.swap;
    let ratio = (swap.utilization_percent / 100.0).clamp(0.0, 1.0);
    let title = match swap.efficiency() {
        Some(eff) => format!(" Swap in/out {eff:.2} "),
        None => " Swap ".to_string(),
    };

    let gauge = Gauge::default()
        .block(bordered(Some(title)))
        .gauge_style(Style::default().fg(ACCENT_BG).bg(GAUGE_EMPTY))
        .ratio(ratio)
        .label(format!(
            "{}/{} ({:.0}%)",
            format_bytes(swap.used),
            format_bytes(swap.total),
            ratio * 100.0
        ));

    frame.render_widget(gauge, area);
}
