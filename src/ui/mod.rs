pub mod header;
pub mod process_table;
pub mod statusbar;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Color;

use crate::app::App;
use crate::system::memory::MemoryPressure;

pub(crate) const BORDER: Color = Color::DarkGray;
pub(crate) const TEXT_SECONDARY: Color = Color::Gray;
pub(crate) const ACCENT_FG: Color = Color::Black;
pub(crate) const ACCENT_BG: Color = Color::Cyan;
pub(crate) const GAUGE_EMPTY: Color = Color::Black;
pub(crate) const STATUSBAR_BG: Color = Color::Black;

pub(crate) fn pressure_color(pressure: MemoryPressure) -> Color {
    match pressure {
        MemoryPressure::Normal => Color::Green,
        MemoryPressure::Warning => Color::Yellow,
        MemoryPressure::Critical => Color::Red,
    }
}

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    header::render(frame, chunks[0], &app.snapshot);
    process_table::render(
        frame,
        chunks[1],
        &app.snapshot.top_processes,
        app.sort_column,
        app.descending,
    );
    statusbar::render(frame, chunks[2], &app.keybinds.hints());
}
