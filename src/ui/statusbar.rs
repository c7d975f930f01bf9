use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::{ACCENT_BG, ACCENT_FG, STATUSBAR_BG, TEXT_SECONDARY};

pub fn render(frame: &mut Frame, area: Rect, hints: &[(String, &'static str)]) {
    let bg_style = Style::default().bg(STATUSBAR_BG);
    let spans: Vec<Span> = hints
        .iter()
        .flat_map(|(key, desc)| pill_spans(key, desc))
        .collect();
    frame.render_widget(Paragraph::new(Line::from(spans)).style(bg_style), area);
}

fn pill_spans<'a>(key: &'a str, desc: &'a str) -> Vec<Span<'a>> {
    vec![
        Span::raw(" "),
        Span::styled(
            format!(" {key} "),
            Style::default()
                .fg(ACCENT_FG)
                .bg(ACCENT_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {desc}"), Style::default().fg(TEXT_SECONDARY)),
    ]
}
