use ratatui::{prelude::*, widgets::*};

fn binding(key: &'static str, action: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::from(key).light_cyan().bold(),
        Span::raw(" : "),
        Span::raw(action),
    ])
}

/// Draw the key bindings for `selected_tab` as a popup centered in `area`
pub fn render_help(area: Rect, buf: &mut Buffer, selected_tab: usize) {
    let mut lines = vec![
        binding("  q  ", "Exit the dashboard (training stops with it)"),
        binding("  h  ", "Toggle help popup"),
        binding(" Tab ", "Switch tabs"),
    ];

    match selected_tab {
        0 => lines.push(binding("⬅ / ➡", "Switch plots")),
        _ => lines.extend([
            binding("  s  ", "Toggle target selector"),
            binding("  f  ", "Focus on the selected target only"),
            binding("⬆ / ⬇", "Switch log target"),
            binding("⬅ / ➡", "Show one log level less/more"),
            binding("- / +", "Capture one log level less/more"),
            binding("PgUp ", "Page mode, scroll up"),
            binding("PgDn ", "Page mode, scroll down"),
            binding(" Esc ", "Leave page mode"),
            binding("Space", "Hide targets whose filter is off"),
        ]),
    }

    let [_, center_vert, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length((lines.len() + 4) as u16),
        Constraint::Fill(1),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(72),
        Constraint::Fill(1),
    ])
    .areas(center_vert);

    Clear.render(center, buf);

    Paragraph::new(lines)
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .padding(Padding::proportional(1))
                .title("Help"),
        )
        .wrap(Wrap { trim: false })
        .render(center, buf);
}
