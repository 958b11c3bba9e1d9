use super::centered_rect;
use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

fn section(title: &str) -> Line<'_> {
    Line::from(Span::styled(
        format!("  {}", title),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
}

fn binding<'a>(keys: &'a str, action: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("    {:<12}", keys), Style::default().fg(Color::Yellow)),
        Span::raw(action),
    ])
}

pub fn render(frame: &mut Frame) {
    let area = centered_rect(70, 70, frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, area);

    let help_text = vec![
        Line::from(""),
        section("Global"),
        binding("?", "Toggle this help"),
        binding("q / Ctrl+C", "Quit application"),
        binding("Esc", "Back / cancel"),
        Line::from(""),
        section("Grid"),
        binding("←↑↓→ hjkl", "Move selection"),
        binding("Enter", "Open movie detail"),
        binding("f or /", "Open filter editor"),
        binding("x", "Clear all filters"),
        binding("s", "Cycle sort field (Title/Year/Runtime/Rating)"),
        binding("o", "Toggle ascending/descending"),
        binding("a / d", "Sort ascending / descending"),
        binding("g / G", "First / last page"),
        binding("p / n", "Previous / next page (also PgUp/PgDn)"),
        Line::from(""),
        section("Filter Editor"),
        binding("Tab/S-Tab", "Next / previous field"),
        binding("←/→", "Move genre cursor"),
        binding("Space", "Toggle genre"),
        binding("Enter", "Apply filters"),
        Line::from(""),
        section("Detail View"),
        binding("o", "Open on IMDb"),
        binding("y", "Copy IMDb link to clipboard"),
        Line::from(""),
    ];

    let help = Paragraph::new(help_text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help - Keybindings ")
                .title_bottom(Line::from(" Press any key to close ").style(Style::default().fg(Color::DarkGray))),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(help, area);
}
