use super::grid::SPINNER;
use crate::api::CatalogApi;
use crate::app::App;
use crate::format::to_hours_and_minutes;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub fn render<A: CatalogApi>(app: &App<A>, frame: &mut Frame) {
    let area = frame.area();
    let movie = match app.selected_movie() {
        Some(m) => m,
        None => return,
    };

    // Layout: content(min) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(area);

    let label = Style::default().fg(Color::DarkGray);
    let genres = movie
        .genres
        .as_ref()
        .filter(|g| !g.is_empty())
        .map(|g| g.join(", "))
        .unwrap_or_else(|| "No genres listed".to_string());
    let poster = match movie.poster.as_deref() {
        Some(url) if !url.is_empty() => Span::styled(
            url,
            Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
        ),
        _ if app.controller.is_loading_posters() => Span::styled(
            format!("{} Loading poster...", SPINNER[app.tick % SPINNER.len()]),
            Style::default().fg(Color::Yellow),
        ),
        _ => Span::styled("No poster available", label),
    };

    let lines = vec![
        Line::from(Span::styled(
            movie.title.as_str(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![Span::styled(" Genres:  ", label), Span::raw(genres)]),
        Line::from(vec![
            Span::styled(" Year:    ", label),
            Span::raw(movie.release_year.map(|y| y.to_string()).unwrap_or_else(|| "Empty year".to_string())),
        ]),
        Line::from(vec![
            Span::styled(" Runtime: ", label),
            Span::raw(
                movie
                    .runtime
                    .filter(|r| *r > 0)
                    .map(to_hours_and_minutes)
                    .unwrap_or_else(|| "Empty runtime".to_string()),
            ),
        ]),
        Line::from(vec![
            Span::styled(" Rating:  ", label),
            Span::styled(
                movie.rating.map(|r| r.to_string()).unwrap_or_else(|| "Empty rating".to_string()),
                Style::default().fg(Color::Yellow),
            ),
        ]),
        Line::from(vec![Span::styled(" Poster:  ", label), poster]),
        Line::from(""),
        Line::from(vec![
            Span::styled(" IMDb:    ", label),
            Span::styled(
                movie.imdb_link(),
                Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
            ),
        ]),
    ];

    let content = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" {} ", movie.tconst)),
    );
    frame.render_widget(content, chunks[0]);

    let key = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let status_line = Line::from(vec![
        Span::styled(" o", key),
        Span::raw(" Open on IMDb  "),
        Span::styled("y", key),
        Span::raw(" Yank Link  "),
        Span::styled("Esc", key),
        Span::raw(" Back  "),
        Span::styled(app.status_msg.as_str(), label),
    ]);
    frame.render_widget(Paragraph::new(status_line), chunks[1]);
}
