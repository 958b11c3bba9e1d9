use super::centered_rect;
use super::grid::SPINNER;
use crate::api::CatalogApi;
use crate::app::App;
use crate::filters::{EditorField, GenreOptions};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub fn render<A: CatalogApi>(app: &App<A>, frame: &mut Frame) {
    let area = centered_rect(70, 80, frame.area());
    frame.render_widget(Clear, area);

    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Filters ")
        .title_bottom(
            Line::from(" Tab Next field  Space Toggle genre  Enter Filter  Esc Close ")
                .style(Style::default().fg(Color::DarkGray)),
        );
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    // Layout: title(3) + runtime(4) + genres(min) + submit(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(inner);

    let editor = &app.editor;

    text_input(frame, chunks[0], EditorField::Title, &editor.title, None, editor.focus);

    let runtime = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    text_input(
        frame,
        runtime[0],
        EditorField::RuntimeMin,
        &editor.runtime_min,
        editor.runtime_min_error.as_deref(),
        editor.focus,
    );
    text_input(
        frame,
        runtime[1],
        EditorField::RuntimeMax,
        &editor.runtime_max,
        editor.runtime_max_error.as_deref(),
        editor.focus,
    );

    render_genres(app, frame, chunks[2]);

    let committed = &app.controller.query().filters;
    let submit = if app.controller.is_loading_movies() {
        Line::from(Span::styled(
            format!(" {} Filter", SPINNER[app.tick % SPINNER.len()]),
            Style::default().fg(Color::DarkGray),
        ))
    } else if editor.is_dirty(committed) {
        Line::from(vec![
            Span::styled(" Enter ", Style::default().bg(Color::White).fg(Color::Black)),
            Span::styled(" Filter", Style::default().add_modifier(Modifier::BOLD)),
        ])
    } else {
        Line::from(Span::styled(
            " Change filters to search",
            Style::default().fg(Color::DarkGray),
        ))
    };
    frame.render_widget(Paragraph::new(submit), chunks[3]);
}

fn text_input(
    frame: &mut Frame,
    area: Rect,
    field: EditorField,
    value: &str,
    error: Option<&str>,
    focus: EditorField,
) {
    let focused = field == focus;
    let border = match (error, focused) {
        (Some(_), _) => Style::default().fg(Color::Red),
        (None, true) => Style::default().fg(Color::Yellow),
        (None, false) => Style::default().fg(Color::DarkGray),
    };
    let mut lines = vec![Line::from(value.to_string())];
    if let Some(message) = error {
        lines.push(Line::from(Span::styled(message.to_string(), Style::default().fg(Color::Red))));
    }
    let input = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(format!(" {} ", field.label())),
    );
    frame.render_widget(input, area);

    if focused {
        let cursor_x = area.x + 1 + unicode_width::UnicodeWidthStr::width(value) as u16;
        frame.set_cursor_position((cursor_x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

fn render_genres<A: CatalogApi>(app: &App<A>, frame: &mut Frame, area: Rect) {
    let editor = &app.editor;
    let focused = editor.focus == EditorField::Genres;
    let lines: Vec<Line> = match &app.genre_options {
        GenreOptions::Loading => vec![Line::from(Span::styled(
            format!("{} Loading genres...", SPINNER[app.tick % SPINNER.len()]),
            Style::default().fg(Color::Yellow),
        ))],
        GenreOptions::Failed(message) => vec![Line::from(Span::styled(
            format!("⚠ Could not fetch movie genres ({}). Please restart.", message),
            Style::default().fg(Color::Red),
        ))],
        GenreOptions::Loaded(options) => {
            let mut spans = Vec::new();
            for (i, genre) in options.iter().enumerate() {
                let checked = editor.genres.contains(genre);
                let mut style = if checked {
                    Style::default().bg(Color::Yellow).fg(Color::Black)
                } else {
                    Style::default().fg(Color::White)
                };
                if focused && i == editor.genre_cursor {
                    style = style.add_modifier(Modifier::UNDERLINED | Modifier::BOLD);
                }
                let label = if checked {
                    format!("✓ {}", genre)
                } else {
                    genre.clone()
                };
                spans.push(Span::styled(format!(" {} ", label), style));
                spans.push(Span::raw(" "));
            }
            vec![Line::from(spans)]
        }
    };

    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let genres = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(format!(" {} ", EditorField::Genres.label())),
    );
    frame.render_widget(genres, area);
}
