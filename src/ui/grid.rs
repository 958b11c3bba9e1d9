use crate::api::{CatalogApi, Movie};
use crate::app::App;
use crate::controller::PageController;
use crate::format::{runtime_caption, to_hours_and_minutes, truncate_str};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

pub const CARD_WIDTH: u16 = 32;
pub const CARD_HEIGHT: u16 = 9;
pub const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Number of card columns that fit in a terminal of the given width.
pub fn columns_for_width(width: u16) -> usize {
    (width / CARD_WIDTH).max(1) as usize
}

/// What the grid area shows, in priority order.
#[derive(Debug, Clone, PartialEq)]
pub enum GridContent<'a> {
    Spinner,
    NoResults,
    ServerError(&'a str),
    Cards(Vec<CardModel<'a>>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosterState<'a> {
    Present(&'a str),
    Loading,
    Missing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardModel<'a> {
    pub movie: &'a Movie,
    pub poster: PosterState<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationModel {
    pub page: usize,
    pub total_pages: usize,
    pub show_first_prev: bool,
    pub show_next_last: bool,
    pub disabled: bool,
}

pub fn grid_content(controller: &PageController) -> GridContent<'_> {
    if controller.is_loading_movies() {
        return GridContent::Spinner;
    }
    if controller.movies().is_empty() {
        return match controller.last_error() {
            Some(message) => GridContent::ServerError(message),
            None => GridContent::NoResults,
        };
    }
    let cards = controller
        .movies()
        .iter()
        .map(|movie| CardModel {
            movie,
            poster: match movie.poster.as_deref() {
                Some(url) if !url.is_empty() => PosterState::Present(url),
                _ if controller.is_loading_posters() => PosterState::Loading,
                _ => PosterState::Missing,
            },
        })
        .collect();
    GridContent::Cards(cards)
}

/// Pagination controls, or `None` when there are no pages.
pub fn pagination(controller: &PageController) -> Option<PaginationModel> {
    let total_pages = controller.total_pages();
    if total_pages == 0 {
        return None;
    }
    let page = controller.page();
    Some(PaginationModel {
        page,
        total_pages,
        show_first_prev: page != 0,
        show_next_last: page + 1 != total_pages,
        disabled: controller.is_busy(),
    })
}

pub fn render<A: CatalogApi>(app: &App<A>, frame: &mut Frame) {
    let area = frame.area();

    // Layout: header(3) + badges(1) + grid(min) + pagination(1) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(CARD_HEIGHT),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(app, frame, chunks[0]);
    render_badges(app, frame, chunks[1]);

    match grid_content(&app.controller) {
        GridContent::Spinner => {
            let spinner = Paragraph::new(format!("{} Loading movies...", SPINNER[app.tick % SPINNER.len()]))
                .style(Style::default().fg(Color::Yellow))
                .alignment(Alignment::Center)
                .block(Block::default().padding(ratatui::widgets::Padding::top(chunks[2].height / 2)));
            frame.render_widget(spinner, chunks[2]);
        }
        GridContent::NoResults => render_placeholder(
            frame,
            chunks[2],
            "✗ No results found",
            "Please adjust your filters or start a new search",
            Color::DarkGray,
        ),
        GridContent::ServerError(message) => {
            render_placeholder(frame, chunks[2], "⚠ Server error", message, Color::Red)
        }
        GridContent::Cards(cards) => render_cards(app, &cards, frame, chunks[2]),
    }

    if let Some(model) = pagination(&app.controller) {
        frame.render_widget(pagination_line(&model), chunks[3]);
    }

    render_status(app, frame, chunks[4]);
}

fn render_header<A: CatalogApi>(app: &App<A>, frame: &mut Frame, area: Rect) {
    let query = app.controller.query();
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " Movie Database ",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  Sort: ", Style::default().fg(Color::DarkGray)),
        Span::styled(query.sort_field.label(), Style::default().fg(Color::Cyan)),
        Span::styled(
            format!(" ({})", query.sort_order.label()),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(header, area);
}

/// Badges for the committed title, genres and runtime range.
pub fn filter_badges(controller: &PageController) -> Vec<String> {
    let filters = &controller.query().filters;
    let mut badges = Vec::new();
    if let Some(title) = filters.title.as_deref().filter(|t| !t.is_empty()) {
        badges.push(format!("🎬 {}", title));
    }
    if !filters.genres.is_empty() {
        let genres: Vec<&str> = filters.genres.iter().map(String::as_str).collect();
        badges.push(format!("🔖 {}", genres.join(", ")));
    }
    if let Some(caption) = runtime_caption(filters.runtime_min, filters.runtime_max) {
        badges.push(format!("🕒 {}", caption));
    }
    badges
}

fn render_badges<A: CatalogApi>(app: &App<A>, frame: &mut Frame, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for badge in filter_badges(&app.controller) {
        spans.push(Span::styled(
            format!(" {} ", badge),
            Style::default().bg(Color::White).fg(Color::Black),
        ));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_placeholder(frame: &mut Frame, area: Rect, title: &str, message: &str, color: Color) {
    let lines = vec![
        Line::from(Span::styled(
            title.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(message.to_string()),
    ];
    let placeholder = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().padding(ratatui::widgets::Padding::top(area.height / 3)));
    frame.render_widget(placeholder, area);
}

fn card_lines<'a>(card: &CardModel<'a>, width: usize, tick: usize) -> Vec<Line<'a>> {
    let movie = card.movie;
    let genres = match &movie.genres {
        Some(g) if !g.is_empty() => g.join(", "),
        _ => "No genres listed".to_string(),
    };
    let year = movie
        .release_year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "Empty year".to_string());
    let runtime = movie
        .runtime
        .filter(|r| *r > 0)
        .map(to_hours_and_minutes)
        .unwrap_or_else(|| "Empty runtime".to_string());
    let rating = movie
        .rating
        .map(|r| r.to_string())
        .unwrap_or_else(|| "Empty rating".to_string());
    let poster = match card.poster {
        PosterState::Present(url) => Span::styled(
            truncate_str(url, width),
            Style::default().fg(Color::Blue),
        ),
        PosterState::Loading => Span::styled(
            format!("{} Loading poster...", SPINNER[tick % SPINNER.len()]),
            Style::default().fg(Color::Yellow),
        ),
        PosterState::Missing => Span::styled(
            "No poster available",
            Style::default().fg(Color::DarkGray),
        ),
    };

    vec![
        Line::from(Span::styled(
            truncate_str(&movie.title, width),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(truncate_str(&genres, width), Style::default().fg(Color::DarkGray))),
        Line::from(format!("📅 {}", year)),
        Line::from(format!("🕒 {}", runtime)),
        Line::from(format!("⭐ {}", rating)),
        Line::from(poster),
    ]
}

fn render_cards<A: CatalogApi>(app: &App<A>, cards: &[CardModel<'_>], frame: &mut Frame, area: Rect) {
    let columns = columns_for_width(area.width);
    let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
    let selected_row = app.selected / columns;
    let first_row = selected_row.saturating_sub(visible_rows - 1);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CARD_HEIGHT); visible_rows])
        .split(area);

    for (row_offset, row_area) in rows.iter().enumerate() {
        let row = first_row + row_offset;
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
            .split(*row_area);

        for (col, cell) in cells.iter().enumerate() {
            let index = row * columns + col;
            let Some(card) = cards.get(index) else {
                return;
            };
            let selected = index == app.selected;
            let border = if selected {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let inner_width = cell.width.saturating_sub(2) as usize;
            let widget = Paragraph::new(card_lines(card, inner_width, app.tick)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(format!(" {} ", index + 1)),
            );
            frame.render_widget(widget, *cell);
        }
    }
}

pub fn pagination_line(model: &PaginationModel) -> Paragraph<'static> {
    let control = if model.disabled {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    };
    let mut spans = Vec::new();
    if model.show_first_prev {
        spans.push(Span::styled("« g ", control));
        spans.push(Span::styled("‹ p ", control));
    }
    spans.push(Span::styled(
        format!(" {} / {} ", model.page + 1, model.total_pages),
        Style::default().fg(Color::White).add_modifier(Modifier::REVERSED),
    ));
    if model.show_next_last {
        spans.push(Span::styled(" n ›", control));
        spans.push(Span::styled(" G »", control));
    }
    Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
}

fn render_status<A: CatalogApi>(app: &App<A>, frame: &mut Frame, area: Rect) {
    let key = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let status_line = Line::from(vec![
        Span::styled(" ←↑↓→", key),
        Span::raw(" Select  "),
        Span::styled("Enter", key),
        Span::raw(" Detail  "),
        Span::styled("f", key),
        Span::raw(" Filters  "),
        Span::styled("s", key),
        Span::raw(" Sort  "),
        Span::styled("o", key),
        Span::raw(" Order  "),
        Span::styled("?", key),
        Span::raw(" Help  "),
        Span::styled("q", key),
        Span::raw(" Quit  "),
        Span::styled(app.status_msg.as_str(), Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(status_line), area);
}
