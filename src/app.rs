use crate::api::{CatalogApi, Movie};
use crate::controller::{PageController, SortField, SortOrder};
use crate::dispatch::{Dispatcher, FetchEvent};
use crate::filters::{FilterCriteria, FilterEditor, GenreOptions};
use crate::ui::grid::columns_for_width;
use tracing::{info, warn};

/// Which view is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Grid,
    Detail,
}

/// Whether keystrokes go to the grid or to the filter editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Main application state.
pub struct App<A: CatalogApi> {
    pub controller: PageController,
    pub editor: FilterEditor,
    pub genre_options: GenreOptions,
    pub dispatcher: Dispatcher<A>,

    pub should_quit: bool,
    pub view: View,
    pub input_mode: InputMode,
    pub show_help: bool,

    // Grid selection
    pub selected: usize,
    pub columns: usize,

    /// Advances once per frame; drives spinners.
    pub tick: usize,
    pub status_msg: String,
}

impl<A: CatalogApi> App<A> {
    pub fn new(dispatcher: Dispatcher<A>) -> Self {
        Self {
            controller: PageController::new(),
            editor: FilterEditor::default(),
            genre_options: GenreOptions::Loading,
            dispatcher,

            should_quit: false,
            view: View::Grid,
            input_mode: InputMode::Normal,
            show_help: false,

            selected: 0,
            columns: 1,

            tick: 0,
            status_msg: "Loading movies...".to_string(),
        }
    }

    /// Kick off the genre list and the first page.
    pub fn init(&mut self) {
        self.dispatcher.fetch_genres();
        let request = self.controller.start();
        self.dispatcher.fetch_movies(request);
    }

    pub fn update_layout(&mut self, terminal_width: u16) {
        self.columns = columns_for_width(terminal_width);
    }

    /// Fold a completed fetch into the state.
    pub fn handle_fetch_event(&mut self, event: FetchEvent) {
        match event {
            FetchEvent::Movies { generation, result } => {
                let current = generation == self.controller.generation();
                if let Some(posters) = self.controller.apply_movies(generation, result) {
                    self.dispatcher.fetch_posters(posters);
                }
                if current {
                    self.selected = 0;
                    self.status_msg = match self.controller.last_error() {
                        Some(_) => "Server error".to_string(),
                        None => format!(
                            "Page {} of {}",
                            self.controller.page() + 1,
                            self.controller.total_pages().max(1)
                        ),
                    };
                }
            }
            FetchEvent::Posters { generation, result } => {
                self.controller.apply_posters(generation, result);
            }
            FetchEvent::Genres(Ok(genres)) => {
                info!(count = genres.len(), "genres loaded");
                self.genre_options = GenreOptions::Loaded(genres);
            }
            FetchEvent::Genres(Err(e)) => {
                warn!("genre fetch failed: {e}");
                self.genre_options = GenreOptions::Failed(e.user_message());
            }
        }
    }

    pub fn cycle_sort_field(&mut self) {
        let next = self.controller.query().sort_field.next();
        self.set_sort(next);
    }

    pub fn set_sort(&mut self, field: SortField) {
        let request = self.controller.set_sort(field);
        self.dispatcher.fetch_movies(request);
        self.status_msg = format!("Sorting by {}", field.label());
    }

    /// Selecting the order that is already active does nothing.
    pub fn set_order(&mut self, order: SortOrder) {
        if self.controller.query().sort_order == order {
            return;
        }
        let request = self.controller.set_order(order);
        self.dispatcher.fetch_movies(request);
        self.status_msg = order.label().to_string();
    }

    pub fn toggle_order(&mut self) {
        let order = match self.controller.query().sort_order {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        };
        self.set_order(order);
    }

    pub fn apply_filters(&mut self, criteria: FilterCriteria) {
        let request = self.controller.set_filters(criteria);
        self.dispatcher.fetch_movies(request);
    }

    /// Drop all committed filters.
    pub fn clear_filters(&mut self) {
        if self.controller.query().filters.is_empty() || self.controller.is_loading_movies() {
            return;
        }
        self.apply_filters(FilterCriteria::default());
        self.editor.reset_to(&self.controller.query().filters);
        self.status_msg = "Filters cleared".to_string();
    }

    // ── Filter editor ──

    /// Opening discards any unsubmitted draft.
    pub fn open_editor(&mut self) {
        self.editor.reset_to(&self.controller.query().filters);
        self.input_mode = InputMode::Editing;
    }

    pub fn close_editor(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn submit_editor(&mut self) {
        let committed = self.controller.query().filters.clone();
        if let Some(criteria) = self.editor.submit(&committed, self.controller.is_loading_movies()) {
            self.apply_filters(criteria);
            self.input_mode = InputMode::Normal;
            self.status_msg = "Filtering...".to_string();
        }
    }

    // ── Pagination ──

    pub fn can_go_back(&self) -> bool {
        !self.controller.is_busy() && self.controller.page() > 0
    }

    pub fn can_go_forward(&self) -> bool {
        !self.controller.is_busy() && self.controller.page() + 1 < self.controller.total_pages()
    }

    fn go_to_page(&mut self, page: usize) {
        let request = self.controller.go_to_page(page);
        self.dispatcher.fetch_movies(request);
    }

    pub fn first_page(&mut self) {
        if self.can_go_back() {
            self.go_to_page(0);
        }
    }

    pub fn prev_page(&mut self) {
        if self.can_go_back() {
            self.go_to_page(self.controller.page() - 1);
        }
    }

    pub fn next_page(&mut self) {
        if self.can_go_forward() {
            self.go_to_page(self.controller.page() + 1);
        }
    }

    pub fn last_page(&mut self) {
        if self.can_go_forward() {
            self.go_to_page(self.controller.total_pages() - 1);
        }
    }

    // ── Grid selection ──

    pub fn selected_movie(&self) -> Option<&Movie> {
        self.controller.movies().get(self.selected)
    }

    pub fn select_right(&mut self) {
        if self.selected + 1 < self.controller.movies().len() {
            self.selected += 1;
        }
    }

    pub fn select_left(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_down(&mut self) {
        let target = self.selected + self.columns;
        if target < self.controller.movies().len() {
            self.selected = target;
        }
    }

    pub fn select_up(&mut self) {
        if self.selected >= self.columns {
            self.selected -= self.columns;
        }
    }

    pub fn open_detail(&mut self) {
        if self.selected_movie().is_some() {
            self.view = View::Detail;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MoviesPage;
    use crate::dispatch::fake::FakeCatalog;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc::UnboundedReceiver;

    async fn settle(app: &mut App<FakeCatalog>, rx: &mut UnboundedReceiver<FetchEvent>) {
        while app.controller.is_busy() || matches!(app.genre_options, GenreOptions::Loading) {
            let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
                .await
                .expect("fetch timed out")
                .expect("channel closed");
            app.handle_fetch_event(event);
        }
    }

    fn app_with(api: FakeCatalog) -> (App<FakeCatalog>, UnboundedReceiver<FetchEvent>, Arc<FakeCatalog>) {
        let api = Arc::new(api);
        let (dispatcher, rx) = Dispatcher::new(Arc::clone(&api));
        (App::new(dispatcher), rx, api)
    }

    #[tokio::test]
    async fn init_loads_first_page_and_genres() {
        let (mut app, mut rx, api) = app_with(FakeCatalog::with_count(40, 6));
        app.init();
        settle(&mut app, &mut rx).await;

        assert_eq!(app.controller.movies().len(), 6);
        assert_eq!(app.controller.total_pages(), 3);
        assert!(app.controller.movies().iter().all(|m| m.has_poster()));
        assert_eq!(api.poster_calls.lock().unwrap().len(), 1);
        assert_eq!(app.genre_options.available().len(), 3);
    }

    #[tokio::test]
    async fn jumping_pages_cancels_the_slow_request() {
        let mut api = FakeCatalog::with_count(100, 2);
        api.page_delays.insert(1, Duration::from_millis(200));
        let (mut app, mut rx, _api) = app_with(api);
        app.init();
        settle(&mut app, &mut rx).await;

        app.next_page();
        // page 1 is still in flight; jump straight to page 2
        let request = app.controller.go_to_page(2);
        app.dispatcher.fetch_movies(request);
        settle(&mut app, &mut rx).await;
        tokio::time::sleep(Duration::from_millis(300)).await;
        while let Ok(event) = rx.try_recv() {
            app.handle_fetch_event(event);
        }

        assert_eq!(app.controller.page(), 2);
        assert!(app.controller.movies().iter().all(|m| m.tconst.starts_with("p2-")));
    }

    #[tokio::test]
    async fn stale_movies_event_is_ignored() {
        let (mut app, mut rx, _api) = app_with(FakeCatalog::with_count(40, 4));
        app.init();
        settle(&mut app, &mut rx).await;
        let stale = app.controller.generation();

        app.next_page();
        settle(&mut app, &mut rx).await;
        app.handle_fetch_event(FetchEvent::Movies {
            generation: stale,
            result: Ok(MoviesPage {
                movies: vec![],
                count: 0,
            }),
        });

        assert_eq!(app.controller.page(), 1);
        assert_eq!(app.controller.total_pages(), 3);
        assert!(app.controller.movies().iter().all(|m| m.tconst.starts_with("p1-")));
    }

    #[tokio::test]
    async fn filters_can_be_submitted_during_poster_pass() {
        let mut api = FakeCatalog::with_count(40, 4);
        api.poster_delay = Some(Duration::from_millis(500));
        let (mut app, mut rx, api) = app_with(api);
        app.init();
        while app.controller.is_loading_movies() || matches!(app.genre_options, GenreOptions::Loading) {
            let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
                .await
                .expect("fetch timed out")
                .expect("channel closed");
            app.handle_fetch_event(event);
        }
        assert!(app.controller.is_loading_posters());

        app.open_editor();
        app.editor.input_char('x');
        app.submit_editor();

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.controller.query().filters.title.as_deref(), Some("x"));
        settle(&mut app, &mut rx).await;
        assert_eq!(api.movie_calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn failed_fetch_shows_server_error_and_skips_posters() {
        let mut api = FakeCatalog::with_count(40, 4);
        api.fail_movies = true;
        let (mut app, mut rx, api) = app_with(api);
        app.init();
        settle(&mut app, &mut rx).await;

        assert!(app.controller.movies().is_empty());
        assert_eq!(app.controller.total_pages(), 0);
        assert_eq!(app.controller.last_error(), Some("database offline"));
        assert!(api.poster_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn genre_failure_is_reported_inline() {
        let mut api = FakeCatalog::with_count(1, 1);
        api.fail_genres = true;
        let (mut app, mut rx, _api) = app_with(api);
        app.init();
        settle(&mut app, &mut rx).await;

        assert!(matches!(app.genre_options, GenreOptions::Failed(_)));
        assert_eq!(app.controller.movies().len(), 1);
    }

    #[tokio::test]
    async fn submitting_editor_swaps_and_resets_page() {
        let (mut app, mut rx, api) = app_with(FakeCatalog::with_count(100, 2));
        app.init();
        settle(&mut app, &mut rx).await;
        app.last_page();
        settle(&mut app, &mut rx).await;
        assert_eq!(app.controller.page(), 5);

        app.open_editor();
        app.editor.runtime_min = "120".to_string();
        app.editor.runtime_max = "90".to_string();
        app.submit_editor();
        settle(&mut app, &mut rx).await;

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.controller.page(), 0);
        assert_eq!(app.controller.query().filters.runtime_min, Some(90));
        assert_eq!(app.controller.query().filters.runtime_max, Some(120));
        let last = api.movie_calls.lock().unwrap().last().cloned().unwrap();
        assert_eq!(last.runtime_min, Some(90));
        assert_eq!(last.page, 0);
    }

    #[tokio::test]
    async fn pagination_is_blocked_at_edges_and_while_loading() {
        let (mut app, mut rx, api) = app_with(FakeCatalog::with_count(36, 2));
        app.init();
        assert!(!app.can_go_forward());
        settle(&mut app, &mut rx).await;

        assert!(!app.can_go_back());
        app.prev_page();
        app.next_page();
        assert!(!app.can_go_forward());
        settle(&mut app, &mut rx).await;
        assert_eq!(app.controller.page(), 1);
        app.next_page();
        assert_eq!(api.movie_calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn same_order_is_a_no_op() {
        let (mut app, mut rx, api) = app_with(FakeCatalog::with_count(10, 2));
        app.init();
        settle(&mut app, &mut rx).await;
        app.set_order(SortOrder::Asc);
        assert_eq!(api.movie_calls.lock().unwrap().len(), 1);
        app.toggle_order();
        settle(&mut app, &mut rx).await;
        assert_eq!(app.controller.query().sort_order, SortOrder::Desc);
    }

    #[tokio::test]
    async fn selection_moves_by_rows() {
        let (mut app, mut rx, _api) = app_with(FakeCatalog::with_count(18, 7));
        app.init();
        settle(&mut app, &mut rx).await;
        app.columns = 3;

        app.select_down();
        assert_eq!(app.selected, 3);
        app.select_down();
        assert_eq!(app.selected, 6);
        app.select_down();
        assert_eq!(app.selected, 6);
        app.select_left();
        app.select_up();
        assert_eq!(app.selected, 2);
        app.open_detail();
        assert_eq!(app.view, View::Detail);
        assert_eq!(app.selected_movie().map(|m| m.tconst.as_str()), Some("p0-2"));
    }
}
