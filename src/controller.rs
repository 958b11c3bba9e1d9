//! Query state and fetch-cycle bookkeeping for the movie grid.
//!
//! Every action bumps a generation counter and hands back a request tagged
//! with it. Completions carrying any other generation are dropped, so a slow
//! response can never overwrite the result of a later action.

use crate::api::{ApiError, Movie, MoviePoster, MovieQuery, MoviesPage};
use crate::filters::FilterCriteria;
use std::collections::HashMap;
use tracing::{debug, error, info, warn};

/// Fixed server-side page size.
pub const PAGE_SIZE: u64 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Title,
    ReleaseYear,
    Runtime,
    Rating,
}

impl SortField {
    /// Column name the server sorts by.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::ReleaseYear => "release_year",
            Self::Runtime => "runtime",
            Self::Rating => "rating",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::ReleaseYear => "Year",
            Self::Runtime => "Runtime",
            Self::Rating => "Rating",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Title => Self::ReleaseYear,
            Self::ReleaseYear => Self::Runtime,
            Self::Runtime => Self::Rating,
            Self::Rating => Self::Title,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Asc => "Ascending",
            Self::Desc => "Descending",
        }
    }
}

/// The committed filters, sort and page that drive the primary fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub filters: FilterCriteria,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
    pub page: usize,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            filters: FilterCriteria::default(),
            sort_field: SortField::Title,
            sort_order: SortOrder::Asc,
            page: 0,
        }
    }
}

impl QueryState {
    pub fn sort_param(&self) -> String {
        format!("{} {}", self.sort_field.as_str(), self.sort_order.as_str())
    }

    pub fn to_movie_query(&self) -> MovieQuery {
        MovieQuery {
            title: self.filters.title.clone(),
            genres: self.filters.genres.iter().cloned().collect(),
            runtime_min: self.filters.runtime_min,
            runtime_max: self.filters.runtime_max,
            sort: self.sort_param(),
            page: self.page,
        }
    }
}

/// Primary fetch to run for a given cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoviesRequest {
    pub generation: u64,
    pub query: MovieQuery,
}

/// Poster backfill to run for a given cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostersRequest {
    pub generation: u64,
    pub ids: Vec<String>,
}

/// `ceil(count / PAGE_SIZE)`
pub fn total_pages(count: u64) -> usize {
    count.div_ceil(PAGE_SIZE) as usize
}

#[derive(Debug, Default)]
pub struct PageController {
    query: QueryState,
    generation: u64,
    movies: Vec<Movie>,
    total_pages: usize,
    is_loading_movies: bool,
    is_loading_posters: bool,
    last_error: Option<String>,
}

impl PageController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn page(&self) -> usize {
        self.query.page
    }

    pub fn is_loading_movies(&self) -> bool {
        self.is_loading_movies
    }

    pub fn is_loading_posters(&self) -> bool {
        self.is_loading_posters
    }

    pub fn is_busy(&self) -> bool {
        self.is_loading_movies || self.is_loading_posters
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Initial fetch with the default query.
    pub fn start(&mut self) -> MoviesRequest {
        self.begin_primary_fetch()
    }

    pub fn set_sort(&mut self, field: SortField) -> MoviesRequest {
        self.query.sort_field = field;
        self.query.page = 0;
        self.begin_primary_fetch()
    }

    pub fn set_order(&mut self, order: SortOrder) -> MoviesRequest {
        self.query.sort_order = order;
        self.query.page = 0;
        self.begin_primary_fetch()
    }

    pub fn set_filters(&mut self, criteria: FilterCriteria) -> MoviesRequest {
        self.query.filters = criteria;
        self.query.page = 0;
        self.begin_primary_fetch()
    }

    /// Caller guarantees `page < total_pages`.
    pub fn go_to_page(&mut self, page: usize) -> MoviesRequest {
        self.query.page = page;
        self.begin_primary_fetch()
    }

    fn begin_primary_fetch(&mut self) -> MoviesRequest {
        self.generation += 1;
        self.is_loading_movies = true;
        // Any poster pass still in flight belongs to a superseded cycle.
        self.is_loading_posters = false;
        self.last_error = None;

        debug!(generation = self.generation, sort = %self.query.sort_param(), page = self.query.page, "primary fetch");
        MoviesRequest {
            generation: self.generation,
            query: self.query.to_movie_query(),
        }
    }

    /// Apply a primary fetch completion. Returns the poster backfill to run, if any.
    pub fn apply_movies(
        &mut self,
        generation: u64,
        result: Result<MoviesPage, ApiError>,
    ) -> Option<PostersRequest> {
        if generation != self.generation {
            debug!(generation, current = self.generation, "discarding stale movie page");
            return None;
        }

        let follow_up = match result {
            Ok(page) => {
                info!(count = page.count, returned = page.movies.len(), "movies loaded");
                self.movies = page.movies;
                self.total_pages = total_pages(page.count);
                self.last_error = None;
                self.begin_poster_pass()
            }
            Err(e) => {
                error!("movie fetch failed: {e}");
                self.movies.clear();
                self.total_pages = 0;
                self.last_error = Some(e.user_message());
                None
            }
        };

        self.is_loading_movies = false;
        follow_up
    }

    fn begin_poster_pass(&mut self) -> Option<PostersRequest> {
        self.is_loading_posters = true;
        let ids: Vec<String> = self
            .movies
            .iter()
            .filter(|m| !m.has_poster())
            .map(|m| m.tconst.clone())
            .collect();

        if ids.is_empty() {
            self.is_loading_posters = false;
            return None;
        }
        Some(PostersRequest {
            generation: self.generation,
            ids,
        })
    }

    /// Apply a poster backfill completion. Failures leave posters absent.
    pub fn apply_posters(&mut self, generation: u64, result: Result<Vec<MoviePoster>, ApiError>) {
        if generation != self.generation {
            debug!(generation, current = self.generation, "discarding stale posters");
            return;
        }

        match result {
            Ok(posters) => {
                let found: HashMap<String, String> = posters
                    .into_iter()
                    .filter_map(|p| match p.poster {
                        Some(url) if !url.is_empty() => Some((p.tconst, url)),
                        _ => None,
                    })
                    .collect();
                debug!(found = found.len(), "posters loaded");

                self.movies = std::mem::take(&mut self.movies)
                    .into_iter()
                    .map(|mut movie| {
                        if let Some(url) = found.get(&movie.tconst) {
                            movie.poster = Some(url.clone());
                        }
                        movie
                    })
                    .collect();
            }
            Err(e) => {
                warn!("poster fetch failed, keeping placeholders: {e}");
            }
        }

        self.is_loading_posters = false;
    }
}
