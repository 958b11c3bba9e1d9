use std::collections::BTreeSet;

pub const RUNTIME_NOT_A_NUMBER: &str = "Please enter a number.";
pub const RUNTIME_BELOW_MINIMUM: &str = "Value must be greater than or equal to 1.";

/// Committed filter criteria driving the movie query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    pub title: Option<String>,
    pub runtime_min: Option<u32>,
    pub runtime_max: Option<u32>,
    /// Empty means no genre restriction.
    pub genres: BTreeSet<String>,
}

impl FilterCriteria {
    /// Drop an empty title and order the runtime bounds.
    pub fn normalized(mut self) -> Self {
        if self.title.as_deref().is_some_and(str::is_empty) {
            self.title = None;
        }
        if let (Some(min), Some(max)) = (self.runtime_min, self.runtime_max) {
            if min > max {
                self.runtime_min = Some(max);
                self.runtime_max = Some(min);
            }
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.runtime_min.is_none()
            && self.runtime_max.is_none()
            && self.genres.is_empty()
    }
}

/// Genre choices offered by the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenreOptions {
    Loading,
    Loaded(Vec<String>),
    Failed(String),
}

impl GenreOptions {
    pub fn available(&self) -> &[String] {
        match self {
            GenreOptions::Loaded(list) => list,
            _ => &[],
        }
    }
}

/// Which editor input has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorField {
    Title,
    RuntimeMin,
    RuntimeMax,
    Genres,
}

impl EditorField {
    pub fn next(self) -> Self {
        match self {
            Self::Title => Self::RuntimeMin,
            Self::RuntimeMin => Self::RuntimeMax,
            Self::RuntimeMax => Self::Genres,
            Self::Genres => Self::Title,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Title => Self::Genres,
            Self::RuntimeMin => Self::Title,
            Self::RuntimeMax => Self::RuntimeMin,
            Self::Genres => Self::RuntimeMax,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::RuntimeMin => "Runtime in min (from)",
            Self::RuntimeMax => "Runtime in min (to)",
            Self::Genres => "Genres",
        }
    }
}

/// Draft filter inputs, independent from the committed criteria until submit.
#[derive(Debug, Clone)]
pub struct FilterEditor {
    pub title: String,
    pub runtime_min: String,
    pub runtime_max: String,
    pub runtime_min_error: Option<String>,
    pub runtime_max_error: Option<String>,
    pub genres: BTreeSet<String>,
    pub focus: EditorField,
    pub genre_cursor: usize,
}

impl Default for FilterEditor {
    fn default() -> Self {
        Self {
            title: String::new(),
            runtime_min: String::new(),
            runtime_max: String::new(),
            runtime_min_error: None,
            runtime_max_error: None,
            genres: BTreeSet::new(),
            focus: EditorField::Title,
            genre_cursor: 0,
        }
    }
}

fn parse_runtime(text: &str) -> Result<Option<u32>, &'static str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<u32>() {
        Ok(0) => Err(RUNTIME_BELOW_MINIMUM),
        Ok(v) => Ok(Some(v)),
        Err(_) => Err(RUNTIME_NOT_A_NUMBER),
    }
}

impl FilterEditor {
    /// Discard unsubmitted edits and mirror the committed criteria.
    pub fn reset_to(&mut self, committed: &FilterCriteria) {
        self.title = committed.title.clone().unwrap_or_default();
        self.runtime_min = committed.runtime_min.map(|v| v.to_string()).unwrap_or_default();
        self.runtime_max = committed.runtime_max.map(|v| v.to_string()).unwrap_or_default();
        self.runtime_min_error = None;
        self.runtime_max_error = None;
        self.genres = committed.genres.clone();
        self.focus = EditorField::Title;
        self.genre_cursor = 0;
    }

    pub fn input_char(&mut self, c: char) {
        match self.focus {
            EditorField::Title => self.title.push(c),
            EditorField::RuntimeMin => {
                self.runtime_min.push(c);
                self.runtime_min_error = None;
            }
            EditorField::RuntimeMax => {
                self.runtime_max.push(c);
                self.runtime_max_error = None;
            }
            EditorField::Genres => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            EditorField::Title => {
                self.title.pop();
            }
            EditorField::RuntimeMin => {
                self.runtime_min.pop();
                self.runtime_min_error = None;
            }
            EditorField::RuntimeMax => {
                self.runtime_max.pop();
                self.runtime_max_error = None;
            }
            EditorField::Genres => {}
        }
    }

    /// Add the genre if absent, remove it if present.
    pub fn toggle_genre(&mut self, genre: &str) {
        if !self.genres.remove(genre) {
            self.genres.insert(genre.to_string());
        }
    }

    pub fn toggle_genre_at_cursor(&mut self, options: &GenreOptions) {
        if let Some(genre) = options.available().get(self.genre_cursor).cloned() {
            self.toggle_genre(&genre);
        }
    }

    pub fn genre_cursor_next(&mut self, options: &GenreOptions) {
        let len = options.available().len();
        if len > 0 {
            self.genre_cursor = (self.genre_cursor + 1) % len;
        }
    }

    pub fn genre_cursor_prev(&mut self, options: &GenreOptions) {
        let len = options.available().len();
        if len > 0 {
            self.genre_cursor = (self.genre_cursor + len - 1) % len;
        }
    }

    /// True when at least one draft field differs from the committed criteria.
    pub fn is_dirty(&self, committed: &FilterCriteria) -> bool {
        let title_differs = if self.title.is_empty() {
            committed.title.as_deref().is_some_and(|t| !t.is_empty())
        } else {
            committed.title.as_deref() != Some(self.title.as_str())
        };
        let min_differs = parse_runtime(&self.runtime_min) != Ok(committed.runtime_min);
        let max_differs = parse_runtime(&self.runtime_max) != Ok(committed.runtime_max);

        title_differs || min_differs || max_differs || self.genres != committed.genres
    }

    pub fn can_submit(&self, committed: &FilterCriteria, is_loading: bool) -> bool {
        !is_loading && self.is_dirty(committed)
    }

    /// Validate, swap inverted runtime bounds in place, and emit the criteria.
    ///
    /// Returns `None` when submission is disabled or a runtime input is invalid;
    /// invalid inputs get a field-level message instead.
    pub fn submit(&mut self, committed: &FilterCriteria, is_loading: bool) -> Option<FilterCriteria> {
        if !self.can_submit(committed, is_loading) {
            return None;
        }

        let min = parse_runtime(&self.runtime_min);
        let max = parse_runtime(&self.runtime_max);
        self.runtime_min_error = min.err().map(str::to_string);
        self.runtime_max_error = max.err().map(str::to_string);
        let (Ok(mut runtime_min), Ok(mut runtime_max)) = (min, max) else {
            return None;
        };

        if let (Some(lo), Some(hi)) = (runtime_min, runtime_max) {
            if lo > hi {
                runtime_min = Some(hi);
                runtime_max = Some(lo);
                self.runtime_min = hi.to_string();
                self.runtime_max = lo.to_string();
            }
        }

        Some(
            FilterCriteria {
                title: Some(self.title.clone()),
                runtime_min,
                runtime_max,
                genres: self.genres.clone(),
            }
            .normalized(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor_with(title: &str, min: &str, max: &str) -> FilterEditor {
        FilterEditor {
            title: title.to_string(),
            runtime_min: min.to_string(),
            runtime_max: max.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn submit_swaps_inverted_runtime_bounds() {
        let mut editor = editor_with("", "120", "90");
        let criteria = editor.submit(&FilterCriteria::default(), false).unwrap();

        assert_eq!(criteria.runtime_min, Some(90));
        assert_eq!(criteria.runtime_max, Some(120));
        assert_eq!(editor.runtime_min, "90");
        assert_eq!(editor.runtime_max, "120");
    }

    #[test]
    fn submit_keeps_ordered_bounds() {
        let mut editor = editor_with("alien", "90", "");
        let criteria = editor.submit(&FilterCriteria::default(), false).unwrap();

        assert_eq!(criteria.title.as_deref(), Some("alien"));
        assert_eq!(criteria.runtime_min, Some(90));
        assert_eq!(criteria.runtime_max, None);
    }

    #[test]
    fn clean_draft_is_not_dirty() {
        let editor = FilterEditor::default();
        assert!(!editor.is_dirty(&FilterCriteria::default()));
        assert!(!editor.can_submit(&FilterCriteria::default(), false));
    }

    #[test]
    fn reset_draft_matches_committed() {
        let committed = FilterCriteria {
            title: Some("heat".to_string()),
            runtime_min: Some(60),
            runtime_max: None,
            genres: ["Crime".to_string()].into_iter().collect(),
        };
        let mut editor = editor_with("other", "1", "2");
        editor.reset_to(&committed);

        assert!(!editor.is_dirty(&committed));
        editor.toggle_genre("Drama");
        assert!(editor.is_dirty(&committed));
    }

    #[test]
    fn submit_disabled_while_loading() {
        let mut editor = editor_with("heat", "", "");
        assert!(editor.is_dirty(&FilterCriteria::default()));
        assert!(editor.submit(&FilterCriteria::default(), true).is_none());
    }

    #[test]
    fn genre_toggle_is_a_set() {
        let mut editor = FilterEditor::default();
        editor.toggle_genre("Drama");
        editor.toggle_genre("Comedy");
        editor.toggle_genre("Drama");
        assert_eq!(editor.genres.len(), 1);
        assert!(editor.genres.contains("Comedy"));
    }

    #[test]
    fn genre_selection_order_is_irrelevant() {
        let committed = FilterCriteria {
            genres: ["Comedy".to_string(), "Drama".to_string()].into_iter().collect(),
            ..Default::default()
        };
        let mut editor = FilterEditor::default();
        editor.toggle_genre("Drama");
        editor.toggle_genre("Comedy");
        assert!(!editor.is_dirty(&committed));
    }

    #[test]
    fn invalid_runtime_blocks_submit_with_messages() {
        let mut editor = editor_with("", "abc", "0");
        assert!(editor.submit(&FilterCriteria::default(), false).is_none());
        assert_eq!(editor.runtime_min_error.as_deref(), Some(RUNTIME_NOT_A_NUMBER));
        assert_eq!(editor.runtime_max_error.as_deref(), Some(RUNTIME_BELOW_MINIMUM));

        editor.focus = EditorField::RuntimeMin;
        editor.backspace();
        assert!(editor.runtime_min_error.is_none());
        assert!(editor.runtime_max_error.is_some());
    }

    #[test]
    fn empty_title_is_committed_as_absent() {
        let committed = FilterCriteria {
            title: Some("heat".to_string()),
            ..Default::default()
        };
        let mut editor = FilterEditor::default();
        let criteria = editor.submit(&committed, false).unwrap();
        assert_eq!(criteria.title, None);
        assert!(criteria.is_empty());
    }

    #[test]
    fn genre_cursor_wraps() {
        let options = GenreOptions::Loaded(vec!["A".to_string(), "B".to_string()]);
        let mut editor = FilterEditor::default();
        editor.genre_cursor_prev(&options);
        assert_eq!(editor.genre_cursor, 1);
        editor.genre_cursor_next(&options);
        assert_eq!(editor.genre_cursor, 0);
        editor.toggle_genre_at_cursor(&options);
        assert!(editor.genres.contains("A"));

        let failed = GenreOptions::Failed("offline".to_string());
        editor.toggle_genre_at_cursor(&failed);
        assert!(editor.genres.contains("A"));
    }
}
