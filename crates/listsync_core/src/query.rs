use std::fmt;

use url::form_urlencoded;

/// Query parameter carrying the signed ordering key.
pub const ORDERING_PARAM: &str = "ordering";
/// Query parameter carrying the search term.
pub const SEARCH_PARAM: &str = "search";
/// Query parameter carrying the process scope.
pub const PROCESS_PARAM: &str = "process";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Ordering key as the backend understands it: a field name, with a leading
/// `-` meaning descending.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ordering {
    field: String,
    direction: Direction,
}

impl Ordering {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Descending,
        }
    }

    /// Parses a signed key such as `name` or `-name`. Blank keys yield `None`.
    pub fn parse(key: &str) -> Option<Self> {
        let key = key.trim();
        let (direction, field) = match key.strip_prefix('-') {
            Some(rest) => (Direction::Descending, rest.trim()),
            None => (Direction::Ascending, key),
        };
        if field.is_empty() {
            return None;
        }
        Some(Self {
            field: field.to_string(),
            direction,
        })
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn reversed(&self) -> Self {
        let direction = match self.direction {
            Direction::Ascending => Direction::Descending,
            Direction::Descending => Direction::Ascending,
        };
        Self {
            field: self.field.clone(),
            direction,
        }
    }
}

impl fmt::Display for Ordering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Direction::Ascending => write!(f, "{}", self.field),
            Direction::Descending => write!(f, "-{}", self.field),
        }
    }
}

/// Explicit process scope threaded from the host into every list under one product.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProcessContext {
    pub process_id: String,
}

impl ProcessContext {
    pub fn new(process_id: impl Into<String>) -> Self {
        Self {
            process_id: process_id.into(),
        }
    }
}

/// The identifying parameters of one list epoch. Any change restarts from page 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ListQuery {
    pub base_endpoint: String,
    pub ordering: Option<Ordering>,
    pub search: Option<String>,
    pub process: Option<ProcessContext>,
}

impl ListQuery {
    pub fn new(base_endpoint: impl Into<String>) -> Self {
        Self {
            base_endpoint: base_endpoint.into(),
            ..Self::default()
        }
    }

    pub fn with_ordering(mut self, ordering: Option<Ordering>) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = normalize_search(search);
        self
    }

    pub fn with_process(mut self, process: Option<ProcessContext>) -> Self {
        self.process = process;
        self
    }

    /// Renders the locator for the first page of this query.
    pub fn first_page_locator(&self) -> String {
        let mut params = form_urlencoded::Serializer::new(String::new());
        if let Some(ordering) = &self.ordering {
            params.append_pair(ORDERING_PARAM, &ordering.to_string());
        }
        if let Some(search) = &self.search {
            params.append_pair(SEARCH_PARAM, search);
        }
        if let Some(process) = &self.process {
            params.append_pair(PROCESS_PARAM, &process.process_id);
        }
        let encoded = params.finish();
        if encoded.is_empty() {
            return self.base_endpoint.clone();
        }
        let separator = if !self.base_endpoint.contains('?') {
            "?"
        } else if self.base_endpoint.ends_with('?') || self.base_endpoint.ends_with('&') {
            ""
        } else {
            "&"
        };
        format!("{}{}{}", self.base_endpoint, separator, encoded)
    }
}

/// Blank search terms are equivalent to no search.
pub fn normalize_search(search: Option<String>) -> Option<String> {
    search.and_then(|term| {
        let trimmed = term.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
