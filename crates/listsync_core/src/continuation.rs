/// Where the next page comes from, within one epoch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Continuation {
    /// No page has been applied yet; the next request is page 1.
    #[default]
    FirstPage,
    /// Server-supplied locator for the next page, stored verbatim.
    Next(String),
    /// The last page has been applied. Triggers are no-ops until a restart.
    Exhausted,
}

impl Continuation {
    /// Derives the continuation from an envelope's `next` field.
    pub fn from_next(next: Option<String>) -> Self {
        match next {
            Some(locator) if !locator.trim().is_empty() => Self::Next(locator),
            _ => Self::Exhausted,
        }
    }

    pub fn has_more(&self) -> bool {
        !matches!(self, Self::Exhausted)
    }

    pub fn next_locator(&self) -> Option<&str> {
        match self {
            Self::Next(locator) => Some(locator),
            _ => None,
        }
    }
}
