use std::sync::Arc;

/// The result of fetching metrics for a single tracked item.
#[derive(Debug, Clone)]
pub enum FetchOutcome<T> {
    /// The fetch succeeded and data was found.
    Found(T),

    /// The tracked item does not exist at its source.
    NotFound,

    /// An error occurred while fetching this item.
    Error(Arc<ohno::AppError>),
}

impl<T> FetchOutcome<T> {
    /// Returns `true` if the outcome is `Found`.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Returns a reference to the contained data if `Found`, otherwise `None`.
    #[must_use]
    pub const fn as_found(&self) -> Option<&T> {
        match self {
            Self::Found(data) => Some(data),
            _ => None,
        }
    }
}
