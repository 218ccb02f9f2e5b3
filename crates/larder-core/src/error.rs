use thiserror::Error;

/// Errors that abort a suggestion request.
#[derive(Debug, Error)]
pub enum SuggestionError {
    #[error("Recipe '{0}' has no source")]
    MissingSource(String),

    #[error("Recipe index {0} is outside the catalog")]
    UnknownRecipe(usize),
}
