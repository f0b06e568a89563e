#[derive(Debug, thiserror::Error)]
pub enum MarkupError {
    #[error("Markup is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("Invalid formatted text JSON: {0}")]
    Json(#[from] serde_json::Error),
}
