/// Errors surfaced by the crate's fallible operations.
///
/// Per-word decode failures are deliberately not represented here: they are
/// recovered inside the aggregation loop (see
/// [`NBestStep::Failed`](crate::decoder::NBestStep)) and never reach the
/// batch caller.
#[derive(thiserror::Error, Debug)]
pub enum PronError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed lexicon {source_name}, line {line}: {message}")]
    LexiconParse {
        source_name: String,
        line: usize,
        message: String,
    },
    #[error("unknown language code '{0}'. Call language_codes() to see registered languages.")]
    UnknownLanguage(String),
    #[error("invalid aggregation policy: {0}")]
    InvalidPolicy(String),
}
