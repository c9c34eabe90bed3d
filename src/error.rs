use thiserror::Error;

/// Errors surfaced by the loading and transform layers.
///
/// Data-quality gaps (an entity the classifier does not know, a missing
/// weight) are not errors: those rows are filtered out by the chart
/// builders. Only structural problems end up here.
#[derive(Debug, Error)]
pub enum Error {
    #[error("missing required column `{column}` in table `{table}`")]
    Schema { table: String, column: String },

    #[error("pivot would fold multiple values into one cell (index {index:?}, column `{column}`)")]
    ReshapeConflict { index: Vec<String>, column: String },

    #[error("invalid bin definition: {0}")]
    BinDefinition(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
