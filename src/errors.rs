/// Domain-specific error types for the parlay engine.
/// The core pipeline (generate -> evaluate -> rank) is total: degenerate
/// numeric inputs degrade to zero-valued outputs, and empty result sets
/// are normal return values. The only hard failure points are selection
/// construction and config loading.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid price for {label}: {price} (must be > 1.0)")]
    InvalidPrice { label: String, price: f64 },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("config error: {0}")]
    Config(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
