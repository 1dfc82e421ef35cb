use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WarpError {
  #[error("argument `{name}` has invalid bounds: min={min}, default={default}, max={max}")]
  InvalidArgumentBounds {
    name: String,
    min: f64,
    default: f64,
    max: f64,
  },
  #[error("adapter `{adapter}` has no argument named `{name}`")]
  UnknownArgument { adapter: String, name: String },
  #[error("expected {expected} argument values, found {found}")]
  ArgumentCountMismatch { expected: usize, found: usize },
  #[error("point count must be greater than zero")]
  ZeroPointCount,
  #[error("invalid histogram grid size {width}x{height}")]
  InvalidGridSize { width: usize, height: usize },
  #[error("histogram size mismatch: observed is {observed:?}, expected is {expected:?}")]
  HistogramMismatch {
    observed: (usize, usize),
    expected: (usize, usize),
  },
  #[error("significance level must be in (0, 1), found {0}")]
  InvalidSignificance(f64),
  #[error("invalid test config: {0}")]
  Config(String),
  #[error("statistics error: {0}")]
  Statistics(String),
}
