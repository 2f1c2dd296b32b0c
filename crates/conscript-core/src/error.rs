use thiserror::Error;

/// Failures a method setter can raise while coercing a script argument.
///
/// Every variant maps to the original dialect's behavior of catching a
/// `TypeError`/`ValueError` at the point a setter tries to use its
/// argument and re-raising it as a single opaque method failure; the
/// interpreter never treats these as fatal (see [`crate::interpreter`]).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("missing required argument")]
    MissingArgument,
    #[error("invalid integer value: {0:?}")]
    IntParse(String),
    #[error("invalid floating point value: {0:?}")]
    FloatParse(String),
    #[error("invalid boolean value: {0:?}")]
    BoolParse(String),
    #[error("unknown prediction mode: {0:?}")]
    PredictionMode(String),
}
