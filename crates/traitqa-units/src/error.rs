//! Error types for unit and number handling

/// Failure to read a token as a real number
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NumberError {
    /// Token was empty or whitespace
    #[error("empty numeric token")]
    Empty,

    /// Token is not a decimal number
    #[error("not a number: '{0}'")]
    Invalid(String),

    /// Token parsed but is infinite or NaN
    #[error("non-finite number: '{0}'")]
    NonFinite(String),
}

/// Failure to map a symbol or name onto a known value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SymbolError {
    /// Not one of the eight supported unit symbols
    #[error("unknown unit symbol: '{0}'")]
    UnknownUnit(String),

    /// Not a supported trait kind
    #[error("unknown trait kind: '{0}'")]
    UnknownTrait(String),

    /// Measurement text holds a token that is neither a number nor a sentinel
    #[error("malformed measurement: {0}")]
    Measurement(#[from] NumberError),

    /// Measurement text holds more than two numbers
    #[error("measurement holds {0} values, at most 2 allowed")]
    TooManyValues(usize),
}
