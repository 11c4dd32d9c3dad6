/// Convenience result type used across undulate.
pub type UndulateResult<T> = Result<T, UndulateError>;

/// Top-level error taxonomy.
///
/// Every variant is fatal for the draw that raised it: the diagram is either
/// complete or not produced at all.
#[derive(thiserror::Error, Debug)]
pub enum UndulateError {
    /// A wavelane references a character that no symbol family registered.
    #[error("unknown symbol: '{symbol}' at position {position} of signal '{signal}'")]
    UnknownSymbol {
        /// Name of the offending wavelane.
        signal: String,
        /// The unregistered character.
        symbol: char,
        /// Index of the character in the expanded symbol string.
        position: usize,
    },

    /// A wave string that is well-formed character-wise but cannot be compiled.
    #[error("invalid wave '{signal}': {message}")]
    InvalidWave {
        /// Name of the offending wavelane.
        signal: String,
        /// What went wrong.
        message: String,
    },

    /// Lexing, parsing, or evaluation failure in the sandboxed expression language.
    #[error("expression error: {0}")]
    Expression(String),

    /// An edge or annotation that cannot be resolved.
    #[error("annotation error: {0}")]
    Annotation(String),

    /// Invalid register description (overlapping or unsupported fields).
    #[error("register error: {0}")]
    Register(String),

    /// Invalid user-provided diagram data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl UndulateError {
    /// Build a [`UndulateError::InvalidWave`] value.
    pub fn invalid_wave(signal: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidWave {
            signal: signal.into(),
            message: message.into(),
        }
    }

    /// Build a [`UndulateError::Expression`] value.
    pub fn expression(msg: impl Into<String>) -> Self {
        Self::Expression(msg.into())
    }

    /// Build a [`UndulateError::Annotation`] value.
    pub fn annotation(msg: impl Into<String>) -> Self {
        Self::Annotation(msg.into())
    }

    /// Build a [`UndulateError::Register`] value.
    pub fn register(msg: impl Into<String>) -> Self {
        Self::Register(msg.into())
    }

    /// Build a [`UndulateError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`UndulateError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Process exit code reported by the command line front-end.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnknownSymbol { .. } | Self::InvalidWave { .. } | Self::Annotation(_) => 3,
            Self::Register(msg) if msg.contains("overlap") => 6,
            Self::Register(_) => 5,
            _ => 1,
        }
    }
}

impl From<serde_json::Error> for UndulateError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
