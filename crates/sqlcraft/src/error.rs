//! Error types for sqlcraft

use thiserror::Error;

/// Result type alias for sqlcraft operations
pub type CraftResult<T> = Result<T, CraftError>;

/// Errors raised while configuring or composing a statement.
///
/// Almost every variant is a configuration error: it is reported while the
/// caller builds a [`Criteria`](crate::Criteria), before any SQL is rendered.
#[derive(Debug, Error)]
pub enum CraftError {
    /// A property or column name that the entity does not map.
    #[error("Unknown property '{property}' on entity '{entity}'")]
    UnknownProperty { entity: String, property: String },

    /// Optimistic locking requested on a column that is not a version column.
    #[error("Column '{column}' of entity '{entity}' is not an optimistic-lock version column")]
    NotVersionColumn { entity: String, column: String },

    /// The same column was assigned two different values.
    #[error("Conflicting assignment for column '{column}': '{old}' vs '{new}'")]
    ConflictingAssignment {
        column: String,
        old: String,
        new: String,
    },

    /// Operand shape does not match the operator arity.
    #[error("Invalid operand for '{symbol}': {message}")]
    InvalidOperand {
        symbol: &'static str,
        message: String,
    },

    /// A criteria handle that does not belong to the arena.
    #[error("Unknown criteria handle #{0}")]
    UnknownCriteria(usize),

    /// A join that cannot be expressed (e.g. joining into an UPDATE).
    #[error("Unsupported join: {0}")]
    UnsupportedJoin(String),

    /// UPDATE without any SET assignment.
    #[error("UPDATE on '{0}' requires at least one SET assignment")]
    MissingSet(String),

    /// DELETE without WHERE while deleting the whole table is not allowed.
    #[error("DELETE on '{0}' requires a WHERE clause (call allow_delete_all to override)")]
    MissingWhere(String),

    /// Unresolved placeholder in strict template mode.
    #[error("Template error: {0}")]
    Template(String),

    /// Validation error (identifiers, metadata)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration file error
    #[error("Config error: {0}")]
    Config(String),
}

impl CraftError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an unknown property error
    pub fn unknown_property(entity: impl Into<String>, property: impl Into<String>) -> Self {
        Self::UnknownProperty {
            entity: entity.into(),
            property: property.into(),
        }
    }

    /// Create an invalid operand error
    pub fn invalid_operand(symbol: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidOperand {
            symbol,
            message: message.into(),
        }
    }

    /// Check if this error was raised while configuring a criteria.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Self::Template(_) | Self::Config(_))
    }

    /// Check if this is an unknown property error
    pub fn is_unknown_property(&self) -> bool {
        matches!(self, Self::UnknownProperty { .. })
    }

    /// Check if this is a conflicting assignment error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::ConflictingAssignment { .. })
    }
}

impl From<toml::de::Error> for CraftError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
