use thiserror::Error;

/// Custom Result type for minirdb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for minirdb
///
/// Every variant aborts only the statement that raised it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Statement grammar not recognized
    #[error("syntax error: {0}")]
    Syntax(String),
    /// Unknown table or column, duplicate table, multiple primary keys
    #[error("schema error: {0}")]
    Schema(String),
    /// Not-null, primary key or length violation
    #[error("constraint violation: {0}")]
    Constraint(String),
    /// Value cannot be coerced to the column type
    #[error("type error: {0}")]
    Type(String),
    /// Metadata or row file could not be read or written
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Persistence(value.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::Persistence(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::Schema("table 'users' does not exist".into()).to_string(),
            "schema error: table 'users' does not exist"
        );
        assert_eq!(
            Error::Constraint("column 'id' cannot be null".into()).to_string(),
            "constraint violation: column 'id' cannot be null"
        );
    }

    #[test]
    fn test_io_error_is_persistence() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(Error::from(io), Error::Persistence(_)));
    }
}
