use std::fmt;

/// Error returned by the failing forms of insert and remove.
///
/// The `try_*` variants of these operations report the same conditions as
/// `false` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// An element with the same key is already stored.
    DuplicateKey,
    /// No element with the requested key is stored.
    KeyNotFound,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DuplicateKey => write!(f, "key is already present"),
            Error::KeyNotFound => write!(f, "key is not present"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn test_display() {
        assert_eq!(Error::DuplicateKey.to_string(), "key is already present");
        assert_eq!(Error::KeyNotFound.to_string(), "key is not present");
    }

    #[test]
    fn test_boxed() {
        let err: Box<dyn std::error::Error> = Box::new(Error::KeyNotFound);
        assert_eq!(err.to_string(), "key is not present");
    }
}
