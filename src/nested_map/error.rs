use std::error;
use std::fmt;
use std::result;

/// Convenience `Error` enum for `nested_map`.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// No record exists for the key and lookup.
    KeyNotFound(String),
    /// More than one record matches the key and lookup.
    Ambiguous {
        /// Description of the failed lookup.
        message: String,
        /// The parent paths of the matching records.
        candidates: Vec<String>,
    },
    /// The lookup itself is malformed, such as an unknown search mode.
    InvalidLookup(String),
    /// A record with the requested key already exists at the target location.
    KeyExists(String),
}

impl Error {
    /// Downgrades an `Ambiguous` error to `KeyNotFound`, keeping the candidates in the message.
    /// Other errors are returned unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use nested_collections::nested_map::{Error, Lookup, NestedMap};
    ///
    /// let mut map: NestedMap<&str, u32> = NestedMap::new();
    /// map.add("port", 80, vec![0], vec![]);
    /// map.add("port", 22, vec![1, 0], vec!["ssh"]);
    ///
    /// let err = map.find(&"port", Lookup::Unique).unwrap_err();
    /// assert!(err.is_ambiguous());
    /// assert!(err.into_key_not_found().is_key_not_found());
    /// ```
    pub fn into_key_not_found(self) -> Error {
        match self {
            Error::Ambiguous {
                message,
                candidates,
            } => Error::KeyNotFound(format!("{} (candidates: {})", message, candidates.join(", "))),
            err => err,
        }
    }

    pub fn is_key_not_found(&self) -> bool {
        match self {
            Error::KeyNotFound(_) => true,
            _ => false,
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        match self {
            Error::Ambiguous { .. } => true,
            _ => false,
        }
    }

    pub fn is_invalid_lookup(&self) -> bool {
        match self {
            Error::InvalidLookup(_) => true,
            _ => false,
        }
    }

    pub fn is_key_exists(&self) -> bool {
        match self {
            Error::KeyExists(_) => true,
            _ => false,
        }
    }

    /// Returns the candidate parent paths of an `Ambiguous` error, or an empty slice.
    pub fn candidates(&self) -> &[String] {
        match self {
            Error::Ambiguous { ref candidates, .. } => candidates,
            _ => &[],
        }
    }
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::KeyNotFound(ref message) => write!(f, "{}", message),
            Error::Ambiguous {
                ref message,
                ref candidates,
            } => write!(f, "{}. Possible parents: {}", message, candidates.join(", ")),
            Error::InvalidLookup(ref message) => write!(f, "{}", message),
            Error::KeyExists(ref message) => write!(f, "{}", message),
        }
    }
}

/// Convenience `Result` type for `nested_map`.
pub type Result<T> = result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn test_into_key_not_found() {
        let err = Error::Ambiguous {
            message: String::from("ambiguous"),
            candidates: vec![String::from("[]"), String::from("[\"a\"]")],
        };
        assert_eq!(err.candidates().len(), 2);
        assert_eq!(
            err.into_key_not_found(),
            Error::KeyNotFound(String::from("ambiguous (candidates: [], [\"a\"])")),
        );
        let err = Error::InvalidLookup(String::from("bad"));
        assert_eq!(err.clone().into_key_not_found(), err);
        assert!(err.candidates().is_empty());
    }

    #[test]
    fn test_display() {
        let err = Error::Ambiguous {
            message: String::from("NestedMap 'm': ambiguous"),
            candidates: vec![String::from("[]")],
        };
        assert_eq!(format!("{}", err), "NestedMap 'm': ambiguous. Possible parents: []");
        assert_eq!(format!("{}", Error::KeyExists(String::from("x"))), "x");
    }
}
