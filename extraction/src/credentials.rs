//! API keys and the ordered list they rotate through.

use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Errors raised while assembling a credential list.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    /// No usable key was supplied.
    #[error("No API keys available")]
    Empty,
}

/// An opaque API key.
///
/// `Debug` and `Display` only ever show the last four characters.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Credential(String);

impl Credential {
    /// Wraps a raw key. Surrounding whitespace is trimmed.
    #[must_use]
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(key.as_ref().trim().to_string())
    }

    /// The raw key, for the request header only.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Redacted form, e.g. `...a1b2`.
    #[must_use]
    pub fn redacted(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 4 {
            return "****".to_string();
        }
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("...{tail}")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&self.redacted()).finish()
    }
}

/// Ordered, non-empty, duplicate-free list of keys.
///
/// Insertion order is rotation order. The list cannot change once built.
#[derive(Debug, Clone)]
pub struct Credentials {
    keys: Vec<Credential>,
}

impl Credentials {
    /// Builds the list, skipping blank entries and later duplicates.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::Empty` if nothing usable remains.
    pub fn new<I, S>(keys: I) -> Result<Self, CredentialError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let keys: Vec<Credential> = keys
            .into_iter()
            .map(Credential::new)
            .filter(|c| !c.expose().is_empty())
            .filter(|c| seen.insert(c.expose().to_string()))
            .collect();

        if keys.is_empty() {
            return Err(CredentialError::Empty);
        }
        Ok(Self { keys })
    }

    /// Number of keys. Never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Key at rotation position `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Credential> {
        self.keys.get(index)
    }

    /// Keys in rotation order.
    pub fn iter(&self) -> impl Iterator<Item = &Credential> {
        self.keys.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacted_shows_last_four() {
        let key = Credential::new("AIzaSyExampleKey1234");
        assert_eq!(key.redacted(), "...1234");
        assert_eq!(format!("{key}"), "...1234");
        assert!(!format!("{key:?}").contains("AIza"));
    }

    #[test]
    fn test_short_key_fully_masked() {
        assert_eq!(Credential::new("abc").redacted(), "****");
    }

    #[test]
    fn test_dedupes_and_keeps_order() {
        let creds = Credentials::new(["k1", " k2 ", "k1", "", "k3", "k2"]).unwrap();
        let keys: Vec<&str> = creds.iter().map(Credential::expose).collect();
        assert_eq!(keys, vec!["k1", "k2", "k3"]);
        assert_eq!(creds.len(), 3);
        assert!(!creds.is_empty());
    }

    #[test]
    fn test_empty_is_rejected() {
        let err = Credentials::new(Vec::<String>::new()).unwrap_err();
        assert_eq!(err, CredentialError::Empty);
        assert_eq!(
            Credentials::new(["", "   "]).unwrap_err(),
            CredentialError::Empty
        );
    }
}
