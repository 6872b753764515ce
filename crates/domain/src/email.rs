use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// An email address that has passed the basic shape validation.
/// Obviously malformed destinations are rejected here, before any
/// network call is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailAddress(String);

#[derive(Error, Debug)]
pub enum InvalidEmailError {
    #[error("Email address: {0} is malformed")]
    Malformed(String),
}

impl EmailAddress {
    /// Validates `local@domain` where neither part is empty, the
    /// address contains no whitespace and the domain has an interior dot
    pub fn new(address: &str) -> Result<Self, InvalidEmailError> {
        let malformed = || InvalidEmailError::Malformed(address.to_string());

        if address.chars().any(char::is_whitespace) {
            return Err(malformed());
        }
        if address.matches('@').count() != 1 {
            return Err(malformed());
        }
        let mut parts = address.splitn(2, '@');
        let local = parts.next().unwrap_or("");
        let domain = parts.next().unwrap_or("");
        if local.is_empty() || domain.is_empty() {
            return Err(malformed());
        }
        // The dot must be interior: "user@.com" and "user@com." with no
        // other dot are both malformed
        let has_interior_dot = domain
            .char_indices()
            .any(|(i, c)| c == '.' && i > 0 && i < domain.len() - 1);
        if !has_interior_dot {
            return Err(malformed());
        }

        Ok(Self(address.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EmailAddress {
    type Err = InvalidEmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for EmailAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value
            .parse::<EmailAddress>()
            .map_err(serde::de::Error::custom)
    }
}
