//! Utility functions and types.

use std::fmt::Debug;

/// Redacts a secret before it reaches logs.
///
/// - Strings shorter than 12 characters are fully redacted.
/// - Longer strings keep their first and last three characters, so that
///   different api keys can still be told apart.
/// - Binary secrets are always fully redacted, only their length is shown.
pub enum Redact<'a> {
    /// A textual value such as an api key.
    Text(&'a str),
    /// A binary value such as a decoded secret.
    Binary(&'a [u8]),
}

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact::Text(value)
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact::Text(value.as_str())
    }
}

impl<'a> From<&'a [u8]> for Redact<'a> {
    fn from(value: &'a [u8]) -> Self {
        Redact::Binary(value)
    }
}

impl<'a> From<&'a Vec<u8>> for Redact<'a> {
    fn from(value: &'a Vec<u8>) -> Self {
        Redact::Binary(value.as_slice())
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Redact::Binary(v) if v.is_empty() => f.write_str("EMPTY"),
            Redact::Binary(v) => write!(f, "*** ({} bytes)", v.len()),
            Redact::Text(v) => {
                let length = v.len();
                if length == 0 {
                    f.write_str("EMPTY")
                } else if length < 12 || !v.is_char_boundary(3) || !v.is_char_boundary(length - 3)
                {
                    f.write_str("***")
                } else {
                    f.write_str(&v[..3])?;
                    f.write_str("***")?;
                    f.write_str(&v[length - 3..])
                }
            }
        }
    }
}
