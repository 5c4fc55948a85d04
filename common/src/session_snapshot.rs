//! Saved search state, as a token that fits in a URL.
//!
//! The token is the snapshot in CBOR, then base64 with the URL-safe alphabet
//! and no padding. Tokens come from outside (bookmarks, `--state`), so decoding
//! checks the length before doing any work.

use std::{fmt, str::FromStr};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Longest token accepted by [`SessionSnapshot::from_token`].
pub const MAX_TOKEN_LEN: usize = 16 * 1024;

/// What is needed to rebuild a search session: free text, facet selection and page.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct SessionSnapshot {
    pub free_text: String,
    pub facets: IndexMap<String, Vec<String>>,
    pub page: u64,
}

#[derive(Debug)]
pub enum SnapshotDecodeError {
    TooLong(usize),
    Base64(base64::DecodeError),
    Cbor(ciborium::de::Error<std::io::Error>),
}

impl fmt::Display for SnapshotDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLong(len) => write!(f, "state token is {len} bytes, limit is {MAX_TOKEN_LEN}"),
            Self::Base64(err) => write!(f, "state token is not base64: {err}"),
            Self::Cbor(err) => write!(f, "state token does not hold a search state: {err}"),
        }
    }
}

impl std::error::Error for SnapshotDecodeError {}

impl SessionSnapshot {
    pub fn to_token(&self) -> String {
        let mut cbor = Vec::new();
        // Writing plain strings, maps and integers into a Vec cannot fail.
        if ciborium::into_writer(self, &mut cbor).is_err() {
            return String::new();
        }
        URL_SAFE_NO_PAD.encode(cbor)
    }

    /// An empty token decodes to the default (blank) state.
    pub fn from_token(token: &str) -> Result<Self, SnapshotDecodeError> {
        let token = token.trim();
        if token.is_empty() {
            return Ok(Self::default());
        }
        if token.len() > MAX_TOKEN_LEN {
            return Err(SnapshotDecodeError::TooLong(token.len()));
        }
        let cbor = URL_SAFE_NO_PAD.decode(token.trim_end_matches('=')).map_err(SnapshotDecodeError::Base64)?;
        ciborium::from_reader(cbor.as_slice()).map_err(SnapshotDecodeError::Cbor)
    }
}

impl fmt::Display for SessionSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_token())
    }
}

impl FromStr for SessionSnapshot {
    type Err = SnapshotDecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot {
            free_text: "auto de infração".to_string(),
            facets: IndexMap::from([
                ("tipo_documento_s".to_string(), vec!["B".to_string(), "A".to_string()]),
                ("situacao_s".to_string(), vec!["C".to_string()]),
            ]),
            page: 3,
        }
    }

    #[test]
    fn token_is_url_safe_and_keeps_facet_order() {
        let token = snapshot().to_token();
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));

        let decoded: SessionSnapshot = token.parse().unwrap();
        assert_eq!(decoded, snapshot());
        let fields = decoded.facets.keys().cloned().collect::<Vec<_>>();
        assert_eq!(fields, vec!["tipo_documento_s", "situacao_s"]);
        assert_eq!(decoded.to_string(), token);
    }

    #[test]
    fn padded_tokens_are_accepted() {
        let token = snapshot().to_token();
        let padded = format!("{token}{}", "=".repeat((4 - token.len() % 4) % 4));
        assert_eq!(SessionSnapshot::from_token(&padded).unwrap(), snapshot());
    }

    #[test]
    fn blank_token_is_the_blank_state() {
        assert_eq!(SessionSnapshot::from_token("  ").unwrap(), SessionSnapshot::default());
    }

    #[test]
    fn garbage_is_rejected() {
        let err = SessionSnapshot::from_token("not base64!").unwrap_err();
        assert!(matches!(err, SnapshotDecodeError::Base64(_)));

        let not_cbor = URL_SAFE_NO_PAD.encode([0xff, 0x00]);
        let err = SessionSnapshot::from_token(&not_cbor).unwrap_err();
        assert!(matches!(err, SnapshotDecodeError::Cbor(_)));

        let err = SessionSnapshot::from_token(&"A".repeat(MAX_TOKEN_LEN + 1)).unwrap_err();
        assert!(matches!(err, SnapshotDecodeError::TooLong(_)));
    }
}
