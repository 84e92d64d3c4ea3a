//! Swarm key: the pre-shared key that gates a private network.
//!
//! On disk a swarm key is three lines of text:
//!
//! ```text
//! /key/swarm/psk/1.0.0/
//! /base16/
//! <64 hex chars>
//! ```
//!
//! Lines may end in `\n` or `\r\n`. Anything after the third line is ignored.

pub mod generator;

use libp2p_pnet::{KeyParseError, PreSharedKey};

use crate::error::{KeystoreError, Result};

pub use generator::{PnetKeyGenerator, SwarmKeyGenerator};

/// Protocol tag written by [`PnetKeyGenerator`].
pub const SWARM_KEY_PROTOCOL: &str = "/key/swarm/psk/1.0.0/";

/// Encoding tag for hex key material.
pub const BASE16_ENCODING: &str = "/base16/";

/// Length of the decoded pre-shared key.
pub const PSK_LEN: usize = 32;

/// Parsed swarm key.
#[derive(Clone, PartialEq, Eq)]
pub struct SwarmKey {
    pub protocol: String,
    pub encoding: String,
    pub key: String,
}

/// Input accepted by [`SwarmKey::parse`]: raw file bytes or text.
#[derive(Debug, Clone, Copy)]
pub enum SwarmKeySource<'a> {
    Bytes(&'a [u8]),
    Text(&'a str),
}

impl<'a> From<&'a [u8]> for SwarmKeySource<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        SwarmKeySource::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for SwarmKeySource<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        SwarmKeySource::Bytes(bytes)
    }
}

impl<'a> From<&'a str> for SwarmKeySource<'a> {
    fn from(text: &'a str) -> Self {
        SwarmKeySource::Text(text)
    }
}

impl<'a> SwarmKeySource<'a> {
    /// Normalise to text.
    ///
    /// # Errors
    ///
    /// Returns `KeystoreError::Encoding` if the bytes are not UTF-8.
    pub fn to_text(self) -> Result<std::borrow::Cow<'a, str>> {
        match self {
            SwarmKeySource::Text(text) => Ok(text.into()),
            SwarmKeySource::Bytes(bytes) => std::str::from_utf8(bytes)
                .map(Into::into)
                .map_err(|e| KeystoreError::Encoding(format!("swarm key is not UTF-8: {e}"))),
        }
    }
}

impl SwarmKey {
    /// Parse the three-line text form.
    ///
    /// # Errors
    ///
    /// Returns `KeystoreError::MalformedSwarmKey` if there are fewer than
    /// three lines or any of the first three is empty.
    pub fn decode(text: &str) -> Result<Self> {
        let mut lines = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line));

        let mut next = |name: &str| -> Result<String> {
            match lines.next() {
                Some(line) if !line.is_empty() => Ok(line.to_string()),
                Some(_) => Err(KeystoreError::MalformedSwarmKey(format!("{name} line is empty"))),
                None => Err(KeystoreError::MalformedSwarmKey(format!(
                    "expected 3 lines, {name} line is missing"
                ))),
            }
        };

        Ok(Self {
            protocol: next("protocol")?,
            encoding: next("encoding")?,
            key: next("key")?,
        })
    }

    /// Parse from bytes or text. Non-UTF-8 bytes fail with
    /// `KeystoreError::Encoding`.
    pub fn parse<'a>(source: impl Into<SwarmKeySource<'a>>) -> Result<Self> {
        let text = source.into().to_text()?;
        Self::decode(&text)
    }

    /// The pre-shared key for libp2p's private network transport.
    ///
    /// Requires the `/key/swarm/psk/1.0.0/` protocol, the `/base16/`
    /// encoding and 64 hex characters of key material.
    pub fn psk(&self) -> Result<PreSharedKey> {
        self.to_string().parse().map_err(|e: KeyParseError| {
            KeystoreError::MalformedSwarmKey(format!("unusable pre-shared key: {e}"))
        })
    }

    /// Three-line text form with a trailing newline.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }
}

impl std::fmt::Display for SwarmKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.protocol)?;
        writeln!(f, "{}", self.encoding)?;
        writeln!(f, "{}", self.key)
    }
}

impl std::fmt::Debug for SwarmKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwarmKey")
            .field("protocol", &self.protocol)
            .field("encoding", &self.encoding)
            .field("key", &"<redacted>")
            .finish()
    }
}
