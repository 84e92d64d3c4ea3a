//! On-disk peer identity record.
//!
//! File format (JSON, UTF-8):
//! ```json
//! { "id": "<base58btc>", "privKey": "<base64pad>", "pubKey": "<base64pad>" }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{KeystoreError, Result};
use crate::validate::{self, Invalid};

/// Keys every stored record must own.
pub const RECORD_KEYS: [&str; 3] = ["id", "privKey", "pubKey"];

/// Text projection of a [`PeerIdentity`](super::PeerIdentity).
///
/// Holding one only means the three fields are strings. Whether they
/// describe a usable keypair is decided by the keypair factory.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPeerIdentity {
    pub id: String,
    #[serde(rename = "privKey")]
    pub priv_key: String,
    #[serde(rename = "pubKey")]
    pub pub_key: String,
}

impl StoredPeerIdentity {
    /// Validate an untyped JSON value against the record schema.
    ///
    /// Empty strings pass; only missing keys and non-string values fail.
    pub fn from_value(value: &Value) -> std::result::Result<Self, Invalid> {
        validate::require_keys(value, &RECORD_KEYS)?;
        let field = |key: &str| -> std::result::Result<String, Invalid> {
            let field = validate::require_field(value, key, validate::is_string, "a string")?;
            Ok(field.as_str().unwrap_or_default().to_owned())
        };
        Ok(Self {
            id: field("id")?,
            priv_key: field("privKey")?,
            pub_key: field("pubKey")?,
        })
    }

    /// Parse JSON text and validate it.
    pub fn parse(text: &str) -> std::result::Result<Self, Invalid> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| Invalid::new(format!("malformed JSON: {e}")))?;
        Self::from_value(&value)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| KeystoreError::Serialization(e.to_string()))
    }
}

impl std::fmt::Debug for StoredPeerIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredPeerIdentity")
            .field("id", &self.id)
            .field("priv_key", &"<redacted>")
            .field("pub_key", &self.pub_key)
            .finish()
    }
}
