//! The libp2p key envelope.
//!
//! Stored keys are `PublicKey`/`PrivateKey` messages from libp2p's
//! `keys.proto`: a key type enum (field 1) and the key bytes (field 2).
//! Only the type tag is read here; key material is handed to
//! `libp2p-identity` or, for RSA private keys, to the `rsa` crate.

use prost::Message;
use zeroize::Zeroize;

use super::identity::KeyKind;
use crate::error::{KeystoreError, Result};

#[derive(Clone, PartialEq, Message)]
#[prost(skip_debug)]
pub(super) struct KeyEnvelope {
    #[prost(int32, tag = "1")]
    pub key_type: i32,
    #[prost(bytes = "vec", tag = "2")]
    pub data: Vec<u8>,
}

impl KeyEnvelope {
    #[cfg(test)]
    pub fn new(kind: KeyKind, data: Vec<u8>) -> Self {
        Self {
            key_type: kind.code(),
            data,
        }
    }

    /// Decode an envelope, requiring a known key type and non-empty data.
    pub fn decode_framed(framed: &[u8]) -> Result<Self> {
        let envelope = Self::decode(framed)
            .map_err(|e| KeystoreError::Keypair(format!("malformed key envelope: {e}")))?;
        envelope.kind()?;
        if envelope.data.is_empty() {
            return Err(KeystoreError::Keypair(
                "malformed key envelope: no key data".to_string(),
            ));
        }
        Ok(envelope)
    }

    pub fn kind(&self) -> Result<KeyKind> {
        KeyKind::from_code(self.key_type)
            .ok_or_else(|| KeystoreError::Keypair(format!("unknown key type {}", self.key_type)))
    }
}

impl Drop for KeyEnvelope {
    fn drop(&mut self) {
        self.data.zeroize();
    }
}

impl std::fmt::Debug for KeyEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyEnvelope")
            .field("key_type", &self.key_type)
            .field("data_len", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_type_tag() {
        let framed = KeyEnvelope::new(KeyKind::Secp256k1, vec![7; 33]).encode_to_vec();
        assert_eq!(&framed[..4], &[0x08, 0x02, 0x12, 33]);

        let envelope = KeyEnvelope::decode_framed(&framed).unwrap();
        assert_eq!(envelope.kind().unwrap(), KeyKind::Secp256k1);
        assert_eq!(envelope.data, vec![7; 33]);
    }

    #[test]
    fn test_rejects_garbage_and_unknown_types() {
        assert!(KeyEnvelope::decode_framed(&[0xff, 0xff, 0xff]).is_err());
        assert!(KeyEnvelope::decode_framed(&[]).is_err());

        let unknown = KeyEnvelope {
            key_type: 9,
            data: vec![1],
        }
        .encode_to_vec();
        let err = KeyEnvelope::decode_framed(&unknown).unwrap_err();
        assert!(err.to_string().contains("unknown key type 9"));
    }
}
