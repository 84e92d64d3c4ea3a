//! In-memory peer identity.
//!
//! A `PeerIdentity` is what a keypair factory produces: a key type tag,
//! the content hash that names the peer, and the protobuf-framed key
//! bytes. The private key is zeroized on drop.

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::validate::Invalid;

/// Key algorithm tag, numbered as in the libp2p key protobuf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyKind {
    Rsa,
    Ed25519,
    Secp256k1,
    Ecdsa,
}

impl KeyKind {
    /// Protobuf enum value.
    pub fn code(self) -> i32 {
        match self {
            KeyKind::Rsa => 0,
            KeyKind::Ed25519 => 1,
            KeyKind::Secp256k1 => 2,
            KeyKind::Ecdsa => 3,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(KeyKind::Rsa),
            1 => Some(KeyKind::Ed25519),
            2 => Some(KeyKind::Secp256k1),
            3 => Some(KeyKind::Ecdsa),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            KeyKind::Rsa => "RSA",
            KeyKind::Ed25519 => "Ed25519",
            KeyKind::Secp256k1 => "secp256k1",
            KeyKind::Ecdsa => "ECDSA",
        }
    }
}

impl std::fmt::Display for KeyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A peer's keypair identity.
#[derive(Clone, PartialEq, Eq)]
pub struct PeerIdentity {
    pub kind: KeyKind,
    /// Multihash of the public key; its base58 text is the peer id.
    pub content_hash: Vec<u8>,
    /// Protobuf-framed private key. Absent for public-only identities.
    pub private_key: Option<Zeroizing<Vec<u8>>>,
    /// Protobuf-framed public key.
    pub public_key: Option<Vec<u8>>,
}

impl PeerIdentity {
    pub fn new(
        kind: KeyKind,
        content_hash: Vec<u8>,
        private_key: Option<Vec<u8>>,
        public_key: Option<Vec<u8>>,
    ) -> Self {
        Self {
            kind,
            content_hash,
            private_key: private_key.map(Zeroizing::new),
            public_key,
        }
    }

    /// Check that every part needed to persist the identity is present.
    pub fn validate(&self) -> std::result::Result<(), Invalid> {
        if self.content_hash.is_empty() {
            return Err(Invalid::new("content hash is empty"));
        }
        match &self.private_key {
            None => return Err(Invalid::new("private key is missing")),
            Some(k) if k.is_empty() => return Err(Invalid::new("private key is empty")),
            Some(_) => {}
        }
        match &self.public_key {
            None => Err(Invalid::new("public key is missing")),
            Some(k) if k.is_empty() => Err(Invalid::new("public key is empty")),
            Some(_) => Ok(()),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn is_public_only(&self) -> bool {
        self.private_key.is_none()
    }

    /// The peer id: base58btc text of the content hash.
    pub fn to_base58(&self) -> String {
        bs58::encode(&self.content_hash).into_string()
    }
}

impl std::fmt::Display for PeerIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl std::fmt::Debug for PeerIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeerIdentity")
            .field("kind", &self.kind)
            .field("id", &self.to_base58())
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("public_key_len", &self.public_key.as_ref().map(Vec::len))
            .finish()
    }
}
