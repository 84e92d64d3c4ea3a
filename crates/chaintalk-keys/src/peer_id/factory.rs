//! Keypair generation and reconstruction.
//!
//! The stores never create or parse key material themselves; they call a
//! [`KeypairFactory`]. [`Libp2pFactory`] is the default: it generates
//! Ed25519 identities and reconstructs both Ed25519 identities and the
//! RSA identities older js-libp2p nodes wrote.

use std::future::Future;
use std::str::FromStr;

use base64::Engine as _;
use libp2p_identity::{PeerId, PublicKey};
use zeroize::Zeroizing;

use super::envelope::KeyEnvelope;
use super::identity::{KeyKind, PeerIdentity};
use super::record::StoredPeerIdentity;
use super::rsa_key;
use crate::error::{KeystoreError, Result};

const SELF_CHECK_MESSAGE: &[u8] = b"chaintalk-keys reconstruction self-check";

/// Source of peer identities.
pub trait KeypairFactory: Send + Sync {
    /// Create a fresh identity.
    fn generate(&self) -> impl Future<Output = Result<PeerIdentity>> + Send;

    /// Rebuild an identity from its stored text form.
    ///
    /// Errors are opaque to the caller and propagated unchanged.
    fn reconstruct(
        &self,
        record: &StoredPeerIdentity,
    ) -> impl Future<Output = Result<PeerIdentity>> + Send;
}

/// Generates Ed25519 identities; reconstructs Ed25519 and RSA ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct Libp2pFactory;

impl Libp2pFactory {
    fn generate_now() -> Result<PeerIdentity> {
        let keypair = libp2p_identity::Keypair::generate_ed25519();
        let public = keypair.public();
        let private_key = keypair
            .to_protobuf_encoding()
            .map_err(|e| KeystoreError::Keypair(format!("failed to encode private key: {e}")))?;

        Ok(PeerIdentity {
            kind: KeyKind::Ed25519,
            content_hash: public.to_peer_id().to_bytes(),
            private_key: Some(Zeroizing::new(private_key)),
            public_key: Some(public.encode_protobuf()),
        })
    }

    fn reconstruct_now(record: &StoredPeerIdentity) -> Result<PeerIdentity> {
        let peer_id = PeerId::from_str(&record.id)
            .map_err(|e| KeystoreError::Keypair(format!("invalid peer id {:?}: {e}", record.id)))?;
        let public_key = base64::engine::general_purpose::STANDARD
            .decode(&record.pub_key)
            .map_err(|e| KeystoreError::Keypair(format!("invalid public key base64: {e}")))?;
        let private_key = Zeroizing::new(
            base64::engine::general_purpose::STANDARD
                .decode(&record.priv_key)
                .map_err(|e| KeystoreError::Keypair(format!("invalid private key base64: {e}")))?,
        );

        let kind = KeyEnvelope::decode_framed(&public_key)?.kind()?;
        let private_kind = KeyEnvelope::decode_framed(&private_key)?.kind()?;
        if private_kind != kind {
            return Err(KeystoreError::Keypair(format!(
                "private key is {private_kind} but public key is {kind}"
            )));
        }
        if !matches!(kind, KeyKind::Ed25519 | KeyKind::Rsa) {
            return Err(KeystoreError::Keypair(format!(
                "unsupported key type {kind}, expected Ed25519 or RSA"
            )));
        }

        let public = PublicKey::try_decode_protobuf(&public_key)
            .map_err(|e| KeystoreError::Keypair(format!("invalid public key: {e}")))?;
        match kind {
            KeyKind::Rsa => rsa_key::check_keypair(&private_key, &public, SELF_CHECK_MESSAGE)?,
            _ => check_ed25519_keypair(&private_key, &public)?,
        }
        if PeerId::from_public_key(&public) != peer_id {
            return Err(KeystoreError::Keypair("id does not match public key".to_string()));
        }

        Ok(PeerIdentity {
            kind,
            content_hash: peer_id.to_bytes(),
            private_key: Some(private_key),
            public_key: Some(public_key),
        })
    }
}

fn check_ed25519_keypair(private_key: &[u8], public: &PublicKey) -> Result<()> {
    let keypair = libp2p_identity::Keypair::from_protobuf_encoding(private_key)
        .map_err(|e| KeystoreError::Keypair(format!("invalid private key: {e}")))?;
    if keypair.public() != *public {
        return Err(KeystoreError::Keypair(
            "private key does not match public key".to_string(),
        ));
    }

    let signature = keypair
        .sign(SELF_CHECK_MESSAGE)
        .map_err(|e| KeystoreError::Keypair(format!("signature self-check failed: {e}")))?;
    if !public.verify(SELF_CHECK_MESSAGE, &signature) {
        return Err(KeystoreError::Keypair("signature self-check failed".to_string()));
    }
    Ok(())
}

impl KeypairFactory for Libp2pFactory {
    async fn generate(&self) -> Result<PeerIdentity> {
        Self::generate_now()
    }

    async fn reconstruct(&self, record: &StoredPeerIdentity) -> Result<PeerIdentity> {
        Self::reconstruct_now(record)
    }
}
