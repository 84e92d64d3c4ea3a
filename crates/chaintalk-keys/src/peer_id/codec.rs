//! Conversion between [`PeerIdentity`] and [`StoredPeerIdentity`].
//!
//! Encoding is pure. Decoding goes through a [`KeypairFactory`], and its
//! result is re-validated before it is handed back.

use base64::Engine as _;
use serde_json::Value;

use super::factory::KeypairFactory;
use super::identity::PeerIdentity;
use super::record::StoredPeerIdentity;
use crate::error::{KeystoreError, Result};

/// Project an identity into its stored text form.
///
/// # Errors
///
/// Returns `KeystoreError::InvalidIdentity` if any part is missing.
pub fn encode(identity: &PeerIdentity) -> Result<StoredPeerIdentity> {
    identity
        .validate()
        .map_err(|e| KeystoreError::InvalidIdentity(e.reason))?;

    let (Some(private_key), Some(public_key)) = (&identity.private_key, &identity.public_key)
    else {
        return Err(KeystoreError::InvalidIdentity(
            "identity has no keypair".to_string(),
        ));
    };

    let engine = &base64::engine::general_purpose::STANDARD;
    Ok(StoredPeerIdentity {
        id: identity.to_base58(),
        priv_key: engine.encode(private_key.as_slice()),
        pub_key: engine.encode(public_key),
    })
}

/// Rebuild an identity from a stored record.
///
/// # Errors
///
/// Propagates the factory's error unchanged, or returns
/// `KeystoreError::ReconstructionInvalid` if the factory hands back an
/// incomplete identity.
pub async fn decode<F: KeypairFactory>(
    record: &StoredPeerIdentity,
    factory: &F,
) -> Result<PeerIdentity> {
    let identity = factory.reconstruct(record).await?;
    identity
        .validate()
        .map_err(|e| KeystoreError::ReconstructionInvalid(e.reason))?;
    Ok(identity)
}

/// Validate an untyped value, then [`decode`] it.
///
/// The factory is not called when the value fails the record schema.
pub async fn decode_value<F: KeypairFactory>(value: &Value, factory: &F) -> Result<PeerIdentity> {
    let record = StoredPeerIdentity::from_value(value)
        .map_err(|e| KeystoreError::InvalidRecord(e.reason))?;
    decode(&record, factory).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peer_id::{KeyKind, Libp2pFactory};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls and hands back whatever it was built with.
    struct FixedFactory {
        identity: PeerIdentity,
        reconstruct_calls: AtomicUsize,
    }

    impl KeypairFactory for FixedFactory {
        async fn generate(&self) -> Result<PeerIdentity> {
            Ok(self.identity.clone())
        }

        async fn reconstruct(&self, _record: &StoredPeerIdentity) -> Result<PeerIdentity> {
            self.reconstruct_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.identity.clone())
        }
    }

    fn fixed(identity: PeerIdentity) -> FixedFactory {
        FixedFactory {
            identity,
            reconstruct_calls: AtomicUsize::new(0),
        }
    }

    #[test]
    fn test_encode_known_bytes() {
        let identity = PeerIdentity::new(
            KeyKind::Rsa,
            vec![0x00, 0x01, 0x61],
            Some(b"priv".to_vec()),
            Some(b"pub".to_vec()),
        );
        let record = encode(&identity).unwrap();
        assert_eq!(record.id, bs58::encode([0x00, 0x01, 0x61]).into_string());
        assert_eq!(record.priv_key, "cHJpdg==");
        assert_eq!(record.pub_key, "cHVi");
    }

    #[test]
    fn test_encode_rejects_incomplete_identity() {
        let identity = PeerIdentity::new(KeyKind::Ed25519, vec![1], None, Some(vec![2]));
        let err = encode(&identity).unwrap_err();
        assert!(matches!(err, KeystoreError::InvalidIdentity(_)));
    }

    #[tokio::test]
    async fn test_roundtrip_is_byte_exact() {
        let identity = Libp2pFactory.generate().await.unwrap();
        let back = decode(&encode(&identity).unwrap(), &Libp2pFactory)
            .await
            .unwrap();
        assert_eq!(back.content_hash, identity.content_hash);
        assert_eq!(back.private_key, identity.private_key);
        assert_eq!(back.public_key, identity.public_key);
    }

    #[tokio::test]
    async fn test_missing_keys_never_reach_factory() {
        let factory = fixed(Libp2pFactory.generate().await.unwrap());
        for value in [
            json!({"privKey": "a", "pubKey": "b"}),
            json!({"id": "a", "pubKey": "b"}),
            json!({"id": "a", "privKey": "b"}),
            json!(null),
        ] {
            let err = decode_value(&value, &factory).await.unwrap_err();
            assert!(matches!(err, KeystoreError::InvalidRecord(_)), "{err}");
        }
        assert_eq!(factory.reconstruct_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_incomplete_reconstruction_rejected() {
        let factory = fixed(PeerIdentity::new(KeyKind::Ed25519, vec![1], None, None));
        let record = StoredPeerIdentity {
            id: "x".into(),
            priv_key: "y".into(),
            pub_key: "z".into(),
        };
        let err = decode(&record, &factory).await.unwrap_err();
        assert!(matches!(err, KeystoreError::ReconstructionInvalid(_)));
        assert_eq!(factory.reconstruct_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_factory_error_propagates_verbatim() {
        let record = StoredPeerIdentity {
            id: "!!!".into(),
            priv_key: String::new(),
            pub_key: String::new(),
        };
        let err = decode(&record, &Libp2pFactory).await.unwrap_err();
        assert!(err.to_string().starts_with("keypair error: invalid peer id"));
    }
}
