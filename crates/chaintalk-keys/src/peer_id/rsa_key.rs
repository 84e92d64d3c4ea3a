//! RSA identities written by js-libp2p nodes.
//!
//! The public key is an X.509 SubjectPublicKeyInfo, which `libp2p-identity`
//! decodes. The private key is PKCS#1 `RSAPrivateKey` DER, which
//! `libp2p-identity` cannot load from its protobuf form, so it is parsed
//! with the `rsa` crate and matched against the public key.

use libp2p_identity::PublicKey;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

use super::envelope::KeyEnvelope;
use super::identity::KeyKind;
use crate::error::{KeystoreError, Result};

/// Check that the framed PKCS#1 private key belongs to `public` and can
/// produce signatures `public` accepts.
pub(super) fn check_keypair(
    framed_private_key: &[u8],
    public: &PublicKey,
    message: &[u8],
) -> Result<()> {
    let envelope = KeyEnvelope::decode_framed(framed_private_key)?;
    if envelope.kind()? != KeyKind::Rsa {
        return Err(KeystoreError::Keypair("private key is not an RSA key".to_string()));
    }
    let private = RsaPrivateKey::from_pkcs1_der(&envelope.data)
        .map_err(|e| KeystoreError::Keypair(format!("invalid RSA private key: {e}")))?;

    let x509 = public
        .clone()
        .try_into_rsa()
        .map_err(|e| KeystoreError::Keypair(format!("public key is not RSA: {e}")))?
        .encode_x509();
    let stored_public = RsaPublicKey::from_public_key_der(&x509)
        .map_err(|e| KeystoreError::Keypair(format!("invalid RSA public key: {e}")))?;
    if private.to_public_key() != stored_public {
        return Err(KeystoreError::Keypair(
            "private key does not match public key".to_string(),
        ));
    }

    let signature = SigningKey::<Sha256>::new(private).sign(message);
    if !public.verify(message, &signature.to_vec()) {
        return Err(KeystoreError::Keypair("signature self-check failed".to_string()));
    }
    Ok(())
}
