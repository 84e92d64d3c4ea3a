//! Error types for the keystore.
//!
//! Every operation returns either a value or exactly one `KeystoreError`.
//! Private key material is never included in error messages.

use std::path::PathBuf;

/// Keystore error types covering all operations.
#[derive(Debug, thiserror::Error)]
pub enum KeystoreError {
    /// The file does not exist. This is the only recoverable failure:
    /// `load_or_generate` answers it by generating a fresh artifact.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("empty content in file: {}", .0.display())]
    EmptyFile(PathBuf),

    #[error("invalid swarm key file (zero-length content): {}", .0.display())]
    InvalidSwarmKeyFile(PathBuf),

    #[error("failed to parse {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("malformed swarm key: {0}")]
    MalformedSwarmKey(String),

    #[error("invalid peer identity: {0}")]
    InvalidIdentity(String),

    #[error("invalid stored peer identity record: {0}")]
    InvalidRecord(String),

    #[error("reconstructed peer identity is incomplete: {0}")]
    ReconstructionInvalid(String),

    /// Opaque failure raised by a keypair collaborator, message preserved.
    #[error("keypair error: {0}")]
    Keypair(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl KeystoreError {
    /// True when the failure means "the file is absent".
    ///
    /// The existence check and the read are not atomic, so a file removed
    /// between the two surfaces as an `Io` error of kind `NotFound`. Both
    /// count as absent.
    pub fn is_not_found(&self) -> bool {
        match self {
            KeystoreError::NotFound(_) => true,
            KeystoreError::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, KeystoreError>;
