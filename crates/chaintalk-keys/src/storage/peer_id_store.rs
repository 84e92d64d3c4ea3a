//! Peer identity persistence.
//!
//! The identity lives at `{config_dir}/.peerId` unless the caller names
//! another file. `load_or_generate` creates it on first use and never
//! replaces an existing file it cannot read.

use std::path::{Path, PathBuf};

use tracing::Instrument;

use crate::config::KeystoreConfig;
use crate::error::{KeystoreError, Result};
use crate::peer_id::{codec, KeypairFactory, Libp2pFactory, PeerIdentity, StoredPeerIdentity};
use crate::storage::file;

/// Filesystem-backed store for one peer identity.
///
/// The store holds no cached identity. Concurrent first-time calls to
/// `load_or_generate` on the same path are not coordinated; the last
/// write wins.
pub struct PeerIdStore<F = Libp2pFactory> {
    default_path: PathBuf,
    factory: F,
    span: tracing::Span,
}

impl PeerIdStore<Libp2pFactory> {
    /// Create a store that generates Ed25519 identities.
    pub fn new(config: &KeystoreConfig) -> Self {
        Self::with_factory(config, Libp2pFactory)
    }
}

impl<F: KeypairFactory> PeerIdStore<F> {
    pub fn with_factory(config: &KeystoreConfig, factory: F) -> Self {
        Self {
            default_path: config.peer_id_path(),
            factory,
            span: tracing::debug_span!("peer_id_store"),
        }
    }

    /// Replace the span all store log lines are emitted under.
    pub fn with_span(mut self, span: tracing::Span) -> Self {
        self.span = span;
        self
    }

    pub fn default_path(&self) -> &Path {
        &self.default_path
    }

    /// `path` when it is non-empty, the default path otherwise.
    pub fn resolve_path(&self, path: Option<&Path>) -> PathBuf {
        match path {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => self.default_path.clone(),
        }
    }

    /// Read and validate the stored record without reconstructing keys.
    ///
    /// # Errors
    ///
    /// Returns `KeystoreError::NotFound` if the file is absent,
    /// `KeystoreError::EmptyFile` if it has no content, or
    /// `KeystoreError::Parse` if it is not a valid record.
    pub async fn load_record(&self, path: Option<&Path>) -> Result<StoredPeerIdentity> {
        let path = self.resolve_path(path);
        self.read_record(&path).instrument(self.span.clone()).await
    }

    /// Load the identity stored at `path`.
    ///
    /// # Errors
    ///
    /// Everything [`load_record`](Self::load_record) returns, plus the
    /// keypair factory's own errors and
    /// `KeystoreError::ReconstructionInvalid`.
    pub async fn load(&self, path: Option<&Path>) -> Result<PeerIdentity> {
        let path = self.resolve_path(path);
        async {
            let record = self.read_record(&path).await?;
            let identity = codec::decode(&record, &self.factory).await?;
            tracing::debug!(path = %path.display(), peer_id = %identity, "peer identity loaded");
            Ok(identity)
        }
        .instrument(self.span.clone())
        .await
    }

    /// Save `identity` to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns `KeystoreError::InvalidIdentity` if the identity is
    /// incomplete, or a write error.
    pub async fn save(&self, path: Option<&Path>, identity: &PeerIdentity) -> Result<()> {
        identity
            .validate()
            .map_err(|e| KeystoreError::InvalidIdentity(e.reason))?;
        let path = self.resolve_path(path);
        async {
            let json = codec::encode(identity)?.to_json()?;
            file::write(&path, json.as_bytes()).await?;
            tracing::info!(path = %path.display(), peer_id = %identity, "peer identity saved");
            Ok(())
        }
        .instrument(self.span.clone())
        .await
    }

    /// Load the identity, generating and saving one if the file is absent.
    ///
    /// A file that exists but cannot be loaded is reported, not replaced.
    /// Use [`regenerate`](Self::regenerate) to overwrite it deliberately.
    pub async fn load_or_generate(&self, path: Option<&Path>) -> Result<PeerIdentity> {
        let path = self.resolve_path(path);
        match self.load(Some(path.as_path())).await {
            Ok(identity) => Ok(identity),
            Err(e) if e.is_not_found() => {
                self.span.in_scope(|| {
                    tracing::debug!(path = %path.display(), "no peer identity on disk");
                });
                self.regenerate(Some(path.as_path())).await
            }
            Err(e) => {
                self.span.in_scope(|| {
                    tracing::warn!(path = %path.display(), error = %e, "existing peer identity is unusable");
                });
                Err(e)
            }
        }
    }

    /// Generate a new identity and save it, replacing any existing file.
    pub async fn regenerate(&self, path: Option<&Path>) -> Result<PeerIdentity> {
        let path = self.resolve_path(path);
        let identity = self
            .factory
            .generate()
            .instrument(self.span.clone())
            .await?;
        self.save(Some(path.as_path()), &identity).await?;
        self.span.in_scope(|| {
            tracing::info!(path = %path.display(), peer_id = %identity, "generated new peer identity");
        });
        Ok(identity)
    }

    async fn read_record(&self, path: &Path) -> Result<StoredPeerIdentity> {
        let bytes = file::read(path).await?;
        if bytes.is_empty() {
            return Err(KeystoreError::EmptyFile(path.to_path_buf()));
        }
        let text = String::from_utf8(bytes).map_err(|e| KeystoreError::Parse {
            path: path.to_path_buf(),
            reason: format!("not UTF-8: {e}"),
        })?;
        StoredPeerIdentity::parse(&text).map_err(|e| KeystoreError::Parse {
            path: path.to_path_buf(),
            reason: e.reason,
        })
    }
}
