//! Swarm key persistence.
//!
//! `load` hands back the raw file bytes; the three-line structure is only
//! checked by `load_object`, since some callers hash or forward the bytes
//! as they are.

use std::path::{Path, PathBuf};

use tracing::Instrument;

use crate::config::KeystoreConfig;
use crate::error::{KeystoreError, Result};
use crate::storage::file;
use crate::swarm_key::{PnetKeyGenerator, SwarmKey, SwarmKeyGenerator};

/// Filesystem-backed store for the swarm key.
pub struct SwarmKeyStore<G = PnetKeyGenerator> {
    default_path: PathBuf,
    generator: G,
    span: tracing::Span,
}

impl SwarmKeyStore<PnetKeyGenerator> {
    pub fn new(config: &KeystoreConfig) -> Self {
        Self::with_generator(config, PnetKeyGenerator)
    }
}

impl<G: SwarmKeyGenerator> SwarmKeyStore<G> {
    pub fn with_generator(config: &KeystoreConfig, generator: G) -> Self {
        Self {
            default_path: config.swarm_key_path(),
            generator,
            span: tracing::debug_span!("swarm_key_store"),
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

    /// Read the raw swarm key file.
    ///
    /// # Errors
    ///
    /// Returns `KeystoreError::NotFound` if the file is absent or
    /// `KeystoreError::InvalidSwarmKeyFile` if it is empty.
    pub async fn load(&self, path: Option<&Path>) -> Result<Vec<u8>> {
        let path = self.resolve_path(path);
        async {
            let bytes = file::read(&path).await?;
            if bytes.is_empty() {
                return Err(KeystoreError::InvalidSwarmKeyFile(path.clone()));
            }
            tracing::debug!(path = %path.display(), bytes = bytes.len(), "swarm key loaded");
            Ok(bytes)
        }
        .instrument(self.span.clone())
        .await
    }

    /// Read and parse the swarm key file.
    pub async fn load_object(&self, path: Option<&Path>) -> Result<SwarmKey> {
        let bytes = self.load(path).await?;
        SwarmKey::parse(&bytes)
    }

    /// Read the swarm key, generating one first if the file is absent.
    ///
    /// After generation the file is read back, and those bytes are returned.
    /// An existing but empty file is reported, not replaced.
    pub async fn load_or_generate(&self, path: Option<&Path>) -> Result<Vec<u8>> {
        let path = self.resolve_path(path);
        match self.load(Some(path.as_path())).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.is_not_found() => {
                self.generator
                    .generate_into(&path)
                    .instrument(self.span.clone())
                    .await?;
                self.span.in_scope(|| {
                    tracing::info!(path = %path.display(), "generated new swarm key");
                });
                self.load(Some(path.as_path())).await
            }
            Err(e) => {
                self.span.in_scope(|| {
                    tracing::warn!(path = %path.display(), error = %e, "existing swarm key is unusable");
                });
                Err(e)
            }
        }
    }
}
