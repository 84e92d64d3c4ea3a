//! Swarm key generation.

use std::future::Future;
use std::path::Path;

use rand::RngCore;

use super::{BASE16_ENCODING, PSK_LEN, SWARM_KEY_PROTOCOL};
use crate::error::Result;
use crate::storage::file;

/// Writes fresh swarm key material to a destination.
///
/// The store does not trust the return value beyond success; it re-reads
/// the destination afterwards.
pub trait SwarmKeyGenerator: Send + Sync {
    fn generate_into(&self, path: &Path) -> impl Future<Output = Result<()>> + Send;
}

/// Generates 32 random bytes in the libp2p pnet text format.
#[derive(Debug, Clone, Copy, Default)]
pub struct PnetKeyGenerator;

impl PnetKeyGenerator {
    /// Render a new key without writing it.
    pub fn generate_text() -> String {
        let mut psk = zeroize::Zeroizing::new([0u8; PSK_LEN]);
        rand::thread_rng().fill_bytes(&mut psk[..]);
        format!(
            "{SWARM_KEY_PROTOCOL}\n{BASE16_ENCODING}\n{}",
            hex::encode(&psk[..])
        )
    }
}

impl SwarmKeyGenerator for PnetKeyGenerator {
    async fn generate_into(&self, path: &Path) -> Result<()> {
        let text = zeroize::Zeroizing::new(Self::generate_text());
        file::write(path, text.as_bytes()).await
    }
}
