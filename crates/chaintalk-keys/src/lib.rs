//! ChainTalk keys: persistent identity material for a peer-to-peer node.
//!
//! Loads, validates and saves the node's keypair identity (`.peerId`) and
//! the private network's pre-shared swarm key (`.swarmKey`), generating
//! either on first use.

pub mod config;
pub mod error;
pub mod peer_id;
pub mod storage;
pub mod swarm_key;
pub mod validate;

// Re-export primary types
pub use config::KeystoreConfig;
pub use error::{KeystoreError, Result};
pub use peer_id::{KeyKind, KeypairFactory, Libp2pFactory, PeerIdentity, StoredPeerIdentity};
pub use storage::{PeerIdStore, SwarmKeyStore};
pub use swarm_key::{PnetKeyGenerator, SwarmKey, SwarmKeyGenerator};
