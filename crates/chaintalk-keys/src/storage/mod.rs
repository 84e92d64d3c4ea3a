//! Storage layer for the peer identity and the swarm key.
//!
//! # Directory layout
//!
//! Both files live in the configuration directory (default
//! `/etc/chaintalk`):
//!
//! ```text
//! /etc/chaintalk/
//! ├── .peerId      JSON: {"id", "privKey", "pubKey"}
//! └── .swarmKey    three lines: protocol, encoding, key
//! ```
//!
//! # Modules
//!
//! - [`file`]: raw byte read and replace-on-write.
//! - [`peer_id_store`]: load, save and load-or-generate for the identity.
//! - [`swarm_key_store`]: load and load-or-generate for the swarm key.

pub mod file;
pub mod peer_id_store;
pub mod swarm_key_store;

pub use peer_id_store::PeerIdStore;
pub use swarm_key_store::SwarmKeyStore;
