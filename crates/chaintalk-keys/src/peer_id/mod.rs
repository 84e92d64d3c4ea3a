//! Peer identity: the in-memory keypair, its stored form, and the codec
//! between them.

pub mod codec;
mod envelope;
pub mod factory;
pub mod identity;
pub mod record;
mod rsa_key;

pub use factory::{KeypairFactory, Libp2pFactory};
pub use identity::{KeyKind, PeerIdentity};
pub use record::StoredPeerIdentity;
