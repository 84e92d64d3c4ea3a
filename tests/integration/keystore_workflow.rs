//! Integration test: first boot and restart of a node's keystore.
//!
//! 1. Fresh configuration directory: identity and swarm key are generated
//! 2. Restart: the same artifacts are loaded back
//! 3. Reloading the file yields exactly what load-or-generate returned
//! 4. Stored files have the documented formats

use chaintalk_keys::peer_id::codec;
use chaintalk_keys::{
    KeyKind, KeypairFactory, KeystoreConfig, Libp2pFactory, PeerIdStore, StoredPeerIdentity,
    SwarmKey, SwarmKeyStore,
};

#[tokio::test]
async fn first_boot_then_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = KeystoreConfig::new(dir.path());

    // ── Step 1: First boot ───────────────────────────────────────────────
    let peers = PeerIdStore::new(&config);
    let swarm = SwarmKeyStore::new(&config);

    let identity = peers.load_or_generate(None).await.expect("identity");
    let swarm_bytes = swarm.load_or_generate(None).await.expect("swarm key");

    assert!(config.peer_id_path().exists());
    assert!(config.swarm_key_path().exists());
    assert_eq!(identity.kind, KeyKind::Ed25519);

    // ── Step 2: Restart with fresh store instances ───────────────────────
    let peers = PeerIdStore::new(&config);
    let swarm = SwarmKeyStore::new(&config);

    assert_eq!(peers.load_or_generate(None).await.unwrap(), identity);
    assert_eq!(swarm.load_or_generate(None).await.unwrap(), swarm_bytes);

    // ── Step 3: Plain reloads agree ──────────────────────────────────────
    assert_eq!(peers.load(None).await.unwrap(), identity);
    assert_eq!(swarm.load(None).await.unwrap(), swarm_bytes);

    // ── Step 4: On-disk formats ──────────────────────────────────────────
    let text = std::fs::read_to_string(config.peer_id_path()).unwrap();
    let record = StoredPeerIdentity::parse(&text).expect("valid record");
    assert_eq!(record.id, identity.to_base58());
    assert!(record.id.starts_with("12D3KooW"));

    let key = SwarmKey::parse(&swarm_bytes).expect("valid swarm key");
    assert_eq!(key.protocol, "/key/swarm/psk/1.0.0/");
    assert_eq!(key.encoding, "/base16/");
    assert_eq!(swarm.load_object(None).await.unwrap(), key);
}

#[tokio::test]
async fn codec_roundtrip_many_identities() {
    for _ in 0..16 {
        let identity = Libp2pFactory.generate().await.unwrap();
        let record = codec::encode(&identity).unwrap();
        let back = codec::decode(&record, &Libp2pFactory).await.unwrap();
        assert_eq!(back, identity);
    }
}

#[tokio::test]
async fn nodes_in_separate_dirs_are_independent() {
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();

    let id_a = PeerIdStore::new(&KeystoreConfig::new(a.path()))
        .load_or_generate(None)
        .await
        .unwrap();
    let id_b = PeerIdStore::new(&KeystoreConfig::new(b.path()))
        .load_or_generate(None)
        .await
        .unwrap();

    assert_ne!(id_a.to_base58(), id_b.to_base58());
}

#[tokio::test]
async fn stores_accept_caller_span() {
    let dir = tempfile::tempdir().unwrap();
    let config = KeystoreConfig::new(dir.path());
    let store = PeerIdStore::new(&config).with_span(tracing::info_span!("node", name = "a"));

    assert!(store.load_or_generate(None).await.is_ok());
}

#[tokio::test]
async fn existing_rsa_identity_is_kept() {
    let dir = tempfile::tempdir().unwrap();
    let config = KeystoreConfig::new(dir.path());
    let fixture = include_str!("../fixtures/rsa_peer_id.json");
    std::fs::write(config.peer_id_path(), fixture).unwrap();

    // A node upgraded from the JavaScript implementation keeps its RSA id.
    let store = PeerIdStore::new(&config);
    let identity = store.load_or_generate(None).await.expect("rsa identity");
    assert_eq!(identity.kind, KeyKind::Rsa);
    assert!(identity.to_base58().starts_with("Qm"));
    assert_eq!(std::fs::read_to_string(config.peer_id_path()).unwrap(), fixture);

    // Saving it back writes the same record.
    store.save(None, &identity).await.unwrap();
    let record = store.load_record(None).await.unwrap();
    assert_eq!(record, StoredPeerIdentity::parse(fixture).unwrap());
    assert_eq!(store.load(None).await.unwrap(), identity);
}
