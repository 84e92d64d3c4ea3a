//! Integration test: damaged keystore files are reported, never replaced.

use chaintalk_keys::{KeystoreConfig, KeystoreError, PeerIdStore, SwarmKeyStore};

fn setup() -> (tempfile::TempDir, KeystoreConfig) {
    let dir = tempfile::tempdir().unwrap();
    let config = KeystoreConfig::new(dir.path());
    (dir, config)
}

type ErrorCheck = fn(&KeystoreError) -> bool;

async fn assert_corrupt_identity(content: &[u8], expected: ErrorCheck) {
    let (_dir, config) = setup();
    std::fs::write(config.peer_id_path(), content).unwrap();
    let store = PeerIdStore::new(&config);

    let err = store.load_or_generate(None).await.unwrap_err();
    assert!(expected(&err), "unexpected error {err:?} for {content:?}");
    assert!(!err.is_not_found());
    assert_eq!(
        std::fs::read(config.peer_id_path()).unwrap(),
        content,
        "corrupt file must be left untouched"
    );
}

#[tokio::test]
async fn corrupt_identity_variants_surface_errors() {
    assert_corrupt_identity(b"", |e| matches!(e, KeystoreError::EmptyFile(_))).await;
    assert_corrupt_identity(b"not json", |e| matches!(e, KeystoreError::Parse { .. })).await;
    assert_corrupt_identity(b"[1,2,3]", |e| matches!(e, KeystoreError::Parse { .. })).await;
    assert_corrupt_identity(br#"{"id":"Qm...","privKey":"..."}"#, |e| {
        matches!(e, KeystoreError::Parse { .. })
    })
    .await;
    assert_corrupt_identity(br#"{"id":"a","privKey":"b","pubKey":7}"#, |e| {
        matches!(e, KeystoreError::Parse { .. })
    })
    .await;
    assert_corrupt_identity(&[0xff, 0xfe, 0xfd], |e| {
        matches!(e, KeystoreError::Parse { .. })
    })
    .await;
    assert_corrupt_identity(br#"{"id":"abc","privKey":"AAAA","pubKey":"AAAA"}"#, |e| {
        matches!(e, KeystoreError::Keypair(_))
    })
    .await;
}

#[tokio::test]
async fn tampered_identity_is_rejected() {
    let (_dir, config) = setup();
    let store = PeerIdStore::new(&config);
    let identity = store.load_or_generate(None).await.unwrap();

    let other = tempfile::tempdir().unwrap();
    let other_identity = PeerIdStore::new(&KeystoreConfig::new(other.path()))
        .load_or_generate(None)
        .await
        .unwrap();

    // Swap in another node's id while keeping our keys.
    let text = std::fs::read_to_string(config.peer_id_path()).unwrap();
    let tampered = text.replace(&identity.to_base58(), &other_identity.to_base58());
    std::fs::write(config.peer_id_path(), tampered).unwrap();

    let err = store.load(None).await.unwrap_err();
    assert!(matches!(err, KeystoreError::Keypair(_)), "{err:?}");
}

#[tokio::test]
async fn empty_swarm_key_is_reported() {
    let (_dir, config) = setup();
    std::fs::write(config.swarm_key_path(), b"").unwrap();

    let err = SwarmKeyStore::new(&config)
        .load_or_generate(None)
        .await
        .unwrap_err();
    assert!(matches!(err, KeystoreError::InvalidSwarmKeyFile(_)));
    assert!(std::fs::read(config.swarm_key_path()).unwrap().is_empty());
}

#[tokio::test]
async fn one_line_swarm_key_fails_to_parse() {
    let (_dir, config) = setup();
    std::fs::write(config.swarm_key_path(), b"onlyoneline").unwrap();
    let store = SwarmKeyStore::new(&config);

    assert_eq!(store.load(None).await.unwrap(), b"onlyoneline");
    let err = store.load_object(None).await.unwrap_err();
    assert!(matches!(err, KeystoreError::MalformedSwarmKey(_)));
}

#[tokio::test]
async fn error_messages_name_the_file() {
    let (_dir, config) = setup();
    std::fs::write(config.peer_id_path(), b"{}").unwrap();

    let err = PeerIdStore::new(&config).load(None).await.unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains(".peerId"), "{msg}");
    assert!(msg.contains("missing key `id`"), "{msg}");
}
