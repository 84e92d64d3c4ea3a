//! ChainTalk keys CLI, the `ctkeys` command.
//!
//! Creates and inspects the node's peer identity and the private
//! network's swarm key in the configuration directory.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};

use chaintalk_keys::config::CONFIG_DIR_ENV;
use chaintalk_keys::{KeystoreConfig, PeerIdStore, SwarmKey, SwarmKeyStore};

// ── CLI structure ─────────────────────────────────────────────────────────────

/// ChainTalk keys CLI: manage the node identity and the swarm key.
#[derive(Parser, Debug)]
#[command(name = "ctkeys", about = "ChainTalk keys CLI", version)]
struct Cli {
    /// Configuration directory holding .peerId and .swarmKey
    #[arg(long, global = true, env = CONFIG_DIR_ENV)]
    config_dir: Option<PathBuf>,

    /// Use this file instead of the default one in the configuration directory
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage the node's peer identity
    PeerId {
        #[command(subcommand)]
        subcommand: PeerIdCommands,
    },

    /// Manage the private network's swarm key
    SwarmKey {
        #[command(subcommand)]
        subcommand: SwarmKeyCommands,
    },
}

#[derive(Subcommand, Debug)]
enum PeerIdCommands {
    /// Print the stored peer id
    Show,
    /// Load the identity, creating it if absent
    Init,
    /// Replace the identity with a new one
    Regenerate {
        /// Required: the old identity is lost
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand, Debug)]
enum SwarmKeyCommands {
    /// Print the stored swarm key header
    Show,
    /// Load the swarm key, creating it if absent
    Init,
}

// ── Main entry point ──────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .init();

    let config = cli
        .config_dir
        .clone()
        .map(KeystoreConfig::new)
        .unwrap_or_else(KeystoreConfig::from_env);
    let file = cli.file.as_deref();

    let result = match cli.command {
        Commands::PeerId { subcommand } => match subcommand {
            PeerIdCommands::Show => cmd_peer_id_show(&config, file, cli.verbose).await,
            PeerIdCommands::Init => cmd_peer_id_init(&config, file).await,
            PeerIdCommands::Regenerate { force } => {
                cmd_peer_id_regenerate(&config, file, force).await
            }
        },
        Commands::SwarmKey { subcommand } => match subcommand {
            SwarmKeyCommands::Show => cmd_swarm_key_show(&config, file).await,
            SwarmKeyCommands::Init => cmd_swarm_key_init(&config, file).await,
        },
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

// ── Command implementations ───────────────────────────────────────────────────

/// `ctkeys peer-id show`
async fn cmd_peer_id_show(
    config: &KeystoreConfig,
    file: Option<&std::path::Path>,
    verbose: bool,
) -> Result<()> {
    let store = PeerIdStore::new(config);
    let path = store.resolve_path(file);
    let identity = store
        .load(file)
        .await
        .with_context(|| format!("failed to load peer identity from {}", path.display()))?;

    println!("{identity}");
    if verbose {
        println!("  Type: {}", identity.kind);
        println!("  File: {}", path.display());
    }
    Ok(())
}

/// `ctkeys peer-id init`
async fn cmd_peer_id_init(config: &KeystoreConfig, file: Option<&std::path::Path>) -> Result<()> {
    let store = PeerIdStore::new(config);
    let path = store.resolve_path(file);
    let identity = store
        .load_or_generate(file)
        .await
        .with_context(|| format!("failed to initialise peer identity at {}", path.display()))?;

    println!("{identity}");
    Ok(())
}

/// `ctkeys peer-id regenerate --force`
async fn cmd_peer_id_regenerate(
    config: &KeystoreConfig,
    file: Option<&std::path::Path>,
    force: bool,
) -> Result<()> {
    if !force {
        return Err(anyhow!(
            "regenerating replaces the current identity; pass --force to confirm"
        ));
    }
    let store = PeerIdStore::new(config);
    let identity = store
        .regenerate(file)
        .await
        .context("failed to regenerate peer identity")?;

    println!("{identity}");
    Ok(())
}

/// `ctkeys swarm-key show`
async fn cmd_swarm_key_show(config: &KeystoreConfig, file: Option<&std::path::Path>) -> Result<()> {
    let store = SwarmKeyStore::new(config);
    let path = store.resolve_path(file);
    let key = store
        .load_object(file)
        .await
        .with_context(|| format!("failed to load swarm key from {}", path.display()))?;

    print_swarm_key(&key);
    Ok(())
}

/// `ctkeys swarm-key init`
async fn cmd_swarm_key_init(config: &KeystoreConfig, file: Option<&std::path::Path>) -> Result<()> {
    let store = SwarmKeyStore::new(config);
    let path = store.resolve_path(file);
    let bytes = store
        .load_or_generate(file)
        .await
        .with_context(|| format!("failed to initialise swarm key at {}", path.display()))?;
    let key = SwarmKey::parse(&bytes).context("stored swarm key is malformed")?;

    print_swarm_key(&key);
    Ok(())
}

// ── Output helpers ────────────────────────────────────────────────────────────

/// Print the swarm key header and fingerprint. The key material itself is
/// never printed.
fn print_swarm_key(key: &SwarmKey) {
    println!("Protocol:    {}", key.protocol);
    println!("Encoding:    {}", key.encoding);
    match key.psk() {
        Ok(psk) => println!("Fingerprint: {}", psk.fingerprint()),
        Err(e) => println!("Key:         not usable ({e})"),
    }
}
