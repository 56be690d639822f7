use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use shard_config::{report_unknown_keys, LoadedConfig, ReconciledConfig, UnknownKeyPolicy};
use shard_reconcile::{elect, initialize, SeverityTable, ShardIdentity};
use shard_topology::{StaticTopology, TopologyProvider};
use tracing::info;

#[derive(Parser)]
#[command(name = "shard")]
#[command(about = "Shard election and option reconciliation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the role this device would take in the snapshot
    Elect {
        /// Topology snapshot (JSON)
        #[arg(long)]
        topology: String,

        /// Full device name of this process
        #[arg(long)]
        device: String,

        /// Task base name shared by all shards
        #[arg(long)]
        base: String,
    },

    /// Run the full initialization and print the final configuration
    Reconcile {
        /// Topology snapshot (JSON)
        #[arg(long)]
        topology: String,

        /// Full device name (falls back to /shard/device_name in config)
        #[arg(long)]
        device: Option<String>,

        /// Task base name (falls back to /shard/base_name in config)
        #[arg(long)]
        base: Option<String>,

        /// Layered local config paths in merge order. Without it the
        /// device's own declarations in the snapshot are used.
        #[arg(long = "config")]
        config_paths: Vec<String>,

        /// Fail on unknown config keys instead of warning.
        #[arg(long, default_value_t = false)]
        strict_keys: bool,
    },

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> site -> task...)
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    // Dev-time only; a missing file is fine.
    let _ = dotenvy::from_filename(".env.local");
    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Elect {
            topology,
            device,
            base,
        } => {
            let topo = StaticTopology::load_json(&topology)?;
            let identity = ShardIdentity::new(device, base);
            let election = elect(topo.sibling_devices(), &identity)?;

            println!("role={}", election.role);
            println!("own_suffix={}", election.own_suffix.as_deref().unwrap_or(""));
            println!("leader_suffix={}", election.leader_suffix.as_deref().unwrap_or(""));
            println!("relevant_shards={}", election.shards.len());
            println!("suffixes={}", serde_json::to_string(&election.shards.suffixes())?);
        }

        Commands::Reconcile {
            topology,
            device,
            base,
            config_paths,
            strict_keys,
        } => {
            let topo = StaticTopology::load_json(&topology)?;

            let loaded = if config_paths.is_empty() {
                None
            } else {
                let path_refs: Vec<&str> = config_paths.iter().map(|s| s.as_str()).collect();
                let loaded = shard_config::load_layered_yaml(&path_refs)?;
                let policy = if strict_keys {
                    UnknownKeyPolicy::Fail
                } else {
                    UnknownKeyPolicy::Warn
                };
                report_unknown_keys(&loaded.config_json, policy)?;
                info!(
                    config_hash = %loaded.config_hash,
                    files = path_refs.len(),
                    "local config loaded"
                );
                Some(loaded)
            };

            let identity = resolve_identity(device, base, loaded.as_ref())?;
            let local = match &loaded {
                Some(l) => l.local_options()?,
                None => own_declarations(&topo, &identity.device_name)?,
            };

            let out = initialize(&topo, &identity, local, &SeverityTable).with_context(|| {
                format!("shard initialization failed for {}", identity.device_name)
            })?;

            println!("role={}", out.role);
            println!("leader_suffix={}", out.leader_suffix.as_deref().unwrap_or(""));
            println!("relevant_shards={}", out.relevant_shards);
            println!("reconciled={}", out.reconciled);
            for c in &out.changes {
                println!("adopted {}={} from {} (was {})", c.option, c.to, c.sibling, c.from);
            }
            println!("config_hash={}", out.config.config_hash()?);
            println!("{}", out.config.canonical_json()?);
        }

        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = shard_config::load_layered_yaml(&path_refs)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }
    }

    Ok(())
}

fn resolve_identity(
    device: Option<String>,
    base: Option<String>,
    loaded: Option<&LoadedConfig>,
) -> Result<ShardIdentity> {
    let section = loaded.map(LoadedConfig::identity).unwrap_or_default();
    let Some(device) = device.or(section.device_name) else {
        bail!("device name required: pass --device or set /shard/device_name");
    };
    let Some(base) = base.or(section.base_name) else {
        bail!("base name required: pass --base or set /shard/base_name");
    };
    Ok(ShardIdentity::new(device, base))
}

fn own_declarations(topo: &StaticTopology, device_name: &str) -> Result<ReconciledConfig> {
    let Some(own) = topo.sibling_devices().iter().find(|d| d.name == device_name) else {
        bail!("device {device_name} not in topology snapshot; pass --config for local options");
    };
    own.to_local_config()
        .with_context(|| format!("invalid declarations for {device_name}"))
}
