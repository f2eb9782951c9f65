// # zonesync - Zone Record Runner
//
// This binary is a THIN integration layer over zonesync-core:
// - DO NOT add codec, diff or session logic here
// - All reconciliation logic lives in zonesync-core
// - Configuration is via environment variables ONLY
//
// The zonesync binary is responsible for:
// 1. Reading configuration from environment variables
// 2. Registering transports and building the reconciler
// 3. Running one record operation against one zone
// 4. Printing the resulting records as JSON and closing the session
//
// ## Usage
//
// ```text
// zonesync <get|append|set|delete>
// ```
//
// ## Configuration
//
// ### Provider
// - `ZONESYNC_PROVIDER`: Transport type (hexonet, memory)
// - `ZONESYNC_USERNAME`: Account login
// - `ZONESYNC_PASSWORD`: Account password
// - `ZONESYNC_ENTITY`: API environment (live, ote)
// - `ZONESYNC_ENDPOINT`: Gateway URL override (optional)
// - `ZONESYNC_DEBUG`: Raw traffic dump (stderr, trace). stdout carries the
//   JSON result, so a stdout dump is written to stderr instead
//
// ### Operation
// - `ZONESYNC_ZONE`: Zone to operate on
// - `ZONESYNC_RECORDS_FILE`: JSON array of records (append, set, delete)
// - `ZONESYNC_IDENTITY`: Record identity for set (type_value, type_name_value)
// - `ZONESYNC_TTL_PARSING`: TTL overflow handling (strict, lenient)
// - `ZONESYNC_LOG_LEVEL`: trace, debug, info, warn, error
//
// ## Example
//
// ```bash
// export ZONESYNC_PROVIDER=hexonet
// export ZONESYNC_USERNAME=acme
// export ZONESYNC_PASSWORD=your_password
// export ZONESYNC_ENTITY=ote
// export ZONESYNC_ZONE=example.com
// export ZONESYNC_RECORDS_FILE=/etc/zonesync/records.json
//
// zonesync set
// ```

use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use zonesync_core::traffic::DebugTarget;
use zonesync_core::{
    Entity, IdentityPolicy, ProviderConfig, ReconcileConfig, Record, TransportRegistry,
    TtlParsing, ZoneProvider, ZoneReconciler, ZoneSyncConfig,
};

/// Exit codes for different termination scenarios
///
/// - 0: Operation completed
/// - 1: Configuration or startup error
/// - 2: Runtime error (remote or transport failure)
#[derive(Debug, Clone, Copy)]
enum ZoneSyncExitCode {
    /// Operation completed
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error
    RuntimeError = 2,
}

impl From<ZoneSyncExitCode> for ExitCode {
    fn from(code: ZoneSyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Record operation selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Get,
    Append,
    Set,
    Delete,
}

impl Action {
    /// Whether the action takes a records file
    fn needs_records(self) -> bool {
        !matches!(self, Action::Get)
    }
}

impl FromStr for Action {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "get" => Ok(Action::Get),
            "append" => Ok(Action::Append),
            "set" => Ok(Action::Set),
            "delete" => Ok(Action::Delete),
            other => anyhow::bail!(
                "Unknown action '{}'. Usage: zonesync <get|append|set|delete>",
                other
            ),
        }
    }
}

/// Application configuration
#[derive(Debug)]
struct Config {
    action: Action,
    provider_type: String,
    username: String,
    password: String,
    entity: String,
    endpoint: Option<String>,
    debug: Option<String>,
    zone: String,
    records_file: Option<PathBuf>,
    identity: String,
    ttl_parsing: String,
    log_level: String,
}

impl Config {
    /// Load configuration from the command line and environment variables
    fn from_env() -> Result<Self> {
        let action = env::args().nth(1).unwrap_or_default();
        Self::from_lookup(&action, |key| env::var(key).ok())
    }

    /// Load configuration through a variable lookup
    fn from_lookup(action: &str, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            action: action.parse()?,
            provider_type: var("ZONESYNC_PROVIDER").unwrap_or_else(|| "hexonet".to_string()),
            username: var("ZONESYNC_USERNAME").unwrap_or_default(),
            password: var("ZONESYNC_PASSWORD").unwrap_or_default(),
            entity: var("ZONESYNC_ENTITY").unwrap_or_else(|| "live".to_string()),
            endpoint: var("ZONESYNC_ENDPOINT").filter(|s| !s.is_empty()),
            debug: var("ZONESYNC_DEBUG").filter(|s| !s.is_empty()),
            zone: var("ZONESYNC_ZONE").unwrap_or_default(),
            records_file: var("ZONESYNC_RECORDS_FILE")
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            identity: var("ZONESYNC_IDENTITY").unwrap_or_else(|| "type_value".to_string()),
            ttl_parsing: var("ZONESYNC_TTL_PARSING").unwrap_or_else(|| "strict".to_string()),
            log_level: var("ZONESYNC_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        match self.provider_type.as_str() {
            "hexonet" => {
                if self.username.is_empty() {
                    anyhow::bail!(
                        "ZONESYNC_USERNAME is required. \
                        Set it via: export ZONESYNC_USERNAME=your_login"
                    );
                }
                if self.password.is_empty() {
                    anyhow::bail!(
                        "ZONESYNC_PASSWORD is required. \
                        Set it via: export ZONESYNC_PASSWORD=your_password"
                    );
                }
                if Entity::parse(&self.entity).is_none() {
                    anyhow::bail!(
                        "ZONESYNC_ENTITY '{}' is not valid. Valid values: live, ote",
                        self.entity
                    );
                }
            }
            "memory" => {}
            _ => anyhow::bail!(
                "ZONESYNC_PROVIDER '{}' is not supported. \
                Supported providers: hexonet, memory",
                self.provider_type
            ),
        }

        if self.zone.trim().is_empty() {
            anyhow::bail!(
                "ZONESYNC_ZONE is required. Set it via: export ZONESYNC_ZONE=example.com"
            );
        }

        if self.action.needs_records() && self.records_file.is_none() {
            anyhow::bail!("ZONESYNC_RECORDS_FILE is required for {:?}", self.action);
        }

        self.identity_policy()?;
        self.ttl_policy()?;

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "ZONESYNC_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    fn identity_policy(&self) -> Result<IdentityPolicy> {
        match self.identity.as_str() {
            "type_value" => Ok(IdentityPolicy::TypeValue),
            "type_name_value" => Ok(IdentityPolicy::TypeNameValue),
            other => anyhow::bail!(
                "ZONESYNC_IDENTITY '{}' is not valid. Valid values: type_value, type_name_value",
                other
            ),
        }
    }

    fn ttl_policy(&self) -> Result<TtlParsing> {
        match self.ttl_parsing.as_str() {
            "strict" => Ok(TtlParsing::Strict),
            "lenient" => Ok(TtlParsing::Lenient),
            other => anyhow::bail!(
                "ZONESYNC_TTL_PARSING '{}' is not valid. Valid values: strict, lenient",
                other
            ),
        }
    }

    /// Traffic dump target, kept off stdout
    fn debug_target(&self) -> Option<String> {
        self.debug
            .as_deref()
            .map(|value| match DebugTarget::parse(value) {
                DebugTarget::Stdout => "stderr".to_string(),
                _ => value.to_string(),
            })
    }

    /// Build the library configuration
    fn to_zonesync_config(&self) -> Result<ZoneSyncConfig> {
        let provider = match self.provider_type.as_str() {
            "memory" => ProviderConfig::Memory,
            _ => ProviderConfig::Hexonet {
                username: self.username.clone(),
                password: self.password.clone(),
                entity: Entity::parse(&self.entity).unwrap_or_default(),
                endpoint: self.endpoint.clone(),
                debug: self.debug_target(),
            },
        };

        Ok(ZoneSyncConfig {
            provider,
            reconcile: ReconcileConfig {
                identity: self.identity_policy()?,
                ttl_parsing: self.ttl_policy()?,
            },
        })
    }
}

/// Load the records file (a JSON array of records)
fn load_records(path: &Path) -> Result<Vec<Record>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read records file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid records file {}", path.display()))
}

/// Build the transport registry with every compiled-in transport
fn build_registry() -> TransportRegistry {
    let registry = TransportRegistry::with_builtins();

    #[cfg(feature = "hexonet")]
    {
        info!("Registering Hexonet transport");
        zonesync_hexonet::register(&registry);
    }

    registry
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ZoneSyncExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return ZoneSyncExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // stdout carries the JSON result
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ZoneSyncExitCode::ConfigError.into();
    }

    let records = match &config.records_file {
        Some(path) => match load_records(path) {
            Ok(records) => records,
            Err(e) => {
                error!("{:#}", e);
                return ZoneSyncExitCode::ConfigError.into();
            }
        },
        None => Vec::new(),
    };

    let reconciler = match config
        .to_zonesync_config()
        .and_then(|cfg| Ok(ZoneReconciler::from_config(&build_registry(), &cfg)?))
    {
        Ok(reconciler) => reconciler,
        Err(e) => {
            error!("Failed to create reconciler: {}", e);
            return ZoneSyncExitCode::ConfigError.into();
        }
    };

    info!(
        "Running {:?} on zone {} with {} record(s)",
        config.action,
        config.zone,
        records.len()
    );

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return ZoneSyncExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        let outcome = run(&reconciler, config.action, &config.zone, &records).await;
        if let Err(e) = reconciler.close().await {
            warn!("Failed to close session: {}", e);
        }
        outcome
    });

    match result.and_then(|records| Ok(serde_json::to_string_pretty(&records)?)) {
        Ok(json) => {
            println!("{json}");
            ZoneSyncExitCode::Success.into()
        }
        Err(e) => {
            error!("Operation failed: {}", e);
            ZoneSyncExitCode::RuntimeError.into()
        }
    }
}

/// Run one action against a zone
async fn run(
    provider: &dyn ZoneProvider,
    action: Action,
    zone: &str,
    records: &[Record],
) -> Result<Vec<Record>> {
    let result = match action {
        Action::Get => provider.get_records(zone).await,
        Action::Append => provider.append_records(zone, records).await,
        Action::Set => provider.set_records(zone, records).await,
        Action::Delete => provider.delete_records(zone, records).await,
    };
    Ok(result?)
}
