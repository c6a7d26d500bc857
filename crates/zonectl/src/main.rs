// # zonectl - zone record management
//
// Thin command-line layer over zonekit-core. All reconciliation logic lives
// in the core crate; this binary only reads configuration, builds the zone
// API, runs one operation and prints the result.
//
// ## Usage
//
// ```text
// zonectl get
// zonectl append|set|delete <TYPE> <NAME> <DATA> [TTL_SECS] [ID]
// zonectl plan-set|plan-delete <TYPE> <NAME> <DATA> [TTL_SECS] [ID]
// ```
//
// Records are printed to stdout as JSON lines. `plan-*` commands print the
// planned provider calls without issuing any write.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// - `ZONEKIT_PROVIDER_TYPE`: Provider type (netcup, memory). Default: netcup
// - `ZONEKIT_ZONE`: Zone to operate on (required)
// - `ZONEKIT_NETCUP_CUSTOMER_NUMBER`: netcup customer number
// - `ZONEKIT_NETCUP_API_KEY`: netcup API key
// - `ZONEKIT_NETCUP_API_PASSWORD`: netcup API password
// - `ZONEKIT_NETCUP_ENDPOINT`: Endpoint override (optional)
// - `ZONEKIT_MATCH_POLICY`: first_match (default) or strict
// - `ZONEKIT_LOG_LEVEL`: trace, debug, info, warn, error. Default: warn
//
// ## Example
//
// ```bash
// export ZONEKIT_ZONE=example.com
// export ZONEKIT_NETCUP_CUSTOMER_NUMBER=12345
// export ZONEKIT_NETCUP_API_KEY=...
// export ZONEKIT_NETCUP_API_PASSWORD=...
//
// zonectl set TXT _acme-challenge token-value
// ```

use anyhow::{Context, Result};
use std::env;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use zonekit_core::{
    CancelHandle, CancelSignal, ClientConfig, Error, MatchPolicy, PlannedOp, ProviderConfig,
    ProviderRegistry, RecordManager, RecordType, Reconciler, ReconcilerConfig, ResourceRecord,
};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Success
/// - 1: Configuration or usage error
/// - 2: Operation failed, nothing applied
/// - 3: Operation partially applied
/// - 130: Cancelled by signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ZonectlExitCode {
    /// Operation completed
    Success = 0,
    /// Configuration error or invalid arguments
    ConfigError = 1,
    /// Operation failed before anything was applied
    OperationFailed = 2,
    /// Some records were applied before the failure
    PartialFailure = 3,
    /// Cancelled by SIGINT/SIGTERM
    Cancelled = 130,
}

impl From<ZonectlExitCode> for ExitCode {
    fn from(code: ZonectlExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

impl ZonectlExitCode {
    fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<Error>() {
            Some(e) if e.is_cancelled() => ZonectlExitCode::Cancelled,
            Some(Error::PartialFailure { .. }) => ZonectlExitCode::PartialFailure,
            Some(Error::Config(_)) | Some(Error::InvalidInput(_)) => ZonectlExitCode::ConfigError,
            _ => ZonectlExitCode::OperationFailed,
        }
    }
}

/// Operation selected on the command line
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Get,
    Append(ResourceRecord),
    Set(ResourceRecord),
    Delete(ResourceRecord),
    PlanSet(ResourceRecord),
    PlanDelete(ResourceRecord),
}

impl Command {
    fn parse(args: &[String]) -> Result<Self> {
        let (name, rest) = args
            .split_first()
            .ok_or_else(|| anyhow::anyhow!("missing command\n\n{}", USAGE))?;

        if name == "get" {
            if !rest.is_empty() {
                anyhow::bail!("get takes no arguments\n\n{}", USAGE);
            }
            return Ok(Command::Get);
        }

        let build: fn(ResourceRecord) -> Command = match name.as_str() {
            "append" => Command::Append,
            "set" => Command::Set,
            "delete" => Command::Delete,
            "plan-set" => Command::PlanSet,
            "plan-delete" => Command::PlanDelete,
            other => anyhow::bail!("unknown command '{}'\n\n{}", other, USAGE),
        };
        Ok(build(parse_record(rest)?))
    }
}

const USAGE: &str = "usage: zonectl get\n       \
    zonectl append|set|delete|plan-set|plan-delete <TYPE> <NAME> <DATA> [TTL_SECS] [ID]";

/// Parse `<TYPE> <NAME> <DATA> [TTL_SECS] [ID]`
fn parse_record(args: &[String]) -> Result<ResourceRecord> {
    let [record_type, name, data, optional @ ..] = args else {
        anyhow::bail!("expected <TYPE> <NAME> <DATA>\n\n{}", USAGE);
    };
    if optional.len() > 2 {
        anyhow::bail!("too many arguments\n\n{}", USAGE);
    }

    let record_type: RecordType = record_type.parse()?;
    let mut record = ResourceRecord::new(name.clone(), record_type, data.clone());

    if let Some(ttl) = optional.first().filter(|s| !s.is_empty() && *s != "-") {
        let secs: u64 = ttl
            .parse()
            .with_context(|| format!("TTL_SECS must be a number of seconds. Got: {}", ttl))?;
        record = record.with_ttl(Duration::from_secs(secs));
    }
    if let Some(id) = optional.get(1).filter(|s| !s.is_empty()) {
        record = record.with_id(id.as_str());
    }

    Ok(record)
}

/// Application configuration
struct Config {
    zone: String,
    client: ClientConfig,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let zone = env::var("ZONEKIT_ZONE")
            .context("ZONEKIT_ZONE is required. Set it via: export ZONEKIT_ZONE=example.com")?;
        let provider_type =
            env::var("ZONEKIT_PROVIDER_TYPE").unwrap_or_else(|_| "netcup".to_string());

        let provider = match provider_type.as_str() {
            "netcup" => ProviderConfig::Netcup {
                customer_number: env::var("ZONEKIT_NETCUP_CUSTOMER_NUMBER")
                    .context("ZONEKIT_NETCUP_CUSTOMER_NUMBER is required")?,
                api_key: env::var("ZONEKIT_NETCUP_API_KEY")
                    .context("ZONEKIT_NETCUP_API_KEY is required")?,
                api_password: env::var("ZONEKIT_NETCUP_API_PASSWORD")
                    .context("ZONEKIT_NETCUP_API_PASSWORD is required")?,
                endpoint: env::var("ZONEKIT_NETCUP_ENDPOINT").ok(),
                timeout_secs: 30,
            },
            // Starts empty on every run
            "memory" => ProviderConfig::Memory {
                zones: vec![zone.clone()],
            },
            other => anyhow::bail!(
                "ZONEKIT_PROVIDER_TYPE '{}' is not supported. \
                Supported providers: netcup, memory",
                other
            ),
        };

        let match_policy: MatchPolicy = match env::var("ZONEKIT_MATCH_POLICY") {
            Ok(policy) => policy.parse()?,
            Err(_) => MatchPolicy::default(),
        };

        Ok(Self {
            zone,
            client: ClientConfig {
                provider,
                reconciler: ReconcilerConfig { match_policy },
            },
            log_level: env::var("ZONEKIT_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.zone.trim_end_matches('.').is_empty() {
            anyhow::bail!("ZONEKIT_ZONE cannot be empty");
        }

        self.client.validate()?;
        parse_log_level(&self.log_level)?;
        Ok(())
    }
}

fn parse_log_level(level: &str) -> Result<Level> {
    Ok(match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => anyhow::bail!(
            "ZONEKIT_LOG_LEVEL '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            level
        ),
    })
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}", e);
            return ZonectlExitCode::ConfigError.into();
        }
    };

    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return ZonectlExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return ZonectlExitCode::ConfigError.into();
    }

    // Logs go to stderr so stdout stays machine-readable
    let log_level = parse_log_level(&config.log_level).unwrap_or(Level::WARN);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ZonectlExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return ZonectlExitCode::OperationFailed.into();
        }
    };

    rt.block_on(async {
        let (handle, cancel) = CancelSignal::new();
        tokio::spawn(cancel_on_shutdown(handle));

        match run(config, command, &cancel).await {
            Ok(()) => ZonectlExitCode::Success,
            Err(e) => {
                error!("{:#}", e);
                eprintln!("error: {:#}", e);
                ZonectlExitCode::for_error(&e)
            }
        }
    })
    .into()
}

/// What a command produced
#[derive(Debug)]
enum Output {
    Records(Vec<ResourceRecord>),
    Plan(Vec<PlannedOp>),
}

impl Output {
    /// Print as JSON lines on stdout
    fn print(&self) -> Result<()> {
        match self {
            Output::Records(records) => {
                for record in records {
                    println!("{}", serde_json::to_string(record)?);
                }
            }
            Output::Plan(plan) => {
                for op in plan {
                    println!(
                        "{}",
                        serde_json::json!({
                            "action": op.action.to_string(),
                            "record": op.record,
                        })
                    );
                }
            }
        }
        Ok(())
    }
}

/// Create the zone API from the registry and wrap it in a reconciler
fn build_reconciler(config: &Config) -> Result<Reconciler> {
    let registry = ProviderRegistry::with_builtins();

    #[cfg(feature = "netcup")]
    zonekit_provider_netcup::register(&registry);

    debug!("Registered providers: {:?}", registry.list_providers());
    info!(
        "Using {} provider for zone {}",
        config.client.provider.type_name(),
        config.zone
    );

    let api = registry.create_zone_api(&config.client.provider)?;
    Ok(Reconciler::new(api, config.client.reconciler.clone()))
}

/// Run one command against `zone`
async fn execute(
    reconciler: &Reconciler,
    zone: &str,
    command: Command,
    cancel: &CancelSignal,
) -> Result<Output> {
    Ok(match command {
        Command::Get => Output::Records(reconciler.get_records(zone, cancel).await?),
        Command::Append(record) => {
            Output::Records(reconciler.append_records(zone, &[record], cancel).await?)
        }
        Command::Set(record) => {
            Output::Records(reconciler.set_records(zone, &[record], cancel).await?)
        }
        Command::Delete(record) => {
            Output::Records(reconciler.delete_records(zone, &[record], cancel).await?)
        }
        Command::PlanSet(record) => {
            Output::Plan(reconciler.preview_set(zone, &[record], cancel).await?)
        }
        Command::PlanDelete(record) => {
            Output::Plan(reconciler.preview_delete(zone, &[record], cancel).await?)
        }
    })
}

/// Build the reconciler, run one command and print its output
async fn run(config: Config, command: Command, cancel: &CancelSignal) -> Result<()> {
    let reconciler = build_reconciler(&config)?;
    execute(&reconciler, &config.zone, command, cancel)
        .await?
        .print()
}

/// Fire the cancel signal on SIGTERM or SIGINT
///
/// Calls already issued complete; the reconciler stops before the next one.
#[cfg(unix)]
async fn cancel_on_shutdown(handle: CancelHandle) {
    let (mut sigterm, mut sigint) = match (
        signal(SignalKind::terminate()),
        signal(SignalKind::interrupt()),
    ) {
        (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
        (Err(e), _) | (_, Err(e)) => {
            warn!("Failed to setup signal handlers: {}", e);
            return;
        }
    };

    let received = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    warn!("Received {}, cancelling", received);
    handle.cancel();
}

/// Fire the cancel signal on Ctrl-C
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn cancel_on_shutdown(handle: CancelHandle) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            warn!("Received Ctrl-C, cancelling");
            handle.cancel();
        }
        Err(e) => warn!("Failed to wait for Ctrl-C: {}", e),
    }
}
