// # secconf - Security Configuration Driver
//
// This is a THIN integration layer:
// - DO NOT add handler logic or remote-API logic here
// - All lifecycle logic lives in secconf-core (Reconciler) and the handler crates
// - Credentials are read from environment variables ONLY
//
// The driver is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing tracing and the runtime
// 3. Registering handlers with their injected clients
// 4. Running one lifecycle operation and printing the resulting Local State
//
// ## Configuration
//
// ### Credentials (EdgeGrid)
// - `SECCONF_HOST`: API host, without scheme
// - `SECCONF_CLIENT_TOKEN`: Client token
// - `SECCONF_CLIENT_SECRET`: Client secret
// - `SECCONF_ACCESS_TOKEN`: Access token
// - `SECCONF_BASE_URL`: Override for the base URL (optional)
// - `SECCONF_MAX_BODY`: Maximum body bytes in the content hash (optional)
//
// ### Client
// - `SECCONF_REQUEST_TIMEOUT_SECS`: HTTP timeout per request (optional)
//
// ### State Store
// - `SECCONF_STATE_PATH`: Path to the state file (default: secconf-state.json)
//
// ### Logging
// - `SECCONF_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export SECCONF_HOST=akab-xxxx.luna.akamaiapis.net
// export SECCONF_CLIENT_TOKEN=akab-...
// export SECCONF_CLIENT_SECRET=...
// export SECCONF_ACCESS_TOKEN=akab-...
//
// secconf apply waf.constraints akamai_appsec_api_request_constraints \
//     config_id=43253 version=7 security_policy_id=AAAA_81230 action=deny
// secconf data akamai_appsec_reputation_profiles config_id=43253 version=7
// secconf destroy waf.constraints
// ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use secconf_core::{
    ApiClient, ClientConfig, EdgeGridConfig, FileStateStore, HandlerRegistry, OpContext,
    ProviderConfig, Reconciler, ResourceData,
};
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tabled::{Table, Tabled};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: Operation succeeded
/// - 1: Configuration or startup error
/// - 2: Operation failed
/// - 130: Operation cancelled (Ctrl-C) or deadline exceeded
#[derive(Debug, Clone, Copy)]
enum SecconfExitCode {
    Success = 0,
    ConfigError = 1,
    OperationError = 2,
    Cancelled = 130,
}

impl From<SecconfExitCode> for ExitCode {
    fn from(code: SecconfExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Parser)]
#[command(name = "secconf")]
#[command(about = "Manage security configuration objects", long_about = None)]
struct Cli {
    /// Abort the operation after this many seconds
    #[arg(long)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or update a resource
    Apply {
        /// Resource address (e.g. waf.constraints)
        address: String,
        /// Resource type name
        type_name: String,
        /// Field assignments (key=value)
        assignments: Vec<String>,
    },

    /// Refresh a managed resource from the remote side
    Refresh {
        /// Resource address
        address: String,
    },

    /// Delete a managed resource
    Destroy {
        /// Resource address
        address: String,
    },

    /// Adopt an existing remote object
    Import {
        /// Resource address
        address: String,
        /// Resource type name
        type_name: String,
        /// Identifier (config_id:version:policy_id[:sub_id])
        id: String,
    },

    /// Read a data source
    Data {
        /// Data source type name
        type_name: String,
        /// Field assignments (key=value)
        assignments: Vec<String>,
    },

    /// List managed resources, or registered handler types
    List {
        /// List registered handler types instead
        #[arg(long)]
        types: bool,
    },
}

impl Commands {
    /// Whether the command needs configured handlers
    ///
    /// Only listing managed resources works from the state file alone.
    fn needs_credentials(&self) -> bool {
        !matches!(self, Commands::List { types: false })
    }
}

/// Application configuration
struct Config {
    host: String,
    client_token: String,
    client_secret: String,
    access_token: String,
    base_url: Option<String>,
    max_body: Option<usize>,
    request_timeout_secs: Option<u64>,
    state_path: String,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("SECCONF_HOST").unwrap_or_default(),
            client_token: env::var("SECCONF_CLIENT_TOKEN").unwrap_or_default(),
            client_secret: env::var("SECCONF_CLIENT_SECRET").unwrap_or_default(),
            access_token: env::var("SECCONF_ACCESS_TOKEN").unwrap_or_default(),
            base_url: env::var("SECCONF_BASE_URL").ok().filter(|s| !s.is_empty()),
            max_body: parse_var("SECCONF_MAX_BODY")?,
            request_timeout_secs: parse_var("SECCONF_REQUEST_TIMEOUT_SECS")?,
            state_path: env::var("SECCONF_STATE_PATH")
                .unwrap_or_else(|_| "secconf-state.json".to_string()),
            log_level: env::var("SECCONF_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    ///
    /// Credentials are only checked when the command needs them.
    fn validate(&self, needs_credentials: bool) -> Result<()> {
        if needs_credentials {
            for (name, value) in [
                ("SECCONF_CLIENT_TOKEN", &self.client_token),
                ("SECCONF_CLIENT_SECRET", &self.client_secret),
                ("SECCONF_ACCESS_TOKEN", &self.access_token),
            ] {
                if value.is_empty() {
                    anyhow::bail!("{} is required. Set it via: export {}=...", name, name);
                }

                // Check for obvious placeholder values (common mistake)
                let lower = value.to_lowercase();
                if lower.contains("your_") || lower.contains("replace_me") || lower == "token" {
                    anyhow::bail!(
                        "{} appears to be a placeholder. Use the value from your API client credentials.",
                        name
                    );
                }
            }

            if self.host.is_empty() && self.base_url.is_none() {
                anyhow::bail!(
                    "SECCONF_HOST is required. Set it via: export SECCONF_HOST=akab-xxxx.luna.akamaiapis.net"
                );
            }

            if let Some(ref url) = self.base_url
                && !url.starts_with("https://")
                && !url.starts_with("http://")
            {
                anyhow::bail!("SECCONF_BASE_URL must use HTTP or HTTPS scheme. Got: {}", url);
            }
        }

        if let Some(max_body) = self.max_body
            && !(1..=10 * 1024 * 1024).contains(&max_body)
        {
            anyhow::bail!(
                "SECCONF_MAX_BODY must be between 1 and 10485760 bytes. Got: {}",
                max_body
            );
        }

        if let Some(timeout) = self.request_timeout_secs
            && !(1..=300).contains(&timeout)
        {
            anyhow::bail!(
                "SECCONF_REQUEST_TIMEOUT_SECS must be between 1 and 300 seconds. Got: {}",
                timeout
            );
        }

        if self.state_path.is_empty() {
            anyhow::bail!("SECCONF_STATE_PATH cannot be empty");
        }

        if let Some(parent) = std::path::Path::new(&self.state_path).parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            anyhow::bail!(
                "SECCONF_STATE_PATH parent directory does not exist: {}. Create it first: mkdir -p {}",
                parent.display(),
                parent.display()
            );
        }

        parse_level(&self.log_level)?;
        Ok(())
    }

    /// Client configuration for the handlers
    fn provider_config(&self) -> ProviderConfig {
        let mut edgegrid = EdgeGridConfig::new(
            self.host.clone(),
            self.client_token.clone(),
            self.client_secret.clone(),
            self.access_token.clone(),
        );
        if let Some(ref url) = self.base_url {
            edgegrid = edgegrid.with_base_url(url.clone());
        }
        if let Some(max_body) = self.max_body {
            edgegrid.max_body = max_body;
        }

        let mut client = ClientConfig::default();
        if let Some(timeout) = self.request_timeout_secs {
            client.request_timeout_secs = timeout;
        }

        ProviderConfig { edgegrid, client }
    }
}

/// Parse an optional numeric environment variable
fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{} must be a number. Got: {}", name, raw)),
        _ => Ok(None),
    }
}

fn parse_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "SECCONF_LOG_LEVEL '{}' is not valid. Valid levels: trace, debug, info, warn, error",
            level
        ),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return SecconfExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate(cli.command.needs_credentials()) {
        eprintln!("Configuration validation error: {}", e);
        return SecconfExitCode::ConfigError.into();
    }

    // Initialize tracing; logs go to stderr so stdout carries only results
    let log_level = parse_level(&config.log_level).unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return SecconfExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return SecconfExitCode::ConfigError.into();
        }
    };

    rt.block_on(async {
        match run(cli, config).await {
            Ok(()) => SecconfExitCode::Success,
            Err(e) => {
                let cancelled = e
                    .downcast_ref::<secconf_core::Error>()
                    .is_some_and(secconf_core::Error::is_cancelled);
                if cancelled {
                    warn!("Operation aborted: {}", e);
                    SecconfExitCode::Cancelled
                } else {
                    error!("Operation failed: {:#}", e);
                    SecconfExitCode::OperationError
                }
            }
        }
    })
    .into()
}

/// Register every compiled-in handler crate
fn build_registry(config: &Config, needs_credentials: bool) -> Result<HandlerRegistry> {
    let registry = HandlerRegistry::new();
    if !needs_credentials {
        return Ok(registry);
    }

    let provider_config = config.provider_config();

    #[cfg(feature = "appsec")]
    {
        let api = ApiClient::new(&provider_config).context("Failed to create API client")?;
        secconf_appsec::register(&registry, Arc::new(secconf_appsec::HttpAppSecClient::new(api)));
    }

    #[cfg(feature = "botman")]
    {
        let api = ApiClient::new(&provider_config).context("Failed to create API client")?;
        secconf_botman::register(&registry, Arc::new(secconf_botman::HttpBotmanClient::new(api)));
    }

    Ok(registry)
}

/// Operation context cancelled by Ctrl-C
fn operation_context(timeout: Option<u64>) -> OpContext {
    let mut ctx = OpContext::new();
    if let Some(secs) = timeout {
        ctx = ctx.with_timeout(Duration::from_secs(secs));
    }

    let canceller = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Received SIGINT, cancelling the in-flight operation");
            canceller.cancel();
        }
    });

    ctx
}

/// Parse `key=value` assignments against a handler schema
fn parse_input(
    schema: &secconf_core::Schema,
    assignments: &[String],
) -> secconf_core::Result<ResourceData> {
    schema.parse_assignments(assignments.iter().map(String::as_str))
}

fn print_data(data: &ResourceData) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

#[derive(Tabled)]
struct ManagedRow {
    #[tabled(rename = "ADDRESS")]
    address: String,
    #[tabled(rename = "TYPE")]
    type_name: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "UPDATED")]
    updated: String,
}

#[derive(Tabled)]
struct TypeRow {
    #[tabled(rename = "TYPE")]
    type_name: String,
    #[tabled(rename = "KIND")]
    kind: &'static str,
}

/// Run one command
async fn run(cli: Cli, config: Config) -> Result<()> {
    let needs_credentials = cli.command.needs_credentials();
    let registry = Arc::new(build_registry(&config, needs_credentials)?);

    let store = FileStateStore::new(&config.state_path)
        .await
        .with_context(|| format!("Failed to open state file {}", config.state_path))?;
    let reconciler = Reconciler::new(registry.clone(), Arc::new(store));
    let ctx = operation_context(cli.timeout);

    match cli.command {
        Commands::Apply {
            address,
            type_name,
            assignments,
        } => {
            let input = parse_input(registry.resource(&type_name)?.schema(), &assignments)?;
            let data = reconciler.apply(&ctx, &address, &type_name, input).await?;
            info!("Applied {}", address);
            print_data(&data)?;
        }

        Commands::Refresh { address } => {
            let data = reconciler.refresh(&ctx, &address).await?;
            print_data(&data)?;
        }

        Commands::Destroy { address } => {
            reconciler.destroy(&ctx, &address).await?;
            info!("Destroyed {}", address);
        }

        Commands::Import {
            address,
            type_name,
            id,
        } => {
            let data = reconciler.import(&ctx, &address, &type_name, &id).await?;
            info!("Imported {} as {}", id, address);
            print_data(&data)?;
        }

        Commands::Data {
            type_name,
            assignments,
        } => {
            let input = parse_input(registry.data_source(&type_name)?.schema(), &assignments)?;
            let data = reconciler.read_data_source(&ctx, &type_name, input).await?;
            print_data(&data)?;
        }

        Commands::List { types: true } => {
            let rows = registry
                .list_resources()
                .into_iter()
                .map(|type_name| TypeRow {
                    type_name,
                    kind: "resource",
                })
                .chain(
                    registry
                        .list_data_sources()
                        .into_iter()
                        .map(|type_name| TypeRow {
                            type_name,
                            kind: "data source",
                        }),
                );
            println!("{}", Table::new(rows));
        }

        Commands::List { types: false } => {
            let mut rows = Vec::new();
            for address in reconciler.addresses().await? {
                if let Some(record) = reconciler.get(&address).await? {
                    rows.push(ManagedRow {
                        id: record.data.id().unwrap_or("-").to_string(),
                        type_name: record.type_name,
                        updated: record.last_updated.to_rfc3339(),
                        address,
                    });
                }
            }
            println!("{}", Table::new(rows));
        }
    }

    Ok(())
}
