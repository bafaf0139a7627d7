use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gcp_ip_list::config::Config;
use gcp_ip_list::gcp::client::GcpClient;
use gcp_ip_list::gcp::http::format_gcp_error;
use gcp_ip_list::inventory::{self, registry, AssetKind, Scope, Visibility};
use gcp_ip_list::output::{self, OutputFormat};
use gcp_ip_list::{Error, VERSION};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// List the IP addresses attached to GCP resources
#[derive(Parser, Debug)]
#[command(name = "gcp-ip-list", version = VERSION, about, long_about = None)]
struct Args {
    /// The scope to search (organizations/123456, folders/123456, or projects/my-project)
    #[arg(short, long)]
    scope: Option<String>,

    /// The output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Include public IPs only
    #[arg(long, conflicts_with = "private")]
    public: bool,

    /// Include private IPs only
    #[arg(long)]
    private: bool,

    /// Asset type to query (repeatable, defaults to all supported types)
    #[arg(long = "asset-type", value_name = "ASSET_TYPE")]
    asset_types: Vec<String>,

    /// Print the supported asset types and exit
    #[arg(long)]
    list_asset_types: bool,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

/// RUST_LOG overrides --log-level when set
fn setup_logging(
    level: LogLevel,
    log_file: Option<&Path>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let rust_log = std::env::var("RUST_LOG").ok().filter(|v| !v.is_empty());
    let filter = match (rust_log, level.to_tracing_level()) {
        (Some(directives), _) => EnvFilter::new(directives),
        (None, Some(level)) => EnvFilter::new(level.to_string()),
        (None, None) => return Ok(None),
    };

    let (non_blocking, guard) = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create log directory {:?}", parent))?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {:?}", path))?;
            tracing_appender::non_blocking(file)
        }
        None => tracing_appender::non_blocking(io::stderr()),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("gcp-ip-list {} started with log level: {:?}", VERSION, level);

    Ok(Some(guard))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level, args.log_file.as_deref())?;

    if args.list_asset_types {
        let mut stdout = io::stdout().lock();
        for kind in registry::supported_kinds() {
            writeln!(stdout, "{}", kind)?;
        }
        return Ok(());
    }

    let config = Config::load();

    // Everything that can be rejected locally is checked before touching the network
    let scope: Scope = config
        .effective_scope(args.scope.as_deref())
        .context("scope flag is required (organizations/1234, folders/1234, or projects/my-project)")?
        .parse()?;

    let asset_types = config.effective_asset_types(&args.asset_types);
    let kinds: Vec<AssetKind> = if asset_types.is_empty() {
        registry::supported_kinds()
    } else {
        inventory::parse_kinds(&asset_types)?
    };

    let format = config.effective_format(args.format);
    let visibility = if args.public {
        Visibility::PublicOnly
    } else if args.private {
        Visibility::PrivateOnly
    } else {
        Visibility::All
    };

    let client = GcpClient::new(config.effective_endpoint())
        .await?
        .with_page_size(config.effective_page_size());

    // A failed handler registration must not look like an interrupt
    let interrupted = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    let mut addresses = match inventory::query_until(&client, &scope, &kinds, interrupted).await {
        Ok(addresses) => visibility.apply(addresses),
        Err(Error::Source { message, status }) => {
            anyhow::bail!(
                "failed to get addresses: {}",
                format_gcp_error(status, &message)
            );
        }
        Err(err) => return Err(err).context("failed to get addresses"),
    };

    inventory::sort_addresses(&mut addresses);

    let mut stdout = io::stdout().lock();
    output::render(format, &mut stdout, &addresses).context("error writing output")?;
    stdout.flush()?;

    Ok(())
}
