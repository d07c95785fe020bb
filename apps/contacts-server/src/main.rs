use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use contacts::config::ContactsConfig;
use contacts::ContactsModule;
use db::{redact_credentials_in_dsn, ConnectOpts, DbHandle};
use runtime::{AppConfig, CliArgs, DatabaseConfig};
use std::path::{Path, PathBuf};
use std::time::Duration;

mod server;

const MEMORY_DSN: &str = "sqlite::memory:";

/// Contact service: stores contacts and their phone numbers, serves them over HTTP.
#[derive(Parser)]
#[command(name = "contacts-server")]
#[command(about = "Contact service - stores contacts and serves them over HTTP")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory SQLite database with the schema and fixtures preloaded
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Create the tables, seed the fixture contacts and exit
    Init,
    /// Drop the tables (no-op if they are absent) and exit
    Destroy,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("contacts-server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Init => init_schema(config, args).await,
        Commands::Destroy => destroy_schema(config, args).await,
        Commands::Check => check_config(config),
    }
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    let addr = server::bind_addr(&config.server)?;
    let db = connect(&config, &args).await?;
    let module = contacts_module(&config, &db)?;

    // An in-memory database starts empty every time.
    if args.mock {
        module.service().initialize_schema().await;
    }

    let app = server::build_app(module.router(), &config.server);
    let result = server::serve(app, addr).await;

    db.close().await;
    result
}

async fn init_schema(config: AppConfig, args: CliArgs) -> Result<()> {
    let db = connect(&config, &args).await?;
    let module = contacts_module(&config, &db)?;
    module.service().initialize_schema().await;
    db.close().await;
    println!("Schema initialized");
    Ok(())
}

async fn destroy_schema(config: AppConfig, args: CliArgs) -> Result<()> {
    let db = connect(&config, &args).await?;
    let module = contacts_module(&config, &db)?;
    module.service().destroy_schema().await;
    db.close().await;
    println!("Schema destroyed");
    Ok(())
}

fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    server::bind_addr(&config.server)?;
    if let Some(db_config) = &config.database {
        db_config.dsn()?;
    }
    config.module_config::<ContactsConfig>("contacts")?;

    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}

fn contacts_module(config: &AppConfig, db: &DbHandle) -> Result<ContactsModule> {
    let cfg: ContactsConfig = config.module_config("contacts")?;
    ContactsModule::init(db.sea(), &cfg)
}

async fn connect(config: &AppConfig, args: &CliArgs) -> Result<DbHandle> {
    let db_config = config.database.clone().unwrap_or_default();
    let dsn = if args.mock {
        MEMORY_DSN.to_string()
    } else {
        let dsn = db_config
            .dsn()
            .context("database is not configured")?;
        if dsn.starts_with("sqlite://") {
            absolutize_sqlite_dsn(&dsn, Path::new(&config.server.home_dir))?
        } else {
            dsn
        }
    };

    tracing::info!("Connecting to database: {}", redact_credentials_in_dsn(&dsn));
    let db = DbHandle::connect_with_retry(&dsn, connect_opts(&db_config)).await?;
    tracing::info!("Connected DB backend: {:?}", db.engine());
    Ok(db)
}

fn connect_opts(db_config: &DatabaseConfig) -> ConnectOpts {
    let defaults = ConnectOpts::default();
    ConnectOpts {
        max_conns: db_config.max_conns.or(defaults.max_conns),
        acquire_timeout: Some(Duration::from_secs(5)),
        sqlite_busy_timeout: db_config
            .busy_timeout_ms
            .map(|ms| Duration::from_millis(u64::from(ms))),
        create_sqlite_dirs: true,
        connect_retries: db_config.connect_retries.unwrap_or(defaults.connect_retries),
        retry_delay: db_config
            .retry_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.retry_delay),
        ..defaults
    }
}

/// Resolve a relative SQLite path against `base_dir`.
/// Normalizes backslashes into forward slashes and keeps any query string.
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path) -> Result<String> {
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    if path_str.is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if path_str == ":memory:" {
        return Ok(MEMORY_DSN.to_string());
    }

    let mut p = PathBuf::from(path_str);
    if p.is_relative() {
        p = base_dir.join(p);
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    if let Some(q) = query {
        out.push('?');
        out.push_str(q);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_sqlite_paths_resolve_against_home_dir() {
        let dsn = absolutize_sqlite_dsn("sqlite://database/contacts.db", Path::new("/srv/app"))
            .unwrap();
        assert_eq!(dsn, "sqlite:///srv/app/database/contacts.db");
    }

    #[test]
    fn absolute_sqlite_paths_and_queries_are_kept() {
        let dsn =
            absolutize_sqlite_dsn("sqlite:///tmp/c.db?mode=rwc", Path::new("/srv/app")).unwrap();
        assert_eq!(dsn, "sqlite:///tmp/c.db?mode=rwc");
    }

    #[test]
    fn memory_and_empty_paths() {
        assert_eq!(
            absolutize_sqlite_dsn("sqlite://:memory:", Path::new("/x")).unwrap(),
            MEMORY_DSN
        );
        assert!(absolutize_sqlite_dsn("sqlite://", Path::new("/x")).is_err());
        assert!(absolutize_sqlite_dsn("postgres://h/db", Path::new("/x")).is_err());
    }

    #[test]
    fn connect_opts_follow_database_config() {
        let opts = connect_opts(&DatabaseConfig {
            max_conns: Some(3),
            busy_timeout_ms: Some(250),
            connect_retries: Some(1),
            retry_delay_ms: Some(10),
            ..Default::default()
        });
        assert_eq!(opts.max_conns, Some(3));
        assert_eq!(opts.sqlite_busy_timeout, Some(Duration::from_millis(250)));
        assert_eq!(opts.connect_retries, 1);
        assert_eq!(opts.retry_delay, Duration::from_millis(10));

        let defaults = connect_opts(&DatabaseConfig::default());
        assert_eq!(defaults.connect_retries, 5);
        assert_eq!(defaults.retry_delay, Duration::from_secs(2));
    }
}
