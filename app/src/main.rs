// shopkeep/src/main.rs

use anyhow::Context;
use clap::{Parser, Subcommand};
use shopkeep::cli::{render, Console};
use shopkeep::services::reservations;
use shopkeep::{actions, db, AppConfig, AppState};
use std::io;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Parser, Debug)]
#[command(name = "shopkeep", version, about = "Online shopping manager")]
struct Cli {
  /// Database to use instead of DATABASE_URL.
  #[arg(long, global = true)]
  database_url: Option<String>,

  /// Run against a throwaway in-memory database.
  #[arg(long, global = true, conflicts_with = "database_url")]
  memory: bool,

  /// Insert the demo catalog if the catalog is empty.
  #[arg(long, global = true)]
  seed: bool,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Interactive shopping console (default).
  Shop,
  /// Apply database migrations and exit.
  Migrate,
  /// Insert the demo catalog into an empty database.
  Seed,
  /// Print a report.
  Report {
    #[command(subcommand)]
    kind: ReportKind,
    /// Emit JSON instead of text.
    #[arg(long, global = true)]
    json: bool,
  },
  /// Return stock held by cart lines older than the reservation lease.
  ReleaseReservations {
    /// Lease length in minutes; defaults to RESERVATION_TTL_MINUTES.
    #[arg(long)]
    older_than_minutes: Option<i64>,
  },
}

#[derive(Subcommand, Debug)]
enum ReportKind {
  /// Order count and total sales.
  Sales,
  /// Products that appear in the most orders.
  Popular {
    #[arg(long)]
    limit: Option<i64>,
  },
}

fn init_tracing(json: bool) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
  let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr);
  if json {
    builder.json().init();
  } else {
    builder.init();
  }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  let mut config = AppConfig::from_env().context("loading configuration")?;
  if cli.memory {
    config = AppConfig {
      log_json: config.log_json,
      ..AppConfig::in_memory()
    };
  } else if let Some(url) = cli.database_url {
    config.database_url = url;
  }
  config.seed_db |= cli.seed || matches!(cli.command, Some(Command::Seed));

  init_tracing(config.log_json);
  tracing::debug!(
    database_url = %config.database_url,
    db_max_connections = config.db_max_connections,
    reservation_ttl_minutes = config.reservation_ttl_minutes,
    "Application configuration loaded."
  );
  tracing::info!(database_url = %config.database_url, "Starting shopkeep.");

  if matches!(cli.command, Some(Command::Migrate)) {
    let pool = db::connect(&config).await.context("connecting to the database")?;
    db::migrate(&pool).await.context("applying migrations")?;
    println!("Migrations applied.");
    return Ok(());
  }

  let state = AppState::init(config).await.context("initialising application state")?;

  match cli.command.unwrap_or(Command::Shop) {
    Command::Shop => {
      let lease = state.config.reservation_lease().context("reservation lease")?;
      let sweeper = reservations::spawn_sweeper(state.db_pool.clone(), lease, SWEEP_INTERVAL);
      let stdin = io::stdin();
      let mut console = Console::new(state, stdin.lock(), io::stdout());
      let outcome = console.run().await;
      sweeper.abort();
      outcome.context("console session failed")?;
    }
    Command::Migrate => {}
    Command::Seed => {
      let listed = actions::catalog::list_products(&state).await?;
      println!("{}", render::product_table(&listed));
    }
    Command::Report { kind, json } => match kind {
      ReportKind::Sales => {
        let summary = actions::reports::sales_summary(&state).await?;
        if json {
          println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
          println!("{}", render::sales_summary(&summary));
        }
      }
      ReportKind::Popular { limit } => {
        let rows = actions::reports::popular_products(&state, limit).await?;
        if json {
          println!("{}", serde_json::to_string_pretty(&rows)?);
        } else {
          println!("{}", render::popular_products(&rows));
        }
      }
    },
    Command::ReleaseReservations { older_than_minutes } => {
      let report = actions::reports::release_expired_reservations(&state, older_than_minutes).await?;
      println!(
        "Released {} cart line(s), returning {} unit(s) to stock.",
        report.lines_released, report.units_returned
      );
    }
  }
  Ok(())
}
