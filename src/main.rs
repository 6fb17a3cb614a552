//! Perfio CLI - ingest employee-performance CSVs and query statistics
//!
//! # Main Commands
//!
//! ```bash
//! perfio serve                         # Start HTTP server (port 5000)
//! perfio ingest data.csv               # Load a CSV into the store
//! perfio boxplot --metric sales        # Grouped distribution as JSON
//! perfio correlation                   # Correlation matrix as JSON
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! perfio parse data.csv                # Parse and normalize, print JSON
//! ```

use clap::{Parser, Subcommand};
use perfio::{
    correlate, format_delimiter, group_metric, ingest_file, normalize, parse_file_auto,
    EmployeeStore, GroupQuery,
};
use std::fs;
use std::path::{Path, PathBuf};

/// Database path: `--db` flag, then `PERFIO_DB`, then a local default.
fn resolve_db(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var("PERFIO_DB").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("employees.db"))
}

#[derive(Parser)]
#[command(name = "perfio")]
#[command(about = "Ingest employee performance CSVs and serve analytics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a CSV file, normalize each row, and output JSON records
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Ingest a CSV file into the record store
    Ingest {
        /// Input CSV file
        input: PathBuf,

        /// SQLite database path
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Grouped distribution for one metric, as JSON
    Boxplot {
        /// Metric column
        #[arg(short, long, default_value = "performance_score")]
        metric: String,

        /// Group-by column
        #[arg(short, long, default_value = "department")]
        group_by: String,

        /// SQLite database path
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Correlation matrix over the numeric columns, as JSON
    Correlation {
        /// SQLite database path
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Start HTTP server
    Serve {
        /// Port to listen on (PORT env var also respected)
        #[arg(short, long)]
        port: Option<u16>,

        /// SQLite database path
        #[arg(long)]
        db: Option<PathBuf>,

        /// Directory of static frontend files to serve
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),

        Commands::Ingest { input, db } => cmd_ingest(&input, resolve_db(db)),

        Commands::Boxplot { metric, group_by, db } => {
            cmd_boxplot(&metric, &group_by, resolve_db(db))
        }

        Commands::Correlation { db } => cmd_correlation(resolve_db(db)),

        Commands::Serve { port, db, static_dir } => {
            cmd_serve(port, resolve_db(db), static_dir).await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Parsing CSV: {}", input.display());

    let result = parse_file_auto(input)?;
    eprintln!("   Encoding: {}", result.encoding);
    eprintln!("   Delimiter: '{}'", format_delimiter(result.delimiter));
    eprintln!("   Columns: {}", result.headers.join(", "));

    let records: Vec<_> = result.rows.iter().map(normalize).collect();
    eprintln!("Normalized {} records", records.len());

    let json = serde_json::to_string_pretty(&records)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_ingest(input: &Path, db: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Ingesting: {}", input.display());

    let mut store = EmployeeStore::open(&db)?;
    let report = ingest_file(input, &mut store)?;

    eprintln!("   Encoding: {}", report.encoding);
    eprintln!("   Delimiter: '{}'", report.delimiter);
    eprintln!("   Columns: {}", report.columns.join(", "));
    eprintln!("Inserted {} records ({} total in {})", report.inserted, report.total_records, db.display());

    Ok(())
}

fn cmd_boxplot(metric: &str, group_by: &str, db: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let query = GroupQuery::parse(metric, group_by)?;

    let store = EmployeeStore::open(&db)?;
    let records = store.all()?;

    let result = group_metric(&records, query);
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}

fn cmd_correlation(db: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let store = EmployeeStore::open(&db)?;
    let records = store.all()?;

    let result = correlate(&records);
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}

async fn cmd_serve(
    port: Option<u16>,
    db: PathBuf,
    static_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let port = port
        .or_else(|| std::env::var("PORT").ok().and_then(|p| p.parse().ok()))
        .unwrap_or(5000);

    let store = EmployeeStore::open(&db)?;
    perfio::server::start_server(store, port, static_dir).await
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
