//! Stash Cache CLI
//!
//! Entry point for the `stash-cache` command-line tool.

use clap::{Parser, Subcommand};
use stash_cache::config::{EffectiveConfig, PlatformUrl};
use stash_cache::{check_completeness, impact_table, EvictOptions, MockTransport, StashService};
use stash_schema::{EntityFamily, MutationKind, MutationRecord, DERIVED_FIELDS};
use stash_store::{CacheHandle, Snapshot};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stash-cache")]
#[command(about = "Cache consistency tooling for the stash client", version)]
struct Cli {
    /// Project config file (default: .stash/cache.toml)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify every derived field is evicted by its source family
    Check,

    /// Print a family's impact table
    Impact {
        /// Entity family, e.g. scene, gallery_chapter
        family: EntityFamily,
    },

    /// Apply a mutation log to a cache snapshot
    Replay {
        /// Snapshot to start from
        #[arg(long)]
        snapshot: PathBuf,

        /// JSON-lines file of {"mutation": ..., "result": ...} records
        #[arg(long)]
        log: PathBuf,

        /// Write the resulting snapshot here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print the effective configuration
    Config,
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            process::exit(1);
        }
    };
    init_logging(&config.settings().log_filter);

    match cli.command {
        Commands::Check => run_check(),
        Commands::Impact { family } => run_impact(family),
        Commands::Replay { snapshot, log, out } => {
            let options = EvictOptions {
                gc_after_evict: config.settings().gc_after_evict,
            };
            run_replay(&snapshot, &log, out.as_deref(), options);
        }
        Commands::Config => run_config(&config),
    }
}

fn load_config(project: Option<&Path>) -> Result<EffectiveConfig, String> {
    let host = EffectiveConfig::host_config_path();
    let project = project
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".stash/cache.toml"));
    EffectiveConfig::build(host.as_deref(), Some(&project), None).map_err(|e| e.to_string())
}

fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_check() {
    let kinds = MutationKind::ALL.len();
    match check_completeness(DERIVED_FIELDS) {
        Ok(()) => {
            println!(
                "OK: {} derived fields covered, {} mutation kinds routed",
                DERIVED_FIELDS.len(),
                kinds
            );
        }
        Err(missing) => {
            for gap in &missing {
                eprintln!("missing: {} (source family {})", gap, gap.source);
            }
            eprintln!("{} derived field(s) not covered", missing.len());
            process::exit(1);
        }
    }
}

fn run_impact(family: EntityFamily) {
    match serde_json::to_string_pretty(impact_table(family)) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}

fn run_replay(snapshot_path: &Path, log_path: &Path, out: Option<&Path>, options: EvictOptions) {
    let snapshot = match fs::read_to_string(snapshot_path)
        .map_err(|e| e.to_string())
        .and_then(|text| Snapshot::from_json(&text).map_err(|e| e.to_string()))
    {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading snapshot {}: {}", snapshot_path.display(), e);
            process::exit(1);
        }
    };

    let mut cache = CacheHandle::default();
    if let Err(e) = cache.restore(snapshot) {
        eprintln!("Error restoring snapshot: {}", e);
        process::exit(1);
    }

    let log = match fs::read_to_string(log_path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading log {}: {}", log_path.display(), e);
            process::exit(1);
        }
    };

    // the mock answers each mutation with the result recorded in the log
    let mut service = StashService::new(MockTransport::new(), cache).with_options(options);
    let mut applied = 0usize;
    for (index, line) in log.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: MutationRecord = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("{}:{}: invalid record: {}", log_path.display(), index + 1, e);
                process::exit(1);
            }
        };

        service
            .transport()
            .push_mutation_result(record.result.unwrap_or(serde_json::Value::Null));
        match service.mutate(&record.mutation) {
            Ok(report) => {
                debug!(line = index + 1, mutation = record.mutation.name(), outcome = ?report.outcome, "replayed");
                applied += 1;
            }
            Err(e) => {
                eprintln!("{}:{}: {}", log_path.display(), index + 1, e);
                process::exit(1);
            }
        }
    }
    info!(applied, objects = service.cache().len(), "replay finished");

    let json = match service.cache().extract().to_json_pretty() {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error serializing snapshot: {}", e);
            process::exit(1);
        }
    };
    match out {
        Some(path) => {
            if let Err(e) = fs::write(path, json) {
                eprintln!("Error writing {}: {}", path.display(), e);
                process::exit(1);
            }
        }
        None => println!("{}", json),
    }
}

fn run_config(config: &EffectiveConfig) {
    let endpoints = match PlatformUrl::from_settings(config.settings()) {
        Ok(url) => serde_json::json!({
            "http": url.http_endpoint(),
            "ws": url.ws_endpoint(),
        }),
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    let output = serde_json::json!({
        "effective": config,
        "endpoints": endpoints,
    });
    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}
