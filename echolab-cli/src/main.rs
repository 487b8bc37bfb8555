//! EchoLab CLI — download, query, rank, and cache commands.
//!
//! Commands:
//! - `download` — fetch daily bars from Yahoo Finance and cache as Parquet
//! - `query` — run a simulation from a query string against cached data
//! - `rank` — print the strongest indicators for an asset by correlation
//! - `cache status` — report cached assets, bar counts, date ranges

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use echolab_core::data::{provider_ticker, to_bars, DataProvider, ParquetCache, YahooProvider};
use echolab_core::domain::PriceTable;
use echolab_core::indicators::standard_table;
use echolab_core::query::parse_query;
use echolab_runner::{
    score_indicators, simulate, top_indicators, write_scores_csv, SimConfig, SimulationResult,
};

#[derive(Parser)]
#[command(
    name = "echolab",
    about = "EchoLab CLI — conditional-analog shock simulator"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download daily bars from Yahoo Finance and cache as Parquet.
    Download {
        /// Asset codes to download (e.g., NQ ES YM).
        #[arg(required = true)]
        assets: Vec<String>,

        /// Start date (YYYY-MM-DD). Defaults to 3 years ago.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Cache directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        cache_dir: PathBuf,
    },
    /// Run a simulation from a query string against cached data.
    ///
    /// Example: echolab query "SELECT SMA20 FROM NQ WHERE CHANGE=20 SIM=1000"
    Query {
        /// Query: SELECT <indicator> FROM <asset> WHERE CHANGE=<float> SIM=<int>
        query: String,

        /// Master seed for reproducible distributions.
        #[arg(long)]
        seed: Option<u64>,

        /// Path to a TOML simulation config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Emit the result as JSON instead of the formatted block.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Cache directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        cache_dir: PathBuf,
    },
    /// Print the strongest indicators for an asset by correlation score.
    Rank {
        /// Asset code (e.g., NQ).
        asset: String,

        /// How many indicators to show.
        #[arg(long, default_value_t = 3)]
        top: usize,

        /// Optional CSV path for the full score table.
        #[arg(long)]
        export: Option<PathBuf>,

        /// Cache directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        cache_dir: PathBuf,
    },
    /// Cache management commands.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Report cached assets, bar counts, and date ranges.
    Status {
        /// Cache directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        cache_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Download {
            assets,
            start,
            end,
            cache_dir,
        } => cmd_download(&assets, start.as_deref(), end.as_deref(), &cache_dir),
        Commands::Query {
            query,
            seed,
            config,
            json,
            cache_dir,
        } => cmd_query(&query, seed, config.as_deref(), json, &cache_dir),
        Commands::Rank {
            asset,
            top,
            export,
            cache_dir,
        } => cmd_rank(&asset, top, export.as_deref(), &cache_dir),
        Commands::Cache {
            action: CacheAction::Status { cache_dir },
        } => cmd_cache_status(&cache_dir),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("invalid date '{s}'"))
}

fn cmd_download(
    assets: &[String],
    start: Option<&str>,
    end: Option<&str>,
    cache_dir: &std::path::Path,
) -> Result<()> {
    let end = match end {
        Some(s) => parse_date(s)?,
        None => chrono::Local::now().date_naive(),
    };
    let start = match start {
        Some(s) => parse_date(s)?,
        None => end - chrono::Duration::days(3 * 365),
    };

    let provider = YahooProvider::new();
    let cache = ParquetCache::new(cache_dir);

    for asset in assets {
        let code = asset.to_ascii_uppercase();
        let ticker = provider_ticker(&code);
        eprintln!("downloading {code} ({ticker}) {start}..{end}");

        let bars = provider
            .fetch(&ticker, start, end)
            .with_context(|| format!("download failed for {code}"))?;
        cache
            .write(&code, &bars, provider.name())
            .with_context(|| format!("cache write failed for {code}"))?;

        println!("{code}: cached {} bars", bars.len());
    }

    Ok(())
}

fn load_table(asset: &str, cache_dir: &std::path::Path) -> Result<PriceTable> {
    let cache = ParquetCache::new(cache_dir);
    let raw = cache.load(asset)?;
    let table = standard_table(asset, to_bars(raw))?;
    Ok(table)
}

fn cmd_query(
    query: &str,
    seed: Option<u64>,
    config_path: Option<&std::path::Path>,
    json: bool,
    cache_dir: &std::path::Path,
) -> Result<()> {
    let parsed = parse_query(query)?;

    let mut config = match config_path {
        Some(path) => SimConfig::from_toml_path(path)?,
        None => SimConfig::default(),
    };
    if seed.is_some() {
        config.seed = seed;
    }

    let table = load_table(&parsed.asset, cache_dir)?;
    let result = simulate(&table, &parsed.indicator, parsed.change, parsed.sim, &config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }

    Ok(())
}

fn print_result(result: &SimulationResult) {
    println!("── {} shock simulation ──", result.asset);
    println!(
        "indicator        {} ({:.4} -> {:.4})",
        result.indicator, result.baseline_indicator, result.shocked_indicator
    );
    println!(
        "band             ±{:.6} ({} analogs, {} sims)",
        result.band_used, result.sample_size, result.n_sims
    );
    println!();
    println!("mean % change    {:+.4}", result.mean_pct_change);
    println!("median % change  {:+.4}", result.median_pct_change);
    println!("5th / 95th pct   {:+.4} / {:+.4}", result.p5, result.p95);
    println!("p-value          {:.4}", result.p_value);
    println!(
        "best p (sweep)   {:.4} at band ±{:.6} ({} bands tried)",
        result.best_p_value, result.best_band, result.bands_attempted
    );
    println!();
    if result.dangerous {
        println!("WARNING: significance appears only after searching multiple");
        println!("tolerance bands — treat this result as a search artifact.");
    } else {
        println!("sweep check passed: no band-search artifact detected.");
        println!("markets stay unpredictable; apply risk management regardless.");
    }
}

fn cmd_rank(
    asset: &str,
    top: usize,
    export: Option<&std::path::Path>,
    cache_dir: &std::path::Path,
) -> Result<()> {
    let code = asset.to_ascii_uppercase();
    let table = load_table(&code, cache_dir)?;
    let scores = score_indicators(&table);

    println!("strongest indicators for {code} (|corr| vs normalized price impulse):");
    for score in top_indicators(&scores, top) {
        println!(
            "  {:<10} |corr|={:.4}  r2={:.4}",
            score.indicator, score.abs_corr, score.r2
        );
    }

    if let Some(path) = export {
        write_scores_csv(&scores, path)?;
        println!("full score table written to {}", path.display());
    }

    Ok(())
}

fn cmd_cache_status(cache_dir: &std::path::Path) -> Result<()> {
    let cache = ParquetCache::new(cache_dir);
    let assets = cache.list_assets();

    if assets.is_empty() {
        println!("cache at {} is empty", cache_dir.display());
        return Ok(());
    }

    println!("cache at {}:", cache_dir.display());
    for asset in assets {
        match cache.get_meta(&asset) {
            Some(meta) => println!(
                "  {:<6} {} bars  {}..{}  (source: {})",
                meta.asset, meta.bar_count, meta.start_date, meta.end_date, meta.source
            ),
            None => println!("  {asset:<6} (no metadata sidecar)"),
        }
    }

    Ok(())
}
