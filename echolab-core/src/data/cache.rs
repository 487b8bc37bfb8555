//! Parquet cache layer with Hive-style partitioning.
//!
//! Layout: `{cache_dir}/asset={CODE}/{year}.parquet`
//!
//! Features:
//! - Atomic writes (write to .tmp, rename into place)
//! - Integrity validation on load (column check, row count > 0)
//! - Quarantine for corrupt files ({filename}.quarantined)
//! - Metadata sidecar per asset (hash, date range, source)

use super::provider::{DataError, RawBar};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Metadata sidecar for a cached asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMeta {
    pub asset: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub bar_count: usize,
    pub data_hash: String,
    pub source: String,
    pub cached_at: chrono::NaiveDateTime,
}

/// The Parquet cache.
pub struct ParquetCache {
    cache_dir: PathBuf,
}

impl ParquetCache {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Directory for a specific asset: `{cache_dir}/asset={CODE}/`
    fn asset_dir(&self, asset: &str) -> PathBuf {
        self.cache_dir.join(format!("asset={asset}"))
    }

    fn year_path(&self, asset: &str, year: i32) -> PathBuf {
        self.asset_dir(asset).join(format!("{year}.parquet"))
    }

    fn meta_path(&self, asset: &str) -> PathBuf {
        self.asset_dir(asset).join("meta.json")
    }

    /// Write bars for an asset to the cache.
    ///
    /// Groups bars by year and writes one Parquet file per year.
    /// Writes are atomic: write to .tmp then rename.
    pub fn write(&self, asset: &str, bars: &[RawBar], source: &str) -> Result<(), DataError> {
        if bars.is_empty() {
            return Err(DataError::CacheError("no bars to cache".into()));
        }

        let dir = self.asset_dir(asset);
        fs::create_dir_all(&dir)
            .map_err(|e| DataError::CacheError(format!("failed to create dir: {e}")))?;

        let mut by_year: HashMap<i32, Vec<&RawBar>> = HashMap::new();
        for bar in bars {
            by_year.entry(bar.date.year()).or_default().push(bar);
        }

        for (year, year_bars) in &by_year {
            let df = bars_to_dataframe(year_bars)?;
            let path = self.year_path(asset, *year);
            let tmp_path = path.with_extension("parquet.tmp");

            write_parquet(&df, &tmp_path)?;

            fs::rename(&tmp_path, &path).map_err(|e| {
                let _ = fs::remove_file(&tmp_path);
                DataError::CacheError(format!("atomic rename failed: {e}"))
            })?;
        }

        let meta = CacheMeta {
            asset: asset.to_string(),
            start_date: bars.first().unwrap().date,
            end_date: bars.last().unwrap().date,
            bar_count: bars.len(),
            data_hash: blake3::hash(
                &serde_json::to_vec(bars)
                    .map_err(|e| DataError::CacheError(format!("hash serialization: {e}")))?,
            )
            .to_hex()
            .to_string(),
            source: source.to_string(),
            cached_at: chrono::Local::now().naive_local(),
        };
        let meta_json = serde_json::to_string_pretty(&meta)
            .map_err(|e| DataError::CacheError(format!("meta serialization: {e}")))?;
        fs::write(self.meta_path(asset), meta_json)
            .map_err(|e| DataError::CacheError(format!("meta write: {e}")))?;

        Ok(())
    }

    /// Load all cached bars for an asset, sorted by date ascending.
    ///
    /// Duplicate dates across partitions are a validation failure — the
    /// table invariant requires strictly increasing dates.
    pub fn load(&self, asset: &str) -> Result<Vec<RawBar>, DataError> {
        let dir = self.asset_dir(asset);
        if !dir.exists() {
            return Err(DataError::NoCachedData {
                asset: asset.to_string(),
            });
        }

        let mut all_bars = Vec::new();

        let entries =
            fs::read_dir(&dir).map_err(|e| DataError::CacheError(format!("read dir: {e}")))?;

        for entry in entries {
            let entry = entry.map_err(|e| DataError::CacheError(format!("dir entry: {e}")))?;
            let path = entry.path();

            // Skip non-parquet files (meta.json, .quarantined, etc)
            if path.extension().and_then(|e| e.to_str()) != Some("parquet") {
                continue;
            }

            match load_and_validate_parquet(&path) {
                Ok(bars) => all_bars.extend(bars),
                Err(e) => {
                    let quarantine = path.with_extension("parquet.quarantined");
                    eprintln!(
                        "WARNING: quarantining corrupt cache file {}: {e}",
                        path.display()
                    );
                    let _ = fs::rename(&path, &quarantine);
                }
            }
        }

        if all_bars.is_empty() {
            return Err(DataError::NoCachedData {
                asset: asset.to_string(),
            });
        }

        all_bars.sort_by_key(|b| b.date);
        for pair in all_bars.windows(2) {
            if pair[0].date == pair[1].date {
                return Err(DataError::ValidationError(format!(
                    "duplicate date {} in cache for '{asset}'",
                    pair[0].date
                )));
            }
        }

        Ok(all_bars)
    }

    /// Metadata for a cached asset, if present.
    pub fn get_meta(&self, asset: &str) -> Option<CacheMeta> {
        let content = fs::read_to_string(self.meta_path(asset)).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// All asset codes with a cache partition, sorted.
    pub fn list_assets(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.cache_dir) else {
            return Vec::new();
        };
        let mut assets: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .filter_map(|e| {
                e.file_name()
                    .to_str()
                    .and_then(|n| n.strip_prefix("asset="))
                    .map(str::to_string)
            })
            .collect();
        assets.sort();
        assets
    }
}

// ── Parquet I/O helpers ─────────────────────────────────────────────

/// Convert raw bars to a Polars DataFrame.
fn bars_to_dataframe(bars: &[&RawBar]) -> Result<DataFrame, DataError> {
    let dates: Vec<i32> = bars
        .iter()
        .map(|b| (b.date - NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()).num_days() as i32)
        .collect();
    let opens: Vec<f64> = bars.iter().map(|b| b.open).collect();
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let volumes: Vec<u64> = bars.iter().map(|b| b.volume).collect();
    let adj_closes: Vec<f64> = bars.iter().map(|b| b.adj_close).collect();

    DataFrame::new(vec![
        Column::new("date".into(), dates)
            .cast(&DataType::Date)
            .map_err(|e| DataError::ParquetError(format!("date cast: {e}")))?,
        Column::new("open".into(), opens),
        Column::new("high".into(), highs),
        Column::new("low".into(), lows),
        Column::new("close".into(), closes),
        Column::new("volume".into(), volumes),
        Column::new("adj_close".into(), adj_closes),
    ])
    .map_err(|e| DataError::ParquetError(format!("dataframe creation: {e}")))
}

/// Write a DataFrame to a Parquet file.
fn write_parquet(df: &DataFrame, path: &Path) -> Result<(), DataError> {
    let file =
        fs::File::create(path).map_err(|e| DataError::ParquetError(format!("create file: {e}")))?;
    ParquetWriter::new(file)
        .finish(&mut df.clone())
        .map_err(|e| DataError::ParquetError(format!("write parquet: {e}")))?;
    Ok(())
}

/// Load a Parquet file and validate its integrity.
fn load_and_validate_parquet(path: &Path) -> Result<Vec<RawBar>, DataError> {
    let file = fs::File::open(path).map_err(|e| DataError::ParquetError(format!("open: {e}")))?;
    let df = ParquetReader::new(file)
        .finish()
        .map_err(|e| DataError::ParquetError(format!("read: {e}")))?;

    if df.height() == 0 {
        return Err(DataError::ValidationError("empty parquet file".into()));
    }

    let expected_cols = [
        "date",
        "open",
        "high",
        "low",
        "close",
        "volume",
        "adj_close",
    ];
    for col_name in &expected_cols {
        if df.column(col_name).is_err() {
            return Err(DataError::ValidationError(format!(
                "missing column '{col_name}'"
            )));
        }
    }

    dataframe_to_bars(&df)
}

/// Convert a DataFrame back to RawBars.
fn dataframe_to_bars(df: &DataFrame) -> Result<Vec<RawBar>, DataError> {
    let map_err = |e: PolarsError| DataError::ParquetError(format!("column read: {e}"));

    let dates = df.column("date").map_err(map_err)?;
    let opens = df.column("open").map_err(map_err)?;
    let highs = df.column("high").map_err(map_err)?;
    let lows = df.column("low").map_err(map_err)?;
    let closes = df.column("close").map_err(map_err)?;
    let volumes = df.column("volume").map_err(map_err)?;
    let adj_closes = df.column("adj_close").map_err(map_err)?;

    let n = df.height();
    let mut bars = Vec::with_capacity(n);

    let date_ca = dates
        .date()
        .map_err(|e| DataError::ParquetError(format!("date column type: {e}")))?;
    let open_ca = opens
        .f64()
        .map_err(|e| DataError::ParquetError(format!("open column type: {e}")))?;
    let high_ca = highs
        .f64()
        .map_err(|e| DataError::ParquetError(format!("high column type: {e}")))?;
    let low_ca = lows
        .f64()
        .map_err(|e| DataError::ParquetError(format!("low column type: {e}")))?;
    let close_ca = closes
        .f64()
        .map_err(|e| DataError::ParquetError(format!("close column type: {e}")))?;
    let vol_ca = volumes
        .u64()
        .map_err(|e| DataError::ParquetError(format!("volume column type: {e}")))?;
    let adj_ca = adj_closes
        .f64()
        .map_err(|e| DataError::ParquetError(format!("adj_close column type: {e}")))?;

    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();

    for i in 0..n {
        let date_days = date_ca
            .get(i)
            .ok_or_else(|| DataError::ParquetError(format!("null date at row {i}")))?;
        let date = epoch + chrono::Duration::days(date_days as i64);

        bars.push(RawBar {
            date,
            open: open_ca.get(i).unwrap_or(f64::NAN),
            high: high_ca.get(i).unwrap_or(f64::NAN),
            low: low_ca.get(i).unwrap_or(f64::NAN),
            close: close_ca.get(i).unwrap_or(f64::NAN),
            volume: vol_ca.get(i).unwrap_or(0),
            adj_close: adj_ca.get(i).unwrap_or(f64::NAN),
        });
    }

    Ok(bars)
}
