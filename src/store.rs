//! The stats record and its file-backed store.
//!
//! One [`StatsRecord`] exists process-wide. The store owns the in-memory
//! copy behind a single `RwLock` and keeps the on-disk JSON file in sync:
//! updates are written to disk first and committed to memory only after the
//! write succeeds, so a failed write leaves both copies at the previous
//! consistent state.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::Result;

/// Follower count used when nothing else is configured or persisted.
pub const DEFAULT_FOLLOWERS: u64 = 14_244;

/// Engagement rate used when nothing else is configured or persisted.
pub const DEFAULT_ENGAGEMENT_RATE: f64 = 5.12;

/// The single persisted statistics record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsRecord {
    /// Follower count.
    pub followers: u64,
    /// Engagement rate as a percentage.
    pub engagement_rate: f64,
    /// RFC 3339 timestamp of the last successful update, set server-side.
    pub last_updated: String,
}

impl StatsRecord {
    /// Build the default record, letting configured seed values override the
    /// hard-coded defaults. The timestamp is stamped now.
    pub fn seeded(followers: Option<u64>, engagement_rate: Option<f64>) -> Self {
        Self {
            followers: followers.unwrap_or(DEFAULT_FOLLOWERS),
            engagement_rate: engagement_rate.unwrap_or(DEFAULT_ENGAGEMENT_RATE),
            last_updated: now_rfc3339(),
        }
    }
}

/// A partial update from a POST body. Omitted fields keep their current
/// values; numeric fields tolerate JSON strings as well as numbers.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsUpdate {
    /// New follower count, if provided.
    #[serde(default, deserialize_with = "lenient_opt_u64")]
    pub followers: Option<u64>,
    /// New engagement rate, if provided.
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub engagement_rate: Option<f64>,
}

/// File-backed store for the stats record.
pub struct StatsStore {
    path: PathBuf,
    record: RwLock<StatsRecord>,
}

impl StatsStore {
    /// Open the store at `path`, loading the persisted record if one exists.
    ///
    /// When no file is found, `seed` becomes the initial record and is
    /// written to disk immediately, so the record is durable before the
    /// first read completes.
    pub async fn open(path: impl Into<PathBuf>, seed: StatsRecord) -> Result<Self> {
        let path = path.into();

        let record = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let record: StatsRecord = serde_json::from_slice(&bytes)?;
                debug!("loaded stats record from {}", path.display());
                record
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("no stats file at {}, seeding defaults", path.display());
                persist(&path, &seed).await?;
                seed
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            record: RwLock::new(record),
        })
    }

    /// Current record.
    pub async fn get(&self) -> StatsRecord {
        self.record.read().await.clone()
    }

    /// Merge `update` into the current record, persist, and commit.
    ///
    /// The write lock is held across merge, file write, and in-memory
    /// commit, so concurrent updates serialize and the file is never
    /// interleaved. Last update wins.
    pub async fn update(&self, update: StatsUpdate) -> Result<StatsRecord> {
        let mut guard = self.record.write().await;

        let merged = StatsRecord {
            followers: update.followers.unwrap_or(guard.followers),
            engagement_rate: update.engagement_rate.unwrap_or(guard.engagement_rate),
            last_updated: now_rfc3339(),
        };

        persist(&self.path, &merged).await?;
        *guard = merged.clone();

        Ok(merged)
    }

    /// Path of the persisted file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Debug for StatsStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatsStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Write the record to disk, pretty-printed.
async fn persist(path: &Path, record: &StatsRecord) -> Result<()> {
    let json = serde_json::to_string_pretty(record)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

fn lenient_opt_u64<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u64),
        Str(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Num(n)) => Ok(Some(n)),
        Some(Raw::Str(s)) => s.trim().parse().map(Some).map_err(DeError::custom),
    }
}

fn lenient_opt_f64<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Str(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Num(n)) => Ok(Some(n)),
        Some(Raw::Str(s)) => s.trim().parse().map(Some).map_err(DeError::custom),
    }
}
