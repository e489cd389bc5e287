//! Dated score snapshots and the deltas between them.
//!
//! Snapshots live as `{entity}_{YYYYMMDD}.csv` in one directory. Writing the
//! same entity and date twice replaces the file. Trends compare the latest
//! snapshot with the one `lookback` positions earlier in date order, or the
//! oldest when the history is shorter.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::output::write_csv;
use crate::parser::parse_rows;
use crate::scoring::types::SnapshotRow;
use crate::scoring::utility::round_to;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    County,
    Schools,
}

impl EntityType {
    pub fn prefix(self) -> &'static str {
        match self {
            EntityType::County => "county",
            EntityType::Schools => "schools",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

pub struct SnapshotArchive {
    dir: PathBuf,
}

impl SnapshotArchive {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, entity: EntityType, date: NaiveDate) -> PathBuf {
        self.dir
            .join(format!("{}_{}.csv", entity.prefix(), date.format("%Y%m%d")))
    }

    /// Writes the table as the snapshot for `date`, replacing any earlier
    /// write for the same day.
    pub fn archive(&self, entity: EntityType, rows: &[SnapshotRow], date: NaiveDate) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating history directory {}", self.dir.display()))?;

        let path = self.path_for(entity, date);
        write_csv(&path, rows)?;
        info!(entity = %entity, date = %date, rows = rows.len(), path = %path.display(), "Archived snapshot");
        Ok(path)
    }

    /// Snapshot dates and paths for one entity type, oldest first. Files that
    /// do not match the naming scheme are ignored.
    pub fn list_snapshots(&self, entity: EntityType) -> Result<Vec<(NaiveDate, PathBuf)>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let prefix = format!("{}_", entity.prefix());
        let mut snapshots = Vec::new();
        for entry in fs::read_dir(&self.dir)
            .with_context(|| format!("listing {}", self.dir.display()))?
        {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(stamp) = name
                .strip_prefix(&prefix)
                .and_then(|rest| rest.strip_suffix(".csv"))
            else {
                continue;
            };
            match NaiveDate::parse_from_str(stamp, "%Y%m%d") {
                Ok(date) => snapshots.push((date, path)),
                Err(_) => debug!(file = name, "Skipping file with unrecognized date"),
            }
        }

        snapshots.sort_by_key(|(date, _)| *date);
        Ok(snapshots)
    }

    fn load(path: &Path) -> Result<Vec<SnapshotRow>> {
        let bytes = fs::read(path).with_context(|| format!("reading snapshot {}", path.display()))?;
        parse_rows(&bytes).with_context(|| format!("parsing snapshot {}", path.display()))
    }

    /// Compares the latest snapshot with the reference snapshot at index
    /// `max(0, count - lookback - 1)`.
    ///
    /// An unreadable archive or snapshot yields [`TrendReport::Unavailable`],
    /// never an error.
    #[tracing::instrument(skip(self))]
    pub fn compute_trend(&self, entity: EntityType, lookback: usize) -> TrendReport {
        let snapshots = match self.list_snapshots(entity) {
            Ok(snapshots) => snapshots,
            Err(err) => return Self::unavailable(entity, err),
        };
        let count = snapshots.len();
        if count < 2 {
            warn!(entity = %entity, snapshots = count, "Not enough history for trends yet");
            return TrendReport::InsufficientHistory { snapshots: count };
        }

        let (latest_date, latest_path) = &snapshots[count - 1];
        let (reference_date, reference_path) =
            &snapshots[count.saturating_sub(lookback.saturating_add(1))];

        let (latest, reference) = match (Self::load(latest_path), Self::load(reference_path)) {
            (Ok(latest), Ok(reference)) => (latest, reference),
            (Err(err), _) | (_, Err(err)) => return Self::unavailable(entity, err),
        };
        let table = TrendTable::compare(*latest_date, *reference_date, &latest, &reference);

        info!(
            entity = %entity,
            latest = %latest_date,
            reference = %reference_date,
            compared = table.rows.len(),
            "Computed trend"
        );
        TrendReport::Available(table)
    }

    fn unavailable(entity: EntityType, err: anyhow::Error) -> TrendReport {
        let reason = format!("{err:#}");
        warn!(entity = %entity, error = %reason, "Snapshot history unreadable, trend skipped");
        TrendReport::Unavailable { reason }
    }

    /// Trend summary for both entity types. Each entity degrades on its own.
    pub fn summarize(&self, lookback: usize, now: DateTime<Utc>) -> TrendSummary {
        TrendSummary {
            generated_at: now,
            lookback_days: lookback,
            counties: EntityTrendSummary::from_report(&self.compute_trend(EntityType::County, lookback)),
            schools: EntityTrendSummary::from_report(&self.compute_trend(EntityType::Schools, lookback)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrendReport {
    InsufficientHistory { snapshots: usize },
    /// The archive or one of the compared snapshots could not be read.
    Unavailable { reason: String },
    Available(TrendTable),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendRow {
    pub entity_id: String,
    pub name: String,
    pub county: String,
    pub composite_score: Option<f64>,
    pub reference_score: Option<f64>,
    /// `None` for entities absent from the reference snapshot.
    pub score_change: Option<f64>,
    /// `None` whenever the reference score is missing or zero.
    pub pct_change: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendTable {
    pub latest_date: NaiveDate,
    pub reference_date: NaiveDate,
    /// Largest increase first, rows without a change last.
    pub rows: Vec<TrendRow>,
}

impl TrendTable {
    pub fn compare(
        latest_date: NaiveDate,
        reference_date: NaiveDate,
        latest: &[SnapshotRow],
        reference: &[SnapshotRow],
    ) -> Self {
        let previous: HashMap<&str, Option<f64>> = reference
            .iter()
            .map(|r| (r.entity_id.as_str(), r.composite_score))
            .collect();

        let mut rows: Vec<TrendRow> = latest
            .iter()
            .map(|row| {
                let reference_score = previous.get(row.entity_id.as_str()).copied().flatten();
                let score_change = match (row.composite_score, reference_score) {
                    (Some(now), Some(before)) => Some(round_to(now - before, 1)),
                    _ => None,
                };
                let pct_change = match (score_change, reference_score) {
                    (Some(change), Some(before)) if before != 0.0 => Some(round_to(change / before * 100.0, 1)),
                    _ => None,
                };
                TrendRow {
                    entity_id: row.entity_id.clone(),
                    name: row.name.clone(),
                    county: row.county.clone(),
                    composite_score: row.composite_score,
                    reference_score,
                    score_change,
                    pct_change,
                }
            })
            .collect();

        rows.sort_by(|a, b| match (a.score_change, b.score_change) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });

        Self {
            latest_date,
            reference_date,
            rows,
        }
    }

    fn with_change(&self) -> impl DoubleEndedIterator<Item = &TrendRow> {
        self.rows.iter().filter(|r| r.score_change.is_some())
    }

    /// First row with a change after the descending sort.
    pub fn biggest_increase(&self) -> Option<&TrendRow> {
        self.with_change().next()
    }

    /// Last row with a change after the descending sort.
    pub fn biggest_decrease(&self) -> Option<&TrendRow> {
        self.with_change().next_back()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mover {
    pub id: String,
    pub name: String,
    pub county: String,
    pub change: f64,
}

impl Mover {
    fn from_row(row: &TrendRow) -> Option<Self> {
        Some(Self {
            id: row.entity_id.clone(),
            name: row.name.clone(),
            county: row.county.clone(),
            change: row.score_change?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendStatus {
    Available,
    InsufficientHistory,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityTrendSummary {
    pub status: TrendStatus,
    pub snapshots: Option<usize>,
    pub latest_date: Option<NaiveDate>,
    pub reference_date: Option<NaiveDate>,
    pub total_compared: usize,
    /// Entities in the latest snapshot with no reference score.
    pub new_entities: usize,
    pub biggest_increase: Option<Mover>,
    pub biggest_decrease: Option<Mover>,
    /// Why the trend could not be computed, when it could not.
    pub reason: Option<String>,
}

impl EntityTrendSummary {
    pub fn from_report(report: &TrendReport) -> Self {
        match report {
            TrendReport::InsufficientHistory { snapshots } => Self {
                status: TrendStatus::InsufficientHistory,
                snapshots: Some(*snapshots),
                latest_date: None,
                reference_date: None,
                total_compared: 0,
                new_entities: 0,
                biggest_increase: None,
                biggest_decrease: None,
                reason: None,
            },
            TrendReport::Unavailable { reason } => Self {
                status: TrendStatus::Unavailable,
                snapshots: None,
                latest_date: None,
                reference_date: None,
                total_compared: 0,
                new_entities: 0,
                biggest_increase: None,
                biggest_decrease: None,
                reason: Some(reason.clone()),
            },
            TrendReport::Available(table) => Self {
                status: TrendStatus::Available,
                snapshots: None,
                latest_date: Some(table.latest_date),
                reference_date: Some(table.reference_date),
                total_compared: table.rows.len(),
                new_entities: table.rows.iter().filter(|r| r.score_change.is_none()).count(),
                biggest_increase: table.biggest_increase().and_then(Mover::from_row),
                biggest_decrease: table.biggest_decrease().and_then(Mover::from_row),
                reason: None,
            },
        }
    }
}

/// Written as `trends.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSummary {
    pub generated_at: DateTime<Utc>,
    pub lookback_days: usize,
    pub counties: EntityTrendSummary,
    pub schools: EntityTrendSummary,
}
