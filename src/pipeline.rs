//! End-to-end batch run: load every feed, score counties then schools, draw
//! nurse coverage, write the scorecards, archive snapshots and refresh the
//! trend summary.
//!
//! A feed that fails to load never aborts the run. It becomes a missing
//! [`SourceTable`] and the affected components are scored as zero and
//! flagged.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::ScoringConfig;
use crate::fetch::{HttpClient, load_rows};
use crate::output::{write_csv, write_json};
use crate::scoring::county::{CountyScorer, CountySources, ScoredCounty};
use crate::scoring::nurse::{
    CountyNurseSummary, NurseInsights, NurseStaffingModel, StaffedSchool, StaffingInput, annotate,
    county_nurse_summary, nurse_insights,
};
use crate::scoring::school::SchoolScorer;
use crate::scoring::types::{CountyScoreRow, SchoolScoreRow, SnapshotRow};
use crate::sources::aqi::{AqiRow, normalize_aqi};
use crate::sources::hpsa::{HpsaRow, normalize_hpsa};
use crate::sources::nri::{NriRow, normalize_nri};
use crate::sources::places::{PlacesRow, normalize_places};
use crate::sources::respiratory::{RespiratoryReading, RespiratoryRow, normalize_respiratory};
use crate::sources::schools::{SchoolRecord, SchoolRow, normalize_schools};
use crate::sources::{SourceKind, SourceStatus, SourceTable};
use crate::trends::{EntityType, SnapshotArchive, TrendSummary};

pub const COUNTY_SCORECARD: &str = "scorecard.csv";
pub const SCHOOL_SCORECARD: &str = "school_scorecard.csv";
pub const COUNTY_NURSE_SUMMARY: &str = "county_nurse_summary.csv";
pub const TRENDS_FILE: &str = "trends.json";
pub const RUN_SUMMARY: &str = "run_summary.json";
pub const HISTORY_DIR: &str = "history";

/// Where each feed comes from: a URL or a local path. `None` means the feed
/// is unavailable for this run.
#[derive(Debug, Clone, Default)]
pub struct SourceLocations {
    pub aqi: Option<String>,
    pub hpsa: Option<String>,
    pub places: Option<String>,
    pub tract_places: Option<String>,
    pub nri: Option<String>,
    pub respiratory: Option<String>,
    /// An activity label given directly, used instead of `respiratory`.
    pub respiratory_level: Option<String>,
    pub schools: Option<String>,
}

/// Normalized feeds for one run.
#[derive(Debug, Clone)]
pub struct LoadedSources {
    pub county: CountySources,
    pub tract_places: SourceTable,
    pub schools: Vec<SchoolRecord>,
    pub statuses: BTreeMap<String, SourceStatus>,
}

#[derive(Debug, Clone)]
pub struct ScoredRun {
    pub counties: Vec<ScoredCounty>,
    /// Highest composite first; also the nurse draw order.
    pub schools: Vec<StaffedSchool>,
    pub county_nurse: Vec<CountyNurseSummary>,
    pub insights: NurseInsights,
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub out_dir: PathBuf,
    pub archive: bool,
    pub run_date: NaiveDate,
    pub now: DateTime<Utc>,
}

impl RunOptions {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        let now = Utc::now();
        Self {
            out_dir: out_dir.into(),
            archive: true,
            run_date: now.date_naive(),
            now,
        }
    }

    pub fn history_dir(&self) -> PathBuf {
        self.out_dir.join(HISTORY_DIR)
    }
}

/// Order-sensitive and order-insensitive fingerprints of the school ids in
/// nurse draw order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFingerprint {
    pub count: usize,
    pub ordered: String,
    pub unordered: String,
}

impl OrderFingerprint {
    pub fn of<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        let ids: Vec<&str> = ids.into_iter().collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        Self {
            count: ids.len(),
            ordered: sha256_hex(&ids),
            unordered: sha256_hex(&sorted),
        }
    }

    /// Same schools, different draw order.
    pub fn reordered_from(&self, previous: &OrderFingerprint) -> bool {
        self.unordered == previous.unordered && self.ordered != previous.ordered
    }
}

fn sha256_hex(ids: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for id in ids {
        hasher.update(id.as_bytes());
        hasher.update(b"\n");
    }
    format!("{:x}", hasher.finalize())
}

/// Written as `run_summary.json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunManifest {
    pub generated_at: DateTime<Utc>,
    pub run_date: NaiveDate,
    pub nurse_seed: u64,
    pub lookback_days: usize,
    pub sources: BTreeMap<String, SourceStatus>,
    pub counties_scored: usize,
    pub schools_scored: usize,
    pub school_order: OrderFingerprint,
    pub school_order_changed: bool,
    pub nurse_insights: NurseInsights,
}

#[derive(Deserialize)]
struct PreviousManifest {
    school_order: Option<OrderFingerprint>,
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub run: ScoredRun,
    pub manifest: RunManifest,
    pub trends: Option<TrendSummary>,
}

async fn load_table<C, T, F>(client: &C, location: Option<&str>, kind: SourceKind, normalize: F) -> SourceTable
where
    C: HttpClient,
    T: DeserializeOwned,
    F: FnOnce(&[T]) -> SourceTable,
{
    let Some(location) = location else {
        warn!(source = %kind, "No location for source");
        return SourceTable::missing(kind, "no location configured");
    };

    match load_rows::<C, T>(client, location).await {
        Ok(rows) => normalize(&rows),
        Err(err) => {
            warn!(source = %kind, error = %format!("{err:#}"), "Source failed to load");
            SourceTable::missing(kind, format!("{err:#}"))
        }
    }
}

async fn load_respiratory<C: HttpClient>(
    client: &C,
    config: &ScoringConfig,
    locations: &SourceLocations,
) -> RespiratoryReading {
    if let Some(level) = locations.respiratory_level.as_deref() {
        return config.respiratory_scale.read(Some(level));
    }
    let Some(location) = locations.respiratory.as_deref() else {
        return config.respiratory_scale.fallback();
    };

    match load_rows::<C, RespiratoryRow>(client, location).await {
        Ok(rows) => normalize_respiratory(&rows, config),
        Err(err) => {
            warn!(source = %SourceKind::Respiratory, error = %format!("{err:#}"), "Source failed to load");
            config.respiratory_scale.fallback()
        }
    }
}

async fn load_schools<C: HttpClient>(
    client: &C,
    config: &ScoringConfig,
    location: Option<&str>,
) -> (Vec<SchoolRecord>, SourceStatus) {
    let Some(location) = location else {
        warn!(source = %SourceKind::Schools, "No school directory, school scoring skipped");
        return (
            Vec::new(),
            SourceStatus::Missing {
                reason: "no location configured".to_string(),
            },
        );
    };

    match load_rows::<C, SchoolRow>(client, location).await {
        Ok(rows) => {
            let schools = normalize_schools(&rows, config);
            let status = if schools.is_empty() {
                SourceStatus::Missing {
                    reason: "no schools in target counties".to_string(),
                }
            } else {
                SourceStatus::Loaded { keys: schools.len() }
            };
            (schools, status)
        }
        Err(err) => {
            warn!(source = %SourceKind::Schools, error = %format!("{err:#}"), "Source failed to load");
            (Vec::new(), SourceStatus::Missing { reason: format!("{err:#}") })
        }
    }
}

/// Loads and normalizes every feed. Never fails; failures become missing
/// tables.
#[tracing::instrument(skip_all)]
pub async fn load_sources<C: HttpClient>(
    client: &C,
    config: &ScoringConfig,
    locations: &SourceLocations,
) -> LoadedSources {
    let county_keys: BTreeSet<String> = config.county_fips().into_iter().collect();

    let aqi = load_table(client, locations.aqi.as_deref(), SourceKind::Aqi, |rows: &[AqiRow]| {
        normalize_aqi(rows, config)
    })
    .await;
    let hpsa = load_table(client, locations.hpsa.as_deref(), SourceKind::Hpsa, |rows: &[HpsaRow]| {
        normalize_hpsa(rows, config)
    })
    .await;
    let places = load_table(
        client,
        locations.places.as_deref(),
        SourceKind::Places,
        |rows: &[PlacesRow]| normalize_places(rows, &county_keys, SourceKind::Places),
    )
    .await;
    let nri = load_table(client, locations.nri.as_deref(), SourceKind::Nri, |rows: &[NriRow]| {
        normalize_nri(rows, config)
    })
    .await;
    let respiratory = load_respiratory(client, config, locations).await;

    let (schools, school_status) = load_schools(client, config, locations.schools.as_deref()).await;
    let tract_keys: BTreeSet<String> = schools
        .iter()
        .filter_map(|s| s.census_tract.clone())
        .collect();
    let tract_places = if tract_keys.is_empty() && !schools.is_empty() {
        warn!(source = %SourceKind::TractPlaces, "No school has a census tract");
        SourceTable::missing(SourceKind::TractPlaces, "no geocoded schools")
    } else {
        load_table(
            client,
            locations.tract_places.as_deref(),
            SourceKind::TractPlaces,
            |rows: &[PlacesRow]| normalize_places(rows, &tract_keys, SourceKind::TractPlaces),
        )
        .await
    };

    let mut statuses = BTreeMap::new();
    for table in [&aqi, &hpsa, &places, &nri, &tract_places] {
        statuses.insert(table.kind.to_string(), table.status.clone());
    }
    statuses.insert(
        SourceKind::Respiratory.to_string(),
        if respiratory.missing {
            SourceStatus::Missing {
                reason: format!("fallback level {}", respiratory.label),
            }
        } else {
            SourceStatus::Loaded { keys: 1 }
        },
    );
    statuses.insert(SourceKind::Schools.to_string(), school_status);

    LoadedSources {
        county: CountySources {
            aqi,
            hpsa,
            places,
            nri,
            respiratory,
        },
        tract_places,
        schools,
        statuses,
    }
}

/// Scores counties and schools and draws nurse coverage. Pure apart from
/// logging.
#[tracing::instrument(skip_all)]
pub fn score(config: &ScoringConfig, sources: &LoadedSources) -> ScoredRun {
    let counties = CountyScorer::new(config).score_all(&config.counties, &sources.county);
    let scored_schools = SchoolScorer::new(config).score_all(&sources.schools, &counties, &sources.tract_places);

    let inputs: Vec<StaffingInput> = scored_schools.iter().map(StaffingInput::from).collect();
    let assignments = NurseStaffingModel::new(config.nurse_coverage.clone()).assign_seeded(&inputs, config.nurse_seed);

    let schools = annotate(scored_schools, assignments, &config.grade_scale, &config.staffing_costs);
    let county_nurse = county_nurse_summary(&schools, &config.staffing_costs);
    let insights = nurse_insights(&schools, &config.staffing_costs);

    info!(
        counties = counties.len(),
        schools = schools.len(),
        no_nurse = insights.schools_no_nurse,
        "Scoring complete"
    );

    ScoredRun {
        counties,
        schools,
        county_nurse,
        insights,
    }
}

fn read_previous_order(path: &Path) -> Option<OrderFingerprint> {
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str::<PreviousManifest>(&content) {
        Ok(previous) => previous.school_order,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Previous run summary unreadable");
            None
        }
    }
}

/// Writes scorecards, snapshots, trends and the run manifest.
#[tracing::instrument(skip_all, fields(out_dir = %options.out_dir.display()))]
pub fn publish(
    config: &ScoringConfig,
    sources: &LoadedSources,
    run: &ScoredRun,
    options: &RunOptions,
) -> Result<(RunManifest, Option<TrendSummary>)> {
    let out = &options.out_dir;
    fs::create_dir_all(out).with_context(|| format!("creating {}", out.display()))?;

    let county_rows: Vec<CountyScoreRow> = run.counties.iter().map(CountyScoreRow::from).collect();
    write_csv(out.join(COUNTY_SCORECARD), &county_rows)?;

    let school_rows: Vec<SchoolScoreRow> = run.schools.iter().map(SchoolScoreRow::from).collect();
    write_csv(out.join(SCHOOL_SCORECARD), &school_rows)?;
    write_csv(out.join(COUNTY_NURSE_SUMMARY), &run.county_nurse)?;

    let trends = if options.archive {
        let archive = SnapshotArchive::new(options.history_dir());
        let county_snapshot: Vec<SnapshotRow> = run.counties.iter().map(SnapshotRow::from).collect();
        archive.archive(EntityType::County, &county_snapshot, options.run_date)?;
        if !run.schools.is_empty() {
            let school_snapshot: Vec<SnapshotRow> = run.schools.iter().map(SnapshotRow::from).collect();
            archive.archive(EntityType::Schools, &school_snapshot, options.run_date)?;
        }

        let summary = archive.summarize(config.lookback_days, options.now);
        write_json(out.join(TRENDS_FILE), &summary)?;
        Some(summary)
    } else {
        info!("Archiving disabled, trends not refreshed");
        None
    };

    let school_order = OrderFingerprint::of(run.schools.iter().map(|s| s.scored.school.school_id.as_str()));
    let manifest_path = out.join(RUN_SUMMARY);
    let school_order_changed = match read_previous_order(&manifest_path) {
        Some(previous) if school_order.reordered_from(&previous) => {
            warn!(
                schools = school_order.count,
                "Same schools as last run in a different order, nurse assignments will differ"
            );
            true
        }
        _ => false,
    };

    let manifest = RunManifest {
        generated_at: options.now,
        run_date: options.run_date,
        nurse_seed: config.nurse_seed,
        lookback_days: config.lookback_days,
        sources: sources.statuses.clone(),
        counties_scored: run.counties.len(),
        schools_scored: run.schools.len(),
        school_order,
        school_order_changed,
        nurse_insights: run.insights.clone(),
    };
    write_json(&manifest_path, &manifest)?;

    info!(out_dir = %out.display(), "Outputs written");
    Ok((manifest, trends))
}

/// Runs the whole batch once.
pub async fn run<C: HttpClient>(
    client: &C,
    config: &ScoringConfig,
    locations: &SourceLocations,
    options: &RunOptions,
) -> Result<PipelineOutput> {
    let sources = load_sources(client, config, locations).await;
    let scored = score(config, &sources);
    let (manifest, trends) = publish(config, &sources, &scored, options)?;

    Ok(PipelineOutput {
        run: scored,
        manifest,
        trends,
    })
}

/// Recomputes `trends.json` from the existing archive.
pub fn refresh_trends(config: &ScoringConfig, out_dir: &Path, now: DateTime<Utc>) -> Result<TrendSummary> {
    let archive = SnapshotArchive::new(out_dir.join(HISTORY_DIR));
    let summary = archive.summarize(config.lookback_days, now);
    write_json(out_dir.join(TRENDS_FILE), &summary)?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_detects_reorder() {
        let first = OrderFingerprint::of(["a", "b", "c"]);
        let swapped = OrderFingerprint::of(["b", "a", "c"]);
        let changed = OrderFingerprint::of(["a", "b", "d"]);

        assert_eq!(first.unordered, swapped.unordered);
        assert_ne!(first.ordered, swapped.ordered);
        assert!(swapped.reordered_from(&first));
        assert!(!first.reordered_from(&first));
        assert!(!changed.reordered_from(&first));
    }

    #[test]
    fn test_fingerprint_separates_ids() {
        assert_ne!(OrderFingerprint::of(["ab", "c"]).ordered, OrderFingerprint::of(["a", "bc"]).ordered);
    }

    #[test]
    fn test_fingerprint_of_empty_run() {
        let empty = OrderFingerprint::of(std::iter::empty());
        assert_eq!(empty.count, 0);
        assert_eq!(
            empty.ordered,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(empty.ordered, empty.unordered);
    }
}
