//! Local project phase tracking.
//!
//! Phases are a purely local annotation: ACC has no notion of them. Each
//! project keeps a current phase and a bounded history of phase changes in
//! `project_phases.json`:
//!
//! ```json
//! {
//!   "version": 2,
//!   "projects": {
//!     "b.1234": {
//!       "current": "Design",
//!       "history": [
//!         { "phase": "Design", "timestamp": "2024-03-01T09:30:00Z", "dateSet": "2024-03-01" }
//!       ]
//!     }
//!   }
//! }
//! ```
//!
//! Earlier releases stored a bare map from project id to either a phase
//! string or an object without a version. Such files are upgraded when the
//! store is opened and written back in the current schema.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use acc_core::error::InvalidInputError;
use acc_core::Result;

use crate::fs::{LockGuard, corrupt, read_optional, write_atomic};

/// Phase reported for projects that have never had one set.
pub const NOT_SET: &str = "Not Set";

pub const SCHEMA_VERSION: u32 = 2;

/// Maximum history length kept by [`PhaseStore::set_project_phase`].
pub const HISTORY_LIMIT: usize = 20;

/// Maximum history length kept by [`PhaseStore::add_phase_with_date`].
pub const DATED_HISTORY_LIMIT: usize = 7;

/// The phase names offered to users.
pub const AVAILABLE_PHASES: [&str; 18] = [
    "Concept",
    "Design",
    "Bidding",
    "Planning",
    "Preconstruction",
    "Construction",
    "Commissioning",
    "Warranty",
    "Complete",
    "Facility Management",
    "Operation",
    "Strategic Definition",
    "Preparation and Brief",
    "Concept Design",
    "Developed Design",
    "Technical Design",
    "Handover and Close Out",
    "In Use",
];

/// One recorded phase change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseEntry {
    pub phase: String,
    pub timestamp: DateTime<Utc>,
    pub date_set: NaiveDate,
}

impl PhaseEntry {
    /// An entry stamped with the current time.
    pub fn now(phase: impl Into<String>) -> Self {
        let timestamp = Utc::now();
        Self {
            phase: phase.into(),
            timestamp,
            date_set: timestamp.date_naive(),
        }
    }

    /// An entry for a phase that started on the given date.
    pub fn on_date(phase: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            phase: phase.into(),
            timestamp: date.and_time(chrono::NaiveTime::MIN).and_utc(),
            date_set: date,
        }
    }
}

/// Phase state of a single project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectPhases {
    pub current: String,
    #[serde(default)]
    pub history: Vec<PhaseEntry>,
}

impl ProjectPhases {
    fn new(current: impl Into<String>) -> Self {
        Self {
            current: current.into(),
            history: Vec::new(),
        }
    }
}

/// The on-disk document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseDocument {
    pub version: u32,
    #[serde(default)]
    pub projects: BTreeMap<String, ProjectPhases>,
}

impl Default for PhaseDocument {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
            projects: BTreeMap::new(),
        }
    }
}

/// A row of [`PhaseStore::all_project_phases`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseRecord {
    pub phase: String,
    pub timestamp: DateTime<Utc>,
    pub date_set: NaiveDate,
    pub is_current: bool,
}

/// Portable dump produced by [`PhaseStore::export`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseExport {
    pub version: u32,
    pub export_date: DateTime<Utc>,
    pub projects: BTreeMap<String, ProjectPhases>,
}

/// File-backed project phase store.
///
/// Every mutation is a locked read-modify-write of the document, so two
/// processes sharing a data directory do not lose each other's updates.
#[derive(Debug, Clone)]
pub struct PhaseStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl PhaseStore {
    pub const FILE_NAME: &'static str = "project_phases.json";

    /// Open the store in the given data directory, upgrading a legacy
    /// document in place if one is found.
    #[instrument(skip_all, fields(dir = %data_dir.as_ref().display()))]
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let store = Self {
            path: data_dir.as_ref().join(Self::FILE_NAME),
            lock_path: data_dir.as_ref().join("project_phases.lock"),
        };

        let _lock = LockGuard::acquire(&store.lock_path)?;
        if let Some(json) = read_optional(&store.path)? {
            let (document, upgraded) = store.parse(&json)?;
            if upgraded {
                info!(
                    projects = document.projects.len(),
                    "Upgraded legacy phase document"
                );
                store.write(&document)?;
            }
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Current phase of a project, or [`NOT_SET`].
    pub fn project_phase(&self, project_id: &str) -> Result<String> {
        let document = self.read()?;
        Ok(document
            .projects
            .get(project_id)
            .map(|p| p.current.clone())
            .unwrap_or_else(|| NOT_SET.to_string()))
    }

    /// Stored history of a project, oldest first.
    pub fn project_phase_history(&self, project_id: &str) -> Result<Vec<PhaseEntry>> {
        let document = self.read()?;
        Ok(document
            .projects
            .get(project_id)
            .map(|p| p.history.clone())
            .unwrap_or_default())
    }

    /// The current phase (unless unset) followed by the history, most
    /// recent first.
    pub fn all_project_phases(&self, project_id: &str) -> Result<Vec<PhaseRecord>> {
        let document = self.read()?;
        let Some(project) = document.projects.get(project_id) else {
            return Ok(Vec::new());
        };

        let mut records = Vec::with_capacity(project.history.len() + 1);
        if project.current != NOT_SET {
            let now = Utc::now();
            records.push(PhaseRecord {
                phase: project.current.clone(),
                timestamp: now,
                date_set: now.date_naive(),
                is_current: true,
            });
        }
        records.extend(project.history.iter().rev().map(|entry| PhaseRecord {
            phase: entry.phase.clone(),
            timestamp: entry.timestamp,
            date_set: entry.date_set,
            is_current: false,
        }));

        Ok(records)
    }

    /// Current phases for several projects at once.
    pub fn multiple_project_phases<I, S>(&self, project_ids: I) -> Result<BTreeMap<String, String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let document = self.read()?;
        Ok(project_ids
            .into_iter()
            .map(|id| {
                let id = id.as_ref();
                let phase = document
                    .projects
                    .get(id)
                    .map(|p| p.current.clone())
                    .unwrap_or_else(|| NOT_SET.to_string());
                (id.to_string(), phase)
            })
            .collect())
    }

    pub fn available_phases(&self) -> &'static [&'static str] {
        &AVAILABLE_PHASES
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Set the current phase, recording the change in history when it
    /// differs from the most recent entry.
    #[instrument(skip(self))]
    pub fn set_project_phase(&self, project_id: &str, phase: &str) -> Result<()> {
        validate_phase(phase)?;
        self.update(|document| {
            let project = document
                .projects
                .entry(project_id.to_string())
                .or_insert_with(|| ProjectPhases::new(phase));

            let last = project
                .history
                .last()
                .map(|entry| entry.phase.as_str())
                .unwrap_or(project.current.as_str());

            if last != phase {
                project.history.push(PhaseEntry::now(phase));
                truncate_front(&mut project.history, HISTORY_LIMIT);
            }
            project.current = phase.to_string();
        })
    }

    /// Append a dated entry without changing the current phase. History is
    /// capped at [`DATED_HISTORY_LIMIT`], dropping the oldest entries.
    #[instrument(skip(self, entry), fields(phase = %entry.phase))]
    pub fn add_phase_with_date(&self, project_id: &str, entry: PhaseEntry) -> Result<()> {
        validate_phase(&entry.phase)?;
        self.update(|document| {
            let project = document
                .projects
                .entry(project_id.to_string())
                .or_insert_with(|| ProjectPhases::new(NOT_SET));
            project.history.push(entry);
            truncate_front(&mut project.history, DATED_HISTORY_LIMIT);
        })
    }

    /// Remove a history entry by its index in [`project_phase_history`]
    /// order. Unknown projects and out-of-range indices are ignored.
    ///
    /// Returns true if an entry was removed.
    ///
    /// [`project_phase_history`]: PhaseStore::project_phase_history
    #[instrument(skip(self))]
    pub fn remove_phase_by_index(&self, project_id: &str, index: usize) -> Result<bool> {
        let mut removed = false;
        self.update(|document| {
            if let Some(project) = document.projects.get_mut(project_id) {
                if index < project.history.len() {
                    project.history.remove(index);
                    removed = true;
                }
            }
        })?;
        if !removed {
            debug!("Nothing to remove");
        }
        Ok(removed)
    }

    #[instrument(skip(self))]
    pub fn clear_all(&self) -> Result<()> {
        self.update(|document| document.projects.clear())
    }

    /// Snapshot of every project's phases.
    pub fn export(&self) -> Result<PhaseExport> {
        let document = self.read()?;
        Ok(PhaseExport {
            version: SCHEMA_VERSION,
            export_date: Utc::now(),
            projects: document.projects,
        })
    }

    /// Merge an export into the store. Imported projects replace existing
    /// entries with the same id; others are kept.
    ///
    /// Accepts the current export format (`projects`) and the legacy one
    /// (`phases`, with string or object values). Returns the number of
    /// projects imported.
    #[instrument(skip(self, data))]
    pub fn import(&self, data: &Value) -> Result<usize> {
        let imported = if let Some(projects) = data.get("projects").and_then(Value::as_object) {
            upgrade_map(projects)
        } else if let Some(phases) = data.get("phases").and_then(Value::as_object) {
            upgrade_map(phases)
        } else {
            return Err(InvalidInputError::Other {
                message: "import data has neither 'projects' nor 'phases'".to_string(),
            }
            .into());
        };

        let count = imported.len();
        self.update(|document| document.projects.extend(imported))?;
        info!(count, "Imported project phases");
        Ok(count)
    }

    // ========================================================================
    // Document I/O
    // ========================================================================

    fn read(&self) -> Result<PhaseDocument> {
        match read_optional(&self.path)? {
            Some(json) => Ok(self.parse(&json)?.0),
            None => Ok(PhaseDocument::default()),
        }
    }

    fn update(&self, mutate: impl FnOnce(&mut PhaseDocument)) -> Result<()> {
        let _lock = LockGuard::acquire(&self.lock_path)?;
        let mut document = self.read()?;
        mutate(&mut document);
        self.write(&document)
    }

    fn write(&self, document: &PhaseDocument) -> Result<()> {
        let json = serde_json::to_string_pretty(document).map_err(|e| corrupt(&self.path, e))?;
        write_atomic(&self.path, &json, false)
    }

    /// Parse a document, returning whether it had to be upgraded.
    fn parse(&self, json: &str) -> Result<(PhaseDocument, bool)> {
        let value: Value = serde_json::from_str(json).map_err(|e| corrupt(&self.path, e))?;
        let Some(object) = value.as_object() else {
            return Err(corrupt(&self.path, "expected a JSON object"));
        };

        match object.get("version").and_then(Value::as_u64) {
            Some(v) if v == u64::from(SCHEMA_VERSION) => {
                let document = serde_json::from_value(value).map_err(|e| corrupt(&self.path, e))?;
                Ok((document, false))
            }
            Some(v) => Err(corrupt(&self.path, format!("unsupported schema version {}", v))),
            None => Ok((
                PhaseDocument {
                    version: SCHEMA_VERSION,
                    projects: upgrade_map(object),
                },
                true,
            )),
        }
    }
}

fn validate_phase(phase: &str) -> Result<()> {
    if phase.trim().is_empty() {
        return Err(InvalidInputError::MissingField { field: "phase" }.into());
    }
    Ok(())
}

fn truncate_front<T>(items: &mut Vec<T>, limit: usize) {
    if items.len() > limit {
        items.drain(..items.len() - limit);
    }
}

/// Convert a legacy `{ projectId: string | object }` map.
fn upgrade_map(map: &serde_json::Map<String, Value>) -> BTreeMap<String, ProjectPhases> {
    map.iter()
        .filter_map(|(id, value)| match upgrade_project(value) {
            Some(project) => Some((id.clone(), project)),
            None => {
                warn!(project = %id, "Skipping unreadable phase entry");
                None
            }
        })
        .collect()
}

fn upgrade_project(value: &Value) -> Option<ProjectPhases> {
    match value {
        Value::String(phase) => Some(ProjectPhases::new(phase.as_str())),
        Value::Object(object) => {
            let current = object
                .get("current")
                .and_then(Value::as_str)
                .unwrap_or(NOT_SET);
            let history = object
                .get("history")
                .and_then(Value::as_array)
                .map(|entries| entries.iter().filter_map(upgrade_entry).collect())
                .unwrap_or_default();
            Some(ProjectPhases {
                current: current.to_string(),
                history,
            })
        }
        _ => None,
    }
}

/// Read a history entry, tolerating missing or partial dates.
fn upgrade_entry(value: &Value) -> Option<PhaseEntry> {
    let phase = value.get("phase")?.as_str()?;
    let timestamp = value
        .get("timestamp")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc));
    let date_set = value
        .get("dateSet")
        .and_then(Value::as_str)
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());

    match (timestamp, date_set) {
        (Some(timestamp), Some(date_set)) => Some(PhaseEntry {
            phase: phase.to_string(),
            timestamp,
            date_set,
        }),
        (Some(timestamp), None) => Some(PhaseEntry {
            phase: phase.to_string(),
            timestamp,
            date_set: timestamp.date_naive(),
        }),
        (None, Some(date_set)) => Some(PhaseEntry::on_date(phase, date_set)),
        (None, None) => None,
    }
}
