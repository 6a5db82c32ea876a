//! Optional local run counter.
//!
//! Disabled unless `telemetry.visit_counter` is set. The state file is
//! versioned JSON, rewritten atomically on every visit.

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::config::{get_config_dir, TelemetryConfig};

pub trait VisitCounter {
    /// Count one run and return the running total.
    fn record_visit(&mut self) -> Result<u64>;
}

/// Counter used when the visit counter is disabled.
#[derive(Debug, Default)]
pub struct NoopCounter;

impl VisitCounter for NoopCounter {
    fn record_visit(&mut self) -> Result<u64> {
        Ok(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitState {
    pub version: u32,
    pub visits: u64,
    #[serde(default)]
    pub last_visit: Option<DateTime<Utc>>,
}

impl VisitState {
    pub fn new() -> Self {
        Self {
            version: 1,
            visits: 0,
            last_visit: None,
        }
    }
}

impl Default for VisitState {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the default counter file path (~/.config/ecoscore/visits.json)
pub fn get_visits_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("visits.json"))
}

/// Load counter state. A missing file is a fresh state.
pub fn load_visit_state(path: &Path) -> Result<VisitState> {
    if !path.exists() {
        return Ok(VisitState::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open visit counter file at {}", path.display()))?;
    let state: VisitState = serde_json::from_reader(file).context("Failed to load visit counter")?;

    if state.version != 1 {
        anyhow::bail!("Unsupported visit counter version: {}", state.version);
    }
    Ok(state)
}

/// Save counter state atomically, creating the parent directory if needed.
pub fn save_visit_state(path: &Path, state: &VisitState) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    serde_json::to_writer_pretty(&mut file, state).context("Failed to serialize visit counter")?;
    file.commit().context("Failed to save visit counter")?;
    Ok(())
}

/// File-backed counter.
#[derive(Debug, Clone)]
pub struct FileVisitCounter {
    path: PathBuf,
}

impl FileVisitCounter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl VisitCounter for FileVisitCounter {
    fn record_visit(&mut self) -> Result<u64> {
        let mut state = load_visit_state(&self.path)?;
        state.visits += 1;
        state.last_visit = Some(Utc::now());
        save_visit_state(&self.path, &state)?;
        tracing::debug!(path = %self.path.display(), visits = state.visits, "recorded visit");
        Ok(state.visits)
    }
}

/// Pick the counter for a telemetry config section.
pub fn counter_from_config(config: Option<&TelemetryConfig>) -> Result<Box<dyn VisitCounter>> {
    match config {
        Some(t) if t.visit_counter => {
            let path = match t.path {
                Some(ref p) => PathBuf::from(p),
                None => get_visits_path()?,
            };
            Ok(Box::new(FileVisitCounter::new(path)))
        }
        _ => Ok(Box::new(NoopCounter)),
    }
}
