use super::key::GroupKey;
use crate::config::TimestampPolicy;
use crate::error::Error;
use crate::platform::Filesystem;
use chrono::{DateTime, Datelike, Local, NaiveDateTime, Timelike};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info};

/// The single timestamp every file of a capture group is archived under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GroupTimestamp {
    local: NaiveDateTime,
}

impl GroupTimestamp {
    pub fn from_system_time(time: SystemTime) -> Self {
        Self::from_local(DateTime::<Local>::from(time).naive_local())
    }

    pub fn from_local(local: NaiveDateTime) -> Self {
        Self { local }
    }

    /// `YYYY/MM/DD` using the host separator. The year is not padded.
    pub fn date_path(&self) -> PathBuf {
        PathBuf::from(self.local.year().to_string())
            .join(format!("{:02}", self.local.month()))
            .join(format!("{:02}", self.local.day()))
    }

    /// `HH-MM-SS`, each part zero-padded to two digits.
    pub fn time_component(&self) -> String {
        format!(
            "{:02}-{:02}-{:02}",
            self.local.hour(),
            self.local.minute(),
            self.local.second()
        )
    }
}

/// GroupKey → GroupTimestamp. Built once before any copy starts and only
/// read afterwards.
#[derive(Debug, Default, Clone)]
pub struct TimestampMap {
    entries: HashMap<GroupKey, GroupTimestamp>,
}

impl TimestampMap {
    pub fn get(&self, key: &GroupKey) -> Option<&GroupTimestamp> {
        self.entries.get(key)
    }

    pub fn for_path(&self, path: &Path) -> Option<&GroupTimestamp> {
        self.get(&GroupKey::for_path(path))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Assign one creation timestamp to every capture group in `files`.
///
/// With [`TimestampPolicy::FirstSeen`] the first file of a group in `files`
/// order is authoritative and later siblings are never stat'ed. With
/// [`TimestampPolicy::Earliest`] every file is stat'ed and the oldest time wins.
/// Any stat failure aborts: the map must be complete before planning.
pub fn resolve_timestamps(
    fs: &dyn Filesystem,
    files: &[PathBuf],
    policy: TimestampPolicy,
) -> Result<TimestampMap, Error> {
    let mut created: HashMap<GroupKey, SystemTime> = HashMap::new();

    for file in files {
        let key = GroupKey::for_path(file);
        match created.entry(key) {
            Entry::Vacant(slot) => {
                let time = read_created(fs, file)?;
                debug!("Group {} timestamped from {}", slot.key(), file.display());
                slot.insert(time);
            }
            Entry::Occupied(mut slot) => {
                if policy == TimestampPolicy::Earliest {
                    let time = read_created(fs, file)?;
                    if time < *slot.get() {
                        debug!("Group {} re-timestamped from {}", slot.key(), file.display());
                        slot.insert(time);
                    }
                }
            }
        }
    }

    let entries: HashMap<GroupKey, GroupTimestamp> = created
        .into_iter()
        .map(|(key, time)| (key, GroupTimestamp::from_system_time(time)))
        .collect();
    info!("Created timestamp map with {} groups", entries.len());

    Ok(TimestampMap { entries })
}

fn read_created(fs: &dyn Filesystem, file: &Path) -> Result<SystemTime, Error> {
    fs.created(file).map_err(|source| Error::TimestampRead {
        path: file.to_path_buf(),
        source,
    })
}
