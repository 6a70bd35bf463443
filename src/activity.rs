use crate::{now_millis, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::{error, warn};

/// journal file layout, a single named key holding the entries
#[derive(Debug, Default, Serialize, Deserialize)]
struct Journal {
    activities: Vec<ActivityEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: String,
    pub admin_id: i32,
    pub admin_name: String,
    pub action: String,
    pub details: String,
    /// unix millis
    pub timestamp: i64,
}

/// capped journal of admin actions, oldest entries dropped first.
/// persist failures are logged and never fail the recording action.
pub struct ActivityLog {
    path: PathBuf,
    capacity: usize,
    entries: RwLock<Vec<ActivityEntry>>,
}

impl ActivityLog {
    /// load the journal, missing or unreadable files start empty
    pub fn open<P: Into<PathBuf>>(path: P, capacity: usize) -> Self {
        let path = path.into();
        let mut entries = match fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<Journal>(&bytes) {
                Ok(journal) => journal.activities,
                Err(e) => {
                    warn!(
                        error = e.to_string(),
                        "discarding unreadable activity journal {:?}", path
                    );
                    vec![]
                }
            },
            Err(_) => vec![],
        };
        // capacity may have been lowered since the journal was written
        if entries.len() > capacity {
            let excess = entries.len() - capacity;
            entries.drain(..excess);
        }
        Self {
            path,
            capacity,
            entries: RwLock::new(entries),
        }
    }

    pub fn append(
        &self,
        admin_id: i32,
        admin_name: &str,
        action: &str,
        details: &str,
    ) -> ActivityEntry {
        let entry = ActivityEntry {
            id: entry_id(),
            admin_id,
            admin_name: admin_name.to_owned(),
            action: action.to_owned(),
            details: details.to_owned(),
            timestamp: now_millis() as i64,
        };
        self.push(entry.clone());
        entry
    }

    fn push(&self, entry: ActivityEntry) {
        let mut entries = self.entries.write();
        entries.push(entry);
        if entries.len() > self.capacity {
            let excess = entries.len() - self.capacity;
            entries.drain(..excess);
        }
        if let Err(e) = self.persist(&entries) {
            error!(
                error = e.to_string(),
                "failed to persist activity journal {:?}", self.path
            );
        }
    }

    /// newest first
    pub fn list(&self) -> Vec<ActivityEntry> {
        let mut entries = self.entries.read().clone();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn persist(&self, entries: &[ActivityEntry]) -> Result<()> {
        let json = serde_json::to_vec(&serde_json::json!({ "activities": entries }))?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

fn entry_id() -> String {
    let rand: [u8; 4] = rand::random();
    format!("{}-{}", now_millis(), hex::encode(rand))
}
