//! The set of process names exempt from relocation.
//!
//! Matching is a case-insensitive exact match on the executable name;
//! entries are normalized to uppercase on the way in. Persistence is the
//! caller's concern, this is only the in-memory set.
use std::collections::BTreeSet;

/// Processes allowed on protected monitors out of the box.
pub const DEFAULT_ALLOWLIST: &[&str] = &["POWERPNT.EXE", "OBS64.EXE", "OBS32.EXE"];

#[derive(Debug, Clone)]
pub struct AllowList {
    entries: BTreeSet<String>,
    /// User-added entries, tracked separately so a UI can list and clear
    /// them without touching the defaults.
    custom: BTreeSet<String>,
}

impl Default for AllowList {
    fn default() -> Self {
        Self {
            entries: DEFAULT_ALLOWLIST.iter().map(|e| (*e).to_string()).collect(),
            custom: BTreeSet::new(),
        }
    }
}

fn normalize(process_name: &str) -> String {
    process_name.trim().to_uppercase()
}

impl AllowList {
    #[must_use]
    pub fn is_allowed(&self, process_name: &str) -> bool {
        if process_name.is_empty() {
            return false;
        }
        self.entries.contains(&normalize(process_name))
    }

    pub fn add(&mut self, process_name: &str, custom: bool) {
        let entry = normalize(process_name);
        if entry.is_empty() {
            return;
        }
        if custom {
            self.custom.insert(entry.clone());
        }
        self.entries.insert(entry);
    }

    pub fn remove(&mut self, process_name: &str) {
        let entry = normalize(process_name);
        self.entries.remove(&entry);
        self.custom.remove(&entry);
    }

    #[must_use]
    pub fn all(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }

    #[must_use]
    pub fn custom(&self) -> Vec<String> {
        self.custom.iter().cloned().collect()
    }

    #[must_use]
    pub fn defaults() -> Vec<String> {
        DEFAULT_ALLOWLIST.iter().map(|e| (*e).to_string()).collect()
    }

    #[must_use]
    pub fn is_default(&self, process_name: &str) -> bool {
        DEFAULT_ALLOWLIST.contains(&normalize(process_name).as_str())
    }

    pub fn clear_custom(&mut self) {
        for entry in &self.custom {
            self.entries.remove(entry);
        }
        self.custom.clear();
    }
}
