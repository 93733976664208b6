//! In-memory move counters.
#![allow(clippy::module_name_repetitions)]
use serde::{Deserialize, Serialize};

/// Counters mutated only by the engine, on every successful move. Reset
/// only on explicit external request.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct EnforcementStats {
    pub total_moves: u64,
    pub last_moved_process: String,
    pub last_moved_title: String,
}

impl EnforcementStats {
    pub fn record(&mut self, process_name: &str, title: &str) {
        self.total_moves += 1;
        self.last_moved_process = process_name.to_string();
        self.last_moved_title = title.to_string();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_updates_all_fields() {
        let mut stats = EnforcementStats::default();
        stats.record("NOTEPAD.EXE", "Untitled - Notepad");
        stats.record("MSPAINT.EXE", "Untitled - Paint");
        assert_eq!(stats.total_moves, 2);
        assert_eq!(stats.last_moved_process, "MSPAINT.EXE");
        assert_eq!(stats.last_moved_title, "Untitled - Paint");
        stats.reset();
        assert_eq!(stats, EnforcementStats::default());
    }
}
