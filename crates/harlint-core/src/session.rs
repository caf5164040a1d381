//! Per-run session state.
//!
//! One session is constructed when the run opens, populated as capture
//! events arrive, read once at summarize time, and discarded with the
//! process. There is no eviction, no size bound and no persistence: it is
//! sized for a single bounded test run. The store is passed explicitly into
//! the pipeline rather than living in ambient global state, and `&mut self`
//! on `record` serializes appends into the same group by construction.

use serde::{Deserialize, Serialize};

use crate::extract::model::ScriptInventory;
use crate::knowledge::model::KnowledgeReport;
use crate::util::OrderedMap;

/// Everything recorded for one logical group (one tested page or scenario,
/// repeated across iterations). Both sequences are append-only and follow
/// event-arrival order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupState {
    pub analyzed_data: Vec<ScriptInventory>,
    pub knowledge_data: Vec<KnowledgeReport>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    groups: OrderedMap<GroupState>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one capture's results under `group`, creating the group state
    /// lazily on first use.
    pub fn record(&mut self, group: &str, inventory: ScriptInventory, report: KnowledgeReport) {
        let state = self.groups.or_insert_with(group, GroupState::default);
        state.analyzed_data.push(inventory);
        state.knowledge_data.push(report);
    }

    /// Read-only snapshot of the full per-group state.
    pub fn summary(&self) -> &OrderedMap<GroupState> {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&GroupState> {
        self.groups.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inventory(url: &str) -> ScriptInventory {
        ScriptInventory::new(url)
    }

    fn report(url: &str, group: &str) -> KnowledgeReport {
        KnowledgeReport::empty(url, group)
    }

    #[test]
    fn groups_are_created_lazily() {
        let mut session = Session::new();
        assert!(session.is_empty());

        session.record("a", inventory("https://a.test/"), report("https://a.test/", "a"));

        assert!(session.group("a").is_some());
        assert!(session.group("b").is_none());
    }

    #[test]
    fn interleaved_groups_keep_arrival_order() {
        let mut session = Session::new();
        session.record("A", inventory("https://a.test/1"), report("https://a.test/1", "A"));
        session.record("B", inventory("https://b.test/"), report("https://b.test/", "B"));
        session.record("A", inventory("https://a.test/2"), report("https://a.test/2", "A"));

        let a = session.group("A").unwrap();
        assert_eq!(a.analyzed_data.len(), 2);
        assert_eq!(a.knowledge_data.len(), 2);
        assert_eq!(a.analyzed_data[0].url, "https://a.test/1");
        assert_eq!(a.analyzed_data[1].url, "https://a.test/2");

        let b = session.group("B").unwrap();
        assert_eq!(b.analyzed_data.len(), 1);

        let order: Vec<&str> = session.summary().keys().collect();
        assert_eq!(order, vec!["A", "B"]);
    }

    #[test]
    fn inventories_and_reports_stay_paired() {
        let mut session = Session::new();
        session.record("a", inventory("https://a.test/"), report("https://a.test/", "a"));

        let state = session.group("a").unwrap();
        assert_eq!(state.analyzed_data.len(), state.knowledge_data.len());
    }

    #[test]
    fn summary_serializes_groups_in_first_seen_order() {
        let mut session = Session::new();
        session.record("late-name", inventory("u1"), report("u1", "late-name"));
        session.record("early-name", inventory("u2"), report("u2", "early-name"));

        let json = serde_json::to_string(session.summary()).unwrap();
        assert!(json.find("late-name").unwrap() < json.find("early-name").unwrap());
    }
}
