//! Capture-event pipeline and the message-bus seam.
//!
//! The host framework delivers capture events and forwards whatever this
//! pipeline emits; both directions go through the small interfaces here.
//! For every event the pipeline runs extractor → aggregator, appends the
//! results to the session under the event's group, and emits the combined
//! record. At end of run each group's full state is emitted once.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::extract::{self, ScriptInventory};
use crate::har::CaptureRecord;
use crate::knowledge::{self, KnowledgeReport};
use crate::lint::{Linter, Ruleset};
use crate::session::Session;

/// Event name hosts deliver capture records under.
pub const CAPTURE_EVENT: &str = "capture.har";
/// Event name for the per-capture record.
pub const PAGE_SUMMARY_EVENT: &str = "harlint.pageSummary";
/// Event name for the per-group end-of-run state.
pub const RUN_SUMMARY_EVENT: &str = "harlint.summary";

/// Routing metadata attached to an outgoing message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageMeta {
    pub url: Option<String>,
    pub group: Option<String>,
}

/// Outbound side of the host framework.
pub trait MessageBus {
    fn send(&mut self, name: &str, payload: serde_json::Value, meta: MessageMeta) -> Result<()>;
}

/// One incoming capture event.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptureEvent {
    pub url: String,
    pub group: String,
    pub capture: CaptureRecord,
}

/// The combined per-capture output record.
#[derive(Debug, Clone, Serialize)]
pub struct PageAnalysis {
    pub url: String,
    pub inventory: ScriptInventory,
    pub report: KnowledgeReport,
}

/// Extractor and aggregator composed over a session store.
///
/// Events are handled in arrival order; appends into the same group are
/// serialized by the `&mut self` receiver. Within one event, the 2×N lint
/// calls are the only concurrency.
pub struct Pipeline<L> {
    linter: L,
    rulesets: Vec<Ruleset>,
    session: Session,
}

impl<L: Linter> Pipeline<L> {
    /// Pipeline with the built-in security and standard rule tables.
    pub fn new(linter: L) -> Self {
        Self::with_rulesets(linter, Ruleset::defaults())
    }

    pub fn with_rulesets(linter: L, rulesets: Vec<Ruleset>) -> Self {
        Self {
            linter,
            rulesets,
            session: Session::new(),
        }
    }

    /// Run extraction and aggregation for one event, without touching the
    /// session.
    pub async fn analyze(&self, event: &CaptureEvent) -> PageAnalysis {
        let inventory = extract::extract(&event.capture, &event.url);
        let report = knowledge::aggregate(
            Some(&inventory),
            &event.url,
            &event.group,
            &self.rulesets,
            &self.linter,
        )
        .await;
        PageAnalysis {
            url: event.url.clone(),
            inventory,
            report,
        }
    }

    /// Handle one capture event: analyze, record under the event's group,
    /// and emit the combined record.
    pub async fn process<B: MessageBus>(
        &mut self,
        event: &CaptureEvent,
        bus: &mut B,
    ) -> Result<PageAnalysis> {
        let analysis = self.analyze(event).await;
        tracing::debug!(
            url = %event.url,
            group = %event.group,
            scripts = analysis.inventory.all_scripts.len(),
            issues = analysis.report.issues.len(),
            "capture analyzed"
        );

        self.session.record(
            &event.group,
            analysis.inventory.clone(),
            analysis.report.clone(),
        );

        bus.send(
            PAGE_SUMMARY_EVENT,
            serde_json::to_value(&analysis)?,
            MessageMeta {
                url: Some(event.url.clone()),
                group: Some(event.group.clone()),
            },
        )?;

        Ok(analysis)
    }

    /// Emit each group's full state once. Called at end of run.
    pub fn summarize<B: MessageBus>(&self, bus: &mut B) -> Result<()> {
        for (group, state) in self.session.summary().iter() {
            bus.send(
                RUN_SUMMARY_EVENT,
                serde_json::to_value(state)?,
                MessageMeta {
                    url: None,
                    group: Some(group.to_string()),
                },
            )?;
        }
        Ok(())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}
