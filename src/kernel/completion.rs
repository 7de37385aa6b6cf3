//! Completion model over the DCD daemon client.
//!
//! Keeps a flat ordered candidate list and presents it as the two-level
//! tree hosts expect: one synthetic group header row, then one leaf per
//! candidate. The list is fully replaced on every request, never merged.

use crate::kernel::services::adapters::DcdService;
use crate::kernel::services::ports::{
    Candidate, CompletionModel, InvocationKind, NodeRef, QueryRange,
};
use crate::models::Document;
use compact_str::CompactString;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Automatic invocations below this query width never reach the daemon.
const AUTO_TRIGGER_MIN_WIDTH: usize = 3;

/// Display title of the synthetic group header row.
pub const GROUP_TITLE: &str = "DCD Completion";

/// The completion model a host registers once and shares across its views.
pub struct DcdCompletion {
    service: Arc<DcdService>,
    candidates: Mutex<Vec<Candidate>>,
    generation: AtomicU64,
}

impl DcdCompletion {
    pub fn new(service: Arc<DcdService>) -> Self {
        Self {
            service,
            candidates: Mutex::new(Vec::new()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn service(&self) -> &Arc<DcdService> {
        &self.service
    }

    /// Snapshot of the current candidate list, in daemon output order.
    pub fn candidates(&self) -> Vec<Candidate> {
        self.lock_candidates().clone()
    }

    fn lock_candidates(&self) -> MutexGuard<'_, Vec<Candidate>> {
        match self.candidates.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn replace(&self, candidates: Vec<Candidate>) {
        *self.lock_candidates() = candidates;
    }

    fn refresh(&self, document: &Document, range: QueryRange) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.replace(Vec::new());

        let end = range.end;
        let byte_offset = document.buffer().byte_offset(end.line, end.column);
        let result = self.service.query_completions(byte_offset, document.path());

        // A newer request may have started on another view while this one
        // was blocked on the child; the newest request wins.
        if self.generation.load(Ordering::SeqCst) != generation {
            return;
        }

        match result {
            Ok(candidates) => self.replace(candidates),
            Err(e) => {
                // Interactive hosts show an empty popup on failure.
                tracing::warn!(error = %e, "completion query failed");
            }
        }
    }
}

impl CompletionModel for DcdCompletion {
    fn invoked(&self, document: &Document, range: QueryRange, kind: InvocationKind) {
        if kind == InvocationKind::Automatic && range.column_width() < AUTO_TRIGGER_MIN_WIDTH {
            self.replace(Vec::new());
            return;
        }

        self.refresh(document, range);
    }

    fn row_count(&self, node: NodeRef) -> usize {
        let candidates = self.lock_candidates();
        match node {
            NodeRef::Root => {
                if candidates.is_empty() {
                    0
                } else {
                    1
                }
            }
            NodeRef::Header => candidates.len(),
            NodeRef::Leaf(_) => 0,
        }
    }

    fn parent(&self, node: NodeRef) -> Option<NodeRef> {
        match node {
            NodeRef::Root => None,
            NodeRef::Header => Some(NodeRef::Root),
            NodeRef::Leaf(_) => Some(NodeRef::Header),
        }
    }

    fn label(&self, node: NodeRef) -> Option<CompactString> {
        match node {
            NodeRef::Root => None,
            NodeRef::Header => Some(CompactString::from(GROUP_TITLE)),
            NodeRef::Leaf(index) => self
                .lock_candidates()
                .get(index)
                .map(|candidate| candidate.label.clone()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/completion.rs"]
mod tests;
