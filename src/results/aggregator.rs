//! Deduplicating, ordered collection of link records

use crate::state::LinkRecord;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Inner {
    records: Vec<LinkRecord>,
    index: HashSet<(String, String)>,
}

/// Thread-safe collector of link records
///
/// The first record for a `(source_page, link_url)` pair wins; later ones
/// are dropped. Snapshots are always sorted by severity descending, then
/// by `(source_page, link_url)`, so the output does not depend on the
/// order in which concurrent checks completed.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    inner: Mutex<Inner>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record
    ///
    /// Returns false if a record with the same key was already present.
    pub fn record(&self, record: LinkRecord) -> bool {
        let mut inner = self.lock();

        let key = (record.source_page.clone(), record.link_url.clone());
        if !inner.index.insert(key) {
            tracing::trace!(
                "Duplicate record for {} on {} dropped",
                record.link_url,
                record.source_page
            );
            return false;
        }

        inner.records.push(record);
        true
    }

    /// Returns true if a record exists for the pair
    pub fn contains(&self, source_page: &str, link_url: &str) -> bool {
        self.lock()
            .index
            .contains(&(source_page.to_string(), link_url.to_string()))
    }

    /// Returns every record in report order
    pub fn snapshot(&self) -> Vec<LinkRecord> {
        let mut records = self.lock().records.clone();
        records.sort_by(LinkRecord::report_order);
        records
    }

    /// Returns only the broken records, in report order
    pub fn broken(&self) -> Vec<LinkRecord> {
        let mut records: Vec<_> = self
            .lock()
            .records
            .iter()
            .filter(|r| r.is_broken())
            .cloned()
            .collect();
        records.sort_by(LinkRecord::report_order);
        records
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().records.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic while holding the lock cannot leave the record list half-written
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
