//! 2D R-tree index over marker positions.
//!
//! Records are `(lat, lng, marker)` triples. The tree is keyed by position, so
//! an identity side table maps each marker to the exact record it was indexed
//! under; removing a marker rebuilds that record and lets the R-tree locate it
//! by envelope instead of scanning every entry.

use crate::bounds::QueryRect;
use crate::marker::MarkerId;
use markercluster_types::point::LatLng;
use rstar::{AABB, RTree, RTreeObject};
use rustc_hash::FxHashMap;

/// Below this many records a load inserts one by one instead of rebuilding.
const BULK_LOAD_THRESHOLD: usize = 9;

/// One indexed marker position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexRecord {
    pub lat: f64,
    pub lng: f64,
    pub marker: MarkerId,
}

impl IndexRecord {
    pub fn new(lat: f64, lng: f64, marker: MarkerId) -> Self {
        Self { lat, lng, marker }
    }

    pub fn from_position(position: LatLng, marker: MarkerId) -> Self {
        Self::new(position.lat(), position.lng(), marker)
    }

    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }

    fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl RTreeObject for IndexRecord {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.lng, self.lat])
    }
}

/// Spatial index of marker positions.
#[derive(Debug)]
pub struct MarkerIndex {
    tree: RTree<IndexRecord>,
    records: FxHashMap<MarkerId, IndexRecord>,
}

impl MarkerIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self {
            tree: RTree::new(),
            records: FxHashMap::default(),
        }
    }

    /// Bulk-insert records.
    ///
    /// Small batches are inserted one at a time; larger ones rebuild the tree
    /// with a bulk load over the existing and new records. Duplicates are not
    /// detected, so callers must not load the same record twice.
    pub fn load(&mut self, records: Vec<IndexRecord>) {
        let (records, rejected): (Vec<_>, Vec<_>) =
            records.into_iter().partition(IndexRecord::is_finite);
        if !rejected.is_empty() {
            log::warn!(
                "Skipping {} index records with non-finite coordinates",
                rejected.len()
            );
        }

        if records.len() < BULK_LOAD_THRESHOLD {
            for record in records {
                self.records.insert(record.marker, record);
                self.tree.insert(record);
            }
            return;
        }

        for record in &records {
            self.records.insert(record.marker, *record);
        }

        let mut all: Vec<IndexRecord> = self.tree.iter().copied().collect();
        all.extend(records);
        log::trace!("Bulk loading marker index with {} records", all.len());
        self.tree = RTree::bulk_load(all);
    }

    /// Insert one record. Records with non-finite coordinates are rejected.
    pub fn insert(&mut self, record: IndexRecord) -> bool {
        if !record.is_finite() {
            log::warn!(
                "Rejecting index record for {} with non-finite coordinates",
                record.marker
            );
            return false;
        }
        self.records.insert(record.marker, record);
        self.tree.insert(record);
        true
    }

    /// Remove the record structurally equal to `record`.
    ///
    /// Returns `false` when no such record is indexed.
    pub fn remove(&mut self, record: &IndexRecord) -> bool {
        let removed = self.tree.remove(record).is_some();
        if removed && self.records.get(&record.marker) == Some(record) {
            self.records.remove(&record.marker);
        }
        removed
    }

    /// Remove whatever record `marker` was indexed under.
    pub fn remove_marker(&mut self, marker: MarkerId) -> bool {
        match self.records.remove(&marker) {
            Some(record) => self.tree.remove(&record).is_some(),
            None => false,
        }
    }

    /// The record `marker` is currently indexed under.
    pub fn record(&self, marker: MarkerId) -> Option<&IndexRecord> {
        self.records.get(&marker)
    }

    /// All records whose position lies within the closed rectangle.
    pub fn search(&self, rect: &QueryRect) -> Vec<IndexRecord> {
        if !rect.is_finite() {
            log::warn!("Rejecting marker index query with non-finite coordinates");
            return Vec::new();
        }

        let rect = rect.normalized();
        let envelope = AABB::from_corners([rect.min_lng, rect.min_lat], [rect.max_lng, rect.max_lat]);
        self.tree
            .locate_in_envelope(&envelope)
            .copied()
            .collect()
    }

    /// Every indexed record, in no particular order.
    pub fn all(&self) -> impl Iterator<Item = &IndexRecord> {
        self.tree.iter()
    }

    /// Drop all records.
    pub fn clear(&mut self) {
        self.tree = RTree::new();
        self.records.clear();
    }

    /// Get the number of indexed records.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for MarkerIndex {
    fn default() -> Self {
        Self::new()
    }
}
