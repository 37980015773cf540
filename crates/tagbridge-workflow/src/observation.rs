//! Tag observations collected during one inventory session.

use parking_lot::Mutex;
use tagbridge_core::TagObservation;

/// Latest observation per EPC, in arrival order of that latest report.
///
/// Written from the reader's callback thread and drained by the session's
/// timer task, so all access goes through a mutex. An upsert removes the
/// existing entry for the EPC and appends the new one: the newest RSSI wins
/// and the updated tag moves to the end.
///
/// # Examples
///
/// ```
/// use tagbridge_core::TagObservation;
/// use tagbridge_workflow::ObservationSet;
///
/// let set = ObservationSet::new();
/// set.upsert(TagObservation::new("1111", -40));
/// set.upsert(TagObservation::new("2222", -30));
/// set.upsert(TagObservation::new("1111", -45));
///
/// let tags = set.drain();
/// assert_eq!(tags.len(), 2);
/// assert_eq!(tags[1], TagObservation::new("1111", -45));
/// ```
#[derive(Debug, Default)]
pub struct ObservationSet {
    entries: Mutex<Vec<TagObservation>>,
}

impl ObservationSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the observation for `tag.epc`.
    pub fn upsert(&self, tag: TagObservation) {
        let mut entries = self.entries.lock();
        entries.retain(|existing| existing.epc != tag.epc);
        entries.push(tag);
    }

    /// Number of distinct tags seen.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Check if no tag has been seen.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Take every observation, leaving the set empty.
    ///
    /// Reports that land after this call start a new, unread list.
    pub fn drain(&self) -> Vec<TagObservation> {
        std::mem::take(&mut *self.entries.lock())
    }
}
