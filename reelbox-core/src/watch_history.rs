//! Per-user watch history
//!
//! Tracks the last playback position the user reached in each video, plus a
//! recency timestamp so clients can resume the most recently watched item.
//!
//! ## Invariant
//!
//! A history holds at most one entry per video. The container enforces this
//! structurally: entries live in insertion order, and a `video_id -> slot`
//! index makes upsert and lookup constant-time. Updating an existing entry
//! rewrites position and timestamp in place and never moves the entry.
//!
//! At the storage boundary the history is a plain ordered JSON array, so the
//! persisted shape stays a simple embedded document.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// One watched-video record.
///
/// The `video_id` is a weak reference: when a video disappears from the
/// catalog, the reconciler removes every entry pointing at it, across all
/// users, so a stored entry always resolves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchEntry {
    /// Referenced catalog video
    pub video_id: Uuid,
    /// Last playback position in seconds (>= 0)
    pub last_position: f32,
    /// Client-supplied recency ordering key (epoch-like)
    pub timestamp: i64,
}

/// Ordered, keyed collection of [`WatchEntry`] values.
#[derive(Debug, Clone, Default)]
pub struct WatchHistory {
    entries: Vec<WatchEntry>,
    slots: HashMap<Uuid, usize>,
}

impl WatchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &WatchEntry> {
        self.entries.iter()
    }

    /// Look up the entry for a video.
    pub fn get(&self, video_id: &Uuid) -> Option<&WatchEntry> {
        self.slots.get(video_id).map(|&slot| &self.entries[slot])
    }

    /// Record progress for a video.
    ///
    /// An existing entry is overwritten in place, keeping its slot in the
    /// sequence; a new video is appended at the end.
    pub fn upsert(&mut self, video_id: Uuid, last_position: f32, timestamp: i64) {
        match self.slots.get(&video_id) {
            Some(&slot) => {
                let entry = &mut self.entries[slot];
                entry.last_position = last_position;
                entry.timestamp = timestamp;
            }
            None => {
                self.slots.insert(video_id, self.entries.len());
                self.entries.push(WatchEntry {
                    video_id,
                    last_position,
                    timestamp,
                });
            }
        }
    }

    /// The entry with the greatest timestamp, or `None` for an empty
    /// history. Equal timestamps resolve to the earliest slot, so the result
    /// is stable across calls.
    pub fn most_recent(&self) -> Option<&WatchEntry> {
        self.entries
            .iter()
            .reduce(|best, entry| if entry.timestamp > best.timestamp { entry } else { best })
    }

    /// Drop every entry referencing one of `video_ids`. Used by the
    /// reconciler's cascade when catalog records are deleted.
    pub fn remove_videos(&mut self, video_ids: &HashSet<Uuid>) {
        if self.entries.iter().any(|e| video_ids.contains(&e.video_id)) {
            self.entries.retain(|e| !video_ids.contains(&e.video_id));
            self.reindex();
        }
    }

    fn reindex(&mut self) {
        self.slots = self
            .entries
            .iter()
            .enumerate()
            .map(|(slot, entry)| (entry.video_id, slot))
            .collect();
    }
}

impl Serialize for WatchHistory {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.entries.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for WatchHistory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Vec::<WatchEntry>::deserialize(deserializer)?;

        // A stored duplicate would break the one-entry-per-video invariant;
        // keep the first occurrence.
        let mut history = WatchHistory::new();
        for entry in raw {
            if !history.slots.contains_key(&entry.video_id) {
                history.slots.insert(entry.video_id, history.entries.len());
                history.entries.push(entry);
            }
        }

        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    #[test]
    fn test_upsert_appends_new_entry() {
        let mut history = WatchHistory::new();
        history.upsert(id(1), 10.0, 5);
        history.upsert(id(2), 20.0, 6);

        assert_eq!(history.len(), 2);
        let order: Vec<Uuid> = history.iter().map(|e| e.video_id).collect();
        assert_eq!(order, vec![id(1), id(2)]);
    }

    #[test]
    fn test_upsert_existing_updates_in_place() {
        let mut history = WatchHistory::new();
        history.upsert(id(1), 10.0, 5);
        history.upsert(id(2), 20.0, 6);

        // Same slot, updated values.
        history.upsert(id(1), 50.0, 20);

        assert_eq!(history.len(), 2);
        let first = history.iter().next().unwrap();
        assert_eq!(first.video_id, id(1));
        assert_eq!(first.last_position, 50.0);
        assert_eq!(first.timestamp, 20);
    }

    #[test]
    fn test_at_most_one_entry_per_video() {
        let mut history = WatchHistory::new();
        for ts in 0..10 {
            history.upsert(id(1), ts as f32, ts);
        }
        assert_eq!(history.len(), 1);
        assert_eq!(history.get(&id(1)).unwrap().timestamp, 9);
    }

    #[test]
    fn test_most_recent_empty_is_none() {
        assert!(WatchHistory::new().most_recent().is_none());
    }

    #[test]
    fn test_most_recent_picks_max_timestamp() {
        let mut history = WatchHistory::new();
        history.upsert(id(1), 10.0, 5);
        history.upsert(id(2), 20.0, 42);
        history.upsert(id(3), 30.0, 7);

        assert_eq!(history.most_recent().unwrap().video_id, id(2));
    }

    #[test]
    fn test_most_recent_tie_breaks_to_earliest_slot() {
        let mut history = WatchHistory::new();
        history.upsert(id(1), 10.0, 7);
        history.upsert(id(2), 20.0, 7);

        assert_eq!(history.most_recent().unwrap().video_id, id(1));
    }

    #[test]
    fn test_remove_videos_cascade() {
        let mut history = WatchHistory::new();
        history.upsert(id(1), 10.0, 1);
        history.upsert(id(2), 20.0, 2);
        history.upsert(id(3), 30.0, 3);

        let gone: HashSet<Uuid> = [id(1), id(3)].into_iter().collect();
        history.remove_videos(&gone);

        assert_eq!(history.len(), 1);
        assert!(history.get(&id(1)).is_none());
        assert!(history.get(&id(3)).is_none());

        // Lookups still work after the rebuild.
        assert_eq!(history.get(&id(2)).unwrap().last_position, 20.0);
        history.upsert(id(4), 40.0, 4);
        assert_eq!(history.get(&id(4)).unwrap().timestamp, 4);
    }

    #[test]
    fn test_serializes_as_ordered_array() {
        let mut history = WatchHistory::new();
        history.upsert(id(1), 10.0, 5);
        history.upsert(id(2), 20.0, 6);

        let json = serde_json::to_value(&history).unwrap();
        let array = json.as_array().unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array[0]["video_id"], id(1).to_string());
        assert_eq!(array[1]["last_position"], 20.0);
    }

    #[test]
    fn test_deserialize_drops_duplicates_keeping_first() {
        let json = serde_json::json!([
            { "video_id": id(1), "last_position": 10.0, "timestamp": 5 },
            { "video_id": id(2), "last_position": 20.0, "timestamp": 6 },
            { "video_id": id(1), "last_position": 99.0, "timestamp": 99 },
        ]);

        let history: WatchHistory = serde_json::from_value(json).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history.get(&id(1)).unwrap().last_position, 10.0);
    }
}
