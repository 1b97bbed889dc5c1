//! Narrative timeline correlation.
//!
//! Joins analysis events with their captions and answers which event is
//! active at a playback position. Entries are kept in the order the analysis
//! listed them; when spans overlap the earliest-listed entry wins.

use std::collections::HashMap;

use adloc_models::{AnalysisPayload, TimelineEvent};
use tracing::debug;

/// Shown for events whose caption id has no entry in the caption table.
pub const MISSING_CAPTION: &str = "Caption unavailable";

/// An event with its caption text joined in.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEntry {
    pub t_start: f64,
    pub t_end: f64,
    pub caption_id: String,
    pub caption: String,
    /// False when `caption` is the placeholder
    pub resolved: bool,
}

impl TimelineEntry {
    pub fn contains(&self, t: f64) -> bool {
        self.t_start <= t && t < self.t_end
    }
}

/// Side effects on the external media player.
pub trait MediaPlayer {
    fn seek(&mut self, t: f64);
    fn play(&mut self);
}

#[derive(Debug, Clone, Default)]
pub struct TimelineCorrelator {
    entries: Vec<TimelineEntry>,
}

impl TimelineCorrelator {
    pub fn new(events: &[TimelineEvent], captions: &HashMap<String, String>) -> Self {
        let entries = events
            .iter()
            .filter(|event| match event.check() {
                Ok(()) => true,
                Err(e) => {
                    debug!(caption_id = %event.caption_id, "Dropping timeline event: {}", e);
                    false
                }
            })
            .map(|event| {
                let caption = captions.get(&event.caption_id);
                TimelineEntry {
                    t_start: event.t_start,
                    t_end: event.t_end,
                    caption_id: event.caption_id.clone(),
                    caption: caption.cloned().unwrap_or_else(|| MISSING_CAPTION.to_string()),
                    resolved: caption.is_some(),
                }
            })
            .collect();

        Self { entries }
    }

    pub fn from_payload(payload: &AnalysisPayload) -> Self {
        let captions: HashMap<String, String> = payload
            .captions
            .iter()
            .map(|c| (c.id.clone(), c.caption.clone()))
            .collect();
        Self::new(&payload.events, &captions)
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the event covering `t`, if any.
    pub fn active_index(&self, t: f64) -> Option<usize> {
        self.entries.iter().position(|entry| entry.contains(t))
    }

    pub fn active_at(&self, t: f64) -> Option<&TimelineEntry> {
        self.active_index(t).map(|i| &self.entries[i])
    }

    /// Jump the player to an event and resume playback.
    ///
    /// Returns the new position, or `None` when `index` is out of range (the
    /// player is left untouched).
    pub fn seek_to(&self, index: usize, player: &mut dyn MediaPlayer) -> Option<f64> {
        let entry = self.entries.get(index)?;
        player.seek(entry.t_start);
        player.play();
        Some(entry.t_start)
    }
}

/// Remembers the active event between time updates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackCursor {
    last: Option<usize>,
}

impl PlaybackCursor {
    pub fn active(&self) -> Option<usize> {
        self.last
    }

    /// Feed a new playback position; returns true when the highlight changed.
    pub fn update(&mut self, timeline: &TimelineCorrelator, t: f64) -> bool {
        let current = timeline.active_index(t);
        let changed = current != self.last;
        self.last = current;
        changed
    }
}
