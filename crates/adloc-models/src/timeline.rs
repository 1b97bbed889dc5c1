//! Analysis timeline models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors building a timeline event by hand.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimelineError {
    #[error("event span must be increasing: t_start={start} t_end={end}")]
    EmptySpan { start: f64, end: f64 },

    #[error("event bounds must be finite")]
    NonFinite,
}

/// A narrative span of the master video.
///
/// The caption text is never stored here; it is joined from the caption
/// table when the timeline is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TimelineEvent {
    pub t_start: f64,
    pub t_end: f64,
    pub caption_id: String,
}

impl TimelineEvent {
    pub fn new(t_start: f64, t_end: f64, caption_id: impl Into<String>) -> Result<Self, TimelineError> {
        let event = Self {
            t_start,
            t_end,
            caption_id: caption_id.into(),
        };
        event.check()?;
        Ok(event)
    }

    /// Verify `t_start < t_end` with finite bounds.
    pub fn check(&self) -> Result<(), TimelineError> {
        if !self.t_start.is_finite() || !self.t_end.is_finite() {
            return Err(TimelineError::NonFinite);
        }
        if self.t_start >= self.t_end {
            return Err(TimelineError::EmptySpan {
                start: self.t_start,
                end: self.t_end,
            });
        }
        Ok(())
    }

    /// Half-open containment: `t_start <= t < t_end`.
    pub fn contains(&self, t: f64) -> bool {
        self.t_start <= t && t < self.t_end
    }

    pub fn duration(&self) -> f64 {
        self.t_end - self.t_start
    }
}

/// One entry of the caption table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Caption {
    pub id: String,
    pub caption: String,
}

/// Analysis payload fetched through a campaign's analysis reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisPayload {
    #[serde(default)]
    pub events: Vec<TimelineEvent>,

    #[serde(default)]
    pub captions: Vec<Caption>,
}
