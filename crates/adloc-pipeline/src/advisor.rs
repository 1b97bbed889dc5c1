//! Segment count suggestion.

use std::ops::RangeInclusive;

use adloc_models::AudienceProfile;

/// Whether the exposed count is the computed default or the user's pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountChoice {
    Default,
    UserOverridden(u32),
}

/// Suggests how many audience segments to generate for a profile set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterCountAdvisor {
    profile_count: usize,
    choice: CountChoice,
}

impl ClusterCountAdvisor {
    pub fn new(profile_count: usize) -> Self {
        Self {
            profile_count,
            choice: CountChoice::Default,
        }
    }

    pub fn for_profiles(profiles: &[AudienceProfile]) -> Self {
        Self::new(profiles.len())
    }

    /// `max(1, round(sqrt(n)))`.
    pub fn default_for(profile_count: usize) -> u32 {
        let suggested = (profile_count as f64).sqrt().round() as u32;
        suggested.max(1)
    }

    /// Bounds for any user-adjustable control: `1..=max(1, n)`.
    pub fn range(&self) -> RangeInclusive<u32> {
        let upper = u32::try_from(self.profile_count).unwrap_or(u32::MAX).max(1);
        1..=upper
    }

    pub fn profile_count(&self) -> usize {
        self.profile_count
    }

    pub fn choice(&self) -> CountChoice {
        self.choice
    }

    pub fn is_overridden(&self) -> bool {
        matches!(self.choice, CountChoice::UserOverridden(_))
    }

    /// The count to show and submit.
    pub fn value(&self) -> u32 {
        match self.choice {
            CountChoice::Default => Self::default_for(self.profile_count),
            CountChoice::UserOverridden(value) => value,
        }
    }

    /// A new profile set discards any manual choice.
    pub fn on_profiles_changed(&mut self, profile_count: usize) {
        self.profile_count = profile_count;
        self.choice = CountChoice::Default;
    }

    /// Record a manual adjustment, clamped into [`range`](Self::range).
    pub fn adjust(&mut self, value: u32) -> u32 {
        let range = self.range();
        let clamped = value.clamp(*range.start(), *range.end());
        self.choice = CountChoice::UserOverridden(clamped);
        clamped
    }
}
