//! Demo campaigns shown when the campaign service cannot be reached.

use adloc_models::{
    AnalysisPayload, Caption, CampaignEntity, CampaignId, CampaignMetadata, TimelineEvent, Variant,
};
use chrono::{DateTime, Utc};

struct SeedCampaign {
    id: &'static str,
    name: &'static str,
    created_at: i64,
    speed: f64,
    combos: [&'static str; 2],
    captions: [(&'static str, &'static str); 4],
    events: [(f64, f64, &'static str); 4],
}

const SEEDS: [SeedCampaign; 3] = [
    SeedCampaign {
        id: "demo-coffee-roast",
        name: "Coffee roast drop",
        created_at: 1_771_063_200,
        speed: 1.08,
        combos: ["hook_caption", "cinematic_grain"],
        captions: [
            ("hook", "Cold open: beans hit the grinder."),
            ("benefit", "Bright aroma, instant wake-up."),
            ("social", "Barista pour with foam art."),
            ("cta", "Limited roast drop this week."),
        ],
        events: [
            (0.0, 3.0, "hook"),
            (3.0, 7.0, "benefit"),
            (7.0, 11.0, "social"),
            (11.0, 15.0, "cta"),
        ],
    },
    SeedCampaign {
        id: "demo-trailmix",
        name: "TrailMix Pro",
        created_at: 1_770_976_800,
        speed: 1.04,
        combos: ["vertical_focus", "cutdown_fast"],
        captions: [
            ("hook", "Runner hits a sunrise trail."),
            ("product", "Close-up: TrailMix Pro pack."),
            ("benefit", "20g protein, zero crash."),
            ("cta", "Shop the endurance bundle."),
        ],
        events: [
            (0.0, 4.0, "hook"),
            (4.0, 7.0, "product"),
            (7.0, 12.0, "benefit"),
            (12.0, 16.0, "cta"),
        ],
    },
    SeedCampaign {
        id: "demo-skincare",
        name: "Glow kit",
        created_at: 1_770_890_400,
        speed: 1.06,
        combos: ["focus_backdrop", "hook_caption"],
        captions: [
            ("hook", "Before/after skincare glow."),
            ("texture", "Serum texture on glass."),
            ("routine", "Night routine in three steps."),
            ("cta", "Glow kit ships today."),
        ],
        events: [
            (0.0, 3.0, "hook"),
            (3.0, 7.0, "texture"),
            (7.0, 12.0, "routine"),
            (12.0, 16.0, "cta"),
        ],
    },
];

impl SeedCampaign {
    fn entity(&self) -> CampaignEntity {
        let mut variants = vec![Variant::new(
            "speed_up",
            format!("/media/processed/{}-speed.mp4", self.id),
        )];
        variants.extend(self.combos.iter().map(|combo| {
            Variant::new(*combo, format!("/media/processed/{}-{}.mp4", self.id, combo))
        }));

        CampaignEntity {
            id: CampaignId::from(self.id),
            name: Some(self.name.to_string()),
            original_media_ref: format!("/media/original/{}.mp4", self.id),
            analysis_ref: Some(format!("/media/analysis/{}.json", self.id)),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            variants,
            metadata: Some(CampaignMetadata {
                speed_factor: Some(self.speed),
                combos: self.combos.iter().map(|c| c.to_string()).collect(),
                ..Default::default()
            }),
        }
    }

    fn analysis(&self) -> AnalysisPayload {
        AnalysisPayload {
            events: self
                .events
                .iter()
                .map(|(t_start, t_end, caption_id)| TimelineEvent {
                    t_start: *t_start,
                    t_end: *t_end,
                    caption_id: caption_id.to_string(),
                })
                .collect(),
            captions: self
                .captions
                .iter()
                .map(|(id, caption)| Caption {
                    id: id.to_string(),
                    caption: caption.to_string(),
                })
                .collect(),
        }
    }
}

/// The demo set, most recent first.
pub fn seed_campaigns() -> Vec<CampaignEntity> {
    SEEDS.iter().map(SeedCampaign::entity).collect()
}

/// Analysis for a demo campaign.
pub fn seed_analysis(id: &CampaignId) -> Option<AnalysisPayload> {
    SEEDS
        .iter()
        .find(|seed| seed.id == id.as_str())
        .map(SeedCampaign::analysis)
}

pub fn is_seed(id: &CampaignId) -> bool {
    SEEDS.iter().any(|seed| seed.id == id.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::TimelineCorrelator;

    #[test]
    fn test_seed_set() {
        let campaigns = seed_campaigns();
        assert_eq!(campaigns.len(), 3);
        assert!(campaigns.windows(2).all(|w| w[0].created_at > w[1].created_at));

        let coffee = &campaigns[0];
        assert_eq!(coffee.variants.len(), 3);
        assert_eq!(coffee.variants[0].name, "speed_up");
        assert_eq!(coffee.variants[1].media_ref, "/media/processed/demo-coffee-roast-hook_caption.mp4");
        assert_eq!(coffee.metadata.as_ref().and_then(|m| m.speed_factor), Some(1.08));
    }

    #[test]
    fn test_seed_analysis_resolves_every_caption() {
        for campaign in seed_campaigns() {
            assert!(is_seed(&campaign.id));
            let payload = seed_analysis(&campaign.id).unwrap();
            let timeline = TimelineCorrelator::from_payload(&payload);
            assert_eq!(timeline.len(), 4);
            assert!(timeline.entries().iter().all(|e| e.resolved));
        }
        assert!(seed_analysis(&CampaignId::from("abc")).is_none());
    }
}
