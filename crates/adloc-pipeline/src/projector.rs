//! Embedding scatter projection and segment colors.

use std::collections::BTreeMap;
use std::fmt;

use adloc_models::{EmbeddingSource, EmbeddingsPayload};
use serde::Serialize;

use crate::config::PipelineConfig;

/// Hue rotation between consecutive group ids.
pub const HUE_STEP: i64 = 67;
const SATURATION: u8 = 70;
const LIGHTNESS: u8 = 55;

/// Color of one audience segment, a pure function of its group id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GroupColor {
    pub hue: u16,
    pub saturation: u8,
    pub lightness: u8,
}

impl GroupColor {
    pub fn for_group(group_id: i64) -> Self {
        let hue = group_id.wrapping_mul(HUE_STEP).rem_euclid(360) as u16;
        Self {
            hue,
            saturation: SATURATION,
            lightness: LIGHTNESS,
        }
    }

    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for GroupColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({}, {}%, {}%)", self.hue, self.saturation, self.lightness)
    }
}

/// Padded square drawing area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub size: f64,
    pub inset: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            size: 320.0,
            inset: 16.0,
        }
    }
}

impl Viewport {
    pub fn new(size: f64, inset: f64) -> Self {
        Self { size, inset }
    }

    /// Usable side length, `S - 2p`, never negative.
    pub fn inner(&self) -> f64 {
        (self.size - 2.0 * self.inset).max(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedPoint {
    pub index: u32,
    pub group_id: i64,
    pub cx: f64,
    pub cy: f64,
    pub color: GroupColor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    pub group_id: i64,
    pub color: GroupColor,
    pub count: usize,
}

/// Projected points plus a per-group legend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingScatter {
    pub points: Vec<ProjectedPoint>,
    pub legend: Vec<LegendEntry>,
    pub source: Option<EmbeddingSource>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddingProjector {
    viewport: Viewport,
}

impl EmbeddingProjector {
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(Viewport::new(config.viewport_size, config.viewport_inset))
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Map a normalized coordinate pair into the viewport, flipping y.
    pub fn position(&self, x: f64, y: f64) -> (f64, f64) {
        let inner = self.viewport.inner();
        let p = self.viewport.inset;
        (p + unit(x) * inner, p + (1.0 - unit(y)) * inner)
    }

    /// Project every point, ordered by profile index.
    pub fn project(&self, payload: &EmbeddingsPayload) -> Vec<ProjectedPoint> {
        let mut points: Vec<ProjectedPoint> = payload
            .points
            .iter()
            .map(|point| {
                let (cx, cy) = self.position(point.x, point.y);
                ProjectedPoint {
                    index: point.index,
                    group_id: point.group_id,
                    cx,
                    cy,
                    color: GroupColor::for_group(point.group_id),
                    summary: point.summary.clone(),
                }
            })
            .collect();
        points.sort_by_key(|p| p.index);
        points
    }

    pub fn scatter(&self, payload: &EmbeddingsPayload) -> EmbeddingScatter {
        let points = self.project(payload);

        let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
        for point in &points {
            *counts.entry(point.group_id).or_default() += 1;
        }
        let legend = counts
            .into_iter()
            .map(|(group_id, count)| LegendEntry {
                group_id,
                color: GroupColor::for_group(group_id),
                count,
            })
            .collect();

        EmbeddingScatter {
            points,
            legend,
            source: payload.source,
        }
    }
}

fn unit(v: f64) -> f64 {
    if v.is_nan() {
        0.5
    } else {
        v.clamp(0.0, 1.0)
    }
}
