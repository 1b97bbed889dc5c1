//! Pipeline configuration.

/// Campaign pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Substitute demo campaigns when the first listing cannot reach the service
    pub fallback_seed: bool,
    /// Side of the square embedding viewport, in pixels
    pub viewport_size: f64,
    /// Padding inside the embedding viewport, in pixels
    pub viewport_inset: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fallback_seed: true,
            viewport_size: 320.0,
            viewport_inset: 16.0,
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            fallback_seed: std::env::var("ADLOC_FALLBACK_SEED")
                .map(|v| !matches!(v.to_lowercase().as_str(), "0" | "false" | "off" | "no"))
                .unwrap_or(true),
            viewport_size: std::env::var("ADLOC_VIEWPORT_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|v: &f64| v.is_finite() && *v > 0.0)
                .unwrap_or(320.0),
            viewport_inset: std::env::var("ADLOC_VIEWPORT_INSET")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|v: &f64| v.is_finite() && *v >= 0.0)
                .unwrap_or(16.0),
        }
    }

    pub fn without_fallback(mut self) -> Self {
        self.fallback_seed = false;
        self
    }
}
