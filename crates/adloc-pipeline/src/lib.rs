//! Client-side campaign pipeline.
//!
//! This crate provides:
//! - The campaign pipeline manager (listing, upload, generation, deletion)
//! - Profile table import and segment count suggestion
//! - Timeline correlation and embedding projection
//! - Demo campaigns for offline listings

pub mod advisor;
pub mod config;
pub mod deletion;
pub mod error;
pub mod importer;
pub mod logging;
pub mod manager;
pub mod metrics;
pub mod preview;
pub mod projector;
pub mod seed;
pub mod stage;
pub mod store;
pub mod timeline;

pub use advisor::{ClusterCountAdvisor, CountChoice};
pub use config::PipelineConfig;
pub use deletion::DeletionDialog;
pub use error::{PipelineError, PipelineResult};
pub use importer::{import_profiles, ProfileTableImporter};
pub use logging::CampaignLogger;
pub use manager::{CampaignPipeline, Reconciliation, UploadTicket};
pub use preview::{LocalPreviews, PreviewFactory, PreviewHandle};
pub use projector::{EmbeddingProjector, EmbeddingScatter, GroupColor, LegendEntry, ProjectedPoint, Viewport};
pub use stage::PipelineStage;
pub use store::{CampaignCard, CampaignSnapshot, ConfirmedCampaign, PendingCampaign};
pub use timeline::{MediaPlayer, PlaybackCursor, TimelineCorrelator, TimelineEntry, MISSING_CAPTION};
