//! Client for the remote campaign service.
//!
//! The service owns transcoding, clustering, research and planning. This
//! crate only speaks its HTTP surface:
//! - `CampaignService` trait, the seam the pipeline depends on
//! - `HttpCampaignService`, the reqwest implementation
//! - Error taxonomy with human-readable message extraction
//! - Request metrics

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod service;
pub mod types;


pub use auth::{StaticToken, TokenSource};
pub use client::HttpCampaignService;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use service::CampaignService;
pub use types::{CreateCampaignRequest, GenerationResult, HealthResponse, MediaFile};
