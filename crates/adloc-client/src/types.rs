//! Campaign service request/response types.

use std::path::Path;

use adloc_models::{CampaignEntity, CampaignId, CampaignMetadata, UploadDetails, Variant};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{ClientError, ClientResult};

/// A file picked by the user, held in memory until upload.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl MediaFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Lower-cased extension, if the name has one.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Multipart payload for campaign creation.
#[derive(Debug, Clone)]
pub struct CreateCampaignRequest {
    pub video: MediaFile,
    pub profiles: Option<MediaFile>,
    pub details: UploadDetails,
}

impl CreateCampaignRequest {
    pub fn new(video: MediaFile, profiles: Option<MediaFile>, details: UploadDetails) -> Self {
        Self {
            video,
            profiles,
            details,
        }
    }

    /// Reject what the service would reject, before any network call.
    pub fn validate(&self) -> ClientResult<()> {
        if self.video.is_empty() {
            return Err(ClientError::invalid_input("No file uploaded"));
        }

        if let Some(profiles) = &self.profiles {
            if let Some(ext) = profiles.extension() {
                if ext != "csv" {
                    return Err(ClientError::invalid_input("Profiles file must be a CSV"));
                }
            }
        }

        self.details
            .validate()
            .map_err(|e| ClientError::invalid_input(e.to_string()))
    }
}

/// Outcome of a generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    /// Variants to append to the campaign
    pub variants: Vec<Variant>,
    /// Authoritative metadata, replaces the local copy
    pub metadata: CampaignMetadata,
    /// Analysis reference, set if generation had to analyze first
    pub analysis_ref: Option<String>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    #[serde(default)]
    pub time: Option<String>,
}

// =============================================================================
// Wire envelopes
// =============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct ListCampaignsResponse {
    #[serde(default)]
    pub videos: Vec<CampaignEntity>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FetchCampaignResponse {
    pub video: CampaignEntity,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateCampaignResponse {
    pub video_id: CampaignId,
    #[serde(default)]
    pub name: Option<String>,
    pub original_url: String,
    #[serde(default)]
    pub analysis_url: Option<String>,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

impl CreateCampaignResponse {
    /// The service does not echo a timestamp; creation time is the moment
    /// the acknowledgment arrived.
    pub fn into_entity(self, created_at: DateTime<Utc>) -> CampaignEntity {
        CampaignEntity {
            id: self.video_id,
            name: self.name,
            original_media_ref: self.original_url,
            analysis_ref: self.analysis_url,
            created_at,
            variants: self.variants,
            metadata: None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateRequest {
    pub group_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub metadata: CampaignMetadata,
    #[serde(default)]
    pub analysis_url: Option<String>,
}

impl From<GenerateResponse> for GenerationResult {
    fn from(r: GenerateResponse) -> Self {
        Self {
            variants: r.variants,
            metadata: r.metadata,
            analysis_ref: r.analysis_url,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Acknowledgement {}
