//! Campaign console binary.
//!
//! Lists the signed-in user's campaigns with their pipeline stage. Optionally
//! imports a profile table (`ADLOC_PROFILES_CSV`) and uploads a master video
//! (`ADLOC_UPLOAD_VIDEO`).

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use adloc_client::{HttpCampaignService, MediaFile, StaticToken};
use adloc_models::UploadDetails;
use adloc_pipeline::{import_profiles, CampaignPipeline, ClusterCountAdvisor, PipelineConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env().add_directive("adloc=info".parse()?);

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting adloc-console");

    let config = PipelineConfig::from_env();
    info!("Pipeline config: {:?}", config);

    let service = HttpCampaignService::from_env(Arc::new(StaticToken::from_env()))
        .context("failed to create campaign service client")?;

    match service.health_check().await {
        Ok(health) => info!(ok = health.ok, "Campaign service reachable"),
        Err(e) => warn!("Campaign service health check failed: {}", e.user_message()),
    }

    let pipeline = CampaignPipeline::with_local_previews(Arc::new(service), config);

    let snapshot = pipeline.refresh().await;
    if snapshot.is_fallback {
        info!("Campaign service unavailable, listing demo campaigns");
    }
    for card in &snapshot.campaigns {
        info!(campaign_id = %card.id(), stage = %card.stage(), "{}", card.name());
    }

    let mut profiles_file = None;
    if let Ok(path) = std::env::var("ADLOC_PROFILES_CSV") {
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read profile table {}", path))?;
        let profiles = import_profiles(&text);
        let advisor = ClusterCountAdvisor::for_profiles(&profiles);
        let max_groups = *advisor.range().end();
        info!(
            profiles = profiles.len(),
            suggested_groups = advisor.value(),
            max_groups,
            "Imported audience profiles"
        );
        profiles_file = Some(read_media(&path)?);
    }

    if let Ok(path) = std::env::var("ADLOC_UPLOAD_VIDEO") {
        let video = read_media(&path)?;
        let details = UploadDetails {
            name: std::env::var("ADLOC_UPLOAD_NAME").ok(),
            product_desc: std::env::var("ADLOC_UPLOAD_PRODUCT").ok(),
            goal: std::env::var("ADLOC_UPLOAD_GOAL").ok(),
        };

        let ticket = match pipeline.begin_upload(video, profiles_file, details) {
            Ok(ticket) => ticket,
            Err(e) => {
                error!("Upload rejected: {}", e.user_message());
                return Err(e.into());
            }
        };
        info!(temp_id = %ticket.temp_id, "Upload started");

        match ticket.outcome().await {
            Ok(entity) => info!(campaign_id = %entity.id, "Upload confirmed"),
            Err(e) => {
                error!("Upload failed: {}", e.user_message());
                return Err(e.into());
            }
        }
    }

    info!("adloc-console finished");
    Ok(())
}

fn read_media(path: &str) -> anyhow::Result<MediaFile> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path))?;
    let file_name = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
        .to_string();
    Ok(MediaFile::new(file_name, bytes))
}
