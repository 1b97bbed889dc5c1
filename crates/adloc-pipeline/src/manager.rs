//! Campaign pipeline manager.
//!
//! Owns the campaign list and mediates every user action against the
//! campaign service. Observers read snapshots; each mutation publishes one.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use adloc_client::{CampaignService, CreateCampaignRequest, MediaFile};
use adloc_models::{CampaignEntity, CampaignId, GroupVariant, UploadDetails};
use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::deletion::DeletionDialog;
use crate::error::{PipelineError, PipelineResult};
use crate::logging::CampaignLogger;
use crate::metrics;
use crate::preview::{LocalPreviews, PreviewFactory, PreviewHandle};
use crate::projector::{EmbeddingProjector, EmbeddingScatter, GroupColor};
use crate::seed;
use crate::stage::PipelineStage;
use crate::store::{CampaignSnapshot, CampaignStore, PendingSlot, Slot};
use crate::timeline::TimelineCorrelator;

/// What happened to an async result when it arrived.
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciliation {
    /// Merged into the list; carries the updated campaign
    Applied(CampaignEntity),
    /// The campaign was deleted while the request was in flight
    Discarded,
}

impl Reconciliation {
    /// Updated campaign, if the result was applied.
    pub fn entity(&self) -> Option<&CampaignEntity> {
        match self {
            Reconciliation::Applied(entity) => Some(entity),
            Reconciliation::Discarded => None,
        }
    }
}

/// An upload in flight.
#[derive(Debug)]
pub struct UploadTicket {
    pub temp_id: CampaignId,
    task: JoinHandle<PipelineResult<CampaignEntity>>,
}

impl UploadTicket {
    /// Wait for the server to confirm or reject the upload.
    pub async fn outcome(self) -> PipelineResult<CampaignEntity> {
        self.task
            .await
            .map_err(|e| PipelineError::TaskFailed(e.to_string()))?
    }
}

struct Shared {
    service: Arc<dyn CampaignService>,
    previews: Arc<dyn PreviewFactory>,
    store: Mutex<CampaignStore>,
    snapshots: watch::Sender<CampaignSnapshot>,
    config: PipelineConfig,
    projector: EmbeddingProjector,
}

/// Single source of truth for the campaign list.
#[derive(Clone)]
pub struct CampaignPipeline {
    shared: Arc<Shared>,
}

impl CampaignPipeline {
    /// Create a pipeline over a campaign service and preview factory.
    pub fn new(
        service: Arc<dyn CampaignService>,
        previews: Arc<dyn PreviewFactory>,
        config: PipelineConfig,
    ) -> Self {
        let (snapshots, _) = watch::channel(CampaignSnapshot::default());
        let projector = EmbeddingProjector::from_config(&config);
        Self {
            shared: Arc::new(Shared {
                service,
                previews,
                store: Mutex::new(CampaignStore::default()),
                snapshots,
                config,
                projector,
            }),
        }
    }

    /// Pipeline with in-process previews.
    pub fn with_local_previews(service: Arc<dyn CampaignService>, config: PipelineConfig) -> Self {
        Self::new(service, Arc::new(LocalPreviews::new()), config)
    }

    /// Get the pipeline configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.shared.config
    }

    /// Projector used by [`load_embeddings`](Self::load_embeddings).
    pub fn projector(&self) -> EmbeddingProjector {
        self.shared.projector
    }

    fn lock(&self) -> MutexGuard<'_, CampaignStore> {
        self.shared.store.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run one mutation and publish the resulting snapshot.
    fn mutate<R>(&self, f: impl FnOnce(&mut CampaignStore) -> R) -> R {
        let mut store = self.lock();
        store.bump();
        let out = f(&mut store);
        self.shared.snapshots.send_replace(store.snapshot());
        out
    }

    /// Publish a change made under an already held lock.
    fn publish(&self, store: &mut CampaignStore) {
        store.bump();
        self.shared.snapshots.send_replace(store.snapshot());
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Latest published snapshot.
    pub fn snapshot(&self) -> CampaignSnapshot {
        self.shared.snapshots.borrow().clone()
    }

    /// Receive every snapshot published from now on.
    pub fn subscribe(&self) -> watch::Receiver<CampaignSnapshot> {
        self.shared.snapshots.subscribe()
    }

    /// Pipeline stage of a campaign or placeholder.
    pub fn stage(&self, id: &CampaignId) -> Option<PipelineStage> {
        self.snapshot().get(id).map(|card| card.stage())
    }

    /// One segment of a campaign, shared by every panel that shows it.
    pub fn group_variant(&self, campaign_id: &CampaignId, group_id: i64) -> Option<GroupVariant> {
        self.lock()
            .confirmed(campaign_id)
            .and_then(|entity| entity.group_variant(group_id))
            .cloned()
    }

    /// Display color shared by every view of a segment.
    pub fn group_color(group_id: i64) -> GroupColor {
        GroupColor::for_group(group_id)
    }

    fn require_confirmed(&self, id: &CampaignId) -> PipelineResult<CampaignEntity> {
        match self.lock().find(id) {
            Some(Slot::Confirmed(c)) => Ok(c.entity.clone()),
            Some(Slot::Pending(_)) => Err(PipelineError::CampaignPending(id.clone())),
            None => Err(PipelineError::CampaignNotFound(id.clone())),
        }
    }

    // =========================================================================
    // Listing
    // =========================================================================

    /// Current list, without waiting. A refresh runs in the background when
    /// called from inside a tokio runtime.
    pub fn list_campaigns(&self) -> CampaignSnapshot {
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let pipeline = self.clone();
            handle.spawn(async move {
                pipeline.refresh().await;
            });
        }
        self.snapshot()
    }

    /// Reload the list from the service.
    ///
    /// Never fails: an unreachable service leaves the list as is, or fills an
    /// empty list with the demo set when fallback is enabled.
    pub async fn refresh(&self) -> CampaignSnapshot {
        let since = self.lock().revision();
        let start = Instant::now();

        match self.shared.service.list_campaigns().await {
            Ok(listing) => {
                let count = listing.len();
                self.mutate(|store| store.merge_listing(listing, since));
                debug!(
                    count,
                    latency_ms = start.elapsed().as_millis() as u64,
                    "Campaign listing refreshed"
                );
            }
            Err(e) => {
                warn!(error = %e, "Campaign listing failed");
                if self.shared.config.fallback_seed {
                    let applied = self.mutate(|store| store.apply_fallback(seed::seed_campaigns()));
                    if applied {
                        metrics::record_listing_fallback();
                        info!("Showing demo campaigns");
                    }
                }
            }
        }
        self.snapshot()
    }

    /// Reload one campaign's variants and metadata.
    pub async fn refresh_campaign(&self, id: &CampaignId) -> PipelineResult<Reconciliation> {
        self.require_confirmed(id)?;
        let logger = CampaignLogger::new(id, "refresh");

        let entity = self.shared.service.fetch_campaign(id).await.map_err(|e| {
            logger.log_warning(&e.to_string());
            PipelineError::from(e)
        })?;

        let applied = self.mutate(|store| {
            store
                .update_confirmed(id, |local| *local = entity)
                .cloned()
        });
        Ok(self.reconcile(applied, &logger))
    }

    fn reconcile(&self, applied: Option<CampaignEntity>, logger: &CampaignLogger) -> Reconciliation {
        match applied {
            Some(entity) => Reconciliation::Applied(entity),
            None => {
                logger.log_progress("Campaign deleted while request was in flight, discarding result");
                metrics::record_stale_result(logger.operation());
                Reconciliation::Discarded
            }
        }
    }

    // =========================================================================
    // Upload
    // =========================================================================

    /// Show a placeholder immediately and create the campaign in the
    /// background.
    ///
    /// Invalid input is rejected before anything is inserted. Must be called
    /// from inside a tokio runtime.
    pub fn begin_upload(
        &self,
        video: MediaFile,
        profiles: Option<MediaFile>,
        details: UploadDetails,
    ) -> PipelineResult<UploadTicket> {
        let request = CreateCampaignRequest::new(video, profiles, details);
        request.validate()?;

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| PipelineError::TaskFailed(e.to_string()))?;

        let temp_id = CampaignId::temporary();
        let name = request
            .details
            .name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| request.video.file_name.clone());
        let preview = PreviewHandle::create(self.shared.previews.clone(), &request.video);

        CampaignLogger::new(&temp_id, "upload").log_start(&name);
        self.mutate(|store| {
            store.insert_pending(PendingSlot {
                temp_id: temp_id.clone(),
                name,
                preview,
                created_at: Utc::now(),
            })
        });

        let pipeline = self.clone();
        let task_id = temp_id.clone();
        let task = runtime.spawn(async move { pipeline.settle_upload(task_id, request).await });

        Ok(UploadTicket { temp_id, task })
    }

    async fn settle_upload(
        &self,
        temp_id: CampaignId,
        request: CreateCampaignRequest,
    ) -> PipelineResult<CampaignEntity> {
        let logger = CampaignLogger::new(&temp_id, "upload");

        match self.shared.service.create_campaign(request).await {
            Ok(entity) => {
                let superseded = self.mutate(|store| store.promote(&temp_id, entity.clone()));
                drop(superseded);
                metrics::record_upload("confirmed");
                logger.log_completion(&format!("confirmed as {}", entity.id));
                Ok(entity)
            }
            Err(e) => {
                let removed = self.mutate(|store| store.remove_pending(&temp_id));
                drop(removed);
                metrics::record_upload("failed");
                logger.log_error(&e.to_string());
                Err(e.into())
            }
        }
    }

    // =========================================================================
    // Generation
    // =========================================================================

    /// Cluster profiles and render one variant per segment.
    ///
    /// Concurrent requests for the same campaign are not merged; snapshots
    /// flag the campaign as generating while any is outstanding.
    pub async fn request_generation(
        &self,
        id: &CampaignId,
        group_count: u32,
    ) -> PipelineResult<Reconciliation> {
        self.require_confirmed(id)?;
        let logger = CampaignLogger::new(id, "generate");
        logger.log_start(&format!("{} groups", group_count));

        self.mutate(|store| store.begin_generation(id));
        let mut guard = GenerationGuard {
            pipeline: self,
            id,
            armed: true,
        };

        let result = self.shared.service.request_generation(id, group_count).await;
        guard.armed = false;

        match result {
            Ok(generation) => {
                let variant_count = generation.variants.len();
                let applied = self.mutate(|store| {
                    store.end_generation(id);
                    store
                        .update_confirmed(id, |entity| {
                            entity.append_variants(generation.variants);
                            entity.metadata = Some(generation.metadata);
                            if generation.analysis_ref.is_some() {
                                entity.analysis_ref = generation.analysis_ref;
                            }
                        })
                        .cloned()
                });
                let outcome = self.reconcile(applied, &logger);
                if matches!(outcome, Reconciliation::Applied(_)) {
                    logger.log_completion(&format!("{} variants added", variant_count));
                }
                Ok(outcome)
            }
            Err(e) => {
                self.mutate(|store| store.end_generation(id));
                logger.log_error(&e.to_string());
                Err(e.into())
            }
        }
    }

    // =========================================================================
    // Deletion
    // =========================================================================

    /// Arm the confirmation dialog. Nothing is removed yet.
    pub fn request_delete(&self, id: &CampaignId) -> PipelineResult<()> {
        self.require_confirmed(id)?;

        let mut store = self.lock();
        if let Some(dialog) = store.deletion.as_ref().filter(|d| d.in_flight) {
            return Err(PipelineError::DeletionInFlight(dialog.campaign_id.clone()));
        }
        store.deletion = Some(DeletionDialog::armed(id.clone()));
        self.publish(&mut store);

        CampaignLogger::new(id, "delete").log_progress("Deletion armed, awaiting confirmation");
        Ok(())
    }

    /// Close the dialog. Returns false when a deletion is already in flight.
    pub fn cancel_delete(&self) -> bool {
        let mut store = self.lock();
        if store.deletion.as_ref().is_some_and(|d| d.in_flight) {
            return false;
        }
        store.deletion = None;
        self.publish(&mut store);
        true
    }

    /// Issue the delete armed by [`request_delete`](Self::request_delete).
    ///
    /// On failure the dialog stays armed with its error set.
    pub async fn confirm_delete(&self) -> PipelineResult<()> {
        let id = {
            let mut store = self.lock();
            let dialog = match store.deletion.as_mut() {
                None => return Err(PipelineError::NoDeletionArmed),
                Some(dialog) if dialog.in_flight => {
                    return Err(PipelineError::DeletionInFlight(dialog.campaign_id.clone()))
                }
                Some(dialog) => dialog,
            };
            dialog.start();
            let id = dialog.campaign_id.clone();
            self.publish(&mut store);
            id
        };
        let logger = CampaignLogger::new(&id, "delete");
        logger.log_start("confirmed by user");

        match self.shared.service.delete_campaign(&id).await {
            Ok(()) => {
                self.mutate(|store| {
                    store.remove_confirmed(&id);
                    store.deletion = None;
                });
                logger.log_completion("removed");
                Ok(())
            }
            Err(e) => {
                let message = e.user_message();
                self.mutate(|store| {
                    if let Some(dialog) = store
                        .deletion
                        .as_mut()
                        .filter(|d| d.campaign_id == id)
                    {
                        dialog.fail(message);
                    }
                });
                logger.log_error(&e.to_string());
                Err(e.into())
            }
        }
    }

    // =========================================================================
    // Derived views
    // =========================================================================

    /// Fetch the analysis behind a campaign and correlate it with captions.
    pub async fn load_timeline(&self, id: &CampaignId) -> PipelineResult<TimelineCorrelator> {
        let entity = self.require_confirmed(id)?;
        let analysis_ref = entity
            .analysis_ref
            .ok_or_else(|| PipelineError::NoAnalysis(id.clone()))?;

        match self.shared.service.fetch_analysis(&analysis_ref).await {
            Ok(payload) => Ok(TimelineCorrelator::from_payload(&payload)),
            Err(e) => match seed::seed_analysis(id) {
                Some(payload) => {
                    debug!(campaign_id = %id, error = %e, "Using demo analysis");
                    Ok(TimelineCorrelator::from_payload(&payload))
                }
                None => Err(e.into()),
            },
        }
    }

    /// Fetch and project the campaign's profile embeddings.
    pub async fn load_embeddings(&self, id: &CampaignId) -> PipelineResult<EmbeddingScatter> {
        self.load_embeddings_with(id, &self.shared.projector).await
    }

    /// Same as [`load_embeddings`](Self::load_embeddings) with a custom viewport.
    pub async fn load_embeddings_with(
        &self,
        id: &CampaignId,
        projector: &EmbeddingProjector,
    ) -> PipelineResult<EmbeddingScatter> {
        self.require_confirmed(id)?;
        let payload = self.shared.service.fetch_embeddings(id).await?;
        Ok(projector.scatter(&payload))
    }
}

/// Clears the generating flag if a generation future is dropped mid-flight.
struct GenerationGuard<'a> {
    pipeline: &'a CampaignPipeline,
    id: &'a CampaignId,
    armed: bool,
}

impl Drop for GenerationGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.pipeline.mutate(|store| store.end_generation(self.id));
        }
    }
}
