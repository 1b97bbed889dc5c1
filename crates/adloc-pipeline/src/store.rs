//! Campaign list store and the snapshots published from it.
//!
//! Only [`CampaignPipeline`](crate::CampaignPipeline) writes to the store.
//! Every write bumps `revision`; confirmed slots remember the revision of
//! their last local change so a listing that started earlier cannot roll
//! them back.

use std::collections::{HashMap, HashSet};

use adloc_models::{CampaignEntity, CampaignId};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::deletion::DeletionDialog;
use crate::preview::PreviewHandle;
use crate::stage::PipelineStage;

// =============================================================================
// Snapshots
// =============================================================================

/// Read-only view of a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingCampaign {
    pub temp_id: CampaignId,
    pub name: String,
    pub preview_ref: String,
    pub created_at: DateTime<Utc>,
}

/// Read-only view of a server-confirmed campaign.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedCampaign {
    pub entity: CampaignEntity,
    /// A generation request is outstanding; the trigger should be disabled
    pub generating: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CampaignCard {
    Pending(PendingCampaign),
    Confirmed(ConfirmedCampaign),
}

impl CampaignCard {
    pub fn id(&self) -> &CampaignId {
        match self {
            CampaignCard::Pending(p) => &p.temp_id,
            CampaignCard::Confirmed(c) => &c.entity.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            CampaignCard::Pending(p) => &p.name,
            CampaignCard::Confirmed(c) => c.entity.display_name(),
        }
    }

    pub fn stage(&self) -> PipelineStage {
        match self {
            CampaignCard::Pending(_) => PipelineStage::Upload,
            CampaignCard::Confirmed(c) => PipelineStage::for_entity(&c.entity, c.generating),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, CampaignCard::Pending(_))
    }

    pub fn entity(&self) -> Option<&CampaignEntity> {
        match self {
            CampaignCard::Pending(_) => None,
            CampaignCard::Confirmed(c) => Some(&c.entity),
        }
    }
}

/// Campaign list as published to observers, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignSnapshot {
    pub revision: u64,
    pub campaigns: Vec<CampaignCard>,
    pub deletion: Option<DeletionDialog>,
    /// The list is the local demo set, not the user's campaigns
    pub is_fallback: bool,
}

impl CampaignSnapshot {
    pub fn get(&self, id: &CampaignId) -> Option<&CampaignCard> {
        self.campaigns.iter().find(|c| c.id() == id)
    }

    pub fn head(&self) -> Option<&CampaignCard> {
        self.campaigns.first()
    }

    pub fn len(&self) -> usize {
        self.campaigns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.campaigns.is_empty()
    }
}

// =============================================================================
// Store
// =============================================================================

#[derive(Debug)]
pub(crate) struct PendingSlot {
    pub temp_id: CampaignId,
    pub name: String,
    pub preview: PreviewHandle,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub(crate) struct ConfirmedSlot {
    pub entity: CampaignEntity,
    pub touched_rev: u64,
}

#[derive(Debug)]
pub(crate) enum Slot {
    Pending(PendingSlot),
    Confirmed(ConfirmedSlot),
}

impl Slot {
    fn id(&self) -> &CampaignId {
        match self {
            Slot::Pending(p) => &p.temp_id,
            Slot::Confirmed(c) => &c.entity.id,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct CampaignStore {
    slots: Vec<Slot>,
    revision: u64,
    tombstones: HashSet<CampaignId>,
    generating: HashMap<CampaignId, usize>,
    pub deletion: Option<DeletionDialog>,
    pub is_fallback: bool,
}

impl CampaignStore {
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn bump(&mut self) -> u64 {
        self.revision += 1;
        self.revision
    }

    pub fn snapshot(&self) -> CampaignSnapshot {
        let campaigns = self
            .slots
            .iter()
            .map(|slot| match slot {
                Slot::Pending(p) => CampaignCard::Pending(PendingCampaign {
                    temp_id: p.temp_id.clone(),
                    name: p.name.clone(),
                    preview_ref: p.preview.url().to_string(),
                    created_at: p.created_at,
                }),
                Slot::Confirmed(c) => CampaignCard::Confirmed(ConfirmedCampaign {
                    entity: c.entity.clone(),
                    generating: self.is_generating(&c.entity.id),
                }),
            })
            .collect();

        CampaignSnapshot {
            revision: self.revision,
            campaigns,
            deletion: self.deletion.clone(),
            is_fallback: self.is_fallback,
        }
    }

    pub fn find(&self, id: &CampaignId) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.id() == id)
    }

    pub fn confirmed(&self, id: &CampaignId) -> Option<&CampaignEntity> {
        match self.find(id) {
            Some(Slot::Confirmed(c)) => Some(&c.entity),
            _ => None,
        }
    }

    pub fn has_confirmed(&self) -> bool {
        self.slots.iter().any(|s| matches!(s, Slot::Confirmed(_)))
    }

    pub fn is_deleted(&self, id: &CampaignId) -> bool {
        self.tombstones.contains(id)
    }

    pub fn is_generating(&self, id: &CampaignId) -> bool {
        self.generating.get(id).is_some_and(|n| *n > 0)
    }

    /// Apply a local change to a confirmed campaign.
    ///
    /// Returns `None` when the campaign is gone (deleted or never confirmed).
    pub fn update_confirmed<F>(&mut self, id: &CampaignId, f: F) -> Option<&CampaignEntity>
    where
        F: FnOnce(&mut CampaignEntity),
    {
        if self.tombstones.contains(id) {
            return None;
        }
        let revision = self.revision;
        let slot = self.slots.iter_mut().find_map(|slot| match slot {
            Slot::Confirmed(c) if &c.entity.id == id => Some(c),
            _ => None,
        })?;
        f(&mut slot.entity);
        slot.touched_rev = revision;
        Some(&slot.entity)
    }

    pub fn insert_pending(&mut self, slot: PendingSlot) {
        self.slots.insert(0, Slot::Pending(slot));
    }

    /// Swap a placeholder for its confirmed entity in the same position.
    ///
    /// A copy of the entity that a concurrent listing already brought in is
    /// dropped, so the id appears exactly once. Returns the superseded
    /// placeholder.
    pub fn promote(&mut self, temp_id: &CampaignId, entity: CampaignEntity) -> Option<PendingSlot> {
        let revision = self.revision;
        self.slots
            .retain(|slot| !matches!(slot, Slot::Confirmed(c) if c.entity.id == entity.id));

        let confirmed = Slot::Confirmed(ConfirmedSlot {
            entity,
            touched_rev: revision,
        });
        match self
            .slots
            .iter()
            .position(|slot| matches!(slot, Slot::Pending(p) if &p.temp_id == temp_id))
        {
            Some(index) => match std::mem::replace(&mut self.slots[index], confirmed) {
                Slot::Pending(pending) => Some(pending),
                Slot::Confirmed(_) => None,
            },
            None => {
                self.slots.insert(0, confirmed);
                None
            }
        }
    }

    pub fn remove_pending(&mut self, temp_id: &CampaignId) -> Option<PendingSlot> {
        let index = self
            .slots
            .iter()
            .position(|slot| matches!(slot, Slot::Pending(p) if &p.temp_id == temp_id))?;
        match self.slots.remove(index) {
            Slot::Pending(pending) => Some(pending),
            Slot::Confirmed(_) => None,
        }
    }

    /// Remove a confirmed campaign for good. Late results for it are discarded.
    pub fn remove_confirmed(&mut self, id: &CampaignId) -> bool {
        let before = self.slots.len();
        self.slots
            .retain(|slot| !matches!(slot, Slot::Confirmed(c) if &c.entity.id == id));
        self.tombstones.insert(id.clone());
        self.generating.remove(id);
        self.slots.len() != before
    }

    pub fn begin_generation(&mut self, id: &CampaignId) {
        *self.generating.entry(id.clone()).or_default() += 1;
    }

    pub fn end_generation(&mut self, id: &CampaignId) {
        if let Some(count) = self.generating.get_mut(id) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.generating.remove(id);
            }
        }
    }

    /// Merge a listing that was requested at revision `since`.
    ///
    /// Listed records are summaries: they may lack the name and variants.
    /// Known campaigns take the listed media refs, metadata and timestamp and
    /// keep whatever the summary leaves out. Placeholders stay in front.
    /// Confirmed campaigns changed locally after `since` keep their local
    /// copy; those the listing does not know yet stay in front with the
    /// placeholders. Deleted ids are never reinserted.
    pub fn merge_listing(&mut self, listing: Vec<CampaignEntity>, since: u64) {
        let revision = self.revision;
        let listed: HashSet<CampaignId> = listing.iter().map(|e| e.id.clone()).collect();

        let mut merged = Vec::with_capacity(listing.len() + self.slots.len());
        let mut newer: HashMap<CampaignId, ConfirmedSlot> = HashMap::new();
        let mut known: HashMap<CampaignId, CampaignEntity> = HashMap::new();

        for slot in self.slots.drain(..) {
            match slot {
                Slot::Pending(pending) => merged.push(Slot::Pending(pending)),
                Slot::Confirmed(c) if c.touched_rev > since => {
                    if listed.contains(&c.entity.id) {
                        newer.insert(c.entity.id.clone(), c);
                    } else {
                        merged.push(Slot::Confirmed(c));
                    }
                }
                Slot::Confirmed(c) => {
                    known.insert(c.entity.id.clone(), c.entity);
                }
            }
        }

        let mut seen: HashSet<CampaignId> = merged.iter().map(|s| s.id().clone()).collect();
        for entity in listing {
            if self.tombstones.contains(&entity.id) || !seen.insert(entity.id.clone()) {
                continue;
            }
            let slot = match newer.remove(&entity.id) {
                Some(slot) => slot,
                None => {
                    let entity = match known.remove(&entity.id) {
                        Some(local) => absorb_summary(local, entity),
                        None => entity,
                    };
                    ConfirmedSlot {
                        entity,
                        touched_rev: revision,
                    }
                }
            };
            merged.push(Slot::Confirmed(slot));
        }

        self.slots = merged;
        self.is_fallback = false;
    }

    /// Fill an empty list with demo campaigns. Placeholders are kept.
    pub fn apply_fallback(&mut self, seeds: Vec<CampaignEntity>) -> bool {
        if self.has_confirmed() {
            return false;
        }
        let revision = self.revision;
        let seeds = seeds
            .into_iter()
            .filter(|e| !self.tombstones.contains(&e.id))
            .map(|entity| {
                Slot::Confirmed(ConfirmedSlot {
                    entity,
                    touched_rev: revision,
                })
            })
            .collect::<Vec<_>>();
        self.slots.extend(seeds);
        self.is_fallback = true;
        true
    }
}

/// Fold a listed summary into the local copy of the same campaign.
fn absorb_summary(mut local: CampaignEntity, listed: CampaignEntity) -> CampaignEntity {
    if listed.name.is_some() {
        local.name = listed.name;
    }
    if !listed.original_media_ref.is_empty() {
        local.original_media_ref = listed.original_media_ref;
    }
    if listed.analysis_ref.is_some() {
        local.analysis_ref = listed.analysis_ref;
    }
    if listed.metadata.is_some() {
        local.metadata = listed.metadata;
    }
    let unseen: Vec<_> = listed
        .variants
        .into_iter()
        .filter(|v| !local.variants.contains(v))
        .collect();
    local.append_variants(unseen);
    local.created_at = listed.created_at;
    local
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::LocalPreviews;
    use adloc_models::Variant;
    use adloc_client::MediaFile;
    use std::sync::Arc;

    fn entity(id: &str) -> CampaignEntity {
        CampaignEntity {
            id: CampaignId::from(id),
            name: None,
            original_media_ref: format!("/media/original/{}.mp4", id),
            analysis_ref: None,
            created_at: Utc::now(),
            variants: Vec::new(),
            metadata: None,
        }
    }

    fn pending(previews: &Arc<LocalPreviews>) -> PendingSlot {
        PendingSlot {
            temp_id: CampaignId::temporary(),
            name: "ad.mp4".to_string(),
            preview: PreviewHandle::create(previews.clone(), &MediaFile::new("ad.mp4", vec![1])),
            created_at: Utc::now(),
        }
    }

    fn ids(store: &CampaignStore) -> Vec<String> {
        store
            .snapshot()
            .campaigns
            .iter()
            .map(|c| c.id().to_string())
            .collect()
    }

    #[test]
    fn test_merge_keeps_placeholders_in_front() {
        let previews = Arc::new(LocalPreviews::new());
        let mut store = CampaignStore::default();
        let slot = pending(&previews);
        let temp_id = slot.temp_id.clone();

        let since = store.revision();
        store.bump();
        store.insert_pending(slot);
        store.bump();
        store.merge_listing(vec![entity("a"), entity("b")], since);

        assert_eq!(ids(&store), vec![temp_id.to_string(), "a".into(), "b".into()]);
        assert_eq!(previews.live_count(), 1);
    }

    #[test]
    fn test_promote_replaces_in_place_and_dedupes() {
        let previews = Arc::new(LocalPreviews::new());
        let mut store = CampaignStore::default();
        let slot = pending(&previews);
        let temp_id = slot.temp_id.clone();
        store.insert_pending(slot);
        store.merge_listing(vec![entity("new"), entity("old")], 0);

        store.bump();
        let superseded = store.promote(&temp_id, entity("new"));
        assert!(superseded.is_some());
        drop(superseded);

        assert_eq!(ids(&store), vec!["new", "old"]);
        assert_eq!(previews.live_count(), 0);
        assert_eq!(previews.released_count(), 1);
    }

    #[test]
    fn test_local_changes_survive_older_listing() {
        let mut store = CampaignStore::default();
        store.bump();
        store.merge_listing(vec![entity("a")], 0);

        let since = store.revision();
        store.bump();
        store.update_confirmed(&CampaignId::from("a"), |e| e.name = Some("renamed".into()));

        store.bump();
        store.merge_listing(vec![entity("a")], since);
        assert_eq!(
            store.confirmed(&CampaignId::from("a")).and_then(|e| e.name.clone()),
            Some("renamed".to_string())
        );
    }

    #[test]
    fn test_summary_listing_keeps_name_and_variants() {
        let mut store = CampaignStore::default();
        store.bump();
        store.merge_listing(vec![entity("a")], 0);
        store.bump();
        store.update_confirmed(&CampaignId::from("a"), |e| {
            e.name = Some("Spring launch".into());
            e.append_variants([Variant::new("speed_up", "/media/a/speed_up.mp4")]);
        });

        let since = store.bump();
        let mut summary = entity("a");
        summary.analysis_ref = Some("/media/analysis/a.json".into());
        store.bump();
        store.merge_listing(vec![summary], since);

        let merged = store.confirmed(&CampaignId::from("a")).cloned();
        let merged = merged.expect("campaign kept");
        assert_eq!(merged.name.as_deref(), Some("Spring launch"));
        assert_eq!(merged.variants.len(), 1);
        assert_eq!(merged.analysis_ref.as_deref(), Some("/media/analysis/a.json"));

        // A full record repeating the same variant does not duplicate it
        let since = store.bump();
        let mut full = merged.clone();
        full.variants.push(Variant::new("group-1", "/media/a/group-1.mp4"));
        store.merge_listing(vec![full], since);
        let variants = store
            .confirmed(&CampaignId::from("a"))
            .map(|e| e.variants.len());
        assert_eq!(variants, Some(2));
    }

    #[test]
    fn test_deleted_ids_are_not_reinserted() {
        let mut store = CampaignStore::default();
        store.merge_listing(vec![entity("a"), entity("b")], 0);
        assert!(store.remove_confirmed(&CampaignId::from("a")));

        store.merge_listing(vec![entity("a"), entity("b")], 0);
        assert_eq!(ids(&store), vec!["b"]);
        assert!(store
            .update_confirmed(&CampaignId::from("a"), |_| {})
            .is_none());
    }

    #[test]
    fn test_fallback_only_fills_empty_list() {
        let mut store = CampaignStore::default();
        assert!(store.apply_fallback(vec![entity("demo")]));
        assert!(store.snapshot().is_fallback);

        store.merge_listing(vec![entity("real")], 0);
        assert!(!store.is_fallback);
        assert!(!store.apply_fallback(vec![entity("demo")]));
        assert_eq!(ids(&store), vec!["real"]);
    }

    #[test]
    fn test_generation_counter() {
        let mut store = CampaignStore::default();
        let id = CampaignId::from("a");
        store.begin_generation(&id);
        store.begin_generation(&id);
        store.end_generation(&id);
        assert!(store.is_generating(&id));
        store.end_generation(&id);
        assert!(!store.is_generating(&id));
    }
}
