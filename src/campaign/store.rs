//! In-memory campaign storage.

use std::sync::{Arc, RwLock};

use thiserror::Error;
use tracing::{debug, info};

use super::model::{Campaign, CampaignStatus};
use super::patch::CampaignPatch;

/// Errors that can occur during campaign store operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No campaign with the given id.
    #[error("Campaign not found: {0}")]
    NotFound(String),

    /// A campaign with the given id already exists.
    #[error("Campaign already exists: {0}")]
    DuplicateId(String),

    /// A writer panicked while holding the store lock.
    #[error("Campaign store lock poisoned")]
    LockPoisoned,
}

/// Result type for campaign store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Collection of campaigns, newest first.
///
/// Updates replace whole records: the stored campaign is swapped for the
/// result of [`CampaignPatch::apply`], so references handed out earlier keep
/// describing the old value. Concurrent writers should go through
/// [`SharedCampaignStore`].
#[derive(Debug, Clone, Default)]
pub struct CampaignStore {
    campaigns: Vec<Campaign>,
}

impl CampaignStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with campaigns, kept in the given order.
    pub fn with_campaigns(campaigns: Vec<Campaign>) -> Self {
        Self { campaigns }
    }

    /// Add a campaign at the front of the list.
    pub fn add(&mut self, campaign: Campaign) -> StoreResult<()> {
        if self.get(&campaign.id).is_some() {
            return Err(StoreError::DuplicateId(campaign.id));
        }
        info!(campaign_id = %campaign.id, title = %campaign.title, "Campaign added");
        self.campaigns.insert(0, campaign);
        Ok(())
    }

    /// Look up a campaign by id.
    pub fn get(&self, id: &str) -> Option<&Campaign> {
        self.campaigns.iter().find(|c| c.id == id)
    }

    /// Merge a patch over the campaign with `id`. Last write wins.
    pub fn update(&mut self, id: &str, patch: &CampaignPatch) -> StoreResult<&Campaign> {
        let slot = self
            .campaigns
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if patch.is_empty() {
            debug!(campaign_id = %id, "Empty patch ignored");
            return Ok(&*slot);
        }

        *slot = patch.apply(slot);
        info!(campaign_id = %id, fields = ?patch.changed_fields(), "Campaign updated");
        Ok(&*slot)
    }

    /// Remove a campaign, returning it.
    pub fn remove(&mut self, id: &str) -> StoreResult<Campaign> {
        let index = self
            .campaigns
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        info!(campaign_id = %id, "Campaign removed");
        Ok(self.campaigns.remove(index))
    }

    /// All campaigns, newest first.
    pub fn list(&self) -> &[Campaign] {
        &self.campaigns
    }

    /// Campaigns owned by a brand.
    pub fn list_by_brand<'a>(&'a self, brand_id: &'a str) -> impl Iterator<Item = &'a Campaign> {
        self.campaigns.iter().filter(move |c| c.brand_id == brand_id)
    }

    /// Campaigns in a given status.
    pub fn list_by_status(&self, status: CampaignStatus) -> impl Iterator<Item = &Campaign> {
        self.campaigns.iter().filter(move |c| c.status == status)
    }

    /// Campaigns a creator has applied to or submitted work for.
    pub fn list_for_creator<'a>(&'a self, creator_id: &'a str) -> impl Iterator<Item = &'a Campaign> {
        self.campaigns.iter().filter(move |c| {
            c.applicant(creator_id).is_some() || c.submissions_by(creator_id).next().is_some()
        })
    }

    pub fn len(&self) -> usize {
        self.campaigns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.campaigns.is_empty()
    }
}

/// Thread-safe campaign store.
///
/// Every write takes the lock for the full read-patch-replace cycle, so
/// writes to the same campaign are serialized.
#[derive(Debug, Clone, Default)]
pub struct SharedCampaignStore {
    inner: Arc<RwLock<CampaignStore>>,
}

impl SharedCampaignStore {
    /// Wrap an existing store.
    pub fn new(store: CampaignStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Add a campaign.
    pub fn add(&self, campaign: Campaign) -> StoreResult<()> {
        let mut store = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        store.add(campaign)
    }

    /// Get a snapshot of a campaign.
    pub fn get(&self, id: &str) -> Option<Campaign> {
        self.inner.read().ok().and_then(|s| s.get(id).cloned())
    }

    /// Apply a patch, returning the new record.
    pub fn update(&self, id: &str, patch: &CampaignPatch) -> StoreResult<Campaign> {
        let mut store = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        store.update(id, patch).cloned()
    }

    /// Compute a patch from the current record and apply it under one lock.
    ///
    /// The closure sees the latest value, so concurrent read-modify-write
    /// cycles cannot lose each other's changes.
    pub fn modify<E, F>(&self, id: &str, f: F) -> Result<Campaign, E>
    where
        F: FnOnce(&Campaign) -> Result<CampaignPatch, E>,
        E: From<StoreError>,
    {
        let mut store = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        let current = store
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let patch = f(current)?;
        Ok(store.update(id, &patch).cloned()?)
    }

    /// Snapshot of all campaigns.
    pub fn list(&self) -> Vec<Campaign> {
        self.inner
            .read()
            .map(|s| s.list().to_vec())
            .unwrap_or_default()
    }
}
