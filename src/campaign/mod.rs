//! Campaign records and their in-memory store.
//!
//! A [`Campaign`] owns its reward tiers, applicants, submissions and payouts.
//! Records are never edited in place: callers build a [`CampaignPatch`]
//! (directly or through the [`review`] helpers) and hand it to
//! [`CampaignStore::update`], which swaps in a new record.

pub mod kpi;
pub mod model;
pub mod patch;
pub mod review;
pub mod store;

pub use kpi::{recompute_kpi, refresh_kpi_patch};
pub use model::{
    Applicant, Campaign, CampaignStatus, CampaignType, Kpi, PayoutItem, PayoutStatus, Platform,
    Requirements, ReviewStatus, RewardTier, SampleStatus, Submission,
};
pub use patch::CampaignPatch;
pub use review::{CreatorProgress, CreatorRef, ReviewError, ReviewResult, SubmissionDraft};
pub use store::{CampaignStore, SharedCampaignStore, StoreError, StoreResult};
