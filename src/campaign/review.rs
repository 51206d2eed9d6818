//! Creator applications, work submissions and brand review.
//!
//! Each operation validates against the current campaign and returns a
//! [`CampaignPatch`] for the caller to hand to the store. Nothing here
//! mutates a campaign directly.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

use super::model::{
    Applicant, Campaign, Kpi, Platform, ReviewStatus, SampleStatus, Submission,
};
use super::patch::CampaignPatch;
use super::store::StoreError;
use crate::leaderboard::MetricValue;

/// Errors raised at the review boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReviewError {
    /// Submission without a link.
    #[error("Submission link is empty")]
    EmptyLink,

    /// The creator already submitted this link.
    #[error("You have already submitted this video link: {0}")]
    DuplicateLink(String),

    /// The creator already applied to this campaign.
    #[error("Creator {0} has already joined this campaign")]
    AlreadyJoined(String),

    /// A sample was requested but the creator has no shipping address.
    #[error("A shipping address is required before requesting a sample")]
    MissingShippingAddress,

    #[error("Submission not found: {0}")]
    SubmissionNotFound(String),

    #[error("Applicant not found: {0}")]
    ApplicantNotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for review operations.
pub type ReviewResult<T> = Result<T, ReviewError>;

/// Identity of the creator acting on a campaign.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreatorRef {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub platform: Platform,
    pub followers: String,
    pub shipping_address: Option<String>,
}

impl CreatorRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            followers: "0".to_string(),
            ..Self::default()
        }
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = avatar.into();
        self
    }

    pub fn with_platform(mut self, platform: Platform, followers: impl Into<String>) -> Self {
        self.platform = platform;
        self.followers = followers.into();
        self
    }

    pub fn with_shipping_address(mut self, address: impl Into<String>) -> Self {
        self.shipping_address = Some(address.into());
        self
    }
}

/// Content a creator wants to submit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubmissionDraft {
    pub link: String,
    pub spark_ads_code: Option<String>,
    /// Self-reported views; empty means "0"
    pub views: String,
    /// Self-reported likes; empty means "0"
    pub likes: String,
}

impl SubmissionDraft {
    pub fn new(link: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            ..Self::default()
        }
    }

    pub fn with_metrics(mut self, views: impl Into<String>, likes: impl Into<String>) -> Self {
        self.views = views.into();
        self.likes = likes.into();
        self
    }

    pub fn with_spark_ads_code(mut self, code: impl Into<String>) -> Self {
        self.spark_ads_code = Some(code.into());
        self
    }
}

/// Per-creator submission counts for one campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CreatorProgress {
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl CreatorProgress {
    pub fn total(&self) -> usize {
        self.pending + self.approved + self.rejected
    }
}

/// Apply to a campaign as a creator.
pub fn join_campaign(
    campaign: &Campaign,
    creator: &CreatorRef,
    request_sample: bool,
    applied_at: NaiveDate,
) -> ReviewResult<CampaignPatch> {
    if campaign.applicant(&creator.id).is_some() {
        return Err(ReviewError::AlreadyJoined(creator.id.clone()));
    }

    let shipping_address = if request_sample {
        match creator.shipping_address.as_deref().map(str::trim) {
            Some(address) if !address.is_empty() => Some(address.to_string()),
            _ => return Err(ReviewError::MissingShippingAddress),
        }
    } else {
        None
    };

    let applicant = Applicant {
        id: creator.id.clone(),
        name: creator.name.clone(),
        avatar: creator.avatar.clone(),
        platform: creator.platform,
        followers: creator.followers.clone(),
        status: ReviewStatus::Pending,
        applied_at,
        request_sample,
        shipping_address,
        sample_status: request_sample.then_some(SampleStatus::Pending),
    };

    let mut applicants = campaign.applicant_list.clone();
    applicants.push(applicant);

    info!(campaign_id = %campaign.id, creator_id = %creator.id, request_sample, "Creator joined campaign");

    Ok(CampaignPatch::new()
        .with_applicant_list(applicants)
        .with_applicants(campaign.applicants.saturating_add(1)))
}

/// Approve or reject an applicant.
pub fn set_applicant_status(
    campaign: &Campaign,
    applicant_id: &str,
    status: ReviewStatus,
) -> ReviewResult<CampaignPatch> {
    let applicants = replace_applicant(campaign, applicant_id, |a| a.status = status)?;
    info!(campaign_id = %campaign.id, applicant_id, ?status, "Applicant reviewed");
    Ok(CampaignPatch::new().with_applicant_list(applicants))
}

/// Update the logistics state of an applicant's product sample.
pub fn set_sample_status(
    campaign: &Campaign,
    applicant_id: &str,
    status: SampleStatus,
) -> ReviewResult<CampaignPatch> {
    let applicants = replace_applicant(campaign, applicant_id, |a| a.sample_status = Some(status))?;
    Ok(CampaignPatch::new().with_applicant_list(applicants))
}

fn replace_applicant(
    campaign: &Campaign,
    applicant_id: &str,
    edit: impl FnOnce(&mut Applicant),
) -> ReviewResult<Vec<Applicant>> {
    let mut applicants = campaign.applicant_list.clone();
    let target = applicants
        .iter_mut()
        .find(|a| a.id == applicant_id)
        .ok_or_else(|| ReviewError::ApplicantNotFound(applicant_id.to_string()))?;
    edit(target);
    Ok(applicants)
}

/// Submit a piece of content.
///
/// Links are compared after trimming, and only against the same creator's
/// earlier submissions. Each accepted submission is appended; earlier ones
/// are never replaced.
pub fn submit_work(
    campaign: &Campaign,
    creator: &CreatorRef,
    draft: SubmissionDraft,
    submitted_at: NaiveDate,
) -> ReviewResult<CampaignPatch> {
    let link = draft.link.trim();
    if link.is_empty() {
        return Err(ReviewError::EmptyLink);
    }

    let mut existing = 0usize;
    for previous in campaign.submissions_by(&creator.id) {
        if previous.link.trim() == link {
            return Err(ReviewError::DuplicateLink(link.to_string()));
        }
        existing += 1;
    }

    let submission = Submission {
        id: format!("sub-{}-{}", creator.id, existing + 1),
        creator_id: creator.id.clone(),
        creator_name: creator.name.clone(),
        avatar: creator.avatar.clone(),
        link: link.to_string(),
        spark_ads_code: draft.spark_ads_code.filter(|c| !c.trim().is_empty()),
        views: metric_or_zero(draft.views),
        likes: metric_or_zero(draft.likes),
        status: ReviewStatus::Pending,
        thumbnail: String::new(),
        submitted_at,
    };

    let mut submissions = campaign.submission_list.clone();
    submissions.push(submission);

    let kpi = bump_submission_kpi(campaign.kpi.as_ref());

    info!(campaign_id = %campaign.id, creator_id = %creator.id, "Work submitted");

    Ok(CampaignPatch::new()
        .with_submission_list(submissions)
        .with_kpi(kpi))
}

fn metric_or_zero(raw: String) -> MetricValue {
    if raw.trim().is_empty() {
        MetricValue::default()
    } else {
        MetricValue::Text(raw)
    }
}

/// Approve or reject one submission.
pub fn set_submission_status(
    campaign: &Campaign,
    submission_id: &str,
    status: ReviewStatus,
) -> ReviewResult<CampaignPatch> {
    let mut submissions = campaign.submission_list.clone();
    let target = submissions
        .iter_mut()
        .find(|s| s.id == submission_id)
        .ok_or_else(|| ReviewError::SubmissionNotFound(submission_id.to_string()))?;
    target.status = status;

    info!(campaign_id = %campaign.id, submission_id, ?status, "Submission reviewed");
    Ok(CampaignPatch::new().with_submission_list(submissions))
}

/// Approve every pending submission of one creator.
///
/// Returns the patch and the number of submissions approved.
pub fn approve_pending_for_creator(campaign: &Campaign, creator_id: &str) -> (CampaignPatch, usize) {
    let mut approved = 0;
    let submissions: Vec<Submission> = campaign
        .submission_list
        .iter()
        .map(|s| {
            if s.creator_id == creator_id && s.status == ReviewStatus::Pending {
                approved += 1;
                s.clone().with_status(ReviewStatus::Approved)
            } else {
                s.clone()
            }
        })
        .collect();

    info!(campaign_id = %campaign.id, creator_id, approved, "Bulk approval");
    (CampaignPatch::new().with_submission_list(submissions), approved)
}

/// Submission counts by status for one creator.
pub fn creator_progress(campaign: &Campaign, creator_id: &str) -> CreatorProgress {
    campaign
        .submissions_by(creator_id)
        .fold(CreatorProgress::default(), |mut acc, s| {
            match s.status {
                ReviewStatus::Pending => acc.pending += 1,
                ReviewStatus::Approved => acc.approved += 1,
                ReviewStatus::Rejected => acc.rejected += 1,
            }
            acc
        })
}

fn bump_submission_kpi(kpi: Option<&Kpi>) -> Kpi {
    let mut kpi = kpi.cloned().unwrap_or_default();
    kpi.submissions = kpi.submissions.saturating_add(1);
    kpi
}
