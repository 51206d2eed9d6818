//! Partial campaign updates.
//!
//! A [`CampaignPatch`] lists the fields a caller may change. Applying it
//! never mutates the original record; it produces a new [`Campaign`] with the
//! set fields replaced and everything else carried over.

use chrono::NaiveDate;

use super::model::{
    Applicant, Campaign, CampaignStatus, CampaignType, Kpi, PayoutItem, Requirements, RewardTier,
    Submission,
};

/// Enumerated set of campaign fields that may be replaced by an update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampaignPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub campaign_types: Option<Vec<CampaignType>>,
    pub status: Option<CampaignStatus>,
    pub total_budget: Option<u64>,
    pub spent: Option<u64>,
    pub applicants: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub requirements: Option<Requirements>,
    pub reward_tiers: Option<Vec<RewardTier>>,
    pub applicant_list: Option<Vec<Applicant>>,
    pub submission_list: Option<Vec<Submission>>,
    pub payouts: Option<Vec<PayoutItem>>,
    pub kpi: Option<Kpi>,
}

impl CampaignPatch {
    /// Create an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_cover_image(mut self, url: impl Into<String>) -> Self {
        self.cover_image = Some(url.into());
        self
    }

    pub fn with_campaign_types(mut self, types: Vec<CampaignType>) -> Self {
        self.campaign_types = Some(types);
        self
    }

    pub fn with_status(mut self, status: CampaignStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_total_budget(mut self, budget: u64) -> Self {
        self.total_budget = Some(budget);
        self
    }

    pub fn with_spent(mut self, spent: u64) -> Self {
        self.spent = Some(spent);
        self
    }

    pub fn with_applicants(mut self, count: u32) -> Self {
        self.applicants = Some(count);
        self
    }

    pub fn with_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn with_requirements(mut self, requirements: Requirements) -> Self {
        self.requirements = Some(requirements);
        self
    }

    pub fn with_reward_tiers(mut self, tiers: Vec<RewardTier>) -> Self {
        self.reward_tiers = Some(tiers);
        self
    }

    pub fn with_applicant_list(mut self, applicants: Vec<Applicant>) -> Self {
        self.applicant_list = Some(applicants);
        self
    }

    pub fn with_submission_list(mut self, submissions: Vec<Submission>) -> Self {
        self.submission_list = Some(submissions);
        self
    }

    pub fn with_payouts(mut self, payouts: Vec<PayoutItem>) -> Self {
        self.payouts = Some(payouts);
        self
    }

    pub fn with_kpi(mut self, kpi: Kpi) -> Self {
        self.kpi = Some(kpi);
        self
    }

    /// Check if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.changed_fields().is_empty()
    }

    /// Names of the fields this patch sets, for logging.
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        macro_rules! track {
            ($($field:ident),* $(,)?) => {
                $(if self.$field.is_some() { fields.push(stringify!($field)); })*
            };
        }
        track!(
            title,
            description,
            cover_image,
            campaign_types,
            status,
            total_budget,
            spent,
            applicants,
            start_date,
            end_date,
            requirements,
            reward_tiers,
            applicant_list,
            submission_list,
            payouts,
            kpi,
        );
        fields
    }

    /// Combine two patches; fields set in `later` win.
    pub fn merge(self, later: CampaignPatch) -> CampaignPatch {
        CampaignPatch {
            title: later.title.or(self.title),
            description: later.description.or(self.description),
            cover_image: later.cover_image.or(self.cover_image),
            campaign_types: later.campaign_types.or(self.campaign_types),
            status: later.status.or(self.status),
            total_budget: later.total_budget.or(self.total_budget),
            spent: later.spent.or(self.spent),
            applicants: later.applicants.or(self.applicants),
            start_date: later.start_date.or(self.start_date),
            end_date: later.end_date.or(self.end_date),
            requirements: later.requirements.or(self.requirements),
            reward_tiers: later.reward_tiers.or(self.reward_tiers),
            applicant_list: later.applicant_list.or(self.applicant_list),
            submission_list: later.submission_list.or(self.submission_list),
            payouts: later.payouts.or(self.payouts),
            kpi: later.kpi.or(self.kpi),
        }
    }

    /// Produce a new campaign with this patch laid over `base`.
    pub fn apply(&self, base: &Campaign) -> Campaign {
        let mut next = base.clone();
        macro_rules! replace {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = &self.$field { next.$field = value.clone(); })*
            };
        }
        replace!(
            title,
            description,
            cover_image,
            campaign_types,
            status,
            total_budget,
            spent,
            applicants,
            start_date,
            end_date,
            reward_tiers,
            applicant_list,
            submission_list,
            payouts,
        );
        if let Some(requirements) = &self.requirements {
            next.requirements = Some(requirements.clone());
        }
        if let Some(kpi) = &self.kpi {
            next.kpi = Some(kpi.clone());
        }
        next
    }
}
