//! Campaign records.
//!
//! Field names serialize in camelCase so campaign JSON exported from the
//! dashboard loads unchanged.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::leaderboard::{MetricValue, DEFAULT_RANK_END};

/// Campaign mechanic a reward tier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignType {
    /// Ranked by sales
    Gmv,
    /// Ranked by number of videos
    ContentVolume,
    /// Random winner slots
    LuckyDraw,
}

impl CampaignType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignType::Gmv => "GMV",
            CampaignType::ContentVolume => "CONTENT_VOLUME",
            CampaignType::LuckyDraw => "LUCKY_DRAW",
        }
    }
}

/// Lifecycle status of a campaign. Transitions are not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    #[default]
    Draft,
    Upcoming,
    Active,
    Completed,
}

/// Review state shared by applicants and submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// Logistics state of a product sample sent to a creator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleStatus {
    Pending,
    Sent,
    Received,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Platform {
    #[default]
    TikTok,
    Instagram,
    YouTube,
}

/// A rank-range-to-reward mapping.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardTier {
    pub id: String,
    /// First rank of the range (inclusive, 1-based); absent or 0 means unassigned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank_start: Option<u32>,
    /// Last rank of the range (inclusive); absent or 0 means unassigned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank_end: Option<u32>,
    /// Cash reward per winner
    #[serde(default)]
    pub amount: u64,
    #[serde(default)]
    pub condition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier_type: Option<CampaignType>,
}

impl RewardTier {
    pub fn new(id: impl Into<String>, amount: u64) -> Self {
        Self {
            id: id.into(),
            amount,
            ..Self::default()
        }
    }

    pub fn with_ranks(mut self, start: Option<u32>, end: Option<u32>) -> Self {
        self.rank_start = start;
        self.rank_end = end;
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = condition.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tier_type(mut self, tier_type: CampaignType) -> Self {
        self.tier_type = Some(tier_type);
        self
    }

    /// Configured start rank, 0 when unassigned.
    pub fn start(&self) -> u32 {
        self.rank_start.unwrap_or(0)
    }

    /// Configured end rank, 0 when unassigned.
    pub fn end(&self) -> u32 {
        self.rank_end.unwrap_or(0)
    }

    /// Whether `rank` falls inside this tier when resolving standings.
    pub fn contains_rank(&self, rank: u32) -> bool {
        let end = match self.end() {
            0 => DEFAULT_RANK_END,
            end => end,
        };
        rank >= self.start() && rank <= end
    }

    /// Number of winners this tier pays when fully occupied.
    ///
    /// A tier without a usable range counts as a single winner.
    pub fn winner_slots(&self) -> u64 {
        let span = i64::from(self.end()) - i64::from(self.start()) + 1;
        span.max(1) as u64
    }

    /// Worst-case spend of this tier.
    pub fn max_payout(&self) -> u64 {
        self.amount.saturating_mul(self.winner_slots())
    }

    /// "Rank 1" or "Rank 2-5".
    pub fn range_label(&self) -> String {
        if self.start() == self.end() {
            format!("Rank {}", self.start())
        } else {
            format!("Rank {}-{}", self.start(), self.end())
        }
    }
}

/// A creator's application to join a campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Applicant {
    /// Creator id
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub platform: Platform,
    #[serde(default)]
    pub followers: String,
    #[serde(default)]
    pub status: ReviewStatus,
    pub applied_at: NaiveDate,
    #[serde(default)]
    pub request_sample: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_status: Option<SampleStatus>,
}

/// One piece of content submitted by a creator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub creator_id: String,
    #[serde(default)]
    pub creator_name: String,
    #[serde(default)]
    pub avatar: String,
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spark_ads_code: Option<String>,
    #[serde(default)]
    pub views: MetricValue,
    #[serde(default)]
    pub likes: MetricValue,
    #[serde(default)]
    pub status: ReviewStatus,
    #[serde(default)]
    pub thumbnail: String,
    pub submitted_at: NaiveDate,
}

impl Submission {
    pub fn new(
        id: impl Into<String>,
        creator_id: impl Into<String>,
        link: impl Into<String>,
        submitted_at: NaiveDate,
    ) -> Self {
        let creator_id = creator_id.into();
        Self {
            id: id.into(),
            creator_name: creator_id.clone(),
            creator_id,
            avatar: String::new(),
            link: link.into(),
            spark_ads_code: None,
            views: MetricValue::default(),
            likes: MetricValue::default(),
            status: ReviewStatus::Pending,
            thumbnail: String::new(),
            submitted_at,
        }
    }

    pub fn with_creator(mut self, name: impl Into<String>, avatar: impl Into<String>) -> Self {
        self.creator_name = name.into();
        self.avatar = avatar.into();
        self
    }

    pub fn with_metrics(mut self, views: impl Into<MetricValue>, likes: impl Into<MetricValue>) -> Self {
        self.views = views.into();
        self.likes = likes.into();
        self
    }

    pub fn with_status(mut self, status: ReviewStatus) -> Self {
        self.status = status;
        self
    }
}

/// Payment state of a payout line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayoutStatus {
    #[default]
    Unpaid,
    Paid,
}

/// Money owed to one creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutItem {
    pub id: String,
    pub creator_id: String,
    pub creator_name: String,
    #[serde(default)]
    pub creator_avatar: String,
    pub amount: u64,
    pub reason: String,
    #[serde(default)]
    pub status: PayoutStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<NaiveDate>,
}

/// Eligibility hints shown to creators.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_followers: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashtag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_link: Option<String>,
}

/// Cached headline numbers for a campaign.
///
/// This is a snapshot: it is only refreshed by an explicit recompute or by
/// the review paths that bump it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpi {
    #[serde(default)]
    pub creators: u32,
    #[serde(default)]
    pub submissions: u32,
    #[serde(default)]
    pub total_views: String,
    #[serde(default)]
    pub engagement: String,
}

/// A campaign and everything it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub brand_name: String,
    #[serde(default)]
    pub brand_id: String,
    #[serde(rename = "type", default)]
    pub campaign_types: Vec<CampaignType>,
    #[serde(default)]
    pub status: CampaignStatus,
    pub total_budget: u64,
    #[serde(default)]
    pub spent: u64,
    /// Applicant counter as shown on campaign cards
    #[serde(default)]
    pub applicants: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cover_image: String,
    #[serde(default)]
    pub reward_tiers: Vec<RewardTier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Requirements>,
    #[serde(default)]
    pub applicant_list: Vec<Applicant>,
    #[serde(default)]
    pub submission_list: Vec<Submission>,
    #[serde(default)]
    pub payouts: Vec<PayoutItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kpi: Option<Kpi>,
}

impl Campaign {
    /// Create an empty draft campaign.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        total_budget: u64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            brand_name: String::new(),
            brand_id: String::new(),
            campaign_types: Vec::new(),
            status: CampaignStatus::Draft,
            total_budget,
            spent: 0,
            applicants: 0,
            start_date,
            end_date,
            description: String::new(),
            cover_image: String::new(),
            reward_tiers: Vec::new(),
            requirements: None,
            applicant_list: Vec::new(),
            submission_list: Vec::new(),
            payouts: Vec::new(),
            kpi: None,
        }
    }

    pub fn with_brand(mut self, brand_id: impl Into<String>, brand_name: impl Into<String>) -> Self {
        self.brand_id = brand_id.into();
        self.brand_name = brand_name.into();
        self
    }

    pub fn with_types(mut self, types: Vec<CampaignType>) -> Self {
        self.campaign_types = types;
        self
    }

    pub fn with_status(mut self, status: CampaignStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_tiers(mut self, tiers: Vec<RewardTier>) -> Self {
        self.reward_tiers = tiers;
        self
    }

    pub fn with_submissions(mut self, submissions: Vec<Submission>) -> Self {
        self.submission_list = submissions;
        self
    }

    /// Submissions belonging to one creator.
    pub fn submissions_by(&self, creator_id: &str) -> impl Iterator<Item = &Submission> {
        let creator_id = creator_id.to_string();
        self.submission_list
            .iter()
            .filter(move |s| s.creator_id == creator_id)
    }

    /// The applicant record for a creator, if they applied.
    pub fn applicant(&self, creator_id: &str) -> Option<&Applicant> {
        self.applicant_list.iter().find(|a| a.id == creator_id)
    }

    /// Number of records in the given state.
    pub fn pending_submissions(&self) -> usize {
        self.submission_list
            .iter()
            .filter(|s| s.status == ReviewStatus::Pending)
            .count()
    }

    pub fn pending_applicants(&self) -> usize {
        self.applicant_list
            .iter()
            .filter(|a| a.status == ReviewStatus::Pending)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_winner_slots() {
        assert_eq!(RewardTier::new("a", 1).with_ranks(Some(1), Some(1)).winner_slots(), 1);
        assert_eq!(RewardTier::new("b", 1).with_ranks(Some(2), Some(5)).winner_slots(), 4);
        assert_eq!(RewardTier::new("c", 1).winner_slots(), 1);
        // Reversed range counts as a single winner
        assert_eq!(RewardTier::new("d", 1).with_ranks(Some(5), Some(2)).winner_slots(), 1);
        // Start only: end defaults to 0
        assert_eq!(RewardTier::new("e", 1).with_ranks(Some(3), None).winner_slots(), 1);
    }

    #[test]
    fn test_range_label() {
        assert_eq!(RewardTier::new("a", 1).with_ranks(Some(1), Some(1)).range_label(), "Rank 1");
        assert_eq!(RewardTier::new("b", 1).with_ranks(Some(2), Some(10)).range_label(), "Rank 2-10");
    }

    #[test]
    fn test_campaign_json_shape() {
        let json = r#"{
            "id": "1",
            "title": "Summer Beauty Collection 2024",
            "brandName": "Acme Co.",
            "brandId": "brand-1",
            "type": ["GMV", "CONTENT_VOLUME", "LUCKY_DRAW"],
            "status": "active",
            "totalBudget": 50000,
            "spent": 32500,
            "applicants": 45,
            "startDate": "2026-01-15",
            "endDate": "2026-02-28",
            "rewardTiers": [
                {"id": "1", "tierType": "GMV", "rankStart": 1, "rankEnd": 1, "condition": "Rank 1", "amount": 15000, "description": "Gold Prize"}
            ],
            "submissionList": [
                {"id": "s1", "creatorId": "c1", "link": "https://x", "views": "12.3K", "likes": 900, "status": "approved", "submittedAt": "2026-01-20"}
            ],
            "kpi": {"creators": 12, "submissions": 45, "totalViews": "150K", "engagement": "8.5%"}
        }"#;

        let campaign: Campaign = serde_json::from_str(json).unwrap();
        assert_eq!(campaign.campaign_types.len(), 3);
        assert_eq!(campaign.status, CampaignStatus::Active);
        assert_eq!(campaign.reward_tiers[0].tier_type, Some(CampaignType::Gmv));
        assert_eq!(campaign.submission_list[0].status, ReviewStatus::Approved);
        assert_eq!(campaign.submission_list[0].likes, MetricValue::Number(900.0));
        assert!(campaign.applicant_list.is_empty());

        let back = serde_json::to_value(&campaign).unwrap();
        assert_eq!(back["type"][1], "CONTENT_VOLUME");
        assert_eq!(back["rewardTiers"][0]["rankEnd"], 1);
    }
}
