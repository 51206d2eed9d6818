//! Budget reconciliation.
//!
//! Two numbers are compared against a campaign's total budget and they are
//! deliberately kept apart:
//!
//! - **used budget** (configuration time): what the tiers would pay if every
//!   configured slot were filled,
//! - **projected payout** (live): what the current leaderboard actually owes.
//!
//! Early in a campaign the projected payout is usually far below the used
//! budget because most ranks are still empty.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::config::ReconcileConfig;
use crate::campaign::{CampaignType, RewardTier};
use crate::leaderboard::Leaderboard;

/// Status of budget usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetStatus {
    /// Under warning threshold, all good
    Ok,
    /// Approaching budget limit (over warning threshold)
    Warning,
    /// Near budget limit (over critical threshold)
    Critical,
    /// Budget exceeded
    Exceeded,
}

impl BudgetStatus {
    /// Check if warnings should be shown.
    pub fn should_warn(&self) -> bool {
        matches!(self, BudgetStatus::Warning | BudgetStatus::Critical)
    }

    pub fn is_exceeded(&self) -> bool {
        matches!(self, BudgetStatus::Exceeded)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetStatus::Ok => "OK",
            BudgetStatus::Warning => "WARNING",
            BudgetStatus::Critical => "CRITICAL",
            BudgetStatus::Exceeded => "EXCEEDED",
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `total - spent` as a signed amount, clamped to the `i64` range.
fn signed_remaining(total: u64, spent: u64) -> i64 {
    let diff = i128::from(total) - i128::from(spent);
    i64::try_from(diff).unwrap_or(if diff < 0 { i64::MIN } else { i64::MAX })
}

/// Share of `total` taken by `amount`, 0.0 for an empty budget.
fn usage_ratio(amount: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        amount as f64 / total as f64
    }
}

/// Worst-case spend implied by the tier configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfiguredBudget {
    pub total_budget: u64,
    /// Sum of `amount * winner slots` over all tiers
    pub used_budget: u64,
    /// `total_budget - used_budget`, negative when over budget
    pub remaining: i64,
    pub over_budget: bool,
}

impl ConfiguredBudget {
    /// Share of the total budget the tiers would consume.
    pub fn usage_ratio(&self) -> f64 {
        usage_ratio(self.used_budget, self.total_budget)
    }

    /// Amount by which the tiers exceed the budget, 0 when within it.
    pub fn overage(&self) -> u64 {
        self.used_budget.saturating_sub(self.total_budget)
    }
}

/// Payout owed under the current leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveBudget {
    pub total_budget: u64,
    /// Sum of rewards of the ranks that are currently occupied
    pub projected_payout: u64,
    pub over_budget: bool,
}

impl LiveBudget {
    /// Share of the total budget the current standings would pay out.
    pub fn usage_ratio(&self) -> f64 {
        usage_ratio(self.projected_payout, self.total_budget)
    }

    /// Budget left after paying the current standings, negative when over.
    pub fn headroom(&self) -> i64 {
        signed_remaining(self.total_budget, self.projected_payout)
    }
}

/// Reconcile the configured tiers against the budget.
///
/// Each tier counts `max(1, rank_end - rank_start + 1)` winners, with missing
/// ranks read as 0, so an unranked tier still pays one winner.
pub fn reconcile_configuration(total_budget: u64, tiers: &[RewardTier]) -> ConfiguredBudget {
    let used_budget = tiers
        .iter()
        .fold(0u64, |acc, tier| acc.saturating_add(tier.max_payout()));
    ConfiguredBudget {
        total_budget,
        used_budget,
        remaining: signed_remaining(total_budget, used_budget),
        over_budget: used_budget > total_budget,
    }
}

/// Reconcile the current standings against the budget.
pub fn reconcile_live(total_budget: u64, leaderboard: &Leaderboard) -> LiveBudget {
    let projected_payout = leaderboard.projected_payout();
    LiveBudget {
        total_budget,
        projected_payout,
        over_budget: projected_payout > total_budget,
    }
}

/// Two tiers of the same type whose rank ranges intersect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierOverlap {
    pub tier_type: Option<CampaignType>,
    /// Earlier-listed tier; this one wins rank resolution
    pub first: String,
    pub second: String,
}

/// Find tiers of the same type with intersecting rank ranges.
///
/// Only tiers with both bounds assigned are compared. Overlaps are not an
/// error: rank resolution picks the earlier-listed tier.
pub fn find_overlaps(tiers: &[RewardTier]) -> Vec<TierOverlap> {
    let ranged: Vec<&RewardTier> = tiers
        .iter()
        .filter(|t| t.start() > 0 && t.end() > 0)
        .collect();

    let mut overlaps = Vec::new();
    for (i, a) in ranged.iter().enumerate() {
        for b in &ranged[i + 1..] {
            if a.tier_type == b.tier_type && a.start() <= b.end() && b.start() <= a.end() {
                overlaps.push(TierOverlap {
                    tier_type: a.tier_type,
                    first: a.id.clone(),
                    second: b.id.clone(),
                });
            }
        }
    }
    overlaps
}

/// Rank a newly added tier of `tier_type` should start at.
pub fn next_rank(tiers: &[RewardTier], tier_type: Option<CampaignType>) -> u32 {
    tiers
        .iter()
        .filter(|t| t.tier_type == tier_type)
        .map(|t| t.end())
        .max()
        .unwrap_or(0)
        .saturating_add(1)
}

/// Both reconciliations for one campaign, with their statuses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetReport {
    pub configured: ConfiguredBudget,
    pub configured_status: BudgetStatus,
    pub live: LiveBudget,
    pub live_status: BudgetStatus,
    /// Fee charged on top of the prize budget
    pub platform_fee: u64,
    pub overlaps: Vec<TierOverlap>,
}

impl BudgetReport {
    /// Reconcile a campaign's tiers and standings.
    pub fn new(
        total_budget: u64,
        tiers: &[RewardTier],
        leaderboard: &Leaderboard,
        config: &ReconcileConfig,
    ) -> Self {
        let configured = reconcile_configuration(total_budget, tiers);
        let live = reconcile_live(total_budget, leaderboard);
        let overlaps = find_overlaps(tiers);

        if configured.over_budget {
            warn!(
                total_budget,
                used_budget = configured.used_budget,
                "Reward tiers exceed the budget"
            );
        }
        if live.over_budget {
            warn!(
                total_budget,
                projected_payout = live.projected_payout,
                "Projected payout exceeds the budget"
            );
        }
        for overlap in &overlaps {
            warn!(first = %overlap.first, second = %overlap.second, "Reward tier ranges overlap");
        }

        Self {
            configured_status: config.status_for(configured.usage_ratio(), configured.over_budget),
            live_status: config.status_for(live.usage_ratio(), live.over_budget),
            platform_fee: config.platform_fee(total_budget),
            configured,
            live,
            overlaps,
        }
    }

    /// Format as a human-readable string.
    pub fn format(&self, currency: &str) -> String {
        let mut output = String::from("## Budget Summary\n\n");

        output.push_str(&format!(
            "**Total Budget**: {} {} (+{} {} platform fee)\n",
            self.configured.total_budget, currency, self.platform_fee, currency
        ));

        output.push_str(&format!(
            "**Tier Allocation**: {}/{} ({:.1}%) [{}]\n",
            self.configured.used_budget,
            self.configured.total_budget,
            self.configured.usage_ratio() * 100.0,
            self.configured_status
        ));

        if self.configured.over_budget {
            output.push_str(&format!(
                "  - Over budget by {} {}\n",
                self.configured.overage(),
                currency
            ));
        } else {
            output.push_str(&format!(
                "  - Remaining: {} {}\n",
                self.configured.remaining, currency
            ));
        }

        output.push_str(&format!(
            "**Projected Payout**: {}/{} ({:.1}%) [{}]\n",
            self.live.projected_payout,
            self.live.total_budget,
            self.live.usage_ratio() * 100.0,
            self.live_status
        ));

        if !self.overlaps.is_empty() {
            output.push_str(&format!(
                "**Overlapping Tiers**: {}\n",
                self.overlaps
                    .iter()
                    .map(|o| format!("{}/{}", o.first, o.second))
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::Submission;
    use crate::leaderboard::build_leaderboard;
    use chrono::NaiveDate;

    fn standard_tiers() -> Vec<RewardTier> {
        vec![
            RewardTier::new("gold", 15_000).with_ranks(Some(1), Some(1)),
            RewardTier::new("silver", 5_000).with_ranks(Some(2), Some(5)),
        ]
    }

    fn board(views: &[u64]) -> Leaderboard {
        let day = NaiveDate::from_ymd_opt(2026, 1, 20).unwrap();
        let subs: Vec<Submission> = views
            .iter()
            .enumerate()
            .map(|(i, v)| {
                Submission::new(format!("s{}", i), format!("c{}", i), format!("l{}", i), day)
                    .with_metrics(*v, 0u64)
            })
            .collect();
        build_leaderboard(&subs, &standard_tiers())
    }

    #[test]
    fn test_configured_used_budget() {
        let configured = reconcile_configuration(50_000, &standard_tiers());
        assert_eq!(configured.used_budget, 35_000);
        assert_eq!(configured.remaining, 15_000);
        assert!(!configured.over_budget);
        assert!((configured.usage_ratio() - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_configured_unranked_tier_counts_one_winner() {
        let tiers = vec![RewardTier::new("misc", 2_000)];
        assert_eq!(reconcile_configuration(10_000, &tiers).used_budget, 2_000);
    }

    #[test]
    fn test_configured_over_budget() {
        let configured = reconcile_configuration(30_000, &standard_tiers());
        assert!(configured.over_budget);
        assert_eq!(configured.remaining, -5_000);
        assert_eq!(configured.overage(), 5_000);
    }

    #[test]
    fn test_zero_budget_ratio_is_guarded() {
        let configured = reconcile_configuration(0, &standard_tiers());
        assert_eq!(configured.usage_ratio(), 0.0);
        assert!(configured.over_budget);

        let live = reconcile_live(0, &Leaderboard::default());
        assert_eq!(live.usage_ratio(), 0.0);
        assert!(!live.over_budget);
    }

    #[test]
    fn test_live_counts_only_occupied_ranks() {
        let live = reconcile_live(50_000, &board(&[100, 90]));
        assert_eq!(live.projected_payout, 20_000);
        assert_eq!(live.headroom(), 30_000);

        let configured = reconcile_configuration(50_000, &standard_tiers());
        assert!(live.projected_payout < configured.used_budget);
    }

    #[test]
    fn test_live_over_budget() {
        let live = reconcile_live(18_000, &board(&[100, 90]));
        assert!(live.over_budget);
        assert_eq!(live.headroom(), -2_000);
    }

    #[test]
    fn test_find_overlaps_same_type_only() {
        let tiers = vec![
            RewardTier::new("a", 1).with_ranks(Some(1), Some(3)).with_tier_type(CampaignType::Gmv),
            RewardTier::new("b", 1).with_ranks(Some(3), Some(5)).with_tier_type(CampaignType::Gmv),
            RewardTier::new("c", 1).with_ranks(Some(1), Some(5)).with_tier_type(CampaignType::LuckyDraw),
            RewardTier::new("d", 1).with_tier_type(CampaignType::Gmv),
        ];

        let overlaps = find_overlaps(&tiers);
        assert_eq!(overlaps.len(), 1);
        assert_eq!(overlaps[0].first, "a");
        assert_eq!(overlaps[0].second, "b");
        assert!(find_overlaps(&standard_tiers()).is_empty());
    }

    #[test]
    fn test_huge_budget_without_tiers_is_within_budget() {
        let configured = reconcile_configuration(u64::MAX, &[]);
        assert!(!configured.over_budget);
        assert_eq!(configured.remaining, i64::MAX);
        assert_eq!(configured.overage(), 0);

        let live = reconcile_live(u64::MAX, &Leaderboard::default());
        assert!(!live.over_budget);
        assert_eq!(live.headroom(), i64::MAX);
    }

    #[test]
    fn test_huge_tier_total_clamps_remaining() {
        let tiers = vec![RewardTier::new("whale", u64::MAX).with_ranks(Some(1), Some(1))];
        let configured = reconcile_configuration(10, &tiers);
        assert!(configured.over_budget);
        assert_eq!(configured.remaining, i64::MIN);
        assert_eq!(configured.overage(), u64::MAX - 10);
    }

    #[test]
    fn test_next_rank_saturates_at_max_rank() {
        let tiers = vec![RewardTier::new("all", 1).with_ranks(Some(1), Some(u32::MAX))];
        assert_eq!(next_rank(&tiers, None), u32::MAX);
    }

    #[test]
    fn test_next_rank() {
        let tiers: Vec<RewardTier> = standard_tiers()
            .into_iter()
            .map(|t| t.with_tier_type(CampaignType::Gmv))
            .collect();
        assert_eq!(next_rank(&tiers, Some(CampaignType::Gmv)), 6);
        assert_eq!(next_rank(&tiers, Some(CampaignType::LuckyDraw)), 1);
        assert_eq!(next_rank(&[], None), 1);
    }

    #[test]
    fn test_report_statuses_and_format() {
        let report = BudgetReport::new(
            50_000,
            &standard_tiers(),
            &board(&[100, 90, 80, 70, 60, 50]),
            &ReconcileConfig::default(),
        );

        assert_eq!(report.configured.used_budget, 35_000);
        assert_eq!(report.live.projected_payout, 35_000);
        assert_eq!(report.configured_status, BudgetStatus::Warning);
        assert_eq!(report.live_status, BudgetStatus::Warning);
        assert_eq!(report.platform_fee, 7_500);

        let text = report.format("THB");
        assert!(text.contains("**Tier Allocation**: 35000/50000 (70.0%) [WARNING]"));
        assert!(text.contains("Remaining: 15000 THB"));
        assert!(!text.contains("Overlapping"));
    }
}
