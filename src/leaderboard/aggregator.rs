//! Leaderboard aggregation.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::metric::parse_metric;
use super::tier::{resolve_tier, tier_label};
use crate::campaign::{ReviewStatus, RewardTier, Submission};

/// How creators with identical total views are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Keep the order in which creators first appear in the submission list
    #[default]
    InputOrder,
    /// Higher total likes first, then ascending creator id
    LikesThenCreatorId,
}

/// One ranked creator on the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// 1-based position
    pub rank: u32,
    pub creator_id: String,
    pub name: String,
    pub avatar: String,
    /// Sum of parsed views across all of the creator's submissions
    pub total_views: u64,
    /// Sum of parsed likes across all of the creator's submissions
    pub total_likes: u64,
    /// Number of submissions, any status
    pub video_count: u32,
    /// Number of approved submissions
    pub approved_count: u32,
    /// Per-winner amount of the resolved tier, 0 when no tier matches
    pub reward_amount: u64,
    /// Resolved tier label, "-" when no tier matches
    pub tier_label: String,
}

impl LeaderboardEntry {
    /// Whether this rank earns a reward.
    pub fn is_rewarded(&self) -> bool {
        self.reward_amount > 0
    }
}

/// Ranked standings derived from a campaign's submissions and tiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Entries ordered by rank.
    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    /// Consume the leaderboard, returning its entries.
    pub fn into_entries(self) -> Vec<LeaderboardEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LeaderboardEntry> {
        self.entries.iter()
    }

    /// Look up a creator's standing.
    pub fn entry_for(&self, creator_id: &str) -> Option<&LeaderboardEntry> {
        self.entries.iter().find(|e| e.creator_id == creator_id)
    }

    /// Entries that currently earn a reward.
    pub fn rewarded(&self) -> impl Iterator<Item = &LeaderboardEntry> {
        self.entries.iter().filter(|e| e.is_rewarded())
    }

    /// Sum of the rewards owed under the current standings.
    ///
    /// Only occupied ranks count; configured slots without a creator do not.
    pub fn projected_payout(&self) -> u64 {
        self.entries
            .iter()
            .fold(0u64, |acc, e| acc.saturating_add(e.reward_amount))
    }
}

impl<'a> IntoIterator for &'a Leaderboard {
    type Item = &'a LeaderboardEntry;
    type IntoIter = std::slice::Iter<'a, LeaderboardEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Running totals for one creator.
#[derive(Debug)]
struct CreatorStats {
    creator_id: String,
    name: String,
    avatar: String,
    total_views: u64,
    total_likes: u64,
    video_count: u32,
    approved_count: u32,
}

impl CreatorStats {
    fn new(first: &Submission) -> Self {
        Self {
            creator_id: first.creator_id.clone(),
            name: first.creator_name.clone(),
            avatar: first.avatar.clone(),
            total_views: 0,
            total_likes: 0,
            video_count: 0,
            approved_count: 0,
        }
    }

    fn record(&mut self, submission: &Submission) {
        self.total_views = self.total_views.saturating_add(parse_metric(&submission.views));
        self.total_likes = self.total_likes.saturating_add(parse_metric(&submission.likes));
        self.video_count += 1;
        if submission.status == ReviewStatus::Approved {
            self.approved_count += 1;
        }
    }
}

/// Build the leaderboard with the default tie-break (input order).
pub fn build_leaderboard(submissions: &[Submission], tiers: &[RewardTier]) -> Leaderboard {
    build_leaderboard_with(submissions, tiers, TieBreak::default())
}

/// Build the leaderboard.
///
/// Submissions are grouped per creator (views and likes summed, videos and
/// approved videos counted), sorted by descending total views, ranked from 1
/// and matched against `tiers` by rank. Submissions of every status count
/// toward the totals.
pub fn build_leaderboard_with(
    submissions: &[Submission],
    tiers: &[RewardTier],
    tie_break: TieBreak,
) -> Leaderboard {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut stats: Vec<CreatorStats> = Vec::new();

    for submission in submissions {
        let slot = *slots
            .entry(submission.creator_id.as_str())
            .or_insert_with(|| {
                stats.push(CreatorStats::new(submission));
                stats.len() - 1
            });
        stats[slot].record(submission);
    }

    // sort_by is stable, so equal keys keep first-appearance order
    stats.sort_by(|a, b| compare(a, b, tie_break));

    let entries: Vec<LeaderboardEntry> = stats
        .into_iter()
        .enumerate()
        .map(|(index, creator)| {
            let rank = index as u32 + 1;
            let tier = resolve_tier(rank, tiers);
            LeaderboardEntry {
                rank,
                creator_id: creator.creator_id,
                name: creator.name,
                avatar: creator.avatar,
                total_views: creator.total_views,
                total_likes: creator.total_likes,
                video_count: creator.video_count,
                approved_count: creator.approved_count,
                reward_amount: tier.map(|t| t.amount).unwrap_or(0),
                tier_label: tier_label(tier),
            }
        })
        .collect();

    debug!(
        submissions = submissions.len(),
        creators = entries.len(),
        tiers = tiers.len(),
        "Leaderboard rebuilt"
    );

    Leaderboard { entries }
}

fn compare(a: &CreatorStats, b: &CreatorStats, tie_break: TieBreak) -> Ordering {
    let by_views = b.total_views.cmp(&a.total_views);
    match tie_break {
        TieBreak::InputOrder => by_views,
        TieBreak::LikesThenCreatorId => by_views
            .then_with(|| b.total_likes.cmp(&a.total_likes))
            .then_with(|| a.creator_id.cmp(&b.creator_id)),
    }
}
