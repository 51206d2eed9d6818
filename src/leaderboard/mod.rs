//! Leaderboard computation for campaign submissions.
//!
//! This module turns the raw submission list of a campaign into a ranked
//! standing of creators and attaches the reward each rank earns.
//!
//! # Overview
//!
//! The leaderboard pipeline consists of:
//! - **parse_metric**: Normalizes textual counters ("12.3K", "1,234") to integers
//! - **resolve_tier**: Maps a rank to the first reward tier whose range contains it
//! - **build_leaderboard**: Groups submissions by creator, sorts and ranks them
//!
//! Every function here is pure. A leaderboard is recomputed from scratch
//! whenever submissions or tiers change; nothing is cached between calls.

mod aggregator;
mod metric;
mod tier;

pub use aggregator::{
    build_leaderboard, build_leaderboard_with, Leaderboard, LeaderboardEntry, TieBreak,
};
pub use metric::{format_compact, parse_metric, parse_metric_str, MetricValue};
pub use tier::{resolve_tier, tier_label, DEFAULT_RANK_END, NO_TIER_LABEL};
